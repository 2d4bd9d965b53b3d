//! Tokeniser for the textual pattern syntax (spec §6).
//!
//! Every token is lexically atomic — even a hex byte is two [`Token::HexDigit`]
//! tokens, not one fused "byte" token. This sidesteps the usual lexer-level
//! ambiguity between a hex byte pair and a quantifier's decimal digits
//! (`4A` vs `{10,20}` both being runs of `[0-9a-fA-F]`): the grammar, not the
//! lexer, decides how many digits to pull and how to interpret them.

use logos::Logos;

use crate::error::{Error, ParseErrorKind};

#[derive(Logos, Debug, Clone, PartialEq, Eq)]
#[logos(skip r"[ \t\r\n]+")]
#[logos(skip r"#[^\n]*")]
pub enum Token {
    #[regex("[0-9a-fA-F]", |lex| hex_val(lex.slice().as_bytes()[0]))]
    HexDigit(u8),

    #[token(".")]
    Dot,

    #[regex("'[^']*'", |lex| inner_bytes(lex.slice()))]
    SQuoteString(Vec<u8>),

    #[regex("`[^`]*`", |lex| inner_bytes(lex.slice()))]
    BQuoteString(Vec<u8>),

    #[token("&")]
    Amp,
    #[token("~")]
    Tilde,
    #[token("[")]
    LBracket,
    #[token("]")]
    RBracket,
    #[token("^")]
    Caret,
    #[token("(")]
    LParen,
    #[token(")")]
    RParen,
    #[token("|")]
    Pipe,
    #[token("?")]
    Question,
    #[token("*")]
    Star,
    #[token("+")]
    Plus,
    #[token("{")]
    LBrace,
    #[token("}")]
    RBrace,
    #[token(",")]
    Comma,
    #[token("-")]
    Dash,

    /// One of the 18 backslash shorthands: `\t \n \r \v \f \e` (single bytes)
    /// and `\d \D \w \W \s \S \l \L \u \U \i \I` (byte classes).
    #[regex(r"\\[A-Za-z]", |lex| lex.slice().as_bytes()[1] as char)]
    Escape(char),
}

fn hex_val(c: u8) -> u8 {
    match c {
        b'0'..=b'9' => c - b'0',
        b'a'..=b'f' => c - b'a' + 10,
        b'A'..=b'F' => c - b'A' + 10,
        _ => unreachable!("restricted by the token's own regex"),
    }
}

fn inner_bytes(slice: &str) -> Vec<u8> {
    slice.as_bytes()[1..slice.len() - 1].to_vec()
}

/// A token plus its byte-offset span in the source, for error reporting.
pub struct Spanned {
    pub token: Token,
    pub pos: usize,
}

/// Tokenises the whole input eagerly; patterns are short, so the simplicity
/// of a materialised token vector beats a lazily-pulled lexer here.
pub fn tokenize(src: &str) -> Result<Vec<Spanned>, Error> {
    let mut out = Vec::new();
    let mut lex = Token::lexer(src);
    while let Some(result) = lex.next() {
        let span = lex.span();
        match result {
            Ok(token) => out.push(Spanned { token, pos: span.start }),
            Err(()) => {
                let byte = src.as_bytes()[span.start];
                return Err(Error::Parse {
                    pos: span.start,
                    kind: ParseErrorKind::UnexpectedByte { byte },
                });
            }
        }
    }
    Ok(out)
}
