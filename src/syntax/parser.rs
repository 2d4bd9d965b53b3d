//! Recursive-descent parser from tokens to [`Node`] (spec §6's grammar:
//! hex bytes, `.`, quoted strings, `&`/`~` bitmasks, `[...]`/`[^...]` sets
//! with ranges/nested sets/bitmasks/escapes, `?`/`*`/`+`/`{n}`/`{n,m}`/`{n,*}`
//! quantifiers, `|` alternation and `(...)` grouping).

use crate::byte_matcher::ByteMatcher;
use crate::compile::Node;
use crate::error::{Error, ParseErrorKind, Result};
use crate::syntax::lexer::{tokenize, Spanned, Token};

/// Parses a textual pattern into a [`Node`] tree.
pub fn parse(src: &str) -> Result<Node> {
    let tokens = tokenize(src)?;
    let mut parser = Parser {
        src,
        tokens: &tokens,
        pos: 0,
    };
    let node = parser.parse_alternation()?;
    parser.expect_eof()?;
    Ok(node)
}

struct Parser<'a> {
    src: &'a str,
    tokens: &'a [Spanned],
    pos: usize,
}

impl<'a> Parser<'a> {
    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.pos).map(|s| &s.token)
    }

    fn current_pos(&self) -> usize {
        self.tokens.get(self.pos).map_or(self.src.len(), |s| s.pos)
    }

    fn advance(&mut self) -> Option<&Token> {
        let tok = self.tokens.get(self.pos).map(|s| &s.token);
        if tok.is_some() {
            self.pos += 1;
        }
        tok
    }

    fn eat(&mut self, tok: &Token) -> bool {
        if self.peek() == Some(tok) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    fn err_here(&self, kind: ParseErrorKind) -> Error {
        Error::Parse {
            pos: self.current_pos(),
            kind,
        }
    }

    fn err_unexpected(&self) -> Error {
        let pos = self.current_pos();
        let byte = self.src.as_bytes().get(pos).copied().unwrap_or(0);
        Error::Parse {
            pos,
            kind: ParseErrorKind::UnexpectedByte { byte },
        }
    }

    fn expect_eof(&self) -> Result<()> {
        match self.tokens.get(self.pos) {
            None => Ok(()),
            Some(s) if s.token == Token::RParen => Err(self.err_here(ParseErrorKind::UnmatchedCloseParen)),
            _ => Err(self.err_unexpected()),
        }
    }

    fn expect_rparen(&mut self) -> Result<()> {
        if self.eat(&Token::RParen) {
            Ok(())
        } else {
            Err(self.err_here(ParseErrorKind::MissingCloseParen))
        }
    }

    fn expect_rbracket(&mut self) -> Result<()> {
        if self.eat(&Token::RBracket) {
            Ok(())
        } else {
            Err(self.err_here(ParseErrorKind::UnterminatedSet))
        }
    }

    // alternation := concat ('|' concat)*
    fn parse_alternation(&mut self) -> Result<Node> {
        let mut branches = vec![self.parse_concat()?];
        while self.eat(&Token::Pipe) {
            branches.push(self.parse_concat()?);
        }
        Ok(if branches.len() == 1 {
            branches.pop().unwrap()
        } else {
            Node::Alt(branches)
        })
    }

    // concat := quantified+
    fn parse_concat(&mut self) -> Result<Node> {
        let mut items = Vec::new();
        while let Some(node) = self.try_parse_quantified()? {
            items.push(node);
        }
        match items.len() {
            0 => Err(self.err_here(ParseErrorKind::UnexpectedEof)),
            1 => Ok(items.pop().unwrap()),
            _ => Ok(Node::Sequence(items)),
        }
    }

    // quantified := atom ('?' | '*' | '+' | '{' bound '}')*
    fn try_parse_quantified(&mut self) -> Result<Option<Node>> {
        let Some(mut node) = self.try_parse_atom()? else {
            return Ok(None);
        };
        loop {
            match self.peek() {
                Some(Token::Question) => {
                    self.advance();
                    node = Node::Optional(Box::new(node));
                }
                Some(Token::Star) => {
                    self.advance();
                    node = Node::Many(Box::new(node));
                }
                Some(Token::Plus) => {
                    self.advance();
                    node = Node::OneToMany(Box::new(node));
                }
                Some(Token::LBrace) => {
                    node = self.parse_repeat(node)?;
                }
                _ => break,
            }
        }
        Ok(Some(node))
    }

    fn try_parse_atom(&mut self) -> Result<Option<Node>> {
        match self.peek() {
            None | Some(Token::Pipe) | Some(Token::RParen) => Ok(None),
            Some(Token::Dot) => {
                self.advance();
                Ok(Some(Node::Any))
            }
            Some(Token::HexDigit(_)) => {
                let v = self.parse_hex_byte_value()?;
                Ok(Some(Node::Byte(v)))
            }
            Some(Token::SQuoteString(_)) => {
                let Some(Token::SQuoteString(bytes)) = self.advance().cloned() else {
                    unreachable!()
                };
                Ok(Some(Node::CaseSensitiveString(bytes)))
            }
            Some(Token::BQuoteString(_)) => {
                let Some(Token::BQuoteString(bytes)) = self.advance().cloned() else {
                    unreachable!()
                };
                Ok(Some(Node::CaseInsensitiveString(bytes)))
            }
            Some(Token::Amp) => {
                self.advance();
                let mask = self.parse_hex_byte_value()?;
                Ok(Some(Node::AllBitmask(mask)))
            }
            Some(Token::Tilde) => {
                self.advance();
                let mask = self.parse_hex_byte_value()?;
                Ok(Some(Node::AnyBitmask(mask)))
            }
            Some(Token::LBracket) => Ok(Some(self.parse_set()?)),
            Some(Token::LParen) => {
                self.advance();
                let inner = self.parse_alternation()?;
                self.expect_rparen()?;
                Ok(Some(inner))
            }
            Some(Token::Escape(c)) => {
                let c = *c;
                let pos = self.current_pos();
                self.advance();
                Ok(Some(escape_to_node(c, pos)?))
            }
            Some(_) => Ok(None),
        }
    }

    fn parse_hex_byte_value(&mut self) -> Result<u8> {
        let hi = self.expect_hex_digit()?;
        let lo = self.expect_hex_digit()?;
        Ok((hi << 4) | lo)
    }

    fn expect_hex_digit(&mut self) -> Result<u8> {
        let pos = self.current_pos();
        match self.advance() {
            Some(Token::HexDigit(v)) => Ok(*v),
            Some(other) => {
                let text = format!("{other:?}");
                Err(Error::Parse {
                    pos,
                    kind: ParseErrorKind::InvalidHexByte { text },
                })
            }
            None => Err(Error::Parse {
                pos,
                kind: ParseErrorKind::UnexpectedEof,
            }),
        }
    }

    /// Consumes a run of decimal digit tokens (hex digits in 0..=9 only).
    /// Returns `None` without consuming anything if the next token isn't one.
    fn parse_number_opt(&mut self) -> Option<u64> {
        let mut any = false;
        let mut value = 0u64;
        while let Some(Token::HexDigit(v)) = self.peek() {
            let v = *v;
            if v > 9 {
                break;
            }
            self.advance();
            value = value * 10 + v as u64;
            any = true;
        }
        any.then_some(value)
    }

    // bound := number (',' ('*' | number)?)?
    fn parse_repeat(&mut self, inner: Node) -> Result<Node> {
        let open_pos = self.current_pos();
        self.advance(); // '{'
        let lo = self.parse_number_opt();
        let mut hi = lo;
        if self.eat(&Token::Comma) {
            hi = if self.eat(&Token::Star) {
                None
            } else {
                self.parse_number_opt()
            };
        }
        if !self.eat(&Token::RBrace) {
            return Err(Error::Parse {
                pos: open_pos,
                kind: ParseErrorKind::InvalidQuantifier { lo: lo.unwrap_or(0), hi },
            });
        }
        let Some(lo) = lo else {
            return Err(Error::Parse {
                pos: open_pos,
                kind: ParseErrorKind::InvalidQuantifier { lo: 0, hi },
            });
        };
        if let Some(h) = hi {
            if h < lo {
                return Err(Error::Parse {
                    pos: open_pos,
                    kind: ParseErrorKind::InvalidQuantifier { lo, hi: Some(h) },
                });
            }
        }
        Ok(Node::Repeat(Box::new(inner), lo, hi))
    }

    // set := '[' '^'? set_item* ']'
    fn parse_set(&mut self) -> Result<Node> {
        let start_pos = self.current_pos();
        self.advance(); // '['
        let inverted = self.eat(&Token::Caret);
        let mut bytes: Vec<u8> = Vec::new();
        loop {
            match self.peek() {
                Some(Token::RBracket) => {
                    self.advance();
                    break;
                }
                None => return Err(self.err_here(ParseErrorKind::UnterminatedSet)),
                Some(Token::LBracket) => {
                    let nested = self.parse_set()?;
                    bytes.extend(node_to_bytes(&nested));
                }
                Some(Token::Amp) => {
                    self.advance();
                    let mask = self.parse_hex_byte_value()?;
                    bytes.extend(ByteMatcher::all_bitmask(mask).matching_bytes());
                }
                Some(Token::Tilde) => {
                    self.advance();
                    let mask = self.parse_hex_byte_value()?;
                    bytes.extend(ByteMatcher::any_bitmask(mask).matching_bytes());
                }
                Some(Token::Escape(c)) => {
                    let c = *c;
                    let pos = self.current_pos();
                    self.advance();
                    bytes.extend(escape_matcher(c, pos)?.matching_bytes());
                }
                Some(Token::HexDigit(_)) => {
                    let lo_pos = self.current_pos();
                    let lo = self.parse_hex_byte_value()?;
                    if self.eat(&Token::Dash) {
                        let hi = self.parse_hex_byte_value()?;
                        if hi < lo {
                            return Err(Error::Parse {
                                pos: lo_pos,
                                kind: ParseErrorKind::InvalidRange { lo, hi },
                            });
                        }
                        bytes.extend(lo..=hi);
                    } else {
                        bytes.push(lo);
                    }
                }
                Some(_) => return Err(self.err_unexpected()),
            }
        }
        if bytes.is_empty() {
            return Err(Error::Parse {
                pos: start_pos,
                kind: ParseErrorKind::EmptySet,
            });
        }
        Ok(if inverted {
            Node::InvertedSet(bytes)
        } else {
            Node::Set(bytes)
        })
    }
}

/// Flattens a previously-parsed `Set`/`InvertedSet` node back into the
/// explicit bytes it matches, for unioning a nested `[...]` into its parent.
fn node_to_bytes(node: &Node) -> Vec<u8> {
    match node {
        Node::Set(bytes) => ByteMatcher::from_bytes(bytes.iter().copied()).matching_bytes().to_vec(),
        Node::InvertedSet(bytes) => ByteMatcher::from_bytes(bytes.iter().copied())
            .invert()
            .matching_bytes()
            .to_vec(),
        _ => unreachable!("parse_set only ever returns Set or InvertedSet"),
    }
}

fn word_bytes() -> impl Iterator<Item = u8> {
    (b'A'..=b'Z').chain(b'a'..=b'z').chain(b'0'..=b'9').chain(std::iter::once(b'_'))
}

/// The byte-matching predicate behind one of the 18 backslash shorthands.
fn escape_matcher(c: char, pos: usize) -> Result<ByteMatcher> {
    Ok(match c {
        't' => ByteMatcher::byte(0x09),
        'n' => ByteMatcher::byte(0x0A),
        'r' => ByteMatcher::byte(0x0D),
        'v' => ByteMatcher::byte(0x0B),
        'f' => ByteMatcher::byte(0x0C),
        'e' => ByteMatcher::byte(0x1B),
        'd' => ByteMatcher::range(b'0', b'9'),
        'D' => ByteMatcher::range(b'0', b'9').invert(),
        'w' => ByteMatcher::from_bytes(word_bytes()),
        'W' => ByteMatcher::from_bytes(word_bytes()).invert(),
        's' => ByteMatcher::from_bytes([0x09, 0x0A, 0x0B, 0x0C, 0x0D, 0x20]),
        'S' => ByteMatcher::from_bytes([0x09, 0x0A, 0x0B, 0x0C, 0x0D, 0x20]).invert(),
        'l' => ByteMatcher::range(b'a', b'z'),
        'L' => ByteMatcher::range(b'a', b'z').invert(),
        'u' => ByteMatcher::range(b'A', b'Z'),
        'U' => ByteMatcher::range(b'A', b'Z').invert(),
        'i' => ByteMatcher::from_bytes((b'A'..=b'Z').chain(b'a'..=b'z')),
        'I' => ByteMatcher::from_bytes((b'A'..=b'Z').chain(b'a'..=b'z')).invert(),
        other => {
            return Err(Error::Parse {
                pos,
                kind: ParseErrorKind::UnknownEscape(other),
            })
        }
    })
}

fn escape_to_node(c: char, pos: usize) -> Result<Node> {
    let matcher = escape_matcher(c, pos)?;
    Ok(Node::Set(matcher.matching_bytes().to_vec()))
}
