use crate::reader::{Window, WindowReader};

/// A [`WindowReader`] over an in-memory byte slice.
///
/// By default a single window spans the whole buffer. A smaller
/// `window_size` can be configured (mainly for tests) to exercise matching
/// logic that must span window boundaries, per spec §4.2's requirement that
/// "every matched byte on either side of every window boundary" be tested.
pub struct SliceReader<'a> {
    bytes: &'a [u8],
    window_size: usize,
}

impl<'a> SliceReader<'a> {
    pub fn new(bytes: &'a [u8]) -> Self {
        SliceReader {
            bytes,
            window_size: bytes.len().max(1),
        }
    }

    /// Same buffer, but windows are at most `window_size` bytes. Used to
    /// deterministically test boundary-straddling matches.
    pub fn with_window_size(bytes: &'a [u8], window_size: usize) -> Self {
        assert!(window_size > 0, "window_size must be positive");
        SliceReader { bytes, window_size }
    }
}

impl<'a> WindowReader for SliceReader<'a> {
    fn length(&self) -> usize {
        self.bytes.len()
    }

    fn window(&mut self, pos: usize) -> Option<Window<'_>> {
        if pos >= self.bytes.len() {
            return None;
        }
        let start = (pos / self.window_size) * self.window_size;
        let end = (start + self.window_size).min(self.bytes.len());
        Some(Window::new(&self.bytes[start..end], start))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn whole_buffer_window() {
        let data = b"hello world";
        let mut reader = SliceReader::new(data);
        let w = reader.window(0).unwrap();
        assert_eq!(w.start(), 0);
        assert_eq!(w.bytes(), data);
    }

    #[test]
    fn chunked_windows_straddle_correctly() {
        let data = b"AAAAAAAGutenberg"; // 16 bytes, 'G' at offset 7.
        let mut reader = SliceReader::with_window_size(data, 8);
        let w0 = reader.window(0).unwrap();
        assert_eq!(w0.start(), 0);
        assert_eq!(w0.len(), 8);
        let w1 = reader.window(8).unwrap();
        assert_eq!(w1.start(), 8);
        assert_eq!(w1.bytes(), &data[8..16]);
        assert_eq!(reader.window(16), None);
    }

    #[test]
    fn read_byte_crosses_windows() {
        let data = b"0123456789";
        let mut reader = SliceReader::with_window_size(data, 4);
        for (i, &b) in data.iter().enumerate() {
            assert_eq!(reader.read_byte(i), Some(b));
        }
        assert_eq!(reader.read_byte(10), None);
    }
}
