//! ESC/POS byte sequence builder.

use bytes::{BufMut, Bytes, BytesMut};

const ESC: u8 = 0x1B;
const GS: u8 = 0x1D;
const LF: u8 = 0x0A;

/// Accumulates ESC/POS commands into one payload.
///
/// Only the subset the print server emits is covered.
#[derive(Debug, Default, Clone)]
pub struct CommandBuilder {
    buf: BytesMut,
}

impl CommandBuilder {
    /// Start an empty command sequence.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append raw bytes verbatim.
    pub fn append(mut self, bytes: &[u8]) -> Self {
        self.buf.put_slice(bytes);
        self
    }

    /// `ESC @`: reset the printer to its power-on state.
    pub fn initialize(self) -> Self {
        self.append(&[ESC, b'@'])
    }

    /// `ESC a 0`
    pub fn align_left(self) -> Self {
        self.append(&[ESC, b'a', 0])
    }

    /// `ESC a 1`
    pub fn align_center(self) -> Self {
        self.append(&[ESC, b'a', 1])
    }

    /// `ESC a 2`
    pub fn align_right(self) -> Self {
        self.append(&[ESC, b'a', 2])
    }

    /// Text followed by a line feed.
    pub fn print_line(self, line: &str) -> Self {
        self.append(line.as_bytes()).append(&[LF])
    }

    /// `ESC d n`: print the buffer and feed `n` lines.
    pub fn feed_lines(self, lines: u8) -> Self {
        self.append(&[ESC, b'd', lines])
    }

    /// `GS V 1`
    pub fn partial_cut(self) -> Self {
        self.append(&[GS, b'V', 1])
    }

    /// `GS V 0`
    pub fn full_cut(self) -> Self {
        self.append(&[GS, b'V', 0])
    }

    /// Number of bytes accumulated so far.
    pub fn len(&self) -> usize {
        self.buf.len()
    }

    /// Whether nothing has been appended.
    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    /// Finish and return the payload.
    pub fn build(self) -> Bytes {
        self.buf.freeze()
    }
}
