//! ESC/POS document builder
//!
//! Provides the command table and a fluent API for building ESC/POS print data.

use crate::encoding::{convert_to_cp1252, normalize_text, text_width};

/// ESC/POS command table
///
/// Every control sequence the builder emits lives here.
pub mod cmd {
    /// ESC @ - Initialize printer
    pub const INIT: &[u8] = &[0x1B, 0x40];
    /// ESC t 16 - Select character code table WPC1252
    pub const CODE_PAGE_WPC1252: &[u8] = &[0x1B, 0x74, 0x10];

    /// ESC E 1 - Emphasized mode on
    pub const BOLD_ON: &[u8] = &[0x1B, 0x45, 0x01];
    /// ESC E 0 - Emphasized mode off
    pub const BOLD_OFF: &[u8] = &[0x1B, 0x45, 0x00];

    /// GS ! 0x11 - Double width and height
    pub const SIZE_DOUBLE: &[u8] = &[0x1D, 0x21, 0x11];
    /// GS ! 0x01 - Double height only
    pub const SIZE_DOUBLE_HEIGHT: &[u8] = &[0x1D, 0x21, 0x01];
    /// GS ! 0x00 - Normal size
    pub const SIZE_NORMAL: &[u8] = &[0x1D, 0x21, 0x00];

    /// ESC a 0
    pub const ALIGN_LEFT: &[u8] = &[0x1B, 0x61, 0x00];
    /// ESC a 1
    pub const ALIGN_CENTER: &[u8] = &[0x1B, 0x61, 0x01];
    /// ESC a 2
    pub const ALIGN_RIGHT: &[u8] = &[0x1B, 0x61, 0x02];

    /// GS V 0 - Full cut
    pub const CUT_FULL: &[u8] = &[0x1D, 0x56, 0x00];

    pub const LF: u8 = b'\n';
}

/// ESC/POS command builder
///
/// All text is folded to plain Latin and encoded as Windows-1252.
pub struct EscPosBuilder {
    buf: Vec<u8>,
    width: usize,
}

impl EscPosBuilder {
    /// Start a document for a paper `width` columns wide
    ///
    /// Common widths:
    /// - 58mm paper: 32 characters
    /// - 80mm paper: 48 characters
    pub fn new(width: usize) -> Self {
        let mut buf = Vec::with_capacity(1024);
        buf.extend_from_slice(cmd::INIT);
        buf.extend_from_slice(cmd::CODE_PAGE_WPC1252);
        Self { buf, width }
    }

    /// Paper width in columns
    pub fn width(&self) -> usize {
        self.width
    }

    // --- Text ---

    /// Write text (accents folded)
    pub fn text(&mut self, s: &str) -> &mut Self {
        self.buf.extend_from_slice(normalize_text(s).as_bytes());
        self
    }

    /// Write text and end the line
    pub fn line(&mut self, s: &str) -> &mut Self {
        self.text(s);
        self.buf.push(cmd::LF);
        self
    }

    /// End the current line
    pub fn newline(&mut self) -> &mut Self {
        self.buf.push(cmd::LF);
        self
    }

    /// Write several empty lines
    pub fn blank_lines(&mut self, lines: usize) -> &mut Self {
        self.buf.extend(std::iter::repeat_n(cmd::LF, lines));
        self
    }

    // --- Alignment ---

    /// Centered alignment
    pub fn center(&mut self) -> &mut Self {
        self.raw(cmd::ALIGN_CENTER)
    }

    /// Left alignment (printer default)
    pub fn left(&mut self) -> &mut Self {
        self.raw(cmd::ALIGN_LEFT)
    }

    // --- Emphasis and size ---

    /// Emphasis on
    pub fn bold(&mut self) -> &mut Self {
        self.raw(cmd::BOLD_ON)
    }

    /// Emphasis off
    pub fn bold_off(&mut self) -> &mut Self {
        self.raw(cmd::BOLD_OFF)
    }

    /// Double width and double height
    pub fn double_size(&mut self) -> &mut Self {
        self.raw(cmd::SIZE_DOUBLE)
    }

    /// Double height, normal width
    pub fn double_height(&mut self) -> &mut Self {
        self.raw(cmd::SIZE_DOUBLE_HEIGHT)
    }

    /// Back to normal character size
    pub fn reset_size(&mut self) -> &mut Self {
        self.raw(cmd::SIZE_NORMAL)
    }

    /// Full-width dashed rule
    pub fn sep_single(&mut self) -> &mut Self {
        self.line(&"-".repeat(self.width))
    }

    /// Left and right text on one line, padded out to the paper width
    ///
    /// When the two don't fit they are joined by a single space instead.
    pub fn line_lr(&mut self, left: &str, right: &str) -> &mut Self {
        let used = text_width(left) + text_width(right);
        let gap = self.width.checked_sub(used).filter(|g| *g > 0).unwrap_or(1);
        self.text(left).text(&" ".repeat(gap)).line(right)
    }

    /// Full paper cut
    pub fn cut(&mut self) -> &mut Self {
        self.raw(cmd::CUT_FULL)
    }

    // --- Output ---

    /// Append command bytes unchanged
    ///
    /// Bytes >= 0x80 are re-encoded by [`build`](Self::build); only pass
    /// ASCII command sequences here.
    pub fn raw(&mut self, bytes: &[u8]) -> &mut Self {
        self.buf.extend_from_slice(bytes);
        self
    }

    /// Build the final byte buffer with Windows-1252 encoding
    pub fn build(self) -> Vec<u8> {
        convert_to_cp1252(&self.buf)
    }
}

impl Default for EscPosBuilder {
    fn default() -> Self {
        Self::new(32)
    }
}
