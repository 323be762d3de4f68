//! Console output sink
//!
//! The line discipline echoes and erases through this trait; the driver's
//! write path uses it for raw passthrough. Serial transmission itself lives
//! behind the implementation.

use super::termios::BACKSPACE;

pub trait OutputSink: Send + Sync {
    /// Transmit one byte
    fn emit(&self, c: u8);

    /// Visually erase the glyph left of the cursor: BS, space, BS
    fn erase(&self) {
        self.emit(BACKSPACE);
        self.emit(b' ');
        self.emit(BACKSPACE);
    }
}
