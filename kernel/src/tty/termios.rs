//! Console mode flags and control characters
//!
//! The console only honours two local modes, echo and canonical input, so
//! they are kept as named booleans rather than a termios flag word. The
//! special input bytes live in [`ControlChars`] with the usual defaults.

/// Default input buffer capacity in bytes (must be a power of two)
pub const INPUT_BUF_SIZE: usize = 128;

/// Backspace (BS)
pub const BACKSPACE: u8 = 0x08;

/// DEL character
pub const DEL: u8 = 0x7F;

/// Control-key code for an uppercase letter: `ctrl(b'D')` is EOT
pub const fn ctrl(c: u8) -> u8 {
    c - b'@'
}

/// Local modes understood by the console
///
/// `echo` mirrors accepted input to the output sink. `canonical` enables
/// line editing and line-at-a-time reads.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(C)]
pub struct ModeConfig {
    pub echo: bool,
    pub canonical: bool,
}

impl Default for ModeConfig {
    fn default() -> Self {
        Self {
            echo: true,
            canonical: true,
        }
    }
}

impl ModeConfig {
    /// Size of the control-request payload
    pub const WIRE_SIZE: usize = 2;

    /// Raw mode: no echo, no line editing
    pub const fn raw() -> Self {
        Self {
            echo: false,
            canonical: false,
        }
    }

    /// Clear both local modes
    pub fn set_raw(&mut self) {
        *self = Self::raw();
    }

    /// Encode as `[echo, canonical]`
    pub fn to_bytes(self) -> [u8; Self::WIRE_SIZE] {
        [u8::from(self.echo), u8::from(self.canonical)]
    }

    /// Decode from `[echo, canonical]`; any non-zero byte means set
    pub fn from_bytes(bytes: [u8; Self::WIRE_SIZE]) -> Self {
        Self {
            echo: bytes[0] != 0,
            canonical: bytes[1] != 0,
        }
    }
}

/// Special input characters, interpreted in canonical mode only
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ControlChars {
    /// Erase previous character
    pub erase: u8,
    /// Second erase key; keyboards send BS where termios expects DEL
    pub alt_erase: u8,
    /// Erase the current line
    pub kill: u8,
    /// End of file
    pub eof: u8,
    /// Print the process list
    pub dump: u8,
}

impl Default for ControlChars {
    fn default() -> Self {
        Self {
            erase: DEL,
            alt_erase: BACKSPACE,
            kill: ctrl(b'U'),
            eof: ctrl(b'D'),
            dump: ctrl(b'P'),
        }
    }
}

impl ControlChars {
    #[inline]
    pub fn is_erase(&self, c: u8) -> bool {
        c == self.erase || c == self.alt_erase
    }
}

/// Everything a console needs at construction time
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ConsoleConfig {
    pub mode: ModeConfig,
    pub chars: ControlChars,
}
