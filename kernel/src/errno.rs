//! POSIX errno values and the console error type
//!
//! Console entry points return `Result<_, TtyError>`; the syscall layer turns
//! a `TtyError` into a negative errno with [`TtyError::errno`].

use core::fmt;

/// Interrupted system call
pub const EINTR: i32 = 4;

/// Bad address
pub const EFAULT: i32 = 14;

/// Not a typewriter (inappropriate ioctl for device)
pub const ENOTTY: i32 = 25;

/// Errors surfaced by the console driver
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TtyError {
    /// The reader was parked and its task was marked killed
    Cancelled,
    /// Unrecognized control request code
    InvalidRequest,
    /// Copy-in or copy-out against a caller-supplied buffer failed
    CopyFault,
}

impl TtyError {
    /// The errno reported to userspace for this error
    pub const fn errno(self) -> i32 {
        match self {
            TtyError::Cancelled => EINTR,
            TtyError::InvalidRequest => ENOTTY,
            TtyError::CopyFault => EFAULT,
        }
    }
}

impl fmt::Display for TtyError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TtyError::Cancelled => write!(f, "read cancelled: task killed while waiting"),
            TtyError::InvalidRequest => write!(f, "inappropriate ioctl for device"),
            TtyError::CopyFault => write!(f, "bad address"),
        }
    }
}
