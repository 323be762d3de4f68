//! Console ioctl request codes and handlers
//!
//! Only the mode pair is exposed:
//! - TCGETS: copy the current [`ModeConfig`] out to the caller
//! - TCSETS: copy a [`ModeConfig`] in and apply it immediately
//!
//! The argument block is the two-byte wire form of `ModeConfig`
//! (`[echo, canonical]`).

use super::driver::Console;
use super::termios::ModeConfig;
use crate::errno::TtyError;
use crate::uaccess::ControlArg;

// =============================================================================
// ioctl Request Codes (matching Linux values)
// =============================================================================

/// Get console mode
pub const TCGETS: u64 = 0x5401;

/// Set console mode immediately
pub const TCSETS: u64 = 0x5402;

// =============================================================================
// ioctl Handler Functions
// =============================================================================

/// Handle TCGETS - copy the current mode to the argument block
pub fn handle_tcgets<const N: usize>(
    tty: &Console<N>,
    arg: &mut ControlArg<'_>,
) -> Result<(), TtyError> {
    let mode = tty.mode();
    arg.copy_out(&mode.to_bytes())
}

/// Handle TCSETS - apply the mode in the argument block
///
/// Nothing changes if the block cannot be read.
pub fn handle_tcsets<const N: usize>(
    tty: &Console<N>,
    arg: &mut ControlArg<'_>,
) -> Result<(), TtyError> {
    let mut wire = [0u8; ModeConfig::WIRE_SIZE];
    arg.copy_in(&mut wire)?;

    let mode = ModeConfig::from_bytes(wire);
    tty.set_mode(mode);
    Ok(())
}

/// Main ioctl dispatcher for the console
pub fn tty_ioctl<const N: usize>(
    tty: &Console<N>,
    request: u64,
    mut arg: ControlArg<'_>,
) -> Result<(), TtyError> {
    match request {
        TCGETS => handle_tcgets(tty, &mut arg),
        TCSETS => handle_tcsets(tty, &mut arg),
        _ => {
            log::warn!("console: unknown ioctl request {:#x}", request);
            Err(TtyError::InvalidRequest)
        }
    }
}
