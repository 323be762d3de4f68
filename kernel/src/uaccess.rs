//! Userspace buffer access for console I/O
//!
//! Read, write and ioctl calls hand the console a descriptor that is either a
//! kernel slice or an address in a task's address space. Everything that
//! crosses into user memory goes through here so that:
//! - null and kernel-half pointers are rejected before anything is touched
//! - `addr + len` overflow cannot wrap into a valid range
//! - bytes are copied, never aliased

use crate::errno::TtyError;

/// Userspace address range - below the kernel split
/// On x86_64, the canonical address split is at 0x0000_8000_0000_0000
pub const USER_SPACE_END: u64 = 0x0000_8000_0000_0000;

/// Byte-granular view of a task's memory
///
/// Implementations report an unmapped or read-only page by returning
/// `None` / `false`.
pub trait AddressSpace {
    fn read_byte(&self, addr: u64) -> Option<u8>;
    fn write_byte(&mut self, addr: u64, byte: u8) -> bool;
}

/// Validate that `[addr, addr + len)` lies entirely in userspace
///
/// # Validation Checks
/// 1. Pointer is not null
/// 2. Pointer is within userspace address range
/// 3. Pointer + len doesn't overflow or cross into kernel space
pub fn validate_user_range(addr: u64, len: usize) -> Result<(), TtyError> {
    if addr == 0 || addr >= USER_SPACE_END {
        return Err(TtyError::CopyFault);
    }

    let end = u64::try_from(len)
        .ok()
        .and_then(|len| addr.checked_add(len));
    match end {
        Some(end) if end <= USER_SPACE_END => Ok(()),
        _ => Err(TtyError::CopyFault),
    }
}

/// Copy `src` into user memory at `addr`
pub fn copy_to_user(space: &mut dyn AddressSpace, addr: u64, src: &[u8]) -> Result<(), TtyError> {
    validate_user_range(addr, src.len())?;

    for (a, &byte) in (addr..).zip(src) {
        if !space.write_byte(a, byte) {
            return Err(TtyError::CopyFault);
        }
    }
    Ok(())
}

/// Copy user memory at `addr` into `dst`
pub fn copy_from_user(space: &dyn AddressSpace, addr: u64, dst: &mut [u8]) -> Result<(), TtyError> {
    validate_user_range(addr, dst.len())?;

    for (a, slot) in (addr..).zip(dst.iter_mut()) {
        *slot = space.read_byte(a).ok_or(TtyError::CopyFault)?;
    }
    Ok(())
}

/// Where a console read delivers its bytes
pub enum Destination<'a> {
    /// Kernel-owned buffer
    Kernel(&'a mut [u8]),
    /// Buffer in a task's address space starting at `addr`
    User {
        space: &'a mut dyn AddressSpace,
        addr: u64,
    },
}

impl Destination<'_> {
    /// Store one byte at `offset` from the start of the destination
    pub fn put(&mut self, offset: usize, byte: u8) -> Result<(), TtyError> {
        match self {
            Destination::Kernel(buf) => {
                let slot = buf.get_mut(offset).ok_or(TtyError::CopyFault)?;
                *slot = byte;
                Ok(())
            }
            Destination::User { space, addr } => {
                let at = user_offset(*addr, offset)?;
                copy_to_user(&mut **space, at, &[byte])
            }
        }
    }
}

/// Where a console write takes its bytes from
pub enum Source<'a> {
    Kernel(&'a [u8]),
    User {
        space: &'a dyn AddressSpace,
        addr: u64,
    },
}

impl Source<'_> {
    /// Fetch the byte at `offset` from the start of the source
    pub fn get(&self, offset: usize) -> Result<u8, TtyError> {
        match self {
            Source::Kernel(buf) => buf.get(offset).copied().ok_or(TtyError::CopyFault),
            Source::User { space, addr } => {
                let mut byte = [0u8; 1];
                copy_from_user(*space, user_offset(*addr, offset)?, &mut byte)?;
                Ok(byte[0])
            }
        }
    }
}

/// Argument block of a control request
///
/// The request code decides the direction: a GET copies out of the
/// console into the block, a SET copies the block in.
pub enum ControlArg<'a> {
    Kernel(&'a mut [u8]),
    User {
        space: &'a mut dyn AddressSpace,
        addr: u64,
    },
}

impl ControlArg<'_> {
    /// Copy `src` out to the argument block
    pub fn copy_out(&mut self, src: &[u8]) -> Result<(), TtyError> {
        match self {
            ControlArg::Kernel(buf) => {
                let dst = buf.get_mut(..src.len()).ok_or(TtyError::CopyFault)?;
                dst.copy_from_slice(src);
                Ok(())
            }
            ControlArg::User { space, addr } => copy_to_user(&mut **space, *addr, src),
        }
    }

    /// Fill `dst` from the argument block
    pub fn copy_in(&self, dst: &mut [u8]) -> Result<(), TtyError> {
        match self {
            ControlArg::Kernel(buf) => {
                let src = buf.get(..dst.len()).ok_or(TtyError::CopyFault)?;
                dst.copy_from_slice(src);
                Ok(())
            }
            ControlArg::User { space, addr } => copy_from_user(&**space, *addr, dst),
        }
    }
}

fn user_offset(addr: u64, offset: usize) -> Result<u64, TtyError> {
    u64::try_from(offset)
        .ok()
        .and_then(|off| addr.checked_add(off))
        .ok_or(TtyError::CopyFault)
}
