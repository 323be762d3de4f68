//! Console line discipline for a small kernel
//!
//! The receive interrupt feeds characters to [`tty::Console`], which edits
//! them into lines (or passes them straight through in raw mode), echoes
//! them, and hands them to tasks blocked in `read`. Scheduling, process
//! listing and user memory are reached through traits so the kernel can plug
//! in its own.

#![cfg_attr(not(test), no_std)]

extern crate alloc;

pub mod errno;
pub mod logger;
pub mod task;
pub mod tty;
pub mod uaccess;

#[cfg(test)]
pub(crate) mod testing;

pub use errno::TtyError;
pub use tty::{Console, ConsoleConfig, ModeConfig};
