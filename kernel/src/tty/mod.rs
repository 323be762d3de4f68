//! Console TTY
//!
//! Terminal line discipline for the system console:
//! - Input ring with read/commit/edit counters ([`buffer`])
//! - Canonical line editing and raw mode ([`line_discipline`])
//! - Blocked-reader bookkeeping ([`gate`])
//! - Blocking read, passthrough write and mode ioctls ([`driver`], [`ioctl`])

pub mod buffer;
pub mod driver;
pub mod gate;
pub mod ioctl;
pub mod line_discipline;
pub mod output;
pub mod termios;


pub use buffer::{Indices, InputBuffer};
pub use driver::Console;
pub use line_discipline::{Input, LineDiscipline};
pub use output::OutputSink;
pub use termios::{ConsoleConfig, ControlChars, ModeConfig};
