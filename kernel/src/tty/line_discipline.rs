//! Console Line Discipline
//!
//! Everything here runs with the console lock held. The line discipline owns
//! the input ring and the mode flags and decides, per received character:
//!
//! - **Canonical mode**: erase, kill and process-dump keys are interpreted;
//!   other characters are buffered and committed at end of line
//! - **Raw mode**: every character is committed as soon as it is stored
//! - **Echo**: accepted characters are mirrored to the output sink
//!
//! Commit policy in canonical mode: a character is committed when it ends a
//! line (newline or EOF), when it fills the ring, or when a reader is already
//! parked waiting for input. In the last case a waiting reader sees a partial
//! line as it is typed and erase can only reach what it has not taken yet.

use super::buffer::{Indices, InputBuffer};
use super::output::OutputSink;
use super::termios::{ConsoleConfig, ControlChars, ModeConfig, INPUT_BUF_SIZE};

/// What the line discipline did with one input character
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Input {
    /// NUL: no character
    Ignored,
    /// Consumed by erase or kill
    Edited,
    /// Process-dump key; the caller runs the dump
    Dump,
    /// Ring full, character discarded
    Dropped,
    /// Stored in the edit region, not yet visible to readers
    Buffered,
    /// Stored and committed; blocked readers must be woken
    Committed,
}

/// Line discipline for the console
pub struct LineDiscipline<const N: usize = INPUT_BUF_SIZE> {
    mode: ModeConfig,
    chars: ControlChars,
    buffer: InputBuffer<N>,
    /// Readers currently parked on this console
    waiters: usize,
}

impl<const N: usize> LineDiscipline<N> {
    /// Create a line discipline with default settings
    pub fn new() -> Self {
        Self::with_config(ConsoleConfig::default())
    }

    pub fn with_config(config: ConsoleConfig) -> Self {
        Self {
            mode: config.mode,
            chars: config.chars,
            buffer: InputBuffer::new(),
            waiters: 0,
        }
    }

    pub fn mode(&self) -> ModeConfig {
        self.mode
    }

    /// Switch modes; applies from the next input character
    pub fn set_mode(&mut self, mode: ModeConfig) {
        self.mode = mode;
    }

    pub fn chars(&self) -> &ControlChars {
        &self.chars
    }

    /// Process an input character
    ///
    /// This is the main entry point for input processing. Bounded work, no
    /// allocation, never blocks.
    pub fn input_char(&mut self, c: u8, out: &dyn OutputSink) -> Input {
        if c == 0 {
            return Input::Ignored;
        }
        let c = if c == b'\r' { b'\n' } else { c };

        if self.mode.canonical {
            if let Some(action) = self.edit(c, out) {
                return action;
            }
        }

        if !self.buffer.append(c) {
            log::debug!("console: input buffer full, dropping byte {:#04x}", c);
            return Input::Dropped;
        }

        if self.mode.echo {
            out.emit(c);
        }

        if self.should_commit(c) {
            self.buffer.commit();
            Input::Committed
        } else {
            Input::Buffered
        }
    }

    /// Interpret canonical-mode editing keys; `None` means "not an edit key"
    fn edit(&mut self, c: u8, out: &dyn OutputSink) -> Option<Input> {
        if self.chars.is_erase(c) {
            self.handle_erase(out);
            Some(Input::Edited)
        } else if c == self.chars.kill {
            self.handle_kill(out);
            Some(Input::Edited)
        } else if c == self.chars.dump {
            Some(Input::Dump)
        } else {
            None
        }
    }

    /// Handle ERASE character (backspace/DEL)
    fn handle_erase(&mut self, out: &dyn OutputSink) {
        if self.buffer.erase_last() {
            out.erase();
        }
    }

    /// Handle KILL character (Ctrl+U) - erase the current line
    fn handle_kill(&mut self, out: &dyn OutputSink) {
        for _ in 0..self.buffer.kill_line() {
            out.erase();
        }
    }

    fn should_commit(&self, c: u8) -> bool {
        !self.mode.canonical
            || c == b'\n'
            || c == self.chars.eof
            || self.buffer.is_full()
            || self.waiters > 0
    }

    /// Whether a reader would find a byte without parking
    pub fn has_data(&self) -> bool {
        self.buffer.has_committed()
    }

    /// Get the number of committed bytes not yet read
    pub fn bytes_available(&self) -> usize {
        self.buffer.committed_len()
    }

    /// Take the next committed byte; check [`has_data`](Self::has_data) first
    pub fn take_one(&mut self) -> u8 {
        self.buffer.take_one()
    }

    /// Give back the byte just taken
    pub fn unread(&mut self) {
        self.buffer.unread();
    }

    /// Discard all input, including a partially typed line
    pub fn flush_input(&mut self) {
        self.buffer.clear();
    }

    /// A reader is about to park on this console
    pub fn reader_parked(&mut self) {
        self.waiters += 1;
    }

    /// A parked reader is running again
    pub fn reader_resumed(&mut self) {
        self.waiters = self.waiters.saturating_sub(1);
    }

    pub fn waiting_readers(&self) -> usize {
        self.waiters
    }

    pub fn indices(&self) -> Indices {
        self.buffer.indices()
    }

    pub fn capacity(&self) -> usize {
        self.buffer.capacity()
    }
}

impl<const N: usize> Default for LineDiscipline<N> {
    fn default() -> Self {
        Self::new()
    }
}
