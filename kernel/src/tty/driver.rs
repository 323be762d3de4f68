//! Console TTY Driver
//!
//! Ties the line discipline to its collaborators:
//!
//! - Input characters from the receive interrupt
//! - Blocking reads on behalf of user tasks
//! - Raw output passthrough for writes
//! - Mode get/set through the control (ioctl) interface
//!
//! One `spin::Mutex` guards the line discipline (mode flags, input ring and
//! the parked-reader count). The input path holds it for a bounded amount of
//! work and never parks; readers are the only callers that sleep, and they
//! always drop the lock first.

use alloc::sync::Arc;
use spin::Mutex;

use super::buffer::Indices;
use super::gate::SyncGate;
use super::line_discipline::{Input, LineDiscipline};
use super::output::OutputSink;
use super::termios::{ConsoleConfig, ModeConfig, INPUT_BUF_SIZE};
use crate::errno::TtyError;
use crate::task::{ProcessDump, Scheduler};
use crate::uaccess::{ControlArg, Destination, Source};

/// The console device
///
/// Built once by the kernel and shared by reference (usually in an `Arc`)
/// between the receive interrupt handler and the read/write/ioctl paths.
pub struct Console<const N: usize = INPUT_BUF_SIZE> {
    /// Line discipline for input processing
    ldisc: Mutex<LineDiscipline<N>>,

    /// Readers parked waiting for input
    gate: SyncGate,

    output: Arc<dyn OutputSink>,
    sched: Arc<dyn Scheduler>,
    procs: Option<Arc<dyn ProcessDump>>,
}

impl<const N: usize> Console<N> {
    /// Create a console with default mode and control characters
    pub fn new(output: Arc<dyn OutputSink>, sched: Arc<dyn Scheduler>) -> Self {
        Self::with_config(ConsoleConfig::default(), output, sched)
    }

    pub fn with_config(
        config: ConsoleConfig,
        output: Arc<dyn OutputSink>,
        sched: Arc<dyn Scheduler>,
    ) -> Self {
        log::info!(
            "console: {} byte input buffer, echo={} canonical={}",
            N,
            config.mode.echo,
            config.mode.canonical
        );
        Self {
            ldisc: Mutex::new(LineDiscipline::with_config(config)),
            gate: SyncGate::new(),
            output,
            sched,
            procs: None,
        }
    }

    /// Attach the process table used for the Ctrl+P dump
    pub fn with_process_dump(mut self, procs: Arc<dyn ProcessDump>) -> Self {
        self.procs = Some(procs);
        self
    }

    /// Process an input character from the receive interrupt
    ///
    /// Spins on the console lock for a bounded critical section, never
    /// parks and never allocates.
    pub fn on_byte_received(&self, c: u8) {
        let action = self.ldisc.lock().input_char(c, &*self.output);
        self.finish_input(action);
    }

    /// Process an input character without spinning on the console lock
    ///
    /// For an interrupt that may have preempted a holder of the lock.
    /// Returns false, with nothing consumed, if the lock was busy.
    pub fn try_on_byte_received(&self, c: u8) -> bool {
        let action = match self.ldisc.try_lock() {
            Some(mut ldisc) => ldisc.input_char(c, &*self.output),
            None => return false,
        };
        self.finish_input(action);
        true
    }

    /// Follow-up work once the console lock has been released
    fn finish_input(&self, action: Input) {
        match action {
            Input::Committed => {
                self.gate.wake_all(&*self.sched);
            }
            Input::Dump => match &self.procs {
                Some(procs) => procs.procdump(),
                None => {
                    log::debug!("console: process dump requested but no process table attached")
                }
            },
            Input::Ignored | Input::Edited | Input::Dropped | Input::Buffered => {}
        }
    }

    /// Read from the console
    ///
    /// Blocks until input is committed. In canonical mode returns after a
    /// newline, at `count` bytes, or at an end-of-file character (which is
    /// consumed only when it is the first byte of the call, yielding 0). In
    /// raw mode returns after exactly `count` bytes.
    ///
    /// # Returns
    /// * `Ok(n)` - Number of bytes delivered (0 indicates EOF in canonical mode)
    /// * `Err(Cancelled)` - The task was killed while waiting
    /// * `Err(CopyFault)` - The first byte could not be copied out
    pub fn read(&self, mut dst: Destination<'_>, count: usize) -> Result<usize, TtyError> {
        let me = self.sched.current_thread_id();
        let mut ldisc = self.ldisc.lock();
        let mut done = 0;

        while done < count {
            while !ldisc.has_data() {
                if self.sched.is_killed(me) {
                    log::debug!("console: read by thread {} cancelled after {} bytes", me, done);
                    return Err(TtyError::Cancelled);
                }

                ldisc.reader_parked();
                self.gate.register(me);
                drop(ldisc);

                self.sched.block_current();

                ldisc = self.ldisc.lock();
                self.gate.unregister(me);
                ldisc.reader_resumed();
            }

            let c = ldisc.take_one();
            let canonical = ldisc.mode().canonical;

            if canonical && c == ldisc.chars().eof {
                if done > 0 {
                    // Save ^D for next time, so the caller gets a 0-byte result
                    ldisc.unread();
                }
                break;
            }

            if let Err(e) = dst.put(done, c) {
                ldisc.unread();
                if done == 0 {
                    return Err(e);
                }
                break;
            }
            done += 1;

            if canonical && c == b'\n' {
                break;
            }
        }

        Ok(done)
    }

    /// Write to the console
    ///
    /// Passes bytes straight to the output sink, stopping at the first byte
    /// that cannot be fetched. Returns the number of bytes written.
    pub fn write(&self, src: Source<'_>, count: usize) -> usize {
        for i in 0..count {
            match src.get(i) {
                Ok(c) => self.output.emit(c),
                Err(_) => return i,
            }
        }
        count
    }

    /// Handle a control request (see [`super::ioctl`])
    pub fn control(&self, request: u64, arg: ControlArg<'_>) -> Result<(), TtyError> {
        super::ioctl::tty_ioctl(self, request, arg)
    }

    /// Get the current mode
    pub fn mode(&self) -> ModeConfig {
        self.ldisc.lock().mode()
    }

    /// Replace the mode; takes effect from the next input character
    pub fn set_mode(&self, mode: ModeConfig) {
        self.ldisc.lock().set_mode(mode);
        log::debug!("console: mode set to echo={} canonical={}", mode.echo, mode.canonical);
    }

    /// Check if a read would return without parking
    pub fn has_data(&self) -> bool {
        self.ldisc.lock().has_data()
    }

    /// Committed bytes not yet read
    pub fn bytes_available(&self) -> usize {
        self.ldisc.lock().bytes_available()
    }

    /// Discard all pending input, including a partially typed line
    pub fn flush_input(&self) {
        self.ldisc.lock().flush_input();
    }

    /// Readers currently parked on the console
    pub fn waiting_readers(&self) -> usize {
        self.ldisc.lock().waiting_readers()
    }

    /// Snapshot of the input ring counters
    pub fn indices(&self) -> Indices {
        self.ldisc.lock().indices()
    }

    /// Input buffer capacity in bytes
    pub const fn capacity(&self) -> usize {
        N
    }
}
