//! Kernel logger backed by the console output sink
//!
//! Records logged before the console exists are formatted into a fixed
//! buffer; [`ConsoleLogger::attach`] replays them and switches to writing
//! straight to the sink. Every lock is taken with `try_lock` so logging from
//! the receive interrupt can never deadlock against an interrupted holder.

use alloc::sync::Arc;
use conquer_once::spin::OnceCell;
use core::fmt::{self, Write};
use log::{LevelFilter, Log, Metadata, Record};
use spin::Mutex;

use crate::tty::OutputSink;

const BUFFER_SIZE: usize = 4096;

/// Buffer for storing log messages before the console is attached
struct LogBuffer {
    buffer: [u8; BUFFER_SIZE],
    position: usize,
    /// Records that did not fit
    dropped: usize,
}

impl LogBuffer {
    const fn new() -> Self {
        Self {
            buffer: [0; BUFFER_SIZE],
            position: 0,
            dropped: 0,
        }
    }

    /// Append one formatted record, all or nothing
    fn push_record(&mut self, record: &Record) {
        let start = self.position;
        if write_record(self, record).is_err() {
            self.position = start;
            self.dropped += 1;
        }
    }

    fn contents(&self) -> &[u8] {
        &self.buffer[..self.position]
    }

    fn clear(&mut self) {
        self.position = 0;
        self.dropped = 0;
    }
}

impl Write for LogBuffer {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        let bytes = s.as_bytes();
        let remaining = BUFFER_SIZE - self.position;

        if bytes.len() > remaining {
            return Err(fmt::Error);
        }

        self.buffer[self.position..self.position + bytes.len()].copy_from_slice(bytes);
        self.position += bytes.len();
        Ok(())
    }
}

fn write_record(w: &mut dyn Write, record: &Record) -> fmt::Result {
    writeln!(w, "[{:>5}] {}: {}", record.level(), record.target(), record.args())
}

/// `fmt::Write` adapter over an output sink
struct SinkWriter<'a>(&'a dyn OutputSink);

impl Write for SinkWriter<'_> {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        for &b in s.as_bytes() {
            self.0.emit(b);
        }
        Ok(())
    }
}

/// State of the logger
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LoggerState {
    /// Buffering messages until the console is attached
    Buffering,
    /// Backlog flushed, writing to the sink
    Ready,
}

pub struct ConsoleLogger {
    level: LevelFilter,
    sink: OnceCell<Arc<dyn OutputSink>>,
    buffer: Mutex<LogBuffer>,
    state: Mutex<LoggerState>,
}

impl ConsoleLogger {
    pub const fn new(level: LevelFilter) -> Self {
        ConsoleLogger {
            level,
            sink: OnceCell::uninit(),
            buffer: Mutex::new(LogBuffer::new()),
            state: Mutex::new(LoggerState::Buffering),
        }
    }

    /// Route output to `sink`, replaying anything buffered so far
    ///
    /// Only the first call has an effect; returns false for later ones.
    pub fn attach(&self, sink: Arc<dyn OutputSink>) -> bool {
        if self.sink.try_init_once(|| sink).is_err() {
            return false;
        }
        let Some(sink) = self.sink.get() else {
            return false;
        };

        let mut state = self.state.lock();
        let mut buffer = self.buffer.lock();

        for &b in buffer.contents() {
            sink.emit(b);
        }
        if buffer.dropped > 0 {
            let mut w = SinkWriter(&**sink);
            let _ = writeln!(w, "[ WARN] logger: {} early records dropped", buffer.dropped);
        }
        buffer.clear();

        *state = LoggerState::Ready;
        true
    }

    fn state(&self) -> Option<LoggerState> {
        self.state.try_lock().map(|state| *state)
    }
}

impl Log for ConsoleLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.level
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }

        match self.state() {
            Some(LoggerState::Buffering) => {
                if let Some(mut buffer) = self.buffer.try_lock() {
                    buffer.push_record(record);
                }
            }
            Some(LoggerState::Ready) => {
                if let Some(sink) = self.sink.get() {
                    let _ = write_record(&mut SinkWriter(&**sink), record);
                }
            }
            // Lock held by attach on another path; drop the record
            None => {}
        }
    }

    fn flush(&self) {}
}

/// Install `logger` as the global logger
pub fn init(logger: &'static ConsoleLogger) -> Result<(), log::SetLoggerError> {
    log::set_logger(logger)?;
    log::set_max_level(logger.level);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::RecordingOutput;
    use log::Level;

    fn log_line(logger: &ConsoleLogger, level: Level, msg: &str) {
        logger.log(
            &Record::builder()
                .level(level)
                .target("console")
                .args(format_args!("{}", msg))
                .build(),
        );
    }

    #[test]
    fn test_records_are_buffered_until_attach() {
        let logger = ConsoleLogger::new(LevelFilter::Debug);
        log_line(&logger, Level::Info, "early");

        let out = Arc::new(RecordingOutput::new());
        assert!(logger.attach(out.clone()));
        assert_eq!(out.take(), b"[ INFO] console: early\n".to_vec());

        log_line(&logger, Level::Warn, "late");
        assert_eq!(out.take(), b"[ WARN] console: late\n".to_vec());
    }

    #[test]
    fn test_level_filter() {
        let logger = ConsoleLogger::new(LevelFilter::Info);
        let out = Arc::new(RecordingOutput::new());
        logger.attach(out.clone());

        log_line(&logger, Level::Debug, "hidden");
        assert!(out.take().is_empty());
    }

    #[test]
    fn test_second_attach_is_ignored() {
        let logger = ConsoleLogger::new(LevelFilter::Info);
        let first = Arc::new(RecordingOutput::new());
        let second = Arc::new(RecordingOutput::new());
        assert!(logger.attach(first.clone()));
        assert!(!logger.attach(second.clone()));

        log_line(&logger, Level::Error, "x");
        assert!(!first.take().is_empty());
        assert!(second.take().is_empty());
    }

    #[test]
    fn test_overflow_drops_whole_records() {
        let logger = ConsoleLogger::new(LevelFilter::Info);
        let long = "x".repeat(BUFFER_SIZE);
        log_line(&logger, Level::Info, "kept");
        log_line(&logger, Level::Info, &long);

        let out = Arc::new(RecordingOutput::new());
        logger.attach(out.clone());
        let text = String::from_utf8(out.take()).unwrap();
        assert!(text.starts_with("[ INFO] console: kept\n"));
        assert!(text.contains("1 early records dropped"));
        assert!(!text.contains("xxx"));
    }
}
