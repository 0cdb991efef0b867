//! Non-blocking logger front end.
//!
//! A [`Logger`] only formats and enqueues; the writer thread spawned at
//! construction does the I/O. Clones and [`Logger::for_component`] children
//! share that thread, so one sink is opened per process no matter how many
//! components log. [`Logger::shutdown`] drains and joins it before exit.

use crate::error::Result;
use crate::log_level::LogLevel;
use crate::log_message::LogMessage;
use crate::log_writer::{LogWriter, WriterCommand, spawn_writer_thread};
use std::path::Path;
use std::sync::mpsc::{Sender, channel};
use std::sync::{Arc, Mutex};
use std::thread::JoinHandle;

/// Thread-safe, non-blocking logger.
///
/// # Examples
///
/// ```no_run
/// use logging::{LogLevel, Logger};
///
/// let logger = Logger::new("degrader.log".as_ref(), LogLevel::Info).unwrap();
/// let codec = logger.for_component("H264");
/// codec.info("encoder opened");
/// logger.shutdown();
/// ```
#[derive(Clone)]
pub struct Logger {
    sender: Sender<WriterCommand>,
    writer: Arc<Mutex<Option<JoinHandle<()>>>>,
    level: LogLevel,
    component: Option<String>,
    console_output: bool,
}

impl Logger {
    /// Creates a logger appending to `log_path`.
    ///
    /// # Errors
    ///
    /// Returns error if the log file cannot be created or opened.
    pub fn new(log_path: &Path, level: LogLevel) -> Result<Self> {
        Ok(Self::spawn(LogWriter::to_file(log_path)?, level, None, false))
    }

    /// Creates a file logger tagged with `component`, optionally echoing every
    /// record to stderr as well.
    ///
    /// # Errors
    ///
    /// Returns error if the log file cannot be created or opened.
    pub fn with_component(
        log_path: &Path,
        level: LogLevel,
        component: &str,
        console_output: bool,
    ) -> Result<Self> {
        let writer = LogWriter::to_file(log_path)?;
        Ok(Self::spawn(
            writer,
            level,
            Some(component.to_string()),
            console_output,
        ))
    }

    /// Creates a logger whose only sink is stderr.
    pub fn stderr(level: LogLevel, component: &str) -> Self {
        Self::spawn(
            LogWriter::to_stderr(),
            level,
            Some(component.to_string()),
            false,
        )
    }

    fn spawn(
        writer: LogWriter,
        level: LogLevel,
        component: Option<String>,
        console_output: bool,
    ) -> Self {
        let (sender, receiver) = channel();
        let handle = spawn_writer_thread(writer, receiver);
        Logger {
            sender,
            writer: Arc::new(Mutex::new(Some(handle))),
            level,
            component,
            console_output,
        }
    }

    /// Derives a logger for another component sharing this logger's sink,
    /// level and console setting.
    pub fn for_component(&self, component: &str) -> Self {
        Logger {
            sender: self.sender.clone(),
            writer: Arc::clone(&self.writer),
            level: self.level,
            component: Some(component.to_string()),
            console_output: self.console_output,
        }
    }

    /// Writes every record queued so far, then stops the writer thread and
    /// waits for it.
    ///
    /// Affects every clone and child sharing this sink. Records logged
    /// afterwards are dropped. Calling it twice is a no-op.
    pub fn shutdown(&self) {
        let handle = match self.writer.lock() {
            Ok(mut writer) => writer.take(),
            Err(poisoned) => poisoned.into_inner().take(),
        };
        if let Some(handle) = handle {
            let _ = self.sender.send(WriterCommand::Close);
            if handle.join().is_err() {
                eprintln!("Log writer thread panicked");
            }
        }
    }

    /// Minimum level this logger records.
    pub fn level(&self) -> LogLevel {
        self.level
    }

    /// Returns true when a record at `level` would be written.
    pub fn enabled(&self, level: LogLevel) -> bool {
        level >= self.level
    }

    pub fn debug(&self, message: &str) {
        self.log(LogLevel::Debug, message);
    }

    pub fn info(&self, message: &str) {
        self.log(LogLevel::Info, message);
    }

    pub fn warn(&self, message: &str) {
        self.log(LogLevel::Warn, message);
    }

    pub fn error(&self, message: &str) {
        self.log(LogLevel::Error, message);
    }

    fn log(&self, level: LogLevel, message: &str) {
        if !self.enabled(level) {
            return;
        }
        let msg = LogMessage::new(level, self.component.clone(), message.to_string());

        if self.console_output {
            eprint!("{}", msg.format());
        }

        // Fails only after shutdown, when the writer is gone.
        let _ = self.sender.send(WriterCommand::Write(msg));
    }
}
