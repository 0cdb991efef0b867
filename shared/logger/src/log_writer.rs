//! Writer thread draining log records into a sink.

use crate::error::Result;
use crate::log_message::LogMessage;
use std::fs::OpenOptions;
use std::io::{self, Write};
use std::path::Path;
use std::sync::mpsc::Receiver;
use std::thread::JoinHandle;

/// What the writer thread receives over its channel.
pub(crate) enum WriterCommand {
    Write(LogMessage),
    /// Stop after everything queued ahead of it has been written.
    Close,
}

/// Owns the log destination; lives on its own thread.
pub(crate) struct LogWriter {
    sink: Box<dyn Write + Send>,
}

impl LogWriter {
    /// Opens (or creates) `log_path` in append mode.
    pub fn to_file(log_path: &Path) -> Result<Self> {
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(log_path)?;
        Ok(Self {
            sink: Box::new(file),
        })
    }

    /// Writes to the process's standard error.
    pub fn to_stderr() -> Self {
        Self {
            sink: Box::new(io::stderr()),
        }
    }

    fn write_message(&mut self, message: &LogMessage) {
        if let Err(e) = self.sink.write_all(message.format().as_bytes()) {
            eprintln!("Error writing log: {}", e);
            return;
        }
        if let Err(e) = self.sink.flush() {
            eprintln!("Error flushing log: {}", e);
        }
    }

    /// Runs until a [`WriterCommand::Close`] arrives or every sender has
    /// been dropped.
    pub fn run(mut self, receiver: Receiver<WriterCommand>) {
        for command in receiver {
            match command {
                WriterCommand::Write(message) => self.write_message(&message),
                WriterCommand::Close => break,
            }
        }
    }
}

/// Moves `writer` onto a dedicated thread.
pub(crate) fn spawn_writer_thread(
    writer: LogWriter,
    receiver: Receiver<WriterCommand>,
) -> JoinHandle<()> {
    std::thread::spawn(move || writer.run(receiver))
}
