//! Thread-safe sinks for access and error log lines.
//!
//! Lines go to the console by default and to an append-mode file when
//! one is configured. A process-wide [`LogWriter`] is installed once at
//! startup and shared by every connection task.

use std::fs::{File, OpenOptions};
use std::io::{self, ErrorKind, Write};
use std::path::Path;
use std::sync::{Mutex, OnceLock};

static WRITER: OnceLock<LogWriter> = OnceLock::new();

/// Where a stream of log lines ends up.
enum LogTarget {
    Stdout,
    Stderr,
    File(Mutex<File>),
}

impl LogTarget {
    /// Open `path` for appending, or fall back to the given console stream.
    fn file_or(path: Option<&str>, console: Self) -> io::Result<Self> {
        match path {
            Some(p) => Ok(Self::File(Mutex::new(open_append(p)?))),
            None => Ok(console),
        }
    }

    fn write_line(&self, line: &str) {
        match self {
            Self::Stdout => println!("{line}"),
            Self::Stderr => eprintln!("{line}"),
            Self::File(file) => {
                // Skip the line if a previous writer panicked mid-write.
                if let Ok(mut f) = file.lock() {
                    let _ = writeln!(f, "{line}");
                }
            }
        }
    }
}

/// Pair of sinks shared by all request handlers.
pub struct LogWriter {
    /// Access lines and startup messages.
    access: LogTarget,
    /// Warnings and errors.
    error: LogTarget,
}

impl LogWriter {
    pub fn write_access(&self, message: &str) {
        self.access.write_line(message);
    }

    pub fn write_error(&self, message: &str) {
        self.error.write_line(message);
    }

    /// Informational messages share the access sink.
    pub fn write_info(&self, message: &str) {
        self.access.write_line(message);
    }
}

/// Open `path` in append mode, creating missing parent directories.
fn open_append(path: &str) -> io::Result<File> {
    if let Some(parent) = Path::new(path).parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }
    OpenOptions::new().create(true).append(true).open(path)
}

/// Install the process-wide writer.
///
/// Fails if a configured log file cannot be opened or if a writer is
/// already installed.
pub fn init(access_log_file: Option<&str>, error_log_file: Option<&str>) -> io::Result<()> {
    let writer = LogWriter {
        access: LogTarget::file_or(access_log_file, LogTarget::Stdout)?,
        error: LogTarget::file_or(error_log_file, LogTarget::Stderr)?,
    };
    WRITER
        .set(writer)
        .map_err(|_| io::Error::new(ErrorKind::AlreadyExists, "log writer already installed"))
}

/// The installed writer, or `None` before [`init`] has run.
pub fn try_get() -> Option<&'static LogWriter> {
    WRITER.get()
}
