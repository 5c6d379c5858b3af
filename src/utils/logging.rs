// src/utils/logging.rs

//! Logger setup with server-style formatting.
//!
//! Every record is written as `[YYYY-mm-dd HH:MM:SS] [LEVEL] message` to
//! stdout and, when configured, appended to a log file.

use std::fmt::Display;
use std::fs::{self, File, OpenOptions};
use std::io::{self, Write};
use std::path::Path;

use chrono::Local;
use env_logger::{Builder, Env, Target};

use crate::error::{AppError, Result};

/// Writer duplicating output to the console and an optional file.
///
/// The file is written first; a failing console never costs the file a line.
struct TeeWriter {
    console: Box<dyn Write + Send>,
    file: Option<File>,
}

impl TeeWriter {
    fn stdout(file: Option<File>) -> Self {
        Self {
            console: Box::new(io::stdout()),
            file,
        }
    }
}

impl Write for TeeWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let file_result = match self.file.as_mut() {
            Some(file) => file.write_all(buf),
            None => Ok(()),
        };
        let console_result = self.console.write_all(buf);
        file_result.and(console_result)?;
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        let file_result = match self.file.as_mut() {
            Some(file) => file.flush(),
            None => Ok(()),
        };
        let console_result = self.console.flush();
        file_result.and(console_result)
    }
}

/// Format one log line.
fn format_line(timestamp: impl Display, level: log::Level, message: impl Display) -> String {
    format!("[{}] [{}] {}", timestamp, level, message)
}

fn open_append(path: &Path) -> io::Result<File> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    OpenOptions::new().create(true).append(true).open(path)
}

/// Install the global logger.
///
/// `RUST_LOG` takes precedence over `level`.
pub fn init(level: &str, file: Option<&Path>) -> Result<()> {
    let file = file.map(open_append).transpose()?;

    Builder::from_env(Env::default().default_filter_or(level))
        .format(|buf, record| {
            let timestamp = Local::now().format("%Y-%m-%d %H:%M:%S");
            writeln!(buf, "{}", format_line(timestamp, record.level(), record.args()))
        })
        .target(Target::Pipe(Box::new(TeeWriter::stdout(file))))
        .try_init()
        .map_err(|e| AppError::config(format!("Logger already initialized: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_line() {
        assert_eq!(
            format_line("2026-01-02 07:00:00", log::Level::Warn, "Checking alpha..."),
            "[2026-01-02 07:00:00] [WARN] Checking alpha..."
        );
    }

    #[test]
    fn test_tee_appends_to_file() {
        let tmp = tempfile::TempDir::new().unwrap();
        let path = tmp.path().join("logs/notifier.log");

        let mut first = TeeWriter::stdout(Some(open_append(&path).unwrap()));
        first.write_all(b"one\n").unwrap();
        first.flush().unwrap();

        let mut second = TeeWriter::stdout(Some(open_append(&path).unwrap()));
        second.write_all(b"two\n").unwrap();
        second.flush().unwrap();

        assert_eq!(std::fs::read_to_string(&path).unwrap(), "one\ntwo\n");
    }

    struct ClosedConsole;

    impl Write for ClosedConsole {
        fn write(&mut self, _buf: &[u8]) -> io::Result<usize> {
            Err(io::Error::new(io::ErrorKind::BrokenPipe, "stdout closed"))
        }

        fn flush(&mut self) -> io::Result<()> {
            Err(io::Error::new(io::ErrorKind::BrokenPipe, "stdout closed"))
        }
    }

    #[test]
    fn test_file_keeps_lines_when_console_fails() {
        let tmp = tempfile::TempDir::new().unwrap();
        let path = tmp.path().join("notifier.log");

        let mut writer = TeeWriter {
            console: Box::new(ClosedConsole),
            file: Some(open_append(&path).unwrap()),
        };
        assert!(writer.write_all(b"kept\n").is_err());
        assert!(writer.flush().is_err());

        assert_eq!(std::fs::read_to_string(&path).unwrap(), "kept\n");
    }
}
