//! Rolling Logger
//!
//! Daily rolling log files plus an in-memory ring buffer of recent lines.
//! `log` records are bridged into `tracing` and written through a
//! `tracing-subscriber` fmt layer.

use std::collections::VecDeque;
use std::fs::{self, File, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, OnceLock};

use chrono::NaiveDate;
use tracing::Level;

/// Number of daily files kept in the log directory
pub const DEFAULT_MAX_FILES: usize = 7;

/// Number of lines kept in memory
pub const DEFAULT_BUFFER_LINES: usize = 500;

static LOGGER: OnceLock<RollingWriter> = OnceLock::new();

/// Logger errors
#[derive(Debug)]
pub enum LoggerError {
    Io(io::Error),
    AlreadyInitialized,
    NotInitialized,
}

impl std::fmt::Display for LoggerError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LoggerError::Io(e) => write!(f, "Log io error: {}", e),
            LoggerError::AlreadyInitialized => write!(f, "Logger already initialized"),
            LoggerError::NotInitialized => write!(f, "Logger not initialized"),
        }
    }
}

impl std::error::Error for LoggerError {}

impl From<io::Error> for LoggerError {
    fn from(e: io::Error) -> Self {
        LoggerError::Io(e)
    }
}

/// Rolling settings
#[derive(Debug, Clone, Copy)]
pub struct RollingConfig {
    pub max_files: usize,
    pub buffer_lines: usize,
}

impl Default for RollingConfig {
    fn default() -> Self {
        Self {
            max_files: DEFAULT_MAX_FILES,
            buffer_lines: DEFAULT_BUFFER_LINES,
        }
    }
}

struct Inner {
    dir: PathBuf,
    app_name: String,
    config: RollingConfig,
    current_date: Option<NaiveDate>,
    file: Option<File>,
    buffer: VecDeque<String>,
    partial: String,
}

/// Writer shared by every fmt layer handle
#[derive(Clone)]
pub struct RollingWriter {
    inner: Arc<Mutex<Inner>>,
}

impl RollingWriter {
    pub fn new(dir: impl AsRef<Path>, app_name: &str, config: RollingConfig) -> Result<Self, LoggerError> {
        let dir = dir.as_ref().to_path_buf();
        fs::create_dir_all(&dir)?;

        Ok(Self {
            inner: Arc::new(Mutex::new(Inner {
                dir,
                app_name: app_name.to_string(),
                config,
                current_date: None,
                file: None,
                buffer: VecDeque::with_capacity(config.buffer_lines),
                partial: String::new(),
            })),
        })
    }

    /// Path of the log file for a given day
    pub fn file_path(&self, date: NaiveDate) -> PathBuf {
        let inner = self.lock();
        log_file_path(&inner.dir, &inner.app_name, date)
    }

    /// Write bytes as if it were `date`, rolling the file when the day changes
    pub fn write_at(&self, date: NaiveDate, buf: &[u8]) -> io::Result<usize> {
        let mut inner = self.lock();

        if inner.current_date != Some(date) || inner.file.is_none() {
            let path = log_file_path(&inner.dir, &inner.app_name, date);
            let file = OpenOptions::new().create(true).append(true).open(path)?;
            inner.file = Some(file);
            inner.current_date = Some(date);
            prune_old_files(&inner.dir, &inner.app_name, inner.config.max_files)?;
        }

        if let Some(file) = inner.file.as_mut() {
            file.write_all(buf)?;
        }

        inner.partial.push_str(&String::from_utf8_lossy(buf));
        while let Some(idx) = inner.partial.find('\n') {
            let line: String = inner.partial.drain(..=idx).collect();
            let line = line.trim_end().to_string();
            if inner.buffer.len() == inner.config.buffer_lines {
                inner.buffer.pop_front();
            }
            if inner.config.buffer_lines > 0 {
                inner.buffer.push_back(line);
            }
        }

        Ok(buf.len())
    }

    /// Most recent lines, oldest first
    pub fn recent_lines(&self) -> Vec<String> {
        self.lock().buffer.iter().cloned().collect()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl Write for RollingWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.write_at(chrono::Local::now().date_naive(), buf)
    }

    fn flush(&mut self) -> io::Result<()> {
        let mut inner = self.lock();
        match inner.file.as_mut() {
            Some(file) => file.flush(),
            None => Ok(()),
        }
    }
}

fn log_file_path(dir: &Path, app_name: &str, date: NaiveDate) -> PathBuf {
    dir.join(format!("{}.{}.log", app_name, date.format("%Y-%m-%d")))
}

fn prune_old_files(dir: &Path, app_name: &str, max_files: usize) -> io::Result<()> {
    let prefix = format!("{}.", app_name);
    let mut files: Vec<PathBuf> = fs::read_dir(dir)?
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|path| {
            path.file_name()
                .and_then(|n| n.to_str())
                .map(|n| n.starts_with(&prefix) && n.ends_with(".log"))
                .unwrap_or(false)
        })
        .collect();

    if files.len() <= max_files {
        return Ok(());
    }

    // Date-stamped names sort chronologically
    files.sort();
    let excess = files.len() - max_files;
    for path in files.into_iter().take(excess) {
        fs::remove_file(path)?;
    }
    Ok(())
}

/// Initialize the global logger writing into `log_dir`
pub fn init_logger(log_dir: impl AsRef<Path>, app_name: &str) -> Result<(), LoggerError> {
    init_logger_with(log_dir, app_name, RollingConfig::default())
}

pub fn init_logger_with(log_dir: impl AsRef<Path>, app_name: &str, config: RollingConfig) -> Result<(), LoggerError> {
    if LOGGER.get().is_some() {
        return Err(LoggerError::AlreadyInitialized);
    }

    let writer = RollingWriter::new(log_dir, app_name, config)?;
    let layer_writer = writer.clone();

    tracing_subscriber::fmt()
        .with_max_level(Level::DEBUG)
        .with_ansi(false)
        .with_target(true)
        .with_writer(move || layer_writer.clone())
        .try_init()
        .map_err(|_| LoggerError::AlreadyInitialized)?;

    LOGGER
        .set(writer)
        .map_err(|_| LoggerError::AlreadyInitialized)?;

    log::info!("{} logger initialized", app_name);
    Ok(())
}

/// Recent lines from the global logger
pub fn recent_lines() -> Vec<String> {
    LOGGER.get().map(|w| w.recent_lines()).unwrap_or_default()
}

pub fn info(msg: &str) -> Result<(), LoggerError> {
    ensure_initialized()?;
    log::info!("{}", msg);
    Ok(())
}

pub fn warn(msg: &str) -> Result<(), LoggerError> {
    ensure_initialized()?;
    log::warn!("{}", msg);
    Ok(())
}

pub fn error(msg: &str) -> Result<(), LoggerError> {
    ensure_initialized()?;
    log::error!("{}", msg);
    Ok(())
}

fn ensure_initialized() -> Result<(), LoggerError> {
    LOGGER.get().map(|_| ()).ok_or(LoggerError::NotInitialized)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, d).unwrap()
    }

    #[test]
    fn test_write_creates_dated_file() {
        let dir = tempfile::tempdir().unwrap();
        let writer = RollingWriter::new(dir.path(), "App", RollingConfig::default()).unwrap();

        writer.write_at(day(1), b"hello\n").unwrap();

        let content = fs::read_to_string(writer.file_path(day(1))).unwrap();
        assert_eq!(content, "hello\n");
    }

    #[test]
    fn test_rolls_to_new_file_on_new_day() {
        let dir = tempfile::tempdir().unwrap();
        let writer = RollingWriter::new(dir.path(), "App", RollingConfig::default()).unwrap();

        writer.write_at(day(1), b"first\n").unwrap();
        writer.write_at(day(2), b"second\n").unwrap();

        assert_eq!(fs::read_to_string(writer.file_path(day(1))).unwrap(), "first\n");
        assert_eq!(fs::read_to_string(writer.file_path(day(2))).unwrap(), "second\n");
    }

    #[test]
    fn test_prunes_oldest_files() {
        let dir = tempfile::tempdir().unwrap();
        let config = RollingConfig { max_files: 2, buffer_lines: 10 };
        let writer = RollingWriter::new(dir.path(), "App", config).unwrap();

        for d in 1..=4 {
            writer.write_at(day(d), b"line\n").unwrap();
        }

        assert!(!writer.file_path(day(1)).exists());
        assert!(!writer.file_path(day(2)).exists());
        assert!(writer.file_path(day(3)).exists());
        assert!(writer.file_path(day(4)).exists());
    }

    #[test]
    fn test_ring_buffer_keeps_latest_lines() {
        let dir = tempfile::tempdir().unwrap();
        let config = RollingConfig { max_files: 7, buffer_lines: 2 };
        let writer = RollingWriter::new(dir.path(), "App", config).unwrap();

        writer.write_at(day(1), b"one\ntwo\n").unwrap();
        writer.write_at(day(1), b"thr").unwrap();
        writer.write_at(day(1), b"ee\n").unwrap();

        assert_eq!(writer.recent_lines(), vec!["two".to_string(), "three".to_string()]);
    }

    #[test]
    fn test_helpers_require_init() {
        if LOGGER.get().is_none() {
            assert!(matches!(info("x"), Err(LoggerError::NotInitialized)));
        }
    }
}
