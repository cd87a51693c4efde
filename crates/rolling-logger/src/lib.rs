//! Rolling Logger
//!
//! Writes `<dir>/<app>.log`, rotating it by size into `<app>.1.log` ..
//! `<app>.N.log`; the oldest archive is dropped. Installed as the global
//! `tracing` subscriber, so `log` records from other crates land here too.

use std::fs::{self, File, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, OnceLock};

use tracing_subscriber::fmt::format::Writer;
use tracing_subscriber::fmt::time::FormatTime;
use tracing_subscriber::fmt::writer::MakeWriterExt;

#[derive(Debug, Clone)]
pub struct LoggerConfig {
    /// Rotate once the current file would grow past this size
    pub max_file_bytes: u64,
    /// Archives kept besides the current file
    pub max_archives: usize,
}

impl Default for LoggerConfig {
    fn default() -> Self {
        Self {
            max_file_bytes: 1024 * 1024,
            max_archives: 5,
        }
    }
}

/// Size-rotated log file
pub struct RollingFile {
    dir: PathBuf,
    app_name: String,
    config: LoggerConfig,
    file: File,
    written: u64,
}

impl RollingFile {
    pub fn open(dir: &Path, app_name: &str, config: LoggerConfig) -> io::Result<Self> {
        fs::create_dir_all(dir)?;
        let current = dir.join(format!("{}.log", app_name));
        let file = OpenOptions::new().create(true).append(true).open(&current)?;
        let written = file.metadata()?.len();
        Ok(Self {
            dir: dir.to_path_buf(),
            app_name: app_name.to_string(),
            config,
            file,
            written,
        })
    }

    pub fn current_path(&self) -> PathBuf {
        self.dir.join(format!("{}.log", self.app_name))
    }

    pub fn archive_path(&self, index: usize) -> PathBuf {
        self.dir.join(format!("{}.{}.log", self.app_name, index))
    }

    fn rotate(&mut self) -> io::Result<()> {
        self.file.flush()?;
        if self.config.max_archives == 0 {
            self.file = File::create(self.current_path())?;
            self.written = 0;
            return Ok(());
        }

        let oldest = self.archive_path(self.config.max_archives);
        if oldest.exists() {
            fs::remove_file(&oldest)?;
        }
        for index in (1..self.config.max_archives).rev() {
            let from = self.archive_path(index);
            if from.exists() {
                fs::rename(&from, self.archive_path(index + 1))?;
            }
        }
        fs::rename(self.current_path(), self.archive_path(1))?;

        self.file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(self.current_path())?;
        self.written = 0;
        Ok(())
    }
}

impl Write for RollingFile {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        if self.written > 0 && self.written + buf.len() as u64 > self.config.max_file_bytes {
            self.rotate()?;
        }
        let n = self.file.write(buf)?;
        self.written += n as u64;
        Ok(n)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.file.flush()
    }
}

/// Shareable handle; one per formatted event
#[derive(Clone)]
pub struct RollingWriter {
    inner: Arc<Mutex<RollingFile>>,
}

impl RollingWriter {
    pub fn new(file: RollingFile) -> Self {
        Self {
            inner: Arc::new(Mutex::new(file)),
        }
    }
}

impl Write for RollingWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let mut file = self
            .inner
            .lock()
            .map_err(|_| io::Error::new(io::ErrorKind::Other, "log file lock poisoned"))?;
        file.write(buf)
    }

    fn flush(&mut self) -> io::Result<()> {
        let mut file = self
            .inner
            .lock()
            .map_err(|_| io::Error::new(io::ErrorKind::Other, "log file lock poisoned"))?;
        file.flush()
    }
}

struct LocalTime;

impl FormatTime for LocalTime {
    fn format_time(&self, w: &mut Writer<'_>) -> std::fmt::Result {
        write!(w, "{}", chrono::Local::now().format("%Y-%m-%d %H:%M:%S%.3f"))
    }
}

static LOG_FILE: OnceLock<PathBuf> = OnceLock::new();

/// Install the global subscriber with the default rotation policy
pub fn init_logger(log_dir: PathBuf, app_name: &str) -> Result<(), String> {
    init_logger_with(log_dir, app_name, LoggerConfig::default())
}

pub fn init_logger_with(log_dir: PathBuf, app_name: &str, config: LoggerConfig) -> Result<(), String> {
    let file = RollingFile::open(&log_dir, app_name, config)
        .map_err(|e| format!("Failed to open log file in {}: {}", log_dir.display(), e))?;
    let path = file.current_path();
    let writer = RollingWriter::new(file);

    tracing_subscriber::fmt()
        .with_writer((move || writer.clone()).and(io::stderr))
        .with_ansi(false)
        .with_timer(LocalTime)
        .with_max_level(tracing::Level::INFO)
        .try_init()
        .map_err(|e| format!("Failed to install logger: {}", e))?;

    let _ = LOG_FILE.set(path);
    tracing::info!("{} logging started", app_name);
    Ok(())
}

/// Path of the current log file, once initialized
pub fn log_file() -> Option<&'static Path> {
    LOG_FILE.get().map(PathBuf::as_path)
}

fn ensure_initialized() -> Result<(), String> {
    if LOG_FILE.get().is_none() {
        return Err("logger not initialized".to_string());
    }
    Ok(())
}

pub fn info(msg: &str) -> Result<(), String> {
    ensure_initialized()?;
    tracing::info!("{}", msg);
    Ok(())
}

pub fn warn(msg: &str) -> Result<(), String> {
    ensure_initialized()?;
    tracing::warn!("{}", msg);
    Ok(())
}

pub fn error(msg: &str) -> Result<(), String> {
    ensure_initialized()?;
    tracing::error!("{}", msg);
    Ok(())
}
