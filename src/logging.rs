use anyhow::{anyhow, Result};
use chrono::Utc;
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::PathBuf;
use std::sync::{Mutex, OnceLock};

/// Privacy rule: the log never contains request text or generated commands,
/// only event names and error classes.
pub struct Logger {
    log_path: PathBuf,
}

static LOGGER: OnceLock<Mutex<Logger>> = OnceLock::new();

impl Logger {
    fn new(log_path: PathBuf) -> Self {
        Self { log_path }
    }

    /// Append one timestamped line, ignoring write failures
    pub fn log(&self, level: &str, message: &str) {
        let line = format!("{} [{}] {}\n", Utc::now().to_rfc3339(), level, message);
        if let Ok(mut file) = OpenOptions::new().create(true).append(true).open(&self.log_path) {
            let _ = file.write_all(line.as_bytes());
        }
    }
}

/// Default log location under the user cache directory
fn default_log_path() -> Result<PathBuf> {
    let cache_dir = dirs::cache_dir()
        .or_else(dirs::config_dir)
        .ok_or_else(|| anyhow!("Could not find cache directory"))?;
    let dir = cache_dir.join("aido");
    fs::create_dir_all(&dir)?;
    Ok(dir.join("aido.log"))
}

/// Initialize the global logger. Failure leaves logging disabled; callers
/// treat that as a warning, never a fatal error.
pub fn init_logger() -> Result<()> {
    let path = default_log_path()?;
    let _ = LOGGER.set(Mutex::new(Logger::new(path)));
    Ok(())
}

/// Log through the global logger if it was initialized
pub fn log_event(level: &str, message: &str) {
    if let Some(logger) = LOGGER.get() {
        if let Ok(logger) = logger.lock() {
            logger.log(level, message);
        }
    }
}
