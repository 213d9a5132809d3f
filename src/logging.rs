//! Console Logger
//!
//! `log` backend for the browser: writes to the devtools console and keeps
//! a circular buffer of recent lines for the in-app log panel.

use std::collections::VecDeque;
use std::sync::{Mutex, OnceLock};

use log::{Level, LevelFilter, Log, Metadata, Record, SetLoggerError};

/// Lines kept for the log panel
const BUFFER_CAPACITY: usize = 200;

pub struct ConsoleLogger {
    level: LevelFilter,
    recent: Mutex<VecDeque<String>>,
}

impl ConsoleLogger {
    fn new(level: LevelFilter) -> Self {
        Self {
            level,
            recent: Mutex::new(VecDeque::with_capacity(BUFFER_CAPACITY)),
        }
    }

    fn remember(&self, line: String) {
        if let Ok(mut recent) = self.recent.lock() {
            if recent.len() == BUFFER_CAPACITY {
                recent.pop_front();
            }
            recent.push_back(line);
        }
    }

    fn lines(&self) -> Vec<String> {
        self.recent
            .lock()
            .map(|recent| recent.iter().cloned().collect())
            .unwrap_or_default()
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
        let line = format!("[{} {}] {}", record.level(), record.target(), record.args());
        write_console(record.level(), &line);
        self.remember(line);
    }

    fn flush(&self) {}
}

#[cfg(target_arch = "wasm32")]
fn write_console(level: Level, line: &str) {
    let value = wasm_bindgen::JsValue::from_str(line);
    match level {
        Level::Error => web_sys::console::error_1(&value),
        Level::Warn => web_sys::console::warn_1(&value),
        Level::Info => web_sys::console::info_1(&value),
        Level::Debug | Level::Trace => web_sys::console::debug_1(&value),
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn write_console(_level: Level, line: &str) {
    eprintln!("{}", line);
}

static LOGGER: OnceLock<ConsoleLogger> = OnceLock::new();

/// Install the console logger; debug builds log at debug level
pub fn init() -> Result<(), SetLoggerError> {
    let level = if cfg!(debug_assertions) {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };
    let logger = LOGGER.get_or_init(|| ConsoleLogger::new(level));
    log::set_logger(logger)?;
    log::set_max_level(level);
    Ok(())
}

/// Most recent log lines, oldest first
pub fn recent_lines() -> Vec<String> {
    LOGGER.get().map(ConsoleLogger::lines).unwrap_or_default()
}
