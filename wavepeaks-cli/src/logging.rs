use log::{LevelFilter, Log, Metadata, Record};
use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, OnceLock};

const LOG_CAPACITY: usize = 500;

pub type LogBuffer = Arc<Mutex<VecDeque<String>>>;

struct SharedLogger {
    level: LevelFilter,
    buffer: LogBuffer,
    echo_stderr: AtomicBool,
}

impl Log for SharedLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.level
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }

        let line = format!("[{}] {}", record.level(), record.args());
        if self.echo_stderr.load(Ordering::Relaxed) {
            eprintln!("{}", line);
        }

        if let Ok(mut buffer) = self.buffer.lock() {
            if buffer.len() >= LOG_CAPACITY {
                buffer.pop_front();
            }
            buffer.push_back(line);
        }
    }

    fn flush(&self) {}
}

static LOG_BUFFER: OnceLock<LogBuffer> = OnceLock::new();
static LOGGER: OnceLock<SharedLogger> = OnceLock::new();

fn level_from_env() -> LevelFilter {
    match std::env::var("RUST_LOG") {
        Ok(level) => match level.to_lowercase().as_str() {
            "off" => LevelFilter::Off,
            "error" => LevelFilter::Error,
            "warn" => LevelFilter::Warn,
            "debug" => LevelFilter::Debug,
            "trace" => LevelFilter::Trace,
            _ => LevelFilter::Info,
        },
        Err(_) => LevelFilter::Info,
    }
}

/// Install the logger. `quiet` caps the level at errors.
pub fn init(quiet: bool) -> LogBuffer {
    let buffer = LOG_BUFFER
        .get_or_init(|| Arc::new(Mutex::new(VecDeque::with_capacity(LOG_CAPACITY))))
        .clone();

    let level = if quiet {
        level_from_env().min(LevelFilter::Error)
    } else {
        level_from_env()
    };

    let echo_stderr = std::env::var("WAVEPEAKS_LOG_STDERR")
        .map(|value| value != "0")
        .unwrap_or(true);

    let logger = SharedLogger {
        level,
        buffer: buffer.clone(),
        echo_stderr: AtomicBool::new(echo_stderr),
    };

    let logger_ref = LOGGER.get_or_init(|| logger);
    if log::set_logger(logger_ref).is_ok() {
        log::set_max_level(level);
    }

    buffer
}

/// Turn stderr echo off while the TUI owns the screen, and back on after.
///
/// Echo stays off if `WAVEPEAKS_LOG_STDERR=0` disabled it at start-up.
pub fn set_echo_stderr(enabled: bool) {
    let allowed = std::env::var("WAVEPEAKS_LOG_STDERR")
        .map(|value| value != "0")
        .unwrap_or(true);
    if let Some(logger) = LOGGER.get() {
        logger
            .echo_stderr
            .store(enabled && allowed, Ordering::Relaxed);
    }
}

pub fn snapshot(buffer: &LogBuffer) -> Vec<String> {
    buffer
        .lock()
        .map(|buffer| buffer.iter().cloned().collect())
        .unwrap_or_default()
}
