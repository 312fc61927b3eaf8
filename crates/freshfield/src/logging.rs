use std::fs::OpenOptions;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use log::LevelFilter;
use simplelog::{
    ColorChoice, CombinedLogger, ConfigBuilder, SharedLogger, TermLogger, TerminalMode,
    WriteLogger,
};

pub const DEFAULT_MAX_LOG_SIZE: u64 = 5 * 1024 * 1024;

static CONFIGURED_LEVEL: OnceLock<LevelFilter> = OnceLock::new();

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoggingOptions {
    pub level: LevelFilter,
    /// Mirror SDK logs to stderr.
    pub terminal: bool,
    /// Append SDK logs to this file as well.
    pub log_file: Option<PathBuf>,
    /// A log file larger than this is cut to its newest half on init.
    pub max_log_size: u64,
}

impl Default for LoggingOptions {
    fn default() -> Self {
        Self {
            level: LevelFilter::Info,
            terminal: true,
            log_file: None,
            max_log_size: DEFAULT_MAX_LOG_SIZE,
        }
    }
}

fn trim_log_file_if_oversized(log_path: &Path, max_log_size: u64) {
    if let Ok(metadata) = std::fs::metadata(log_path)
        && metadata.len() > max_log_size
        && let Ok(contents) = std::fs::read(log_path)
    {
        let half = contents.len() / 2;
        let keep_from = contents[half..]
            .iter()
            .position(|&b| b == b'\n')
            .map_or(half, |pos| half + pos + 1);
        let _ = std::fs::write(log_path, &contents[keep_from..]);
    }
}

/// Install the SDK logger. Only the first call in a process installs
/// anything; later calls are a no-op.
pub fn init_logging(options: &LoggingOptions) {
    if CONFIGURED_LEVEL.set(options.level).is_err() {
        return;
    }

    let config = ConfigBuilder::new()
        .set_time_format_rfc3339()
        .add_filter_allow_str("freshfield")
        .build();

    let mut loggers: Vec<Box<dyn SharedLogger>> = Vec::new();
    if options.terminal {
        loggers.push(TermLogger::new(
            options.level,
            config.clone(),
            TerminalMode::Stderr,
            ColorChoice::Auto,
        ));
    }

    if let Some(log_path) = &options.log_file {
        trim_log_file_if_oversized(log_path, options.max_log_size);
        if let Some(parent) = log_path.parent() {
            let _ = std::fs::create_dir_all(parent);
        }
        if let Ok(file) = OpenOptions::new().create(true).append(true).open(log_path) {
            loggers.push(WriteLogger::new(options.level, config, file));
        }
    }

    if !loggers.is_empty() {
        let _ = CombinedLogger::init(loggers);
    }
    set_logging_enabled(true);

    if let Some(log_path) = &options.log_file {
        log::debug!("Logging initialized, log file: {}", log_path.display());
    }
}

/// Switch SDK logging on (at the configured level) or off entirely.
pub fn set_logging_enabled(enabled: bool) {
    if enabled {
        log::set_max_level(CONFIGURED_LEVEL.get().copied().unwrap_or(LevelFilter::Debug));
    } else {
        log::set_max_level(LevelFilter::Off);
    }
}
