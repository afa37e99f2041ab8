use crate::config::LoggingConfig;
use log::LevelFilter;
use simplelog::{ConfigBuilder, WriteLogger};
use std::path::PathBuf;

/// Install a file logger appending to the configured path.
/// Best-effort: failures are silently ignored (logging must never block the shell).
///
/// Every forked child inherits the same append-mode file, so lines from all
/// processes interleave; messages carry the pid where it matters.
pub fn init(settings: &LoggingConfig) {
    if !settings.enabled {
        return;
    }
    let Some(path) = log_path(&settings.path) else {
        return;
    };
    if let Some(dir) = path.parent() {
        let _ = std::fs::create_dir_all(dir);
    }
    let Ok(file) = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(&path)
    else {
        return;
    };

    let config = ConfigBuilder::new()
        .set_time_format_rfc3339()
        .set_thread_level(LevelFilter::Off)
        .set_target_level(LevelFilter::Off)
        .build();
    let _ = WriteLogger::init(parse_level(&settings.level), config, file);
}

/// Unknown level names fall back to `warn`.
fn parse_level(level: &str) -> LevelFilter {
    level.trim().parse().unwrap_or(LevelFilter::Warn)
}

/// Expand a leading `~`; an empty path means "no log file".
fn log_path(raw: &str) -> Option<PathBuf> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    Some(PathBuf::from(shellexpand::tilde(raw).as_ref()))
}
