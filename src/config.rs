use serde::{Deserialize, Serialize};

/// Embedded default configuration.
const DEFAULT_CONFIG: &str = include_str!("../config.default.toml");

// ── Final (merged) config types ──

#[derive(Debug, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub settings: Settings,
    #[serde(default)]
    pub limits: Limits,
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Deserialize, Serialize)]
pub struct Settings {
    /// Shown before the style tag in interactive prompts.
    #[serde(default = "default_prompt_name")]
    pub prompt_name: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            prompt_name: default_prompt_name(),
        }
    }
}

fn default_prompt_name() -> String {
    "forkshell".into()
}

/// What to do when input exceeds one of the [`Limits`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Overflow {
    /// Keep the first N items (or bytes) and drop the rest.
    #[default]
    Truncate,
    /// Refuse the whole input with [`ShellError::Capacity`](crate::error::ShellError::Capacity).
    Reject,
}

/// Capacities applied to every line before anything is forked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
pub struct Limits {
    pub max_line_bytes: usize,
    pub max_segments: usize,
    pub max_stages: usize,
    pub max_tokens: usize,
    #[serde(default)]
    pub overflow: Overflow,
}

impl Default for Limits {
    fn default() -> Self {
        Self {
            max_line_bytes: 80,
            max_segments: 40,
            max_stages: 40,
            max_tokens: 40,
            overflow: Overflow::Truncate,
        }
    }
}

#[derive(Debug, Deserialize, Serialize)]
pub struct LoggingConfig {
    #[serde(default)]
    pub enabled: bool,
    /// A `log::LevelFilter` name: off, error, warn, info, debug, trace.
    #[serde(default = "default_log_level")]
    pub level: String,
    /// Log file path; a leading `~` is expanded.
    #[serde(default)]
    pub path: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            level: default_log_level(),
            path: String::new(),
        }
    }
}

fn default_log_level() -> String {
    "warn".into()
}

// ── Overlay types (user config that merges with defaults) ──

#[derive(Debug, Deserialize, Default)]
struct ConfigOverlay {
    #[serde(default)]
    settings: SettingsOverlay,
    #[serde(default)]
    limits: LimitsOverlay,
    #[serde(default)]
    logging: LoggingOverlay,
}

#[derive(Debug, Deserialize, Default)]
struct SettingsOverlay {
    prompt_name: Option<String>,
}

#[derive(Debug, Deserialize, Default)]
struct LimitsOverlay {
    max_line_bytes: Option<usize>,
    max_segments: Option<usize>,
    max_stages: Option<usize>,
    max_tokens: Option<usize>,
    overflow: Option<Overflow>,
}

#[derive(Debug, Deserialize, Default)]
struct LoggingOverlay {
    enabled: Option<bool>,
    level: Option<String>,
    path: Option<String>,
}

// ── Merge logic ──

/// Override a capacity, ignoring zero (nothing could ever run).
fn merge_capacity(base: &mut usize, value: Option<usize>, name: &str) {
    match value {
        Some(0) => eprintln!("forkshell: config: limits.{name} must be positive; keeping {base}"),
        Some(v) => *base = v,
        None => {}
    }
}

impl Config {
    /// Load the default embedded configuration.
    pub fn default_config() -> Self {
        toml::from_str(DEFAULT_CONFIG).expect("embedded default config must parse")
    }

    /// Load configuration with resolution order:
    /// 1. Start with embedded defaults
    /// 2. Merge user overlay from ~/.config/forkshell/config.toml (if exists)
    ///
    /// Scalars in the overlay override the defaults; absent keys keep them.
    pub fn load() -> Self {
        let mut config = Self::default_config();
        if let Some(overlay) = Self::load_overlay() {
            config.apply_overlay(overlay);
        }
        config
    }

    /// Try to load user overlay from ~/.config/forkshell/config.toml.
    fn load_overlay() -> Option<ConfigOverlay> {
        let home = std::env::var_os("HOME")?;
        let path = std::path::Path::new(&home).join(".config/forkshell/config.toml");
        let content = std::fs::read_to_string(path).ok()?;
        match toml::from_str(&content) {
            Ok(overlay) => Some(overlay),
            Err(e) => {
                eprintln!("forkshell: config parse error: {e}");
                None
            }
        }
    }

    /// Apply an overlay on top of this config (merge semantics).
    fn apply_overlay(&mut self, overlay: ConfigOverlay) {
        if let Some(v) = overlay.settings.prompt_name {
            self.settings.prompt_name = v;
        }

        let l = overlay.limits;
        merge_capacity(&mut self.limits.max_line_bytes, l.max_line_bytes, "max_line_bytes");
        merge_capacity(&mut self.limits.max_segments, l.max_segments, "max_segments");
        merge_capacity(&mut self.limits.max_stages, l.max_stages, "max_stages");
        merge_capacity(&mut self.limits.max_tokens, l.max_tokens, "max_tokens");
        if let Some(v) = l.overflow {
            self.limits.overflow = v;
        }

        let lg = overlay.logging;
        if let Some(v) = lg.enabled {
            self.logging.enabled = v;
        }
        if let Some(v) = lg.level {
            self.logging.level = v;
        }
        if let Some(v) = lg.path {
            self.logging.path = v;
        }
    }

    /// Apply an overlay from a TOML string. Used for testing.
    #[cfg(test)]
    fn apply_overlay_str(&mut self, toml_str: &str) {
        let overlay: ConfigOverlay = toml::from_str(toml_str).unwrap();
        self.apply_overlay(overlay);
    }
}
