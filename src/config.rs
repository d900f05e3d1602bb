use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::alert::{
    DEFAULT_CPU_LIMIT, DEFAULT_MEM_LIMIT, DEFAULT_SWAP_LIMIT, DEFAULT_WARN_FACTOR, ThresholdSet,
};

const APP_DIR: &str = "monarx";

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub general: GeneralConfig,
    pub thresholds: ThresholdsConfig,
    pub keybinds: KeybindsConfig,
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    pub refresh_rate_ms: u64,
    pub process_limit: usize,
    pub cooldown_secs: u64,
    pub log_level: String,
    pub color_support: String,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        GeneralConfig {
            refresh_rate_ms: 5000,
            process_limit: 5,
            cooldown_secs: 120,
            log_level: "info".to_string(),
            color_support: "auto".to_string(),
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct ThresholdsConfig {
    pub warn_factor: f64,
}

impl Default for ThresholdsConfig {
    fn default() -> Self {
        ThresholdsConfig {
            warn_factor: DEFAULT_WARN_FACTOR,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct KeybindsConfig {
    pub quit: String,
    pub refresh: String,
    pub copy_stats: String,
    pub edit_thresholds: String,
    pub kill: String,
}

impl Default for KeybindsConfig {
    fn default() -> Self {
        KeybindsConfig {
            quit: "q".to_string(),
            refresh: "r".to_string(),
            copy_stats: "c".to_string(),
            edit_thresholds: "t".to_string(),
            kill: "k".to_string(),
        }
    }
}

/// Single-character keybinds only; anything else is rejected.
pub fn parse_key(raw: &str) -> Option<char> {
    let mut chars = raw.chars();
    let first = chars.next()?;
    chars.next().is_none().then_some(first)
}

pub fn config_dir() -> Option<PathBuf> {
    dirs::config_dir().map(|p| p.join(APP_DIR))
}

pub fn config_path() -> Option<PathBuf> {
    config_dir().map(|p| p.join("config.toml"))
}

pub fn load_config() -> Config {
    match config_path() {
        Some(path) if path.exists() => load_config_from_path(&path),
        _ => Config::default(),
    }
}

pub fn load_config_from_path(path: &Path) -> Config {
    match std::fs::read_to_string(path) {
        Ok(contents) => toml::from_str(&contents).unwrap_or_default(),
        Err(_) => Config::default(),
    }
}

/// On-disk shape of the threshold file. Signed and optional so that out of
/// range or partial files still load and get clamped.
#[derive(Debug, Default, Deserialize, Serialize)]
struct StoredThresholds {
    cpu_limit: Option<i64>,
    mem_limit: Option<i64>,
    swap_limit: Option<i64>,
}

/// Persists the three percentage limits as JSON. The warn factor is not
/// stored; it comes from `config.toml`.
#[derive(Debug, Clone)]
pub struct ThresholdStore {
    path: Option<PathBuf>,
}

impl Default for ThresholdStore {
    fn default() -> Self {
        ThresholdStore {
            path: config_dir().map(|p| p.join("thresholds.json")),
        }
    }
}

impl ThresholdStore {
    pub fn at(path: impl Into<PathBuf>) -> Self {
        ThresholdStore {
            path: Some(path.into()),
        }
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Saved limits clamped into `[1, 100]`, or 85/80/20 when the file is
    /// missing or unreadable.
    pub fn load(&self, warn_factor: f64) -> ThresholdSet {
        let stored = self
            .path
            .as_deref()
            .and_then(|path| std::fs::read_to_string(path).ok())
            .and_then(|contents| serde_json::from_str::<StoredThresholds>(&contents).ok());

        match stored {
            Some(stored) => ThresholdSet::new(
                stored.cpu_limit.unwrap_or(i64::from(DEFAULT_CPU_LIMIT)),
                stored.mem_limit.unwrap_or(i64::from(DEFAULT_MEM_LIMIT)),
                stored.swap_limit.unwrap_or(i64::from(DEFAULT_SWAP_LIMIT)),
                warn_factor,
            ),
            None => ThresholdSet {
                warn_factor: crate::alert::sanitize_warn_factor(warn_factor),
                ..ThresholdSet::default()
            },
        }
    }

    /// Best effort: failures are logged and otherwise ignored.
    pub fn save(&self, thresholds: &ThresholdSet) {
        let Some(path) = self.path.as_deref() else {
            return;
        };
        let stored = StoredThresholds {
            cpu_limit: Some(i64::from(thresholds.cpu_limit)),
            mem_limit: Some(i64::from(thresholds.mem_limit)),
            swap_limit: Some(i64::from(thresholds.swap_limit)),
        };
        let result = serde_json::to_string_pretty(&stored)
            .map_err(std::io::Error::other)
            .and_then(|json| {
                if let Some(parent) = path.parent() {
                    std::fs::create_dir_all(parent)?;
                }
                std::fs::write(path, json)
            });
        match result {
            Ok(()) => tracing::info!(path = %path.display(), "thresholds saved"),
            Err(err) => tracing::debug!(path = %path.display(), %err, "failed to save thresholds"),
        }
    }
}
