use std::fs::{self, File, OpenOptions};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use color_eyre::eyre::{Result, eyre};
use tracing_subscriber::EnvFilter;

const LOG_FILE: &str = "monarx.log";

pub fn log_path() -> PathBuf {
    dirs::data_local_dir()
        .unwrap_or_else(std::env::temp_dir)
        .join("monarx")
        .join(LOG_FILE)
}

/// Install the global subscriber, appending to `path`. `RUST_LOG` wins over
/// `level` when set. Never writes to the terminal, which belongs to the UI.
pub fn init(path: &Path, level: &str, json: bool) -> Result<()> {
    let file = open_log_file(path)?;

    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(level))
        .map_err(|e| eyre!("invalid log level {level:?}: {e}"))?;

    let builder = tracing_subscriber::fmt()
        .with_ansi(false)
        .with_env_filter(filter)
        .with_writer(Mutex::new(file));

    let result = if json {
        tracing::subscriber::set_global_default(builder.json().finish())
    } else {
        tracing::subscriber::set_global_default(builder.finish())
    };
    result.map_err(|e| eyre!("failed to set tracing subscriber: {e}"))?;

    tracing::info!(path = %path.display(), "logging to file");
    Ok(())
}

fn open_log_file(path: &Path) -> Result<File> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent)?;
    }
    Ok(OpenOptions::new().create(true).append(true).open(path)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn log_path_is_under_app_dir() {
        let path = log_path();
        assert!(path.ends_with("monarx/monarx.log"));
    }

    #[test]
    fn opens_log_file_creating_parents() {
        let dir = std::env::temp_dir().join(format!("monarx_log_{}", std::process::id()));
        let path = dir.join("nested").join(LOG_FILE);
        open_log_file(&path).unwrap();
        assert!(path.exists());
        let _ = fs::remove_dir_all(&dir);
    }
}
