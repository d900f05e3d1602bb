use std::path::PathBuf;

use super::PlatformMetricsReader;
use super::report::{parse_meminfo, parse_psi_order};
use crate::system::snapshot::{PlatformMemory, PressureLevel};

/// Reads `/proc/meminfo` for the memory breakdown and PSI
/// (`/proc/pressure/memory`, kernel 4.20+) for the pressure order.
pub struct Platform {
    meminfo_path: PathBuf,
    psi_path: PathBuf,
}

impl Default for Platform {
    fn default() -> Self {
        Platform {
            meminfo_path: PathBuf::from("/proc/meminfo"),
            psi_path: PathBuf::from("/proc/pressure/memory"),
        }
    }
}

impl PlatformMetricsReader for Platform {
    fn memory_breakdown(&mut self) -> Option<PlatformMemory> {
        let contents = match std::fs::read_to_string(&self.meminfo_path) {
            Ok(contents) => contents,
            Err(err) => {
                tracing::debug!(path = %self.meminfo_path.display(), %err, "meminfo unavailable");
                return None;
            }
        };
        let memory = parse_meminfo(&contents);
        if memory.is_none() {
            tracing::debug!("meminfo had no recognised fields");
        }
        memory
    }

    fn pressure_level(&mut self) -> PressureLevel {
        std::fs::read_to_string(&self.psi_path)
            .ok()
            .and_then(|contents| parse_psi_order(&contents))
            .map(PressureLevel::from_order)
            .unwrap_or_else(|| {
                tracing::debug!(path = %self.psi_path.display(), "memory PSI unavailable");
                PressureLevel::Unknown
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_files_degrade() {
        let mut platform = Platform {
            meminfo_path: PathBuf::from("/nonexistent/meminfo"),
            psi_path: PathBuf::from("/nonexistent/pressure/memory"),
        };
        assert!(platform.memory_breakdown().is_none());
        assert_eq!(platform.pressure_level(), PressureLevel::Unknown);
    }

    #[test]
    fn reads_from_configured_paths() {
        let dir = std::env::temp_dir().join(format!("monarx_linux_{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let meminfo = dir.join("meminfo");
        let psi = dir.join("memory");
        std::fs::write(&meminfo, "Active: 1048576 kB\nCached: 524288 kB\n").unwrap();
        std::fs::write(&psi, "some avg10=15.00 avg60=1.00 avg300=0.00 total=1\n").unwrap();

        let mut platform = Platform {
            meminfo_path: meminfo,
            psi_path: psi,
        };
        let memory = platform.memory_breakdown().unwrap();
        assert!((memory.active_gb - 1.0).abs() < 1e-9);
        assert_eq!(platform.pressure_level(), PressureLevel::Warn);

        let _ = std::fs::remove_dir_all(&dir);
    }
}
