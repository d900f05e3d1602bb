use std::fmt;

use super::host::HostMetrics;
use super::platform::PlatformMetricsReader;
use super::snapshot::Snapshot;

const BYTES_PER_GIB: f64 = 1024.0 * 1024.0 * 1024.0;

/// The basic CPU/memory/swap counters could not be read this tick.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SampleError {
    CountersUnavailable,
}

impl fmt::Display for SampleError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SampleError::CountersUnavailable => write!(f, "system counters unavailable"),
        }
    }
}

impl std::error::Error for SampleError {}

/// Builds one [`Snapshot`] per tick.
///
/// CPU usage is relative to the previous read, so the first sample after
/// start-up can read zero or a stale baseline. No blocking wait is used to
/// hide that. Platform sub-reads are each bounded by
/// [`COMMAND_TIMEOUT`](super::platform::COMMAND_TIMEOUT) and degrade to
/// "no data" on failure.
pub struct Sampler {
    platform: Box<dyn PlatformMetricsReader + Send>,
}

impl Sampler {
    pub fn new(platform: Box<dyn PlatformMetricsReader + Send>) -> Self {
        Sampler { platform }
    }

    pub fn sample(&mut self, host: &mut dyn HostMetrics) -> Result<Snapshot, SampleError> {
        let _span = tracing::debug_span!("sampler.sample").entered();

        let usage = host.system_usage().ok_or(SampleError::CountersUnavailable)?;

        let platform_memory = self.platform.memory_breakdown();
        let pressure_level = self.platform.pressure_level();

        Ok(Snapshot::new(
            usage.cpu_pct,
            usage.mem_pct,
            usage.swap_pct,
            usage.total_memory_bytes as f64 / BYTES_PER_GIB,
            platform_memory,
            pressure_level,
        ))
    }
}
