use serde::Serialize;

/// Platform-reported memory stress, mapped from the kernel's order value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum PressureLevel {
    Ok,
    Warn,
    High,
    /// The read failed or the platform has no such signal.
    Unknown,
}

impl PressureLevel {
    /// `0 -> Ok`, `1 -> Warn`, anything above -> `High`.
    pub fn from_order(order: u32) -> Self {
        match order {
            0 => PressureLevel::Ok,
            1 => PressureLevel::Warn,
            _ => PressureLevel::High,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            PressureLevel::Ok => "OK",
            PressureLevel::Warn => "WARN",
            PressureLevel::High => "HIGH",
            PressureLevel::Unknown => "UNKNOWN",
        }
    }

    /// True for the levels that warrant a pressure alert.
    pub fn is_elevated(self) -> bool {
        matches!(self, PressureLevel::Warn | PressureLevel::High)
    }
}

/// Breakdown of physical memory, in GiB.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct PlatformMemory {
    pub wired_gb: f64,
    pub active_gb: f64,
    pub compressed_gb: f64,
    pub cached_gb: f64,
}

impl PlatformMemory {
    pub fn compression_exceeds_active(&self) -> bool {
        self.compressed_gb > self.active_gb
    }
}

/// One tick's complete resource reading. Built by the sampler and never
/// mutated afterwards.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Snapshot {
    pub cpu_pct: f64,
    pub mem_pct: f64,
    pub swap_pct: f64,
    pub mem_total_gb: f64,
    pub platform_memory: Option<PlatformMemory>,
    pub pressure_level: PressureLevel,
    pub lag_risk: bool,
}

impl Snapshot {
    pub fn new(
        cpu_pct: f64,
        mem_pct: f64,
        swap_pct: f64,
        mem_total_gb: f64,
        platform_memory: Option<PlatformMemory>,
        pressure_level: PressureLevel,
    ) -> Self {
        let lag_risk = derive_lag_risk(platform_memory.as_ref(), pressure_level);
        Snapshot {
            cpu_pct: clamp_pct(cpu_pct),
            mem_pct: clamp_pct(mem_pct),
            swap_pct: clamp_pct(swap_pct),
            mem_total_gb,
            platform_memory,
            pressure_level,
            lag_risk,
        }
    }
}

/// Lag risk needs the platform breakdown; without it the answer is `false`
/// regardless of what the pressure read returned. An `Unknown` pressure is
/// "no data" and never raises the risk on its own.
pub fn derive_lag_risk(memory: Option<&PlatformMemory>, pressure: PressureLevel) -> bool {
    match memory {
        Some(memory) => memory.compression_exceeds_active() || pressure.is_elevated(),
        None => false,
    }
}

fn clamp_pct(value: f64) -> f64 {
    if value.is_finite() {
        value.clamp(0.0, 100.0)
    } else {
        0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn memory(active: f64, compressed: f64) -> PlatformMemory {
        PlatformMemory {
            wired_gb: 2.0,
            active_gb: active,
            compressed_gb: compressed,
            cached_gb: 1.5,
        }
    }

    #[test]
    fn pressure_order_mapping() {
        assert_eq!(PressureLevel::from_order(0), PressureLevel::Ok);
        assert_eq!(PressureLevel::from_order(1), PressureLevel::Warn);
        assert_eq!(PressureLevel::from_order(2), PressureLevel::High);
        assert_eq!(PressureLevel::from_order(4), PressureLevel::High);
    }

    #[test]
    fn lag_risk_from_compression() {
        let m = memory(3.0, 4.0);
        assert!(derive_lag_risk(Some(&m), PressureLevel::Ok));
        let m = memory(4.0, 3.0);
        assert!(!derive_lag_risk(Some(&m), PressureLevel::Ok));
    }

    #[test]
    fn lag_risk_from_pressure() {
        let m = memory(4.0, 1.0);
        assert!(derive_lag_risk(Some(&m), PressureLevel::Warn));
        assert!(derive_lag_risk(Some(&m), PressureLevel::High));
        assert!(!derive_lag_risk(Some(&m), PressureLevel::Unknown));
    }

    #[test]
    fn no_platform_memory_means_no_lag_risk() {
        assert!(!derive_lag_risk(None, PressureLevel::High));
        let snapshot = Snapshot::new(10.0, 20.0, 0.0, 16.0, None, PressureLevel::High);
        assert!(!snapshot.lag_risk);
    }

    #[test]
    fn percentages_are_clamped() {
        let snapshot = Snapshot::new(130.0, -1.0, f64::NAN, 8.0, None, PressureLevel::Ok);
        assert_eq!(snapshot.cpu_pct, 100.0);
        assert_eq!(snapshot.mem_pct, 0.0);
        assert_eq!(snapshot.swap_pct, 0.0);
    }
}
