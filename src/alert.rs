use std::collections::HashMap;
use std::time::{Duration, Instant};

use serde::Serialize;

use crate::system::snapshot::Snapshot;

/// Minimum time between two alerts for the same key.
pub const DEFAULT_COOLDOWN: Duration = Duration::from_secs(120);

pub const DEFAULT_WARN_FACTOR: f64 = 0.85;
pub const DEFAULT_CPU_LIMIT: u32 = 85;
pub const DEFAULT_MEM_LIMIT: u32 = 80;
pub const DEFAULT_SWAP_LIMIT: u32 = 20;

/// Ordered by severity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Status {
    Ok,
    Warn,
    High,
}

impl Status {
    pub fn label(self) -> &'static str {
        match self {
            Status::Ok => "OK",
            Status::Warn => "WARN",
            Status::High => "HIGH",
        }
    }
}

/// `value >= limit` is HIGH, `value >= limit * warn_factor` is WARN, the
/// rest is OK. Both boundaries are inclusive.
pub fn classify(value: f64, limit: f64, warn_factor: f64) -> Status {
    if value >= limit {
        Status::High
    } else if value >= limit * warn_factor {
        Status::Warn
    } else {
        Status::Ok
    }
}

/// Percentage limits plus the warn factor. Read-only to the engine.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ThresholdSet {
    pub cpu_limit: u32,
    pub mem_limit: u32,
    pub swap_limit: u32,
    pub warn_factor: f64,
}

impl Default for ThresholdSet {
    fn default() -> Self {
        ThresholdSet {
            cpu_limit: DEFAULT_CPU_LIMIT,
            mem_limit: DEFAULT_MEM_LIMIT,
            swap_limit: DEFAULT_SWAP_LIMIT,
            warn_factor: DEFAULT_WARN_FACTOR,
        }
    }
}

impl ThresholdSet {
    /// Limits are clamped into `[1, 100]`; a warn factor outside `(0, 1]`
    /// falls back to the default.
    pub fn new(cpu_limit: i64, mem_limit: i64, swap_limit: i64, warn_factor: f64) -> Self {
        ThresholdSet {
            cpu_limit: clamp_limit(cpu_limit),
            mem_limit: clamp_limit(mem_limit),
            swap_limit: clamp_limit(swap_limit),
            warn_factor: sanitize_warn_factor(warn_factor),
        }
    }

    pub fn cpu_status(&self, value: f64) -> Status {
        classify(value, f64::from(self.cpu_limit), self.warn_factor)
    }

    pub fn mem_status(&self, value: f64) -> Status {
        classify(value, f64::from(self.mem_limit), self.warn_factor)
    }

    pub fn swap_status(&self, value: f64) -> Status {
        classify(value, f64::from(self.swap_limit), self.warn_factor)
    }
}

pub fn clamp_limit(value: i64) -> u32 {
    value.clamp(1, 100) as u32
}

pub fn sanitize_warn_factor(value: f64) -> f64 {
    if value > 0.0 && value <= 1.0 {
        value
    } else {
        DEFAULT_WARN_FACTOR
    }
}

/// Alert identities, in evaluation order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AlertKey {
    Cpu,
    Mem,
    Swap,
    Pressure,
    LagRisk,
}

impl AlertKey {
    pub const ALL: [AlertKey; 5] = [
        AlertKey::Cpu,
        AlertKey::Mem,
        AlertKey::Swap,
        AlertKey::Pressure,
        AlertKey::LagRisk,
    ];

    pub fn title(self) -> &'static str {
        match self {
            AlertKey::Cpu => "High CPU",
            AlertKey::Mem => "High Memory",
            AlertKey::Swap => "High Swap",
            AlertKey::Pressure => "Memory Pressure",
            AlertKey::LagRisk => "Lag Risk",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Alert {
    pub key: AlertKey,
    pub title: String,
    pub message: String,
}

impl Alert {
    fn new(key: AlertKey, message: String) -> Self {
        Alert {
            key,
            title: key.title().to_string(),
            message,
        }
    }
}

/// Last-fired time per alert key. One tracker per running monitor; it is
/// never persisted.
#[derive(Debug)]
pub struct CooldownTracker {
    window: Duration,
    last_fired: HashMap<AlertKey, Instant>,
}

impl Default for CooldownTracker {
    fn default() -> Self {
        Self::new(DEFAULT_COOLDOWN)
    }
}

impl CooldownTracker {
    pub fn new(window: Duration) -> Self {
        CooldownTracker {
            window,
            last_fired: HashMap::new(),
        }
    }

    pub fn can_notify(&mut self, key: AlertKey) -> bool {
        self.can_notify_at(key, Instant::now())
    }

    /// True, and records `now`, if `key` has never fired or its last firing
    /// is more than the window ago. Otherwise false and nothing changes.
    pub fn can_notify_at(&mut self, key: AlertKey, now: Instant) -> bool {
        match self.last_fired.get(&key) {
            Some(&last) if now.saturating_duration_since(last) <= self.window => false,
            _ => {
                self.last_fired.insert(key, now);
                true
            }
        }
    }

    pub fn last_fired(&self, key: AlertKey) -> Option<Instant> {
        self.last_fired.get(&key).copied()
    }
}

/// Turns a snapshot into the alerts allowed to fire right now.
///
/// `check` takes `&mut self`, so a single pass over the keys can never
/// interleave with another; share an evaluator across threads only behind
/// a lock.
#[derive(Debug, Default)]
pub struct ThresholdEvaluator {
    cooldown: CooldownTracker,
}

impl ThresholdEvaluator {
    pub fn new(cooldown: CooldownTracker) -> Self {
        ThresholdEvaluator { cooldown }
    }

    pub fn cooldown(&self) -> &CooldownTracker {
        &self.cooldown
    }

    pub fn check(&mut self, snapshot: &Snapshot, thresholds: &ThresholdSet) -> Vec<Alert> {
        self.check_at(snapshot, thresholds, Instant::now())
    }

    /// Evaluates cpu, mem, swap, pressure, lag risk in that order. A key
    /// contributes only when it is over threshold and its cooldown is open.
    pub fn check_at(
        &mut self,
        snapshot: &Snapshot,
        thresholds: &ThresholdSet,
        now: Instant,
    ) -> Vec<Alert> {
        let mut alerts = Vec::new();

        for key in AlertKey::ALL {
            let Some(message) = over_threshold(key, snapshot, thresholds) else {
                continue;
            };
            if !self.cooldown.can_notify_at(key, now) {
                continue;
            }
            tracing::warn!(key = ?key, %message, "{}", key.title());
            alerts.push(Alert::new(key, message));
        }

        alerts
    }
}

/// The alert message when `key` is over threshold in `snapshot`.
fn over_threshold(
    key: AlertKey,
    snapshot: &Snapshot,
    thresholds: &ThresholdSet,
) -> Option<String> {
    // Pressure and lag only count when the platform extension was read.
    let platform = snapshot.platform_memory.as_ref();

    match key {
        AlertKey::Cpu => (thresholds.cpu_status(snapshot.cpu_pct) == Status::High)
            .then(|| format!("CPU at {:.1}%", snapshot.cpu_pct)),
        AlertKey::Mem => (thresholds.mem_status(snapshot.mem_pct) == Status::High)
            .then(|| format!("Memory at {:.1}%", snapshot.mem_pct)),
        AlertKey::Swap => (thresholds.swap_status(snapshot.swap_pct) == Status::High)
            .then(|| format!("Swap at {:.1}%", snapshot.swap_pct)),
        AlertKey::Pressure => (platform.is_some() && snapshot.pressure_level.is_elevated())
            .then(|| format!("Pressure level {}", snapshot.pressure_level.label())),
        AlertKey::LagRisk => {
            let memory = platform.filter(|_| snapshot.lag_risk)?;
            Some(if memory.compression_exceeds_active() {
                "Compressed memory exceeds active memory".to_string()
            } else {
                "Memory pressure is elevated".to_string()
            })
        }
    }
}
