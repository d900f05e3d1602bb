use std::cmp::Ordering;
use std::collections::BTreeSet;
use std::time::Duration;

use serde::Serialize;

use super::host::HostMetrics;

/// Usage at or below this percentage is noise and never ranked.
pub const INCLUSION_FLOOR_PCT: f64 = 0.1;

/// The tagged list is capped independently of the caller's limit.
pub const TAGGED_LIMIT: usize = 3;

/// One-off wait before re-reading the table when the very first pass had
/// no CPU readings to compare against.
pub const CPU_FALLBACK_WAIT: Duration = Duration::from_millis(50);

const INDEXER_SUBSTRINGS: [&str; 7] = [
    "mdworker",
    "mds_stores",
    "mdsync",
    "spotlight",
    "tracker-miner",
    "baloo_file",
    "searchindexer",
];

const GPU_APP_NAMES: [&str; 10] = [
    "windowserver",
    "blender",
    "final cut pro",
    "davinci resolve",
    "obs",
    "unity",
    "xorg",
    "gnome-shell",
    "kwin_wayland",
    "ollama",
];

/// A raw per-process reading from the process table. Values the OS did not
/// provide are `None`.
#[derive(Debug, Clone, PartialEq)]
pub struct ProcessReading {
    pub pid: u32,
    pub name: String,
    pub cpu_pct: Option<f64>,
    pub mem_pct: Option<f64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ProcessTag {
    Gpu,
    Indexer,
}

impl ProcessTag {
    pub fn as_str(self) -> &'static str {
        match self {
            ProcessTag::Gpu => "gpu",
            ProcessTag::Indexer => "indexer",
        }
    }

    fn badge(self) -> &'static str {
        match self {
            ProcessTag::Gpu => "[GPU]",
            ProcessTag::Indexer => "[IDX]",
        }
    }
}

/// Tags are derived from the process name alone.
pub fn derive_tags(name: &str) -> BTreeSet<ProcessTag> {
    let lower = name.to_lowercase();
    let mut tags = BTreeSet::new();
    if lower == "mds" || INDEXER_SUBSTRINGS.iter().any(|s| lower.contains(s)) {
        tags.insert(ProcessTag::Indexer);
    }
    if lower.contains("(gpu)") || GPU_APP_NAMES.contains(&lower.as_str()) {
        tags.insert(ProcessTag::Gpu);
    }
    tags
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProcessSample {
    pub pid: u32,
    pub raw_name: String,
    pub display_name: String,
    pub cpu_pct: f64,
    pub mem_pct: f64,
    pub tags: BTreeSet<ProcessTag>,
}

impl ProcessSample {
    pub fn from_reading(reading: ProcessReading) -> Self {
        let tags = derive_tags(&reading.name);
        let display_name = if tags.is_empty() {
            reading.name.clone()
        } else {
            let badges: Vec<&str> = tags.iter().map(|t| t.badge()).collect();
            format!("{} {}", reading.name, badges.join(" "))
        };
        ProcessSample {
            pid: reading.pid,
            display_name,
            raw_name: reading.name,
            cpu_pct: sanitize(reading.cpu_pct),
            mem_pct: sanitize(reading.mem_pct),
            tags,
        }
    }

    pub fn has_tag(&self, tag: ProcessTag) -> bool {
        self.tags.contains(&tag)
    }
}

fn sanitize(value: Option<f64>) -> f64 {
    value.filter(|v| v.is_finite()).unwrap_or(0.0)
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct RankedProcesses {
    pub top_cpu: Vec<ProcessSample>,
    pub top_mem: Vec<ProcessSample>,
    /// GPU-tagged processes by CPU, at most [`TAGGED_LIMIT`].
    pub tagged: Vec<ProcessSample>,
}

impl RankedProcesses {
    /// Rows a user can pick: the CPU list followed by the memory list.
    pub fn selectable(&self) -> impl Iterator<Item = &ProcessSample> {
        self.top_cpu.iter().chain(&self.top_mem)
    }
}

/// Rank one enumeration of the process table.
///
/// Entries at or below [`INCLUSION_FLOOR_PCT`] are left out of the list for
/// that metric. Sorting is stable, so equal values keep enumeration order;
/// that order is whatever the OS returned and is not part of the contract.
pub fn rank_readings(readings: Vec<ProcessReading>, limit: usize) -> RankedProcesses {
    let samples: Vec<ProcessSample> = readings
        .into_iter()
        .map(ProcessSample::from_reading)
        .collect();

    let top_by = |metric: fn(&ProcessSample) -> f64, only_gpu: bool, cap: usize| {
        let mut picked: Vec<&ProcessSample> = samples
            .iter()
            .filter(|s| metric(s) > INCLUSION_FLOOR_PCT)
            .filter(|s| !only_gpu || s.has_tag(ProcessTag::Gpu))
            .collect();
        picked.sort_by(|a, b| descending(metric(a), metric(b)));
        picked.into_iter().take(cap).cloned().collect::<Vec<_>>()
    };

    RankedProcesses {
        top_cpu: top_by(|s| s.cpu_pct, false, limit),
        top_mem: top_by(|s| s.mem_pct, false, limit),
        tagged: top_by(|s| s.cpu_pct, true, TAGGED_LIMIT),
    }
}

fn descending(a: f64, b: f64) -> Ordering {
    b.total_cmp(&a)
}

/// Produces the ranked lists once per tick from a [`HostMetrics`] source.
#[derive(Debug, Default)]
pub struct ProcessRanker {
    primed: bool,
}

impl ProcessRanker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn rank(&mut self, host: &mut dyn HostMetrics, limit: usize) -> RankedProcesses {
        let Some(table) = host.process_table() else {
            tracing::debug!("process table unavailable");
            return RankedProcesses::default();
        };
        let mut ranked = rank_readings(table, limit);

        // Without a previous reading every CPU value is zero; wait once and retry.
        if ranked.top_cpu.is_empty() && !self.primed {
            tracing::debug!("no CPU readings on first pass, retrying after short wait");
            std::thread::sleep(CPU_FALLBACK_WAIT);
            if let Some(table) = host.process_table() {
                ranked = rank_readings(table, limit);
            }
        }
        self.primed = true;

        if let Some(top) = ranked.top_cpu.first() {
            tracing::debug!(
                name = %top.raw_name,
                pid = top.pid,
                cpu = top.cpu_pct,
                "top cpu process"
            );
        }
        if let Some(top) = ranked.top_mem.first() {
            tracing::debug!(
                name = %top.raw_name,
                pid = top.pid,
                mem = top.mem_pct,
                "top memory process"
            );
        }
        ranked
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum GpuActivity {
    Idle,
    Moderate,
    Heavy,
}

impl GpuActivity {
    /// Heuristic over the summed CPU of the GPU-tagged processes.
    pub fn from_tagged(tagged: &[ProcessSample]) -> Self {
        let total: f64 = tagged
            .iter()
            .filter(|p| p.has_tag(ProcessTag::Gpu))
            .map(|p| p.cpu_pct)
            .sum();
        if total > 50.0 {
            GpuActivity::Heavy
        } else if total > 10.0 {
            GpuActivity::Moderate
        } else {
            GpuActivity::Idle
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            GpuActivity::Idle => "IDLE",
            GpuActivity::Moderate => "MODERATE",
            GpuActivity::Heavy => "HEAVY",
        }
    }
}
