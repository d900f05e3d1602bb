use sysinfo::{MemoryRefreshKind, ProcessRefreshKind, ProcessesToUpdate, System};

use super::process::ProcessReading;

/// Whole-system utilization as read from the OS.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SystemUsage {
    pub cpu_pct: f64,
    pub mem_pct: f64,
    pub swap_pct: f64,
    pub total_memory_bytes: u64,
}

/// The OS metrics / process table capability the engine samples from.
///
/// Both reads are non-blocking and relative to the previous call, so the
/// first CPU figures after construction may be stale or zero.
pub trait HostMetrics {
    /// `None` when the basic counters cannot be read at all.
    fn system_usage(&mut self) -> Option<SystemUsage>;

    /// One enumeration of the live process table. `None` when enumeration
    /// itself is unavailable; processes that vanish or deny access are
    /// simply absent from the list.
    fn process_table(&mut self) -> Option<Vec<ProcessReading>>;
}

pub struct SysinfoHost {
    sys: System,
}

impl Default for SysinfoHost {
    fn default() -> Self {
        Self::new()
    }
}

impl SysinfoHost {
    pub fn new() -> Self {
        let mut sys = System::new();
        sys.refresh_memory();
        sys.refresh_cpu_usage();
        sys.refresh_processes_specifics(
            ProcessesToUpdate::All,
            true,
            ProcessRefreshKind::nothing().with_memory().with_cpu(),
        );
        SysinfoHost { sys }
    }

    pub fn system(&self) -> &System {
        &self.sys
    }
}

fn percent(used: u64, total: u64) -> f64 {
    if total == 0 {
        0.0
    } else {
        used as f64 / total as f64 * 100.0
    }
}

impl HostMetrics for SysinfoHost {
    fn system_usage(&mut self) -> Option<SystemUsage> {
        self.sys.refresh_cpu_usage();
        self.sys
            .refresh_memory_specifics(MemoryRefreshKind::nothing().with_ram().with_swap());

        let total = self.sys.total_memory();
        if total == 0 {
            return None;
        }

        Some(SystemUsage {
            cpu_pct: f64::from(self.sys.global_cpu_usage()),
            mem_pct: percent(self.sys.used_memory(), total),
            swap_pct: percent(self.sys.used_swap(), self.sys.total_swap()),
            total_memory_bytes: total,
        })
    }

    fn process_table(&mut self) -> Option<Vec<ProcessReading>> {
        let _span = tracing::debug_span!("host.process_table").entered();

        self.sys.refresh_processes_specifics(
            ProcessesToUpdate::All,
            true,
            ProcessRefreshKind::nothing().with_memory().with_cpu(),
        );

        let processes = self.sys.processes();
        if processes.is_empty() {
            return None;
        }

        let total = self.sys.total_memory();
        let readings = processes
            .iter()
            .map(|(pid, process)| ProcessReading {
                pid: pid.as_u32(),
                name: process.name().to_string_lossy().to_string(),
                cpu_pct: Some(f64::from(process.cpu_usage())),
                mem_pct: (total > 0).then(|| percent(process.memory(), total)),
            })
            .collect();
        Some(readings)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn percent_guards_zero_total() {
        assert_eq!(percent(10, 0), 0.0);
        assert!((percent(25, 100) - 25.0).abs() < f64::EPSILON);
    }

    #[test]
    fn live_host_reports_memory() {
        let mut host = SysinfoHost::new();
        let usage = host.system_usage().expect("memory counters");
        assert!(usage.total_memory_bytes > 0);
        assert!((0.0..=100.0).contains(&usage.mem_pct));
    }

    #[test]
    fn live_process_table_contains_self() {
        let mut host = SysinfoHost::new();
        let table = host.process_table().expect("process table");
        let me = std::process::id();
        assert!(table.iter().any(|p| p.pid == me));
    }
}
