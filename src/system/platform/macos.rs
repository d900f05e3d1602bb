use std::sync::OnceLock;

use super::PlatformMetricsReader;
use super::command::{COMMAND_TIMEOUT, run_command};
use super::report::{DEFAULT_PAGE_SIZE, parse_page_report, parse_pressure_order};
use crate::system::snapshot::{PlatformMemory, PressureLevel};

static PAGE_SIZE: OnceLock<u64> = OnceLock::new();

/// Page size is fixed for the life of the process, so it is queried once.
fn page_size() -> u64 {
    *PAGE_SIZE.get_or_init(|| {
        run_command("sysctl", &["-n", "hw.pagesize"], COMMAND_TIMEOUT)
            .and_then(|raw| raw.trim().parse().ok())
            .unwrap_or_else(|| {
                tracing::debug!(fallback = DEFAULT_PAGE_SIZE, "hw.pagesize unavailable");
                DEFAULT_PAGE_SIZE
            })
    })
}

/// `vm_stat` for the breakdown, `kern.memorystatus_vm_pressure_level` for
/// the pressure order.
#[derive(Default)]
pub struct Platform;

impl PlatformMetricsReader for Platform {
    fn memory_breakdown(&mut self) -> Option<PlatformMemory> {
        let Some(report) = run_command("vm_stat", &[], COMMAND_TIMEOUT) else {
            tracing::debug!("vm_stat unavailable");
            return None;
        };
        let memory = parse_page_report(&report, page_size());
        if memory.is_none() {
            tracing::debug!("vm_stat output had no recognised fields");
        }
        memory
    }

    fn pressure_level(&mut self) -> PressureLevel {
        run_command(
            "sysctl",
            &["-n", "kern.memorystatus_vm_pressure_level"],
            COMMAND_TIMEOUT,
        )
        .and_then(|raw| parse_pressure_order(&raw))
        .map(PressureLevel::from_order)
        .unwrap_or_else(|| {
            tracing::debug!("memory pressure level unavailable");
            PressureLevel::Unknown
        })
    }
}
