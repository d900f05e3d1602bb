mod command;
mod report;

#[cfg(target_os = "linux")]
mod linux;
#[cfg(target_os = "macos")]
mod macos;
#[cfg(not(any(target_os = "linux", target_os = "macos")))]
mod unsupported;

#[cfg(target_os = "linux")]
use linux as platform_impl;
#[cfg(target_os = "macos")]
use macos as platform_impl;
#[cfg(not(any(target_os = "linux", target_os = "macos")))]
use unsupported as platform_impl;

pub use command::{COMMAND_TIMEOUT, run_command};
pub use report::{
    DEFAULT_PAGE_SIZE, parse_meminfo, parse_page_report, parse_pressure_order, parse_psi_order,
};

use crate::system::snapshot::{PlatformMemory, PressureLevel};

/// Source of the platform-specific readings that sit on top of the portable
/// CPU/memory/swap numbers. Every method degrades instead of failing: a
/// reader that cannot answer returns `None` or `PressureLevel::Unknown`.
pub trait PlatformMetricsReader {
    fn memory_breakdown(&mut self) -> Option<PlatformMemory>;
    fn pressure_level(&mut self) -> PressureLevel;
}

/// Reader for the OS this binary was built for.
pub fn native_reader() -> Box<dyn PlatformMetricsReader + Send> {
    Box::new(platform_impl::Platform::default())
}

/// Reader for hosts with no platform extension at all.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoPlatformData;

impl PlatformMetricsReader for NoPlatformData {
    fn memory_breakdown(&mut self) -> Option<PlatformMemory> {
        None
    }

    fn pressure_level(&mut self) -> PressureLevel {
        PressureLevel::Unknown
    }
}
