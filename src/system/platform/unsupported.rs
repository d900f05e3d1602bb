use super::{NoPlatformData, PlatformMetricsReader};
use crate::system::snapshot::{PlatformMemory, PressureLevel};

/// No memory breakdown or pressure signal is read on this OS.
#[derive(Default)]
pub struct Platform(NoPlatformData);

impl PlatformMetricsReader for Platform {
    fn memory_breakdown(&mut self) -> Option<PlatformMemory> {
        self.0.memory_breakdown()
    }

    fn pressure_level(&mut self) -> PressureLevel {
        self.0.pressure_level()
    }
}
