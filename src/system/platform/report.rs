use crate::system::snapshot::PlatformMemory;

/// Page size assumed when the platform query fails.
pub const DEFAULT_PAGE_SIZE: u64 = 4096;

const BYTES_PER_GIB: f64 = 1024.0 * 1024.0 * 1024.0;

/// PSI `avg10` percentage at or above which a stall class counts.
const PSI_STALL_PCT: f32 = 10.0;

/// Yields `(key, first integer of the value)` for every `key: value` line.
/// Thousands separators and the trailing period `vm_stat` prints are
/// dropped; lines without a colon or a number are skipped.
fn report_fields(report: &str) -> impl Iterator<Item = (&str, u64)> {
    report.lines().filter_map(|line| {
        let (key, value) = line.split_once(':')?;
        let token = value.split_whitespace().next()?;
        let cleaned = token.replace(['.', ','], "");
        let number = cleaned.parse::<u64>().ok()?;
        Some((key.trim().trim_matches('"'), number))
    })
}

/// Parse a page-count report (`vm_stat` layout). Each recognised page count
/// is multiplied by `page_size` and converted to GiB. Returns `None` when
/// not a single recognised key is present.
pub fn parse_page_report(report: &str, page_size: u64) -> Option<PlatformMemory> {
    let to_gb = |pages: u64| (pages as f64 * page_size as f64) / BYTES_PER_GIB;
    let mut memory = PlatformMemory::default();
    let mut matched = false;

    for (key, pages) in report_fields(report) {
        let slot = match key {
            "Pages wired down" => &mut memory.wired_gb,
            "Pages active" => &mut memory.active_gb,
            "Pages occupied by compressor" => &mut memory.compressed_gb,
            "File-backed pages" => &mut memory.cached_gb,
            _ => continue,
        };
        *slot = to_gb(pages);
        matched = true;
    }

    matched.then_some(memory)
}

/// Parse `/proc/meminfo` (values in kB) into the same breakdown:
/// `Unevictable` as wired, `Active`, `Zswap` as compressed and `Cached`.
pub fn parse_meminfo(report: &str) -> Option<PlatformMemory> {
    let kb_to_gb = |kb: u64| (kb as f64 * 1024.0) / BYTES_PER_GIB;
    let mut memory = PlatformMemory::default();
    let mut matched = false;

    for (key, kb) in report_fields(report) {
        let slot = match key {
            "Unevictable" => &mut memory.wired_gb,
            "Active" => &mut memory.active_gb,
            "Zswap" => &mut memory.compressed_gb,
            "Cached" => &mut memory.cached_gb,
            _ => continue,
        };
        *slot = kb_to_gb(kb);
        matched = true;
    }

    matched.then_some(memory)
}

/// The pressure order is a single integer, e.g. the output of
/// `sysctl -n kern.memorystatus_vm_pressure_level`.
pub fn parse_pressure_order(raw: &str) -> Option<u32> {
    raw.split_whitespace().next()?.parse().ok()
}

/// Map `/proc/pressure/memory` onto the same order scale: any `full` stall
/// at the threshold is 2, a `some` stall is 1, otherwise 0. `None` when the
/// file has no `some` line at all.
pub fn parse_psi_order(content: &str) -> Option<u32> {
    let some = psi_avg10(content, "some")?;
    let full = psi_avg10(content, "full").unwrap_or(0.0);

    let order = if full >= PSI_STALL_PCT {
        2
    } else if some >= PSI_STALL_PCT {
        1
    } else {
        0
    };
    Some(order)
}

fn psi_avg10(content: &str, line_prefix: &str) -> Option<f32> {
    let line = content.lines().find(|l| l.starts_with(line_prefix))?;
    line.split_whitespace()
        .find_map(|part| part.strip_prefix("avg10="))
        .and_then(|v| v.parse().ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    const VM_STAT: &str = "\
Mach Virtual Memory Statistics: (page size of 16384 bytes)
Pages free:                                9001.
Pages active:                            262144.
Pages inactive:                          250000.
Pages speculative:                         1200.
Pages wired down:                        131072.
Pages purgeable:                           4000.
\"Translation faults\":                 123456789.
File-backed pages:                        65536.
Anonymous pages:                         300000.
Pages occupied by compressor:            524288.
";

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn page_report_scales_by_page_size() {
        let m = parse_page_report(VM_STAT, 16384).unwrap();
        assert!(approx(m.active_gb, 4.0));
        assert!(approx(m.wired_gb, 2.0));
        assert!(approx(m.compressed_gb, 8.0));
        assert!(approx(m.cached_gb, 1.0));
    }

    #[test]
    fn page_report_with_default_page_size() {
        let m = parse_page_report("Pages active: 262144.", DEFAULT_PAGE_SIZE).unwrap();
        assert!(approx(m.active_gb, 1.0));
        assert!(approx(m.compressed_gb, 0.0));
    }

    #[test]
    fn unparsable_page_report_is_none() {
        assert!(parse_page_report("", 4096).is_none());
        assert!(parse_page_report("garbage\nno colon here\nPages active: lots", 4096).is_none());
    }

    #[test]
    fn meminfo_breakdown() {
        let meminfo = "\
MemTotal:       16777216 kB
MemFree:         1048576 kB
Cached:          2097152 kB
Active:          4194304 kB
Unevictable:       65536 kB
Zswap:            524288 kB
";
        let m = parse_meminfo(meminfo).unwrap();
        assert!(approx(m.cached_gb, 2.0));
        assert!(approx(m.active_gb, 4.0));
        assert!(approx(m.wired_gb, 0.0625));
        assert!(approx(m.compressed_gb, 0.5));
    }

    #[test]
    fn pressure_order_parsing() {
        assert_eq!(parse_pressure_order("1\n"), Some(1));
        assert_eq!(parse_pressure_order(" 4 "), Some(4));
        assert_eq!(parse_pressure_order("n/a"), None);
        assert_eq!(parse_pressure_order(""), None);
    }

    #[test]
    fn psi_order_levels() {
        let calm = "some avg10=0.50 avg60=0.20 avg300=0.10 total=1000\n\
                    full avg10=0.00 avg60=0.00 avg300=0.00 total=10";
        let some = "some avg10=12.00 avg60=3.00 avg300=1.00 total=1000\n\
                    full avg10=2.00 avg60=0.00 avg300=0.00 total=10";
        let full = "some avg10=40.00 avg60=30.00 avg300=10.00 total=1000\n\
                    full avg10=10.00 avg60=8.00 avg300=2.00 total=900";
        assert_eq!(parse_psi_order(calm), Some(0));
        assert_eq!(parse_psi_order(some), Some(1));
        assert_eq!(parse_psi_order(full), Some(2));
        assert_eq!(parse_psi_order("not psi"), None);
    }
}
