use monarx::alert::{Status, ThresholdSet, classify};
use monarx::system::process::{INCLUSION_FLOOR_PCT, ProcessReading, TAGGED_LIMIT, rank_readings};
use proptest::prelude::*;

fn make_readings(values: &[(f64, f64)]) -> Vec<ProcessReading> {
    values
        .iter()
        .enumerate()
        .map(|(i, &(cpu, mem))| ProcessReading {
            pid: i as u32 + 1,
            name: if i % 3 == 0 {
                "blender".to_string()
            } else {
                format!("p{i}")
            },
            cpu_pct: Some(cpu),
            mem_pct: Some(mem),
        })
        .collect()
}

proptest! {
    #[test]
    fn below_warn_line_is_ok(
        t in 0.0f64..1.0,
        limit in 1u32..=100,
        factor in 0.01f64..=1.0,
    ) {
        let limit = f64::from(limit);
        let value = t * limit * factor;
        prop_assume!(value < limit * factor);
        prop_assert_eq!(classify(value, limit, factor), Status::Ok);
    }

    #[test]
    fn between_warn_line_and_limit_is_warn(
        t in 0.0f64..1.0,
        limit in 1u32..=100,
        factor in 0.01f64..1.0,
    ) {
        let limit = f64::from(limit);
        let warn_line = limit * factor;
        let value = warn_line + t * (limit - warn_line);
        prop_assume!(value >= warn_line && value < limit);
        prop_assert_eq!(classify(value, limit, factor), Status::Warn);
    }

    #[test]
    fn at_or_above_limit_is_high(
        t in 0.0f64..=1.0,
        limit in 1u32..=100,
        factor in 0.01f64..=1.0,
    ) {
        let limit = f64::from(limit);
        let value = limit + t * (100.0 - limit);
        prop_assert_eq!(classify(value, limit, factor), Status::High);
    }

    #[test]
    fn warn_line_itself_is_warn(
        limit in 2u32..=100,
        factor in 0.01f64..1.0,
    ) {
        let limit = f64::from(limit);
        prop_assume!(limit * factor < limit);
        prop_assert_eq!(classify(limit * factor, limit, factor), Status::Warn);
    }

    #[test]
    fn classify_is_monotonic_in_value(
        a in 0.0f64..=100.0,
        b in 0.0f64..=100.0,
        limit in 1u32..=100,
    ) {
        let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
        let limit = f64::from(limit);
        prop_assert!(classify(lo, limit, 0.85) <= classify(hi, limit, 0.85));
    }

    #[test]
    fn threshold_set_always_in_range(
        cpu in any::<i64>(),
        mem in any::<i64>(),
        swap in any::<i64>(),
        factor in -2.0f64..2.0,
    ) {
        let t = ThresholdSet::new(cpu, mem, swap, factor);
        for limit in [t.cpu_limit, t.mem_limit, t.swap_limit] {
            prop_assert!((1..=100).contains(&limit));
        }
        prop_assert!(t.warn_factor > 0.0 && t.warn_factor <= 1.0);
    }

    #[test]
    fn ranked_lists_are_sorted_bounded_and_above_floor(
        values in prop::collection::vec((0.0f64..100.0, 0.0f64..100.0), 0..200),
        limit in 0usize..12,
    ) {
        let ranked = rank_readings(make_readings(&values), limit);

        prop_assert!(ranked.top_cpu.len() <= limit);
        prop_assert!(ranked.top_mem.len() <= limit);
        prop_assert!(ranked.tagged.len() <= TAGGED_LIMIT);

        for pair in ranked.top_cpu.windows(2) {
            prop_assert!(pair[0].cpu_pct >= pair[1].cpu_pct);
        }
        for pair in ranked.top_mem.windows(2) {
            prop_assert!(pair[0].mem_pct >= pair[1].mem_pct);
        }
        prop_assert!(ranked.top_cpu.iter().all(|p| p.cpu_pct > INCLUSION_FLOOR_PCT));
        prop_assert!(ranked.top_mem.iter().all(|p| p.mem_pct > INCLUSION_FLOOR_PCT));
        prop_assert!(ranked.tagged.iter().all(|p| p.raw_name == "blender"));
    }
}
