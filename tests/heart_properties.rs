//! Property tests for the heart tier calculation
//!
//! Invariants that should hold for every hit point snapshot:
//! - Slot count: total == ceil((max + temp_max) / unit)
//! - Boundary: at most one pulsing heart, only when partially filled
//! - Regions: red is a prefix, yellow is a suffix
//! - Idempotence: same input, same output
//!
//! Each region property also runs over fractional hit points, where any
//! remainder occupies a full extra slot.

use heart_containers::{HitPoints, UnitSize, compute};
use proptest::prelude::*;

fn ceil_div(amount: u32, unit: u32) -> usize {
    amount.div_ceil(unit) as usize
}

fn ceil_slots(amount: f64, unit: u32) -> usize {
    (amount / unit as f64).ceil() as usize
}

/// Hit points with up to two decimal places
fn fractional(max_whole: u32) -> impl Strategy<Value = f64> {
    (0..max_whole * 100).prop_map(|n| n as f64 / 100.0)
}

proptest! {
    #[test]
    fn prop_total_slots(value in 0u32..500, max in 0u32..500, temp_max in 0u32..200, unit in 1u32..=100) {
        let hp = HitPoints::new(value as f64, max as f64).with_temp(0.0, temp_max as f64);
        let row = compute(&hp, UnitSize::from(unit));
        prop_assert_eq!(row.total(), ceil_div(max + temp_max, unit));
    }

    #[test]
    fn prop_slots_before_boundary_are_full(value in 0u32..500, max in 0u32..500, unit in 1u32..=100) {
        let hp = HitPoints::new(value as f64, max as f64);
        let row = compute(&hp, UnitSize::from(unit));
        let filled = ceil_div(value, unit);
        for heart in row.hearts.iter().take(filled.saturating_sub(1)) {
            prop_assert!(!heart.is_empty);
            prop_assert!(!heart.pulse);
        }
        for heart in row.hearts.iter().skip(filled) {
            prop_assert!(heart.is_empty);
            prop_assert!(!heart.pulse);
        }
    }

    #[test]
    fn prop_single_pulse_at_boundary(value in 0u32..500, extra in 0u32..500, unit in 1u32..=100) {
        let max = value + extra;
        let row = compute(&HitPoints::new(value as f64, max as f64), UnitSize::from(unit));
        let pulsing: Vec<usize> = row
            .hearts
            .iter()
            .enumerate()
            .filter(|(_, h)| h.pulse)
            .map(|(i, _)| i + 1)
            .collect();

        if value == 0 || value % unit == 0 {
            prop_assert!(pulsing.is_empty());
        } else {
            prop_assert_eq!(pulsing, vec![ceil_div(value, unit)]);
        }
    }

    #[test]
    fn prop_red_prefix(value in 0u32..500, max in 0u32..500, temp_max in 0u32..200, unit in 1u32..=100) {
        let hp = HitPoints::new(value as f64, max as f64).with_temp(0.0, temp_max as f64);
        let row = compute(&hp, UnitSize::from(unit));
        let red = ceil_div(value.min(max), unit).min(row.total());
        for (i, heart) in row.hearts.iter().enumerate() {
            prop_assert_eq!(heart.is_red, i < red);
        }
    }

    #[test]
    fn prop_yellow_suffix(value in 0u32..500, max in 0u32..500, temp_max in 0u32..200, unit in 1u32..=100) {
        let hp = HitPoints::new(value as f64, max as f64).with_temp(0.0, temp_max as f64);
        let row = compute(&hp, UnitSize::from(unit));
        let yellow = ceil_div(temp_max, unit);
        let start = row.total().saturating_sub(yellow);
        for (i, heart) in row.hearts.iter().enumerate() {
            prop_assert_eq!(heart.is_yellow, i >= start);
        }
    }

    #[test]
    fn prop_temp_icons(temp in 0u32..300, unit in 1u32..=100) {
        let hp = HitPoints::new(10.0, 10.0).with_temp(temp as f64, 0.0);
        let row = compute(&hp, UnitSize::from(unit));
        prop_assert_eq!(row.temp_hearts.len(), ceil_div(temp, unit));
    }

    #[test]
    fn prop_idempotent(value in 0.0f64..500.0, max in 0.0f64..500.0, temp in 0.0f64..100.0, temp_max in 0.0f64..100.0, unit in -10.0f64..100.0) {
        let hp = HitPoints::new(value, max).with_temp(temp, temp_max);
        prop_assert_eq!(compute(&hp, UnitSize::new(unit)), compute(&hp, UnitSize::new(unit)));
    }

    #[test]
    fn prop_fractional_total_rounds_up(max in fractional(500), temp_max in fractional(200), unit in 1u32..=100) {
        let hp = HitPoints::new(0.0, max).with_temp(0.0, temp_max);
        let row = compute(&hp, UnitSize::from(unit));
        prop_assert_eq!(row.total(), ceil_slots(max + temp_max, unit));
    }

    #[test]
    fn prop_fractional_pulse(value in fractional(500), extra in fractional(500), unit in 1u32..=100) {
        let row = compute(&HitPoints::new(value, value + extra), UnitSize::from(unit));
        let pulsing: Vec<usize> = row
            .hearts
            .iter()
            .enumerate()
            .filter(|(_, h)| h.pulse)
            .map(|(i, _)| i + 1)
            .collect();

        if value == 0.0 || value % unit as f64 == 0.0 {
            prop_assert!(pulsing.is_empty());
        } else {
            prop_assert_eq!(pulsing, vec![ceil_slots(value, unit)]);
        }
    }

    #[test]
    fn prop_fractional_red_prefix(value in fractional(500), max in fractional(500), temp_max in fractional(200), unit in 1u32..=100) {
        let hp = HitPoints::new(value, max).with_temp(0.0, temp_max);
        let row = compute(&hp, UnitSize::from(unit));
        let red = ceil_slots(value.min(max), unit);
        for (i, heart) in row.hearts.iter().enumerate() {
            prop_assert_eq!(heart.is_red, i < red);
        }
    }

    #[test]
    fn prop_fractional_yellow_suffix(value in fractional(500), max in fractional(500), temp_max in fractional(200), unit in 1u32..=100) {
        let hp = HitPoints::new(value, max).with_temp(0.0, temp_max);
        let row = compute(&hp, UnitSize::from(unit));
        let start = row.total().saturating_sub(ceil_slots(temp_max, unit));
        for (i, heart) in row.hearts.iter().enumerate() {
            prop_assert_eq!(heart.is_yellow, i >= start);
        }
    }

    #[test]
    fn prop_fractional_temp_icons(temp in fractional(300), unit in 1u32..=100) {
        let hp = HitPoints::new(10.0, 10.0).with_temp(temp, 0.0);
        let row = compute(&hp, UnitSize::from(unit));
        prop_assert_eq!(row.temp_hearts.len(), ceil_slots(temp, unit));
    }
}
