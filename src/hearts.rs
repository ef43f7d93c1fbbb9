//! Heart tier calculation
//!
//! Maps a hit point snapshot onto a row of heart slots. This module must stay
//! pure: no settings lookups, no logging side effects beyond diagnostics, and
//! identical output for identical input.

use serde::{Deserialize, Serialize};

use crate::consts::{DEFAULT_UNIT_SIZE, MAX_HEARTS};

/// Hit point values read off a character
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct HitPoints {
    pub value: f64,
    pub max: f64,
    /// Temporary hit points (separate overlay row)
    pub temp: f64,
    /// Temporary bonus to maximum hit points (trailing yellow slots)
    pub temp_max: f64,
}

impl HitPoints {
    pub fn new(value: f64, max: f64) -> Self {
        Self {
            value,
            max,
            temp: 0.0,
            temp_max: 0.0,
        }
    }

    pub fn with_temp(mut self, temp: f64, temp_max: f64) -> Self {
        self.temp = temp;
        self.temp_max = temp_max;
        self
    }
}

/// Hit points represented by one heart
///
/// Always finite and strictly positive. Anything else collapses to
/// [`DEFAULT_UNIT_SIZE`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct UnitSize(f64);

impl UnitSize {
    pub fn new(size: f64) -> Self {
        if size.is_finite() && size > 0.0 {
            Self(size)
        } else {
            log::debug!("Unit size {} is not positive, using {}", size, DEFAULT_UNIT_SIZE);
            Self(DEFAULT_UNIT_SIZE as f64)
        }
    }

    pub fn get(&self) -> f64 {
        self.0
    }

    /// Number of slots needed to hold `amount` hit points, capped at [`MAX_HEARTS`]
    #[inline]
    pub fn slots(&self, amount: f64) -> usize {
        if amount.is_nan() || amount <= 0.0 {
            return 0;
        }
        let slots = (amount / self.0).ceil();
        if slots >= MAX_HEARTS as f64 {
            MAX_HEARTS
        } else {
            slots as usize
        }
    }

    /// True when `amount` fits in the row without hitting the cap
    #[inline]
    fn fits(&self, amount: f64) -> bool {
        amount / self.0 <= MAX_HEARTS as f64
    }
}

impl Default for UnitSize {
    fn default() -> Self {
        Self(DEFAULT_UNIT_SIZE as f64)
    }
}

impl From<u32> for UnitSize {
    fn from(size: u32) -> Self {
        Self::new(size as f64)
    }
}

/// Classification of a single heart slot
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Heart {
    /// Slot lies beyond current hit points
    pub is_empty: bool,
    /// Slot lies in the temporary max region
    pub is_yellow: bool,
    /// Slot lies in the capped current hit point region
    pub is_red: bool,
    /// Partially filled boundary slot
    pub pulse: bool,
}

/// Color tier after resolving facet priority
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tier {
    Yellow,
    Red,
    Neutral,
}

impl Tier {
    pub fn as_str(&self) -> &'static str {
        match self {
            Tier::Yellow => "yellow",
            Tier::Red => "red",
            Tier::Neutral => "neutral",
        }
    }
}

impl Heart {
    /// Yellow beats red beats neutral
    pub fn tier(&self) -> Tier {
        if self.is_yellow {
            Tier::Yellow
        } else if self.is_red {
            Tier::Red
        } else {
            Tier::Neutral
        }
    }
}

/// One temporary hit point icon
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct TempHeart;

/// Full output of one calculation
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HeartRow {
    pub hearts: Vec<Heart>,
    pub temp_hearts: Vec<TempHeart>,
}

impl HeartRow {
    pub fn total(&self) -> usize {
        self.hearts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.hearts.is_empty() && self.temp_hearts.is_empty()
    }
}

/// Compute the heart row for a snapshot
pub fn compute(hp: &HitPoints, unit: UnitSize) -> HeartRow {
    let capacity = hp.max.max(0.0) + hp.temp_max.max(0.0);
    let total = unit.slots(capacity);
    let filled = unit.slots(hp.value);
    // A capped row has no meaningful boundary heart
    let partial = hp.value > 0.0 && unit.fits(hp.value) && hp.value % unit.get() != 0.0;
    let yellow_from = total.saturating_sub(unit.slots(hp.temp_max));
    let red_until = unit.slots(hp.value.min(hp.max));
    if !unit.fits(capacity) {
        log::warn!("Hit points exceed {} hearts, row truncated", MAX_HEARTS);
    }

    let hearts = (1..=total)
        .map(|i| {
            let is_empty = i > filled;
            Heart {
                is_empty,
                is_yellow: i > yellow_from,
                is_red: i <= red_until,
                pulse: !is_empty && i + 1 > filled && partial,
            }
        })
        .collect();

    HeartRow {
        hearts,
        temp_hearts: vec![TempHeart; unit.slots(hp.temp)],
    }
}
