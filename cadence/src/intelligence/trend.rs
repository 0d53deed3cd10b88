//! Week-over-week productivity trend.
//!
//! Entries are grouped by ISO week (`2026-W23` style keys), which stays
//! unambiguous at month boundaries. The comparison carries a dead zone so a
//! point or two of noise does not flip the reported direction between
//! dashboard loads.

use chrono::Datelike;

use crate::models::{MemoryEntry, TrendDirection, TrendReport, WeekBucket};

pub struct TrendCalculator {
    dead_zone: f64,
}

impl TrendCalculator {
    pub fn new(dead_zone: f64) -> Self {
        Self { dead_zone }
    }

    /// Compare the latest week's mean score against the week before it.
    ///
    /// Returns `None` when the window holds no scored entries at all.
    /// `history` must be in chronological order (as `get_history_since`
    /// returns it).
    pub fn compute(&self, history: &[MemoryEntry]) -> Option<TrendReport> {
        let buckets = week_buckets(history);
        let current = buckets.last()?.mean;
        let previous = if buckets.len() >= 2 {
            buckets[buckets.len() - 2].mean
        } else {
            current
        };

        let difference = current - previous;
        let direction = if difference > self.dead_zone {
            TrendDirection::Increasing
        } else if difference < -self.dead_zone {
            TrendDirection::Declining
        } else {
            TrendDirection::Stable
        };

        let percentage = if previous == 0.0 {
            0.0
        } else {
            difference.abs() / previous * 100.0
        };

        Some(TrendReport {
            current,
            previous,
            direction,
            percentage,
            weeks: buckets,
        })
    }
}

/// Group chronological entries into ISO-week buckets of mean score.
/// Entries without a score are skipped.
fn week_buckets(history: &[MemoryEntry]) -> Vec<WeekBucket> {
    let mut buckets: Vec<(String, f64, usize)> = Vec::new();

    for entry in history {
        let Some(score) = entry.productivity_score else {
            continue;
        };
        let iso = entry.created_at.iso_week();
        let key = format!("{}-W{:02}", iso.year(), iso.week());

        match buckets.last_mut() {
            Some((last_key, sum, count)) if *last_key == key => {
                *sum += score;
                *count += 1;
            }
            _ => buckets.push((key, score, 1)),
        }
    }

    buckets
        .into_iter()
        .map(|(week, sum, count)| WeekBucket {
            week,
            mean: sum / count as f64,
        })
        .collect()
}
