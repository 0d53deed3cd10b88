//! Statistical pattern analysis over a user's summary history.
//!
//! Four independent sub-analyses run over one chronological history window.
//! Each decides on its own whether it has enough signal to emit an insight;
//! sparse data produces fewer insights, never an error.

use serde_json::json;

use crate::config::InsightsConfig;
use crate::models::{InsightType, MemoryEntry, PatternInsight, TrendDirection};

pub struct PatternAnalyzer {
    config: InsightsConfig,
}

impl PatternAnalyzer {
    pub fn new(config: InsightsConfig) -> Self {
        Self { config }
    }

    /// Run all sub-analyses and return the union of whatever they produced.
    /// Entries without a productivity score contribute only where a score is
    /// not required (app usage time, focus duration).
    pub fn analyze(&self, history: &[MemoryEntry]) -> Vec<PatternInsight> {
        [
            self.time_of_day(history),
            self.trend(history),
            self.app_usage(history),
            self.focus_duration(history),
        ]
        .into_iter()
        .flatten()
        .collect()
    }

    /// Confidence rises with supporting sample count and caps at 1.
    fn confidence(&self, samples: usize) -> f64 {
        let cap = self.config.confidence_cap.max(1);
        samples.min(cap) as f64 / cap as f64
    }

    /// Best hour-of-day by mean score. Ties go to the lowest hour.
    fn time_of_day(&self, history: &[MemoryEntry]) -> Option<PatternInsight> {
        let mut sums = [0.0f64; 24];
        let mut counts = [0usize; 24];

        for entry in history {
            if let Some(score) = entry.productivity_score {
                let hour = entry.time_context.hour.min(23) as usize;
                sums[hour] += score;
                counts[hour] += 1;
            }
        }

        let mut best: Option<(usize, f64)> = None;
        for hour in 0..24 {
            if counts[hour] == 0 {
                continue;
            }
            let mean = sums[hour] / counts[hour] as f64;
            if best.map_or(true, |(_, best_mean)| mean > best_mean) {
                best = Some((hour, mean));
            }
        }

        let (hour, mean) = best?;
        let samples = counts[hour];

        Some(PatternInsight {
            insight_type: InsightType::TimeOfDay,
            insight: format!(
                "You are most productive around {hour}:00 (average score {mean:.0})"
            ),
            confidence: self.confidence(samples),
            data: json!({
                "bestHour": hour,
                "meanScore": mean,
                "sampleCount": samples,
            }),
        })
    }

    /// Compare the mean score of the most recent 7 entries against the 7
    /// before that. Entry-count windows, not calendar weeks.
    fn trend(&self, history: &[MemoryEntry]) -> Option<PatternInsight> {
        let scored: Vec<f64> = history
            .iter()
            .filter_map(|e| e.productivity_score)
            .collect();
        if scored.len() < 7 {
            return None;
        }

        let recent_start = scored.len() - 7;
        let recent = &scored[recent_start..];
        let previous = &scored[recent_start.saturating_sub(7)..recent_start];

        let recent_mean = mean(recent);
        let previous_mean = if previous.is_empty() {
            recent_mean
        } else {
            mean(previous)
        };

        let direction = if recent_mean > previous_mean {
            TrendDirection::Increasing
        } else if recent_mean < previous_mean {
            TrendDirection::Declining
        } else {
            TrendDirection::Stable
        };
        let magnitude = (recent_mean - previous_mean).abs();

        let statement = match direction {
            TrendDirection::Increasing => format!(
                "Your productivity is improving: recent average {recent_mean:.0} vs {previous_mean:.0} before"
            ),
            TrendDirection::Declining => format!(
                "Your productivity has dipped: recent average {recent_mean:.0} vs {previous_mean:.0} before"
            ),
            TrendDirection::Stable => {
                format!("Your productivity is holding steady around {recent_mean:.0}")
            }
        };

        Some(PatternInsight {
            insight_type: InsightType::Trend,
            insight: statement,
            confidence: self.confidence(scored.len()),
            data: json!({
                "recentMean": recent_mean,
                "previousMean": previous_mean,
                "direction": direction,
                "magnitude": magnitude,
            }),
        })
    }

    /// Highest mean score among applications used in at least
    /// `min_app_entries` entries. The floor keeps one lucky session with a
    /// rarely-used app from dominating. Ties go to the first name in
    /// lexicographic order.
    fn app_usage(&self, history: &[MemoryEntry]) -> Option<PatternInsight> {
        let mut per_app: std::collections::BTreeMap<&str, (f64, usize)> = Default::default();

        for entry in history {
            let Some(score) = entry.productivity_score else {
                continue;
            };
            for app in entry.app_context.keys() {
                let slot = per_app.entry(app.as_str()).or_insert((0.0, 0));
                slot.0 += score;
                slot.1 += 1;
            }
        }

        let mut best: Option<(&str, f64, usize)> = None;
        for (&app, &(sum, count)) in &per_app {
            if count < self.config.min_app_entries {
                continue;
            }
            let app_mean = sum / count as f64;
            if best.map_or(true, |(_, best_mean, _)| app_mean > best_mean) {
                best = Some((app, app_mean, count));
            }
        }

        let (app, app_mean, count) = best?;

        Some(PatternInsight {
            insight_type: InsightType::AppUsage,
            insight: format!(
                "You do your best work in {app} (average score {app_mean:.0} across {count} sessions)"
            ),
            confidence: self.confidence(count),
            data: json!({
                "app": app,
                "meanScore": app_mean,
                "entryCount": count,
            }),
        })
    }

    /// Typical length of a high-productivity interval: mean total tracked
    /// app seconds among entries scoring above `high_score_threshold`.
    /// Entries with no usage data at all count as `default_focus_secs`.
    fn focus_duration(&self, history: &[MemoryEntry]) -> Option<PatternInsight> {
        let durations: Vec<f64> = history
            .iter()
            .filter(|e| {
                e.productivity_score
                    .is_some_and(|s| s > self.config.high_score_threshold)
            })
            .map(|e| {
                if e.app_context.is_empty() {
                    self.config.default_focus_secs as f64
                } else {
                    e.total_app_seconds() as f64
                }
            })
            .collect();

        if durations.len() < self.config.min_focus_entries {
            return None;
        }

        let mean_secs = mean(&durations);
        let minutes = mean_secs / 60.0;

        Some(PatternInsight {
            insight_type: InsightType::FocusDuration,
            insight: format!(
                "Your high-productivity sessions average {minutes:.0} minutes of focused work"
            ),
            confidence: self.confidence(durations.len()),
            data: json!({
                "meanSeconds": mean_secs,
                "entryCount": durations.len(),
                "scoreThreshold": self.config.high_score_threshold,
            }),
        })
    }
}

fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}
