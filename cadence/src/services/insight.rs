use std::sync::Arc;

use chrono::{Duration, Utc};

use crate::config::InsightsConfig;
use crate::db::DatabaseBackend;
use crate::error::Result;
use crate::intelligence::{PatternAnalyzer, TrendCalculator};
use crate::models::{PatternInsight, TrendReport};

/// Derived analytics over a user's history window. Insights are recomputed
/// from the store on every request; nothing here is cached or persisted.
pub struct InsightService {
    db: Arc<dyn DatabaseBackend>,
    analyzer: PatternAnalyzer,
    trend: TrendCalculator,
    insights: InsightsConfig,
}

impl InsightService {
    pub fn new(db: Arc<dyn DatabaseBackend>, insights: InsightsConfig) -> Self {
        let analyzer = PatternAnalyzer::new(insights.clone());
        let trend = TrendCalculator::new(insights.trend_dead_zone);
        Self {
            db,
            analyzer,
            trend,
            insights,
        }
    }

    /// Pattern insights over the last `days` (default 30). Sparse history
    /// produces fewer insights; no history produces none. Never fails on
    /// missing data.
    pub async fn get_insights(
        &self,
        user_id: &str,
        days: Option<u32>,
    ) -> Result<Vec<PatternInsight>> {
        let days = days.unwrap_or(self.insights.insight_window_days);
        let history = self.fetch_window(user_id, days).await?;
        Ok(self.analyzer.analyze(&history))
    }

    /// Week-over-week trend report over the last `days` (default 14), or
    /// `None` when the window holds no scored entries.
    pub async fn get_trend(&self, user_id: &str, days: Option<u32>) -> Result<Option<TrendReport>> {
        let days = days.unwrap_or(self.insights.trend_window_days);
        let history = self.fetch_window(user_id, days).await?;
        Ok(self.trend.compute(&history))
    }

    async fn fetch_window(&self, user_id: &str, days: u32) -> Result<Vec<crate::models::MemoryEntry>> {
        let since = Utc::now() - Duration::days(days as i64);
        self.db.get_history_since(user_id, since).await
    }
}
