//! End-to-end tests for the memory engine: store, retrieve, analyze.
//!
//! These drive the service layer against an in-memory database with a
//! deterministic embedder, the way the summary pipeline and dashboard use it.

mod common;

use std::sync::Arc;

use chrono::{Datelike, Duration, Utc};

use cadence::db::MemoryStore;
use cadence::models::{
    AppSeconds, InsightType, MemoryDraft, MemoryEntry, MemoryType, TimeContext, TrendDirection,
};
use cadence::services::{InsightService, MemoryService};

use common::{test_backend, test_config, HashEmbedder};

fn services(
    db: Arc<dyn cadence::db::DatabaseBackend>,
) -> (MemoryService, InsightService) {
    let config = test_config(vec![]);
    let memory = MemoryService::new(
        db.clone(),
        Arc::new(HashEmbedder::new()),
        config.insights.clone(),
        config.embeddings.max_input_chars,
    );
    let insights = InsightService::new(db, config.insights);
    (memory, insights)
}

fn draft(user_id: &str, text: &str, score: Option<f64>, apps: &[(&str, u64)]) -> MemoryDraft {
    let mut app_context = AppSeconds::new();
    for (name, secs) in apps {
        app_context.insert(name.to_string(), *secs);
    }
    MemoryDraft {
        user_id: user_id.to_string(),
        session_id: None,
        summary_text: text.to_string(),
        memory_type: MemoryType::Interval,
        productivity_score: score,
        app_context,
    }
}

#[tokio::test]
async fn store_then_history_preserves_the_entry() {
    let db = test_backend().await;
    let (memory, _) = services(db.clone());

    let stored = memory
        .store_memory(draft(
            "user_1",
            "Wrote the incident postmortem and completed the followup tickets",
            Some(77.0),
            &[("editor", 2100), ("browser", 500)],
        ))
        .await
        .unwrap();

    let since = Utc::now() - Duration::days(1);
    let history = db.get_history_since("user_1", since).await.unwrap();

    assert_eq!(history.len(), 1);
    let fetched = &history[0];
    assert_eq!(fetched.id, stored.id);
    assert_eq!(
        fetched.summary_text,
        "Wrote the incident postmortem and completed the followup tickets"
    );
    assert_eq!(fetched.productivity_score, Some(77.0));
    assert_eq!(fetched.primary_app.as_deref(), Some("editor"));
    assert_eq!(fetched.time_context.hour, stored.time_context.hour);
}

#[tokio::test]
async fn retrieval_is_ranked_and_isolated() {
    let db = test_backend().await;
    let (memory, _) = services(db.clone());

    memory
        .store_memory(draft(
            "user_1",
            "Debugged the payment webhook retry loop",
            Some(80.0),
            &[],
        ))
        .await
        .unwrap();
    memory
        .store_memory(draft(
            "user_1",
            "Debugged the payment webhook retry loop again today",
            Some(75.0),
            &[],
        ))
        .await
        .unwrap();
    memory
        .store_memory(draft(
            "user_2",
            "Debugged the payment webhook retry loop",
            Some(70.0),
            &[],
        ))
        .await
        .unwrap();

    let hits = memory
        .retrieve_context("Debugged the payment webhook retry loop", "user_1", None)
        .await;

    assert!(!hits.is_empty());
    // Never another user's entries.
    assert!(hits.iter().all(|h| h.entry.user_id == "user_1"));
    // Monotonically non-increasing similarity.
    for pair in hits.windows(2) {
        assert!(pair[0].similarity >= pair[1].similarity);
    }
    // The exact-match text ranks first with similarity ~1.
    assert!(hits[0].similarity > 0.99);
    assert_eq!(
        hits[0].entry.summary_text,
        "Debugged the payment webhook retry loop"
    );
}

#[tokio::test]
async fn retrieval_threshold_filters_unrelated_history() {
    let db = test_backend().await;
    let (memory, _) = services(db.clone());

    memory
        .store_memory(draft(
            "user_1",
            "quarterly budget spreadsheet review",
            Some(60.0),
            &[],
        ))
        .await
        .unwrap();

    let hits = memory
        .retrieve_context("zxqv wbnm plkj dfgh", "user_1", None)
        .await;
    assert!(hits.is_empty());
}

#[tokio::test]
async fn rich_history_produces_all_four_insights() {
    let db = test_backend().await;
    let (memory, insights) = services(db.clone());

    for i in 0..14 {
        let score = if i % 2 == 0 { 88.0 } else { 68.0 };
        memory
            .store_memory(draft(
                "user_1",
                &format!("Session {i}: worked through the migration backlog"),
                Some(score),
                &[("editor", 2400), ("terminal", 600)],
            ))
            .await
            .unwrap();
    }

    let result = insights.get_insights("user_1", None).await.unwrap();
    let types: Vec<InsightType> = result.iter().map(|i| i.insight_type).collect();

    assert!(types.contains(&InsightType::TimeOfDay));
    assert!(types.contains(&InsightType::Trend));
    assert!(types.contains(&InsightType::AppUsage));
    assert!(types.contains(&InsightType::FocusDuration));

    for insight in &result {
        assert!(insight.confidence > 0.0 && insight.confidence <= 1.0);
        assert!(!insight.insight.is_empty());
    }
}

#[tokio::test]
async fn empty_history_yields_no_insights_and_no_trend() {
    let db = test_backend().await;
    let (_, insights) = services(db);

    assert!(insights.get_insights("user_1", None).await.unwrap().is_empty());
    assert!(insights.get_trend("user_1", None).await.unwrap().is_none());
}

#[tokio::test]
async fn trend_compares_calendar_weeks() {
    let db = test_backend().await;

    // Seed directly so entries land in known ISO weeks: `dow + 3` days ago is
    // always the previous week, today is always the current one.
    let dow = Utc::now().weekday().num_days_from_monday() as i64;
    for (days_ago, score) in [(dow + 3, 60.0), (dow + 3, 64.0), (0, 70.0), (0, 72.0)] {
        let at = Utc::now() - Duration::days(days_ago);
        let mut entry = MemoryEntry::new(
            nanoid::nanoid!(),
            "user_1".to_string(),
            "seeded summary".to_string(),
        );
        entry.created_at = at;
        entry.time_context = TimeContext::from_datetime(at);
        entry.productivity_score = Some(score);
        db.create_entry(&entry, &[1.0, 0.0, 0.0]).await.unwrap();
    }

    let (_, insights) = services(db);
    let report = insights.get_trend("user_1", None).await.unwrap().unwrap();

    assert_eq!(report.previous, 62.0);
    assert_eq!(report.current, 71.0);
    assert_eq!(report.direction, TrendDirection::Increasing);
    assert!((report.percentage - (9.0 / 62.0 * 100.0)).abs() < 1e-9);
    assert_eq!(report.weeks.len(), 2);
}

#[tokio::test]
async fn appended_corrections_extend_history_without_rewriting_it() {
    let db = test_backend().await;
    let (memory, _) = services(db.clone());

    let first = memory
        .store_memory(draft("user_1", "Initial recollection", Some(50.0), &[]))
        .await
        .unwrap();
    let correction = memory
        .store_memory(draft(
            "user_1",
            "Corrected recollection of the same interval",
            Some(55.0),
            &[],
        ))
        .await
        .unwrap();

    let since = Utc::now() - Duration::days(1);
    let history = db.get_history_since("user_1", since).await.unwrap();

    // Both rows exist, chronological, first one untouched.
    assert_eq!(history.len(), 2);
    assert_eq!(history[0].id, first.id);
    assert_eq!(history[0].summary_text, "Initial recollection");
    assert_eq!(history[1].id, correction.id);
}
