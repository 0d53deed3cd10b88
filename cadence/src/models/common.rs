use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Application name mapped to seconds of foreground use within an interval.
pub type AppSeconds = HashMap<String, u64>;

/// Granularity of a stored memory entry. Informational only — no analyzer
/// treats the types differently.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default, utoipa::ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum MemoryType {
    /// One tracked work interval (the common case).
    #[default]
    Interval,
    /// A whole work session rollup.
    Session,
    /// A day-level rollup.
    Daily,
}

impl std::fmt::Display for MemoryType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Interval => write!(f, "interval"),
            Self::Session => write!(f, "session"),
            Self::Daily => write!(f, "daily"),
        }
    }
}

impl std::str::FromStr for MemoryType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "interval" => Ok(Self::Interval),
            "session" => Ok(Self::Session),
            "daily" => Ok(Self::Daily),
            _ => Err(format!("Unknown memory type: {s}")),
        }
    }
}

/// Pick the application with the highest usage. Ties are broken by the
/// lexicographically smallest name so the result is stable across runs.
pub fn primary_app(usage: &AppSeconds) -> Option<String> {
    usage
        .iter()
        .max_by(|(name_a, secs_a), (name_b, secs_b)| {
            secs_a.cmp(secs_b).then(name_b.cmp(name_a))
        })
        .map(|(name, _)| name.clone())
}
