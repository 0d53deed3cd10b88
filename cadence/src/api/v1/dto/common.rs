//! Shared v1 wire types.

use serde::{Deserialize, Serialize};

use crate::models;

/// Memory granularity on the wire. Mirrors the domain enum but is versioned
/// independently so internal renames never break API clients.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum V1MemoryType {
    Interval,
    Session,
    Daily,
}

impl From<V1MemoryType> for models::MemoryType {
    fn from(t: V1MemoryType) -> Self {
        match t {
            V1MemoryType::Interval => models::MemoryType::Interval,
            V1MemoryType::Session => models::MemoryType::Session,
            V1MemoryType::Daily => models::MemoryType::Daily,
        }
    }
}

impl From<models::MemoryType> for V1MemoryType {
    fn from(t: models::MemoryType) -> Self {
        match t {
            models::MemoryType::Interval => V1MemoryType::Interval,
            models::MemoryType::Session => V1MemoryType::Session,
            models::MemoryType::Daily => V1MemoryType::Daily,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn v1_memory_type_round_trips_through_domain() {
        for t in [
            V1MemoryType::Interval,
            V1MemoryType::Session,
            V1MemoryType::Daily,
        ] {
            let domain: models::MemoryType = t.into();
            let back: V1MemoryType = domain.into();
            assert_eq!(back, t);
        }
    }

    #[test]
    fn v1_memory_type_serializes_snake_case() {
        let json = serde_json::to_value(V1MemoryType::Interval).unwrap();
        assert_eq!(json, "interval");
    }
}
