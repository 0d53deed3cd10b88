//! Search request/response DTOs for the v1 API.

use serde::{Deserialize, Serialize};

use super::memories::MemoryResponse;
use crate::models;

/// Request body for `POST /v1/search`.
#[derive(Debug, Clone, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SearchRequest {
    /// Free-text query to embed and match against stored summaries.
    pub q: String,
    /// User whose memories are searched. Results never cross users.
    pub user_id: String,
    /// Maximum results (default 5).
    pub limit: Option<u32>,
}

/// One retrieved memory with its similarity to the query.
#[derive(Debug, Clone, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SearchResultItem {
    pub memory: MemoryResponse,
    /// Cosine similarity clamped to `[0, 1]`.
    pub similarity: f32,
}

impl From<models::MemorySearchHit> for SearchResultItem {
    fn from(hit: models::MemorySearchHit) -> Self {
        Self {
            memory: hit.entry.into(),
            similarity: hit.similarity,
        }
    }
}

/// Search response wrapper. An empty `results` list is the normal outcome
/// for a user with no sufficiently similar history.
#[derive(Debug, Clone, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SearchResponse {
    pub results: Vec<SearchResultItem>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn search_request_deserializes() {
        let json = r#"{"q": "billing work", "userId": "user_1", "limit": 3}"#;
        let req: SearchRequest = serde_json::from_str(json).expect("deserialize");
        assert_eq!(req.q, "billing work");
        assert_eq!(req.user_id, "user_1");
        assert_eq!(req.limit, Some(3));
    }

    #[test]
    fn search_result_item_from_hit() {
        let entry = models::MemoryEntry::new(
            "m1".to_string(),
            "user_1".to_string(),
            "summary".to_string(),
        );
        let item = SearchResultItem::from(models::MemorySearchHit {
            entry,
            similarity: 0.91,
        });
        assert_eq!(item.memory.memory_id, "m1");
        assert_eq!(item.similarity, 0.91);
    }
}
