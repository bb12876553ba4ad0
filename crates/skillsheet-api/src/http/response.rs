//! Envelope response format for all API responses.
//!
//! Every successful response is wrapped in a consistent envelope:
//! ```json
//! {
//!   "data": { ... },
//!   "meta": { "request_id": "...", "timestamp": "...", "response_time_ms": 5 },
//!   "_links": { "self": "..." }
//! }
//! ```
//! Error responses carry the same envelope shape with an `errors` array;
//! they are produced by `AppError` in `http::error`.

use std::collections::HashMap;

use serde::Serialize;

/// Envelope wrapping successful API responses.
#[derive(Debug, Serialize)]
pub struct ApiResponse<T: Serialize> {
    /// The main response payload.
    pub data: T,

    /// Request metadata.
    pub meta: ApiMeta,

    /// HATEOAS-style links for discoverability.
    #[serde(rename = "_links", skip_serializing_if = "HashMap::is_empty")]
    pub links: HashMap<String, String>,
}

/// Metadata included in every response.
#[derive(Debug, Serialize)]
pub struct ApiMeta {
    /// Unique request identifier for tracing.
    pub request_id: String,
    /// ISO-8601 timestamp of the response.
    pub timestamp: String,
    /// Response time in milliseconds.
    pub response_time_ms: u64,
}

impl<T: Serialize> ApiResponse<T> {
    /// Create a success response with data.
    pub fn success(data: T, request_id: String, response_time_ms: u64) -> Self {
        Self {
            data,
            meta: ApiMeta {
                request_id,
                timestamp: chrono::Utc::now().to_rfc3339(),
                response_time_ms,
            },
            links: HashMap::new(),
        }
    }

    /// Add a HATEOAS link.
    pub fn with_link(mut self, rel: &str, href: &str) -> Self {
        self.links.insert(rel.to_string(), href.to_string());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn envelope_serializes_data_meta_and_links() {
        let resp = ApiResponse::success(serde_json::json!({"skill_scale_id": 5}), "req-1".to_string(), 2)
            .with_link("self", "/api/v1/evaluations");

        let value = serde_json::to_value(&resp).unwrap();
        assert_eq!(value["data"]["skill_scale_id"], 5);
        assert_eq!(value["meta"]["request_id"], "req-1");
        assert_eq!(value["_links"]["self"], "/api/v1/evaluations");
    }

    #[test]
    fn empty_links_are_omitted() {
        let resp = ApiResponse::success(1, "req-2".to_string(), 0);
        let value = serde_json::to_value(&resp).unwrap();
        assert!(value.get("_links").is_none());
    }
}
