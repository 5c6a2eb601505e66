use serde::{Deserialize, Serialize};

/// `{limit, continue}` query parameters accepted by every list endpoint.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ListParams {
    #[serde(default)]
    pub limit: usize,
    #[serde(default, rename = "continue")]
    pub continue_token: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct ListMetadata {
    #[serde(rename = "continue", skip_serializing_if = "Option::is_none")]
    pub continue_token: Option<String>,
    #[serde(rename = "remainingItemCount", skip_serializing_if = "Option::is_none")]
    pub remaining_item_count: Option<u64>,
}

/// The Kubernetes-style envelope every list endpoint wraps its items in.
/// Single-resource endpoints return the bare domain struct instead.
#[derive(Debug, Clone, Serialize)]
pub struct List<T> {
    pub kind: String,
    #[serde(rename = "apiVersion")]
    pub api_version: String,
    pub metadata: ListMetadata,
    pub items: Vec<T>,
}

impl<T> List<T> {
    pub fn new(kind: &str, page: opamp_core::ports::Page<T>) -> Self {
        Self {
            kind: kind.to_string(),
            api_version: "opampcommander.newrelic.com/v1".to_string(),
            metadata: ListMetadata {
                continue_token: page.next_continue,
                remaining_item_count: page.remaining_item_count,
            },
            items: page.items,
        }
    }

    pub fn unpaginated(kind: &str, items: Vec<T>) -> Self {
        Self {
            kind: kind.to_string(),
            api_version: "opampcommander.newrelic.com/v1".to_string(),
            metadata: ListMetadata::default(),
            items,
        }
    }
}
