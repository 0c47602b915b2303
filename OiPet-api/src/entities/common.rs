use serde::{Deserialize, Serialize};

/// Envelope around every `/api` response body
#[derive(Debug, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    pub success: bool,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,

    /// Human-readable message
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,

    /// Short machine-readable error label
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl<T> ApiResponse<T> {
    /// Successful response carrying `data`
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            message: None,
            error: None,
        }
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }
}

impl ApiResponse<()> {
    /// Successful response with only a message
    pub fn acknowledged(message: impl Into<String>) -> Self {
        Self {
            success: true,
            data: None,
            message: Some(message.into()),
            error: None,
        }
    }

    /// Failed response
    pub fn failure(error: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            message: Some(message.into()),
            error: Some(error.into()),
        }
    }
}

/// Query parameters for paginated requests
#[derive(Debug, Default, Deserialize)]
pub struct PaginationParams {
    /// Number of results to return (default: 20, max: 100)
    pub limit: Option<usize>,

    /// Number of results to skip (default: 0)
    pub offset: Option<usize>,
}

/// Query parameter selecting a window of days
#[derive(Debug, Default, Deserialize)]
pub struct DaysQuery {
    pub days: Option<u32>,
}

/// Paginated response format
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaginatedResponse<T> {
    /// The data items for this page
    pub items: Vec<T>,

    /// Total number of items
    pub total: usize,

    /// Number of items returned
    pub count: usize,

    pub offset: usize,

    pub limit: usize,

    /// Whether another page follows this one
    pub has_next: bool,
}

impl<T> PaginatedResponse<T> {
    pub fn new(items: Vec<T>, total: usize, limit: usize, offset: usize) -> Self {
        let count = items.len();
        Self {
            items,
            total,
            count,
            offset,
            limit,
            has_next: offset.saturating_add(count) < total,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_envelope_skips_empty_fields() {
        let body = serde_json::to_value(ApiResponse::ok(json!({"id": "p1"}))).unwrap();
        assert_eq!(body, json!({"success": true, "data": {"id": "p1"}}));

        let body = serde_json::to_value(ApiResponse::failure("Forbidden", "Access denied")).unwrap();
        assert_eq!(body, json!({"success": false, "error": "Forbidden", "message": "Access denied"}));
    }

    #[test]
    fn test_pagination_has_next() {
        let page = PaginatedResponse::new(vec![1, 2], 5, 2, 0);
        assert!(page.has_next);
        assert_eq!(page.count, 2);

        let last = PaginatedResponse::new(vec![5], 5, 2, 4);
        assert!(!last.has_next);
    }
}
