//! The JSON envelope shared by every endpoint

use serde::{Deserialize, Serialize};

/// `{success, data?, message?, errors?}`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiEnvelope<T> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub errors: Option<Vec<String>>,
}

impl<T> ApiEnvelope<T> {
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            message: None,
            errors: None,
        }
    }

    pub fn ok_with_message(data: T, message: impl Into<String>) -> Self {
        Self {
            success: true,
            data: Some(data),
            message: Some(message.into()),
            errors: None,
        }
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }
}

impl ApiEnvelope<()> {
    /// Success without a payload
    pub fn message(message: impl Into<String>) -> Self {
        Self {
            success: true,
            data: None,
            message: Some(message.into()),
            errors: None,
        }
    }

    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            message: Some(message.into()),
            errors: None,
        }
    }

    pub fn validation_failure(message: impl Into<String>, errors: Vec<String>) -> Self {
        Self {
            success: false,
            data: None,
            message: Some(message.into()),
            errors: Some(errors),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_absent_fields_are_omitted() {
        let body = serde_json::to_value(ApiEnvelope::ok(json!({ "id": 7 }))).unwrap();
        assert_eq!(body, json!({ "success": true, "data": { "id": 7 } }));
    }

    #[test]
    fn test_validation_failure_shape() {
        let body = serde_json::to_value(ApiEnvelope::validation_failure(
            "Validation failed",
            vec!["email must be a valid email".to_string()],
        ))
        .unwrap();
        assert_eq!(
            body,
            json!({
                "success": false,
                "message": "Validation failed",
                "errors": ["email must be a valid email"]
            })
        );
    }
}
