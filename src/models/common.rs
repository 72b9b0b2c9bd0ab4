use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Uniform response envelope: `{"success":true,"data":…}` on the happy path,
/// `{"success":false,"error":{code,message}}` from the error boundary.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ApiResponse<T> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<ApiError>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ApiError {
    pub code: String,
    pub message: String,
}

impl<T> ApiResponse<T> {
    pub fn success(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            message: None,
            error: None,
        }
    }
}

impl ApiResponse<()> {
    /// Success with no payload, only a human-readable confirmation.
    pub fn message(message: impl Into<String>) -> Self {
        Self {
            success: true,
            data: None,
            message: Some(message.into()),
            error: None,
        }
    }

    pub fn error(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            message: None,
            error: Some(ApiError {
                code: code.into(),
                message: message.into(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_success_envelope_shape() {
        let body = serde_json::to_value(ApiResponse::success(json!({"level": 3}))).unwrap();
        assert_eq!(body, json!({"success": true, "data": {"level": 3}}));
    }

    #[test]
    fn test_message_envelope_omits_data() {
        let body = serde_json::to_value(ApiResponse::message("Record deleted")).unwrap();
        assert_eq!(body, json!({"success": true, "message": "Record deleted"}));
    }

    #[test]
    fn test_error_envelope_shape() {
        let body =
            serde_json::to_value(ApiResponse::error("NOT_FOUND", "Affiliate profile not found"))
                .unwrap();
        assert_eq!(
            body,
            json!({
                "success": false,
                "error": {"code": "NOT_FOUND", "message": "Affiliate profile not found"}
            })
        );
    }
}
