use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use domain::store::StoreError;
use domain::DomainError;
use serde::Serialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Validation error: {message}")]
    Validation {
        field: Option<String>,
        message: String,
    },

    #[error("Policy violation: {0}")]
    Policy(String),

    #[error("Internal error: {0}")]
    Internal(String),

    #[error("Service unavailable: {0}")]
    ServiceUnavailable(String),
}

impl ApiError {
    pub fn validation(message: impl Into<String>) -> Self {
        ApiError::Validation {
            field: None,
            message: message.into(),
        }
    }
}

#[derive(Debug, Serialize)]
struct ErrorBody {
    error: String,
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<Vec<ValidationDetail>>,
}

#[derive(Debug, Serialize)]
pub struct ValidationDetail {
    pub field: String,
    pub message: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let mut details = None;
        let (status, error_code, message) = match self {
            ApiError::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, "unauthorized", msg),
            ApiError::Forbidden(msg) => (StatusCode::FORBIDDEN, "forbidden", msg),
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, "not_found", msg),
            ApiError::Conflict(msg) => (StatusCode::CONFLICT, "conflict", msg),
            ApiError::Validation { field, message } => {
                details = field.map(|field| {
                    vec![ValidationDetail {
                        field,
                        message: message.clone(),
                    }]
                });
                (StatusCode::BAD_REQUEST, "validation_error", message)
            }
            ApiError::Policy(msg) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                "policy_violation",
                msg,
            ),
            ApiError::Internal(msg) => {
                tracing::error!("Internal error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "internal_error",
                    "An internal error occurred".into(),
                )
            }
            ApiError::ServiceUnavailable(msg) => {
                (StatusCode::SERVICE_UNAVAILABLE, "service_unavailable", msg)
            }
        };

        let body = ErrorBody {
            error: error_code.into(),
            message,
            details,
        };

        (status, Json(body)).into_response()
    }
}

impl From<DomainError> for ApiError {
    fn from(err: DomainError) -> Self {
        match err {
            DomainError::Validation { field, message } => ApiError::Validation {
                field: Some(field),
                message,
            },
            DomainError::NotFound(what) => ApiError::NotFound(format!("{} not found", what)),
            DomainError::Conflict(msg) => ApiError::Conflict(msg),
            DomainError::Policy(msg) => ApiError::Policy(msg),
            DomainError::Forbidden(msg) => ApiError::Forbidden(msg),
            DomainError::Store(store) => store.into(),
        }
    }
}

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        ApiError::Internal(err.to_string())
    }
}

impl From<validator::ValidationErrors> for ApiError {
    fn from(errors: validator::ValidationErrors) -> Self {
        let mut fields: Vec<_> = errors.field_errors().into_iter().collect();
        fields.sort_by(|a, b| a.0.cmp(&b.0));

        let first = fields.into_iter().find_map(|(field, errors)| {
            errors.first().map(|e| {
                let message = e
                    .message
                    .as_ref()
                    .map(|m| m.to_string())
                    .unwrap_or_else(|| format!("{} is invalid", field));
                (field.to_string(), message)
            })
        });

        match first {
            Some((field, message)) => ApiError::Validation {
                field: Some(field),
                message,
            },
            None => ApiError::validation("Invalid request"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::to_bytes;
    use axum::http::StatusCode;
    use validator::Validate;

    async fn body_json(response: Response) -> serde_json::Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[test]
    fn test_api_error_status_codes() {
        let cases = [
            (ApiError::Unauthorized("x".into()), StatusCode::UNAUTHORIZED),
            (ApiError::Forbidden("x".into()), StatusCode::FORBIDDEN),
            (ApiError::NotFound("x".into()), StatusCode::NOT_FOUND),
            (ApiError::Conflict("x".into()), StatusCode::CONFLICT),
            (ApiError::validation("x"), StatusCode::BAD_REQUEST),
            (ApiError::Policy("x".into()), StatusCode::UNPROCESSABLE_ENTITY),
            (ApiError::Internal("x".into()), StatusCode::INTERNAL_SERVER_ERROR),
            (
                ApiError::ServiceUnavailable("x".into()),
                StatusCode::SERVICE_UNAVAILABLE,
            ),
        ];
        for (error, status) in cases {
            assert_eq!(error.into_response().status(), status);
        }
    }

    #[test]
    fn test_api_error_display() {
        assert_eq!(
            ApiError::Unauthorized("test".into()).to_string(),
            "Unauthorized: test"
        );
        assert_eq!(
            ApiError::validation("test").to_string(),
            "Validation error: test"
        );
        assert_eq!(
            ApiError::Policy("driver license expired".into()).to_string(),
            "Policy violation: driver license expired"
        );
    }

    #[tokio::test]
    async fn test_domain_validation_body_carries_field() {
        let error: ApiError =
            DomainError::validation("seatsNeeded", "seatsNeeded must be at least 1").into();
        let response = error.into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let body = body_json(response).await;
        assert_eq!(body["error"], "validation_error");
        assert_eq!(body["message"], "seatsNeeded must be at least 1");
        assert_eq!(body["details"][0]["field"], "seatsNeeded");
    }

    #[tokio::test]
    async fn test_domain_policy_maps_to_422() {
        let error: ApiError = DomainError::Policy("driver license expired".into()).into();
        let response = error.into_response();
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
        let body = body_json(response).await;
        assert_eq!(body["error"], "policy_violation");
        assert_eq!(body["message"], "driver license expired");
    }

    #[test]
    fn test_domain_error_mapping() {
        assert!(matches!(
            ApiError::from(DomainError::NotFound("Carpool".into())),
            ApiError::NotFound(ref m) if m == "Carpool not found"
        ));
        assert!(matches!(
            ApiError::from(DomainError::Forbidden("no".into())),
            ApiError::Forbidden(_)
        ));
        assert!(matches!(
            ApiError::from(DomainError::Conflict("dup".into())),
            ApiError::Conflict(_)
        ));
        assert!(matches!(
            ApiError::from(DomainError::Store(StoreError::Backend("down".into()))),
            ApiError::Internal(_)
        ));
    }

    #[tokio::test]
    async fn test_internal_error_hides_message() {
        let response = ApiError::Internal("connection refused".into()).into_response();
        let body = body_json(response).await;
        assert_eq!(body["message"], "An internal error occurred");
    }

    #[derive(Validate)]
    struct Form {
        #[validate(email(message = "Invalid email format"))]
        email: String,
        #[validate(length(min = 1, message = "displayName is required"))]
        display_name: String,
    }

    #[test]
    fn test_validation_errors_report_first_sorted_field() {
        let form = Form {
            email: "not-an-email".into(),
            display_name: String::new(),
        };
        match ApiError::from(form.validate().unwrap_err()) {
            ApiError::Validation { field, message } => {
                assert_eq!(field.as_deref(), Some("display_name"));
                assert_eq!(message, "displayName is required");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }
}
