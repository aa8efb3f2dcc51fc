use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use pricepoint_core::errors::{ApplicationError, DomainError, InterfaceError};
use serde::Serialize;
use tracing::{error, info, warn};
use uuid::Uuid;

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: String,
}

/// Handler failure already mapped to its interface form.
#[derive(Debug)]
pub struct ApiError(pub InterfaceError);

impl ApiError {
    pub fn new(error: impl Into<ApplicationError>, correlation_id: &str) -> Self {
        Self(error.into().into_interface(correlation_id))
    }

    pub fn rejected(rejection: JsonRejection, correlation_id: &str) -> Self {
        Self::new(DomainError::InvalidPayload(rejection.body_text()), correlation_id)
    }

    pub fn status(&self) -> StatusCode {
        match self.0 {
            InterfaceError::BadRequest { .. } => StatusCode::BAD_REQUEST,
            InterfaceError::NotFound { .. } => StatusCode::NOT_FOUND,
            InterfaceError::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let correlation_id = self.0.correlation_id();

        match &self.0 {
            InterfaceError::BadRequest { message, .. } => warn!(
                event_name = "api.request.rejected",
                correlation_id = %correlation_id,
                detail = %message,
                "request payload rejected"
            ),
            InterfaceError::NotFound { message, .. } => info!(
                event_name = "api.record.not_found",
                correlation_id = %correlation_id,
                detail = %message,
                "record lookup missed"
            ),
            InterfaceError::Internal { message, .. } => error!(
                event_name = "api.request.failed",
                correlation_id = %correlation_id,
                detail = %message,
                "request failed"
            ),
        }

        (status, Json(ErrorBody { error: self.0.user_message() })).into_response()
    }
}

pub fn correlation_id() -> String {
    format!("req-{}", &Uuid::new_v4().simple().to_string()[..12])
}

#[cfg(test)]
mod tests {
    use axum::http::StatusCode;
    use axum::response::IntoResponse;
    use pricepoint_core::domain::record::Collection;
    use pricepoint_core::errors::DomainError;

    use super::{correlation_id, ApiError};

    #[test]
    fn not_found_uses_404() {
        let error = ApiError::new(
            DomainError::RecordNotFound { collection: Collection::Quotes, id: "QT-X".to_string() },
            "req-1",
        );
        assert_eq!(error.status(), StatusCode::NOT_FOUND);
        assert_eq!(error.into_response().status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn invalid_payload_uses_400() {
        let error = ApiError::new(DomainError::InvalidPayload("not an object".to_string()), "req-2");
        assert_eq!(error.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn correlation_ids_are_prefixed_and_short() {
        let id = correlation_id();
        assert!(id.starts_with("req-"));
        assert_eq!(id.len(), 16);
    }
}
