//! HTTP error mapping.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use tracing::{error, warn};

use tagwright_core::Error;

/// Errors returned by handlers, rendered as `{"error": message}`.
#[derive(Debug)]
pub enum ApiError {
    BadRequest(String),
    NotFound(String),
    /// The remote system or LLM backend failed.
    BadGateway(String),
    /// A remote call ran out of time; its effect is unknown.
    GatewayTimeout(String),
    Internal(String),
}

impl From<Error> for ApiError {
    fn from(err: Error) -> Self {
        let message = err.to_string();
        match err {
            Error::InvalidInput(msg) => ApiError::BadRequest(msg),
            Error::Config(msg) => ApiError::BadRequest(msg),
            Error::NotFound(msg) => ApiError::NotFound(msg),
            Error::Remote { .. }
            | Error::Request(_)
            | Error::Inference(_)
            | Error::Serialization(_) => ApiError::BadGateway(message),
            Error::Timeout(_) => ApiError::GatewayTimeout(message),
            Error::MergeIncomplete { .. } => ApiError::Internal(message),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            ApiError::BadGateway(msg) => (StatusCode::BAD_GATEWAY, msg),
            ApiError::GatewayTimeout(msg) => (StatusCode::GATEWAY_TIMEOUT, msg),
            ApiError::Internal(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg),
        };

        if status.is_server_error() {
            if status == StatusCode::INTERNAL_SERVER_ERROR {
                error!(status = status.as_u16(), error = %message, "Request failed");
            } else {
                warn!(status = status.as_u16(), error = %message, "Upstream failure");
            }
        }

        let body = Json(serde_json::json!({
            "error": message,
        }));

        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn status_of(err: Error) -> StatusCode {
        ApiError::from(err).into_response().status()
    }

    #[test]
    fn test_status_mapping() {
        assert_eq!(status_of(Error::InvalidInput("x".into())), StatusCode::BAD_REQUEST);
        assert_eq!(status_of(Error::Config("x".into())), StatusCode::BAD_REQUEST);
        assert_eq!(status_of(Error::NotFound("x".into())), StatusCode::NOT_FOUND);
        assert_eq!(
            status_of(Error::Remote { status: 500, body: "b".into() }),
            StatusCode::BAD_GATEWAY
        );
        assert_eq!(status_of(Error::Inference("x".into())), StatusCode::BAD_GATEWAY);
        assert_eq!(status_of(Error::Timeout("x".into())), StatusCode::GATEWAY_TIMEOUT);
        assert_eq!(
            status_of(Error::MergeIncomplete { target: "t".into(), reason: "r".into() }),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_timeout_message_keeps_prefix() {
        match ApiError::from(Error::Timeout("deleting 2 tags".into())) {
            ApiError::GatewayTimeout(msg) => assert_eq!(msg, "Timed out: deleting 2 tags"),
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn test_remote_message_keeps_status_and_body() {
        match ApiError::from(Error::Remote { status: 403, body: "denied".into() }) {
            ApiError::BadGateway(msg) => {
                assert_eq!(msg, "Paperless API error (status 403): denied")
            }
            other => panic!("unexpected {other:?}"),
        }
    }
}
