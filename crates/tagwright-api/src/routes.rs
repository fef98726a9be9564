//! Router assembly.

use axum::{
    http::{header, HeaderValue, Method},
    routing::{get, patch, post},
    Extension, Router,
};
use tower_http::{
    cors::{AllowOrigin, CorsLayer},
    request_id::{MakeRequestId, PropagateRequestIdLayer, RequestId, SetRequestIdLayer},
    trace::TraceLayer,
};
use uuid::Uuid;

use tagwright_core::EntityKind;

use crate::handlers;
use crate::AppState;

// =============================================================================
// REQUEST ID (UUIDv7)
// =============================================================================

/// Generates time-ordered UUIDv7 request correlation IDs.
#[derive(Clone, Default)]
struct MakeRequestUuidV7;

impl MakeRequestId for MakeRequestUuidV7 {
    fn make_request_id<B>(&mut self, _request: &axum::http::Request<B>) -> Option<RequestId> {
        let id = Uuid::now_v7().to_string().parse().ok()?;
        Some(RequestId::new(id))
    }
}

// =============================================================================
// ROUTER
// =============================================================================

/// Routes shared by every metadata kind; the kind arrives as an extension.
fn metadata_router() -> Router<AppState> {
    Router::new()
        .route("/", get(handlers::list_entities))
        .route("/all", get(handlers::list_all_entities))
        .route("/low-usage", get(handlers::low_usage))
        .route("/merge-suggestions", get(handlers::merge_suggestions))
        .route("/llm-groups", post(handlers::llm_groups))
        .route("/delete", post(handlers::delete_entities))
        .route("/merge/preview", post(handlers::merge_preview))
        .route("/merge", post(handlers::merge_entities))
        .route("/:id", patch(handlers::update_entity))
}

/// Build the full application router.
pub fn build_router(state: AppState) -> Router {
    let mut router = Router::new()
        .route("/health", get(handlers::health_check))
        .route("/health/full", get(handlers::health_check_full))
        .route("/api/custom_fields", get(handlers::list_custom_fields));

    for kind in EntityKind::ALL {
        router = router.nest(
            &format!("/api/{}", kind.api_path()),
            metadata_router().layer(Extension(kind)),
        );
    }

    let allowed_origins = parse_allowed_origins(&state.settings.allowed_origins);

    router
        .layer(TraceLayer::new_for_http())
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuidV7))
        .layer(
            CorsLayer::new()
                .allow_origin(AllowOrigin::list(allowed_origins))
                .allow_methods([
                    Method::GET,
                    Method::POST,
                    Method::PATCH,
                    Method::OPTIONS,
                ])
                .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE, header::ACCEPT])
                .max_age(std::time::Duration::from_secs(3600)),
        )
        .with_state(state)
}

/// Convert configured origins to header values, skipping invalid ones.
fn parse_allowed_origins(origins: &[String]) -> Vec<HeaderValue> {
    origins
        .iter()
        .filter_map(|origin| match origin.parse::<HeaderValue>() {
            Ok(v) => Some(v),
            Err(e) => {
                tracing::warn!("Invalid CORS origin '{}': {}", origin, e);
                None
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_allowed_origins_skips_invalid() {
        let origins = vec![
            "https://a.example".to_string(),
            "bad\norigin".to_string(),
        ];
        let parsed = parse_allowed_origins(&origins);
        assert_eq!(parsed, vec![HeaderValue::from_static("https://a.example")]);
    }
}
