use axum::routing::get;
use axum::Router;
use tower_http::trace::TraceLayer;

use crate::server::api;
use crate::server::state::AppState;

/// Every route answers GET only; other methods, HEAD included, get a JSON 405.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route(
            "/api/health",
            get(api::health)
                .head(api::method_not_allowed)
                .fallback(api::method_not_allowed),
        )
        .route(
            "/api/search",
            get(api::search)
                .head(api::method_not_allowed)
                .fallback(api::method_not_allowed),
        )
        .route(
            "/api/worldstate",
            get(api::worldstate)
                .head(api::method_not_allowed)
                .fallback(api::method_not_allowed),
        )
        .route(
            "/api/worldstate/:category",
            get(api::worldstate_category)
                .head(api::method_not_allowed)
                .fallback(api::method_not_allowed),
        )
        .fallback(api::not_found)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
