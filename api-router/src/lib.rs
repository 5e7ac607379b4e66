use api_state::ApiState;
use axum::{
    extract::{DefaultBodyLimit, FromRef},
    routing::{get, post},
    Router,
};
use routes::{
    health::{live, ready},
    home::home,
    recommend::recommend,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

pub mod api_state;
pub mod error;
mod routes;

pub use routes::recommend::{RecommendRequest, RecommendResponse};

/// Upper bound for a recommendation request body.
pub const RECOMMEND_BODY_LIMIT: usize = 64 * 1024;

/// Recommendation and probe routes, generic over the outer state.
pub fn api_routes<S>() -> Router<S>
where
    S: Clone + Send + Sync + 'static,
    ApiState: FromRef<S>,
{
    Router::new()
        .route("/", get(home))
        .route("/live", get(live))
        .route("/ready", get(ready))
        .route(
            "/recommend",
            post(recommend).layer(DefaultBodyLimit::max(RECOMMEND_BODY_LIMIT)),
        )
}

/// Complete application router with CORS and request tracing.
pub fn app(state: ApiState) -> Router {
    api_routes()
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
