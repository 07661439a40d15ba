//! Backend API router.
//!
//! Middleware stack (outermost to innermost):
//! CORS and request tracing wrap everything; bearer auth guards the
//! protected routes only.
//!
//! NOTE: Path params use `:param` syntax (matchit 0.7 / axum 0.7).

use axum::extract::DefaultBodyLimit;
use axum::routing::{delete, get, post, put};
use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::api::endpoints;
use crate::api::middleware;
use crate::api::types::ApiContext;
use crate::config::MAX_UPLOAD_BYTES;

/// Build the full API router.
///
/// Endpoint handlers use `State<ApiContext>`; the auth middleware reads
/// the same context from an `Extension` layer, which must sit outside
/// the middleware that needs it.
pub fn api_router(ctx: ApiContext) -> Router {
    let protected = Router::new()
        .route("/auth/me", get(endpoints::auth::me))
        .route("/parse-pdf", post(endpoints::appointments::parse_pdf))
        .route(
            "/parsed-appointments",
            get(endpoints::appointments::list_parsed),
        )
        .route(
            "/upcoming-appointments/upload",
            post(endpoints::upcoming::upload),
        )
        .route("/upcoming-appointments", get(endpoints::upcoming::list))
        .route(
            "/upcoming-appointments/inactive",
            delete(endpoints::upcoming::clear_inactive),
        )
        .route(
            "/upcoming-appointments/:queue_id",
            get(endpoints::upcoming::detail),
        )
        .route(
            "/upcoming-appointments/:queue_id/deactivate",
            put(endpoints::upcoming::deactivate),
        )
        // Room for multipart framing overhead on top of the file itself
        .layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES + 64 * 1024))
        .with_state(ctx.clone())
        .layer(axum::middleware::from_fn(middleware::auth::require_auth))
        .layer(axum::Extension(ctx.clone()));

    let public = Router::new()
        .route("/hello", get(endpoints::health::hello))
        .route("/auth/login", post(endpoints::auth::login))
        .route(
            "/auth/create-test-user",
            post(endpoints::auth::create_test_user),
        )
        .with_state(ctx);

    Router::new()
        .merge(protected)
        .merge(public)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}
