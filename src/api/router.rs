//! API router.
//!
//! Returns a composable `Router` that can be mounted on any axum server.
//! Routes are nested under `/api/`. CORS is permissive because the only
//! consumer is the browser demo UI; there is no authentication layer.

use axum::routing::{delete, get, post};
use axum::Router;
use tower_http::cors::CorsLayer;

use crate::api::endpoints;
use crate::api::types::ApiContext;

/// Build the API router for the given context.
pub fn api_router(ctx: ApiContext) -> Router {
    let routes = Router::new()
        .route("/health", get(endpoints::health::check))
        .route("/chat/session", post(endpoints::chat::create_session))
        .route("/chat/session/:id", get(endpoints::chat::get_session))
        .route(
            "/chat/session/:id",
            delete(endpoints::chat::discard_session),
        )
        .route("/chat/send", post(endpoints::chat::send))
        .route("/chat/upload", post(endpoints::chat::upload))
        .route("/doctors", get(endpoints::doctors::list))
        .route("/doctors/:id", get(endpoints::doctors::detail))
        .route("/doctors/recommend", post(endpoints::doctors::recommend))
        .with_state(ctx);

    Router::new().nest("/api", routes).layer(CorsLayer::permissive())
}
