use axum::{
    middleware,
    routing::{get, patch, post},
    Json, Router,
};
use tower_http::{
    cors::CorsLayer,
    trace::{DefaultMakeSpan, DefaultOnFailure, DefaultOnRequest, DefaultOnResponse, TraceLayer},
};
use tracing::Level;

use common::types::Health;

use crate::errors::ApiError;

pub mod auth;
pub mod bookings;
pub mod catalog;

pub use auth::ServerState;

pub async fn root() -> &'static str {
    "Car Doctor server running"
}

pub async fn health() -> Json<Health> {
    Json(Health { status: "ok" })
}

/// Path ids are validated before they reach the store; malformed input is a
/// client error, not a crash.
pub(crate) fn parse_id(raw: &str) -> Result<store::DocumentId, ApiError> {
    store::DocumentId::parse(raw).map_err(|_| ApiError::InvalidId(raw.to_string()))
}

/// Build the full application router: public catalog/booking routes plus the
/// one owner-gated bookings listing.
pub fn build_router(cors: CorsLayer, state: ServerState) -> Router {
    let public = Router::new()
        .route("/", get(root))
        .route("/health", get(health))
        .route("/jwt", post(auth::issue_token))
        .route("/services", get(catalog::list_services))
        .route("/service/:id", get(catalog::get_service))
        .route("/checkout/:id", get(catalog::checkout))
        .route("/bookings", post(bookings::create_booking))
        .route("/booking/:id", patch(bookings::update_booking).delete(bookings::delete_booking));

    // Listing bookings always goes through the ownership gate.
    let gated = Router::new()
        .route("/bookings", get(bookings::list_bookings))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            auth::require_booking_owner,
        ));

    public
        .merge(gated)
        .with_state(state)
        .layer(cors)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(
                    DefaultMakeSpan::new()
                        .level(Level::INFO)
                        .include_headers(false),
                )
                .on_request(DefaultOnRequest::new().level(Level::INFO))
                .on_response(
                    DefaultOnResponse::new()
                        .level(Level::INFO)
                        .include_headers(false),
                )
                .on_failure(DefaultOnFailure::new().level(Level::ERROR)),
        )
}
