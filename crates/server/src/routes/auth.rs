use std::sync::Arc;

use axum::{
    extract::{Query, Request, State},
    middleware::Next,
    response::Response,
    Json,
};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use serde::Deserialize;
use serde_json::{json, Value};

use service::token::{AuthError, TokenService};
use store::DocumentStore;

use crate::errors::ApiError;

pub const TOKEN_COOKIE: &str = "token";

/// Process-wide request context: the shared store handle and the token
/// service, injected into every handler instead of living as globals.
#[derive(Clone)]
pub struct ServerState {
    pub store: Arc<dyn DocumentStore>,
    pub tokens: TokenService,
}

/// POST /jwt: sign the identity payload and hand it back as an HTTP-only
/// cookie. The payload is arbitrary; clients are expected to send at least
/// an email claim.
pub async fn issue_token(
    State(state): State<ServerState>,
    jar: CookieJar,
    Json(identity): Json<Value>,
) -> Result<(CookieJar, Json<Value>), ApiError> {
    let identity = identity
        .as_object()
        .cloned()
        .ok_or_else(|| ApiError::Validation("identity payload must be a JSON object".into()))?;
    let token = state.tokens.issue(identity)?;

    let mut cookie = Cookie::new(TOKEN_COOKIE, token);
    cookie.set_path("/");
    cookie.set_http_only(true);
    cookie.set_secure(false);
    cookie.set_same_site(SameSite::Lax);
    let jar = jar.add(cookie);

    Ok((jar, Json(json!({ "success": true }))))
}

#[derive(Debug, Deserialize)]
pub struct OwnerQuery {
    pub email: Option<String>,
}

/// Gate for the bookings listing. Missing/invalid/expired credential is a
/// 401 before any comparison; an authenticated identity asking for another
/// owner's bookings (or none at all) is a 403.
pub async fn require_booking_owner(
    State(state): State<ServerState>,
    Query(query): Query<OwnerQuery>,
    jar: CookieJar,
    req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let token = jar.get(TOKEN_COOKIE).map(|c| c.value().to_string());
    let claims = state.tokens.verify(token.as_deref())?;
    let owner = claims.email().ok_or(AuthError::Forbidden)?;

    match query.email.as_deref() {
        Some(requested) if requested == owner => Ok(next.run(req).await),
        _ => Err(AuthError::Forbidden.into()),
    }
}
