use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde_json::Value;

use service::booking::BookingService;
use store::{DeleteResult, Document, InsertResult, UpdateResult};

use super::auth::OwnerQuery;
use super::{parse_id, ServerState};
use crate::errors::ApiError;

/// Only reachable through the ownership gate, so the email filter has
/// already been checked against the credential by the time we get here.
pub async fn list_bookings(
    State(state): State<ServerState>,
    Query(query): Query<OwnerQuery>,
) -> Result<Json<Vec<Document>>, ApiError> {
    let bookings = BookingService::new(Arc::clone(&state.store));
    Ok(Json(bookings.list(query.email.as_deref()).await?))
}

pub async fn create_booking(
    State(state): State<ServerState>,
    Json(payload): Json<Value>,
) -> Result<Json<InsertResult>, ApiError> {
    let bookings = BookingService::new(Arc::clone(&state.store));
    Ok(Json(bookings.create(payload).await?))
}

pub async fn update_booking(
    State(state): State<ServerState>,
    Path(raw_id): Path<String>,
    Json(payload): Json<Value>,
) -> Result<Json<UpdateResult>, ApiError> {
    let id = parse_id(&raw_id)?;
    let bookings = BookingService::new(Arc::clone(&state.store));
    Ok(Json(bookings.update_status(id, &payload).await?))
}

pub async fn delete_booking(
    State(state): State<ServerState>,
    Path(raw_id): Path<String>,
) -> Result<Json<DeleteResult>, ApiError> {
    let id = parse_id(&raw_id)?;
    let bookings = BookingService::new(Arc::clone(&state.store));
    Ok(Json(bookings.delete(id).await?))
}
