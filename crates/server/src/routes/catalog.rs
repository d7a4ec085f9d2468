use std::sync::Arc;

use axum::{
    extract::{Path, State},
    Json,
};
use serde_json::Value;

use service::catalog::CatalogService;
use store::Document;

use super::{parse_id, ServerState};
use crate::errors::ApiError;

pub async fn list_services(
    State(state): State<ServerState>,
) -> Result<Json<Vec<Document>>, ApiError> {
    let catalog = CatalogService::new(Arc::clone(&state.store));
    Ok(Json(catalog.list_services().await?))
}

pub async fn get_service(
    State(state): State<ServerState>,
    Path(raw_id): Path<String>,
) -> Result<Json<Value>, ApiError> {
    let id = parse_id(&raw_id)?;
    let catalog = CatalogService::new(Arc::clone(&state.store));
    let doc = catalog.get_service(id).await?;
    Ok(Json(doc.map(Value::Object).unwrap_or(Value::Null)))
}

/// Same lookup as `get_service`, but shaped for the checkout view: only
/// title, price, service_id and img survive.
pub async fn checkout(
    State(state): State<ServerState>,
    Path(raw_id): Path<String>,
) -> Result<Json<Value>, ApiError> {
    let id = parse_id(&raw_id)?;
    let catalog = CatalogService::new(Arc::clone(&state.store));
    let doc = catalog.checkout_view(id).await?;
    Ok(Json(doc.map(Value::Object).unwrap_or(Value::Null)))
}
