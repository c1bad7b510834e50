//! Offering management handlers.

use crate::envelope::{self, ApiError};
use crate::server::AppState;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::{Extension, Json};
use reach_crm::{CreateOfferingRequest, UpdateOfferingRequest};
use reach_platform::Facilitator;
use uuid::Uuid;

pub async fn list_offerings(
    State(state): State<AppState>,
    Extension(facilitator): Extension<Facilitator>,
) -> Json<serde_json::Value> {
    let offerings = state.offerings.list(facilitator.id);
    Json(serde_json::json!({
        "success": true,
        "count": offerings.len(),
        "offerings": offerings,
    }))
}

pub async fn create_offering(
    State(state): State<AppState>,
    Extension(facilitator): Extension<Facilitator>,
    Json(req): Json<CreateOfferingRequest>,
) -> Result<(StatusCode, Json<serde_json::Value>), ApiError> {
    if req.title.trim().is_empty() {
        return Err(envelope::error(
            StatusCode::BAD_REQUEST,
            "validation_failed",
            "title is required",
        ));
    }
    let offering = state.offerings.create(facilitator.id, req);
    Ok((
        StatusCode::CREATED,
        Json(serde_json::json!({
            "success": true,
            "message": "Offering created successfully",
            "offering": offering,
        })),
    ))
}

pub async fn update_offering(
    State(state): State<AppState>,
    Extension(facilitator): Extension<Facilitator>,
    Path(id): Path<Uuid>,
    Json(req): Json<UpdateOfferingRequest>,
) -> Result<Json<serde_json::Value>, ApiError> {
    match state.offerings.update(id, facilitator.id, req) {
        Some(offering) => Ok(Json(serde_json::json!({
            "success": true,
            "message": "Offering updated successfully",
            "offering": offering,
        }))),
        None => Err(envelope::error(
            StatusCode::NOT_FOUND,
            "not_found",
            "Offering not found",
        )),
    }
}

pub async fn delete_offering(
    State(state): State<AppState>,
    Extension(facilitator): Extension<Facilitator>,
    Path(id): Path<Uuid>,
) -> Result<Json<serde_json::Value>, ApiError> {
    if state.offerings.deactivate(id, facilitator.id) {
        Ok(Json(serde_json::json!({
            "success": true,
            "message": "Offering deleted successfully"
        })))
    } else {
        Err(envelope::error(
            StatusCode::NOT_FOUND,
            "not_found",
            "Offering not found",
        ))
    }
}
