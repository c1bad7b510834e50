//! Phone-OTP authentication and facilitator profile handlers.

use crate::envelope::{self, ApiError};
use crate::server::AppState;
use axum::extract::State;
use axum::http::StatusCode;
use axum::{Extension, Json};
use reach_platform::Facilitator;
use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct SendOtpRequest {
    pub phone_number: String,
}

#[derive(Debug, Deserialize)]
pub struct VerifyOtpRequest {
    pub phone_number: String,
    pub otp: String,
}

pub async fn send_otp(
    State(state): State<AppState>,
    Json(req): Json<SendOtpRequest>,
) -> Result<Json<serde_json::Value>, ApiError> {
    state
        .auth
        .send_otp(&req.phone_number)
        .map_err(envelope::from_reach_error)?;
    Ok(Json(serde_json::json!({
        "success": true,
        "message": "OTP sent successfully"
    })))
}

pub async fn verify_otp(
    State(state): State<AppState>,
    Json(req): Json<VerifyOtpRequest>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let session = state
        .auth
        .verify_otp(&req.phone_number, &req.otp)
        .map_err(envelope::from_reach_error)?;
    metrics::counter!("auth.sessions.opened").increment(1);
    Ok(Json(serde_json::json!({
        "success": true,
        "token": session.token,
        "facilitator_id": session.facilitator_id,
        "is_new_facilitator": session.is_new_facilitator,
        "expires_at": session.expires_at,
    })))
}

pub async fn get_profile(
    Extension(facilitator): Extension<Facilitator>,
) -> Json<serde_json::Value> {
    Json(serde_json::json!({ "success": true, "facilitator": facilitator }))
}

#[derive(Debug, Deserialize)]
pub struct UpdateProfileRequest {
    pub name: String,
}

pub async fn update_profile(
    State(state): State<AppState>,
    Extension(facilitator): Extension<Facilitator>,
    Json(req): Json<UpdateProfileRequest>,
) -> Result<Json<serde_json::Value>, ApiError> {
    if !state.auth.set_facilitator_name(facilitator.id, &req.name) {
        return Err(envelope::error(
            StatusCode::NOT_FOUND,
            "not_found",
            "Facilitator not found",
        ));
    }
    Ok(Json(serde_json::json!({
        "success": true,
        "message": "Profile updated successfully"
    })))
}
