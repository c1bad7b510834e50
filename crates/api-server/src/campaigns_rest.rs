//! Campaign handlers: creation, targeting preview, launch and status.

use crate::envelope::{self, ApiError};
use crate::server::AppState;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::{Extension, Json};
use reach_campaigns::{CampaignService, CreateCampaignRequest};
use reach_core::types::{CampaignStatus, TargetAudience};
use reach_core::{ReachError, ReachResult};
use reach_platform::Facilitator;
use serde::Deserialize;
use uuid::Uuid;

/// Deserialize a creation payload, classifying failures: a malformed
/// `target_audience` (unknown type/status values) is an invalid target
/// rule, anything else is plain validation. Both come back as envelopes
/// instead of the default body-rejection response.
fn parse_create_request(body: serde_json::Value) -> ReachResult<CreateCampaignRequest> {
    if let Some(audience) = body.get("target_audience") {
        if let Err(e) = serde_json::from_value::<TargetAudience>(audience.clone()) {
            return Err(ReachError::InvalidTargetRule(e.to_string()));
        }
    }
    serde_json::from_value(body).map_err(|e| ReachError::Validation(e.to_string()))
}

pub async fn list_campaigns(
    State(state): State<AppState>,
    Extension(facilitator): Extension<Facilitator>,
) -> Json<serde_json::Value> {
    let campaigns = state.campaigns.list(facilitator.id);
    Json(serde_json::json!({
        "success": true,
        "count": campaigns.len(),
        "campaigns": campaigns,
    }))
}

pub async fn create_campaign(
    State(state): State<AppState>,
    Extension(facilitator): Extension<Facilitator>,
    Json(body): Json<serde_json::Value>,
) -> Result<(StatusCode, Json<serde_json::Value>), ApiError> {
    let req = parse_create_request(body).map_err(envelope::from_reach_error)?;
    let campaign = state
        .campaigns
        .create(facilitator.id, req)
        .map_err(envelope::from_reach_error)?;
    metrics::counter!("campaigns.created").increment(1);
    Ok((
        StatusCode::CREATED,
        Json(serde_json::json!({
            "success": true,
            "message": "Campaign created successfully",
            "campaign": campaign,
        })),
    ))
}

/// Canned campaign templates for the creation UI.
pub async fn templates() -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "success": true,
        "templates": CampaignService::canned_templates(),
    }))
}

pub async fn get_campaign(
    State(state): State<AppState>,
    Extension(facilitator): Extension<Facilitator>,
    Path(id): Path<Uuid>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let campaign = state
        .campaigns
        .get(id, facilitator.id)
        .map_err(envelope::from_reach_error)?;
    Ok(Json(serde_json::json!({
        "success": true,
        "campaign": campaign,
    })))
}

/// Resolve the recipient list without changing campaign state.
pub async fn campaign_targets(
    State(state): State<AppState>,
    Extension(facilitator): Extension<Facilitator>,
    Path(id): Path<Uuid>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let targets = state
        .campaigns
        .preview_targets(id, facilitator.id)
        .map_err(envelope::from_reach_error)?;
    Ok(Json(serde_json::json!({
        "success": true,
        "count": targets.len(),
        "targets": targets,
    })))
}

pub async fn launch_campaign(
    State(state): State<AppState>,
    Extension(facilitator): Extension<Facilitator>,
    Path(id): Path<Uuid>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let outcome = state
        .campaigns
        .launch(id, facilitator.id, facilitator.name.as_deref())
        .await
        .map_err(envelope::from_reach_error)?;
    Ok(Json(serde_json::json!({
        "success": true,
        "message": "Campaign launched",
        "outcome": outcome,
    })))
}

pub async fn campaign_status(
    State(state): State<AppState>,
    Extension(facilitator): Extension<Facilitator>,
    Path(id): Path<Uuid>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let report = state
        .campaigns
        .status(id, facilitator.id)
        .map_err(envelope::from_reach_error)?;
    Ok(Json(serde_json::json!({
        "success": true,
        "campaign_id": report.campaign_id,
        "status": report.status,
        "counts": report.counts,
    })))
}

#[derive(Debug, Deserialize)]
pub struct OverrideStatusRequest {
    pub status: CampaignStatus,
}

/// Manual reconciliation for interrupted runs.
pub async fn override_status(
    State(state): State<AppState>,
    Extension(facilitator): Extension<Facilitator>,
    Path(id): Path<Uuid>,
    Json(req): Json<OverrideStatusRequest>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let campaign = state
        .campaigns
        .override_status(id, facilitator.id, req.status)
        .map_err(envelope::from_reach_error)?;
    Ok(Json(serde_json::json!({
        "success": true,
        "message": "Campaign status updated",
        "campaign": campaign,
    })))
}

pub async fn call_logs(
    State(state): State<AppState>,
    Extension(facilitator): Extension<Facilitator>,
    Path(id): Path<Uuid>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let logs = state
        .campaigns
        .call_logs(id, facilitator.id)
        .map_err(envelope::from_reach_error)?;
    Ok(Json(serde_json::json!({
        "success": true,
        "count": logs.len(),
        "call_logs": logs,
    })))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_audience_value_is_invalid_target_rule() {
        let body = serde_json::json!({
            "name": "Promo",
            "campaign_type": "whatsapp_blast",
            "message_template": "Hi {student_name}!",
            "target_audience": { "student_types": ["alumni"] }
        });
        assert!(matches!(
            parse_create_request(body),
            Err(ReachError::InvalidTargetRule(_))
        ));
    }

    #[test]
    fn test_missing_field_is_plain_validation() {
        let body = serde_json::json!({
            "campaign_type": "whatsapp_blast",
            "message_template": "Hi!"
        });
        assert!(matches!(
            parse_create_request(body),
            Err(ReachError::Validation(_))
        ));
    }

    #[test]
    fn test_well_formed_payload_parses() {
        let body = serde_json::json!({
            "name": "Promo",
            "campaign_type": "calling",
            "message_template": "Hi {student_name}!",
            "target_audience": { "statuses": ["paused"] }
        });
        let req = parse_create_request(body).unwrap();
        assert_eq!(req.name, "Promo");
    }
}
