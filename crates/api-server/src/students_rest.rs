//! Student roster handlers: CRUD, CSV import, sample format.

use crate::envelope::{self, ApiError};
use crate::server::AppState;
use axum::body::Bytes;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::{Extension, Json};
use reach_crm::students::{CreateStudentRequest, UpdateStudentRequest};
use reach_crm::{import_students_csv, sample_csv_format, StudentFilter};
use reach_platform::Facilitator;
use uuid::Uuid;

pub async fn list_students(
    State(state): State<AppState>,
    Extension(facilitator): Extension<Facilitator>,
    Query(filter): Query<StudentFilter>,
) -> Json<serde_json::Value> {
    let students = state.students.list(facilitator.id, &filter);
    Json(serde_json::json!({
        "success": true,
        "count": students.len(),
        "students": students,
    }))
}

pub async fn create_student(
    State(state): State<AppState>,
    Extension(facilitator): Extension<Facilitator>,
    Json(req): Json<CreateStudentRequest>,
) -> Result<(StatusCode, Json<serde_json::Value>), ApiError> {
    if req.name.trim().is_empty() || req.phone_number.trim().is_empty() {
        return Err(envelope::error(
            StatusCode::BAD_REQUEST,
            "validation_failed",
            "name and phone_number are required",
        ));
    }
    let student = state.students.create(facilitator.id, req);
    metrics::counter!("crm.students.created").increment(1);
    Ok((
        StatusCode::CREATED,
        Json(serde_json::json!({
            "success": true,
            "message": "Student created successfully",
            "student": student,
        })),
    ))
}

pub async fn update_student(
    State(state): State<AppState>,
    Extension(facilitator): Extension<Facilitator>,
    Path(id): Path<Uuid>,
    Json(req): Json<UpdateStudentRequest>,
) -> Result<Json<serde_json::Value>, ApiError> {
    match state.students.update(id, facilitator.id, req) {
        Some(student) => Ok(Json(serde_json::json!({
            "success": true,
            "message": "Student updated successfully",
            "student": student,
        }))),
        None => Err(envelope::error(
            StatusCode::NOT_FOUND,
            "not_found",
            "Student not found",
        )),
    }
}

/// Soft delete: clears the roster flag, the row itself stays.
pub async fn delete_student(
    State(state): State<AppState>,
    Extension(facilitator): Extension<Facilitator>,
    Path(id): Path<Uuid>,
) -> Result<Json<serde_json::Value>, ApiError> {
    if state.students.deactivate(id, facilitator.id) {
        Ok(Json(serde_json::json!({
            "success": true,
            "message": "Student deleted successfully"
        })))
    } else {
        Err(envelope::error(
            StatusCode::NOT_FOUND,
            "not_found",
            "Student not found",
        ))
    }
}

/// Bulk import. The request body is the raw CSV payload.
pub async fn import_csv(
    State(state): State<AppState>,
    Extension(facilitator): Extension<Facilitator>,
    body: Bytes,
) -> Result<Json<serde_json::Value>, ApiError> {
    let summary = import_students_csv(&state.students, facilitator.id, &body)
        .map_err(envelope::from_reach_error)?;
    metrics::counter!("crm.students.imported").increment(summary.imported as u64);
    Ok(Json(serde_json::json!({
        "success": true,
        "message": format!("Successfully imported {} students", summary.imported),
        "imported_count": summary.imported,
        "skipped_count": summary.skipped,
        "total_rows": summary.total_rows,
    })))
}

pub async fn sample_csv() -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "success": true,
        "sample_format": sample_csv_format(),
    }))
}
