//! Bulk roster import from CSV.
//!
//! Accepted headers: `name, phone_number, email, student_type, status, notes`.
//! Rows missing a name or phone number are skipped rather than failing the
//! whole upload; unknown type/status values fall back to defaults.

use crate::students::{CreateStudentRequest, StudentStore};
use reach_core::types::{StudentStatus, StudentType};
use reach_core::{ReachError, ReachResult};
use serde::Serialize;
use tracing::{info, warn};
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct ImportSummary {
    pub imported: usize,
    pub skipped: usize,
    pub total_rows: usize,
}

/// Parse CSV bytes and create one student per usable row.
pub fn import_students_csv(
    store: &StudentStore,
    facilitator_id: Uuid,
    data: &[u8],
) -> ReachResult<ImportSummary> {
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(data);

    let headers = reader
        .headers()
        .map_err(|e| ReachError::Validation(format!("unreadable CSV header: {e}")))?
        .clone();
    let column = |name: &str| headers.iter().position(|h| h.eq_ignore_ascii_case(name));

    let name_col = column("name")
        .ok_or_else(|| ReachError::Validation("CSV is missing a 'name' column".into()))?;
    let phone_col = column("phone_number")
        .ok_or_else(|| ReachError::Validation("CSV is missing a 'phone_number' column".into()))?;
    let email_col = column("email");
    let type_col = column("student_type");
    let status_col = column("status");
    let notes_col = column("notes");

    let mut summary = ImportSummary {
        imported: 0,
        skipped: 0,
        total_rows: 0,
    };

    for record in reader.records() {
        let record =
            record.map_err(|e| ReachError::Validation(format!("unreadable CSV row: {e}")))?;
        summary.total_rows += 1;

        let field = |col: Option<usize>| -> Option<String> {
            col.and_then(|i| record.get(i))
                .filter(|v| !v.is_empty())
                .map(str::to_string)
        };

        let (name, phone_number) = match (field(Some(name_col)), field(Some(phone_col))) {
            (Some(name), Some(phone)) => (name, phone),
            _ => {
                warn!(row = summary.total_rows, "Skipping CSV row without name/phone");
                summary.skipped += 1;
                continue;
            }
        };

        store.create(
            facilitator_id,
            CreateStudentRequest {
                name,
                phone_number,
                email: field(email_col),
                student_type: field(type_col)
                    .and_then(|v| parse_student_type(&v))
                    .unwrap_or(StudentType::Regular),
                status: field(status_col)
                    .and_then(|v| parse_student_status(&v))
                    .unwrap_or(StudentStatus::Active),
                notes: field(notes_col),
            },
        );
        summary.imported += 1;
    }

    info!(
        facilitator_id = %facilitator_id,
        imported = summary.imported,
        skipped = summary.skipped,
        "CSV roster import finished"
    );
    Ok(summary)
}

fn parse_student_type(value: &str) -> Option<StudentType> {
    match value.to_ascii_lowercase().as_str() {
        "regular" => Some(StudentType::Regular),
        "trial" => Some(StudentType::Trial),
        "former" => Some(StudentType::Former),
        "prospect" => Some(StudentType::Prospect),
        _ => None,
    }
}

fn parse_student_status(value: &str) -> Option<StudentStatus> {
    match value.to_ascii_lowercase().as_str() {
        "active" => Some(StudentStatus::Active),
        "inactive" => Some(StudentStatus::Inactive),
        "paused" => Some(StudentStatus::Paused),
        _ => None,
    }
}

/// Reference format served by `GET /api/students/sample-csv`.
pub fn sample_csv_format() -> serde_json::Value {
    serde_json::json!({
        "headers": ["name", "phone_number", "email", "student_type", "status", "notes"],
        "example_row": {
            "name": "John Doe",
            "phone_number": "+1234567890",
            "email": "john@example.com",
            "student_type": "regular",
            "status": "active",
            "notes": "Prefers morning classes"
        },
        "valid_student_types": ["regular", "trial", "former", "prospect"],
        "valid_statuses": ["active", "inactive", "paused"]
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_import_creates_students_in_row_order() {
        let store = StudentStore::new();
        let fid = Uuid::new_v4();
        let csv = b"name,phone_number,email,student_type,status,notes\n\
            Asha,+919876543210,asha@example.com,regular,active,\n\
            Bina,+919876543211,,trial,paused,Evening only\n";

        let summary = import_students_csv(&store, fid, csv).unwrap();
        assert_eq!(
            summary,
            ImportSummary {
                imported: 2,
                skipped: 0,
                total_rows: 2
            }
        );

        let roster = store.roster(fid);
        assert_eq!(roster[0].name, "Asha");
        assert_eq!(roster[1].name, "Bina");
        assert_eq!(roster[1].student_type, StudentType::Trial);
        assert_eq!(roster[1].status, StudentStatus::Paused);
        assert_eq!(roster[1].notes.as_deref(), Some("Evening only"));
    }

    #[test]
    fn test_rows_without_phone_are_skipped() {
        let store = StudentStore::new();
        let fid = Uuid::new_v4();
        let csv = b"name,phone_number\nAsha,+919876543210\nNoPhone,\n";

        let summary = import_students_csv(&store, fid, csv).unwrap();
        assert_eq!(summary.imported, 1);
        assert_eq!(summary.skipped, 1);
        assert_eq!(store.roster(fid).len(), 1);
    }

    #[test]
    fn test_unknown_type_falls_back_to_regular() {
        let store = StudentStore::new();
        let fid = Uuid::new_v4();
        let csv = b"name,phone_number,student_type\nAsha,+919876543210,alumni\n";

        import_students_csv(&store, fid, csv).unwrap();
        assert_eq!(store.roster(fid)[0].student_type, StudentType::Regular);
    }

    #[test]
    fn test_missing_required_column_fails() {
        let store = StudentStore::new();
        let result = import_students_csv(&store, Uuid::new_v4(), b"name,email\nAsha,a@b.c\n");
        assert!(matches!(result, Err(ReachError::Validation(_))));
    }
}
