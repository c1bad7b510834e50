//! In-memory student roster backed by DashMap.
//!
//! Production: replace with PostgreSQL (sqlx) or similar ACID store.
//! This provides the same API surface for development and testing.

use chrono::{DateTime, Utc};
use dashmap::DashMap;
use reach_core::types::{StudentStatus, StudentType};
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicU64, Ordering};
use tracing::info;
use uuid::Uuid;

/// A student on a facilitator's roster. Never physically deleted;
/// removal clears `is_active`, leaving `status` as a pure targeting
/// dimension.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Student {
    pub id: Uuid,
    pub facilitator_id: Uuid,
    /// Monotonic insertion counter. Roster listings and campaign target
    /// resolution order by this, so dispatch order is deterministic.
    pub seq: u64,
    pub name: String,
    pub phone_number: String,
    pub email: Option<String>,
    pub student_type: StudentType,
    pub status: StudentStatus,
    /// Soft-delete flag. Inactive rows stay retrievable by id but leave
    /// listings and campaign targeting.
    pub is_active: bool,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreateStudentRequest {
    pub name: String,
    pub phone_number: String,
    pub email: Option<String>,
    #[serde(default = "default_student_type")]
    pub student_type: StudentType,
    #[serde(default = "default_student_status")]
    pub status: StudentStatus,
    pub notes: Option<String>,
}

fn default_student_type() -> StudentType {
    StudentType::Regular
}
fn default_student_status() -> StudentStatus {
    StudentStatus::Active
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateStudentRequest {
    pub name: Option<String>,
    pub phone_number: Option<String>,
    pub email: Option<String>,
    pub student_type: Option<StudentType>,
    pub status: Option<StudentStatus>,
    pub notes: Option<String>,
}

/// Optional listing filter, mirroring the roster query parameters.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct StudentFilter {
    pub student_type: Option<StudentType>,
    pub status: Option<StudentStatus>,
}

/// Thread-safe in-memory store for students, scoped by facilitator.
pub struct StudentStore {
    students: DashMap<Uuid, Student>,
    next_seq: AtomicU64,
}

impl StudentStore {
    pub fn new() -> Self {
        info!("Student store initialized (in-memory, development mode)");
        Self {
            students: DashMap::new(),
            next_seq: AtomicU64::new(0),
        }
    }

    pub fn create(&self, facilitator_id: Uuid, req: CreateStudentRequest) -> Student {
        let now = Utc::now();
        let student = Student {
            id: Uuid::new_v4(),
            facilitator_id,
            seq: self.next_seq.fetch_add(1, Ordering::Relaxed),
            name: req.name,
            phone_number: req.phone_number,
            email: req.email,
            student_type: req.student_type,
            status: req.status,
            is_active: true,
            notes: req.notes,
            created_at: now,
            updated_at: now,
        };
        self.students.insert(student.id, student.clone());
        student
    }

    pub fn get(&self, id: Uuid) -> Option<Student> {
        self.students.get(&id).map(|r| r.value().clone())
    }

    /// All of one facilitator's students in creation order, optionally
    /// narrowed by type/status.
    pub fn list(&self, facilitator_id: Uuid, filter: &StudentFilter) -> Vec<Student> {
        let mut students: Vec<Student> = self
            .students
            .iter()
            .filter(|r| r.value().facilitator_id == facilitator_id && r.value().is_active)
            .filter(|r| {
                filter
                    .student_type
                    .map_or(true, |t| r.value().student_type == t)
            })
            .filter(|r| filter.status.map_or(true, |s| r.value().status == s))
            .map(|r| r.value().clone())
            .collect();
        students.sort_by_key(|s| s.seq);
        students
    }

    /// The full roster for a facilitator in creation order. Campaign
    /// target resolution reads this, never the global table.
    pub fn roster(&self, facilitator_id: Uuid) -> Vec<Student> {
        self.list(facilitator_id, &StudentFilter::default())
    }

    pub fn update(
        &self,
        id: Uuid,
        facilitator_id: Uuid,
        req: UpdateStudentRequest,
    ) -> Option<Student> {
        let mut entry = self.students.get_mut(&id)?;
        if entry.value().facilitator_id != facilitator_id || !entry.value().is_active {
            return None;
        }
        let s = entry.value_mut();
        if let Some(name) = req.name {
            s.name = name;
        }
        if let Some(phone) = req.phone_number {
            s.phone_number = phone;
        }
        if let Some(email) = req.email {
            s.email = Some(email);
        }
        if let Some(student_type) = req.student_type {
            s.student_type = student_type;
        }
        if let Some(status) = req.status {
            s.status = status;
        }
        if let Some(notes) = req.notes {
            s.notes = Some(notes);
        }
        s.updated_at = Utc::now();
        Some(s.clone())
    }

    /// Soft delete: the row stays, `is_active` flips off.
    pub fn deactivate(&self, id: Uuid, facilitator_id: Uuid) -> bool {
        match self.students.get_mut(&id) {
            Some(mut entry) if entry.value().facilitator_id == facilitator_id => {
                entry.value_mut().is_active = false;
                entry.value_mut().updated_at = Utc::now();
                true
            }
            _ => false,
        }
    }
}

impl Default for StudentStore {
    fn default() -> Self {
        Self::new()
    }
}
