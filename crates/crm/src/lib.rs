//! Roster management: students, CSV import, offerings.

pub mod import;
pub mod offerings;
pub mod students;

pub use import::{import_students_csv, sample_csv_format, ImportSummary};
pub use offerings::{CreateOfferingRequest, Offering, OfferingStore, UpdateOfferingRequest};
pub use students::{
    CreateStudentRequest, Student, StudentFilter, StudentStore, UpdateStudentRequest,
};
