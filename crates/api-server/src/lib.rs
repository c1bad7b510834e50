//! REST surface for StudioReach.

pub mod auth_rest;
pub mod campaigns_rest;
pub mod envelope;
pub mod offerings_rest;
pub mod server;
pub mod students_rest;

pub use server::{ApiServer, AppState};
