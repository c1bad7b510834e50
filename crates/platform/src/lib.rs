//! Platform services: phone-OTP authentication and bearer sessions.

pub mod auth;

pub use auth::{AuthService, Facilitator, VerifiedSession};
