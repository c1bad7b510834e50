use thiserror::Error;

use crate::types::CampaignStatus;

pub type ReachResult<T> = Result<T, ReachError>;

/// Domain error taxonomy. Per-target delivery failures are deliberately
/// absent: they are recorded in call logs and never propagate as errors.
#[derive(Error, Debug)]
pub enum ReachError {
    #[error("Invalid target rule: {0}")]
    InvalidTargetRule(String),

    #[error("Invalid campaign state: expected draft, found {actual}")]
    InvalidCampaignState { actual: CampaignStatus },

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Authentication error: {0}")]
    Auth(String),
}
