use serde::{Deserialize, Serialize};

/// Classification of a student on the facilitator's roster.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum StudentType {
    Regular,
    Trial,
    Former,
    Prospect,
}

/// Roster lifecycle status. Students are never physically deleted;
/// removal is a transition to `Inactive`.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum StudentStatus {
    Active,
    Inactive,
    Paused,
}

/// Outbound channel a campaign dispatches through.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum CampaignType {
    WhatsappBlast,
    Calling,
}

/// Campaign lifecycle. Transitions are monotonic:
/// `Draft -> Launched -> {Completed, Failed}`; never back to `Draft`.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum CampaignStatus {
    Draft,
    Launched,
    Completed,
    Failed,
}

impl CampaignStatus {
    pub fn is_terminal(&self) -> bool {
        matches!(self, CampaignStatus::Completed | CampaignStatus::Failed)
    }

    /// Whether a transition to `next` is allowed by the state machine.
    pub fn can_transition_to(&self, next: CampaignStatus) -> bool {
        match self {
            CampaignStatus::Draft => next != CampaignStatus::Draft,
            CampaignStatus::Launched => next.is_terminal(),
            CampaignStatus::Completed | CampaignStatus::Failed => false,
        }
    }
}

impl std::fmt::Display for CampaignStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            CampaignStatus::Draft => "draft",
            CampaignStatus::Launched => "launched",
            CampaignStatus::Completed => "completed",
            CampaignStatus::Failed => "failed",
        };
        f.write_str(s)
    }
}

/// Terminal outcome of one dispatch attempt.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum DeliveryOutcome {
    Sent,
    Failed,
    NoResponse,
}

/// Declarative recipient filter: two inclusion lists. An empty list places
/// no restriction on that dimension.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TargetAudience {
    #[serde(default)]
    pub student_types: Vec<StudentType>,
    #[serde(default)]
    pub statuses: Vec<StudentStatus>,
}

impl TargetAudience {
    /// A student qualifies iff every non-empty list contains their value.
    pub fn matches(&self, student_type: StudentType, status: StudentStatus) -> bool {
        (self.student_types.is_empty() || self.student_types.contains(&student_type))
            && (self.statuses.is_empty() || self.statuses.contains(&status))
    }
}

/// Aggregate per-campaign dispatch counters.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct CampaignCounts {
    pub targets: u64,
    pub sent: u64,
    pub failed: u64,
    pub no_response: u64,
}
