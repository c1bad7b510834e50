//! In-memory campaign store backed by DashMap.
//!
//! Production: replace with PostgreSQL (sqlx) or similar ACID store; the
//! launch guard then becomes `UPDATE ... WHERE status = 'draft'` with an
//! affected-row check. Here the same check-and-set runs under the DashMap
//! entry lock, which is the unique writer for a campaign row.

use chrono::{DateTime, Utc};
use dashmap::DashMap;
use reach_core::types::{
    CampaignCounts, CampaignStatus, CampaignType, DeliveryOutcome, TargetAudience,
};
use reach_core::{ReachError, ReachResult};
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicU64, Ordering};
use tracing::info;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Campaign {
    pub id: Uuid,
    pub facilitator_id: Uuid,
    pub name: String,
    pub campaign_type: CampaignType,
    pub description: Option<String>,
    pub message_template: String,
    pub target_audience: TargetAudience,
    pub status: CampaignStatus,
    pub counts: CampaignCounts,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub launched_at: Option<DateTime<Utc>>,
    pub finished_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreateCampaignRequest {
    pub name: String,
    pub campaign_type: CampaignType,
    pub description: Option<String>,
    pub message_template: String,
    #[serde(default)]
    pub target_audience: TargetAudience,
}

/// A (campaign, student) pairing materialized at launch. Append-only.
#[derive(Debug, Clone, Serialize)]
pub struct CampaignTarget {
    pub id: Uuid,
    pub campaign_id: Uuid,
    pub student_id: Uuid,
    pub student_name: String,
    pub phone_number: String,
    pub seq: u64,
    pub resolved_at: DateTime<Utc>,
}

/// One dispatch attempt for one target. Append-only.
#[derive(Debug, Clone, Serialize)]
pub struct CampaignCallLog {
    pub id: Uuid,
    pub campaign_id: Uuid,
    pub target_id: Uuid,
    pub rendered_message: String,
    pub outcome: DeliveryOutcome,
    pub provider_message_id: Option<String>,
    pub error: Option<String>,
    pub seq: u64,
    pub attempted_at: DateTime<Utc>,
}

/// Thread-safe in-memory store for campaigns, resolved targets, and
/// per-target call logs.
pub struct CampaignStore {
    campaigns: DashMap<Uuid, Campaign>,
    targets: DashMap<Uuid, CampaignTarget>,
    call_logs: DashMap<Uuid, CampaignCallLog>,
    next_seq: AtomicU64,
}

impl CampaignStore {
    pub fn new() -> Self {
        info!("Campaign store initialized (in-memory, development mode)");
        Self {
            campaigns: DashMap::new(),
            targets: DashMap::new(),
            call_logs: DashMap::new(),
            next_seq: AtomicU64::new(0),
        }
    }

    // ─── Campaigns ─────────────────────────────────────────────────────────

    pub fn create(&self, facilitator_id: Uuid, req: CreateCampaignRequest) -> Campaign {
        let now = Utc::now();
        let campaign = Campaign {
            id: Uuid::new_v4(),
            facilitator_id,
            name: req.name,
            campaign_type: req.campaign_type,
            description: req.description,
            message_template: req.message_template,
            target_audience: req.target_audience,
            status: CampaignStatus::Draft,
            counts: CampaignCounts::default(),
            created_at: now,
            updated_at: now,
            launched_at: None,
            finished_at: None,
        };
        self.campaigns.insert(campaign.id, campaign.clone());
        campaign
    }

    pub fn get(&self, id: Uuid) -> Option<Campaign> {
        self.campaigns.get(&id).map(|r| r.value().clone())
    }

    pub fn list(&self, facilitator_id: Uuid) -> Vec<Campaign> {
        let mut campaigns: Vec<Campaign> = self
            .campaigns
            .iter()
            .filter(|r| r.value().facilitator_id == facilitator_id)
            .map(|r| r.value().clone())
            .collect();
        campaigns.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        campaigns
    }

    /// Atomic check-and-set `Draft -> Launched`. Runs under the entry lock,
    /// so two concurrent launch requests for the same campaign cannot both
    /// pass the guard.
    pub fn begin_launch(&self, id: Uuid) -> ReachResult<Campaign> {
        let mut entry = self
            .campaigns
            .get_mut(&id)
            .ok_or_else(|| ReachError::NotFound(format!("campaign {id}")))?;
        let campaign = entry.value_mut();
        if campaign.status != CampaignStatus::Draft {
            return Err(ReachError::InvalidCampaignState {
                actual: campaign.status,
            });
        }
        campaign.status = CampaignStatus::Launched;
        campaign.launched_at = Some(Utc::now());
        campaign.updated_at = Utc::now();
        Ok(campaign.clone())
    }

    /// Record the terminal state and aggregate counts after a launch run.
    /// Check-and-set like [`begin_launch`](Self::begin_launch): only a
    /// still-`Launched` campaign is finalized. If an operator override
    /// already moved it to a terminal state, that state stands and the
    /// row comes back unchanged.
    pub fn finish_launch(
        &self,
        id: Uuid,
        terminal: CampaignStatus,
        counts: CampaignCounts,
    ) -> ReachResult<Campaign> {
        debug_assert!(terminal.is_terminal());
        let mut entry = self
            .campaigns
            .get_mut(&id)
            .ok_or_else(|| ReachError::NotFound(format!("campaign {id}")))?;
        let campaign = entry.value_mut();
        if campaign.status != CampaignStatus::Launched {
            return Ok(campaign.clone());
        }
        campaign.status = terminal;
        campaign.counts = counts;
        campaign.finished_at = Some(Utc::now());
        campaign.updated_at = Utc::now();
        Ok(campaign.clone())
    }

    /// Operator escape hatch: manual status override. Only forward
    /// transitions of the state machine are accepted.
    pub fn override_status(&self, id: Uuid, status: CampaignStatus) -> ReachResult<Campaign> {
        let mut entry = self
            .campaigns
            .get_mut(&id)
            .ok_or_else(|| ReachError::NotFound(format!("campaign {id}")))?;
        let campaign = entry.value_mut();
        if !campaign.status.can_transition_to(status) {
            return Err(ReachError::InvalidCampaignState {
                actual: campaign.status,
            });
        }
        info!(campaign_id = %id, from = %campaign.status, to = %status, "Manual status override");
        campaign.status = status;
        if status.is_terminal() {
            campaign.finished_at = Some(Utc::now());
        }
        campaign.updated_at = Utc::now();
        Ok(campaign.clone())
    }

    // ─── Targets & call logs ───────────────────────────────────────────────

    pub fn record_target(
        &self,
        campaign_id: Uuid,
        student_id: Uuid,
        student_name: &str,
        phone_number: &str,
    ) -> CampaignTarget {
        let target = CampaignTarget {
            id: Uuid::new_v4(),
            campaign_id,
            student_id,
            student_name: student_name.to_string(),
            phone_number: phone_number.to_string(),
            seq: self.next_seq.fetch_add(1, Ordering::Relaxed),
            resolved_at: Utc::now(),
        };
        self.targets.insert(target.id, target.clone());
        target
    }

    pub fn record_call_log(
        &self,
        target: &CampaignTarget,
        rendered_message: String,
        outcome: DeliveryOutcome,
        provider_message_id: Option<String>,
        error: Option<String>,
    ) -> CampaignCallLog {
        let log = CampaignCallLog {
            id: Uuid::new_v4(),
            campaign_id: target.campaign_id,
            target_id: target.id,
            rendered_message,
            outcome,
            provider_message_id,
            error,
            seq: self.next_seq.fetch_add(1, Ordering::Relaxed),
            attempted_at: Utc::now(),
        };
        self.call_logs.insert(log.id, log.clone());
        log
    }

    pub fn targets_for(&self, campaign_id: Uuid) -> Vec<CampaignTarget> {
        let mut targets: Vec<CampaignTarget> = self
            .targets
            .iter()
            .filter(|r| r.value().campaign_id == campaign_id)
            .map(|r| r.value().clone())
            .collect();
        targets.sort_by_key(|t| t.seq);
        targets
    }

    pub fn call_logs_for(&self, campaign_id: Uuid) -> Vec<CampaignCallLog> {
        let mut logs: Vec<CampaignCallLog> = self
            .call_logs
            .iter()
            .filter(|r| r.value().campaign_id == campaign_id)
            .map(|r| r.value().clone())
            .collect();
        logs.sort_by_key(|l| l.seq);
        logs
    }
}

impl Default for CampaignStore {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn draft_campaign(store: &CampaignStore) -> Campaign {
        store.create(
            Uuid::new_v4(),
            CreateCampaignRequest {
                name: "Workshop Promotion".to_string(),
                campaign_type: CampaignType::WhatsappBlast,
                description: None,
                message_template: "Hi {student_name}!".to_string(),
                target_audience: TargetAudience::default(),
            },
        )
    }

    #[test]
    fn test_begin_launch_is_single_shot() {
        let store = CampaignStore::new();
        let campaign = draft_campaign(&store);

        let launched = store.begin_launch(campaign.id).unwrap();
        assert_eq!(launched.status, CampaignStatus::Launched);
        assert!(launched.launched_at.is_some());

        // Second launch attempt hits the guard.
        match store.begin_launch(campaign.id) {
            Err(ReachError::InvalidCampaignState { actual }) => {
                assert_eq!(actual, CampaignStatus::Launched)
            }
            other => panic!("expected InvalidCampaignState, got {other:?}"),
        }
    }

    #[test]
    fn test_finish_launch_records_counts() {
        let store = CampaignStore::new();
        let campaign = draft_campaign(&store);
        store.begin_launch(campaign.id).unwrap();

        let counts = CampaignCounts {
            targets: 3,
            sent: 2,
            failed: 1,
            no_response: 0,
        };
        let finished = store
            .finish_launch(campaign.id, CampaignStatus::Completed, counts)
            .unwrap();
        assert_eq!(finished.status, CampaignStatus::Completed);
        assert_eq!(finished.counts, counts);
        assert!(finished.finished_at.is_some());
    }

    #[test]
    fn test_finish_launch_does_not_overwrite_operator_override() {
        let store = CampaignStore::new();
        let campaign = draft_campaign(&store);
        store.begin_launch(campaign.id).unwrap();

        // Operator reconciles the run to Failed while dispatch is in flight.
        store
            .override_status(campaign.id, CampaignStatus::Failed)
            .unwrap();

        let counts = CampaignCounts {
            targets: 2,
            sent: 2,
            failed: 0,
            no_response: 0,
        };
        let after = store
            .finish_launch(campaign.id, CampaignStatus::Completed, counts)
            .unwrap();
        // Terminal states are frozen: the override wins, counts untouched.
        assert_eq!(after.status, CampaignStatus::Failed);
        assert_eq!(after.counts, CampaignCounts::default());
    }

    #[test]
    fn test_override_rejects_backward_transitions() {
        let store = CampaignStore::new();
        let campaign = draft_campaign(&store);
        store.begin_launch(campaign.id).unwrap();

        assert!(store
            .override_status(campaign.id, CampaignStatus::Draft)
            .is_err());
        assert!(store
            .override_status(campaign.id, CampaignStatus::Failed)
            .is_ok());
        // Terminal is terminal.
        assert!(store
            .override_status(campaign.id, CampaignStatus::Completed)
            .is_err());
    }

    #[test]
    fn test_call_logs_keep_append_order() {
        let store = CampaignStore::new();
        let campaign = draft_campaign(&store);
        let t1 = store.record_target(campaign.id, Uuid::new_v4(), "Asha", "+911111111111");
        let t2 = store.record_target(campaign.id, Uuid::new_v4(), "Bina", "+912222222222");
        store.record_call_log(&t1, "m1".into(), DeliveryOutcome::Sent, None, None);
        store.record_call_log(&t2, "m2".into(), DeliveryOutcome::Failed, None, Some("x".into()));

        let logs = store.call_logs_for(campaign.id);
        assert_eq!(logs.len(), 2);
        assert_eq!(logs[0].rendered_message, "m1");
        assert_eq!(logs[1].outcome, DeliveryOutcome::Failed);
    }
}
