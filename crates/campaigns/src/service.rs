//! Campaign lifecycle service — the surface the REST layer talks to.

use crate::audience;
use crate::dispatch::{CampaignOutcome, DispatchCoordinator};
use crate::store::{Campaign, CampaignCallLog, CampaignStore, CreateCampaignRequest};
use reach_core::types::{CampaignCounts, CampaignStatus};
use reach_core::{ReachError, ReachResult};
use reach_crm::{Student, StudentStore};
use serde::Serialize;
use std::sync::Arc;
use uuid::Uuid;

/// Snapshot returned by the status/polling endpoint.
#[derive(Debug, Clone, Serialize)]
pub struct CampaignStatusReport {
    pub campaign_id: Uuid,
    pub status: CampaignStatus,
    pub counts: CampaignCounts,
}

pub struct CampaignService {
    store: Arc<CampaignStore>,
    students: Arc<StudentStore>,
    dispatcher: DispatchCoordinator,
}

impl CampaignService {
    pub fn new(
        store: Arc<CampaignStore>,
        students: Arc<StudentStore>,
        dispatcher: DispatchCoordinator,
    ) -> Self {
        Self {
            store,
            students,
            dispatcher,
        }
    }

    pub fn create(
        &self,
        facilitator_id: Uuid,
        req: CreateCampaignRequest,
    ) -> ReachResult<Campaign> {
        if req.name.trim().is_empty() {
            return Err(ReachError::Validation("campaign name is required".into()));
        }
        if req.message_template.trim().is_empty() {
            return Err(ReachError::Validation("message_template is required".into()));
        }
        Ok(self.store.create(facilitator_id, req))
    }

    pub fn list(&self, facilitator_id: Uuid) -> Vec<Campaign> {
        self.store.list(facilitator_id)
    }

    /// Fetch a campaign, enforcing tenant ownership.
    pub fn get(&self, id: Uuid, facilitator_id: Uuid) -> ReachResult<Campaign> {
        self.store
            .get(id)
            .filter(|c| c.facilitator_id == facilitator_id)
            .ok_or_else(|| ReachError::NotFound(format!("campaign {id}")))
    }

    /// Resolve the recipient list without launching (preview).
    pub fn preview_targets(&self, id: Uuid, facilitator_id: Uuid) -> ReachResult<Vec<Student>> {
        let campaign = self.get(id, facilitator_id)?;
        let roster = self.students.roster(campaign.facilitator_id);
        Ok(audience::resolve(&campaign, &roster))
    }

    pub async fn launch(
        &self,
        id: Uuid,
        facilitator_id: Uuid,
        facilitator_name: Option<&str>,
    ) -> ReachResult<CampaignOutcome> {
        // Ownership check before touching campaign state.
        self.get(id, facilitator_id)?;
        self.dispatcher.launch(id, facilitator_name).await
    }

    pub fn status(&self, id: Uuid, facilitator_id: Uuid) -> ReachResult<CampaignStatusReport> {
        let campaign = self.get(id, facilitator_id)?;
        Ok(CampaignStatusReport {
            campaign_id: campaign.id,
            status: campaign.status,
            counts: campaign.counts,
        })
    }

    /// Operator escape hatch for manual reconciliation of interrupted runs.
    pub fn override_status(
        &self,
        id: Uuid,
        facilitator_id: Uuid,
        status: CampaignStatus,
    ) -> ReachResult<Campaign> {
        self.get(id, facilitator_id)?;
        self.store.override_status(id, status)
    }

    pub fn call_logs(&self, id: Uuid, facilitator_id: Uuid) -> ReachResult<Vec<CampaignCallLog>> {
        self.get(id, facilitator_id)?;
        Ok(self.store.call_logs_for(id))
    }

    /// Canned campaign templates offered in the creation UI.
    pub fn canned_templates() -> serde_json::Value {
        serde_json::json!({
            "workshop_promotion": {
                "name": "Workshop Promotion",
                "message_template": "Hi {student_name}! This is {caller_name} calling about {facilitator_name}'s upcoming workshop. We thought you'd be interested!",
                "target_audience": {
                    "student_types": ["regular", "trial"],
                    "statuses": ["active"]
                }
            },
            "class_reminder": {
                "name": "Class Reminder",
                "message_template": "Hi {student_name}! Reminder about your class with {facilitator_name} tomorrow.",
                "target_audience": {
                    "student_types": ["regular"],
                    "statuses": ["active"]
                }
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use reach_channels::{CallingProvider, WhatsAppProvider};
    use reach_core::config::{CallingConfig, WhatsAppConfig};
    use reach_core::types::{CampaignType, StudentStatus, StudentType, TargetAudience};
    use reach_crm::students::CreateStudentRequest;

    fn service() -> (CampaignService, Arc<StudentStore>) {
        let store = Arc::new(CampaignStore::new());
        let students = Arc::new(StudentStore::new());
        let dispatcher = DispatchCoordinator::new(
            store.clone(),
            students.clone(),
            Arc::new(WhatsAppProvider::new(WhatsAppConfig::default())),
            Arc::new(CallingProvider::new(CallingConfig::default())),
        );
        (
            CampaignService::new(store, students.clone(), dispatcher),
            students,
        )
    }

    fn create_request() -> CreateCampaignRequest {
        CreateCampaignRequest {
            name: "Workshop Promotion".to_string(),
            campaign_type: CampaignType::WhatsappBlast,
            description: None,
            message_template: "Hi {student_name}!".to_string(),
            target_audience: TargetAudience::default(),
        }
    }

    #[test]
    fn test_create_validates_required_fields() {
        let (service, _) = service();
        let mut req = create_request();
        req.message_template = "  ".to_string();
        assert!(matches!(
            service.create(Uuid::new_v4(), req),
            Err(ReachError::Validation(_))
        ));
    }

    #[test]
    fn test_get_enforces_ownership() {
        let (service, _) = service();
        let fid = Uuid::new_v4();
        let campaign = service.create(fid, create_request()).unwrap();

        assert!(service.get(campaign.id, fid).is_ok());
        assert!(matches!(
            service.get(campaign.id, Uuid::new_v4()),
            Err(ReachError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_status_reflects_launch() {
        let (service, students) = service();
        let fid = Uuid::new_v4();
        students.create(
            fid,
            CreateStudentRequest {
                name: "Asha".to_string(),
                phone_number: "+919876543210".to_string(),
                email: None,
                student_type: StudentType::Regular,
                status: StudentStatus::Active,
                notes: None,
            },
        );
        let campaign = service.create(fid, create_request()).unwrap();

        let before = service.status(campaign.id, fid).unwrap();
        assert_eq!(before.status, CampaignStatus::Draft);

        service
            .launch(campaign.id, fid, Some("Ravi"))
            .await
            .unwrap();
        let after = service.status(campaign.id, fid).unwrap();
        assert_eq!(after.status, CampaignStatus::Completed);
        assert_eq!(after.counts.sent, 1);
    }

    #[test]
    fn test_preview_does_not_change_state() {
        let (service, students) = service();
        let fid = Uuid::new_v4();
        students.create(
            fid,
            CreateStudentRequest {
                name: "Asha".to_string(),
                phone_number: "+919876543210".to_string(),
                email: None,
                student_type: StudentType::Regular,
                status: StudentStatus::Active,
                notes: None,
            },
        );
        let campaign = service.create(fid, create_request()).unwrap();

        let targets = service.preview_targets(campaign.id, fid).unwrap();
        assert_eq!(targets.len(), 1);
        assert_eq!(
            service.get(campaign.id, fid).unwrap().status,
            CampaignStatus::Draft
        );
        assert!(service.call_logs(campaign.id, fid).unwrap().is_empty());
    }

    #[test]
    fn test_canned_templates_cover_known_audiences() {
        let templates = CampaignService::canned_templates();
        assert!(templates.get("workshop_promotion").is_some());
        assert!(templates.get("class_reminder").is_some());
    }
}
