//! Audience resolution — turns a campaign's declarative target filter into
//! a concrete, deduplicated recipient list.

use crate::store::Campaign;
use reach_crm::Student;
use std::collections::HashSet;

/// Resolve the recipient set for a campaign against a facilitator-scoped
/// roster. Pure: no state is touched.
///
/// A student qualifies iff they are on the active roster (soft-deleted
/// rows never qualify) and every non-empty inclusion list in the target
/// audience contains their value. The result is deduplicated by student id
/// and keeps roster (creation) order, so dispatch order is deterministic
/// and repeat resolutions agree.
pub fn resolve(campaign: &Campaign, roster: &[Student]) -> Vec<Student> {
    let mut seen = HashSet::new();
    roster
        .iter()
        .filter(|s| s.facilitator_id == campaign.facilitator_id && s.is_active)
        .filter(|s| campaign.target_audience.matches(s.student_type, s.status))
        .filter(|s| seen.insert(s.id))
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::{CampaignStore, CreateCampaignRequest};
    use reach_core::types::{CampaignType, StudentStatus, StudentType, TargetAudience};
    use reach_crm::students::CreateStudentRequest;
    use reach_crm::StudentStore;
    use uuid::Uuid;

    fn student_request(name: &str, t: StudentType, s: StudentStatus) -> CreateStudentRequest {
        CreateStudentRequest {
            name: name.to_string(),
            phone_number: "+919876543210".to_string(),
            email: None,
            student_type: t,
            status: s,
            notes: None,
        }
    }

    fn campaign_with_audience(facilitator_id: Uuid, audience: TargetAudience) -> Campaign {
        CampaignStore::new().create(
            facilitator_id,
            CreateCampaignRequest {
                name: "Test".to_string(),
                campaign_type: CampaignType::WhatsappBlast,
                description: None,
                message_template: "Hi {student_name}!".to_string(),
                target_audience: audience,
            },
        )
    }

    // Status is a targeting dimension, not deletion: an unrestricted
    // audience reaches paused and lapsed students too, as long as they
    // are still on the active roster.
    #[test]
    fn test_empty_audience_selects_whole_roster_once() {
        let students = StudentStore::new();
        let fid = Uuid::new_v4();
        for (name, t, s) in [
            ("Asha", StudentType::Regular, StudentStatus::Active),
            ("Bina", StudentType::Trial, StudentStatus::Paused),
            ("Chand", StudentType::Former, StudentStatus::Inactive),
        ] {
            students.create(fid, student_request(name, t, s));
        }

        let campaign = campaign_with_audience(fid, TargetAudience::default());
        let resolved = resolve(&campaign, &students.roster(fid));
        assert_eq!(resolved.len(), 3);
        let ids: HashSet<Uuid> = resolved.iter().map(|s| s.id).collect();
        assert_eq!(ids.len(), 3);
    }

    #[test]
    fn test_filter_applies_on_both_dimensions() {
        let students = StudentStore::new();
        let fid = Uuid::new_v4();
        students.create(
            fid,
            student_request("Asha", StudentType::Regular, StudentStatus::Active),
        );
        students.create(
            fid,
            student_request("Bina", StudentType::Regular, StudentStatus::Paused),
        );
        students.create(
            fid,
            student_request("Chand", StudentType::Prospect, StudentStatus::Active),
        );

        let campaign = campaign_with_audience(
            fid,
            TargetAudience {
                student_types: vec![StudentType::Regular],
                statuses: vec![StudentStatus::Active],
            },
        );
        let resolved = resolve(&campaign, &students.roster(fid));
        assert_eq!(resolved.len(), 1);
        assert_eq!(resolved[0].name, "Asha");
    }

    #[test]
    fn test_soft_deleted_student_is_not_targeted() {
        let students = StudentStore::new();
        let fid = Uuid::new_v4();
        students.create(
            fid,
            student_request("Kept", StudentType::Regular, StudentStatus::Active),
        );
        let deleted = students.create(
            fid,
            student_request("Deleted", StudentType::Regular, StudentStatus::Active),
        );
        students.deactivate(deleted.id, fid);

        let campaign = campaign_with_audience(fid, TargetAudience::default());
        let resolved = resolve(&campaign, &students.roster(fid));
        assert_eq!(resolved.len(), 1);
        assert_eq!(resolved[0].name, "Kept");

        // Even over a raw list that includes the deleted row.
        let mut raw = students.roster(fid);
        raw.push(students.get(deleted.id).unwrap());
        let resolved = resolve(&campaign, &raw);
        assert_eq!(resolved.len(), 1);
        assert_eq!(resolved[0].name, "Kept");
    }

    #[test]
    fn test_no_cross_tenant_leakage() {
        let students = StudentStore::new();
        let fid = Uuid::new_v4();
        let other = Uuid::new_v4();
        students.create(
            fid,
            student_request("Mine", StudentType::Regular, StudentStatus::Active),
        );
        students.create(
            other,
            student_request("Theirs", StudentType::Regular, StudentStatus::Active),
        );

        let campaign = campaign_with_audience(fid, TargetAudience::default());

        // Resolution over a mixed roster still only yields the owner's rows.
        let mut mixed = students.roster(fid);
        mixed.extend(students.roster(other));
        let resolved = resolve(&campaign, &mixed);
        assert_eq!(resolved.len(), 1);
        assert_eq!(resolved[0].name, "Mine");
    }

    #[test]
    fn test_resolution_is_deterministic() {
        let students = StudentStore::new();
        let fid = Uuid::new_v4();
        for name in ["Asha", "Bina", "Chand", "Dev", "Esha"] {
            students.create(
                fid,
                student_request(name, StudentType::Regular, StudentStatus::Active),
            );
        }

        let campaign = campaign_with_audience(fid, TargetAudience::default());
        let first: Vec<Uuid> = resolve(&campaign, &students.roster(fid))
            .iter()
            .map(|s| s.id)
            .collect();
        let second: Vec<Uuid> = resolve(&campaign, &students.roster(fid))
            .iter()
            .map(|s| s.id)
            .collect();
        assert_eq!(first, second);
    }
}
