//! Offerings (workshops, courses, sessions) a facilitator promotes.

use chrono::{DateTime, Utc};
use dashmap::DashMap;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Offering {
    pub id: Uuid,
    pub facilitator_id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub timing: Option<String>,
    pub prerequisite: Option<String>,
    pub price: Option<f64>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreateOfferingRequest {
    pub title: String,
    pub description: Option<String>,
    pub timing: Option<String>,
    pub prerequisite: Option<String>,
    pub price: Option<f64>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateOfferingRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    pub timing: Option<String>,
    pub prerequisite: Option<String>,
    pub price: Option<f64>,
}

/// Thread-safe in-memory offering store, scoped by facilitator.
pub struct OfferingStore {
    offerings: DashMap<Uuid, Offering>,
}

impl OfferingStore {
    pub fn new() -> Self {
        Self {
            offerings: DashMap::new(),
        }
    }

    pub fn create(&self, facilitator_id: Uuid, req: CreateOfferingRequest) -> Offering {
        let now = Utc::now();
        let offering = Offering {
            id: Uuid::new_v4(),
            facilitator_id,
            title: req.title,
            description: req.description,
            timing: req.timing,
            prerequisite: req.prerequisite,
            price: req.price,
            is_active: true,
            created_at: now,
            updated_at: now,
        };
        self.offerings.insert(offering.id, offering.clone());
        offering
    }

    pub fn get(&self, id: Uuid) -> Option<Offering> {
        self.offerings.get(&id).map(|r| r.value().clone())
    }

    pub fn list(&self, facilitator_id: Uuid) -> Vec<Offering> {
        let mut offerings: Vec<Offering> = self
            .offerings
            .iter()
            .filter(|r| r.value().facilitator_id == facilitator_id && r.value().is_active)
            .map(|r| r.value().clone())
            .collect();
        offerings.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        offerings
    }

    pub fn update(
        &self,
        id: Uuid,
        facilitator_id: Uuid,
        req: UpdateOfferingRequest,
    ) -> Option<Offering> {
        let mut entry = self.offerings.get_mut(&id)?;
        if entry.value().facilitator_id != facilitator_id || !entry.value().is_active {
            return None;
        }
        let o = entry.value_mut();
        if let Some(title) = req.title {
            o.title = title;
        }
        if let Some(description) = req.description {
            o.description = Some(description);
        }
        if let Some(timing) = req.timing {
            o.timing = Some(timing);
        }
        if let Some(prerequisite) = req.prerequisite {
            o.prerequisite = Some(prerequisite);
        }
        if let Some(price) = req.price {
            o.price = Some(price);
        }
        o.updated_at = Utc::now();
        Some(o.clone())
    }

    /// Soft delete.
    pub fn deactivate(&self, id: Uuid, facilitator_id: Uuid) -> bool {
        match self.offerings.get_mut(&id) {
            Some(mut entry) if entry.value().facilitator_id == facilitator_id => {
                entry.value_mut().is_active = false;
                entry.value_mut().updated_at = Utc::now();
                true
            }
            _ => false,
        }
    }
}

impl Default for OfferingStore {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deactivated_offering_leaves_listing() {
        let store = OfferingStore::new();
        let fid = Uuid::new_v4();
        let offering = store.create(
            fid,
            CreateOfferingRequest {
                title: "Morning Yoga".to_string(),
                description: None,
                timing: Some("Mon/Wed 7am".to_string()),
                prerequisite: None,
                price: Some(1200.0),
            },
        );

        assert_eq!(store.list(fid).len(), 1);
        assert!(store.deactivate(offering.id, fid));
        assert!(store.list(fid).is_empty());
        // Row still retrievable directly.
        assert!(store.get(offering.id).is_some());
    }
}
