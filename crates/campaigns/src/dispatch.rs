//! Dispatch coordination — the launch flow.
//!
//! One logical flow per launch: guard the draft state, persist `launched`,
//! resolve the audience, then render/send/log each target independently.
//! A delivery failure is recorded against its target and never stops the
//! loop; the campaign still completes. There is no retry and no resume —
//! relaunch of a non-draft campaign is rejected, and recovery from an
//! interrupted run is a manual operator action.

use crate::audience;
use crate::store::CampaignStore;
use crate::template::{self, RenderContext};
use reach_channels::{CallingProvider, WhatsAppProvider};
use reach_core::types::{CampaignCounts, CampaignStatus, CampaignType, DeliveryOutcome};
use reach_core::ReachResult;
use reach_crm::StudentStore;
use serde::Serialize;
use std::sync::Arc;
use tracing::{info, warn};
use uuid::Uuid;

/// Result of one launch run.
#[derive(Debug, Clone, Serialize)]
pub struct CampaignOutcome {
    pub campaign_id: Uuid,
    pub status: CampaignStatus,
    pub counts: CampaignCounts,
}

pub struct DispatchCoordinator {
    store: Arc<CampaignStore>,
    students: Arc<StudentStore>,
    whatsapp: Arc<WhatsAppProvider>,
    calling: Arc<CallingProvider>,
}

impl DispatchCoordinator {
    pub fn new(
        store: Arc<CampaignStore>,
        students: Arc<StudentStore>,
        whatsapp: Arc<WhatsAppProvider>,
        calling: Arc<CallingProvider>,
    ) -> Self {
        Self {
            store,
            students,
            whatsapp,
            calling,
        }
    }

    /// Launch a draft campaign and run its dispatch loop to the end.
    ///
    /// `facilitator_name` feeds the `{facilitator_name}` placeholder; it
    /// comes from the authenticated session rather than the campaign row.
    pub async fn launch(
        &self,
        campaign_id: Uuid,
        facilitator_name: Option<&str>,
    ) -> ReachResult<CampaignOutcome> {
        // Atomic draft -> launched; a second concurrent launch fails here.
        let campaign = self.store.begin_launch(campaign_id)?;
        info!(campaign_id = %campaign.id, name = %campaign.name, "Campaign launched");

        let roster = self.students.roster(campaign.facilitator_id);
        let recipients = audience::resolve(&campaign, &roster);

        if recipients.is_empty() {
            info!(campaign_id = %campaign.id, "No qualifying targets, completing immediately");
            let finished = self.store.finish_launch(
                campaign_id,
                CampaignStatus::Completed,
                CampaignCounts::default(),
            )?;
            return Ok(CampaignOutcome {
                campaign_id,
                status: finished.status,
                counts: finished.counts,
            });
        }

        let mut counts = CampaignCounts {
            targets: recipients.len() as u64,
            ..CampaignCounts::default()
        };

        for student in &recipients {
            // Each target is independent: render, send, log exactly once.
            let target = self.store.record_target(
                campaign_id,
                student.id,
                &student.name,
                &student.phone_number,
            );

            let context =
                RenderContext::for_student(student).with_facilitator_name(facilitator_name);
            let message = template::render(&campaign.message_template, &context);

            let delivery = match campaign.campaign_type {
                CampaignType::WhatsappBlast => {
                    self.whatsapp.send_text(&student.phone_number, &message).await
                }
                CampaignType::Calling => {
                    self.calling.trigger_call(&student.phone_number, &message).await
                }
            };

            match delivery {
                Ok(provider_id) => {
                    counts.sent += 1;
                    metrics::counter!("dispatch.targets.sent").increment(1);
                    self.store.record_call_log(
                        &target,
                        message,
                        DeliveryOutcome::Sent,
                        Some(provider_id),
                        None,
                    );
                }
                Err(e) => {
                    counts.failed += 1;
                    metrics::counter!("dispatch.targets.failed").increment(1);
                    warn!(
                        campaign_id = %campaign.id,
                        student_id = %student.id,
                        error = %e,
                        "Delivery failed for target"
                    );
                    self.store.record_call_log(
                        &target,
                        message,
                        DeliveryOutcome::Failed,
                        None,
                        Some(e.to_string()),
                    );
                }
            }
        }

        // The run finished, so the campaign completes even when individual
        // targets failed; per-target failures live in the call log.
        let finished =
            self.store
                .finish_launch(campaign_id, CampaignStatus::Completed, counts)?;
        info!(
            campaign_id = %campaign.id,
            targets = counts.targets,
            sent = counts.sent,
            failed = counts.failed,
            "Campaign dispatch finished"
        );
        Ok(CampaignOutcome {
            campaign_id,
            status: finished.status,
            counts: finished.counts,
        })
    }
}
