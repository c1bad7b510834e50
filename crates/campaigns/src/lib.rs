//! Campaign targeting and dispatch: audience resolution, template
//! rendering, per-target delivery, and campaign lifecycle.

pub mod audience;
pub mod dispatch;
pub mod service;
pub mod store;
pub mod template;

pub use dispatch::{CampaignOutcome, DispatchCoordinator};
pub use service::{CampaignService, CampaignStatusReport};
pub use store::{Campaign, CampaignCallLog, CampaignStore, CampaignTarget, CreateCampaignRequest};
pub use template::{render, RenderContext};
