//! Automated outbound calling via a LiveKit-style dispatch.
//!
//! Triggering a call creates a named room and hands the rendered script to
//! the voice agent. Stubbed for development; the room name format matches
//! what the operations tooling expects.

use crate::phone::{clean_phone_number, is_dialable};
use anyhow::bail;
use chrono::Utc;
use reach_core::config::CallingConfig;
use tracing::info;

pub struct CallingProvider {
    config: CallingConfig,
}

impl CallingProvider {
    pub fn new(config: CallingConfig) -> Self {
        info!(
            url = %config.url,
            agent = %config.agent_name,
            "Calling provider initialized"
        );
        Self { config }
    }

    /// Trigger one outbound call. Returns the dispatch room name.
    pub async fn trigger_call(&self, to: &str, script: &str) -> anyhow::Result<String> {
        let cleaned = clean_phone_number(to);
        if !is_dialable(&cleaned) {
            bail!("unusable phone number: {to:?}");
        }

        let room_name = format!(
            "outreach-call-{}-{}",
            Utc::now().format("%Y%m%d-%H%M%S"),
            cleaned.trim_start_matches('+')
        );

        metrics::counter!("channels.calls.triggered").increment(1);
        info!(
            to = %cleaned,
            room = %room_name,
            agent = %self.config.agent_name,
            script_len = script.len(),
            "Dispatching outbound call"
        );
        Ok(room_name)
    }
}
