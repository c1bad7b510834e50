//! Phone-OTP authentication and bearer-token session management.
//!
//! A facilitator signs in with their phone number: we issue a 6-digit
//! one-time code (logged in development, SMS in production), verify it,
//! and hand back a bearer token. First verification creates the
//! facilitator record.

use chrono::{DateTime, Duration, Utc};
use dashmap::DashMap;
use rand::Rng;
use reach_core::config::AuthConfig;
use reach_core::{ReachError, ReachResult};
use serde::Serialize;
use tracing::info;
use uuid::Uuid;

/// The practitioner/tenant who owns students, offerings, and campaigns.
#[derive(Debug, Clone, Serialize)]
pub struct Facilitator {
    pub id: Uuid,
    pub phone_number: String,
    pub name: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
struct OtpChallenge {
    code: String,
    expires_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
struct Session {
    facilitator_id: Uuid,
    expires_at: DateTime<Utc>,
}

/// Result of a successful OTP verification.
#[derive(Debug, Clone, Serialize)]
pub struct VerifiedSession {
    pub token: String,
    pub facilitator_id: Uuid,
    /// True when this verification created the facilitator record
    /// (client routes to onboarding instead of the dashboard).
    pub is_new_facilitator: bool,
    pub expires_at: DateTime<Utc>,
}

/// Central auth state: facilitators keyed by phone, pending challenges,
/// and live sessions keyed by bearer token.
pub struct AuthService {
    config: AuthConfig,
    facilitators: DashMap<String, Facilitator>,
    challenges: DashMap<String, OtpChallenge>,
    sessions: DashMap<String, Session>,
}

impl AuthService {
    pub fn new(config: AuthConfig) -> Self {
        Self {
            config,
            facilitators: DashMap::new(),
            challenges: DashMap::new(),
            sessions: DashMap::new(),
        }
    }

    /// Issue a one-time code for a phone number, replacing any pending one.
    pub fn send_otp(&self, phone_number: &str) -> ReachResult<()> {
        let phone = phone_number.trim();
        if phone.is_empty() {
            return Err(ReachError::Validation("phone number is required".into()));
        }

        let code = format!("{:06}", rand::thread_rng().gen_range(0..1_000_000u32));
        let expires_at = Utc::now() + Duration::seconds(self.config.otp_ttl_secs as i64);
        self.challenges.insert(
            phone.to_string(),
            OtpChallenge {
                code: code.clone(),
                expires_at,
            },
        );

        // Development transport: the code goes to the log instead of SMS.
        info!(phone = %phone, code = %code, "OTP issued");
        Ok(())
    }

    /// Verify a code, consume the challenge, and open a session.
    pub fn verify_otp(&self, phone_number: &str, code: &str) -> ReachResult<VerifiedSession> {
        let phone = phone_number.trim();
        if code.len() != 6 || !code.chars().all(|c| c.is_ascii_digit()) {
            return Err(ReachError::Validation("OTP must be 6 digits".into()));
        }

        let (_, challenge) = self
            .challenges
            .remove(phone)
            .ok_or_else(|| ReachError::Auth("no pending code for this number".into()))?;
        if challenge.expires_at < Utc::now() {
            return Err(ReachError::Auth("code expired".into()));
        }
        if challenge.code != code {
            return Err(ReachError::Auth("incorrect code".into()));
        }

        let is_new = !self.facilitators.contains_key(phone);
        let facilitator = self
            .facilitators
            .entry(phone.to_string())
            .or_insert_with(|| Facilitator {
                id: Uuid::new_v4(),
                phone_number: phone.to_string(),
                name: None,
                created_at: Utc::now(),
            })
            .clone();

        let token = Uuid::new_v4().to_string();
        let expires_at = Utc::now() + Duration::hours(self.config.session_ttl_hours as i64);
        self.sessions.insert(
            token.clone(),
            Session {
                facilitator_id: facilitator.id,
                expires_at,
            },
        );

        info!(facilitator_id = %facilitator.id, new = is_new, "Session opened");
        Ok(VerifiedSession {
            token,
            facilitator_id: facilitator.id,
            is_new_facilitator: is_new,
            expires_at,
        })
    }

    /// Resolve a bearer token to its facilitator. Expired sessions are
    /// dropped on sight.
    pub fn authenticate(&self, token: &str) -> Option<Facilitator> {
        let session = self.sessions.get(token)?.value().clone();
        if session.expires_at < Utc::now() {
            drop(self.sessions.remove(token));
            return None;
        }
        self.facilitators
            .iter()
            .find(|r| r.value().id == session.facilitator_id)
            .map(|r| r.value().clone())
    }

    /// Update the facilitator's display name (profile onboarding).
    pub fn set_facilitator_name(&self, facilitator_id: Uuid, name: &str) -> bool {
        for mut entry in self.facilitators.iter_mut() {
            if entry.value().id == facilitator_id {
                entry.value_mut().name = Some(name.to_string());
                return true;
            }
        }
        false
    }

    #[cfg(test)]
    fn pending_code(&self, phone: &str) -> Option<String> {
        self.challenges.get(phone).map(|c| c.value().code.clone())
    }
}
