//! External real-time session provider. The core only ever asks four things
//! of it: create a room, read a room's status, mark a room completed, and
//! list its participants. Everything else about the provider is opaque.

pub mod twilio;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Provider failures carry the provider's numeric error code when one was
/// returned; [`ProviderError::with_friendly`] swaps in a human-readable
/// message for the codes we know about and passes unknown codes through raw.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("{message}")]
pub struct ProviderError {
    pub code: Option<i64>,
    pub message: String,
}

impl ProviderError {
    pub fn message(message: impl Into<String>) -> Self {
        Self {
            code: None,
            message: message.into(),
        }
    }

    pub fn with_friendly(mut self, map: &[(i64, &str)]) -> Self {
        if let Some(code) = self.code {
            if let Some((_, friendly)) = map.iter().find(|(c, _)| *c == code) {
                self.message = (*friendly).to_string();
            }
        }
        self
    }
}

/// Fixed lookup from provider error codes to operator-facing messages.
/// Passed into the lifecycle service rather than read from a global.
pub const PROVIDER_ERROR_MESSAGES: &[(i64, &str)] = &[
    (53113, "Room exists!"),
    (53101, "Room name is too long!"),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ProviderSessionStatus {
    InProgress,
    Failed,
    Completed,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderSession {
    pub id: String,
    pub status: ProviderSessionStatus,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderParticipant {
    pub id: String,
    pub identity: String,
    pub status: String,
    pub duration_secs: Option<u64>,
}

#[async_trait]
pub trait SessionProvider: Send + Sync {
    async fn create_session(
        &self,
        unique_name: &str,
        callback_url: &str,
    ) -> Result<ProviderSession, ProviderError>;

    async fn get_session_status(
        &self,
        session_id: &str,
    ) -> Result<ProviderSessionStatus, ProviderError>;

    async fn complete_session(&self, session_id: &str) -> Result<(), ProviderError>;

    async fn list_participants(
        &self,
        session_id: &str,
    ) -> Result<Vec<ProviderParticipant>, ProviderError>;
}
