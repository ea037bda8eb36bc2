//! Twilio-style video rooms REST client.

use async_trait::async_trait;
use aula_config::ProviderSettings;
use serde::Deserialize;
use std::time::Duration;
use tracing::debug;

use super::{
    ProviderError, ProviderParticipant, ProviderSession, ProviderSessionStatus, SessionProvider,
};

pub struct TwilioVideoProvider {
    client: reqwest::Client,
    settings: ProviderSettings,
}

#[derive(Debug, Deserialize)]
struct RoomResource {
    sid: String,
    status: ProviderSessionStatus,
}

#[derive(Debug, Deserialize)]
struct ParticipantResource {
    sid: String,
    identity: String,
    status: String,
    duration: Option<u64>,
}

#[derive(Debug, Deserialize)]
struct ParticipantPage {
    participants: Vec<ParticipantResource>,
}

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    code: Option<i64>,
    message: Option<String>,
}

impl TwilioVideoProvider {
    pub fn new(settings: &ProviderSettings) -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(settings.request_timeout_secs))
            .build()
            .unwrap_or_default();

        Self {
            client,
            settings: settings.clone(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.settings.base_url, path)
    }

    /// Turns a non-2xx response into a `ProviderError`, keeping the
    /// provider's numeric code when the body carries one.
    async fn error_from_response(response: reqwest::Response) -> ProviderError {
        let status = response.status();
        match response.json::<ApiErrorBody>().await {
            Ok(body) => ProviderError {
                code: body.code,
                message: body
                    .message
                    .unwrap_or_else(|| format!("provider returned HTTP {status}")),
            },
            Err(_) => ProviderError::message(format!("provider returned HTTP {status}")),
        }
    }

    fn transport_error(err: reqwest::Error) -> ProviderError {
        if err.is_timeout() {
            ProviderError::message("provider request timed out")
        } else {
            ProviderError::message(format!("provider request failed: {err}"))
        }
    }
}

#[async_trait]
impl SessionProvider for TwilioVideoProvider {
    async fn create_session(
        &self,
        unique_name: &str,
        callback_url: &str,
    ) -> Result<ProviderSession, ProviderError> {
        let response = self
            .client
            .post(self.url("/v1/Rooms"))
            .basic_auth(&self.settings.account_sid, Some(&self.settings.auth_token))
            .form(&[
                ("UniqueName", unique_name),
                ("StatusCallback", callback_url),
                ("RecordParticipantsOnConnect", "true"),
                ("Type", "group"),
            ])
            .send()
            .await
            .map_err(Self::transport_error)?;

        if !response.status().is_success() {
            return Err(Self::error_from_response(response).await);
        }

        let room: RoomResource = response
            .json()
            .await
            .map_err(|e| ProviderError::message(format!("invalid provider response: {e}")))?;
        debug!(sid = %room.sid, "Created provider room");

        Ok(ProviderSession {
            id: room.sid,
            status: room.status,
        })
    }

    async fn get_session_status(
        &self,
        session_id: &str,
    ) -> Result<ProviderSessionStatus, ProviderError> {
        let response = self
            .client
            .get(self.url(&format!("/v1/Rooms/{session_id}")))
            .basic_auth(&self.settings.account_sid, Some(&self.settings.auth_token))
            .send()
            .await
            .map_err(Self::transport_error)?;

        if !response.status().is_success() {
            return Err(Self::error_from_response(response).await);
        }

        let room: RoomResource = response
            .json()
            .await
            .map_err(|e| ProviderError::message(format!("invalid provider response: {e}")))?;
        Ok(room.status)
    }

    async fn complete_session(&self, session_id: &str) -> Result<(), ProviderError> {
        let response = self
            .client
            .post(self.url(&format!("/v1/Rooms/{session_id}")))
            .basic_auth(&self.settings.account_sid, Some(&self.settings.auth_token))
            .form(&[("Status", "completed")])
            .send()
            .await
            .map_err(Self::transport_error)?;

        if !response.status().is_success() {
            return Err(Self::error_from_response(response).await);
        }
        debug!(sid = %session_id, "Completed provider room");
        Ok(())
    }

    async fn list_participants(
        &self,
        session_id: &str,
    ) -> Result<Vec<ProviderParticipant>, ProviderError> {
        let response = self
            .client
            .get(self.url(&format!("/v1/Rooms/{session_id}/Participants")))
            .basic_auth(&self.settings.account_sid, Some(&self.settings.auth_token))
            .send()
            .await
            .map_err(Self::transport_error)?;

        if !response.status().is_success() {
            return Err(Self::error_from_response(response).await);
        }

        let page: ParticipantPage = response
            .json()
            .await
            .map_err(|e| ProviderError::message(format!("invalid provider response: {e}")))?;

        Ok(page
            .participants
            .into_iter()
            .map(|p| ProviderParticipant {
                id: p.sid,
                identity: p.identity,
                status: p.status,
                duration_secs: p.duration,
            })
            .collect())
    }
}
