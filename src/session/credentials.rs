//! Client side of credential issuance

use async_trait::async_trait;
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};

use super::config::{validate_token, validate_url, ConnectionConfig, Role};
use super::{SessionError, SessionManager};

/// Body of a token request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CredentialRequest {
    pub room_name: String,
    pub participant_name: String,
    pub role: Role,
}

impl CredentialRequest {
    pub fn new(room_name: impl Into<String>, participant_name: impl Into<String>, role: Role) -> Self {
        Self {
            room_name: room_name.into(),
            participant_name: participant_name.into(),
            role,
        }
    }
}

/// `{ token, url }` as returned by the issuing endpoint
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IssuedCredential {
    pub token: String,
    pub url: String,
}

impl std::fmt::Debug for IssuedCredential {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("IssuedCredential")
            .field("token", &"[REDACTED]")
            .field("url", &self.url)
            .finish()
    }
}

impl IssuedCredential {
    /// Same shape checks `connect` applies, reported as an issuance failure
    pub fn validate(&self) -> Result<(), SessionError> {
        validate_token(&self.token)
            .and_then(|_| validate_url(&self.url))
            .map_err(|e| SessionError::CredentialIssuanceFailed(e.to_string()))
    }

    pub fn into_config(self, request: &CredentialRequest) -> ConnectionConfig {
        ConnectionConfig {
            url: self.url,
            token: self.token,
            room_name: request.room_name.clone(),
            participant_name: request.participant_name.clone(),
            role: request.role,
        }
    }
}

/// Issues room access credentials
#[async_trait]
pub trait CredentialProvider: Send + Sync {
    async fn issue(&self, request: &CredentialRequest) -> Result<IssuedCredential, SessionError>;
}

/// Requests credentials from an HTTP endpoint (`POST /api/token`)
#[derive(Debug, Clone)]
pub struct HttpCredentialProvider {
    client: reqwest::Client,
    endpoint: String,
}

impl HttpCredentialProvider {
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self::with_client(reqwest::Client::new(), endpoint)
    }

    pub fn with_client(client: reqwest::Client, endpoint: impl Into<String>) -> Self {
        Self {
            client,
            endpoint: endpoint.into(),
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl CredentialProvider for HttpCredentialProvider {
    async fn issue(&self, request: &CredentialRequest) -> Result<IssuedCredential, SessionError> {
        tracing::info!(
            room = %request.room_name,
            participant = %request.participant_name,
            role = %request.role,
            "Requesting access token"
        );

        let response = self
            .client
            .post(&self.endpoint)
            .json(request)
            .send()
            .await
            .map_err(|e| {
                tracing::error!(error = %e, endpoint = %self.endpoint, "Token request failed");
                SessionError::CredentialIssuanceFailed(format!("Token request failed: {}", e))
            })?;

        let status = response.status();
        let body = response.text().await.map_err(|e| {
            SessionError::CredentialIssuanceFailed(format!("Failed to read token response: {}", e))
        })?;

        if !status.is_success() {
            tracing::error!(status = status.as_u16(), room = %request.room_name, "Token request rejected");
            return Err(SessionError::CredentialIssuanceFailed(error_message(status, &body)));
        }

        let credential = parse_credential(&body)?;
        tracing::info!(room = %request.room_name, "Access token received");
        Ok(credential)
    }
}

/// Parse and shape-check a successful token response body
pub fn parse_credential(body: &str) -> Result<IssuedCredential, SessionError> {
    let credential: IssuedCredential = serde_json::from_str(body).map_err(|e| {
        SessionError::CredentialIssuanceFailed(format!("Malformed token response: {}", e))
    })?;
    credential.validate()?;
    Ok(credential)
}

/// Pull a message out of an error body: `{"error": "..."}` or
/// `{"error": {"message": "..."}}`, else the raw status and body
fn error_message(status: StatusCode, body: &str) -> String {
    match serde_json::from_str::<serde_json::Value>(body) {
        Ok(json) => {
            let error = &json["error"];
            error
                .as_str()
                .or_else(|| error["message"].as_str())
                .unwrap_or("Failed to get access token")
                .to_string()
        }
        Err(_) => format!("HTTP {}: {}", status.as_u16(), body),
    }
}

/// Issue a credential and connect the manager with it
pub async fn join_room(
    manager: &SessionManager,
    provider: &dyn CredentialProvider,
    request: CredentialRequest,
) -> Result<(), SessionError> {
    let credential = provider.issue(&request).await?;
    manager.connect(credential.into_config(&request)).await
}
