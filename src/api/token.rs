//! Room access token issuance (`POST /api/token`).

use axum::{extract::rejection::JsonRejection, extract::State, Json};
use serde::{Deserialize, Serialize};

use crate::error::{AppError, Result};
use crate::metrics::TokenMetrics;
use crate::server::AppState;
use crate::session::Role;

/// Request for a room access token
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenRequest {
    #[serde(default)]
    pub room_name: Option<String>,
    #[serde(default)]
    pub participant_name: Option<String>,
    /// moderator, participant (or debater), audience; defaults to audience
    #[serde(default)]
    pub role: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct TokenResponse {
    pub token: String,
    pub url: String,
}

fn required(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

pub async fn issue_token(
    State(state): State<AppState>,
    payload: std::result::Result<Json<TokenRequest>, JsonRejection>,
) -> Result<Json<TokenResponse>> {
    let Json(request) = payload.map_err(|e| {
        TokenMetrics::record_rejected("malformed");
        AppError::Validation(format!("Invalid request body: {}", e.body_text()))
    })?;

    let (Some(room), Some(identity)) = (
        required(request.room_name.as_deref()),
        required(request.participant_name.as_deref()),
    ) else {
        TokenMetrics::record_rejected("validation");
        return Err(AppError::Validation(
            "Room name and participant name are required".to_string(),
        ));
    };

    let role = request
        .role
        .as_deref()
        .map(Role::parse_lenient)
        .unwrap_or(Role::Audience);

    let issued = state.token_issuer.issue(room, identity, role)?;
    TokenMetrics::record_issued(role);

    tracing::info!(
        room = %room,
        identity = %identity,
        role = %role,
        jti = %issued.claims.jti,
        "Issued room access token"
    );

    Ok(Json(TokenResponse {
        token: issued.token,
        url: state.settings.livekit.url.clone(),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        body::{to_bytes, Body},
        http::{Request, StatusCode},
    };
    use tower::ServiceExt;

    use crate::auth::AccessTokenValidator;
    use crate::server::{create_app, test_settings};

    async fn post_token(body: &str) -> (StatusCode, serde_json::Value) {
        let app = create_app(AppState::new(test_settings()));
        let response = app
            .oneshot(
                Request::post("/api/token")
                    .header("content-type", "application/json")
                    .body(Body::from(body.to_string()))
                    .unwrap(),
            )
            .await
            .unwrap();

        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    fn decode(json: &serde_json::Value) -> crate::auth::RoomClaims {
        AccessTokenValidator::new(&test_settings().livekit)
            .validate(json["token"].as_str().unwrap())
            .unwrap()
    }

    #[tokio::test]
    async fn test_issue_for_debater() {
        let (status, json) =
            post_token(r#"{"roomName":"debate-1","participantName":"alice","role":"debater"}"#)
                .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["url"], "wss://media.example.com");

        let claims = decode(&json);
        assert_eq!(claims.identity(), "alice");
        assert!(claims.video.can_publish);
        assert!(!claims.video.room_admin);
    }

    #[tokio::test]
    async fn test_role_defaults_to_audience() {
        let (status, json) =
            post_token(r#"{"roomName":"debate-1","participantName":"carol"}"#).await;

        assert_eq!(status, StatusCode::OK);
        let claims = decode(&json);
        assert!(!claims.video.can_publish);
        assert!(claims.video.can_subscribe);
    }

    #[tokio::test]
    async fn test_unknown_role_is_audience() {
        let (_, json) = post_token(
            r#"{"roomName":"debate-1","participantName":"dave","role":"superuser"}"#,
        )
        .await;

        let claims = decode(&json);
        assert!(!claims.video.can_publish && !claims.video.room_admin);
    }

    #[tokio::test]
    async fn test_moderator_grant() {
        let (_, json) = post_token(
            r#"{"roomName":"debate-1","participantName":"mod","role":"moderator"}"#,
        )
        .await;

        let claims = decode(&json);
        assert!(claims.video.room_admin && claims.video.room_record);
    }

    #[tokio::test]
    async fn test_missing_names_rejected() {
        for body in [
            r#"{"participantName":"alice"}"#,
            r#"{"roomName":"debate-1"}"#,
            r#"{"roomName":"  ","participantName":"alice"}"#,
        ] {
            let (status, json) = post_token(body).await;
            assert_eq!(status, StatusCode::BAD_REQUEST, "body {}", body);
            assert_eq!(json["error"]["code"], "VALIDATION_ERROR");
            assert_eq!(
                json["error"]["message"],
                "Room name and participant name are required"
            );
        }
    }

    #[tokio::test]
    async fn test_malformed_body_rejected() {
        let (status, json) = post_token("{not json").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json["error"]["code"], "VALIDATION_ERROR");
    }
}
