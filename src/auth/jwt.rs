use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};

use crate::config::LiveKitConfig;
use crate::error::AppError;
use crate::session::Role;

use super::{RoomClaims, VideoGrant};

/// A signed token and the claims it carries
#[derive(Clone)]
pub struct IssuedToken {
    pub token: String,
    pub claims: RoomClaims,
}

/// Signs room access tokens with the media server API secret (HS256)
pub struct AccessTokenIssuer {
    api_key: String,
    encoding_key: EncodingKey,
    ttl_seconds: i64,
}

impl AccessTokenIssuer {
    pub fn new(config: &LiveKitConfig) -> Self {
        Self {
            api_key: config.api_key.clone(),
            encoding_key: EncodingKey::from_secret(config.api_secret.as_bytes()),
            ttl_seconds: i64::try_from(config.token_ttl_seconds).unwrap_or(i64::MAX),
        }
    }

    pub fn issue(&self, room: &str, identity: &str, role: Role) -> Result<IssuedToken, AppError> {
        let now = chrono::Utc::now().timestamp();
        let claims = RoomClaims {
            iss: self.api_key.clone(),
            sub: identity.to_string(),
            name: identity.to_string(),
            nbf: now,
            iat: now,
            exp: now.saturating_add(self.ttl_seconds),
            jti: uuid::Uuid::new_v4().to_string(),
            video: VideoGrant::for_role(room, role),
        };

        let token = encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)?;

        Ok(IssuedToken { token, claims })
    }
}

/// Verifies tokens signed by an [`AccessTokenIssuer`] with the same credentials
pub struct AccessTokenValidator {
    decoding_key: DecodingKey,
    validation: Validation,
}

impl AccessTokenValidator {
    pub fn new(config: &LiveKitConfig) -> Self {
        let decoding_key = DecodingKey::from_secret(config.api_secret.as_bytes());

        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_issuer(&[&config.api_key]);
        validation.validate_nbf = true;

        Self {
            decoding_key,
            validation,
        }
    }

    pub fn validate(&self, token: &str) -> Result<RoomClaims, AppError> {
        let token_data = decode::<RoomClaims>(token, &self.decoding_key, &self.validation)
            .map_err(|e| AppError::Auth(format!("Invalid token: {}", e)))?;

        Ok(token_data.claims)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_test_config() -> LiveKitConfig {
        LiveKitConfig {
            url: "wss://media.example.com".to_string(),
            api_key: "APItestkey".to_string(),
            api_secret: "test-secret-key-for-testing".to_string(),
            token_ttl_seconds: 600,
        }
    }

    #[test]
    fn test_issued_token_validates() {
        let config = create_test_config();
        let issued = AccessTokenIssuer::new(&config)
            .issue("debate-1", "alice", Role::Participant)
            .unwrap();

        let claims = AccessTokenValidator::new(&config)
            .validate(&issued.token)
            .unwrap();

        assert_eq!(claims.identity(), "alice");
        assert_eq!(claims.room(), "debate-1");
        assert_eq!(claims.iss, "APItestkey");
        assert_eq!(claims.exp - claims.iat, 600);
        assert!(claims.video.can_publish);
        assert!(!claims.is_expired());
    }

    #[test]
    fn test_token_has_three_segments() {
        let issued = AccessTokenIssuer::new(&create_test_config())
            .issue("debate-1", "bob", Role::Audience)
            .unwrap();

        assert_eq!(issued.token.split('.').count(), 3);
        assert!(crate::session::validate_token(&issued.token).is_ok());
    }

    #[test]
    fn test_unique_token_ids() {
        let issuer = AccessTokenIssuer::new(&create_test_config());
        let a = issuer.issue("r", "alice", Role::Audience).unwrap();
        let b = issuer.issue("r", "alice", Role::Audience).unwrap();
        assert_ne!(a.claims.jti, b.claims.jti);
    }

    #[test]
    fn test_wrong_secret_rejected() {
        let config = create_test_config();
        let issued = AccessTokenIssuer::new(&config)
            .issue("debate-1", "alice", Role::Moderator)
            .unwrap();

        let other = LiveKitConfig {
            api_secret: "another-secret".to_string(),
            ..config
        };
        let result = AccessTokenValidator::new(&other).validate(&issued.token);
        assert!(matches!(result, Err(AppError::Auth(_))));
    }

    #[test]
    fn test_invalid_token() {
        let validator = AccessTokenValidator::new(&create_test_config());
        assert!(validator.validate("invalid-token").is_err());
    }
}
