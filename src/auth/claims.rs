use serde::{Deserialize, Serialize};

use crate::session::Role;

/// Room permissions carried in the `video` claim
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VideoGrant {
    pub room: String,
    #[serde(default)]
    pub room_join: bool,
    #[serde(default)]
    pub can_subscribe: bool,
    #[serde(default)]
    pub can_publish: bool,
    #[serde(default)]
    pub can_publish_data: bool,
    #[serde(default)]
    pub room_admin: bool,
    #[serde(default)]
    pub room_record: bool,
}

impl VideoGrant {
    /// Every role may join and subscribe; moderators additionally administer and record
    pub fn for_role(room: impl Into<String>, role: Role) -> Self {
        let publishes = role.publishes_media();
        let moderates = role == Role::Moderator;

        Self {
            room: room.into(),
            room_join: true,
            can_subscribe: true,
            can_publish: publishes,
            can_publish_data: publishes,
            room_admin: moderates,
            room_record: moderates,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoomClaims {
    /// Issuer (API key)
    pub iss: String,
    /// Subject (participant identity)
    pub sub: String,
    /// Display name
    #[serde(default)]
    pub name: String,
    /// Not before (Unix timestamp)
    pub nbf: i64,
    /// Issued at (Unix timestamp)
    pub iat: i64,
    /// Expiration time (Unix timestamp)
    pub exp: i64,
    /// Token ID
    pub jti: String,
    pub video: VideoGrant,
}

impl RoomClaims {
    pub fn identity(&self) -> &str {
        &self.sub
    }

    pub fn room(&self) -> &str {
        &self.video.room
    }

    pub fn is_expired(&self) -> bool {
        let now = chrono::Utc::now().timestamp();
        self.exp < now
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_moderator_grant() {
        let grant = VideoGrant::for_role("debate-1", Role::Moderator);
        assert!(grant.room_join && grant.can_subscribe);
        assert!(grant.can_publish && grant.can_publish_data);
        assert!(grant.room_admin && grant.room_record);
    }

    #[test]
    fn test_participant_grant() {
        let grant = VideoGrant::for_role("debate-1", Role::Participant);
        assert!(grant.can_publish && grant.can_publish_data);
        assert!(!grant.room_admin && !grant.room_record);
    }

    #[test]
    fn test_audience_grant() {
        let grant = VideoGrant::for_role("debate-1", Role::Audience);
        assert!(grant.room_join && grant.can_subscribe);
        assert!(!grant.can_publish && !grant.can_publish_data);
        assert!(!grant.room_admin);
    }

    #[test]
    fn test_grant_serializes_camel_case() {
        let json = serde_json::to_value(VideoGrant::for_role("r", Role::Audience)).unwrap();
        assert_eq!(json["roomJoin"], true);
        assert_eq!(json["canPublishData"], false);
    }
}
