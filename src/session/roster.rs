//! Participant roster snapshots

use std::collections::BTreeMap;

use serde::Serialize;

/// A participant handle as reported by the transport.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Participant {
    /// Session-scoped identifier, unique within one room connection
    pub sid: String,
    /// Identity the access token was issued for
    pub identity: String,
    pub is_local: bool,
    pub can_publish: bool,
    pub camera_enabled: bool,
    pub microphone_enabled: bool,
}

impl Participant {
    pub fn new(sid: impl Into<String>, identity: impl Into<String>, is_local: bool) -> Self {
        Self {
            sid: sid.into(),
            identity: identity.into(),
            is_local,
            can_publish: false,
            camera_enabled: false,
            microphone_enabled: false,
        }
    }

    pub fn with_publish(mut self, can_publish: bool) -> Self {
        self.can_publish = can_publish;
        self
    }
}

/// Immutable view of the room membership at one moment.
///
/// The manager rebuilds a new roster from the transport's authoritative
/// list on every membership event and hands out clones of it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ParticipantRoster {
    participants: BTreeMap<String, Participant>,
}

impl ParticipantRoster {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a roster from the local participant and the remote list.
    pub fn from_transport(local: Option<Participant>, remotes: Vec<Participant>) -> Self {
        let mut participants = BTreeMap::new();
        if let Some(local) = local {
            participants.insert(local.sid.clone(), local);
        }
        for remote in remotes {
            participants.insert(remote.sid.clone(), remote);
        }
        Self { participants }
    }

    pub fn len(&self) -> usize {
        self.participants.len()
    }

    pub fn is_empty(&self) -> bool {
        self.participants.is_empty()
    }

    pub fn get(&self, sid: &str) -> Option<&Participant> {
        self.participants.get(sid)
    }

    pub fn contains(&self, sid: &str) -> bool {
        self.participants.contains_key(sid)
    }

    pub fn local(&self) -> Option<&Participant> {
        self.participants.values().find(|p| p.is_local)
    }

    pub fn remotes(&self) -> impl Iterator<Item = &Participant> {
        self.participants.values().filter(|p| !p.is_local)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Participant> {
        self.participants.values()
    }

    pub fn identities(&self) -> Vec<&str> {
        self.participants.values().map(|p| p.identity.as_str()).collect()
    }
}
