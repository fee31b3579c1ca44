//! In-process transport.
//!
//! `LoopbackNetwork` hands out `LoopbackRoom`s that complete handshakes
//! locally. Outcomes can be scripted and events injected, which makes it
//! the transport used by the test suites and by local runs without a
//! media server.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::mpsc;
use uuid::Uuid;

use super::{
    DisconnectReason, RoomOptions, RoomTransport, TransportError, TransportEvent,
    TransportFactory, TransportHandle,
};
use crate::session::Participant;

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

struct NetworkState {
    rooms: Vec<Arc<LoopbackRoom>>,
    connect_outcomes: VecDeque<Result<(), TransportError>>,
    default_connect_outcome: Result<(), TransportError>,
    media_outcome: Result<(), TransportError>,
    connect_delay: Option<Duration>,
    local_identity: String,
    emit_connected_event: bool,
}

/// Factory for loopback rooms; clones share the same network
#[derive(Clone)]
pub struct LoopbackNetwork {
    state: Arc<Mutex<NetworkState>>,
}

impl LoopbackNetwork {
    pub fn new() -> Self {
        Self {
            state: Arc::new(Mutex::new(NetworkState {
                rooms: Vec::new(),
                connect_outcomes: VecDeque::new(),
                default_connect_outcome: Ok(()),
                media_outcome: Ok(()),
                connect_delay: None,
                local_identity: "local".to_string(),
                emit_connected_event: true,
            })),
        }
    }

    /// Identity reported for the local participant after a handshake
    pub fn set_local_identity(&self, identity: impl Into<String>) {
        lock(&self.state).local_identity = identity.into();
    }

    /// Queue the outcome of the next handshake (FIFO)
    pub fn push_connect_outcome(&self, outcome: Result<(), TransportError>) {
        lock(&self.state).connect_outcomes.push_back(outcome);
    }

    /// Outcome used once the queued outcomes run out
    pub fn set_default_connect_outcome(&self, outcome: Result<(), TransportError>) {
        lock(&self.state).default_connect_outcome = outcome;
    }

    pub fn set_media_outcome(&self, outcome: Result<(), TransportError>) {
        lock(&self.state).media_outcome = outcome;
    }

    /// Make every handshake take this long
    pub fn set_connect_delay(&self, delay: Option<Duration>) {
        lock(&self.state).connect_delay = delay;
    }

    /// Whether a successful handshake also emits `TransportEvent::Connected`
    pub fn set_emit_connected_event(&self, emit: bool) {
        lock(&self.state).emit_connected_event = emit;
    }

    /// Every room created so far, oldest first
    pub fn rooms(&self) -> Vec<Arc<LoopbackRoom>> {
        lock(&self.state).rooms.clone()
    }

    pub fn latest_room(&self) -> Option<Arc<LoopbackRoom>> {
        lock(&self.state).rooms.last().cloned()
    }

    pub fn rooms_created(&self) -> usize {
        lock(&self.state).rooms.len()
    }

    /// Handshakes attempted across all rooms
    pub fn total_connect_calls(&self) -> usize {
        self.rooms().iter().map(|r| r.connect_calls()).sum()
    }

    fn next_connect_outcome(&self) -> (Result<(), TransportError>, Option<Duration>, String, bool) {
        let mut state = lock(&self.state);
        let outcome = match state.connect_outcomes.pop_front() {
            Some(outcome) => outcome,
            None => state.default_connect_outcome.clone(),
        };
        (
            outcome,
            state.connect_delay,
            state.local_identity.clone(),
            state.emit_connected_event,
        )
    }

    fn media_outcome(&self) -> Result<(), TransportError> {
        lock(&self.state).media_outcome.clone()
    }
}

impl Default for LoopbackNetwork {
    fn default() -> Self {
        Self::new()
    }
}

impl TransportFactory for LoopbackNetwork {
    fn create(&self, options: &RoomOptions) -> TransportHandle {
        let (events_tx, events_rx) = mpsc::unbounded_channel();
        let mut state = lock(&self.state);
        let room = Arc::new(LoopbackRoom {
            index: state.rooms.len(),
            options: options.clone(),
            network: self.clone(),
            events: events_tx,
            inner: Mutex::new(RoomState::default()),
            connect_calls: AtomicUsize::new(0),
            disconnect_calls: AtomicUsize::new(0),
            media_calls: AtomicUsize::new(0),
        });
        state.rooms.push(room.clone());

        tracing::debug!(room_index = room.index, "Loopback room created");

        TransportHandle {
            room,
            events: events_rx,
        }
    }
}

#[derive(Default)]
struct RoomState {
    connected: bool,
    url: Option<String>,
    local: Option<Participant>,
    remotes: Vec<Participant>,
}

/// A single loopback room instance
pub struct LoopbackRoom {
    index: usize,
    options: RoomOptions,
    network: LoopbackNetwork,
    events: mpsc::UnboundedSender<TransportEvent>,
    inner: Mutex<RoomState>,
    connect_calls: AtomicUsize,
    disconnect_calls: AtomicUsize,
    media_calls: AtomicUsize,
}

impl LoopbackRoom {
    /// Position in `LoopbackNetwork::rooms`
    pub fn index(&self) -> usize {
        self.index
    }

    pub fn options(&self) -> &RoomOptions {
        &self.options
    }

    pub fn is_connected(&self) -> bool {
        lock(&self.inner).connected
    }

    /// URL of the last successful handshake
    pub fn url(&self) -> Option<String> {
        lock(&self.inner).url.clone()
    }

    pub fn connect_calls(&self) -> usize {
        self.connect_calls.load(Ordering::SeqCst)
    }

    pub fn disconnect_calls(&self) -> usize {
        self.disconnect_calls.load(Ordering::SeqCst)
    }

    pub fn media_calls(&self) -> usize {
        self.media_calls.load(Ordering::SeqCst)
    }

    /// Inject an arbitrary event. Returns false once nobody listens.
    pub fn emit(&self, event: TransportEvent) -> bool {
        self.events.send(event).is_ok()
    }

    pub fn add_remote(&self, participant: Participant) {
        lock(&self.inner).remotes.push(participant.clone());
        self.emit(TransportEvent::ParticipantJoined(participant));
    }

    pub fn remove_remote(&self, sid: &str) -> Option<Participant> {
        let removed = {
            let mut inner = lock(&self.inner);
            let position = inner.remotes.iter().position(|p| p.sid == sid)?;
            inner.remotes.remove(position)
        };
        self.emit(TransportEvent::ParticipantLeft(removed.clone()));
        Some(removed)
    }

    /// Simulate the server side dropping the connection
    pub fn drop_connection(&self, reason: DisconnectReason) {
        {
            let mut inner = lock(&self.inner);
            inner.connected = false;
            inner.remotes.clear();
        }
        self.emit(TransportEvent::Disconnected { reason });
    }
}

#[async_trait]
impl RoomTransport for LoopbackRoom {
    async fn connect(&self, url: &str, _token: &str) -> Result<(), TransportError> {
        self.connect_calls.fetch_add(1, Ordering::SeqCst);
        let (outcome, delay, identity, emit_connected) = self.network.next_connect_outcome();

        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
        outcome?;

        {
            let mut inner = lock(&self.inner);
            inner.connected = true;
            inner.url = Some(url.to_string());
            inner.local = Some(
                Participant::new(format!("PA_{}", Uuid::new_v4().simple()), identity, true)
                    .with_publish(true),
            );
        }

        if emit_connected {
            self.emit(TransportEvent::Connected);
        }
        Ok(())
    }

    async fn disconnect(&self) -> Result<(), TransportError> {
        self.disconnect_calls.fetch_add(1, Ordering::SeqCst);
        let was_connected = {
            let mut inner = lock(&self.inner);
            let was_connected = inner.connected;
            inner.connected = false;
            inner.remotes.clear();
            was_connected
        };
        if was_connected {
            self.emit(TransportEvent::Disconnected {
                reason: DisconnectReason::ClientInitiated,
            });
        }
        Ok(())
    }

    fn local_participant(&self) -> Option<Participant> {
        lock(&self.inner).local.clone()
    }

    fn remote_participants(&self) -> Vec<Participant> {
        lock(&self.inner).remotes.clone()
    }

    async fn enable_camera_and_microphone(&self) -> Result<(), TransportError> {
        self.media_calls.fetch_add(1, Ordering::SeqCst);
        self.network.media_outcome()?;

        if let Some(local) = lock(&self.inner).local.as_mut() {
            local.camera_enabled = true;
            local.microphone_enabled = true;
        }
        Ok(())
    }
}
