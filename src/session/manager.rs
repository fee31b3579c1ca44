//! Session connection manager.
//!
//! Owns at most one live room connection for one local identity. Commands
//! (`connect`, `disconnect`, `reconnect`, `cleanup`) and transport events
//! are serialized through a single mutex whose critical sections never
//! span an `.await`. Observer notifications raised inside a critical
//! section are queued and delivered, in order, once the lock is released.
//!
//! Every transport instance gets a generation number. Events and
//! handshake completions carrying an outdated generation are dropped,
//! which is what keeps a replaced or torn down transport from affecting
//! the manager.

use std::collections::VecDeque;
use std::ops::{Deref, DerefMut};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};
use std::time::Duration;

use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;

use super::backoff::{ExponentialBackoff, ReconnectPolicy};
use super::config::ConnectionConfig;
use super::observer::{ObserverList, Subscription};
use super::roster::ParticipantRoster;
use super::state::ConnectionState;
use super::SessionError;
use crate::metrics::SessionMetrics;
use crate::transport::{
    DisconnectReason, RoomOptions, RoomTransport, TransportEvent, TransportFactory,
    TransportHandle,
};

/// The reconnect timer currently waiting to fire
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScheduledReconnect {
    /// 1-based attempt number since the last successful connection
    pub attempt: u32,
    pub delay: Duration,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum AttemptKind {
    Initial,
    Reconnect,
}

impl AttemptKind {
    fn as_str(&self) -> &'static str {
        match self {
            AttemptKind::Initial => "initial",
            AttemptKind::Reconnect => "reconnect",
        }
    }
}

struct ReconnectTimer {
    id: u64,
    scheduled: ScheduledReconnect,
    handle: JoinHandle<()>,
}

struct Inner {
    state: ConnectionState,
    config: Option<ConnectionConfig>,
    transport: Option<Arc<dyn RoomTransport>>,
    generation: u64,
    /// Generation of the handshake currently awaiting its result
    in_flight: Option<u64>,
    event_pump: Option<JoinHandle<()>>,
    reconnect_timer: Option<ReconnectTimer>,
    next_timer_id: u64,
    backoff: ExponentialBackoff,
    /// Drop reported after `Connected` but before the handshake returned
    dropped_during_handshake: Option<DisconnectReason>,
}

impl Inner {
    fn room_name(&self) -> &str {
        self.config.as_ref().map_or("", |c| c.room_name.as_str())
    }
}

enum Notification {
    State(ConnectionState),
    Roster(ParticipantRoster),
    Error(SessionError),
}

struct Shared {
    factory: Arc<dyn TransportFactory>,
    room_options: RoomOptions,
    inner: Mutex<Inner>,
    outbox: Mutex<VecDeque<Notification>>,
    draining: AtomicBool,
    state_tx: watch::Sender<ConnectionState>,
    roster_tx: watch::Sender<ParticipantRoster>,
    state_observers: ObserverList<ConnectionState>,
    roster_observers: ObserverList<ParticipantRoster>,
    error_observers: ObserverList<SessionError>,
}

/// Handle to a session connection manager. Clones share the same manager.
///
/// Observer callbacks run after the manager has released its state lock,
/// so they may call any accessor. Async commands issued from a callback
/// have to be spawned.
#[derive(Clone)]
pub struct SessionManager {
    shared: Arc<Shared>,
}

impl SessionManager {
    /// Manager with the default reconnect policy and room options
    pub fn new(factory: Arc<dyn TransportFactory>) -> Self {
        Self::with_policy(factory, ReconnectPolicy::default(), RoomOptions::default())
    }

    pub fn with_policy(
        factory: Arc<dyn TransportFactory>,
        policy: ReconnectPolicy,
        room_options: RoomOptions,
    ) -> Self {
        let (state_tx, _) = watch::channel(ConnectionState::Disconnected);
        let (roster_tx, _) = watch::channel(ParticipantRoster::new());

        Self {
            shared: Arc::new(Shared {
                factory,
                room_options,
                inner: Mutex::new(Inner {
                    state: ConnectionState::Disconnected,
                    config: None,
                    transport: None,
                    generation: 0,
                    in_flight: None,
                    event_pump: None,
                    reconnect_timer: None,
                    next_timer_id: 0,
                    backoff: ExponentialBackoff::new(policy),
                    dropped_during_handshake: None,
                }),
                outbox: Mutex::new(VecDeque::new()),
                draining: AtomicBool::new(false),
                state_tx,
                roster_tx,
                state_observers: ObserverList::new("state_change"),
                roster_observers: ObserverList::new("participant_change"),
                error_observers: ObserverList::new("error"),
            }),
        }
    }

    /// Join `config.room_name`.
    ///
    /// No-op when already connected to that room or while another
    /// handshake is in flight. A malformed URL or token is rejected before
    /// any state change or network call. A failed handshake is reported to
    /// error observers and returned, and is not retried automatically.
    pub async fn connect(&self, config: ConnectionConfig) -> Result<(), SessionError> {
        if let Err(err) = config.validate() {
            tracing::warn!(room = %config.room_name, error = %err, "Rejected connection config");
            return Err(err);
        }

        let shared = &self.shared;
        let (room, generation, previous) = {
            let mut inner = shared.lock();

            if inner.in_flight.is_some() {
                tracing::info!(room = %config.room_name, "Connection already in progress");
                return Ok(());
            }

            if inner.state.is_connected() && inner.room_name() == config.room_name {
                tracing::info!(room = %config.room_name, "Already connected to room");
                return Ok(());
            }

            shared.cancel_reconnect(&mut inner);
            let previous = shared.detach_transport(&mut inner);
            if previous.is_some() {
                tracing::info!(
                    from = %inner.room_name(),
                    to = %config.room_name,
                    "Leaving current room before connecting to a new one"
                );
            }
            shared.transition(&mut inner, ConnectionState::Disconnected);
            shared.clear_roster();

            inner.backoff.reset();
            inner.config = Some(config.clone());
            let (room, generation) = shared.install_transport(&mut inner);
            inner.in_flight = Some(generation);

            tracing::info!(
                room = %config.room_name,
                participant = %config.participant_name,
                role = %config.role,
                url = %config.url,
                generation,
                "Connecting to room"
            );
            shared.transition(&mut inner, ConnectionState::Connecting);

            (room, generation, previous)
        };

        if let Some(previous) = previous {
            leave(previous).await;
        }

        shared
            .run_handshake(config, room, generation, AttemptKind::Initial)
            .await
    }

    /// Leave the room and forget the stored config.
    ///
    /// Cancels any pending reconnect. Idempotent.
    pub async fn disconnect(&self) {
        let shared = &self.shared;
        let previous = {
            let mut inner = shared.lock();
            let had_timer = shared.cancel_reconnect(&mut inner);
            let had_config = inner.config.take().is_some();
            let previous = shared.detach_transport(&mut inner);
            inner.backoff.reset();

            if !had_config
                && !had_timer
                && previous.is_none()
                && inner.state == ConnectionState::Disconnected
            {
                return;
            }

            tracing::info!("Disconnecting from room");
            shared.transition(&mut inner, ConnectionState::Disconnected);
            shared.clear_roster();
            previous
        };

        if let Some(previous) = previous {
            leave(previous).await;
        }
    }

    /// Tear down the current transport and rerun the connect sequence
    /// against the stored config on a fresh one.
    ///
    /// Starts a new recovery cycle: the attempt counter is reset first. If
    /// the handshake fails the automatic backoff loop takes over and the
    /// error is returned.
    pub async fn reconnect(&self) -> Result<(), SessionError> {
        self.shared.reconnect(true).await
    }

    /// Register a callback for every state transition
    pub fn on_state_change<F>(&self, callback: F) -> Subscription
    where
        F: Fn(&ConnectionState) + Send + Sync + 'static,
    {
        self.shared.state_observers.subscribe(callback)
    }

    /// Register a callback receiving a roster snapshot after every
    /// membership change
    pub fn on_participant_change<F>(&self, callback: F) -> Subscription
    where
        F: Fn(&ParticipantRoster) + Send + Sync + 'static,
    {
        self.shared.roster_observers.subscribe(callback)
    }

    /// Register a callback for errors raised on the transport's event
    /// stream and for failed connects
    pub fn on_error<F>(&self, callback: F) -> Subscription
    where
        F: Fn(&SessionError) + Send + Sync + 'static,
    {
        self.shared.error_observers.subscribe(callback)
    }

    /// Detach from the transport and drop every observer.
    ///
    /// Used when the owning surface goes away. Late transport events and
    /// pending timers have no effect afterwards. The current room, if any,
    /// is left in the background.
    pub fn cleanup(&self) {
        let shared = &self.shared;
        shared.state_observers.clear();
        shared.roster_observers.clear();
        shared.error_observers.clear();

        let previous = {
            let mut inner = shared.lock();
            shared.cancel_reconnect(&mut inner);
            inner.config = None;
            inner.backoff.reset();
            let previous = shared.detach_transport(&mut inner);
            shared.transition(&mut inner, ConnectionState::Disconnected);
            shared.clear_roster();
            previous
        };

        if let Some(previous) = previous {
            match tokio::runtime::Handle::try_current() {
                Ok(runtime) => {
                    runtime.spawn(leave(previous));
                }
                Err(_) => tracing::debug!("No runtime available, skipping graceful leave"),
            }
        }

        tracing::debug!("Session manager cleaned up");
    }

    pub fn state(&self) -> ConnectionState {
        *self.shared.state_tx.borrow()
    }

    pub fn is_connected(&self) -> bool {
        self.state().is_connected()
    }

    /// Receiver that always holds the latest state
    pub fn watch_state(&self) -> watch::Receiver<ConnectionState> {
        self.shared.state_tx.subscribe()
    }

    /// Copy of the current roster
    pub fn participants(&self) -> ParticipantRoster {
        self.shared.roster_tx.borrow().clone()
    }

    pub fn watch_participants(&self) -> watch::Receiver<ParticipantRoster> {
        self.shared.roster_tx.subscribe()
    }

    /// Room of the stored config, if any
    pub fn room_name(&self) -> Option<String> {
        self.shared
            .lock()
            .config
            .as_ref()
            .map(|c| c.room_name.clone())
    }

    pub fn active_config(&self) -> Option<ConnectionConfig> {
        self.shared.lock().config.clone()
    }

    /// Automatic attempts consumed since the last successful connection
    pub fn reconnect_attempts(&self) -> u32 {
        self.shared.lock().backoff.attempt()
    }

    pub fn pending_reconnect(&self) -> Option<ScheduledReconnect> {
        self.shared
            .lock()
            .reconnect_timer
            .as_ref()
            .map(|t| t.scheduled)
    }
}

/// Exclusive access to the manager state.
///
/// Fields drop in declaration order: the mutex is released first, then
/// the queued notifications are delivered.
struct StateGuard<'a> {
    inner: MutexGuard<'a, Inner>,
    _deliver: Deliver<'a>,
}

impl Deref for StateGuard<'_> {
    type Target = Inner;

    fn deref(&self) -> &Inner {
        &self.inner
    }
}

impl DerefMut for StateGuard<'_> {
    fn deref_mut(&mut self) -> &mut Inner {
        &mut self.inner
    }
}

struct Deliver<'a>(&'a Shared);

impl Drop for Deliver<'_> {
    fn drop(&mut self) {
        self.0.deliver_pending();
    }
}

impl Shared {
    fn lock(&self) -> StateGuard<'_> {
        StateGuard {
            inner: self.inner.lock().unwrap_or_else(PoisonError::into_inner),
            _deliver: Deliver(self),
        }
    }

    fn outbox(&self) -> MutexGuard<'_, VecDeque<Notification>> {
        self.outbox.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Queue a notification. Only called with the state lock held, so the
    /// queue order is the order of the transitions.
    fn enqueue(&self, notification: Notification) {
        self.outbox().push_back(notification);
    }

    /// Drain the queue on the calling thread unless another call is
    /// already draining it. A nested call made from inside a callback
    /// returns at once and the outer call delivers what it queued.
    fn deliver_pending(&self) {
        loop {
            if self.draining.swap(true, Ordering::SeqCst) {
                return;
            }

            loop {
                let next = self.outbox().pop_front();
                let Some(notification) = next else {
                    break;
                };
                match notification {
                    Notification::State(state) => self.state_observers.notify(&state),
                    Notification::Roster(roster) => self.roster_observers.notify(&roster),
                    Notification::Error(error) => self.error_observers.notify(&error),
                }
            }

            self.draining.store(false, Ordering::SeqCst);
            if self.outbox().is_empty() {
                return;
            }
        }
    }

    fn transition(&self, inner: &mut Inner, next: ConnectionState) {
        if inner.state == next {
            return;
        }
        tracing::debug!(from = %inner.state, to = %next, room = %inner.room_name(), "State transition");
        inner.state = next;
        self.state_tx.send_replace(next);
        SessionMetrics::record_transition(next);
        self.enqueue(Notification::State(next));
    }

    fn publish_roster(&self, roster: ParticipantRoster) {
        self.roster_tx.send_replace(roster.clone());
        self.enqueue(Notification::Roster(roster));
    }

    fn clear_roster(&self) {
        if !self.roster_tx.borrow().is_empty() {
            self.publish_roster(ParticipantRoster::new());
        }
    }

    /// Replace the roster with the transport's authoritative list
    fn rebuild_roster(&self, inner: &Inner) {
        let roster = match &inner.transport {
            Some(transport) => ParticipantRoster::from_transport(
                transport.local_participant(),
                transport.remote_participants(),
            ),
            None => ParticipantRoster::new(),
        };
        self.publish_roster(roster);
    }

    fn install_transport(self: &Arc<Self>, inner: &mut Inner) -> (Arc<dyn RoomTransport>, u64) {
        let TransportHandle { room, events } = self.factory.create(&self.room_options);
        inner.generation += 1;
        let generation = inner.generation;
        inner.transport = Some(room.clone());
        inner.dropped_during_handshake = None;
        inner.event_pump = Some(tokio::spawn(pump_events(
            Arc::downgrade(self),
            generation,
            events,
        )));
        (room, generation)
    }

    /// Stop listening to the current transport and hand it back
    fn detach_transport(&self, inner: &mut Inner) -> Option<Arc<dyn RoomTransport>> {
        if let Some(pump) = inner.event_pump.take() {
            pump.abort();
        }
        inner.generation += 1;
        inner.in_flight = None;
        inner.dropped_during_handshake = None;
        inner.transport.take()
    }

    fn cancel_reconnect(&self, inner: &mut Inner) -> bool {
        match inner.reconnect_timer.take() {
            Some(timer) => {
                timer.handle.abort();
                tracing::debug!(attempt = timer.scheduled.attempt, "Cancelled pending reconnect");
                true
            }
            None => false,
        }
    }

    /// Returns true if this call performed the transition
    fn mark_connected(&self, inner: &mut Inner) -> bool {
        if inner.state.is_connected() {
            return false;
        }
        inner.backoff.reset();
        self.transition(inner, ConnectionState::Connected);
        self.rebuild_roster(inner);
        true
    }

    /// The transport left the room outside of any handshake
    fn handle_drop(
        self: &Arc<Self>,
        inner: &mut Inner,
        reason: DisconnectReason,
        was_established: bool,
    ) {
        self.transition(inner, ConnectionState::Disconnected);
        self.clear_roster();

        if was_established && !reason.is_client_initiated() && inner.config.is_some() {
            self.schedule_reconnect(inner);
        }
    }

    fn schedule_reconnect(self: &Arc<Self>, inner: &mut Inner) {
        self.cancel_reconnect(inner);
        let Some(room) = inner.config.as_ref().map(|c| c.room_name.clone()) else {
            return;
        };

        self.transition(inner, ConnectionState::Reconnecting);

        let Some(delay) = inner.backoff.next_delay() else {
            let attempts = inner.backoff.attempt();
            tracing::error!(room = %room, attempts, "Max reconnect attempts reached");
            SessionMetrics::record_reconnect_abandoned();
            self.transition(inner, ConnectionState::Disconnected);
            self.enqueue(Notification::Error(
                SessionError::MaxReconnectAttemptsExceeded { room, attempts },
            ));
            return;
        };

        let scheduled = ScheduledReconnect {
            attempt: inner.backoff.attempt(),
            delay,
        };
        inner.next_timer_id += 1;
        let id = inner.next_timer_id;

        tracing::info!(
            room = %room,
            attempt = scheduled.attempt,
            delay_ms = delay.as_millis() as u64,
            "Scheduling reconnect attempt"
        );
        SessionMetrics::record_reconnect_scheduled();

        let shared = Arc::downgrade(self);
        let handle = tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            if let Some(shared) = shared.upgrade() {
                shared.fire_reconnect(id).await;
            }
        });

        inner.reconnect_timer = Some(ReconnectTimer {
            id,
            scheduled,
            handle,
        });
    }

    async fn fire_reconnect(self: Arc<Self>, id: u64) {
        {
            let mut inner = self.lock();
            let is_current = inner.reconnect_timer.as_ref().is_some_and(|t| t.id == id);
            if !is_current {
                return;
            }
            // Detach our own handle so cancellation can no longer
            // interrupt the handshake below
            inner.reconnect_timer = None;
        }

        if let Err(err) = self.reconnect(false).await {
            tracing::debug!(error = %err, "Scheduled reconnect did not succeed");
        }
    }

    async fn reconnect(self: &Arc<Self>, manual: bool) -> Result<(), SessionError> {
        let (config, room, generation, previous) = {
            let mut inner = self.lock();
            let Some(config) = inner.config.clone() else {
                return Err(SessionError::NoActiveConfig);
            };

            self.cancel_reconnect(&mut inner);
            if manual {
                inner.backoff.reset();
            }

            let previous = self.detach_transport(&mut inner);
            self.transition(&mut inner, ConnectionState::Reconnecting);
            self.clear_roster();

            let (room, generation) = self.install_transport(&mut inner);
            inner.in_flight = Some(generation);

            tracing::info!(
                room = %config.room_name,
                attempt = inner.backoff.attempt(),
                manual,
                generation,
                "Reconnecting to room"
            );

            (config, room, generation, previous)
        };

        if let Some(previous) = previous {
            leave(previous).await;
        }

        self.run_handshake(config, room, generation, AttemptKind::Reconnect)
            .await
    }

    async fn run_handshake(
        self: &Arc<Self>,
        config: ConnectionConfig,
        room: Arc<dyn RoomTransport>,
        generation: u64,
        kind: AttemptKind,
    ) -> Result<(), SessionError> {
        let started = std::time::Instant::now();
        let result = room.connect(&config.url, &config.token).await;
        SessionMetrics::record_handshake_duration(kind.as_str(), started.elapsed());

        let handshake_ok = result.is_ok();

        let settled = {
            let mut inner = self.lock();
            if inner.generation != generation || inner.in_flight != Some(generation) {
                None
            } else {
                inner.in_flight = None;
                Some(match result {
                    Err(err) => {
                        let error = SessionError::handshake(&config.room_name, &err);
                        SessionMetrics::record_handshake(kind.as_str(), "failure");

                        match kind {
                            AttemptKind::Initial => {
                                tracing::warn!(
                                    room = %config.room_name,
                                    error = %err,
                                    "Failed to connect to room"
                                );
                                self.detach_transport(&mut inner);
                                self.transition(&mut inner, ConnectionState::Disconnected);
                                self.enqueue(Notification::Error(error.clone()));
                            }
                            AttemptKind::Reconnect => {
                                tracing::warn!(
                                    room = %config.room_name,
                                    attempt = inner.backoff.attempt(),
                                    error = %err,
                                    "Reconnect attempt failed"
                                );
                                self.detach_transport(&mut inner);
                                self.schedule_reconnect(&mut inner);
                            }
                        }
                        Err(error)
                    }
                    Ok(()) => {
                        SessionMetrics::record_handshake(kind.as_str(), "success");
                        match inner.dropped_during_handshake.take() {
                            Some(reason) => {
                                tracing::warn!(
                                    room = %config.room_name,
                                    reason = reason.as_str(),
                                    generation,
                                    "Connection dropped before the handshake returned"
                                );
                                self.handle_drop(&mut inner, reason, true);
                                Ok(false)
                            }
                            None => {
                                tracing::info!(room = %config.room_name, generation, "Connected to room");
                                self.mark_connected(&mut inner);
                                Ok(true)
                            }
                        }
                    }
                })
            }
        };

        match settled {
            None => {
                tracing::debug!(
                    room = %config.room_name,
                    generation,
                    "Handshake superseded, ignoring its result"
                );
                // Nobody owns this transport anymore
                if handshake_ok {
                    leave(room).await;
                }
                Ok(())
            }
            Some(Err(error)) => Err(error),
            Some(Ok(live)) => {
                if live
                    && config.role.publishes_media()
                    && acquire_media(&config, room.as_ref()).await
                {
                    // Publish the local participant's enabled tracks
                    let inner = self.lock();
                    if inner.generation == generation && inner.state.is_connected() {
                        self.rebuild_roster(&inner);
                    }
                }
                Ok(())
            }
        }
    }

    fn handle_event(self: &Arc<Self>, generation: u64, event: TransportEvent) {
        let mut inner = self.lock();
        if inner.generation != generation {
            tracing::debug!(event = event.name(), generation, "Dropping event from stale transport");
            return;
        }

        match event {
            TransportEvent::Connected => {
                tracing::debug!(room = %inner.room_name(), "Transport reported connected");
                inner.dropped_during_handshake = None;
                self.mark_connected(&mut inner);
            }
            TransportEvent::Disconnected { reason } => {
                tracing::info!(room = %inner.room_name(), reason = reason.as_str(), "Disconnected from room");

                if inner.in_flight.is_some() {
                    // The pending handshake result settles the state
                    if inner.state.is_connected() {
                        inner.dropped_during_handshake = Some(reason);
                    }
                    return;
                }

                let was_established = matches!(
                    inner.state,
                    ConnectionState::Connected | ConnectionState::Reconnecting
                );
                self.handle_drop(&mut inner, reason, was_established);
            }
            TransportEvent::Reconnecting => {
                tracing::info!(room = %inner.room_name(), "Transport resuming connection");
                self.transition(&mut inner, ConnectionState::Reconnecting);
            }
            TransportEvent::Reconnected => {
                tracing::info!(room = %inner.room_name(), "Transport resumed connection");
                inner.backoff.reset();
                self.transition(&mut inner, ConnectionState::Connected);
                self.rebuild_roster(&inner);
            }
            TransportEvent::ParticipantJoined(participant) => {
                tracing::info!(room = %inner.room_name(), identity = %participant.identity, "Participant connected");
                self.rebuild_roster(&inner);
            }
            TransportEvent::ParticipantLeft(participant) => {
                tracing::info!(room = %inner.room_name(), identity = %participant.identity, "Participant disconnected");
                self.rebuild_roster(&inner);
            }
            TransportEvent::MediaError { detail } => {
                tracing::error!(room = %inner.room_name(), error = %detail, "Media devices error");
                self.enqueue(Notification::Error(SessionError::CapabilityUnavailable(detail)));
            }
            TransportEvent::ConnectionQualityChanged { sid, quality } => {
                tracing::debug!(
                    participant = sid.as_deref().unwrap_or("local"),
                    quality = ?quality,
                    "Connection quality changed"
                );
            }
            TransportEvent::TrackSubscribed { sid, kind } => {
                tracing::debug!(participant = %sid, kind = ?kind, "Track subscribed");
            }
            TransportEvent::TrackUnsubscribed { sid, kind } => {
                tracing::debug!(participant = %sid, kind = ?kind, "Track unsubscribed");
            }
        }
    }
}

impl Drop for Shared {
    fn drop(&mut self) {
        let inner = self.inner.get_mut().unwrap_or_else(PoisonError::into_inner);
        if let Some(pump) = inner.event_pump.take() {
            pump.abort();
        }
        if let Some(timer) = inner.reconnect_timer.take() {
            timer.handle.abort();
        }
    }
}

async fn pump_events(
    shared: Weak<Shared>,
    generation: u64,
    mut events: mpsc::UnboundedReceiver<TransportEvent>,
) {
    while let Some(event) = events.recv().await {
        let Some(manager) = shared.upgrade() else {
            break;
        };
        manager.handle_event(generation, event);
    }
}

async fn leave(transport: Arc<dyn RoomTransport>) {
    if let Err(err) = transport.disconnect().await {
        tracing::warn!(error = %err, "Error while leaving room");
    }
}

/// Returns true once camera and microphone are live
async fn acquire_media(config: &ConnectionConfig, room: &dyn RoomTransport) -> bool {
    match room.enable_camera_and_microphone().await {
        Ok(()) => {
            tracing::info!(room = %config.room_name, "Camera and microphone enabled");
            true
        }
        Err(err) => {
            tracing::warn!(
                room = %config.room_name,
                error = %err,
                "Failed to enable camera/microphone, continuing without media"
            );
            false
        }
    }
}
