//! A hosted room: one shared game session plus its event channel.

use crate::events::{ChatRequest, JoinRequest, LeaveRequest, MoveRequest, RoomEvent};
use omok_game::{
    ConfigError, GameSession, JoinError, MoveOutcome, SessionConfig, SessionSnapshot,
    SharedSession,
};
use std::sync::Arc;
use std::sync::atomic::{AtomicU32, Ordering};
use tokio::sync::broadcast;
use tracing::{debug, info, instrument};

/// Unique identifier for a room.
pub type RoomId = String;

/// Buffered events per subscriber before the slowest one starts lagging.
const EVENT_CHANNEL_CAPACITY: usize = 64;

/// One game room.
///
/// Every operation runs its session call, builds its events and publishes
/// them inside one hold of the session lock. Subscribers therefore see
/// events in the order the session applied them, and the roster carried by
/// `RosterUpdated` is the one the join produced. Publishing never blocks.
#[derive(Debug, Clone)]
pub struct Room {
    id: RoomId,
    session: SharedSession,
    events: broadcast::Sender<RoomEvent>,
    guests: Arc<AtomicU32>,
}

impl Room {
    /// Opens a room with a fresh session.
    #[instrument(skip(config))]
    pub fn new(id: RoomId, config: SessionConfig) -> Result<Self, ConfigError> {
        let session = SharedSession::new(GameSession::new(config)?);
        let (events, _) = broadcast::channel(EVENT_CHANNEL_CAPACITY);
        info!(room_id = %id, "Room opened");
        Ok(Self {
            id,
            session,
            events,
            guests: Arc::new(AtomicU32::new(1)),
        })
    }

    /// Room id.
    pub fn id(&self) -> &RoomId {
        &self.id
    }

    /// Receives every broadcast event published after this call.
    pub fn subscribe(&self) -> broadcast::Receiver<RoomEvent> {
        self.events.subscribe()
    }

    /// Copies the session state.
    pub fn snapshot(&self) -> SessionSnapshot {
        self.session.snapshot()
    }

    /// True once nobody is seated.
    pub fn is_empty(&self) -> bool {
        self.session.with_session(|s| s.roster().is_empty())
    }

    /// True once the game reached a terminal state.
    pub fn is_over(&self) -> bool {
        self.session.with_session(|s| s.is_over())
    }

    /// Seats a player and announces the new roster. A guest number is only
    /// drawn for a join that will succeed.
    #[instrument(skip(self, req), fields(room_id = %self.id, player_id = %req.player_id))]
    pub fn join(&self, req: JoinRequest) -> Result<Vec<RoomEvent>, JoinError> {
        self.session.update(|session| {
            session.check_join(&req.player_id)?;
            let display_name = req
                .display_name
                .filter(|name| !name.trim().is_empty())
                .unwrap_or_else(|| self.guest_name());

            let player = session.join(req.player_id, display_name)?;
            let players = session.roster().players().to_vec();

            let events = vec![
                RoomEvent::PlayerJoined { player },
                RoomEvent::RosterUpdated { players },
            ];
            self.publish(&events);
            Ok(events)
        })
    }

    /// Submits a move. A rejection is returned to the caller only.
    #[instrument(skip(self, req), fields(room_id = %self.id, player_id = %req.player_id, position = req.position))]
    pub fn submit_move(&self, req: MoveRequest) -> Vec<RoomEvent> {
        self.session.update(|session| {
            let events = match session.submit_move(&req.player_id, req.position) {
                MoveOutcome::Accepted { mark, result } => {
                    let mut events = vec![RoomEvent::MoveAccepted { mark }];
                    if let Some(result) = result {
                        events.push(RoomEvent::GameEnded { result });
                    }
                    events
                }
                MoveOutcome::Rejected { reason } => vec![RoomEvent::MoveRejected {
                    player_id: req.player_id,
                    reason,
                }],
            };
            self.publish(&events);
            events
        })
    }

    /// Removes a player, announcing the winner if the game was still running.
    #[instrument(skip(self, req), fields(room_id = %self.id, player_id = %req.player_id))]
    pub fn leave(&self, req: LeaveRequest) -> Vec<RoomEvent> {
        self.session.update(|session| {
            let Some(departure) = session.leave(&req.player_id) else {
                return Vec::new();
            };

            let mut events = vec![RoomEvent::PlayerLeft {
                player: departure.player().clone(),
            }];
            if let Some(result) = departure.result().clone() {
                events.push(RoomEvent::GameEnded { result });
            }
            self.publish(&events);
            events
        })
    }

    /// Relays a chat line from a seated player. Blank lines and unknown
    /// speakers are dropped.
    #[instrument(skip(self, req), fields(room_id = %self.id, player_id = %req.player_id))]
    pub fn chat(&self, req: ChatRequest) -> Vec<RoomEvent> {
        if req.message.trim().is_empty() {
            debug!("Blank chat message dropped");
            return Vec::new();
        }

        self.session.update(|session| {
            let Some(speaker) = session
                .roster()
                .get(&req.player_id)
                .map(|p| p.display_name().clone())
            else {
                debug!("Chat from unseated player dropped");
                return Vec::new();
            };

            info!(%speaker, "Relaying chat");
            let events = vec![RoomEvent::ChatRelayed {
                speaker,
                text: req.message,
            }];
            self.publish(&events);
            events
        })
    }

    fn guest_name(&self) -> String {
        format!("GUEST-{}", self.guests.fetch_add(1, Ordering::Relaxed))
    }

    fn publish(&self, events: &[RoomEvent]) {
        for event in events.iter().filter(|e| e.is_broadcast()) {
            if self.events.send(event.clone()).is_err() {
                debug!("No subscribers for room event");
            }
        }
    }
}
