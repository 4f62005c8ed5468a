//! Registry of open rooms.

use crate::room::{Room, RoomId};
use derive_more::{Display, Error};
use omok_game::{ConfigError, SessionConfig};
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};
use tracing::{debug, info, instrument, warn};

/// Room registry failure.
#[derive(Debug, Clone, Display, Error)]
pub enum RoomError {
    /// A room with this id is already open.
    #[display("room {_0} already exists")]
    AlreadyExists(#[error(not(source))] RoomId),

    /// The requested session configuration is invalid.
    #[display("{_0}")]
    InvalidConfig(ConfigError),
}

impl From<ConfigError> for RoomError {
    fn from(err: ConfigError) -> Self {
        Self::InvalidConfig(err)
    }
}

/// Owns every open room.
///
/// The registry lock only guards the map. Game state lives behind each
/// room's own session lock, so rooms never contend with each other.
#[derive(Debug, Clone)]
pub struct RoomManager {
    rooms: Arc<Mutex<HashMap<RoomId, Room>>>,
    default_config: SessionConfig,
    next_id: Arc<AtomicU64>,
}

impl RoomManager {
    /// Creates an empty registry. Rooms opened without a config use
    /// `default_config`.
    #[instrument]
    pub fn new(default_config: SessionConfig) -> Self {
        info!("Creating room manager");
        Self {
            rooms: Arc::new(Mutex::new(HashMap::new())),
            default_config,
            next_id: Arc::new(AtomicU64::new(1)),
        }
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<RoomId, Room>> {
        self.rooms.lock().unwrap_or_else(|poisoned| {
            warn!("Recovering poisoned room registry lock");
            poisoned.into_inner()
        })
    }

    /// Config used for rooms opened without one.
    pub fn default_config(&self) -> &SessionConfig {
        &self.default_config
    }

    /// Opens a room. A missing id is generated, a missing config falls back
    /// to the default.
    #[instrument(skip(self))]
    pub fn create_room(
        &self,
        id: Option<RoomId>,
        config: Option<SessionConfig>,
    ) -> Result<Room, RoomError> {
        let id = id.unwrap_or_else(|| {
            format!("room-{}", self.next_id.fetch_add(1, Ordering::Relaxed))
        });
        let config = config.unwrap_or(self.default_config);

        let mut rooms = self.lock();
        if rooms.contains_key(&id) {
            warn!(room_id = %id, "Room already exists");
            return Err(RoomError::AlreadyExists(id));
        }

        let room = Room::new(id.clone(), config)?;
        rooms.insert(id.clone(), room.clone());
        info!(room_id = %id, open_rooms = rooms.len(), "Created room");
        Ok(room)
    }

    /// Looks up a room.
    #[instrument(skip(self))]
    pub fn room(&self, id: &str) -> Option<Room> {
        let room = self.lock().get(id).cloned();
        if room.is_none() {
            debug!(room_id = id, "Room not found");
        }
        room
    }

    /// Open room ids, sorted.
    #[instrument(skip(self))]
    pub fn list_rooms(&self) -> Vec<RoomId> {
        let mut ids: Vec<_> = self.lock().keys().cloned().collect();
        ids.sort();
        debug!(count = ids.len(), "Listed rooms");
        ids
    }

    /// Closes a room. Returns false if it was not open.
    #[instrument(skip(self))]
    pub fn dispose_room(&self, id: &str) -> bool {
        let removed = self.lock().remove(id).is_some();
        if removed {
            info!(room_id = id, "Disposed room");
        }
        removed
    }

    /// Closes `room` once its game has reached a terminal state, whether by
    /// a line, a draw or a departure. Returns true if it was closed.
    #[instrument(skip(self, room), fields(room_id = %room.id()))]
    pub fn dispose_if_over(&self, room: &Room) -> bool {
        if !room.is_over() {
            return false;
        }
        debug!("Game over, closing room");
        self.dispose_room(room.id())
    }
}

impl Default for RoomManager {
    fn default() -> Self {
        Self::new(SessionConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use omok_game::WinVariant;

    #[test]
    fn test_generated_ids_are_unique() {
        let manager = RoomManager::default();
        let a = manager.create_room(None, None).unwrap();
        let b = manager.create_room(None, None).unwrap();
        assert_ne!(a.id(), b.id());
        assert_eq!(manager.list_rooms().len(), 2);
    }

    #[test]
    fn test_duplicate_id_rejected() {
        let manager = RoomManager::default();
        manager.create_room(Some("lobby".into()), None).unwrap();
        assert!(matches!(
            manager.create_room(Some("lobby".into()), None),
            Err(RoomError::AlreadyExists(_))
        ));
    }

    #[test]
    fn test_invalid_config_rejected() {
        let manager = RoomManager::default();
        let config = SessionConfig::new(3, WinVariant::FiveInARow, 100);
        assert!(matches!(
            manager.create_room(None, Some(config)),
            Err(RoomError::InvalidConfig(_))
        ));
        assert!(manager.list_rooms().is_empty());
    }

    #[test]
    fn test_rooms_share_state_through_registry() {
        let manager = RoomManager::default();
        let room = manager.create_room(Some("r".into()), None).unwrap();
        room.join(crate::events::JoinRequest::new("a".into(), None))
            .unwrap();

        let again = manager.room("r").unwrap();
        assert_eq!(again.snapshot().players().len(), 1);
    }

    #[test]
    fn test_dispose_room() {
        let manager = RoomManager::default();
        manager.create_room(Some("r".into()), None).unwrap();
        assert!(manager.dispose_room("r"));
        assert!(!manager.dispose_room("r"));
        assert!(manager.room("r").is_none());
    }

    #[test]
    fn test_finished_room_is_disposed() {
        use crate::events::{JoinRequest, MoveRequest};

        let manager = RoomManager::new(SessionConfig::occupancy_exhaustion());
        let room = manager.create_room(Some("r".into()), None).unwrap();
        room.join(JoinRequest::new("a".into(), None)).unwrap();
        room.join(JoinRequest::new("b".into(), None)).unwrap();
        assert!(!manager.dispose_if_over(&room));

        for position in 0..9 {
            let player = if position % 2 == 0 { "a" } else { "b" };
            room.submit_move(MoveRequest::new(player.into(), position));
        }
        assert!(room.snapshot().result().is_some());
        assert!(manager.dispose_if_over(&room));
        assert!(manager.list_rooms().is_empty());
    }
}
