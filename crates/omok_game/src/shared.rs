//! Per-session mutual exclusion.
//!
//! Every operation acquires the session lock once and runs its whole
//! check-then-act sequence under it, so two moves racing for the same turn
//! slot can never both pass the turn check. The lock is per session; separate
//! sessions never contend.

use crate::board::Position;
use crate::error::JoinError;
use crate::roster::{Player, PlayerId};
use crate::session::{Departure, GameSession, MoveOutcome, SessionSnapshot};
use std::sync::{Arc, Mutex, MutexGuard};
use tracing::{instrument, warn};

/// Cloneable handle to one locked [`GameSession`].
#[derive(Debug, Clone)]
pub struct SharedSession {
    inner: Arc<Mutex<GameSession>>,
}

impl SharedSession {
    /// Wraps a session for shared use.
    pub fn new(session: GameSession) -> Self {
        Self {
            inner: Arc::new(Mutex::new(session)),
        }
    }

    /// Every mutation completes before any point that could panic, so a
    /// poisoned guard still holds consistent state.
    fn lock(&self) -> MutexGuard<'_, GameSession> {
        self.inner.lock().unwrap_or_else(|poisoned| {
            warn!("Recovering poisoned session lock");
            poisoned.into_inner()
        })
    }

    /// Seats a player under the session lock.
    #[instrument(skip(self, display_name), fields(player_id = %id))]
    pub fn join(&self, id: PlayerId, display_name: impl Into<String>) -> Result<Player, JoinError> {
        self.lock().join(id, display_name)
    }

    /// Turn check, placement, turn advance and win evaluation as one
    /// critical section.
    #[instrument(skip(self), fields(player_id = %id))]
    pub fn submit_move(&self, id: &PlayerId, position: Position) -> MoveOutcome {
        self.lock().submit_move(id, position)
    }

    /// Removes a player and resolves the winner under the session lock.
    #[instrument(skip(self), fields(player_id = %id))]
    pub fn leave(&self, id: &PlayerId) -> Option<Departure> {
        self.lock().leave(id)
    }

    /// True iff `id` may move now. The answer can be stale by the time the
    /// caller acts on it; use [`SharedSession::submit_move`] to move.
    pub fn is_players_turn(&self, id: &PlayerId) -> bool {
        self.lock().is_players_turn(id)
    }

    /// Copies the current state.
    pub fn snapshot(&self) -> SessionSnapshot {
        self.lock().snapshot()
    }

    /// Runs `f` with read access to the session while holding the lock.
    pub fn with_session<R>(&self, f: impl FnOnce(&GameSession) -> R) -> R {
        f(&self.lock())
    }

    /// Runs `f` with write access to the session while holding the lock.
    /// Work done by `f` after a session call (reading the roster, publishing
    /// the result) is ordered with every other operation on this session.
    pub fn update<R>(&self, f: impl FnOnce(&mut GameSession) -> R) -> R {
        f(&mut self.lock())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SessionConfig;
    use crate::error::RejectReason;
    use std::sync::Barrier;
    use std::thread;

    fn shared() -> SharedSession {
        let session = SharedSession::new(GameSession::new(SessionConfig::five_in_a_row()).unwrap());
        session.join("a".into(), "Alice").unwrap();
        session.join("b".into(), "Bob").unwrap();
        session
    }

    #[test]
    fn test_clones_share_state() {
        let session = shared();
        let other = session.clone();
        assert!(session.submit_move(&"a".into(), 0).is_accepted());
        assert!(other.is_players_turn(&"b".into()));
    }

    #[test]
    fn test_same_player_racing_itself_places_once() {
        let session = shared();
        let barrier = Arc::new(Barrier::new(8));

        let handles: Vec<_> = (0..8)
            .map(|i| {
                let session = session.clone();
                let barrier = Arc::clone(&barrier);
                thread::spawn(move || {
                    barrier.wait();
                    session.submit_move(&"a".into(), 100 + i)
                })
            })
            .collect();

        let outcomes: Vec<MoveOutcome> = handles.into_iter().map(|h| h.join().unwrap()).collect();
        let accepted = outcomes.iter().filter(|o| o.is_accepted()).count();
        assert_eq!(accepted, 1);
        assert!(
            outcomes
                .iter()
                .filter_map(MoveOutcome::rejection)
                .all(|r| r == RejectReason::NotYourTurn)
        );
        assert_eq!(session.snapshot().marks().len(), 1);
    }

    #[test]
    fn test_leave_racing_move_never_accepts_after_departure() {
        for _ in 0..50 {
            let session = shared();
            let barrier = Arc::new(Barrier::new(2));

            let mover = {
                let session = session.clone();
                let barrier = Arc::clone(&barrier);
                thread::spawn(move || {
                    barrier.wait();
                    session.submit_move(&"a".into(), 0)
                })
            };
            let leaver = {
                let session = session.clone();
                let barrier = Arc::clone(&barrier);
                thread::spawn(move || {
                    barrier.wait();
                    session.leave(&"b".into())
                })
            };

            let outcome = mover.join().unwrap();
            let departure = leaver.join().unwrap().unwrap();
            let snapshot = session.snapshot();

            // The winner by departure is always the player who stayed.
            let winner = departure.result().as_ref().and_then(|r| r.winner()).unwrap();
            assert_eq!(winner.id().as_str(), "a");

            match outcome.rejection() {
                // Departure ran first: the board never changes.
                Some(reason) => {
                    assert_eq!(reason, RejectReason::NotStarted);
                    assert!(snapshot.marks().is_empty());
                }
                // Move ran first: exactly one mark, placed while both were seated.
                None => {
                    assert_eq!(snapshot.marks().len(), 1);
                    assert_eq!(*snapshot.marks()[0].turn_number(), 1);
                }
            }
            assert!(session.with_session(|s| s.is_over()));
        }
    }

    #[test]
    fn test_update_runs_under_one_lock() {
        let session = shared();
        let (outcome, players) = session.update(|s| {
            let outcome = s.submit_move(&"a".into(), 0);
            (outcome, s.roster().len())
        });
        assert!(outcome.is_accepted());
        assert_eq!(players, 2);
        assert!(session.is_players_turn(&"b".into()));
    }
}
