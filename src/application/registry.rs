//! In-memory registry of active rooms.
//!
//! The single mutable shared structure in the system. All mutating
//! operations (create, add, remove, expire) serialize on the write half of
//! one `RwLock`; read-only lookups interleave freely on the read half. No
//! transaction spans more than one room.

use std::collections::HashMap;

use tokio::sync::RwLock;
use tokio::task::JoinHandle;

use crate::domain::{ConnectionId, Participant, Room, RoomError, RoomId};

/// A registered room plus its pending expiry timer, if armed.
///
/// Invariant: the timer is armed iff the room is not yet full.
struct RoomEntry {
    room: Room,
    expiry: Option<JoinHandle<()>>,
}

impl RoomEntry {
    /// Aborts and drops the expiry timer, if one is armed.
    fn disarm(&mut self) {
        if let Some(handle) = self.expiry.take() {
            handle.abort();
        }
    }
}

/// Result of adding a participant to a room.
#[derive(Debug, Clone)]
pub struct JoinOutcome {
    /// Snapshot of the room after the join.
    pub room: Room,
    /// The participant that was already present, if any.
    pub counterpart: Option<Participant>,
}

/// Result of removing a participant from a room.
#[derive(Debug, Clone)]
pub struct Removal {
    /// The participant that was removed.
    pub removed: Participant,
    /// The participant still in the room, if any.
    pub remaining: Option<Participant>,
    /// True if the removal emptied the room and deleted it.
    pub room_deleted: bool,
}

/// Owns the mapping from room id to room state.
///
/// The id generator is injectable so tests can force collisions; production
/// uses [`RoomId::generate`].
pub struct RoomRegistry {
    rooms: RwLock<HashMap<RoomId, RoomEntry>>,
    id_generator: Box<dyn Fn() -> RoomId + Send + Sync>,
}

impl RoomRegistry {
    /// Creates an empty registry with random id generation.
    pub fn new() -> Self {
        Self::with_id_generator(RoomId::generate)
    }

    /// Creates a registry with a custom id generator (for tests).
    pub fn with_id_generator(
        id_generator: impl Fn() -> RoomId + Send + Sync + 'static,
    ) -> Self {
        Self {
            rooms: RwLock::new(HashMap::new()),
            id_generator: Box::new(id_generator),
        }
    }

    /// Registers a new room with `creator` as its only participant.
    ///
    /// Retries id generation until the id is absent from the registry, so
    /// ids stay unique even if the generator collides.
    pub async fn create(
        &self,
        creator: Participant,
        partner_language: impl Into<String>,
    ) -> RoomId {
        let mut rooms = self.rooms.write().await;

        let id = loop {
            let candidate = (self.id_generator)();
            if !rooms.contains_key(&candidate) {
                break candidate;
            }
        };

        let room = Room::new(id.clone(), creator, partner_language);
        rooms.insert(
            id.clone(),
            RoomEntry {
                room,
                expiry: None,
            },
        );
        id
    }

    /// Attaches an expiry timer to a waiting room.
    ///
    /// If the room has already filled or vanished between creation and
    /// arming, the handle is aborted instead of stored.
    pub async fn arm_expiry(&self, id: &RoomId, handle: JoinHandle<()>) {
        let mut rooms = self.rooms.write().await;
        match rooms.get_mut(id) {
            Some(entry) if !entry.room.is_full() => {
                entry.disarm();
                entry.expiry = Some(handle);
            }
            _ => handle.abort(),
        }
    }

    /// Returns a snapshot of the room, if registered.
    pub async fn get(&self, id: &RoomId) -> Option<Room> {
        self.rooms.read().await.get(id).map(|e| e.room.clone())
    }

    /// Adds a participant to a room, disarming its expiry timer.
    ///
    /// Fails with [`RoomError::RoomNotFound`] or [`RoomError::RoomFull`]
    /// without mutating anything.
    pub async fn add_participant(
        &self,
        id: &RoomId,
        participant: Participant,
    ) -> Result<JoinOutcome, RoomError> {
        let mut rooms = self.rooms.write().await;
        let entry = rooms.get_mut(id).ok_or(RoomError::RoomNotFound)?;

        if entry.room.is_full() {
            return Err(RoomError::RoomFull);
        }

        entry.disarm();
        let counterpart = entry.room.participants.first().cloned();
        entry.room.participants.push(participant);

        Ok(JoinOutcome {
            room: entry.room.clone(),
            counterpart,
        })
    }

    /// Removes the participant attached to `connection` from a room.
    ///
    /// Deletes the room (and disarms its timer) the instant its participant
    /// count reaches zero.
    pub async fn remove_participant(
        &self,
        id: &RoomId,
        connection: ConnectionId,
    ) -> Result<Removal, RoomError> {
        let mut rooms = self.rooms.write().await;
        let entry = rooms.get_mut(id).ok_or(RoomError::RoomNotFound)?;

        let index = entry
            .room
            .participants
            .iter()
            .position(|p| p.connection == connection)
            .ok_or(RoomError::ParticipantNotFound)?;

        let removed = entry.room.participants.remove(index);
        let remaining = entry.room.participants.first().cloned();
        let room_deleted = entry.room.participants.is_empty();

        if room_deleted {
            entry.disarm();
            rooms.remove(id);
        }

        Ok(Removal {
            removed,
            remaining,
            room_deleted,
        })
    }

    /// Removes a participant by connection alone, scanning all rooms.
    ///
    /// Used on disconnect, where no room id accompanies the event. Returns
    /// the room the connection belonged to, if any.
    pub async fn remove_by_connection(
        &self,
        connection: ConnectionId,
    ) -> Option<(RoomId, Removal)> {
        let room_id = {
            let rooms = self.rooms.read().await;
            rooms
                .iter()
                .find(|(_, e)| e.room.participant(connection).is_some())
                .map(|(id, _)| id.clone())?
        };

        self.remove_participant(&room_id, connection)
            .await
            .ok()
            .map(|removal| (room_id, removal))
    }

    /// Deletes a room whose expiry timer fired.
    ///
    /// Re-validates under the lock that the room is still present and still
    /// not full, guarding against the room filling between timer scheduling
    /// and firing. Returns the participants that were connected, for
    /// notification.
    pub async fn expire(&self, id: &RoomId) -> Option<Vec<Participant>> {
        let mut rooms = self.rooms.write().await;
        let still_waiting = rooms.get(id).is_some_and(|e| !e.room.is_full());
        if !still_waiting {
            return None;
        }
        rooms.remove(id).map(|entry| entry.room.participants)
    }

    /// Number of registered rooms.
    pub async fn len(&self) -> usize {
        self.rooms.read().await.len()
    }

    /// True if no rooms are registered.
    pub async fn is_empty(&self) -> bool {
        self.rooms.read().await.is_empty()
    }

    /// True if the given room currently has an armed expiry timer.
    pub async fn expiry_armed(&self, id: &RoomId) -> bool {
        self.rooms
            .read()
            .await
            .get(id)
            .is_some_and(|e| e.expiry.is_some())
    }
}

impl Default for RoomRegistry {
    fn default() -> Self {
        Self::new()
    }
}
