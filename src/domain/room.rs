//! The room aggregate and its participants.

use chrono::{DateTime, Utc};

use super::{ConnectionId, RoomId};

/// Maximum participants per room. Rooms are strictly pairwise.
pub const MAX_PARTICIPANTS: usize = 2;

/// Display name used when a participant submits a blank username.
const DEFAULT_USERNAME: &str = "Anonymous";

/// One live connection's membership record within a room.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Participant {
    /// Handle to the live transport connection. Non-owning: the room never
    /// manages the connection's lifetime, only reacts to its loss.
    pub connection: ConnectionId,
    /// Display name shown to the counterpart.
    pub username: String,
    /// Declared language preference code (e.g. "en").
    pub language: String,
    /// When this participant entered the room.
    pub joined_at: DateTime<Utc>,
}

impl Participant {
    /// Creates a participant record, defaulting a blank username.
    pub fn new(
        connection: ConnectionId,
        username: impl Into<String>,
        language: impl Into<String>,
    ) -> Self {
        let username = username.into();
        let username = if username.trim().is_empty() {
            DEFAULT_USERNAME.to_string()
        } else {
            username
        };
        Self {
            connection,
            username,
            language: language.into(),
            joined_at: Utc::now(),
        }
    }
}

/// A two-person pairing context: the unit of isolation for messages and
/// lifecycle.
///
/// The registry guarantees the invariants: at most [`MAX_PARTICIPANTS`]
/// participants, and a room with zero participants never remains registered.
#[derive(Debug, Clone)]
pub struct Room {
    pub id: RoomId,
    pub participants: Vec<Participant>,
    /// Language declared by the creator at creation time. Advisory only:
    /// used to pre-select languages in the joiner's UI, never to decide the
    /// translation direction.
    pub creator_language: String,
    /// Language the creator expects the partner to use. Advisory only.
    pub partner_language: String,
    pub created_at: DateTime<Utc>,
}

impl Room {
    /// Creates a room with the creator as its first participant.
    pub fn new(id: RoomId, creator: Participant, partner_language: impl Into<String>) -> Self {
        let creator_language = creator.language.clone();
        Self {
            id,
            participants: vec![creator],
            creator_language,
            partner_language: partner_language.into(),
            created_at: Utc::now(),
        }
    }

    /// Returns true if the room has reached its participant capacity.
    pub fn is_full(&self) -> bool {
        self.participants.len() >= MAX_PARTICIPANTS
    }

    /// Finds the participant attached to the given connection.
    pub fn participant(&self, connection: ConnectionId) -> Option<&Participant> {
        self.participants.iter().find(|p| p.connection == connection)
    }

    /// Finds the participant on the other side of the given connection.
    pub fn counterpart(&self, connection: ConnectionId) -> Option<&Participant> {
        self.participants.iter().find(|p| p.connection != connection)
    }
}

/// Errors raised by room operations.
///
/// All three are recovered at the operation boundary: reported to the
/// requesting connection as an `error` event, leaving registry state
/// untouched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum RoomError {
    /// The referenced room id has no registry entry.
    #[error("Room not found")]
    RoomNotFound,

    /// A join was attempted against a room that already has two participants.
    #[error("Room is full")]
    RoomFull,

    /// The connection is not currently recorded as a participant. Covers a
    /// message arriving after the counterpart already left.
    #[error("Participant not found")]
    ParticipantNotFound,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn room_with_two() -> (Room, ConnectionId, ConnectionId) {
        let a = ConnectionId::new();
        let b = ConnectionId::new();
        let mut room = Room::new(
            RoomId::from_string("room0001"),
            Participant::new(a, "Alice", "en"),
            "es",
        );
        room.participants.push(Participant::new(b, "Bob", "es"));
        (room, a, b)
    }

    #[test]
    fn blank_username_gets_default() {
        let p = Participant::new(ConnectionId::new(), "  ", "en");
        assert_eq!(p.username, "Anonymous");
    }

    #[test]
    fn provided_username_is_kept() {
        let p = Participant::new(ConnectionId::new(), "Alice", "en");
        assert_eq!(p.username, "Alice");
    }

    #[test]
    fn new_room_records_creator_language() {
        let creator = Participant::new(ConnectionId::new(), "Alice", "en");
        let room = Room::new(RoomId::from_string("room0001"), creator, "ar");
        assert_eq!(room.creator_language, "en");
        assert_eq!(room.partner_language, "ar");
        assert_eq!(room.participants.len(), 1);
        assert!(!room.is_full());
    }

    #[test]
    fn counterpart_resolves_the_other_side() {
        let (room, a, b) = room_with_two();
        assert!(room.is_full());
        assert_eq!(room.participant(a).unwrap().username, "Alice");
        assert_eq!(room.counterpart(a).unwrap().username, "Bob");
        assert_eq!(room.counterpart(b).unwrap().username, "Alice");
    }

    #[test]
    fn unknown_connection_has_no_participant() {
        let (room, _, _) = room_with_two();
        assert!(room.participant(ConnectionId::new()).is_none());
    }

    #[test]
    fn room_error_messages_match_wire_text() {
        assert_eq!(RoomError::RoomNotFound.to_string(), "Room not found");
        assert_eq!(RoomError::RoomFull.to_string(), "Room is full");
        assert_eq!(
            RoomError::ParticipantNotFound.to_string(),
            "Participant not found"
        );
    }
}
