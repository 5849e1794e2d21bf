//! Domain types for rooms, participants, and the wire protocol.

mod events;
mod ids;
mod language;
mod room;

pub use events::{ClientEvent, PeerInfo, ServerEvent};
pub use ids::{ConnectionId, RoomId};
pub use language::{language_name, DEFAULT_SOURCE_LANGUAGE, DEFAULT_TARGET_LANGUAGE};
pub use room::{Participant, Room, RoomError, MAX_PARTICIPANTS};
