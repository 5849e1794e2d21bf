//! Wire protocol events exchanged with connected clients.
//!
//! Events are internally tagged JSON objects: the `type` field carries the
//! kebab-case event name, payload fields are camelCase.

use serde::{Deserialize, Serialize};

use super::RoomId;

/// Events received from a client connection.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum ClientEvent {
    /// Open a new room as its creator.
    #[serde(rename_all = "camelCase")]
    CreateRoom {
        username: String,
        user_language: String,
        partner_language: String,
    },

    /// Query a room's declared language pair before joining.
    #[serde(rename_all = "camelCase")]
    GetRoomInfo { room_id: RoomId },

    /// Join an existing room as the second participant.
    #[serde(rename_all = "camelCase")]
    JoinRoom {
        room_id: RoomId,
        username: String,
        language: String,
    },

    /// Relay a text message to the counterpart.
    #[serde(rename_all = "camelCase")]
    SendMessage { room_id: RoomId, message: String },

    /// Explicitly leave the room.
    #[serde(rename_all = "camelCase")]
    EndChat { room_id: RoomId },
}

/// Events sent to a client connection.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum ServerEvent {
    /// Acknowledges room creation to the creator.
    #[serde(rename_all = "camelCase")]
    RoomCreated {
        room_id: RoomId,
        creator_language: String,
        partner_language: String,
    },

    /// Declared language pair, for pre-selecting the joiner's languages.
    #[serde(rename_all = "camelCase")]
    RoomInfo {
        creator_language: String,
        partner_language: String,
    },

    /// Acknowledges a successful join, carrying the existing participant.
    #[serde(rename_all = "camelCase")]
    JoinedRoom {
        room_id: RoomId,
        other_user: Option<PeerInfo>,
    },

    /// Tells the existing participant who just joined.
    #[serde(rename_all = "camelCase")]
    UserJoined { username: String, language: String },

    /// A relayed chat message, framed for one recipient.
    #[serde(rename_all = "camelCase")]
    MessageReceived {
        message: String,
        translated_message: String,
        username: String,
        timestamp: String,
        is_own: bool,
    },

    /// The counterpart's connection was lost.
    #[serde(rename_all = "camelCase")]
    UserLeft { username: String },

    /// The counterpart explicitly ended the chat.
    #[serde(rename_all = "camelCase")]
    ChatEnded { username: String, reason: String },

    /// Tells the participant who ended the chat to return to initial state.
    ReturnToSetup,

    /// The room expired before a second participant joined.
    RoomExpired,

    /// The requester's last action failed.
    #[serde(rename_all = "camelCase")]
    Error { message: String },
}

/// Public view of the participant already in a room.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PeerInfo {
    pub username: String,
    pub language: String,
}
