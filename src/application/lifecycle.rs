//! Room lifecycle state machine.
//!
//! Per room: Empty (no registry entry) → WaitingForPartner (one participant,
//! expiry timer armed) → Active (two participants, timer disarmed) → Closed
//! (removed from the registry). The controller processes create, join, end,
//! disconnect, and timeout transitions against the registry and emits the
//! outbound events each transition owes to the connected parties.

use std::sync::Arc;
use std::time::Duration;

use crate::domain::{ConnectionId, Participant, PeerInfo, RoomId, ServerEvent};
use crate::ports::ClientSink;

use super::RoomRegistry;

/// Reason reported to the counterpart when a chat is ended explicitly.
const END_REASON: &str = "ended";

/// Processes room lifecycle transitions and emits their outbound events.
pub struct LifecycleController {
    registry: Arc<RoomRegistry>,
    sink: Arc<dyn ClientSink>,
    /// How long a room may wait for its second participant.
    room_ttl: Duration,
}

impl LifecycleController {
    /// Creates a controller over the given registry and sink.
    pub fn new(registry: Arc<RoomRegistry>, sink: Arc<dyn ClientSink>, room_ttl: Duration) -> Self {
        Self {
            registry,
            sink,
            room_ttl,
        }
    }

    /// Empty → WaitingForPartner.
    ///
    /// Registers a room with the creator as its first participant, arms the
    /// expiry timer, and acknowledges with `room-created`. The partner
    /// language is advisory: the actual translation direction is always
    /// derived from the joiner's own declaration.
    pub async fn create_room(
        &self,
        connection: ConnectionId,
        username: String,
        user_language: String,
        partner_language: String,
    ) -> RoomId {
        let creator = Participant::new(connection, username, user_language.clone());
        let room_id = self
            .registry
            .create(creator, partner_language.clone())
            .await;

        let handle = {
            let registry = Arc::clone(&self.registry);
            let sink = Arc::clone(&self.sink);
            let room_id = room_id.clone();
            let ttl = self.room_ttl;
            tokio::spawn(async move {
                tokio::time::sleep(ttl).await;
                if let Some(participants) = registry.expire(&room_id).await {
                    tracing::info!(%room_id, "room expired waiting for partner");
                    for participant in participants {
                        sink.send(participant.connection, ServerEvent::RoomExpired)
                            .await;
                    }
                }
            })
        };
        self.registry.arm_expiry(&room_id, handle).await;

        tracing::info!(%room_id, %user_language, %partner_language, "room created");
        self.sink
            .send(
                connection,
                ServerEvent::RoomCreated {
                    room_id: room_id.clone(),
                    creator_language: user_language,
                    partner_language,
                },
            )
            .await;

        room_id
    }

    /// Query, not a transition: reports the stored language pair so a joiner
    /// can pre-select languages.
    pub async fn room_info(&self, connection: ConnectionId, room_id: &RoomId) {
        match self.registry.get(room_id).await {
            Some(room) => {
                self.sink
                    .send(
                        connection,
                        ServerEvent::RoomInfo {
                            creator_language: room.creator_language,
                            partner_language: room.partner_language,
                        },
                    )
                    .await;
            }
            None => self.send_error(connection, "Room not found").await,
        }
    }

    /// WaitingForPartner → Active.
    ///
    /// The only point at which the counterpart's language becomes
    /// authoritatively known to the message router.
    pub async fn join_room(
        &self,
        connection: ConnectionId,
        room_id: &RoomId,
        username: String,
        language: String,
    ) {
        let joiner = Participant::new(connection, username, language);
        let username = joiner.username.clone();
        let language = joiner.language.clone();

        match self.registry.add_participant(room_id, joiner).await {
            Ok(outcome) => {
                tracing::info!(%room_id, %username, %language, "user joined room");
                if let Some(ref other) = outcome.counterpart {
                    self.sink
                        .send(
                            other.connection,
                            ServerEvent::UserJoined {
                                username: username.clone(),
                                language: language.clone(),
                            },
                        )
                        .await;
                }
                self.sink
                    .send(
                        connection,
                        ServerEvent::JoinedRoom {
                            room_id: room_id.clone(),
                            other_user: outcome.counterpart.map(|p| PeerInfo {
                                username: p.username,
                                language: p.language,
                            }),
                        },
                    )
                    .await;
            }
            Err(error) => self.send_error(connection, &error.to_string()).await,
        }
    }

    /// Explicit, one-sided end of the chat.
    ///
    /// The remaining participant (if any) is told who ended the chat and
    /// stays connected; the actor is told to return to initial state. The
    /// room vanishes only when the removal empties it.
    pub async fn end_chat(&self, connection: ConnectionId, room_id: &RoomId) {
        match self.registry.remove_participant(room_id, connection).await {
            Ok(removal) => {
                tracing::info!(%room_id, username = %removal.removed.username, "user ended chat");
                if let Some(remaining) = removal.remaining {
                    self.sink
                        .send(
                            remaining.connection,
                            ServerEvent::ChatEnded {
                                username: removal.removed.username,
                                reason: END_REASON.to_string(),
                            },
                        )
                        .await;
                }
                self.sink.send(connection, ServerEvent::ReturnToSetup).await;
            }
            Err(error) => self.send_error(connection, &error.to_string()).await,
        }
    }

    /// Transport-driven removal: same effect as an explicit end, framed as
    /// "left" to the counterpart, with no acknowledgment to the connection
    /// that is already gone.
    ///
    /// A room dropped from Active back to one participant does not re-arm
    /// its expiry timer; it waits for an explicit end.
    pub async fn disconnect(&self, connection: ConnectionId) {
        if let Some((room_id, removal)) = self.registry.remove_by_connection(connection).await {
            tracing::info!(%room_id, username = %removal.removed.username, "user left room");
            if let Some(remaining) = removal.remaining {
                self.sink
                    .send(
                        remaining.connection,
                        ServerEvent::UserLeft {
                            username: removal.removed.username,
                        },
                    )
                    .await;
            }
        }
    }

    async fn send_error(&self, connection: ConnectionId, message: &str) {
        self.sink
            .send(
                connection,
                ServerEvent::Error {
                    message: message.to_string(),
                },
            )
            .await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ports::RecordingSink;

    const TTL: Duration = Duration::from_secs(300);

    fn controller() -> (Arc<LifecycleController>, Arc<RoomRegistry>, Arc<RecordingSink>) {
        let registry = Arc::new(RoomRegistry::new());
        let sink = Arc::new(RecordingSink::new());
        let controller = Arc::new(LifecycleController::new(
            Arc::clone(&registry),
            sink.clone() as Arc<dyn ClientSink>,
            TTL,
        ));
        (controller, registry, sink)
    }

    #[tokio::test]
    async fn create_room_acknowledges_creator() {
        let (controller, registry, sink) = controller();
        let conn = ConnectionId::new();

        let room_id = controller
            .create_room(conn, "Alice".into(), "en".into(), "ar".into())
            .await;

        assert!(registry.get(&room_id).await.is_some());
        assert!(registry.expiry_armed(&room_id).await);
        assert_eq!(
            sink.sent_to(conn),
            vec![ServerEvent::RoomCreated {
                room_id,
                creator_language: "en".into(),
                partner_language: "ar".into(),
            }]
        );
    }

    #[tokio::test(start_paused = true)]
    async fn waiting_room_expires_and_notifies_creator() {
        let (controller, registry, sink) = controller();
        let conn = ConnectionId::new();
        let room_id = controller
            .create_room(conn, "Alice".into(), "en".into(), "ar".into())
            .await;

        tokio::time::sleep(TTL + Duration::from_secs(1)).await;

        assert!(registry.get(&room_id).await.is_none());
        assert!(sink.sent_to(conn).contains(&ServerEvent::RoomExpired));
    }

    #[tokio::test(start_paused = true)]
    async fn filled_room_survives_past_the_deadline() {
        let (controller, registry, _sink) = controller();
        let creator = ConnectionId::new();
        let joiner = ConnectionId::new();
        let room_id = controller
            .create_room(creator, "Alice".into(), "en".into(), "ar".into())
            .await;
        controller
            .join_room(joiner, &room_id, "Bob".into(), "ar".into())
            .await;

        tokio::time::sleep(TTL * 2).await;

        let room = registry.get(&room_id).await.unwrap();
        assert_eq!(room.participants.len(), 2);
    }

    #[tokio::test]
    async fn join_notifies_both_sides() {
        let (controller, _registry, sink) = controller();
        let creator = ConnectionId::new();
        let joiner = ConnectionId::new();
        let room_id = controller
            .create_room(creator, "Alice".into(), "en".into(), "ar".into())
            .await;
        sink.clear();

        controller
            .join_room(joiner, &room_id, "Bob".into(), "ar".into())
            .await;

        assert_eq!(
            sink.sent_to(creator),
            vec![ServerEvent::UserJoined {
                username: "Bob".into(),
                language: "ar".into(),
            }]
        );
        assert_eq!(
            sink.sent_to(joiner),
            vec![ServerEvent::JoinedRoom {
                room_id,
                other_user: Some(PeerInfo {
                    username: "Alice".into(),
                    language: "en".into(),
                }),
            }]
        );
    }

    #[tokio::test]
    async fn join_missing_room_reports_error() {
        let (controller, registry, sink) = controller();
        let joiner = ConnectionId::new();

        controller
            .join_room(
                joiner,
                &RoomId::from_string("nope"),
                "Bob".into(),
                "ar".into(),
            )
            .await;

        assert!(registry.is_empty().await);
        assert_eq!(
            sink.sent_to(joiner),
            vec![ServerEvent::Error {
                message: "Room not found".into(),
            }]
        );
    }

    #[tokio::test]
    async fn join_full_room_reports_error() {
        let (controller, _registry, sink) = controller();
        let room_id = controller
            .create_room(ConnectionId::new(), "Alice".into(), "en".into(), "ar".into())
            .await;
        controller
            .join_room(ConnectionId::new(), &room_id, "Bob".into(), "ar".into())
            .await;

        let third = ConnectionId::new();
        controller
            .join_room(third, &room_id, "Carol".into(), "fr".into())
            .await;

        assert_eq!(
            sink.sent_to(third),
            vec![ServerEvent::Error {
                message: "Room is full".into(),
            }]
        );
    }

    #[tokio::test]
    async fn room_info_reports_language_pair() {
        let (controller, _registry, sink) = controller();
        let room_id = controller
            .create_room(ConnectionId::new(), "Alice".into(), "en".into(), "ar".into())
            .await;

        let asker = ConnectionId::new();
        controller.room_info(asker, &room_id).await;

        assert_eq!(
            sink.sent_to(asker),
            vec![ServerEvent::RoomInfo {
                creator_language: "en".into(),
                partner_language: "ar".into(),
            }]
        );
    }

    #[tokio::test]
    async fn room_info_for_missing_room_reports_error() {
        let (controller, _registry, sink) = controller();
        let asker = ConnectionId::new();

        controller.room_info(asker, &RoomId::from_string("nope")).await;

        assert_eq!(
            sink.sent_to(asker),
            vec![ServerEvent::Error {
                message: "Room not found".into(),
            }]
        );
    }

    #[tokio::test]
    async fn end_chat_notifies_counterpart_and_actor() {
        let (controller, registry, sink) = controller();
        let creator = ConnectionId::new();
        let joiner = ConnectionId::new();
        let room_id = controller
            .create_room(creator, "Alice".into(), "en".into(), "ar".into())
            .await;
        controller
            .join_room(joiner, &room_id, "Bob".into(), "ar".into())
            .await;
        sink.clear();

        controller.end_chat(creator, &room_id).await;

        assert_eq!(
            sink.sent_to(joiner),
            vec![ServerEvent::ChatEnded {
                username: "Alice".into(),
                reason: "ended".into(),
            }]
        );
        assert_eq!(sink.sent_to(creator), vec![ServerEvent::ReturnToSetup]);
        // Counterpart stays; the room still exists with one participant.
        assert_eq!(registry.get(&room_id).await.unwrap().participants.len(), 1);
    }

    #[tokio::test]
    async fn end_chat_as_sole_participant_deletes_the_room() {
        let (controller, registry, sink) = controller();
        let creator = ConnectionId::new();
        let room_id = controller
            .create_room(creator, "Alice".into(), "en".into(), "ar".into())
            .await;
        sink.clear();

        controller.end_chat(creator, &room_id).await;

        assert!(registry.get(&room_id).await.is_none());
        assert_eq!(sink.sent_to(creator), vec![ServerEvent::ReturnToSetup]);
        assert_eq!(sink.deliveries().len(), 1);
    }

    #[tokio::test]
    async fn end_chat_by_non_participant_reports_error() {
        let (controller, _registry, sink) = controller();
        let room_id = controller
            .create_room(ConnectionId::new(), "Alice".into(), "en".into(), "ar".into())
            .await;

        let stranger = ConnectionId::new();
        controller.end_chat(stranger, &room_id).await;

        assert_eq!(
            sink.sent_to(stranger),
            vec![ServerEvent::Error {
                message: "Participant not found".into(),
            }]
        );
    }

    #[tokio::test]
    async fn disconnect_notifies_remaining_participant_as_left() {
        let (controller, registry, sink) = controller();
        let creator = ConnectionId::new();
        let joiner = ConnectionId::new();
        let room_id = controller
            .create_room(creator, "Alice".into(), "en".into(), "ar".into())
            .await;
        controller
            .join_room(joiner, &room_id, "Bob".into(), "ar".into())
            .await;
        sink.clear();

        controller.disconnect(creator).await;

        assert_eq!(
            sink.sent_to(joiner),
            vec![ServerEvent::UserLeft {
                username: "Alice".into(),
            }]
        );
        assert!(sink.sent_to(creator).is_empty());
        assert_eq!(registry.get(&room_id).await.unwrap().participants.len(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn room_halved_by_disconnect_waits_indefinitely() {
        let (controller, registry, _sink) = controller();
        let creator = ConnectionId::new();
        let joiner = ConnectionId::new();
        let room_id = controller
            .create_room(creator, "Alice".into(), "en".into(), "ar".into())
            .await;
        controller
            .join_room(joiner, &room_id, "Bob".into(), "ar".into())
            .await;

        controller.disconnect(creator).await;
        tokio::time::sleep(TTL * 10).await;

        // No timer re-arms on drop-to-one; the room persists.
        assert_eq!(registry.get(&room_id).await.unwrap().participants.len(), 1);
        assert!(!registry.expiry_armed(&room_id).await);
    }

    #[tokio::test]
    async fn disconnect_of_last_participant_deletes_the_room() {
        let (controller, registry, sink) = controller();
        let creator = ConnectionId::new();
        let room_id = controller
            .create_room(creator, "Alice".into(), "en".into(), "ar".into())
            .await;
        sink.clear();

        controller.disconnect(creator).await;

        assert!(registry.get(&room_id).await.is_none());
        assert!(sink.deliveries().is_empty());
    }
}
