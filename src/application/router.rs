//! Per-message resolution, translation, and role-framed delivery.

use std::sync::Arc;

use chrono::Utc;

use crate::domain::{ConnectionId, RoomError, RoomId, ServerEvent};
use crate::ports::ClientSink;

use super::{RoomRegistry, TranslationRelay};

/// Self-referential display name shown to the sender of a message.
const OWN_USERNAME: &str = "You";

/// Routes one inbound message to both sides of a room.
///
/// Room state is only read, never held, across the translation await: the
/// registry lock is released before the provider round-trip, so messages in
/// other rooms (and further messages in the same room) proceed concurrently.
/// Two quick messages from one sender may therefore dispatch out of order if
/// the second translation returns first; that ordering relaxation is
/// deliberate.
pub struct MessageRouter {
    registry: Arc<RoomRegistry>,
    relay: TranslationRelay,
    sink: Arc<dyn ClientSink>,
}

impl MessageRouter {
    /// Creates a router over the given registry, relay, and sink.
    pub fn new(registry: Arc<RoomRegistry>, relay: TranslationRelay, sink: Arc<dyn ClientSink>) -> Self {
        Self {
            registry,
            relay,
            sink,
        }
    }

    /// Relays `text` from `sender` to the counterpart in `room_id`.
    ///
    /// The sender sees the original framed as their own message; the
    /// counterpart sees the translation under the sender's real name.
    /// Resolution failures are reported to the sender as `error` events and
    /// mutate nothing.
    pub async fn route(&self, room_id: &RoomId, sender: ConnectionId, text: &str) {
        let (sender_info, counterpart) = {
            let Some(room) = self.registry.get(room_id).await else {
                self.send_error(sender, RoomError::RoomNotFound).await;
                return;
            };
            let (Some(from), Some(to)) = (room.participant(sender), room.counterpart(sender))
            else {
                // Covers a message arriving after the counterpart already left.
                self.send_error(sender, RoomError::ParticipantNotFound).await;
                return;
            };
            (from.clone(), to.clone())
        };

        tracing::debug!(
            %room_id,
            source = %sender_info.language,
            target = %counterpart.language,
            "relaying message"
        );

        let translated = self
            .relay
            .translate(text, &sender_info.language, &counterpart.language)
            .await;
        let timestamp = Utc::now().to_rfc3339();

        self.sink
            .send(
                sender,
                ServerEvent::MessageReceived {
                    message: text.to_string(),
                    translated_message: translated.clone(),
                    username: OWN_USERNAME.to_string(),
                    timestamp: timestamp.clone(),
                    is_own: true,
                },
            )
            .await;
        self.sink
            .send(
                counterpart.connection,
                ServerEvent::MessageReceived {
                    message: text.to_string(),
                    translated_message: translated,
                    username: sender_info.username,
                    timestamp,
                    is_own: false,
                },
            )
            .await;
    }

    async fn send_error(&self, connection: ConnectionId, error: RoomError) {
        self.sink
            .send(
                connection,
                ServerEvent::Error {
                    message: error.to_string(),
                },
            )
            .await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::ai::MockTranslator;
    use crate::domain::Participant;
    use crate::ports::{RecordingSink, TranslationError, Translator};

    async fn paired_room(
        registry: &RoomRegistry,
    ) -> (RoomId, ConnectionId, ConnectionId) {
        let creator = Participant::new(ConnectionId::new(), "Alice", "en");
        let creator_conn = creator.connection;
        let room_id = registry.create(creator, "es").await;
        let joiner = Participant::new(ConnectionId::new(), "Bob", "es");
        let joiner_conn = joiner.connection;
        registry.add_participant(&room_id, joiner).await.unwrap();
        (room_id, creator_conn, joiner_conn)
    }

    fn router_with(
        registry: Arc<RoomRegistry>,
        translator: Arc<dyn Translator>,
        sink: Arc<RecordingSink>,
    ) -> MessageRouter {
        MessageRouter::new(
            registry,
            TranslationRelay::new(translator),
            sink as Arc<dyn ClientSink>,
        )
    }

    #[tokio::test]
    async fn message_is_delivered_to_both_sides_with_role_framing() {
        let registry = Arc::new(RoomRegistry::new());
        let (room_id, alice, bob) = paired_room(&registry).await;
        let sink = Arc::new(RecordingSink::new());
        let translator = Arc::new(MockTranslator::new().with_response("hola"));
        let router = router_with(Arc::clone(&registry), translator, sink.clone());

        router.route(&room_id, alice, "hello").await;

        let to_alice = sink.sent_to(alice);
        let to_bob = sink.sent_to(bob);
        assert_eq!(to_alice.len(), 1);
        assert_eq!(to_bob.len(), 1);

        match &to_alice[0] {
            ServerEvent::MessageReceived {
                message,
                translated_message,
                username,
                is_own,
                ..
            } => {
                assert_eq!(message, "hello");
                assert_eq!(translated_message, "hola");
                assert_eq!(username, "You");
                assert!(is_own);
            }
            other => panic!("unexpected event: {:?}", other),
        }

        match &to_bob[0] {
            ServerEvent::MessageReceived {
                message,
                translated_message,
                username,
                is_own,
                ..
            } => {
                assert_eq!(message, "hello");
                assert_eq!(translated_message, "hola");
                assert_eq!(username, "Alice");
                assert!(!is_own);
            }
            other => panic!("unexpected event: {:?}", other),
        }
    }

    #[tokio::test]
    async fn delivery_proceeds_when_translation_always_fails() {
        let registry = Arc::new(RoomRegistry::new());
        let (room_id, alice, bob) = paired_room(&registry).await;
        let sink = Arc::new(RecordingSink::new());
        let translator = Arc::new(
            MockTranslator::new()
                .with_failure(TranslationError::Network("connection refused".into())),
        );
        let router = router_with(Arc::clone(&registry), translator, sink.clone());

        router.route(&room_id, alice, "hello").await;

        // Fallback: translated text equals the original on both sides.
        for event in sink.sent_to(alice).iter().chain(sink.sent_to(bob).iter()) {
            match event {
                ServerEvent::MessageReceived {
                    message,
                    translated_message,
                    ..
                } => {
                    assert_eq!(message, "hello");
                    assert_eq!(translated_message, "hello");
                }
                other => panic!("unexpected event: {:?}", other),
            }
        }
    }

    #[tokio::test]
    async fn translator_receives_the_participants_declared_languages() {
        let registry = Arc::new(RoomRegistry::new());
        let (room_id, alice, _bob) = paired_room(&registry).await;
        let sink = Arc::new(RecordingSink::new());
        let translator = Arc::new(MockTranslator::new());
        let router = router_with(Arc::clone(&registry), translator.clone(), sink);

        router.route(&room_id, alice, "hello").await;

        assert_eq!(translator.calls(), vec![("hello".to_string(), "en".to_string(), "es".to_string())]);
    }

    #[tokio::test]
    async fn message_to_missing_room_reports_room_not_found() {
        let registry = Arc::new(RoomRegistry::new());
        let sink = Arc::new(RecordingSink::new());
        let router = router_with(
            Arc::clone(&registry),
            Arc::new(MockTranslator::new()),
            sink.clone(),
        );

        let sender = ConnectionId::new();
        router.route(&RoomId::from_string("nope"), sender, "hello").await;

        assert_eq!(
            sink.sent_to(sender),
            vec![ServerEvent::Error {
                message: "Room not found".into(),
            }]
        );
    }

    #[tokio::test]
    async fn message_without_counterpart_reports_participant_not_found() {
        let registry = Arc::new(RoomRegistry::new());
        let creator = Participant::new(ConnectionId::new(), "Alice", "en");
        let alice = creator.connection;
        let room_id = registry.create(creator, "es").await;
        let sink = Arc::new(RecordingSink::new());
        let router = router_with(
            Arc::clone(&registry),
            Arc::new(MockTranslator::new()),
            sink.clone(),
        );

        router.route(&room_id, alice, "hello").await;

        assert_eq!(
            sink.sent_to(alice),
            vec![ServerEvent::Error {
                message: "Participant not found".into(),
            }]
        );
    }

    #[tokio::test]
    async fn message_from_stranger_reports_participant_not_found() {
        let registry = Arc::new(RoomRegistry::new());
        let (room_id, _alice, _bob) = paired_room(&registry).await;
        let sink = Arc::new(RecordingSink::new());
        let router = router_with(
            Arc::clone(&registry),
            Arc::new(MockTranslator::new()),
            sink.clone(),
        );

        let stranger = ConnectionId::new();
        router.route(&room_id, stranger, "hello").await;

        assert_eq!(
            sink.sent_to(stranger),
            vec![ServerEvent::Error {
                message: "Participant not found".into(),
            }]
        );
    }
}
