//! UseCase: inbound message routing.
//!
//! Classifies what an active connection sent, validates it, normalizes it
//! into one outbound event shape, and fans it out to every connection
//! currently registered, the sender included.

use std::sync::Arc;

use crate::common::time::Clock;
use crate::domain::{
    ChatPayload, ClientMessage, ConnectionRegistry, EventPusher, ServerEvent, Session,
};

use super::{broadcast_event, error::RouteMessageError};

/// Normalizes inbound chat messages and hands them to the broadcast path.
pub struct RouteMessageUseCase {
    registry: Arc<dyn ConnectionRegistry>,
    pusher: Arc<dyn EventPusher>,
    clock: Arc<dyn Clock>,
}

impl RouteMessageUseCase {
    pub fn new(
        registry: Arc<dyn ConnectionRegistry>,
        pusher: Arc<dyn EventPusher>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            registry,
            pusher,
            clock,
        }
    }

    /// Route one raw frame from `session`.
    ///
    /// The delivery timestamp is assigned here, at broadcast time; whatever
    /// the client put in the frame never reaches the wire. Errors mean the
    /// frame was dropped; nothing was broadcast and the sender gets no
    /// feedback.
    pub async fn execute(&self, session: &Session, raw: &str) -> Result<(), RouteMessageError> {
        let message: ClientMessage =
            serde_json::from_str(raw).map_err(|e| RouteMessageError::Malformed(e.to_string()))?;
        let payload = ChatPayload::from_client_message(message)?;

        let username = session.username.as_str().to_string();
        let timestamp = self.clock.now_millis();
        let event = match payload {
            ChatPayload::Text(content) => ServerEvent::Text {
                content,
                username,
                timestamp,
            },
            ChatPayload::Image(content) => ServerEvent::Image {
                content,
                username,
                timestamp,
            },
        };

        let targets = self.registry.snapshot().await;
        broadcast_event(self.pusher.as_ref(), &targets, &event).await;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use tokio::sync::mpsc;

    use super::*;
    use crate::common::time::FixedClock;
    use crate::domain::{PusherChannel, Username};
    use crate::infrastructure::{ChannelEventPusher, InMemoryConnectionRegistry};

    const NOW: i64 = 1_700_000_000_000;

    fn create_usecase() -> (
        RouteMessageUseCase,
        Arc<InMemoryConnectionRegistry>,
        Arc<ChannelEventPusher>,
    ) {
        let registry = Arc::new(InMemoryConnectionRegistry::new());
        let pusher = Arc::new(ChannelEventPusher::new());
        let usecase = RouteMessageUseCase::new(
            registry.clone(),
            pusher.clone(),
            Arc::new(FixedClock::new(NOW)),
        );
        (usecase, registry, pusher)
    }

    async fn connect(
        registry: &InMemoryConnectionRegistry,
        pusher: &ChannelEventPusher,
        name: &str,
        sender: PusherChannel,
    ) -> Session {
        let session = Session::new(Username::new(name.to_string()).unwrap(), 1000);
        pusher.register_channel(session.connection_id, sender).await;
        registry.register(session.clone()).await.unwrap();
        session
    }

    async fn next_event(rx: &mut mpsc::Receiver<String>) -> ServerEvent {
        let raw = rx.recv().await.expect("expected another event");
        serde_json::from_str(&raw).expect("event should parse")
    }

    #[tokio::test]
    async fn test_text_is_normalized_and_broadcast_to_everyone_including_sender() {
        // given: alice and bob connected
        let (usecase, registry, pusher) = create_usecase();
        let (tx_alice, mut rx_alice) = mpsc::channel(8);
        let (tx_bob, mut rx_bob) = mpsc::channel(8);
        let alice = connect(&registry, &pusher, "alice", tx_alice).await;
        connect(&registry, &pusher, "bob", tx_bob).await;

        // when:
        usecase
            .execute(&alice, r#"{"type":"text","content":"hello"}"#)
            .await
            .unwrap();

        // then: both receive the normalized event with the sender's identity
        // and the router's timestamp
        let expected = ServerEvent::Text {
            content: "hello".to_string(),
            username: "alice".to_string(),
            timestamp: NOW,
        };
        assert_eq!(next_event(&mut rx_alice).await, expected);
        assert_eq!(next_event(&mut rx_bob).await, expected);
    }

    #[tokio::test]
    async fn test_client_supplied_timestamp_is_ignored() {
        // given:
        let (usecase, registry, pusher) = create_usecase();
        let (tx, mut rx) = mpsc::channel(8);
        let alice = connect(&registry, &pusher, "alice", tx).await;

        // when: the frame smuggles a timestamp
        usecase
            .execute(
                &alice,
                r#"{"type":"text","content":"hello","timestamp":1}"#,
            )
            .await
            .unwrap();

        // then: the broadcast carries the router's clock, not the client's
        match next_event(&mut rx).await {
            ServerEvent::Text { timestamp, .. } => assert_eq!(timestamp, NOW),
            other => panic!("unexpected event: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_image_url_is_broadcast_verbatim() {
        let (usecase, registry, pusher) = create_usecase();
        let (tx, mut rx) = mpsc::channel(8);
        let alice = connect(&registry, &pusher, "alice", tx).await;

        usecase
            .execute(&alice, r#"{"type":"image","content":"/uploads/cat.webp"}"#)
            .await
            .unwrap();

        assert_eq!(
            next_event(&mut rx).await,
            ServerEvent::Image {
                content: "/uploads/cat.webp".to_string(),
                username: "alice".to_string(),
                timestamp: NOW,
            }
        );
    }

    #[tokio::test]
    async fn test_unrecognized_kind_is_dropped_without_broadcast() {
        let (usecase, registry, pusher) = create_usecase();
        let (tx, mut rx) = mpsc::channel(8);
        let alice = connect(&registry, &pusher, "alice", tx).await;

        let result = usecase
            .execute(&alice, r#"{"type":"poke","content":"x"}"#)
            .await;

        assert!(matches!(result, Err(RouteMessageError::Malformed(_))));
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_non_json_frame_is_dropped_without_broadcast() {
        let (usecase, registry, pusher) = create_usecase();
        let (tx, mut rx) = mpsc::channel(8);
        let alice = connect(&registry, &pusher, "alice", tx).await;

        let result = usecase.execute(&alice, "just some text").await;

        assert!(matches!(result, Err(RouteMessageError::Malformed(_))));
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_empty_text_is_dropped_without_broadcast() {
        let (usecase, registry, pusher) = create_usecase();
        let (tx, mut rx) = mpsc::channel(8);
        let alice = connect(&registry, &pusher, "alice", tx).await;

        let result = usecase
            .execute(&alice, r#"{"type":"text","content":"  "}"#)
            .await;

        assert!(matches!(result, Err(RouteMessageError::Payload(_))));
        assert!(rx.try_recv().is_err());
    }
}
