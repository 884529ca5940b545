//! Webhook event payload types.
//!
//! Deserializes the LINE webhook delivery format: a JSON object with an
//! `events` array. Only follow and message events carry behavior; every
//! other event type collapses into `Other` and is ignored.

use serde::Deserialize;

/// A webhook delivery: zero or more events.
#[derive(Debug, Default, Deserialize)]
pub struct WebhookPayload {
    /// Events in delivery order; absent array means zero events.
    #[serde(default)]
    pub events: Vec<WebhookEvent>,
}

/// A single webhook event, dispatched on its `type` field.
#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum WebhookEvent {
    /// A user added the bot as a friend.
    Follow {
        /// One-time token for replying to this event.
        #[serde(rename = "replyToken")]
        reply_token: String,
        /// Who followed.
        source: EventSource,
    },
    /// A user sent a message to the bot.
    Message {
        /// Who sent the message.
        source: EventSource,
        /// The message content.
        message: MessageContent,
    },
    /// Any other event type (unfollow, postback, join, ...).
    #[serde(other)]
    Other,
}

/// The sender of an event.
#[derive(Debug, Deserialize)]
pub struct EventSource {
    /// LINE user ID; absent for group/room sources.
    #[serde(rename = "userId")]
    pub user_id: Option<String>,
}

/// Message content; only text messages carry a body we log.
#[derive(Debug, Deserialize)]
pub struct MessageContent {
    /// Message kind: `text`, `sticker`, `image`, ...
    #[serde(rename = "type")]
    pub kind: String,
    /// Text body for `text` messages.
    #[serde(default)]
    pub text: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn follow_event_parses() {
        let payload: WebhookPayload = serde_json::from_str(
            r#"{
                "destination": "U_bot",
                "events": [{
                    "type": "follow",
                    "replyToken": "reply-token-1",
                    "source": { "type": "user", "userId": "U1234567890" },
                    "timestamp": 1772677800000,
                    "mode": "active"
                }]
            }"#,
        )
        .unwrap();

        assert_eq!(payload.events.len(), 1);
        match &payload.events[0] {
            WebhookEvent::Follow { reply_token, source } => {
                assert_eq!(reply_token, "reply-token-1");
                assert_eq!(source.user_id.as_deref(), Some("U1234567890"));
            },
            other => panic!("unexpected event: {other:?}"),
        }
    }

    #[test]
    fn text_message_event_parses() {
        let payload: WebhookPayload = serde_json::from_str(
            r#"{
                "events": [{
                    "type": "message",
                    "replyToken": "reply-token-2",
                    "source": { "type": "user", "userId": "U1" },
                    "message": { "type": "text", "id": "100001", "text": "hello" }
                }]
            }"#,
        )
        .unwrap();

        match &payload.events[0] {
            WebhookEvent::Message { source, message } => {
                assert_eq!(source.user_id.as_deref(), Some("U1"));
                assert_eq!(message.kind, "text");
                assert_eq!(message.text.as_deref(), Some("hello"));
            },
            other => panic!("unexpected event: {other:?}"),
        }
    }

    #[test]
    fn unknown_event_types_collapse_to_other() {
        let payload: WebhookPayload = serde_json::from_str(
            r#"{"events": [{"type": "unfollow", "source": {"type": "user", "userId": "U1"}}]}"#,
        )
        .unwrap();
        assert!(matches!(payload.events[0], WebhookEvent::Other));
    }

    #[test]
    fn missing_events_array_means_zero_events() {
        let payload: WebhookPayload = serde_json::from_str(r#"{"destination": "U_bot"}"#).unwrap();
        assert!(payload.events.is_empty());
    }
}
