//! LINE webhook handler.
//!
//! Verifies the delivery signature against the channel secret, then walks
//! the event list: follow events get a two-message reply telling the new
//! follower their LINE user ID, text messages are logged, everything else
//! is ignored. The endpoint acknowledges with 200 once processing
//! completes, even when individual replies failed.

use axum::{
    extract::State,
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use bytes::Bytes;
use rollcall_line::{
    events::{WebhookEvent, WebhookPayload},
    signature, TextMessage,
};
use serde::Serialize;
use tracing::{debug, info, instrument, warn};

use crate::AppState;

/// Header carrying the base64 HMAC-SHA256 digest of the raw body.
pub const SIGNATURE_HEADER: &str = "x-line-signature";

/// Rejection body for failed signature verification.
#[derive(Debug, Serialize)]
struct SignatureRejection {
    error: &'static str,
}

/// Acknowledgement body sent after event processing.
#[derive(Debug, Serialize)]
struct WebhookAck {
    success: bool,
}

/// Webhook endpoint handler.
#[instrument(name = "webhook", skip(state, headers, body))]
pub async fn webhook(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    let provided = headers
        .get(SIGNATURE_HEADER)
        .and_then(|value| value.to_str().ok())
        .unwrap_or_default();

    // Both a missing channel secret and a missing header must fail closed.
    let verified = state
        .config
        .line_channel_secret
        .as_deref()
        .is_some_and(|secret| signature::verify_signature(secret, &body, provided));

    if !verified {
        warn!("webhook signature verification failed");
        return (StatusCode::FORBIDDEN, Json(SignatureRejection { error: "Invalid signature" }))
            .into_response();
    }

    let payload: WebhookPayload = match serde_json::from_slice(&body) {
        Ok(payload) => payload,
        Err(e) => {
            // Signed but unparseable: acknowledge with zero events rather
            // than invite the platform to redeliver.
            warn!(error = %e, "webhook body is not a valid event payload");
            WebhookPayload::default()
        },
    };

    debug!(event_count = payload.events.len(), "processing webhook events");

    for event in payload.events {
        match event {
            WebhookEvent::Follow { reply_token, source } => {
                handle_follow(&state, &reply_token, source.user_id.as_deref()).await;
            },
            WebhookEvent::Message { source, message } => {
                info!(
                    user_id = source.user_id.as_deref().unwrap_or("unknown"),
                    kind = %message.kind,
                    text = message.text.as_deref().unwrap_or_default(),
                    "received message event"
                );
            },
            WebhookEvent::Other => {
                debug!("ignoring unhandled event type");
            },
        }
    }

    (StatusCode::OK, Json(WebhookAck { success: true })).into_response()
}

/// Replies to a new follower with their LINE user ID.
///
/// Two messages: the welcome text embedding the raw user ID for staff
/// onboarding, then a short explanation of what happens next. Reply
/// failures are logged and never surface.
async fn handle_follow(state: &AppState, reply_token: &str, user_id: Option<&str>) {
    let Some(user_id) = user_id else {
        warn!("follow event without a user ID");
        return;
    };

    info!(user_id, "new follower, sending onboarding reply");

    let messages = [
        TextMessage::new(format!(
            "歡迎加入育名補習班！\n\n您的 LINE ID 是：\n{user_id}\n\n請將此 ID 提供給教務老師，以便設定簽到通知。"
        )),
        TextMessage::new("設定完成後，孩子簽到時您將自動收到簽到通知。"),
    ];

    if let Err(e) = state.line.reply(reply_token, &messages).await {
        warn!(error = %e, "failed to reply to follow event");
    }
}
