//! Per-thread chat rules.

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::error::DomainError;
use crate::models::carpool::CarpoolThread;
use crate::models::message::CarpoolMessage;
use shared::validation::{validate_max_chars, validate_not_blank};

/// Builds a new message for `thread`. Only participants may post; content
/// is trimmed and must be non-empty and at most `max_length` characters.
pub fn compose(
    thread: &CarpoolThread,
    user_id: Uuid,
    content: &str,
    max_length: usize,
    now: DateTime<Utc>,
) -> Result<CarpoolMessage, DomainError> {
    if !thread.is_participant(user_id) {
        return Err(DomainError::Forbidden(
            "Only participants can post in this carpool".to_string(),
        ));
    }

    let content = content.trim();
    validate_not_blank(content, "content").map_err(|e| DomainError::from_field("content", e))?;
    validate_max_chars(content, max_length, "content")
        .map_err(|e| DomainError::from_field("content", e))?;

    Ok(CarpoolMessage {
        id: Uuid::new_v4(),
        carpool_id: thread.id,
        user_id,
        content: content.to_string(),
        created_at: now,
    })
}

/// Orders messages oldest first; ties keep their stored order.
pub fn sort_chronologically(mut messages: Vec<CarpoolMessage>) -> Vec<CarpoolMessage> {
    messages.sort_by_key(|message| message.created_at);
    messages
}
