//! Chat events delivered by the host and the context handlers respond through.

use std::fmt;

/// The kind of event a handler can subscribe to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    /// A message sent directly to the bot.
    PersonMessage,
    /// A message sent in a group the bot is a member of.
    GroupMessage,
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::PersonMessage => f.write_str("person_message"),
            Self::GroupMessage => f.write_str("group_message"),
        }
    }
}

/// An incoming chat message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessageEvent {
    /// The kind of message.
    pub kind: EventKind,
    /// The plain text content of the message.
    pub text: String,
    /// The identifier of the user who sent the message.
    pub sender_id: String,
    /// The identifier of the group the message was sent in, for group messages.
    pub group_id: Option<String>,
}

impl MessageEvent {
    /// Creates a message sent directly to the bot by `sender_id`.
    #[must_use]
    pub fn person(sender_id: impl ToString, text: impl Into<String>) -> Self {
        Self {
            kind: EventKind::PersonMessage,
            text: text.into(),
            sender_id: sender_id.to_string(),
            group_id: None,
        }
    }

    /// Creates a message sent by `sender_id` in the group `group_id`.
    #[must_use]
    pub fn group(group_id: impl ToString, sender_id: impl ToString, text: impl Into<String>) -> Self {
        Self {
            kind: EventKind::GroupMessage,
            text: text.into(),
            sender_id: sender_id.to_string(),
            group_id: Some(group_id.to_string()),
        }
    }
}

/// The context an event is dispatched with.
///
/// Handlers read the event from it, add replies to send back to the originating chat and may
/// prevent the default handling of the event, which also stops further handlers from running.
#[derive(Debug)]
pub struct EventContext {
    event: MessageEvent,
    replies: Vec<String>,
    default_prevented: bool,
}

impl EventContext {
    /// Creates a new context for the given `event`.
    #[must_use]
    pub const fn new(event: MessageEvent) -> Self {
        Self {
            event,
            replies: Vec::new(),
            default_prevented: false,
        }
    }

    /// Returns the event being handled.
    #[must_use]
    pub const fn event(&self) -> &MessageEvent {
        &self.event
    }

    /// Queues `text` to be sent as a reply to the originating chat.
    pub fn reply(&mut self, text: impl Into<String>) {
        self.replies.push(text.into());
    }

    /// Prevents the default handling of the event.
    pub const fn prevent_default(&mut self) {
        self.default_prevented = true;
    }

    /// Returns whether the default handling of the event was prevented.
    #[must_use]
    pub const fn is_default_prevented(&self) -> bool {
        self.default_prevented
    }

    /// Returns the queued replies.
    #[must_use]
    pub fn replies(&self) -> &[String] {
        &self.replies
    }

    /// Consumes the context and returns the queued replies.
    #[must_use]
    pub fn into_replies(self) -> Vec<String> {
        self.replies
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn person_and_group_messages_carry_string_ids() {
        let person = MessageEvent::person(42, "点赞");
        let group = MessageEvent::group(1001, 42, "点赞");

        assert_eq!(person.kind, EventKind::PersonMessage);
        assert_eq!(person.sender_id, "42");
        assert_eq!(person.group_id, None);
        assert_eq!(group.kind, EventKind::GroupMessage);
        assert_eq!(group.sender_id, "42");
        assert_eq!(group.group_id.as_deref(), Some("1001"));
    }
}
