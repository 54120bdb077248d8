//! Transcript types

/// Who wrote a message
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    User,
    Assistant,
}

/// One entry in the transcript
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    pub role: Role,
    pub content: String,
}

impl Message {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
        }
    }
}

/// Ordered messages of a session.
///
/// Append-only from the outside. Only the controller may rewrite the last
/// entry, and only while it is the in-progress assistant reply.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Transcript {
    messages: Vec<Message>,
}

impl Transcript {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    pub fn last(&self) -> Option<&Message> {
        self.messages.last()
    }

    pub(super) fn push(&mut self, message: Message) {
        self.messages.push(message);
    }

    /// Replace the content of the final assistant message.
    ///
    /// Returns false (and changes nothing) if the transcript does not end
    /// with an assistant message.
    pub(super) fn set_last_assistant(&mut self, content: &str) -> bool {
        match self.messages.last_mut() {
            Some(msg) if msg.role == Role::Assistant => {
                content.clone_into(&mut msg.content);
                true
            }
            _ => false,
        }
    }
}
