use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Who authored a message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sender {
    User,
    Bot,
}

/// A single turn in a chat log
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessage<C> {
    pub id: Uuid,
    pub sender: Sender,
    pub content: C,
    pub timestamp: DateTime<Utc>,
    /// Set on bot messages that announce an event rather than answer a query
    #[serde(default)]
    pub notice: bool,
}

impl<C> ChatMessage<C> {
    fn new(sender: Sender, content: C, notice: bool) -> Self {
        Self {
            id: Uuid::new_v4(),
            sender,
            content,
            timestamp: Utc::now(),
            notice,
        }
    }
}

/// Append-only, insertion-ordered chat history.
///
/// Messages cannot be removed or edited once appended.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageLog<C> {
    messages: Vec<ChatMessage<C>>,
}

impl<C> MessageLog<C> {
    pub fn new() -> Self {
        Self {
            messages: Vec::new(),
        }
    }

    /// Append a user turn
    pub fn append_user(&mut self, content: impl Into<C>) -> &ChatMessage<C> {
        self.push(ChatMessage::new(Sender::User, content.into(), false))
    }

    /// Append a bot reply
    pub fn append_bot(&mut self, content: impl Into<C>) -> &ChatMessage<C> {
        self.push(ChatMessage::new(Sender::Bot, content.into(), false))
    }

    /// Append an unprompted bot announcement
    pub fn append_notice(&mut self, content: impl Into<C>) -> &ChatMessage<C> {
        self.push(ChatMessage::new(Sender::Bot, content.into(), true))
    }

    fn push(&mut self, message: ChatMessage<C>) -> &ChatMessage<C> {
        self.messages.push(message);
        &self.messages[self.messages.len() - 1]
    }

    pub fn messages(&self) -> &[ChatMessage<C>] {
        &self.messages
    }

    /// The last `n` messages, oldest first
    pub fn last_messages(&self, n: usize) -> &[ChatMessage<C>] {
        let start = self.messages.len().saturating_sub(n);
        &self.messages[start..]
    }

    pub fn last(&self) -> Option<&ChatMessage<C>> {
        self.messages.last()
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }
}

impl<C> Default for MessageLog<C> {
    fn default() -> Self {
        Self::new()
    }
}
