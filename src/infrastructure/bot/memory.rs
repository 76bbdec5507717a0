//! Conversation memory - Rolling window of oracle exchanges
//!
//! Carried as chat history into the next request so the oracle keeps
//! short-term context. Capped, and cleared at every game boundary.

use crate::infrastructure::services::ChatMessage;

/// Maximum retained messages (each exchange adds two)
pub const MAX_MESSAGES: usize = 20;

#[derive(Debug, Default)]
pub struct ConversationMemory {
    messages: Vec<ChatMessage>,
}

impl ConversationMemory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one successful (prompt, reply) exchange.
    ///
    /// Failed calls record nothing; there is no reply worth replaying.
    pub fn record_exchange(&mut self, prompt: &str, reply: &str) {
        self.messages.push(ChatMessage::user(prompt));
        self.messages.push(ChatMessage::assistant(reply));
        self.prune();
    }

    /// Prior exchanges, oldest first
    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    /// Drop everything; called at game boundaries
    pub fn clear(&mut self) {
        self.messages.clear();
    }

    fn prune(&mut self) {
        if self.messages.len() > MAX_MESSAGES {
            let excess = self.messages.len() - MAX_MESSAGES;
            self.messages.drain(..excess);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exchange_records_both_roles() {
        let mut memory = ConversationMemory::new();
        memory.record_exchange("prompt", "reply");

        assert_eq!(memory.len(), 2);
        assert_eq!(memory.messages()[0].role, "user");
        assert_eq!(memory.messages()[0].content, "prompt");
        assert_eq!(memory.messages()[1].role, "assistant");
        assert_eq!(memory.messages()[1].content, "reply");
    }

    #[test]
    fn test_cap_drops_oldest() {
        let mut memory = ConversationMemory::new();
        for i in 0..15 {
            memory.record_exchange(&format!("prompt-{}", i), &format!("reply-{}", i));
        }

        assert_eq!(memory.len(), MAX_MESSAGES);
        // 15 exchanges = 30 messages; the first 10 fell off.
        assert_eq!(memory.messages()[0].content, "prompt-5");
        assert_eq!(memory.messages()[19].content, "reply-14");
    }

    #[test]
    fn test_clear_empties_the_window() {
        let mut memory = ConversationMemory::new();
        memory.record_exchange("prompt", "reply");
        memory.clear();
        assert!(memory.is_empty());
    }
}
