use std::collections::HashSet;

use crate::entities::{ChatMessage, MessageId};

/// Messages of the active room in arrival order, at most one per identifier
#[derive(Debug, Clone, Default)]
pub struct Transcript {
    messages: Vec<ChatMessage>,
    seen: HashSet<MessageId>,
}

impl Transcript {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a message unless its identifier is already present.
    ///
    /// Returns `true` when the message was appended.
    pub fn push(&mut self, message: ChatMessage) -> bool {
        if !self.seen.insert(message.id) {
            return false;
        }
        self.messages.push(message);
        true
    }

    pub fn contains(&self, id: MessageId) -> bool {
        self.seen.contains(&id)
    }

    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    pub fn iter(&self) -> impl Iterator<Item = &ChatMessage> {
        self.messages.iter()
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    pub fn clear(&mut self) {
        self.messages.clear();
        self.seen.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::MessageAuthor;

    fn message(id: i64, content: &str) -> ChatMessage {
        ChatMessage {
            id: MessageId(id),
            user: MessageAuthor {
                id: 1,
                full_name: "A".into(),
            },
            content: content.into(),
            created_at: "2026-01-01T00:00:00Z".into(),
        }
    }

    #[test]
    fn test_duplicates_are_dropped_and_first_copy_kept() {
        let mut transcript = Transcript::new();
        assert!(transcript.push(message(1, "original")));
        assert!(!transcript.push(message(1, "redelivered")));

        assert_eq!(transcript.len(), 1);
        assert_eq!(transcript.messages()[0].content, "original");
    }

    #[test]
    fn test_arrival_order_is_preserved_regardless_of_ids() {
        let mut transcript = Transcript::new();
        for id in [5, 2, 9, 1, 7] {
            transcript.push(message(id, "x"));
        }

        let ids: Vec<i64> = transcript.iter().map(|m| m.id.0).collect();
        assert_eq!(ids, vec![5, 2, 9, 1, 7]);
    }

    #[test]
    fn test_each_identifier_appears_at_most_once_for_repeated_sequences() {
        let arrivals = [3, 1, 3, 2, 1, 1, 4, 2, 3, 5, 5];
        let mut transcript = Transcript::new();
        for id in arrivals {
            transcript.push(message(id, "x"));
        }

        let ids: Vec<i64> = transcript.iter().map(|m| m.id.0).collect();
        assert_eq!(ids, vec![3, 1, 2, 4, 5]);
        assert!(transcript.contains(MessageId(4)));
        assert!(!transcript.contains(MessageId(6)));
    }

    #[test]
    fn test_clear_forgets_identifiers() {
        let mut transcript = Transcript::new();
        transcript.push(message(1, "x"));
        transcript.clear();

        assert!(transcript.is_empty());
        assert!(transcript.push(message(1, "x")));
    }
}
