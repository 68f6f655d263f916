//! Append-only id-keyed message store.

use std::collections::HashMap;

use wxpuppet_types::Message;

/// Messages kept for later retrieval, media fetch included. Entries
/// live for the process lifetime; eviction is a collaborator concern.
#[derive(Debug, Default)]
pub struct MessageStore {
    messages: HashMap<String, Message>,
}

impl MessageStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert one message. First write wins, entries are immutable.
    pub fn insert(&mut self, message: Message) {
        self.messages.entry(message.id.clone()).or_insert(message);
    }

    pub fn get(&self, id: &str) -> Option<&Message> {
        self.messages.get(id)
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }
}
