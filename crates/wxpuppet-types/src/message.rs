use serde::{Deserialize, Serialize};

/// Classified message kinds. The set is closed: raw codes that do not
/// map onto it stay `Unknown` rather than growing new variants.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum MessageType {
    #[default]
    Unknown,
    Attachment,
    Audio,
    Contact,
    ChatHistory,
    Emoticon,
    Image,
    Text,
    Location,
    MiniProgram,
    GroupNote,
    Transfer,
    RedEnvelope,
    Recalled,
    Url,
    Video,
    Post,
}

/// A single normalized message. Immutable once stored.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Message {
    /// Generated id, collision-resistant but not ordered.
    pub id: String,
    pub kind: MessageType,
    pub talker_id: String,
    pub to_id: String,
    /// Empty for direct chats.
    pub room_id: String,
    pub text: String,
    /// Unix epoch milliseconds at normalization time.
    pub timestamp: u64,
}
