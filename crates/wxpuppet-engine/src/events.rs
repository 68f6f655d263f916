//! Outward event surface handed to the chat-automation layer.

use serde::Serialize;
use wxpuppet_types::{Contact, ContactKind, Message, ScanStatus};

/// Talker snapshot attached to every outward message.
///
/// Snapshotted at normalization time; later enrichment write-backs
/// show up on subsequent messages, not retroactively.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TalkerInfo {
    pub id: String,
    pub name: String,
    pub alias: String,
    pub avatar: String,
    pub kind: ContactKind,
    /// Empty for direct chats.
    pub room_id: String,
}

/// Fully normalized inbound message.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NormalizedMessage {
    pub message: Message,
    pub talker: TalkerInfo,
    /// The raw native code the message arrived with.
    pub code: i64,
    pub is_new_chat: bool,
    pub is_friend_request: bool,
    pub is_room_join: bool,
}

/// Events emitted to the chat-automation layer.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum PuppetEvent {
    Scan {
        qrcode: String,
        status: ScanStatus,
    },

    /// The in-process agent finished its own setup.
    Ready {
        /// Present only when a login already completed.
        contact: Option<Contact>,
    },

    Login {
        contact: Contact,
    },

    Logout {
        contact_id: String,
        reason: String,
    },

    Message {
        message_id: String,
        payload: NormalizedMessage,
    },

    RoomJoin {
        room_id: String,
        inviter_id: String,
        invitee_id_list: Vec<String>,
    },

    /// Liveness echo answering a ding.
    Dong {
        data: String,
    },

    Error {
        data: String,
    },
}
