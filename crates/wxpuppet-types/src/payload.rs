//! Rich-content payloads decoded from message markup bodies.
//!
//! Every struct derives `Serialize` so consumers can forward payloads
//! without reshaping them.

use serde::{Deserialize, Serialize};

/// Structured payload extracted from a message's markup body.
///
/// Kinds without extractable structure decode to `Empty`; no field is
/// ever invented for them.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub enum RichPayload {
    Location(LocationPayload),
    MiniProgram(MiniProgramPayload),
    UrlLink(UrlLinkPayload),
    /// A shared contact card: the card's account identifier.
    ContactCard { username: String },
    Empty,
}

/// A shared geographic location.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct LocationPayload {
    pub latitude: f64,
    pub longitude: f64,
    /// Map zoom level the sender shared at.
    pub accuracy: f64,
    pub address: String,
    pub name: String,
}

/// A shared mini-program card.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct MiniProgramPayload {
    pub app_id: String,
    pub title: String,
    pub description: String,
    pub page_path: String,
    pub icon_url: String,
    pub share_id: String,
    pub thumb_key: String,
    pub thumb_url: String,
    pub username: String,
}

/// A shared link card.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct UrlLinkPayload {
    pub title: String,
    pub description: String,
    pub url: String,
    pub thumbnail_url: String,
}
