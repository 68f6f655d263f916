use serde::{Deserialize, Serialize};

/// A chatroom entry in the directory.
///
/// Rooms only come from a directory load or from join inference; a
/// message referencing an unknown room never synthesizes one, because
/// the member list cannot be guessed.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Room {
    pub id: String,
    pub topic: String,
    pub owner_id: String,
    pub admin_id_list: Vec<String>,
    pub member_id_list: Vec<String>,
    pub avatar: String,
    pub external: bool,
}

impl Room {
    /// Minimal entry for a room first observed through a join notice.
    /// Membership stays partial until the next directory load.
    pub fn placeholder(id: &str) -> Self {
        Self {
            id: id.to_string(),
            topic: String::new(),
            owner_id: String::new(),
            admin_id_list: Vec::new(),
            member_id_list: Vec::new(),
            avatar: String::new(),
            external: false,
        }
    }
}
