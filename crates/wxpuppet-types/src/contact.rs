use serde::{Deserialize, Serialize};

use crate::constants::{ENTERPRISE_ID_MARK, OFFICIAL_ACCOUNT_MARK};

/// Gender as reported by the native contact table.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub enum Gender {
    #[default]
    Unknown,
    Male,
    Female,
}

impl Gender {
    /// Map the native numeric gender field; anything out of range is `Unknown`.
    pub fn from_raw(raw: i64) -> Self {
        match raw {
            1 => Self::Male,
            2 => Self::Female,
            _ => Self::Unknown,
        }
    }
}

/// Account classification, derived from the shape of the identifier.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub enum ContactKind {
    #[default]
    Individual,
    Official,
    Corporation,
}

impl ContactKind {
    /// Classify an identifier the way the native table encodes it:
    /// official accounts carry `gh_`, enterprise contacts `@openim`.
    pub fn from_id(id: &str) -> Self {
        if id.contains(OFFICIAL_ACCOUNT_MARK) {
            Self::Official
        } else if id.contains(ENTERPRISE_ID_MARK) {
            Self::Corporation
        } else {
            Self::Individual
        }
    }
}

/// A contact entry in the directory.
///
/// Entries are created the first time an identifier is referenced and
/// enriched in place as data arrives; `name == id` marks an entry that
/// still awaits enrichment.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Contact {
    pub id: String,
    pub name: String,
    pub alias: String,
    pub avatar: String,
    pub gender: Gender,
    pub kind: ContactKind,
    pub friend: bool,
}

impl Contact {
    /// Minimal entry for an identifier seen before any directory data.
    pub fn placeholder(id: &str) -> Self {
        Self {
            id: id.to_string(),
            name: id.to_string(),
            alias: String::new(),
            avatar: String::new(),
            gender: Gender::Unknown,
            kind: ContactKind::Individual,
            friend: true,
        }
    }

    /// Entry for a display name that never resolved to an identifier,
    /// keyed by the name itself.
    pub fn ephemeral(display_name: &str) -> Self {
        Self {
            friend: false,
            ..Self::placeholder(display_name)
        }
    }

    /// Whether this entry still carries only its identifier as a name.
    pub fn is_placeholder(&self) -> bool {
        self.name == self.id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_from_id() {
        assert_eq!(ContactKind::from_id("wxid_abc"), ContactKind::Individual);
        assert_eq!(ContactKind::from_id("gh_news123"), ContactKind::Official);
        assert_eq!(ContactKind::from_id("abc@openim"), ContactKind::Corporation);
    }

    #[test]
    fn test_gender_from_raw() {
        assert_eq!(Gender::from_raw(0), Gender::Unknown);
        assert_eq!(Gender::from_raw(1), Gender::Male);
        assert_eq!(Gender::from_raw(2), Gender::Female);
        assert_eq!(Gender::from_raw(99), Gender::Unknown);
    }

    #[test]
    fn test_placeholder_contact() {
        let contact = Contact::placeholder("wxid_abc");
        assert!(contact.is_placeholder());
        assert!(contact.friend);
        assert_eq!(contact.name, "wxid_abc");
    }

    #[test]
    fn test_ephemeral_contact() {
        let contact = Contact::ephemeral("张三");
        assert_eq!(contact.id, "张三");
        assert!(!contact.friend);
    }
}
