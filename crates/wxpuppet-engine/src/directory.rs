//! In-memory contact and room directory.
//!
//! One directory exists per attached process, owned exclusively by the
//! engine task. Asynchronous enrichment results come back through the
//! engine and land here as last-write-wins updates.

use std::collections::hash_map::Entry;
use std::collections::HashMap;

use tracing::{debug, warn};
use wxpuppet_types::constants::{FALLBACK_NAME, ROOM_ID_MARK};
use wxpuppet_types::{Contact, ContactKind, Gender, Room};

use crate::rpc::{RawContact, RawRoom};

/// How a contact lookup was satisfied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResolveOutcome {
    /// Present with real directory data.
    Known,

    /// Present but still carrying placeholder data.
    Placeholder,

    /// Synthesized by this call.
    Created,
}

#[derive(Debug, Default)]
pub struct Directory {
    contacts: HashMap<String, Contact>,
    rooms: HashMap<String, Room>,
}

impl Directory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Look up a contact, synthesizing a placeholder when absent.
    ///
    /// Never blocks and never fails: callers needing a richer entry
    /// schedule enrichment separately and pick up the write-back on a
    /// later reference.
    pub fn resolve_contact(&mut self, id: &str) -> (&Contact, ResolveOutcome) {
        match self.contacts.entry(id.to_owned()) {
            Entry::Occupied(entry) => {
                let contact = entry.into_mut();
                let outcome = if contact.is_placeholder() {
                    ResolveOutcome::Placeholder
                } else {
                    ResolveOutcome::Known
                };
                (&*contact, outcome)
            }
            Entry::Vacant(entry) => {
                let contact = entry.insert(Contact::placeholder(id));
                (&*contact, ResolveOutcome::Created)
            }
        }
    }

    pub fn contact(&self, id: &str) -> Option<&Contact> {
        self.contacts.get(id)
    }

    pub fn room(&self, id: &str) -> Option<&Room> {
        self.rooms.get(id)
    }

    pub fn insert_contact(&mut self, contact: Contact) {
        self.contacts.insert(contact.id.clone(), contact);
    }

    /// Reverse lookup by display name. First match wins on ties.
    pub fn find_contact_by_name(&self, name: &str) -> Option<&Contact> {
        self.contacts.values().find(|c| c.name == name)
    }

    /// Apply an asynchronous name write-back. The update is dropped
    /// when the entry was evicted in the meantime.
    pub fn apply_contact_name(&mut self, contact_id: &str, name: &str) {
        match self.contacts.get_mut(contact_id) {
            Some(contact) => contact.name = name.to_owned(),
            None => debug!(contact = %contact_id, "Dropped name write-back for evicted entry"),
        }
    }

    /// Set the remark alias on a known contact.
    pub fn set_contact_alias(&mut self, contact_id: &str, alias: &str) -> bool {
        match self.contacts.get_mut(contact_id) {
            Some(contact) => {
                contact.alias = alias.to_owned();
                true
            }
            None => false,
        }
    }

    /// Overwrite-by-id from a contact table snapshot.
    pub fn apply_contacts(&mut self, rows: Vec<RawContact>) {
        for row in rows {
            let kind = ContactKind::from_id(&row.id);
            let contact = Contact {
                id: row.id,
                name: row
                    .name
                    .filter(|name| !name.is_empty())
                    .unwrap_or_else(|| FALLBACK_NAME.to_owned()),
                alias: row.alias.unwrap_or_default(),
                avatar: row.avatar_url.unwrap_or_default(),
                gender: row.gender.map(Gender::from_raw).unwrap_or_default(),
                kind,
                friend: true,
            };
            self.contacts.insert(contact.id.clone(), contact);
        }
    }

    /// Overwrite-by-id from a chatroom table snapshot.
    ///
    /// Rows without the room marker in their id are skipped. A contact
    /// entry sharing a room's id is evicted and donates its name as
    /// the topic. Members absent from the contact table get
    /// placeholder entries; the returned pairs are the members still
    /// placeholder-grade afterwards, for nickname enrichment.
    pub fn apply_rooms(&mut self, rows: Vec<RawRoom>) -> Vec<(String, String)> {
        let mut pending = Vec::new();
        for row in rows {
            if !row.room_id.contains(ROOM_ID_MARK) {
                continue;
            }
            let room_id = row.room_id;
            let member_id_list = row.members.unwrap_or_default();
            let admin_id = row.admin.unwrap_or_default();

            let mut topic = self
                .rooms
                .get(&room_id)
                .map(|room| room.topic.clone())
                .unwrap_or_default();
            if let Some(evicted) = self.contacts.remove(&room_id) {
                warn!(room = %room_id, "Evicted contact entry colliding with room");
                topic = evicted.name;
            }

            for member_id in &member_id_list {
                let member = self
                    .contacts
                    .entry(member_id.clone())
                    .or_insert_with(|| Contact {
                        friend: false,
                        ..Contact::placeholder(member_id)
                    });
                if member.is_placeholder() {
                    pending.push((member_id.clone(), room_id.clone()));
                }
            }

            let room = Room {
                id: room_id,
                topic,
                owner_id: admin_id.clone(),
                admin_id_list: if admin_id.is_empty() {
                    Vec::new()
                } else {
                    vec![admin_id]
                },
                member_id_list,
                avatar: String::new(),
                external: false,
            };
            self.rooms.insert(room.id.clone(), room);
        }
        pending
    }

    /// Make sure a room exists and lists the given members.
    ///
    /// Join inference knows membership only partially; a later room
    /// reload reconciles the full list.
    pub fn ensure_room_with_members(&mut self, room_id: &str, member_ids: &[String]) {
        let evicted_name = self.contacts.remove(room_id).map(|contact| {
            warn!(room = %room_id, "Evicted contact entry colliding with room");
            contact.name
        });
        let room = self
            .rooms
            .entry(room_id.to_owned())
            .or_insert_with(|| Room::placeholder(room_id));
        if let Some(name) = evicted_name {
            if room.topic.is_empty() {
                room.topic = name;
            }
        }
        for member_id in member_ids {
            if !room.member_id_list.contains(member_id) {
                room.member_id_list.push(member_id.clone());
            }
        }
    }

    /// All known contacts, ordered by id.
    pub fn contact_list(&self) -> Vec<Contact> {
        let mut list: Vec<Contact> = self.contacts.values().cloned().collect();
        list.sort_by(|a, b| a.id.cmp(&b.id));
        list
    }

    /// All known rooms, ordered by id.
    pub fn room_list(&self) -> Vec<Room> {
        let mut list: Vec<Room> = self.rooms.values().cloned().collect();
        list.sort_by(|a, b| a.id.cmp(&b.id));
        list
    }

    pub fn contact_count(&self) -> usize {
        self.contacts.len()
    }

    pub fn room_count(&self) -> usize {
        self.rooms.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn contact_rows() -> Vec<RawContact> {
        vec![
            RawContact {
                id: "wxid_abc".to_owned(),
                name: Some("Alice".to_owned()),
                alias: Some("al".to_owned()),
                avatar_url: Some("https://a/1.png".to_owned()),
                gender: Some(2),
            },
            RawContact {
                id: "gh_news".to_owned(),
                name: None,
                alias: None,
                avatar_url: None,
                gender: None,
            },
        ]
    }

    #[test]
    fn test_resolve_synthesizes_placeholder() {
        let mut directory = Directory::new();
        let (contact, outcome) = directory.resolve_contact("wxid_new");
        assert_eq!(outcome, ResolveOutcome::Created);
        assert_eq!(contact.name, "wxid_new");
        assert!(contact.friend);

        let (_, outcome) = directory.resolve_contact("wxid_new");
        assert_eq!(outcome, ResolveOutcome::Placeholder);
    }

    #[test]
    fn test_resolve_known_contact() {
        let mut directory = Directory::new();
        directory.apply_contacts(contact_rows());
        let (contact, outcome) = directory.resolve_contact("wxid_abc");
        assert_eq!(outcome, ResolveOutcome::Known);
        assert_eq!(contact.name, "Alice");
        assert_eq!(contact.gender, Gender::Female);
    }

    #[test]
    fn test_apply_contacts_fallback_name_and_kind() {
        let mut directory = Directory::new();
        directory.apply_contacts(contact_rows());
        let official = directory.contact("gh_news").unwrap();
        assert_eq!(official.name, FALLBACK_NAME);
        assert_eq!(official.kind, ContactKind::Official);
        assert!(official.friend);
    }

    #[test]
    fn test_room_discovery_evicts_contact() {
        let mut directory = Directory::new();
        directory.insert_contact(Contact {
            name: "Test Group".to_owned(),
            ..Contact::placeholder("room123@chatroom")
        });

        directory.apply_rooms(vec![RawRoom {
            room_id: "room123@chatroom".to_owned(),
            members: Some(vec!["wxid_a".to_owned()]),
            admin: Some("wxid_a".to_owned()),
        }]);

        assert!(directory.contact("room123@chatroom").is_none());
        let room = directory.room("room123@chatroom").unwrap();
        assert_eq!(room.topic, "Test Group");
        assert_eq!(room.owner_id, "wxid_a");
        assert_eq!(room.admin_id_list, vec!["wxid_a".to_owned()]);
    }

    #[test]
    fn test_apply_rooms_skips_non_room_ids() {
        let mut directory = Directory::new();
        directory.apply_rooms(vec![RawRoom {
            room_id: "wxid_abc".to_owned(),
            members: None,
            admin: None,
        }]);
        assert_eq!(directory.room_count(), 0);
    }

    #[test]
    fn test_apply_rooms_reports_placeholder_members() {
        let mut directory = Directory::new();
        directory.apply_contacts(contact_rows());
        let pending = directory.apply_rooms(vec![RawRoom {
            room_id: "room123@chatroom".to_owned(),
            members: Some(vec!["wxid_abc".to_owned(), "wxid_bob".to_owned()]),
            admin: None,
        }]);

        // Alice already has directory data, only the stranger is pending
        assert_eq!(
            pending,
            vec![("wxid_bob".to_owned(), "room123@chatroom".to_owned())]
        );
        let member = directory.contact("wxid_bob").unwrap();
        assert!(!member.friend);
        assert!(member.is_placeholder());
    }

    #[test]
    fn test_apply_rooms_preserves_topic_on_reload() {
        let mut directory = Directory::new();
        directory.insert_contact(Contact {
            name: "Test Group".to_owned(),
            ..Contact::placeholder("room123@chatroom")
        });
        let row = || RawRoom {
            room_id: "room123@chatroom".to_owned(),
            members: None,
            admin: None,
        };
        directory.apply_rooms(vec![row()]);
        directory.apply_rooms(vec![row()]);
        assert_eq!(directory.room("room123@chatroom").unwrap().topic, "Test Group");
    }

    #[test]
    fn test_ensure_room_merges_members() {
        let mut directory = Directory::new();
        directory.ensure_room_with_members("room123@chatroom", &["wxid_a".to_owned()]);
        directory.ensure_room_with_members(
            "room123@chatroom",
            &["wxid_a".to_owned(), "wxid_b".to_owned()],
        );
        let room = directory.room("room123@chatroom").unwrap();
        assert_eq!(
            room.member_id_list,
            vec!["wxid_a".to_owned(), "wxid_b".to_owned()]
        );
    }

    #[test]
    fn test_find_contact_by_name() {
        let mut directory = Directory::new();
        directory.apply_contacts(contact_rows());
        assert_eq!(
            directory.find_contact_by_name("Alice").map(|c| c.id.as_str()),
            Some("wxid_abc")
        );
        assert!(directory.find_contact_by_name("Nobody").is_none());
    }

    #[test]
    fn test_ephemeral_contact_found_by_its_name() {
        let mut directory = Directory::new();
        directory.insert_contact(Contact::ephemeral("查理"));

        // name-keyed, so the same display name resolves to the same
        // entry instead of synthesizing another
        let found = directory.find_contact_by_name("查理").unwrap();
        assert_eq!(found.id, "查理");
        assert_eq!(directory.contact_count(), 1);
    }

    #[test]
    fn test_set_contact_alias() {
        let mut directory = Directory::new();
        directory.apply_contacts(contact_rows());
        assert!(directory.set_contact_alias("wxid_abc", "teammate"));
        assert_eq!(directory.contact("wxid_abc").unwrap().alias, "teammate");
        assert!(!directory.set_contact_alias("wxid_missing", "x"));
    }

    #[test]
    fn test_name_write_back_for_evicted_entry() {
        let mut directory = Directory::new();
        directory.apply_contact_name("wxid_gone", "Late");
        assert!(directory.contact("wxid_gone").is_none());

        directory.apply_contacts(contact_rows());
        directory.apply_contact_name("wxid_abc", "Alicia");
        assert_eq!(directory.contact("wxid_abc").unwrap().name, "Alicia");
    }
}
