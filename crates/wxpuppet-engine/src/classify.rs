//! Message classification and talker attribution.
//!
//! Native message codes map to message kinds by table lookup. Two
//! codes are ambiguous and need their embedded markup inspected; a
//! markup parse failure there degrades to plain text instead of
//! propagating, so a bad body never stalls the event loop.

use tracing::{info, warn};
use wxpuppet_codec::markup;
use wxpuppet_types::MessageType;

/// Native code for an inbound friend request.
pub const CODE_FRIEND_REQUEST: i64 = 37;

/// Native code for a system notice, join announcements included.
pub const CODE_SYSTEM_NOTICE: i64 = 10000;

/// Map a native message code to a message kind.
pub fn classify(code: i64, markup_body: Option<&str>) -> MessageType {
    match code {
        1 => classify_plain(markup_body),
        3 => MessageType::Image,
        CODE_FRIEND_REQUEST => MessageType::Unknown,
        43 => MessageType::Video,
        47 => MessageType::Emoticon,
        49 => classify_app_message(markup_body),
        CODE_SYSTEM_NOTICE => MessageType::GroupNote,
        other => {
            info!(code = other, "Unmapped message code");
            MessageType::Unknown
        }
    }
}

/// Code 1 is plain text unless the source markup carries an
/// at-user-list marker, which makes it a group note.
fn classify_plain(markup_body: Option<&str>) -> MessageType {
    let Some(body) = markup_body else {
        return MessageType::Text;
    };
    match markup::parse(body) {
        Ok(root) if root.child("atuserlist").is_some() => MessageType::GroupNote,
        _ => MessageType::Text,
    }
}

/// Code 49 is a container; the concrete kind sits in a nested `type`
/// field of the markup body.
fn classify_app_message(markup_body: Option<&str>) -> MessageType {
    let Some(body) = markup_body else {
        return MessageType::Text;
    };
    let Ok(root) = markup::parse(body) else {
        return MessageType::Text;
    };
    match root.text_at(&["appmsg", "type"]) {
        Some("5") => MessageType::Url,
        Some("33") => MessageType::MiniProgram,
        Some("6") => MessageType::Attachment,
        _ => MessageType::Text,
    }
}

/// Resolved sender, recipient and room of one raw message event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attribution {
    pub talker_id: String,
    pub to_id: String,
    /// Empty for direct chats.
    pub room_id: String,
}

/// Derive talker, recipient and room from the raw conversation id.
///
/// An id that does not split into exactly two parts on the room
/// delimiter names a direct chat: the sender is the talker and the
/// recipient is self. Otherwise the id names a room; the in-room
/// sender field wins when present, with the prefix before the
/// delimiter as fallback. Self-originated traffic swaps talker and
/// recipient. An underivable talker falls back to self with a warning
/// so downstream consumers always see a non-empty talker.
pub fn attribute(
    sender_or_room: &str,
    group_sender: Option<&str>,
    is_self: bool,
    self_id: &str,
) -> Attribution {
    let mut talker_id;
    let mut to_id = String::new();
    let mut room_id = String::new();

    if sender_or_room.split('@').count() != 2 {
        talker_id = sender_or_room.to_owned();
        to_id = self_id.to_owned();
    } else {
        talker_id = match group_sender {
            Some(sender) => sender.to_owned(),
            None => sender_or_room
                .split('@')
                .next()
                .unwrap_or_default()
                .to_owned(),
        };
        room_id = sender_or_room.to_owned();
    }

    if is_self {
        to_id = std::mem::take(&mut talker_id);
        talker_id = self_id.to_owned();
    }

    if talker_id.is_empty() {
        warn!(room = %room_id, "No talker id derivable, falling back to self");
        talker_id = self_id.to_owned();
    }

    Attribution {
        talker_id,
        to_id,
        room_id,
    }
}

/// Rewrite a friend-request text into a structured envelope carrying
/// the requester id and greeting.
pub fn friend_request_envelope(talker_id: &str, hello: &str) -> String {
    serde_json::json!({
        "type": "friend_request",
        "id": talker_id,
        "hello": hello,
    })
    .to_string()
}

/// True when the text contains characters outside the basic plane,
/// which the native side stores as utf8mb4.
pub fn has_supplementary_chars(text: &str) -> bool {
    text.chars().any(|c| c as u32 > 0xFFFF)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixed_codes_ignore_markup() {
        let junk = Some("<<< not markup");
        assert_eq!(classify(3, junk), MessageType::Image);
        assert_eq!(classify(43, junk), MessageType::Video);
        assert_eq!(classify(47, junk), MessageType::Emoticon);
        assert_eq!(classify(10000, junk), MessageType::GroupNote);
        assert_eq!(classify(3, None), MessageType::Image);
        assert_eq!(classify(43, None), MessageType::Video);
        assert_eq!(classify(47, None), MessageType::Emoticon);
        assert_eq!(classify(10000, None), MessageType::GroupNote);
    }

    #[test]
    fn test_plain_text_vs_group_note() {
        assert_eq!(classify(1, None), MessageType::Text);
        assert_eq!(
            classify(1, Some("<msgsource><atuserlist>wxid_a</atuserlist></msgsource>")),
            MessageType::GroupNote
        );
        assert_eq!(
            classify(1, Some("<msgsource><silence>1</silence></msgsource>")),
            MessageType::Text
        );
        assert_eq!(classify(1, Some("broken < markup")), MessageType::Text);
    }

    #[test]
    fn test_app_message_kinds() {
        let body = |kind: &str| format!("<msg><appmsg><type>{kind}</type></appmsg></msg>");
        assert_eq!(classify(49, Some(&body("5"))), MessageType::Url);
        assert_eq!(classify(49, Some(&body("33"))), MessageType::MiniProgram);
        assert_eq!(classify(49, Some(&body("6"))), MessageType::Attachment);
        assert_eq!(classify(49, Some(&body("2000"))), MessageType::Text);
        assert_eq!(classify(49, None), MessageType::Text);
        assert_eq!(classify(49, Some("broken < markup")), MessageType::Text);
    }

    #[test]
    fn test_friend_request_and_unmapped_codes() {
        assert_eq!(classify(CODE_FRIEND_REQUEST, None), MessageType::Unknown);
        assert_eq!(classify(1234, None), MessageType::Unknown);
    }

    #[test]
    fn test_attribute_direct_chat() {
        let attribution = attribute("wxid_abc", None, false, "wxid_self");
        assert_eq!(attribution.talker_id, "wxid_abc");
        assert_eq!(attribution.to_id, "wxid_self");
        assert_eq!(attribution.room_id, "");
    }

    #[test]
    fn test_attribute_room_chat() {
        let attribution = attribute("room123@chatroom", Some("wxid_abc"), false, "wxid_self");
        assert_eq!(attribution.talker_id, "wxid_abc");
        assert_eq!(attribution.room_id, "room123@chatroom");
    }

    #[test]
    fn test_attribute_room_prefix_fallback() {
        let attribution = attribute("room123@chatroom", None, false, "wxid_self");
        assert_eq!(attribution.talker_id, "room123");
        assert_eq!(attribution.room_id, "room123@chatroom");
    }

    #[test]
    fn test_attribute_self_swap() {
        let attribution = attribute("room123@chatroom", Some("wxid_abc"), true, "wxid_self");
        assert_eq!(attribution.talker_id, "wxid_self");
        assert_eq!(attribution.to_id, "wxid_abc");
        assert_eq!(attribution.room_id, "room123@chatroom");
    }

    #[test]
    fn test_attribute_fallback_to_self() {
        let attribution = attribute("@chatroom", None, false, "wxid_self");
        assert_eq!(attribution.talker_id, "wxid_self");
        assert_eq!(attribution.room_id, "@chatroom");
    }

    #[test]
    fn test_friend_request_envelope() {
        let envelope = friend_request_envelope("wxid_abc", "hi there");
        let value: serde_json::Value = serde_json::from_str(&envelope).unwrap();
        assert_eq!(value["type"], "friend_request");
        assert_eq!(value["id"], "wxid_abc");
        assert_eq!(value["hello"], "hi there");
    }

    #[test]
    fn test_supplementary_chars() {
        assert!(!has_supplementary_chars("hello 你好"));
        assert!(has_supplementary_chars("hello 😀"));
    }
}
