//! Join inference over system-notice text.
//!
//! Group joins arrive as natural-language notices, not structured
//! events. Two shapes are recognized, each gated by its own fixed
//! marker pair, with quoted display names extracted afterwards:
//!
//! 1. `"<inviter>"邀请"<invitee>"加入了群聊`
//! 2. `"<invitee>"通过扫描"<inviter>"分享的二维码加入群聊`
//!
//! The quoted roles are reversed between the two shapes. Text matching
//! neither shape is not a join notice.

/// Literal marker standing in for the account's own name.
const SELF_MARK: &str = "你";

const INVITE_MARK: &str = "邀请";
const JOIN_MARK: &str = "加入了群聊";
const SCAN_MARK: &str = "通过扫描";
const QR_JOIN_MARK: &str = "分享的二维码加入群聊";

/// Notices quote names either straight or with fullwidth quotes.
const QUOTE_PAIRS: [(char, char); 2] = [('"', '"'), ('“', '”')];

/// A participant as the notice text names them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NameRef {
    /// The notice used the self marker.
    SelfRef,

    /// A quoted display name, to be resolved against the directory.
    Display(String),
}

/// Participants extracted from one join notice.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JoinNotice {
    pub inviter: NameRef,
    pub invitees: Vec<NameRef>,
}

/// Recognize a join notice, trying the scan shape before the invite
/// shape since its markers are the more specific.
pub fn parse_join_notice(text: &str) -> Option<JoinNotice> {
    parse_scan_join(text).or_else(|| parse_invite_join(text))
}

fn parse_scan_join(text: &str) -> Option<JoinNotice> {
    let (invitee_part, rest) = text.split_once(SCAN_MARK)?;
    let (inviter_part, _) = rest.split_once(QR_JOIN_MARK)?;
    let invitees = name_refs(invitee_part);
    if invitees.is_empty() {
        return None;
    }
    let inviter = name_ref(inviter_part).unwrap_or(NameRef::SelfRef);
    Some(JoinNotice { inviter, invitees })
}

fn parse_invite_join(text: &str) -> Option<JoinNotice> {
    let (inviter_part, rest) = text.split_once(INVITE_MARK)?;
    let (invitee_part, _) = rest.split_once(JOIN_MARK)?;
    let invitees = name_refs(invitee_part);
    if invitees.is_empty() {
        return None;
    }
    let inviter = name_ref(inviter_part).unwrap_or(NameRef::SelfRef);
    Some(JoinNotice { inviter, invitees })
}

/// All names referenced by one notice segment.
fn name_refs(segment: &str) -> Vec<NameRef> {
    let segment = segment.trim();
    if segment == SELF_MARK {
        return vec![NameRef::SelfRef];
    }
    let mut refs = Vec::new();
    let mut rest = segment;
    while let Some((name, tail)) = next_quoted(rest) {
        if !name.is_empty() {
            refs.push(NameRef::Display(name));
        }
        rest = tail;
    }
    refs
}

fn name_ref(segment: &str) -> Option<NameRef> {
    name_refs(segment).into_iter().next()
}

/// The earliest quoted run in the segment, with the remainder after
/// its closing quote.
fn next_quoted(segment: &str) -> Option<(String, &str)> {
    let (open_idx, open, close) = QUOTE_PAIRS
        .iter()
        .filter_map(|&(open, close)| segment.find(open).map(|idx| (idx, open, close)))
        .min_by_key(|&(idx, _, _)| idx)?;
    let after_open = &segment[open_idx + open.len_utf8()..];
    let (name, rest) = after_open.split_once(close)?;
    Some((name.to_owned(), rest))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn display(name: &str) -> NameRef {
        NameRef::Display(name.to_owned())
    }

    #[test]
    fn test_invite_shape() {
        let notice = parse_join_notice(r#""A"邀请"B"加入了群聊"#).unwrap();
        assert_eq!(notice.inviter, display("A"));
        assert_eq!(notice.invitees, vec![display("B")]);
    }

    #[test]
    fn test_invite_shape_fullwidth_quotes() {
        let notice = parse_join_notice("“阿强”邀请“小美”加入了群聊").unwrap();
        assert_eq!(notice.inviter, display("阿强"));
        assert_eq!(notice.invitees, vec![display("小美")]);
    }

    #[test]
    fn test_invite_by_self() {
        let notice = parse_join_notice(r#"你邀请"B"加入了群聊"#).unwrap();
        assert_eq!(notice.inviter, NameRef::SelfRef);
        assert_eq!(notice.invitees, vec![display("B")]);
    }

    #[test]
    fn test_invite_of_self() {
        let notice = parse_join_notice(r#""A"邀请你加入了群聊"#).unwrap();
        assert_eq!(notice.inviter, display("A"));
        assert_eq!(notice.invitees, vec![NameRef::SelfRef]);
    }

    #[test]
    fn test_invite_missing_inviter_defaults_to_self() {
        let notice = parse_join_notice(r#"邀请"B"加入了群聊"#).unwrap();
        assert_eq!(notice.inviter, NameRef::SelfRef);
    }

    #[test]
    fn test_invite_multiple_invitees() {
        let notice = parse_join_notice(r#""A"邀请"B"、"C"加入了群聊"#).unwrap();
        assert_eq!(notice.invitees, vec![display("B"), display("C")]);
    }

    #[test]
    fn test_scan_shape_reverses_roles() {
        let notice = parse_join_notice(r#""B"通过扫描"A"分享的二维码加入群聊"#).unwrap();
        assert_eq!(notice.inviter, display("A"));
        assert_eq!(notice.invitees, vec![display("B")]);
    }

    #[test]
    fn test_scan_shape_self_invitee() {
        let notice = parse_join_notice(r#"你通过扫描"A"分享的二维码加入群聊"#).unwrap();
        assert_eq!(notice.inviter, display("A"));
        assert_eq!(notice.invitees, vec![NameRef::SelfRef]);
    }

    #[test]
    fn test_unrelated_notices_do_not_match() {
        assert!(parse_join_notice(r#""A"修改群名为"B""#).is_none());
        assert!(parse_join_notice("你撤回了一条消息").is_none());
        assert!(parse_join_notice("").is_none());
    }

    #[test]
    fn test_markers_without_extractable_names() {
        assert!(parse_join_notice("某人邀请某人加入了群聊").is_none());
    }
}
