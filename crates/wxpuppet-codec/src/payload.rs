//! Structured payload extraction from message markup.
//!
//! Only a handful of message kinds carry a rich payload worth
//! decoding. Everything else resolves to [`RichPayload::Empty`]
//! without touching the parser.

use wxpuppet_types::{
    LocationPayload, MessageType, MiniProgramPayload, RichPayload, UrlLinkPayload,
};

use crate::markup::{self, MarkupNode, ParseError};

/// Decode the rich payload carried by a message body, if any.
pub fn decode(body: &str, kind: MessageType) -> Result<RichPayload, ParseError> {
    match kind {
        MessageType::Location => Ok(RichPayload::Location(decode_location(&markup::parse(
            body,
        )?))),
        MessageType::MiniProgram => Ok(RichPayload::MiniProgram(decode_mini_program(
            &markup::parse(body)?,
        ))),
        MessageType::Url => Ok(RichPayload::UrlLink(decode_url_link(&markup::parse(body)?))),
        MessageType::Contact => {
            let root = markup::parse(body)?;
            Ok(RichPayload::ContactCard {
                username: root.attr("username").unwrap_or_default().to_owned(),
            })
        }
        _ => Ok(RichPayload::Empty),
    }
}

fn decode_location(root: &MarkupNode) -> LocationPayload {
    let attr = |name: &str| {
        root.child("location")
            .and_then(|n| n.attr(name))
            .unwrap_or_default()
            .to_owned()
    };
    let coord = |name: &str| attr(name).parse::<f64>().unwrap_or_default();
    LocationPayload {
        latitude: coord("x"),
        longitude: coord("y"),
        accuracy: coord("scale"),
        address: attr("label"),
        name: attr("poiname"),
    }
}

fn decode_mini_program(root: &MarkupNode) -> MiniProgramPayload {
    let text = |path: &[&str]| root.text_at(path).unwrap_or_default().to_owned();
    MiniProgramPayload {
        app_id: text(&["appmsg", "weappinfo", "appid"]),
        title: text(&["appmsg", "title"]),
        description: text(&["appmsg", "des"]),
        page_path: text(&["appmsg", "weappinfo", "pagepath"]),
        icon_url: text(&["appmsg", "weappinfo", "weappiconurl"]),
        share_id: text(&["appmsg", "weappinfo", "shareId"]),
        thumb_key: text(&["appmsg", "appattach", "cdnthumbaeskey"]),
        thumb_url: text(&["appmsg", "appattach", "cdnthumburl"]),
        username: text(&["appmsg", "weappinfo", "username"]),
    }
}

fn decode_url_link(root: &MarkupNode) -> UrlLinkPayload {
    let text = |path: &[&str]| root.text_at(path).unwrap_or_default().to_owned();
    UrlLinkPayload {
        title: text(&["appmsg", "title"]),
        description: text(&["appmsg", "des"]),
        url: text(&["appmsg", "url"]),
        thumbnail_url: text(&["appmsg", "appattach", "cdnthumburl"]),
    }
}
