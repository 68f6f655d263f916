//! Decoding of hook callbacks arriving from the injected agent.
//!
//! The agent reports everything as `{method, args}` with loosely typed
//! positional args. Decoding normalizes each callback into a closed
//! event enum at the boundary, so the rest of the engine never touches
//! raw JSON.

use serde::Deserialize;
use serde_json::Value;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum HookError {
    #[error("Unknown hook method: {0}")]
    UnknownMethod(String),

    #[error("Bad args for {method}: {reason}")]
    BadArgs { method: String, reason: String },
}

/// A hook callback as it comes off the wire.
#[derive(Debug, Clone, Deserialize)]
pub struct RawHook {
    pub method: String,
    #[serde(default)]
    pub args: Value,
}

/// A decoded hook callback.
#[derive(Debug, Clone, PartialEq)]
pub enum HookEvent {
    Scan(ScanEvent),
    Login,
    Logout { by_server: bool },
    AgentReady,
    Message(RawMessageEvent),
}

/// Positional args of a `checkQRLogin` callback.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ScanEvent {
    pub status: i64,
    pub qrcode_url: String,
    pub wxid: String,
    pub avatar_url: String,
    pub nickname: String,
    pub phone_type: String,
    pub phone_client_ver: i64,
    pub pair_wait_tip: String,
}

/// Positional args of a `recvMsg` callback.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawMessageEvent {
    pub code: i64,
    /// Direct sender id, or the room id for group traffic.
    pub sender_or_room: String,
    pub text: String,
    /// In-room sender id, present only for some group traffic.
    pub group_sender: Option<String>,
    /// Embedded markup body, when the code carries one.
    pub markup: Option<String>,
    pub is_self: bool,
}

impl HookEvent {
    /// Decode one callback by method name.
    pub fn decode(method: &str, args: &Value) -> Result<Self, HookError> {
        match method {
            "checkQRLogin" => Ok(HookEvent::Scan(ScanEvent {
                status: arg_i64(args, 0),
                qrcode_url: arg_str(args, 1).unwrap_or_default(),
                wxid: arg_str(args, 2).unwrap_or_default(),
                avatar_url: arg_str(args, 3).unwrap_or_default(),
                nickname: arg_str(args, 4).unwrap_or_default(),
                phone_type: arg_str(args, 5).unwrap_or_default(),
                phone_client_ver: arg_i64(args, 6),
                pair_wait_tip: arg_str(args, 7).unwrap_or_default(),
            })),
            "loginEvent" => Ok(HookEvent::Login),
            "logoutEvent" => Ok(HookEvent::Logout {
                by_server: arg_i64(args, 0) != 0,
            }),
            "agentReady" => Ok(HookEvent::AgentReady),
            "recvMsg" => {
                let sender_or_room = arg_str(args, 1)
                    .filter(|s| !s.is_empty())
                    .ok_or_else(|| HookError::BadArgs {
                        method: method.to_owned(),
                        reason: "missing conversation id".to_owned(),
                    })?;
                Ok(HookEvent::Message(RawMessageEvent {
                    code: arg_i64(args, 0),
                    sender_or_room,
                    text: arg_str(args, 2).unwrap_or_default(),
                    group_sender: arg_opt_str(args, 3),
                    markup: arg_opt_str(args, 4),
                    is_self: arg_i64(args, 5) != 0,
                }))
            }
            other => Err(HookError::UnknownMethod(other.to_owned())),
        }
    }
}

fn arg_i64(args: &Value, index: usize) -> i64 {
    match args.get(index) {
        Some(Value::Number(n)) => n.as_i64().unwrap_or(0),
        Some(Value::String(s)) => s.parse().unwrap_or(0),
        Some(Value::Bool(b)) => *b as i64,
        _ => 0,
    }
}

fn arg_str(args: &Value, index: usize) -> Option<String> {
    match args.get(index)? {
        Value::String(s) => Some(s.clone()),
        Value::Null => None,
        other => Some(other.to_string()),
    }
}

/// Like [`arg_str`], but an empty string counts as absent.
fn arg_opt_str(args: &Value, index: usize) -> Option<String> {
    arg_str(args, index).filter(|s| !s.is_empty())
}
