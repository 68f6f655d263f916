//! Typed boundary to the injected sidecar agent.
//!
//! Every call the engine issues into the hooked process goes through
//! [`SidecarRpc`]. Bulk queries come back as raw JSON strings; the
//! native side types them loosely, so every row field past the id is
//! optional and the parse helpers here normalize them.

use async_trait::async_trait;
use serde::Deserialize;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum RpcError {
    #[error("Sidecar call failed: {0}")]
    Call(String),

    #[error("Malformed sidecar reply: {0}")]
    Malformed(#[from] serde_json::Error),
}

/// Outbound calls into the hooked native process.
#[async_trait]
pub trait SidecarRpc: Send + Sync {
    /// Profile of the logged-in account, as JSON.
    async fn get_myself_info(&self) -> Result<String, RpcError>;

    /// Full contact table, as a JSON array.
    async fn get_contact_list(&self) -> Result<String, RpcError>;

    /// Full chatroom table with membership, as a JSON array.
    async fn get_chatroom_member_info(&self) -> Result<String, RpcError>;

    /// Display nickname of one member within one room.
    async fn get_chatroom_member_nick_info(
        &self,
        member_id: &str,
        room_id: &str,
    ) -> Result<String, RpcError>;

    async fn modify_contact_remark(&self, contact_id: &str, remark: &str) -> Result<(), RpcError>;

    async fn send_text(&self, conversation_id: &str, text: &str) -> Result<(), RpcError>;

    async fn send_at_message(
        &self,
        room_id: &str,
        text: &str,
        contact_id: &str,
        nickname: &str,
    ) -> Result<(), RpcError>;

    async fn send_image(&self, conversation_id: &str, path: &str) -> Result<(), RpcError>;

    async fn send_attachment(&self, conversation_id: &str, path: &str) -> Result<(), RpcError>;
}

/// One contact row as the sidecar reports it.
#[derive(Debug, Clone, Deserialize)]
pub struct RawContact {
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub alias: Option<String>,
    #[serde(default, rename = "avatarUrl")]
    pub avatar_url: Option<String>,
    #[serde(default)]
    pub gender: Option<i64>,
}

/// One chatroom row as the sidecar reports it.
#[derive(Debug, Clone, Deserialize)]
pub struct RawRoom {
    #[serde(rename = "roomid")]
    pub room_id: String,
    #[serde(default, rename = "roomMember")]
    pub members: Option<Vec<String>>,
    #[serde(default)]
    pub admin: Option<String>,
}

/// Profile of the logged-in account as the sidecar reports it.
#[derive(Debug, Clone, Deserialize)]
pub struct RawSelfInfo {
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default, rename = "head_img_url")]
    pub avatar: Option<String>,
}

pub fn parse_contact_list(raw: &str) -> Result<Vec<RawContact>, RpcError> {
    Ok(serde_json::from_str(raw)?)
}

pub fn parse_room_list(raw: &str) -> Result<Vec<RawRoom>, RpcError> {
    Ok(serde_json::from_str(raw)?)
}

pub fn parse_self_info(raw: &str) -> Result<RawSelfInfo, RpcError> {
    Ok(serde_json::from_str(raw)?)
}
