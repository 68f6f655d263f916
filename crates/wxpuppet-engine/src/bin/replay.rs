//! # replay
//!
//! Feed a recorded hook-callback script through the engine and print
//! the resulting event stream as JSON lines.
//!
//! Scripts are JSON lines of `{"method": "...", "args": [...]}`, one
//! callback per line; blank lines and `#` comments are skipped. The
//! sidecar side is scripted with fixture data, so a full login,
//! directory preload and message flow can be replayed without a hooked
//! process:
//!
//! ```text
//! replay demos/login-and-chat.jsonl
//! ```

use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use wxpuppet_engine::rpc::{RpcError, SidecarRpc};
use wxpuppet_engine::{spawn_engine, EngineConfig};

/// One line of a replay script.
#[derive(Debug, Deserialize)]
struct ScriptStep {
    method: String,
    #[serde(default)]
    args: Value,
}

/// Sidecar stand-in answering every call from fixture data.
struct ScriptedSidecar;

#[async_trait::async_trait]
impl SidecarRpc for ScriptedSidecar {
    async fn get_myself_info(&self) -> Result<String, RpcError> {
        Ok(json!({
            "id": "wxid_replay_self",
            "name": "Replay Operator",
            "head_img_url": "https://wx.qlogo.cn/self.png",
        })
        .to_string())
    }

    async fn get_contact_list(&self) -> Result<String, RpcError> {
        Ok(json!([
            {"id": "wxid_alice", "name": "Alice", "alias": "", "avatarUrl": "https://wx.qlogo.cn/a.png", "gender": 2},
            {"id": "wxid_bob", "name": "Bob", "gender": 1},
            {"id": "gh_daily", "name": "Daily Digest"},
            {"id": "team42@chatroom", "name": "Team 42"},
        ])
        .to_string())
    }

    async fn get_chatroom_member_info(&self) -> Result<String, RpcError> {
        Ok(json!([
            {
                "roomid": "team42@chatroom",
                "roomMember": ["wxid_replay_self", "wxid_alice", "wxid_bob", "wxid_carol"],
                "admin": "wxid_alice",
            },
        ])
        .to_string())
    }

    async fn get_chatroom_member_nick_info(
        &self,
        member_id: &str,
        _room_id: &str,
    ) -> Result<String, RpcError> {
        match member_id {
            "wxid_carol" => Ok("Carol".to_owned()),
            _ => Ok(String::new()),
        }
    }

    async fn modify_contact_remark(&self, contact_id: &str, remark: &str) -> Result<(), RpcError> {
        info!(contact = %contact_id, remark, "Scripted remark call");
        Ok(())
    }

    async fn send_text(&self, conversation_id: &str, text: &str) -> Result<(), RpcError> {
        info!(conversation = %conversation_id, text, "Scripted text send");
        Ok(())
    }

    async fn send_at_message(
        &self,
        room_id: &str,
        text: &str,
        contact_id: &str,
        nickname: &str,
    ) -> Result<(), RpcError> {
        info!(room = %room_id, text, contact = %contact_id, nickname, "Scripted at-message send");
        Ok(())
    }

    async fn send_image(&self, conversation_id: &str, path: &str) -> Result<(), RpcError> {
        info!(conversation = %conversation_id, path, "Scripted image send");
        Ok(())
    }

    async fn send_attachment(&self, conversation_id: &str, path: &str) -> Result<(), RpcError> {
        info!(conversation = %conversation_id, path, "Scripted attachment send");
        Ok(())
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // -----------------------------------------------------------------------
    // 1. Initialize tracing (respects RUST_LOG env var)
    // -----------------------------------------------------------------------
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info,wxpuppet_engine=debug")),
        )
        .with_writer(std::io::stderr)
        .init();

    info!("Starting hook replay v{}", env!("CARGO_PKG_VERSION"));

    // -----------------------------------------------------------------------
    // 2. Load the script
    // -----------------------------------------------------------------------
    let path = std::env::args()
        .nth(1)
        .context("usage: replay <script.jsonl>")?;
    let raw = std::fs::read_to_string(&path)
        .with_context(|| format!("failed to read script {path}"))?;

    let mut steps = Vec::new();
    for (number, line) in raw.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let step: ScriptStep = serde_json::from_str(line)
            .with_context(|| format!("bad script line {}", number + 1))?;
        steps.push(step);
    }
    info!(path = %path, steps = steps.len(), "Loaded replay script");

    // -----------------------------------------------------------------------
    // 3. Spawn the engine against the scripted sidecar
    // -----------------------------------------------------------------------
    let (handle, mut events) = spawn_engine(Arc::new(ScriptedSidecar), EngineConfig::default());

    // Print every emitted event as one JSON line on stdout
    let printer = tokio::spawn(async move {
        while let Some(event) = events.recv().await {
            match serde_json::to_string(&event) {
                Ok(line) => println!("{line}"),
                Err(err) => warn!(%err, "Unprintable event"),
            }
        }
    });

    // -----------------------------------------------------------------------
    // 4. Feed the script
    // -----------------------------------------------------------------------
    for step in steps {
        handle.push_hook(&step.method, step.args).await?;
        // brief pause so spawned enrichment lands between steps
        tokio::time::sleep(Duration::from_millis(50)).await;
    }

    // -----------------------------------------------------------------------
    // 5. Report the end state and shut down
    // -----------------------------------------------------------------------
    tokio::time::sleep(Duration::from_millis(500)).await;
    let phase = handle.phase().await?;
    let contacts = handle.contact_list().await?.len();
    let rooms = handle.room_list().await?.len();
    let messages = handle.message_count().await?;
    info!(?phase, contacts, rooms, messages, "Replay finished");

    handle.shutdown().await;
    printer.await?;
    Ok(())
}
