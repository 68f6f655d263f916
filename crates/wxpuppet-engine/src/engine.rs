//! Engine orchestration with tokio mpsc command/event channels.
//!
//! The engine runs in a dedicated tokio task that exclusively owns the
//! directory, the message store and the session tracker. Hook
//! callbacks, commands and enrichment write-backs all funnel through
//! that task, so state needs no locks; spawned work talks back through
//! an internal channel instead of sharing the caches.

use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use thiserror::Error;
use tokio::sync::{mpsc, oneshot};
use tracing::{debug, error, info, warn};
use uuid::Uuid;

use wxpuppet_codec::payload;
use wxpuppet_types::{Contact, Message, RichPayload, Room, ScanStatus, SessionPhase};

use crate::classify::{self, CODE_FRIEND_REQUEST, CODE_SYSTEM_NOTICE};
use crate::directory::{Directory, ResolveOutcome};
use crate::events::{NormalizedMessage, PuppetEvent, TalkerInfo};
use crate::hook::{HookError, HookEvent, RawHook, RawMessageEvent, ScanEvent};
use crate::join::{self, NameRef};
use crate::rpc::{self, RpcError, SidecarRpc};
use crate::session::SessionTracker;
use crate::store::MessageStore;

// ---------------------------------------------------------------------------
// Command / error types
// ---------------------------------------------------------------------------

/// Commands sent *into* the engine task.
#[derive(Debug)]
pub enum EngineCommand {
    /// Liveness probe, answered with a delayed dong event.
    Ding(String),
    /// Fetch a stored message by id.
    GetMessage {
        id: String,
        reply: oneshot::Sender<Option<Message>>,
    },
    /// Fetch a contact snapshot by id.
    GetContact {
        id: String,
        reply: oneshot::Sender<Option<Contact>>,
    },
    /// Fetch a room snapshot by id.
    GetRoom {
        id: String,
        reply: oneshot::Sender<Option<Room>>,
    },
    /// Snapshot of the whole contact table.
    ContactList(oneshot::Sender<Vec<Contact>>),
    /// Snapshot of the whole room table.
    RoomList(oneshot::Sender<Vec<Room>>),
    /// Member ids of one room.
    RoomMembers {
        id: String,
        reply: oneshot::Sender<Option<Vec<String>>>,
    },
    /// Profile of the logged-in account.
    SelfContact(oneshot::Sender<Option<Contact>>),
    /// Current session phase.
    Phase(oneshot::Sender<SessionPhase>),
    /// Number of stored messages.
    MessageCount(oneshot::Sender<usize>),
    /// Send text, routed as an at-message when mentioning in a room.
    SendText {
        conversation_id: String,
        text: String,
        mentions: Vec<String>,
        reply: oneshot::Sender<Result<(), RpcError>>,
    },
    /// Send a file, routed by extension.
    SendFile {
        conversation_id: String,
        path: String,
        reply: oneshot::Sender<Result<(), RpcError>>,
    },
    /// Set a contact's remark alias, native side first.
    SetContactAlias {
        contact_id: String,
        alias: String,
        reply: oneshot::Sender<Result<(), RpcError>>,
    },
    /// Gracefully shut down the engine.
    Shutdown,
}

/// Write-backs from spawned work onto the engine task.
#[derive(Debug)]
enum EngineInternal {
    ContactName { contact_id: String, name: String },
    RoomsLoaded { raw: String },
    AliasApplied { contact_id: String, alias: String },
}

#[derive(Error, Debug)]
pub enum EngineError {
    #[error("Engine channel closed")]
    ChannelClosed,

    #[error("Unknown message id: {0}")]
    UnknownMessage(String),

    #[error("Sidecar RPC failed: {0}")]
    Rpc(#[from] RpcError),

    #[error("Payload decode failed: {0}")]
    Decode(#[from] wxpuppet_codec::ParseError),
}

/// Engine tuning.
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// Delay before a ding is answered with a dong.
    pub dong_delay: Duration,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            dong_delay: Duration::from_secs(1),
        }
    }
}

// ---------------------------------------------------------------------------
// Spawn + handle
// ---------------------------------------------------------------------------

/// Cloneable handle to a running engine.
#[derive(Clone)]
pub struct EngineHandle {
    hook_tx: mpsc::Sender<RawHook>,
    cmd_tx: mpsc::Sender<EngineCommand>,
}

/// Spawn the engine task for one attached target process.
///
/// # Arguments
///
/// * `rpc` - Outbound call surface of the injected sidecar
/// * `config` - Engine tuning
///
/// # Returns
///
/// `(handle, event_rx)` where the handle feeds hook callbacks and
/// commands in, and `event_rx` carries the outward event stream.
pub fn spawn_engine(
    rpc: Arc<dyn SidecarRpc>,
    config: EngineConfig,
) -> (EngineHandle, mpsc::Receiver<PuppetEvent>) {
    let (hook_tx, mut hook_rx) = mpsc::channel::<RawHook>(256);
    let (cmd_tx, mut cmd_rx) = mpsc::channel::<EngineCommand>(256);
    let (event_tx, event_rx) = mpsc::channel::<PuppetEvent>(256);
    let (internal_tx, mut internal_rx) = mpsc::channel::<EngineInternal>(256);

    let mut engine = SessionEngine {
        rpc,
        config,
        directory: Directory::new(),
        store: MessageStore::new(),
        session: SessionTracker::new(),
        event_tx,
        internal_tx,
    };
    engine.session.attach();

    tokio::spawn(async move {
        loop {
            tokio::select! {
                // --- Hook callbacks from the agent ---
                hook = hook_rx.recv() => {
                    match hook {
                        Some(raw) => engine.handle_hook(raw).await,
                        None => {
                            info!("Hook channel closed, stopping engine");
                            break;
                        }
                    }
                }

                // --- Incoming commands ---
                command = cmd_rx.recv() => {
                    match command {
                        Some(EngineCommand::Shutdown) => {
                            info!("Engine shutdown requested");
                            break;
                        }
                        Some(command) => engine.handle_command(command).await,
                        None => {
                            info!("Command channel closed, stopping engine");
                            break;
                        }
                    }
                }

                // --- Write-backs from spawned work ---
                Some(internal) = internal_rx.recv() => {
                    engine.handle_internal(internal);
                }
            }
        }

        info!("Engine event loop terminated");
    });

    (EngineHandle { hook_tx, cmd_tx }, event_rx)
}

impl EngineHandle {
    /// Feed one raw hook callback into the engine.
    pub async fn push_hook(
        &self,
        method: &str,
        args: serde_json::Value,
    ) -> Result<(), EngineError> {
        self.hook_tx
            .send(RawHook {
                method: method.to_owned(),
                args,
            })
            .await
            .map_err(|_| EngineError::ChannelClosed)
    }

    pub async fn ding(&self, data: &str) -> Result<(), EngineError> {
        self.cmd_tx
            .send(EngineCommand::Ding(data.to_owned()))
            .await
            .map_err(|_| EngineError::ChannelClosed)
    }

    pub async fn message(&self, id: &str) -> Result<Option<Message>, EngineError> {
        self.query(|reply| EngineCommand::GetMessage {
            id: id.to_owned(),
            reply,
        })
        .await
    }

    pub async fn contact(&self, id: &str) -> Result<Option<Contact>, EngineError> {
        self.query(|reply| EngineCommand::GetContact {
            id: id.to_owned(),
            reply,
        })
        .await
    }

    pub async fn room(&self, id: &str) -> Result<Option<Room>, EngineError> {
        self.query(|reply| EngineCommand::GetRoom {
            id: id.to_owned(),
            reply,
        })
        .await
    }

    pub async fn contact_list(&self) -> Result<Vec<Contact>, EngineError> {
        self.query(EngineCommand::ContactList).await
    }

    pub async fn room_list(&self) -> Result<Vec<Room>, EngineError> {
        self.query(EngineCommand::RoomList).await
    }

    pub async fn room_members(&self, id: &str) -> Result<Option<Vec<String>>, EngineError> {
        self.query(|reply| EngineCommand::RoomMembers {
            id: id.to_owned(),
            reply,
        })
        .await
    }

    pub async fn self_contact(&self) -> Result<Option<Contact>, EngineError> {
        self.query(EngineCommand::SelfContact).await
    }

    pub async fn phase(&self) -> Result<SessionPhase, EngineError> {
        self.query(EngineCommand::Phase).await
    }

    pub async fn message_count(&self) -> Result<usize, EngineError> {
        self.query(EngineCommand::MessageCount).await
    }

    /// Send text into a conversation. A non-empty first mention turns
    /// a room send into an at-message.
    pub async fn send_text(
        &self,
        conversation_id: &str,
        text: &str,
        mentions: Vec<String>,
    ) -> Result<(), EngineError> {
        self.query(|reply| EngineCommand::SendText {
            conversation_id: conversation_id.to_owned(),
            text: text.to_owned(),
            mentions,
            reply,
        })
        .await??;
        Ok(())
    }

    /// Send a local file into a conversation, routed by extension.
    pub async fn send_file(&self, conversation_id: &str, path: &str) -> Result<(), EngineError> {
        self.query(|reply| EngineCommand::SendFile {
            conversation_id: conversation_id.to_owned(),
            path: path.to_owned(),
            reply,
        })
        .await??;
        Ok(())
    }

    /// Set a contact's remark alias, native side first.
    pub async fn set_contact_alias(
        &self,
        contact_id: &str,
        alias: &str,
    ) -> Result<(), EngineError> {
        self.query(|reply| EngineCommand::SetContactAlias {
            contact_id: contact_id.to_owned(),
            alias: alias.to_owned(),
            reply,
        })
        .await??;
        Ok(())
    }

    /// Decode the rich payload of a stored message.
    pub async fn message_rich_payload(&self, id: &str) -> Result<RichPayload, EngineError> {
        let message = self
            .message(id)
            .await?
            .ok_or_else(|| EngineError::UnknownMessage(id.to_owned()))?;
        Ok(payload::decode(&message.text, message.kind)?)
    }

    pub async fn shutdown(&self) {
        let _ = self.cmd_tx.send(EngineCommand::Shutdown).await;
    }

    async fn query<T>(
        &self,
        build: impl FnOnce(oneshot::Sender<T>) -> EngineCommand,
    ) -> Result<T, EngineError> {
        let (tx, rx) = oneshot::channel();
        self.cmd_tx
            .send(build(tx))
            .await
            .map_err(|_| EngineError::ChannelClosed)?;
        rx.await.map_err(|_| EngineError::ChannelClosed)
    }
}

// ---------------------------------------------------------------------------
// Engine task
// ---------------------------------------------------------------------------

struct SessionEngine {
    rpc: Arc<dyn SidecarRpc>,
    config: EngineConfig,
    directory: Directory,
    store: MessageStore,
    session: SessionTracker,
    event_tx: mpsc::Sender<PuppetEvent>,
    internal_tx: mpsc::Sender<EngineInternal>,
}

impl SessionEngine {
    async fn emit(&self, event: PuppetEvent) {
        let _ = self.event_tx.send(event).await;
    }

    async fn handle_hook(&mut self, raw: RawHook) {
        let event = match HookEvent::decode(&raw.method, &raw.args) {
            Ok(event) => event,
            Err(HookError::UnknownMethod(method)) => {
                warn!(%method, "Unhandled hook method");
                return;
            }
            Err(err) => {
                warn!(method = %raw.method, %err, "Dropped malformed hook callback");
                self.emit(PuppetEvent::Error {
                    data: err.to_string(),
                })
                .await;
                return;
            }
        };

        match event {
            HookEvent::Scan(scan) => self.handle_scan(scan).await,
            HookEvent::Login => self.handle_login().await,
            HookEvent::Logout { by_server } => self.handle_logout(by_server).await,
            HookEvent::AgentReady => self.handle_agent_ready().await,
            HookEvent::Message(message) => self.handle_message(message).await,
        }
    }

    async fn handle_scan(&mut self, scan: ScanEvent) {
        if !scan.pair_wait_tip.is_empty() {
            warn!(tip = %scan.pair_wait_tip, "Pairing wait tip reported");
        }
        let status = ScanStatus::from_raw(scan.status);
        self.session.on_scan(status);
        self.emit(PuppetEvent::Scan {
            qrcode: scan.qrcode_url,
            status,
        })
        .await;
    }

    async fn handle_login(&mut self) {
        if self.session.is_logged_in() {
            info!("Login event while already logged in, ignoring");
            return;
        }
        match self.preload_directory().await {
            Ok(self_contact) => {
                info!(contact = %self_contact.id, "Logged in");
                self.session.complete_login(self_contact.clone());
                self.emit(PuppetEvent::Login {
                    contact: self_contact,
                })
                .await;
            }
            Err(err) => {
                error!(%err, "Directory preload failed");
                self.emit(PuppetEvent::Error {
                    data: err.to_string(),
                })
                .await;
            }
        }
    }

    /// Fetch the account profile, then the contact and room tables, in
    /// that order. Awaited so attribution starts from a populated
    /// directory; member nickname enrichment is scheduled instead.
    async fn preload_directory(&mut self) -> Result<Contact, EngineError> {
        let raw = self.rpc.get_myself_info().await?;
        let info = rpc::parse_self_info(&raw)?;
        let mut self_contact = Contact::placeholder(&info.id);
        self_contact.friend = false;
        if let Some(name) = info.name.filter(|name| !name.is_empty()) {
            self_contact.name = name;
        }
        self_contact.avatar = info.avatar.unwrap_or_default();
        self.directory.insert_contact(self_contact.clone());

        let raw = self.rpc.get_contact_list().await?;
        let rows = rpc::parse_contact_list(&raw)?;
        info!(count = rows.len(), "Loaded contact table");
        self.directory.apply_contacts(rows);

        let raw = self.rpc.get_chatroom_member_info().await?;
        let rows = rpc::parse_room_list(&raw)?;
        info!(count = rows.len(), "Loaded room table");
        let pending = self.directory.apply_rooms(rows);
        for (member_id, room_id) in pending {
            self.spawn_nick_enrichment(member_id, room_id);
        }

        Ok(self_contact)
    }

    async fn handle_logout(&mut self, by_server: bool) {
        if !self.session.is_logged_in() {
            warn!("Logout event while not logged in");
            return;
        }
        let reason = if by_server { "Kicked by server" } else { "logout" };
        let contact_id = self.session.self_id().unwrap_or_default().to_owned();
        self.session.logout();
        info!(contact = %contact_id, reason, "Logged out");
        self.emit(PuppetEvent::Logout {
            contact_id,
            reason: reason.to_owned(),
        })
        .await;
    }

    async fn handle_agent_ready(&mut self) {
        if !self.session.mark_agent_ready() {
            return;
        }
        info!(phase = ?self.session.phase(), "Agent ready");
        self.emit(PuppetEvent::Ready {
            contact: self.session.self_contact().cloned(),
        })
        .await;
    }

    async fn handle_message(&mut self, raw: RawMessageEvent) {
        let kind = classify::classify(raw.code, raw.markup.as_deref());
        let self_id = self.session.self_id().unwrap_or_default().to_owned();
        let attribution = classify::attribute(
            &raw.sender_or_room,
            raw.group_sender.as_deref(),
            raw.is_self,
            &self_id,
        );

        let mut text = raw.text.clone();
        if raw.code == CODE_FRIEND_REQUEST {
            text = classify::friend_request_envelope(&attribution.talker_id, &raw.text);
        }
        if classify::has_supplementary_chars(&text) {
            debug!("Message text carries supplementary-plane characters");
        }

        let (contact, outcome) = self.directory.resolve_contact(&attribution.talker_id);
        let talker = TalkerInfo {
            id: contact.id.clone(),
            name: contact.name.clone(),
            alias: contact.alias.clone(),
            avatar: contact.avatar.clone(),
            kind: contact.kind,
            room_id: attribution.room_id.clone(),
        };
        if outcome != ResolveOutcome::Known && !attribution.room_id.is_empty() {
            self.spawn_nick_enrichment(attribution.talker_id.clone(), attribution.room_id.clone());
        }

        let is_new_chat = if attribution.room_id.is_empty() {
            outcome == ResolveOutcome::Created
        } else {
            self.directory.room(&attribution.room_id).is_none()
        };

        let message = Message {
            id: Uuid::new_v4().to_string(),
            kind,
            talker_id: attribution.talker_id,
            to_id: attribution.to_id,
            room_id: attribution.room_id,
            text,
            timestamp: Utc::now().timestamp_millis() as u64,
        };
        let message_id = message.id.clone();
        let room_id = message.room_id.clone();
        self.store.insert(message.clone());

        if self.session.can_emit() {
            info!(
                message = %message_id,
                talker = %talker.id,
                room = %room_id,
                kind = ?kind,
                "Message normalized"
            );
            self.emit(PuppetEvent::Message {
                message_id,
                payload: NormalizedMessage {
                    message,
                    talker,
                    code: raw.code,
                    is_new_chat,
                    is_friend_request: raw.code == CODE_FRIEND_REQUEST,
                    is_room_join: raw.code == CODE_SYSTEM_NOTICE,
                },
            })
            .await;
        } else {
            debug!(
                message = %message_id,
                phase = ?self.session.phase(),
                "Stored message without emission"
            );
        }

        if raw.code == CODE_SYSTEM_NOTICE && !room_id.is_empty() && self.session.is_logged_in() {
            self.handle_system_notice(&raw.text, &room_id).await;
        }
    }

    /// Infer membership changes from a system notice. Text matching
    /// neither join shape is informational only.
    async fn handle_system_notice(&mut self, text: &str, room_id: &str) {
        let Some(notice) = join::parse_join_notice(text) else {
            debug!(room = %room_id, "System notice without join shape");
            return;
        };

        let inviter_id = self.resolve_name_ref(&notice.inviter);
        let invitee_id_list: Vec<String> = notice
            .invitees
            .iter()
            .map(|invitee| self.resolve_name_ref(invitee))
            .collect();

        self.directory
            .ensure_room_with_members(room_id, &invitee_id_list);

        info!(
            room = %room_id,
            inviter = %inviter_id,
            invitees = ?invitee_id_list,
            "Inferred room join"
        );
        self.emit(PuppetEvent::RoomJoin {
            room_id: room_id.to_owned(),
            inviter_id,
            invitee_id_list,
        })
        .await;

        self.spawn_room_reload(room_id.to_owned());
    }

    /// Resolve a notice name to a directory id, synthesizing an
    /// ephemeral contact when the name matches nothing.
    fn resolve_name_ref(&mut self, name: &NameRef) -> String {
        match name {
            NameRef::SelfRef => self.session.self_id().unwrap_or_default().to_owned(),
            NameRef::Display(display_name) => {
                if let Some(contact) = self.directory.find_contact_by_name(display_name) {
                    return contact.id.clone();
                }
                let contact = Contact::ephemeral(display_name);
                let id = contact.id.clone();
                self.directory.insert_contact(contact);
                info!(name = %display_name, "Synthesized ephemeral contact for join notice");
                id
            }
        }
    }

    async fn handle_command(&mut self, command: EngineCommand) {
        match command {
            EngineCommand::Ding(data) => {
                let event_tx = self.event_tx.clone();
                let delay = self.config.dong_delay;
                tokio::spawn(async move {
                    tokio::time::sleep(delay).await;
                    let _ = event_tx.send(PuppetEvent::Dong { data }).await;
                });
            }
            EngineCommand::GetMessage { id, reply } => {
                let _ = reply.send(self.store.get(&id).cloned());
            }
            EngineCommand::GetContact { id, reply } => {
                let _ = reply.send(self.directory.contact(&id).cloned());
            }
            EngineCommand::GetRoom { id, reply } => {
                let _ = reply.send(self.directory.room(&id).cloned());
            }
            EngineCommand::ContactList(reply) => {
                let _ = reply.send(self.directory.contact_list());
            }
            EngineCommand::RoomList(reply) => {
                let _ = reply.send(self.directory.room_list());
            }
            EngineCommand::RoomMembers { id, reply } => {
                let _ = reply.send(
                    self.directory
                        .room(&id)
                        .map(|room| room.member_id_list.clone()),
                );
            }
            EngineCommand::SelfContact(reply) => {
                let _ = reply.send(self.session.self_contact().cloned());
            }
            EngineCommand::Phase(reply) => {
                let _ = reply.send(self.session.phase());
            }
            EngineCommand::MessageCount(reply) => {
                let _ = reply.send(self.store.len());
            }
            EngineCommand::SendText {
                conversation_id,
                text,
                mentions,
                reply,
            } => {
                self.send_text(conversation_id, text, mentions, reply);
            }
            EngineCommand::SendFile {
                conversation_id,
                path,
                reply,
            } => {
                let rpc = Arc::clone(&self.rpc);
                tokio::spawn(async move {
                    let result = if is_image_path(&path) {
                        rpc.send_image(&conversation_id, &path).await
                    } else {
                        rpc.send_attachment(&conversation_id, &path).await
                    };
                    if let Err(err) = &result {
                        warn!(conversation = %conversation_id, %err, "File send failed");
                    }
                    let _ = reply.send(result);
                });
            }
            EngineCommand::SetContactAlias {
                contact_id,
                alias,
                reply,
            } => {
                let rpc = Arc::clone(&self.rpc);
                let internal_tx = self.internal_tx.clone();
                tokio::spawn(async move {
                    let result = rpc.modify_contact_remark(&contact_id, &alias).await;
                    if result.is_ok() {
                        let _ = internal_tx
                            .send(EngineInternal::AliasApplied { contact_id, alias })
                            .await;
                    }
                    let _ = reply.send(result);
                });
            }
            // breaks the event loop before reaching here
            EngineCommand::Shutdown => {}
        }
    }

    /// Plan the route on the engine task, then issue the RPC off it so
    /// a slow sidecar cannot stall the loop.
    fn send_text(
        &self,
        conversation_id: String,
        text: String,
        mentions: Vec<String>,
        reply: oneshot::Sender<Result<(), RpcError>>,
    ) {
        if classify::has_supplementary_chars(&text) {
            debug!("Outbound text carries supplementary-plane characters");
        }
        let mention = mentions.first().filter(|m| !m.is_empty()).cloned();
        let route = match mention {
            Some(contact_id) if conversation_id.split('@').count() == 2 => {
                let nickname = self
                    .directory
                    .contact(&contact_id)
                    .map(|c| c.name.clone())
                    .unwrap_or_else(|| contact_id.clone());
                Some((contact_id, nickname))
            }
            _ => None,
        };
        let rpc = Arc::clone(&self.rpc);
        tokio::spawn(async move {
            let result = match route {
                Some((contact_id, nickname)) => {
                    rpc.send_at_message(&conversation_id, &text, &contact_id, &nickname)
                        .await
                }
                None => rpc.send_text(&conversation_id, &text).await,
            };
            if let Err(err) = &result {
                warn!(conversation = %conversation_id, %err, "Text send failed");
            }
            let _ = reply.send(result);
        });
    }

    /// Fire-and-forget nickname lookup; the result lands back on the
    /// engine task as a write-back.
    fn spawn_nick_enrichment(&self, contact_id: String, room_id: String) {
        let rpc = Arc::clone(&self.rpc);
        let internal_tx = self.internal_tx.clone();
        tokio::spawn(async move {
            match rpc
                .get_chatroom_member_nick_info(&contact_id, &room_id)
                .await
            {
                Ok(nickname) => {
                    let nickname = nickname.trim().to_owned();
                    if nickname.is_empty() {
                        debug!(contact = %contact_id, "Empty nickname reply, keeping placeholder");
                        return;
                    }
                    let _ = internal_tx
                        .send(EngineInternal::ContactName {
                            contact_id,
                            name: nickname,
                        })
                        .await;
                }
                Err(err) => {
                    warn!(contact = %contact_id, room = %room_id, %err, "Nickname enrichment failed");
                }
            }
        });
    }

    /// Fire-and-forget room table reload after a membership change.
    fn spawn_room_reload(&self, room_id: String) {
        let rpc = Arc::clone(&self.rpc);
        let internal_tx = self.internal_tx.clone();
        tokio::spawn(async move {
            match rpc.get_chatroom_member_info().await {
                Ok(raw) => {
                    let _ = internal_tx.send(EngineInternal::RoomsLoaded { raw }).await;
                }
                Err(err) => {
                    warn!(room = %room_id, %err, "Room reload failed");
                }
            }
        });
    }

    fn handle_internal(&mut self, internal: EngineInternal) {
        match internal {
            EngineInternal::ContactName { contact_id, name } => {
                self.directory.apply_contact_name(&contact_id, &name);
            }
            EngineInternal::RoomsLoaded { raw } => match rpc::parse_room_list(&raw) {
                Ok(rows) => {
                    let pending = self.directory.apply_rooms(rows);
                    for (member_id, room_id) in pending {
                        self.spawn_nick_enrichment(member_id, room_id);
                    }
                }
                Err(err) => warn!(%err, "Malformed room table reload"),
            },
            EngineInternal::AliasApplied { contact_id, alias } => {
                self.directory.set_contact_alias(&contact_id, &alias);
            }
        }
    }
}

/// Extensions the native side accepts as a picture message.
fn is_image_path(path: &str) -> bool {
    const IMAGE_EXTENSIONS: [&str; 5] = ["jpg", "jpeg", "png", "gif", "bmp"];
    Path::new(path)
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| IMAGE_EXTENSIONS.contains(&ext.to_ascii_lowercase().as_str()))
        .unwrap_or(false)
}
