//! Session-state engine for a hooked WeChat desktop process.
//!
//! The engine consumes raw hook callbacks from an injected agent,
//! tracks the login/session lifecycle, maintains contact and room
//! directories, normalizes message traffic and serves queries over a
//! command channel. It never touches the wire itself; the sidecar
//! boundary is the [`rpc::SidecarRpc`] trait.

pub mod classify;
pub mod directory;
pub mod engine;
pub mod events;
pub mod hook;
pub mod join;
pub mod rpc;
pub mod session;
pub mod store;

pub use engine::{spawn_engine, EngineCommand, EngineConfig, EngineError, EngineHandle};
pub use events::{NormalizedMessage, PuppetEvent, TalkerInfo};
pub use hook::{HookEvent, RawHook};
pub use rpc::{RpcError, SidecarRpc};
