// Shared data model for the native event normalization engine.

pub mod constants;
pub mod contact;
pub mod message;
pub mod payload;
pub mod room;
pub mod session;

pub use contact::{Contact, ContactKind, Gender};
pub use message::{Message, MessageType};
pub use payload::{LocationPayload, MiniProgramPayload, RichPayload, UrlLinkPayload};
pub use room::Room;
pub use session::{ScanStatus, SessionPhase};
