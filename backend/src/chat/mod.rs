//! Chat module
//!
//! Conversation sessions: the transcript state machine, the tokio actor that
//! drives it, and the registry of running sessions.

pub mod error;
pub mod models;
pub mod session;
pub mod session_actor;
pub mod session_manager;

pub use error::SessionError;
pub use models::{Message, MessageId, Sender, TranscriptEvent};
pub use session::{ConversationSession, ReplyTicket};
pub use session_actor::{SendOutcome, SessionHandle, SessionId, SessionSnapshot};
pub use session_manager::{SessionManager, SurfaceSettings};
