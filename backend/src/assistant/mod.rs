//! Assistant module
//!
//! Rule-based keyword matching for the FAQ and support assistants.

pub mod engine;
pub mod keywords;
pub mod tables;

pub use engine::{
    EngineKind, ResponseEngine, SubmitPolicy, SupportMode, SurfaceProfile, FAQ_REPLY_DELAY,
    SUPPORT_REPLY_DELAY,
};
pub use keywords::{KeywordTable, KeywordTableError};
pub use tables::{faq_profile, mode_profile, FaqProfile, ModeProfile};
