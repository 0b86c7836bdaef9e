//! API module
//!
//! Contains HTTP request handlers for the assistant and chat session endpoints

pub mod assistant;
pub mod sessions;
pub mod streaming;
pub mod utils;
