//! Waste Assistant Backend Library
//!
//! Rule-based chat assistants for the waste-management dashboard, plus the
//! HTTP and WebSocket surface that serves them. The main binary is in
//! `src/main.rs`.

pub mod api;
/// Keyword tables and response engines
pub mod assistant;
pub mod chat;
pub mod config;
pub mod error;
pub mod routes;
/// Shared application state
pub mod state;
pub mod websocket;
