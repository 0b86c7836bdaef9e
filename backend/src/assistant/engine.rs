//! Response engines
//!
//! Two configurations of the same keyword matcher:
//! - `Faq`: one domain table guarded by greeting and help checks
//! - `Support`: one table per mode (help / support / issue)

use super::tables::{faq_profile, mode_profile};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::time::Duration;
use thiserror::Error;

/// Reply delay of the FAQ assistant
pub const FAQ_REPLY_DELAY: Duration = Duration::from_millis(1000);

/// Reply delay of the support assistant
pub const SUPPORT_REPLY_DELAY: Duration = Duration::from_millis(500);

/// Which assistant a session talks to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EngineKind {
    /// Single-domain FAQ assistant
    Faq,
    /// Multi-mode support assistant
    Support,
}

impl EngineKind {
    /// Both engines
    pub const ALL: [EngineKind; 2] = [EngineKind::Faq, EngineKind::Support];

    /// Convert to the wire representation
    pub fn as_str(&self) -> &'static str {
        match self {
            EngineKind::Faq => "faq",
            EngineKind::Support => "support",
        }
    }

    /// Delay and keyboard behaviour this engine ships with
    pub fn default_surface(&self) -> SurfaceProfile {
        match self {
            EngineKind::Faq => SurfaceProfile {
                reply_delay: FAQ_REPLY_DELAY,
                submit_policy: SubmitPolicy::EnterAlways,
            },
            EngineKind::Support => SurfaceProfile {
                reply_delay: SUPPORT_REPLY_DELAY,
                submit_policy: SubmitPolicy::EnterWithoutShift,
            },
        }
    }
}

/// Support-assistant mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SupportMode {
    /// App navigation help
    #[default]
    Help,
    /// Technical support
    Support,
    /// Issue reporting
    Issue,
}

impl SupportMode {
    /// Every mode, in menu order
    pub const ALL: [SupportMode; 3] = [SupportMode::Help, SupportMode::Support, SupportMode::Issue];

    /// Convert to the wire representation
    pub fn as_str(&self) -> &'static str {
        match self {
            SupportMode::Help => "help",
            SupportMode::Support => "support",
            SupportMode::Issue => "issue",
        }
    }
}

impl fmt::Display for SupportMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Unknown engine or mode name
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Unknown {kind}: {value}")]
pub struct ParseNameError {
    kind: &'static str,
    value: String,
}

impl FromStr for SupportMode {
    type Err = ParseNameError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "help" => Ok(SupportMode::Help),
            "support" => Ok(SupportMode::Support),
            "issue" => Ok(SupportMode::Issue),
            _ => Err(ParseNameError {
                kind: "mode",
                value: s.to_string(),
            }),
        }
    }
}

impl FromStr for EngineKind {
    type Err = ParseNameError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "faq" => Ok(EngineKind::Faq),
            "support" => Ok(EngineKind::Support),
            _ => Err(ParseNameError {
                kind: "engine",
                value: s.to_string(),
            }),
        }
    }
}

/// When an Enter key press submits the input
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SubmitPolicy {
    /// Enter submits, with or without Shift
    EnterAlways,
    /// Enter submits; Shift+Enter does not
    EnterWithoutShift,
}

impl SubmitPolicy {
    /// Whether a key press with these modifiers submits the input
    pub fn submits(&self, enter: bool, shift: bool) -> bool {
        match self {
            SubmitPolicy::EnterAlways => enter,
            SubmitPolicy::EnterWithoutShift => enter && !shift,
        }
    }
}

/// Per-surface tuning of an engine
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SurfaceProfile {
    /// Artificial latency before the bot reply is appended
    pub reply_delay: Duration,
    /// Enter-key behaviour of the input field
    pub submit_policy: SubmitPolicy,
}

/// Active engine configuration: which table answers and how it greets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "engine", content = "mode", rename_all = "lowercase")]
pub enum ResponseEngine {
    /// FAQ assistant
    Faq,
    /// Support assistant in the given mode
    Support(SupportMode),
}

impl ResponseEngine {
    /// Build from an engine kind and an optional mode; the mode is ignored for `Faq`
    pub fn new(kind: EngineKind, mode: Option<SupportMode>) -> Self {
        match kind {
            EngineKind::Faq => ResponseEngine::Faq,
            EngineKind::Support => ResponseEngine::Support(mode.unwrap_or_default()),
        }
    }

    /// Engine kind
    pub fn kind(&self) -> EngineKind {
        match self {
            ResponseEngine::Faq => EngineKind::Faq,
            ResponseEngine::Support(_) => EngineKind::Support,
        }
    }

    /// Active mode, `None` for the FAQ engine
    pub fn mode(&self) -> Option<SupportMode> {
        match self {
            ResponseEngine::Faq => None,
            ResponseEngine::Support(mode) => Some(*mode),
        }
    }

    /// Title shown above the conversation
    pub fn title(&self) -> &'static str {
        match self {
            ResponseEngine::Faq => faq_profile().title,
            ResponseEngine::Support(mode) => mode_profile(*mode).title,
        }
    }

    /// Bot message seeded when a session opens
    pub fn greeting(&self) -> &'static str {
        match self {
            ResponseEngine::Faq => faq_profile().greeting,
            ResponseEngine::Support(mode) => mode_profile(*mode).greeting,
        }
    }

    /// Canned reply for `input`. Never fails.
    pub fn respond(&self, input: &str) -> &'static str {
        match self {
            ResponseEngine::Faq => faq_reply(input),
            ResponseEngine::Support(mode) => mode_profile(*mode).table.lookup(input),
        }
    }
}

// Greetings, then help, then the domain table, then the default.
fn faq_reply(input: &str) -> &'static str {
    let profile = faq_profile();
    let lowered = input.to_lowercase();

    if profile
        .greeting_patterns
        .iter()
        .any(|pattern| lowered.contains(pattern))
    {
        return profile.greeting_reply;
    }
    if lowered.contains(profile.help_pattern) {
        return profile.help_reply;
    }
    profile
        .table
        .find(&lowered)
        .unwrap_or(profile.table.default_response())
}
