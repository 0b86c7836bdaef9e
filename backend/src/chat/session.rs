//! Conversation session
//!
//! Synchronous state machine behind one chat widget: the transcript, the
//! input buffer and the queue of delayed bot replies. Time is passed in by
//! the caller, so the same type drives the tokio actor and the desktop
//! widget's frame loop.
//!
//! Every `open`/`close` bumps the epoch. A [`ReplyTicket`] issued under an
//! older epoch is ignored on delivery, so a reply scheduled before a reset
//! can never land in the new transcript.

use super::models::Message;
use crate::assistant::{ResponseEngine, SupportMode, SurfaceProfile};
use std::collections::VecDeque;
use std::time::Instant;
use tracing::debug;

/// Handle to a scheduled bot reply
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReplyTicket {
    /// Epoch the reply was scheduled under
    pub epoch: u64,
    /// Position of the triggering user message among this epoch's sends
    pub seq: u64,
    /// Earliest time the reply may be appended
    pub due_at: Instant,
}

#[derive(Debug)]
struct PendingReply {
    seq: u64,
    due_at: Instant,
    content: &'static str,
}

/// One chat conversation
#[derive(Debug)]
pub struct ConversationSession {
    engine: ResponseEngine,
    surface: SurfaceProfile,
    epoch: u64,
    open: bool,
    transcript: Vec<Message>,
    input: String,
    pending: VecDeque<PendingReply>,
    next_seq: u64,
}

impl ConversationSession {
    /// Create a closed session for `engine`
    pub fn new(engine: ResponseEngine, surface: SurfaceProfile) -> Self {
        Self {
            engine,
            surface,
            epoch: 0,
            open: false,
            transcript: Vec::new(),
            input: String::new(),
            pending: VecDeque::new(),
            next_seq: 0,
        }
    }

    /// Create a closed session with the engine's stock delay and key handling
    pub fn with_default_surface(engine: ResponseEngine) -> Self {
        Self::new(engine, engine.kind().default_surface())
    }

    /// Reset the transcript and seed it with the greeting.
    ///
    /// For the support engine `mode` selects the table; `None` keeps the
    /// current one. The FAQ engine ignores `mode`.
    pub fn open(&mut self, mode: Option<SupportMode>) {
        if let (ResponseEngine::Support(current), Some(mode)) = (self.engine, mode) {
            if current != mode {
                self.engine = ResponseEngine::Support(mode);
            }
        }

        self.reset();
        self.open = true;
        self.transcript.push(Message::bot(self.engine.greeting()));

        debug!(
            epoch = self.epoch,
            engine = self.engine.kind().as_str(),
            mode = ?self.engine.mode(),
            "Conversation opened"
        );
    }

    /// Discard the transcript, the input buffer and any pending replies
    pub fn close(&mut self) {
        let dropped = self.pending.len();
        self.reset();
        self.open = false;

        debug!(
            epoch = self.epoch,
            dropped_replies = dropped,
            "Conversation closed"
        );
    }

    /// Submit `text` as a user message.
    ///
    /// Returns `None` without touching the transcript when the text is empty
    /// or whitespace, or when the session is closed. Otherwise the user
    /// message is appended before returning and the reply is queued.
    pub fn send(&mut self, text: &str, now: Instant) -> Option<ReplyTicket> {
        if !self.open || text.trim().is_empty() {
            return None;
        }

        self.transcript.push(Message::user(text));
        self.input.clear();

        let seq = self.next_seq;
        self.next_seq += 1;
        let due_at = now + self.surface.reply_delay;
        self.pending.push_back(PendingReply {
            seq,
            due_at,
            content: self.engine.respond(text),
        });

        debug!(
            epoch = self.epoch,
            seq,
            pending = self.pending.len(),
            "User message accepted"
        );

        Some(ReplyTicket {
            epoch: self.epoch,
            seq,
            due_at,
        })
    }

    /// Send whatever is in the input buffer
    pub fn submit_input(&mut self, now: Instant) -> Option<ReplyTicket> {
        let text = self.input.clone();
        self.send(&text, now)
    }

    /// Append the reply for `ticket`, and any earlier replies still queued.
    ///
    /// Stale or already delivered tickets are a no-op. Returns the appended
    /// messages in transcript order.
    pub fn deliver(&mut self, ticket: ReplyTicket) -> Vec<Message> {
        if ticket.epoch != self.epoch {
            debug!(
                ticket_epoch = ticket.epoch,
                epoch = self.epoch,
                "Dropping reply from stale epoch"
            );
            return Vec::new();
        }
        self.drain_while(|reply| reply.seq <= ticket.seq)
    }

    /// Append every reply whose due time has passed
    pub fn poll(&mut self, now: Instant) -> Vec<Message> {
        self.drain_while(|reply| reply.due_at <= now)
    }

    /// Due time of the oldest queued reply
    pub fn next_due(&self) -> Option<Instant> {
        self.pending.front().map(|reply| reply.due_at)
    }

    /// Number of replies still queued
    pub fn pending_replies(&self) -> usize {
        self.pending.len()
    }

    /// Replace the input buffer
    pub fn set_input(&mut self, text: impl Into<String>) {
        self.input = text.into();
    }

    /// Current input buffer
    pub fn input(&self) -> &str {
        &self.input
    }

    /// Mutable input buffer, for text widgets that edit in place
    pub fn input_mut(&mut self) -> &mut String {
        &mut self.input
    }

    /// Whether the send action should be enabled
    pub fn can_send(&self) -> bool {
        self.open && !self.input.trim().is_empty()
    }

    /// Messages in insertion order
    pub fn transcript(&self) -> &[Message] {
        &self.transcript
    }

    /// Active engine configuration
    pub fn engine(&self) -> ResponseEngine {
        self.engine
    }

    /// Delay and key handling
    pub fn surface(&self) -> SurfaceProfile {
        self.surface
    }

    /// Current epoch
    pub fn epoch(&self) -> u64 {
        self.epoch
    }

    /// Whether the conversation is visible
    pub fn is_open(&self) -> bool {
        self.open
    }

    fn reset(&mut self) {
        self.epoch += 1;
        self.transcript.clear();
        self.input.clear();
        self.pending.clear();
        self.next_seq = 0;
    }

    fn drain_while(&mut self, ready: impl Fn(&PendingReply) -> bool) -> Vec<Message> {
        let mut appended = Vec::new();
        while self.pending.front().is_some_and(&ready) {
            if let Some(reply) = self.pending.pop_front() {
                let message = Message::bot(reply.content);
                self.transcript.push(message.clone());
                appended.push(message);
            }
        }
        appended
    }
}
