//! Session actor
//!
//! Runs one [`ConversationSession`] on its own tokio task. All mutations go
//! through a command channel, so the session has exactly one writer and no
//! locks. Delayed replies are timer tasks that post a `Deliver` command back
//! to the actor when they fire; the session's epoch check drops the ones
//! scheduled before a close or reopen.

use super::error::SessionError;
use super::models::{Message, TranscriptEvent};
use super::session::{ConversationSession, ReplyTicket};
use crate::assistant::{EngineKind, SupportMode, SurfaceProfile};
use serde::Serialize;
use tokio::sync::{broadcast, mpsc, oneshot};
use tokio::time::Instant;
use tracing::{debug, info};

/// Unique identifier for a session
pub type SessionId = String;

const COMMAND_BUFFER: usize = 64;
const EVENT_BUFFER: usize = 256;

/// Point-in-time view of a session
#[derive(Debug, Clone, Serialize)]
pub struct SessionSnapshot {
    /// Session identifier
    pub id: SessionId,
    /// Engine answering this session
    pub engine: EngineKind,
    /// Active support mode, if any
    pub mode: Option<SupportMode>,
    /// Title of the active configuration
    pub title: String,
    /// Current epoch
    pub epoch: u64,
    /// Whether the conversation is visible
    pub is_open: bool,
    /// Replies scheduled but not yet appended
    pub pending_replies: usize,
    /// Transcript in insertion order
    pub messages: Vec<Message>,
}

/// Outcome of a send
#[derive(Debug, Clone, Serialize)]
pub struct SendOutcome {
    /// False when the input was empty/whitespace or the session closed
    pub accepted: bool,
    /// The user message appended, when accepted
    pub message: Option<Message>,
}

enum SessionCommand {
    Open {
        mode: Option<SupportMode>,
        reply: oneshot::Sender<SessionSnapshot>,
    },
    Close {
        reply: oneshot::Sender<SessionSnapshot>,
    },
    Send {
        content: String,
        reply: oneshot::Sender<SendOutcome>,
    },
    Snapshot {
        reply: oneshot::Sender<SessionSnapshot>,
    },
    Deliver(ReplyTicket),
    Shutdown,
}

/// Cloneable client of a running session actor
#[derive(Clone)]
pub struct SessionHandle {
    id: SessionId,
    commands: mpsc::Sender<SessionCommand>,
    events: broadcast::Sender<TranscriptEvent>,
}

impl std::fmt::Debug for SessionHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionHandle").field("id", &self.id).finish()
    }
}

impl SessionHandle {
    /// Spawn an actor owning a new, closed session
    ///
    /// Must be called from within a tokio runtime.
    pub fn spawn(id: SessionId, kind: EngineKind, surface: SurfaceProfile) -> Self {
        let engine = crate::assistant::ResponseEngine::new(kind, None);
        let session = ConversationSession::new(engine, surface);
        let (commands, receiver) = mpsc::channel(COMMAND_BUFFER);
        let (events, _) = broadcast::channel(EVENT_BUFFER);

        let actor = SessionActor {
            id: id.clone(),
            session,
            receiver,
            commands: commands.downgrade(),
            events: events.clone(),
        };
        tokio::spawn(actor.run());

        Self {
            id,
            commands,
            events,
        }
    }

    /// Session identifier
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Reset the transcript (optionally switching mode) and seed the greeting
    pub async fn open(&self, mode: Option<SupportMode>) -> Result<SessionSnapshot, SessionError> {
        self.request(|reply| SessionCommand::Open { mode, reply })
            .await
    }

    /// Discard the transcript and pending replies
    pub async fn close(&self) -> Result<SessionSnapshot, SessionError> {
        self.request(|reply| SessionCommand::Close { reply }).await
    }

    /// Submit user input; the reply follows after the surface's delay
    pub async fn send(&self, content: impl Into<String>) -> Result<SendOutcome, SessionError> {
        let content = content.into();
        self.request(|reply| SessionCommand::Send { content, reply })
            .await
    }

    /// Current state of the session
    pub async fn snapshot(&self) -> Result<SessionSnapshot, SessionError> {
        self.request(|reply| SessionCommand::Snapshot { reply })
            .await
    }

    /// Subscribe to transcript changes
    pub fn subscribe(&self) -> broadcast::Receiver<TranscriptEvent> {
        self.events.subscribe()
    }

    /// Stop the actor; pending replies are discarded
    pub async fn shutdown(&self) {
        if self.commands.send(SessionCommand::Shutdown).await.is_err() {
            debug!(session_id = %self.id, "Session actor already stopped");
        }
    }

    async fn request<T>(
        &self,
        build: impl FnOnce(oneshot::Sender<T>) -> SessionCommand,
    ) -> Result<T, SessionError> {
        let (reply, response) = oneshot::channel();
        self.commands
            .send(build(reply))
            .await
            .map_err(|_| SessionError::ActorStopped(self.id.clone()))?;
        response
            .await
            .map_err(|_| SessionError::ActorStopped(self.id.clone()))
    }
}

struct SessionActor {
    id: SessionId,
    session: ConversationSession,
    receiver: mpsc::Receiver<SessionCommand>,
    // Weak so the actor exits once every handle is dropped
    commands: mpsc::WeakSender<SessionCommand>,
    events: broadcast::Sender<TranscriptEvent>,
}

impl SessionActor {
    async fn run(mut self) {
        info!(session_id = %self.id, "Session actor started");

        while let Some(command) = self.receiver.recv().await {
            match command {
                SessionCommand::Open { mode, reply } => {
                    self.session.open(mode);
                    let snapshot = self.snapshot();
                    self.publish(TranscriptEvent::Reset {
                        epoch: snapshot.epoch,
                        title: snapshot.title.clone(),
                        messages: snapshot.messages.clone(),
                    });
                    let _ = reply.send(snapshot);
                }
                SessionCommand::Close { reply } => {
                    self.session.close();
                    self.publish(TranscriptEvent::Closed {
                        epoch: self.session.epoch(),
                    });
                    let _ = reply.send(self.snapshot());
                }
                SessionCommand::Send { content, reply } => {
                    let outcome = self.accept(&content);
                    let _ = reply.send(outcome);
                }
                SessionCommand::Snapshot { reply } => {
                    let _ = reply.send(self.snapshot());
                }
                SessionCommand::Deliver(ticket) => {
                    for message in self.session.deliver(ticket) {
                        debug!(
                            session_id = %self.id,
                            epoch = ticket.epoch,
                            seq = ticket.seq,
                            "Bot reply appended"
                        );
                        self.publish(TranscriptEvent::MessageAppended {
                            epoch: ticket.epoch,
                            message,
                        });
                    }
                }
                SessionCommand::Shutdown => break,
            }
        }

        self.publish(TranscriptEvent::Ended {
            epoch: self.session.epoch(),
        });
        info!(session_id = %self.id, "Session actor stopped");
    }

    fn accept(&mut self, content: &str) -> SendOutcome {
        let now = Instant::now().into_std();
        let Some(ticket) = self.session.send(content, now) else {
            debug!(session_id = %self.id, "Ignoring empty input or closed session");
            return SendOutcome {
                accepted: false,
                message: None,
            };
        };

        let message = self.session.transcript().last().cloned();
        if let Some(message) = &message {
            self.publish(TranscriptEvent::MessageAppended {
                epoch: ticket.epoch,
                message: message.clone(),
            });
        }
        self.schedule(ticket);

        SendOutcome {
            accepted: true,
            message,
        }
    }

    fn schedule(&self, ticket: ReplyTicket) {
        let commands = self.commands.clone();
        let session_id = self.id.clone();
        tokio::spawn(async move {
            tokio::time::sleep_until(Instant::from_std(ticket.due_at)).await;
            let delivered = match commands.upgrade() {
                Some(commands) => commands.send(SessionCommand::Deliver(ticket)).await.is_ok(),
                None => false,
            };
            if !delivered {
                debug!(
                    session_id = %session_id,
                    seq = ticket.seq,
                    "Session stopped before reply was delivered"
                );
            }
        });
    }

    fn snapshot(&self) -> SessionSnapshot {
        let engine = self.session.engine();
        SessionSnapshot {
            id: self.id.clone(),
            engine: engine.kind(),
            mode: engine.mode(),
            title: engine.title().to_string(),
            epoch: self.session.epoch(),
            is_open: self.session.is_open(),
            pending_replies: self.session.pending_replies(),
            messages: self.session.transcript().to_vec(),
        }
    }

    fn publish(&self, event: TranscriptEvent) {
        // No subscribers is normal
        let _ = self.events.send(event);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chat::models::Sender;
    use std::time::Duration;

    fn spawn(kind: EngineKind) -> SessionHandle {
        SessionHandle::spawn("test".to_string(), kind, kind.default_surface())
    }

    #[tokio::test(start_paused = true)]
    async fn test_reply_arrives_after_delay() {
        let handle = spawn(EngineKind::Faq);
        handle.open(None).await.unwrap();

        let outcome = handle.send("hello").await.unwrap();
        assert!(outcome.accepted);
        assert_eq!(handle.snapshot().await.unwrap().messages.len(), 2);

        tokio::time::sleep(Duration::from_millis(999)).await;
        assert_eq!(handle.snapshot().await.unwrap().messages.len(), 2);

        tokio::time::sleep(Duration::from_millis(2)).await;
        let snapshot = handle.snapshot().await.unwrap();
        assert_eq!(snapshot.messages.len(), 3);
        assert_eq!(snapshot.messages[2].sender, Sender::Bot);
    }

    #[tokio::test(start_paused = true)]
    async fn test_close_discards_in_flight_reply() {
        let handle = spawn(EngineKind::Support);
        handle.open(Some(SupportMode::Support)).await.unwrap();
        handle.send("login").await.unwrap();
        handle.close().await.unwrap();

        tokio::time::sleep(Duration::from_secs(2)).await;
        let snapshot = handle.snapshot().await.unwrap();
        assert!(snapshot.messages.is_empty());
        assert!(!snapshot.is_open);

        handle.open(None).await.unwrap();
        tokio::time::sleep(Duration::from_secs(2)).await;
        assert_eq!(handle.snapshot().await.unwrap().messages.len(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_events_follow_transcript() {
        let handle = spawn(EngineKind::Support);
        let mut events = handle.subscribe();

        handle.open(Some(SupportMode::Issue)).await.unwrap();
        handle.send("it is slow").await.unwrap();
        tokio::time::sleep(Duration::from_millis(600)).await;

        assert!(matches!(events.recv().await.unwrap(), TranscriptEvent::Reset { .. }));
        match events.recv().await.unwrap() {
            TranscriptEvent::MessageAppended { message, .. } => {
                assert_eq!(message.sender, Sender::User)
            }
            other => panic!("Expected user message, got {:?}", other),
        }
        match events.recv().await.unwrap() {
            TranscriptEvent::MessageAppended { message, .. } => {
                assert_eq!(message.sender, Sender::Bot)
            }
            other => panic!("Expected bot message, got {:?}", other),
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_empty_send_rejected() {
        let handle = spawn(EngineKind::Faq);
        handle.open(None).await.unwrap();
        let outcome = handle.send("   ").await.unwrap();
        assert!(!outcome.accepted);
        assert!(outcome.message.is_none());
    }

    #[tokio::test]
    async fn test_shutdown_publishes_ended() {
        let handle = spawn(EngineKind::Faq);
        let mut events = handle.subscribe();
        handle.shutdown().await;
        assert!(matches!(
            events.recv().await.unwrap(),
            TranscriptEvent::Ended { .. }
        ));
    }

    #[tokio::test]
    async fn test_shutdown_stops_actor() {
        let handle = spawn(EngineKind::Faq);
        handle.shutdown().await;
        // Give the actor a chance to exit
        tokio::task::yield_now().await;
        let result = handle.snapshot().await;
        assert_eq!(result.unwrap_err(), SessionError::ActorStopped("test".to_string()));
    }
}
