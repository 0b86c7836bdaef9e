//! Session Manager
//!
//! Registry of running session actors, one per open chat widget.
//! Sessions are created on demand and live until deleted or shutdown.

use super::error::SessionError;
use super::session_actor::{SessionHandle, SessionId, SessionSnapshot};
use crate::assistant::{EngineKind, SupportMode, SurfaceProfile};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{debug, info};
use uuid::Uuid;

/// Reply delays applied to new sessions, per engine
#[derive(Debug, Clone, Copy)]
pub struct SurfaceSettings {
    /// FAQ assistant surface
    pub faq: SurfaceProfile,
    /// Support assistant surface
    pub support: SurfaceProfile,
}

impl SurfaceSettings {
    /// Surface for `kind`
    pub fn for_kind(&self, kind: EngineKind) -> SurfaceProfile {
        match kind {
            EngineKind::Faq => self.faq,
            EngineKind::Support => self.support,
        }
    }
}

impl Default for SurfaceSettings {
    fn default() -> Self {
        Self {
            faq: EngineKind::Faq.default_surface(),
            support: EngineKind::Support.default_surface(),
        }
    }
}

/// Manages session actors
pub struct SessionManager {
    /// Map from session_id to its actor handle
    sessions: Arc<RwLock<HashMap<SessionId, SessionHandle>>>,
    surfaces: SurfaceSettings,
    max_sessions: usize,
}

impl SessionManager {
    /// Create a new session manager
    pub fn new(surfaces: SurfaceSettings, max_sessions: usize) -> Self {
        Self {
            sessions: Arc::new(RwLock::new(HashMap::new())),
            surfaces,
            max_sessions,
        }
    }

    /// Create and open a session
    ///
    /// # Returns
    /// * `Result<SessionSnapshot, SessionError>` - The opened session, holding its greeting
    pub async fn create_session(
        &self,
        kind: EngineKind,
        mode: Option<SupportMode>,
    ) -> Result<SessionSnapshot, SessionError> {
        let handle = {
            let mut sessions = self.sessions.write().await;
            if sessions.len() >= self.max_sessions {
                return Err(SessionError::CapacityReached(self.max_sessions));
            }
            let id = Uuid::new_v4().to_string();
            let handle = SessionHandle::spawn(id.clone(), kind, self.surfaces.for_kind(kind));
            sessions.insert(id, handle.clone());
            handle
        };

        let snapshot = handle.open(mode).await?;

        info!(
            session_id = %snapshot.id,
            engine = kind.as_str(),
            mode = ?snapshot.mode,
            "Session created"
        );

        Ok(snapshot)
    }

    /// Look up a session
    pub async fn get(&self, session_id: &str) -> Result<SessionHandle, SessionError> {
        let sessions = self.sessions.read().await;
        sessions
            .get(session_id)
            .cloned()
            .ok_or_else(|| SessionError::NotFound(session_id.to_string()))
    }

    /// IDs of all registered sessions
    pub async fn session_ids(&self) -> Vec<SessionId> {
        let sessions = self.sessions.read().await;
        let mut ids: Vec<SessionId> = sessions.keys().cloned().collect();
        ids.sort();
        ids
    }

    /// Stop a session's actor and forget it
    pub async fn remove_session(&self, session_id: &str) -> Result<(), SessionError> {
        let handle = {
            let mut sessions = self.sessions.write().await;
            sessions
                .remove(session_id)
                .ok_or_else(|| SessionError::NotFound(session_id.to_string()))?
        };

        handle.shutdown().await;

        info!(session_id = %session_id, "Session removed");
        Ok(())
    }

    /// Stop every session (for graceful shutdown)
    pub async fn shutdown_all(&self) {
        info!("Stopping all chat sessions");

        let handles: Vec<SessionHandle> = {
            let mut sessions = self.sessions.write().await;
            sessions.drain().map(|(_, handle)| handle).collect()
        };

        for handle in handles {
            debug!(session_id = %handle.id(), "Stopping session");
            handle.shutdown().await;
        }

        info!("All chat sessions stopped");
    }

    /// Get the number of registered sessions
    pub async fn session_count(&self) -> usize {
        let sessions = self.sessions.read().await;
        sessions.len()
    }

    /// Surfaces applied to new sessions
    pub fn surfaces(&self) -> SurfaceSettings {
        self.surfaces
    }
}

impl Default for SessionManager {
    fn default() -> Self {
        Self::new(SurfaceSettings::default(), 1000)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_create_session_opens_with_greeting() {
        let manager = SessionManager::default();
        let snapshot = manager
            .create_session(EngineKind::Support, Some(SupportMode::Issue))
            .await
            .unwrap();

        assert!(snapshot.is_open);
        assert_eq!(snapshot.mode, Some(SupportMode::Issue));
        assert_eq!(snapshot.title, "Report an Issue");
        assert_eq!(snapshot.messages.len(), 1);
        assert_eq!(manager.session_count().await, 1);
    }

    #[tokio::test]
    async fn test_get_unknown_session() {
        let manager = SessionManager::default();
        let err = manager.get("missing").await.unwrap_err();
        assert_eq!(err, SessionError::NotFound("missing".to_string()));
    }

    #[tokio::test]
    async fn test_remove_session() {
        let manager = SessionManager::default();
        let snapshot = manager.create_session(EngineKind::Faq, None).await.unwrap();

        manager.remove_session(&snapshot.id).await.unwrap();
        assert_eq!(manager.session_count().await, 0);
        assert!(manager.remove_session(&snapshot.id).await.is_err());
    }

    #[tokio::test]
    async fn test_capacity_limit() {
        let manager = SessionManager::new(SurfaceSettings::default(), 1);
        manager.create_session(EngineKind::Faq, None).await.unwrap();
        let err = manager
            .create_session(EngineKind::Faq, None)
            .await
            .unwrap_err();
        assert_eq!(err, SessionError::CapacityReached(1));
    }

    #[tokio::test]
    async fn test_shutdown_all() {
        let manager = SessionManager::default();
        manager.create_session(EngineKind::Faq, None).await.unwrap();
        manager.create_session(EngineKind::Support, None).await.unwrap();

        manager.shutdown_all().await;
        assert_eq!(manager.session_count().await, 0);
    }
}
