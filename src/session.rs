//! Per-user session state.
//!
//! Each browser session owns a selection and a conversation. Sessions live
//! in memory until the client ends them and are reached through the
//! [`SessionStore`] handle shared by all request handlers.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tokio::sync::{Mutex, RwLock};
use uuid::Uuid;

use crate::models::Conversation;
use crate::selection::SelectionStore;
use crate::{Result, TravelChatError};

/// State of one user session
#[derive(Debug, Clone, Serialize)]
pub struct Session {
    pub id: Uuid,
    pub selection: SelectionStore,
    pub conversation: Conversation,
    pub created_at: DateTime<Utc>,
}

impl Session {
    #[must_use]
    pub fn new(conversation: Conversation) -> Self {
        Self {
            id: Uuid::new_v4(),
            selection: SelectionStore::new(),
            conversation,
            created_at: Utc::now(),
        }
    }
}

/// Handle to one session; holding its lock serialises that user's interactions
pub type SessionHandle = Arc<Mutex<Session>>;

/// Shared map of live sessions. Cloning shares the same map.
#[derive(Clone, Default)]
pub struct SessionStore {
    sessions: Arc<RwLock<HashMap<Uuid, SessionHandle>>>,
}

impl SessionStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a new session and return its id
    pub async fn create(&self, conversation: Conversation) -> Uuid {
        let session = Session::new(conversation);
        let id = session.id;
        self.sessions
            .write()
            .await
            .insert(id, Arc::new(Mutex::new(session)));
        tracing::debug!(%id, "Session created");
        id
    }

    /// Lockable handle to a session, for steps that await while holding it
    pub async fn handle(&self, id: Uuid) -> Result<SessionHandle> {
        self.sessions
            .read()
            .await
            .get(&id)
            .cloned()
            .ok_or_else(|| missing(id))
    }

    /// Snapshot of a session
    pub async fn get(&self, id: Uuid) -> Result<Session> {
        let handle = self.handle(id).await?;
        let session = handle.lock().await;
        Ok(session.clone())
    }

    /// Run `f` against a session with exclusive access
    pub async fn with_session_mut<T>(
        &self,
        id: Uuid,
        f: impl FnOnce(&mut Session) -> T,
    ) -> Result<T> {
        let handle = self.handle(id).await?;
        let mut session = handle.lock().await;
        Ok(f(&mut *session))
    }

    /// End a session, dropping its selection and conversation.
    ///
    /// A request already holding the session's handle finishes against its
    /// own copy; later lookups see `NotFound`.
    pub async fn remove(&self, id: Uuid) -> Result<()> {
        let removed = self.sessions.write().await.remove(&id);
        if removed.is_none() {
            return Err(missing(id));
        }
        tracing::debug!(%id, "Session ended");
        Ok(())
    }

    pub async fn len(&self) -> usize {
        self.sessions.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.sessions.read().await.is_empty()
    }
}

fn missing(id: Uuid) -> TravelChatError {
    TravelChatError::not_found(format!("session {id}"))
}
