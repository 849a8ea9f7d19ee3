//! # Session Store
//!
//! Process-wide map of sessions keyed by session id.
//!
//! The map itself sits behind a `RwLock`; each session has its own
//! `Mutex`, so turns on different sessions never wait on each other.
//! Calls for the same session id are serialized by that mutex, one call at
//! a time. A multi-step sequence (parse, apply, confirm) is not atomic and
//! must be sequenced by the caller.

use crate::session::{AssetUpdate, Role, Session};
use crate::SessionError;
use canopy_editor::Patch;
use canopy_intent::Intent;
use once_cell::sync::Lazy;
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, RwLock};
use tracing::{debug, info};

pub type SessionHandle = Arc<Mutex<Session>>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StoreOptions {
    /// Keep before/after documents on applied history entries
    pub snapshot_history: bool,
}

impl Default for StoreOptions {
    fn default() -> Self {
        Self {
            snapshot_history: true,
        }
    }
}

static GLOBAL: Lazy<SessionStore> = Lazy::new(SessionStore::new);

/// The store shared by everything in this process
pub fn global_store() -> &'static SessionStore {
    &GLOBAL
}

#[derive(Debug, Default)]
pub struct SessionStore {
    sessions: RwLock<HashMap<String, SessionHandle>>,
    options: StoreOptions,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::with_options(StoreOptions::default())
    }

    pub fn with_options(options: StoreOptions) -> Self {
        Self {
            sessions: RwLock::new(HashMap::new()),
            options,
        }
    }

    pub fn options(&self) -> StoreOptions {
        self.options
    }

    /// Session for `session_id`, created empty on first reference
    pub fn get_or_create_session(&self, session_id: &str) -> SessionHandle {
        if let Some(handle) = self.get(session_id) {
            return handle;
        }

        let mut sessions = self.sessions.write().unwrap_or_else(PoisonError::into_inner);
        sessions
            .entry(session_id.to_string())
            .or_insert_with(|| {
                info!(session_id, "Created session");
                Arc::new(Mutex::new(Session::new(session_id)))
            })
            .clone()
    }

    pub fn get(&self, session_id: &str) -> Option<SessionHandle> {
        self.sessions
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(session_id)
            .cloned()
    }

    pub fn contains(&self, session_id: &str) -> bool {
        self.get(session_id).is_some()
    }

    pub fn len(&self) -> usize {
        self.sessions.read().unwrap_or_else(PoisonError::into_inner).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn session_ids(&self) -> Vec<String> {
        let mut ids: Vec<String> = self
            .sessions
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .keys()
            .cloned()
            .collect();
        ids.sort();
        ids
    }

    /// Copy of the session's current state
    pub fn snapshot(&self, session_id: &str) -> Option<Session> {
        let handle = self.get(session_id)?;
        let session = lock(&handle).clone();
        Some(session)
    }

    /// Run `f` with the session locked
    pub fn with_session<R>(
        &self,
        session_id: &str,
        f: impl FnOnce(&mut Session) -> R,
    ) -> Result<R, SessionError> {
        let handle = self
            .get(session_id)
            .ok_or_else(|| SessionError::SessionNotFound(session_id.to_string()))?;
        let mut session = lock(&handle);
        Ok(f(&mut session))
    }

    pub fn update_session_asset(
        &self,
        session_id: &str,
        update: AssetUpdate,
    ) -> Result<(), SessionError> {
        self.with_session(session_id, |session| session.update_asset(update))
    }

    /// Record a proposed patch; returns the history entry id
    pub fn add_patch_to_history(&self, session_id: &str, patch: Patch) -> Result<String, SessionError> {
        self.with_session(session_id, |session| session.add_patch(patch))
    }

    pub fn add_message_to_history(
        &self,
        session_id: &str,
        role: Role,
        content: impl Into<String>,
        intent: Option<Intent>,
    ) -> Result<(), SessionError> {
        self.with_session(session_id, |session| {
            session.add_message(role, content, intent);
        })
    }

    /// Store the document produced by applying a proposed patch and mark
    /// its history entry applied
    pub fn update_session_after_patch(
        &self,
        session_id: &str,
        entry_id: &str,
        document: canopy_document::UiPage,
    ) -> Result<(), SessionError> {
        let keep_snapshots = self.options.snapshot_history;
        self.with_session(session_id, |session| {
            session.confirm_patch(entry_id, document, keep_snapshots)
        })??;
        debug!(session_id, entry_id, "Patch confirmed");
        Ok(())
    }

    /// Drop a session. Returns whether it existed.
    pub fn remove(&self, session_id: &str) -> bool {
        self.sessions
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(session_id)
            .is_some()
    }
}

/// Lock a session, recovering the data if a previous holder panicked
pub fn lock(handle: &SessionHandle) -> MutexGuard<'_, Session> {
    handle.lock().unwrap_or_else(PoisonError::into_inner)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::PatchStatus;
    use canopy_document::{UiNode, UiPage};
    use std::thread;

    fn page() -> UiPage {
        UiPage::new("page-1", "").with_child(UiNode::component("button-1", "Button"))
    }

    #[test]
    fn test_get_or_create_returns_same_session() {
        let store = SessionStore::new();
        let first = store.get_or_create_session("s1");
        let second = store.get_or_create_session("s1");

        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_operations_on_unknown_session_fail() {
        let store = SessionStore::new();
        assert_eq!(
            store.add_message_to_history("nope", Role::User, "hi", None),
            Err(SessionError::SessionNotFound("nope".to_string()))
        );
        assert!(store.snapshot("nope").is_none());
    }

    #[test]
    fn test_history_keeps_insertion_order() {
        let store = SessionStore::new();
        store.get_or_create_session("s1");

        for i in 0..5 {
            store
                .add_message_to_history("s1", Role::User, format!("message {}", i), None)
                .unwrap();
            store
                .add_patch_to_history("s1", Patch::set_copy("button-1", format!("copy {}", i)))
                .unwrap();
        }

        let session = store.snapshot("s1").unwrap();
        let contents: Vec<_> = session
            .conversation_history
            .iter()
            .map(|m| m.content.as_str())
            .collect();
        assert_eq!(
            contents,
            vec!["message 0", "message 1", "message 2", "message 3", "message 4"]
        );
        assert_eq!(session.patch_history[4].patch, Patch::set_copy("button-1", "copy 4"));
    }

    #[test]
    fn test_snapshot_option_is_respected() {
        let store = SessionStore::with_options(StoreOptions {
            snapshot_history: false,
        });
        store.get_or_create_session("s1");
        store
            .update_session_asset("s1", AssetUpdate::asset("a1").with_document(page()))
            .unwrap();
        let entry_id = store
            .add_patch_to_history("s1", Patch::remove_node("button-1"))
            .unwrap();

        store
            .update_session_after_patch("s1", &entry_id, UiPage::new("page-1", ""))
            .unwrap();

        let session = store.snapshot("s1").unwrap();
        let entry = session.entry(&entry_id).unwrap();
        assert_eq!(entry.status, PatchStatus::Applied);
        assert!(entry.before.is_none());
        assert_eq!(session.document, Some(UiPage::new("page-1", "")));
    }

    #[test]
    fn test_sessions_are_independent_across_threads() {
        let store = Arc::new(SessionStore::new());
        let workers: Vec<_> = (0..4)
            .map(|n| {
                let store = Arc::clone(&store);
                thread::spawn(move || {
                    let id = format!("session-{}", n);
                    store.get_or_create_session(&id);
                    for i in 0..10 {
                        store
                            .add_message_to_history(&id, Role::User, i.to_string(), None)
                            .unwrap();
                    }
                })
            })
            .collect();
        for worker in workers {
            worker.join().unwrap();
        }

        assert_eq!(store.len(), 4);
        for id in store.session_ids() {
            assert_eq!(store.snapshot(&id).unwrap().conversation_history.len(), 10);
        }
    }

    #[test]
    fn test_remove() {
        let store = SessionStore::new();
        store.get_or_create_session("s1");
        assert!(store.remove("s1"));
        assert!(!store.remove("s1"));
        assert!(store.is_empty());
    }
}
