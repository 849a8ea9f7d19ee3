use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SessionError {
    #[error("Session not found: {0}")]
    SessionNotFound(String),

    #[error("Patch history entry '{entry_id}' not found in session '{session_id}'")]
    EntryNotFound { session_id: String, entry_id: String },

    #[error("Patch history entry '{0}' was already applied")]
    EntryAlreadyApplied(String),
}
