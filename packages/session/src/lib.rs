//! # Canopy Session
//!
//! Per-conversation state and the turn cycle that feeds the intent
//! pipeline.
//!
//! A [`Session`] holds the current document, the patch history (proposed
//! and applied entries) and the conversation history. The
//! [`Orchestrator`] classifies each message, parses edits into proposed
//! patches and records them. Applying a proposal is the caller's job:
//!
//! ```rust,ignore
//! let outcome = Orchestrator::new(&store).handle_message("s1", "delete it", None);
//! for proposal in &outcome.patches {
//!     let applied = canopy_editor::apply(&document, &proposal.patch, None);
//!     if applied.is_applied() {
//!         store.update_session_after_patch("s1", &proposal.entry_id, applied.page)?;
//!     }
//! }
//! ```

mod error;
mod orchestrator;
mod session;
mod store;

pub use error::SessionError;
pub use orchestrator::{Orchestrator, ProposedPatch, TurnOutcome};
pub use session::{
    AssetUpdate, ContextSummary, ConversationMessage, PatchHistoryEntry, PatchStatus, Role,
    Session,
};
pub use store::{global_store, lock, SessionHandle, SessionStore, StoreOptions};
