//! # Conversation Session
//!
//! Everything one conversation knows: the current document and the
//! external handles naming it, the patches proposed or applied so far, and
//! the messages exchanged. Both histories are append-only and keep
//! insertion order.

use crate::SessionError;
use canopy_document::{new_id, UiPage};
use canopy_editor::{inverse, Patch};
use canopy_intent::Intent;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PatchStatus {
    /// Produced by the parser, not yet confirmed by the caller
    Proposed,
    /// Confirmed via `update_session_after_patch`
    Applied,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PatchHistoryEntry {
    pub id: String,
    pub timestamp: DateTime<Utc>,
    pub patch: Patch,
    pub status: PatchStatus,
    /// Undo for `patch`, computed against the document it was proposed on
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub inverse: Option<Patch>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub before: Option<UiPage>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub after: Option<UiPage>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
    System,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConversationMessage {
    pub role: Role,
    pub content: String,
    pub timestamp: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub intent: Option<Intent>,
}

/// Replacement values for a session's document handles. `None` fields are
/// left untouched.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AssetUpdate {
    pub asset_id: Option<String>,
    pub revision_id: Option<String>,
    pub document: Option<UiPage>,
    pub code: Option<String>,
}

impl AssetUpdate {
    pub fn asset(asset_id: impl Into<String>) -> Self {
        Self {
            asset_id: Some(asset_id.into()),
            ..Self::default()
        }
    }

    pub fn with_revision(mut self, revision_id: impl Into<String>) -> Self {
        self.revision_id = Some(revision_id.into());
        self
    }

    pub fn with_document(mut self, document: UiPage) -> Self {
        self.document = Some(document);
        self
    }

    pub fn with_code(mut self, code: impl Into<String>) -> Self {
        self.code = Some(code.into());
        self
    }
}

/// What a caller needs to render the next turn
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContextSummary {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub asset_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub revision_id: Option<String>,
    pub has_document: bool,
    pub patch_count: usize,
    pub message_count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    pub session_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub asset_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub revision_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub document: Option<UiPage>,
    /// Generated code for the current document. Opaque here.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
    #[serde(default)]
    pub patch_history: Vec<PatchHistoryEntry>,
    #[serde(default)]
    pub conversation_history: Vec<ConversationMessage>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Session {
    pub fn new(session_id: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            session_id: session_id.into(),
            asset_id: None,
            revision_id: None,
            document: None,
            code: None,
            patch_history: Vec::new(),
            conversation_history: Vec::new(),
            created_at: now,
            updated_at: now,
        }
    }

    pub fn has_document(&self) -> bool {
        self.document.is_some()
    }

    pub fn update_asset(&mut self, update: AssetUpdate) {
        let AssetUpdate {
            asset_id,
            revision_id,
            document,
            code,
        } = update;

        if asset_id.is_some() {
            self.asset_id = asset_id;
        }
        if revision_id.is_some() {
            self.revision_id = revision_id;
        }
        if document.is_some() {
            self.document = document;
        }
        if code.is_some() {
            self.code = code;
        }
        self.touch();
    }

    /// Record a proposed patch and return its entry id. The inverse is
    /// taken from the current document, when there is one.
    pub fn add_patch(&mut self, patch: Patch) -> String {
        let id = new_id();
        let inverse = self
            .document
            .as_ref()
            .and_then(|document| inverse(document, &patch));
        self.patch_history.push(PatchHistoryEntry {
            id: id.clone(),
            timestamp: Utc::now(),
            patch,
            status: PatchStatus::Proposed,
            inverse,
            before: None,
            after: None,
        });
        self.touch();
        id
    }

    /// Append a message; returns its index in the conversation
    pub fn add_message(
        &mut self,
        role: Role,
        content: impl Into<String>,
        intent: Option<Intent>,
    ) -> usize {
        self.conversation_history.push(ConversationMessage {
            role,
            content: content.into(),
            timestamp: Utc::now(),
            intent,
        });
        self.touch();
        self.conversation_history.len() - 1
    }

    /// Mark a proposed entry applied and make `document` current.
    ///
    /// With `keep_snapshots`, the entry records the documents on both sides
    /// of the edit.
    pub fn confirm_patch(
        &mut self,
        entry_id: &str,
        document: UiPage,
        keep_snapshots: bool,
    ) -> Result<(), SessionError> {
        let index = self
            .patch_history
            .iter()
            .position(|entry| entry.id == entry_id)
            .ok_or_else(|| SessionError::EntryNotFound {
                session_id: self.session_id.clone(),
                entry_id: entry_id.to_string(),
            })?;

        if self.patch_history[index].status == PatchStatus::Applied {
            return Err(SessionError::EntryAlreadyApplied(entry_id.to_string()));
        }

        let before = self.document.replace(document);
        let entry = &mut self.patch_history[index];
        entry.status = PatchStatus::Applied;
        if keep_snapshots {
            entry.before = before;
            entry.after = self.document.clone();
        }
        self.touch();
        Ok(())
    }

    pub fn entry(&self, entry_id: &str) -> Option<&PatchHistoryEntry> {
        self.patch_history.iter().find(|entry| entry.id == entry_id)
    }

    pub fn pending_patches(&self) -> impl Iterator<Item = &PatchHistoryEntry> {
        self.patch_history
            .iter()
            .filter(|entry| entry.status == PatchStatus::Proposed)
    }

    pub fn context_summary(&self) -> ContextSummary {
        ContextSummary {
            asset_id: self.asset_id.clone(),
            revision_id: self.revision_id.clone(),
            has_document: self.has_document(),
            patch_count: self.patch_history.len(),
            message_count: self.conversation_history.len(),
        }
    }

    fn touch(&mut self) {
        self.updated_at = Utc::now();
    }
}
