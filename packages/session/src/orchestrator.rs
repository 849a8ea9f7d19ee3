//! # Turn Orchestration
//!
//! One user message in, one proposal out:
//!
//! ```text
//! message ─► conversation history ─► classify
//!                                       │ edit/patch + document
//!                                       ▼
//!                                     parse ─► patch history (proposed)
//!                                       │
//!                                       ▼
//!                                  TurnOutcome
//! ```
//!
//! Nothing here applies a patch. The caller runs the engine on the
//! proposals it accepts and reports each result back through
//! [`SessionStore::update_session_after_patch`].

use crate::session::{ContextSummary, Role};
use crate::store::{lock, SessionStore};
use canopy_document::Diagnostic;
use canopy_editor::Patch;
use canopy_intent::{classify, parse, ClassifyContext, IntentClassification};
use serde::Serialize;
use tracing::{debug, instrument};

/// A parsed patch and the history entry recording it
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProposedPatch {
    pub entry_id: String,
    pub patch: Patch,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TurnOutcome {
    pub session_id: String,
    pub classification: IntentClassification,
    pub patches: Vec<ProposedPatch>,
    pub diagnostics: Vec<Diagnostic>,
    /// Parser confidence, 0.0 when the parser did not run or matched nothing
    pub confidence: f64,
    pub context: ContextSummary,
}

impl TurnOutcome {
    pub fn has_patches(&self) -> bool {
        !self.patches.is_empty()
    }
}

pub struct Orchestrator<'a> {
    store: &'a SessionStore,
}

impl<'a> Orchestrator<'a> {
    pub fn new(store: &'a SessionStore) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &'a SessionStore {
        self.store
    }

    /// Run one turn for `session_id`, creating the session if needed.
    ///
    /// `target_id` is the node the user has selected, if any. Without it
    /// the parser looks for an id in the message.
    #[instrument(skip(self, message))]
    pub fn handle_message(
        &self,
        session_id: &str,
        message: &str,
        target_id: Option<&str>,
    ) -> TurnOutcome {
        let handle = self.store.get_or_create_session(session_id);
        let mut session = lock(&handle);

        let index = session.add_message(Role::User, message, None);

        let context = ClassifyContext {
            has_existing_dsl: session.has_document(),
            current_asset_id: session.asset_id.clone(),
        };
        let classification = classify(message, &context);
        session.conversation_history[index].intent = Some(classification.intent);

        let mut patches = Vec::new();
        let mut diagnostics = Vec::new();
        let mut confidence = 0.0;

        let parsed = match &session.document {
            Some(document) if classification.intent.targets_document() => {
                let target = target_id.or(classification.target_id.as_deref());
                Some(parse(message, document, target))
            }
            _ => None,
        };

        if let Some(outcome) = parsed {
            confidence = outcome.confidence;
            diagnostics = outcome.diagnostics;
            for patch in outcome.patches {
                let entry_id = session.add_patch(patch.clone());
                patches.push(ProposedPatch { entry_id, patch });
            }
        }

        debug!(
            intent = %classification.intent,
            proposed = patches.len(),
            confidence,
            "Turn handled"
        );

        TurnOutcome {
            session_id: session.session_id.clone(),
            classification,
            patches,
            diagnostics,
            confidence,
            context: session.context_summary(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::AssetUpdate;
    use crate::PatchStatus;
    use canopy_document::{UiNode, UiPage};
    use canopy_intent::Intent;

    fn page() -> UiPage {
        UiPage::new("page-1", "").with_child(
            UiNode::section("hero").with_children(vec![UiNode::component("button-1", "Button")]),
        )
    }

    #[test]
    fn test_no_document_does_not_parse() {
        let store = SessionStore::new();
        let outcome = Orchestrator::new(&store).handle_message("s1", "create a landing page", None);

        assert_eq!(outcome.classification.intent, Intent::Generate);
        assert!(!outcome.has_patches());
        assert_eq!(outcome.confidence, 0.0);
        assert_eq!(outcome.context.message_count, 1);
        assert!(!outcome.context.has_document);
    }

    #[test]
    fn test_edit_records_proposed_patches() {
        let store = SessionStore::new();
        store.get_or_create_session("s1");
        store
            .update_session_asset("s1", AssetUpdate::asset("asset-1").with_document(page()))
            .unwrap();

        let outcome =
            Orchestrator::new(&store).handle_message("s1", "change variant to outline", Some("button-1"));

        assert_eq!(outcome.classification.intent, Intent::Edit);
        assert_eq!(outcome.patches.len(), 1);
        assert_eq!(outcome.context.asset_id.as_deref(), Some("asset-1"));
        assert_eq!(outcome.context.patch_count, 1);

        let session = store.snapshot("s1").unwrap();
        let entry = session.entry(&outcome.patches[0].entry_id).unwrap();
        assert_eq!(entry.status, PatchStatus::Proposed);
        assert_eq!(session.conversation_history[0].intent, Some(Intent::Edit));
        // the orchestrator never applies
        assert_eq!(session.document, Some(page()));
    }
}
