//! End-to-end conversation turns: propose, apply, confirm

use canopy_document::{find_node, UiNode, UiPage};
use canopy_editor::{apply, Patch, PatchOp};
use canopy_intent::Intent;
use canopy_session::{
    global_store, AssetUpdate, Orchestrator, PatchStatus, Role, SessionError, SessionStore,
};

fn landing_page() -> UiPage {
    UiPage::new("page-1", "Landing")
        .with_child(UiNode::section("hero").with_children(vec![
            UiNode::component("heading-1", "Heading").with_copy("Welcome"),
            UiNode::component("button-1", "Button").with_copy("Start"),
        ]))
        .with_child(UiNode::section("footer"))
}

fn store_with_document(session_id: &str) -> SessionStore {
    let store = SessionStore::new();
    store.get_or_create_session(session_id);
    store
        .update_session_asset(
            session_id,
            AssetUpdate::asset("asset-1")
                .with_revision("rev-1")
                .with_document(landing_page()),
        )
        .unwrap();
    store
}

/// Apply every proposal of a turn the way a caller would
fn confirm_all(store: &SessionStore, session_id: &str, outcome: &canopy_session::TurnOutcome) {
    for proposal in &outcome.patches {
        let current = store.snapshot(session_id).unwrap().document.unwrap();
        let applied = apply(&current, &proposal.patch, None);
        assert!(applied.is_applied(), "{:?}", applied.diagnostics);
        store
            .update_session_after_patch(session_id, &proposal.entry_id, applied.page)
            .unwrap();
    }
}

#[test]
fn test_turn_then_confirm_updates_document() {
    let store = store_with_document("s1");
    let orchestrator = Orchestrator::new(&store);

    let outcome = orchestrator.handle_message("s1", r#"change text to "Buy now""#, Some("button-1"));
    assert_eq!(outcome.patches.len(), 1);
    confirm_all(&store, "s1", &outcome);

    let session = store.snapshot("s1").unwrap();
    let document = session.document.as_ref().unwrap();
    let button = find_node(document, "button-1").unwrap();
    assert_eq!(
        button.as_node().unwrap().as_component().unwrap().copy.as_deref(),
        Some("Buy now")
    );

    let entry = &session.patch_history[0];
    assert_eq!(entry.status, PatchStatus::Applied);
    assert_eq!(entry.before, Some(landing_page()));
    assert_eq!(entry.after.as_ref(), Some(document));
}

#[test]
fn test_history_inverse_undoes_confirmed_edit() {
    let store = store_with_document("s1");
    let orchestrator = Orchestrator::new(&store);

    let outcome = orchestrator.handle_message("s1", r#"change text to "Buy now""#, Some("button-1"));
    confirm_all(&store, "s1", &outcome);

    let session = store.snapshot("s1").unwrap();
    let entry = &session.patch_history[0];
    let undo = entry.inverse.as_ref().unwrap();
    assert_eq!(undo, &Patch::set_copy("button-1", "Start"));

    let restored = apply(session.document.as_ref().unwrap(), undo, None);
    assert!(restored.is_applied());
    assert_eq!(restored.page, landing_page());
}

#[test]
fn test_removal_has_no_recorded_inverse() {
    let store = store_with_document("s1");
    let outcome = Orchestrator::new(&store).handle_message("s1", "delete it", Some("heading-1"));

    let session = store.snapshot("s1").unwrap();
    assert_eq!(outcome.patches.len(), 1);
    assert!(session.patch_history[0].inverse.is_none());
}

#[test]
fn test_target_taken_from_message() {
    let store = store_with_document("s1");
    let outcome = Orchestrator::new(&store).handle_message("s1", "delete #heading-1", None);

    assert_eq!(outcome.classification.intent, Intent::Patch);
    assert_eq!(outcome.patches.len(), 1);
    assert_eq!(outcome.patches[0].patch.op, PatchOp::RemoveNode);
    assert_eq!(outcome.patches[0].patch.target_id, "heading-1");
}

#[test]
fn test_unconfirmed_proposals_stay_proposed() {
    let store = store_with_document("s1");
    let orchestrator = Orchestrator::new(&store);

    orchestrator.handle_message("s1", "delete it", Some("button-1"));
    orchestrator.handle_message("s1", "move it up", Some("button-1"));

    let session = store.snapshot("s1").unwrap();
    assert_eq!(session.patch_history.len(), 2);
    assert_eq!(session.pending_patches().count(), 2);
    assert_eq!(session.document, Some(landing_page()));
}

#[test]
fn test_conversation_history_records_intents_in_order() {
    let store = store_with_document("s1");
    let orchestrator = Orchestrator::new(&store);

    orchestrator.handle_message("s1", "remove the button", Some("button-1"));
    store
        .add_message_to_history("s1", Role::Assistant, "Removed the button.", None)
        .unwrap();
    orchestrator.handle_message("s1", "hmm", None);

    let history = store.snapshot("s1").unwrap().conversation_history;
    let summary: Vec<_> = history.iter().map(|m| (m.role, m.intent)).collect();
    assert_eq!(
        summary,
        vec![
            (Role::User, Some(Intent::Patch)),
            (Role::Assistant, None),
            (Role::User, Some(Intent::Edit)),
        ]
    );
}

#[test]
fn test_context_summary_reflects_asset() {
    let store = store_with_document("s1");
    let outcome = Orchestrator::new(&store).handle_message("s1", "looks good", None);

    assert_eq!(outcome.context.asset_id.as_deref(), Some("asset-1"));
    assert_eq!(outcome.context.revision_id.as_deref(), Some("rev-1"));
    assert!(outcome.context.has_document);
    assert_eq!(outcome.context.message_count, 1);
}

#[test]
fn test_confirming_unknown_entry_fails() {
    let store = store_with_document("s1");
    let result = store.update_session_after_patch("s1", "no-such-entry", landing_page());
    assert!(matches!(result, Err(SessionError::EntryNotFound { .. })));
}

#[test]
fn test_global_store_is_shared() {
    let id = "global-store-test";
    global_store().get_or_create_session(id);
    assert!(global_store().contains(id));
    assert!(global_store().remove(id));
}

#[test]
fn test_outcome_serializes_camel_case() {
    let store = store_with_document("s1");
    let outcome = Orchestrator::new(&store).handle_message("s1", "delete it", Some("button-1"));

    let json = serde_json::to_value(&outcome).unwrap();
    assert_eq!(json["sessionId"], "s1");
    assert_eq!(json["classification"]["intent"], "patch");
    assert!(json["patches"][0]["entryId"].is_string());
    assert_eq!(json["patches"][0]["patch"]["targetId"], "button-1");
    assert_eq!(json["context"]["hasDocument"], true);
}
