//! Tests for longer patch sequences
//!
//! This tests:
//! - Move + rename + delete chains
//! - Undo/redo across invertible and snapshot-backed patches
//! - Batched patches
//! - Page integrity after operations

use canopy_document::{count_nodes, find_node, parse_page, UiNode, UiPage};
use canopy_editor::{apply, Direction, Patch, PatchEnvelope, Position, UndoStack};

const PAGE_JSON: &str = r#"{
    "id": "page-1",
    "title": "Pricing",
    "children": [
        {
            "type": "section",
            "id": "header",
            "children": [
                { "type": "component", "id": "title-1", "component": "Heading", "copy": "Plans" },
                { "type": "component", "id": "subtitle-1", "component": "Text", "copy": "Pick one" }
            ]
        },
        {
            "type": "grid",
            "id": "plans",
            "layout": { "columns": 3 },
            "children": [
                { "type": "component", "id": "plan-basic", "component": "Card", "props": { "price": 9 } },
                { "type": "component", "id": "plan-pro", "component": "Card", "props": { "price": 29 } }
            ]
        }
    ]
}"#;

fn page() -> UiPage {
    parse_page(PAGE_JSON).unwrap()
}

fn ids(nodes: &[UiNode]) -> Vec<&str> {
    nodes.iter().map(UiNode::id).collect()
}

#[test]
fn test_move_then_delete_sequence() {
    let mut page = page();
    let mut stack = UndoStack::new();

    stack.apply(&Patch::move_node("subtitle-1", "plans", Some(Position::Start)), &mut page, None);
    assert_eq!(
        ids(page.children[1].children().unwrap()),
        vec!["subtitle-1", "plan-basic", "plan-pro"]
    );

    stack.apply(&Patch::remove_node("header"), &mut page, None);
    assert_eq!(ids(&page.children), vec!["plans"]);
    assert!(find_node(&page, "title-1").is_none());

    assert!(stack.undo(&mut page, None).unwrap());
    assert!(find_node(&page, "title-1").is_some());

    assert!(stack.undo(&mut page, None).unwrap());
    assert_eq!(page, self::page());
}

#[test]
fn test_rename_move_remove_chain_keeps_node_count_consistent() {
    let original = page();
    let mut page = original.clone();
    let mut stack = UndoStack::new();
    let before = count_nodes(&page);

    stack.apply(&Patch::rename("plan-pro", "Pro plan"), &mut page, None);
    stack.apply(&Patch::move_node("plan-pro", "header", None), &mut page, None);
    assert_eq!(count_nodes(&page), before);

    stack.apply(&Patch::wrap_with("plan-pro", UiNode::section("pro-wrapper")), &mut page, None);
    assert_eq!(count_nodes(&page), before + 1);

    stack.apply(&Patch::remove_node("pro-wrapper"), &mut page, None);
    assert_eq!(count_nodes(&page), before - 1);

    while stack.can_undo() {
        stack.undo(&mut page, None).unwrap();
    }
    assert_eq!(page, original);

    while stack.can_redo() {
        stack.redo(&mut page, None).unwrap();
    }
    assert_eq!(count_nodes(&page), before - 1);
    assert!(find_node(&page, "plan-pro").is_none());
}

#[test]
fn test_token_and_prop_undo_restores_exact_json() {
    let original = page();
    let mut page = original.clone();
    let mut stack = UndoStack::new();

    stack.begin_batch();
    stack.set_batch_description("Restyle plans");
    stack.apply(&Patch::set_token("plans", "columns", 2), &mut page, None);
    stack.apply(&Patch::set_token("plans", "spacing.gap", "lg"), &mut page, None);
    stack.apply(&Patch::set_prop("plan-basic", "price", 12), &mut page, None);
    stack.apply(&Patch::set_prop("plan-basic", "badge", "Popular"), &mut page, None);
    stack.end_batch();

    assert_eq!(stack.undo_levels(), 1);
    assert_eq!(stack.undo_description(), Some("Restyle plans"));

    stack.undo(&mut page, None).unwrap();
    assert_eq!(
        serde_json::to_value(&page).unwrap(),
        serde_json::to_value(&original).unwrap()
    );
}

#[test]
fn test_reorder_round_trip_through_undo() {
    let original = page();
    let mut page = original.clone();
    let mut stack = UndoStack::new();

    stack.apply(&Patch::reorder("plan-pro", Direction::Up), &mut page, None);
    assert_eq!(
        ids(page.children[1].children().unwrap()),
        vec!["plan-pro", "plan-basic"]
    );

    stack.undo(&mut page, None).unwrap();
    assert_eq!(page, original);
}

#[test]
fn test_patches_replay_from_json() {
    let patches: Vec<Patch> = serde_json::from_str(
        r#"[
            { "targetId": "title-1", "op": "setCopy", "args": { "value": "Pricing plans" } },
            { "targetId": "plans", "op": "addNode",
              "args": { "node": { "type": "component", "id": "plan-team", "component": "Card" } } },
            { "targetId": "plan-team", "op": "reorder", "args": { "direction": "up" } },
            { "targetId": "header", "op": "removeNode" }
        ]"#,
    )
    .unwrap();

    let mut page = page();
    for patch in &patches {
        let outcome = apply(&page, patch, None);
        assert!(outcome.is_applied(), "{:?}", outcome.diagnostics);
        page = outcome.page;
    }

    assert_eq!(ids(&page.children), vec!["plans"]);
    assert_eq!(
        ids(page.children[0].children().unwrap()),
        vec!["plan-basic", "plan-team", "plan-pro"]
    );
}

#[test]
fn test_patch_json_round_trip_preserves_wire_shape() {
    let json = r#"{"targetId":"plan-pro","op":"moveNode","args":{"toParentId":"header","position":"start"}}"#;
    let patch: Patch = serde_json::from_str(json).unwrap();
    assert_eq!(patch, Patch::move_node("plan-pro", "header", Some(Position::Start)));

    let envelope = PatchEnvelope::from(patch);
    assert_eq!(
        serde_json::to_value(&envelope).unwrap(),
        serde_json::from_str::<serde_json::Value>(json).unwrap()
    );
}
