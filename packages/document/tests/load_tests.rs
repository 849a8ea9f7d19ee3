//! Loading and saving pages from disk

use canopy_document::{load_page, parse_page, save_page, DocumentError, UiNode, UiPage};

#[test]
fn test_save_then_load_preserves_page() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("page.json");

    let page = UiPage::new("page-1", "Pricing").with_child(
        UiNode::grid("plans").with_children(vec![
            UiNode::component("card-basic", "Card").with_copy("Basic"),
            UiNode::component("card-pro", "Card")
                .with_copy("Pro")
                .with_variant("outline"),
        ]),
    );

    save_page(&path, &page).unwrap();
    let loaded = load_page(&path).unwrap();

    assert_eq!(loaded, page);
}

#[test]
fn test_duplicate_ids_are_rejected() {
    let json = r#"{
        "id": "p",
        "title": "Dup",
        "children": [
            { "type": "component", "id": "x", "component": "Button" },
            { "type": "section", "id": "s", "children": [
                { "type": "component", "id": "x", "component": "Text" }
            ] }
        ]
    }"#;

    match parse_page(json) {
        Err(DocumentError::DuplicateId(id)) => assert_eq!(id, "x"),
        other => panic!("expected duplicate id error, got {:?}", other),
    }
}

#[test]
fn test_missing_file_is_io_error() {
    let dir = tempfile::tempdir().unwrap();
    let result = load_page(&dir.path().join("nope.json"));
    assert!(matches!(result, Err(DocumentError::Io(_))));
}

#[test]
fn test_malformed_json_is_json_error() {
    assert!(matches!(parse_page("{ not json"), Err(DocumentError::Json(_))));
}
