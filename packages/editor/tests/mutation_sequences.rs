//! Tests for mutation sequences driven through an edit session
//!
//! This tests:
//! - Selection clearing on delete, undo and redo
//! - Undo/redo sequences and batches
//! - Drag and drop
//! - Session integrity after operations

use pagecraft_editor::{DragPayload, EditSession, EditorConfig, Mutation, NodeId, PageDescriptor};
use pagecraft_model::SettingsPath;
use pagecraft_registry::{Registry, TabKind};
use serde_json::json;
use std::sync::Arc;

fn empty_session() -> EditSession {
    EditSession::open(
        PageDescriptor::new("Home"),
        Some("[]"),
        Arc::new(Registry::builtin()),
        &EditorConfig::default(),
    )
}

fn first_column(session: &EditSession) -> NodeId {
    session.tree().roots()[0].children[0].id.clone()
}

#[test]
fn test_deleting_selected_container_clears_selection() {
    let mut session = empty_session();
    session.apply(Mutation::AddSection);
    let column = first_column(&session);

    let inner = session
        .apply(Mutation::AddWidget {
            parent_id: column.clone(),
            widget_type: "inner-section".to_string(),
        })
        .created
        .unwrap();
    let nested = session
        .apply(Mutation::AddWidget {
            parent_id: inner.clone(),
            widget_type: "button".to_string(),
        })
        .created
        .unwrap();

    assert!(session.select(Some(inner.clone())));
    assert_eq!(session.selection(), Some(&inner));

    let outcome = session.apply(Mutation::DeleteElement { node_id: inner.clone() });
    assert!(outcome.changed());
    assert_eq!(session.selection(), None);
    assert!(session.tree().find(&inner).is_none());
    assert!(session.tree().find(&nested).is_none());
    assert!(session.tree().find(&column).unwrap().children.is_empty());
}

#[test]
fn test_deleting_ancestor_of_selection_clears_it() {
    let mut session = empty_session();
    session.apply(Mutation::AddSection);
    let column = first_column(&session);
    let heading = session
        .apply(Mutation::AddWidget {
            parent_id: column,
            widget_type: "heading".to_string(),
        })
        .created
        .unwrap();
    let section = session.tree().roots()[0].id.clone();

    session.select(Some(heading));
    session.apply(Mutation::DeleteElement { node_id: section });
    assert_eq!(session.selection(), None);
    assert!(session.tree().is_empty());
}

#[test]
fn test_deleting_other_node_keeps_selection() {
    let mut session = empty_session();
    session.apply(Mutation::AddSection);
    let column = first_column(&session);
    let a = session
        .apply(Mutation::AddWidget {
            parent_id: column.clone(),
            widget_type: "heading".to_string(),
        })
        .created
        .unwrap();
    let b = session
        .apply(Mutation::AddWidget {
            parent_id: column,
            widget_type: "text".to_string(),
        })
        .created
        .unwrap();

    session.select(Some(a.clone()));
    session.apply(Mutation::DeleteElement { node_id: b });
    assert_eq!(session.selection(), Some(&a));
}

#[test]
fn test_undo_redo_sequence() {
    let mut session = empty_session();
    session.apply(Mutation::AddSection);
    let column = first_column(&session);
    let heading = session
        .apply(Mutation::AddWidget {
            parent_id: column,
            widget_type: "heading".to_string(),
        })
        .created
        .unwrap();
    let with_heading = session.tree().clone();

    session.select(Some(heading.clone()));
    session.set_selected_setting(SettingsPath::content("title"), json!("Welcome"));
    assert_eq!(
        session.tree().find(&heading).unwrap().settings.content_str("title"),
        Some("Welcome")
    );
    assert_eq!(session.history().undo_description(), Some("Set content.title"));

    assert!(session.undo());
    assert_eq!(session.tree(), &with_heading);

    // undoing the add removes the selected node
    assert!(session.undo());
    assert_eq!(session.selection(), None);

    assert!(session.redo());
    assert!(session.redo());
    assert_eq!(
        session.tree().find(&heading).unwrap().settings.content_str("title"),
        Some("Welcome")
    );
    assert!(!session.redo());
}

#[test]
fn test_batch_is_one_undo_step() {
    let mut session = empty_session();
    let outcomes = session.apply_batch(
        "Scaffold",
        vec![Mutation::AddSection, Mutation::AddSection, Mutation::AddSection],
    );
    assert!(outcomes.iter().all(|o| o.changed()));
    assert_eq!(session.tree().roots().len(), 3);
    assert_eq!(session.history().undo_levels(), 1);

    session.undo();
    assert!(session.tree().is_empty());
}

#[test]
fn test_drop_new_widget_from_palette() {
    let mut session = empty_session();
    session.apply(Mutation::AddSection);
    let column = first_column(&session);

    let payload = DragPayload::parse("heading").unwrap();
    let outcome = session.drop_payload(&payload, &column).unwrap();
    let heading = outcome.created.unwrap();
    assert_eq!(session.selection(), Some(&heading));

    // dropping on the heading inserts right after it
    let payload = DragPayload::parse(r#"{"widgetType":"button"}"#).unwrap();
    let first = session.drop_payload(&DragPayload::new_widget("spacer"), &column).unwrap();
    let button = session.drop_payload(&payload, &heading).unwrap().created.unwrap();

    let order: Vec<NodeId> = session
        .tree()
        .find(&column)
        .unwrap()
        .children
        .iter()
        .map(|w| w.id.clone())
        .collect();
    assert_eq!(order, vec![heading, button, first.created.unwrap()]);

    // add and reposition undo together
    assert!(session.undo());
    assert_eq!(session.tree().find(&column).unwrap().children.len(), 2);
}

#[test]
fn test_drop_existing_node_moves_it() {
    let mut session = empty_session();
    session.apply(Mutation::AddSection);
    session.apply(Mutation::AddSection);
    let source = first_column(&session);
    let destination = session.tree().roots()[1].children[0].id.clone();

    let heading = session
        .apply(Mutation::AddWidget {
            parent_id: source.clone(),
            widget_type: "heading".to_string(),
        })
        .created
        .unwrap();

    let payload = DragPayload::parse(&DragPayload::existing(heading.clone()).to_data()).unwrap();
    let outcome = session.drop_payload(&payload, &destination).unwrap();
    assert!(outcome.changed());
    assert!(session.tree().find(&source).unwrap().children.is_empty());
    assert_eq!(session.tree().parent_of(&heading).unwrap().id, destination);
}

#[test]
fn test_drop_without_target_is_ignored() {
    let mut session = empty_session();
    let before = session.tree().clone();
    assert!(session
        .drop_payload(&DragPayload::new_widget("heading"), &NodeId::new("nowhere"))
        .is_none());
    assert_eq!(session.tree(), &before);
}

#[test]
fn test_editor_for_selection() {
    let mut session = empty_session();
    assert!(session.editor_for_selection().is_none());

    session.apply(Mutation::AddSection);
    let column = first_column(&session);
    let image = session
        .apply(Mutation::AddWidget {
            parent_id: column,
            widget_type: "image".to_string(),
        })
        .created
        .unwrap();

    session.select(Some(image));
    let editor = session.editor_for_selection().unwrap();
    assert!(editor.tab(TabKind::Content).is_some());
    assert!(editor.tab(TabKind::Advanced).is_some());
    assert!(editor.control_for(&SettingsPath::content("image.alt")).is_some());
}

#[test]
fn test_select_unknown_node_is_ignored() {
    let mut session = empty_session();
    assert!(!session.select(Some(NodeId::new("ghost"))));
    assert_eq!(session.selection(), None);
}

#[test]
fn test_dirty_tracking() {
    let mut session = empty_session();
    assert!(!session.is_dirty());

    session.apply(Mutation::DeleteElement {
        node_id: NodeId::new("ghost"),
    });
    assert!(!session.is_dirty());

    session.apply(Mutation::AddSection);
    assert!(session.is_dirty());

    let page = session.page().published(chrono::Utc::now());
    session.mark_published(page);
    assert!(!session.is_dirty());
}
