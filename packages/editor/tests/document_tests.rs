//! Loading, publishing and media through an edit session

use anyhow::Result;
use pagecraft_editor::{
    read_data_url, ContentStore, DocumentSource, EditSession, EditorConfig, EditorError, MediaError,
    MemoryStore, Mutation, NodeId, PageDescriptor, PublishError, Publisher, SaveState,
};
use pagecraft_model::{get_document_id, SettingsPath};
use pagecraft_registry::{MediaKind, Registry};
use serde_json::json;
use std::sync::Arc;
use std::time::{Duration, Instant};

fn open(page: PageDescriptor, stored: Option<&str>) -> EditSession {
    EditSession::open(page, stored, Arc::new(Registry::builtin()), &EditorConfig::default())
}

#[test]
fn test_legacy_page_is_migrated() {
    let session = open(PageDescriptor::new("About"), Some("<p>Hello</p>"));

    assert_eq!(session.source(), DocumentSource::Legacy);
    assert!(session.is_dirty());

    let roots = session.tree().roots();
    assert_eq!(roots.len(), 2);
    let heading = &roots[0].children[0].children[0];
    assert_eq!(heading.widget_type(), Some("heading"));
    assert_eq!(heading.settings.content_str("title"), Some("About"));
    let text = &roots[1].children[0].children[0];
    assert_eq!(text.widget_type(), Some("text"));
    assert_eq!(text.settings.content_str("text"), Some("<p>Hello</p>"));

    let html = session.to_html();
    assert!(html.contains("<title>About</title>"));
    assert!(html.contains("<p>Hello</p>"));
}

#[test]
fn test_descriptor_legacy_content_used_when_nothing_stored() {
    let page = PageDescriptor::new("Team").with_legacy_content("<p>We build pages</p>");
    let session = open(page, None);

    assert_eq!(session.tree().roots().len(), 2);
    // the descriptor is never rewritten by the migration
    assert_eq!(session.page().legacy_content.as_deref(), Some("<p>We build pages</p>"));
}

#[test]
fn test_stored_tree_wins_over_legacy_content() -> Result<()> {
    let mut first = open(PageDescriptor::new("Home"), Some("[]"));
    first.apply(Mutation::AddSection);
    let stored = first.serialize()?;

    let page = PageDescriptor::new("Home").with_legacy_content("<p>old</p>");
    let second = open(page, Some(&stored));

    assert_eq!(second.source(), DocumentSource::Tree);
    assert!(!second.is_dirty());
    assert_eq!(second.tree(), first.tree());
    Ok(())
}

#[test]
fn test_fixed_id_seed() {
    let config = EditorConfig {
        id_seed: Some("fixed".to_string()),
        ..EditorConfig::default()
    };
    let session = EditSession::open(
        PageDescriptor::new("Home"),
        None,
        Arc::new(Registry::builtin()),
        &config,
    );
    assert!(session.tree().ids().iter().all(|id| id.as_str().starts_with("fixed-")));
}

#[test]
fn test_stored_id_at_counter_limit_does_not_break_edits() {
    let huge = format!("{}-{}", get_document_id("Home"), u64::MAX);
    let stored = json!([{ "id": huge, "kind": "section", "children": [{ "id": "c", "kind": "column" }] }]);
    let mut session = open(PageDescriptor::new("Home"), Some(&stored.to_string()));

    assert!(session.is_dirty());
    let outcome = session.apply(Mutation::AddSection);
    assert!(outcome.changed());
    assert_eq!(session.tree().roots().len(), 2);
    assert!(session.tree().validate(session.registry()).is_ok());
}

#[tokio::test]
async fn test_publish_round_trip() -> Result<()> {
    let store = MemoryStore::with_content("<p>Legacy</p>");
    let stored = store.load().await?;
    let mut session = open(PageDescriptor::new("About"), stored.as_deref());
    let publisher = Publisher::from_config(store, &EditorConfig::default());

    let document = session.serialize()?;
    let published = publisher.publish(&document, session.page()).await?;
    assert!(published.updated_at.is_some());
    assert_eq!(published.name, "About");
    session.mark_published(published);
    assert!(!session.is_dirty());

    assert_eq!(publisher.status_at(Instant::now()), SaveState::Saved);
    assert_eq!(
        publisher.status_at(Instant::now() + Duration::from_secs(3)),
        SaveState::Idle
    );

    // what was stored reloads to the same tree
    let reloaded = open(PageDescriptor::new("About"), publisher.store().load().await?.as_deref());
    assert_eq!(reloaded.source(), DocumentSource::Tree);
    assert_eq!(reloaded.tree(), session.tree());
    Ok(())
}

#[tokio::test]
async fn test_failed_publish_keeps_tree() -> Result<()> {
    let mut session = open(PageDescriptor::new("About"), None);
    session.apply(Mutation::AddSection);
    let before = session.tree().clone();

    let store = MemoryStore::new();
    store.set_failing(true);
    let publisher = Publisher::new(store, Duration::from_millis(2000));

    let result = publisher.publish(&session.serialize()?, session.page()).await;
    assert!(matches!(result, Err(PublishError::Store(_))));
    assert!(matches!(publisher.status_at(Instant::now()), SaveState::Error(_)));
    assert_eq!(session.tree(), &before);
    assert!(session.is_dirty());

    // manual retry succeeds once the store recovers
    publisher.store().set_failing(false);
    publisher.publish(&session.serialize()?, session.page()).await?;
    assert_eq!(publisher.store().save_count(), 1);
    Ok(())
}

#[tokio::test]
async fn test_concurrent_publish_is_refused() -> Result<()> {
    let session = open(PageDescriptor::new("About"), None);
    let document = session.serialize()?;
    let publisher = Publisher::new(
        MemoryStore::new().with_latency(Duration::from_millis(50)),
        Duration::from_millis(2000),
    );

    let (first, second) = tokio::join!(
        publisher.publish(&document, session.page()),
        publisher.publish(&document, session.page())
    );

    assert!(first.is_ok());
    assert!(matches!(second, Err(PublishError::SaveInProgress)));
    assert_eq!(publisher.store().save_count(), 1);
    Ok(())
}

fn media_file(name: &str, bytes: &[u8]) -> std::io::Result<std::path::PathBuf> {
    let dir = std::env::temp_dir().join(format!("pagecraft-doc-media-{}", std::process::id()));
    std::fs::create_dir_all(&dir)?;
    let file = dir.join(name);
    std::fs::write(&file, bytes)?;
    Ok(file)
}

fn session_with_image() -> (EditSession, NodeId) {
    let mut session = open(PageDescriptor::new("Home"), Some("[]"));
    session.apply(Mutation::AddSection);
    let column = session.tree().roots()[0].children[0].id.clone();
    let image = session
        .apply(Mutation::AddWidget {
            parent_id: column,
            widget_type: "image".to_string(),
        })
        .created
        .expect("image created");
    (session, image)
}

#[tokio::test]
async fn test_media_upload_updates_image() -> Result<()> {
    let file = media_file("logo.gif", b"GIF89a")?;
    let (mut session, image) = session_with_image();

    let levels = session.history().undo_levels();
    let outcome = session
        .embed_media(&image, &SettingsPath::content("image"), &file)
        .await?;

    assert!(outcome.changed());
    assert_eq!(session.history().undo_levels(), levels + 1);
    let node = session.tree().find(&image).expect("image present");
    assert_eq!(
        node.settings.content["image"]["url"],
        json!("data:image/gif;base64,R0lGODlh")
    );
    assert_eq!(node.settings.content["image"]["alt"], json!(""));

    // the same bytes through the plain reader
    let url = read_data_url(&file, MediaKind::Image, EditorConfig::default().max_media_bytes).await?;
    assert_eq!(node.settings.content["image"]["url"], json!(url));
    Ok(())
}

#[tokio::test]
async fn test_media_upload_respects_configured_limit() -> Result<()> {
    let file = media_file("big.png", &[0u8; 64])?;
    let config = EditorConfig {
        max_media_bytes: 16,
        ..EditorConfig::default()
    };
    let mut session = EditSession::open(
        PageDescriptor::new("Home"),
        Some("[]"),
        Arc::new(Registry::builtin()),
        &config,
    );
    session.apply(Mutation::AddSection);
    let column = session.tree().roots()[0].children[0].id.clone();
    let image = session
        .apply(Mutation::AddWidget {
            parent_id: column,
            widget_type: "image".to_string(),
        })
        .created
        .expect("image created");
    let before = session.tree().clone();

    let result = session
        .embed_media(&image, &SettingsPath::content("image"), &file)
        .await;
    assert!(matches!(
        result,
        Err(EditorError::Media(MediaError::TooLarge { size: 64, limit: 16, .. }))
    ));
    assert_eq!(session.tree(), &before);
    Ok(())
}

#[tokio::test]
async fn test_media_upload_needs_a_media_control() -> Result<()> {
    let png = media_file("dot.png", b"\x89PNG")?;
    let clip = media_file("clip.mp4", b"....")?;
    let (mut session, image) = session_with_image();
    let before = session.tree().clone();

    let result = session
        .embed_media(&image, &SettingsPath::content("caption"), &png)
        .await;
    assert!(matches!(
        result,
        Err(EditorError::Media(MediaError::NotAMediaControl { .. }))
    ));

    let result = session
        .embed_media(&image, &SettingsPath::content("image"), &clip)
        .await;
    assert!(matches!(
        result,
        Err(EditorError::Media(MediaError::UnsupportedType(_)))
    ));

    // background images live under the shared advanced tab
    session
        .embed_media(&image, &SettingsPath::advanced("background.normal.image"), &png)
        .await?;
    let node = session.tree().find(&image).expect("image present");
    assert!(node.settings.advanced.background.normal.image.as_deref().map_or(false, |url| url.starts_with("data:image/png;base64,")));
    assert_ne!(session.tree(), &before);
    Ok(())
}
