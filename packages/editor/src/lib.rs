//! # Pagecraft Editor
//!
//! The editing engine for Pagecraft pages.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │ content store: JSON array or legacy text    │
//! └─────────────────────────────────────────────┘
//!                     ↓ serializer
//! ┌─────────────────────────────────────────────┐
//! │ editor: EditSession                         │
//! │  - pure mutations over PageTree             │
//! │  - undo/redo snapshots                      │
//! │  - selection, hover, drag and drop          │
//! │  - publish state machine                    │
//! └─────────────────────────────────────────────┘
//!                     ↓
//! ┌─────────────────────────────────────────────┐
//! │ compiler-html: tree → virtual DOM → HTML    │
//! └─────────────────────────────────────────────┘
//! ```
//!
//! ## Core Principles
//!
//! 1. **Mutations are pure**: every edit returns a new tree
//! 2. **Misses are no-ops**: a stale id never corrupts a page
//! 3. **Loading is total**: any stored string becomes a valid tree
//! 4. **The session owns references**: selection never outlives its node
//!
//! ## Usage
//!
//! ```rust,ignore
//! use pagecraft_editor::{EditSession, EditorConfig, Mutation, PageDescriptor};
//!
//! let page = PageDescriptor::new("About").with_legacy_content("<p>Hello</p>");
//! let mut session = EditSession::open(page, None, Arc::new(Registry::builtin()), &EditorConfig::default());
//!
//! session.apply(Mutation::AddSection);
//! let html = session.to_html();
//! let stored = session.serialize()?;
//! ```

mod config;
mod drag;
mod errors;
mod media;
mod mutations;
mod publish;
mod serializer;
mod session;
mod undo_stack;

pub use config::{EditorConfig, CONFIG_FILE};
pub use drag::{resolve_drop_target, DragPayload, DropTarget};
pub use errors::{EditorError, MediaError, PublishError, StoreError};
pub use media::{mime_for, read_data_url};
pub use mutations::{
    accepts_widgets, add_section, add_widget, delete_element, duplicate_element, move_element,
    set_setting, update_settings, Mutation, MutationMiss, MutationOutcome,
};
pub use publish::{ContentStore, MemoryStore, PageDescriptor, Publisher, SaveState, SaveStatus};
pub use serializer::{deserialize, is_trivial_legacy, serialize, DocumentSource, LoadedDocument, Repair};
pub use session::EditSession;
pub use undo_stack::{MutationBatch, UndoStack};

// Re-export common types for convenience
pub use pagecraft_compiler_html::RenderMode;
pub use pagecraft_model::{NodeId, PageTree, VirtualDomDocument};
