//! # Pagecraft Model
//!
//! The page-composition document: a recursive tree of sections, columns and
//! widgets, plus the settings every node carries.
//!
//! ## Structure
//!
//! ```text
//! PageTree
//!  └─ section            (children: columns only)
//!      └─ column         (children: widgets only)
//!          └─ widget     (children: columns, only for container-like types)
//!              └─ column ...
//! ```
//!
//! Nothing in this crate mutates a tree in response to user actions; the
//! mutation engine lives in `pagecraft-editor`. This crate gives the engine
//! and the renderers a shared vocabulary: node types, id generation,
//! read-only queries, structural validation and the virtual DOM that
//! renderers emit.

pub mod advanced;
pub mod error;
pub mod id_generator;
pub mod node;
pub mod settings;
pub mod tree;
pub mod vdom;
pub mod visitor;

pub use advanced::*;
pub use error::SettingsError;
pub use id_generator::{get_document_id, IdGenerator};
pub use node::{Node, NodeId, NodeKind};
pub use settings::{Settings, SettingsMap, SettingsPath, SettingsScope};
pub use tree::{is_container_like, PageTree, StructureViolation, WidgetCatalog};
pub use vdom::{CssRule, VNode, VirtualDomDocument};
pub use visitor::{Visitor, VisitorMut};
