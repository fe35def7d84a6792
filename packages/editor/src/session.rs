//! # Edit Session Management
//!
//! One user's view of one page: the current tree, the selection and hover
//! references, undo history and the render settings.
//!
//! The session is the only owner of the tree and the selected id. Mutations
//! are pure, so keeping the selection consistent with the tree is this
//! layer's job: whenever an edit, undo or redo removes the selected node,
//! the selection is cleared.

use crate::drag::{resolve_drop_target, DragPayload};
use crate::media::read_data_url;
use crate::serializer::{self, DocumentSource, LoadedDocument};
use crate::{EditorConfig, EditorError, MediaError, Mutation, MutationOutcome, PageDescriptor, UndoStack};
use pagecraft_compiler_html::{compile_page, render_tree, CompileOptions, RenderMode};
use pagecraft_model::{IdGenerator, Node, NodeId, PageTree, SettingsPath, VirtualDomDocument};
use pagecraft_registry::{ControlKind, MediaKind, Registry, SettingsEditor, Theme};
use serde_json::Value;
use std::path::Path;
use std::sync::Arc;
use tracing::{debug, info};

pub struct EditSession {
    page: PageDescriptor,
    tree: PageTree,
    source: DocumentSource,
    ids: IdGenerator,
    registry: Arc<Registry>,
    theme: Theme,
    render_options: CompileOptions,
    max_media_bytes: u64,
    history: UndoStack,
    selected: Option<NodeId>,
    hovered: Option<NodeId>,
    dirty: bool,
}

impl EditSession {
    /// Open `page` from whatever the content store returned.
    ///
    /// With nothing stored, the page's legacy content is migrated instead.
    pub fn open(page: PageDescriptor, stored: Option<&str>, registry: Arc<Registry>, config: &EditorConfig) -> Self {
        let mut ids = match &config.id_seed {
            Some(seed) => IdGenerator::from_seed(seed.clone()),
            None => IdGenerator::new(&page.name),
        };

        let input = stored.or(page.legacy_content.as_deref()).unwrap_or("");
        let LoadedDocument { tree, source, repairs } = serializer::deserialize(input, &page.name, &registry, &mut ids);
        info!(page = %page.name, ?source, repairs = repairs.len(), "Opened page");

        Self {
            page,
            tree,
            source,
            ids,
            registry,
            theme: config.theme.clone(),
            render_options: config.render.clone(),
            max_media_bytes: config.max_media_bytes,
            history: UndoStack::with_max_levels(config.undo_levels),
            selected: None,
            hovered: None,
            // a migrated or repaired page differs from what is stored
            dirty: source != DocumentSource::Tree || !repairs.is_empty(),
        }
    }

    pub fn page(&self) -> &PageDescriptor {
        &self.page
    }

    pub fn tree(&self) -> &PageTree {
        &self.tree
    }

    pub fn source(&self) -> DocumentSource {
        self.source
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    pub fn history(&self) -> &UndoStack {
        &self.history
    }

    /// Whether the tree has changed since it was loaded or last published
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub fn apply(&mut self, mutation: Mutation) -> MutationOutcome {
        let outcome = self
            .history
            .apply(&mutation, &mut self.tree, &self.registry, &mut self.ids);
        if outcome.changed() {
            self.dirty = true;
            self.prune_references();
        }
        outcome
    }

    /// Apply several mutations as one undo step
    pub fn apply_batch(&mut self, description: &str, mutations: Vec<Mutation>) -> Vec<MutationOutcome> {
        self.history.begin_batch();
        self.history.set_batch_description(description);
        let outcomes = mutations.into_iter().map(|m| self.apply(m)).collect();
        self.history.end_batch();
        outcomes
    }

    pub fn undo(&mut self) -> bool {
        let undone = self.history.undo(&mut self.tree);
        if undone {
            self.dirty = true;
            self.prune_references();
        }
        undone
    }

    pub fn redo(&mut self) -> bool {
        let redone = self.history.redo(&mut self.tree);
        if redone {
            self.dirty = true;
            self.prune_references();
        }
        redone
    }

    /// Select a node, or clear the selection with `None`. Unknown ids are ignored.
    pub fn select(&mut self, id: Option<NodeId>) -> bool {
        match id {
            Some(id) if !self.tree.contains(&id) => {
                debug!(%id, "Ignoring selection of unknown node");
                false
            }
            id => {
                self.selected = id;
                true
            }
        }
    }

    pub fn hover(&mut self, id: Option<NodeId>) {
        self.hovered = id.filter(|id| self.tree.contains(id));
    }

    pub fn selection(&self) -> Option<&NodeId> {
        self.selected.as_ref()
    }

    pub fn hovered(&self) -> Option<&NodeId> {
        self.hovered.as_ref()
    }

    pub fn selected_node(&self) -> Option<&Node> {
        self.selected.as_ref().and_then(|id| self.tree.find(id))
    }

    /// Settings panel contract for the selected node
    pub fn editor_for_selection(&self) -> Option<&SettingsEditor> {
        self.selected_node()
            .map(|node| self.registry.editor_for_kind(&node.kind))
    }

    /// Write one settings field of the selected node
    pub fn set_selected_setting(&mut self, path: SettingsPath, value: Value) -> Option<MutationOutcome> {
        let node_id = self.selected.clone()?;
        Some(self.apply(Mutation::SetSetting { node_id, path, value }))
    }

    /// Embed a local file through the media control at `path` of `node_id`.
    ///
    /// The file is read first and the tree then changes through a single
    /// settings update. Controls holding an object (`{ url, alt }`) get the
    /// data URL under `url`.
    pub async fn embed_media(
        &mut self,
        node_id: &NodeId,
        path: &SettingsPath,
        file: &Path,
    ) -> Result<MutationOutcome, EditorError> {
        let accept = self
            .media_control(node_id, path)
            .ok_or_else(|| MediaError::NotAMediaControl {
                node: node_id.clone(),
                path: path.to_string(),
            })?;
        let url = read_data_url(file, accept, self.max_media_bytes).await?;

        let mut target = path.clone();
        if let Some(Value::Object(_)) = self.tree.find(node_id).and_then(|n| n.settings.get(path)) {
            target.segments.push("url".to_string());
        }
        Ok(self.apply(Mutation::SetSetting {
            node_id: node_id.clone(),
            path: target,
            value: Value::String(url),
        }))
    }

    fn media_control(&self, node_id: &NodeId, path: &SettingsPath) -> Option<MediaKind> {
        let node = self.tree.find(node_id)?;
        match self.registry.editor_for_kind(&node.kind).control_for(path)?.kind {
            ControlKind::Media { accept } => Some(accept),
            _ => None,
        }
    }

    /// Handle a drop of `payload` on the node under the pointer.
    ///
    /// New widgets are selected once placed. `None` when the drop has no
    /// valid target; the tree is left alone.
    pub fn drop_payload(&mut self, payload: &DragPayload, on: &NodeId) -> Option<MutationOutcome> {
        let target = resolve_drop_target(&self.tree, &self.registry, on)?;

        match payload {
            DragPayload::NewWidget { widget_type } => {
                let add = Mutation::AddWidget {
                    parent_id: target.parent_id.clone(),
                    widget_type: widget_type.clone(),
                };

                let outcome = match target.index {
                    None => self.apply(add),
                    Some(index) => self.add_at(add, &target.parent_id, index),
                };
                if let Some(created) = &outcome.created {
                    self.selected = Some(created.clone());
                }
                Some(outcome)
            }
            DragPayload::ExistingNode { node_id } => Some(self.apply(Mutation::MoveElement {
                node_id: node_id.clone(),
                new_parent_id: target.parent_id,
                index: target.index.unwrap_or(usize::MAX),
            })),
        }
    }

    /// Add then move into place, as a single undo step
    fn add_at(&mut self, add: Mutation, parent_id: &NodeId, index: usize) -> MutationOutcome {
        self.history.begin_batch();
        self.history.set_batch_description(add.describe());

        let mut outcome = self.apply(add);
        if let Some(created) = outcome.created.clone() {
            let moved = self.apply(Mutation::MoveElement {
                node_id: created,
                new_parent_id: parent_id.clone(),
                index,
            });
            outcome.tree = moved.tree;
        }

        self.history.end_batch();
        outcome
    }

    /// Edit-mode render with the current selection and hover
    pub fn render_edit(&self) -> VirtualDomDocument {
        let mode = RenderMode::edit(self.selected.clone(), self.hovered.clone());
        render_tree(&self.tree, &self.registry, &self.theme, &mode)
    }

    /// What visitors see
    pub fn render_display(&self) -> VirtualDomDocument {
        render_tree(&self.tree, &self.registry, &self.theme, &RenderMode::Display)
    }

    /// Full display-mode HTML page
    pub fn to_html(&self) -> String {
        compile_page(&self.render_display(), &self.page.name, &self.render_options)
    }

    pub fn serialize(&self) -> Result<String, serde_json::Error> {
        serializer::serialize(&self.tree)
    }

    /// Record a successful publish and adopt the host's updated descriptor
    pub fn mark_published(&mut self, page: PageDescriptor) {
        self.page = page;
        self.source = DocumentSource::Tree;
        self.dirty = false;
    }

    fn prune_references(&mut self) {
        if let Some(id) = &self.selected {
            if !self.tree.contains(id) {
                debug!(%id, "Selected node is gone, clearing selection");
                self.selected = None;
            }
        }
        if let Some(id) = &self.hovered {
            if !self.tree.contains(id) {
                self.hovered = None;
            }
        }
    }
}
