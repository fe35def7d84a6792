use crate::definition::{WidgetCategory, WidgetDefinition, WidgetRegistration};
use crate::display::{FallbackDisplay, WidgetDisplay};
use crate::editor::{Control, ControlKind, ControlSection, EditorTab, SettingsEditor};
use crate::error::RegistryError;
use crate::widgets;
use pagecraft_model::{IdGenerator, Node, NodeKind, Settings, WidgetCatalog};
use serde::Serialize;
use serde_json::json;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, warn};

/// Tag reported for lookups that hit the fallback definition
pub const FALLBACK_WIDGET_TYPE: &str = "unsupported";

/// One palette item offered to the drag source
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PaletteEntry {
    pub widget_type: String,
    pub label: String,
    pub icon: String,
    pub category: WidgetCategory,
}

/// Closed, total widget registry
#[derive(Debug)]
pub struct Registry {
    /// Registration order (palette order)
    definitions: Vec<WidgetDefinition>,
    index: HashMap<String, usize>,
    fallback: WidgetDefinition,
    section_editor: SettingsEditor,
    column_editor: SettingsEditor,
}

impl Registry {
    /// Registry with every builtin widget type
    pub fn builtin() -> Self {
        let mut builder = RegistryBuilder::new();
        for registration in widgets::builtin() {
            // builtin tags are distinct; a duplicate would be a programming error
            if let Err(e) = builder.register(registration) {
                warn!(error = %e, "Skipping builtin widget registration");
            }
        }
        builder.build()
    }

    pub fn builder() -> RegistryBuilder {
        RegistryBuilder::new()
    }

    pub fn get(&self, widget_type: &str) -> Option<&WidgetDefinition> {
        self.index.get(widget_type).map(|&i| &self.definitions[i])
    }

    /// Definition for `widget_type`, or the fallback definition
    pub fn resolve(&self, widget_type: &str) -> &WidgetDefinition {
        self.get(widget_type).unwrap_or(&self.fallback)
    }

    pub fn is_known(&self, widget_type: &str) -> bool {
        self.index.contains_key(widget_type)
    }

    pub fn definitions(&self) -> &[WidgetDefinition] {
        &self.definitions
    }

    pub fn defaults_for(&self, widget_type: &str) -> Settings {
        self.resolve(widget_type).defaults()
    }

    pub fn editor_for(&self, widget_type: &str) -> &SettingsEditor {
        self.resolve(widget_type).editor()
    }

    pub fn display_for(&self, widget_type: &str) -> &dyn WidgetDisplay {
        self.resolve(widget_type).display()
    }

    pub fn defaults_for_kind(&self, kind: &NodeKind) -> Settings {
        match kind {
            NodeKind::Section => section_defaults(),
            NodeKind::Column => column_defaults(100.0),
            NodeKind::Widget(widget_type) => self.defaults_for(widget_type),
        }
    }

    pub fn editor_for_kind(&self, kind: &NodeKind) -> &SettingsEditor {
        match kind {
            NodeKind::Section => &self.section_editor,
            NodeKind::Column => &self.column_editor,
            NodeKind::Widget(widget_type) => self.editor_for(widget_type),
        }
    }

    /// Fill any key the kind's defaults factory would produce but `settings` lacks
    pub fn normalize_settings(&self, kind: &NodeKind, settings: &Settings) -> Settings {
        let mut normalized = settings.clone();
        normalized.fill_defaults(&self.defaults_for_kind(kind));
        normalized
    }

    /// New section holding exactly one empty full-width column
    pub fn new_section(&self, ids: &mut IdGenerator) -> Node {
        Node::section(ids.new_id(), section_defaults()).with_child(self.new_column(ids, 100.0))
    }

    pub fn new_column(&self, ids: &mut IdGenerator, width_percent: f64) -> Node {
        Node::column(ids.new_id(), column_defaults(width_percent))
    }

    /// New widget with default settings.
    ///
    /// Container-like types come pre-seeded with their declared number of
    /// equal-width empty columns.
    pub fn new_widget(&self, widget_type: &str, ids: &mut IdGenerator) -> Node {
        let definition = self.resolve(widget_type);
        let mut node = Node::widget(ids.new_id(), widget_type, definition.defaults());

        if let Some(policy) = definition.container {
            let count = policy.initial_columns.max(1);
            let width = (100.0 / count as f64 * 1000.0).round() / 1000.0;
            node.children = (0..count).map(|_| self.new_column(ids, width)).collect();
        }

        debug!(widget_type, id = %node.id, columns = node.children.len(), "Created widget");
        node
    }

    pub fn palette(&self) -> Vec<PaletteEntry> {
        self.definitions
            .iter()
            .map(|d| PaletteEntry {
                widget_type: d.widget_type.clone(),
                label: d.label.clone(),
                icon: d.icon.clone(),
                category: d.category,
            })
            .collect()
    }
}

impl WidgetCatalog for Registry {
    fn is_container(&self, widget_type: &str) -> bool {
        self.get(widget_type).map(WidgetDefinition::is_container).unwrap_or(false)
    }
}

fn section_defaults() -> Settings {
    widgets::settings(
        json!({
            "layout": "boxed",
            "contentWidth": { "size": 1140, "unit": "px" },
            "gap": "default",
            "minHeight": { "size": null, "unit": "px" },
            "verticalAlign": "top",
            "htmlTag": "section"
        }),
        json!({}),
    )
}

fn column_defaults(width_percent: f64) -> Settings {
    widgets::settings(
        json!({
            "width": { "size": width_percent, "unit": "%" },
            "verticalAlign": "top"
        }),
        json!({}),
    )
}

fn section_editor() -> SettingsEditor {
    SettingsEditor::with_advanced(vec![EditorTab::content(vec![ControlSection::new(
        "Layout",
        vec![
            Control::content(
                "layout",
                "Content Width",
                ControlKind::select(&[("boxed", "Boxed"), ("full_width", "Full Width")]),
            ),
            Control::content("contentWidth", "Width", ControlKind::slider(500.0, 1600.0, &["px"])),
            Control::content(
                "gap",
                "Columns Gap",
                ControlKind::select(&[
                    ("default", "Default"),
                    ("none", "No Gap"),
                    ("narrow", "Narrow"),
                    ("extended", "Extended"),
                    ("wide", "Wide"),
                ]),
            ),
            Control::content("minHeight", "Minimum Height", ControlKind::slider(0.0, 1440.0, &["px", "vh"])),
            Control::content(
                "verticalAlign",
                "Vertical Align",
                ControlKind::select(&[("top", "Top"), ("middle", "Middle"), ("bottom", "Bottom")]),
            ),
            Control::content(
                "htmlTag",
                "HTML Tag",
                ControlKind::select(&[
                    ("section", "section"),
                    ("div", "div"),
                    ("header", "header"),
                    ("footer", "footer"),
                    ("aside", "aside"),
                ]),
            ),
        ],
    )])])
}

fn column_editor() -> SettingsEditor {
    SettingsEditor::with_advanced(vec![EditorTab::content(vec![ControlSection::new(
        "Layout",
        vec![
            Control::content("width", "Column Width", ControlKind::slider(10.0, 100.0, &["%"])),
            Control::content(
                "verticalAlign",
                "Vertical Align",
                ControlKind::select(&[("top", "Top"), ("middle", "Middle"), ("bottom", "Bottom")]),
            ),
        ],
    )])])
}

/// Collects registrations and checks them once, at startup
pub struct RegistryBuilder {
    registrations: Vec<WidgetRegistration>,
}

impl RegistryBuilder {
    pub fn new() -> Self {
        Self {
            registrations: Vec::new(),
        }
    }

    pub fn register(&mut self, registration: WidgetRegistration) -> Result<&mut Self, RegistryError> {
        if registration.widget_type.is_empty() {
            return Err(RegistryError::EmptyTag);
        }
        if self
            .registrations
            .iter()
            .any(|r| r.widget_type == registration.widget_type)
        {
            return Err(RegistryError::DuplicateWidget(registration.widget_type));
        }
        if registration.container.map(|c| c.initial_columns == 0).unwrap_or(false) {
            return Err(RegistryError::EmptyContainer(registration.widget_type));
        }

        self.registrations.push(registration);
        Ok(self)
    }

    /// Resolve every registration into a complete definition.
    ///
    /// Missing contracts are replaced by the fallback ones.
    pub fn build(self) -> Registry {
        let mut definitions = Vec::with_capacity(self.registrations.len());
        let mut index = HashMap::new();

        for registration in self.registrations {
            if !registration.is_complete() {
                warn!(
                    widget_type = %registration.widget_type,
                    has_defaults = registration.defaults.is_some(),
                    has_editor = registration.editor.is_some(),
                    has_display = registration.display.is_some(),
                    "Incomplete widget registration - using fallback contracts"
                );
            }

            let editor = match registration.editor {
                Some(tabs) => SettingsEditor::with_advanced(tabs),
                None => SettingsEditor::fallback(),
            };
            let display: Arc<dyn WidgetDisplay> = registration
                .display
                .unwrap_or_else(|| Arc::new(FallbackDisplay));

            index.insert(registration.widget_type.clone(), definitions.len());
            definitions.push(WidgetDefinition {
                widget_type: registration.widget_type,
                label: registration.label,
                icon: registration.icon,
                category: registration.category,
                container: registration.container,
                defaults: registration.defaults.unwrap_or(Settings::default),
                editor,
                display,
            });
        }

        debug!(widgets = definitions.len(), "Widget registry built");

        let mut fallback = WidgetDefinition::fallback();
        fallback.widget_type = FALLBACK_WIDGET_TYPE.to_string();

        Registry {
            definitions,
            index,
            fallback,
            section_editor: section_editor(),
            column_editor: column_editor(),
        }
    }
}

impl Default for RegistryBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::display::DisplayContext;
    use crate::editor::TabKind;
    use crate::theme::Theme;
    use pagecraft_model::{NodeId, VNode};

    #[test]
    fn test_builtin_lookups_are_total() {
        let registry = Registry::builtin();

        assert!(registry.is_known("heading"));
        assert!(!registry.is_known("carousel"));

        // unknown types resolve to the fallback, never panic
        let editor = registry.editor_for("carousel");
        assert!(editor.notice.is_some());
        assert_eq!(registry.defaults_for("carousel"), Settings::default());
        assert_eq!(registry.resolve("carousel").widget_type, FALLBACK_WIDGET_TYPE);
    }

    #[test]
    fn test_heading_default_title() {
        let registry = Registry::builtin();
        let defaults = registry.defaults_for("heading");
        assert_eq!(defaults.content_str("title"), Some("سرتیتر نمونه"));
    }

    #[test]
    fn test_new_section_has_one_empty_column() {
        let registry = Registry::builtin();
        let mut ids = IdGenerator::new("test");
        let section = registry.new_section(&mut ids);

        assert!(section.is_section());
        assert_eq!(section.children.len(), 1);
        assert!(section.children[0].is_column());
        assert!(section.children[0].children.is_empty());
    }

    #[test]
    fn test_container_widget_is_preseeded() {
        let registry = Registry::builtin();
        let mut ids = IdGenerator::new("test");
        let inner = registry.new_widget("inner-section", &mut ids);

        assert!(registry.is_container("inner-section"));
        assert_eq!(inner.children.len(), 2);
        assert!(inner.children.iter().all(|c| c.is_column() && c.children.is_empty()));
        assert_eq!(inner.children[0].settings.content["width"]["size"], 50.0);
    }

    #[test]
    fn test_leaf_widget_has_no_children() {
        let registry = Registry::builtin();
        let mut ids = IdGenerator::new("test");
        let heading = registry.new_widget("heading", &mut ids);
        assert!(heading.children.is_empty());
        assert!(!registry.is_container("heading"));
    }

    #[test]
    fn test_every_builtin_is_complete_and_well_formed() {
        let registry = Registry::builtin();
        for definition in registry.definitions() {
            let editor = definition.editor();
            assert!(editor.notice.is_none(), "{} fell back", definition.widget_type);
            assert!(editor.tab(TabKind::Advanced).is_some());
            assert!(
                editor.misplaced_controls().is_empty(),
                "{} has controls outside their tab scope",
                definition.widget_type
            );

            // content/style controls address keys the defaults provide
            let defaults = definition.defaults();
            for control in editor.controls() {
                assert!(
                    defaults.get(&control.path).is_some(),
                    "{}: control {} has no default",
                    definition.widget_type,
                    control.path
                );
            }
        }
    }

    #[test]
    fn test_incomplete_registration_falls_back() {
        let mut builder = Registry::builder();
        builder
            .register(WidgetRegistration::new("half", "Half", WidgetCategory::Basic).defaults(Settings::default))
            .unwrap();
        let registry = builder.build();

        assert!(registry.is_known("half"));
        assert!(registry.editor_for("half").notice.is_some());

        let id = NodeId::new("w");
        let theme = Theme::default();
        let empty = pagecraft_model::SettingsMap::new();
        let rendered: VNode = registry.display_for("half").render(&DisplayContext {
            node_id: &id,
            widget_type: "half",
            content: &empty,
            style: &empty,
            theme: &theme,
            children: &[],
        });
        assert!(rendered.has_class("pc-widget-unsupported"));
    }

    #[test]
    fn test_duplicate_registration_rejected() {
        let mut builder = Registry::builder();
        builder
            .register(WidgetRegistration::new("x", "X", WidgetCategory::Basic))
            .unwrap();
        let err = builder
            .register(WidgetRegistration::new("x", "X", WidgetCategory::Basic))
            .err();
        assert_eq!(err, Some(RegistryError::DuplicateWidget("x".to_string())));
    }

    #[test]
    fn test_normalize_fills_missing_keys() {
        let registry = Registry::builtin();
        let partial = Settings::default();
        let normalized =
            registry.normalize_settings(&NodeKind::Widget("heading".to_string()), &partial);
        assert_eq!(normalized.content_str("tag"), Some("h2"));
    }
}
