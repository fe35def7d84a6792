use crate::display::{FallbackDisplay, WidgetDisplay};
use crate::editor::{EditorTab, SettingsEditor};
use pagecraft_model::Settings;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

/// Produces a widget's default `content`/`style` settings
pub type DefaultsFactory = fn() -> Settings;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WidgetCategory {
    Basic,
    Media,
    Layout,
    Advanced,
}

/// Creation policy for container-like widgets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContainerPolicy {
    /// Empty columns created together with the widget
    pub initial_columns: usize,
}

/// A fully resolved widget type: metadata plus all three contracts
#[derive(Clone)]
pub struct WidgetDefinition {
    pub widget_type: String,
    pub label: String,
    pub icon: String,
    pub category: WidgetCategory,
    pub container: Option<ContainerPolicy>,
    pub(crate) defaults: DefaultsFactory,
    pub(crate) editor: SettingsEditor,
    pub(crate) display: Arc<dyn WidgetDisplay>,
}

impl WidgetDefinition {
    pub fn defaults(&self) -> Settings {
        (self.defaults)()
    }

    pub fn editor(&self) -> &SettingsEditor {
        &self.editor
    }

    pub fn display(&self) -> &dyn WidgetDisplay {
        self.display.as_ref()
    }

    pub fn is_container(&self) -> bool {
        self.container.is_some()
    }

    pub(crate) fn fallback() -> Self {
        Self {
            widget_type: String::new(),
            label: "Unsupported".to_string(),
            icon: "warning".to_string(),
            category: WidgetCategory::Advanced,
            container: None,
            defaults: Settings::default,
            editor: SettingsEditor::fallback(),
            display: Arc::new(FallbackDisplay),
        }
    }
}

impl fmt::Debug for WidgetDefinition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WidgetDefinition")
            .field("widget_type", &self.widget_type)
            .field("label", &self.label)
            .field("category", &self.category)
            .field("container", &self.container)
            .finish_non_exhaustive()
    }
}

/// A widget type as declared by its module; contracts may be missing
///
/// The registry builder fills any missing contract with the fallback and
/// logs it, so a half-declared type renders as unsupported instead of
/// failing at render time.
pub struct WidgetRegistration {
    pub widget_type: String,
    pub label: String,
    pub icon: String,
    pub category: WidgetCategory,
    pub container: Option<ContainerPolicy>,
    pub defaults: Option<DefaultsFactory>,
    pub editor: Option<Vec<EditorTab>>,
    pub display: Option<Arc<dyn WidgetDisplay>>,
}

impl WidgetRegistration {
    pub fn new(widget_type: impl Into<String>, label: impl Into<String>, category: WidgetCategory) -> Self {
        Self {
            widget_type: widget_type.into(),
            label: label.into(),
            icon: String::new(),
            category,
            container: None,
            defaults: None,
            editor: None,
            display: None,
        }
    }

    pub fn icon(mut self, icon: impl Into<String>) -> Self {
        self.icon = icon.into();
        self
    }

    pub fn container(mut self, initial_columns: usize) -> Self {
        self.container = Some(ContainerPolicy { initial_columns });
        self
    }

    pub fn defaults(mut self, factory: DefaultsFactory) -> Self {
        self.defaults = Some(factory);
        self
    }

    pub fn editor(mut self, tabs: Vec<EditorTab>) -> Self {
        self.editor = Some(tabs);
        self
    }

    pub fn display(mut self, display: impl WidgetDisplay + 'static) -> Self {
        self.display = Some(Arc::new(display));
        self
    }

    pub fn is_complete(&self) -> bool {
        self.defaults.is_some() && self.editor.is_some() && self.display.is_some()
    }
}
