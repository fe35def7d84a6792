use crate::scope::scope_custom_css;
use pagecraft_model::CssRule;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Properties holding a color value that may be a theme reference
const COLOR_PROPERTIES: &[&str] = &["background-color", "border-color", "color"];

/// Concrete presentation attributes for one node
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompiledStyle {
    /// Declarations applied directly to the node's box
    pub inline: BTreeMap<String, String>,
    /// Declarations for the `:hover` state
    pub hover: BTreeMap<String, String>,
    /// Extra classes (visibility, motion, author classes)
    pub classes: Vec<String>,
    /// Extra attributes (`id`, validated custom attributes)
    pub attributes: BTreeMap<String, String>,
    /// Author CSS, unscoped
    pub custom_css: Option<String>,
}

impl CompiledStyle {
    pub fn is_empty(&self) -> bool {
        self.inline.is_empty()
            && self.hover.is_empty()
            && self.classes.is_empty()
            && self.attributes.is_empty()
            && self.custom_css.is_none()
    }

    /// Rewrite color values through `resolve` (e.g. theme references)
    ///
    /// Values `resolve` rejects are dropped.
    pub fn resolve_colors(&mut self, resolve: impl Fn(&str) -> Option<String>) {
        for map in [&mut self.inline, &mut self.hover] {
            for property in COLOR_PROPERTIES {
                if let Some(value) = map.remove(*property) {
                    if let Some(resolved) = resolve(&value) {
                        map.insert(property.to_string(), resolved);
                    }
                }
            }
        }
    }

    /// `:hover` rule for the element matched by `selector`
    pub fn hover_rule(&self, selector: &str) -> Option<CssRule> {
        if self.hover.is_empty() {
            return None;
        }
        Some(CssRule::new(format!("{}:hover", selector), self.hover.clone()))
    }

    /// Author CSS with every `selector` keyword bound to `selector`
    pub fn scoped_custom_css(&self, selector: &str) -> Option<String> {
        self.custom_css
            .as_deref()
            .map(|css| scope_custom_css(css, selector))
    }
}
