//! # Display Contracts
//!
//! A [`WidgetDisplay`] turns one widget's settings into virtual DOM. The
//! renderer calls the same contract in edit and display mode, wrapping the
//! output in the node's compiled box; display contracts never see selection
//! or overlay state.

use crate::theme::Theme;
use pagecraft_model::{NodeId, SettingsMap, VNode};
use serde_json::Value;

/// Everything a display contract may read
pub struct DisplayContext<'a> {
    pub node_id: &'a NodeId,
    pub widget_type: &'a str,
    pub content: &'a SettingsMap,
    pub style: &'a SettingsMap,
    pub theme: &'a Theme,
    /// Already-rendered column children (container-like widgets only)
    pub children: &'a [VNode],
}

impl<'a> DisplayContext<'a> {
    /// Content string, empty when absent or not a string
    pub fn text(&self, key: &str) -> &'a str {
        self.content.get(key).and_then(Value::as_str).unwrap_or("")
    }

    pub fn flag(&self, key: &str) -> bool {
        self.content.get(key).and_then(Value::as_bool).unwrap_or(false)
    }

    /// Link-like content value: either a string or `{ "url": ..., "newTab": ... }`
    pub fn link(&self, key: &str) -> Option<(String, bool)> {
        match self.content.get(key)? {
            Value::String(url) => safe_url(url).map(|u| (u, false)),
            Value::Object(map) => {
                let url = map.get("url").and_then(Value::as_str)?;
                let new_tab = map.get("newTab").and_then(Value::as_bool).unwrap_or(false);
                safe_url(url).map(|u| (u, new_tab))
            }
            _ => None,
        }
    }

    /// Non-empty style string
    pub fn style_str(&self, key: &str) -> Option<&'a str> {
        self.style
            .get(key)
            .and_then(Value::as_str)
            .map(str::trim)
            .filter(|s| !s.is_empty())
    }

    /// Style color with `theme:` references resolved
    pub fn style_color(&self, key: &str) -> Option<String> {
        self.style_str(key).and_then(|c| self.theme.resolve_color(c))
    }

    /// Style length from a number (pixels), `{ size, unit }` or a CSS string
    pub fn style_length(&self, key: &str) -> Option<String> {
        length_value(self.style.get(key)?)
    }

    /// Content length, same forms as [`DisplayContext::style_length`]
    pub fn content_length(&self, key: &str) -> Option<String> {
        length_value(self.content.get(key)?)
    }
}

fn length_value(value: &Value) -> Option<String> {
    match value {
        Value::Number(n) => n.as_f64().map(|n| format!("{}px", n)),
        Value::Object(map) => {
            let size = map.get("size").and_then(Value::as_f64)?;
            let unit = map.get("unit").and_then(Value::as_str).unwrap_or("px");
            Some(format!("{}{}", size, unit))
        }
        Value::String(s) if !s.trim().is_empty() => Some(s.trim().to_string()),
        _ => None,
    }
}

/// Accept a URL for `href`/`src` use, rejecting script schemes.
///
/// Empty strings are treated as unset.
pub fn safe_url(url: &str) -> Option<String> {
    let url = url.trim();
    if url.is_empty() {
        return None;
    }
    let lowered = url.to_ascii_lowercase();
    if lowered.starts_with("javascript:") || lowered.starts_with("vbscript:") {
        return None;
    }
    if lowered.starts_with("data:")
        && !(lowered.starts_with("data:image/") || lowered.starts_with("data:video/"))
    {
        return None;
    }
    Some(url.to_string())
}

pub trait WidgetDisplay: Send + Sync {
    fn render(&self, ctx: &DisplayContext<'_>) -> VNode;
}

/// Display for unknown or incompletely registered widget types
#[derive(Debug, Default)]
pub struct FallbackDisplay;

impl WidgetDisplay for FallbackDisplay {
    fn render(&self, ctx: &DisplayContext<'_>) -> VNode {
        let label = if ctx.widget_type.is_empty() {
            "Unsupported widget".to_string()
        } else {
            format!("Unsupported widget: {}", ctx.widget_type)
        };
        VNode::element("div")
            .with_class("pc-widget-unsupported")
            .with_attr("role", "note")
            .with_child(VNode::text(label))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn map(value: Value) -> SettingsMap {
        match value {
            Value::Object(m) => m,
            _ => SettingsMap::new(),
        }
    }

    #[test]
    fn test_safe_url() {
        assert_eq!(safe_url(" /about "), Some("/about".to_string()));
        assert_eq!(safe_url("JavaScript:alert(1)"), None);
        assert_eq!(safe_url("data:text/html;base64,AAA"), None);
        assert!(safe_url("data:image/png;base64,AAA").is_some());
        assert_eq!(safe_url(""), None);
    }

    #[test]
    fn test_context_helpers() {
        let id = NodeId::new("w");
        let theme = Theme::default();
        let content = map(json!({ "title": "Hi", "link": { "url": "/x", "newTab": true } }));
        let style = map(json!({
            "color": "theme:accent",
            "size": 24,
            "width": { "size": 50, "unit": "%" },
            "empty": ""
        }));
        let ctx = DisplayContext {
            node_id: &id,
            widget_type: "heading",
            content: &content,
            style: &style,
            theme: &theme,
            children: &[],
        };

        assert_eq!(ctx.text("title"), "Hi");
        assert_eq!(ctx.text("missing"), "");
        assert_eq!(ctx.link("link"), Some(("/x".to_string(), true)));
        assert_eq!(ctx.style_color("color").as_deref(), Some("#61CE70"));
        assert_eq!(ctx.style_length("size").as_deref(), Some("24px"));
        assert_eq!(ctx.style_length("width").as_deref(), Some("50%"));
        assert_eq!(ctx.style_str("empty"), None);
    }

    #[test]
    fn test_fallback_names_the_type() {
        let id = NodeId::new("w");
        let theme = Theme::default();
        let empty = SettingsMap::new();
        let ctx = DisplayContext {
            node_id: &id,
            widget_type: "carousel",
            content: &empty,
            style: &empty,
            theme: &theme,
            children: &[],
        };

        let node = FallbackDisplay.render(&ctx);
        assert!(node.has_class("pc-widget-unsupported"));
        assert_eq!(node.text_content(), "Unsupported widget: carousel");
    }
}
