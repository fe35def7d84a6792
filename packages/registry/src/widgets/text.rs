use super::{settings, ALIGN_OPTIONS};
use crate::definition::{WidgetCategory, WidgetRegistration};
use crate::display::{DisplayContext, WidgetDisplay};
use crate::editor::{Control, ControlKind, ControlSection, EditorTab};
use pagecraft_model::{Settings, VNode};
use serde_json::json;

pub const TEXT: &str = "text";

pub(super) fn registration() -> WidgetRegistration {
    WidgetRegistration::new(TEXT, "Text Editor", WidgetCategory::Basic)
        .icon("text")
        .defaults(defaults)
        .editor(editor())
        .display(TextDisplay)
}

fn defaults() -> Settings {
    settings(
        json!({
            "text": "<p>این یک متن نمونه است. برای ویرایش این متن کلیک کنید.</p>",
            "dropCap": false
        }),
        json!({
            "align": "",
            "color": "theme:text",
            "fontSize": { "size": null, "unit": "px" },
            "lineHeight": ""
        }),
    )
}

fn editor() -> Vec<EditorTab> {
    vec![
        EditorTab::content(vec![ControlSection::new(
            "Text Editor",
            vec![
                Control::content("text", "Content", ControlKind::RichText),
                Control::content("dropCap", "Drop Cap", ControlKind::Toggle),
            ],
        )]),
        EditorTab::style(vec![ControlSection::new(
            "Text",
            vec![
                Control::style("align", "Alignment", ControlKind::select(ALIGN_OPTIONS)),
                Control::style("color", "Text Color", ControlKind::Color),
                Control::style("fontSize", "Font Size", ControlKind::slider(1.0, 100.0, &["px", "em", "rem"])),
                Control::style("lineHeight", "Line Height", ControlKind::Text),
            ],
        )]),
    ]
}

/// Rich text is stored as markup and emitted verbatim
struct TextDisplay;

impl WidgetDisplay for TextDisplay {
    fn render(&self, ctx: &DisplayContext<'_>) -> VNode {
        let mut node = VNode::element("div").with_class("pc-text-editor");
        if ctx.flag("dropCap") {
            node = node.with_class("pc-drop-cap");
        }
        if let Some(align) = ctx.style_str("align") {
            node = node.with_style("text-align", align);
        }
        if let Some(color) = ctx.style_color("color") {
            node = node.with_style("color", color);
        }
        if let Some(font_size) = ctx.style_length("fontSize") {
            node = node.with_style("font-size", font_size);
        }
        if let Some(line_height) = ctx.style_str("lineHeight") {
            node = node.with_style("line-height", line_height);
        }
        node.with_child(VNode::raw(ctx.text("text")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::theme::Theme;
    use pagecraft_model::NodeId;
    use serde_json::Value;

    #[test]
    fn test_markup_is_kept_verbatim() {
        let mut s = defaults();
        s.content.insert("text".into(), Value::from("<p>Hello</p>"));

        let id = NodeId::new("t");
        let theme = Theme::default();
        let node = TextDisplay.render(&DisplayContext {
            node_id: &id,
            widget_type: TEXT,
            content: &s.content,
            style: &s.style,
            theme: &theme,
            children: &[],
        });

        assert_eq!(node.children(), &[VNode::raw("<p>Hello</p>")]);
        assert_eq!(node.style("color"), Some("#7A7A7A"));
    }
}
