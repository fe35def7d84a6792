use super::{settings, ALIGN_OPTIONS};
use crate::definition::{WidgetCategory, WidgetRegistration};
use crate::display::{DisplayContext, WidgetDisplay};
use crate::editor::{Control, ControlKind, ControlSection, EditorTab};
use pagecraft_model::{Settings, VNode};
use serde_json::json;

const STYLES: &[(&str, &str)] = &[
    ("solid", "Solid"),
    ("double", "Double"),
    ("dotted", "Dotted"),
    ("dashed", "Dashed"),
];

pub(super) fn registration() -> WidgetRegistration {
    WidgetRegistration::new("divider", "Divider", WidgetCategory::Basic)
        .icon("divider")
        .defaults(defaults)
        .editor(editor())
        .display(DividerDisplay)
}

fn defaults() -> Settings {
    settings(
        json!({}),
        json!({
            "style": "solid",
            "weight": { "size": 1, "unit": "px" },
            "color": "#000000",
            "width": { "size": 100, "unit": "%" },
            "align": "",
            "gap": { "size": 15, "unit": "px" }
        }),
    )
}

fn editor() -> Vec<EditorTab> {
    vec![EditorTab::style(vec![ControlSection::new(
        "Divider",
        vec![
            Control::style("style", "Style", ControlKind::select(STYLES)),
            Control::style("weight", "Weight", ControlKind::slider(1.0, 10.0, &["px"])),
            Control::style("color", "Color", ControlKind::Color),
            Control::style("width", "Width", ControlKind::slider(1.0, 100.0, &["%", "px"])),
            Control::style("align", "Alignment", ControlKind::select(ALIGN_OPTIONS)),
            Control::style("gap", "Gap", ControlKind::slider(2.0, 50.0, &["px"])),
        ],
    )])]
}

struct DividerDisplay;

impl WidgetDisplay for DividerDisplay {
    fn render(&self, ctx: &DisplayContext<'_>) -> VNode {
        let style = match ctx.style_str("style") {
            Some(s) if STYLES.iter().any(|(value, _)| *value == s) => s,
            _ => "solid",
        };
        let weight = ctx.style_length("weight").unwrap_or_else(|| "1px".to_string());
        let color = ctx.style_color("color").unwrap_or_else(|| "#000000".to_string());

        let mut line = VNode::element("span")
            .with_class("pc-divider-separator")
            .with_style("display", "inline-block")
            .with_style("border-top", format!("{} {} {}", weight, style, color));
        if let Some(width) = ctx.style_length("width") {
            line = line.with_style("width", width);
        }

        let mut wrapper = VNode::element("div").with_class("pc-divider");
        if let Some(gap) = ctx.style_length("gap") {
            wrapper = wrapper
                .with_style("padding-top", gap.clone())
                .with_style("padding-bottom", gap);
        }
        if let Some(align) = ctx.style_str("align") {
            wrapper = wrapper.with_style("text-align", align);
        }
        wrapper.with_child(line)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::theme::Theme;
    use pagecraft_model::NodeId;

    #[test]
    fn test_default_divider() {
        let s = defaults();
        let id = NodeId::new("d");
        let theme = Theme::default();
        let node = DividerDisplay.render(&DisplayContext {
            node_id: &id,
            widget_type: "divider",
            content: &s.content,
            style: &s.style,
            theme: &theme,
            children: &[],
        });

        assert_eq!(node.style("padding-top"), Some("15px"));
        let line = &node.children()[0];
        assert_eq!(line.style("border-top"), Some("1px solid #000000"));
        assert_eq!(line.style("width"), Some("100%"));
    }
}
