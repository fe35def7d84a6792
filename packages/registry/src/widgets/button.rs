use super::{settings, ALIGN_OPTIONS};
use crate::definition::{WidgetCategory, WidgetRegistration};
use crate::display::{DisplayContext, WidgetDisplay};
use crate::editor::{Control, ControlKind, ControlSection, EditorTab};
use pagecraft_model::{Settings, VNode};
use serde_json::json;

const SIZES: &[(&str, &str)] = &[
    ("xs", "Extra Small"),
    ("sm", "Small"),
    ("md", "Medium"),
    ("lg", "Large"),
    ("xl", "Extra Large"),
];

pub(super) fn registration() -> WidgetRegistration {
    WidgetRegistration::new("button", "Button", WidgetCategory::Basic)
        .icon("button")
        .defaults(defaults)
        .editor(editor())
        .display(ButtonDisplay)
}

fn defaults() -> Settings {
    settings(
        json!({
            "text": "کلیک کنید",
            "link": { "url": "#", "newTab": false },
            "size": "md",
            "icon": ""
        }),
        json!({
            "align": "",
            "textColor": "#ffffff",
            "backgroundColor": "theme:accent",
            "borderRadius": { "size": 3, "unit": "px" }
        }),
    )
}

fn editor() -> Vec<EditorTab> {
    vec![
        EditorTab::content(vec![ControlSection::new(
            "Button",
            vec![
                Control::content("text", "Text", ControlKind::Text),
                Control::content("link", "Link", ControlKind::Url),
                Control::content("size", "Size", ControlKind::select(SIZES)),
                Control::content("icon", "Icon", ControlKind::Icon),
            ],
        )]),
        EditorTab::style(vec![ControlSection::new(
            "Button",
            vec![
                Control::style("align", "Alignment", ControlKind::select(ALIGN_OPTIONS)),
                Control::style("textColor", "Text Color", ControlKind::Color),
                Control::style("backgroundColor", "Background Color", ControlKind::Color),
                Control::style("borderRadius", "Border Radius", ControlKind::slider(0.0, 100.0, &["px", "%"])),
            ],
        )]),
    ]
}

struct ButtonDisplay;

impl WidgetDisplay for ButtonDisplay {
    fn render(&self, ctx: &DisplayContext<'_>) -> VNode {
        let size = match ctx.text("size") {
            s if SIZES.iter().any(|(value, _)| *value == s) => s,
            _ => "md",
        };

        let mut button = VNode::element("a")
            .with_class("pc-button")
            .with_class(format!("pc-size-{}", size))
            .with_attr("role", "button");

        match ctx.link("link") {
            Some((href, new_tab)) => {
                button = button.with_attr("href", href);
                if new_tab {
                    button = button.with_attr("target", "_blank").with_attr("rel", "noopener");
                }
            }
            None => button = button.with_attr("href", "#"),
        }

        if let Some(color) = ctx.style_color("textColor") {
            button = button.with_style("color", color);
        }
        if let Some(background) = ctx.style_color("backgroundColor") {
            button = button.with_style("background-color", background);
        }
        if let Some(radius) = ctx.style_length("borderRadius") {
            button = button.with_style("border-radius", radius);
        }

        let icon = ctx.text("icon");
        if !icon.is_empty() {
            button = button.with_child(
                VNode::element("i")
                    .with_class("pc-button-icon")
                    .with_class(format!("pc-icon-{}", icon))
                    .with_attr("aria-hidden", "true"),
            );
        }
        button = button.with_child(
            VNode::element("span")
                .with_class("pc-button-text")
                .with_child(VNode::text(ctx.text("text"))),
        );

        let mut wrapper = VNode::element("div").with_class("pc-button-wrapper");
        if let Some(align) = ctx.style_str("align") {
            wrapper = wrapper.with_style("text-align", align);
        }
        wrapper.with_child(button)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::theme::Theme;
    use pagecraft_model::{NodeId, SettingsPath};

    fn render(s: &Settings) -> VNode {
        let id = NodeId::new("b");
        let theme = Theme::default();
        ButtonDisplay.render(&DisplayContext {
            node_id: &id,
            widget_type: "button",
            content: &s.content,
            style: &s.style,
            theme: &theme,
            children: &[],
        })
    }

    #[test]
    fn test_default_button() {
        let node = render(&defaults());
        let button = &node.children()[0];
        assert!(button.has_class("pc-button"));
        assert!(button.has_class("pc-size-md"));
        assert_eq!(button.attr("href"), Some("#"));
        assert_eq!(button.style("background-color"), Some("#61CE70"));
        assert_eq!(button.text_content(), "کلیک کنید");
    }

    #[test]
    fn test_script_link_is_dropped() {
        let s = defaults()
            .with_value(&SettingsPath::content("link.url"), json!("javascript:alert(1)"))
            .unwrap()
            .with_value(&SettingsPath::content("size"), json!("huge"))
            .unwrap();
        let button = render(&s).children()[0].clone();
        assert_eq!(button.attr("href"), Some("#"));
        assert!(button.has_class("pc-size-md"));
    }
}
