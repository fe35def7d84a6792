use super::settings;
use crate::definition::{WidgetCategory, WidgetRegistration};
use crate::display::{DisplayContext, WidgetDisplay};
use crate::editor::{Control, ControlKind, ControlSection, EditorTab};
use pagecraft_model::{Settings, VNode};
use serde_json::json;

pub(super) fn registration() -> WidgetRegistration {
    WidgetRegistration::new("spacer", "Spacer", WidgetCategory::Basic)
        .icon("spacer")
        .defaults(defaults)
        .editor(editor())
        .display(SpacerDisplay)
}

fn defaults() -> Settings {
    settings(json!({ "space": { "size": 50, "unit": "px" } }), json!({}))
}

fn editor() -> Vec<EditorTab> {
    vec![EditorTab::content(vec![ControlSection::new(
        "Spacer",
        vec![Control::content("space", "Space", ControlKind::slider(1.0, 600.0, &["px", "vh", "em"]))],
    )])]
}

struct SpacerDisplay;

impl WidgetDisplay for SpacerDisplay {
    fn render(&self, ctx: &DisplayContext<'_>) -> VNode {
        let height = ctx.content_length("space").unwrap_or_else(|| "50px".to_string());
        VNode::element("div")
            .with_class("pc-spacer")
            .with_child(VNode::element("div").with_class("pc-spacer-inner").with_style("height", height))
    }
}
