//! Builtin widget types
//!
//! Each module declares one widget: its palette metadata, defaults factory,
//! editor tabs and display contract.

mod button;
mod divider;
mod heading;
mod html;
mod icon;
mod image;
mod inner_section;
mod spacer;
mod text;
mod video;

use crate::definition::WidgetRegistration;
use pagecraft_model::{Settings, SettingsMap};
use serde_json::Value;

pub use heading::HEADING;
pub use inner_section::INNER_SECTION;
pub use text::TEXT;

/// Every builtin registration, in palette order
pub fn builtin() -> Vec<WidgetRegistration> {
    vec![
        heading::registration(),
        text::registration(),
        image::registration(),
        button::registration(),
        video::registration(),
        icon::registration(),
        divider::registration(),
        spacer::registration(),
        html::registration(),
        inner_section::registration(),
    ]
}

/// Build settings from two JSON object literals
pub(crate) fn settings(content: Value, style: Value) -> Settings {
    Settings::new(into_map(content), into_map(style))
}

fn into_map(value: Value) -> SettingsMap {
    match value {
        Value::Object(map) => map,
        _ => SettingsMap::new(),
    }
}

pub(crate) const ALIGN_OPTIONS: &[(&str, &str)] = &[
    ("", "Default"),
    ("left", "Left"),
    ("center", "Center"),
    ("right", "Right"),
    ("justify", "Justified"),
];
