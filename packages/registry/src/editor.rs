//! # Settings Editor Contracts
//!
//! Declarative description of a settings panel. A host UI walks the tabs and
//! renders one input per [`Control`]; each control is bound to an explicit
//! [`SettingsPath`], so an edit becomes a single path-addressed update.

use pagecraft_model::{SettingsPath, SettingsScope};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TabKind {
    Content,
    Style,
    Advanced,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaKind {
    Image,
    Video,
}

impl MediaKind {
    /// Whether a MIME type is acceptable for this control
    pub fn accepts(&self, mime: &str) -> bool {
        match self {
            MediaKind::Image => mime.starts_with("image/"),
            MediaKind::Video => mime.starts_with("video/"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum ControlKind {
    Text,
    TextArea,
    RichText,
    Code { language: String },
    Number { min: Option<f64>, max: Option<f64>, step: f64 },
    Slider { min: f64, max: f64, units: Vec<String> },
    Select { options: Vec<(String, String)> },
    Toggle,
    Color,
    Url,
    Media { accept: MediaKind },
    Dimensions,
    Icon,
}

impl ControlKind {
    pub fn select(options: &[(&str, &str)]) -> Self {
        ControlKind::Select {
            options: options
                .iter()
                .map(|(value, label)| (value.to_string(), label.to_string()))
                .collect(),
        }
    }

    pub fn slider(min: f64, max: f64, units: &[&str]) -> Self {
        ControlKind::Slider {
            min,
            max,
            units: units.iter().map(|u| u.to_string()).collect(),
        }
    }

    pub fn number(min: Option<f64>, max: Option<f64>) -> Self {
        ControlKind::Number { min, max, step: 1.0 }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Control {
    pub path: SettingsPath,
    pub label: String,
    pub kind: ControlKind,
}

impl Control {
    pub fn new(path: SettingsPath, label: impl Into<String>, kind: ControlKind) -> Self {
        Self {
            path,
            label: label.into(),
            kind,
        }
    }

    pub fn content(key: &str, label: impl Into<String>, kind: ControlKind) -> Self {
        Self::new(SettingsPath::content(key), label, kind)
    }

    pub fn style(key: &str, label: impl Into<String>, kind: ControlKind) -> Self {
        Self::new(SettingsPath::style(key), label, kind)
    }

    pub fn advanced(key: &str, label: impl Into<String>, kind: ControlKind) -> Self {
        Self::new(SettingsPath::advanced(key), label, kind)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ControlSection {
    pub label: String,
    pub controls: Vec<Control>,
}

impl ControlSection {
    pub fn new(label: impl Into<String>, controls: Vec<Control>) -> Self {
        Self {
            label: label.into(),
            controls,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EditorTab {
    pub tab: TabKind,
    pub sections: Vec<ControlSection>,
}

impl EditorTab {
    pub fn content(sections: Vec<ControlSection>) -> Self {
        Self {
            tab: TabKind::Content,
            sections,
        }
    }

    pub fn style(sections: Vec<ControlSection>) -> Self {
        Self {
            tab: TabKind::Style,
            sections,
        }
    }
}

/// Full settings panel for one widget type (or for sections/columns)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SettingsEditor {
    pub tabs: Vec<EditorTab>,
    /// Message shown above the tabs (used by the fallback editor)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notice: Option<String>,
}

impl SettingsEditor {
    /// Widget-specific tabs followed by the shared advanced tab
    pub fn with_advanced(mut tabs: Vec<EditorTab>) -> Self {
        tabs.push(advanced_tab());
        Self { tabs, notice: None }
    }

    /// Editor for unsupported widgets: a notice and the advanced tab only
    pub fn fallback() -> Self {
        Self {
            tabs: vec![advanced_tab()],
            notice: Some("This widget type is not supported.".to_string()),
        }
    }

    pub fn tab(&self, kind: TabKind) -> Option<&EditorTab> {
        self.tabs.iter().find(|t| t.tab == kind)
    }

    pub fn controls(&self) -> impl Iterator<Item = &Control> {
        self.tabs
            .iter()
            .flat_map(|t| t.sections.iter())
            .flat_map(|s| s.controls.iter())
    }

    /// Control bound to `path`, if this editor exposes one
    pub fn control_for(&self, path: &SettingsPath) -> Option<&Control> {
        self.controls().find(|c| &c.path == path)
    }

    /// Controls whose path lies outside their tab's scope (should be empty)
    pub fn misplaced_controls(&self) -> Vec<&Control> {
        self.tabs
            .iter()
            .flat_map(|tab| {
                let scope = match tab.tab {
                    TabKind::Content => SettingsScope::Content,
                    TabKind::Style => SettingsScope::Style,
                    TabKind::Advanced => SettingsScope::Advanced,
                };
                tab.sections
                    .iter()
                    .flat_map(|s| s.controls.iter())
                    .filter(move |c| c.path.scope != scope)
            })
            .collect()
    }
}

const UNITS: &[&str] = &["px", "%", "em", "rem", "vw"];

/// The advanced tab, identical for every node
pub fn advanced_tab() -> EditorTab {
    let animations = ControlKind::select(&[
        ("", "None"),
        ("fadeIn", "Fade In"),
        ("fadeInUp", "Fade In Up"),
        ("fadeInDown", "Fade In Down"),
        ("zoomIn", "Zoom In"),
        ("slideInLeft", "Slide In Left"),
        ("slideInRight", "Slide In Right"),
        ("bounceIn", "Bounce In"),
    ]);
    let border_types = ControlKind::select(&[
        ("none", "None"),
        ("solid", "Solid"),
        ("dashed", "Dashed"),
        ("dotted", "Dotted"),
        ("double", "Double"),
        ("groove", "Groove"),
    ]);
    let background_types = ControlKind::select(&[
        ("none", "None"),
        ("classic", "Classic"),
        ("gradient", "Gradient"),
        ("image", "Image"),
        ("video", "Video"),
    ]);

    let mut sections = vec![
        ControlSection::new(
            "Layout",
            vec![
                Control::advanced("layout.margin", "Margin", ControlKind::Dimensions),
                Control::advanced("layout.padding", "Padding", ControlKind::Dimensions),
                Control::advanced(
                    "layout.width",
                    "Width",
                    ControlKind::select(&[
                        ("default", "Default"),
                        ("full-width", "Full Width (100%)"),
                        ("inline", "Inline (auto)"),
                        ("auto", "Auto"),
                        ("custom", "Custom"),
                    ]),
                ),
                Control::advanced(
                    "layout.customWidth",
                    "Custom Width",
                    ControlKind::slider(0.0, 1600.0, UNITS),
                ),
                Control::advanced(
                    "layout.position",
                    "Position",
                    ControlKind::select(&[
                        ("default", "Default"),
                        ("relative", "Relative"),
                        ("absolute", "Absolute"),
                        ("fixed", "Fixed"),
                        ("sticky", "Sticky"),
                    ]),
                ),
                Control::advanced("layout.zIndex", "Z-Index", ControlKind::number(None, None)),
            ],
        ),
        ControlSection::new(
            "Motion Effects",
            vec![
                Control::advanced("motion.entranceAnimation", "Entrance Animation", animations),
                Control::advanced(
                    "motion.duration",
                    "Animation Duration",
                    ControlKind::select(&[("slow", "Slow"), ("normal", "Normal"), ("fast", "Fast")]),
                ),
                Control::advanced(
                    "motion.delayMs",
                    "Animation Delay (ms)",
                    ControlKind::number(Some(0.0), None),
                ),
            ],
        ),
    ];

    for state in ["normal", "hover"] {
        let title = if state == "normal" { "Normal" } else { "Hover" };
        sections.push(ControlSection::new(
            format!("Transform ({})", title),
            vec![
                Control::advanced(&format!("transform.{state}.rotate"), "Rotate", ControlKind::slider(-360.0, 360.0, &["deg"])),
                Control::advanced(&format!("transform.{state}.scale"), "Scale", ControlKind::slider(0.0, 2.0, &[])),
                Control::advanced(&format!("transform.{state}.offsetX"), "Offset X", ControlKind::slider(-1000.0, 1000.0, &["px"])),
                Control::advanced(&format!("transform.{state}.offsetY"), "Offset Y", ControlKind::slider(-1000.0, 1000.0, &["px"])),
                Control::advanced(&format!("transform.{state}.skewX"), "Skew X", ControlKind::slider(-360.0, 360.0, &["deg"])),
                Control::advanced(&format!("transform.{state}.skewY"), "Skew Y", ControlKind::slider(-360.0, 360.0, &["deg"])),
            ],
        ));
        sections.push(ControlSection::new(
            format!("Background ({})", title),
            vec![
                Control::advanced(&format!("background.{state}.type"), "Background Type", background_types.clone()),
                Control::advanced(&format!("background.{state}.color"), "Color", ControlKind::Color),
                Control::advanced(&format!("background.{state}.image"), "Image", ControlKind::Media { accept: MediaKind::Image }),
            ],
        ));
        sections.push(ControlSection::new(
            format!("Border ({})", title),
            vec![
                Control::advanced(&format!("border.{state}.type"), "Border Type", border_types.clone()),
                Control::advanced(&format!("border.{state}.color"), "Color", ControlKind::Color),
                Control::advanced(&format!("border.{state}.width"), "Width", ControlKind::Dimensions),
            ],
        ));
    }

    sections.push(ControlSection::new(
        "Border Radius",
        vec![Control::advanced("border.radius", "Border Radius", ControlKind::Dimensions)],
    ));
    sections.push(ControlSection::new(
        "Responsive",
        vec![
            Control::advanced("responsive.hideDesktop", "Hide On Desktop", ControlKind::Toggle),
            Control::advanced("responsive.hideTablet", "Hide On Tablet", ControlKind::Toggle),
            Control::advanced("responsive.hideMobile", "Hide On Mobile", ControlKind::Toggle),
        ],
    ));
    sections.push(ControlSection::new(
        "Attributes",
        vec![
            Control::advanced("attributes.cssId", "CSS ID", ControlKind::Text),
            Control::advanced("attributes.cssClasses", "CSS Classes", ControlKind::Text),
            Control::advanced("attributes.custom", "Custom Attributes", ControlKind::TextArea),
        ],
    ));
    sections.push(ControlSection::new(
        "Custom CSS",
        vec![Control::advanced(
            "customCss",
            "Custom CSS",
            ControlKind::Code {
                language: "css".to_string(),
            },
        )],
    ));

    EditorTab {
        tab: TabKind::Advanced,
        sections,
    }
}
