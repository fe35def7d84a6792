//! # Advanced Settings
//!
//! The universal layout and visual parameters every node carries, whatever its
//! kind or widget type. One schema is shared by all nodes.
//!
//! Every struct is `#[serde(default)]`: a stored document that predates a
//! field, or omits it, still deserializes into a complete value. The style
//! compiler relies on this to stay a total function.
//!
//! A field that is present but ill-typed only costs that field:
//! [`AdvancedSettings::decode_lenient`] keeps every sibling that decodes.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// CSS length unit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Unit {
    #[default]
    #[serde(rename = "px")]
    Px,
    #[serde(rename = "%")]
    Percent,
    #[serde(rename = "em")]
    Em,
    #[serde(rename = "rem")]
    Rem,
    #[serde(rename = "vw")]
    Vw,
    #[serde(rename = "vh")]
    Vh,
}

impl Unit {
    pub fn as_str(&self) -> &'static str {
        match self {
            Unit::Px => "px",
            Unit::Percent => "%",
            Unit::Em => "em",
            Unit::Rem => "rem",
            Unit::Vw => "vw",
            Unit::Vh => "vh",
        }
    }
}

/// Four-sided box value (margin, padding, border width, corner radius)
///
/// A side left as `None` was never set by the user.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct BoxSides {
    pub top: Option<f64>,
    pub right: Option<f64>,
    pub bottom: Option<f64>,
    pub left: Option<f64>,
    pub unit: Unit,
    /// Editor hint: all four sides are edited together
    pub linked: bool,
}

impl BoxSides {
    pub fn uniform(value: f64, unit: Unit) -> Self {
        Self {
            top: Some(value),
            right: Some(value),
            bottom: Some(value),
            left: Some(value),
            unit,
            linked: true,
        }
    }

    pub fn new(top: f64, right: f64, bottom: f64, left: f64, unit: Unit) -> Self {
        Self {
            top: Some(top),
            right: Some(right),
            bottom: Some(bottom),
            left: Some(left),
            unit,
            linked: false,
        }
    }

    pub fn is_unset(&self) -> bool {
        self.top.is_none() && self.right.is_none() && self.bottom.is_none() && self.left.is_none()
    }

    /// Sides in CSS order (top, right, bottom, left), unset sides as zero
    pub fn sides(&self) -> [f64; 4] {
        [
            self.top.unwrap_or(0.0),
            self.right.unwrap_or(0.0),
            self.bottom.unwrap_or(0.0),
            self.left.unwrap_or(0.0),
        ]
    }
}

/// Single length value
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Dimension {
    pub size: Option<f64>,
    pub unit: Unit,
}

impl Dimension {
    pub fn new(size: f64, unit: Unit) -> Self {
        Self {
            size: Some(size),
            unit,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum WidthMode {
    #[default]
    Default,
    FullWidth,
    Inline,
    Auto,
    Custom,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PositionMode {
    #[default]
    Default,
    Relative,
    Absolute,
    Fixed,
    Sticky,
}

impl PositionMode {
    pub fn as_css(&self) -> Option<&'static str> {
        match self {
            PositionMode::Default => None,
            PositionMode::Relative => Some("relative"),
            PositionMode::Absolute => Some("absolute"),
            PositionMode::Fixed => Some("fixed"),
            PositionMode::Sticky => Some("sticky"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct LayoutSettings {
    pub margin: BoxSides,
    pub padding: BoxSides,
    pub width: WidthMode,
    /// Only read when `width` is [`WidthMode::Custom`]
    pub custom_width: Dimension,
    pub position: PositionMode,
    pub z_index: Option<i32>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AnimationSpeed {
    Slow,
    #[default]
    Normal,
    Fast,
}

impl AnimationSpeed {
    pub fn as_str(&self) -> &'static str {
        match self {
            AnimationSpeed::Slow => "slow",
            AnimationSpeed::Normal => "normal",
            AnimationSpeed::Fast => "fast",
        }
    }
}

/// Entrance motion played when the element scrolls into view
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct MotionSettings {
    /// Animation name (e.g. `fadeIn`, `zoomIn`); `None` disables motion
    pub entrance_animation: Option<String>,
    pub duration: AnimationSpeed,
    pub delay_ms: u32,
}

/// 2D transform. Angles are in degrees, offsets in pixels.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct TransformSettings {
    pub rotate: f64,
    pub scale: f64,
    pub offset_x: f64,
    pub offset_y: f64,
    pub skew_x: f64,
    pub skew_y: f64,
}

impl Default for TransformSettings {
    fn default() -> Self {
        Self {
            rotate: 0.0,
            scale: 1.0,
            offset_x: 0.0,
            offset_y: 0.0,
            skew_x: 0.0,
            skew_y: 0.0,
        }
    }
}

impl TransformSettings {
    pub fn is_identity(&self) -> bool {
        *self == Self::default()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BackgroundType {
    #[default]
    None,
    /// Solid color (optionally with an image the display contract may read)
    Classic,
    Gradient,
    Image,
    Video,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct GradientSettings {
    pub color_a: Option<String>,
    pub color_b: Option<String>,
    pub angle: f64,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct BackgroundSettings {
    #[serde(rename = "type")]
    pub background_type: BackgroundType,
    pub color: Option<String>,
    pub image: Option<String>,
    pub gradient: GradientSettings,
    pub video_url: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BorderType {
    #[default]
    None,
    Solid,
    Dashed,
    Dotted,
    Double,
    Groove,
}

impl BorderType {
    pub fn as_css(&self) -> Option<&'static str> {
        match self {
            BorderType::None => None,
            BorderType::Solid => Some("solid"),
            BorderType::Dashed => Some("dashed"),
            BorderType::Dotted => Some("dotted"),
            BorderType::Double => Some("double"),
            BorderType::Groove => Some("groove"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct BorderSettings {
    #[serde(rename = "type")]
    pub border_type: BorderType,
    pub color: Option<String>,
    pub width: BoxSides,
}

/// A visual property with a normal and a hover state
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(
    default,
    rename_all = "camelCase",
    bound(deserialize = "T: Deserialize<'de> + Default")
)]
pub struct Stateful<T> {
    pub normal: T,
    pub hover: T,
    /// Duration of the normal → hover transition
    pub transition_ms: Option<u32>,
}

impl<T> Stateful<T> {
    pub fn new(normal: T, hover: T) -> Self {
        Self {
            normal,
            hover,
            transition_ms: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct BorderGroup {
    pub normal: BorderSettings,
    pub hover: BorderSettings,
    /// Corner radius, compiled whether or not a border is drawn
    pub radius: BoxSides,
    pub transition_ms: Option<u32>,
}

/// Per-device visibility. Carried through compilation unevaluated.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ResponsiveSettings {
    pub hide_desktop: bool,
    pub hide_tablet: bool,
    pub hide_mobile: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct AttributeSettings {
    pub css_id: String,
    /// Whitespace-separated class list
    pub css_classes: String,
    /// One `key|value` pair per line
    pub custom: String,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct AdvancedSettings {
    pub layout: LayoutSettings,
    pub motion: MotionSettings,
    pub transform: Stateful<TransformSettings>,
    pub background: Stateful<BackgroundSettings>,
    pub border: BorderGroup,
    pub responsive: ResponsiveSettings,
    pub attributes: AttributeSettings,
    /// Raw CSS; the word `selector` targets the element itself
    pub custom_css: String,
}

impl AdvancedSettings {
    /// Decode `value`, resetting only the fields that fail to decode.
    ///
    /// Returns the settings and the dotted paths of every field that was
    /// reset to its default.
    pub fn decode_lenient(value: Value) -> (Self, Vec<String>) {
        if let Ok(advanced) = serde_json::from_value(value.clone()) {
            return (advanced, Vec::new());
        }

        let mut reset = Vec::new();
        let mut map = match value {
            Value::Object(map) => map,
            Value::Null => return (Self::default(), reset),
            _ => {
                reset.push(String::new());
                return (Self::default(), reset);
            }
        };

        let mut group = |key: &str| map.remove(key).unwrap_or(Value::Null);
        let advanced = Self {
            layout: decode_group(group("layout"), "layout", &mut reset),
            motion: decode_group(group("motion"), "motion", &mut reset),
            transform: decode_group(group("transform"), "transform", &mut reset),
            background: decode_group(group("background"), "background", &mut reset),
            border: decode_group(group("border"), "border", &mut reset),
            responsive: decode_group(group("responsive"), "responsive", &mut reset),
            attributes: decode_group(group("attributes"), "attributes", &mut reset),
            custom_css: decode_group(group("customCss"), "customCss", &mut reset),
        };
        (advanced, reset)
    }
}

/// Decode one group, keeping each of its fields that decodes on its own
fn decode_group<T>(value: Value, path: &str, reset: &mut Vec<String>) -> T
where
    T: DeserializeOwned + Default,
{
    if value.is_null() {
        return T::default();
    }
    if let Ok(decoded) = serde_json::from_value(value.clone()) {
        return decoded;
    }

    let Value::Object(fields) = value else {
        reset.push(path.to_string());
        return T::default();
    };

    let mut accepted = Map::new();
    for (key, field) in fields {
        let mut candidate = accepted.clone();
        candidate.insert(key.clone(), field);
        if serde_json::from_value::<T>(Value::Object(candidate.clone())).is_ok() {
            accepted = candidate;
        } else {
            reset.push(format!("{}.{}", path, key));
        }
    }
    serde_json::from_value(Value::Object(accepted)).unwrap_or_default()
}
