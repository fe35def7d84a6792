use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Site-wide named colors, supplied by the host
///
/// Display contracts accept color values of the form `theme:<name>` and
/// resolve them here. The tree itself only ever stores the reference.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Theme {
    pub colors: BTreeMap<String, String>,
    pub font_family: Option<String>,
}

impl Default for Theme {
    fn default() -> Self {
        let colors = [
            ("primary", "#6EC1E4"),
            ("secondary", "#54595F"),
            ("text", "#7A7A7A"),
            ("accent", "#61CE70"),
        ]
        .into_iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();

        Self {
            colors,
            font_family: None,
        }
    }
}

impl Theme {
    /// Resolve a stored color value.
    ///
    /// Literal colors pass through. `theme:<name>` references resolve to the
    /// named color, or `None` if the theme lacks it. Empty values are unset.
    pub fn resolve_color(&self, value: &str) -> Option<String> {
        let value = value.trim();
        if value.is_empty() {
            return None;
        }
        match value.strip_prefix("theme:") {
            Some(name) => self.colors.get(name).cloned(),
            None => Some(value.to_string()),
        }
    }
}
