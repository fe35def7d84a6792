//! # Node Settings
//!
//! Every node carries three logical settings groups:
//!
//! - `content`: widget-specific data (titles, links, media)
//! - `style`: widget-specific visual parameters
//! - `advanced`: the universal, typed [`AdvancedSettings`] schema
//!
//! `content` and `style` are open JSON objects whose shape is owned by the
//! widget registry. Editors address individual fields with a
//! [`SettingsPath`] instead of stringly-typed key juggling; edits under
//! `advanced` are checked against the typed schema.

use crate::advanced::AdvancedSettings;
use crate::error::SettingsError;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};
use std::fmt;
use std::str::FromStr;
use tracing::warn;

pub type SettingsMap = Map<String, Value>;

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    #[serde(deserialize_with = "lenient_map")]
    pub content: SettingsMap,
    #[serde(deserialize_with = "lenient_map")]
    pub style: SettingsMap,
    #[serde(deserialize_with = "lenient_advanced")]
    pub advanced: AdvancedSettings,
}

fn lenient_map<'de, D: Deserializer<'de>>(deserializer: D) -> Result<SettingsMap, D::Error> {
    Ok(match Value::deserialize(deserializer)? {
        Value::Object(map) => map,
        _ => Map::new(),
    })
}

fn lenient_advanced<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<AdvancedSettings, D::Error> {
    let (advanced, reset) = AdvancedSettings::decode_lenient(Value::deserialize(deserializer)?);
    for field in &reset {
        warn!(field = %field, "Malformed advanced setting - using default");
    }
    Ok(advanced)
}

impl Settings {
    pub fn new(content: SettingsMap, style: SettingsMap) -> Self {
        Self {
            content,
            style,
            advanced: AdvancedSettings::default(),
        }
    }

    pub fn content_str(&self, key: &str) -> Option<&str> {
        self.content.get(key).and_then(Value::as_str)
    }

    pub fn style_str(&self, key: &str) -> Option<&str> {
        self.style.get(key).and_then(Value::as_str)
    }

    /// Read the value at `path`
    pub fn get(&self, path: &SettingsPath) -> Option<Value> {
        match path.scope {
            SettingsScope::Content => lookup(&self.content, &path.segments).cloned(),
            SettingsScope::Style => lookup(&self.style, &path.segments).cloned(),
            SettingsScope::Advanced => {
                let tree = serde_json::to_value(&self.advanced).ok()?;
                let mut current = &tree;
                for segment in &path.segments {
                    current = descend(current, segment)?;
                }
                Some(current.clone())
            }
        }
    }

    /// Return a copy with `value` written at `path`.
    ///
    /// Intermediate objects under `content`/`style` are created as needed.
    /// Under `advanced` the result must still decode as [`AdvancedSettings`].
    pub fn with_value(&self, path: &SettingsPath, value: Value) -> Result<Settings, SettingsError> {
        let mut next = self.clone();

        match path.scope {
            SettingsScope::Content => write_map(&mut next.content, path, value)?,
            SettingsScope::Style => write_map(&mut next.style, path, value)?,
            SettingsScope::Advanced => {
                let mut tree = serde_json::to_value(&self.advanced).map_err(|e| {
                    SettingsError::InvalidValue {
                        path: path.to_string(),
                        reason: e.to_string(),
                    }
                })?;
                write_value(&mut tree, &path.segments, value, path)?;
                next.advanced =
                    serde_json::from_value(tree).map_err(|e| SettingsError::InvalidValue {
                        path: path.to_string(),
                        reason: e.to_string(),
                    })?;
            }
        }

        Ok(next)
    }

    /// Fill any `content`/`style` key missing here from `defaults`, recursively.
    ///
    /// Present values always win; `null` counts as missing.
    pub fn fill_defaults(&mut self, defaults: &Settings) {
        fill_missing(&mut self.content, &defaults.content);
        fill_missing(&mut self.style, &defaults.style);
    }
}

fn lookup<'a>(map: &'a SettingsMap, segments: &[String]) -> Option<&'a Value> {
    let (first, rest) = segments.split_first()?;
    let mut current = map.get(first)?;
    for segment in rest {
        current = descend(current, segment)?;
    }
    Some(current)
}

fn descend<'a>(value: &'a Value, segment: &str) -> Option<&'a Value> {
    match value {
        Value::Object(map) => map.get(segment),
        Value::Array(items) => segment.parse::<usize>().ok().and_then(|i| items.get(i)),
        _ => None,
    }
}

fn write_map(map: &mut SettingsMap, path: &SettingsPath, value: Value) -> Result<(), SettingsError> {
    if path.segments.is_empty() {
        return match value {
            Value::Object(replacement) => {
                *map = replacement;
                Ok(())
            }
            _ => Err(SettingsError::InvalidValue {
                path: path.to_string(),
                reason: "scope must be an object".to_string(),
            }),
        };
    }

    let mut root = Value::Object(std::mem::take(map));
    let result = write_value(&mut root, &path.segments, value, path);
    if let Value::Object(restored) = root {
        *map = restored;
    }
    result
}

fn write_value(
    root: &mut Value,
    segments: &[String],
    value: Value,
    path: &SettingsPath,
) -> Result<(), SettingsError> {
    let Some((last, parents)) = segments.split_last() else {
        *root = value;
        return Ok(());
    };

    let mut current = root;
    for segment in parents {
        if current.is_null() {
            *current = Value::Object(Map::new());
        }
        current = match current {
            Value::Object(map) => map
                .entry(segment.clone())
                .or_insert_with(|| Value::Object(Map::new())),
            Value::Array(items) => segment
                .parse::<usize>()
                .ok()
                .and_then(|i| items.get_mut(i))
                .ok_or_else(|| SettingsError::InvalidPath(path.to_string()))?,
            _ => return Err(SettingsError::NotAnObject(path.to_string())),
        };
    }

    if current.is_null() {
        *current = Value::Object(Map::new());
    }
    match current {
        Value::Object(map) => {
            map.insert(last.clone(), value);
            Ok(())
        }
        Value::Array(items) => {
            let slot = last
                .parse::<usize>()
                .ok()
                .and_then(|i| items.get_mut(i))
                .ok_or_else(|| SettingsError::InvalidPath(path.to_string()))?;
            *slot = value;
            Ok(())
        }
        _ => Err(SettingsError::NotAnObject(path.to_string())),
    }
}

fn fill_missing(target: &mut SettingsMap, defaults: &SettingsMap) {
    for (key, default) in defaults {
        match target.get_mut(key) {
            None | Some(Value::Null) => {
                target.insert(key.clone(), default.clone());
            }
            Some(Value::Object(existing)) => {
                if let Value::Object(nested) = default {
                    fill_missing(existing, nested);
                }
            }
            Some(_) => {}
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SettingsScope {
    Content,
    Style,
    Advanced,
}

impl SettingsScope {
    pub fn as_str(&self) -> &'static str {
        match self {
            SettingsScope::Content => "content",
            SettingsScope::Style => "style",
            SettingsScope::Advanced => "advanced",
        }
    }
}

/// Explicit address of one settings field, e.g. `style.typography.size`
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct SettingsPath {
    pub scope: SettingsScope,
    pub segments: Vec<String>,
}

impl SettingsPath {
    pub fn new<I, S>(scope: SettingsScope, segments: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            scope,
            segments: segments.into_iter().map(Into::into).collect(),
        }
    }

    pub fn content(key: &str) -> Self {
        Self::new(SettingsScope::Content, key.split('.'))
    }

    pub fn style(key: &str) -> Self {
        Self::new(SettingsScope::Style, key.split('.'))
    }

    pub fn advanced(key: &str) -> Self {
        Self::new(SettingsScope::Advanced, key.split('.'))
    }
}

impl FromStr for SettingsPath {
    type Err = SettingsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut parts = s.split('.');
        let scope = match parts.next() {
            Some("content") => SettingsScope::Content,
            Some("style") => SettingsScope::Style,
            Some("advanced") => SettingsScope::Advanced,
            _ => return Err(SettingsError::InvalidPath(s.to_string())),
        };

        let segments: Vec<String> = parts.map(str::to_string).collect();
        if segments.iter().any(String::is_empty) {
            return Err(SettingsError::InvalidPath(s.to_string()));
        }

        Ok(Self { scope, segments })
    }
}

impl TryFrom<String> for SettingsPath {
    type Error = SettingsError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl From<SettingsPath> for String {
    fn from(path: SettingsPath) -> Self {
        path.to_string()
    }
}

impl fmt::Display for SettingsPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.scope.as_str())?;
        for segment in &self.segments {
            write!(f, ".{}", segment)?;
        }
        Ok(())
    }
}
