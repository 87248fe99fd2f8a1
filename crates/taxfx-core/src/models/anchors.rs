//! Anchor configuration: which fields to extract and how to find them.

use std::collections::HashSet;
use std::fmt;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::ConfigError;

/// Geometric rule used to find a field's value relative to its anchor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Strategy {
    /// Nearest non-empty block to the right, on the anchor's row band.
    #[default]
    Right,
    /// Nearest non-empty block below, aligned with the anchor's column.
    Below,
    /// Nearest numeric-looking block, same row first, then anywhere.
    NearestNumeric,
}

impl Strategy {
    /// Wire name of the strategy.
    pub fn as_str(&self) -> &'static str {
        match self {
            Strategy::Right => "right",
            Strategy::Below => "below",
            Strategy::NearestNumeric => "nearest_numeric",
        }
    }

    /// Parse a wire name.
    pub fn parse(name: &str) -> Option<Self> {
        match name {
            "right" => Some(Strategy::Right),
            "below" => Some(Strategy::Below),
            "nearest_numeric" => Some(Strategy::NearestNumeric),
            _ => None,
        }
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Values used when a field entry leaves tolerance or strategy unset.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ToleranceDefaults {
    /// Strategy for entries without one.
    pub strategy: Strategy,
    /// Row band half-height for `right` and `nearest_numeric`.
    pub y_slack: f64,
    /// Column alignment slack for `below`.
    pub x_slack: f64,
    /// Whether `nearest_numeric` restricts its first pass to the right side.
    pub prefer_right: bool,
}

impl Default for ToleranceDefaults {
    fn default() -> Self {
        Self {
            strategy: Strategy::Right,
            y_slack: 60.0,
            x_slack: 40.0,
            prefer_right: true,
        }
    }
}

/// Resolved slack values of a field.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Tolerance {
    pub y_slack: f64,
    pub x_slack: f64,
}

/// A declarative rule describing one field to extract.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FieldSpec {
    /// Output field name, unique within a configuration.
    pub key: String,
    /// Anchor text, matched as a case-insensitive substring.
    pub label: String,
    /// Search strategy.
    pub strategy: Strategy,
    /// Slack values, fixed for the whole run.
    pub tolerance: Tolerance,
    /// Only consulted by `nearest_numeric`.
    pub prefer_right: bool,
}

impl FieldSpec {
    /// Create a field with the stock tolerances.
    pub fn new(key: impl Into<String>, label: impl Into<String>, strategy: Strategy) -> Self {
        let defaults = ToleranceDefaults::default();
        Self {
            key: key.into(),
            label: label.into(),
            strategy,
            tolerance: Tolerance {
                y_slack: defaults.y_slack,
                x_slack: defaults.x_slack,
            },
            prefer_right: defaults.prefer_right,
        }
    }

    pub fn with_y_slack(mut self, y_slack: f64) -> Self {
        self.tolerance.y_slack = y_slack;
        self
    }
}

/// Year tag of a configuration; documents carry it as a string or a number.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AnchorYear {
    Number(i64),
    Text(String),
}

impl fmt::Display for AnchorYear {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AnchorYear::Number(n) => write!(f, "{}", n),
            AnchorYear::Text(s) => f.write_str(s),
        }
    }
}

/// Keys the result record uses for its own entries.
pub const RESERVED_KEYS: [&str; 2] = ["_meta", "_evidence"];

/// Ordered field rules plus the form year they were tuned for.
///
/// Deserializing fills unset values from [`ToleranceDefaults::default`] and
/// validates, exactly like [`AnchorConfiguration::from_json_str`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawConfiguration")]
pub struct AnchorConfiguration {
    pub year: Option<AnchorYear>,
    pub fields: Vec<FieldSpec>,
}

#[derive(Deserialize)]
struct RawConfiguration {
    year: Option<AnchorYear>,
    #[serde(default)]
    fields: Vec<RawFieldSpec>,
}

#[derive(Deserialize)]
struct RawFieldSpec {
    key: Option<String>,
    label: Option<String>,
    strategy: Option<String>,
    #[serde(default)]
    tolerance: RawTolerance,
    prefer_right: Option<bool>,
}

#[derive(Deserialize, Default)]
struct RawTolerance {
    y_slack: Option<f64>,
    x_slack: Option<f64>,
}

impl TryFrom<RawConfiguration> for AnchorConfiguration {
    type Error = ConfigError;

    fn try_from(raw: RawConfiguration) -> Result<Self, Self::Error> {
        Self::from_raw(raw, &ToleranceDefaults::default())
    }
}

impl AnchorConfiguration {
    pub fn new(year: Option<AnchorYear>, fields: Vec<FieldSpec>) -> Self {
        Self { year, fields }
    }

    /// Parse a configuration document using the stock defaults.
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        Self::from_json_str_with(json, &ToleranceDefaults::default())
    }

    /// Parse a configuration document, filling unset values from `defaults`.
    pub fn from_json_str_with(json: &str, defaults: &ToleranceDefaults) -> Result<Self, ConfigError> {
        let raw: RawConfiguration =
            serde_json::from_str(json).map_err(|e| ConfigError::Parse(e.to_string()))?;
        Self::from_raw(raw, defaults)
    }

    /// Load a configuration document from disk.
    pub fn from_file(path: &Path, defaults: &ToleranceDefaults) -> crate::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config = Self::from_json_str_with(&content, defaults)?;
        debug!(
            "Loaded {} field rules from {}",
            config.fields.len(),
            path.display()
        );
        Ok(config)
    }

    fn from_raw(raw: RawConfiguration, defaults: &ToleranceDefaults) -> Result<Self, ConfigError> {
        let mut fields = Vec::with_capacity(raw.fields.len());

        for (index, entry) in raw.fields.into_iter().enumerate() {
            let key = entry
                .key
                .ok_or(ConfigError::MissingKey { index, key: "key" })?;
            let label = entry
                .label
                .ok_or(ConfigError::MissingKey { index, key: "label" })?;

            let strategy = match entry.strategy.as_deref() {
                None => defaults.strategy,
                Some(name) => Strategy::parse(name).ok_or_else(|| ConfigError::UnknownStrategy {
                    key: key.clone(),
                    strategy: name.to_string(),
                })?,
            };

            fields.push(FieldSpec {
                key,
                label,
                strategy,
                tolerance: Tolerance {
                    y_slack: entry.tolerance.y_slack.unwrap_or(defaults.y_slack),
                    x_slack: entry.tolerance.x_slack.unwrap_or(defaults.x_slack),
                },
                prefer_right: entry.prefer_right.unwrap_or(defaults.prefer_right),
            });
        }

        let config = Self {
            year: raw.year,
            fields,
        };
        config.validate()?;
        Ok(config)
    }

    /// Check the rules before any page is scanned.
    ///
    /// Stricter than a presence check: besides `key` and `label` existing,
    /// keys must be unique and must not be `_meta` or `_evidence`, key and
    /// label must not be blank, and both slacks must be finite and
    /// non-negative.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let mut seen = HashSet::with_capacity(self.fields.len());

        for (index, field) in self.fields.iter().enumerate() {
            if field.key.trim().is_empty() {
                return Err(ConfigError::EmptyValue { index, key: "key" });
            }
            if field.label.trim().is_empty() {
                return Err(ConfigError::EmptyValue { index, key: "label" });
            }
            if RESERVED_KEYS.contains(&field.key.as_str()) {
                return Err(ConfigError::ReservedKey {
                    index,
                    key: field.key.clone(),
                });
            }
            if !seen.insert(field.key.as_str()) {
                return Err(ConfigError::DuplicateKey {
                    index,
                    key: field.key.clone(),
                });
            }

            for (name, value) in [
                ("y_slack", field.tolerance.y_slack),
                ("x_slack", field.tolerance.x_slack),
            ] {
                if !value.is_finite() || value < 0.0 {
                    return Err(ConfigError::InvalidSlack {
                        key: field.key.clone(),
                        name,
                        value,
                    });
                }
            }
        }

        Ok(())
    }
}
