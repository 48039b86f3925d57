#![forbid(unsafe_code)]

//! Breakpoint tables and decoding of the serialized custom-table attribute.
//!
//! A [`BreakpointTable`] maps tier names (`"SM"`, `"MD"`, ...) to a minimum
//! container width. Each tier is evaluated on its own: the table imposes no
//! ordering between tiers, and thresholds need not be sorted.
//!
//! # Wire format
//!
//! Containers may carry a custom table as a flat JSON object:
//!
//! ```text
//! data-breakpoints='{"SM":384,"MD":576,"XL":1200}'
//! ```
//!
//! [`decode_custom_table`] accepts that string. An absent or blank attribute
//! means "no custom table"; anything else that is not a valid table is a
//! [`ConfigParseError`], which the registry answers by falling back to the
//! default table.
//!
//! # Failure Modes
//!
//! | Failure | Cause | Behavior |
//! |---------|-------|----------|
//! | Malformed JSON | `{not valid json}` | `ConfigParseError::Json` |
//! | Wrong shape | `[1, 2]`, `"SM"` | `ConfigParseError::NotAnObject` |
//! | Bad tier name | `""`, `"a b"` | `ConfigParseError::InvalidTierName` |
//! | Bad threshold | `-1`, `"wide"`, `null` | `ConfigParseError::InvalidThreshold` |

use std::sync::OnceLock;

use serde::ser::{Serialize, SerializeMap, Serializer};
use serde_json::{Map, Value};

/// Canonical tiers used when a container supplies no custom table.
pub const DEFAULT_TIERS: [(&str, f64); 4] = [
    ("SM", 384.0),
    ("MD", 576.0),
    ("LG", 768.0),
    ("XL", 960.0),
];

/// Errors from decoding a serialized custom table.
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigParseError {
    /// Malformed JSON.
    Json(String),
    /// Valid JSON, but not an object of tier thresholds.
    NotAnObject,
    /// Tier names become class tokens, so they must be non-empty and free of
    /// whitespace.
    InvalidTierName(String),
    /// Threshold is not a finite, non-negative number.
    InvalidThreshold { tier: String, value: String },
}

impl core::fmt::Display for ConfigParseError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::Json(msg) => write!(f, "JSON parse error: {msg}"),
            Self::NotAnObject => write!(f, "breakpoint table must be a JSON object"),
            Self::InvalidTierName(name) => write!(f, "invalid tier name: {name:?}"),
            Self::InvalidThreshold { tier, value } => {
                write!(f, "invalid threshold for tier '{tier}': {value}")
            }
        }
    }
}

impl std::error::Error for ConfigParseError {}

/// One named tier and its inclusive minimum width.
#[derive(Debug, Clone, PartialEq)]
pub struct Tier {
    pub name: String,
    pub min_width: f64,
}

/// Mapping from tier name to minimum width, in insertion order.
///
/// # Invariants
///
/// 1. Tier names are unique; inserting an existing name replaces its
///    threshold in place.
/// 2. Every threshold is finite and non-negative.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct BreakpointTable {
    tiers: Vec<Tier>,
}

impl BreakpointTable {
    /// Create an empty table. An empty table resolves to no tiers.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The process-wide default table (SM=384, MD=576, LG=768, XL=960).
    #[must_use]
    pub fn standard() -> &'static BreakpointTable {
        static STANDARD: OnceLock<BreakpointTable> = OnceLock::new();
        STANDARD.get_or_init(|| {
            let mut table = BreakpointTable::new();
            for (name, min_width) in DEFAULT_TIERS {
                table.tiers.push(Tier {
                    name: name.to_string(),
                    min_width,
                });
            }
            table
        })
    }

    /// Builder-style insert.
    ///
    /// # Errors
    ///
    /// Returns an error if the name is not a usable class token or the
    /// threshold is negative or not finite.
    pub fn with_tier(
        mut self,
        name: impl Into<String>,
        min_width: f64,
    ) -> Result<Self, ConfigParseError> {
        self.insert(name, min_width)?;
        Ok(self)
    }

    /// Insert or replace a tier.
    ///
    /// # Errors
    ///
    /// See [`with_tier`](Self::with_tier).
    pub fn insert(
        &mut self,
        name: impl Into<String>,
        min_width: f64,
    ) -> Result<(), ConfigParseError> {
        let name = name.into();
        validate_tier_name(&name)?;
        if !min_width.is_finite() || min_width < 0.0 {
            return Err(ConfigParseError::InvalidThreshold {
                tier: name,
                value: min_width.to_string(),
            });
        }
        match self.tiers.iter_mut().find(|t| t.name == name) {
            Some(tier) => tier.min_width = min_width,
            None => self.tiers.push(Tier { name, min_width }),
        }
        Ok(())
    }

    /// Threshold for `name`, if the tier exists.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<f64> {
        self.tiers
            .iter()
            .find(|t| t.name == name)
            .map(|t| t.min_width)
    }

    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.tiers.iter().any(|t| t.name == name)
    }

    /// Tiers in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &Tier> {
        self.tiers.iter()
    }

    /// Tier names in insertion order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.tiers.iter().map(|t| t.name.as_str())
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.tiers.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tiers.is_empty()
    }

    /// Decode a table from its attribute form.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigParseError`] for malformed JSON, a non-object value,
    /// an unusable tier name or an invalid threshold.
    pub fn from_attribute_value(raw: &str) -> Result<Self, ConfigParseError> {
        let value: Value =
            serde_json::from_str(raw).map_err(|e| ConfigParseError::Json(e.to_string()))?;
        let Value::Object(entries) = value else {
            return Err(ConfigParseError::NotAnObject);
        };
        from_json_map(entries)
    }

    /// Encode the table in the form [`from_attribute_value`](Self::from_attribute_value)
    /// accepts, preserving insertion order.
    #[must_use]
    pub fn to_attribute_value(&self) -> String {
        // Serializing a map of finite f64 values cannot fail.
        serde_json::to_string(self).unwrap_or_else(|_| String::from("{}"))
    }
}

impl Serialize for BreakpointTable {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.tiers.len()))?;
        for tier in &self.tiers {
            map.serialize_entry(&tier.name, &tier.min_width)?;
        }
        map.end()
    }
}

/// Decode an optional custom-table attribute.
///
/// Absent or blank input yields `Ok(None)`: the container simply has no
/// custom table.
///
/// # Errors
///
/// Any non-blank input that does not decode to a table.
pub fn decode_custom_table(
    raw: Option<&str>,
) -> Result<Option<BreakpointTable>, ConfigParseError> {
    match raw.map(str::trim) {
        None | Some("") => Ok(None),
        Some(text) => BreakpointTable::from_attribute_value(text).map(Some),
    }
}

fn from_json_map(entries: Map<String, Value>) -> Result<BreakpointTable, ConfigParseError> {
    let mut table = BreakpointTable::new();
    for (name, value) in entries {
        let min_width = value
            .as_f64()
            .filter(|w| w.is_finite() && *w >= 0.0)
            .ok_or_else(|| ConfigParseError::InvalidThreshold {
                tier: name.clone(),
                value: value.to_string(),
            })?;
        table.insert(name, min_width)?;
    }
    Ok(table)
}

fn validate_tier_name(name: &str) -> Result<(), ConfigParseError> {
    if name.is_empty() || name.chars().any(char::is_whitespace) {
        return Err(ConfigParseError::InvalidTierName(name.to_string()));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn standard_table_has_canonical_values() {
        let table = BreakpointTable::standard();
        let tiers: Vec<(&str, f64)> = table
            .iter()
            .map(|t| (t.name.as_str(), t.min_width))
            .collect();
        assert_eq!(tiers, DEFAULT_TIERS.to_vec());
    }

    #[test]
    fn decode_preserves_insertion_order() {
        let table = BreakpointTable::from_attribute_value(r#"{"XL":1200,"SM":300,"MD":600}"#)
            .expect("valid table");
        assert_eq!(table.names().collect::<Vec<_>>(), vec!["XL", "SM", "MD"]);
        assert_eq!(table.get("SM"), Some(300.0));
    }

    #[test]
    fn decode_accepts_fractional_and_zero_thresholds() {
        let table = BreakpointTable::from_attribute_value(r#"{"ANY":0,"HALF":320.5}"#).unwrap();
        assert_eq!(table.get("ANY"), Some(0.0));
        assert_eq!(table.get("HALF"), Some(320.5));
    }

    #[test]
    fn decode_empty_object_is_legal() {
        let table = BreakpointTable::from_attribute_value("{}").unwrap();
        assert!(table.is_empty());
    }

    #[test]
    fn decode_malformed_json() {
        let err = BreakpointTable::from_attribute_value("{not valid json}").unwrap_err();
        assert!(matches!(err, ConfigParseError::Json(_)));
    }

    #[test]
    fn decode_rejects_non_objects() {
        for raw in ["[1,2]", "\"SM\"", "42", "null"] {
            assert_eq!(
                BreakpointTable::from_attribute_value(raw),
                Err(ConfigParseError::NotAnObject),
                "{raw}"
            );
        }
    }

    #[test]
    fn decode_rejects_bad_thresholds() {
        for raw in [r#"{"SM":-1}"#, r#"{"SM":"wide"}"#, r#"{"SM":null}"#, r#"{"SM":[1]}"#] {
            let err = BreakpointTable::from_attribute_value(raw).unwrap_err();
            assert!(
                matches!(err, ConfigParseError::InvalidThreshold { ref tier, .. } if tier == "SM"),
                "{raw}: {err}"
            );
        }
    }

    #[test]
    fn decode_rejects_unusable_names() {
        let err = BreakpointTable::from_attribute_value(r#"{"two words":10}"#).unwrap_err();
        assert_eq!(err, ConfigParseError::InvalidTierName("two words".into()));
        let err = BreakpointTable::from_attribute_value(r#"{"":10}"#).unwrap_err();
        assert_eq!(err, ConfigParseError::InvalidTierName(String::new()));
    }

    #[test]
    fn blank_attribute_means_no_custom_table() {
        assert_eq!(decode_custom_table(None), Ok(None));
        assert_eq!(decode_custom_table(Some("")), Ok(None));
        assert_eq!(decode_custom_table(Some("   ")), Ok(None));
    }

    #[test]
    fn insert_replaces_in_place() {
        let mut table = BreakpointTable::new()
            .with_tier("A", 10.0)
            .and_then(|t| t.with_tier("B", 20.0))
            .unwrap();
        table.insert("A", 15.0).unwrap();
        assert_eq!(table.len(), 2);
        assert_eq!(table.names().collect::<Vec<_>>(), vec!["A", "B"]);
        assert_eq!(table.get("A"), Some(15.0));
    }

    #[test]
    fn insert_rejects_non_finite_threshold() {
        let mut table = BreakpointTable::new();
        assert!(table.insert("A", f64::NAN).is_err());
        assert!(table.insert("A", f64::INFINITY).is_err());
        assert!(table.is_empty());
    }

    #[test]
    fn attribute_value_reads_back() {
        let table = BreakpointTable::new()
            .with_tier("FOO", 100.0)
            .and_then(|t| t.with_tier("BAR", 250.5))
            .unwrap();
        let raw = table.to_attribute_value();
        assert_eq!(raw, r#"{"FOO":100.0,"BAR":250.5}"#);
        assert_eq!(BreakpointTable::from_attribute_value(&raw).unwrap(), table);
    }

    #[test]
    fn error_display() {
        let err = ConfigParseError::InvalidThreshold {
            tier: "SM".into(),
            value: "-1".into(),
        };
        assert_eq!(err.to_string(), "invalid threshold for tier 'SM': -1");
    }
}
