//
//  redmine-cli
//  api/common/custom_fields.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! Custom Field Values
//!
//! A Redmine custom field carries either one string or a list of strings,
//! discriminated by the sibling `multiple` flag:
//!
//! ```json
//! {"id": 3, "name": "Color", "value": "blue"}
//! {"id": 7, "name": "Tags", "multiple": true, "value": ["a", "b"]}
//! ```
//!
//! Decoding reads the flag first and then inspects the raw JSON value. When
//! the two disagree the value collapses to the empty slot for the flag
//! instead of failing the whole response.

use serde::Deserialize;
use serde_json::Value;

use super::codec::nullable;

/// The value slot of a [`CustomField`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CustomFieldValue {
    /// Value of a single-valued field.
    Single(String),
    /// Values of a field with `multiple = true`.
    Multiple(Vec<String>),
}

impl Default for CustomFieldValue {
    fn default() -> Self {
        Self::Single(String::new())
    }
}

/// A custom field attached to an issue, project, user, version, group or
/// time entry.
///
/// Whether the field is multi-valued follows from its [`CustomFieldValue`]
/// variant; see [`is_multiple`](Self::is_multiple).
///
/// # Example
///
/// ```rust
/// use redmine_cli::api::common::CustomField;
///
/// let field: CustomField =
///     serde_json::from_str(r#"{"id": 7, "multiple": true, "value": ["a", 3, "b"]}"#).unwrap();
/// assert!(field.is_multiple());
/// assert_eq!(field.values(), ["a", "b"]);
/// assert_eq!(field.value(), "");
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(from = "RawCustomField")]
pub struct CustomField {
    pub id: u64,
    pub name: String,
    pub value: CustomFieldValue,
}

impl CustomField {
    /// Creates a single-valued field for writing.
    pub fn single(id: u64, value: impl Into<String>) -> Self {
        Self {
            id,
            value: CustomFieldValue::Single(value.into()),
            ..Default::default()
        }
    }

    /// Creates a multi-valued field for writing.
    pub fn multiple(id: u64, values: Vec<String>) -> Self {
        Self {
            id,
            value: CustomFieldValue::Multiple(values),
            ..Default::default()
        }
    }

    /// True when the field holds a list of values.
    pub fn is_multiple(&self) -> bool {
        matches!(self.value, CustomFieldValue::Multiple(_))
    }

    /// The scalar value, or `""` for a multi-valued field.
    pub fn value(&self) -> &str {
        match &self.value {
            CustomFieldValue::Single(v) => v,
            CustomFieldValue::Multiple(_) => "",
        }
    }

    /// The list value, or an empty slice for a single-valued field.
    pub fn values(&self) -> &[String] {
        match &self.value {
            CustomFieldValue::Multiple(vs) => vs,
            CustomFieldValue::Single(_) => &[],
        }
    }
}

#[derive(Deserialize)]
struct RawCustomField {
    #[serde(default, deserialize_with = "nullable")]
    id: u64,
    #[serde(default, deserialize_with = "nullable")]
    name: String,
    #[serde(default, deserialize_with = "nullable")]
    multiple: bool,
    #[serde(default)]
    value: Option<Value>,
}

impl From<RawCustomField> for CustomField {
    fn from(raw: RawCustomField) -> Self {
        let value = if raw.multiple {
            let items = match raw.value {
                Some(Value::Array(items)) => items
                    .into_iter()
                    .filter_map(|item| match item {
                        Value::String(s) => Some(s),
                        _ => None,
                    })
                    .collect(),
                _ => Vec::new(),
            };
            CustomFieldValue::Multiple(items)
        } else {
            match raw.value {
                Some(Value::String(s)) => CustomFieldValue::Single(s),
                _ => CustomFieldValue::Single(String::new()),
            }
        };

        Self {
            id: raw.id,
            name: raw.name,
            value,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn decode(json: &str) -> CustomField {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn test_single_value() {
        let field = decode(r#"{"id": 3, "name": "Color", "value": "blue"}"#);
        assert_eq!(field.value(), "blue");
        assert!(field.values().is_empty());
        assert!(!field.is_multiple());
    }

    #[test]
    fn test_multiple_value() {
        let field = decode(r#"{"id": 7, "name": "Tags", "multiple": true, "value": ["a", "b"]}"#);
        assert_eq!(field.values(), ["a", "b"]);
        assert_eq!(field.value(), "");
        assert!(field.is_multiple());
    }

    #[test]
    fn test_multiple_follows_value() {
        assert!(CustomField::multiple(7, vec!["a".to_string()]).is_multiple());
        assert!(!CustomField::single(3, "blue").is_multiple());

        let field = CustomField {
            id: 9,
            value: CustomFieldValue::Multiple(vec!["x".to_string()]),
            ..Default::default()
        };
        assert!(field.is_multiple());

        let field = CustomField {
            value: CustomFieldValue::Single("y".to_string()),
            ..field
        };
        assert!(!field.is_multiple());
    }

    #[test]
    fn test_array_when_single_is_zero() {
        let field = decode(r#"{"id": 3, "multiple": false, "value": ["a"]}"#);
        assert_eq!(field.value, CustomFieldValue::Single(String::new()));
    }

    #[test]
    fn test_string_when_multiple_is_zero() {
        let field = decode(r#"{"id": 3, "multiple": true, "value": "a"}"#);
        assert_eq!(field.value, CustomFieldValue::Multiple(Vec::new()));
    }

    #[test]
    fn test_null_value() {
        let field = decode(r#"{"id": 3, "name": null, "value": null}"#);
        assert_eq!(field.name, "");
        assert_eq!(field.value(), "");
    }
}
