//
//  redmine-cli
//  api/common/codec.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! Wire Codec Helpers
//!
//! Redmine may omit any field of a response or send it as `null`. Domain
//! structs therefore decode every field through [`nullable`], which collapses
//! both cases into the type's zero value. Dates and timestamps go through
//! [`date`] and [`timestamp`], which never fail: an empty or unparsable string
//! becomes `None`.
//!
//! On the way out, every writable resource builds a private payload struct
//! whose fields are skipped with [`is_zero`]. A partial update therefore only
//! carries what the caller set.
//!
//! | Wire format | Rust type | Layout |
//! |-------------|-----------|--------|
//! | date | `Option<NaiveDate>` | `%Y-%m-%d` |
//! | timestamp | `Option<DateTime<Utc>>` | `%Y-%m-%dT%H:%M:%SZ` |

use std::collections::BTreeMap;

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use super::{ApiResult, CustomField, CustomFieldValue, Pagination};

/// Layout of date-only fields such as `start_date` and `spent_on`.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Layout of full timestamps such as `created_on`.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%SZ";

/// Deserializes a field that may be absent or `null` into its zero value.
///
/// Use together with `#[serde(default)]` so a missing key is also covered.
pub fn nullable<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Deserializes a date-only field, mapping anything unparsable to `None`.
pub fn date<'de, D>(deserializer: D) -> Result<Option<NaiveDate>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<Value>::deserialize(deserializer)?;
    Ok(raw.as_ref().and_then(Value::as_str).and_then(parse_date))
}

/// Deserializes a timestamp field, mapping anything unparsable to `None`.
pub fn timestamp<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<Value>::deserialize(deserializer)?;
    Ok(raw.as_ref().and_then(Value::as_str).and_then(parse_timestamp))
}

/// Parses a `YYYY-MM-DD` string.
///
/// # Example
///
/// ```rust
/// use redmine_cli::api::common::codec::parse_date;
///
/// assert!(parse_date("2024-02-29").is_some());
/// assert!(parse_date("").is_none());
/// assert!(parse_date("yesterday").is_none());
/// ```
pub fn parse_date(raw: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(raw.trim(), DATE_FORMAT).ok()
}

/// Parses a `YYYY-MM-DDTHH:MM:SSZ` string as UTC.
pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    NaiveDateTime::parse_from_str(raw.trim(), TIMESTAMP_FORMAT)
        .ok()
        .map(|naive| naive.and_utc())
}

/// Formats a date for the wire. `None` formats as an empty string.
///
/// # Example
///
/// ```rust
/// use chrono::NaiveDate;
/// use redmine_cli::api::common::codec::format_date;
///
/// assert_eq!(format_date(NaiveDate::from_ymd_opt(2024, 5, 1)), "2024-05-01");
/// assert_eq!(format_date(None), "");
/// ```
pub fn format_date(value: Option<NaiveDate>) -> String {
    value
        .map(|d| d.format(DATE_FORMAT).to_string())
        .unwrap_or_default()
}

/// Formats a timestamp for the wire. `None` formats as an empty string.
pub fn format_timestamp(value: Option<DateTime<Utc>>) -> String {
    value
        .map(|t| t.format(TIMESTAMP_FORMAT).to_string())
        .unwrap_or_default()
}

/// Returns `true` when `value` equals its type's default.
///
/// This is the single omission rule for every payload field: empty strings,
/// `0`, `0.0`, `false`, empty collections and `None` are never sent.
pub fn is_zero<T: Default + PartialEq>(value: &T) -> bool {
    *value == T::default()
}

/// Flattens custom fields into the `custom_field_values` write shape.
///
/// Each field becomes `"<id>": "value"` or `"<id>": ["a", "b"]` depending on
/// its value slot.
pub fn custom_field_values(fields: &[CustomField]) -> BTreeMap<String, Value> {
    fields
        .iter()
        .map(|field| {
            let value = match &field.value {
                CustomFieldValue::Single(v) => Value::String(v.clone()),
                CustomFieldValue::Multiple(vs) => {
                    Value::Array(vs.iter().cloned().map(Value::String).collect())
                }
            };
            (field.id.to_string(), value)
        })
        .collect()
}

/// Wraps a payload under its single-object resource key.
pub(crate) fn envelope<T: Serialize>(key: &'static str, payload: T) -> BTreeMap<&'static str, T> {
    BTreeMap::from([(key, payload)])
}

/// Decodes a single-object response, e.g. `{"issue": {...}}`.
///
/// A body without `key` is a decode error rather than an empty entity.
pub(crate) fn decode_single<T: DeserializeOwned>(body: &str, key: &'static str) -> ApiResult<T> {
    let mut value: Value = serde_json::from_str(body)?;
    let inner = value
        .get_mut(key)
        .map(Value::take)
        .ok_or_else(|| <serde_json::Error as serde::de::Error>::missing_field(key))?;
    Ok(serde_json::from_value(inner)?)
}

/// Decodes a list envelope into its items and pagination counters.
///
/// The counters are read independently of the array, so a short last page
/// still reports the full `total_count`. A missing or `null` array decodes
/// to an empty list.
pub(crate) fn decode_list<T: DeserializeOwned>(
    body: &str,
    key: &str,
) -> ApiResult<(Vec<T>, Pagination)> {
    let mut value: Value = serde_json::from_str(body)?;
    let pagination = Pagination::deserialize(&value)?;
    let items = match value.get_mut(key).map(Value::take) {
        None | Some(Value::Null) => Vec::new(),
        Some(raw) => serde_json::from_value(raw)?,
    };
    Ok((items, pagination))
}
