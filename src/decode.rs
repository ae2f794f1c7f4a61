// SPDX-FileCopyrightText: 2025 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! Decode-with-default accessors over raw GitHub JSON.
//!
//! Every fetcher reads upstream objects through [`Fields`], so a missing field
//! resolves to the same default everywhere: `"N/A"` or `""` for text chosen by
//! the caller, `0` for counts and `false` for flags. Fields GitHub documents
//! as nullable are read with the `nullable_*` accessors, which keep an
//! explicit `null` instead of substituting the default.

use serde_json::Value;

/// Placeholder for absent identity or timestamp strings.
pub const NOT_AVAILABLE: &str = "N/A";

/// Borrowed view over a JSON object with defaulting accessors.
///
/// Non-object values behave like an empty object.
#[derive(Debug, Clone, Copy,)]
pub struct Fields<'a,>
{
    value: &'a Value,
}

impl<'a,> Fields<'a,>
{
    /// Wraps a JSON value.
    pub fn new(value: &'a Value,) -> Self
    {
        Self {
            value,
        }
    }

    fn field(&self, key: &str,) -> Option<&'a Value,>
    {
        self.value.get(key,).filter(|value| !value.is_null(),)
    }

    /// Returns the field as text, or `default` when absent.
    ///
    /// Scalars that are not strings are rendered with their JSON text.
    pub fn text(&self, key: &str, default: &str,) -> String
    {
        match self.field(key,) {
            Some(Value::String(text,),) => text.clone(),
            Some(other,) => other.to_string(),
            None => default.to_owned(),
        }
    }

    /// Returns the field as text, `None` when it is present but `null`, or
    /// `default` when absent.
    pub fn nullable_text(&self, key: &str, default: &str,) -> Option<String,>
    {
        match self.value.get(key,) {
            None => Some(default.to_owned(),),
            Some(Value::Null,) => None,
            Some(_,) => Some(self.text(key, default,),),
        }
    }

    /// Returns the field as a flag, `None` when it is present but `null`, or
    /// `false` when absent.
    pub fn nullable_flag(&self, key: &str,) -> Option<bool,>
    {
        match self.value.get(key,) {
            Some(Value::Null,) => None,
            _ => Some(self.flag(key,),),
        }
    }

    /// Returns the field as a signed integer, or `0`.
    pub fn signed(&self, key: &str,) -> i64
    {
        self.field(key,).and_then(Value::as_i64,).unwrap_or_default()
    }

    /// Returns the field as an unsigned count, or `0`.
    pub fn count(&self, key: &str,) -> u64
    {
        self.field(key,).and_then(Value::as_u64,).unwrap_or_default()
    }

    /// Returns the field as a flag, or `false`.
    pub fn flag(&self, key: &str,) -> bool
    {
        self.field(key,).and_then(Value::as_bool,).unwrap_or_default()
    }

    /// Returns the nested object stored under `key`.
    pub fn nested(&self, key: &str,) -> Option<Fields<'a,>,>
    {
        self.field(key,).filter(|value| value.is_object(),).map(Fields::new,)
    }

    /// Returns `object[key][inner]` as text, or `None` when either level is
    /// absent.
    pub fn nested_text(&self, key: &str, inner: &str,) -> Option<String,>
    {
        self.nested(key,)?.field(inner,).map(|value| match value {
            Value::String(text,) => text.clone(),
            other => other.to_string(),
        },)
    }

    /// Returns the string elements of an array field, skipping other values.
    pub fn strings(&self, key: &str,) -> Vec<String,>
    {
        self.field(key,)
            .and_then(Value::as_array,)
            .map(|items| items.iter().filter_map(Value::as_str,).map(str::to_owned,).collect(),)
            .unwrap_or_default()
    }
}

/// Returns the `login` of the first `limit` entries of a user collection.
pub fn logins(users: &[Value], limit: usize,) -> Vec<String,>
{
    users.iter().take(limit,).map(|user| Fields::new(user,).text("login", NOT_AVAILABLE,),).collect()
}
