// SPDX-FileCopyrightText: 2025 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

/// Text rendering of report values.
///
/// Objects render as one line per key, arrays as one `[i]` line per item and
/// scalars as a line with their display text. Children are indented by two
/// spaces below their parent.
use std::fmt::Write as _;

use serde_json::{Map, Value};

/// Top-level key holding the owner profile section.
const OWNER_PROFILE_KEY: &str = "ownerProfile";

/// Subset of report keys to present.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq,)]
pub enum ReportView
{
    /// Every key.
    #[default]
    All,
    /// Every key except the owner profile.
    Repository,
    /// Only the owner profile.
    Profile,
}

impl ReportView
{
    /// Returns the keys of `report` selected by the view, in their existing
    /// order. Non-object values are returned unchanged.
    pub fn select(self, report: &Value,) -> Value
    {
        let Value::Object(entries,) = report else {
            return report.clone();
        };

        let selected: Map<String, Value,> = entries
            .iter()
            .filter(|(key, _,)| match self {
                Self::All => true,
                Self::Repository => key.as_str() != OWNER_PROFILE_KEY,
                Self::Profile => key.as_str() == OWNER_PROFILE_KEY,
            },)
            .map(|(key, value,)| (key.clone(), value.clone(),),)
            .collect();

        Value::Object(selected,)
    }
}

/// Renders `value` as an indented tree.
///
/// # Examples
///
/// ```
/// use serde_json::json;
///
/// let text = gh_insight::render_tree(&json!({ "topics": ["rust"] }));
/// assert_eq!(text, "topics\n  [0]\n    rust\n");
/// ```
pub fn render_tree(value: &Value,) -> String
{
    let mut output = String::new();
    render_node(&mut output, value, 0,);
    output
}

fn render_node(output: &mut String, value: &Value, depth: usize,)
{
    match value {
        Value::Object(entries,) => {
            for (key, child,) in entries {
                push_line(output, depth, key,);
                render_node(output, child, depth + 1,);
            }
        }
        Value::Array(items,) => {
            for (index, item,) in items.iter().enumerate() {
                push_line(output, depth, &format!("[{index}]"),);
                render_node(output, item, depth + 1,);
            }
        }
        Value::String(text,) => push_line(output, depth, text,),
        scalar => push_line(output, depth, &scalar.to_string(),),
    }
}

fn push_line(output: &mut String, depth: usize, text: &str,)
{
    let _ = writeln!(output, "{:indent$}{text}", "", indent = depth * 2);
}
