// Inner join of two tables on a shared key column.

use std::collections::{BTreeSet, HashMap};

use serde_json::Value;

use crate::error::{Result, WrangleError};

use super::frame::Table;

const LEFT_SUFFIX: &str = "_x";
const RIGHT_SUFFIX: &str = "_y";

/// Hashable form of a key cell. Integral floats match integers.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
enum JoinKey {
    Int(i128),
    Float(u64),
    Bool(bool),
    Text(String),
    Json(String),
}

impl JoinKey {
    /// Null keys never match anything.
    fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::Null => None,
            Value::Bool(b) => Some(Self::Bool(*b)),
            Value::Number(n) => {
                if let Some(i) = n.as_i64() {
                    Some(Self::Int(i128::from(i)))
                } else if let Some(u) = n.as_u64() {
                    Some(Self::Int(i128::from(u)))
                } else {
                    let f = n.as_f64()?;
                    if f.fract() == 0.0 && f.abs() < 1e18 {
                        Some(Self::Int(f as i128))
                    } else {
                        Some(Self::Float(f.to_bits()))
                    }
                }
            }
            Value::String(s) => Some(Self::Text(s.clone())),
            other => Some(Self::Json(other.to_string())),
        }
    }

    fn kind(&self) -> &'static str {
        match self {
            Self::Int(_) | Self::Float(_) => "number",
            Self::Bool(_) => "bool",
            Self::Text(_) => "string",
            Self::Json(_) => "json",
        }
    }
}

/// Slash-separated kinds, for error messages.
fn describe(kinds: &BTreeSet<&'static str>) -> String {
    kinds.iter().copied().collect::<Vec<_>>().join("/")
}

/// Join `left` to `right` on the column `on`, keeping only rows whose key
/// appears on both sides.
///
/// Output rows follow left row order; a left row matching several right rows
/// yields one output row per match, in right row order. The output header is
/// the left header followed by the right header without the key. Other column
/// names present on both sides get `_x` (left) and `_y` (right) suffixes.
///
/// Fails with [`WrangleError::KeyTypeMismatch`] when both key columns hold
/// values but share no value type, e.g. strings on one side and numbers on
/// the other.
pub fn inner_join(left: &Table, right: &Table, on: &str) -> Result<Table> {
    let left_key = left
        .column_index(on)
        .ok_or_else(|| WrangleError::MissingColumn(on.to_string()))?;
    let right_key = right
        .column_index(on)
        .ok_or_else(|| WrangleError::MissingColumn(on.to_string()))?;

    let right_kept: Vec<usize> = (0..right.width()).filter(|&i| i != right_key).collect();
    let columns = joined_columns(left, right, on, &right_kept);

    let mut index: HashMap<JoinKey, Vec<usize>> = HashMap::new();
    let mut right_kinds = BTreeSet::new();
    for (row_idx, row) in right.rows().iter().enumerate() {
        if let Some(key) = row.get(right_key).and_then(JoinKey::from_value) {
            right_kinds.insert(key.kind());
            index.entry(key).or_default().push(row_idx);
        }
    }

    let left_keys: Vec<Option<JoinKey>> = left
        .rows()
        .iter()
        .map(|row| row.get(left_key).and_then(JoinKey::from_value))
        .collect();
    let left_kinds: BTreeSet<&'static str> =
        left_keys.iter().flatten().map(JoinKey::kind).collect();

    if !left_kinds.is_empty() && !right_kinds.is_empty() && left_kinds.is_disjoint(&right_kinds) {
        return Err(WrangleError::KeyTypeMismatch {
            column: on.to_string(),
            left: describe(&left_kinds),
            right: describe(&right_kinds),
        });
    }

    let mut joined = Table::new(columns);
    for (left_row, key) in left.rows().iter().zip(&left_keys) {
        let Some(matches) = key.as_ref().and_then(|k| index.get(k)) else {
            continue;
        };
        for &right_idx in matches {
            let right_row = &right.rows()[right_idx];
            let mut row = left_row.clone();
            row.extend(right_kept.iter().map(|&i| right_row[i].clone()));
            joined.push_row(row)?;
        }
    }

    Ok(joined)
}

fn joined_columns(left: &Table, right: &Table, on: &str, right_kept: &[usize]) -> Vec<String> {
    let right_names: Vec<&String> = right_kept.iter().map(|&i| &right.columns()[i]).collect();
    let overlaps = |name: &str| name != on && right_names.iter().any(|r| *r == name);

    let mut columns: Vec<String> = left
        .columns()
        .iter()
        .map(|c| {
            if overlaps(c.as_str()) {
                format!("{c}{LEFT_SUFFIX}")
            } else {
                c.clone()
            }
        })
        .collect();

    columns.extend(right_names.iter().map(|c| {
        if left.column_index(c).is_some() {
            format!("{c}{RIGHT_SUFFIX}")
        } else {
            (*c).clone()
        }
    }));

    columns
}
