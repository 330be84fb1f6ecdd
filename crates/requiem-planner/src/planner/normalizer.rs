use crate::catalog::{as_u32, id_string, is_truthy};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Canonical `(target id, minimum level)` edge produced from the list
/// encodings of a skill's requirements.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RequirementRef {
    pub id: String,
    pub level: u32,
}

/// Converts any of the list encodings into canonical requirement edges:
///
/// - `[{"id": "25100", "level": 3}]` (also `skillId` / `lv`)
/// - `[["25100", 3], 26000]`
/// - `"25100:3"` or a bare id, which implies level 1
///
/// A single non-list value is read as a one-element list. Anything that does
/// not fit one of the shapes is dropped.
pub fn normalize_requirements(value: &Value) -> Vec<RequirementRef> {
    if !is_truthy(value) {
        return Vec::new();
    }

    let items = match value {
        Value::Array(items) => items.as_slice(),
        single => std::slice::from_ref(single),
    };

    items.iter().filter_map(normalize_item).collect()
}

fn normalize_item(item: &Value) -> Option<RequirementRef> {
    match item {
        Value::Object(object) => {
            let id = object
                .get("id")
                .or_else(|| object.get("skillId"))
                .or_else(|| object.get("0"))?;
            let level = object
                .get("level")
                .or_else(|| object.get("lv"))
                .or_else(|| object.get("1"));
            edge(id, level)
        }
        Value::Array(pair) => edge(pair.first()?, pair.get(1)),
        Value::String(raw) => parse_colon_form(raw),
        Value::Number(_) => edge(item, None),
        Value::Null | Value::Bool(_) => None,
    }
}

fn edge(id: &Value, level: Option<&Value>) -> Option<RequirementRef> {
    let id = id_string(id)?;
    let level = level.map(parse_level).unwrap_or(1);
    Some(RequirementRef { id, level })
}

/// Accepts `digits` or `digits:digits`.
fn parse_colon_form(raw: &str) -> Option<RequirementRef> {
    let (id, level) = match raw.split_once(':') {
        Some((id, level)) => (id, Some(level)),
        None => (raw, None),
    };

    if !is_digits(id) || !level.map_or(true, is_digits) {
        return None;
    }

    Some(RequirementRef {
        id: id.to_string(),
        level: level
            .and_then(|digits| digits.parse().ok())
            .unwrap_or(1)
            .max(1),
    })
}

fn parse_level(value: &Value) -> u32 {
    let level = match value {
        Value::String(raw) => {
            let digits: String = raw
                .trim_start()
                .chars()
                .take_while(char::is_ascii_digit)
                .collect();
            digits.parse().unwrap_or(1)
        }
        other => as_u32(other).unwrap_or(1),
    };
    level.max(1)
}

fn is_digits(raw: &str) -> bool {
    !raw.is_empty() && raw.bytes().all(|byte| byte.is_ascii_digit())
}

/// Matching key for display names: lowercased with everything except ASCII
/// letters and digits removed.
pub fn normalize_name(value: &str) -> String {
    value
        .to_lowercase()
        .chars()
        .filter(|ch| ch.is_ascii_lowercase() || ch.is_ascii_digit())
        .collect()
}
