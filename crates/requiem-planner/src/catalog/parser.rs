use super::{DnaDef, EntryDetails, Group, Job, Requirement, SkillDef, Spec};
use serde_json::{Map, Value};
use std::collections::BTreeMap;

pub(crate) const DEFAULT_MAX_LEVEL: u32 = 10;

pub(crate) fn parse_groups(value: Option<&Value>) -> Vec<Group> {
    objects(value)
        .filter_map(|object| {
            Some(Group {
                id: id_field(object, "id")?,
                name: string_field(object, "name").unwrap_or_default(),
            })
        })
        .collect()
}

pub(crate) fn parse_jobs(value: Option<&Value>) -> BTreeMap<String, Vec<Job>> {
    let Some(Value::Object(by_group)) = value else {
        return BTreeMap::new();
    };

    by_group
        .iter()
        .map(|(group_id, jobs)| {
            let jobs = objects(Some(jobs))
                .filter_map(|object| {
                    Some(Job {
                        id: id_field(object, "id")?,
                        name: string_field(object, "name").unwrap_or_default(),
                        specs: parse_specs(object.get("specs")),
                    })
                })
                .collect();
            (group_id.clone(), jobs)
        })
        .collect()
}

fn parse_specs(value: Option<&Value>) -> Vec<Spec> {
    objects(value)
        .filter_map(|object| {
            Some(Spec {
                id: id_field(object, "id")?,
                name: string_field(object, "name").unwrap_or_default(),
            })
        })
        .collect()
}

pub(crate) fn parse_skill_lists(value: Option<&Value>) -> BTreeMap<String, Vec<SkillDef>> {
    per_spec(value, parse_skill)
}

pub(crate) fn parse_dna_lists(value: Option<&Value>) -> BTreeMap<String, Vec<DnaDef>> {
    per_spec(value, parse_dna)
}

fn per_spec<T>(
    value: Option<&Value>,
    parse: fn(&Map<String, Value>) -> Option<T>,
) -> BTreeMap<String, Vec<T>> {
    let Some(Value::Object(by_spec)) = value else {
        return BTreeMap::new();
    };

    by_spec
        .iter()
        .map(|(spec_id, entries)| {
            let parsed = objects(Some(entries)).filter_map(parse).collect();
            (spec_id.clone(), parsed)
        })
        .collect()
}

fn parse_skill(object: &Map<String, Value>) -> Option<SkillDef> {
    let requires = object.get("requires");
    let requirements = match requires {
        Some(Value::Object(keyed)) => keyed
            .iter()
            .filter_map(|(key, entry)| parse_requirement(key, entry))
            .collect(),
        _ => Vec::new(),
    };

    // `req` wins over `requires` for the list encodings, as long as it is set.
    let legacy_requirements = match object.get("req") {
        Some(req) if is_truthy(req) => req.clone(),
        _ => requires.cloned().unwrap_or(Value::Null),
    };

    Some(SkillDef {
        id: id_field(object, "id")?,
        name: string_field(object, "name").unwrap_or_default(),
        max_level: max_level(object),
        level_gate: level_gate(object.get("lvlReq")),
        requirements,
        legacy_requirements,
        details: details(object),
    })
}

fn parse_dna(object: &Map<String, Value>) -> Option<DnaDef> {
    Some(DnaDef {
        id: id_field(object, "id")?,
        name: string_field(object, "name").unwrap_or_default(),
        max_level: max_level(object),
        details: details(object),
    })
}

fn parse_requirement(key: &str, value: &Value) -> Option<Requirement> {
    let object = value.as_object()?;
    Some(Requirement {
        key: key.to_string(),
        id: id_field(object, "id"),
        name: string_field(object, "name").filter(|name| !name.is_empty()),
        level: object.get("level").and_then(as_u32),
    })
}

fn max_level(object: &Map<String, Value>) -> u32 {
    object
        .get("maxLevel")
        .and_then(as_u32)
        .unwrap_or(DEFAULT_MAX_LEVEL)
}

fn level_gate(value: Option<&Value>) -> Option<Vec<Option<u32>>> {
    match value {
        Some(Value::Array(thresholds)) => Some(thresholds.iter().map(gate_threshold).collect()),
        _ => None,
    }
}

/// Only JSON numbers gate. Fractional thresholds round up so a level below
/// the exact value still fails the gate.
fn gate_threshold(value: &Value) -> Option<u32> {
    let threshold = value.as_f64().filter(|v| v.is_finite())?;
    Some(threshold.ceil().clamp(0.0, u32::MAX as f64) as u32)
}

fn details(object: &Map<String, Value>) -> EntryDetails {
    EntryDetails {
        info: object.get("info").cloned().unwrap_or(Value::Null),
        progression: object.get("progression").cloned().unwrap_or(Value::Null),
        description: string_field(object, "desc")
            .or_else(|| string_field(object, "description"))
            .filter(|text| !text.trim().is_empty()),
    }
}

fn objects(value: Option<&Value>) -> impl Iterator<Item = &Map<String, Value>> {
    value
        .and_then(Value::as_array)
        .into_iter()
        .flatten()
        .filter_map(Value::as_object)
}

fn string_field(object: &Map<String, Value>, key: &str) -> Option<String> {
    object
        .get(key)
        .and_then(Value::as_str)
        .map(|value| value.trim().to_string())
}

/// Catalog ids show up as JSON strings or numbers; both map to the same key.
fn id_field(object: &Map<String, Value>, key: &str) -> Option<String> {
    object.get(key).and_then(id_string)
}

pub(crate) fn id_string(value: &Value) -> Option<String> {
    match value {
        Value::String(raw) => {
            let trimmed = raw.trim();
            (!trimmed.is_empty()).then(|| trimmed.to_string())
        }
        Value::Number(number) => match number.as_u64() {
            Some(0) => None,
            Some(id) => Some(id.to_string()),
            None => Some(number.to_string()),
        },
        _ => None,
    }
}

pub(crate) fn as_u32(value: &Value) -> Option<u32> {
    match value {
        Value::Number(number) => number
            .as_u64()
            .or_else(|| number.as_f64().filter(|v| *v >= 0.0).map(|v| v as u64))
            .map(|v| v.min(u32::MAX as u64) as u32),
        Value::String(raw) => raw.trim().parse().ok(),
        _ => None,
    }
}

pub(crate) fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(flag) => *flag,
        Value::Number(number) => number.as_f64().map(|v| v != 0.0).unwrap_or(true),
        Value::String(raw) => !raw.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}
