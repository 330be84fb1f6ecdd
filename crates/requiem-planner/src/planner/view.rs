use super::allocation::Pool;
use crate::catalog::EntryDetails;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Status line shown under the point counters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PointsHint {
    NoPoints,
    CapReached,
    Available,
}

impl PointsHint {
    pub fn for_usage(used: u32, cap: u32) -> Self {
        if cap == 0 {
            Self::NoPoints
        } else if used >= cap {
            Self::CapReached
        } else {
            Self::Available
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::NoPoints => "No skill points at current level. Increase level to allocate.",
            Self::CapReached => "Skill point cap reached. Increase level or reduce other skills.",
            Self::Available => {
                "Skill requirements enabled. Some skills require a certain level or other skills."
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PointsSummary {
    pub level: u32,
    pub skills_used: u32,
    pub skills_cap: u32,
    pub dna_used: u32,
    pub hint: PointsHint,
}

impl PointsSummary {
    pub fn level_label(&self) -> String {
        format!("Level {}", self.level)
    }

    pub fn skills_label(&self) -> String {
        format!("Skills: {} / {}", self.skills_used, self.skills_cap)
    }

    pub fn dna_label(&self) -> String {
        format!("DNA: {}", self.dna_used)
    }
}

/// Render state for one skill or DNA card.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntryView {
    pub pool: Pool,
    pub id: String,
    pub name: String,
    pub invested: u32,
    pub max_level: u32,
    pub can_increase: bool,
    pub can_decrease: bool,
}

impl EntryView {
    pub fn badge(&self) -> String {
        format!("{} / {}", self.invested, self.max_level)
    }
}

/// Label/value rows for an entry's tooltip, skipping anything the catalog
/// left blank.
pub fn detail_rows(details: &EntryDetails) -> Vec<(&'static str, String)> {
    let mut rows = Vec::new();
    let info = &details.info;

    for (label, key) in [
        ("Type", "type"),
        ("Cast", "cast_time"),
        ("Cooldown", "cooldown"),
        ("Range", "range"),
    ] {
        if let Some(text) = info.get(key).and_then(display_text) {
            rows.push((label, text));
        }
    }

    if let Some(Value::Array(weapons)) = info.get("weapons") {
        let names: Vec<String> = weapons.iter().filter_map(display_text).collect();
        if !names.is_empty() {
            rows.push(("Weapons", names.join(", ")));
        }
    }

    for (label, key) in [("MP (L1)", "mp consumption"), ("Damage (L1)", "damage")] {
        let first = details
            .progression
            .get(key)
            .and_then(|values| values.get(0))
            .and_then(display_text);
        if let Some(text) = first {
            rows.push((label, text));
        }
    }

    rows
}

fn display_text(value: &Value) -> Option<String> {
    let text = match value {
        Value::String(text) => text.trim().to_string(),
        Value::Number(number) => number.to_string(),
        _ => return None,
    };
    (!text.is_empty()).then_some(text)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn hint_prefers_no_points_over_cap_reached() {
        assert_eq!(PointsHint::for_usage(0, 0), PointsHint::NoPoints);
        assert_eq!(PointsHint::for_usage(3, 3), PointsHint::CapReached);
        assert_eq!(PointsHint::for_usage(2, 3), PointsHint::Available);
        assert!(PointsHint::NoPoints.label().starts_with("No skill points"));
        assert!(PointsHint::CapReached.label().contains("cap reached"));
    }

    #[test]
    fn detail_rows_skip_blank_fields() {
        let details = EntryDetails {
            info: json!({
                "type": "Active",
                "cast_time": "",
                "cooldown": 12,
                "weapons": ["Sword", "Axe"]
            }),
            progression: json!({"mp consumption": [15, 18], "damage": []}),
            description: None,
        };

        assert_eq!(
            detail_rows(&details),
            vec![
                ("Type", "Active".to_string()),
                ("Cooldown", "12".to_string()),
                ("Weapons", "Sword, Axe".to_string()),
                ("MP (L1)", "15".to_string()),
            ]
        );
    }

    #[test]
    fn summary_labels_match_counters() {
        let summary = PointsSummary {
            level: 10,
            skills_used: 4,
            skills_cap: 11,
            dna_used: 2,
            hint: PointsHint::Available,
        };
        assert_eq!(summary.level_label(), "Level 10");
        assert_eq!(summary.skills_label(), "Skills: 4 / 11");
        assert_eq!(summary.dna_label(), "DNA: 2");
    }
}
