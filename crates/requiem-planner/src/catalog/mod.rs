mod parser;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::io::Read;
use std::path::Path;
use tracing::{info, warn};

pub(crate) use parser::{as_u32, id_string, is_truthy};

/// Failures while reading a catalog file. Only raised by the explicit loaders;
/// field-level problems inside a valid JSON document degrade silently.
#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error("failed to read catalog: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid catalog JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// Race-level grouping shown as the first selector.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Group {
    pub id: String,
    pub name: String,
}

/// First job inside a group, with its subclasses.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Job {
    pub id: String,
    pub name: String,
    pub specs: Vec<Spec>,
}

/// Subclass (second job). Skill and DNA lists are keyed by its id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Spec {
    pub id: String,
    pub name: String,
}

/// One entry of a skill's keyed `requires` map.
///
/// An entry with an `id` targets another skill. An entry with only a `name`
/// targets a skill by display name when one matches, otherwise it is a job
/// (character level) requirement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Requirement {
    pub key: String,
    pub id: Option<String>,
    pub name: Option<String>,
    pub level: Option<u32>,
}

impl Requirement {
    /// Level the target must reach. Missing or zero levels count as 1.
    pub fn required_level(&self) -> u32 {
        match self.level {
            Some(level) if level > 0 => level,
            _ => 1,
        }
    }
}

/// Display-only metadata carried through from the catalog.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EntryDetails {
    pub info: Value,
    pub progression: Value,
    pub description: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SkillDef {
    pub id: String,
    pub name: String,
    pub max_level: u32,
    /// Character level needed per invested level (`lvlReq`). `None` entries
    /// impose no gate for that level.
    pub level_gate: Option<Vec<Option<u32>>>,
    pub requirements: Vec<Requirement>,
    /// Raw `req`/`requires` value in one of the list encodings, normalized by
    /// the dependency index.
    pub legacy_requirements: Value,
    pub details: EntryDetails,
}

impl SkillDef {
    /// Gate for investing `level` (1-based). Levels past the end of the gate
    /// reuse its last threshold.
    pub fn level_gate_for(&self, level: u32) -> Option<u32> {
        let gate = self.level_gate.as_ref()?;
        let last = gate.len().checked_sub(1)?;
        let index = (level.saturating_sub(1) as usize).min(last);
        gate[index]
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DnaDef {
    pub id: String,
    pub name: String,
    pub max_level: u32,
    pub details: EntryDetails,
}

/// Parsed calculator data: groups → jobs → specs, plus per-spec skill and DNA
/// lists.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Catalog {
    pub groups: Vec<Group>,
    pub jobs: BTreeMap<String, Vec<Job>>,
    pub skills: BTreeMap<String, Vec<SkillDef>>,
    pub dna: BTreeMap<String, Vec<DnaDef>>,
}

impl Catalog {
    pub fn empty() -> Self {
        Self::default()
    }

    /// Builds a catalog from an already-parsed document. Missing or
    /// mistyped sections come back empty.
    pub fn from_value(value: &Value) -> Self {
        Self {
            groups: parser::parse_groups(value.get("groups")),
            jobs: parser::parse_jobs(value.get("jobs")),
            skills: parser::parse_skill_lists(value.get("skills")),
            dna: parser::parse_dna_lists(value.get("dna")),
        }
    }

    pub fn from_json_str(raw: &str) -> Result<Self, CatalogError> {
        let value: Value = serde_json::from_str(raw)?;
        Ok(Self::from_value(&value))
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<Self, CatalogError> {
        let value: Value = serde_json::from_reader(reader)?;
        Ok(Self::from_value(&value))
    }

    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self, CatalogError> {
        let file = std::fs::File::open(path)?;
        Self::from_reader(std::io::BufReader::new(file))
    }

    /// Loads a catalog, falling back to an empty one when the file is missing
    /// or unreadable. Every allocation action over the empty catalog is a no-op.
    pub fn load_or_empty<P: AsRef<Path>>(path: P) -> Self {
        let path = path.as_ref();
        match Self::from_path(path) {
            Ok(catalog) => {
                info!(
                    path = %path.display(),
                    groups = catalog.groups.len(),
                    specs = catalog.skills.len(),
                    "catalog loaded"
                );
                catalog
            }
            Err(err) => {
                warn!(path = %path.display(), error = %err, "catalog unavailable, using empty catalog");
                Self::empty()
            }
        }
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty() && self.jobs.is_empty() && self.skills.is_empty()
    }

    pub fn jobs_for(&self, group_id: &str) -> &[Job] {
        self.jobs.get(group_id).map(Vec::as_slice).unwrap_or_default()
    }

    pub fn skills_for(&self, spec_id: &str) -> &[SkillDef] {
        self.skills.get(spec_id).map(Vec::as_slice).unwrap_or_default()
    }

    pub fn dna_for(&self, spec_id: &str) -> &[DnaDef] {
        self.dna.get(spec_id).map(Vec::as_slice).unwrap_or_default()
    }
}
