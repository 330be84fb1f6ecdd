use super::normalizer::{normalize_name, normalize_requirements, RequirementRef};
use crate::catalog::{Requirement, SkillDef};
use std::collections::HashMap;
use tracing::debug;

/// Read-only requirement graph for one subclass's skill list.
///
/// Rebuilt whole whenever the active subclass changes. Besides the forward
/// and reverse edges it owns the display-name → id cache used to resolve
/// requirements that only carry a skill name.
#[derive(Debug, Clone, Default)]
pub struct DependencyIndex {
    spec_id: Option<String>,
    requires_by_id: HashMap<String, Vec<RequirementRef>>,
    dependents_by_id: HashMap<String, Vec<String>>,
    ids_by_name: HashMap<String, String>,
}

impl DependencyIndex {
    pub fn build(spec_id: &str, skills: &[SkillDef]) -> Self {
        let mut index = Self {
            spec_id: Some(spec_id.to_string()),
            ..Self::default()
        };

        // First match wins when two skills share a normalized name.
        for skill in skills {
            index
                .ids_by_name
                .entry(normalize_name(&skill.name))
                .or_insert_with(|| skill.id.clone());
        }

        for skill in skills {
            let edges = normalize_requirements(&skill.legacy_requirements);
            for edge in &edges {
                index.add_dependent(&edge.id, &skill.id);
            }
            if !edges.is_empty() {
                index.requires_by_id.insert(skill.id.clone(), edges);
            }

            for requirement in &skill.requirements {
                if let Some(target) = index.resolve(requirement).map(str::to_string) {
                    index.add_dependent(&target, &skill.id);
                }
            }
        }

        debug!(
            spec_id,
            skills = skills.len(),
            with_dependents = index.dependents_by_id.len(),
            "dependency index built"
        );
        index
    }

    fn add_dependent(&mut self, target: &str, dependent: &str) {
        let bucket = self.dependents_by_id.entry(target.to_string()).or_default();
        if !bucket.iter().any(|existing| existing == dependent) {
            bucket.push(dependent.to_string());
        }
    }

    pub fn spec_id(&self) -> Option<&str> {
        self.spec_id.as_deref()
    }

    /// Edges parsed from the list encodings of `id`'s requirements.
    pub fn requirements_of(&self, id: &str) -> &[RequirementRef] {
        self.requires_by_id
            .get(id)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// Skills whose requirements reference `id`, in first-seen order.
    pub fn dependents_of(&self, id: &str) -> &[String] {
        self.dependents_by_id
            .get(id)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    pub fn resolve_name(&self, name: &str) -> Option<&str> {
        self.ids_by_name
            .get(&normalize_name(name))
            .map(String::as_str)
    }

    /// Skill id a keyed requirement points at: its own id, otherwise the skill
    /// whose name matches. `None` means the requirement is not about a skill in
    /// this subclass.
    pub fn resolve<'a>(&'a self, requirement: &'a Requirement) -> Option<&'a str> {
        match (&requirement.id, &requirement.name) {
            (Some(id), _) => Some(id.as_str()),
            (None, Some(name)) => self.resolve_name(name),
            (None, None) => None,
        }
    }
}
