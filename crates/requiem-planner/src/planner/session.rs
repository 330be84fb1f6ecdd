use super::allocation::{Allocation, Pool};
use super::budget::{clamp_level, parse_level, skill_points_cap, MIN_LEVEL};
use super::engine::{can_decrease_dna, can_increase_dna, AllocationEngine, BlockReason};
use super::index::DependencyIndex;
use super::view::{EntryView, PointsHint, PointsSummary};
use crate::catalog::{Catalog, DnaDef, Job, SkillDef};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

/// Active race → job → subclass path.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Selection {
    pub group_id: Option<String>,
    pub job_id: Option<String>,
    pub spec_id: Option<String>,
}

/// Owns everything the rules read: catalog, selection, allocation, character
/// level and the dependency index for the selected subclass.
///
/// All intents run to completion on `&mut self`. A rejected intent leaves the
/// session untouched.
#[derive(Debug, Clone)]
pub struct PlannerSession {
    catalog: Catalog,
    selection: Selection,
    allocation: Allocation,
    level: u32,
    index: DependencyIndex,
}

impl PlannerSession {
    /// Starts on the first group, its first job and that job's first subclass.
    pub fn new(catalog: Catalog) -> Self {
        let mut session = Self {
            catalog,
            selection: Selection::default(),
            allocation: Allocation::new(),
            level: MIN_LEVEL,
            index: DependencyIndex::default(),
        };

        if let Some(group_id) = session.catalog.groups.first().map(|group| group.id.clone()) {
            session.select_group(&group_id);
        }
        session
    }

    pub fn with_level(mut self, level: i64) -> Self {
        self.set_level(level);
        self
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    pub fn allocation(&self) -> &Allocation {
        &self.allocation
    }

    pub fn index(&self) -> &DependencyIndex {
        &self.index
    }

    pub fn level(&self) -> u32 {
        self.level
    }

    /// Changing level never prunes the allocation; it only gates what can be
    /// added next.
    pub fn set_level(&mut self, level: i64) {
        self.level = clamp_level(level);
    }

    pub fn set_level_input(&mut self, raw: &str) {
        self.level = parse_level(raw);
    }

    pub fn jobs(&self) -> &[Job] {
        self.selection
            .group_id
            .as_deref()
            .map(|group_id| self.catalog.jobs_for(group_id))
            .unwrap_or_default()
    }

    pub fn skills(&self) -> &[SkillDef] {
        self.selection
            .spec_id
            .as_deref()
            .map(|spec_id| self.catalog.skills_for(spec_id))
            .unwrap_or_default()
    }

    pub fn dna(&self) -> &[DnaDef] {
        self.selection
            .spec_id
            .as_deref()
            .map(|spec_id| self.catalog.dna_for(spec_id))
            .unwrap_or_default()
    }

    /// Switches race and falls through to its first job and subclass.
    pub fn select_group(&mut self, group_id: &str) -> bool {
        if !self.catalog.groups.iter().any(|group| group.id == group_id) {
            return false;
        }

        self.selection.group_id = Some(group_id.to_string());
        let first_job = self.jobs().first().map(|job| job.id.clone());
        match first_job {
            Some(job_id) => {
                self.select_job(&job_id);
            }
            None => {
                self.selection.job_id = None;
                self.set_spec(None);
            }
        }
        true
    }

    /// Switches job within the active group and falls through to its first
    /// subclass.
    pub fn select_job(&mut self, job_id: &str) -> bool {
        let Some(job) = self.jobs().iter().find(|job| job.id == job_id) else {
            return false;
        };
        let first_spec = job.specs.first().map(|spec| spec.id.clone());

        self.selection.job_id = Some(job_id.to_string());
        self.set_spec(first_spec);
        true
    }

    /// Switches subclass within the active job. Reselecting the current
    /// subclass still clears the allocation.
    pub fn select_spec(&mut self, spec_id: &str) -> bool {
        let known = self
            .selection
            .job_id
            .as_deref()
            .and_then(|job_id| self.jobs().iter().find(|job| job.id == job_id))
            .is_some_and(|job| job.specs.iter().any(|spec| spec.id == spec_id));
        if !known {
            return false;
        }

        self.set_spec(Some(spec_id.to_string()));
        true
    }

    fn set_spec(&mut self, spec_id: Option<String>) {
        self.index = match spec_id.as_deref() {
            Some(spec_id) => DependencyIndex::build(spec_id, self.catalog.skills_for(spec_id)),
            None => DependencyIndex::default(),
        };
        self.selection.spec_id = spec_id;
        self.allocation.clear();

        info!(
            group = ?self.selection.group_id,
            job = ?self.selection.job_id,
            spec = ?self.selection.spec_id,
            "selection changed"
        );
    }

    pub fn reset(&mut self) {
        self.allocation.clear();
        debug!("allocation reset");
    }

    pub fn engine(&self) -> AllocationEngine<'_> {
        AllocationEngine::new(self.skills(), &self.index, &self.allocation, self.level)
    }

    fn skill(&self, id: &str) -> Option<&SkillDef> {
        self.skills().iter().find(|skill| skill.id == id)
    }

    fn dna_entry(&self, id: &str) -> Option<&DnaDef> {
        self.dna().iter().find(|dna| dna.id == id)
    }

    pub fn can_increase_skill(&self, id: &str) -> bool {
        self.skill(id)
            .is_some_and(|skill| self.engine().can_increase_skill(skill))
    }

    pub fn can_decrease_skill(&self, id: &str) -> bool {
        self.skill(id)
            .is_some_and(|skill| self.engine().can_decrease_skill(skill))
    }

    pub fn blocked_reasons(&self, id: &str) -> Vec<BlockReason> {
        self.skill(id)
            .map(|skill| self.engine().blocked_reasons(skill))
            .unwrap_or_default()
    }

    pub fn explain_blocked(&self, id: &str) -> Vec<String> {
        self.skill(id)
            .map(|skill| self.engine().explain_blocked(skill))
            .unwrap_or_default()
    }

    pub fn decrease_blockers(&self, id: &str) -> Vec<String> {
        self.skill(id)
            .map(|skill| {
                self.engine()
                    .decrease_blockers(skill)
                    .into_iter()
                    .map(str::to_string)
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Adds one level to a skill if every increase check passes.
    pub fn increase_skill(&mut self, id: &str) -> bool {
        let allowed = self.can_increase_skill(id);
        if allowed {
            self.allocation.increment(Pool::Skills, id);
        }
        debug!(skill = id, allowed, level = self.allocation.skill_level(id), "increase skill");
        allowed
    }

    /// Removes one level from a skill unless an invested dependent needs it.
    pub fn decrease_skill(&mut self, id: &str) -> bool {
        let allowed = self.can_decrease_skill(id);
        if allowed {
            self.allocation.decrement(Pool::Skills, id);
        }
        debug!(skill = id, allowed, level = self.allocation.skill_level(id), "decrease skill");
        allowed
    }

    pub fn can_increase_dna(&self, id: &str) -> bool {
        self.dna_entry(id)
            .is_some_and(|dna| can_increase_dna(dna, &self.allocation))
    }

    pub fn can_decrease_dna(&self, id: &str) -> bool {
        self.dna_entry(id)
            .is_some_and(|dna| can_decrease_dna(dna, &self.allocation))
    }

    pub fn increase_dna(&mut self, id: &str) -> bool {
        let allowed = self.can_increase_dna(id);
        if allowed {
            self.allocation.increment(Pool::Dna, id);
        }
        debug!(dna = id, allowed, "increase dna");
        allowed
    }

    pub fn decrease_dna(&mut self, id: &str) -> bool {
        let allowed = self.can_decrease_dna(id);
        if allowed {
            self.allocation.decrement(Pool::Dna, id);
        }
        debug!(dna = id, allowed, "decrease dna");
        allowed
    }

    pub fn points(&self) -> PointsSummary {
        let skills_used = self.allocation.total(Pool::Skills);
        let skills_cap = skill_points_cap(self.level);
        PointsSummary {
            level: self.level,
            skills_used,
            skills_cap,
            dna_used: self.allocation.total(Pool::Dna),
            hint: PointsHint::for_usage(skills_used, skills_cap),
        }
    }

    pub fn skill_views(&self) -> Vec<EntryView> {
        let engine = self.engine();
        self.skills()
            .iter()
            .map(|skill| EntryView {
                pool: Pool::Skills,
                id: skill.id.clone(),
                name: skill.name.clone(),
                invested: self.allocation.skill_level(&skill.id),
                max_level: skill.max_level,
                can_increase: engine.can_increase_skill(skill),
                can_decrease: engine.can_decrease_skill(skill),
            })
            .collect()
    }

    pub fn dna_views(&self) -> Vec<EntryView> {
        self.dna()
            .iter()
            .map(|dna| EntryView {
                pool: Pool::Dna,
                id: dna.id.clone(),
                name: dna.name.clone(),
                invested: self.allocation.dna_level(&dna.id),
                max_level: dna.max_level,
                can_increase: can_increase_dna(dna, &self.allocation),
                can_decrease: can_decrease_dna(dna, &self.allocation),
            })
            .collect()
    }
}
