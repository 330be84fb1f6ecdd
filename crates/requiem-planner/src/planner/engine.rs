use super::allocation::{Allocation, Pool};
use super::budget::skill_points_cap;
use super::index::DependencyIndex;
use super::normalizer::normalize_name;
use crate::catalog::{DnaDef, SkillDef};
use serde::{Deserialize, Serialize};

/// Entry a blocking requirement points at, so the presentation layer can
/// highlight it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequirementTarget {
    /// Skill id the requirement names or resolves to.
    pub id: String,
    /// Display name: the skill's own name when it exists in the active
    /// subclass, otherwise whatever the requirement spelled out.
    pub name: String,
    /// Whether `id` belongs to a skill in the active subclass.
    pub resolved: bool,
}

/// One failed check of an increase, in the order the checks run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum BlockReason {
    PointsExhausted { used: u32, cap: u32 },
    MaxLevelReached { max_level: u32 },
    CharacterLevel { required: u32 },
    SkillRequirement { target: RequirementTarget, level: u32 },
    JobRequirement { name: String, level: u32 },
}

impl BlockReason {
    pub fn summary(&self) -> String {
        match self {
            BlockReason::PointsExhausted { .. } => "Not enough skill points".to_string(),
            BlockReason::MaxLevelReached { .. } => "Already at max level".to_string(),
            BlockReason::CharacterLevel { required } => {
                format!("Requires character level {required}")
            }
            BlockReason::SkillRequirement { target, level } => {
                format!("Requires {} Lv.{level}", target.name)
            }
            BlockReason::JobRequirement { name, level } => format!("Requires {name} Lv.{level}"),
        }
    }
}

/// A requirement of a skill, classified against the active subclass.
enum Constraint<'s> {
    Skill {
        id: &'s str,
        level: u32,
        literal_name: Option<&'s str>,
    },
    Character {
        name: &'s str,
        level: u32,
    },
}

/// Stateless view over the active subclass used to judge single-level
/// changes. Holds borrows only; build a fresh one after every mutation.
pub struct AllocationEngine<'a> {
    skills: &'a [SkillDef],
    index: &'a DependencyIndex,
    allocation: &'a Allocation,
    level: u32,
}

impl<'a> AllocationEngine<'a> {
    pub fn new(
        skills: &'a [SkillDef],
        index: &'a DependencyIndex,
        allocation: &'a Allocation,
        level: u32,
    ) -> Self {
        Self {
            skills,
            index,
            allocation,
            level,
        }
    }

    pub fn skill(&self, id: &str) -> Option<&'a SkillDef> {
        self.skills.iter().find(|skill| skill.id == id)
    }

    pub fn cap(&self) -> u32 {
        skill_points_cap(self.level)
    }

    pub fn used(&self) -> u32 {
        self.allocation.total(Pool::Skills)
    }

    pub fn can_increase_skill(&self, skill: &SkillDef) -> bool {
        self.blocked_reasons(skill).is_empty()
    }

    /// Every check that currently stops `skill` from gaining a level. Empty
    /// exactly when [`Self::can_increase_skill`] holds.
    pub fn blocked_reasons(&self, skill: &SkillDef) -> Vec<BlockReason> {
        let mut reasons = Vec::new();
        let current = self.allocation.skill_level(&skill.id);

        let (used, cap) = (self.used(), self.cap());
        if used >= cap {
            reasons.push(BlockReason::PointsExhausted { used, cap });
        }

        if current >= skill.max_level {
            reasons.push(BlockReason::MaxLevelReached {
                max_level: skill.max_level,
            });
        }

        if let Some(required) = skill.level_gate_for(current + 1) {
            if self.level < required {
                reasons.push(BlockReason::CharacterLevel { required });
            }
        }

        for constraint in self.constraints(skill) {
            match constraint {
                Constraint::Skill {
                    id,
                    level,
                    literal_name,
                } => {
                    if self.allocation.skill_level(id) < level {
                        reasons.push(BlockReason::SkillRequirement {
                            target: self.target(id, literal_name),
                            level,
                        });
                    }
                }
                Constraint::Character { name, level } => {
                    if self.level < level {
                        reasons.push(BlockReason::JobRequirement {
                            name: name.to_string(),
                            level,
                        });
                    }
                }
            }
        }

        reasons
    }

    pub fn explain_blocked(&self, skill: &SkillDef) -> Vec<String> {
        self.blocked_reasons(skill)
            .iter()
            .map(BlockReason::summary)
            .collect()
    }

    pub fn can_decrease_skill(&self, skill: &SkillDef) -> bool {
        self.allocation.skill_level(&skill.id) > 0 && self.decrease_blockers(skill).is_empty()
    }

    /// Invested dependents that would fall out of their requirements if
    /// `skill` lost a level. Only direct dependents are considered.
    pub fn decrease_blockers(&self, skill: &SkillDef) -> Vec<&'a str> {
        let current = self.allocation.skill_level(&skill.id);
        if current == 0 {
            return Vec::new();
        }
        let new_level = current - 1;

        self.index
            .dependents_of(&skill.id)
            .iter()
            .filter(|id| self.allocation.skill_level(id) > 0)
            .filter_map(|id| self.skill(id))
            .filter(|dependent| new_level < self.level_needed_by(dependent, skill))
            .map(|dependent| dependent.id.as_str())
            .collect()
    }

    /// Level of `target` that `dependent`'s keyed requirements ask for. List
    /// encodings only add reverse edges; they never raise the needed level.
    fn level_needed_by(&self, dependent: &SkillDef, target: &SkillDef) -> u32 {
        let target_name = normalize_name(&target.name);
        dependent
            .requirements
            .iter()
            .filter(|requirement| {
                requirement.id.as_deref() == Some(target.id.as_str())
                    || requirement
                        .name
                        .as_deref()
                        .is_some_and(|name| normalize_name(name) == target_name)
            })
            .map(|requirement| requirement.required_level())
            .max()
            .unwrap_or(0)
    }

    fn constraints<'s>(&'s self, skill: &'s SkillDef) -> Vec<Constraint<'s>> {
        let mut constraints = Vec::new();

        for requirement in &skill.requirements {
            match self.index.resolve(requirement) {
                Some(id) => constraints.push(Constraint::Skill {
                    id,
                    level: requirement.required_level(),
                    literal_name: requirement.name.as_deref(),
                }),
                None => {
                    if let (Some(name), Some(level)) = (&requirement.name, requirement.level) {
                        if level > 0 {
                            constraints.push(Constraint::Character {
                                name: name.as_str(),
                                level,
                            });
                        }
                    }
                }
            }
        }

        constraints
    }

    fn target(&self, id: &str, literal_name: Option<&str>) -> RequirementTarget {
        match self.skill(id) {
            Some(skill) => RequirementTarget {
                id: skill.id.clone(),
                name: skill.name.clone(),
                resolved: true,
            },
            None => RequirementTarget {
                id: id.to_string(),
                name: literal_name.unwrap_or(id).to_string(),
                resolved: false,
            },
        }
    }
}

/// DNA entries have no pool cap and no cross-entry requirements.
pub fn can_increase_dna(dna: &DnaDef, allocation: &Allocation) -> bool {
    allocation.dna_level(&dna.id) < dna.max_level
}

pub fn can_decrease_dna(dna: &DnaDef, allocation: &Allocation) -> bool {
    allocation.dna_level(&dna.id) > 0
}
