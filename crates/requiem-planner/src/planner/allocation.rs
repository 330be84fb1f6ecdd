use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Which point pool an entry draws from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Pool {
    Skills,
    Dna,
}

impl Pool {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Skills => "Skills",
            Self::Dna => "DNA",
        }
    }
}

/// Invested levels for the active subclass. Only positive levels are stored;
/// an absent key means level 0.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Allocation {
    skills: BTreeMap<String, u32>,
    dna: BTreeMap<String, u32>,
}

impl Allocation {
    pub fn new() -> Self {
        Self::default()
    }

    fn pool(&self, pool: Pool) -> &BTreeMap<String, u32> {
        match pool {
            Pool::Skills => &self.skills,
            Pool::Dna => &self.dna,
        }
    }

    fn pool_mut(&mut self, pool: Pool) -> &mut BTreeMap<String, u32> {
        match pool {
            Pool::Skills => &mut self.skills,
            Pool::Dna => &mut self.dna,
        }
    }

    pub fn level(&self, pool: Pool, id: &str) -> u32 {
        self.pool(pool).get(id).copied().unwrap_or(0)
    }

    pub fn skill_level(&self, id: &str) -> u32 {
        self.level(Pool::Skills, id)
    }

    pub fn dna_level(&self, id: &str) -> u32 {
        self.level(Pool::Dna, id)
    }

    pub fn total(&self, pool: Pool) -> u32 {
        self.pool(pool).values().sum()
    }

    pub fn entries(&self, pool: Pool) -> impl Iterator<Item = (&str, u32)> {
        self.pool(pool)
            .iter()
            .map(|(id, level)| (id.as_str(), *level))
    }

    pub(crate) fn increment(&mut self, pool: Pool, id: &str) {
        *self.pool_mut(pool).entry(id.to_string()).or_insert(0) += 1;
    }

    pub(crate) fn decrement(&mut self, pool: Pool, id: &str) {
        let entries = self.pool_mut(pool);
        let remaining = match entries.get_mut(id) {
            Some(level) => {
                *level = level.saturating_sub(1);
                *level
            }
            None => return,
        };
        if remaining == 0 {
            entries.remove(id);
        }
    }

    pub fn clear(&mut self) {
        self.skills.clear();
        self.dna.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.skills.is_empty() && self.dna.is_empty()
    }
}
