//! Allocation rules for the skill and DNA pools.
//!
//! [`PlannerSession`] is the single owner of mutable state. The checks live in
//! [`AllocationEngine`], a borrowed view that can be rebuilt after every
//! intent.

pub mod allocation;
pub mod budget;
pub mod engine;
pub mod index;
pub mod normalizer;
pub mod session;
pub mod view;

#[cfg(test)]
mod tests;

pub use allocation::{Allocation, Pool};
pub use budget::{clamp_level, parse_level, skill_points_cap, MAX_LEVEL, STARTER_SKILL_POINTS};
pub use engine::{AllocationEngine, BlockReason, RequirementTarget};
pub use index::DependencyIndex;
pub use normalizer::{normalize_name, normalize_requirements, RequirementRef};
pub use session::{PlannerSession, Selection};
pub use view::{detail_rows, EntryView, PointsHint, PointsSummary};
