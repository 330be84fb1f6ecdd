//! Skill and DNA point allocation planner for the Requiem character calculator.
//!
//! The [`planner`] module holds the rule engine: point budgets, requirement
//! normalization, the dependency index and the allocation checks. The
//! [`catalog`] module parses the static skill/DNA data the engine runs over.

pub mod catalog;
pub mod config;
pub mod error;
pub mod planner;
pub mod telemetry;
