use clap::Args;
use requiem_planner::error::AppError;
use requiem_planner::planner::budget::MIN_LEVEL;
use requiem_planner::planner::{clamp_level, skill_points_cap, MAX_LEVEL};

#[derive(Args, Debug, Default)]
pub(crate) struct BudgetArgs {
    /// Show a single character level (clamped to 1..=90)
    #[arg(long, allow_negative_numbers = true)]
    pub(crate) level: Option<i64>,
}

pub(crate) fn run_budget(args: BudgetArgs) -> Result<(), AppError> {
    match args.level {
        Some(level) => {
            let level = clamp_level(level);
            println!("Level {level}: {} skill points", skill_points_cap(level));
        }
        None => {
            println!("Skill point cap by character level");
            println!("{:>5} {:>6} {:>6}", "level", "cap", "gain");
            for (level, cap, gain) in budget_rows() {
                println!("{level:>5} {cap:>6} {gain:>+6}");
            }
        }
    }
    Ok(())
}

/// `(level, cap, gain over the previous level)` for every level.
fn budget_rows() -> Vec<(u32, u32, i64)> {
    let mut previous = 0;
    (MIN_LEVEL..=MAX_LEVEL)
        .map(|level| {
            let cap = skill_points_cap(level);
            let gain = i64::from(cap) - i64::from(previous);
            previous = cap;
            (level, cap, gain)
        })
        .collect()
}
