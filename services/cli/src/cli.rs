use crate::budget::{run_budget, BudgetArgs};
use crate::plan::{run_plan, PlanArgs};
use clap::{Parser, Subcommand};
use requiem_planner::config::PlannerConfig;
use requiem_planner::error::AppError;
use requiem_planner::telemetry;
use tracing::info;

#[derive(Parser, Debug)]
#[command(
    name = "Requiem Planner",
    about = "Plan skill and DNA point allocations for a Requiem character",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Apply allocation actions to a subclass and print the plan (default command)
    Plan(PlanArgs),
    /// Print the skill point cap for one level or for every level
    Budget(BudgetArgs),
}

pub(crate) fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    let config = PlannerConfig::load()?;
    telemetry::init(&config.telemetry)?;
    info!(
        environment = config.environment.as_str(),
        catalog = %config.catalog.path.display(),
        "planner configured"
    );

    let command = cli
        .command
        .unwrap_or_else(|| Command::Plan(PlanArgs::default()));

    match command {
        Command::Plan(args) => run_plan(args, &config),
        Command::Budget(args) => run_budget(args),
    }
}
