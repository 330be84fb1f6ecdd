mod budget;
mod cli;
mod plan;

use requiem_planner::error::AppError;

pub fn run() -> Result<(), AppError> {
    cli::run()
}
