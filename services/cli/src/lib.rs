mod cli;
mod demo;
mod infra;
mod score;

use intern_progress::error::AppError;

pub fn run() -> Result<(), AppError> {
    cli::run()
}
