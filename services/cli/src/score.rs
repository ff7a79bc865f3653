use clap::Args;
use intern_progress::error::AppError;
use intern_progress::progress::completion;
use intern_progress::progress::ProfileData;
use std::fs;
use std::path::PathBuf;

#[derive(Args, Debug)]
pub(crate) struct ScoreArgs {
    /// Path to a profile JSON document (camelCase fields).
    #[arg(long)]
    pub(crate) profile: PathBuf,
    /// Emit the breakdown as JSON instead of text.
    #[arg(long)]
    pub(crate) json: bool,
}

pub(crate) fn run_score(args: ScoreArgs) -> Result<(), AppError> {
    let raw = fs::read_to_string(&args.profile)?;
    let profile: ProfileData = serde_json::from_str(&raw)?;
    let breakdown = completion::breakdown(&profile);

    if args.json {
        println!("{}", serde_json::to_string_pretty(&breakdown)?);
        return Ok(());
    }

    println!("Profile completion: {}%", breakdown.score);
    for component in &breakdown.components {
        let marker = if component.is_complete() { "x" } else { " " };
        println!(
            "- [{marker}] {}: {:.1} / {:.0}",
            component.category.label(),
            component.earned,
            component.available
        );
    }
    Ok(())
}
