use crate::demo::{run_demo, DemoArgs};
use crate::score::{run_score, ScoreArgs};
use clap::{Parser, Subcommand};
use intern_progress::config::AppConfig;
use intern_progress::error::AppError;
use intern_progress::telemetry;

#[derive(Parser, Debug)]
#[command(
    name = "intern-progress",
    about = "Track internship profile completion, learning streaks, and achievements",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Walk a sample user through profile, learning, and application activity (default command)
    Demo(DemoArgs),
    /// Score a profile document against the completion rubric
    Score(ScoreArgs),
}

pub(crate) fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    let config = AppConfig::load()?;
    telemetry::init(&config.telemetry)?;

    let command = cli
        .command
        .unwrap_or_else(|| Command::Demo(DemoArgs::default()));

    match command {
        Command::Demo(args) => run_demo(args, &config),
        Command::Score(args) => run_score(args),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn demo_is_the_default_command() {
        let cli = Cli::try_parse_from(["intern-progress"]).expect("parses");
        assert!(cli.command.is_none());
    }

    #[test]
    fn parses_score_arguments() {
        let cli =
            Cli::try_parse_from(["intern-progress", "score", "--profile", "me.json", "--json"])
                .expect("parses");
        match cli.command {
            Some(Command::Score(args)) => {
                assert_eq!(args.profile.to_str(), Some("me.json"));
                assert!(args.json);
            }
            other => panic!("expected score command, got {other:?}"),
        }
    }

    #[test]
    fn score_requires_a_profile_path() {
        assert!(Cli::try_parse_from(["intern-progress", "score"]).is_err());
    }
}
