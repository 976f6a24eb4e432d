use crate::commands::{run_batch, run_score, BatchArgs, ScoreArgs};
use crate::server;
use clap::{Args, Parser, Subcommand};
use payslip_credit::error::AppError;

#[derive(Parser, Debug)]
#[command(
    name = "Payslip Credit Scoring",
    about = "Serve or run the payslip credit scoring engine from the command line",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Start the HTTP service (default command)
    Serve(ServeArgs),
    /// Score a single request stored as JSON
    Score(ScoreArgs),
    /// Score every row of a payroll CSV export
    Batch(BatchArgs),
}

#[derive(Args, Debug, Default)]
pub(crate) struct ServeArgs {
    /// Override the configured host for the HTTP server
    #[arg(long)]
    pub(crate) host: Option<String>,
    /// Override the configured port for the HTTP server
    #[arg(long)]
    pub(crate) port: Option<u16>,
}

pub(crate) async fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    let command = cli
        .command
        .unwrap_or_else(|| Command::Serve(ServeArgs::default()));

    match command {
        Command::Serve(args) => server::run(args).await,
        Command::Score(args) => run_score(args),
        Command::Batch(args) => run_batch(args),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn serve_is_the_default_command() {
        let cli = Cli::try_parse_from(["payslip-credit-api"]).expect("parses");
        assert!(cli.command.is_none());
    }

    #[test]
    fn score_accepts_evaluation_date() {
        let cli = Cli::try_parse_from([
            "payslip-credit-api",
            "score",
            "--input",
            "request.json",
            "--evaluation-date",
            "2025-06-30",
            "--breakdown",
        ])
        .expect("parses");
        match cli.command {
            Some(Command::Score(args)) => {
                assert!(args.breakdown);
                assert_eq!(
                    args.evaluation_date.map(|date| date.to_string()).as_deref(),
                    Some("2025-06-30")
                );
            }
            other => panic!("expected score command, got {other:?}"),
        }
    }

    #[test]
    fn batch_rejects_malformed_dates() {
        let result = Cli::try_parse_from([
            "payslip-credit-api",
            "batch",
            "--csv",
            "payroll.csv",
            "--evaluation-date",
            "30/06/2025",
        ]);
        assert!(result.is_err());
    }
}
