use crate::demo::{run_evaluate, run_policy, EvaluateArgs, PolicyArgs};
use crate::server;
use clap::{Args, Parser, Subcommand};
use icer_engine::error::AppError;

#[derive(Parser, Debug)]
#[command(
    name = "ICER Evaluation Engine",
    about = "Evaluate incremental cost-effectiveness ratios against policy thresholds",
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
    /// Run a one-shot evaluation and print the result as JSON
    Evaluate(EvaluateArgs),
    /// Print the active cost-effectiveness policy document
    Policy(PolicyArgs),
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
        Command::Evaluate(args) => run_evaluate(args),
        Command::Policy(args) => run_policy(args),
    }
}
