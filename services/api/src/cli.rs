use crate::server;
use crate::submissions::{run_submissions_listing, SubmissionsArgs};
use clap::{Args, Parser, Subcommand};
use wellness_intake::error::AppError;

#[derive(Parser, Debug)]
#[command(
    name = "Wellness Intake API",
    about = "Serve and inspect contact and consultation submissions",
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
    /// Print the most recent submissions from the configured record store
    Submissions(SubmissionsArgs),
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
        Command::Submissions(args) => run_submissions_listing(args).await,
    }
}
