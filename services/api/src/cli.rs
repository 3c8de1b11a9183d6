use crate::preview::{run_renovation_preview, RenovateArgs};
use crate::server;
use clap::{Args, Parser, Subcommand};
use homevision::error::AppError;

#[derive(Parser, Debug)]
#[command(
    name = "HomeVision",
    about = "Serve or run room renovation previews from the command line",
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
    /// Renovate a single room photo and print the resulting inventory
    Renovate(RenovateArgs),
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
        Command::Renovate(args) => run_renovation_preview(args).await,
    }
}
