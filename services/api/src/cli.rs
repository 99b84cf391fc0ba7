use crate::demo::{run_demo, run_recommend, DemoArgs, RecommendArgs};
use crate::server;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use study_compass::error::AppError;

#[derive(Parser, Debug)]
#[command(
    name = "Study Compass",
    about = "Serve and demonstrate the study-abroad advising workflow from the command line",
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
    /// Print Dream/Target/Safe recommendations for a profile JSON file
    Recommend(RecommendArgs),
    /// Walk a sample student through recommendation, shortlist, lock, and unlock
    Demo(DemoArgs),
}

#[derive(Args, Debug, Default)]
pub(crate) struct ServeArgs {
    /// Override the configured host for the HTTP server
    #[arg(long)]
    pub(crate) host: Option<String>,
    /// Override the configured port for the HTTP server
    #[arg(long)]
    pub(crate) port: Option<u16>,
    /// Load the university catalog from this CSV export instead of the bundled sample
    #[arg(long)]
    pub(crate) catalog_csv: Option<PathBuf>,
}

pub(crate) async fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    let command = cli
        .command
        .unwrap_or_else(|| Command::Serve(ServeArgs::default()));

    match command {
        Command::Serve(args) => server::run(args).await,
        Command::Recommend(args) => run_recommend(args),
        Command::Demo(args) => run_demo(args),
    }
}
