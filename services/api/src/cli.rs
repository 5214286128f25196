use crate::demo::{run_demo, run_required_report, DemoArgs, RequiredArgs};
use crate::server;
use clap::{Args, Parser, Subcommand};
use passmark::error::AppError;

#[derive(Parser, Debug)]
#[command(
    name = "Passmark Grade Service",
    about = "Run and demonstrate the weighted grade approval service from the command line",
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
    /// Project the grade required on the remaining percentage of a subject
    Required(RequiredArgs),
    /// Run an end-to-end CLI demo covering the subject workflow
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
}

pub(crate) async fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    let command = cli
        .command
        .unwrap_or_else(|| Command::Serve(ServeArgs::default()));

    match command {
        Command::Serve(args) => server::run(args).await,
        Command::Required(args) => run_required_report(args),
        Command::Demo(args) => run_demo(args),
    }
}
