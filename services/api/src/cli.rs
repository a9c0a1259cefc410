use crate::demo::{run_demo, run_seed, DemoArgs};
use crate::server;
use clap::{Args, Parser, Subcommand};
use vendor_intake::error::AppError;

#[derive(Parser, Debug)]
#[command(
    name = "Vendor Intake",
    about = "Run the vendor onboarding service or exercise it from the command line",
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
    /// Seed the configured store with sample users, vendors, and requests
    Seed,
    /// Submit a request through the intake wizard and decide it as an admin
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
        Command::Seed => run_seed(),
        Command::Demo(args) => run_demo(args).await,
    }
}
