use crate::demo::{run_demo, run_revenue_report, DemoArgs, RevenueReportArgs};
use crate::server;
use clap::{Args, Parser, Subcommand};
use immokey::error::AppError;

#[derive(Parser, Debug)]
#[command(
    name = "ImmoKey Back Office",
    about = "Run the ImmoKey reservation service and reporting tools from the command line",
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
    /// Revenue reporting over the bundled demo dataset
    Revenue {
        #[command(subcommand)]
        command: RevenueCommand,
    },
    /// Run an end-to-end CLI demo covering booking and revenue workflows
    Demo(DemoArgs),
}

#[derive(Subcommand, Debug)]
enum RevenueCommand {
    /// Print a bucketed revenue report with headline figures
    Report(RevenueReportArgs),
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
        Command::Revenue {
            command: RevenueCommand::Report(args),
        } => run_revenue_report(args),
        Command::Demo(args) => run_demo(args),
    }
}
