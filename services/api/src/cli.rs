use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use risk_calculator::error::AppError;

use crate::commands::{run_catalog_export, run_catalog_list, run_score};
use crate::demo::{run_demo, DemoArgs};
use crate::server;

#[derive(Parser, Debug)]
#[command(
    name = "Security Priority Calculator",
    about = "Score third-party application requests against weighted security criteria",
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
    /// Inspect or export the criteria catalog
    Catalog {
        #[command(subcommand)]
        command: CatalogCommand,
    },
    /// Score an application against one platform type without storing it
    Score(ScoreArgs),
    /// Walk through a scripted evaluation session in memory
    Demo(DemoArgs),
}

#[derive(Subcommand, Debug)]
enum CatalogCommand {
    /// Print platform types, or the criteria of one platform type
    List(CatalogListArgs),
    /// Write the criteria reference sheet as CSV
    Export(CatalogExportArgs),
}

/// Location of the persisted state; falls back to `APP_DATA_DIR`.
#[derive(Args, Debug, Default, Clone)]
pub(crate) struct StorageArgs {
    /// Directory holding the persisted calculator state
    #[arg(long)]
    pub(crate) data_dir: Option<PathBuf>,
}

#[derive(Args, Debug, Default)]
pub(crate) struct ServeArgs {
    /// Override the configured host for the HTTP server
    #[arg(long)]
    pub(crate) host: Option<String>,
    /// Override the configured port for the HTTP server
    #[arg(long)]
    pub(crate) port: Option<u16>,
    #[command(flatten)]
    pub(crate) storage: StorageArgs,
}

#[derive(Args, Debug)]
pub(crate) struct CatalogListArgs {
    /// Show the criteria and options of this platform type
    #[arg(long)]
    pub(crate) platform: Option<String>,
    #[command(flatten)]
    pub(crate) storage: StorageArgs,
}

#[derive(Args, Debug)]
pub(crate) struct CatalogExportArgs {
    /// Export only this platform type (all platform types when omitted)
    #[arg(long)]
    pub(crate) platform: Option<String>,
    /// Write to this file instead of stdout
    #[arg(long)]
    pub(crate) output: Option<PathBuf>,
    #[command(flatten)]
    pub(crate) storage: StorageArgs,
}

#[derive(Args, Debug)]
pub(crate) struct ScoreArgs {
    /// Platform type name, e.g. "OAuth"
    #[arg(long)]
    pub(crate) platform: String,
    /// Answer as "CRITERION=OPTION LABEL"; repeat once per criterion
    #[arg(long = "select", value_parser = crate::infra::parse_selection)]
    pub(crate) selections: Vec<(String, String)>,
    /// Application name shown in the breakdown
    #[arg(long, default_value = "Ad-hoc evaluation")]
    pub(crate) name: String,
    /// Person requesting the application
    #[arg(long, default_value = "cli")]
    pub(crate) requestor: String,
    /// Also write the breakdown CSV to this file
    #[arg(long)]
    pub(crate) csv: Option<PathBuf>,
    #[command(flatten)]
    pub(crate) storage: StorageArgs,
}

pub(crate) async fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    let command = cli
        .command
        .unwrap_or_else(|| Command::Serve(ServeArgs::default()));

    match command {
        Command::Serve(args) => server::run(args).await,
        Command::Catalog {
            command: CatalogCommand::List(args),
        } => run_catalog_list(args),
        Command::Catalog {
            command: CatalogCommand::Export(args),
        } => run_catalog_export(args),
        Command::Score(args) => run_score(args),
        Command::Demo(args) => run_demo(args),
    }
}
