use crate::{
    commands::{Commands, RowArgs, SourceKind},
    config::AppConfig,
    env::EnvManager,
    error::CliError,
};
use clap::Parser;
use connectors::{
    file::csv::source::CsvDataSource, sheets::client::GoogleSheetsClient, source::RowSource,
};
use engine_core::state::{KeyValueStore, sled_store::SledKeyValueStore};
use engine_processing::{action::GetNextRowsAction, paginator::RowPaginator};
use model::core::identifiers::FlowId;
use schema::dialect::dialect_from_name;
use std::{path::PathBuf, sync::Arc};
use tracing::info;
use tracing_subscriber::EnvFilter;

mod commands;
mod config;
mod env;
mod error;
mod output;

#[derive(Parser)]
#[command(
    name = "sheetcursor",
    version = "0.1.0",
    about = "Page through spreadsheet rows across runs"
)]
struct Cli {
    #[arg(long, global = true, help = "Load variables from this .env file first")]
    env_file: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[tokio::main]
async fn main() -> Result<(), CliError> {
    // Logs go to stderr so stdout stays parseable JSON
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let mut env = EnvManager::from_process();
    if let Some(path) = &cli.env_file {
        env.load_from_file(path)?;
    }
    let config = AppConfig::from_env(&env)?;

    match cli.command {
        Commands::NextRows(args) => {
            let action = build_action(&config, &args)?;
            let rows = action.run(args.props()).await?;
            output::print_json(&rows)?;
        }
        Commands::Preview(args) => {
            let action = build_action(&config, &args)?;
            let rows = action.test(args.props()).await?;
            output::print_json(&rows)?;
        }
        Commands::Cursor {
            mem_key,
            flow,
            json,
        } => {
            let flow = config.flow(flow.as_deref());
            let store = open_store(&config, flow.clone())?;
            let entry = store.get_entry(&mem_key).await?;
            output::print_cursor(flow.as_str(), &mem_key, entry.as_ref(), json)?;
        }
        Commands::Schema { dialect, down } => {
            let dialect = dialect_from_name(&dialect)?;
            print!("{}", output::schema_script(dialect.as_ref(), down));
        }
    }

    Ok(())
}

fn build_action(config: &AppConfig, args: &RowArgs) -> Result<GetNextRowsAction, CliError> {
    let source: Arc<dyn RowSource> = match args.source {
        SourceKind::Sheets => {
            let token = config
                .access_token
                .clone()
                .ok_or(CliError::MissingAccessToken)?;
            Arc::new(GoogleSheetsClient::with_base_url(token, &config.api_base)?)
        }
        SourceKind::Csv => {
            let dir = args
                .csv_dir
                .clone()
                .ok_or_else(|| CliError::Config("--csv-dir is required for the csv source".into()))?;
            Arc::new(CsvDataSource::new(dir))
        }
    };

    let flow = config.flow(args.flow.as_deref());
    info!(%flow, source = ?args.source, state_dir = %config.state_dir.display(), "Opening flow");
    let store: Arc<dyn KeyValueStore> = Arc::new(open_store(config, flow)?);

    let paginator = RowPaginator::new(source, store).with_guard(args.guard.into());
    Ok(GetNextRowsAction::new(paginator))
}

fn open_store(config: &AppConfig, flow: FlowId) -> Result<SledKeyValueStore, CliError> {
    Ok(SledKeyValueStore::open(&config.state_dir, flow)?)
}
