use anyhow::Result;
use clap::Parser;
use docque::api::ApiClient;
use docque::commands;
use docque::config::{DEFAULT_API_URL, DEFAULT_TIMEOUT_MS, Settings};
use docque::runtime::RealRuntime;
use docque::state::AppState;
use std::path::PathBuf;

/// docque - client for a document question-answering service
///
/// Upload PDF or text documents, list and delete them, and ask questions
/// answered from their contents.
///
/// Examples:
///   docque upload report.pdf notes.txt
///   docque query "What were the key findings?"
#[derive(Parser, Debug)]
#[command(author, version = env!("DOCQUE_VERSION"), about)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Backend base URL
    #[arg(
        long = "api-url",
        env = "DOCQUE_API_URL",
        value_name = "URL",
        default_value = DEFAULT_API_URL,
        global = true
    )]
    pub api_url: String,

    /// Per-attempt request timeout in milliseconds
    #[arg(
        long = "timeout-ms",
        env = "DOCQUE_TIMEOUT_MS",
        value_name = "MS",
        default_value_t = DEFAULT_TIMEOUT_MS,
        global = true
    )]
    pub timeout_ms: u64,

    /// Attempts per request, including the first (server and network errors only)
    #[arg(
        long = "max-attempts",
        env = "DOCQUE_MAX_ATTEMPTS",
        value_name = "N",
        default_value_t = docque::api::DEFAULT_MAX_ATTEMPTS,
        value_parser = clap::value_parser!(u32).range(1..),
        global = true
    )]
    pub max_attempts: u32,
}

#[derive(clap::Subcommand, Debug)]
enum Commands {
    /// List uploaded documents
    List,

    /// Upload PDF or text files
    Upload(UploadArgs),

    /// Delete a document by id
    Delete(DeleteArgs),

    /// Ask a question about the uploaded documents
    Query(QueryArgs),

    /// Check that the backend is reachable and healthy
    Health(HealthArgs),
}

#[derive(clap::Args, Debug)]
pub struct HealthArgs {
    /// Report the status of each backend service
    #[arg(long)]
    pub services: bool,
}

#[derive(clap::Args, Debug)]
pub struct UploadArgs {
    /// Files to upload
    #[arg(value_name = "FILE", required = true)]
    pub files: Vec<PathBuf>,
}

#[derive(clap::Args, Debug)]
pub struct DeleteArgs {
    /// Document id as shown by `docque list`
    #[arg(value_name = "ID")]
    pub id: String,
}

#[derive(clap::Args, Debug)]
pub struct QueryArgs {
    /// The question to ask
    #[arg(value_name = "QUESTION")]
    pub text: String,

    /// Maximum number of document chunks to draw the answer from
    #[arg(long = "max-results", short = 'n', value_name = "N")]
    pub max_results: Option<u32>,
}

impl Cli {
    fn settings(&self) -> Settings {
        Settings {
            base_url: self.api_url.clone(),
            timeout_ms: self.timeout_ms,
            max_attempts: self.max_attempts,
            ..Settings::default()
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    let cli = Cli::parse();
    let settings = cli.settings();
    let default_max_results = settings.default_max_results;
    let mut state = AppState::new(ApiClient::new(settings)?);

    match cli.command {
        Commands::List => commands::list(&mut state).await?,
        Commands::Upload(args) => commands::upload(&RealRuntime, &mut state, &args.files).await?,
        Commands::Delete(args) => commands::delete(&mut state, &args.id).await?,
        Commands::Query(args) => {
            let max_results = args.max_results.unwrap_or(default_max_results);
            commands::query(&mut state, &args.text, max_results).await?
        }
        Commands::Health(args) => commands::health(state.api(), args.services).await?,
    }
    Ok(())
}
