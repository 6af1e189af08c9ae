use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::debug;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

use get_papers_list::classify::oracle_from_config;
use get_papers_list::{export, ClientConfig, OracleConfig, Pipeline};

#[derive(Parser)]
#[command(
    name = "get-papers-list",
    version,
    about = "Find PubMed papers with pharmaceutical or biotech company authors",
    long_about = "Searches PubMed, keeps papers with at least one author affiliated with a \
                  pharmaceutical or biotech company, and writes them as CSV or prints them"
)]
struct Cli {
    /// PubMed search query (full PubMed query syntax is supported)
    query: String,

    /// Write results as CSV to this file instead of printing them
    #[arg(short, long)]
    file: Option<PathBuf>,

    /// Print debug information during execution
    #[arg(short, long)]
    debug: bool,

    /// Maximum number of papers to retrieve
    #[arg(short = 'n', long, default_value_t = 10)]
    max_results: usize,

    /// API key for NCBI E-utilities (increases rate limit)
    #[arg(long, env = "NCBI_API_KEY")]
    api_key: Option<String>,

    /// Email for NCBI requests (recommended)
    #[arg(long, env = "NCBI_EMAIL")]
    email: Option<String>,

    /// Tool name for NCBI requests
    #[arg(long, env = "NCBI_TOOL", default_value = "get-papers-list")]
    tool: String,

    /// Override the E-utilities base URL
    #[arg(long, env = "PUBMED_BASE_URL")]
    base_url: Option<String>,

    /// Ollama server used for affiliations the keyword rules cannot decide
    #[arg(long, env = "OLLAMA_URL")]
    oracle_url: Option<String>,

    /// Model name for the Ollama oracle
    #[arg(long, env = "OLLAMA_MODEL", default_value = "llama3:8b")]
    oracle_model: String,

    /// Oracle request timeout in seconds
    #[arg(long, default_value_t = 10)]
    oracle_timeout: u64,
}

impl Cli {
    fn client_config(&self) -> ClientConfig {
        let mut config = ClientConfig::new().with_tool(&self.tool);
        if let Some(api_key) = &self.api_key {
            config = config.with_api_key(api_key);
        }
        if let Some(email) = &self.email {
            config = config.with_email(email);
        }
        if let Some(base_url) = &self.base_url {
            config = config.with_base_url(base_url);
        }
        config
    }

    fn oracle_config(&self) -> OracleConfig {
        let mut config = OracleConfig::new()
            .with_model(&self.oracle_model)
            .with_timeout(Duration::from_secs(self.oracle_timeout));
        if let Some(url) = &self.oracle_url {
            config = config.with_url(url);
        }
        config
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // .env values act as environment fallbacks for the flags above
    let dotenv = dotenvy::dotenv();
    let cli = Cli::parse();

    let filter = if cli.debug { "debug" } else { "warn" };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .without_time()
                .with_writer(std::io::stderr),
        )
        .with(tracing_subscriber::EnvFilter::new(filter))
        .init();

    if let Ok(path) = dotenv {
        debug!(path = %path.display(), "Loaded environment file");
    }

    let oracle_config = cli.oracle_config();
    let oracle =
        oracle_from_config(&oracle_config).context("Failed to set up affiliation oracle")?;
    if oracle_config.is_enabled() {
        debug!(model = oracle.name(), "Using affiliation oracle");
    }

    let pipeline = Pipeline::new(cli.client_config(), oracle);
    let papers = pipeline
        .run(&cli.query, cli.max_results)
        .await
        .with_context(|| format!("Failed to retrieve papers for query '{}'", cli.query))?;

    export::serialize(&papers, cli.file.as_deref()).context("Failed to write results")?;

    Ok(())
}
