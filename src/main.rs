use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;
use tokio::runtime::Runtime;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use codewiki::analyzer::Chunker;
use codewiki::config::{Config, ConfigLoader, EmbeddingConfig, LlmConfig, StoreBackend};
use codewiki::{
    AnalysisScheduler, FileAnalysisWorker, PersistenceGateway, ProviderConfig,
    RetryingCompletionClient, create_completion_provider, create_embedding_provider, create_store,
    wiki,
};

#[derive(Parser)]
#[command(name = "codewiki")]
#[command(version, about = "AI-assisted wiki generator for source trees")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    #[arg(long, short, default_value = "codewiki.toml")]
    config: PathBuf,

    #[arg(long)]
    verbose: bool,

    #[arg(long, short)]
    quiet: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Analyze a source tree and generate the wiki
    Generate {
        /// Directory to analyze
        #[arg(default_value = ".")]
        path: PathBuf,
        #[arg(long, short, help = "Markdown output path")]
        output: Option<PathBuf>,
        #[arg(long, help = "Worker pool size")]
        concurrency: Option<usize>,
        #[arg(long, help = "Document store backend (sqlite, arango)")]
        store: Option<String>,
    },

    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand)]
enum ConfigAction {
    /// Show the merged configuration (secrets redacted)
    Show,
}

fn main() -> ExitCode {
    match run_cli() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("\x1b[31mError:\x1b[0m {}", e);
            ExitCode::FAILURE
        }
    }
}

fn run_cli() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        "debug"
    } else if cli.quiet {
        "error"
    } else {
        "info"
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| filter.into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let mut config = ConfigLoader::load(&cli.config)?;

    match cli.command {
        Commands::Generate {
            path,
            output,
            concurrency,
            store,
        } => {
            if let Some(output) = output {
                config.output.path = output;
            }
            if let Some(concurrency) = concurrency {
                config.analysis.concurrency = Some(concurrency);
            }
            if let Some(store) = store {
                config.store.backend = StoreBackend::parse(&store).ok_or_else(|| {
                    anyhow::anyhow!("invalid store backend '{}'. Valid values: sqlite, arango", store)
                })?;
            }
            config.validate()?;

            let rt = Runtime::new()?;
            rt.block_on(run_generate(config, path))?;
        }
        Commands::Config { action } => match action {
            ConfigAction::Show => {
                println!("{}", toml::to_string_pretty(&config)?);
            }
        },
    }

    Ok(())
}

async fn run_generate(config: Config, path: PathBuf) -> anyhow::Result<()> {
    info!("Analyzing {}", path.display());

    let completions = create_completion_provider(&completion_provider_config(&config.llm))?;
    let embeddings = create_embedding_provider(&embedding_provider_config(&config.embedding))?;

    let worker = FileAnalysisWorker::with_chunker(
        RetryingCompletionClient::new(completions),
        embeddings,
        Chunker::with_params(config.analysis.chunk_size, config.analysis.chunk_overlap),
    );
    let scheduler = AnalysisScheduler::new(worker, config.analysis.effective_concurrency())
        .with_extension(&config.analysis.extension)
        .with_initializer(&config.analysis.initializer);

    let batch = scheduler.analyze(&path).await?;

    let store = create_store(&config.store).await?;
    let stored = store.persist(&batch).await?;
    info!(
        "Stored {}/{} analyses via {}",
        stored,
        batch.len(),
        store.name()
    );

    let markdown = wiki::render_wiki(&batch);
    wiki::write_wiki(&config.output.path, &markdown)?;
    info!("Wiki written to {}", config.output.path.display());

    Ok(())
}

fn completion_provider_config(llm: &LlmConfig) -> ProviderConfig {
    ProviderConfig {
        provider: llm.provider.clone(),
        model: Some(llm.model.clone()),
        api_key: llm.api_key.clone(),
        api_base: llm.api_base.clone(),
        timeout_secs: llm.timeout_secs,
        temperature: llm.temperature,
    }
}

fn embedding_provider_config(embedding: &EmbeddingConfig) -> ProviderConfig {
    ProviderConfig {
        provider: embedding.provider.clone(),
        model: Some(embedding.model.clone()),
        api_key: embedding.api_key.clone(),
        api_base: embedding.api_base.clone(),
        timeout_secs: embedding.timeout_secs,
        temperature: 0.0,
    }
}
