use std::path::PathBuf;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use folio::api::{self, middleware::SecurityConfig};
use folio::config::{FolioConfig, SourceKind};
use folio::db;
use folio::providers::{DiskCache, GitHubClient, PortfolioClient, Providers, Source};
use folio::terminal::{builtin_registry, Terminal};

#[derive(Parser)]
#[command(name = "folio")]
#[command(about = "Portfolio content API and interactive terminal")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the portfolio API server
    Serve {
        /// Port for HTTP API
        #[arg(short, long, default_value = "3000")]
        port: u16,

        /// Address to bind
        #[arg(long, default_value = "127.0.0.1")]
        host: String,

        /// Database file (defaults to the user data directory)
        #[arg(long)]
        db: Option<PathBuf>,
    },
    /// Open the interactive terminal (default)
    Terminal {
        /// Where portfolio content comes from
        #[arg(long, value_enum)]
        source: Option<SourceKind>,

        /// Base URL of the folio API
        #[arg(long)]
        api_url: Option<String>,

        /// GitHub account for the github source
        #[arg(long)]
        github_user: Option<String>,

        /// Keep at most this many transcript entries
        #[arg(long)]
        max_entries: Option<usize>,

        /// Always fetch, never read or write the on-disk cache
        #[arg(long)]
        no_cache: bool,
    },
    /// Check whether the API server is up
    Status {
        /// Base URL of the folio API
        #[arg(long)]
        api_url: Option<String>,
    },
    /// Write the default configuration file
    InitConfig,
}

/// Initialize tracing. The terminal logs to stderr at `warn` so log lines
/// don't land in the transcript.
fn init_tracing(interactive: bool) {
    let default = if interactive {
        "folio=warn"
    } else {
        "folio=info,tower_http=info"
    };
    let filter =
        tracing_subscriber::EnvFilter::new(std::env::var("RUST_LOG").unwrap_or_else(|_| default.into()));

    if interactive {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer())
            .init();
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let interactive = matches!(cli.command, None | Some(Commands::Terminal { .. }));
    init_tracing(interactive);

    match cli.command {
        Some(Commands::Serve { port, host, db }) => serve(&host, port, db).await?,
        Some(Commands::Terminal {
            source,
            api_url,
            github_user,
            max_entries,
            no_cache,
        }) => {
            let mut config = FolioConfig::load();
            if let Some(source) = source {
                config.source = source;
            }
            if let Some(url) = api_url {
                config.api_url = url;
            }
            if github_user.is_some() {
                config.github_user = github_user;
            }
            if max_entries.is_some() {
                config.max_transcript_entries = max_entries;
            }
            terminal(config, no_cache).await?;
        }
        Some(Commands::Status { api_url }) => {
            let config = FolioConfig::load();
            let client = PortfolioClient::new(api_url.unwrap_or(config.api_url));
            println!("Checking folio server at {}...", client.base_url());
            match client.health().await {
                Ok(true) => println!("Server is running."),
                Ok(false) => println!("Server answered but is not healthy."),
                Err(e) => println!("Server is not reachable: {}", e),
            }
        }
        Some(Commands::InitConfig) => {
            let path = FolioConfig::default().save()?;
            println!("Wrote {}", path.display());
        }
        None => terminal(FolioConfig::load(), false).await?,
    }

    Ok(())
}

async fn serve(host: &str, port: u16, path: Option<PathBuf>) -> anyhow::Result<()> {
    tracing::info!("Starting folio server on port {}", port);

    let db = match path {
        Some(path) => db::Database::open(path)?,
        None => db::Database::open_default()?,
    };
    db.migrate()?;
    db.seed_if_empty()?;

    let app = api::create_router(db, SecurityConfig::from_env());

    let listener = tokio::net::TcpListener::bind(format!("{}:{}", host, port)).await?;
    tracing::info!("folio server listening on http://{}:{}", host, port);

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<std::net::SocketAddr>(),
    )
    .await?;
    Ok(())
}

async fn terminal(config: FolioConfig, no_cache: bool) -> anyhow::Result<()> {
    let source = match config.source {
        SourceKind::Api => Source::Api(PortfolioClient::new(&config.api_url)),
        SourceKind::Github => {
            let user = config.github_user.clone().ok_or_else(|| {
                anyhow::anyhow!("The github source needs a user (--github-user or FOLIO_GITHUB_USER)")
            })?;
            Source::GitHub {
                client: GitHubClient::new(user)?,
                certifications_path: config.certifications_path.clone(),
            }
        }
    };

    let cache = if no_cache {
        None
    } else {
        match DiskCache::open_default() {
            Ok(cache) => Some(cache),
            Err(e) => {
                tracing::warn!("Running without a cache: {:#}", e);
                None
            }
        }
    };

    let providers = Providers::spawn(source, cache, config.cache_ttl());
    let session = Terminal::new(builtin_registry(config.profile), Arc::new(providers))
        .with_transcript_limit(config.max_transcript_entries);

    tokio::task::spawn_blocking(move || folio::repl::run(session)).await?
}
