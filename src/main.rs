use clap::{Parser, Subcommand, ValueEnum};
use scoutx_api::{AppState, RestApi};
use scoutx_core::{IndexStrategy, NeighborSearch};
use scoutx_similarity::{DuplicatePolicy, PositionGroup, SimilarityConfig, SimilarityEngine, DEFAULT_K};
use scoutx_storage::TableStore;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

/// Find the most similar player-seasons within a position group
#[derive(Parser, Debug)]
#[command(name = "scoutx")]
#[command(about = "Player-season similarity search", long_about = None)]
struct Args {
    /// Directory holding one feature table document per position group
    #[arg(short, long, default_value = "./data")]
    data_dir: PathBuf,

    /// Index strategy: linear, kdtree or auto
    #[arg(long, default_value = "auto")]
    strategy: IndexStrategy,

    /// Log level
    #[arg(long, default_value = "warn")]
    log_level: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the neighbors of one player-season
    Query {
        /// Position group (forwards, midfielders)
        #[arg(short, long)]
        group: PositionGroup,

        /// Player name, matched exactly
        #[arg(short, long)]
        player: String,

        /// Season code such as 1920
        #[arg(short, long)]
        season: String,

        /// Number of neighbors, the player-season itself included
        #[arg(short, default_value_t = DEFAULT_K)]
        k: usize,

        /// Use the first row when the identity occurs more than once
        #[arg(long)]
        first_match: bool,

        #[arg(long, value_enum, default_value_t = Format::Text)]
        format: Format,
    },
    /// List loaded position groups
    Groups,
    /// Serve the REST API
    Serve {
        /// HTTP API port
        #[arg(long, default_value_t = 6333)]
        http_port: u16,
    },
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum Format {
    Text,
    Json,
}

fn parse_level(level: &str) -> Level {
    match level {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let subscriber = FmtSubscriber::builder()
        .with_max_level(parse_level(&args.log_level))
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    info!("Starting scoutx v{}", env!("CARGO_PKG_VERSION"));
    info!("Data directory: {:?}", args.data_dir);

    let store = TableStore::new(&args.data_dir);
    let config = SimilarityConfig::default().with_strategy(args.strategy);

    match args.command {
        Command::Query {
            group,
            player,
            season,
            k,
            first_match,
            format,
        } => {
            let duplicates = if first_match {
                DuplicatePolicy::FirstMatch
            } else {
                DuplicatePolicy::Reject
            };
            let config = config.with_k(k).with_duplicates(duplicates);
            let registry = store.load_registry(config.strategy)?;
            let engine = SimilarityEngine::new(Arc::new(registry), config)?;
            let response = engine.similar(group, &player, &season, None)?;
            match format {
                Format::Text => print!("{}", response.render_text()),
                Format::Json => println!("{}", serde_json::to_string_pretty(&response)?),
            }
        }
        Command::Groups => {
            let registry = store.load_registry(config.strategy)?;
            for group in registry.groups() {
                let entry = registry.get(group)?;
                println!(
                    "{:<12} {:>6} rows  dim {}  {}",
                    group,
                    entry.index().len(),
                    entry.index().dim(),
                    entry.index().strategy()
                );
            }
        }
        Command::Serve { http_port } => {
            let state = Arc::new(AppState::load(store, config)?);
            info!(
                "Loaded {} rows across {} groups",
                state.engine().registry().total_rows(),
                state.engine().registry().len()
            );

            // actix runs its own system on a dedicated thread
            let http_handle = std::thread::spawn(move || {
                let sys = actix_web::rt::System::new();
                sys.block_on(async {
                    if let Err(e) = RestApi::start(state, http_port).await {
                        tracing::error!("HTTP server error: {}", e);
                    }
                })
            });
            info!("HTTP API: http://localhost:{}/", http_port);

            tokio::select! {
                _ = tokio::signal::ctrl_c() => {
                    info!("Shutdown signal received");
                }
                _ = tokio::task::spawn_blocking(move || {
                    http_handle.join().ok();
                }) => {
                    info!("HTTP server stopped");
                }
            }
            info!("Shutting down...");
        }
    }

    Ok(())
}
