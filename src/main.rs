use std::path::PathBuf;

use clap::{Parser, Subcommand};
use gisty::{config::AppConfig, kgs, reaper, AppState};
use tokio_util::sync::CancellationToken;

#[derive(Parser, Debug)]
#[command(name = "gisty", version, about = "A snippet-sharing service", long_about = None)]
struct Args {
    #[command(subcommand)]
    command: Option<Command>,

    /// Path to the TOML configuration file.
    #[arg(short, long, global = true, default_value = "gisty.toml")]
    config: PathBuf,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Start the HTTP server (default).
    Serve,
    /// Run pending database migrations and exit.
    Migrate,
    /// Run a single reaper sweep across all tiers and exit.
    Reap,
    /// Write a default configuration file and exit.
    Init {
        /// Overwrite an existing file at the destination.
        #[arg(long)]
        force: bool,
    },
    /// Export the configuration file's JSON schema.
    #[cfg(feature = "json-schema")]
    Schema,
}

#[tokio::main]
async fn main() {
    let args = Args::parse();

    match args.command.unwrap_or(Command::Serve) {
        Command::Serve => run_server(&args.config).await,
        Command::Migrate => run_migrate(&args.config).await,
        Command::Reap => run_reap(&args.config).await,
        Command::Init { force } => run_init(&args.config, force),
        #[cfg(feature = "json-schema")]
        Command::Schema => run_schema(),
    }
}

fn default_config_toml() -> &'static str {
    r#"# Gisty configuration.
# Every section is optional; a missing or empty file uses these defaults.

[server]
host = "0.0.0.0"
port = 8080
base_url = "http://localhost:8080"

[database]
type = "sqlite"
path = "gisty.db"

[cache]
type = "memory"

[storage]
type = "filesystem"
root_dir = "./data/blobs"

[kgs]
key_length = 6

[reaper]
enabled = true
interval_secs = 300
batch_size = 100

[limits]
max_content_bytes = 1048576

[observability]
log_format = "pretty"
"#
}

fn run_init(config_path: &PathBuf, force: bool) {
    if config_path.exists() && !force {
        eprintln!(
            "Config file already exists: {}. Use --force to overwrite.",
            config_path.display()
        );
        std::process::exit(1);
    }
    if let Err(e) = std::fs::write(config_path, default_config_toml()) {
        eprintln!("Failed to write config file: {e}");
        std::process::exit(1);
    }
    println!("Created config file: {}", config_path.display());
}

#[cfg(feature = "json-schema")]
fn run_schema() {
    let schema = AppConfig::json_schema();
    println!("{}", serde_json::to_string_pretty(&schema).expect("schema serializes"));
}

fn load_config(config_path: &PathBuf) -> AppConfig {
    if config_path.exists() {
        AppConfig::from_file(config_path).unwrap_or_else(|e| {
            eprintln!("Failed to load config from {}: {e}", config_path.display());
            std::process::exit(1);
        })
    } else {
        AppConfig::default()
    }
}

async fn run_migrate(config_path: &PathBuf) {
    let config = load_config(config_path);
    let db = gisty::db::DbPool::from_config(&config.database)
        .await
        .expect("failed to connect to the metadata index");
    db.run_migrations().await.expect("migration failed");
    println!("Migrations complete.");
}

async fn run_reap(config_path: &PathBuf) {
    let config = load_config(config_path);

    let db = gisty::db::DbPool::from_config(&config.database)
        .await
        .expect("failed to connect to the metadata index");
    let cache = gisty::cache::build_cache(&config.cache).expect("failed to build cache");
    let store = gisty::store::build_store(&config.storage)
        .await
        .expect("failed to build blob store");

    let result = reaper::run_once(&db.pastes(), &cache, &store, config.reaper.batch_size, "gisty")
        .await
        .expect("reaper sweep failed");

    println!(
        "Reaper sweep complete: {} batch(es), {} paste(s) deleted.",
        result.batches_processed, result.pastes_deleted
    );
}

async fn run_server(config_path: &PathBuf) {
    let config = load_config(config_path);

    gisty::observability::init_tracing(&config.observability).expect("failed to initialize tracing");

    tracing::info!(config_file = %config_path.display(), "starting gisty");

    let state = AppState::new(config.clone())
        .await
        .expect("failed to initialize application state");

    let shutdown = CancellationToken::new();

    tokio::spawn(kgs::start_replenisher(
        state.db.kgs_keys(),
        config.kgs.clone(),
        shutdown.child_token(),
    ));
    tokio::spawn(reaper::start_reaper(
        state.db.pastes(),
        state.cache.clone(),
        state.store.clone(),
        config.reaper.clone(),
        state.cache_key_prefix.clone(),
        shutdown.child_token(),
    ));

    let task_tracker = state.task_tracker.clone();
    let app = gisty::app(state);

    let bind_addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .unwrap_or_else(|e| panic!("failed to bind to {bind_addr}: {e}"));

    tracing::info!(address = %bind_addr, "server listening");

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<std::net::SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal(shutdown, task_tracker, config.server.shutdown_timeout()))
    .await
    .unwrap();
}

/// Waits for SIGINT/SIGTERM, cancels the background tasks, then drains
/// in-flight work with a bounded timeout (§5 Cancellation).
async fn shutdown_signal(
    shutdown: CancellationToken,
    task_tracker: tokio_util::task::TaskTracker,
    drain_timeout: std::time::Duration,
) {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to install SIGTERM handler")
            .recv()
            .await;
    };
    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("shutdown signal received, draining background tasks");
    shutdown.cancel();
    task_tracker.close();

    if tokio::time::timeout(drain_timeout, task_tracker.wait())
        .await
        .is_err()
    {
        tracing::warn!("timed out waiting for background tasks to drain");
    }
}
