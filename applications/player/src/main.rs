/// Cadence - headless music player
use cadence_client::HttpResolver;
use cadence_core::{PreferenceStore, Resolver};
use cadence_player::{
    commands::{self, Command},
    AppState, ControlSteps, Controller, HeadlessTransport, PlayerConfig, Runtime, TerminalSurface,
    ViewSynchronizer,
};
use cadence_playback::PlaybackSession;
use cadence_storage::{MemoryPreferenceStore, PersistedState, SqlitePreferenceStore};
use clap::Parser;
use std::{path::PathBuf, sync::Arc, time::Duration};
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Simulated playback clock resolution
const TICK: Duration = Duration::from_secs(1);

#[derive(Parser)]
#[command(name = "cadence")]
#[command(about = "Search, queue, and play music from the terminal", long_about = None)]
struct Cli {
    /// Configuration file path
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Keep preferences in memory only
    #[arg(long)]
    ephemeral: bool,

    /// Relay base URL (overrides the config file)
    #[arg(long, env = "CADENCE_BASE_URL")]
    base_url: Option<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Logs go to stderr; stdout belongs to the surfaces
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "cadence_player=info,cadence_playback=info,cadence_client=info,warn".into()
            }),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    let mut config = PlayerConfig::load(cli.config.as_deref())?;
    if let Some(base_url) = cli.base_url {
        config.resolver.base_url = base_url;
    }
    if cli.ephemeral {
        config.storage.ephemeral = true;
    }
    config.validate()?;

    tracing::info!("Starting Cadence");
    tracing::info!("Relay: {}", config.resolver.base_url);

    let store = open_store(&config).await?;
    let resolver: Arc<dyn Resolver> = Arc::new(HttpResolver::new(config.resolver_config())?);

    let playback = config.playback_config();
    let session = PlaybackSession::new(Box::new(HeadlessTransport::new()), &playback);
    let state = AppState::new(session, &playback, config.resolver.default_engine.clone());

    let mut controller = Controller::new(
        state,
        ControlSteps {
            volume: config.controls.volume_step,
            seek_seconds: config.controls.seek_step_secs,
        },
    );
    match PersistedState::load(store.as_ref(), config.controls.default_volume).await {
        Ok(persisted) => controller.restore(persisted),
        Err(e) => tracing::warn!("Could not read saved preferences, starting fresh: {}", e),
    }

    let mut sync = ViewSynchronizer::new();
    for surface in TerminalSurface::stdout_set() {
        sync.register(surface);
    }

    let runtime = Runtime::new(controller, resolver, store, sync, config.call_timeout());

    let (tx, rx) = mpsc::unbounded_channel();
    tokio::spawn(async move {
        let mut lines = BufReader::new(tokio::io::stdin()).lines();
        println!("Type `help` for commands.");
        loop {
            let line = match lines.next_line().await {
                Ok(Some(line)) => line,
                Ok(None) => break,
                Err(e) => {
                    tracing::warn!("Failed to read input: {}", e);
                    break;
                }
            };
            match commands::parse(&line) {
                Ok(Some(Command::Event(event))) => {
                    if tx.send(event).is_err() {
                        break;
                    }
                }
                Ok(Some(Command::Help)) => println!("{}", commands::HELP),
                Ok(Some(Command::Quit)) => break,
                Ok(None) => {}
                Err(e) => println!("{e}"),
            }
        }
        // Dropping `tx` stops the runtime
    });

    runtime.run(rx, TICK).await;

    tracing::info!("Goodbye");
    Ok(())
}

async fn open_store(config: &PlayerConfig) -> anyhow::Result<Arc<dyn PreferenceStore>> {
    if config.storage.ephemeral {
        tracing::info!("Using in-memory preferences");
        return Ok(Arc::new(MemoryPreferenceStore::new()));
    }

    let pool = cadence_storage::create_pool(&config.storage.database_url).await?;
    cadence_storage::run_migrations(&pool).await?;
    tracing::info!("Database connected");

    Ok(Arc::new(SqlitePreferenceStore::new(pool)))
}
