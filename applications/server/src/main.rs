/// Pulse Server - audio delivery for Pulse Player
use clap::{Parser, Subcommand};
use pulse_core::AudioDecoder;
use pulse_server::{api, config::ServerConfig, services::FileTrackStore, state::AppState};
use pulse_tempo::{SymphoniaDecoder, TempoAnalyzer, FALLBACK_BPM};
use std::{net::SocketAddr, path::PathBuf, sync::Arc};
use tower_http::{
    cors::CorsLayer,
    trace::{DefaultMakeSpan, TraceLayer},
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "pulse-server")]
#[command(about = "Pulse Player audio server", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the HTTP server
    Serve {
        /// Configuration file path
        #[arg(short, long)]
        config: Option<PathBuf>,
    },
    /// Estimate the tempo of a local audio file
    Analyze {
        /// Audio file path
        path: PathBuf,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "pulse_server=info,pulse_tempo=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Serve { config } => {
            serve(config).await?;
        }
        Commands::Analyze { path } => {
            analyze(path).await?;
        }
    }

    Ok(())
}

async fn serve(config_path: Option<PathBuf>) -> anyhow::Result<()> {
    // Load configuration
    let config = ServerConfig::load_from(config_path.as_deref())?;
    config.validate()?;

    tracing::info!("Starting Pulse Server");
    tracing::info!("Host: {}", config.server.host);
    tracing::info!("Port: {}", config.server.port);

    // Initialize file storage
    let store = FileTrackStore::new(
        config.storage.audio_dir.clone(),
        config.storage.audio_format.extension(),
    );
    store.initialize().await?;
    tracing::info!(
        "Serving {} files from {}",
        config.storage.audio_format.extension(),
        store.base_path().display()
    );

    // Build application state
    let app_state = AppState::with_format(Arc::new(store), config.storage.audio_format);

    // Build router
    let app = api::router(app_state)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::default().include_headers(true)),
        )
        .layer(CorsLayer::permissive());

    // Create server address
    let addr = SocketAddr::from((
        config.server.host.parse::<std::net::IpAddr>()?,
        config.server.port,
    ));

    tracing::info!("Server listening on {}", addr);

    // Start server
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

async fn analyze(path: PathBuf) -> anyhow::Result<()> {
    let data = tokio::fs::read(&path).await?;

    let decoder = match path.extension().and_then(|ext| ext.to_str()) {
        Some(ext) => SymphoniaDecoder::with_extension(ext),
        None => SymphoniaDecoder::new(),
    };

    let decoded = tokio::task::spawn_blocking(move || decoder.decode(&data)).await??;
    tracing::info!(
        "Decoded {:.1}s at {} Hz",
        decoded.duration_secs(),
        decoded.sample_rate
    );

    let bpm = match TempoAnalyzer::new().analyze(&decoded.channel_samples, decoded.sample_rate) {
        Ok(bpm) => bpm,
        Err(e) => {
            tracing::warn!("Tempo analysis failed ({}), using fallback", e);
            FALLBACK_BPM
        }
    };

    println!("{} BPM", bpm);
    Ok(())
}
