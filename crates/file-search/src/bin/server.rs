//! File search server binary
//!
//! Run with: cargo run -p file-search --bin file-search-server

use clap::Parser;
use file_search::{config::AppConfig, server::FileSearchServer};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser, Debug)]
#[command(name = "file-search-server", version, about = "Gemini File Search dashboard and API")]
struct Args {
    /// Path to a TOML configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Host address to bind
    #[arg(long)]
    host: Option<String>,

    /// Port to listen on
    #[arg(short, long)]
    port: Option<u16>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Pick up GEMINI_API_KEY from .env before reading configuration
    dotenv::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "file_search=info,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let args = Args::parse();

    println!(
        r#"
╔═══════════════════════════════════════════════════════════╗
║                    Gemini File Search                     ║
║        Store Management and Grounded Q&A Dashboard        ║
╚═══════════════════════════════════════════════════════════╝
"#
    );

    // Load configuration
    let mut config = AppConfig::load(args.config.as_deref())?;
    if let Some(host) = args.host {
        config.server.host = host;
    }
    if let Some(port) = args.port {
        config.server.port = port;
    }
    config.validate()?;

    tracing::info!("Configuration loaded");
    tracing::info!("  - Default model: {}", config.gemini.default_model);
    tracing::info!("  - Strip markdown: {}", config.gemini.strip_markdown);
    tracing::info!("  - Max upload size: {} bytes", config.server.max_upload_size);
    tracing::info!("  - Static dir: {}", config.server.static_dir.display());

    // Create and start server
    let server = FileSearchServer::new(config)?;

    println!("\nServer starting...");
    println!("  Dashboard: http://{}/", server.address());
    println!("  Health: http://{}/health", server.address());
    println!("  API Info: http://{}/api/info", server.address());
    println!("\nEndpoints:");
    println!("  POST /api/stores              - Create a store");
    println!("  POST /api/stores/:id/upload   - Upload a document");
    println!("  GET  /api/stores/operations/* - Poll an upload");
    println!("  POST /api/query               - Ask questions");
    println!("\nPress Ctrl+C to stop\n");

    server.start().await?;

    Ok(())
}
