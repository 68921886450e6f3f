//! Kill switch service entry point.

use std::net::SocketAddr;

use anyhow::Context;
use clap::{Parser, Subcommand};
use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use killswitch::api::{create_router, mount_docs, openapi, AppState};
use killswitch::config::Config;
use killswitch::metrics;
use killswitch::store::{open_store, StatusStore, StoreBackend};
use killswitch::utils::shutdown_signal;
use killswitch::KillSwitch;

/// Remotely toggleable render flag service.
#[derive(Parser, Debug)]
#[command(name = "killswitch")]
#[command(about = "Serve a render flag that operators can toggle with an API key")]
#[command(version)]
struct Args {
    /// Enable verbose logging.
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Command>,

    /// HTTP listen port (overrides PORT).
    #[arg(short, long)]
    port: Option<u16>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run the HTTP server (default).
    Serve {
        /// HTTP listen port (overrides PORT).
        #[arg(short, long)]
        port: Option<u16>,
    },

    /// Check configuration validity.
    CheckConfig,

    /// Print the stored flag.
    Status,

    /// Print the OpenAPI document as JSON.
    Openapi {
        /// Server URL advertised in the document.
        #[arg(long, env = "BASE_URL", default_value = "http://localhost:5000")]
        base_url: String,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Parse CLI arguments
    let args = Args::parse();

    // Initialize logging
    let filter = if args.verbose {
        EnvFilter::new("killswitch=debug,info")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };

    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(filter)
        .init();

    // Handle subcommands
    match args.command {
        Some(Command::Serve { port }) => cmd_serve(port.or(args.port)).await,
        Some(Command::CheckConfig) => cmd_check_config().await,
        Some(Command::Status) => cmd_status().await,
        Some(Command::Openapi { base_url }) => cmd_openapi(&base_url),
        None => cmd_serve(args.port).await,
    }
}

/// Load and validate configuration.
fn load_config() -> anyhow::Result<Config> {
    let config = Config::load().context("failed to load configuration")?;
    config.validate()?;
    Ok(config)
}

/// Run the HTTP server.
async fn cmd_serve(port: Option<u16>) -> anyhow::Result<()> {
    let mut config = load_config()?;
    if let Some(port) = port {
        config.port = port;
    }

    info!("Configuration loaded successfully");
    info!("Store backend: {}", config.store_backend);

    let metrics_handle =
        metrics::install_recorder().context("failed to install metrics recorder")?;

    // Refuse to start against an unreachable store
    let store = open_store(&config)
        .await
        .with_context(|| format!("{} status store is unavailable", config.store_backend))?;

    let state = AppState::new(KillSwitch::new(store), config.api_key.as_str())
        .with_metrics(metrics_handle);

    let mut router = create_router(state);
    if config.docs_enabled {
        router = mount_docs(router, &config.base_url());
        info!("API docs at {}/docs", config.base_url());
    }

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    let listener = TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {}", addr))?;
    info!("Server running on port {}", config.port);

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server stopped");
    Ok(())
}

/// Check configuration validity.
async fn cmd_check_config() -> anyhow::Result<()> {
    println!("======================================================================");
    println!("KILL SWITCH - CONFIGURATION CHECK");
    println!("======================================================================");

    print!("Loading configuration... ");
    let config = match Config::load() {
        Ok(c) => {
            println!("OK");
            c
        }
        Err(e) => {
            println!("FAILED");
            println!("  Error: {}", e);
            return Err(anyhow::anyhow!("Configuration load failed"));
        }
    };

    print!("Validating configuration... ");
    match config.validate() {
        Ok(()) => println!("OK"),
        Err(e) => {
            println!("FAILED");
            println!("  Error: {}", e);
            return Err(anyhow::anyhow!("Configuration validation failed"));
        }
    }

    print!("Opening status store... ");
    match open_store(&config).await {
        Ok(_) => println!("OK"),
        Err(e) => {
            println!("FAILED");
            println!("  Error: {}", e);
            return Err(anyhow::anyhow!("Status store unavailable"));
        }
    }

    println!("----------------------------------------------------------------------");
    println!("Configuration Summary:");
    println!("  Port: {}", config.port);
    println!("  Store Backend: {}", config.store_backend);
    match config.store_backend {
        StoreBackend::File => {
            println!("  Status File: {}", config.status_file.display())
        }
        StoreBackend::Memory => {
            println!("  Initial Status: {}", config.initial_status)
        }
        StoreBackend::Mongo => println!(
            "  Collection: {}.{}",
            config.mongodb_database, config.mongodb_collection
        ),
    }
    println!(
        "  Docs: {}",
        if config.docs_enabled {
            format!("{}/docs", config.base_url())
        } else {
            "Disabled".to_string()
        }
    );
    println!("======================================================================");
    println!("CONFIGURATION CHECK PASSED");
    println!("======================================================================");

    Ok(())
}

/// Print the stored flag.
async fn cmd_status() -> anyhow::Result<()> {
    let config = load_config()?;
    let store = open_store(&config).await?;

    let enabled = store.read().await?;
    println!("renderApp: {}", enabled);

    if let Some(updated_at) = store.last_updated().await? {
        println!("updatedAt: {}", updated_at.to_rfc3339());
    }

    Ok(())
}

/// Print the OpenAPI document.
fn cmd_openapi(base_url: &str) -> anyhow::Result<()> {
    let doc = openapi(base_url);
    println!("{}", doc.to_pretty_json()?);
    Ok(())
}
