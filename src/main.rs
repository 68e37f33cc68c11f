//! rest-route: REST route resolution service.
//!
//! ```text
//!     Client Request
//!     ──────────────▶ axum server ──▶ resolve_route middleware ──▶ handler
//!                                          │
//!                                          ▼
//!                           ArcSwap<Router> (REST + path strategies)
//!                                          ▲
//!                     config watcher ──────┘ (validated reloads)
//! ```

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tokio::net::TcpListener;
use tokio::sync::mpsc;

use rest_route::config::{load_config, watcher::ConfigWatcher, AppConfig};
use rest_route::lifecycle::{signals, Shutdown};
use rest_route::observability::{logging, metrics};
use rest_route::{HttpServer, RouteRequest, Router};

#[derive(Parser)]
#[command(name = "rest-route")]
#[command(about = "Resolve HTTP requests into REST controller actions", long_about = None)]
struct Cli {
    /// TOML configuration file. Defaults are used when omitted.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Reload the configuration file when it changes.
    #[arg(short, long, requires = "config")]
    watch: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the HTTP server (default)
    Serve,
    /// Resolve a single request and print the result as JSON
    Resolve {
        /// Declared HTTP method
        method: String,
        /// Request path
        path: String,
        /// Value of the verb-override header
        #[arg(long = "override")]
        override_header: Option<String>,
        /// Value of the verb-override form field
        #[arg(long)]
        form_method: Option<String>,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => load_config(path)?,
        None => AppConfig::default(),
    };

    logging::init(&config.observability);

    match cli.command.unwrap_or(Commands::Serve) {
        Commands::Resolve {
            method,
            path,
            override_header,
            form_method,
        } => {
            let router = Router::from_config(&config.route)?;
            let mut request = RouteRequest::new(path).with_declared_method(method);
            request.override_header = override_header;
            request.form_method = form_method;

            match router.match_request(&request) {
                Some(route) => println!("{}", serde_json::to_string_pretty(&route)?),
                None => {
                    eprintln!("No route matched '{}'", request.path);
                    std::process::exit(1);
                }
            }
            Ok(())
        }
        Commands::Serve => serve(config, cli.config, cli.watch).await,
    }
}

async fn serve(
    config: AppConfig,
    config_path: Option<PathBuf>,
    watch: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    tracing::info!("rest-route v{} starting", env!("CARGO_PKG_VERSION"));
    tracing::info!(
        bind_address = %config.server.bind_address,
        rest_enabled = config.route.rest.enabled,
        "Configuration loaded"
    );

    if config.observability.metrics_enabled {
        match config.observability.metrics_address.parse() {
            Ok(addr) => metrics::init_metrics(addr),
            Err(_) => tracing::error!(
                metrics_address = %config.observability.metrics_address,
                "Failed to parse metrics address"
            ),
        }
    }

    // Keep the watcher alive for the lifetime of the server.
    let (_watcher, config_updates) = match config_path.filter(|_| watch) {
        Some(path) => {
            let (watcher, rx) = ConfigWatcher::new(&path);
            (Some(watcher.run()?), rx)
        }
        None => {
            let (_, rx) = mpsc::unbounded_channel();
            (None, rx)
        }
    };

    let listener = TcpListener::bind(&config.server.bind_address).await?;
    tracing::info!(address = %listener.local_addr()?, "Listening for connections");

    let shutdown = Shutdown::new();
    let server_shutdown = shutdown.subscribe();
    signals::spawn_signal_handler(shutdown);

    let server = HttpServer::new(config)?;
    server.run(listener, config_updates, server_shutdown).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
