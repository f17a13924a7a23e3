//! PageSmith -- standards-aligned worksheet generation service.
//!
//! This is the application entry point. It wires together all modules:
//!   - Configuration loading
//!   - Provider construction (AI gateway or OpenAI-compatible)
//!   - Template registry + standards catalog
//!   - Generation pipeline with retry policy
//!   - HTTP server
//!   - Graceful shutdown on SIGTERM / SIGINT

use std::path::PathBuf;
use std::sync::Arc;

use axum::Router;
use tokio::net::TcpListener;
use tokio::signal;
use tower_http::cors::{Any, CorsLayer};
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;

use pagesmith::AppState;
use pagesmith::api;
use pagesmith::config::{Config, ProviderKind};
use pagesmith::generation::{Generator, StandardsIndex, TemplateRegistry};
use pagesmith::providers::gateway::{GatewayConfig, GatewayProvider};
use pagesmith::providers::openai::{OpenAiConfig, OpenAiProvider};
use pagesmith::providers::{GenerationProvider, RetryPolicy};

// ---------------------------------------------------------------------------
// CLI argument parsing (minimal, no clap dependency)
// ---------------------------------------------------------------------------

struct CliArgs {
    config_path: PathBuf,
}

fn parse_args() -> CliArgs {
    let mut args = std::env::args().skip(1);
    let mut config_path = PathBuf::from("pagesmith.toml");

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--config" | "-c" => {
                if let Some(path) = args.next() {
                    config_path = PathBuf::from(path);
                } else {
                    eprintln!("Error: --config requires a path argument");
                    std::process::exit(1);
                }
            }
            "--help" | "-h" => {
                print_usage();
                std::process::exit(0);
            }
            "--version" | "-V" => {
                println!("pagesmith {}", env!("CARGO_PKG_VERSION"));
                std::process::exit(0);
            }
            other => {
                eprintln!("Unknown argument: {other}");
                eprintln!("Run with --help for usage information.");
                std::process::exit(1);
            }
        }
    }

    CliArgs { config_path }
}

fn print_usage() {
    println!(
        "\
pagesmith {version} -- Standards-aligned worksheet generation service

USAGE:
    pagesmith [OPTIONS]

OPTIONS:
    -c, --config <PATH>    Path to configuration file [default: pagesmith.toml]
    -h, --help             Print this help message
    -V, --version          Print version information

ENVIRONMENT:
    RUST_LOG               Override log level (e.g. RUST_LOG=debug)
    PAGESMITH_CONFIG       Alternative to --config flag
",
        version = env!("CARGO_PKG_VERSION")
    );
}

// ---------------------------------------------------------------------------
// Main
// ---------------------------------------------------------------------------

fn main() -> anyhow::Result<()> {
    tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .expect("Failed to build Tokio runtime")
        .block_on(async_main())
}

async fn async_main() -> anyhow::Result<()> {
    // 1. Parse CLI arguments
    let cli = parse_args();

    // Allow PAGESMITH_CONFIG env var as alternative to --config flag
    let config_path = std::env::var("PAGESMITH_CONFIG")
        .map(PathBuf::from)
        .unwrap_or(cli.config_path);

    // 2. Load configuration
    let config = Config::load(&config_path)?;

    // 3. Initialize tracing/logging
    init_tracing(&config);

    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        config = %config_path.display(),
        "Starting pagesmith"
    );

    for (setting, env_var) in config.env_overrides.all() {
        tracing::debug!(setting = %setting, env = %env_var, "Setting overridden from environment");
    }

    // 4. Resolve credentials. A missing key is a startup failure, not
    //    something to paper over at request time.
    let api_key = config.require_api_key()?.to_string();

    // 5. Construct the provider for the configured kind
    let provider = build_provider(&config, api_key);
    tracing::info!(
        provider = %provider.id(),
        model = %provider.model(),
        url = %config.gateway.url,
        "Provider initialized"
    );

    // 6. Load the template registry and standards catalog
    let templates = Arc::new(TemplateRegistry::with_defaults());
    let standards = Arc::new(StandardsIndex::new());
    tracing::info!(
        templates = templates.len(),
        states = standards.states().len(),
        "Catalog loaded"
    );

    // 7. Assemble the generation pipeline
    let retry = RetryPolicy::new().with_max_retries(config.gateway.max_retries);
    let generator = Arc::new(Generator::new(
        provider,
        templates.clone(),
        standards.clone(),
        retry,
    ));

    // 8. Build shared application state
    let state = AppState {
        config: Arc::new(config),
        templates,
        standards,
        generator,
    };

    // 9. Build the router
    let app = build_app(state.clone());

    // 10. Bind and serve
    let listen_addr = state.config.listen_addr();
    let listener = TcpListener::bind(&listen_addr).await?;
    tracing::info!(addr = %listen_addr, "Listening");

    println!();
    println!("  pagesmith v{} is running", env!("CARGO_PKG_VERSION"));
    println!("  Generate:  http://{listen_addr}/generate");
    println!("  Resource:  http://{listen_addr}/generate-resource");
    println!("  Health:    http://{listen_addr}/health");
    println!();

    // 11. Serve with graceful shutdown
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Shutting down gracefully");

    Ok(())
}

// ---------------------------------------------------------------------------
// Provider construction
// ---------------------------------------------------------------------------

/// Build the configured provider. Both kinds share the same connection
/// settings; only the wire contract differs.
fn build_provider(config: &Config, api_key: String) -> Arc<dyn GenerationProvider> {
    match config.gateway.kind {
        ProviderKind::Gateway => Arc::new(GatewayProvider::new(GatewayConfig {
            url: config.gateway.url.clone(),
            api_key,
            model: config.gateway.model.clone(),
            max_tokens: config.gateway.max_tokens,
            temperature: config.gateway.temperature,
        })),
        ProviderKind::Openai => Arc::new(OpenAiProvider::new(OpenAiConfig {
            url: config.gateway.url.clone(),
            api_key,
            model: config.gateway.model.clone(),
            max_tokens: config.gateway.max_tokens,
            temperature: config.gateway.temperature,
        })),
    }
}

// ---------------------------------------------------------------------------
// Router assembly
// ---------------------------------------------------------------------------

/// Build the application router with all middleware layers.
fn build_app(state: AppState) -> Router {
    let config = &state.config;

    // -- CORS layer -----------------------------------------------------------
    let cors = build_cors_layer(config);

    // -- Request ID layer (X-Request-ID) --------------------------------------
    let request_id = SetRequestIdLayer::x_request_id(MakeRequestUuid);
    let propagate_id = PropagateRequestIdLayer::x_request_id();

    // -- Tracing layer --------------------------------------------------------
    let trace = TraceLayer::new_for_http();

    api::build_api_router()
        // Global middleware stack (applied to all routes)
        .layer(propagate_id)
        .layer(request_id)
        .layer(trace)
        .layer(cors)
        .with_state(state)
}

/// Build the CORS layer from config. An empty origin list allows any origin.
fn build_cors_layer(config: &Config) -> CorsLayer {
    if config.server.cors_origins.is_empty() {
        CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any)
    } else {
        let origins: Vec<_> = config
            .server
            .cors_origins
            .iter()
            .filter_map(|o| o.parse().ok())
            .collect();

        CorsLayer::new()
            .allow_origin(origins)
            .allow_methods(Any)
            .allow_headers(Any)
    }
}

// ---------------------------------------------------------------------------
// Tracing initialization
// ---------------------------------------------------------------------------

/// Set up the tracing subscriber based on configuration.
fn init_tracing(config: &Config) {
    // RUST_LOG env var takes precedence over config file
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        let level = &config.logging.level;
        // Set the pagesmith crate to the configured level, dependencies to warn
        EnvFilter::new(format!("pagesmith={level},tower_http={level},warn"))
    });

    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false);

    if config.logging.json {
        subscriber.json().init();
    } else {
        subscriber.init();
    }
}

// ---------------------------------------------------------------------------
// Graceful shutdown
// ---------------------------------------------------------------------------

/// Wait for a shutdown signal (SIGTERM or SIGINT / Ctrl+C).
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            tracing::info!("Received SIGINT (Ctrl+C)");
        }
        () = terminate => {
            tracing::info!("Received SIGTERM");
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
