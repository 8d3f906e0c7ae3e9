use relay_server::api::events::IntakeState;
use relay_server::{Cli, ServerError, build_router, logger, spawn_dispatcher};

use relay_config::Config;
use relay_directory::DirectoryClient;
use relay_ws::{
    EndpointConfig, EndpointRegistry, Metrics, ShutdownCoordinator, spawn_endpoint,
};

use clap::{CommandFactory, Parser};
use log::{error, info};
use tokio::net::TcpListener;

/// Exit code for fatal startup errors and interrupt
const EXIT_FATAL: i32 = 2;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    // Load configuration (TOML + env), then apply CLI overrides
    let mut config = match Config::load() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("relay-server: {e}");
            std::process::exit(EXIT_FATAL);
        }
    };
    cli.apply(&mut config);

    // The directory host is the one setting without a default; missing it
    // is a usage error, not a runtime failure
    if config.directory.host.is_none() {
        Cli::command()
            .error(
                clap::error::ErrorKind::MissingRequiredArgument,
                "a directory host is required: pass --directory-host, set RELAY_DIRECTORY_HOST, \
                 or set directory.host in config.toml",
            )
            .exit();
    }

    if let Err(e) = config.validate() {
        eprintln!("relay-server: {e}");
        std::process::exit(EXIT_FATAL);
    }

    // Construct log file path if configured
    let log_file_path = config.logging.file.as_ref().and_then(|filename| {
        let log_dir = match Config::config_dir() {
            Ok(dir) => dir.join(&config.logging.dir),
            Err(e) => {
                eprintln!("relay-server: {e}");
                std::process::exit(EXIT_FATAL);
            }
        };

        if let Err(e) = std::fs::create_dir_all(&log_dir) {
            eprintln!("relay-server: failed to create log directory: {e}");
            std::process::exit(EXIT_FATAL);
        }

        Some(log_dir.join(filename))
    });

    if let Err(e) = logger::initialize(config.logging.level, log_file_path, config.logging.colored)
    {
        eprintln!("relay-server: {e}");
        std::process::exit(EXIT_FATAL);
    }

    info!("Starting relay-server v{}", env!("CARGO_PKG_VERSION"));
    config.log_summary();

    if let Err(e) = run(config).await {
        error!("Fatal startup error: {e}");
        std::process::exit(EXIT_FATAL);
    }
}

/// Ordered startup: fetch tenants, provision one endpoint per tenant,
/// then open the intake listener. Each step gates the next.
async fn run(config: Config) -> Result<(), ServerError> {
    // Step 1: fetch the tenant set; the set is closed from here on
    let directory = DirectoryClient::new(&config.directory.base_url());
    let tenants = directory.fetch_tenants().await?;

    let metrics = Metrics::new();
    let endpoint_config = EndpointConfig {
        send_buffer_size: config.websocket.send_buffer_size,
        ping_interval_ms: config.websocket.ping_interval_ms,
        ping_timeout_ms: config.websocket.ping_timeout_ms,
    };
    let registry = EndpointRegistry::new(endpoint_config, metrics.clone());
    let shutdown = ShutdownCoordinator::new();

    // Step 2: provision endpoints sequentially, in directory order
    let mut endpoints = Vec::with_capacity(tenants.len());
    for tenant in tenants {
        let handle = spawn_endpoint(
            tenant,
            registry.clone(),
            metrics.clone(),
            shutdown.clone(),
            &config.intake.host,
        )
        .await?;
        endpoints.push(handle);
    }
    info!("{} tenant endpoint(s) provisioned", endpoints.len());

    // Interrupt handler: notify subsystems, then exit without draining
    let shutdown_for_signal = shutdown.clone();
    tokio::spawn(async move {
        match tokio::signal::ctrl_c().await {
            Ok(()) => {
                info!("Caught interrupt signal");
                shutdown_for_signal.shutdown();
                info!("Exiting");
                std::process::exit(EXIT_FATAL);
            }
            Err(e) => {
                error!("Failed to listen for SIGINT: {e}");
            }
        }
    });

    // Step 3: open the event intake listener; one dispatcher task keeps
    // same-tenant broadcasts in intake order
    let dispatcher = spawn_dispatcher(registry.clone(), metrics.clone());
    let state = IntakeState {
        registry: registry.clone(),
        metrics,
        dispatcher,
    };
    let app = build_router(state);

    let listener = TcpListener::bind(&config.intake.bind_addr()).await?;
    let actual_addr = listener.local_addr()?;
    info!("Event intake listening on http://{actual_addr}/event/{{eventname}}");

    axum::serve(listener, app).await?;

    Ok(())
}
