use relay_config::{Config, LogLevel};

use clap::Parser;
use log::LevelFilter;

#[derive(Parser, Debug)]
#[command(name = "relay-server")]
#[command(about = "Multi-tenant demozone event relay")]
#[command(version)]
pub struct Cli {
    /// Tenant directory host (host[:port]), queried once at startup
    #[arg(long, env = "RELAY_DIRECTORY_HOST")]
    pub directory_host: Option<String>,

    /// Heartbeat ping interval in milliseconds
    #[arg(long, env = "RELAY_WS_PING_INTERVAL_MS")]
    pub ping_interval_ms: Option<u64>,

    /// Heartbeat timeout in milliseconds
    #[arg(long, env = "RELAY_WS_PING_TIMEOUT_MS")]
    pub ping_timeout_ms: Option<u64>,

    /// Event intake port
    #[arg(long, env = "RELAY_INTAKE_PORT")]
    pub intake_port: Option<u16>,

    /// Raise the log level to debug
    #[arg(long, short)]
    pub verbose: bool,
}

impl Cli {
    /// Fold command-line flags into the loaded configuration; flags win
    /// over both the config file and the environment.
    pub fn apply(&self, config: &mut Config) {
        if let Some(ref host) = self.directory_host {
            config.directory.host = Some(host.clone());
        }

        if let Some(interval) = self.ping_interval_ms {
            config.websocket.ping_interval_ms = interval;
        }

        if let Some(timeout) = self.ping_timeout_ms {
            config.websocket.ping_timeout_ms = timeout;
        }

        if let Some(port) = self.intake_port {
            config.intake.port = port;
        }

        if self.verbose {
            config.logging.level = LogLevel(LevelFilter::Debug);
        }
    }
}
