pub mod ask;
pub mod config;

use clap::{Parser, Subcommand};

/// LeaseAbstract — chat with an AI paralegal about your uploaded leases.
#[derive(Debug, Parser)]
#[command(name = "lease-abstract", version, about)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Start the HTTP server (default when no subcommand is given).
    Serve,
    /// Configuration utilities.
    #[command(subcommand)]
    Config(ConfigCommand),
    /// Run one chat turn for a user and print the assistant's reply.
    Ask {
        /// The message to send.
        message: String,
        /// User id the turn runs as.
        #[arg(long)]
        user: String,
        /// Continue an existing thread instead of the user's default one.
        #[arg(long)]
        thread: Option<String>,
        /// Output the thread id and relayed messages as JSON.
        #[arg(long)]
        json: bool,
    },
    /// Print version information.
    Version,
}

#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Parse the config file and report any errors.
    Validate,
    /// Dump the resolved configuration (with defaults) as TOML.
    Show,
}

// ── Config loading helper ─────────────────────────────────────────────

/// Load the configuration from the path specified by `LA_CONFIG` (or
/// `config.toml` by default). A missing file yields the defaults.
///
/// Returns the parsed [`Config`](la_domain::config::Config) and the path
/// that was used.
pub fn load_config() -> anyhow::Result<(la_domain::config::Config, String)> {
    let config_path = std::env::var("LA_CONFIG").unwrap_or_else(|_| "config.toml".into());

    let config = if std::path::Path::new(&config_path).exists() {
        let raw = std::fs::read_to_string(&config_path)
            .map_err(|e| anyhow::anyhow!("reading {config_path}: {e}"))?;
        toml::from_str(&raw).map_err(|e| anyhow::anyhow!("parsing {config_path}: {e}"))?
    } else {
        la_domain::config::Config::default()
    };

    Ok((config, config_path))
}
