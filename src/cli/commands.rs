use clap::{Parser, Subcommand};
use colored::*;
use comfy_table::{presets::UTF8_FULL, ContentArrangement, Table};
use db_provider::config::ConnectionConfig;
use db_provider::db::{get_connection, ConnectionHandle};
use db_provider::error::Result;
use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;
use tracing::{info, warn};

/// Inspect and check the environment-configured MySQL connection
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Action to run; starts the interactive menu when omitted
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Commands {
    /// Show the resolved connection configuration (password redacted)
    Config {
        /// Print as JSON instead of a table
        #[arg(long)]
        json: bool,
    },

    /// Connect to the server and run a liveness probe
    Ping,

    /// Show the server's clock and the session time zone
    Clock,
}

/// CLI application
pub struct App {
    config: ConnectionConfig,
}

impl App {
    /// Loads `.env` and reads the connection configuration.
    ///
    /// Missing credentials are not an error here, so `config` can still show what was found.
    pub fn new() -> Result<Self> {
        if let Err(e) = dotenv::dotenv() {
            info!("No .env file loaded: {}", e);
        }

        let config = ConnectionConfig::from_env()?;
        Ok(Self { config })
    }

    pub async fn run_command(&self, command: Commands) -> Result<()> {
        match command {
            Commands::Config { json } => self.show_config(json),
            Commands::Ping => self.ping().await,
            Commands::Clock => self.clock().await,
        }
    }

    fn show_config(&self, json: bool) -> Result<()> {
        if json {
            println!("{}", render_config_json(&self.config)?);
        } else {
            println!("{}", render_config_table(&self.config));
        }

        match self.config.validate() {
            Ok(()) => println!("{}", "Configuration is complete.".green()),
            Err(e) => {
                warn!("Configuration check failed: {}", e);
                println!("{} {}", "Configuration problem:".yellow(), e);
            },
        }
        Ok(())
    }

    async fn ping(&self) -> Result<()> {
        let handle = get_connection()?;

        let spinner = spinner(format!(
            "Connecting to {}:{}...",
            handle.config().host,
            handle.config().port
        ))?;
        let result = handle.ping().await;
        spinner.finish_and_clear();

        let elapsed = result?;
        println!(
            "{} {} responded in {:.1} ms",
            "OK".green().bold(),
            describe(handle),
            elapsed.as_secs_f64() * 1000.0
        );
        Ok(())
    }

    async fn clock(&self) -> Result<()> {
        let handle = get_connection()?;

        let spinner = spinner("Reading server clock...".to_string())?;
        let result = handle.server_clock().await;
        spinner.finish_and_clear();

        let clock = result?;
        println!("Server time:       {}", clock.server_now);
        println!("Session time zone: {}", clock.session_time_zone);

        let expected = handle.config().timezone_mode.session_offset();
        if clock.session_time_zone != expected {
            println!(
                "{} expected session time zone {}",
                "Warning:".yellow(),
                expected
            );
        }
        Ok(())
    }
}

/// Renders the configuration as a two-column table.
pub fn render_config_table(config: &ConnectionConfig) -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec!["Setting", "Value"]);

    let rows: [(&str, String); 11] = [
        ("database", config.database_name.clone()),
        ("username", config.username.clone()),
        ("password", config.redacted_password().to_string()),
        ("host", config.host.clone()),
        ("port", config.port.to_string()),
        ("dialect", config.dialect.to_string()),
        ("timezone mode", config.timezone_mode.to_string()),
        ("max connections", config.pool.max_connections.to_string()),
        ("min connections", config.pool.min_connections.to_string()),
        (
            "acquire timeout",
            format!("{}s", config.pool.acquire_timeout_secs),
        ),
        ("idle timeout", format!("{}s", config.pool.idle_timeout_secs)),
    ];
    for (name, value) in rows {
        table.add_row(vec![name.to_string(), value]);
    }
    table
}

/// Renders the configuration as pretty-printed JSON.
pub fn render_config_json(config: &ConnectionConfig) -> Result<String> {
    Ok(serde_json::to_string_pretty(config)?)
}

fn describe(handle: &ConnectionHandle) -> String {
    let config = handle.config();
    format!(
        "{}@{}:{}/{}",
        config.username, config.host, config.port, config.database_name
    )
}

fn spinner(message: String) -> Result<ProgressBar> {
    let spinner = ProgressBar::new_spinner();
    spinner.set_style(ProgressStyle::with_template("{spinner:.cyan} {msg}")?);
    spinner.set_message(message);
    spinner.enable_steady_tick(Duration::from_millis(100));
    Ok(spinner)
}
