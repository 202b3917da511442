mod cli;

use clap::Parser;
use cli::{App, Cli, Commands};
use colored::*;
use db_provider::error::Result;
use dialoguer::{theme::ColorfulTheme, Select};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    init_logging();

    let cli = Cli::parse();

    let app = match App::new() {
        Ok(app) => app,
        Err(e) => {
            error!("Failed to load configuration: {:?}", e);
            println!("{} {}", "Error:".red(), e);
            return Err(e);
        },
    };

    // Non-interactive: run the single requested command
    if let Some(command) = cli.command {
        return app.run_command(command).await;
    }

    println!("{}", "Database connection provider".cyan().bold());

    loop {
        let options = &[
            "Show Configuration",
            "Check Connection",
            "Show Server Clock",
            "Exit",
        ];

        let selection = Select::with_theme(&ColorfulTheme::default())
            .with_prompt("What would you like to do?")
            .items(options)
            .default(0)
            .interact_opt()? // None on Esc/Ctrl+C
            .unwrap_or(options.len() - 1);

        println!("\n---\n");

        let command = match selection {
            0 => Commands::Config { json: false },
            1 => Commands::Ping,
            2 => Commands::Clock,
            _ => {
                println!("{}", "Goodbye!".green());
                break;
            },
        };

        if let Err(e) = app.run_command(command).await {
            error!("Command execution failed: {:?}", e);
            println!(
                "{} {}",
                "Error executing command:".red(),
                e.to_string().red()
            );
        }

        println!("\n---\n");
    }

    info!("Exiting");
    Ok(())
}

/// Installs the global subscriber; `RUST_LOG` filters, `LOG_FORMAT=json` switches to JSON lines.
fn init_logging() {
    let builder = tracing_subscriber::fmt().with_env_filter(EnvFilter::from_default_env());

    if std::env::var("LOG_FORMAT").is_ok_and(|format| format.eq_ignore_ascii_case("json")) {
        builder.json().init();
    } else {
        builder.init();
    }
}
