//! Project self-service portal CLI.
//!
//! # Architecture Overview
//!
//! ```text
//!   create / health / config
//!        │
//!        ▼
//!   ┌──────────┐   review    ┌────────────┐
//!   │   form   │────────────▶│  security  │  sanitize + validate
//!   │controller│             └────────────┘
//!   └────┬─────┘
//!        │ submit
//!        ▼
//!   ┌──────────┐   sign      ┌────────────┐   credentials   ┌───────────────┐
//!   │   http   │────────────▶│  signing   │────────────────▶│ identity pool │
//!   │  client  │             │   SigV4    │                 └───────────────┘
//!   └────┬─────┘             └────────────┘
//!        │ https, 30s deadline
//!        ▼
//!     project API
//! ```

use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};

use project_portal::config::{load_config, load_from_env, PortalConfig};
use project_portal::form::{FormController, GroupInput, SubmissionStatus};
use project_portal::http::ApiClient;
use project_portal::observability::init_logging;
use project_portal::project::Role;

#[derive(Parser)]
#[command(name = "project-portal")]
#[command(about = "Create projects and assign user roles through the project API", long_about = None)]
struct Cli {
    /// TOML configuration file (defaults plus PORTAL_* environment otherwise)
    #[arg(short, long)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Review and submit a new project
    Create {
        /// Project name (lowercase letters, numbers and hyphens, 3-63 characters)
        #[arg(short, long)]
        name: String,

        /// Optional description
        #[arg(short, long, default_value = "")]
        description: String,

        /// User group as "ids=role", e.g. "alice@example.com,bob=editor"
        #[arg(short, long = "group", value_parser = parse_group, required = true)]
        groups: Vec<GroupInput>,

        /// Submit without asking for confirmation
        #[arg(short, long)]
        yes: bool,
    },
    /// Query the API health endpoint
    Health,
    /// Print the effective configuration
    Config,
}

/// Parse `ids=role`; without `=` the whole value is the id list and the
/// role defaults to owner.
fn parse_group(value: &str) -> Result<GroupInput, String> {
    match value.rsplit_once('=') {
        Some((ids, role)) => {
            let role: Role = role.parse().map_err(|e| format!("{}", e))?;
            Ok(GroupInput::new(ids, Some(role)))
        }
        None => Ok(GroupInput::new(value, Some(Role::default()))),
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => load_config(path),
        None => load_from_env(),
    };
    let config = match config {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: {}", e);
            return ExitCode::FAILURE;
        }
    };

    if let Err(e) = init_logging(&config.observability, config.features.debug_mode) {
        eprintln!("Warning: logging not initialized: {}", e);
    }

    if config.features.debug_mode {
        eprintln!(
            "Version: {} | Environment: {}",
            config.app.version, config.app.environment
        );
        eprintln!("API Endpoint: {}", config.api.endpoint);
        eprintln!("Analytics: {}", if config.features.analytics { "on" } else { "off" });
    }

    match run(cli.command, config).await {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}

async fn run(command: Commands, config: PortalConfig) -> Result<ExitCode, Box<dyn std::error::Error>> {
    match command {
        Commands::Config => {
            let mut shown = config.clone();
            if shown.api.csrf_token.is_some() {
                shown.api.csrf_token = Some("<redacted>".to_string());
            }
            println!("{}", toml::to_string_pretty(&shown)?);
            Ok(ExitCode::SUCCESS)
        }
        Commands::Health => {
            let client = ApiClient::from_config(&config)?;
            match client.health(&config.health_endpoint()).await {
                Ok(health) => {
                    println!("{}", serde_json::to_string_pretty(&health)?);
                    Ok(ExitCode::SUCCESS)
                }
                Err(e) => {
                    eprintln!("{}", e.user_message());
                    Ok(ExitCode::FAILURE)
                }
            }
        }
        Commands::Create {
            name,
            description,
            groups,
            yes,
        } => {
            let client = ApiClient::from_config(&config)?;
            let mut form = FormController::new(client, &config);
            form.set_project_name(name);
            form.set_description(description);

            for (index, group) in groups.into_iter().enumerate() {
                if index > 0 && !form.add_group() {
                    eprintln!(
                        "Maximum {} users allowed per project.",
                        form.max_users()
                    );
                    return Ok(ExitCode::FAILURE);
                }
                form.set_user_ids(index, group.user_ids);
                form.set_role(index, group.role);
            }

            let summary = match form.review() {
                Ok(summary) => summary,
                Err(e) => {
                    eprintln!("{}", e);
                    return Ok(ExitCode::FAILURE);
                }
            };

            println!("Confirm Project Details");
            print!("{}", summary);
            println!("Total users: {} / {}", form.total_users(), form.max_users());
            println!("Help: {}", config.app.help_url);

            if !yes && !confirm("Create project? [y/N] ")? {
                form.cancel_review();
                println!("Cancelled.");
                return Ok(ExitCode::SUCCESS);
            }

            println!("Creating Project...");
            let status = form.submit().await?;
            let message = form.state().message().unwrap_or_default();
            match status {
                SubmissionStatus::Success => {
                    println!("{}", message);
                    Ok(ExitCode::SUCCESS)
                }
                _ => {
                    eprintln!("{}", message);
                    Ok(ExitCode::FAILURE)
                }
            }
        }
    }
}

fn confirm(prompt: &str) -> io::Result<bool> {
    print!("{}", prompt);
    io::stdout().flush()?;
    let mut line = String::new();
    io::stdin().lock().read_line(&mut line)?;
    Ok(matches!(line.trim().to_ascii_lowercase().as_str(), "y" | "yes"))
}
