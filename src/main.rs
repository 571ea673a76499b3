mod commands;
mod render;
mod utils;
mod view;

use anyhow::Result;
use bookcal_core::edit::EditField;
use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::commands::CalendarArgs;

#[derive(Parser)]
#[command(name = "bookcal")]
#[command(about = "Browse and edit appointments on the booking backend calendar")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List the providers and services the calendar can be filtered by
    Filters,
    /// Show the appointments in the visible range
    Events {
        #[command(flatten)]
        calendar: CalendarArgs,
    },
    /// Show the details of one appointment
    Show {
        /// Appointment id
        id: String,

        #[command(flatten)]
        calendar: CalendarArgs,
    },
    /// Edit an appointment's service, provider or customer details
    Edit {
        /// Appointment id
        id: String,

        /// Field to change, e.g. --set email=jane@example.com (repeatable)
        #[arg(long = "set", value_parser = parse_assignment)]
        changes: Vec<(EditField, String)>,

        /// Print the update instead of saving it
        #[arg(long)]
        dry_run: bool,

        #[command(flatten)]
        calendar: CalendarArgs,
    },
    /// Show the configuration file and current settings
    Config,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "bookcal=warn,bookcal_core=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Filters => commands::filters::run(),
        Commands::Events { calendar } => commands::events::run(calendar).await,
        Commands::Show { id, calendar } => commands::show::run(id, calendar).await,
        Commands::Edit {
            id,
            changes,
            dry_run,
            calendar,
        } => commands::edit::run(id, changes, dry_run, calendar).await,
        Commands::Config => commands::config::run(),
    }
}

/// Parse `field=value`.
fn parse_assignment(s: &str) -> Result<(EditField, String), String> {
    let (field, value) = s
        .split_once('=')
        .ok_or_else(|| format!("Expected field=value, got '{}'", s))?;
    let field = field.trim().parse::<EditField>().map_err(|e| e.to_string())?;
    Ok((field, value.to_string()))
}
