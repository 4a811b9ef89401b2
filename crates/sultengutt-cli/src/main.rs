//! `sultengutt`: a recurring reminder to order dinner.

mod commands;
mod config;
mod logging;
mod mantras;

use std::io;
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::Colorize;
use sultengutt_core::SystemClock;

use crate::commands::{App, InstallRequest};
use crate::config::ConfigManager;

#[derive(Parser)]
#[command(
    name = "sultengutt",
    version,
    about = "Never miss a surprise dinner again.",
    long_about = "Be reminded to order your surprise dinner on your schedule! Never be hungry again 🍔",
    after_help = "Examples:\n  sultengutt install --days Monday,Wednesday --hour 14:30\n  sultengutt execute\n  sultengutt pause 1 day\n  sultengutt resume\n  sultengutt status"
)]
struct Cli {
    /// Directory holding sultengutt.json [default: ~/.sultengutt]
    #[arg(long, global = true, env = "SULTENGUTT_HOME")]
    config_dir: Option<PathBuf>,

    /// Log debug output to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Set up or change the reminder schedule
    Install {
        /// Weekdays to be reminded on, comma separated (e.g. Monday,Friday)
        #[arg(long, value_delimiter = ',', required = true)]
        days: Vec<String>,

        /// Time of day in 24-hour HH:MM
        #[arg(long)]
        hour: String,

        /// Link to the ordering site, shown with the reminder
        #[arg(long)]
        site_link: Option<String>,

        /// IANA timezone for the hour (default: system local time)
        #[arg(long)]
        timezone: Option<String>,
    },

    /// Trigger the reminder (run by the scheduler)
    Execute,

    /// Pause reminders for a while, or indefinitely without arguments
    #[command(
        long_about = "Pause Sultengutt for a period of time or until you resume.\n\nAllowed units: minute(s), hour(s), day(s), week(s), month(s); no arguments pauses indefinitely.",
        after_help = "Examples:\n  sultengutt pause 1 day\n  sultengutt pause 4 weeks\n  sultengutt pause 1 month\n  sultengutt pause"
    )]
    Pause {
        /// Duration such as `1 day` or `2 weeks`
        #[arg(allow_negative_numbers = true)]
        duration: Vec<String>,
    },

    /// Resume paused reminders
    Resume,

    /// Show the schedule and pause state
    Status,

    /// Remove the configuration
    Uninstall {
        /// Skip the safety stop and remove everything
        #[arg(long)]
        confirm: bool,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    logging::init(cli.verbose);

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("{}", format!("✗ {err:#}").red().bold());
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<()> {
    let manager = match cli.config_dir {
        Some(dir) => ConfigManager::new(dir),
        None => ConfigManager::from_home()?,
    };
    let config = manager.load().context("failed to load configuration")?;
    tracing::debug!(path = %manager.config_path().display(), "using config");

    let clock = SystemClock;
    let mut app = App::new(manager, config, &clock, io::stdout().lock());

    match cli.command {
        Command::Install {
            days,
            hour,
            site_link,
            timezone,
        } => app.install(InstallRequest {
            days,
            hour,
            site_link,
            timezone,
        }),
        Command::Execute => app.execute(),
        Command::Pause { duration } => app.pause(&duration),
        Command::Resume => app.resume(),
        Command::Status => app.status(),
        Command::Uninstall { confirm } => app.uninstall(confirm),
    }
}
