use std::fs::OpenOptions;
use std::sync::Mutex;

use anyhow::{Context, Result};
use chrono::Local;
use clap::{Parser, Subcommand};
use haq::calendar::{DayStatus, compute_day_statuses};
use haq::config::BackendKind;
use haq::config::profile::UserProfile;
use haq::config::progress::{ProgressSets, load_signup_date};
use haq::config::storage::LocalStore;
use haq::stats::compute_progress;
use haq::{App, Config};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "haq")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Use the built-in question bank instead of the remote backend
    #[arg(long)]
    offline: bool,

    /// Override the workflow backend URL
    #[arg(long, value_name = "URL")]
    backend_url: Option<String>,

    /// Override the auth service URL
    #[arg(long, value_name = "URL")]
    auth_url: Option<String>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Print your progress without starting the TUI
    Status,
    /// Clear the saved session, profile and progress
    Reset,
    /// Show the configuration file and its contents
    Config,
}

/// Log to a file so tracing output never lands on the TUI
fn init_logging() -> Result<()> {
    let path = Config::log_path()?;
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create data directory {:?}", parent))?;
    }
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&path)
        .with_context(|| format!("Failed to open log file {:?}", path))?;

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_env("HAQ_LOG").unwrap_or_else(|_| "haq=info".into()))
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_ansi(false)
                .with_writer(Mutex::new(file)),
        )
        .init();

    Ok(())
}

fn print_status(store: &LocalStore, config: &Config) {
    let Some(profile) = UserProfile::load(store) else {
        println!("Not signed in. Run `haq` to log in.");
        return;
    };
    let progress = ProgressSets::load(store);
    let today = Local::now().date_naive();
    let start = load_signup_date(store).unwrap_or(today);
    let elapsed = (today - start).num_days().max(0) as u32 + 1;
    let summary = compute_progress(&progress, config.progress_strategy, Some(elapsed));

    println!("{} ({}, batch {})", profile.name, profile.track.display_name(), profile.batch_code);
    println!(
        "Completed {}/{} days ({:.1}%), streak {}",
        summary.completed_count, summary.total_days, summary.percent_complete, summary.streak
    );
    println!(
        "Attempted {}, missed {}, success rate {:.1}%",
        summary.attempted_count, summary.missed_count, summary.success_rate
    );

    let days = compute_day_statuses(start, &progress.attempted_set(), today);
    if let Some(today_record) = days.iter().find(|d| d.status == DayStatus::Today) {
        println!("Today ({}) is open.", today_record.date.format("%b %-d"));
    }

    let unlocked: Vec<String> = summary
        .achievements
        .iter()
        .filter(|a| a.unlocked)
        .map(|a| format!("{} {}", a.icon, a.name))
        .collect();
    if !unlocked.is_empty() {
        println!("Achievements: {}", unlocked.join(", "));
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging()?;

    let mut config = Config::load()?.with_overrides(cli.backend_url, cli.auth_url);
    if cli.offline {
        config.backend = BackendKind::Offline;
    }

    match cli.command {
        Some(Commands::Status) => {
            let store = LocalStore::open_default()?;
            print_status(&store, &config);
        }
        Some(Commands::Reset) => {
            let mut store = LocalStore::open_default()?;
            store.clear()?;
            tracing::info!("local data cleared");
            println!("Cleared {}", store.path().display());
        }
        Some(Commands::Config) => {
            println!("{}", Config::config_path()?.display());
            println!("{}", serde_json::to_string_pretty(&config)?);
        }
        None => {
            tracing::info!(backend = ?config.backend, "starting");
            let mut app = App::new(config)?;
            app.run().await?;
        }
    }

    Ok(())
}
