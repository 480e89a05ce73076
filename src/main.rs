use chrono::{DateTime, Utc};
use clap::Parser;
use colored::*;
use eyre::{Context, Result};
use log::info;
use std::fs;
use std::path::{Path, PathBuf};

use trakr::cli::{Cli, Commands};
use trakr::config::Config;
use trakr::forecast::{Assessment, SortKey, TrackerEntry, Urgency, assess, sort_entries};
use trakr::format::{format_datetime, format_duration, format_duration_signed, format_relative};
use trakr::parse::parse_completion;
use trakr::store::TrackerStore;
use trakr::tui::{self, TuiRunner};

fn setup_logging() -> Result<()> {
    // Create log directory
    let log_dir = dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("trakr")
        .join("logs");

    fs::create_dir_all(&log_dir).context("Failed to create log directory")?;

    let log_file = log_dir.join("trakr.log");

    // Setup env_logger with file output
    let target = Box::new(
        fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&log_file)
            .context("Failed to open log file")?,
    );

    env_logger::Builder::from_default_env()
        .target(env_logger::Target::Pipe(target))
        .init();

    info!("Logging initialized, writing to: {}", log_file.display());
    Ok(())
}

fn run_application(cli: &Cli, config: &Config) -> Result<()> {
    info!("Starting application");

    if cli.is_verbose() {
        println!(
            "{}",
            format!("data dir: {}", config.storage.data_dir.display()).dimmed()
        );
    }

    match &cli.command {
        None => {
            // Default: launch TUI mode
            run_tui(config)
        }
        Some(command) => run_command(command, config),
    }
}

fn run_tui(config: &Config) -> Result<()> {
    info!("Launching TUI mode");

    let store = TrackerStore::open(&config.storage).context("Failed to open tracker store")?;
    let terminal = tui::init_terminal().context("Failed to initialize terminal")?;
    let mut runner = TuiRunner::new(terminal, store, config);

    let runtime = tokio::runtime::Runtime::new().context("Failed to start tokio runtime")?;
    let result = runtime.block_on(runner.run());

    tui::restore_terminal().context("Failed to restore terminal")?;
    result
}

fn run_command(command: &Commands, config: &Config) -> Result<()> {
    let mut store =
        TrackerStore::open(&config.storage).context("Failed to open tracker store")?;

    match command {
        Commands::Add { name, sigma } => handle_add(&mut store, name, *sigma, config),
        Commands::Done {
            tracker,
            completion,
        } => handle_done(&mut store, tracker, completion.as_deref(), config),
        Commands::List { sort, reverse } => handle_list(&store, sort, *reverse),
        Commands::Show { tracker } => handle_show(&store, tracker),
        Commands::Rename { tracker, name } => handle_rename(&mut store, tracker, name),
        Commands::Sigma { tracker, value } => handle_sigma(&mut store, tracker, *value),
        Commands::Amend {
            tracker,
            index,
            completion,
        } => handle_amend(&mut store, tracker, *index, completion, config),
        Commands::Forget { tracker, index } => handle_forget(&mut store, tracker, *index),
        Commands::Delete { tracker } => handle_delete(&mut store, tracker),
        Commands::Export { path } => handle_export(&store, path),
        Commands::Import { path } => handle_import(&mut store, path),
    }
}

fn handle_add(
    store: &mut TrackerStore,
    name: &str,
    sigma: Option<f64>,
    config: &Config,
) -> Result<()> {
    let sigma = sigma.unwrap_or(config.forecast.default_sigma);
    if !sigma.is_finite() || sigma < 0.0 {
        eyre::bail!("sigma must be >= 0, got {sigma}");
    }

    let tracker = store.create_tracker(name, sigma)?;
    info!("Created tracker {} '{}'", tracker.id, tracker.name);
    println!("{} {} (id {})", "Added:".green(), tracker.name, tracker.id);
    Ok(())
}

fn handle_done(
    store: &mut TrackerStore,
    selector: &str,
    completion: Option<&str>,
    config: &Config,
) -> Result<()> {
    let tracker = store.find(selector)?;
    let record = parse_completion(completion.unwrap_or("now"), &config.time, Utc::now())?;
    let tracker = store.record_completion(tracker.id, record)?;
    info!("Recorded completion for tracker {}", tracker.id);

    let mut line = format!(
        "{} {} at {}",
        "Recorded:".green(),
        tracker.name,
        format_datetime(record.completed_at)
    );
    if !record.adjustment.is_zero() {
        line.push_str(&format!(" ({})", format_duration_signed(record.adjustment)));
    }
    println!("{line}");

    let now = Utc::now();
    if let Some(forecast) = assess(&tracker, now).forecast {
        println!("  next due {}", format_relative(forecast.due_at, now));
    }
    Ok(())
}

fn handle_list(store: &TrackerStore, sort: &str, reverse: bool) -> Result<()> {
    let Some(key) = SortKey::parse(sort) else {
        eyre::bail!("unknown sort key '{sort}' (expected due, last, name, or id)");
    };

    let now = Utc::now();
    let mut entries: Vec<TrackerEntry> = store
        .list_all()?
        .into_iter()
        .map(|tracker| TrackerEntry::assess(tracker, now))
        .collect();

    if entries.is_empty() {
        println!("{}", "no trackers yet".dimmed());
        return Ok(());
    }
    sort_entries(&mut entries, key, reverse);

    println!(
        "{}",
        format!(
            "   {:<24} {:<14} {:<16} {:<18} {}",
            "NAME", "LAST", "DUE", "EVERY", "TREND"
        )
        .dimmed()
    );
    for (i, entry) in entries.iter().enumerate() {
        let tag = if i < 26 { (b'a' + i as u8) as char } else { ' ' };
        let line = format!("{tag}  {}", entry_row(entry, now));
        println!("{}", paint(&entry.assessment, line));
    }
    Ok(())
}

/// One list line: name, last completion, due, average ± spread, trend.
fn entry_row(entry: &TrackerEntry, now: DateTime<Utc>) -> String {
    let last = match entry.tracker.last_completed() {
        Some(at) => format_datetime(at),
        None => "never".to_string(),
    };
    let due = match entry.assessment.forecast {
        Some(forecast) => format_relative(forecast.due_at, now),
        None => "n/a".to_string(),
    };
    let (every, trend) = match entry.assessment.stats {
        Some(stats) => (
            format!(
                "{} ±{}",
                format_duration(stats.average),
                format_duration(stats.spread)
            ),
            stats.trend.arrow(),
        ),
        None => ("n/a".to_string(), " "),
    };

    format!("{:<24} {last:<14} {due:<16} {every:<18} {trend}", entry.tracker.name)
}

fn handle_show(store: &TrackerStore, selector: &str) -> Result<()> {
    let tracker = store.find(selector)?;
    let now = Utc::now();
    let assessment = assess(&tracker, now);

    println!("{} (id {})", tracker.name.bold(), tracker.id);
    println!("  sigma:    {}", tracker.sigma);
    println!("  created:  {}", format_datetime(tracker.created_at));
    println!("  modified: {}", format_datetime(tracker.modified_at));

    match (assessment.stats, assessment.forecast, assessment.urgency) {
        (Some(stats), Some(forecast), Some(urgency)) => {
            println!(
                "  every:    {} ±{} ({} {})",
                format_duration(stats.average),
                format_duration(stats.spread),
                stats.trend.arrow(),
                stats.trend.as_str(),
            );
            println!(
                "  due:      {} ({})",
                format_datetime(forecast.due_at),
                format_relative(forecast.due_at, now),
            );
            println!(
                "  window:   {} .. {}",
                format_datetime(forecast.early),
                format_datetime(forecast.late),
            );
            println!("  status:   {}", paint_urgency(urgency));
        }
        _ => println!(
            "  {}",
            "no forecast yet (needs two completions)".dimmed()
        ),
    }

    if tracker.history.is_empty() {
        println!("  history:  none");
    } else {
        println!("  history:");
        for (i, record) in tracker.history.iter().enumerate() {
            let mut line = format!("    {:>3}. {}", i + 1, format_datetime(record.completed_at));
            if !record.adjustment.is_zero() {
                line.push_str(&format!("  {}", format_duration_signed(record.adjustment)));
            }
            println!("{line}");
        }
    }
    Ok(())
}

fn handle_rename(store: &mut TrackerStore, selector: &str, name: &str) -> Result<()> {
    let tracker = store.find(selector)?;
    let old_name = tracker.name.clone();
    let tracker = store.rename(tracker.id, name)?;
    info!("Renamed tracker {} to '{}'", tracker.id, tracker.name);
    println!("{} '{}' to '{}'", "Renamed:".green(), old_name, tracker.name);
    Ok(())
}

fn handle_sigma(store: &mut TrackerStore, selector: &str, value: f64) -> Result<()> {
    if !value.is_finite() || value < 0.0 {
        eyre::bail!("sigma must be >= 0, got {value}");
    }

    let tracker = store.find(selector)?;
    let tracker = store.set_sigma(tracker.id, value)?;
    println!("{} {} for {}", "Sigma:".green(), value, tracker.name);
    Ok(())
}

fn handle_amend(
    store: &mut TrackerStore,
    selector: &str,
    index: usize,
    completion: &str,
    config: &Config,
) -> Result<()> {
    let tracker = store.find(selector)?;
    let record = parse_completion(completion, &config.time, Utc::now())?;
    let tracker = store.amend_completion(tracker.id, index, record)?;
    println!(
        "{} entry {} of {} to {}",
        "Amended:".green(),
        index,
        tracker.name,
        format_datetime(record.completed_at)
    );
    Ok(())
}

fn handle_forget(store: &mut TrackerStore, selector: &str, index: usize) -> Result<()> {
    let tracker = store.find(selector)?;
    let tracker = store.forget_completion(tracker.id, index)?;
    println!("{} entry {} of {}", "Forgot:".green(), index, tracker.name);
    Ok(())
}

fn handle_delete(store: &mut TrackerStore, selector: &str) -> Result<()> {
    let tracker = store.find(selector)?;
    store.delete_tracker(tracker.id)?;
    info!("Deleted tracker {} '{}'", tracker.id, tracker.name);
    println!("{} {} (id {})", "Deleted:".red(), tracker.name, tracker.id);
    Ok(())
}

fn handle_export(store: &TrackerStore, path: &Path) -> Result<()> {
    let count = store.export(path)?;
    println!(
        "{} {} trackers to {}",
        "Exported:".green(),
        count,
        path.display()
    );
    Ok(())
}

fn handle_import(store: &mut TrackerStore, path: &Path) -> Result<()> {
    let count = store.import(path)?;
    println!(
        "{} {} trackers from {}",
        "Imported:".green(),
        count,
        path.display()
    );
    Ok(())
}

/// Paint a whole list line with its urgency color.
fn paint(assessment: &Assessment, text: String) -> ColoredString {
    match assessment.urgency {
        Some(Urgency::Overdue) => text.truecolor(255, 140, 0),
        Some(Urgency::DueNow) => text.truecolor(255, 215, 0),
        Some(Urgency::NotYet) => text.truecolor(135, 206, 250),
        None => text.dimmed(),
    }
}

fn paint_urgency(urgency: Urgency) -> ColoredString {
    match urgency {
        Urgency::Overdue => urgency.as_str().truecolor(255, 140, 0),
        Urgency::DueNow => urgency.as_str().truecolor(255, 215, 0),
        Urgency::NotYet => urgency.as_str().truecolor(135, 206, 250),
    }
}

fn main() -> Result<()> {
    // Setup logging first
    setup_logging().context("Failed to setup logging")?;

    // Parse CLI arguments
    let cli = Cli::parse();

    // Load configuration
    let config = Config::load(cli.config.as_ref()).context("Failed to load configuration")?;
    config.validate().context("Invalid configuration")?;

    info!("Starting with config from: {:?}", cli.config);

    // Run the main application logic
    run_application(&cli, &config).context("Application failed")?;

    Ok(())
}
