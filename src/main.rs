use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use chrono::Local;
use clap::Parser;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::warn;

use loglens_filter::{
    EntryStore, FilterCoordinator, LocalEvaluators, LogLevel, LogStats, QueryDebouncer, ViewUpdate,
};
use loglens_history::{HistoryStore, format_file_size, group_by_day};
use loglens_parse::load_file;
use loglens_render::{DisplayUnit, render_view};

mod config;
use config::Config;

/// Loglens - a log file viewer with search, level filtering, and history
#[derive(Parser, Debug)]
#[command(name = "loglens")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Log file to open
    #[arg(value_name = "FILE")]
    path: Option<PathBuf>,

    /// Initial search query
    #[arg(long, value_name = "TEXT")]
    query: Option<String>,

    /// Level to include (repeatable; all levels when omitted)
    #[arg(long = "level", value_name = "LEVEL")]
    levels: Vec<String>,

    /// Print one filtered view and exit
    #[arg(long)]
    once: bool,

    /// Config file path
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // Initialize tracing for debugging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::WARN.into()),
        )
        .with_writer(std::io::stderr)
        .init();

    // Run the application
    let result = run_app(args).await;

    // Handle any errors
    if let Err(e) = &result {
        eprintln!("Error: {:#}", e);
    }

    result
}

async fn run_app(args: Args) -> Result<()> {
    let config = Config::load(args.config.as_deref())?;

    let one_shot = args.once || args.query.is_some() || !args.levels.is_empty();
    if one_shot && args.path.is_none() {
        anyhow::bail!("--query, --level, and --once require a FILE argument");
    }

    let history = match HistoryStore::open_default() {
        Ok(store) => Some(store.with_limit(config.history_limit)),
        Err(e) => {
            warn!(error = %e, "history disabled");
            None
        }
    };

    let store = Arc::new(EntryStore::new());
    let (coordinator, mut updates) = FilterCoordinator::new(store, LocalEvaluators);

    // Criteria from flags apply before the load submits its first pass
    if !args.levels.is_empty() {
        let levels = parse_level_list(&args.levels.join(","))?;
        coordinator.store().set_levels(levels);
    }
    if let Some(query) = &args.query {
        coordinator.store().set_query(query.clone());
    }

    if let Some(path) = &args.path {
        open_file(path, &coordinator, history.as_ref())?;
    }

    if one_shot {
        let update = updates.recv().await.context("no view was committed")?;
        print_view(&update, config.max_display);
        return Ok(());
    }

    let debouncer = QueryDebouncer::new(coordinator.clone(), config.debounce());

    println!(
        "loglens - commands: open <file>, search <text>, levels <list|all>, history, stats, help, quit"
    );

    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    // Main event loop
    loop {
        tokio::select! {
            // Handle user commands
            line = lines.next_line() => {
                match line.context("failed to read input")? {
                    Some(line) => {
                        if !handle_command(line.trim(), &coordinator, &debouncer, history.as_ref()) {
                            break;
                        }
                    }
                    None => break,
                }
            }

            // Handle committed view updates
            Some(update) = updates.recv() => {
                print_view(&update, config.max_display);
            }
        }
    }

    Ok(())
}

/// Dispatch one interactive command. Returns false to quit.
fn handle_command(
    line: &str,
    coordinator: &FilterCoordinator<LocalEvaluators>,
    debouncer: &QueryDebouncer<LocalEvaluators>,
    history: Option<&HistoryStore>,
) -> bool {
    let (command, rest) = line.split_once(' ').unwrap_or((line, ""));
    let rest = rest.trim();

    match command {
        "" => {}
        "open" => {
            if rest.is_empty() {
                println!("usage: open <file>");
            } else if let Err(e) = open_file(Path::new(rest), coordinator, history) {
                println!("Failed to open file: {e:#}");
            }
        }
        "search" => {
            debouncer.input(rest);
        }
        "levels" => match parse_level_list(rest) {
            Ok(levels) => {
                coordinator.set_levels(levels);
            }
            Err(e) => println!("{e:#}"),
        },
        "history" => print_history(history),
        "stats" => print_stats(&coordinator.current_stats()),
        "help" => {
            println!("open <file>      load a log file");
            println!("search <text>    filter by text (debounced; empty clears)");
            println!("levels <list>    comma-separated levels, or \"all\"");
            println!("history          show recently opened files");
            println!("stats            show counts for the current view");
            println!("quit             exit");
        }
        "quit" | "exit" | "q" => return false,
        other => println!("unknown command: {other} (try \"help\")"),
    }

    true
}

fn open_file(
    path: &Path,
    coordinator: &FilterCoordinator<LocalEvaluators>,
    history: Option<&HistoryStore>,
) -> Result<()> {
    let snapshot = load_file(path)?;
    println!(
        "Loaded {} ({} entries, {})",
        snapshot.file().name,
        snapshot.len(),
        format_file_size(snapshot.file().size_bytes)
    );

    coordinator.load(snapshot);

    // fire-and-forget: a history failure never blocks the load
    if let Some(history) = history {
        if let Err(e) = history.record(path) {
            warn!(error = %e, "failed to record history");
        }
    }

    Ok(())
}

fn print_view(update: &ViewUpdate, max_display: usize) {
    for unit in render_view(&update.view, &update.criteria.query, max_display) {
        match unit {
            DisplayUnit::Entry(entry) => match &entry.timestamp {
                Some(timestamp) => {
                    println!("{:5} {} {}", entry.level.as_str(), timestamp, entry.message)
                }
                None => println!("{:5} {}", entry.level.as_str(), entry.message),
            },
            marker => println!("{}", marker.label()),
        }
    }

    if let Some(stats) = &update.stats {
        print_stats(stats);
    }
}

fn print_stats(stats: &LogStats) {
    println!(
        "Total {} │ ERROR {} │ WARN {} │ INFO {} │ DEBUG {}",
        stats.total, stats.error, stats.warn, stats.info, stats.debug
    );
}

fn print_history(history: Option<&HistoryStore>) {
    let Some(store) = history else {
        println!("History unavailable");
        return;
    };

    match store.load() {
        Err(e) => println!("Failed to load history: {e}"),
        Ok(records) if records.is_empty() => println!("No recent files"),
        Ok(records) => {
            for group in group_by_day(&records, Local::now()) {
                println!("{}", group.label);
                for record in &group.records {
                    println!(
                        "  {:24} {:5} {:>9}  {}",
                        record.display_name(),
                        record.time_label().unwrap_or_default(),
                        format_file_size(record.size_bytes),
                        record.path
                    );
                }
            }
        }
    }
}

/// Parse a comma-separated level list; empty, "all", and "none" mean no
/// level restriction
fn parse_level_list(input: &str) -> Result<HashSet<LogLevel>> {
    let input = input.trim();
    if input.is_empty()
        || input.eq_ignore_ascii_case("all")
        || input.eq_ignore_ascii_case("none")
    {
        return Ok(HashSet::new());
    }

    input
        .split(',')
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .map(|token| LogLevel::parse(token).with_context(|| format!("unknown level: {token}")))
        .collect()
}
