//! # newshub
//!
//! Command-line front end: `newshub search` runs one aggregated search and
//! prints the filtered results as Markdown, `newshub prefs` inspects and
//! edits the stored preferences.
//!
//! Logs go to stderr (`RUST_LOG` controls verbosity) so stdout carries only
//! the rendered output.

use chrono::Utc;
use clap::Parser;
use newshub::api::{HttpClient, ReqwestHttpClient};
use newshub::cli::{Cli, Command, PrefsAction, SearchArgs};
use newshub::config::AppConfig;
use newshub::outputs::{json, markdown};
use newshub::{
    FileStorage, NewsSearch, PreferencesStore, SearchOutcome, SourceRegistry, filter_articles,
};
use std::error::Error;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{debug, info, instrument, warn};
use tracing_subscriber::{EnvFilter, fmt as tfmt};

const DATA_DIR_NAME: &str = ".newshub";

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    // --- Tracing init ---
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tfmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_file(false)
        .with_line_number(false)
        .with_writer(std::io::stderr)
        .with_timer(tracing_subscriber::fmt::time::UtcTime::rfc_3339())
        .init();

    let start_time = std::time::Instant::now();
    let args = Cli::parse();
    debug!(config = ?args.config, data_dir = ?args.data_dir, "Parsed CLI arguments");

    let config = load_config(&args)?;
    let storage = FileStorage::new(data_dir(&args, &config));
    info!(data_dir = %storage.dir().display(), "Using preference storage");

    let result = match args.command {
        Command::Search(search) => run_search(search, &config, storage).await,
        Command::Prefs { action } => run_prefs(action, storage),
    };

    let elapsed = start_time.elapsed();
    info!(?elapsed, millis = elapsed.as_millis() as u64, "Execution complete");
    result
}

/// Defaults, then the YAML file, then flags and environment variables.
fn load_config(args: &Cli) -> Result<AppConfig, Box<dyn Error>> {
    let mut config = match &args.config {
        Some(path) => AppConfig::load(path)?,
        None => AppConfig::default(),
    };
    for (source, key) in args.api_keys() {
        config.override_api_key(source, key);
    }
    Ok(config)
}

fn data_dir(args: &Cli, config: &AppConfig) -> PathBuf {
    if let Some(dir) = args.data_dir.clone().or_else(|| config.data_dir.clone()) {
        return dir;
    }
    match std::env::var_os("HOME") {
        Some(home) => PathBuf::from(home).join(DATA_DIR_NAME),
        None => PathBuf::from(DATA_DIR_NAME),
    }
}

#[instrument(level = "info", skip_all, fields(keyword = %args.keyword))]
async fn run_search(
    args: SearchArgs,
    config: &AppConfig,
    storage: FileStorage,
) -> Result<(), Box<dyn Error>> {
    let prefs = PreferencesStore::load(storage);
    let params = args.to_params(&prefs.state().selected_sources, config.page_size);
    if params.sources.is_empty() {
        warn!("No selected source left to query");
        eprintln!("No sources to search: none of the requested sources is in your preferences.");
        return Ok(());
    }

    let http: Arc<dyn HttpClient> = Arc::new(ReqwestHttpClient::new());
    let search = NewsSearch::new(SourceRegistry::from_config(config, http));

    let mut progress = search.subscribe();
    let watcher = tokio::spawn(async move {
        while progress.changed().await.is_ok() {
            let snapshot = progress.borrow_and_update().clone();
            debug!(
                phase = ?snapshot.phase,
                pending = ?snapshot.pending,
                articles = snapshot.articles.len(),
                "Search progress"
            );
        }
    });

    let outcome = search.search(params).await;
    drop(search);
    if let Err(e) = watcher.await {
        warn!(error = %e, "Progress watcher ended abnormally");
    }

    let snapshot = match outcome {
        SearchOutcome::Settled(snapshot) => snapshot,
        SearchOutcome::Superseded => return Ok(()),
    };

    for err in &snapshot.source_errors {
        eprintln!("warning: {err}");
    }
    if snapshot.is_total_failure() {
        let message = snapshot
            .error_message()
            .unwrap_or("every source failed")
            .to_string();
        return Err(format!("search failed on every source: {message}").into());
    }

    let articles = if args.unfiltered {
        snapshot.articles.clone()
    } else {
        filter_articles(&snapshot.articles, &prefs.state().filter_preferences())
    };
    info!(
        merged = snapshot.articles.len(),
        shown = articles.len(),
        "Rendering results"
    );
    println!("{}", markdown::search_to_markdown(&snapshot, &articles));

    if let Some(dir) = &args.json_output_dir {
        let report = json::SearchReport::new(&snapshot, articles, Utc::now());
        let path = json::write_report(&report, dir).await?;
        eprintln!("Saved report to {}", path.display());
    }
    Ok(())
}

fn run_prefs(action: PrefsAction, storage: FileStorage) -> Result<(), Box<dyn Error>> {
    let mut store = PreferencesStore::load(storage);
    match action {
        PrefsAction::Show => {}
        PrefsAction::Reset => store.clear()?,
        PrefsAction::ToggleSource { source } => store.toggle_source(source)?,
        PrefsAction::ToggleCategory { category } => store.toggle_category(category)?,
        PrefsAction::ExcludeWriter { name } => {
            if !store.add_excluded_writer(&name)? {
                eprintln!("'{}' is blank or already excluded", name.trim());
            }
        }
        PrefsAction::IncludeWriter { name } => {
            if !store.remove_excluded_writer(&name)? {
                eprintln!("'{}' was not excluded", name.trim());
            }
        }
        PrefsAction::Theme { theme } => store.set_theme(theme)?,
        PrefsAction::ToggleTheme => {
            let theme = store.toggle_theme()?;
            info!(theme = theme.as_str(), "Switched theme");
        }
    }
    println!("{}", serde_json::to_string_pretty(store.state())?);
    Ok(())
}
