//! Command-line interface definitions for newshub.
//!
//! Global options (config file, data directory, API keys) can be given as
//! flags or environment variables and apply to every subcommand.

use crate::models::{Category, SearchParams, Source, Theme};
use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// Search the Guardian, New York Times, NewsAPI and GNews at once.
///
/// # Examples
///
/// ```sh
/// # Latest headlines from every preferred source
/// newshub search
///
/// # Keyword search in one category, two sources, a date range
/// newshub search -k "interest rates" -c business -s guardian,nyt --from 2025-01-01 --to 2025-01-31
///
/// # Stop seeing a writer
/// newshub prefs exclude-writer "Jane Doe"
/// ```
#[derive(Parser, Debug)]
#[command(author, version, about)]
pub struct Cli {
    /// Optional path to config.yaml file
    #[arg(long, env = "NEWSHUB_CONFIG", global = true)]
    pub config: Option<PathBuf>,

    /// Directory holding the stored preferences
    #[arg(long, env = "NEWSHUB_DATA_DIR", global = true)]
    pub data_dir: Option<PathBuf>,

    /// Guardian Open Platform API key
    #[arg(long, env = "GUARDIAN_API_KEY", hide_env_values = true, global = true)]
    pub guardian_api_key: Option<String>,

    /// New York Times API key
    #[arg(long, env = "NYT_API_KEY", hide_env_values = true, global = true)]
    pub nyt_api_key: Option<String>,

    /// NewsAPI key
    #[arg(long, env = "NEWSAPI_API_KEY", hide_env_values = true, global = true)]
    pub newsapi_api_key: Option<String>,

    /// GNews API key
    #[arg(long, env = "GNEWS_API_KEY", hide_env_values = true, global = true)]
    pub gnews_api_key: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

impl Cli {
    /// API keys given on the command line or through the environment.
    pub fn api_keys(&self) -> [(Source, Option<String>); 4] {
        [
            (Source::Guardian, self.guardian_api_key.clone()),
            (Source::NewYorkTimes, self.nyt_api_key.clone()),
            (Source::NewsApi, self.newsapi_api_key.clone()),
            (Source::GNews, self.gnews_api_key.clone()),
        ]
    }
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Search the preferred sources and print merged results as Markdown
    Search(SearchArgs),

    /// Show or change stored preferences
    Prefs {
        #[command(subcommand)]
        action: PrefsAction,
    },
}

#[derive(Args, Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchArgs {
    /// Text to search for
    #[arg(short, long, default_value = "")]
    pub keyword: String,

    /// Restrict to one category
    #[arg(short, long)]
    pub category: Option<Category>,

    /// Sources to query (ids or names); defaults to the preferred sources
    #[arg(short, long = "source", value_delimiter = ',')]
    pub sources: Vec<Source>,

    /// Earliest publication date (YYYY-MM-DD)
    #[arg(long)]
    pub from: Option<NaiveDate>,

    /// Latest publication date (YYYY-MM-DD)
    #[arg(long)]
    pub to: Option<NaiveDate>,

    /// Zero-based result page
    #[arg(long, default_value_t = 0)]
    pub page: u32,

    /// Results per source and page
    #[arg(long)]
    pub page_size: Option<u32>,

    /// Print results without applying stored preferences
    #[arg(long)]
    pub unfiltered: bool,

    /// Also write a JSON report below this directory
    #[arg(short, long)]
    pub json_output_dir: Option<PathBuf>,
}

impl SearchArgs {
    /// Build search parameters, querying only sources the user prefers.
    ///
    /// Explicit `--source` values are intersected with `preferred`; without
    /// any, all preferred sources are queried. An empty result means there is
    /// nothing to search.
    pub fn to_params(&self, preferred: &[Source], default_page_size: u32) -> SearchParams {
        let sources: Vec<Source> = if self.sources.is_empty() {
            preferred.to_vec()
        } else {
            self.sources
                .iter()
                .copied()
                .filter(|s| preferred.contains(s))
                .collect()
        };

        SearchParams {
            keyword: self.keyword.clone(),
            category: self.category,
            sources,
            date_from: self.from,
            date_to: self.to,
            page: Some(self.page),
            page_size: Some(self.page_size.unwrap_or(default_page_size)),
        }
    }
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum PrefsAction {
    /// Print the stored preferences
    Show,
    /// Restore defaults (the theme is kept)
    Reset,
    /// Follow or unfollow a source
    ToggleSource { source: Source },
    /// Follow or unfollow a category
    ToggleCategory { category: Category },
    /// Hide articles by a writer
    ExcludeWriter { name: String },
    /// Stop hiding articles by a writer
    IncludeWriter { name: String },
    /// Set the colour theme
    Theme { theme: Theme },
    /// Switch between light and dark
    ToggleTheme,
}
