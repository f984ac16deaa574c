//! # newshub
//!
//! Search several news providers at once and read the results as one list.
//!
//! Each provider (the Guardian, the New York Times, NewsAPI, GNews) sits
//! behind an adapter that turns a common [`SearchParams`] into the
//! provider's own request and maps its response back onto [`NewsArticle`].
//! [`NewsSearch`] fans a search out to the active adapters, tolerates
//! partial failure, and publishes merged, date-sorted results. The
//! [`filter`] module then applies the user's stored preferences.
//!
//! ## Pipeline
//!
//! 1. **Parameters**: built from the command line and preferred sources
//! 2. **Fan-out**: one request per active adapter, shared when identical
//! 3. **Merge**: registry order, then newest first
//! 4. **Filter**: allowed sources and categories, excluded writers
//! 5. **Output**: Markdown to stdout, optional JSON report

pub mod aggregator;
pub mod api;
pub mod cli;
pub mod config;
pub mod error;
pub mod filter;
pub mod models;
pub mod outputs;
pub mod preferences;
pub mod sources;
pub mod utils;

pub use aggregator::{NewsSearch, SearchOutcome, SearchPhase, SearchSnapshot};
pub use error::ApiError;
pub use filter::{FilterPreferences, filter_articles};
pub use models::{Category, NewsArticle, SearchMeta, SearchParams, SearchResult, Source, Theme};
pub use preferences::{FileStorage, MemoryStorage, PreferencesState, PreferencesStore, Storage};
pub use sources::{NewsSource, SourceRegistry};
