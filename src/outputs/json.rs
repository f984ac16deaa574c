//! JSON report output.
//!
//! Each search can be saved as a self-contained report for other tools to
//! consume. Reports are grouped by UTC date:
//!
//! ```text
//! json_output_dir/
//! └── 2025-05-06/
//!     ├── 091502-climate.json
//!     └── 101133-latest.json
//! ```

use crate::aggregator::SearchSnapshot;
use crate::error::ApiError;
use crate::models::{NewsArticle, SearchMeta, SearchParams, Source};
use crate::utils::{ensure_writable_dir, slugify_title};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::BTreeMap;
use std::error::Error;
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::{error, info, instrument};

/// What gets written for one search.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchReport {
    pub generated_at: DateTime<Utc>,
    pub params: Option<SearchParams>,
    pub total_pages: u32,
    pub meta: BTreeMap<Source, SearchMeta>,
    pub source_errors: Vec<ApiError>,
    pub articles: Vec<NewsArticle>,
}

impl SearchReport {
    /// Report for `snapshot`, carrying the already filtered `articles`.
    pub fn new(snapshot: &SearchSnapshot, articles: Vec<NewsArticle>, generated_at: DateTime<Utc>) -> Self {
        Self {
            generated_at,
            params: snapshot.params.clone(),
            total_pages: snapshot.total_pages(),
            meta: snapshot.meta.clone(),
            source_errors: snapshot.source_errors.clone(),
            articles,
        }
    }

    /// Path of this report below `json_output_dir`.
    pub fn path_in(&self, json_output_dir: &Path) -> PathBuf {
        let label = self
            .params
            .as_ref()
            .and_then(|p| p.keyword())
            .map(slugify_title)
            .filter(|s| !s.is_empty())
            .unwrap_or_else(|| "latest".to_string());
        json_output_dir
            .join(self.generated_at.format("%Y-%m-%d").to_string())
            .join(format!("{}-{label}.json", self.generated_at.format("%H%M%S")))
    }
}

/// Write `report` below `json_output_dir`, returning the file path.
///
/// # Errors
///
/// Returns an error if the report cannot be serialized, the dated directory
/// cannot be created or written to, or the file write fails.
#[instrument(level = "info", skip_all, fields(json_output_dir = %json_output_dir.display()))]
pub async fn write_report(
    report: &SearchReport,
    json_output_dir: &Path,
) -> Result<PathBuf, Box<dyn Error>> {
    let json = serde_json::to_string_pretty(report)?;
    let path = report.path_in(json_output_dir);

    if let Some(dir) = path.parent() {
        if let Err(e) = ensure_writable_dir(dir).await {
            error!(dir = %dir.display(), error = %e, "JSON output directory is not writable");
            return Err(e.into());
        }
    }

    fs::write(&path, json).await?;
    info!(path = %path.display(), articles = report.articles.len(), "Wrote JSON report");
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use tempfile::TempDir;

    fn report(keyword: &str) -> SearchReport {
        let snapshot = SearchSnapshot {
            params: Some(SearchParams::new(keyword)),
            ..SearchSnapshot::default()
        };
        let at = Utc.with_ymd_and_hms(2025, 5, 6, 9, 15, 2).unwrap();
        SearchReport::new(&snapshot, Vec::new(), at)
    }

    #[test]
    fn test_report_path_is_dated_and_labelled() {
        let base = Path::new("/out");
        assert_eq!(
            report("Climate Change").path_in(base),
            PathBuf::from("/out/2025-05-06/091502-climate-change.json")
        );
        assert_eq!(
            report("").path_in(base),
            PathBuf::from("/out/2025-05-06/091502-latest.json")
        );
    }

    #[tokio::test]
    async fn test_write_report_creates_file() {
        let dir = TempDir::new().unwrap();
        let report = report("rust");
        let path = write_report(&report, dir.path()).await.unwrap();

        let raw = std::fs::read_to_string(&path).unwrap();
        let json: serde_json::Value = serde_json::from_str(&raw).unwrap();
        assert_eq!(json["params"]["keyword"], "rust");
        assert_eq!(json["totalPages"], 0);
        assert!(json["articles"].as_array().unwrap().is_empty());
    }
}
