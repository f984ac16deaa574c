//! Markdown rendering of a settled search.
//!
//! Produces one document per search: a heading naming the query, a summary
//! line with counts and pagination, then one section per article.
//!
//! ```text
//! # Results for "climate"
//!
//! _2 articles from Guardian, New York Times · page 1 of 12_
//!
//! ## [Headline](https://...)
//!
//! <small>`Guardian` · science · Jane Doe · Jan 15, 2025</small>
//!
//! Trail text.
//! ```

use crate::aggregator::SearchSnapshot;
use crate::models::NewsArticle;
use crate::utils::{format_date, slugify_title};
use itertools::Itertools;
use std::fmt::Write;

/// Render `articles` (already filtered) in the context of `snapshot`.
pub fn search_to_markdown(snapshot: &SearchSnapshot, articles: &[NewsArticle]) -> String {
    let mut md = String::new();

    let keyword = snapshot.params.as_ref().and_then(|p| p.keyword());
    match keyword {
        Some(k) => {
            let _ = writeln!(md, "# Results for \"{k}\"\n");
        }
        None => md.push_str("# Latest news\n\n"),
    }

    let page = snapshot.params.as_ref().map(|p| p.page()).unwrap_or(0) + 1;
    let _ = write!(
        md,
        "_{} article{} from {}",
        articles.len(),
        if articles.len() == 1 { "" } else { "s" },
        snapshot.sources.iter().join(", ")
    );
    let total_pages = snapshot.total_pages();
    if total_pages > 0 {
        let _ = write!(md, " · page {page} of {total_pages}");
    }
    md.push_str("_\n\n");

    if articles.is_empty() {
        md.push_str(if snapshot.has_searched {
            "No articles matched your search.\n"
        } else {
            "No search has been run yet.\n"
        });
        return md;
    }

    for article in articles {
        write_article(&mut md, article);
    }
    md
}

fn write_article(md: &mut String, article: &NewsArticle) {
    let _ = writeln!(md, "## [{}]({})\n", article.title.trim(), article.url);

    let mut byline = vec![format!("`{}`", article.source)];
    if let Some(category) = article.category {
        byline.push(category.to_string());
    }
    if let Some(author) = &article.author {
        byline.push(author.clone());
    }
    byline.push(format_date(&article.date));
    let _ = writeln!(md, "<small>{}</small>\n", byline.join(" · "));

    if let Some(image) = &article.image_url {
        let _ = writeln!(md, "![{}]({})\n", slugify_title(&article.title), image);
    }
    let description = article.description.trim();
    if !description.is_empty() {
        let _ = writeln!(md, "{description}\n");
    }
}
