//! Cross-newsletter search
//!
//! Picks a set of newsletters, runs the same query against each one
//! concurrently and groups the matches in selection order. A newsletter whose
//! search fails or times out contributes nothing; the rest still report.

use crate::cache::NewsletterCache;
use crate::discovery;
use crate::substack::{ContentError, ContentSource, PostSummary};
use futures::future::join_all;
use std::fmt;
use std::time::Duration;
use tracing::{debug, info, warn};

/// Where a selection came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectionSource {
    Explicit,
    Popular,
    Cache,
    /// Cache was empty
    PopularFallback,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchSelection {
    pub source: SelectionSource,
    pub newsletters: Vec<String>,
}

/// Choose which newsletters to search. First matching rule wins:
/// a non-empty explicit list, then the popular list when `popular_only`,
/// then the cache, then the popular list.
pub async fn select_newsletters(
    explicit: Option<&[String]>,
    max_newsletters: usize,
    popular_only: bool,
    cache: &NewsletterCache,
) -> SearchSelection {
    if let Some(list) = explicit.filter(|l| !l.is_empty()) {
        return SearchSelection {
            source: SelectionSource::Explicit,
            newsletters: list.iter().take(max_newsletters).cloned().collect(),
        };
    }

    if popular_only {
        return SearchSelection {
            source: SelectionSource::Popular,
            newsletters: discovery::popular(max_newsletters),
        };
    }

    let mut cached = cache.load_async().await;
    if cached.is_empty() {
        return SearchSelection {
            source: SelectionSource::PopularFallback,
            newsletters: discovery::popular(max_newsletters),
        };
    }

    cached.truncate(max_newsletters);
    SearchSelection {
        source: SelectionSource::Cache,
        newsletters: cached,
    }
}

/// Why one newsletter produced no results
#[derive(Debug)]
pub enum SearchFailure {
    Content(ContentError),
    TimedOut(Duration),
}

impl fmt::Display for SearchFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SearchFailure::Content(e) => write!(f, "{}", e),
            SearchFailure::TimedOut(after) => write!(f, "timed out after {:?}", after),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewsletterMatches {
    pub newsletter: String,
    pub posts: Vec<PostSummary>,
}

#[derive(Debug)]
pub struct FanOutReport {
    pub query: String,
    pub selection: SearchSelection,
    /// Non-empty result groups, selection order
    pub groups: Vec<NewsletterMatches>,
    /// Newsletters that failed, selection order; logged, never shown to callers
    pub failures: Vec<(String, SearchFailure)>,
}

impl FanOutReport {
    pub fn has_results(&self) -> bool {
        !self.groups.is_empty()
    }

    pub fn total_matches(&self) -> usize {
        self.groups.iter().map(|g| g.posts.len()).sum()
    }
}

#[derive(Debug, Clone)]
pub struct FanOutRequest<'a> {
    pub query: &'a str,
    pub newsletters: Option<&'a [String]>,
    pub max_newsletters: usize,
    pub per_newsletter_limit: usize,
    pub popular_only: bool,
}

async fn search_one(
    source: &dyn ContentSource,
    newsletter: &str,
    query: &str,
    limit: usize,
    per_search_timeout: Duration,
) -> Result<Vec<PostSummary>, SearchFailure> {
    match tokio::time::timeout(per_search_timeout, source.search_posts(newsletter, query, limit)).await {
        Ok(Ok(mut posts)) => {
            posts.truncate(limit);
            Ok(posts)
        }
        Ok(Err(e)) => Err(SearchFailure::Content(e)),
        Err(_) => Err(SearchFailure::TimedOut(per_search_timeout)),
    }
}

/// Search every selected newsletter and group the matches
pub async fn search_across(
    source: &dyn ContentSource,
    cache: &NewsletterCache,
    request: &FanOutRequest<'_>,
    per_search_timeout: Duration,
) -> FanOutReport {
    let selection = select_newsletters(
        request.newsletters,
        request.max_newsletters,
        request.popular_only,
        cache,
    )
    .await;

    info!(
        "Searching {} newsletters ({:?}) for '{}'",
        selection.newsletters.len(),
        selection.source,
        request.query
    );

    let searches = selection.newsletters.iter().map(|newsletter| {
        search_one(
            source,
            newsletter,
            request.query,
            request.per_newsletter_limit,
            per_search_timeout,
        )
    });
    // join_all yields outputs in input order regardless of completion order
    let outcomes = join_all(searches).await;

    let mut groups = Vec::new();
    let mut failures = Vec::new();
    for (newsletter, outcome) in selection.newsletters.iter().zip(outcomes) {
        match outcome {
            Ok(posts) if posts.is_empty() => debug!("No matches in {}", newsletter),
            Ok(posts) => groups.push(NewsletterMatches {
                newsletter: newsletter.clone(),
                posts,
            }),
            Err(failure) => {
                warn!("Search in {} failed: {}", newsletter, failure);
                failures.push((newsletter.clone(), failure));
            }
        }
    }

    FanOutReport {
        query: request.query.to_string(),
        selection,
        groups,
        failures,
    }
}
