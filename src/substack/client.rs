//! Substack content client
//!
//! [`ContentSource`] is the seam between the tool handlers and the platform.
//! [`SubstackClient`] implements it against Substack's public JSON API.

use super::types::{
    non_blank, AuthorProfile, NewsletterAuthor, PostDetail, PostSummary, Recommendation, Sorting,
    NO_BIO, UNKNOWN_AUTHOR, UNKNOWN_DATE, UNKNOWN_NAME, UNTITLED,
};
use super::url::{newsletter_origin, post_slug, publication_url};
use crate::config::Config;
use crate::error::AppError;
use async_trait::async_trait;
use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use thiserror::Error;
use tracing::debug;

#[derive(Debug, Error)]
pub enum ContentError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("{endpoint} returned status {status}")]
    Status { endpoint: String, status: u16 },
    #[error("Unexpected response from {endpoint}: {reason}")]
    Decode { endpoint: String, reason: String },
    #[error("Invalid reference: {0}")]
    InvalidReference(String),
}

impl From<ContentError> for AppError {
    fn from(err: ContentError) -> Self {
        match err {
            ContentError::Http(e) => AppError::from(e),
            ContentError::Status { .. } => AppError::NetworkError(err.to_string()),
            ContentError::Decode { .. } => AppError::ParseError(err.to_string()),
            ContentError::InvalidReference(msg) => AppError::InvalidInput(msg),
        }
    }
}

/// Read access to newsletters, posts and author profiles
#[async_trait]
pub trait ContentSource: Send + Sync {
    /// Most recent (or top) posts of a newsletter
    async fn newsletter_posts(
        &self,
        newsletter: &str,
        sorting: Sorting,
        limit: usize,
    ) -> Result<Vec<PostSummary>, ContentError>;

    /// Posts of one newsletter matching a query
    async fn search_posts(
        &self,
        newsletter: &str,
        query: &str,
        limit: usize,
    ) -> Result<Vec<PostSummary>, ContentError>;

    /// A single post; `None` when the platform does not know it
    async fn post_detail(&self, post_url: &str) -> Result<Option<PostDetail>, ContentError>;

    async fn author_profile(&self, username: &str) -> Result<Option<AuthorProfile>, ContentError>;

    async fn recommendations(&self, newsletter: &str) -> Result<Vec<Recommendation>, ContentError>;

    async fn newsletter_authors(&self, newsletter: &str)
        -> Result<Vec<NewsletterAuthor>, ContentError>;
}

#[derive(Debug, Deserialize)]
struct ArchiveItem {
    title: Option<String>,
    post_date: Option<String>,
    canonical_url: Option<String>,
    slug: Option<String>,
    publication_id: Option<u64>,
}

#[derive(Debug, Deserialize)]
struct Byline {
    name: Option<String>,
}

#[derive(Debug, Deserialize)]
struct PostPayload {
    title: Option<String>,
    post_date: Option<String>,
    body_html: Option<String>,
    #[serde(rename = "publishedBylines", default)]
    published_bylines: Vec<Byline>,
}

#[derive(Debug, Deserialize)]
struct UserPayload {
    name: Option<String>,
    handle: Option<String>,
    bio: Option<String>,
    #[serde(default)]
    subscriptions: Vec<SubscriptionPayload>,
}

#[derive(Debug, Deserialize)]
struct SubscriptionPayload {
    publication: Option<PublicationPayload>,
}

#[derive(Debug, Deserialize)]
struct PublicationPayload {
    name: Option<String>,
    subdomain: Option<String>,
    custom_domain: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RecommendationPayload {
    #[serde(rename = "recommendedPublication")]
    recommended_publication: Option<PublicationPayload>,
}

/// HTTP implementation of [`ContentSource`]
pub struct SubstackClient {
    client: reqwest::Client,
    api_base: String,
}

impl SubstackClient {
    pub fn new(config: &Config) -> Result<Self, AppError> {
        let client = crate::http::client_with_timeout(config.http_timeout)?;
        Ok(Self {
            client,
            api_base: config.api_base.trim_end_matches('/').to_string(),
        })
    }

    /// GET a JSON document; `Ok(None)` on 404
    async fn get_json<T: DeserializeOwned>(
        &self,
        url: &str,
        query: &[(&str, String)],
    ) -> Result<Option<T>, ContentError> {
        debug!("GET {} {:?}", url, query);

        let response = self.client.get(url).query(query).send().await?;
        let status = response.status();

        if status == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        if !status.is_success() {
            return Err(ContentError::Status {
                endpoint: url.to_string(),
                status: status.as_u16(),
            });
        }

        let body = response.text().await?;
        serde_json::from_str(&body)
            .map(Some)
            .map_err(|e| ContentError::Decode {
                endpoint: url.to_string(),
                reason: e.to_string(),
            })
    }

    async fn archive(
        &self,
        newsletter: &str,
        sorting: Sorting,
        search: &str,
        limit: usize,
    ) -> Result<Vec<ArchiveItem>, ContentError> {
        let origin = newsletter_origin(newsletter)?;
        let url = format!("{}/api/v1/archive", origin);
        let query = [
            ("sort", sorting.as_str().to_string()),
            ("search", search.to_string()),
            ("offset", "0".to_string()),
            ("limit", limit.to_string()),
        ];

        let mut items: Vec<ArchiveItem> = self.get_json(&url, &query).await?.unwrap_or_default();
        items.truncate(limit);
        Ok(items)
    }

    fn summarize(origin: &str, items: Vec<ArchiveItem>) -> Vec<PostSummary> {
        items
            .into_iter()
            .map(|item| {
                let url = non_blank(item.canonical_url)
                    .or_else(|| item.slug.map(|slug| format!("{}/p/{}", origin, slug)))
                    .unwrap_or_else(|| origin.to_string());
                PostSummary::new(item.title, item.post_date, url)
            })
            .collect()
    }
}

#[async_trait]
impl ContentSource for SubstackClient {
    async fn newsletter_posts(
        &self,
        newsletter: &str,
        sorting: Sorting,
        limit: usize,
    ) -> Result<Vec<PostSummary>, ContentError> {
        let items = self.archive(newsletter, sorting, "", limit).await?;
        Ok(Self::summarize(&newsletter_origin(newsletter)?, items))
    }

    async fn search_posts(
        &self,
        newsletter: &str,
        query: &str,
        limit: usize,
    ) -> Result<Vec<PostSummary>, ContentError> {
        let items = self.archive(newsletter, Sorting::New, query, limit).await?;
        Ok(Self::summarize(&newsletter_origin(newsletter)?, items))
    }

    async fn post_detail(&self, post_url: &str) -> Result<Option<PostDetail>, ContentError> {
        let (origin, slug) = post_slug(post_url)?;
        let url = format!("{}/api/v1/posts/{}", origin, slug);

        let payload: Option<PostPayload> = self.get_json(&url, &[]).await?;
        Ok(payload.map(|post| PostDetail {
            title: non_blank(post.title).unwrap_or_else(|| UNTITLED.to_string()),
            author: post
                .published_bylines
                .into_iter()
                .find_map(|b| non_blank(b.name))
                .unwrap_or_else(|| UNKNOWN_AUTHOR.to_string()),
            published_at: non_blank(post.post_date).unwrap_or_else(|| UNKNOWN_DATE.to_string()),
            body_html: post.body_html.unwrap_or_default(),
        }))
    }

    async fn author_profile(&self, username: &str) -> Result<Option<AuthorProfile>, ContentError> {
        let url = format!("{}/api/v1/user/{}/public_profile", self.api_base, username);

        let payload: Option<UserPayload> = self.get_json(&url, &[]).await?;
        Ok(payload.map(|user| AuthorProfile {
            name: non_blank(user.name).unwrap_or_else(|| UNKNOWN_NAME.to_string()),
            username: non_blank(user.handle).unwrap_or_else(|| username.to_string()),
            bio: non_blank(user.bio).unwrap_or_else(|| NO_BIO.to_string()),
            subscriptions: user
                .subscriptions
                .into_iter()
                .filter_map(|s| s.publication)
                .map(|p| non_blank(p.name).unwrap_or_else(|| UNKNOWN_NAME.to_string()))
                .collect(),
        }))
    }

    async fn recommendations(&self, newsletter: &str) -> Result<Vec<Recommendation>, ContentError> {
        // The recommendations endpoint is keyed by publication id, which only
        // the archive exposes.
        let latest = self.archive(newsletter, Sorting::New, "", 1).await?;
        let Some(publication_id) = latest.first().and_then(|item| item.publication_id) else {
            debug!("No publication id available for {}", newsletter);
            return Ok(Vec::new());
        };

        let origin = newsletter_origin(newsletter)?;
        let url = format!("{}/api/v1/recommendations/from/{}", origin, publication_id);
        let payload: Vec<RecommendationPayload> = self.get_json(&url, &[]).await?.unwrap_or_default();

        Ok(payload
            .into_iter()
            .filter_map(|r| r.recommended_publication)
            .filter_map(|p| {
                let url = publication_url(p.subdomain.as_deref(), p.custom_domain.as_deref())?;
                Some(Recommendation {
                    name: non_blank(p.name),
                    url,
                })
            })
            .collect())
    }

    async fn newsletter_authors(
        &self,
        newsletter: &str,
    ) -> Result<Vec<NewsletterAuthor>, ContentError> {
        let origin = newsletter_origin(newsletter)?;
        let url = format!("{}/api/v1/publication/users/ranked", origin);

        let payload: Vec<UserPayload> = self
            .get_json(&url, &[("public", "true".to_string())])
            .await?
            .unwrap_or_default();

        Ok(payload
            .into_iter()
            .filter_map(|user| {
                let handle = non_blank(user.handle)?;
                Some(NewsletterAuthor {
                    name: non_blank(user.name).unwrap_or_else(|| UNKNOWN_NAME.to_string()),
                    handle,
                })
            })
            .collect())
    }
}
