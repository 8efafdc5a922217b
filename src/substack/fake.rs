//! In-memory content source for handler and fan-out tests

use super::client::{ContentError, ContentSource};
use super::types::{AuthorProfile, NewsletterAuthor, PostDetail, PostSummary, Recommendation, Sorting};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Mutex;
use std::time::Duration;

#[derive(Default)]
pub struct FakeSource {
    pub posts: HashMap<String, Vec<PostSummary>>,
    pub details: HashMap<String, PostDetail>,
    pub profiles: HashMap<String, AuthorProfile>,
    pub recommendations: HashMap<String, Vec<Recommendation>>,
    pub authors: HashMap<String, Vec<NewsletterAuthor>>,
    /// Newsletters whose search fails
    pub failing: Vec<String>,
    /// Per-newsletter artificial latency
    pub delays: HashMap<String, Duration>,
    /// Newsletters searched, in call order
    pub searched: Mutex<Vec<String>>,
}

impl FakeSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_posts(mut self, newsletter: &str, titles: &[&str]) -> Self {
        let posts = titles
            .iter()
            .enumerate()
            .map(|(i, title)| PostSummary {
                title: title.to_string(),
                published_at: format!("2024-01-0{}", i + 1),
                url: format!("{}/p/post-{}", newsletter, i + 1),
            })
            .collect();
        self.posts.insert(newsletter.to_string(), posts);
        self
    }

    pub fn failing(mut self, newsletter: &str) -> Self {
        self.failing.push(newsletter.to_string());
        self
    }

    pub fn delayed(mut self, newsletter: &str, delay: Duration) -> Self {
        self.delays.insert(newsletter.to_string(), delay);
        self
    }

    pub fn searched(&self) -> Vec<String> {
        self.searched.lock().map(|s| s.clone()).unwrap_or_default()
    }
}

#[async_trait]
impl ContentSource for FakeSource {
    async fn newsletter_posts(
        &self,
        newsletter: &str,
        _sorting: Sorting,
        limit: usize,
    ) -> Result<Vec<PostSummary>, ContentError> {
        Ok(self
            .posts
            .get(newsletter)
            .map(|p| p.iter().take(limit).cloned().collect())
            .unwrap_or_default())
    }

    async fn search_posts(
        &self,
        newsletter: &str,
        query: &str,
        limit: usize,
    ) -> Result<Vec<PostSummary>, ContentError> {
        if let Ok(mut searched) = self.searched.lock() {
            searched.push(newsletter.to_string());
        }
        if let Some(delay) = self.delays.get(newsletter) {
            tokio::time::sleep(*delay).await;
        }
        if url::Url::parse(newsletter).is_err() {
            return Err(ContentError::InvalidReference(newsletter.to_string()));
        }
        if self.failing.iter().any(|n| n == newsletter) {
            return Err(ContentError::Status {
                endpoint: format!("{}/api/v1/archive", newsletter),
                status: 500,
            });
        }
        let needle = query.to_lowercase();
        Ok(self
            .posts
            .get(newsletter)
            .map(|posts| {
                posts
                    .iter()
                    .filter(|p| p.title.to_lowercase().contains(&needle))
                    .take(limit)
                    .cloned()
                    .collect()
            })
            .unwrap_or_default())
    }

    async fn post_detail(&self, post_url: &str) -> Result<Option<PostDetail>, ContentError> {
        Ok(self.details.get(post_url).cloned())
    }

    async fn author_profile(&self, username: &str) -> Result<Option<AuthorProfile>, ContentError> {
        Ok(self.profiles.get(username).cloned())
    }

    async fn recommendations(&self, newsletter: &str) -> Result<Vec<Recommendation>, ContentError> {
        Ok(self.recommendations.get(newsletter).cloned().unwrap_or_default())
    }

    async fn newsletter_authors(
        &self,
        newsletter: &str,
    ) -> Result<Vec<NewsletterAuthor>, ContentError> {
        Ok(self.authors.get(newsletter).cloned().unwrap_or_default())
    }
}
