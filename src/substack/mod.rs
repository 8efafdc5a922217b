//! Substack platform access

pub mod client;
pub mod types;
pub mod url;

#[cfg(test)]
pub mod fake;

pub use client::{ContentError, ContentSource, SubstackClient};
pub use types::{AuthorProfile, PostSummary, Sorting};
