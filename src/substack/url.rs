//! Newsletter and post reference helpers

use super::client::ContentError;
use url::Url;

/// Reduce a newsletter reference to its origin (`scheme://host[:port]`)
pub fn newsletter_origin(newsletter: &str) -> Result<String, ContentError> {
    let parsed = Url::parse(newsletter)
        .map_err(|e| ContentError::InvalidReference(format!("{}: {}", newsletter, e)))?;
    let origin = parsed.origin();
    if !origin.is_tuple() {
        return Err(ContentError::InvalidReference(newsletter.to_string()));
    }
    Ok(origin.ascii_serialization())
}

/// Split a post URL into the newsletter origin and the post slug.
///
/// `https://example.substack.com/p/my-post?utm=x` -> (`https://example.substack.com`, `my-post`)
pub fn post_slug(post_url: &str) -> Result<(String, String), ContentError> {
    let parsed = Url::parse(post_url)
        .map_err(|e| ContentError::InvalidReference(format!("{}: {}", post_url, e)))?;

    let segments: Vec<&str> = parsed
        .path_segments()
        .map(|s| s.filter(|seg| !seg.is_empty()).collect())
        .unwrap_or_default();

    let slug = segments
        .iter()
        .position(|seg| *seg == "p")
        .and_then(|idx| segments.get(idx + 1))
        .ok_or_else(|| {
            ContentError::InvalidReference(format!("{} is not a post URL (expected /p/<slug>)", post_url))
        })?;

    Ok((newsletter_origin(post_url)?, slug.to_string()))
}

/// Public URL of a publication from its subdomain and optional custom domain
pub fn publication_url(subdomain: Option<&str>, custom_domain: Option<&str>) -> Option<String> {
    match (custom_domain.filter(|d| !d.is_empty()), subdomain.filter(|s| !s.is_empty())) {
        (Some(domain), _) => Some(format!("https://{}", domain)),
        (None, Some(sub)) => Some(format!("https://{}.substack.com", sub)),
        (None, None) => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_newsletter_origin_strips_path() {
        assert_eq!(
            newsletter_origin("https://example.substack.com/archive?sort=new").unwrap(),
            "https://example.substack.com"
        );
        assert_eq!(newsletter_origin("http://127.0.0.1:8080").unwrap(), "http://127.0.0.1:8080");
    }

    #[test]
    fn test_post_slug() {
        let (origin, slug) = post_slug("https://www.slowboring.com/p/the-case-for-more?utm_source=x").unwrap();
        assert_eq!(origin, "https://www.slowboring.com");
        assert_eq!(slug, "the-case-for-more");

        assert!(post_slug("https://www.slowboring.com/archive").is_err());
        assert!(post_slug("https://www.slowboring.com/p/").is_err());
        assert!(post_slug("not a url").is_err());
    }

    #[test]
    fn test_publication_url() {
        assert_eq!(
            publication_url(Some("noahpinion"), Some("www.noahpinion.blog")).as_deref(),
            Some("https://www.noahpinion.blog")
        );
        assert_eq!(
            publication_url(Some("kyla"), None).as_deref(),
            Some("https://kyla.substack.com")
        );
        assert_eq!(publication_url(Some("kyla"), Some("")).as_deref(), Some("https://kyla.substack.com"));
        assert_eq!(publication_url(None, None), None);
    }
}
