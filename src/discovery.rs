//! Curated newsletter catalog and discovery policy

/// Well-known newsletters, most popular first
pub const POPULAR_NEWSLETTERS: [&str; 10] = [
    "https://heathercoxrichardson.substack.com",
    "https://www.thefp.com",
    "https://www.lennysnewsletter.com",
    "https://www.astralcodexten.com",
    "https://www.slowboring.com",
    "https://www.noahpinion.blog",
    "https://newsletter.pragmaticengineer.com",
    "https://www.oneusefulthing.org",
    "https://www.honest-broker.com",
    "https://www.natesilver.net",
];

/// Category name and its newsletters in display order
pub const CATEGORIES: &[(&str, &[&str])] = &[
    (
        "technology",
        &[
            "https://newsletter.pragmaticengineer.com",
            "https://www.lennysnewsletter.com",
            "https://www.oneusefulthing.org",
            "https://www.latent.space",
            "https://www.interconnects.ai",
            "https://blog.bytebytego.com",
            "https://www.understandingai.org",
            "https://www.notboring.co",
        ],
    ),
    (
        "business",
        &[
            "https://www.thediff.co",
            "https://www.notboring.co",
            "https://www.netinterest.co",
            "https://www.exponentialview.co",
            "https://www.lennysnewsletter.com",
            "https://kyla.substack.com",
        ],
    ),
    (
        "politics",
        &[
            "https://heathercoxrichardson.substack.com",
            "https://www.slowboring.com",
            "https://www.thefp.com",
            "https://www.thebulwark.com",
            "https://www.readtangle.com",
            "https://www.natesilver.net",
        ],
    ),
    (
        "economics",
        &[
            "https://www.noahpinion.blog",
            "https://paulkrugman.substack.com",
            "https://adamtooze.substack.com",
            "https://www.apricitas.io",
            "https://www.netinterest.co",
        ],
    ),
    (
        "science",
        &[
            "https://erictopol.substack.com",
            "https://www.astralcodexten.com",
            "https://www.construction-physics.com",
            "https://www.theintrinsicperspective.com",
            "https://yourlocalepidemiologist.substack.com",
        ],
    ),
    (
        "culture",
        &[
            "https://www.honest-broker.com",
            "https://www.garbageday.email",
            "https://annehelen.substack.com",
            "https://www.blackbirdspyplane.com",
            "https://www.experimental-history.com",
        ],
    ),
];

/// Outcome of a discovery request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Discovery {
    /// Category as requested, if any
    pub category: Option<String>,
    /// False when a category was requested but is not in the catalog
    pub category_found: bool,
    pub newsletters: Vec<String>,
}

pub fn popular(limit: usize) -> Vec<String> {
    POPULAR_NEWSLETTERS
        .iter()
        .take(limit)
        .map(|s| s.to_string())
        .collect()
}

pub fn category_names() -> Vec<&'static str> {
    CATEGORIES.iter().map(|(name, _)| *name).collect()
}

/// Every catalogued newsletter, first occurrence wins, category order
pub fn all_categories_merged() -> Vec<String> {
    let mut merged: Vec<String> = Vec::new();
    for (_, newsletters) in CATEGORIES {
        for newsletter in newsletters.iter() {
            if !merged.iter().any(|m| m == newsletter) {
                merged.push(newsletter.to_string());
            }
        }
    }
    merged
}

/// Pick newsletters for a category (case-insensitive).
///
/// No category gives the popular list; an unknown one gives the merged catalog.
pub fn discover(category: Option<&str>, limit: usize) -> Discovery {
    let requested = category.map(str::trim).filter(|c| !c.is_empty());

    let Some(requested) = requested else {
        return Discovery {
            category: None,
            category_found: true,
            newsletters: popular(limit),
        };
    };

    let key = requested.to_ascii_lowercase();
    match CATEGORIES.iter().find(|(name, _)| *name == key) {
        Some((_, newsletters)) => Discovery {
            category: Some(requested.to_string()),
            category_found: true,
            newsletters: newsletters.iter().take(limit).map(|s| s.to_string()).collect(),
        },
        None => {
            let mut newsletters = all_categories_merged();
            newsletters.truncate(limit);
            Discovery {
                category: Some(requested.to_string()),
                category_found: false,
                newsletters,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_popular_list_shape() {
        assert_eq!(POPULAR_NEWSLETTERS.len(), 10);
        assert_eq!(popular(3), POPULAR_NEWSLETTERS[..3].to_vec());
        assert_eq!(popular(50).len(), 10);
    }

    #[test]
    fn test_known_category_takes_prefix() {
        let found = discover(Some("technology"), 3);
        assert!(found.category_found);
        assert_eq!(
            found.newsletters,
            vec![
                "https://newsletter.pragmaticengineer.com",
                "https://www.lennysnewsletter.com",
                "https://www.oneusefulthing.org",
            ]
        );
    }

    #[test]
    fn test_category_lookup_ignores_case() {
        let found = discover(Some("  Politics "), 2);
        assert!(found.category_found);
        assert_eq!(found.newsletters[0], "https://heathercoxrichardson.substack.com");
    }

    #[test]
    fn test_unknown_category_merges_without_duplicates() {
        let found = discover(Some("nonexistent"), 100);
        assert!(!found.category_found);
        assert_eq!(found.newsletters, all_categories_merged());

        let mut sorted = found.newsletters.clone();
        sorted.sort();
        sorted.dedup();
        assert_eq!(sorted.len(), found.newsletters.len());

        let truncated = discover(Some("nonexistent"), 4);
        assert_eq!(truncated.newsletters, found.newsletters[..4].to_vec());
    }

    #[test]
    fn test_no_category_is_popular() {
        let found = discover(None, 10);
        assert_eq!(found.newsletters, popular(10));
        assert_eq!(discover(Some(""), 2).newsletters, popular(2));
    }
}
