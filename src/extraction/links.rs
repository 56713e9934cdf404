use std::collections::HashSet;
use std::sync::LazyLock;

use crate::extraction::rules::{MatchScope, PatternSet};
use crate::models::{LinkKind, SourceLink, MAX_IMAGE_URLS, MAX_SOURCE_LINKS};

static IMAGE_PATTERNS: LazyLock<PatternSet> = LazyLock::new(|| {
    PatternSet::new(
        &[
            r"(?i)(https?://[^\s]*\.(?:jpg|jpeg|png|gif|webp|bmp)(?:\?[^\s]*)?)",
            r"(?i)(https?://[^\s]*images?[^\s]*\.(?:jpg|jpeg|png|gif|webp|bmp)(?:\?[^\s]*)?)",
            r"(?i)(https?://[^\s]*photo[^\s]*\.(?:jpg|jpeg|png|gif|webp|bmp)(?:\?[^\s]*)?)",
            r"(?i)(https?://[^\s]*image[^\s]*)",
            r#"(?i)src=["']([^"']*\.(?:jpg|jpeg|png|gif|webp|bmp)(?:\?[^"']*)?)["']"#,
        ],
        MatchScope::All,
    )
});

/// Substrings marking unsubscribe, tracking and account-management links.
const BLOCKED_KEYWORDS: &[&str] = &[
    "unsubscribe",
    "preferences",
    "privacy",
    "feedback",
    "nmlsconsumer",
    "terms",
    "policy",
    "manage",
    "notification",
    "email",
    "optout",
    "unsub",
    "settings",
    "track",
    "click",
    "pixel",
    "analytics",
    "campaign",
    "utm_",
    "redirect",
    "mail.",
    "token=",
    "rtoken=",
];

const LISTING_DOMAINS: &[&str] = &[
    "zillow", "realtor", "redfin", "mls", "trulia", "homes.com", "movoto",
];
const TRACKING_HINTS: &[&str] = &["click", "track", "email", "campaign"];
const COMPANY_HINTS: &[&str] = &["company", "agent", "broker", "realty"];
const PROPERTY_HINTS: &[&str] = &["property", "home", "house", "listing"];

/// Collects image URLs, first seen first, deduplicated and capped at three.
pub fn extract_images(text: &str) -> Vec<String> {
    let mut seen = HashSet::new();
    IMAGE_PATTERNS
        .all_captures(text)
        .filter(|url| url.starts_with("http"))
        .filter(|url| seen.insert(url.to_string()))
        .take(MAX_IMAGE_URLS)
        .map(str::to_string)
        .collect()
}

/// Collects the URLs matched by `patterns`, drops blocked and uncategorizable
/// ones, and keeps the first three.
pub fn extract_source_links(patterns: &PatternSet, text: &str) -> Vec<SourceLink> {
    let mut seen = HashSet::new();
    let mut links = Vec::new();

    for url in patterns.all_captures(text) {
        if !url.starts_with("http") || !seen.insert(url.to_string()) {
            continue;
        }
        match classify_link(url) {
            Some(link) => links.push(link),
            None => tracing::debug!("Dropped link: {}", url),
        }
        if links.len() == MAX_SOURCE_LINKS {
            break;
        }
    }

    links
}

/// Categorizes a link, returning `None` for blocked or unrelated URLs.
pub fn classify_link(url: &str) -> Option<SourceLink> {
    let lower = url.to_lowercase();
    let contains_any = |needles: &[&str]| needles.iter().any(|n| lower.contains(n));

    if contains_any(BLOCKED_KEYWORDS) {
        return None;
    }

    let (kind, description) = if contains_any(LISTING_DOMAINS) {
        if contains_any(TRACKING_HINTS) {
            return None;
        }
        (LinkKind::Listing, Some("Property listing"))
    } else if contains_any(COMPANY_HINTS) {
        (LinkKind::Company, Some("Real estate company"))
    } else if contains_any(PROPERTY_HINTS) {
        (LinkKind::External, None)
    } else {
        return None;
    };

    Some(SourceLink {
        url: url.to_string(),
        kind,
        description: description.map(str::to_string),
    })
}
