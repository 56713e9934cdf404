//! Extraction for email alerts and free-form listing text.

use std::sync::LazyLock;

use crate::extraction::links::{extract_images, extract_source_links};
use crate::extraction::normalize::{
    normalize_property_type, or_not_available, split_address, state_name, truncate_description,
};
use crate::extraction::rules::{to_count, MatchScope, PatternSet};
use crate::models::{ListingRecord, NOT_AVAILABLE};

const DEFAULT_DESCRIPTION: &str = "Property listing details";

fn search(patterns: &[&str]) -> PatternSet {
    PatternSet::new(patterns, MatchScope::First)
}

static ADDRESS: LazyLock<PatternSet> = LazyLock::new(|| {
    search(&[
        r"(?i)\*\*Property Address:\*\*\s*(.*)",
        r"(?i)Address[:：]\s*([^\n\r]+)",
        r"(?i)Property Location[:：]\s*([^\n\r]+)",
        r"(?i)Located at[:：]?\s*([^\n\r]+)",
        r"(?i)(\d+\s+[^\n\r,]+,\s*[^\n\r,]+,\s*[A-Z]{2}\s*\d{5})",
        r"(?i)Property:\s*([^\n\r]+(?:St|Ave|Rd|Dr|Ln|Blvd|Way|Ct)[^\n\r]*)",
    ])
});

static PROPERTY_TYPE: LazyLock<PatternSet> = LazyLock::new(|| {
    search(&[
        r"(?i)\*\*Property Type:\*\*\s*(.*)",
        r"(?i)Type[:：]\s*([^\n\r]+)",
        r"(?i)Property Type[:：]\s*([^\n\r]+)",
        r"(?i)(Single Family|Multifamily|Multi[- ]Family|Townhouse|Condo|Duplex|Triplex|Fourplex|SFR|MFR)(?:\s+(?:Home|House|Property|Residence))?",
        r"(?i)Style[:：]\s*(Single Family|Multifamily|Multi Family|Townhouse|Condo|SFR|MFR)",
    ])
});

static PRICE: LazyLock<PatternSet> = LazyLock::new(|| {
    search(&[
        r"(?i)\*\*Purchase Price:\*\*\s*\$?([\d,]+)",
        r"(?i)Purchase Price[:：]\s*\$?([\d,]+)",
        r"(?i)Listing Price[:：]\s*\$?([\d,]+)",
        r"(?i)Asking Price[:：]\s*\$?([\d,]+)",
        r"(?i)Price[:：]\s*\$?([\d,]+)",
        r"(?i)List Price[:：]\s*\$?([\d,]+)",
        r"(?i)\$\s*([\d,]+)(?:\s*-\s*list|listing|asking)",
    ])
});

static RENT: LazyLock<PatternSet> = LazyLock::new(|| {
    search(&[
        r"(?i)\*\*Estimated Monthly Rent:\*\*\s*\$?([\d,]+)",
        r"(?i)Monthly Rent[:：]\s*\$?([\d,]+)",
        r"(?i)Rent[:：]\s*\$?([\d,]+)(?:\s*/month|\s*per month|\s*monthly)?",
        r"(?i)Estimated Rent[:：]\s*\$?([\d,]+)",
        r"(?i)Projected Rent[:：]\s*\$?([\d,]+)",
        r"(?i)\$\s*([\d,]+)(?:\s*/mo|\s*per month|\s*monthly|\s*rent)",
    ])
});

static BEDROOMS: LazyLock<PatternSet> = LazyLock::new(|| {
    search(&[
        r"(?i)\*\*Bedrooms:\*\*\s*(\d+)",
        r"(?i)Bedrooms?[:：]\s*(\d+)",
        r"(?i)(\d+)\s*(?:bed|bedroom|br)s?",
        r"(?i)Beds?[:：]\s*(\d+)",
    ])
});

static BATHROOMS: LazyLock<PatternSet> = LazyLock::new(|| {
    search(&[
        r"(?i)\*\*Bathrooms:\*\*\s*([\d.]+)",
        r"(?i)Bathrooms?[:：]\s*([\d.]+)",
        r"(?i)([\d.]+)\s*(?:bath|bathroom|ba)s?",
        r"(?i)Baths?[:：]\s*([\d.]+)",
    ])
});

static SQUARE_FOOTAGE: LazyLock<PatternSet> = LazyLock::new(|| {
    search(&[
        r"(?i)\*\*Square Footage:\*\*\s*([\d,]+)\s*sqft",
        r"(?i)Square Footage[:：]\s*([\d,]+)",
        r"(?i)([\d,]+)\s*(?:sq\.?\s*ft\.?|sqft|square feet)",
        r"(?i)Size[:：]\s*([\d,]+)\s*(?:sq\.?\s*ft\.?|sqft)",
        r"(?i)(\d{3,5})\s*(?:sf|sq\.ft\.)",
    ])
});

static LOT_SIZE: LazyLock<PatternSet> = LazyLock::new(|| {
    search(&[
        r"(?i)\*\*Lot Size:\*\*\s*([\d,]+)\s*(?:sq\.?\s*ft\.?|sqft|square feet)?",
        r"(?i)Lot Size[:：]\s*([\d,]+)",
        r"(?i)Lot[:：]\s*([\d,]+)\s*(?:sq\.?\s*ft\.?|sqft|square feet)",
        r"(?i)Land Size[:：]\s*([\d,]+)",
        r"(?i)([\d,]+)\s*(?:sq\.?\s*ft\.?|sqft)\s*lot",
    ])
});

static YEAR_BUILT: LazyLock<PatternSet> = LazyLock::new(|| {
    search(&[
        r"(?i)\*\*Year Built:\*\*\s*(\d{4})",
        r"(?i)Year Built[:：]\s*(\d{4})",
        r"(?i)Built[:：]?\s*(?:in\s*)?(\d{4})",
        r"(?i)(\d{4})\s*built",
        r"(?i)Age[:：]\s*\d+\s*(?:years?)?\s*\((\d{4})\)",
    ])
});

const URL_PATTERNS: &[&str] = &[
    r"(?i)\*\*Listing URL:\*\*\s*(.*)",
    r"(?i)(?:Listing\s+)?URL[:：]\s*([^\s]+)",
    r"(?i)(?:View|See)\s+(?:listing|property)[:：]?\s*([^\s]+)",
    r"(?i)(https?://[^\s]+)",
    r"(?i)Link[:：]\s*([^\s]+)",
];

static URL: LazyLock<PatternSet> = LazyLock::new(|| search(URL_PATTERNS));

/// Link harvesting walks every match, not only the first of each pattern.
static LINKS: LazyLock<PatternSet> =
    LazyLock::new(|| PatternSet::new(URL_PATTERNS, MatchScope::All));

/// A label that opens a description, and the markers that close it.
struct DescriptionRule {
    label: &'static str,
    terminators: &'static [&'static str],
}

const DESCRIPTION_RULES: &[DescriptionRule] = &[
    DescriptionRule {
        label: r"(?i)\*\*Description:\*\*\s*",
        terminators: &["\n\n**", "contact us", "sincerely", "best regards"],
    },
    DescriptionRule {
        label: r"(?i)Description[:：]\s*",
        terminators: &["\n\n", "contact", "sincerely", "best regards"],
    },
    DescriptionRule {
        label: r"(?i)Details[:：]\s*",
        terminators: &["\n\n", "contact", "sincerely", "best regards"],
    },
];

static DESCRIPTION_LABELS: LazyLock<Vec<regex::Regex>> = LazyLock::new(|| {
    DESCRIPTION_RULES
        .iter()
        .map(|r| regex::Regex::new(r.label).expect("invalid built-in description label"))
        .collect()
});

/// Captures the text after a description label up to the earliest terminator
/// (case-insensitive) or the end of input.
pub fn extract_description(text: &str) -> Option<String> {
    DESCRIPTION_RULES
        .iter()
        .zip(DESCRIPTION_LABELS.iter())
        .find_map(|(rule, label)| {
            let start = label.find(text)?.end();
            let rest = &text[start..];
            // ASCII lowering keeps byte offsets aligned with `rest`.
            let lowered = rest.to_ascii_lowercase();
            let end = rule
                .terminators
                .iter()
                .filter_map(|t| lowered.find(t))
                .min()
                .unwrap_or(rest.len());
            let captured = rest[..end].trim();
            (!captured.is_empty()).then(|| captured.to_string())
        })
}

/// Parses an email alert or plain-text listing into a record.
pub fn parse_listing_text(text: &str) -> ListingRecord {
    let address = ADDRESS.text(text);
    let parts = address.as_deref().map(split_address);

    let property_type = PROPERTY_TYPE
        .text(text)
        .map(|raw| normalize_property_type(&raw));

    let mut square_footage = SQUARE_FOOTAGE.number(text).map(to_count).unwrap_or(0);
    let lot_size = LOT_SIZE
        .number(text)
        .map(to_count)
        .filter(|size| *size > 0);
    if square_footage == 0 {
        if let Some(lot) = lot_size {
            tracing::debug!("Square footage missing, using lot size {}", lot);
            square_footage = lot;
        }
    }

    let description = extract_description(text)
        .map(|d| truncate_description(&d))
        .unwrap_or_else(|| DEFAULT_DESCRIPTION.to_string());

    let record = ListingRecord {
        address: or_not_available(address),
        city: or_not_available(parts.as_ref().and_then(|p| p.city.clone())),
        state: state_name(
            parts.as_ref().and_then(|p| p.state_abbr.as_deref()),
            NOT_AVAILABLE,
        ),
        zip_code: or_not_available(parts.as_ref().and_then(|p| p.zip_code.clone())),
        property_type: property_type.unwrap_or_else(|| normalize_property_type("")),
        purchase_price: PRICE.number(text).unwrap_or(0.0),
        monthly_rent: RENT.number(text).unwrap_or(0.0),
        bedrooms: BEDROOMS.number(text).map(to_count).unwrap_or(0),
        bathrooms: BATHROOMS.number(text).unwrap_or(0.0),
        square_footage,
        lot_size,
        year_built: YEAR_BUILT.number(text).map(to_count).unwrap_or(0),
        description,
        listing_url: or_not_available(URL.text(text)),
        image_urls: extract_images(text),
        source_links: extract_source_links(&LINKS, text),
        ..ListingRecord::default()
    };

    tracing::debug!(
        "Parsed listing text: address={}, price={}, rent={}",
        record.address,
        record.purchase_price,
        record.monthly_rent
    );
    record
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALERT: &str = "New listing alert!\n\
**Property Address:** 123 Main St, Springfield, IL 62704\n\
**Property Type:** SFR\n\
**Purchase Price:** $150,000\n\
**Estimated Monthly Rent:** $1,600\n\
**Bedrooms:** 3\n\
**Bathrooms:** 2.5\n\
**Square Footage:** 1,450 sqft\n\
**Year Built:** 1978\n\
**Listing URL:** https://www.zillow.com/homedetails/123-main-st\n\
**Description:** Updated kitchen, fenced yard.\n\nContact us for a showing.\n";

    #[test]
    fn test_labelled_alert() {
        let record = parse_listing_text(ALERT);

        assert_eq!(record.address, "123 Main St, Springfield, IL 62704");
        assert_eq!(record.city, "Springfield");
        assert_eq!(record.state, "Illinois");
        assert_eq!(record.zip_code, "62704");
        assert_eq!(record.property_type, "single-family");
        assert_eq!(record.purchase_price, 150000.0);
        assert_eq!(record.monthly_rent, 1600.0);
        assert_eq!(record.bedrooms, 3);
        assert_eq!(record.bathrooms, 2.5);
        assert_eq!(record.square_footage, 1450);
        assert_eq!(record.year_built, 1978);
        assert_eq!(
            record.listing_url,
            "https://www.zillow.com/homedetails/123-main-st"
        );
        assert_eq!(record.description, "Updated kitchen, fenced yard.");
        assert_eq!(record.source_links.len(), 1);
    }

    #[test]
    fn test_empty_text_uses_defaults() {
        let record = parse_listing_text("");

        assert_eq!(record.address, "N/A");
        assert_eq!(record.city, "N/A");
        assert_eq!(record.state, "N/A");
        assert_eq!(record.zip_code, "N/A");
        assert_eq!(record.property_type, "single-family");
        assert_eq!(record.purchase_price, 0.0);
        assert_eq!(record.description, "Property listing details");
        assert_eq!(record.listing_url, "N/A");
    }

    #[test]
    fn test_lot_size_fallback() {
        let record = parse_listing_text("Price: $80,000\nLot Size: 7,200");
        assert_eq!(record.lot_size, Some(7200));
        assert_eq!(record.square_footage, 7200);
    }

    #[test]
    fn test_unknown_state_passes_through() {
        let record = parse_listing_text("Address: 9 Elm Rd, Toronto, ON M5V");
        assert_eq!(record.city, "Toronto");
        assert_eq!(record.state, "ON");
        assert_eq!(record.zip_code, "M5V");
    }

    #[test]
    fn test_description_stops_at_sign_off() {
        let text = "Details: Roof replaced in 2020. Sincerely, The Team";
        assert_eq!(
            extract_description(text).as_deref(),
            Some("Roof replaced in 2020.")
        );
    }
}
