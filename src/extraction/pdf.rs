//! Extraction for text pulled out of PDF listing sheets.
//!
//! PDF text loses its layout, so patterns here are looser than the email ones
//! and every match of a pattern is considered. Property type and square
//! footage get a second pass over the header region (title lines), where
//! flyers usually state them.

use std::sync::LazyLock;

use crate::extraction::normalize::{normalize_property_type, state_name, DEFAULT_PROPERTY_TYPE};
use crate::extraction::rules::{to_count, MatchScope, PatternSet};
use crate::models::{ListingRecord, NOT_AVAILABLE, UNKNOWN};

/// Square footage below this is assumed to be a street number or similar.
pub const MIN_PLAUSIBLE_SQFT: u32 = 500;

const UNKNOWN_ADDRESS: &str = "Unknown Address";
const UNKNOWN_ZIP: &str = "00000";
const PDF_DESCRIPTION: &str = "Property details extracted from PDF";
const EMPTY_PDF_DESCRIPTION: &str = "PDF parsing failed - no extractable text found";

fn scan(patterns: &[&str]) -> PatternSet {
    PatternSet::new(patterns, MatchScope::All)
}

static ADDRESS: LazyLock<PatternSet> = LazyLock::new(|| {
    scan(&[
        r"(?im)(?:Address|Property Address|Location)[:=]?\s*([^\n\r]+(?:Street|St|Avenue|Ave|Road|Rd|Drive|Dr|Lane|Ln|Boulevard|Blvd|Way|Court|Ct|Place|Pl)[^\n\r]*)",
        r"(?im)(\d+\s+[^\n\r,]+(?:Street|St|Avenue|Ave|Road|Rd|Drive|Dr|Lane|Ln|Boulevard|Blvd|Way|Court|Ct|Place|Pl)[^\n\r,]*)",
        r"(?im)(?:Property)[:=]?\s*([^\n\r]+)",
        r"(?im)(\d+\s+[A-Za-z\s]+(?:Street|St|Avenue|Ave|Road|Rd|Drive|Dr|Lane|Ln|Boulevard|Blvd|Way|Court|Ct|Place|Pl))",
    ])
});

static PRICE: LazyLock<PatternSet> = LazyLock::new(|| {
    scan(&[
        r"(?im)(?:Price|Purchase Price|Listing Price|Asking Price|List Price|Sale Price)[:=]?\s*\$?([\d,]+)",
        r"(?im)\$\s*([\d,]+)(?:\s*(?:price|list|asking|purchase))?",
        r"(?im)([\d,]+)\s*(?:dollars?|USD)",
        r"(?im)\$([\d,]+)",
    ])
});

static RENT: LazyLock<PatternSet> = LazyLock::new(|| {
    scan(&[
        r"(?im)(?:Rent|Monthly Rent|Rental|Rental Income)[:=]?\s*\$?([\d,]+)",
        r"(?im)\$\s*([\d,]+)\s*(?:per month|/month|monthly|rent)",
        r"(?im)(?:Monthly)[:=]?\s*\$?([\d,]+)",
    ])
});

const TYPE_WORDS: &str = "Single Family|Multifamily|Multi[- ]?Family|Townhouse|Condo|Duplex|Triplex|Fourplex|SFR|MFR";

static PROPERTY_TYPE: LazyLock<PatternSet> = LazyLock::new(|| {
    let bare = format!(r"(?im)({TYPE_WORDS})(?:\s+(?:Home|House|Property|Residence))?");
    scan(&[
        r"(?im)(?:Type|Property Type)[:=]?\s*([^\n\r]+?)(?:\n|$|,)",
        bare.as_str(),
        r"(?im)(?:Style)[:=]?\s*([^\n\r]+)",
    ])
});

static HEADER_PROPERTY_TYPE: LazyLock<PatternSet> = LazyLock::new(|| {
    let title_line = format!(r"(?im)^.*?({TYPE_WORDS}).*?$");
    let bare = format!(r"(?im)({TYPE_WORDS})(?:\s+(?:Home|House|Property|Residence|Listing))?");
    let banner = format!(r"(?im)(?:FOR SALE|LISTING).*?({TYPE_WORDS})");
    scan(&[title_line.as_str(), bare.as_str(), banner.as_str()])
});

static BEDROOMS: LazyLock<PatternSet> = LazyLock::new(|| {
    scan(&[
        r"(?im)(?:Bedrooms?|Beds?)[:=]?\s*(\d+)",
        r"(?im)(\d+)\s*(?:bed|bedroom|br)s?",
        r"(?im)(\d+)\s*BR",
    ])
});

static BATHROOMS: LazyLock<PatternSet> = LazyLock::new(|| {
    scan(&[
        r"(?im)(?:Bathrooms?|Baths?)[:=]?\s*([\d.]+)",
        r"(?im)([\d.]+)\s*(?:bath|bathroom|ba)s?",
        r"(?im)([\d.]+)\s*BA",
    ])
});

static SQUARE_FOOTAGE: LazyLock<PatternSet> = LazyLock::new(|| {
    scan(&[
        r"(?im)(?:Square Feet|Square Footage|Size|Sq\.?\s*Ft\.?)[:=]?\s*([\d,]+)",
        r"(?im)([\d,]+)\s*(?:sq\.?\s*ft\.?|sqft|square feet|sf)",
        r"(?im)(\d{3,5})\s*(?:SF|sq\s*ft)",
    ])
});

// Anchored to a property keyword, a dash separator or a standalone "SF" unit
// so that house numbers ("1200 Street") are not read as footage.
static HEADER_SQUARE_FOOTAGE: LazyLock<PatternSet> = LazyLock::new(|| {
    scan(&[
        r"(?im)(?:Property|Home|House).*?(\d{1,2},\d{3})\s*(?:sq\.?\s*ft\.?|sqft|SF|square feet)",
        r"(?im)(?:Property|Home|House).*?(\d{3,5})\s*(?:sq\.?\s*ft\.?|sqft|SF|square feet)",
        r"(?im).*?(\d{1,2},\d{3})\s*(?:sq\.?\s*ft\.?|sqft|SF)\s*(?:Property|Home|House)",
        r"(?im).*?(\d{3,5})\s*(?:sq\.?\s*ft\.?|sqft|SF)\s*(?:Property|Home|House)",
        r"(?im)-\s*(\d{1,2},\d{3})\s*(?:sq\.?\s*ft\.?|sqft|SF)",
        r"(?im)-\s*(\d{3,5})\s*(?:sq\.?\s*ft\.?|sqft|SF)",
        r"(?im)(\d{1,2},\d{3})\s*SF(?:\W|$)",
        r"(?im)(\d{3,5})\s*SF(?:\W|$)",
    ])
});

static LOT_SIZE: LazyLock<PatternSet> = LazyLock::new(|| {
    scan(&[
        r"(?im)(?:Lot Size|Lot|Land Size)[:=]?\s*([\d,]+)\s*(?:sq\.?\s*ft\.?|sqft|square feet|sf)?",
        r"(?im)([\d,]+)\s*(?:sq\.?\s*ft\.?|sqft)\s*lot",
        r"(?im)Lot[:=]?\s*([\d,]+)",
    ])
});

static YEAR_BUILT: LazyLock<PatternSet> = LazyLock::new(|| {
    scan(&[
        r"(?im)(?:Year Built|Built|Construction Year)[:=]?\s*(\d{4})",
        r"(?im)(\d{4})\s*built",
        r"(?im)Built\s*(?:in\s*)?(\d{4})",
    ])
});

static CITY: LazyLock<PatternSet> = LazyLock::new(|| {
    scan(&[
        r"(?im)(?:City)[:=]?\s*([^\n\r,]+?)(?:,|\n|$)",
        r"(?im),\s*([A-Za-z\s]+),\s*[A-Z]{2}\s*\d{5}",
    ])
});

static STATE: LazyLock<PatternSet> = LazyLock::new(|| {
    scan(&[
        r"(?im)(?:State)[:=]?\s*([A-Z]{2})",
        r"(?im),\s*[A-Za-z\s]+,\s*([A-Z]{2})\s*\d{5}",
    ])
});

static ZIP: LazyLock<PatternSet> = LazyLock::new(|| {
    scan(&[
        r"(?im)(?:ZIP|Zip Code|Postal Code)[:=]?\s*(\d{5})",
        r"(?im),\s*[A-Z]{2}\s*(\d{5})",
    ])
});

/// The first `max_lines` lines of the document.
pub fn header_region(text: &str, max_lines: usize) -> String {
    text.split('\n').take(max_lines).collect::<Vec<_>>().join("\n")
}

/// Square footage from the body, re-checked against the header region when
/// the body value is missing or implausibly small.
pub fn resolve_square_footage(text: &str, header: &str) -> u32 {
    let body = SQUARE_FOOTAGE.number(text).map(to_count).unwrap_or(0);
    if body >= MIN_PLAUSIBLE_SQFT {
        return body;
    }

    let from_header = HEADER_SQUARE_FOOTAGE.number(header).map(to_count).unwrap_or(0);
    if from_header > body {
        tracing::debug!(
            "Square footage {} looks implausible, using header value {}",
            body,
            from_header
        );
        from_header
    } else {
        body
    }
}

/// Parses PDF-extracted text into a record.
pub fn parse_pdf_text(text: &str, header_lines: usize) -> ListingRecord {
    if text.trim().is_empty() {
        tracing::warn!("PDF contained no extractable text");
        return empty_pdf_record();
    }

    let header = header_region(text, header_lines);

    let raw_type = PROPERTY_TYPE
        .text(text)
        .or_else(|| HEADER_PROPERTY_TYPE.text(&header))
        .unwrap_or_else(|| DEFAULT_PROPERTY_TYPE.to_string());

    let mut square_footage = resolve_square_footage(text, &header);
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

    let record = ListingRecord {
        address: ADDRESS
            .text(text)
            .unwrap_or_else(|| UNKNOWN_ADDRESS.to_string()),
        city: CITY.text(text).unwrap_or_else(|| UNKNOWN.to_string()),
        state: state_name(STATE.text(text).as_deref(), UNKNOWN),
        zip_code: ZIP.text(text).unwrap_or_else(|| UNKNOWN_ZIP.to_string()),
        property_type: normalize_property_type(&raw_type),
        purchase_price: PRICE.number(text).unwrap_or(0.0),
        monthly_rent: RENT.number(text).unwrap_or(0.0),
        bedrooms: BEDROOMS.number(text).map(to_count).unwrap_or(0),
        bathrooms: BATHROOMS.number(text).unwrap_or(0.0),
        square_footage,
        lot_size,
        year_built: YEAR_BUILT.number(text).map(to_count).unwrap_or(0),
        description: PDF_DESCRIPTION.to_string(),
        listing_url: NOT_AVAILABLE.to_string(),
        ..ListingRecord::default()
    };

    tracing::debug!(
        "Parsed PDF text: address={}, price={}, sqft={}",
        record.address,
        record.purchase_price,
        record.square_footage
    );
    record
}

fn empty_pdf_record() -> ListingRecord {
    ListingRecord {
        address: UNKNOWN_ADDRESS.to_string(),
        city: UNKNOWN.to_string(),
        state: UNKNOWN.to_string(),
        zip_code: UNKNOWN_ZIP.to_string(),
        property_type: "unknown".to_string(),
        description: EMPTY_PDF_DESCRIPTION.to_string(),
        listing_url: NOT_AVAILABLE.to_string(),
        ..ListingRecord::default()
    }
}
