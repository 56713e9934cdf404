use std::borrow::Cow;

use crate::models::{MAX_DESCRIPTION_CHARS, NOT_AVAILABLE};

/// Canonical tag used when no property type is given.
pub const DEFAULT_PROPERTY_TYPE: &str = "single-family";

/// Maps free-text property types onto the canonical tag vocabulary.
///
/// Abbreviations (SFR, MF, ...), "single"/"multi" + "family" cues and common
/// synonyms are recognized case-insensitively. Anything else is lower-cased
/// with spaces turned into hyphens.
pub fn normalize_property_type(raw: &str) -> String {
    let normalized = raw.trim().to_lowercase();
    if normalized.is_empty() {
        return DEFAULT_PROPERTY_TYPE.to_string();
    }

    let tag = match normalized.as_str() {
        "sfr" | "sf" | "single family residential" | "single family" | "singlefamily" => {
            "single-family"
        }
        "mfr" | "mf" | "multi family residential" | "multifamily residential"
        | "multifamily" | "multi family" => "multi-family",
        s if s.contains("single") && s.contains("family") => "single-family",
        s if s.contains("multi") && s.contains("family") => "multi-family",
        "townhouse" | "townhome" | "town home" => "townhouse",
        "condo" | "condominium" => "condo",
        "duplex" => "duplex",
        "triplex" => "triplex",
        "fourplex" | "4plex" => "fourplex",
        other => return other.replace(' ', "-"),
    };
    tag.to_string()
}

const STATES: [(&str, &str); 50] = [
    ("AL", "Alabama"),
    ("AK", "Alaska"),
    ("AZ", "Arizona"),
    ("AR", "Arkansas"),
    ("CA", "California"),
    ("CO", "Colorado"),
    ("CT", "Connecticut"),
    ("DE", "Delaware"),
    ("FL", "Florida"),
    ("GA", "Georgia"),
    ("HI", "Hawaii"),
    ("ID", "Idaho"),
    ("IL", "Illinois"),
    ("IN", "Indiana"),
    ("IA", "Iowa"),
    ("KS", "Kansas"),
    ("KY", "Kentucky"),
    ("LA", "Louisiana"),
    ("ME", "Maine"),
    ("MD", "Maryland"),
    ("MA", "Massachusetts"),
    ("MI", "Michigan"),
    ("MN", "Minnesota"),
    ("MS", "Mississippi"),
    ("MO", "Missouri"),
    ("MT", "Montana"),
    ("NE", "Nebraska"),
    ("NV", "Nevada"),
    ("NH", "New Hampshire"),
    ("NJ", "New Jersey"),
    ("NM", "New Mexico"),
    ("NY", "New York"),
    ("NC", "North Carolina"),
    ("ND", "North Dakota"),
    ("OH", "Ohio"),
    ("OK", "Oklahoma"),
    ("OR", "Oregon"),
    ("PA", "Pennsylvania"),
    ("RI", "Rhode Island"),
    ("SC", "South Carolina"),
    ("SD", "South Dakota"),
    ("TN", "Tennessee"),
    ("TX", "Texas"),
    ("UT", "Utah"),
    ("VT", "Vermont"),
    ("VA", "Virginia"),
    ("WA", "Washington"),
    ("WV", "West Virginia"),
    ("WI", "Wisconsin"),
    ("WY", "Wyoming"),
];

/// Expands a two-letter state abbreviation to its full name.
///
/// Unknown values pass through verbatim; `None` or the `absent` placeholder
/// itself yields `absent`.
pub fn state_name(abbr: Option<&str>, absent: &str) -> String {
    let Some(abbr) = abbr.map(str::trim).filter(|a| !a.is_empty() && *a != absent) else {
        return absent.to_string();
    };
    STATES
        .iter()
        .find(|(code, _)| code.eq_ignore_ascii_case(abbr))
        .map(|(_, name)| name.to_string())
        .unwrap_or_else(|| abbr.to_string())
}

/// City, state abbreviation and zip split out of a one-line address.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AddressParts {
    pub city: Option<String>,
    pub state_abbr: Option<String>,
    pub zip_code: Option<String>,
}

/// Splits "123 Main St, Springfield, IL 62704" on ", ".
///
/// Three or more parts give city, state and zip; two parts give the city only.
pub fn split_address(address: &str) -> AddressParts {
    let parts: Vec<&str> = address.split(", ").collect();
    match parts.len() {
        n if n >= 3 => {
            let mut state_zip = parts[2].split_whitespace();
            AddressParts {
                city: non_empty(parts[1]),
                state_abbr: state_zip.next().map(str::to_string),
                zip_code: state_zip.next().map(str::to_string),
            }
        }
        2 => AddressParts {
            city: non_empty(parts[1]),
            state_abbr: None,
            zip_code: None,
        },
        _ => AddressParts {
            city: None,
            state_abbr: None,
            zip_code: None,
        },
    }
}

fn non_empty(part: &str) -> Option<String> {
    let part = part.trim();
    (!part.is_empty()).then(|| part.to_string())
}

/// Caps a description at 500 characters, ending truncated text with "...".
pub fn truncate_description(description: &str) -> String {
    if description.chars().count() <= MAX_DESCRIPTION_CHARS {
        return description.to_string();
    }
    let mut out: String = description.chars().take(MAX_DESCRIPTION_CHARS - 3).collect();
    out.push_str("...");
    out
}

/// Rewrites CRLF and lone CR line breaks as LF.
pub fn normalize_line_endings(text: &str) -> Cow<'_, str> {
    if !text.contains('\r') {
        return Cow::Borrowed(text);
    }
    Cow::Owned(text.replace("\r\n", "\n").replace('\r', "\n"))
}

/// Placeholder-aware helper for optional text parts.
pub fn or_not_available(value: Option<String>) -> String {
    value.unwrap_or_else(|| NOT_AVAILABLE.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_family_synonyms() {
        for raw in ["SFR", "sf", "Single Family Residential", "single family", "SingleFamily"] {
            assert_eq!(normalize_property_type(raw), "single-family", "{}", raw);
        }
        assert_eq!(normalize_property_type("Single-Family Home"), "single-family");
    }

    #[test]
    fn test_multi_family_synonyms() {
        for raw in ["MFR", "mf", "Multifamily", "Multi Family Residential", "multi-family"] {
            assert_eq!(normalize_property_type(raw), "multi-family", "{}", raw);
        }
    }

    #[test]
    fn test_other_types() {
        assert_eq!(normalize_property_type("Townhome"), "townhouse");
        assert_eq!(normalize_property_type("Condominium"), "condo");
        assert_eq!(normalize_property_type("4plex"), "fourplex");
        assert_eq!(normalize_property_type("Mobile Home"), "mobile-home");
        assert_eq!(normalize_property_type("   "), "single-family");
    }

    #[test]
    fn test_state_lookup() {
        assert_eq!(state_name(Some("IL"), "N/A"), "Illinois");
        assert_eq!(state_name(Some("tx"), "N/A"), "Texas");
        assert_eq!(state_name(Some("ZZ"), "N/A"), "ZZ");
        assert_eq!(state_name(None, "Unknown"), "Unknown");
        assert_eq!(state_name(Some("N/A"), "N/A"), "N/A");
    }

    #[test]
    fn test_split_address_three_parts() {
        let parts = split_address("123 Main St, Springfield, IL 62704");
        assert_eq!(parts.city.as_deref(), Some("Springfield"));
        assert_eq!(parts.state_abbr.as_deref(), Some("IL"));
        assert_eq!(parts.zip_code.as_deref(), Some("62704"));
    }

    #[test]
    fn test_split_address_two_parts() {
        let parts = split_address("123 Main St, Springfield");
        assert_eq!(parts.city.as_deref(), Some("Springfield"));
        assert_eq!(parts.state_abbr, None);
        assert_eq!(parts.zip_code, None);
    }

    #[test]
    fn test_split_address_blank_city() {
        let parts = split_address("123 Main St, , IL 62704");
        assert_eq!(parts.city, None);
        assert_eq!(parts.state_abbr.as_deref(), Some("IL"));
    }

    #[test]
    fn test_split_address_single_part() {
        let parts = split_address("123 Main St");
        assert_eq!(parts.city, None);
        assert_eq!(parts.state_abbr, None);
    }

    #[test]
    fn test_truncate_description() {
        let short = "Charming bungalow";
        assert_eq!(truncate_description(short), short);

        let long = "x".repeat(600);
        let cut = truncate_description(&long);
        assert_eq!(cut.chars().count(), 500);
        assert!(cut.ends_with("..."));

        let exact = "y".repeat(500);
        assert_eq!(truncate_description(&exact), exact);
    }

    #[test]
    fn test_line_endings_normalized() {
        assert_eq!(normalize_line_endings("a\r\nb\rc\n"), "a\nb\nc\n");
        assert!(matches!(normalize_line_endings("a\nb"), Cow::Borrowed(_)));
        assert_eq!(normalize_line_endings("\r\n\r\n"), "\n\n");
    }
}
