//! Ordered-fallback pattern matching.
//!
//! Each field is backed by a [`PatternSet`]: a fixed list of regexes ordered
//! from the most structured (an explicit label) to the most heuristic. The
//! first pattern whose capture parses wins; a capture that fails to parse
//! falls through to the next candidate instead of failing the record.

use regex::Regex;

/// How many matches of each pattern are considered before moving on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchScope {
    /// Only the leftmost match of each pattern.
    First,
    /// Every non-overlapping match of each pattern, left to right.
    All,
}

/// An ordered list of capture patterns for a single field.
///
/// Group 1 of every pattern holds the value.
pub struct PatternSet {
    patterns: Vec<Regex>,
    scope: MatchScope,
}

impl PatternSet {
    /// Compiles a built-in pattern list.
    ///
    /// Patterns are compile-time constants, so an invalid one is a programming error.
    pub fn new(patterns: &[&str], scope: MatchScope) -> Self {
        let patterns = patterns
            .iter()
            .map(|p| Regex::new(p).expect("invalid built-in extraction pattern"))
            .collect();
        Self { patterns, scope }
    }

    /// Returns the first candidate accepted by `parse`, trying patterns in order.
    pub fn resolve<T, F>(&self, text: &str, parse: F) -> Option<T>
    where
        F: Fn(&str) -> Option<T>,
    {
        self.patterns.iter().find_map(|re| {
            let mut captures = re.captures_iter(text);
            match self.scope {
                MatchScope::First => captures
                    .next()
                    .and_then(|c| c.get(1).and_then(|m| parse(m.as_str()))),
                MatchScope::All => {
                    captures.find_map(|c| c.get(1).and_then(|m| parse(m.as_str())))
                }
            }
        })
    }

    /// First non-empty trimmed capture.
    pub fn text(&self, text: &str) -> Option<String> {
        self.resolve(text, non_empty)
    }

    /// First capture that parses as a number after currency cleaning.
    pub fn number(&self, text: &str) -> Option<f64> {
        self.resolve(text, clean_numeric)
    }

    /// Every capture of every pattern, in pattern order then match order.
    pub fn all_captures<'t>(&'t self, text: &'t str) -> impl Iterator<Item = &'t str> + 't {
        self.patterns.iter().flat_map(move |re| {
            re.captures_iter(text)
                .filter_map(|c| c.get(1).map(|m| m.as_str()))
        })
    }
}

fn non_empty(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

/// Strips currency symbols, thousands separators and whitespace, then parses.
///
/// Returns `None` for empty or non-numeric input so callers can fall through.
pub fn clean_numeric(raw: &str) -> Option<f64> {
    let cleaned: String = raw
        .chars()
        .filter(|c| *c != '$' && *c != ',' && !c.is_whitespace())
        .collect();
    if cleaned.is_empty() {
        return None;
    }
    cleaned.parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Truncating conversion for whole-number fields (bedrooms, square footage, year).
pub fn to_count(value: f64) -> u32 {
    if value.is_finite() && value > 0.0 {
        value.trunc() as u32
    } else {
        0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clean_numeric_strips_currency() {
        assert_eq!(clean_numeric("$250,000"), Some(250000.0));
        assert_eq!(clean_numeric(" 1 850 "), Some(1850.0));
        assert_eq!(clean_numeric("2.5"), Some(2.5));
        assert_eq!(clean_numeric(","), None);
        assert_eq!(clean_numeric(""), None);
        assert_eq!(clean_numeric("."), None);
        assert_eq!(clean_numeric("abc"), None);
    }

    #[test]
    fn test_first_match_wins_in_pattern_order() {
        let set = PatternSet::new(
            &[r"(?i)Purchase Price:\s*\$?([\d,]+)", r"(?i)Price:\s*\$?([\d,]+)"],
            MatchScope::First,
        );
        let text = "Price: $100,000\nPurchase Price: $95,000";
        assert_eq!(set.number(text), Some(95000.0));
    }

    #[test]
    fn test_unparsable_capture_falls_through() {
        let set = PatternSet::new(
            &[r"(?i)Price:\s*\$?([\d,]+)", r"\$([\d,]+)"],
            MatchScope::First,
        );
        // First pattern captures a lone comma, second pattern supplies the value.
        assert_eq!(set.number("Price: , asking $120,500"), Some(120500.0));
    }

    #[test]
    fn test_all_scope_scans_later_matches() {
        let first = PatternSet::new(&[r"Beds?:\s*([\d.]+)"], MatchScope::First);
        let all = PatternSet::new(&[r"Beds?:\s*([\d.]+)"], MatchScope::All);
        let text = "Bed: . Beds: 3";

        assert_eq!(first.number(text), None);
        assert_eq!(all.number(text), Some(3.0));
    }

    #[test]
    fn test_to_count_truncates() {
        assert_eq!(to_count(3.9), 3);
        assert_eq!(to_count(-2.0), 0);
        assert_eq!(to_count(f64::NAN), 0);
    }
}
