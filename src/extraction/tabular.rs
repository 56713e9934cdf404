//! Extraction for CSV and spreadsheet rows.
//!
//! Columns are matched by header synonym instead of regex: a synonym matches
//! when it appears (case-insensitively) anywhere in the column name.

use crate::extraction::normalize::{
    normalize_property_type, state_name, truncate_description, DEFAULT_PROPERTY_TYPE,
};
use crate::extraction::rules::{clean_numeric, to_count};
use crate::models::{ListingRecord, NOT_AVAILABLE, UNKNOWN};

const ADDRESS: &[&str] = &["address", "property_address", "street", "location"];
const CITY: &[&str] = &["city"];
const STATE: &[&str] = &["state"];
const ZIP: &[&str] = &["zip", "zipcode", "postal"];
const PROPERTY_TYPE: &[&str] = &["type", "property_type", "style"];
const PRICE: &[&str] = &[
    "price",
    "purchase_price",
    "listing_price",
    "list_price",
    "asking_price",
];
const RENT: &[&str] = &["rent", "monthly_rent", "rental_income"];
const BEDROOMS: &[&str] = &["bedrooms", "beds", "br"];
const BATHROOMS: &[&str] = &["bathrooms", "baths", "ba"];
const SQUARE_FOOTAGE: &[&str] = &["sqft", "square_feet", "square feet", "size", "sq_ft"];
const YEAR_BUILT: &[&str] = &["year_built", "built", "construction_year"];
const DESCRIPTION: &[&str] = &["description", "details", "notes"];
const URL: &[&str] = &["url", "listing_url", "link"];

/// Cell values treated as missing.
const NULL_MARKERS: &[&str] = &["nan", "null", "none", "n/a", "na", "#n/a"];

/// One data row of a table, as (column name, cell) pairs in header order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TabularRow {
    columns: Vec<(String, String)>,
}

impl TabularRow {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a column; chainable for building rows by hand.
    pub fn with(mut self, column: impl Into<String>, value: impl Into<String>) -> Self {
        self.columns.push((column.into(), value.into()));
        self
    }

    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            columns: pairs
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    /// First non-null cell whose column name contains one of `synonyms`.
    ///
    /// Synonyms are tried in order; for each, columns are scanned in header order.
    pub fn lookup(&self, synonyms: &[&str]) -> Option<&str> {
        synonyms.iter().find_map(|synonym| {
            let synonym = synonym.to_lowercase();
            self.columns.iter().find_map(|(column, value)| {
                if !column.to_lowercase().contains(&synonym) {
                    return None;
                }
                let value = value.trim();
                if value.is_empty() || NULL_MARKERS.iter().any(|m| value.eq_ignore_ascii_case(m))
                {
                    None
                } else {
                    Some(value)
                }
            })
        })
    }

    fn text_or(&self, synonyms: &[&str], default: &str) -> String {
        self.lookup(synonyms).unwrap_or(default).to_string()
    }

    /// Numeric cell, 0.0 when absent, negative or not a number.
    fn number(&self, synonyms: &[&str]) -> f64 {
        self.lookup(synonyms)
            .and_then(clean_numeric)
            .filter(|v| *v >= 0.0)
            .unwrap_or(0.0)
    }
}

/// Builds a record from a single table row.
pub fn extract_row(row: &TabularRow) -> ListingRecord {
    let record = ListingRecord {
        address: row.text_or(ADDRESS, "Unknown Address"),
        city: row.text_or(CITY, UNKNOWN),
        state: state_name(row.lookup(STATE), UNKNOWN),
        zip_code: row.text_or(ZIP, "00000"),
        property_type: normalize_property_type(
            row.lookup(PROPERTY_TYPE).unwrap_or(DEFAULT_PROPERTY_TYPE),
        ),
        purchase_price: row.number(PRICE),
        monthly_rent: row.number(RENT),
        bedrooms: to_count(row.number(BEDROOMS)),
        bathrooms: row.number(BATHROOMS),
        square_footage: to_count(row.number(SQUARE_FOOTAGE)),
        lot_size: None,
        year_built: to_count(row.number(YEAR_BUILT)),
        description: truncate_description(&row.text_or(DESCRIPTION, "CSV property listing")),
        listing_url: row.text_or(URL, NOT_AVAILABLE),
        ..ListingRecord::default()
    };

    tracing::debug!(
        "Parsed table row: address={}, price={}",
        record.address,
        record.purchase_price
    );
    record
}

/// Decodes the header line and the first data row of delimited text.
///
/// Tab-delimited input is detected from the header line; otherwise commas are
/// used. Quoted fields may span lines and contain delimiters or `""` escapes.
pub fn first_row(text: &str) -> TabularRow {
    let Some(header_line) = text.lines().find(|l| !l.trim().is_empty()) else {
        return TabularRow::new();
    };
    let delimiter = if header_line.contains('\t') { b'\t' } else { b',' };
    // Blank lines above the header are skipped.
    let table = &text[text.find(header_line).unwrap_or(0)..];

    let mut reader = csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(table.as_bytes());

    let headers = match reader.headers() {
        Ok(headers) => headers.clone(),
        Err(e) => {
            tracing::warn!("Unreadable table header: {}", e);
            return TabularRow::new();
        }
    };
    let cells = match reader.records().next() {
        Some(Ok(cells)) => cells,
        Some(Err(e)) => {
            tracing::warn!("Unreadable first table row: {}", e);
            return TabularRow::new();
        }
        None => {
            tracing::warn!("Table has a header but no data rows");
            return TabularRow::new();
        }
    };

    TabularRow::from_pairs(
        headers
            .iter()
            .zip(cells.iter().chain(std::iter::repeat(""))),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_price_synonyms_resolve() {
        for column in ["price", "Purchase_Price", "LISTING_PRICE", "list price", "asking_price"] {
            let row = TabularRow::new().with(column, "$189,900");
            assert_eq!(extract_row(&row).purchase_price, 189900.0, "{}", column);
        }
    }

    #[test]
    fn test_empty_cells_skipped() {
        let row = TabularRow::new()
            .with("Price", "")
            .with("Asking Price", "NaN")
            .with("List Price", "210000");
        assert_eq!(extract_row(&row).purchase_price, 210000.0);
    }

    #[test]
    fn test_defaults_for_empty_row() {
        let record = extract_row(&TabularRow::new());

        assert_eq!(record.address, "Unknown Address");
        assert_eq!(record.city, "Unknown");
        assert_eq!(record.state, "Unknown");
        assert_eq!(record.zip_code, "00000");
        assert_eq!(record.property_type, "single-family");
        assert_eq!(record.description, "CSV property listing");
        assert_eq!(record.listing_url, "N/A");
    }

    #[test]
    fn test_first_row_with_quotes() {
        let text = "address,city,state,price\n\"12 Pine St, Unit 4\",Dayton,OH,\"$99,500\"\n";
        let row = first_row(text);
        let record = extract_row(&row);

        assert_eq!(record.address, "12 Pine St, Unit 4");
        assert_eq!(record.city, "Dayton");
        assert_eq!(record.state, "Ohio");
        assert_eq!(record.purchase_price, 99500.0);
    }

    #[test]
    fn test_first_row_tab_delimited() {
        let text = "Beds\tBaths\tSqFt\n3\t1.5\t1,320\n";
        let record = extract_row(&first_row(text));

        assert_eq!(record.bedrooms, 3);
        assert_eq!(record.bathrooms, 1.5);
        assert_eq!(record.square_footage, 1320);
    }

    #[test]
    fn test_header_only_table() {
        assert!(first_row("address,price\n").is_empty());
        assert!(first_row("").is_empty());
    }

    #[test]
    fn test_first_row_multiline_cell() {
        let text = "address,description,price\n\"1 Oak St, Unit 2\",\"Line one\nLine two\",\"$99,500\"\n";
        let record = extract_row(&first_row(text));

        assert_eq!(record.address, "1 Oak St, Unit 2");
        assert_eq!(record.description, "Line one\nLine two");
        assert_eq!(record.purchase_price, 99500.0);
    }

    #[test]
    fn test_blank_lines_above_header() {
        let record = extract_row(&first_row("  \n\ncity,price\nJoliet,150000\n"));
        assert_eq!(record.city, "Joliet");
        assert_eq!(record.purchase_price, 150000.0);
    }

    #[test]
    fn test_short_row_padded() {
        let row = first_row("address,city,price\n5 Ash Ct,Joliet\n");
        let record = extract_row(&row);

        assert_eq!(record.city, "Joliet");
        assert_eq!(record.purchase_price, 0.0);
    }
}
