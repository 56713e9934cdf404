/// Integration tests for listing extraction
/// Tests each source format through the public entry points
use rust_deal_analyzer::extraction::{
    extract, extract_bytes, extract_row, ExtractOptions, Extractor, SourceFormat, TabularRow,
};
use rust_deal_analyzer::models::LinkKind;
use rust_deal_analyzer::AnalyzerError;

const PLAIN_ALERT: &str = "Hi there,
Address: 456 Oak Ave, Columbus, OH 43004
Type: Duplex
Listing Price: $210,000
Monthly Rent: $2,150
Bedrooms: 4
Bathrooms: 2
Lot Size: 6,500
Year Built: 1962
Description: Both units leased through next spring.
Sincerely,
Dana
https://www.redfin.com/OH/Columbus/456-Oak-Ave
https://www.redfin.com/unsubscribe?token=abc
https://cdn.photos.example.com/456-oak/front.jpg
";

#[cfg(test)]
mod email_tests {
    use super::*;

    #[test]
    fn test_unlabelled_alert_fields() {
        let record = extract(PLAIN_ALERT, SourceFormat::Email);

        assert_eq!(record.address, "456 Oak Ave, Columbus, OH 43004");
        assert_eq!(record.city, "Columbus");
        assert_eq!(record.state, "Ohio");
        assert_eq!(record.zip_code, "43004");
        assert_eq!(record.property_type, "duplex");
        assert_eq!(record.purchase_price, 210_000.0);
        assert_eq!(record.monthly_rent, 2_150.0);
        assert_eq!(record.bedrooms, 4);
        assert_eq!(record.bathrooms, 2.0);
        assert_eq!(record.year_built, 1962);
        assert_eq!(record.description, "Both units leased through next spring.");
    }

    #[test]
    fn test_lot_size_fills_missing_footage() {
        let record = extract(PLAIN_ALERT, SourceFormat::Email);

        assert_eq!(record.lot_size, Some(6_500));
        assert_eq!(record.square_footage, 6_500);
    }

    #[test]
    fn test_links_and_images() {
        let record = extract(PLAIN_ALERT, SourceFormat::Email);

        assert_eq!(record.listing_url, "https://www.redfin.com/OH/Columbus/456-Oak-Ave");
        assert_eq!(
            record.image_urls,
            vec!["https://cdn.photos.example.com/456-oak/front.jpg"]
        );
        assert_eq!(record.source_links.len(), 1);
        assert_eq!(record.source_links[0].kind, LinkKind::Listing);
        assert_eq!(
            record.source_links[0].url,
            "https://www.redfin.com/OH/Columbus/456-Oak-Ave"
        );
    }

    #[test]
    fn test_plain_text_matches_email_path() {
        assert_eq!(
            extract(PLAIN_ALERT, SourceFormat::PlainText),
            extract(PLAIN_ALERT, SourceFormat::Email)
        );
    }

    #[test]
    fn test_long_description_truncated() {
        let text = format!("Description: {}\n", "spacious ".repeat(100));
        let record = extract(&text, SourceFormat::Email);

        assert_eq!(record.description.chars().count(), 500);
        assert!(record.description.ends_with("..."));
    }

    #[test]
    fn test_garbage_yields_defaults() {
        let record = extract("%%% nothing to see %%%", SourceFormat::Email);

        assert_eq!(record.address, "N/A");
        assert_eq!(record.state, "N/A");
        assert_eq!(record.property_type, "single-family");
        assert_eq!(record.purchase_price, 0.0);
        assert_eq!(record.description, "Property listing details");
        assert!(record.image_urls.is_empty());
        assert!(record.source_links.is_empty());
    }
}

#[cfg(test)]
mod pdf_tests {
    use super::*;

    const FLYER: &str = "Charming Home
Listed by Acme
Home - 1,850 sq ft
Size: 42
";

    #[test]
    fn test_header_region_supplies_footage() {
        let record = extract(FLYER, SourceFormat::Pdf);
        assert_eq!(record.square_footage, 1_850);
    }

    #[test]
    fn test_header_region_respects_line_limit() {
        let extractor = Extractor::new(ExtractOptions { header_lines: 2 });
        let record = extractor.extract(FLYER, SourceFormat::Pdf);
        assert_eq!(record.square_footage, 42);
    }

    #[test]
    fn test_pdf_defaults() {
        let record = extract("Nothing structured in this flyer", SourceFormat::Pdf);

        assert_eq!(record.city, "Unknown");
        assert_eq!(record.state, "Unknown");
        assert_eq!(record.zip_code, "00000");
        assert_eq!(record.listing_url, "N/A");
        assert_eq!(record.description, "Property details extracted from PDF");
    }

    #[test]
    fn test_empty_pdf_text() {
        let record = extract("", SourceFormat::Pdf);

        assert_eq!(record.property_type, "unknown");
        assert_eq!(
            record.description,
            "PDF parsing failed - no extractable text found"
        );
    }
}

#[cfg(test)]
mod tabular_tests {
    use super::*;

    const CSV: &str = "Address,City,State,Zip,Property Type,List Price,Monthly Rent,Beds,Baths,SqFt,Year Built,Notes,Listing URL
88 Birch Ln,Peoria,IL,61602,Multi Family,\"$240,000\",\"$2,600\",6,3,2400,1940,Side-by-side duplex,https://example.com/l/88
";

    #[test]
    fn test_csv_first_row() {
        let record = extract(CSV, SourceFormat::Csv);

        assert_eq!(record.address, "88 Birch Ln");
        assert_eq!(record.city, "Peoria");
        assert_eq!(record.state, "Illinois");
        assert_eq!(record.zip_code, "61602");
        assert_eq!(record.property_type, "multi-family");
        assert_eq!(record.purchase_price, 240_000.0);
        assert_eq!(record.monthly_rent, 2_600.0);
        assert_eq!(record.bedrooms, 6);
        assert_eq!(record.bathrooms, 3.0);
        assert_eq!(record.square_footage, 2_400);
        assert_eq!(record.year_built, 1940);
        assert_eq!(record.description, "Side-by-side duplex");
        assert_eq!(record.listing_url, "https://example.com/l/88");
    }

    #[test]
    fn test_spreadsheet_text_uses_same_path() {
        assert_eq!(
            extract(CSV, SourceFormat::Spreadsheet),
            extract(CSV, SourceFormat::Csv)
        );
    }

    #[test]
    fn test_multiline_quoted_cell_keeps_row() {
        let text = "address,description,price\n\"1 Oak St, Springfield\",\"Line one\nLine two\",\"$99,500\"\n";
        let record = extract(text, SourceFormat::Csv);

        assert_eq!(record.address, "1 Oak St, Springfield");
        assert_eq!(record.description, "Line one\nLine two");
        assert_eq!(record.purchase_price, 99_500.0);
    }

    #[test]
    fn test_row_with_null_markers() {
        let row = TabularRow::from_pairs([
            ("asking_price", "N/A"),
            ("purchase_price", "175000"),
            ("state", "null"),
            ("rental_income", "abc"),
        ]);
        let record = extract_row(&row);

        assert_eq!(record.purchase_price, 175_000.0);
        assert_eq!(record.state, "Unknown");
        assert_eq!(record.monthly_rent, 0.0);
    }
}

#[cfg(test)]
mod input_tests {
    use super::*;

    #[test]
    fn test_bytes_decoded_as_utf8() {
        let record = extract_bytes(PLAIN_ALERT.as_bytes(), SourceFormat::Email).unwrap();
        assert_eq!(record.purchase_price, 210_000.0);
    }

    #[test]
    fn test_binary_input_rejected() {
        let err = extract_bytes(&[0x25, 0x50, 0x44, 0x46, 0xc3, 0x28], SourceFormat::Pdf)
            .unwrap_err();
        assert!(matches!(err, AnalyzerError::InputError(_)));
    }

    #[test]
    fn test_unsupported_extension() {
        let err = SourceFormat::from_extension(".pages").unwrap_err();
        assert!(matches!(err, AnalyzerError::ConfigurationError(_)));
    }
}

#[cfg(test)]
mod line_ending_tests {
    use super::*;

    fn crlf(text: &str) -> String {
        text.replace('\n', "\r\n")
    }

    #[test]
    fn test_crlf_email_description_stops_at_blank_line() {
        let text = "Description: Nice house.\n\nBedrooms: 3\nPrice: $100,000\n";
        let record = extract(&crlf(text), SourceFormat::Email);

        assert_eq!(record.description, "Nice house.");
        assert_eq!(record.bedrooms, 3);
        assert_eq!(record, extract(text, SourceFormat::Email));
    }

    #[test]
    fn test_crlf_alert_matches_lf() {
        assert_eq!(
            extract(&crlf(PLAIN_ALERT), SourceFormat::Email),
            extract(PLAIN_ALERT, SourceFormat::Email)
        );
    }

    #[test]
    fn test_crlf_pdf_fields() {
        let text = "Property Type: Ranch\nCity: Dayton\nState: OH\n";
        let record = extract(&crlf(text), SourceFormat::Pdf);

        assert_eq!(record.property_type, "ranch");
        assert_eq!(record.city, "Dayton");
        assert_eq!(record.state, "Ohio");
        assert_eq!(record, extract(text, SourceFormat::Pdf));
    }

    #[test]
    fn test_lone_cr_line_breaks() {
        let text = "Description: Nice house.\r\rBedrooms: 3\r";
        let record = extract(text, SourceFormat::PlainText);
        assert_eq!(record.description, "Nice house.");
    }

    #[test]
    fn test_crlf_bytes_and_csv() {
        let csv = "address,city,price\r\n\"2 Elm St\",Dayton,\"$80,000\"\r\n";
        let record = extract_bytes(csv.as_bytes(), SourceFormat::Csv).unwrap();

        assert_eq!(record.address, "2 Elm St");
        assert_eq!(record.city, "Dayton");
        assert_eq!(record.purchase_price, 80_000.0);
    }
}
