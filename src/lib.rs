//! Real Estate Deal Analyzer Library
//!
//! This library turns listing text (email alerts, PDF flyers, CSV exports)
//! into structured listing records and screens them against a set of
//! rental-investment criteria.
//!
//! # Modules
//!
//! - `config`: Configuration management.
//! - `criteria`: Investment-criteria document parsing and updating.
//! - `errors`: Error handling types.
//! - `evaluator`: Financing, cash flow, return ratios and the verdict.
//! - `extraction`: Per-format listing field extraction.
//! - `models`: Core data models.
//! - `overrides`: User-supplied STR metrics and expense overrides.
//! - `report`: JSON report and text summary rendering.

pub mod config;
pub mod criteria;
pub mod errors;
pub mod evaluator;
pub mod extraction;
pub mod models;
pub mod overrides;
pub mod report;

pub use errors::AnalyzerError;
pub use evaluator::evaluate;
pub use extraction::{extract, extract_bytes, SourceFormat};
pub use models::{DealAnalysis, InvestmentCriteria, ListingRecord};
