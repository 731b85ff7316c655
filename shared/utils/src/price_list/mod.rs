//! Price List Import
//!
//! Loads catalog items from supplier price lists so the catalog can be
//! refreshed without code changes. Supports CSV and Excel (XLSX/XLS).

pub mod parser;

pub use parser::{ParsedPriceList, PriceListFormat, PriceListParser};
