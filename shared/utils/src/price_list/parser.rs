//! Price List Parser
//!
//! Maps loosely named spreadsheet columns onto catalog items. Rows that
//! cannot produce a valid item are skipped and reported as warnings.

use anyhow::{Context, Result};
use calamine::{DataType, Reader};
use lumber_models::CatalogItem;
use std::collections::HashMap;
use std::io::{Cursor, Read, Seek};
use std::path::Path;

use crate::validation::{format_validation_errors, validate_file_type};
use validator::Validate;

/// Supported price list formats
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PriceListFormat {
    Csv,
    /// Office Open XML workbook (`.xlsx`)
    Xlsx,
    /// Excel 97-2003 binary workbook (`.xls`)
    Xls,
}

impl PriceListFormat {
    pub const EXTENSIONS: [&'static str; 3] = ["csv", "xlsx", "xls"];

    /// Detect format from file extension
    pub fn from_extension(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?.to_lowercase();
        match ext.as_str() {
            "csv" => Some(Self::Csv),
            "xlsx" => Some(Self::Xlsx),
            "xls" => Some(Self::Xls),
            _ => None,
        }
    }
}

/// Catalog items read from one price list file
#[derive(Debug, Clone)]
pub struct ParsedPriceList {
    pub filename: String,
    pub format: PriceListFormat,
    pub items: Vec<CatalogItem>,
    pub total_rows: usize,
    pub warnings: Vec<String>,
}

type RawRow = HashMap<String, String>;

pub struct PriceListParser {
    id_columns: Vec<&'static str>,
    description_columns: Vec<&'static str>,
    category_columns: Vec<&'static str>,
    subcategory_columns: Vec<&'static str>,
    dimension_columns: Vec<&'static str>,
    material_columns: Vec<&'static str>,
    grade_columns: Vec<&'static str>,
    price_columns: Vec<&'static str>,
    unit_columns: Vec<&'static str>,
    length_columns: Vec<&'static str>,
    width_columns: Vec<&'static str>,
    thickness_columns: Vec<&'static str>,
}

impl Default for PriceListParser {
    fn default() -> Self {
        Self {
            id_columns: vec!["item_id", "id", "sku", "item_number", "part_number"],
            description_columns: vec!["description", "desc", "item_description", "name"],
            category_columns: vec!["category", "section"],
            subcategory_columns: vec!["subcategory", "sub_category", "type"],
            dimension_columns: vec!["dimensions", "dimension", "size"],
            material_columns: vec!["material", "species"],
            grade_columns: vec!["grade"],
            price_columns: vec!["unit_price", "price", "cost", "unit_cost"],
            unit_columns: vec!["unit", "uom", "unit_of_measure"],
            length_columns: vec!["length_feet", "length_ft", "length"],
            width_columns: vec!["width_inches", "width_in", "width"],
            thickness_columns: vec!["thickness_inches", "thickness_in", "thickness"],
        }
    }
}

impl PriceListParser {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn parse_file(&self, path: &Path) -> Result<ParsedPriceList> {
        let filename = path.to_string_lossy().to_string();
        validate_file_type(&filename, &PriceListFormat::EXTENSIONS)?;
        let data = std::fs::read(path)
            .with_context(|| format!("Failed to read price list {}", filename))?;
        self.parse_bytes(&filename, &data, None)
    }

    /// Parse a price list from bytes
    pub fn parse_bytes(
        &self,
        filename: &str,
        data: &[u8],
        format: Option<PriceListFormat>,
    ) -> Result<ParsedPriceList> {
        let format = format
            .or_else(|| PriceListFormat::from_extension(Path::new(filename)))
            .context("Could not determine price list format")?;

        let rows = match format {
            PriceListFormat::Csv => self.read_csv(data)?,
            PriceListFormat::Xlsx => {
                let workbook: calamine::Xlsx<_> = calamine::open_workbook_from_rs(Cursor::new(data))
                    .context("Failed to open Excel workbook")?;
                first_sheet_rows(workbook)?
            }
            PriceListFormat::Xls => {
                let workbook: calamine::Xls<_> = calamine::open_workbook_from_rs(Cursor::new(data))
                    .context("Failed to open Excel 97-2003 workbook")?;
                first_sheet_rows(workbook)?
            }
        };

        let total_rows = rows.len();
        let mut items = Vec::with_capacity(total_rows);
        let mut warnings = Vec::new();

        for (row_number, raw) in rows {
            match self.map_row(&raw) {
                Ok(item) => items.push(item),
                Err(reason) => warnings.push(format!("Row {}: {}", row_number, reason)),
            }
        }

        tracing::info!(
            filename,
            rows = total_rows,
            items = items.len(),
            skipped = warnings.len(),
            "Parsed price list"
        );

        Ok(ParsedPriceList {
            filename: filename.to_string(),
            format,
            items,
            total_rows,
            warnings,
        })
    }

    fn read_csv(&self, data: &[u8]) -> Result<Vec<(usize, RawRow)>> {
        let mut reader = csv::ReaderBuilder::new().flexible(true).from_reader(data);

        let headers: Vec<String> = reader
            .headers()
            .context("Failed to read CSV headers")?
            .iter()
            .map(normalize_header)
            .collect();

        let mut rows = Vec::new();
        for (idx, result) in reader.records().enumerate() {
            let record = result.with_context(|| format!("Row {}: malformed CSV record", idx + 2))?;
            let raw: RawRow = headers
                .iter()
                .enumerate()
                .filter_map(|(i, h)| record.get(i).map(|v| (h.clone(), v.to_string())))
                .collect();
            rows.push((idx + 2, raw));
        }
        Ok(rows)
    }

    fn map_row(&self, raw: &RawRow) -> std::result::Result<CatalogItem, String> {
        let description = find_value(&self.description_columns, raw)
            .ok_or_else(|| "missing description".to_string())?;
        let category = find_value(&self.category_columns, raw)
            .ok_or_else(|| "missing category".to_string())?;
        let price_text = find_value(&self.price_columns, raw)
            .ok_or_else(|| "missing unit price".to_string())?;
        let unit_price = parse_price(&price_text)
            .ok_or_else(|| format!("invalid unit price '{}'", price_text))?;

        let item = CatalogItem {
            item_id: find_value(&self.id_columns, raw)
                .unwrap_or_else(|| derive_item_id(&description)),
            description,
            category,
            subcategory: find_value(&self.subcategory_columns, raw).unwrap_or_default(),
            dimensions: find_value(&self.dimension_columns, raw).unwrap_or_default(),
            material: find_value(&self.material_columns, raw).unwrap_or_default(),
            grade: find_value(&self.grade_columns, raw).unwrap_or_default(),
            unit_price,
            unit: find_value(&self.unit_columns, raw).unwrap_or_else(|| "each".to_string()),
            length_feet: find_number(&self.length_columns, raw),
            width_inches: find_number(&self.width_columns, raw),
            thickness_inches: find_number(&self.thickness_columns, raw),
        };

        item.validate()
            .map_err(|errors| format_validation_errors(&errors))?;
        Ok(item)
    }
}

fn normalize_header(header: &str) -> String {
    header.trim().to_lowercase().replace([' ', '-'], "_")
}

/// First non-empty value among the candidate columns
fn find_value(candidates: &[&str], data: &RawRow) -> Option<String> {
    candidates
        .iter()
        .filter_map(|candidate| data.get(*candidate))
        .map(|value| value.trim())
        .find(|value| !value.is_empty())
        .map(str::to_string)
}

fn find_number(candidates: &[&str], data: &RawRow) -> Option<f64> {
    find_value(candidates, data)
        .and_then(|v| v.parse::<f64>().ok())
        .filter(|v| v.is_finite() && *v > 0.0)
}

fn parse_price(text: &str) -> Option<f64> {
    let cleaned: String = text.chars().filter(|c| *c != '$' && *c != ',').collect();
    cleaned
        .trim()
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite() && *v >= 0.0)
}

fn derive_item_id(description: &str) -> String {
    description
        .split_whitespace()
        .map(|token| token.to_uppercase())
        .collect::<Vec<_>>()
        .join("_")
}

/// Rows of the first worksheet keyed by normalized header, numbered as in the sheet.
fn first_sheet_rows<RS, R>(mut workbook: R) -> Result<Vec<(usize, RawRow)>>
where
    RS: Read + Seek,
    R: Reader<RS>,
    R::Error: std::error::Error + Send + Sync + 'static,
{
    let sheet_name = workbook
        .sheet_names()
        .first()
        .cloned()
        .context("No sheets found in workbook")?;

    let range = workbook
        .worksheet_range(&sheet_name)
        .context("Failed to read worksheet")??;

    let mut rows_iter = range.rows();
    let headers: Vec<String> = rows_iter
        .next()
        .context("Empty worksheet")?
        .iter()
        .map(|cell: &DataType| normalize_header(&cell.to_string()))
        .collect();

    Ok(rows_iter
        .enumerate()
        .map(|(idx, row)| {
            let raw: RawRow = headers
                .iter()
                .enumerate()
                .filter_map(|(i, h)| row.get(i).map(|v: &DataType| (h.clone(), v.to_string())))
                .collect();
            (idx + 2, raw)
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_format_detection() {
        assert_eq!(PriceListFormat::from_extension(Path::new("p.csv")), Some(PriceListFormat::Csv));
        assert_eq!(PriceListFormat::from_extension(Path::new("p.XLSX")), Some(PriceListFormat::Xlsx));
        assert_eq!(PriceListFormat::from_extension(Path::new("p.xls")), Some(PriceListFormat::Xls));
        assert_eq!(PriceListFormat::from_extension(Path::new("p.xml")), None);
    }

    #[test]
    fn test_csv_price_list() {
        let csv = b"SKU,Description,Category,Subcategory,Size,Unit Price,UOM,Length\n\
2X4X8_SPF,2X4X8 SPF STUD,Walls,Studs,2X4X8,$4.25,each,8\n\
,2X6X12 HF,Walls,Studs,2X6X12,8.25,lf,12\n\
BAD,No Price,Walls,Studs,2X4,,each,\n";

        let parsed = PriceListParser::new().parse_bytes("prices.csv", csv, None).unwrap();

        assert_eq!(parsed.total_rows, 3);
        assert_eq!(parsed.items.len(), 2);
        assert_eq!(parsed.warnings.len(), 1);
        assert!(parsed.warnings[0].contains("missing unit price"));

        let stud = &parsed.items[0];
        assert_eq!(stud.item_id, "2X4X8_SPF");
        assert_eq!(stud.unit_price, 4.25);
        assert_eq!(stud.length_feet, Some(8.0));
        assert_eq!(parsed.items[1].item_id, "2X6X12_HF");
    }

    #[test]
    fn test_xls_uses_the_binary_workbook_reader() {
        let err = PriceListParser::new()
            .parse_bytes("prices.xls", b"not a workbook", None)
            .unwrap_err();
        assert!(format!("{:#}", err).contains("Excel 97-2003 workbook"));

        let err = PriceListParser::new()
            .parse_bytes("prices.xlsx", b"not a workbook", None)
            .unwrap_err();
        assert!(!format!("{:#}", err).contains("97-2003"));
    }

    #[test]
    fn test_unknown_format_is_an_error() {
        assert!(PriceListParser::new().parse_bytes("prices.txt", b"a,b", None).is_err());
    }

    proptest! {
        /// Every data row either becomes an item or a warning.
        #[test]
        fn prop_rows_are_accounted_for(
            rows in prop::collection::vec(("[A-Z]{2,8}", prop::option::of(0u32..500)), 1..20),
        ) {
            let mut csv = String::from("description,category,unit_price\n");
            for (name, price) in &rows {
                let price = price.map(|p| p.to_string()).unwrap_or_default();
                csv.push_str(&format!("{},Walls,{}\n", name, price));
            }
            let parsed = PriceListParser::new().parse_bytes("p.csv", csv.as_bytes(), None).unwrap();
            prop_assert_eq!(parsed.items.len() + parsed.warnings.len(), rows.len());
            prop_assert_eq!(parsed.total_rows, rows.len());
        }
    }
}
