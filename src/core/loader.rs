//! Tabular file loading
//!
//! Parses uploaded table files (CSV or XLSX) into [`RawTable`]s with trimmed
//! column names, then into the typed records of [`crate::entities`]. Column
//! names are matched case-insensitively after trimming; a missing required
//! column fails the whole load with no partial result.

use std::path::Path;

use calamine::{open_workbook_auto, Data, Reader};
use chrono::NaiveDate;

use crate::core::store::{StoreError, TableKind};
use crate::entities::{Quotation, Supplier, Supply};

/// An untyped table: one header row plus data rows, all cells trimmed
#[derive(Debug, Clone, Default)]
pub struct RawTable {
    /// Column names, trimmed of surrounding whitespace
    pub headers: Vec<String>,

    /// Data rows; short rows are padded with empty cells on access
    pub rows: Vec<Vec<String>>,
}

impl RawTable {
    /// Create a table with the given headers and no rows
    pub fn with_headers(headers: &[&str]) -> Self {
        Self {
            headers: headers.iter().map(|h| h.to_string()).collect(),
            rows: Vec::new(),
        }
    }

    /// Find a column index by name (trimmed, case-insensitive)
    pub fn column(&self, name: &str) -> Option<usize> {
        self.headers
            .iter()
            .position(|h| h.trim().eq_ignore_ascii_case(name))
    }

    /// Find a column index or fail with a schema error naming the column
    pub fn require_column(
        &self,
        table: TableKind,
        name: &'static str,
    ) -> Result<usize, StoreError> {
        self.column(name)
            .ok_or(StoreError::MissingColumn { table, column: name })
    }

    /// Get a trimmed cell from a row, empty if the row is short
    pub fn cell<'a>(&self, row: &'a [String], idx: usize) -> &'a str {
        row.get(idx).map(|s| s.trim()).unwrap_or("")
    }
}

/// Read a tabular file, choosing the parser by extension
///
/// `.xlsx`/`.xls`/`.xlsm`/`.ods` go through the workbook reader (first
/// worksheet); everything else is treated as CSV.
pub fn read_table_file(path: &Path) -> Result<RawTable, StoreError> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_lowercase());

    match ext.as_deref() {
        Some("xlsx") | Some("xls") | Some("xlsm") | Some("ods") => read_workbook_file(path),
        _ => read_csv_file(path),
    }
}

/// Read a CSV file into a [`RawTable`]
pub fn read_csv_file(path: &Path) -> Result<RawTable, StoreError> {
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_path(path)
        .map_err(|e| StoreError::Csv {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;

    let headers = rdr
        .headers()
        .map_err(|e| StoreError::Csv {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?
        .iter()
        .map(|h| h.trim().to_string())
        .collect();

    let mut rows = Vec::new();
    for record in rdr.records() {
        let record = record.map_err(|e| StoreError::Csv {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        rows.push(record.iter().map(|c| c.trim().to_string()).collect());
    }

    Ok(RawTable { headers, rows })
}

/// Read the first worksheet of a workbook file into a [`RawTable`]
pub fn read_workbook_file(path: &Path) -> Result<RawTable, StoreError> {
    let mut workbook = open_workbook_auto(path).map_err(|e| StoreError::Workbook {
        path: path.to_path_buf(),
        message: e.to_string(),
    })?;

    let range = workbook
        .worksheet_range_at(0)
        .ok_or_else(|| StoreError::EmptySheet {
            path: path.to_path_buf(),
        })?
        .map_err(|e| StoreError::Workbook {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;

    let mut rows_iter = range.rows();
    let headers = match rows_iter.next() {
        Some(header_row) => header_row.iter().map(|c| cell_to_string(c)).collect(),
        None => {
            return Err(StoreError::EmptySheet {
                path: path.to_path_buf(),
            })
        }
    };

    let rows = rows_iter
        .map(|row| row.iter().map(cell_to_string).collect())
        .collect();

    Ok(RawTable { headers, rows })
}

fn cell_to_string(cell: &Data) -> String {
    match cell {
        Data::Empty => String::new(),
        Data::String(s) => s.trim().to_string(),
        Data::Float(f) => f.to_string(),
        Data::Int(i) => i.to_string(),
        Data::Bool(b) => b.to_string(),
        other => other.to_string().trim().to_string(),
    }
}

/// Parse a supplies table into typed records
pub fn parse_supplies(raw: &RawTable) -> Result<Vec<Supply>, StoreError> {
    let table = TableKind::Supplies;
    let id = raw.require_column(table, "id")?;
    let name = raw.require_column(table, "name")?;
    let unit = raw.require_column(table, "unit")?;
    let quantity = raw.require_column(table, "quantity")?;

    let mut supplies = Vec::with_capacity(raw.rows.len());
    for (idx, row) in raw.rows.iter().enumerate() {
        supplies.push(Supply {
            id: raw.cell(row, id).to_string(),
            name: raw.cell(row, name).to_string(),
            unit: raw.cell(row, unit).to_string(),
            quantity: parse_quantity(table, idx, raw.cell(row, quantity))?,
        });
    }
    Ok(supplies)
}

/// Parse a suppliers table into typed records
pub fn parse_suppliers(raw: &RawTable) -> Result<Vec<Supplier>, StoreError> {
    let table = TableKind::Suppliers;
    let id = raw.require_column(table, "id")?;
    let name = raw.require_column(table, "name")?;
    let tax_id = raw.require_column(table, "tax_id")?;
    let contact = raw.require_column(table, "contact")?;

    Ok(raw
        .rows
        .iter()
        .map(|row| Supplier {
            id: raw.cell(row, id).to_string(),
            name: raw.cell(row, name).to_string(),
            tax_id: raw.cell(row, tax_id).to_string(),
            contact: raw.cell(row, contact).to_string(),
        })
        .collect())
}

/// Parse a quotations table into typed records
///
/// `date` is an optional extra column; the seven columns of
/// [`Quotation::COLUMNS`] are required.
pub fn parse_quotations(raw: &RawTable) -> Result<Vec<Quotation>, StoreError> {
    let table = TableKind::Quotations;
    let id = raw.require_column(table, "id")?;
    let supply_id = raw.require_column(table, "supply_id")?;
    let supplier_id = raw.require_column(table, "supplier_id")?;
    let unit_price = raw.require_column(table, "unit_price")?;
    let lead_time = raw.require_column(table, "lead_time_days")?;
    let validity = raw.require_column(table, "validity_days")?;
    let notes = raw.require_column(table, "notes")?;
    let date = raw.column("date");

    let mut quotations = Vec::with_capacity(raw.rows.len());
    for (idx, row) in raw.rows.iter().enumerate() {
        let date_cell = date.map(|i| raw.cell(row, i)).unwrap_or("");
        let price = parse_price(table, idx, raw.cell(row, unit_price))?;

        quotations.push(Quotation {
            id: raw.cell(row, id).to_string(),
            supply_id: raw.cell(row, supply_id).to_string(),
            supplier_id: raw.cell(row, supplier_id).to_string(),
            unit_price: price,
            lead_time_days: parse_optional_int(table, idx, "lead_time_days", raw.cell(row, lead_time))?,
            validity_days: parse_optional_int(table, idx, "validity_days", raw.cell(row, validity))?,
            date: parse_optional_date(table, idx, date_cell)?,
            notes: match raw.cell(row, notes) {
                "" => None,
                s => Some(s.to_string()),
            },
        });
    }
    Ok(quotations)
}

/// Parse a required, non-negative price cell
fn parse_price(table: TableKind, idx: usize, value: &str) -> Result<f64, StoreError> {
    let invalid = || StoreError::InvalidValue {
        table,
        row: idx + 2,
        column: "unit_price",
        value: value.to_string(),
    };
    let price: f64 = value.parse().map_err(|_| invalid())?;
    if price < 0.0 || price.is_nan() {
        return Err(invalid());
    }
    Ok(price)
}

/// Parse a quantity cell; an empty cell reads as zero
fn parse_quantity(table: TableKind, idx: usize, value: &str) -> Result<f64, StoreError> {
    if value.is_empty() {
        return Ok(0.0);
    }
    value.parse().map_err(|_| StoreError::InvalidValue {
        table,
        row: idx + 2,
        column: "quantity",
        value: value.to_string(),
    })
}

fn parse_optional_int(
    table: TableKind,
    idx: usize,
    column: &'static str,
    value: &str,
) -> Result<Option<u32>, StoreError> {
    if value.is_empty() {
        return Ok(None);
    }
    value
        .parse()
        .map(Some)
        .map_err(|_| StoreError::InvalidValue {
            table,
            row: idx + 2,
            column,
            value: value.to_string(),
        })
}

fn parse_optional_date(
    table: TableKind,
    idx: usize,
    value: &str,
) -> Result<Option<NaiveDate>, StoreError> {
    if value.is_empty() {
        return Ok(None);
    }
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .map(Some)
        .map_err(|_| StoreError::InvalidValue {
            table,
            row: idx + 2,
            column: "date",
            value: value.to_string(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn quotation_table() -> RawTable {
        RawTable {
            headers: vec![
                " id ".to_string(),
                "Supply_ID".to_string(),
                "supplier_id".to_string(),
                "unit_price".to_string(),
                "lead_time_days".to_string(),
                "validity_days".to_string(),
                "notes".to_string(),
                "date".to_string(),
            ],
            rows: vec![vec![
                "1".to_string(),
                "10".to_string(),
                "20".to_string(),
                "15.5".to_string(),
                "7".to_string(),
                "".to_string(),
                "".to_string(),
                "2024-03-01".to_string(),
            ]],
        }
    }

    #[test]
    fn test_column_lookup_trims_and_ignores_case() {
        let raw = quotation_table();
        assert_eq!(raw.column("id"), Some(0));
        assert_eq!(raw.column("supply_id"), Some(1));
        assert_eq!(raw.column("missing"), None);
    }

    #[test]
    fn test_parse_quotations() {
        let quotes = parse_quotations(&quotation_table()).unwrap();
        assert_eq!(quotes.len(), 1);
        assert_eq!(quotes[0].unit_price, 15.5);
        assert_eq!(quotes[0].lead_time_days, Some(7));
        assert_eq!(quotes[0].validity_days, None);
        assert_eq!(quotes[0].notes, None);
        assert_eq!(
            quotes[0].date,
            Some(NaiveDate::from_ymd_opt(2024, 3, 1).unwrap())
        );
    }

    #[test]
    fn test_missing_column_names_the_column() {
        let mut raw = quotation_table();
        raw.headers.remove(3);
        let err = parse_quotations(&raw).unwrap_err();
        match err {
            StoreError::MissingColumn { column, .. } => assert_eq!(column, "unit_price"),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_negative_price_rejected() {
        let mut raw = quotation_table();
        raw.rows[0][3] = "-1".to_string();
        assert!(matches!(
            parse_quotations(&raw),
            Err(StoreError::InvalidValue { column: "unit_price", .. })
        ));
    }

    #[test]
    fn test_quotations_without_date_column() {
        let mut raw = quotation_table();
        raw.headers.remove(7);
        for row in &mut raw.rows {
            row.remove(7);
        }
        let quotes = parse_quotations(&raw).unwrap();
        assert_eq!(quotes[0].date, None);
    }

    #[test]
    fn test_parse_supplies_defaults_empty_quantity() {
        let raw = RawTable {
            headers: vec![
                "id".to_string(),
                "name".to_string(),
                "unit".to_string(),
                "quantity".to_string(),
            ],
            rows: vec![vec![
                "1".to_string(),
                "Cement".to_string(),
                "bag".to_string(),
                "".to_string(),
            ]],
        };
        let supplies = parse_supplies(&raw).unwrap();
        assert_eq!(supplies[0].quantity, 0.0);
    }
}
