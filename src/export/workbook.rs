//! Workbook serialization - named result tables to one XLSX artifact

use miette::Diagnostic;
use rust_xlsxwriter::{Format, Workbook};
use thiserror::Error;

use crate::pipeline::{OrderQuote, QuoteRow, SupplierMean};

/// Sheet name for the filtered quotation view
pub const FILTERED_SHEET: &str = "Filtered Quotations";

/// Sheet name for the best-price rows
pub const BEST_PRICES_SHEET: &str = "Best Prices";

/// Sheet name for the supplier mean table
pub const AVERAGES_SHEET: &str = "Supplier Averages";

/// Sheet name for an order confirmation
pub const ORDER_SHEET: &str = "Order Confirmation";

/// Workbook serialization errors (fatal to the export call only)
#[derive(Debug, Error, Diagnostic)]
pub enum ExportError {
    #[error("failed to serialize sheet '{sheet}': {message}")]
    #[diagnostic(code(pqt::export::serialization))]
    Serialization { sheet: String, message: String },

    #[error("failed to produce workbook: {message}")]
    #[diagnostic(code(pqt::export::write))]
    Write { message: String },
}

/// One typed cell of a result table
#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    Text(String),
    Number(f64),
    Empty,
}

impl Cell {
    fn text(value: impl Into<String>) -> Self {
        Cell::Text(value.into())
    }

    fn opt_text(value: Option<&str>) -> Self {
        match value {
            Some(s) => Cell::Text(s.to_string()),
            None => Cell::Empty,
        }
    }

    fn opt_number(value: Option<u32>) -> Self {
        match value {
            Some(n) => Cell::Number(n as f64),
            None => Cell::Empty,
        }
    }
}

/// A named result table: one workbook sheet
#[derive(Debug, Clone)]
pub struct ResultTable {
    pub name: String,
    pub headers: Vec<String>,
    pub rows: Vec<Vec<Cell>>,
}

impl ResultTable {
    /// Create an empty table with the given sheet name and headers
    pub fn new(name: &str, headers: &[&str]) -> Self {
        Self {
            name: name.to_string(),
            headers: headers.iter().map(|h| h.to_string()).collect(),
            rows: Vec::new(),
        }
    }

    /// Append a data row
    pub fn push_row(&mut self, row: Vec<Cell>) {
        self.rows.push(row);
    }
}

/// Build the quotation-view sheet from joined rows
pub fn quotes_table(name: &str, rows: &[QuoteRow]) -> ResultTable {
    let mut table = ResultTable::new(
        name,
        &[
            "quotation_id",
            "supply_id",
            "item",
            "unit",
            "supplier_id",
            "supplier",
            "unit_price",
            "lead_time_days",
            "validity_days",
            "date",
            "notes",
        ],
    );
    for row in rows {
        table.push_row(vec![
            Cell::text(&row.quotation_id),
            Cell::text(&row.supply_id),
            Cell::text(&row.supply_name),
            Cell::text(&row.unit),
            Cell::text(&row.supplier_id),
            Cell::text(&row.supplier_name),
            Cell::Number(row.unit_price),
            Cell::opt_number(row.lead_time_days),
            Cell::opt_number(row.validity_days),
            Cell::opt_text(row.date.map(|d| d.to_string()).as_deref()),
            Cell::opt_text(row.notes.as_deref()),
        ]);
    }
    table
}

/// Build the "Best Prices" sheet
pub fn best_prices_table(rows: &[QuoteRow]) -> ResultTable {
    let mut table = ResultTable::new(
        BEST_PRICES_SHEET,
        &["supply_id", "item", "unit", "supplier", "unit_price", "quotation_id"],
    );
    for row in rows {
        table.push_row(vec![
            Cell::text(&row.supply_id),
            Cell::text(&row.supply_name),
            Cell::text(&row.unit),
            Cell::text(&row.supplier_name),
            Cell::Number(row.unit_price),
            Cell::text(&row.quotation_id),
        ]);
    }
    table
}

/// Build the "Supplier Averages" sheet
pub fn supplier_means_table(means: &[SupplierMean]) -> ResultTable {
    let mut table = ResultTable::new(
        AVERAGES_SHEET,
        &["supplier", "mean_price", "quote_count"],
    );
    for mean in means {
        table.push_row(vec![
            Cell::text(&mean.supplier_name),
            Cell::Number(mean.mean_price),
            Cell::Number(mean.quote_count as f64),
        ]);
    }
    table
}

/// Build the single-row "Order Confirmation" sheet
pub fn order_confirmation_table(order: &OrderQuote) -> ResultTable {
    let mut table = ResultTable::new(
        ORDER_SHEET,
        &["item", "supplier", "unit_price", "quantity", "total"],
    );
    table.push_row(vec![
        Cell::text(&order.supply_name),
        Cell::text(&order.supplier_name),
        Cell::Number(order.unit_price),
        Cell::Number(order.quantity as f64),
        Cell::Number(order.total),
    ]);
    table
}

/// Serialize result tables into one workbook, one named sheet per table
pub fn write_workbook(tables: &[ResultTable]) -> Result<Vec<u8>, ExportError> {
    let mut workbook = Workbook::new();
    let header_format = Format::new().set_bold();

    for table in tables {
        let sheet = workbook
            .add_worksheet()
            .set_name(&table.name)
            .map_err(|e| ExportError::Serialization {
                sheet: table.name.clone(),
                message: e.to_string(),
            })?;

        for (col, header) in table.headers.iter().enumerate() {
            sheet
                .write_string_with_format(0, col as u16, header, &header_format)
                .map_err(|e| ExportError::Serialization {
                    sheet: table.name.clone(),
                    message: e.to_string(),
                })?;
        }

        for (row_idx, row) in table.rows.iter().enumerate() {
            for (col, cell) in row.iter().enumerate() {
                let result = match cell {
                    Cell::Text(s) => sheet.write_string(row_idx as u32 + 1, col as u16, s),
                    Cell::Number(n) => sheet.write_number(row_idx as u32 + 1, col as u16, *n),
                    Cell::Empty => continue,
                };
                result.map_err(|e| ExportError::Serialization {
                    sheet: table.name.clone(),
                    message: e.to_string(),
                })?;
            }
        }
    }

    workbook
        .save_to_buffer()
        .map_err(|e| ExportError::Write {
            message: e.to_string(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::join::tests::{quotation, supplier, supply};
    use crate::pipeline::{best_prices, join_quotations, supplier_means};
    use calamine::{Data, Reader, Xlsx};
    use std::io::Cursor;

    fn joined() -> Vec<QuoteRow> {
        join_quotations(
            &[supply("1", "Cement"), supply("2", "Sand")],
            &[supplier("1", "A"), supplier("2", "B")],
            &[
                quotation("q1", "1", "1", 20.0),
                quotation("q2", "1", "2", 15.0),
                quotation("q3", "2", "1", 8.5),
            ],
        )
    }

    #[test]
    fn test_workbook_round_trip() {
        let rows = joined();
        let tables = vec![
            quotes_table(FILTERED_SHEET, &rows),
            best_prices_table(&best_prices(&rows)),
            supplier_means_table(&supplier_means(&rows)),
        ];
        let bytes = write_workbook(&tables).unwrap();

        let mut workbook: Xlsx<_> = Xlsx::new(Cursor::new(bytes)).unwrap();
        let range = workbook.worksheet_range(FILTERED_SHEET).unwrap();

        // header row plus one row per joined quotation
        assert_eq!(range.height(), rows.len() + 1);
        assert_eq!(range.get_value((0, 2)), Some(&Data::String("item".to_string())));
        assert_eq!(
            range.get_value((1, 2)),
            Some(&Data::String("Cement".to_string()))
        );
        assert_eq!(range.get_value((3, 6)), Some(&Data::Float(8.5)));
    }

    #[test]
    fn test_workbook_has_named_sheets() {
        let rows = joined();
        let tables = vec![
            quotes_table(FILTERED_SHEET, &rows),
            best_prices_table(&best_prices(&rows)),
            supplier_means_table(&supplier_means(&rows)),
        ];
        let bytes = write_workbook(&tables).unwrap();

        let workbook: Xlsx<_> = Xlsx::new(Cursor::new(bytes)).unwrap();
        let names = workbook.sheet_names();
        assert_eq!(names, [FILTERED_SHEET, BEST_PRICES_SHEET, AVERAGES_SHEET]);
    }

    #[test]
    fn test_invalid_sheet_name_is_serialization_error() {
        let table = ResultTable::new("bad[name]", &["a"]);
        match write_workbook(&[table]) {
            Err(ExportError::Serialization { sheet, .. }) => assert_eq!(sheet, "bad[name]"),
            other => panic!("expected serialization error, got {other:?}"),
        }
    }

    #[test]
    fn test_empty_tables_still_write() {
        let bytes = write_workbook(&[ResultTable::new(AVERAGES_SHEET, &["supplier"])]).unwrap();
        assert!(!bytes.is_empty());
    }
}
