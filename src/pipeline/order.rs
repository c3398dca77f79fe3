//! Order simulation - quantity × unit price for a chosen pair

use serde::Serialize;
use thiserror::Error;

use crate::pipeline::QuoteRow;

/// Order simulation errors
#[derive(Debug, Error, PartialEq, Eq)]
pub enum OrderError {
    #[error("no quotation found for item '{item}' from supplier '{supplier}'")]
    NoMatchingQuotation { item: String, supplier: String },
}

/// A simulated order against one quotation
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OrderQuote {
    pub supply_name: String,
    pub supplier_name: String,
    pub unit_price: f64,
    pub quantity: u32,
    /// Full-precision total; rounding to 2 decimal places is display-only
    pub total: f64,
}

/// Simulate an order for the first row matching (item, supplier)
///
/// Names are matched exactly. Quantity 0 is permitted and totals 0.00.
pub fn simulate_order(
    rows: &[QuoteRow],
    item: &str,
    supplier: &str,
    quantity: u32,
) -> Result<OrderQuote, OrderError> {
    let row = rows
        .iter()
        .find(|r| r.supply_name == item && r.supplier_name == supplier)
        .ok_or_else(|| OrderError::NoMatchingQuotation {
            item: item.to_string(),
            supplier: supplier.to_string(),
        })?;

    Ok(OrderQuote {
        supply_name: row.supply_name.clone(),
        supplier_name: row.supplier_name.clone(),
        unit_price: row.unit_price,
        quantity,
        total: row.unit_price * quantity as f64,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::join::tests::{quotation, supplier, supply};
    use crate::pipeline::join_quotations;

    fn rows() -> Vec<QuoteRow> {
        join_quotations(
            &[supply("1", "Cement")],
            &[supplier("1", "A"), supplier("2", "B")],
            &[
                quotation("q1", "1", "1", 10.0),
                quotation("q2", "1", "2", 15.0),
            ],
        )
    }

    #[test]
    fn test_total_is_price_times_quantity() {
        let order = simulate_order(&rows(), "Cement", "A", 5).unwrap();
        assert_eq!(order.unit_price, 10.0);
        assert_eq!(order.total, 50.0);
    }

    #[test]
    fn test_quantity_zero_totals_zero() {
        let order = simulate_order(&rows(), "Cement", "B", 0).unwrap();
        assert_eq!(order.total, 0.0);
    }

    #[test]
    fn test_no_matching_pair() {
        let err = simulate_order(&rows(), "Cement", "C", 5).unwrap_err();
        assert_eq!(
            err,
            OrderError::NoMatchingQuotation {
                item: "Cement".to_string(),
                supplier: "C".to_string(),
            }
        );
    }

    #[test]
    fn test_pair_excluded_by_filter_does_not_match() {
        use crate::pipeline::{filter_rows, Selection};

        let all = rows();
        let selection = Selection::all().with_suppliers(vec!["A".to_string()]);
        let filtered = filter_rows(&all, &selection);

        assert!(simulate_order(&filtered, "Cement", "B", 1).is_err());
        assert!(simulate_order(&filtered, "Cement", "A", 1).is_ok());
    }

    #[test]
    fn test_first_matching_row_wins() {
        let many = join_quotations(
            &[supply("1", "Cement")],
            &[supplier("1", "A")],
            &[
                quotation("q1", "1", "1", 10.0),
                quotation("q2", "1", "1", 12.0),
            ],
        );
        let order = simulate_order(&many, "Cement", "A", 1).unwrap();
        assert_eq!(order.unit_price, 10.0);
    }
}
