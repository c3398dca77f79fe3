//! Aggregations over the filtered quotation view
//!
//! Two independent reductions: mean price per supplier, and per-item price
//! history series for charting. Both tolerate empty input.

use std::collections::{BTreeMap, HashMap};

use chrono::NaiveDate;
use serde::Serialize;

use crate::pipeline::QuoteRow;

/// Mean unit price across a supplier's quotations
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SupplierMean {
    pub supplier_name: String,
    pub mean_price: f64,
    pub quote_count: usize,
}

/// Mean unit price grouped by supplier name, sorted by name ascending
pub fn supplier_means(rows: &[QuoteRow]) -> Vec<SupplierMean> {
    let mut sums: BTreeMap<&str, (f64, usize)> = BTreeMap::new();
    for row in rows {
        let entry = sums.entry(row.supplier_name.as_str()).or_insert((0.0, 0));
        entry.0 += row.unit_price;
        entry.1 += 1;
    }

    sums.into_iter()
        .map(|(name, (sum, count))| SupplierMean {
            supplier_name: name.to_string(),
            mean_price: sum / count as f64,
            quote_count: count,
        })
        .collect()
}

/// One dated price observation
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PricePoint {
    pub date: NaiveDate,
    pub unit_price: f64,
}

/// Price evolution of one item at one supplier
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HistorySeries {
    pub supplier_name: String,
    pub points: Vec<PricePoint>,
}

/// Price history of one item, one series per supplier
///
/// Suppliers appear in order of first occurrence; each series is sorted by
/// date ascending (stable). Rows without a date are omitted.
pub fn price_history(rows: &[QuoteRow], item: &str) -> Vec<HistorySeries> {
    let mut order: Vec<&str> = Vec::new();
    let mut by_supplier: HashMap<&str, Vec<PricePoint>> = HashMap::new();

    for row in rows {
        if row.supply_name != item {
            continue;
        }
        let Some(date) = row.date else { continue };

        if !by_supplier.contains_key(row.supplier_name.as_str()) {
            order.push(row.supplier_name.as_str());
        }
        by_supplier
            .entry(row.supplier_name.as_str())
            .or_default()
            .push(PricePoint {
                date,
                unit_price: row.unit_price,
            });
    }

    order
        .into_iter()
        .map(|name| {
            let mut points = by_supplier.remove(name).unwrap_or_default();
            points.sort_by_key(|p| p.date);
            HistorySeries {
                supplier_name: name.to_string(),
                points,
            }
        })
        .collect()
}
