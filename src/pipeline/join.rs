//! Join engine - denormalized quotation view
//!
//! Inner-joins quotations to supplies on `supply_id`, then to suppliers on
//! `supplier_id`. Rows whose references do not resolve are dropped.

use std::collections::HashMap;

use chrono::NaiveDate;
use serde::Serialize;

use crate::entities::{Quotation, Supplier, Supply};

/// One row of the joined quotation view: a quotation with its supply and
/// supplier names attached
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QuoteRow {
    pub quotation_id: String,
    pub supply_id: String,
    pub supply_name: String,
    pub unit: String,
    pub supplier_id: String,
    pub supplier_name: String,
    pub unit_price: f64,
    pub lead_time_days: Option<u32>,
    pub validity_days: Option<u32>,
    pub date: Option<NaiveDate>,
    pub notes: Option<String>,
}

/// Build the joined view, preserving quotation input order
pub fn join_quotations(
    supplies: &[Supply],
    suppliers: &[Supplier],
    quotations: &[Quotation],
) -> Vec<QuoteRow> {
    let supply_map: HashMap<&str, &Supply> =
        supplies.iter().map(|s| (s.id.as_str(), s)).collect();
    let supplier_map: HashMap<&str, &Supplier> =
        suppliers.iter().map(|s| (s.id.as_str(), s)).collect();

    quotations
        .iter()
        .filter_map(|q| {
            let supply = supply_map.get(q.supply_id.as_str())?;
            let supplier = supplier_map.get(q.supplier_id.as_str())?;
            Some(QuoteRow {
                quotation_id: q.id.clone(),
                supply_id: q.supply_id.clone(),
                supply_name: supply.name.clone(),
                unit: supply.unit.clone(),
                supplier_id: q.supplier_id.clone(),
                supplier_name: supplier.name.clone(),
                unit_price: q.unit_price,
                lead_time_days: q.lead_time_days,
                validity_days: q.validity_days,
                date: q.date,
                notes: q.notes.clone(),
            })
        })
        .collect()
}
