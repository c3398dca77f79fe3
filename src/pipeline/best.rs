//! Best-price selector - stable minimum per supply item

use std::collections::HashMap;

use crate::pipeline::QuoteRow;

/// Select the cheapest row per distinct supply
///
/// Groups appear in order of their first occurrence in the input; within a
/// group the first-encountered row wins price ties (replacement only on a
/// strictly smaller price). Empty input yields empty output.
pub fn best_prices(rows: &[QuoteRow]) -> Vec<QuoteRow> {
    let mut index: HashMap<&str, usize> = HashMap::new();
    let mut result: Vec<QuoteRow> = Vec::new();

    for row in rows {
        match index.get(row.supply_id.as_str()) {
            Some(&i) => {
                if row.unit_price < result[i].unit_price {
                    result[i] = row.clone();
                }
            }
            None => {
                index.insert(row.supply_id.as_str(), result.len());
                result.push(row.clone());
            }
        }
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::join::tests::{quotation, supplier, supply};
    use crate::pipeline::join_quotations;

    #[test]
    fn test_minimum_per_group() {
        let rows = join_quotations(
            &[supply("1", "Cement")],
            &[supplier("1", "A"), supplier("2", "B")],
            &[
                quotation("q1", "1", "1", 20.0),
                quotation("q2", "1", "2", 15.0),
            ],
        );

        let best = best_prices(&rows);
        assert_eq!(best.len(), 1);
        assert_eq!(best[0].unit_price, 15.0);
        assert_eq!(best[0].supplier_name, "B");
    }

    #[test]
    fn test_best_is_lower_bound_of_group() {
        let rows = join_quotations(
            &[supply("1", "Cement"), supply("2", "Sand")],
            &[supplier("1", "A"), supplier("2", "B")],
            &[
                quotation("q1", "1", "1", 20.0),
                quotation("q2", "1", "2", 15.0),
                quotation("q3", "2", "2", 9.0),
                quotation("q4", "2", "1", 8.0),
            ],
        );

        for best in best_prices(&rows) {
            for row in rows.iter().filter(|r| r.supply_id == best.supply_id) {
                assert!(best.unit_price <= row.unit_price);
            }
        }
    }

    #[test]
    fn test_tie_keeps_first_encountered() {
        let rows = join_quotations(
            &[supply("1", "Cement")],
            &[supplier("1", "A"), supplier("2", "B")],
            &[
                quotation("q1", "1", "2", 15.0),
                quotation("q2", "1", "1", 15.0),
            ],
        );

        let best = best_prices(&rows);
        assert_eq!(best[0].quotation_id, "q1");
        assert_eq!(best[0].supplier_name, "B");
    }

    #[test]
    fn test_groups_ordered_by_first_appearance() {
        let rows = join_quotations(
            &[supply("1", "Cement"), supply("2", "Sand")],
            &[supplier("1", "A")],
            &[
                quotation("q1", "2", "1", 5.0),
                quotation("q2", "1", "1", 7.0),
                quotation("q3", "2", "1", 4.0),
            ],
        );

        let best = best_prices(&rows);
        let names: Vec<&str> = best.iter().map(|r| r.supply_name.as_str()).collect();
        assert_eq!(names, ["Sand", "Cement"]);
    }

    #[test]
    fn test_empty_input() {
        assert!(best_prices(&[]).is_empty());
    }
}
