use std::collections::{BTreeMap, BTreeSet};

use super::model::{CoffeeDataset, Column, Transaction};
use crate::error::FilterError;

// ---------------------------------------------------------------------------
// Filter predicate: which values are allowed per column
// ---------------------------------------------------------------------------

/// Per-column selection state: maps column_name → set of allowed values.
/// If a column is absent or its set is empty, it imposes no constraint.
pub type FilterSelection = BTreeMap<String, BTreeSet<String>>;

/// Resolve column names, rejecting anything outside the schema.
///
/// Empty sets are still validated so a typo never slips through unnoticed.
fn resolve(selection: &FilterSelection) -> Result<Vec<(Column, &BTreeSet<String>)>, FilterError> {
    let mut active = Vec::new();
    for (name, allowed) in selection {
        let column = Column::from_name(name)
            .ok_or_else(|| FilterError::InvalidFilterColumn(name.clone()))?;
        if !allowed.is_empty() {
            active.push((column, allowed));
        }
    }
    Ok(active)
}

fn passes(tx: &Transaction, active: &[(Column, &BTreeSet<String>)]) -> bool {
    active
        .iter()
        .all(|(column, allowed)| allowed.contains(&tx.value(*column)))
}

/// Return a new dataset holding the rows that pass every active filter.
pub fn apply(dataset: &CoffeeDataset, selection: &FilterSelection) -> Result<CoffeeDataset, FilterError> {
    let active = resolve(selection)?;
    if active.is_empty() {
        return Ok(dataset.clone());
    }

    let rows = dataset
        .transactions()
        .iter()
        .filter(|tx| passes(tx, &active))
        .cloned()
        .collect();
    Ok(CoffeeDataset::new(rows))
}

/// Number of values selected across all columns.
pub fn selected_count(selection: &FilterSelection) -> usize {
    selection.values().map(BTreeSet::len).sum()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::tests::sale;

    fn dataset() -> CoffeeDataset {
        let mut rows = vec![
            sale("Latte", 3.5),
            sale("Latte", 4.0),
            sale("Espresso", 2.0),
            sale("Cappuccino", 3.8),
        ];
        rows[1].time_of_day = "Night".to_string();
        rows[2].time_of_day = "Night".to_string();
        rows[3].cash_type = "cash".to_string();
        CoffeeDataset::new(rows)
    }

    fn select(column: &str, values: &[&str]) -> FilterSelection {
        let mut selection = FilterSelection::new();
        selection.insert(
            column.to_string(),
            values.iter().map(|v| v.to_string()).collect(),
        );
        selection
    }

    #[test]
    fn test_empty_selection_is_identity() {
        let ds = dataset();
        assert_eq!(apply(&ds, &FilterSelection::new()).unwrap(), ds);

        let mut all_empty = FilterSelection::new();
        for column in Column::FILTERABLE {
            all_empty.insert(column.name().to_string(), BTreeSet::new());
        }
        assert_eq!(apply(&ds, &all_empty).unwrap(), ds);
    }

    #[test]
    fn test_single_column_filter() {
        let out = apply(&dataset(), &select("coffee_name", &["Latte"])).unwrap();
        assert_eq!(out.len(), 2);
        assert!(out.transactions().iter().all(|t| t.coffee_name == "Latte"));
    }

    #[test]
    fn test_columns_combine_with_and() {
        let mut selection = select("coffee_name", &["Latte", "Espresso"]);
        selection.extend(select("Time_of_Day", &["Night"]));
        let out = apply(&dataset(), &selection).unwrap();
        let names: Vec<&str> = out.transactions().iter().map(|t| t.coffee_name.as_str()).collect();
        assert_eq!(names, vec!["Latte", "Espresso"]);
    }

    #[test]
    fn test_filter_order_does_not_matter() {
        let ds = dataset();
        let a = select("coffee_name", &["Latte", "Cappuccino"]);
        let b = select("time_of_day", &["Morning"]);

        let a_then_b = apply(&apply(&ds, &a).unwrap(), &b).unwrap();
        let b_then_a = apply(&apply(&ds, &b).unwrap(), &a).unwrap();
        assert_eq!(a_then_b, b_then_a);
        assert_eq!(a_then_b.len(), 2);
    }

    #[test]
    fn test_output_never_larger_than_input() {
        let ds = dataset();
        for selection in [
            select("coffee_name", &["Latte"]),
            select("cash_type", &["cash", "card"]),
            select("weekday", &["Mon"]),
        ] {
            assert!(apply(&ds, &selection).unwrap().len() <= ds.len());
        }
    }

    #[test]
    fn test_unknown_value_yields_no_rows() {
        let out = apply(&dataset(), &select("weekday", &["Mon"])).unwrap();
        assert!(out.is_empty());
    }

    #[test]
    fn test_unknown_column_is_rejected() {
        let err = apply(&dataset(), &select("cofee_name", &["Latte"])).unwrap_err();
        assert!(matches!(err, FilterError::InvalidFilterColumn(ref c) if c == "cofee_name"));

        let err = apply(&dataset(), &select("size", &[])).unwrap_err();
        assert!(matches!(err, FilterError::InvalidFilterColumn(_)));
    }

    #[test]
    fn test_input_is_not_mutated() {
        let ds = dataset();
        let before = ds.clone();
        let _ = apply(&ds, &select("coffee_name", &["Espresso"])).unwrap();
        assert_eq!(ds, before);
    }

    #[test]
    fn test_selected_count() {
        let mut selection = select("coffee_name", &["Latte", "Espresso"]);
        selection.insert("weekday".to_string(), BTreeSet::new());
        assert_eq!(selected_count(&selection), 2);
    }
}
