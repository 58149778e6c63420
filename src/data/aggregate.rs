use std::collections::HashMap;

use chrono::NaiveDate;
use serde::Serialize;

use super::filter::{self, FilterSelection};
use super::model::{CoffeeDataset, Column, Transaction};
use crate::error::DashboardError;

// ---------------------------------------------------------------------------
// View types
// ---------------------------------------------------------------------------

/// Headline numbers for the current selection.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OverviewMetrics {
    pub cups_sold: usize,
    pub total_revenue: f64,
    /// Mean sale; `0.0` when nothing matches.
    pub avg_sale: f64,
    /// Share of all-time revenue, e.g. `"78.95%"`.
    pub percent_contribution: String,
}

/// A small ordered table of `(category, value)` rows.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryTable<V> {
    pub category_label: &'static str,
    pub value_label: &'static str,
    pub rows: Vec<(String, V)>,
}

impl<V> CategoryTable<V> {
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn categories(&self) -> Vec<String> {
        self.rows.iter().map(|(c, _)| c.clone()).collect()
    }
}

/// One sale on the revenue time series.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DatePoint {
    pub date: NaiveDate,
    pub coffee_name: String,
    pub money: f64,
}

/// Everything the dashboard draws for one selection.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardViews {
    pub overview: OverviewMetrics,
    pub time_of_day: CategoryTable<usize>,
    pub revenue_by_coffee: CategoryTable<f64>,
    pub monthly_trend: CategoryTable<f64>,
    pub avg_revenue: CategoryTable<f64>,
    pub date_series: Vec<DatePoint>,
    /// Rows that passed the filter.
    pub filtered_rows: usize,
}

// ---------------------------------------------------------------------------
// Grouping helpers
// ---------------------------------------------------------------------------

/// Fold rows into per-category accumulators, keeping first-seen order.
fn group_by<A: Default>(
    dataset: &CoffeeDataset,
    key: impl Fn(&Transaction) -> &str,
    mut fold: impl FnMut(&mut A, &Transaction),
) -> Vec<(String, A)> {
    let mut index: HashMap<String, usize> = HashMap::new();
    let mut groups: Vec<(String, A)> = Vec::new();

    for tx in dataset.transactions() {
        let k = key(tx);
        let slot = match index.get(k) {
            Some(&i) => i,
            None => {
                index.insert(k.to_string(), groups.len());
                groups.push((k.to_string(), A::default()));
                groups.len() - 1
            }
        };
        fold(&mut groups[slot].1, tx);
    }
    groups
}

fn sum_money(dataset: &CoffeeDataset, key: impl Fn(&Transaction) -> &str) -> Vec<(String, f64)> {
    group_by(dataset, key, |acc: &mut f64, tx| *acc += tx.money)
}

/// Order groups by category name so value ties fall back to key order.
fn by_category<A>(mut rows: Vec<(String, A)>) -> Vec<(String, A)> {
    rows.sort_by(|a, b| a.0.cmp(&b.0));
    rows
}

fn mean(sum: f64, count: usize) -> f64 {
    if count == 0 {
        0.0
    } else {
        sum / count as f64
    }
}

// ---------------------------------------------------------------------------
// Aggregates
// ---------------------------------------------------------------------------

/// Format a percentage the way the overview shows it.
pub fn format_percent(value: f64) -> String {
    format!("{value:.2}%")
}

/// Overview metrics for `filtered`, with revenue share measured against `full`.
pub fn overview(filtered: &CoffeeDataset, full: &CoffeeDataset) -> OverviewMetrics {
    let cups_sold = filtered.len();
    let total_revenue = filtered.total_revenue();
    let full_revenue = full.total_revenue();

    let share = if full_revenue == 0.0 {
        0.0
    } else {
        total_revenue / full_revenue * 100.0
    };

    OverviewMetrics {
        cups_sold,
        total_revenue,
        avg_sale: mean(total_revenue, cups_sold),
        percent_contribution: format_percent(share),
    }
}

/// Cups sold per time of day, most popular first.
pub fn time_of_day_distribution(dataset: &CoffeeDataset) -> CategoryTable<usize> {
    let mut rows = group_by(dataset, |tx| tx.time_of_day.as_str(), |n: &mut usize, _| *n += 1);
    rows.sort_by(|a, b| b.1.cmp(&a.1));
    CategoryTable {
        category_label: "Time of Day",
        value_label: "Cups sold",
        rows,
    }
}

/// Revenue per coffee, highest first; ties in name order.
pub fn revenue_by_coffee(dataset: &CoffeeDataset) -> CategoryTable<f64> {
    let mut rows = by_category(sum_money(dataset, |tx| tx.coffee_name.as_str()));
    rows.sort_by(|a, b| b.1.total_cmp(&a.1));
    CategoryTable {
        category_label: Column::CoffeeName.name(),
        value_label: Column::Money.name(),
        rows,
    }
}

/// Revenue per month, highest first.
pub fn monthly_trend(dataset: &CoffeeDataset) -> CategoryTable<f64> {
    let mut rows = by_category(sum_money(dataset, |tx| tx.month_name.as_str()));
    rows.sort_by(|a, b| b.1.total_cmp(&a.1));
    CategoryTable {
        category_label: Column::MonthName.name(),
        value_label: Column::Money.name(),
        rows,
    }
}

/// Mean sale per coffee, cheapest first.
pub fn avg_revenue_by_coffee(dataset: &CoffeeDataset) -> CategoryTable<f64> {
    let sums = group_by(dataset, |tx| tx.coffee_name.as_str(), |acc: &mut (f64, usize), tx| {
        acc.0 += tx.money;
        acc.1 += 1;
    });
    let mut rows: Vec<(String, f64)> = by_category(sums)
        .into_iter()
        .map(|(name, (sum, count))| (name, mean(sum, count)))
        .collect();
    rows.sort_by(|a, b| a.1.total_cmp(&b.1));
    CategoryTable {
        category_label: Column::CoffeeName.name(),
        value_label: Column::Money.name(),
        rows,
    }
}

/// Raw `(date, coffee, money)` points in dataset order.
pub fn date_series(dataset: &CoffeeDataset) -> Vec<DatePoint> {
    dataset
        .transactions()
        .iter()
        .map(|tx| DatePoint {
            date: tx.date,
            coffee_name: tx.coffee_name.clone(),
            money: tx.money,
        })
        .collect()
}

/// Filter `full` with `selection` and derive every view.
///
/// Overview and revenue-by-coffee follow the filter; the remaining views
/// always describe the full dataset.
pub fn compute_views(full: &CoffeeDataset, selection: &FilterSelection) -> Result<DashboardViews, DashboardError> {
    let filtered = filter::apply(full, selection)?;
    log::debug!(
        "Recomputing views: {} selected values, {}/{} rows",
        filter::selected_count(selection),
        filtered.len(),
        full.len()
    );

    Ok(DashboardViews {
        overview: overview(&filtered, full),
        time_of_day: time_of_day_distribution(full),
        revenue_by_coffee: revenue_by_coffee(&filtered),
        monthly_trend: monthly_trend(full),
        avg_revenue: avg_revenue_by_coffee(full),
        date_series: date_series(full),
        filtered_rows: filtered.len(),
    })
}
