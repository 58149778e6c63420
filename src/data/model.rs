use std::collections::HashSet;
use std::fmt;

use chrono::NaiveDate;

/// Placeholder category for sales without a card identifier.
pub const NON_CARD: &str = "Non-card";

// ---------------------------------------------------------------------------
// Column – the fixed transaction schema
// ---------------------------------------------------------------------------

/// One column of the transaction schema.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Column {
    Date,
    TimeOfDay,
    MonthName,
    Weekday,
    CashType,
    Card,
    CoffeeName,
    Money,
}

impl Column {
    /// Every column, in schema order.
    pub const ALL: [Column; 8] = [
        Column::Date,
        Column::TimeOfDay,
        Column::MonthName,
        Column::Weekday,
        Column::CashType,
        Column::Card,
        Column::CoffeeName,
        Column::Money,
    ];

    /// Columns offered as filters, in the order the side panel shows them.
    pub const FILTERABLE: [Column; 5] = [
        Column::CoffeeName,
        Column::TimeOfDay,
        Column::MonthName,
        Column::CashType,
        Column::Weekday,
    ];

    /// Canonical snake_case name.
    pub fn name(self) -> &'static str {
        match self {
            Column::Date => "date",
            Column::TimeOfDay => "time_of_day",
            Column::MonthName => "month_name",
            Column::Weekday => "weekday",
            Column::CashType => "cash_type",
            Column::Card => "card",
            Column::CoffeeName => "coffee_name",
            Column::Money => "money",
        }
    }

    /// Case-insensitive lookup, so `Time_of_Day` resolves like `time_of_day`.
    pub fn from_name(name: &str) -> Option<Column> {
        let name = name.trim();
        Column::ALL
            .into_iter()
            .find(|c| c.name().eq_ignore_ascii_case(name))
    }
}

impl fmt::Display for Column {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

// ---------------------------------------------------------------------------
// Transaction – one row of the sales sheet
// ---------------------------------------------------------------------------

/// A single point-of-sale transaction.
#[derive(Debug, Clone, PartialEq)]
pub struct Transaction {
    pub date: NaiveDate,
    pub time_of_day: String,
    pub month_name: String,
    pub weekday: String,
    pub cash_type: String,
    /// Card identifier, or [`NON_CARD`] for cash sales.
    pub card: String,
    pub coffee_name: String,
    pub money: f64,
}

impl Transaction {
    /// Textual value of `column`, as matched by filters.
    pub fn value(&self, column: Column) -> String {
        match column {
            Column::Date => self.date.format("%Y-%m-%d").to_string(),
            Column::TimeOfDay => self.time_of_day.clone(),
            Column::MonthName => self.month_name.clone(),
            Column::Weekday => self.weekday.clone(),
            Column::CashType => self.cash_type.clone(),
            Column::Card => self.card.clone(),
            Column::CoffeeName => self.coffee_name.clone(),
            Column::Money => format_number(self.money),
        }
    }
}

/// Text form of a number. Integral values print without a trailing `.0`.
pub fn format_number(n: f64) -> String {
    if n.fract() == 0.0 && n.abs() < 1e15 {
        format!("{}", n as i64)
    } else {
        n.to_string()
    }
}

// ---------------------------------------------------------------------------
// CoffeeDataset – the loaded snapshot
// ---------------------------------------------------------------------------

/// An immutable, ordered collection of transactions.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CoffeeDataset {
    transactions: Vec<Transaction>,
}

/// Distinct values of one filterable column, handed to the filter widgets.
#[derive(Debug, Clone, PartialEq)]
pub struct FilterOptions {
    pub column: Column,
    pub values: Vec<String>,
}

impl CoffeeDataset {
    pub fn new(transactions: Vec<Transaction>) -> Self {
        Self { transactions }
    }

    pub fn transactions(&self) -> &[Transaction] {
        &self.transactions
    }

    /// Number of transactions.
    pub fn len(&self) -> usize {
        self.transactions.len()
    }

    /// Whether the dataset is empty.
    pub fn is_empty(&self) -> bool {
        self.transactions.is_empty()
    }

    /// Sum of `money` over every row.
    pub fn total_revenue(&self) -> f64 {
        self.transactions.iter().map(|t| t.money).sum()
    }

    /// Distinct values of `column` in first-seen order.
    pub fn distinct_values(&self, column: Column) -> Vec<String> {
        let mut seen = HashSet::new();
        self.transactions
            .iter()
            .map(|t| t.value(column))
            .filter(|v| seen.insert(v.clone()))
            .collect()
    }

    /// Selector options for every filterable column.
    pub fn filterable_columns(&self) -> Vec<FilterOptions> {
        Column::FILTERABLE
            .into_iter()
            .map(|column| FilterOptions {
                column,
                values: self.distinct_values(column),
            })
            .collect()
    }
}
