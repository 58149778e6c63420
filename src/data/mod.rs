/// Data layer: core types, loading, filtering and aggregation.
///
/// Architecture:
/// ```text
///  .xlsx / .csv / .json / .parquet
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  parse file → CoffeeDataset ("Non-card" for missing cards)
///   └──────────┘
///        │
///        ▼
///   ┌──────────────┐
///   │ CoffeeDataset │  Vec<Transaction>, immutable
///   └──────────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  filter   │  FilterSelection → filtered CoffeeDataset
///   └──────────┘
///        │
///        ▼
///   ┌───────────┐
///   │ aggregate  │  overview metrics + grouped tables → DashboardViews
///   └───────────┘
/// ```

pub mod aggregate;
pub mod filter;
pub mod loader;
pub mod model;
