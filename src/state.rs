use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use crate::color::ColorMap;
use crate::data::aggregate::{compute_views, DashboardViews};
use crate::data::filter::FilterSelection;
use crate::data::loader::load_file;
use crate::data::model::{CoffeeDataset, Column, FilterOptions};
use crate::error::DashboardError;

// ---------------------------------------------------------------------------
// Error report
// ---------------------------------------------------------------------------

/// A failure shown as one red indicator with an expandable detail view.
#[derive(Debug, Clone, PartialEq)]
pub struct ErrorReport {
    pub details: String,
}

impl ErrorReport {
    pub fn from_error(err: &anyhow::Error) -> Self {
        Self {
            details: format!("{err:#}"),
        }
    }
}

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// The full UI state, independent of rendering.
#[derive(Default)]
pub struct AppState {
    /// Loaded dataset (None until a file loads successfully).
    pub dataset: Option<CoffeeDataset>,

    /// File the dataset came from.
    pub source: Option<PathBuf>,

    /// Selector options, one entry per filterable column.
    pub filter_options: Vec<FilterOptions>,

    /// Per-column filter selections.
    pub selection: FilterSelection,

    /// Views derived from the dataset and the current selection.
    pub views: Option<DashboardViews>,

    /// One colour per coffee, shared by every coffee chart.
    pub coffee_colors: ColorMap,

    pub time_of_day_colors: ColorMap,

    /// Error from the last load, filter or export.
    pub error: Option<ErrorReport>,
}

impl AppState {
    /// Load `path`, replacing the current dataset on success.
    ///
    /// On failure the previous dataset stays in place and the error is kept
    /// for display.
    pub fn load(&mut self, path: &Path) {
        let loaded = load_file(path)
            .map_err(DashboardError::from)
            .with_context(|| format!("loading {}", path.display()));

        match loaded {
            Ok(dataset) => {
                log::info!("Loaded {} transactions from {}", dataset.len(), path.display());
                self.set_dataset(dataset, path.to_path_buf());
            }
            Err(e) => {
                log::error!("Failed to load file: {e:#}");
                self.report(e);
            }
        }
    }

    /// Ingest a newly loaded dataset, reset filters and colours.
    pub fn set_dataset(&mut self, dataset: CoffeeDataset, source: PathBuf) {
        self.filter_options = dataset.filterable_columns();
        self.selection = self
            .filter_options
            .iter()
            .map(|opts| (opts.column.name().to_string(), BTreeSet::new()))
            .collect();

        self.coffee_colors = ColorMap::new(&dataset.distinct_values(Column::CoffeeName));
        self.time_of_day_colors = ColorMap::new(&dataset.distinct_values(Column::TimeOfDay));

        self.dataset = Some(dataset);
        self.source = Some(source);
        self.error = None;
        self.recompute();
    }

    /// Recompute every view after a selection change.
    pub fn recompute(&mut self) {
        let Some(dataset) = &self.dataset else {
            return;
        };
        match compute_views(dataset, &self.selection) {
            Ok(views) => {
                self.views = Some(views);
                self.error = None;
            }
            Err(e) => {
                log::warn!("Failed to compute views: {e}");
                self.views = None;
                self.report(anyhow::Error::from(e).context("applying filters"));
            }
        }
    }

    /// Toggle a single value in a column's selection.
    pub fn toggle_filter_value(&mut self, column: &str, value: &str) {
        let selected = self.selection.entry(column.to_string()).or_default();
        if !selected.remove(value) {
            selected.insert(value.to_string());
        }
        self.recompute();
    }

    /// Drop every selected value of a column.
    pub fn clear_filter(&mut self, column: &str) {
        if let Some(selected) = self.selection.get_mut(column) {
            selected.clear();
        }
        self.recompute();
    }

    /// Write the current views as pretty JSON.
    pub fn export_views(&self, path: &Path) -> Result<()> {
        let views = self.views.as_ref().context("no views to export")?;
        let json = serde_json::to_string_pretty(views).context("serializing views")?;
        std::fs::write(path, json).with_context(|| format!("writing {}", path.display()))?;
        log::info!("Exported views to {}", path.display());
        Ok(())
    }

    pub fn report(&mut self, err: anyhow::Error) {
        self.error = Some(ErrorReport::from_error(&err));
    }
}
