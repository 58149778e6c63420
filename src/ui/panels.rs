use eframe::egui::{self, RichText, ScrollArea, Ui};

use crate::data::loader::SUPPORTED_EXTENSIONS;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Left side panel – filter widgets
// ---------------------------------------------------------------------------

/// Render the left filter panel.
pub fn side_panel(ui: &mut Ui, state: &mut AppState) {
    ui.heading("Filters");
    ui.separator();

    if state.dataset.is_none() {
        ui.label("No dataset loaded.");
        return;
    }

    // Clone what we need so we can mutate state after the loop.
    let options = state.filter_options.clone();
    let mut toggled: Vec<(String, String)> = Vec::new();
    let mut cleared: Vec<String> = Vec::new();

    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            for opts in &options {
                let col = opts.column.name();
                let selected = state.selection.get(col);
                let n_selected = selected.map_or(0, |s| s.len());
                let n_total = opts.values.len();
                let header_text = format!("{col}  ({n_selected}/{n_total})");

                egui::CollapsingHeader::new(RichText::new(header_text).strong())
                    .id_salt(col)
                    .default_open(false)
                    .show(ui, |ui: &mut Ui| {
                        if ui
                            .add_enabled(n_selected > 0, egui::Button::new("Clear").small())
                            .clicked()
                        {
                            cleared.push(col.to_string());
                        }

                        for val in &opts.values {
                            let mut checked = selected.is_some_and(|s| s.contains(val));
                            if ui.checkbox(&mut checked, val.as_str()).changed() {
                                toggled.push((col.to_string(), val.clone()));
                            }
                        }
                    });
            }
        });

    for col in cleared {
        state.clear_filter(&col);
    }
    for (col, val) in toggled {
        state.toggle_filter_value(&col, &val);
    }
}

// ---------------------------------------------------------------------------
// Top bar
// ---------------------------------------------------------------------------

/// Render the top menu / toolbar.
pub fn top_bar(ui: &mut Ui, state: &mut AppState) {
    egui::menu::bar(ui, |ui: &mut Ui| {
        ui.menu_button("File", |ui: &mut Ui| {
            if ui.button("Open…").clicked() {
                open_file_dialog(state);
                ui.close_menu();
            }
            if ui
                .add_enabled(state.views.is_some(), egui::Button::new("Export views…"))
                .clicked()
            {
                export_dialog(state);
                ui.close_menu();
            }
        });

        ui.separator();

        if let (Some(ds), Some(views)) = (&state.dataset, &state.views) {
            ui.label(format!(
                "{} transactions loaded, {} match filters",
                ds.len(),
                views.filtered_rows
            ));
        }

        if let Some(name) = state.source.as_ref().and_then(|p| p.file_name()) {
            ui.separator();
            ui.weak(name.to_string_lossy().into_owned());
        }
    });
}

// ---------------------------------------------------------------------------
// File dialogs
// ---------------------------------------------------------------------------

pub fn open_file_dialog(state: &mut AppState) {
    let file = rfd::FileDialog::new()
        .set_title("Open coffee sales data")
        .add_filter("Supported files", SUPPORTED_EXTENSIONS)
        .add_filter("Spreadsheets", &["xlsx", "xlsm", "xls", "xlsb", "ods"])
        .add_filter("CSV", &["csv"])
        .add_filter("JSON", &["json"])
        .add_filter("Parquet", &["parquet", "pq"])
        .pick_file();

    if let Some(path) = file {
        state.load(&path);
    }
}

pub fn export_dialog(state: &mut AppState) {
    let file = rfd::FileDialog::new()
        .set_title("Export dashboard views")
        .set_file_name("coffee_sales_views.json")
        .add_filter("JSON", &["json"])
        .save_file();

    if let Some(path) = file {
        if let Err(e) = state.export_views(&path) {
            log::error!("Failed to export views: {e:#}");
            state.report(e);
        }
    }
}
