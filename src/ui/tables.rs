use eframe::egui::Ui;
use egui_extras::{Column, TableBuilder};

use crate::data::aggregate::CategoryTable;

// ---------------------------------------------------------------------------
// Two-column category tables
// ---------------------------------------------------------------------------

/// Render a `(category, value)` table, formatting values with `fmt`.
pub fn category_table<V>(ui: &mut Ui, id: &str, table: &CategoryTable<V>, fmt: impl Fn(&V) -> String) {
    if table.is_empty() {
        ui.weak("No rows match the current filters.");
        return;
    }

    ui.push_id(id, |ui: &mut Ui| {
        TableBuilder::new(ui)
            .striped(true)
            .vscroll(false)
            .column(Column::auto().at_least(160.0))
            .column(Column::auto().at_least(100.0))
            .header(20.0, |mut header| {
                header.col(|ui| {
                    ui.strong(table.category_label);
                });
                header.col(|ui| {
                    ui.strong(table.value_label);
                });
            })
            .body(|mut body| {
                for (category, value) in &table.rows {
                    body.row(18.0, |mut row| {
                        row.col(|ui| {
                            ui.label(category);
                        });
                        row.col(|ui| {
                            ui.label(fmt(value));
                        });
                    });
                }
            });
    });
}
