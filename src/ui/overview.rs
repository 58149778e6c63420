use eframe::egui::{self, Color32, RichText, Ui};

use crate::data::aggregate::OverviewMetrics;
use crate::state::ErrorReport;
use crate::ui::currency;

/// Headline metrics in four columns.
pub fn quick_overview(ui: &mut Ui, metrics: &OverviewMetrics) {
    ui.heading("Quick Overview");

    let cards = [
        ("Cups Sold", metrics.cups_sold.to_string()),
        ("Revenue", currency(metrics.total_revenue)),
        ("Avg Sale", currency(metrics.avg_sale)),
        ("Percent Contribution to Sales", metrics.percent_contribution.clone()),
    ];

    ui.columns(cards.len(), |cols: &mut [Ui]| {
        for (col, (title, value)) in cols.iter_mut().zip(cards) {
            col.label(RichText::new(title).weak());
            col.label(RichText::new(value).size(26.0).strong());
        }
    });
}

/// Red error indicator with the full cause chain folded underneath.
pub fn error_report(ui: &mut Ui, report: &ErrorReport) {
    ui.colored_label(Color32::RED, "Error: check error details");
    egui::CollapsingHeader::new("Error Details")
        .id_salt("error_details")
        .default_open(false)
        .show(ui, |ui: &mut Ui| {
            ui.code(&report.details);
        });
}
