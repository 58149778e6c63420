use eframe::egui::{self, ScrollArea, Ui};

use crate::config::DashboardConfig;
use crate::state::AppState;
use crate::ui::{currency, overview, panels, plot, tables};

// ---------------------------------------------------------------------------
// eframe App implementation
// ---------------------------------------------------------------------------

pub struct CoffeeSalesApp {
    pub state: AppState,
    chart_height: f32,
}

impl CoffeeSalesApp {
    /// Create the app and load the configured spreadsheet.
    pub fn new(config: &DashboardConfig) -> Self {
        let mut state = AppState::default();
        state.load(&config.data_path);
        Self {
            state,
            chart_height: config.chart_height,
        }
    }
}

impl eframe::App for CoffeeSalesApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // ---- Top panel: menu bar ----
        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
            panels::top_bar(ui, &mut self.state);
        });

        // ---- Left side panel: filters ----
        egui::SidePanel::left("filter_panel")
            .default_width(220.0)
            .resizable(true)
            .show(ctx, |ui| {
                panels::side_panel(ui, &mut self.state);
            });

        // ---- Central panel: metrics, tables, charts ----
        egui::CentralPanel::default().show(ctx, |ui| {
            ScrollArea::vertical()
                .auto_shrink([false, false])
                .show(ui, |ui: &mut Ui| dashboard(ui, &self.state, self.chart_height));
        });
    }
}

fn dashboard(ui: &mut Ui, state: &AppState, chart_height: f32) {
    ui.heading("Coffee Sales App");

    if let Some(report) = &state.error {
        overview::error_report(ui, report);
    }

    let Some(views) = &state.views else {
        if state.error.is_none() {
            ui.centered_and_justified(|ui: &mut Ui| {
                ui.heading("Open a file to view sales  (File → Open…)");
            });
        }
        return;
    };

    overview::quick_overview(ui, &views.overview);
    ui.separator();

    ui.heading("Analysis Findings");
    tables::category_table(ui, "time_of_day_table", &views.time_of_day, |n| n.to_string());
    plot::time_of_day_chart(ui, &views.time_of_day, &state.time_of_day_colors, chart_height);
    ui.separator();

    ui.heading("Revenue by Coffee Types");
    tables::category_table(ui, "revenue_by_coffee_table", &views.revenue_by_coffee, |m| currency(*m));
    plot::revenue_by_coffee_chart(ui, &views.revenue_by_coffee, &state.coffee_colors, chart_height);
    ui.separator();

    ui.heading("Monthly sales trend");
    tables::category_table(ui, "monthly_trend_table", &views.monthly_trend, |m| currency(*m));
    plot::monthly_trend_chart(ui, &views.monthly_trend, chart_height);
    plot::date_series_chart(ui, &views.date_series, &state.coffee_colors, chart_height);
    ui.separator();

    ui.heading("Average revenue per coffee sold");
    tables::category_table(ui, "avg_revenue_table", &views.avg_revenue, |m| currency(*m));
    plot::avg_revenue_chart(ui, &views.avg_revenue, chart_height);
}
