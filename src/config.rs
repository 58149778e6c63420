use std::path::PathBuf;

/// Startup settings for the dashboard window.
#[derive(Debug, Clone)]
pub struct DashboardConfig {
    /// Spreadsheet loaded at startup.
    pub data_path: PathBuf,
    pub window_title: String,
    pub inner_size: [f32; 2],
    pub min_inner_size: [f32; 2],
    /// Height of every chart in the central panel.
    pub chart_height: f32,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            data_path: PathBuf::from("Coffee_sales.xlsx"),
            window_title: "Coffee Sales App".to_string(),
            inner_size: [1200.0, 800.0],
            min_inner_size: [600.0, 400.0],
            chart_height: 250.0,
        }
    }
}
