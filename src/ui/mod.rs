pub mod overview;
pub mod panels;
pub mod plot;
pub mod tables;

/// `$1,234.50` style money label.
pub fn currency(value: f64) -> String {
    format!("${}", format_num::format_num!(",.2", value))
}

/// Axis label for a categorical position; blank between categories.
pub fn category_label(labels: &[String], value: f64) -> String {
    let idx = value.round();
    if idx < 0.0 || (value - idx).abs() > 1e-6 {
        return String::new();
    }
    labels.get(idx as usize).cloned().unwrap_or_default()
}
