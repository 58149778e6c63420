use chrono::{Datelike, NaiveDate};
use eframe::egui::{Color32, Ui};
use egui_plot::{Bar, BarChart, Legend, Line, Plot, PlotPoints, Points};

use crate::color::{revenue_shade, ColorMap};
use crate::data::aggregate::{CategoryTable, DatePoint};
use crate::ui::category_label;

// ---------------------------------------------------------------------------
// Bar charts
// ---------------------------------------------------------------------------

fn static_plot(id: &str, height: f32) -> Plot<'_> {
    Plot::new(id)
        .height(height)
        .allow_drag(false)
        .allow_scroll(false)
        .allow_zoom(false)
        .allow_boxed_zoom(false)
}

/// Cups sold per time of day as horizontal bars, one colour per category.
pub fn time_of_day_chart(ui: &mut Ui, table: &CategoryTable<usize>, colors: &ColorMap, height: f32) {
    let labels = table.categories();
    let bars: Vec<Bar> = table
        .rows
        .iter()
        .enumerate()
        .map(|(i, (category, count))| {
            Bar::new(i as f64, *count as f64)
                .name(category)
                .fill(colors.color_for(category))
                .width(0.7)
        })
        .collect();

    static_plot("time_of_day_chart", height)
        .x_axis_label(table.value_label)
        .y_axis_formatter(move |mark, _range| category_label(&labels, mark.value))
        .show(ui, |plot_ui| plot_ui.bar_chart(BarChart::new(bars).horizontal()));
}

/// Vertical bars for a `(category, money)` table, coloured by `color`.
pub fn revenue_bars(
    ui: &mut Ui,
    id: &str,
    table: &CategoryTable<f64>,
    height: f32,
    color: impl Fn(&str, f64) -> Color32,
) {
    let labels = table.categories();
    let bars: Vec<Bar> = table
        .rows
        .iter()
        .enumerate()
        .map(|(i, (category, money))| {
            Bar::new(i as f64, *money)
                .name(category)
                .fill(color(category, *money))
                .width(0.7)
        })
        .collect();

    static_plot(id, height)
        .y_axis_label(table.value_label)
        .x_axis_formatter(move |mark, _range| category_label(&labels, mark.value))
        .show(ui, |plot_ui| plot_ui.bar_chart(BarChart::new(bars)));
}

/// Revenue per coffee; each coffee keeps its own colour.
pub fn revenue_by_coffee_chart(ui: &mut Ui, table: &CategoryTable<f64>, colors: &ColorMap, height: f32) {
    revenue_bars(ui, "revenue_by_coffee_chart", table, height, |category, _| {
        colors.color_for(category)
    });
}

/// Revenue per month, shaded by how much each month earned.
pub fn monthly_trend_chart(ui: &mut Ui, table: &CategoryTable<f64>, height: f32) {
    let max = table.rows.iter().map(|(_, m)| *m).fold(0.0, f64::max);
    revenue_bars(ui, "monthly_trend_chart", table, height, |_, money| {
        revenue_shade(money, max)
    });
}

// ---------------------------------------------------------------------------
// Line charts
// ---------------------------------------------------------------------------

fn date_axis_label(value: f64) -> String {
    NaiveDate::from_num_days_from_ce_opt(value.round() as i32)
        .map(|d| d.format("%Y-%m-%d").to_string())
        .unwrap_or_default()
}

/// Group the date series into one date-sorted line per coffee.
fn series_by_coffee(points: &[DatePoint]) -> Vec<(String, Vec<[f64; 2]>)> {
    let mut series: Vec<(String, Vec<(NaiveDate, f64)>)> = Vec::new();
    for p in points {
        match series.iter_mut().find(|(name, _)| *name == p.coffee_name) {
            Some((_, pts)) => pts.push((p.date, p.money)),
            None => series.push((p.coffee_name.clone(), vec![(p.date, p.money)])),
        }
    }

    series
        .into_iter()
        .map(|(name, mut pts)| {
            pts.sort_by_key(|(date, _)| *date);
            let xy = pts
                .into_iter()
                .map(|(date, money)| [date.num_days_from_ce() as f64, money])
                .collect();
            (name, xy)
        })
        .collect()
}

/// Revenue over time, one line with point markers per coffee.
pub fn date_series_chart(ui: &mut Ui, points: &[DatePoint], colors: &ColorMap, height: f32) {
    let series = series_by_coffee(points);

    Plot::new("date_series_chart")
        .height(height)
        .legend(Legend::default())
        .x_axis_label("date")
        .y_axis_label("money")
        .x_axis_formatter(|mark, _range| date_axis_label(mark.value))
        .show(ui, |plot_ui| {
            for (name, xy) in series {
                let color = colors.color_for(&name);
                plot_ui.line(
                    Line::new(PlotPoints::from(xy.clone()))
                        .name(&name)
                        .color(color)
                        .width(1.5),
                );
                plot_ui.points(
                    Points::new(PlotPoints::from(xy))
                        .name(&name)
                        .color(color)
                        .radius(2.5),
                );
            }
        });
}

/// Mean sale per coffee as a line with point markers over the categories.
pub fn avg_revenue_chart(ui: &mut Ui, table: &CategoryTable<f64>, height: f32) {
    let labels = table.categories();
    let xy: Vec<[f64; 2]> = table
        .rows
        .iter()
        .enumerate()
        .map(|(i, (_, money))| [i as f64, *money])
        .collect();

    static_plot("avg_revenue_chart", height)
        .y_axis_label(table.value_label)
        .x_axis_formatter(move |mark, _range| category_label(&labels, mark.value))
        .show(ui, |plot_ui| {
            plot_ui.line(Line::new(PlotPoints::from(xy.clone())).color(Color32::LIGHT_BLUE).width(2.0));
            plot_ui.points(Points::new(PlotPoints::from(xy)).color(Color32::LIGHT_BLUE).radius(3.5));
        });
}

#[cfg(test)]
mod tests {
    use super::*;

    fn point(day: u32, coffee: &str, money: f64) -> DatePoint {
        DatePoint {
            date: NaiveDate::from_ymd_opt(2024, 3, day).unwrap(),
            coffee_name: coffee.to_string(),
            money,
        }
    }

    #[test]
    fn test_series_grouped_per_coffee_and_sorted_by_date() {
        let series = series_by_coffee(&[
            point(3, "Latte", 3.0),
            point(1, "Cocoa", 2.0),
            point(1, "Latte", 4.0),
        ]);
        assert_eq!(series.len(), 2);
        assert_eq!(series[0].0, "Latte");
        assert_eq!(series[0].1.len(), 2);
        assert!(series[0].1[0][0] < series[0].1[1][0]);
        assert_eq!(series[0].1[0][1], 4.0);
        assert_eq!(series[1].0, "Cocoa");
    }

    #[test]
    fn test_date_axis_round_trips_days() {
        let day = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap();
        assert_eq!(date_axis_label(day.num_days_from_ce() as f64), "2024-03-01");
    }
}
