use eframe::egui::Ui;
use egui_plot::{AxisHints, Corner, HPlacement, Legend, Plot};

use crate::analysis::{Correlation, ForecastOutput};
use crate::models::Series;
use crate::ui::config::{UI_CONFIG, UI_TEXT};
use crate::ui::plot_layers::{
    ForecastBandLayer, ForecastLineLayer, HistoryPointsLayer, PlotLayer, ScatterLayer,
    SeriesLineLayer, TrendLineLayer,
};
use crate::utils::TimeUtils;

/// Line chart of one filtered series against a date axis.
pub fn show_series_chart(ui: &mut Ui, series: &Series, axis_label: &str) {
    let color = UI_CONFIG.indicator_color(series.indicator);

    Plot::new(format!("chart_{:?}", series.indicator))
        .height(UI_CONFIG.chart_height)
        .custom_x_axes(vec![date_axis()])
        .custom_y_axes(vec![value_axis(axis_label)])
        .label_formatter(date_value_label)
        .allow_scroll(false)
        .show(ui, |plot_ui| {
            SeriesLineLayer { series, color }.render(plot_ui);
        });
}

/// Scatter of the aligned pairs with the least-squares line on top.
pub fn show_correlation_plot(ui: &mut Ui, correlation: &Correlation) {
    let first = correlation.first.display_name();
    let second = correlation.second.display_name();

    let (x_min, x_max) = correlation
        .pairs
        .iter()
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), p| {
            (lo.min(p.first), hi.max(p.first))
        });

    Plot::new("correlation_plot")
        .height(UI_CONFIG.forecast_chart_height)
        .legend(Legend::default().position(Corner::LeftTop))
        .custom_x_axes(vec![AxisHints::new_x().label(first)])
        .custom_y_axes(vec![value_axis(second)])
        .allow_scroll(false)
        .show(ui, |plot_ui| {
            let layers: Vec<Box<dyn PlotLayer + '_>> = vec![
                Box::new(ScatterLayer {
                    pairs: &correlation.pairs,
                    color: UI_CONFIG.indicator_color(correlation.first),
                }),
                Box::new(TrendLineLayer {
                    trend: &correlation.trend,
                    x_min,
                    x_max,
                }),
            ];
            for layer in layers {
                layer.render(plot_ui);
            }
        });
}

/// History, prediction and interval band for one forecast.
pub fn show_forecast_plot(ui: &mut Ui, output: &ForecastOutput) {
    Plot::new("forecast_plot")
        .height(UI_CONFIG.forecast_chart_height)
        .legend(Legend::default().position(Corner::LeftTop))
        .custom_x_axes(vec![date_axis()])
        .custom_y_axes(vec![value_axis(UI_TEXT.plot_value_axis)])
        .label_formatter(date_value_label)
        .allow_scroll(false)
        .show(ui, |plot_ui| {
            // Back to front
            let layers: Vec<Box<dyn PlotLayer + '_>> = vec![
                Box::new(ForecastBandLayer { output }),
                Box::new(ForecastLineLayer { output }),
                Box::new(HistoryPointsLayer { output }),
            ];
            for layer in layers {
                layer.render(plot_ui);
            }
        });
}

fn date_axis() -> AxisHints<'static> {
    AxisHints::new_x()
        .label(UI_TEXT.plot_date_axis)
        .formatter(|grid_mark, _range| {
            TimeUtils::plot_x_to_date(grid_mark.value)
                .map(|date| date.format("%m/%Y").to_string())
                .unwrap_or_default()
        })
}

fn value_axis(label: &str) -> AxisHints<'static> {
    AxisHints::new_y()
        .label(label.to_string())
        .placement(HPlacement::Left)
}

fn date_value_label(name: &str, value: &egui_plot::PlotPoint) -> String {
    let date = TimeUtils::plot_x_to_date(value.x)
        .map(TimeUtils::format_date)
        .unwrap_or_default();
    if name.is_empty() {
        format!("{}\n{:.2}", date, value.y)
    } else {
        format!("{}\n{}\n{:.2}", name, date, value.y)
    }
}
