use eframe::egui::{Color32, Stroke};
use egui_plot::{Line, PlotPoints, PlotUi, Points, Polygon};

use crate::analysis::{AlignedPair, ForecastOutput, TrendLine};
use crate::models::Series;
use crate::ui::config::{UI_CONFIG, UI_TEXT};
use crate::utils::TimeUtils;

/// A standardized layer in a plot stack.
pub trait PlotLayer {
    fn render(&self, plot_ui: &mut PlotUi);
}

// ============================================================================
// 1. SERIES LINE (historical chart)
// ============================================================================
pub struct SeriesLineLayer<'a> {
    pub series: &'a Series,
    pub color: Color32,
}

impl PlotLayer for SeriesLineLayer<'_> {
    fn render(&self, plot_ui: &mut PlotUi) {
        let points: Vec<[f64; 2]> = self
            .series
            .points()
            .map(|(date, value)| [TimeUtils::date_to_plot_x(date), value])
            .collect();

        plot_ui.line(
            Line::new(self.series.indicator.short_name(), PlotPoints::from(points.clone()))
                .color(self.color)
                .width(1.5),
        );
        // Markers
        plot_ui.points(
            Points::new(self.series.indicator.short_name(), PlotPoints::from(points))
                .color(self.color)
                .radius(2.0),
        );
    }
}

// ============================================================================
// 2. SCATTER + TREND (correlation)
// ============================================================================
pub struct ScatterLayer<'a> {
    pub pairs: &'a [AlignedPair],
    pub color: Color32,
}

impl PlotLayer for ScatterLayer<'_> {
    fn render(&self, plot_ui: &mut PlotUi) {
        let points: Vec<[f64; 2]> = self.pairs.iter().map(|p| [p.first, p.second]).collect();
        plot_ui.points(
            Points::new(UI_TEXT.plot_history, PlotPoints::from(points))
                .color(self.color)
                .radius(3.0),
        );
    }
}

pub struct TrendLineLayer<'a> {
    pub trend: &'a TrendLine,
    pub x_min: f64,
    pub x_max: f64,
}

impl PlotLayer for TrendLineLayer<'_> {
    fn render(&self, plot_ui: &mut PlotUi) {
        let points = vec![
            [self.x_min, self.trend.at(self.x_min)],
            [self.x_max, self.trend.at(self.x_max)],
        ];
        plot_ui.line(
            Line::new(UI_TEXT.plot_trend, PlotPoints::from(points))
                .color(UI_CONFIG.colors.trend_line)
                .width(2.0),
        );
    }
}

// ============================================================================
// 3. FORECAST (band, prediction, observed history)
// ============================================================================
pub struct ForecastBandLayer<'a> {
    pub output: &'a ForecastOutput,
}

impl PlotLayer for ForecastBandLayer<'_> {
    fn render(&self, plot_ui: &mut PlotUi) {
        // Upper edge forwards, lower edge backwards: one closed outline
        let upper = self
            .output
            .points
            .iter()
            .map(|p| [TimeUtils::date_to_plot_x(p.ds), p.yhat_upper]);
        let lower = self
            .output
            .points
            .iter()
            .rev()
            .map(|p| [TimeUtils::date_to_plot_x(p.ds), p.yhat_lower]);
        let outline: Vec<[f64; 2]> = upper.chain(lower).collect();

        plot_ui.polygon(
            Polygon::new(UI_TEXT.plot_interval, PlotPoints::from(outline))
                .fill_color(UI_CONFIG.colors.forecast_band)
                .stroke(Stroke::NONE),
        );
    }
}

pub struct ForecastLineLayer<'a> {
    pub output: &'a ForecastOutput,
}

impl PlotLayer for ForecastLineLayer<'_> {
    fn render(&self, plot_ui: &mut PlotUi) {
        let points: Vec<[f64; 2]> = self
            .output
            .points
            .iter()
            .map(|p| [TimeUtils::date_to_plot_x(p.ds), p.yhat])
            .collect();
        plot_ui.line(
            Line::new(UI_TEXT.plot_forecast, PlotPoints::from(points))
                .color(UI_CONFIG.colors.forecast_line)
                .width(2.0),
        );
    }
}

pub struct HistoryPointsLayer<'a> {
    pub output: &'a ForecastOutput,
}

impl PlotLayer for HistoryPointsLayer<'_> {
    fn render(&self, plot_ui: &mut PlotUi) {
        let points: Vec<[f64; 2]> = self
            .output
            .history
            .iter()
            .map(|p| [TimeUtils::date_to_plot_x(p.ds), p.y])
            .collect();
        plot_ui.points(
            Points::new(UI_TEXT.plot_history, PlotPoints::from(points))
                .color(Color32::WHITE)
                .radius(1.5),
        );
    }
}
