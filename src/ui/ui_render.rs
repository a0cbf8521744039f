use eframe::egui::{CentralPanel, Color32, Context, Frame, Grid, Margin, RichText, ScrollArea, SidePanel, TopBottomPanel, Ui};

use crate::analysis::ForecastOutput;
use crate::engine::{DashboardEvent, Notice};
use crate::error::DashboardResult;
use crate::ui::config::{UI_CONFIG, UI_TEXT};
use crate::ui::styles::UiStyleExt;
use crate::ui::ui_panels::{CorrelationControls, FilterPanel, ForecastAction, ForecastControls, Panel};
use crate::ui::ui_plot_view::{show_correlation_plot, show_forecast_plot, show_series_chart};
use crate::ui::utils::{format_cell, section_heading, spaced_separator};
use crate::utils::TimeUtils;

use super::app::DashboardApp;

impl DashboardApp {
    pub(super) fn render_side_panel(&mut self, ctx: &Context) -> Vec<DashboardEvent> {
        let side_panel_frame = Frame::new()
            .fill(UI_CONFIG.colors.side_panel)
            .inner_margin(Margin::same(8));
        SidePanel::left("left_panel")
            .min_width(UI_CONFIG.side_panel_min_width)
            .frame(side_panel_frame)
            .show(ctx, |ui| {
                let events = FilterPanel::new(&self.selection.filter, &self.view).render(ui);

                spaced_separator(ui);
                ui.label_subdued(UI_TEXT.footer_author);
                ui.label_subdued(UI_TEXT.footer_course);
                events
            })
            .inner
    }

    pub(super) fn render_status_panel(&mut self, ctx: &Context) {
        let status_frame = Frame::new()
            .fill(UI_CONFIG.colors.side_panel)
            .inner_margin(Margin::symmetric(8, 4));
        TopBottomPanel::bottom("status_panel")
            .frame(status_frame)
            .show(ctx, |ui| {
                ui.horizontal(|ui| {
                    ui.metric("📅 Period", &self.view.filter_label, Color32::from_rgb(100, 200, 255));
                    ui.separator();
                    ui.metric(
                        "🗄 Store round trips",
                        &self.dashboard.cache().round_trips().to_string(),
                        Color32::from_rgb(180, 200, 255),
                    );
                    ui.separator();
                    ui.metric("🔮 Forecaster", self.forecaster.name(), Color32::from_rgb(255, 200, 100));
                    if self.is_forecasting() {
                        ui.separator();
                        ui.label_warning("⚙ Forecasting...");
                    }
                });
            });
    }

    pub(super) fn render_central_panel(&mut self, ctx: &Context) -> Vec<DashboardEvent> {
        let central_panel_frame = Frame::new()
            .fill(UI_CONFIG.colors.central_panel)
            .inner_margin(Margin::same(12));
        CentralPanel::default()
            .frame(central_panel_frame)
            .show(ctx, |ui| {
                let mut events = Vec::new();
                ScrollArea::vertical()
                    .id_salt("dashboard_scroll")
                    .auto_shrink([false, false])
                    .show(ui, |ui| {
                        ui.heading(RichText::new(UI_TEXT.app_title).strong());
                        ui.label_subdued(format!(
                            "{}{}{}",
                            UI_TEXT.loaded_at_prefix, self.view.generated_at, UI_TEXT.loaded_at_suffix
                        ));
                        if self.refresh_notice {
                            ui.label_success(UI_TEXT.refresh_done);
                        }

                        self.render_metrics(ui);
                        self.render_charts(ui);
                        events.extend(self.render_correlation(ui));
                        events.extend(self.render_forecast(ui));
                    });
                events
            })
            .inner
    }

    fn render_metrics(&self, ui: &mut Ui) {
        section_heading(ui, UI_TEXT.metrics_heading);
        ui.horizontal_wrapped(|ui| {
            for card in &self.view.metrics {
                ui.metric_card(card);
            }
        });
    }

    fn render_charts(&self, ui: &mut Ui) {
        section_heading(
            ui,
            format!("{} ({})", UI_TEXT.charts_heading, self.view.filter_label),
        );
        ui.columns(2, |columns| {
            for (i, chart) in self.view.charts.iter().enumerate() {
                let ui = &mut columns[i % 2];
                ui.label_subheader(chart.title);
                match &chart.content {
                    Ok(series) => show_series_chart(ui, series, chart.axis_label),
                    Err(notice) => ui.notice(notice),
                }
                ui.add_space(10.0);
            }
        });
    }

    fn render_correlation(&self, ui: &mut Ui) -> Vec<DashboardEvent> {
        section_heading(
            ui,
            format!("{} ({})", UI_TEXT.correlation_heading, self.view.filter_label),
        );
        let panel = &self.view.correlation;
        let events = CorrelationControls::new(panel).render(ui);
        ui.add_space(5.0);

        match &panel.content {
            Ok(correlation) => {
                ui.label_subheader(format!(
                    "{} vs {}",
                    correlation.first.display_name(),
                    correlation.second.display_name()
                ));
                ui.metric(
                    UI_TEXT.correlation_coefficient,
                    &format!("{:.3}", correlation.coefficient),
                    Color32::WHITE,
                );
                ui.label_subdued(format!("{} common dates", correlation.pairs.len()));
                show_correlation_plot(ui, correlation);
            }
            Err(notice) => ui.notice(notice),
        }
        events
    }

    fn render_forecast(&mut self, ui: &mut Ui) -> Vec<DashboardEvent> {
        section_heading(ui, UI_TEXT.forecast_heading);
        let mut events = Vec::new();

        let actions = ForecastControls::new(&self.view.forecast, self.is_forecasting()).render(ui);
        for action in actions {
            match action {
                ForecastAction::Changed(event) => events.push(event),
                ForecastAction::Generate => self.start_forecast(),
            }
        }

        if self.is_forecasting() {
            ui.horizontal(|ui| {
                ui.spinner();
                ui.label(format!(
                    "{} {}...",
                    UI_TEXT.forecast_running,
                    self.selection.forecast_indicator.display_name()
                ));
            });
        } else if let Some(outcome) = self.forecast.outcome() {
            render_forecast_outcome(ui, outcome);
        }
        ui.add_space(20.0);
        events
    }
}

fn render_forecast_outcome(ui: &mut Ui, outcome: &DashboardResult<ForecastOutput>) {
    let output = match outcome {
        Ok(output) => output,
        Err(e) => {
            ui.notice(&Notice::from(e));
            return;
        }
    };

    ui.add_space(5.0);
    ui.label_subheader(format!(
        "Forecast of {} for the next {} days",
        output.indicator.display_name(),
        output.horizon_days
    ));
    show_forecast_plot(ui, output);

    ui.add_space(5.0);
    ui.label_subheader(UI_TEXT.forecast_table_heading);
    ScrollArea::vertical()
        .id_salt("forecast_table")
        .max_height(UI_CONFIG.table_max_height)
        .show(ui, |ui| {
            Grid::new("forecast_grid")
                .striped(true)
                .num_columns(4)
                .show(ui, |ui| {
                    for header in [
                        UI_TEXT.column_date,
                        UI_TEXT.column_forecast,
                        UI_TEXT.column_lower,
                        UI_TEXT.column_upper,
                    ] {
                        ui.label(RichText::new(header).strong());
                    }
                    ui.end_row();

                    for row in output.future() {
                        ui.label(TimeUtils::format_date(row.ds));
                        ui.label(format_cell(row.yhat));
                        ui.label(format_cell(row.yhat_lower));
                        ui.label(format_cell(row.yhat_upper));
                        ui.end_row();
                    }
                });
        });
}
