use eframe::egui::{ComboBox, ScrollArea, Slider, Ui};

#[cfg(debug_assertions)]
use crate::config::DEBUG_FLAGS;
use crate::config::DASHBOARD;
use crate::domain::Indicator;
use crate::engine::{CorrelationPanel, DashboardEvent, DashboardView, FilterKind, FilterMode, ForecastPanel};
use crate::ui::config::UI_TEXT;
use crate::ui::styles::UiStyleExt;
use crate::ui::utils::{colored_subsection_heading, section_heading, spaced_separator};

/// Trait for UI panels that can be rendered
pub trait Panel {
    type Event;
    fn render(&mut self, ui: &mut Ui) -> Vec<Self::Event>;
}

/// Side panel: refresh button and the historical period filter
pub struct FilterPanel<'a> {
    filter: &'a FilterMode,
    view: &'a DashboardView,
}

impl<'a> FilterPanel<'a> {
    pub fn new(filter: &'a FilterMode, view: &'a DashboardView) -> Self {
        Self { filter, view }
    }

    fn render_kind_selector(&mut self, ui: &mut Ui) -> Option<FilterKind> {
        let mut changed = None;
        ui.label(colored_subsection_heading(UI_TEXT.filter_kind_heading));

        let current = self.filter.kind();
        for (kind, text) in [
            (FilterKind::SpecificYears, UI_TEXT.filter_specific_years),
            (FilterKind::Biennium, UI_TEXT.filter_biennium),
        ] {
            if ui.radio(current == kind, text).clicked() && current != kind {
                changed = Some(kind);
            }
        }
        changed
    }

    fn render_year_checkboxes(&mut self, ui: &mut Ui) -> Vec<i32> {
        let mut toggled = Vec::new();
        ui.label(colored_subsection_heading(UI_TEXT.years_heading));

        let chosen: &[i32] = match self.filter {
            FilterMode::SpecificYears(years) => years,
            FilterMode::Biennium(_) => &[],
        };

        if self.view.year_options.is_empty() {
            ui.label_subdued(UI_TEXT.no_years);
            return toggled;
        }

        ScrollArea::vertical()
            .max_height(220.)
            .id_salt("year_selector")
            .show(ui, |ui| {
                for &year in &self.view.year_options {
                    let mut checked = chosen.contains(&year);
                    if ui.checkbox(&mut checked, year.to_string()).changed() {
                        toggled.push(year);
                    }
                }
            });
        ui.label_subdued(UI_TEXT.years_helper);
        toggled
    }

    fn render_biennium_selector(&mut self, ui: &mut Ui) -> Option<String> {
        let mut changed = None;
        ui.label(colored_subsection_heading(UI_TEXT.biennium_heading));

        if self.view.period_options.is_empty() {
            ui.label_subdued(UI_TEXT.no_years);
            return None;
        }

        let selected = self.view.selected_period.clone().unwrap_or_default();
        ComboBox::from_id_salt("biennium_selector")
            .selected_text(selected.clone())
            .show_ui(ui, |ui| {
                for group in &self.view.period_options {
                    if ui
                        .selectable_label(group.label == selected, group.label.as_str())
                        .clicked()
                        && group.label != selected
                    {
                        changed = Some(group.label.clone());
                    }
                }
            });
        changed
    }
}

impl Panel for FilterPanel<'_> {
    type Event = DashboardEvent;

    fn render(&mut self, ui: &mut Ui) -> Vec<Self::Event> {
        let mut events = Vec::new();
        section_heading(ui, UI_TEXT.filters_heading);

        if ui.button(UI_TEXT.refresh_button).clicked() {
            events.push(DashboardEvent::Refresh);
        }
        spaced_separator(ui);

        if let Some(kind) = self.render_kind_selector(ui) {
            events.push(DashboardEvent::SetFilterKind(kind));
        }
        ui.add_space(5.0);

        match self.filter.kind() {
            FilterKind::SpecificYears => {
                for year in self.render_year_checkboxes(ui) {
                    events.push(DashboardEvent::ToggleYear(year));
                }
            }
            FilterKind::Biennium => {
                if let Some(label) = self.render_biennium_selector(ui) {
                    events.push(DashboardEvent::SelectBiennium(label));
                }
            }
        }

        #[cfg(debug_assertions)]
        if DEBUG_FLAGS.print_ui_interactions && !events.is_empty() {
            log::info!("Filter panel events: {:?}", events);
        }
        events
    }
}

/// Two indicator pickers for the correlation section
pub struct CorrelationControls<'a> {
    panel: &'a CorrelationPanel,
}

impl<'a> CorrelationControls<'a> {
    pub fn new(panel: &'a CorrelationPanel) -> Self {
        Self { panel }
    }
}

fn indicator_combo(
    ui: &mut Ui,
    id: &str,
    current: Option<Indicator>,
    choices: &[Indicator],
) -> Option<Indicator> {
    let mut changed = None;
    let text = current.map(|i| i.display_name()).unwrap_or("-");
    ComboBox::from_id_salt(id)
        .selected_text(text)
        .width(220.0)
        .show_ui(ui, |ui| {
            for &choice in choices {
                if ui
                    .selectable_label(Some(choice) == current, choice.display_name())
                    .clicked()
                    && Some(choice) != current
                {
                    changed = Some(choice);
                }
            }
        });
    changed
}

impl Panel for CorrelationControls<'_> {
    type Event = DashboardEvent;

    fn render(&mut self, ui: &mut Ui) -> Vec<Self::Event> {
        let mut events = Vec::new();
        if self.panel.choices.is_empty() {
            return events;
        }

        ui.horizontal(|ui| {
            ui.vertical(|ui| {
                ui.label_subdued(UI_TEXT.correlation_first);
                if let Some(first) =
                    indicator_combo(ui, "corr_first", self.panel.first, &self.panel.choices)
                {
                    events.push(DashboardEvent::SetCorrelationFirst(first));
                }
            });
            let second_choices = self.panel.second_choices();
            if !second_choices.is_empty() {
                ui.vertical(|ui| {
                    ui.label_subdued(UI_TEXT.correlation_second);
                    if let Some(second) =
                        indicator_combo(ui, "corr_second", self.panel.second, &second_choices)
                    {
                        events.push(DashboardEvent::SetCorrelationSecond(second));
                    }
                });
            }
        });
        events
    }
}

/// What the forecast form can ask for
#[derive(Debug, Clone, PartialEq)]
pub enum ForecastAction {
    Changed(DashboardEvent),
    Generate,
}

/// Indicator picker, horizon slider and the generate button
pub struct ForecastControls<'a> {
    panel: &'a ForecastPanel,
    busy: bool,
}

impl<'a> ForecastControls<'a> {
    pub fn new(panel: &'a ForecastPanel, busy: bool) -> Self {
        Self { panel, busy }
    }
}

impl Panel for ForecastControls<'_> {
    type Event = ForecastAction;

    fn render(&mut self, ui: &mut Ui) -> Vec<Self::Event> {
        let mut events = Vec::new();
        let bounds = &DASHBOARD.forecast;

        ui.horizontal(|ui| {
            ui.vertical(|ui| {
                ui.label_subdued(UI_TEXT.forecast_indicator);
                if let Some(indicator) = indicator_combo(
                    ui,
                    "forecast_indicator",
                    Some(self.panel.indicator),
                    &self.panel.choices,
                ) {
                    events.push(ForecastAction::Changed(
                        DashboardEvent::SetForecastIndicator(indicator),
                    ));
                }
            });

            ui.vertical(|ui| {
                ui.label_subdued(UI_TEXT.forecast_horizon);
                let mut days = self.panel.horizon_days;
                let response = ui.add(
                    Slider::new(&mut days, bounds.min_horizon_days..=bounds.max_horizon_days)
                        .step_by(bounds.horizon_step_days as f64)
                        .suffix(" days"),
                );
                if response.changed() && days != self.panel.horizon_days {
                    events.push(ForecastAction::Changed(DashboardEvent::SetForecastHorizon(
                        days as i64,
                    )));
                }
            });
        });

        ui.add_space(5.0);
        ui.add_enabled_ui(!self.busy, |ui| {
            if ui.button(UI_TEXT.forecast_button).clicked() {
                events.push(ForecastAction::Generate);
            }
        });
        events
    }
}
