use eframe::egui::Color32;

use crate::domain::Indicator;

pub use crate::ui::ui_text::{UI_TEXT, UiText};

/// UI Colors for consistent theming
#[derive(Clone, Copy, Default)]
pub struct UiColors {
    pub label: Color32,
    pub heading: Color32,
    pub subsection_heading: Color32,
    pub central_panel: Color32,
    pub side_panel: Color32,
    pub card_fill: Color32,
    pub success: Color32,
    pub forecast_line: Color32,
    pub forecast_band: Color32,
    pub trend_line: Color32,
}

/// Main UI configuration struct that holds all UI-related settings
#[derive(Default, Clone, Copy)]
pub struct UiConfig {
    pub colors: UiColors,
    pub chart_height: f32,
    pub forecast_chart_height: f32,
    pub table_max_height: f32,
    pub side_panel_min_width: f32,
}

impl UiConfig {
    /// Line color for an indicator's chart
    pub fn indicator_color(&self, indicator: Indicator) -> Color32 {
        match indicator {
            Indicator::PolicyRate => Color32::from_rgb(99, 164, 255),
            Indicator::PriceIndex => Color32::from_rgb(255, 140, 90),
            Indicator::ExchangeRate => Color32::from_rgb(110, 210, 140),
            Indicator::UnemploymentRate => Color32::from_rgb(230, 110, 160),
            Indicator::Gdp => Color32::from_rgb(200, 180, 90),
        }
    }
}

/// Global UI configuration instance
pub static UI_CONFIG: UiConfig = UiConfig {
    colors: UiColors {
        label: Color32::GRAY,
        heading: Color32::YELLOW,
        subsection_heading: Color32::ORANGE,
        central_panel: Color32::from_rgb(22, 28, 36),
        side_panel: Color32::from_rgb(25, 25, 25),
        card_fill: Color32::from_rgb(34, 42, 54),
        success: Color32::from_rgb(120, 220, 140),
        forecast_line: Color32::from_rgb(99, 164, 255),
        forecast_band: Color32::from_rgba_premultiplied(40, 70, 120, 90),
        trend_line: Color32::from_rgb(255, 99, 99),
    },
    chart_height: 220.0,
    forecast_chart_height: 320.0,
    table_max_height: 260.0,
    side_panel_min_width: 200.0,
};
