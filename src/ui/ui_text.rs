/// User-facing strings, kept in one place.
pub struct UiText {
    pub window_title: &'static str,
    pub app_title: &'static str,
    pub loaded_at_prefix: &'static str,
    pub loaded_at_suffix: &'static str,

    // Side panel
    pub filters_heading: &'static str,
    pub refresh_button: &'static str,
    pub refresh_done: &'static str,
    pub filter_kind_heading: &'static str,
    pub filter_specific_years: &'static str,
    pub filter_biennium: &'static str,
    pub years_heading: &'static str,
    pub years_helper: &'static str,
    pub biennium_heading: &'static str,
    pub no_years: &'static str,
    pub footer_author: &'static str,
    pub footer_course: &'static str,

    // Central panel
    pub metrics_heading: &'static str,
    pub charts_heading: &'static str,
    pub correlation_heading: &'static str,
    pub correlation_first: &'static str,
    pub correlation_second: &'static str,
    pub correlation_coefficient: &'static str,
    pub forecast_heading: &'static str,
    pub forecast_indicator: &'static str,
    pub forecast_horizon: &'static str,
    pub forecast_button: &'static str,
    pub forecast_running: &'static str,
    pub forecast_table_heading: &'static str,

    // Plots
    pub plot_date_axis: &'static str,
    pub plot_value_axis: &'static str,
    pub plot_history: &'static str,
    pub plot_forecast: &'static str,
    pub plot_interval: &'static str,
    pub plot_trend: &'static str,

    // Table columns
    pub column_date: &'static str,
    pub column_forecast: &'static str,
    pub column_lower: &'static str,
    pub column_upper: &'static str,
}

pub static UI_TEXT: UiText = UiText {
    window_title: "Brazilian Economy Thermometer",
    app_title: "🇧🇷 Brazilian Economy Thermometer",
    loaded_at_prefix: "Dashboard loaded at: ",
    loaded_at_suffix: " (Brasília time). Data updated as published by the original sources.",

    filters_heading: "Period filters",
    refresh_button: "🔄 Refresh dashboard data",
    refresh_done: "Data cache cleared! The dashboard was reloaded with the latest data from the database.",
    filter_kind_heading: "Filter type",
    filter_specific_years: "Specific year(s)",
    filter_biennium: "Biennium",
    years_heading: "Year(s)",
    years_helper: "No year ticked shows every year",
    biennium_heading: "Biennium",
    no_years: "No years available",
    footer_author: "Developed by Márcio Lemos",
    footer_course: "MBA in Analytics Management with BI and Big Data",

    metrics_heading: "Latest recorded values",
    charts_heading: "Historical indicators",
    correlation_heading: "Correlation analysis",
    correlation_first: "First indicator",
    correlation_second: "Second indicator",
    correlation_coefficient: "Correlation coefficient (Pearson)",
    forecast_heading: "Indicator forecast",
    forecast_indicator: "Indicator to forecast",
    forecast_horizon: "Forecast horizon",
    forecast_button: "Generate forecast",
    forecast_running: "Training the model and generating the forecast for",
    forecast_table_heading: "Forecast data",

    plot_date_axis: "Date",
    plot_value_axis: "Value",
    plot_history: "Observed",
    plot_forecast: "Forecast",
    plot_interval: "Interval",
    plot_trend: "OLS trend",

    column_date: "Date",
    column_forecast: "Forecast",
    column_lower: "Lower bound",
    column_upper: "Upper bound",
};
