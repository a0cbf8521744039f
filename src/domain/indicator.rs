use serde::{Deserialize, Serialize};
use std::fmt;

/// The five tracked macroeconomic series.
///
/// Each identity maps to fixed fetch and formatting metadata, so nothing
/// downstream dispatches on display strings.
#[derive(
    Copy,
    Clone,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Debug,
    Serialize,
    Deserialize,
    strum_macros::EnumIter,
)]
pub enum Indicator {
    /// Selic policy rate (% p.a.)
    PolicyRate,
    /// IPCA consumer price index
    PriceIndex,
    /// PTAX sell rate (BRL per USD)
    ExchangeRate,
    /// PNAD unemployment rate (%)
    UnemploymentRate,
    /// Quarterly GDP at current prices (BRL millions)
    Gdp,
}

/// Static description of where an indicator lives and how it is shown.
pub struct IndicatorMeta {
    pub table: &'static str,
    pub value_column: &'static str,
    pub alias: &'static str,
    pub short_name: &'static str,
    pub display_name: &'static str,
    pub chart_title: &'static str,
    pub axis_label: &'static str,
}

const POLICY_RATE: IndicatorMeta = IndicatorMeta {
    table: "stg_selic",
    value_column: "taxa_selic_percentual",
    alias: "selic",
    short_name: "Selic",
    display_name: "Selic (% p.a.)",
    chart_title: "Selic Rate (% p.a.)",
    axis_label: "Rate (%)",
};

const PRICE_INDEX: IndicatorMeta = IndicatorMeta {
    table: "stg_ipca",
    value_column: "indice_ipca",
    alias: "ipca",
    short_name: "IPCA",
    display_name: "IPCA (Index)",
    chart_title: "IPCA (Index)",
    axis_label: "Index",
};

const EXCHANGE_RATE: IndicatorMeta = IndicatorMeta {
    table: "stg_cambio_ptax_venda",
    value_column: "cambio_ptax_venda_brl_usd",
    alias: "cambio",
    short_name: "PTAX",
    display_name: "Exchange rate (R$/US$)",
    chart_title: "Exchange Rate (R$/US$ - PTAX sell)",
    axis_label: "Rate (R$/US$)",
};

const UNEMPLOYMENT_RATE: IndicatorMeta = IndicatorMeta {
    table: "stg_desemprego",
    value_column: "taxa_desemprego_percentual",
    alias: "desemprego",
    short_name: "Unemployment",
    display_name: "Unemployment (%)",
    chart_title: "Unemployment Rate (% - PNAD Contínua)",
    axis_label: "Rate (%)",
};

const GDP: IndicatorMeta = IndicatorMeta {
    table: "stg_pib_trimestral",
    value_column: "pib_valor_corrente_brl_milhoes",
    alias: "pib",
    short_name: "GDP",
    display_name: "GDP (R$ millions)",
    chart_title: "Quarterly GDP (R$ millions)",
    axis_label: "Value (R$ millions)",
};

impl Indicator {
    pub fn meta(&self) -> &'static IndicatorMeta {
        match self {
            Indicator::PolicyRate => &POLICY_RATE,
            Indicator::PriceIndex => &PRICE_INDEX,
            Indicator::ExchangeRate => &EXCHANGE_RATE,
            Indicator::UnemploymentRate => &UNEMPLOYMENT_RATE,
            Indicator::Gdp => &GDP,
        }
    }

    /// The fixed read-only query for this indicator.
    /// Casts pin the column types so every table decodes as `(date, float8)`.
    pub fn query(&self) -> String {
        let meta = self.meta();
        format!(
            "SELECT data_referencia::date AS data_referencia, {}::float8 AS {} FROM public.{} ORDER BY data_referencia ASC;",
            meta.value_column, meta.alias, meta.table
        )
    }

    pub fn display_name(&self) -> &'static str {
        self.meta().display_name
    }

    pub fn short_name(&self) -> &'static str {
        self.meta().short_name
    }

    /// Metric card text for a value of this indicator.
    pub fn format_value(&self, value: f64) -> String {
        match self {
            Indicator::PolicyRate => format!("{:.2}%", value),
            Indicator::PriceIndex => format!("{:.2}", value),
            Indicator::ExchangeRate => format!("R$ {:.2}", value),
            Indicator::UnemploymentRate => format!("{:.1}%", value),
            // Stored in millions, shown in billions
            Indicator::Gdp => format!("R$ {:.2} Bi", value / 1e3),
        }
    }
}

impl fmt::Display for Indicator {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.display_name())
    }
}
