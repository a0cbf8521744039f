use eframe::{Frame, egui};
use std::sync::Arc;
use tokio::runtime::Runtime;

use crate::analysis::{Forecaster, LinearTrendForecaster};
#[cfg(debug_assertions)]
use crate::config::DEBUG_FLAGS;
use crate::engine::{Dashboard, DashboardEvent, DashboardView, Selection};
use crate::ui::app_async::ForecastJob;
use crate::ui::utils::setup_custom_visuals;

/// The desktop dashboard.
///
/// Owns the `Dashboard` and the runtime its store calls need. Only the
/// `Selection` survives restarts; the data is always reloaded.
pub struct DashboardApp {
    pub(super) dashboard: Dashboard,
    pub(super) runtime: Runtime,
    pub(super) selection: Selection,
    pub(super) view: DashboardView,

    /// Shown after a manual refresh until the next interaction
    pub(super) refresh_notice: bool,

    pub(super) forecaster: Arc<dyn Forecaster>,
    pub(super) forecast: ForecastJob,
}

impl DashboardApp {
    pub fn new(cc: &eframe::CreationContext<'_>, dashboard: Dashboard, runtime: Runtime) -> Self {
        // Attempt to load the persisted selection
        let persisted: Option<Selection> = cc
            .storage
            .and_then(|storage| eframe::get_value(storage, eframe::APP_KEY));

        let selection = match persisted {
            Some(selection) => {
                #[cfg(debug_assertions)]
                if DEBUG_FLAGS.print_state_serde {
                    log::info!("Successfully loaded persisted selection: {:?}", selection);
                }
                selection
            }
            None => {
                #[cfg(debug_assertions)]
                if DEBUG_FLAGS.print_state_serde {
                    log::info!("No persisted selection. Creating anew.");
                }
                Selection::initial(&dashboard.available_years())
            }
        };

        let view = dashboard.view(&selection);

        Self {
            dashboard,
            runtime,
            selection,
            view,
            refresh_notice: false,
            forecaster: Arc::new(LinearTrendForecaster::default()),
            forecast: ForecastJob::default(),
        }
    }

    /// Feed the frame's events through the update function and keep the view.
    pub(super) fn apply_events(&mut self, events: Vec<DashboardEvent>) {
        if events.is_empty() {
            return;
        }
        let refreshed = events.contains(&DashboardEvent::Refresh);
        self.view = self
            .runtime
            .block_on(self.dashboard.update(&mut self.selection, &events));
        self.refresh_notice = refreshed;
        if refreshed {
            // A fit on the previous data must not outlive the reload
            self.forecast.discard();
        }
    }
}

impl eframe::App for DashboardApp {
    fn on_exit(&mut self, _gl: Option<&eframe::glow::Context>) {
        // A running fit is abandoned, not cancelled
        self.forecast.discard();

        #[cfg(debug_assertions)]
        if DEBUG_FLAGS.print_shutdown {
            log::info!("Application shutdown complete.");
        }
    }

    fn save(&mut self, storage: &mut dyn eframe::Storage) {
        eframe::set_value(storage, eframe::APP_KEY, &self.selection);
    }

    fn update(&mut self, ctx: &egui::Context, _frame: &mut Frame) {
        setup_custom_visuals(ctx);

        self.poll_forecast(ctx);

        let mut events = self.render_side_panel(ctx);
        self.render_status_panel(ctx);
        events.extend(self.render_central_panel(ctx));

        self.apply_events(events);
    }
}
