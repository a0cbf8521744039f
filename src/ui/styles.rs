use eframe::egui::{Color32, Frame, RichText, Ui};

use crate::engine::{MetricCard, Notice};
use crate::ui::config::UI_CONFIG;

/// Extension trait to add semantic styling methods directly to `egui::Ui`.
pub trait UiStyleExt {
    /// Renders small, gray text (good for captions and helper lines).
    fn label_subdued(&mut self, text: impl Into<String>);

    /// Renders a "Label: Value" pair. The label is subdued, the value is colored.
    fn metric(&mut self, label: &str, value: &str, color: Color32);

    /// Renders a sub-section header using the configured global color.
    fn label_subheader(&mut self, text: impl Into<String>);

    /// Renders an error message (Red).
    fn label_error(&mut self, text: impl Into<String>);

    /// Renders a warning message (Yellow/Gold).
    fn label_warning(&mut self, text: impl Into<String>);

    /// Renders a success message (Green).
    fn label_success(&mut self, text: impl Into<String>);

    /// Renders an inline notice with the color of its severity.
    fn notice(&mut self, notice: &Notice);

    /// Renders one "latest value" card.
    fn metric_card(&mut self, card: &MetricCard);
}

impl UiStyleExt for Ui {
    fn label_subdued(&mut self, text: impl Into<String>) {
        self.label(RichText::new(text).small().color(Color32::GRAY));
    }

    fn metric(&mut self, label: &str, value: &str, color: Color32) {
        self.horizontal(|ui| {
            ui.spacing_mut().item_spacing.x = 4.0;
            ui.label_subdued(format!("{}:", label));
            ui.label(RichText::new(value).strong().color(color));
        });
    }

    fn label_subheader(&mut self, text: impl Into<String>) {
        self.label(RichText::new(text).color(UI_CONFIG.colors.subsection_heading));
    }

    fn label_error(&mut self, text: impl Into<String>) {
        self.label(RichText::new(text).color(Color32::from_rgb(255, 100, 100)));
    }

    fn label_warning(&mut self, text: impl Into<String>) {
        self.label(RichText::new(text).color(Color32::from_rgb(255, 215, 0)));
    }

    fn label_success(&mut self, text: impl Into<String>) {
        self.label(RichText::new(text).color(UI_CONFIG.colors.success));
    }

    fn notice(&mut self, notice: &Notice) {
        match notice {
            Notice::Warning(text) => self.label_warning(format!("⚠ {}", text)),
            Notice::Error(text) => self.label_error(format!("❌ {}", text)),
        }
    }

    fn metric_card(&mut self, card: &MetricCard) {
        Frame::group(self.style())
            .fill(UI_CONFIG.colors.card_fill)
            .show(self, |ui| {
                ui.set_min_width(170.0);
                ui.vertical(|ui| {
                    ui.label_subdued(&card.label);
                    ui.label(RichText::new(&card.value).size(22.0).strong());
                    if let Some(error) = &card.error {
                        ui.label_error(error);
                    }
                });
            });
    }
}
