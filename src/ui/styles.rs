use eframe::egui::{Color32, RichText, Ui};

use crate::{
    domain::Side,
    engine::ConnectionState,
    models::Severity,
    ui::UI_CONFIG,
};

pub(crate) fn colored_subsection_heading(text: impl Into<String>) -> RichText {
    RichText::new(text.into()).color(UI_CONFIG.colors.subsection_heading)
}

pub trait SideColor {
    fn color(&self) -> Color32;
}

impl SideColor for Side {
    fn color(&self) -> Color32 {
        match self {
            Self::Long => UI_CONFIG.colors.long,
            Self::Short => UI_CONFIG.colors.short,
        }
    }
}

pub fn severity_fill(severity: Severity) -> Color32 {
    match severity {
        Severity::Info => UI_CONFIG.colors.info,
        Severity::Success => UI_CONFIG.colors.success,
        Severity::Error => UI_CONFIG.colors.error,
    }
}

pub fn connection_color(state: ConnectionState) -> Color32 {
    match state {
        ConnectionState::Connected => UI_CONFIG.colors.long,
        ConnectionState::Connecting => UI_CONFIG.colors.heading,
        ConnectionState::Disconnected => UI_CONFIG.colors.short,
    }
}

pub(crate) trait UiStyleExt {
    fn label_subdued(&mut self, text: impl Into<String>);
    fn metric(&mut self, label: &str, value: &str, color: Color32);
    fn label_subheader(&mut self, text: impl Into<String>);
    fn button_text_primary(&self, text: impl Into<String>) -> RichText;
    fn button_text_secondary(&self, text: impl Into<String>) -> RichText;
}

impl UiStyleExt for Ui {
    fn label_subdued(&mut self, text: impl Into<String>) {
        self.label(RichText::new(text).small().color(UI_CONFIG.colors.subdued));
    }

    fn metric(&mut self, label: &str, value: &str, color: Color32) {
        self.horizontal(|ui| {
            ui.spacing_mut().item_spacing.x = 2.0; // Tight spacing
            ui.label_subdued(format!("{}:", label));
            ui.label(RichText::new(value).small().color(color));
        });
    }

    fn label_subheader(&mut self, text: impl Into<String>) {
        self.label(colored_subsection_heading(text));
    }

    fn button_text_primary(&self, text: impl Into<String>) -> RichText {
        RichText::new(text).strong().color(UI_CONFIG.colors.long)
    }

    fn button_text_secondary(&self, text: impl Into<String>) -> RichText {
        RichText::new(text).strong().color(UI_CONFIG.colors.short)
    }
}
