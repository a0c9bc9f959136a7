use eframe::egui::{Color32, CornerRadius, Frame, Margin, Stroke};

pub use crate::ui::ui_text::UI_TEXT;

/// UI Colors for consistent theming
#[derive(Clone, Copy, Default)]
pub struct UiColors {
    pub label: Color32,
    pub heading: Color32,
    pub subsection_heading: Color32,
    pub central_panel: Color32,
    pub side_panel: Color32,

    pub long: Color32,
    pub short: Color32,
    pub success: Color32,
    pub error: Color32,
    pub info: Color32,
    pub subdued: Color32,
}

#[derive(Default, Clone, Copy)]
pub struct UiConfig {
    pub colors: UiColors,
    pub toast_width: f32,
    pub side_panel_width: f32,
}

pub static UI_CONFIG: UiConfig = UiConfig {
    colors: UiColors {
        label: Color32::GRAY,
        heading: Color32::YELLOW,
        subsection_heading: Color32::ORANGE,
        central_panel: Color32::from_rgb(30, 30, 34),
        side_panel: Color32::from_rgb(25, 25, 25),

        long: Color32::from_rgb(80, 200, 120),
        short: Color32::from_rgb(230, 90, 90),
        success: Color32::from_rgb(46, 125, 50),
        error: Color32::from_rgb(183, 28, 28),
        info: Color32::from_rgb(21, 101, 192),
        subdued: Color32::from_rgb(140, 140, 140),
    },
    toast_width: 280.0,
    side_panel_width: 240.0,
};

impl UiConfig {
    /// Frame for Left/Right panels (Standard padding)
    pub fn side_panel_frame(&self) -> Frame {
        Frame {
            fill: self.colors.side_panel,
            stroke: Stroke::NONE,
            inner_margin: Margin::same(8),
            ..Default::default()
        }
    }

    pub fn top_panel_frame(&self) -> Frame {
        Frame {
            fill: self.colors.side_panel,
            stroke: Stroke::NONE,
            inner_margin: Margin::same(8),
            ..Default::default()
        }
    }

    pub fn central_panel_frame(&self) -> Frame {
        Frame {
            fill: self.colors.central_panel,
            stroke: Stroke::NONE,
            inner_margin: Margin::same(8),
            ..Default::default()
        }
    }

    pub fn toast_frame(&self, fill: Color32) -> Frame {
        Frame {
            fill,
            stroke: Stroke::NONE,
            inner_margin: Margin::symmetric(10, 6),
            corner_radius: CornerRadius::same(4),
            ..Default::default()
        }
    }
}
