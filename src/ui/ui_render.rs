use eframe::egui::{
    Align, Align2, Area, Button, CentralPanel, Color32, Context, Grid, Id, Key, Layout, Order, RichText,
    ScrollArea, SidePanel, TextEdit, TopBottomPanel, Ui, vec2,
};
use strum::IntoEnumIterator;

use crate::{
    app::{App, UiAction},
    config::constants::modes,
    domain::Mode,
    models::ViewStore,
    ui::{
        UI_CONFIG, UI_TEXT,
        styles::{SideColor, UiStyleExt, connection_color, severity_fill},
        ui_text::ICON_DOT,
        utils::{format_optional, format_price},
    },
    utils::{format_clock, format_duration, format_naive},
};

impl App {
    pub(crate) fn render_top_panel(&mut self, ctx: &Context) {
        let store = self.engine.store();
        let actions = &mut self.actions;

        TopBottomPanel::top("status_bar")
            .frame(UI_CONFIG.top_panel_frame())
            .min_height(30.0)
            .resizable(false)
            .show(ctx, |ui| {
                ui.horizontal(|ui| {
                    ui.heading(RichText::new(&UI_TEXT.app_title).color(UI_CONFIG.colors.heading));
                    ui.separator();

                    let state = store.connection();
                    ui.label_subdued(&UI_TEXT.status_label);
                    ui.label(RichText::new(ICON_DOT).color(connection_color(state)));
                    ui.label(store.status_text());

                    if let Some(retry) = store.pending_retry() {
                        ui.label_subdued(format!(
                            "{} {}/{} ({})",
                            UI_TEXT.retry_scheduled,
                            retry.attempt,
                            retry.max_attempts,
                            format_duration(retry.delay)
                        ));
                    }
                    if store.reconnect_exhausted() {
                        ui.label(
                            RichText::new(&UI_TEXT.retry_exhausted).color(UI_CONFIG.colors.short),
                        );
                        if ui.button(&UI_TEXT.btn_reconnect).clicked() {
                            actions.push(UiAction::Reconnect);
                        }
                    }

                    ui.with_layout(Layout::right_to_left(Align::Center), |ui| {
                        if ui.button(&UI_TEXT.btn_refresh_stats).clicked() {
                            actions.push(UiAction::RefreshStats);
                        }
                        render_stats_strip(ui, store);
                    });
                });
            });
    }

    pub(crate) fn render_left_panel(&mut self, ctx: &Context) {
        let store = self.engine.store();
        let analysis_pending = self.engine.analysis_pending();
        let actions = &mut self.actions;
        let symbol_input = &mut self.symbol_input;

        SidePanel::left("control_panel")
            .min_width(UI_CONFIG.side_panel_width)
            .resizable(false)
            .frame(UI_CONFIG.side_panel_frame())
            .show(ctx, |ui| {
                render_bot_controls(ui, store, actions);
                ui.add_space(8.0);
                ui.separator();
                render_mode_selector(ui, store, actions);
                ui.add_space(8.0);
                ui.separator();
                render_analysis(ui, store, symbol_input, analysis_pending, actions);
            });
    }

    pub(crate) fn render_central_panel(&mut self, ctx: &Context) {
        let store = self.engine.store();

        CentralPanel::default()
            .frame(UI_CONFIG.central_panel_frame())
            .show(ctx, |ui| {
                ui.horizontal(|ui| {
                    ui.heading(&UI_TEXT.feed_heading);
                    ui.label_subdued(format!(
                        "{}/{}",
                        store.feed().len(),
                        store.feed().capacity()
                    ));
                    ui.separator();
                    ui.metric(
                        &UI_TEXT.feed_received,
                        &store.signals_received().to_string(),
                        UI_CONFIG.colors.label,
                    );
                });
                ui.separator();

                if store.feed().is_empty() {
                    ui.label_subdued(&UI_TEXT.feed_empty);
                    return;
                }

                ScrollArea::both()
                    .auto_shrink([false, false])
                    .id_salt("signal_feed")
                    .show(ui, |ui| render_feed_grid(ui, store));
            });
    }

    /// Toasts, newest at the bottom. They go away on their own.
    pub(crate) fn render_notifications(&self, ctx: &Context) {
        let notifications = self.engine.store().notifications();
        if notifications.is_empty() {
            return;
        }

        Area::new(Id::new("notifications"))
            .order(Order::Foreground)
            .anchor(Align2::RIGHT_BOTTOM, vec2(-12.0, -12.0))
            .interactable(false)
            .show(ctx, |ui| {
                ui.set_max_width(UI_CONFIG.toast_width);
                for note in notifications.iter() {
                    UI_CONFIG
                        .toast_frame(severity_fill(note.severity))
                        .show(ui, |ui| {
                            ui.set_min_width(UI_CONFIG.toast_width);
                            ui.label(RichText::new(&note.message).color(Color32::WHITE));
                        });
                    ui.add_space(4.0);
                }
            });
    }
}

fn render_stats_strip(ui: &mut Ui, store: &ViewStore) {
    let stats = store.stats();
    let color = UI_CONFIG.colors.label;

    // right_to_left: last added shows first
    let uptime = store
        .uptime()
        .map(format_duration)
        .unwrap_or_else(|| UI_TEXT.value_missing.clone());
    ui.metric(&UI_TEXT.label_uptime, &uptime, color);

    let last_scan = stats
        .last_scan_at
        .as_ref()
        .map(format_naive)
        .unwrap_or_else(|| UI_TEXT.value_missing.clone());
    ui.metric(&UI_TEXT.label_last_scan, &last_scan, color);

    ui.metric(
        &UI_TEXT.label_signals_sent,
        &stats.signals_sent.to_string(),
        color,
    );
    ui.metric(
        &UI_TEXT.label_total_scans,
        &stats.total_scans.to_string(),
        color,
    );
}

fn render_bot_controls(ui: &mut Ui, store: &ViewStore, actions: &mut Vec<UiAction>) {
    ui.label_subheader(&UI_TEXT.bot_heading);

    let (state_text, state_color) = if store.bot_running() {
        (&UI_TEXT.bot_running, UI_CONFIG.colors.long)
    } else {
        (&UI_TEXT.bot_stopped, UI_CONFIG.colors.short)
    };
    ui.label(RichText::new(state_text).strong().color(state_color));

    let controls = store.bot_controls();
    ui.horizontal(|ui| {
        let start = Button::new(ui.button_text_primary(&UI_TEXT.btn_start));
        if ui.add_enabled(controls.start_enabled, start).clicked() {
            actions.push(UiAction::StartBot);
        }
        let stop = Button::new(ui.button_text_secondary(&UI_TEXT.btn_stop));
        if ui.add_enabled(controls.stop_enabled, stop).clicked() {
            actions.push(UiAction::StopBot);
        }
    });
}

fn render_mode_selector(ui: &mut Ui, store: &ViewStore, actions: &mut Vec<UiAction>) {
    ui.label_subheader(&UI_TEXT.mode_heading);

    let current = store.mode();
    ui.horizontal_wrapped(|ui| {
        for mode in Mode::iter() {
            if ui.radio(current == Some(mode), mode.label()).clicked() && current != Some(mode) {
                actions.push(UiAction::ChangeMode(mode));
            }
        }
    });

    if current.is_none() {
        ui.label_subdued(&UI_TEXT.mode_unknown);
    }

    for mode in Mode::iter().filter(|m| store.mode_details_visible(*m)) {
        if let Some(detail) = modes::detail(mode) {
            ui.add_space(4.0);
            ui.label_subdued(detail.blurb);
            let color = UI_CONFIG.colors.label;
            ui.metric(&UI_TEXT.mode_min_score, &detail.min_score.to_string(), color);
            ui.metric(&UI_TEXT.mode_cooldown, &detail.cooldown_min.to_string(), color);
            ui.metric(
                &UI_TEXT.mode_min_volume,
                &detail.min_volume_usdt.to_string(),
                color,
            );
            ui.metric(&UI_TEXT.mode_top_n, &detail.top_n_per_scan.to_string(), color);
        }
    }
}

fn render_analysis(
    ui: &mut Ui,
    store: &ViewStore,
    symbol_input: &mut String,
    pending: bool,
    actions: &mut Vec<UiAction>,
) {
    ui.label_subheader(&UI_TEXT.analysis_heading);

    ui.horizontal(|ui| {
        let response = ui.add(
            TextEdit::singleline(symbol_input)
                .hint_text(&UI_TEXT.analysis_hint)
                .desired_width(130.0),
        );
        let submitted = response.lost_focus() && ui.input(|i| i.key_pressed(Key::Enter));
        if ui.button(&UI_TEXT.btn_analyze).clicked() || submitted {
            actions.push(UiAction::Analyze(symbol_input.clone()));
        }
    });

    if pending {
        ui.horizontal(|ui| {
            ui.spinner();
            ui.label_subdued(&UI_TEXT.analysis_pending);
        });
    }

    let Some(report) = store.analysis() else {
        ui.label_subdued(&UI_TEXT.analysis_empty);
        return;
    };

    ui.add_space(4.0);
    ui.label(RichText::new(&report.symbol).strong());
    if let Some(ts) = &report.timestamp {
        ui.label_subdued(format_naive(ts));
    }
    Grid::new("analysis_grid")
        .num_columns(2)
        .striped(true)
        .show(ui, |ui| {
            for (label, value) in report.rows() {
                ui.label_subdued(label);
                ui.label(format_optional(value));
                ui.end_row();
            }
        });
}

fn render_feed_grid(ui: &mut Ui, store: &ViewStore) {
    Grid::new("feed_grid")
        .striped(true)
        .num_columns(12)
        .spacing(vec2(12.0, 4.0))
        .show(ui, |ui| {
            for header in [
                &UI_TEXT.col_time,
                &UI_TEXT.col_symbol,
                &UI_TEXT.col_side,
                &UI_TEXT.col_regime,
                &UI_TEXT.col_entry,
                &UI_TEXT.col_sl,
                &UI_TEXT.col_tp1,
                &UI_TEXT.col_tp2,
                &UI_TEXT.col_tp3,
                &UI_TEXT.col_score,
                &UI_TEXT.col_rr,
                &UI_TEXT.col_reason,
            ] {
                ui.label(RichText::new(header).strong());
            }
            ui.end_row();

            for signal in store.feed().iter() {
                ui.label_subdued(format_clock(&signal.timestamp));
                ui.label(RichText::new(&signal.symbol).strong());
                ui.label(
                    RichText::new(signal.side.to_string())
                        .strong()
                        .color(signal.side.color()),
                );
                ui.label(&signal.regime);
                ui.label(format_price(signal.entry));
                ui.label(RichText::new(format_price(signal.sl)).color(UI_CONFIG.colors.short));
                ui.label(RichText::new(format_price(signal.tp1)).color(UI_CONFIG.colors.long));
                ui.label(format_price(signal.tp2));
                ui.label(format_price(signal.tp3));
                ui.label(format!("{:.0}", signal.score));
                ui.label(signal.risk_reward().to_string());
                ui.label_subdued(&signal.reason);
                ui.end_row();
            }
        });
}
