use crate::store::{AppState, CameraTarget};
use egui::{Context, RichText};
use spyboard_shared::GameConfig;

pub mod screens;
pub mod theme;

use screens::{AppInterface, ScreenWidget, SpyBoardScreen};
use theme::*;

/// Player intents queued by the UI and applied after the frame is drawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEvent {
    GenerateScene,
    OpenMissionCamera,
    OpenIdentityCamera,
    CloseCamera(CameraTarget),
    Capture(CameraTarget),
    Retake(CameraTarget),
    RetryCamera(CameraTarget),
    Analyze,
    AddToLog,
    ConfirmIdentity,
    DismissCompletion,
    RequestQuit,
    ContinueMission,
    Quit,
    ToggleMusic,
    NextTrack,
}

/// Global settings for the application
#[derive(Clone)]
pub struct Settings {
    pub dpi: f32,
    pub applied_dpi: f32,
    pub dark_mode: bool,
}

pub struct App {
    board: SpyBoardScreen,

    // Global settings UI state
    settings_open: bool,
    pending_settings: Settings,
    app_state: AppState,
}

impl App {
    pub fn new(ctx: &Context, config: GameConfig) -> Self {
        let dpi = crate::calculate_dpi_scale();
        Self {
            board: SpyBoardScreen::default(),
            settings_open: false,
            pending_settings: Settings {
                dpi,
                applied_dpi: dpi,
                dark_mode: true,
            },
            app_state: AppState::new(ctx, config),
        }
    }

    fn apply_event(&mut self, event: AppEvent, now: f64) {
        tracing::debug!(?event, "app event");
        let state = &mut self.app_state;
        match event {
            AppEvent::GenerateScene => state.begin_scene(),
            AppEvent::OpenMissionCamera => state.open_mission_camera(),
            AppEvent::OpenIdentityCamera => state.open_identity_camera(),
            AppEvent::CloseCamera(target) => state.close_camera(target),
            AppEvent::Capture(target) => state.capture(target),
            AppEvent::Retake(target) => state.retake(target),
            AppEvent::RetryCamera(target) => state.retry_camera(target),
            AppEvent::Analyze => state.analyze(now),
            AppEvent::AddToLog => state.add_to_log(now),
            AppEvent::ConfirmIdentity => state.confirm_identity(),
            AppEvent::DismissCompletion => state.dismiss_completion(),
            AppEvent::RequestQuit => state.request_quit(),
            AppEvent::ContinueMission => state.continue_after_warning(),
            AppEvent::Quit => state.quit(),
            AppEvent::ToggleMusic => state.music.toggle(),
            AppEvent::NextTrack => state.music.next(now),
        }
    }

    fn apply_visuals(&self, ctx: &Context) {
        ctx.set_pixels_per_point(self.pending_settings.applied_dpi);
        if self.pending_settings.dark_mode {
            ctx.set_visuals(egui::Visuals::dark());
        } else {
            ctx.set_visuals(egui::Visuals::light());
        }
    }
}

impl App {
    fn render_top_bar(&mut self, ctx: &Context, events: &mut Vec<AppEvent>) {
        let session = &self.app_state.session;
        let music = &self.app_state.music;

        egui::TopBottomPanel::top("global_top_bar")
            .show_separator_line(false)
            .frame(
                egui::Frame::default()
                    .fill(ctx.style().visuals.window_fill())
                    .inner_margin(egui::Margin::symmetric(MARGIN_LG as i8, MARGIN_SM as i8)),
            )
            .show(ctx, |ui| {
                let row_h = ui.spacing().interact_size.y + NAVBAR_ROW_HEIGHT_EXTRA;
                ui.horizontal(|ui| {
                    ui.set_min_height(row_h);
                    ui.vertical(|ui| {
                        ui.label(
                            RichText::new("🕵 SPYBOARD")
                                .monospace()
                                .strong()
                                .size(FONT_SIZE_LG),
                        );
                        ui.label(
                            RichText::new(format!(
                                "> SPY MISSION ACTIVE · BOARD {}",
                                session.board_number()
                            ))
                            .monospace()
                            .size(FONT_SIZE_XS)
                            .color(MUTED_TEXT),
                        );
                    });

                    ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                        if ui
                            .button("⚙")
                            .on_hover_text("Open global settings")
                            .clicked()
                        {
                            self.settings_open = true;
                        }
                        if ui
                            .button(RichText::new("🚪 ABORT").monospace())
                            .on_hover_text("Abandon the current spy career")
                            .clicked()
                        {
                            events.push(AppEvent::RequestQuit);
                        }
                        ui.separator();

                        let (icon, hint) = if music.is_playing() {
                            ("🔊", "Mute")
                        } else {
                            ("🔇", "Play")
                        };
                        if ui.button(icon).on_hover_text(hint).clicked() {
                            events.push(AppEvent::ToggleMusic);
                        }
                        if ui.button("⏭").on_hover_text("Next Song").clicked() {
                            events.push(AppEvent::NextTrack);
                        }
                        ui.separator();

                        let bonus = session.bonus_scenes();
                        if bonus > 0 {
                            screens::widgets::outline_badge(ui, &format!("🔓 +{}", bonus), ACCENT);
                        }
                        screens::widgets::badge(
                            ui,
                            &format!("🏆 {} PTS", session.total_score()),
                            ACCENT,
                            ACCENT_TEXT,
                        );
                    });
                });
            });

        self.render_settings(ctx);
    }

    fn render_settings(&mut self, ctx: &Context) {
        if !self.settings_open {
            return;
        }
        let mut open = true;
        egui::Window::new("Settings")
            .open(&mut open)
            .collapsible(false)
            .resizable(false)
            .show(ctx, |ui| {
                ui.heading("Global Settings");
                ui.add_space(MARGIN_SM);
                ui.label(format!("Version: {}", env!("CARGO_PKG_VERSION")));
                ui.add_space(MARGIN_SM);
                ui.add(
                    egui::Slider::new(&mut self.pending_settings.dpi, 0.75..=2.0)
                        .text("UI scale (DPI)"),
                );
                if ui.button("Reset to default").clicked() {
                    self.pending_settings.dpi = crate::calculate_dpi_scale();
                }
                ui.checkbox(&mut self.pending_settings.dark_mode, "Dark mode");
                ui.add_space(MARGIN_SM);
                ui.horizontal(|ui| {
                    if ui.button("Apply").clicked() {
                        self.pending_settings.applied_dpi = self.pending_settings.dpi;
                    }
                    if ui.button("OK").clicked() {
                        self.pending_settings.applied_dpi = self.pending_settings.dpi;
                        self.settings_open = false;
                    }
                    if ui.button("Cancel").clicked() {
                        self.pending_settings.dpi = self.pending_settings.applied_dpi;
                        self.settings_open = false;
                    }
                });
            });
        if !open {
            self.pending_settings.dpi = self.pending_settings.applied_dpi;
            self.settings_open = false;
        }
    }
}

impl eframe::App for App {
    fn update(&mut self, ctx: &Context, frame: &mut eframe::Frame) {
        let now = ctx.input(|i| i.time);

        // async results (camera streams, scene reveals) land first
        self.app_state.update(now);
        self.apply_visuals(ctx);

        let mut events = Vec::new();
        self.render_top_bar(ctx, &mut events);

        let mut app_interface = AppInterface {
            events: &mut events,
            app_state: &mut self.app_state,
            now,
        };
        egui::CentralPanel::default().show(ctx, |ui| {
            self.board.ui(&mut app_interface, ui, frame);
        });

        for event in events {
            self.apply_event(event, now);
        }
        self.app_state.settle(now);

        // camera previews and timers need continuous repaints
        ctx.request_repaint();
    }
}
