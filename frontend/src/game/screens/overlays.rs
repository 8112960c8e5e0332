//! Modals, toasts and the confetti layer drawn above the board.

use egui::{Align2, Color32, Context, Id, Order, RichText, Stroke, Ui};
use spyboard_shared::pinboard::{FRAME_COLOR, STRING_COLOR};
use spyboard_shared::{CapturePhase, Overlay};

use super::widgets::{badge, button_pair, cover_uv, muted, primary_button, rotated_quad};
use super::{camera_view, AppInterface};
use crate::game::theme::*;
use crate::game::AppEvent;
use crate::store::{AppState, CameraTarget};

/// Seconds over which a toast fades out at the end of its lifetime.
const FADE_SECS: f64 = 0.4;

pub fn show(ctx: &Context, app: &mut AppInterface) {
    let now = app.now;
    let state = &mut *app.app_state;
    let events = &mut *app.events;

    if state.session.agent_camera_active() {
        agent_camera(ctx, state, events, now);
    }
    match state.session.overlay() {
        Overlay::Completion => completion(ctx, state, events, now),
        Overlay::QuitWarning => quit_warning(ctx, state, events),
        Overlay::None | Overlay::MissionCamera | Overlay::AgentCamera => {}
    }

    unlock_toast(ctx, state, now);
    track_banner(ctx, state, now);
    confetti(ctx, state, now);
}

/// Event for an Escape press or backdrop click on `modal`. Only the modal in
/// front reacts, and the completion screen ignores both.
fn dismiss_event(modal: Overlay, front: Overlay) -> Option<AppEvent> {
    if modal != front {
        return None;
    }
    match modal {
        Overlay::AgentCamera => Some(AppEvent::CloseCamera(CameraTarget::Agent)),
        Overlay::QuitWarning => Some(AppEvent::ContinueMission),
        Overlay::Completion | Overlay::MissionCamera | Overlay::None => None,
    }
}

fn modal_frame(ctx: &Context) -> egui::Frame {
    egui::Frame::popup(&ctx.style())
        .stroke(Stroke::new(2.0, ACCENT))
        .corner_radius(10.0)
        .inner_margin(egui::Margin::same(MARGIN_LG as i8))
}

fn modal_header(ui: &mut Ui, title: &str, events: &mut Vec<AppEvent>, close: AppEvent) {
    ui.horizontal(|ui| {
        ui.label(
            RichText::new(title)
                .monospace()
                .strong()
                .size(FONT_SIZE_MD)
                .color(ACCENT),
        );
        ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
            if ui.small_button("✖").clicked() {
                events.push(close);
            }
        });
    });
}

fn agent_camera(ctx: &Context, state: &mut AppState, events: &mut Vec<AppEvent>, now: f64) {
    let Some(flow) = state.agent.as_mut() else {
        return;
    };
    let close = AppEvent::CloseCamera(CameraTarget::Agent);

    let response = egui::Modal::new(Id::new("agent_camera"))
        .frame(modal_frame(ctx))
        .backdrop_color(BACKDROP)
        .show(ctx, |ui| {
            ui.set_width(AGENT_PANEL_WIDTH);
            modal_header(ui, "🕵 AGENT IDENTIFICATION", events, close);
            muted(ui, "Confirm your identity to close this board");
            ui.add_space(MARGIN_SM);

            camera_view::show(
                ui,
                flow,
                &mut state.textures.agent_frame,
                CameraTarget::Agent,
                AGENT_PANEL_WIDTH * 0.75,
                now,
                events,
            );
            ui.add_space(MARGIN_MD);

            match flow.phase() {
                CapturePhase::Idle | CapturePhase::Requesting | CapturePhase::Previewing => {
                    let ready = flow.can_capture();
                    let label = if ready {
                        "📸 CAPTURE AGENT PHOTO"
                    } else {
                        "LOADING..."
                    };
                    if primary_button(ui, label, ready) {
                        events.push(AppEvent::Capture(CameraTarget::Agent));
                    }
                }
                CapturePhase::Frozen => {
                    let (retake, confirm) = button_pair(ui, "⟲ RETAKE", "✔ CONFIRM", true);
                    if retake {
                        events.push(AppEvent::Retake(CameraTarget::Agent));
                    }
                    if confirm {
                        events.push(AppEvent::ConfirmIdentity);
                    }
                }
                CapturePhase::Error(_) | CapturePhase::Closed => {}
            }
        });

    if response.should_close() {
        events.extend(dismiss_event(Overlay::AgentCamera, state.session.overlay()));
    }
}

fn completion(ctx: &Context, state: &mut AppState, events: &mut Vec<AppEvent>, now: f64) {
    let session = &state.session;
    let sparkles = &state.sparkles;
    let photo_texture = &mut state.textures.agent_photo;

    egui::Modal::new(Id::new("completion"))
        .frame(modal_frame(ctx))
        .backdrop_color(Color32::from_black_alpha(230))
        .show(ctx, |ui| {
            ui.set_width(AGENT_PANEL_WIDTH);
            ui.with_layout(egui::Layout::right_to_left(egui::Align::Min), |ui| {
                if ui.small_button("✖").clicked() {
                    events.push(AppEvent::DismissCompletion);
                }
            });

            let header = egui::Frame::new()
                .fill(ACCENT.gamma_multiply(0.3))
                .corner_radius(8.0)
                .inner_margin(egui::Margin::same(MARGIN_LG as i8))
                .show(ui, |ui| {
                    ui.set_width(ui.available_width());
                    ui.vertical_centered(|ui| {
                        ui.label(RichText::new("🏆").size(48.0));
                        ui.label(
                            RichText::new("MISSION COMPLETE!")
                                .monospace()
                                .strong()
                                .size(FONT_SIZE_LG),
                        );
                        muted(ui, "Agent Identity Confirmed");
                    });
                });
            let area = header.response.rect;
            let painter = ui.painter_at(area);
            for (i, (pos, color)) in sparkles.iter().enumerate() {
                let pulse = 0.5 + 0.5 * ((now * 3.0) as f32 + i as f32).sin();
                let center = area.min + *pos / 100.0 * area.size();
                painter.circle_filled(center, 3.0, color.gamma_multiply(0.3 + 0.4 * pulse));
            }
            ui.add_space(MARGIN_LG);

            if let Some(photo) = session.agent_photo() {
                ui.vertical_centered(|ui| {
                    let texture = photo_texture.texture(ui.ctx(), "agent_photo", photo);
                    let uv = cover_uv(texture.size_vec2());
                    let framed = egui::Frame::new()
                        .fill(FRAME_COLOR)
                        .inner_margin(egui::Margin::same(8))
                        .show(ui, |ui| {
                            ui.add(
                                egui::Image::from_texture(texture)
                                    .uv(uv)
                                    .fit_to_exact_size(egui::Vec2::splat(AGENT_PHOTO_EDGE)),
                            );
                        });
                    let pin = framed.response.rect.center_top();
                    ui.painter().circle(
                        pin,
                        10.0,
                        DANGER,
                        Stroke::new(2.0, STRING_COLOR),
                    );
                });
                ui.add_space(MARGIN_LG);
            }

            ui.columns(2, |columns| {
                stat(&mut columns[0], "⭐", session.total_score().to_string(), "TOTAL POINTS");
                stat(
                    &mut columns[1],
                    "🏆",
                    session.missions_completed().to_string(),
                    "MISSIONS",
                );
            });
            ui.add_space(MARGIN_LG);
            ui.vertical_centered(|ui| {
                badge(ui, "ELITE SPY STATUS ACHIEVED", ACCENT, ACCENT_TEXT);
            });
            ui.add_space(MARGIN_LG);
            if primary_button(ui, "▶ NEXT BOARD", true) {
                events.push(AppEvent::DismissCompletion);
            }
        });
}

fn stat(ui: &mut Ui, icon: &str, value: String, caption: &str) {
    egui::Frame::new()
        .fill(ui.visuals().faint_bg_color)
        .corner_radius(8.0)
        .inner_margin(egui::Margin::same(MARGIN_MD as i8))
        .show(ui, |ui| {
            ui.set_width(ui.available_width());
            ui.vertical_centered(|ui| {
                ui.label(RichText::new(icon).size(FONT_SIZE_MD));
                ui.label(RichText::new(value).monospace().strong().size(FONT_SIZE_LG));
                muted(ui, caption);
            });
        });
}

fn quit_warning(ctx: &Context, state: &AppState, events: &mut Vec<AppEvent>) {
    let done = state.session.board().len();
    let total = state.session.missions_per_board();

    let response = egui::Modal::new(Id::new("quit_warning"))
        .frame(modal_frame(ctx).stroke(Stroke::new(2.0, DANGER)))
        .backdrop_color(BACKDROP)
        .show(ctx, |ui| {
            ui.set_width(AGENT_PANEL_WIDTH * 0.9);
            ui.vertical_centered(|ui| {
                ui.label(RichText::new("😢").size(56.0));
                ui.label(
                    RichText::new("MISSION INCOMPLETE!")
                        .monospace()
                        .strong()
                        .size(FONT_SIZE_LG)
                        .color(DANGER),
                );
                ui.add_space(MARGIN_SM);
                ui.label(
                    RichText::new(format!("You've only completed {}/{} missions!", done, total))
                        .monospace(),
                );
                muted(ui, "Are you sure you want to abandon your spy career?");
            });
            ui.add_space(MARGIN_LG);

            let half = (ui.available_width() - ui.spacing().item_spacing.x) / 2.0;
            ui.horizontal(|ui| {
                let quit = egui::Button::new(
                    RichText::new("QUIT").monospace().strong().color(Color32::WHITE),
                )
                .fill(DANGER)
                .min_size(egui::vec2(half, BUTTON_MIN_HEIGHT));
                if ui.add(quit).clicked() {
                    events.push(AppEvent::Quit);
                }
                ui.allocate_ui(egui::vec2(half, BUTTON_MIN_HEIGHT), |ui| {
                    if primary_button(ui, "CONTINUE", true) {
                        events.push(AppEvent::ContinueMission);
                    }
                });
            });
        });

    if response.should_close() {
        events.extend(dismiss_event(Overlay::QuitWarning, state.session.overlay()));
    }
}

/// 0 when the notice is about to vanish, 1 for most of its life.
fn fade(remaining: Option<f64>) -> f32 {
    remaining.map_or(0.0, |r| (r / FADE_SECS).clamp(0.0, 1.0) as f32)
}

fn unlock_toast(ctx: &Context, state: &AppState, now: f64) {
    let Some(added) = state.session.unlock_notice(now) else {
        return;
    };
    let opacity = fade(state.session.unlock_notice_remaining(now));

    egui::Area::new(Id::new("unlock_toast"))
        .anchor(Align2::CENTER_TOP, egui::vec2(0.0, 72.0))
        .order(Order::Foreground)
        .interactable(false)
        .show(ctx, |ui| {
            ui.set_opacity(opacity);
            egui::Frame::new()
                .fill(ACCENT)
                .corner_radius(8.0)
                .inner_margin(egui::Margin::symmetric(MARGIN_LG as i8, MARGIN_MD as i8))
                .show(ui, |ui| {
                    ui.vertical_centered(|ui| {
                        ui.label(
                            RichText::new("🔓 NEW SCENES UNLOCKED!")
                                .monospace()
                                .strong()
                                .size(FONT_SIZE_MD)
                                .color(ACCENT_TEXT),
                        );
                        ui.label(
                            RichText::new(format!("+{} missions available", added))
                                .monospace()
                                .size(FONT_SIZE_SM)
                                .color(ACCENT_TEXT),
                        );
                    });
                });
        });
}

fn track_banner(ctx: &Context, state: &AppState, now: f64) {
    let Some(track) = state.music.banner(now) else {
        return;
    };
    egui::Area::new(Id::new("track_banner"))
        .anchor(Align2::RIGHT_BOTTOM, egui::vec2(-MARGIN_LG, -MARGIN_LG))
        .order(Order::Foreground)
        .interactable(false)
        .show(ctx, |ui| {
            egui::Frame::new()
                .fill(BACKDROP)
                .stroke(Stroke::new(1.0, ACCENT))
                .corner_radius(6.0)
                .inner_margin(egui::Margin::symmetric(MARGIN_MD as i8, MARGIN_SM as i8))
                .show(ui, |ui| {
                    ui.label(
                        RichText::new(format!("♪ {}", track.name))
                            .monospace()
                            .color(ACCENT),
                    );
                });
        });
}

fn confetti(ctx: &Context, state: &AppState, now: f64) {
    let Some(shower) = &state.confetti else {
        return;
    };
    let screen = ctx.screen_rect();
    let elapsed = shower.elapsed(now);
    let painter = ctx.layer_painter(egui::LayerId::new(Order::Tooltip, Id::new("confetti")));

    for piece in shower.pieces() {
        let Some((pos, spin)) = piece.position(elapsed, screen.width(), screen.height()) else {
            continue;
        };
        let rect = egui::Rect::from_min_size(screen.min + pos.to_vec2(), piece.extent());
        painter.add(egui::Shape::convex_polygon(
            rotated_quad(rect, rect.center(), spin.to_radians()),
            piece.color,
            Stroke::NONE,
        ));
    }
}
