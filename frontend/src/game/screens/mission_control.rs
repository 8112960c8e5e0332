//! Left column: scene generator, mission camera and detection report.

use egui::{Color32, RichText, Ui};
use spyboard_shared::{BoardPhase, CapturePhase, Detection, Scene, SCENE_CATALOG};

use super::widgets::{
    self, badge, button_pair, heading, muted, outline_badge, panel, primary_button,
};
use super::{camera_view, AppInterface};
use crate::game::theme::*;
use crate::game::AppEvent;
use crate::store::{AppState, CameraTarget};

/// Height of the mission camera viewport.
const VIEWPORT_HEIGHT: f32 = 360.0;

pub fn show(ui: &mut Ui, app: &mut AppInterface) {
    let now = app.now;
    let state = &mut *app.app_state;
    let events = &mut *app.events;

    panel(ui, |ui| {
        ui.horizontal(|ui| {
            heading(ui, "🎯 MISSION CONTROL");
            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                outline_badge(
                    ui,
                    &format!(
                        "{}/{} SCENES",
                        state.session.unlocked_scenes(),
                        SCENE_CATALOG.len()
                    ),
                    ACCENT,
                );
            });
        });
        ui.add_space(MARGIN_MD);

        // stays visible underneath the quit warning
        if state.session.mission_camera_active() && state.mission.is_some() {
            mission_camera(ui, state, events, now);
        } else {
            scene_display(ui, state, events);
        }
    });
}

fn scene_display(ui: &mut Ui, state: &AppState, events: &mut Vec<AppEvent>) {
    let session = &state.session;
    let generating = state.is_generating();

    match session.phase() {
        BoardPhase::AwaitingIdentity => {
            ui.vertical_centered(|ui| {
                ui.add_space(MARGIN_LG);
                ui.label(RichText::new("🗂").size(48.0));
                heading(ui, "BOARD COMPLETE");
                muted(ui, "Confirm your agent identity to close the case");
                ui.add_space(MARGIN_LG);
            });
            if primary_button(ui, "🕵 IDENTIFY AGENT", true) {
                events.push(AppEvent::OpenIdentityCamera);
            }
            return;
        }
        BoardPhase::Completed => {
            ui.vertical_centered(|ui| {
                ui.add_space(MARGIN_LG);
                heading(ui, "CASE CLOSED");
                ui.add_space(MARGIN_LG);
            });
            return;
        }
        BoardPhase::Collecting => {}
    }

    match session.current_scene() {
        None => {
            ui.vertical_centered(|ui| {
                ui.add_space(MARGIN_XL);
                ui.label(RichText::new("🕵").size(48.0));
                heading(ui, "READY FOR MISSION");
                muted(ui, "Generate a random scene to begin spying");
                ui.add_space(MARGIN_XL);
            });
            let label = if generating {
                "GENERATING..."
            } else {
                "🎲 GENERATE SCENE"
            };
            if primary_button(ui, label, !generating) {
                events.push(AppEvent::GenerateScene);
            }
        }
        Some(scene) => {
            ui.horizontal(|ui| {
                badge(ui, "TARGET MISSION", DANGER, Color32::WHITE);
            });
            ui.add_space(MARGIN_SM);
            ui.label(
                RichText::new(scene.text())
                    .monospace()
                    .strong()
                    .size(FONT_SIZE_LG),
            );
            muted(ui, "Capture evidence of this mischievous act with your camera");
            ui.add_space(MARGIN_LG);

            let (reroll, open) = button_pair(
                ui,
                if generating { "GENERATING..." } else { "🎲 NEW MISSION" },
                "📷 OPEN CAMERA",
                !generating,
            );
            if reroll && !generating {
                events.push(AppEvent::GenerateScene);
            }
            if open {
                events.push(AppEvent::OpenMissionCamera);
            }
        }
    }
}

fn mission_camera(ui: &mut Ui, state: &mut AppState, events: &mut Vec<AppEvent>, now: f64) {
    let Some(mission) = state.mission.as_mut() else {
        return;
    };
    let scene = mission.scene().clone();

    ui.horizontal(|ui| {
        ui.label(RichText::new("📹 SURVEILLANCE MODE").monospace().strong().color(ACCENT));
        ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
            if ui.small_button("✖").on_hover_text("Close camera").clicked() {
                events.push(AppEvent::CloseCamera(CameraTarget::Mission));
            }
        });
    });
    muted(ui, &format!("TARGET: {}", scene.text()));
    ui.add_space(MARGIN_SM);

    camera_view::show(
        ui,
        mission.flow_mut(),
        &mut state.textures.mission_frame,
        CameraTarget::Mission,
        VIEWPORT_HEIGHT,
        now,
        events,
    );
    ui.add_space(MARGIN_MD);

    if let Some(detection) = mission.detection() {
        detection_report(ui, detection, &scene);
        ui.add_space(MARGIN_MD);
    }

    match mission.flow().phase() {
        CapturePhase::Previewing | CapturePhase::Idle | CapturePhase::Requesting => {
            let ready = mission.flow().can_capture();
            if primary_button(ui, "📸 CAPTURE EVIDENCE", ready) {
                events.push(AppEvent::Capture(CameraTarget::Mission));
            }
        }
        CapturePhase::Frozen => {
            let analyzing = mission.is_analyzing();
            let (retake, primary) = match mission.detection() {
                None => button_pair(
                    ui,
                    "⟲ RETAKE",
                    if analyzing { "ANALYZING..." } else { "🔍 ANALYZE" },
                    !analyzing,
                ),
                Some(_) => button_pair(ui, "⟲ RETAKE", "✔ ADD TO LOG", true),
            };
            if retake {
                events.push(AppEvent::Retake(CameraTarget::Mission));
            }
            if primary {
                events.push(match mission.detection() {
                    None => AppEvent::Analyze,
                    Some(_) => AppEvent::AddToLog,
                });
            }
        }
        CapturePhase::Error(_) | CapturePhase::Closed => {}
    }
}

fn detection_report(ui: &mut Ui, detection: &Detection, scene: &Scene) {
    egui::Frame::new()
        .fill(ACCENT.gamma_multiply(0.12))
        .stroke(egui::Stroke::new(1.0, ACCENT.gamma_multiply(0.5)))
        .corner_radius(6.0)
        .inner_margin(egui::Margin::same(MARGIN_MD as i8))
        .show(ui, |ui| {
            ui.set_width(ui.available_width());
            ui.horizontal(|ui| {
                ui.label(RichText::new("📊 DETECTION REPORT").monospace().strong());
                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    badge(ui, &format!("+{} PTS", detection.points), ACCENT, ACCENT_TEXT);
                });
            });
            ui.add_space(MARGIN_SM);
            muted(ui, "IDENTIFIED OBJECTS:");
            let relevant: Vec<&str> = detection.relevant_labels(scene).collect();
            ui.horizontal_wrapped(|ui| {
                for label in &detection.labels {
                    if relevant.contains(&label.as_str()) {
                        badge(ui, &format!("★ {}", label), ACCENT, ACCENT_TEXT);
                    } else {
                        outline_badge(ui, label, MUTED_TEXT);
                    }
                }
            });
            if !relevant.is_empty() {
                ui.add_space(MARGIN_SM);
                ui.label(
                    RichText::new(format!(
                        "BONUS: {} detected (+{} pts)",
                        widgets::plural(relevant.len(), "relevant object", "relevant objects"),
                        detection.bonus_points(scene)
                    ))
                    .monospace()
                    .size(FONT_SIZE_XS)
                    .color(ACCENT),
                );
            }
        });
}
