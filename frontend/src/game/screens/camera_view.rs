//! Live preview / frozen frame area shared by the mission and agent cameras.

use egui::{Align2, Color32, FontId, Rect, RichText, Stroke, Ui};
use spyboard_shared::{CaptureFlow, CapturePhase};

use super::widgets::{corner_brackets, fitted_rect};
use crate::camera::WebCamera;
use crate::game::theme::*;
use crate::game::AppEvent;
use crate::store::CameraTarget;
use crate::thumbnail::FrameTexture;

/// Paint the camera area of `height` for one capture flow. The mission
/// camera gets viewfinder brackets, the agent camera a face guide.
pub fn show(
    ui: &mut Ui,
    flow: &mut CaptureFlow<WebCamera>,
    frame: &mut FrameTexture,
    target: CameraTarget,
    height: f32,
    now: f64,
    events: &mut Vec<AppEvent>,
) {
    let (rect, _) =
        ui.allocate_exact_size(egui::vec2(ui.available_width(), height), egui::Sense::hover());
    let painter = ui.painter_at(rect);
    painter.rect_filled(rect, 6.0, VIDEO_BACKGROUND);

    match flow.phase() {
        CapturePhase::Idle | CapturePhase::Requesting => {
            waiting(ui, rect, "Initializing camera...");
        }
        CapturePhase::Previewing => {
            let preview = flow
                .stream_mut()
                .and_then(|stream| stream.refresh_preview(ui.ctx()));
            match preview {
                Some(texture) => {
                    let shown = fitted_rect(rect, texture.size_vec2());
                    egui::Image::from_texture(&texture).paint_at(ui, shown);
                    paint_guide(ui, shown, target, now);
                }
                None => waiting(ui, rect, "Initializing camera..."),
            }
        }
        CapturePhase::Frozen => {
            if let Some(image) = flow.frozen_image() {
                let name = match target {
                    CameraTarget::Mission => "mission_frame",
                    CameraTarget::Agent => "agent_frame",
                };
                let texture = frame.texture(ui.ctx(), name, image);
                let shown = fitted_rect(rect, texture.size_vec2());
                egui::Image::from_texture(texture).paint_at(ui, shown);
            }
        }
        CapturePhase::Error(error) => {
            let inner = rect.shrink(MARGIN_LG);
            ui.scope_builder(egui::UiBuilder::new().max_rect(inner), |ui| {
                ui.vertical_centered(|ui| {
                    ui.add_space((inner.height() / 2.0 - 60.0).max(0.0));
                    ui.label(RichText::new("⚠").size(FONT_SIZE_LG).color(DANGER));
                    ui.label(
                        RichText::new(error.to_string())
                            .monospace()
                            .size(FONT_SIZE_SM)
                            .color(DANGER),
                    );
                    ui.add_space(MARGIN_SM);
                    if ui.button(RichText::new("Try Again").monospace()).clicked() {
                        events.push(AppEvent::RetryCamera(target));
                    }
                });
            });
        }
        CapturePhase::Closed => {}
    }
}

fn waiting(ui: &mut Ui, rect: Rect, text: &str) {
    ui.scope_builder(egui::UiBuilder::new().max_rect(rect), |ui| {
        ui.vertical_centered(|ui| {
            ui.add_space((rect.height() / 2.0 - 24.0).max(0.0));
            ui.spinner();
            ui.label(RichText::new(text).monospace().color(MUTED_TEXT));
        });
    });
}

fn paint_guide(ui: &Ui, rect: Rect, target: CameraTarget, now: f64) {
    let painter = ui.painter_at(rect);
    match target {
        CameraTarget::Mission => {
            let inset = rect.shrink(MARGIN_MD);
            corner_brackets(&painter, inset, 28.0, Stroke::new(3.0, ACCENT));

            let tag = egui::pos2(rect.center().x, rect.bottom() - MARGIN_LG);
            let tag_rect = Rect::from_center_size(tag, egui::vec2(120.0, 22.0));
            painter.rect_filled(tag_rect, 4.0, BACKDROP);
            // the red dot blinks once per second
            if now.fract() < 0.5 {
                painter.circle_filled(tag_rect.left_center() + egui::vec2(12.0, 0.0), 4.0, DANGER);
            }
            painter.text(
                tag_rect.center() + egui::vec2(8.0, 0.0),
                Align2::CENTER_CENTER,
                "RECORDING",
                FontId::monospace(FONT_SIZE_XS),
                ACCENT,
            );
        }
        CameraTarget::Agent => {
            let radius = rect.width().min(rect.height()) * 0.32;
            painter.circle_stroke(
                rect.center(),
                radius,
                Stroke::new(3.0, ACCENT.gamma_multiply(0.7)),
            );
            painter.text(
                egui::pos2(rect.center().x, rect.bottom() - MARGIN_LG),
                Align2::CENTER_CENTER,
                "POSITION YOUR FACE",
                FontId::monospace(FONT_SIZE_XS),
                Color32::WHITE,
            );
        }
    }
}
