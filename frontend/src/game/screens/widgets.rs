//! Small painting helpers shared by the board panels and overlays.

use egui::emath::Rot2;
use egui::{
    epaint::TextShape, Color32, FontId, Painter, Pos2, Rect, Response, RichText, Stroke, Ui,
    Vec2,
};

use crate::game::theme::*;

pub fn badge(ui: &mut Ui, text: &str, fill: Color32, text_color: Color32) -> Response {
    egui::Frame::new()
        .fill(fill)
        .corner_radius(4.0)
        .inner_margin(egui::Margin::symmetric(MARGIN_SM as i8, 2))
        .show(ui, |ui| {
            ui.label(
                RichText::new(text)
                    .monospace()
                    .strong()
                    .size(FONT_SIZE_SM)
                    .color(text_color),
            );
        })
        .response
}

pub fn outline_badge(ui: &mut Ui, text: &str, color: Color32) -> Response {
    egui::Frame::new()
        .stroke(Stroke::new(1.0, color))
        .corner_radius(4.0)
        .inner_margin(egui::Margin::symmetric(MARGIN_SM as i8, 2))
        .show(ui, |ui| {
            ui.label(
                RichText::new(text)
                    .monospace()
                    .size(FONT_SIZE_SM)
                    .color(color),
            );
        })
        .response
}

/// Bordered card used for both board columns.
pub fn panel<R>(ui: &mut Ui, add_contents: impl FnOnce(&mut Ui) -> R) -> R {
    egui::Frame::group(ui.style())
        .stroke(Stroke::new(1.0, ACCENT.gamma_multiply(0.4)))
        .corner_radius(8.0)
        .inner_margin(egui::Margin::same(MARGIN_MD as i8))
        .show(ui, |ui| {
            ui.set_width(ui.available_width());
            add_contents(ui)
        })
        .inner
}

pub fn heading(ui: &mut Ui, text: &str) {
    ui.label(
        RichText::new(text)
            .monospace()
            .strong()
            .size(FONT_SIZE_MD),
    );
}

pub fn muted(ui: &mut Ui, text: &str) {
    ui.label(
        RichText::new(text)
            .monospace()
            .size(FONT_SIZE_SM)
            .color(MUTED_TEXT),
    );
}

/// Full-width accent button. Returns true when clicked.
pub fn primary_button(ui: &mut Ui, text: &str, enabled: bool) -> bool {
    let button = egui::Button::new(
        RichText::new(text)
            .monospace()
            .strong()
            .color(ACCENT_TEXT),
    )
    .fill(ACCENT)
    .min_size(egui::vec2(ui.available_width(), BUTTON_MIN_HEIGHT));
    ui.add_enabled(enabled, button).clicked()
}

/// Outlined button sized like [`primary_button`].
pub fn secondary_button(ui: &mut Ui, text: &str, width: f32) -> bool {
    let button = egui::Button::new(RichText::new(text).monospace())
        .stroke(Stroke::new(1.0, ACCENT.gamma_multiply(0.6)))
        .fill(Color32::TRANSPARENT)
        .min_size(egui::vec2(width, BUTTON_MIN_HEIGHT));
    ui.add(button).clicked()
}

/// Two buttons sharing one row, secondary on the left.
pub fn button_pair(ui: &mut Ui, secondary: &str, primary: &str, primary_enabled: bool) -> (bool, bool) {
    let half = (ui.available_width() - ui.spacing().item_spacing.x) / 2.0;
    ui.horizontal(|ui| {
        let left = secondary_button(ui, secondary, half);
        let right = ui
            .allocate_ui(egui::vec2(half, BUTTON_MIN_HEIGHT), |ui| {
                primary_button(ui, primary, primary_enabled)
            })
            .inner;
        (left, right)
    })
    .inner
}

/// Largest rect with the aspect ratio of `content` centered in `bounds`.
pub fn fitted_rect(bounds: Rect, content: Vec2) -> Rect {
    if content.x <= 0.0 || content.y <= 0.0 {
        return bounds;
    }
    let scale = (bounds.width() / content.x).min(bounds.height() / content.y);
    Rect::from_center_size(bounds.center(), content * scale)
}

/// Corners of `rect` rotated by `angle` radians around `pivot`, clockwise
/// starting at the top left.
pub fn rotated_quad(rect: Rect, pivot: Pos2, angle: f32) -> Vec<Pos2> {
    let rot = Rot2::from_angle(angle);
    [
        rect.left_top(),
        rect.right_top(),
        rect.right_bottom(),
        rect.left_bottom(),
    ]
    .into_iter()
    .map(|corner| pivot + rot * (corner - pivot))
    .collect()
}

/// Texture coordinates that center-crop `size` to a square.
pub fn cover_uv(size: Vec2) -> Rect {
    if size.x <= 0.0 || size.y <= 0.0 {
        return Rect::from_min_max(Pos2::ZERO, egui::pos2(1.0, 1.0));
    }
    let side = size.x.min(size.y);
    let span = egui::vec2(side / size.x, side / size.y);
    Rect::from_center_size(egui::pos2(0.5, 0.5), span)
}

pub fn rotate_point(point: Pos2, pivot: Pos2, angle: f32) -> Pos2 {
    pivot + Rot2::from_angle(angle) * (point - pivot)
}

/// Viewfinder brackets in each corner of `rect`.
pub fn corner_brackets(painter: &Painter, rect: Rect, len: f32, stroke: Stroke) {
    let corners = [
        (rect.left_top(), Vec2::new(1.0, 0.0), Vec2::new(0.0, 1.0)),
        (rect.right_top(), Vec2::new(-1.0, 0.0), Vec2::new(0.0, 1.0)),
        (rect.left_bottom(), Vec2::new(1.0, 0.0), Vec2::new(0.0, -1.0)),
        (rect.right_bottom(), Vec2::new(-1.0, 0.0), Vec2::new(0.0, -1.0)),
    ];
    for (corner, horizontal, vertical) in corners {
        painter.line_segment([corner, corner + horizontal * len], stroke);
        painter.line_segment([corner, corner + vertical * len], stroke);
    }
}

/// Text centered on `center`, rotated with its frame.
pub fn rotated_text(
    painter: &Painter,
    center: Pos2,
    angle: f32,
    text: String,
    font: FontId,
    color: Color32,
) {
    let galley = painter.layout_no_wrap(text, font, color);
    let half = galley.size() / 2.0;
    // text shapes rotate around their top-left corner
    let pos = rotate_point(center - half, center, angle);
    painter.add(TextShape::new(pos, galley, color).with_angle(angle));
}

pub fn plural(count: usize, one: &str, many: &str) -> String {
    if count == 1 {
        format!("{} {}", count, one)
    } else {
        format!("{} {}", count, many)
    }
}
