//! Right column: the evidence pinboard.

use egui::{Align2, Color32, FontId, Pos2, Rect, RichText, Stroke, Ui};
use spyboard_shared::pinboard::{
    connections, layout, Placement, BOARD_COLOR, FRAME_COLOR, PIN_COLOR, STRING_COLOR,
};
use spyboard_shared::MissionLogEntry;

use super::widgets::{
    heading, muted, outline_badge, panel, plural, rotate_point, rotated_quad, rotated_text,
};
use super::AppInterface;
use crate::game::theme::*;

const PIN_RADIUS: f32 = 6.0;
const CAPTION_HEIGHT: f32 = 22.0;

/// Where one card ends up on screen.
struct CardGeometry {
    rect: Rect,
    angle: f32,
}

impl CardGeometry {
    fn new(board: Rect, placement: &Placement) -> Self {
        let size = card_size();
        let room = (board.size() - size).max(egui::Vec2::ZERO);
        let min = board.min + placement.slot.offset(room);
        Self {
            rect: Rect::from_min_size(min, size),
            angle: placement.slot.rotation_radians(),
        }
    }

    fn pivot(&self) -> Pos2 {
        self.rect.center()
    }

    fn pin(&self) -> Pos2 {
        rotate_point(self.rect.center_top(), self.pivot(), self.angle)
    }

    fn photo_rect(&self) -> Rect {
        Rect::from_min_size(
            self.rect.min + egui::Vec2::splat(PIN_CARD_PADDING),
            egui::Vec2::splat(PIN_CARD_EDGE),
        )
    }

    fn contains(&self, pos: Pos2) -> bool {
        // undo the tilt and test against the upright card
        self.rect
            .contains(rotate_point(pos, self.pivot(), -self.angle))
    }
}

fn card_size() -> egui::Vec2 {
    egui::vec2(
        PIN_CARD_EDGE + 2.0 * PIN_CARD_PADDING,
        PIN_CARD_EDGE + 2.0 * PIN_CARD_PADDING + CAPTION_HEIGHT,
    )
}

pub fn show(ui: &mut Ui, app: &mut AppInterface) {
    let state = &mut *app.app_state;
    let entries = state.session.board().entries();

    panel(ui, |ui| {
        ui.horizontal(|ui| {
            heading(ui, "📌 SPY LOG");
            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                outline_badge(
                    ui,
                    &format!(
                        "{}/{}",
                        entries.len(),
                        state.session.missions_per_board()
                    ),
                    ACCENT,
                );
            });
        });
        muted(
            ui,
            &format!(
                "{} COMPLETED",
                plural(entries.len(), "MISSION", "MISSIONS")
            ),
        );
        ui.add_space(MARGIN_SM);

        let (board, response) = ui.allocate_exact_size(
            egui::vec2(ui.available_width(), PINBOARD_HEIGHT),
            egui::Sense::hover(),
        );
        let painter = ui.painter_at(board);
        painter.rect_filled(board, 6.0, BOARD_COLOR);
        painter.rect_stroke(
            board,
            6.0,
            Stroke::new(6.0, FRAME_COLOR),
            egui::StrokeKind::Inside,
        );

        if entries.is_empty() {
            painter.text(
                board.center() - egui::vec2(0.0, 12.0),
                Align2::CENTER_CENTER,
                "NO MISSIONS YET",
                FontId::monospace(FONT_SIZE_MD),
                Color32::from_white_alpha(160),
            );
            painter.text(
                board.center() + egui::vec2(0.0, 14.0),
                Align2::CENTER_CENTER,
                "Complete missions to pin them here",
                FontId::monospace(FONT_SIZE_XS),
                Color32::from_white_alpha(110),
            );
            return;
        }

        let placements = layout(entries.len());
        let cards: Vec<CardGeometry> = placements
            .iter()
            .map(|placement| CardGeometry::new(board, placement))
            .collect();

        for (from, to) in connections(cards.len()) {
            painter.line_segment([cards[from].pin(), cards[to].pin()], Stroke::new(2.0, STRING_COLOR));
        }

        let mut order: Vec<&Placement> = placements.iter().collect();
        order.sort_by_key(|placement| placement.z);
        for placement in order {
            let (Some(entry), Some(card)) = (entries.get(placement.index), cards.get(placement.index))
            else {
                continue;
            };
            let thumbnail = state.textures.thumbnails.get(ui.ctx(), entry).cloned();
            paint_card(ui, &painter, card, entry, thumbnail.as_ref());
        }

        // topmost card under the pointer wins
        let hovered = response.hover_pos().and_then(|pos| {
            placements
                .iter()
                .rev()
                .find(|placement| cards[placement.index].contains(pos))
                .and_then(|placement| entries.get(placement.index))
        });
        if let Some(entry) = hovered {
            response.on_hover_ui_at_pointer(|ui| entry_details(ui, entry));
        }
    });
}

fn paint_card(
    ui: &Ui,
    painter: &egui::Painter,
    card: &CardGeometry,
    entry: &MissionLogEntry,
    thumbnail: Option<&egui::TextureHandle>,
) {
    let pivot = card.pivot();

    // drop shadow, then the white frame
    let shadow = card.rect.translate(egui::vec2(3.0, 4.0));
    painter.add(egui::Shape::convex_polygon(
        rotated_quad(shadow, pivot, card.angle),
        Color32::from_black_alpha(90),
        Stroke::NONE,
    ));
    painter.add(egui::Shape::convex_polygon(
        rotated_quad(card.rect, pivot, card.angle),
        Color32::from_gray(245),
        Stroke::NONE,
    ));

    let photo = card.photo_rect();
    match thumbnail {
        Some(texture) => {
            let origin = (pivot - photo.min) / photo.size();
            egui::Image::from_texture(texture)
                .rotate(card.angle, origin)
                .paint_at(ui, photo);
        }
        None => {
            painter.add(egui::Shape::convex_polygon(
                rotated_quad(photo, pivot, card.angle),
                VIDEO_BACKGROUND,
                Stroke::NONE,
            ));
        }
    }

    let caption = Pos2::new(pivot.x, photo.bottom() + CAPTION_HEIGHT / 2.0 + 2.0);
    rotated_text(
        painter,
        rotate_point(caption, pivot, card.angle),
        card.angle,
        format!("+{}", entry.score),
        FontId::monospace(FONT_SIZE_SM),
        Color32::from_rgb(0x16, 0xA3, 0x4A),
    );

    let pin = card.pin();
    painter.circle_filled(pin + egui::vec2(1.0, 2.0), PIN_RADIUS, Color32::from_black_alpha(80));
    painter.circle(
        pin,
        PIN_RADIUS,
        PIN_COLOR,
        Stroke::new(1.5, PIN_COLOR.gamma_multiply(0.6)),
    );
}

fn entry_details(ui: &mut Ui, entry: &MissionLogEntry) {
    ui.set_max_width(260.0);
    ui.label(RichText::new(entry.scene.text()).monospace().strong());
    ui.label(
        RichText::new(format!("+{} PTS", entry.score))
            .monospace()
            .color(ACCENT),
    );
    if !entry.labels.is_empty() {
        ui.label(
            RichText::new(entry.labels.join(", "))
                .monospace()
                .size(FONT_SIZE_XS)
                .color(MUTED_TEXT),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use spyboard_shared::pinboard::PIN_SLOTS;

    fn board() -> Rect {
        Rect::from_min_size(Pos2::ZERO, egui::vec2(500.0, PINBOARD_HEIGHT))
    }

    #[test]
    fn cards_stay_inside_the_board() {
        for placement in layout(PIN_SLOTS.len()) {
            let card = CardGeometry::new(board(), &placement);
            assert!(board().contains_rect(card.rect), "slot {}", placement.index);
        }
    }

    #[test]
    fn hit_test_follows_the_tilt() {
        let placement = layout(1)[0];
        let card = CardGeometry::new(board(), &placement);
        assert!(card.contains(card.pivot()));
        assert!(!card.contains(card.rect.max + egui::vec2(20.0, 20.0)));
    }

    #[test]
    fn pin_sits_near_the_top_edge() {
        let placement = layout(2)[1];
        let card = CardGeometry::new(board(), &placement);
        assert!((card.pin().y - card.rect.top()).abs() < 10.0);
    }
}
