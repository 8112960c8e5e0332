use eframe::Frame;
use egui_extras::{Size, StripBuilder};

use crate::game::theme::*;
use crate::game::AppEvent;
use crate::store::AppState;

pub mod camera_view;
pub mod mission_control;
pub mod overlays;
pub mod spy_log;
pub mod widgets;

pub struct AppInterface<'a> {
    pub events: &'a mut Vec<AppEvent>,
    pub app_state: &'a mut AppState,
    /// Frame clock in seconds.
    pub now: f64,
}

/// Object-safe runtime trait for drawing a screen
pub trait ScreenWidget {
    fn ui(&mut self, app_interface: &mut AppInterface, ui: &mut egui::Ui, frame: &mut Frame);
}

/// Mission control next to the evidence pinboard, with every modal on top.
#[derive(Default)]
pub struct SpyBoardScreen;

impl ScreenWidget for SpyBoardScreen {
    fn ui(&mut self, app_interface: &mut AppInterface, ui: &mut egui::Ui, _frame: &mut Frame) {
        let wide = ui.available_width() >= WIDE_LAYOUT_MIN_WIDTH;

        if wide {
            StripBuilder::new(ui)
                .size(Size::relative(MISSION_COLUMN_SHARE))
                .size(Size::remainder())
                .horizontal(|mut strip| {
                    strip.cell(|ui| {
                        egui::ScrollArea::vertical()
                            .id_salt("mission_column")
                            .show(ui, |ui| mission_control::show(ui, app_interface));
                    });
                    strip.cell(|ui| {
                        egui::ScrollArea::vertical()
                            .id_salt("log_column")
                            .show(ui, |ui| spy_log::show(ui, app_interface));
                    });
                });
        } else {
            // narrow screens stack the columns
            egui::ScrollArea::vertical()
                .id_salt("stacked_columns")
                .show(ui, |ui| {
                    mission_control::show(ui, app_interface);
                    ui.add_space(MARGIN_LG);
                    spy_log::show(ui, app_interface);
                });
        }

        overlays::show(ui.ctx(), app_interface);
    }
}
