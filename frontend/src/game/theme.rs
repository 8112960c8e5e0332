use egui::Color32;

pub const MARGIN_SM: f32 = 8.0;
pub const MARGIN_MD: f32 = 12.0;
pub const MARGIN_LG: f32 = 16.0;
pub const MARGIN_XL: f32 = 32.0;

pub const NAVBAR_ROW_HEIGHT_EXTRA: f32 = 12.0;

pub const FONT_SIZE_XS: f32 = 12.0;
pub const FONT_SIZE_SM: f32 = 14.0;
pub const FONT_SIZE_MD: f32 = 18.0;
pub const FONT_SIZE_LG: f32 = 26.0;

pub const BUTTON_MIN_HEIGHT: f32 = 36.0;

/// Two-column layout below this width stacks vertically.
pub const WIDE_LAYOUT_MIN_WIDTH: f32 = 820.0;
pub const MISSION_COLUMN_SHARE: f32 = 0.64;
pub const PINBOARD_HEIGHT: f32 = 600.0;
pub const PIN_CARD_EDGE: f32 = 128.0;
pub const PIN_CARD_PADDING: f32 = 6.0;
pub const AGENT_PANEL_WIDTH: f32 = 420.0;
pub const AGENT_PHOTO_EDGE: f32 = 128.0;

pub const ACCENT: Color32 = Color32::from_rgb(0xF5, 0x9E, 0x0B);
pub const ACCENT_TEXT: Color32 = Color32::from_rgb(0x1C, 0x10, 0x04);
pub const DANGER: Color32 = Color32::from_rgb(0xEF, 0x44, 0x44);
pub const VIDEO_BACKGROUND: Color32 = Color32::BLACK;
pub const MUTED_TEXT: Color32 = Color32::from_gray(150);
pub const BACKDROP: Color32 = Color32::from_black_alpha(200);
