//! Textures for captured frames and pinboard thumbnails.

use std::collections::HashMap;

use egui::{ColorImage, TextureHandle, TextureOptions};
use image::{imageops, RgbaImage};
use spyboard_shared::{CapturedImage, EntryId, MissionLogEntry};

/// Center-crop `image` to a square and scale it to `edge` pixels.
pub fn square_thumbnail(image: &CapturedImage, edge: u32) -> Option<ColorImage> {
    let [w, h] = image.size();
    if w == 0 || h == 0 || edge == 0 {
        return None;
    }
    let (w, h) = (w as u32, h as u32);
    let buffer = RgbaImage::from_raw(w, h, image.rgba().to_vec())?;
    let side = w.min(h);
    let square = imageops::crop_imm(&buffer, (w - side) / 2, (h - side) / 2, side, side).to_image();
    let thumb = imageops::thumbnail(&square, edge, edge);
    Some(ColorImage::from_rgba_unmultiplied(
        [edge as usize, edge as usize],
        thumb.as_raw(),
    ))
}

pub fn full_frame(image: &CapturedImage) -> ColorImage {
    ColorImage::from_rgba_unmultiplied(image.size(), image.rgba())
}

/// Texture for one displayed frame, re-uploaded only when the frame changes.
#[derive(Default)]
pub struct FrameTexture {
    cached: Option<(CapturedImage, TextureHandle)>,
}

impl FrameTexture {
    pub fn texture(&mut self, ctx: &egui::Context, name: &str, image: &CapturedImage) -> &TextureHandle {
        if self
            .cached
            .as_ref()
            .is_some_and(|(frame, _)| !frame.same_frame(image))
        {
            self.cached = None;
        }
        let (_, texture) = self.cached.get_or_insert_with(|| {
            let texture = ctx.load_texture(name, full_frame(image), TextureOptions::LINEAR);
            (image.clone(), texture)
        });
        texture
    }

    pub fn clear(&mut self) {
        self.cached = None;
    }
}

/// Square evidence thumbnails keyed by log entry.
pub struct ThumbnailCache {
    edge: u32,
    textures: HashMap<EntryId, TextureHandle>,
}

impl ThumbnailCache {
    pub fn new(edge: u32) -> Self {
        Self {
            edge,
            textures: HashMap::new(),
        }
    }

    pub fn get(&mut self, ctx: &egui::Context, entry: &MissionLogEntry) -> Option<&TextureHandle> {
        if !self.textures.contains_key(&entry.id) {
            let image = square_thumbnail(&entry.image, self.edge)?;
            let texture =
                ctx.load_texture(format!("evidence-{}", entry.id), image, TextureOptions::LINEAR);
            self.textures.insert(entry.id, texture);
        }
        self.textures.get(&entry.id)
    }

    /// Forget thumbnails of entries that left the board.
    pub fn retain(&mut self, entries: &[MissionLogEntry]) {
        self.textures
            .retain(|id, _| entries.iter().any(|entry| entry.id == *id));
    }

    pub fn len(&self) -> usize {
        self.textures.len()
    }

    pub fn is_empty(&self) -> bool {
        self.textures.is_empty()
    }

    pub fn clear(&mut self) {
        self.textures.clear();
    }
}

/// Every texture the board screen shows.
pub struct Textures {
    pub mission_frame: FrameTexture,
    pub agent_frame: FrameTexture,
    pub agent_photo: FrameTexture,
    pub thumbnails: ThumbnailCache,
}

impl Textures {
    pub fn new(thumbnail_edge: u32) -> Self {
        Self {
            mission_frame: FrameTexture::default(),
            agent_frame: FrameTexture::default(),
            agent_photo: FrameTexture::default(),
            thumbnails: ThumbnailCache::new(thumbnail_edge),
        }
    }

    pub fn clear(&mut self) {
        self.mission_frame.clear();
        self.agent_frame.clear();
        self.agent_photo.clear();
        self.thumbnails.clear();
    }
}
