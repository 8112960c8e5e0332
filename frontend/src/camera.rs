//! Webcam streams backed by `getUserMedia`.
//!
//! A [`WebCamera`] owns the media stream, a detached `<video>` element that
//! plays it and an offscreen canvas used both for the live preview texture
//! and for encoding snapshots. The capture flows in `spyboard_shared` decide
//! when it is stopped.

use egui::{ColorImage, TextureHandle, TextureOptions};
use spyboard_shared::capture::VideoStream;
use spyboard_shared::config::CapturePreset;
use spyboard_shared::image::fit_within;
use spyboard_shared::{CapturedImage, DeviceError};
use wasm_bindgen::{JsCast, JsValue};
use wasm_bindgen_futures::JsFuture;
use web_sys::{
    CanvasRenderingContext2d, Document, DomException, HtmlCanvasElement, HtmlVideoElement,
    MediaStream, MediaStreamConstraints, MediaStreamTrack,
};

/// `HTMLMediaElement.HAVE_CURRENT_DATA`
const HAVE_CURRENT_DATA: u16 = 2;

pub struct WebCamera {
    video: HtmlVideoElement,
    canvas: HtmlCanvasElement,
    context: CanvasRenderingContext2d,
    stream: MediaStream,
    preview_size: [u32; 2],
    preview: Option<TextureHandle>,
}

impl WebCamera {
    /// Ask the browser for a video-only stream matching `preset` and start
    /// playing it. The permission prompt, if any, is shown while this is
    /// pending.
    pub async fn open(preset: CapturePreset, preview_size: [u32; 2]) -> Result<Self, DeviceError> {
        Self::try_open(preset, preview_size)
            .await
            .map_err(|e| classify_media_error(&e))
    }

    async fn try_open(preset: CapturePreset, preview_size: [u32; 2]) -> Result<Self, JsValue> {
        let window = web_sys::window().ok_or_else(|| JsValue::from_str("no global window"))?;
        let document = window
            .document()
            .ok_or_else(|| JsValue::from_str("no document"))?;
        let media_devices = window.navigator().media_devices()?;

        let constraints = MediaStreamConstraints::new();
        constraints.set_video(&video_constraints(&preset)?);
        constraints.set_audio(&JsValue::FALSE);
        let stream = JsFuture::from(media_devices.get_user_media_with_constraints(&constraints)?)
            .await?
            .dyn_into::<MediaStream>()?;

        // the stream is live from here on; don't leak it if the elements fail
        match Self::attach(&document, stream.clone(), preview_size).await {
            Ok(camera) => Ok(camera),
            Err(e) => {
                stop_tracks(&stream);
                Err(e)
            }
        }
    }

    async fn attach(
        document: &Document,
        stream: MediaStream,
        preview_size: [u32; 2],
    ) -> Result<Self, JsValue> {
        let video = document
            .create_element("video")?
            .dyn_into::<HtmlVideoElement>()?;
        video.set_autoplay(true);
        video.set_muted(true);
        if let Err(e) = video.set_attribute("playsinline", "true") {
            tracing::debug!(error = ?e, "playsinline not set");
        }
        video.set_src_object(Some(&stream));

        let canvas = document
            .create_element("canvas")?
            .dyn_into::<HtmlCanvasElement>()?;
        let context = canvas
            .get_context("2d")?
            .ok_or_else(|| JsValue::from_str("Failed to get 2d context"))?
            .dyn_into::<CanvasRenderingContext2d>()?;

        if let Ok(play_promise) = video.play() {
            if let Err(e) = JsFuture::from(play_promise).await {
                // readiness is checked per frame, so a late start is fine
                tracing::debug!(error = ?e, "video play() rejected");
            }
        }

        Ok(Self {
            video,
            canvas,
            context,
            stream,
            preview_size,
            preview: None,
        })
    }

    fn native_size(&self) -> [u32; 2] {
        [self.video.video_width(), self.video.video_height()]
    }

    /// Copy the current video frame into the canvas at `size` and read the
    /// pixels back.
    fn draw_frame(&self, size: [u32; 2]) -> Result<Vec<u8>, JsValue> {
        let [w, h] = size;
        if self.canvas.width() != w || self.canvas.height() != h {
            self.canvas.set_width(w);
            self.canvas.set_height(h);
        }
        self.context
            .draw_image_with_html_video_element_and_dw_and_dh(
                &self.video,
                0.0,
                0.0,
                w as f64,
                h as f64,
            )?;
        let image_data = self.context.get_image_data(0.0, 0.0, w as f64, h as f64)?;
        Ok(image_data.data().0)
    }

    /// Upload the latest frame into the preview texture and return it.
    /// Before the video is ready the previous texture (if any) is kept.
    pub fn refresh_preview(&mut self, ctx: &egui::Context) -> Option<TextureHandle> {
        if !self.is_ready() {
            return self.preview.clone();
        }
        let size = fit_within(self.native_size(), self.preview_size);
        let rgba = match self.draw_frame(size) {
            Ok(rgba) => rgba,
            Err(e) => {
                tracing::debug!(error = ?e, "preview frame skipped");
                return self.preview.clone();
            }
        };
        let pixels = [size[0] as usize, size[1] as usize];
        if rgba.len() != pixels[0] * pixels[1] * 4 {
            return self.preview.clone();
        }
        let image = ColorImage::from_rgba_unmultiplied(pixels, &rgba);
        match &mut self.preview {
            Some(texture) => texture.set(image, TextureOptions::LINEAR),
            None => {
                self.preview = Some(ctx.load_texture("camera_preview", image, TextureOptions::LINEAR))
            }
        }
        self.preview.clone()
    }

    fn encode(&self, size: [u32; 2], quality: f64) -> Result<Option<CapturedImage>, JsValue> {
        let rgba = self.draw_frame(size)?;
        let data_uri = self
            .canvas
            .to_data_url_with_type_and_encoder_options("image/jpeg", &JsValue::from_f64(quality))?;
        Ok(CapturedImage::new(
            data_uri,
            [size[0] as usize, size[1] as usize],
            rgba,
        ))
    }
}

impl VideoStream for WebCamera {
    fn stop(&mut self) {
        stop_tracks(&self.stream);
        self.video.set_src_object(None);
        self.preview = None;
        tracing::debug!("camera stream stopped");
    }

    fn is_ready(&self) -> bool {
        let [w, h] = self.native_size();
        self.video.ready_state() >= HAVE_CURRENT_DATA && w > 0 && h > 0 && !self.video.paused()
    }

    fn snapshot(&mut self, max_size: [u32; 2], quality: f64) -> Option<CapturedImage> {
        let size = fit_within(self.native_size(), max_size);
        match self.encode(size, quality) {
            Ok(image) => image,
            Err(e) => {
                tracing::warn!(error = ?e, "could not encode snapshot");
                None
            }
        }
    }
}

/// `{facingMode, width: {ideal}, height: {ideal}}`
fn video_constraints(preset: &CapturePreset) -> Result<JsValue, JsValue> {
    let ideal = |value: u32| -> Result<JsValue, JsValue> {
        let obj = js_sys::Object::new();
        js_sys::Reflect::set(&obj, &JsValue::from_str("ideal"), &JsValue::from(value))?;
        Ok(obj.into())
    };
    let video = js_sys::Object::new();
    js_sys::Reflect::set(
        &video,
        &JsValue::from_str("facingMode"),
        &JsValue::from_str(preset.facing.as_str()),
    )?;
    js_sys::Reflect::set(&video, &JsValue::from_str("width"), &ideal(preset.width)?)?;
    js_sys::Reflect::set(&video, &JsValue::from_str("height"), &ideal(preset.height)?)?;
    Ok(video.into())
}

fn stop_tracks(stream: &MediaStream) {
    let tracks = stream.get_tracks();
    for i in 0..tracks.length() {
        if let Ok(track) = tracks.get(i).dyn_into::<MediaStreamTrack>() {
            track.stop();
        }
    }
}

/// Map a `getUserMedia` rejection to the user-facing category.
pub fn classify_media_error(err: &JsValue) -> DeviceError {
    let Some(exception) = err.dyn_ref::<DomException>() else {
        return DeviceError::Unknown;
    };
    match DeviceError::from_dom_name(&exception.name()) {
        DeviceError::Unknown if exception.message().contains("Permission denied") => {
            DeviceError::PermissionDenied
        }
        kind => kind,
    }
}
