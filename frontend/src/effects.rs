use crate::camera::WebCamera;
use gloo_timers::future::TimeoutFuture;
use spyboard_shared::capture::{RequestTicket, StreamRequest};
use spyboard_shared::DeviceError;
use wasm_bindgen_futures::spawn_local;

/// Open the camera described by `request` in the background. `on_done`
/// receives the request's ticket so the caller can match the answer.
pub fn request_camera_effect(
    request: StreamRequest,
    preview_size: [u32; 2],
    on_done: impl FnOnce(RequestTicket, Result<WebCamera, DeviceError>) + 'static,
) {
    tracing::info!(
        facing = %request.preset.facing,
        width = request.preset.width,
        height = request.preset.height,
        "requesting camera"
    );
    spawn_local(async move {
        let result = WebCamera::open(request.preset, preview_size).await;
        on_done(request.ticket, result);
    });
}

/// Run `on_done` after `delay_ms`.
pub fn delayed_effect(delay_ms: u32, on_done: impl FnOnce() + 'static) {
    spawn_local(async move {
        TimeoutFuture::new(delay_ms).await;
        on_done();
    });
}
