//! Browser (WASM) front end for Spyboard.

pub mod audio;
pub mod camera;
pub mod effects;
pub mod game;
pub mod store;
pub mod thumbnail;
pub mod unload;

#[cfg(target_arch = "wasm32")]
use eframe::{AppCreator, WebOptions, WebRunner};
#[cfg(target_arch = "wasm32")]
use game::App;
#[cfg(target_arch = "wasm32")]
use spyboard_shared::GameConfig;
use wasm_bindgen::prelude::*;
#[cfg(target_arch = "wasm32")]
use wasm_bindgen_futures::spawn_local;

use web_sys::window;
#[cfg(target_arch = "wasm32")]
use web_sys::HtmlCanvasElement;

#[wasm_bindgen]
extern "C" {
    /// JavaScript console.log binding for debug output
    #[wasm_bindgen(js_namespace = console)]
    pub fn log(s: &str);
}

/// println! replacement that ends up in the browser console
#[macro_export]
macro_rules! sprintln {
	($($arg:tt)*) => {{
		$crate::log(format!($($arg)*).as_str());
	}};
}

#[cfg(target_arch = "wasm32")]
pub fn start_game(
    canvas: web_sys::HtmlCanvasElement,
    init: AppCreator<'static>,
) -> Result<(), JsValue> {
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();

    // forward tracing::info!/warn!/error! to the browser console
    tracing_wasm::set_as_global_default();

    let web_options = WebOptions::default();
    spawn_local(async move {
        if let Err(e) = WebRunner::new().start(canvas, web_options, init).await {
            crate::sprintln!("Failed to start eframe: {:?}", e);
        }
    });
    Ok(())
}

/// Initial UI scale from the screen diagonal and device pixel ratio.
pub fn calculate_dpi_scale() -> f32 {
    let Some(window) = window() else {
        return 1.0;
    };
    let device_pixel_ratio = window.device_pixel_ratio() as f32;
    let (width, height) = match window.screen() {
        Ok(screen) => (
            screen.width().unwrap_or(1920) as f32,
            screen.height().unwrap_or(1080) as f32,
        ),
        Err(_) => (1920.0, 1080.0),
    };
    let diagonal = (width * width + height * height).sqrt();
    let base_scale = if diagonal > 3000.0 {
        1.8
    } else if diagonal > 2000.0 {
        1.4
    } else if diagonal > 1500.0 {
        1.2
    } else {
        1.0
    };
    base_scale * (device_pixel_ratio / 2.0).clamp(0.75, 1.5)
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen]
pub fn start(canvas: HtmlCanvasElement) -> Result<(), JsValue> {
    let init = Box::new(|cc: &eframe::CreationContext| {
        let config = GameConfig::embedded();
        let app = App::new(&cc.egui_ctx, config);
        let game: Box<dyn eframe::App> = Box::new(app);
        Ok(game)
    });
    start_game(canvas, init)
}
