//! Browser host for the ambient particle field.
//!
//! ```js
//! import init, { start_field } from "./particle_field_web.js";
//! await init();
//! const field = start_field("background-canvas");
//! // on unmount
//! field?.stop();
//! ```
//!
//! The returned handle owns the animation; keep it alive for as long as the
//! background should run.
#![cfg(target_arch = "wasm32")]

mod canvas;
mod host;
mod logger;

use std::cell::RefCell;
use std::rc::{Rc, Weak};

use log::{debug, warn, LevelFilter};
use particle_field::{Animator, FieldConfig, Surface};
use rand::rngs::ThreadRng;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{HtmlCanvasElement, Window};

pub use canvas::CanvasSurface;
pub use host::WindowFrameHost;

type WebAnimator = Animator<CanvasSurface, WindowFrameHost, ThreadRng>;
type Slot = Rc<RefCell<Option<WebAnimator>>>;

#[wasm_bindgen]
pub struct FieldHandle {
    slot: Slot,
}

#[wasm_bindgen]
impl FieldHandle {
    /// Stop the loop and release the canvas. Further calls do nothing.
    pub fn stop(&self) {
        let animator = self.slot.borrow_mut().take();
        // Dropping cancels the pending frame and removes the resize listener.
        drop(animator);
    }

    #[wasm_bindgen(getter)]
    pub fn running(&self) -> bool {
        self.slot.borrow().as_ref().is_some_and(Animator::is_running)
    }

    #[wasm_bindgen(getter)]
    pub fn frame(&self) -> f64 {
        self.slot
            .borrow()
            .as_ref()
            .map_or(0.0, |animator| animator.field().frame() as f64)
    }
}

/// Start the particle field on the canvas with id `canvas_id`, sized to the
/// viewport. `config_json` may carry a partial configuration; invalid JSON is
/// reported to the console and the defaults are used.
///
/// Returns `undefined` when there is no usable canvas.
#[wasm_bindgen]
pub fn start_field(canvas_id: &str, config_json: Option<String>) -> Option<FieldHandle> {
    console_error_panic_hook::set_once();
    logger::init(LevelFilter::Info);

    let config = config_json.as_deref().map_or_else(FieldConfig::default, |json| {
        FieldConfig::from_json(json).unwrap_or_else(|err| {
            warn!("invalid particle field config, using defaults: {err}");
            FieldConfig::default()
        })
    });

    let window = web_sys::window()?;
    let surface = match viewport_canvas(&window, canvas_id) {
        Ok(surface) => Some(surface),
        Err(err) => {
            debug!("particle field canvas unavailable: {err:?}");
            None
        }
    };

    let slot: Slot = Rc::new(RefCell::new(None));
    let host = match attach_host(&window, &slot) {
        Ok(host) => host,
        Err(err) => {
            warn!("could not attach particle field to window: {err:?}");
            return None;
        }
    };

    let animator = Animator::start(surface, host, config, rand::rng())?;
    *slot.borrow_mut() = Some(animator);
    Some(FieldHandle { slot })
}

fn viewport_size(window: &Window) -> (f64, f64) {
    let read = |value: Result<JsValue, JsValue>| value.ok().and_then(|v| v.as_f64()).unwrap_or(0.0);
    (read(window.inner_width()), read(window.inner_height()))
}

fn viewport_canvas(window: &Window, canvas_id: &str) -> Result<CanvasSurface, JsValue> {
    let canvas = window
        .document()
        .ok_or("no document on window")?
        .get_element_by_id(canvas_id)
        .ok_or_else(|| format!("no element with id '{canvas_id}'"))?
        .dyn_into::<HtmlCanvasElement>()
        .map_err(|_| format!("element '{canvas_id}' is not a canvas"))?;

    let mut surface = CanvasSurface::new(canvas)?;
    let (width, height) = viewport_size(window);
    surface.resize(width, height);
    Ok(surface)
}

fn attach_host(window: &Window, slot: &Slot) -> Result<WindowFrameHost, JsValue> {
    let on_frame = {
        let slot = Rc::downgrade(slot);
        Closure::wrap(Box::new(move || {
            with_animator(&slot, |animator| {
                animator.on_frame();
            });
        }) as Box<dyn FnMut()>)
    };

    let on_resize = {
        let slot = Rc::downgrade(slot);
        let window = window.clone();
        Closure::wrap(Box::new(move || {
            let (width, height) = viewport_size(&window);
            with_animator(&slot, |animator| animator.on_resize(width, height));
        }) as Box<dyn FnMut()>)
    };

    WindowFrameHost::attach(window.clone(), on_frame, on_resize)
}

fn with_animator(slot: &Weak<RefCell<Option<WebAnimator>>>, f: impl FnOnce(&mut WebAnimator)) {
    let Some(slot) = slot.upgrade() else {
        return;
    };
    let Ok(mut guard) = slot.try_borrow_mut() else {
        return;
    };
    if let Some(animator) = guard.as_mut() {
        f(animator);
    }
}
