use log::warn;
use particle_field::FrameHost;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::{JsCast, JsValue};
use web_sys::Window;

/// Schedules frames with `requestAnimationFrame` and owns the window
/// `resize` listener for as long as the field runs.
pub struct WindowFrameHost {
    window: Window,
    on_frame: Closure<dyn FnMut()>,
    on_resize: Closure<dyn FnMut()>,
    listening: bool,
}

impl WindowFrameHost {
    pub fn attach(
        window: Window,
        on_frame: Closure<dyn FnMut()>,
        on_resize: Closure<dyn FnMut()>,
    ) -> Result<Self, JsValue> {
        window.add_event_listener_with_callback("resize", on_resize.as_ref().unchecked_ref())?;
        Ok(Self {
            window,
            on_frame,
            on_resize,
            listening: true,
        })
    }
}

impl FrameHost for WindowFrameHost {
    type Handle = i32;

    fn request_frame(&mut self) -> Option<i32> {
        match self
            .window
            .request_animation_frame(self.on_frame.as_ref().unchecked_ref())
        {
            Ok(id) => Some(id),
            Err(err) => {
                warn!("requestAnimationFrame failed: {err:?}");
                None
            }
        }
    }

    fn cancel_frame(&mut self, handle: i32) {
        if let Err(err) = self.window.cancel_animation_frame(handle) {
            warn!("cancelAnimationFrame({handle}) failed: {err:?}");
        }
    }

    fn detach(&mut self) {
        if !self.listening {
            return;
        }
        self.listening = false;
        if let Err(err) = self
            .window
            .remove_event_listener_with_callback("resize", self.on_resize.as_ref().unchecked_ref())
        {
            warn!("failed to remove resize listener: {err:?}");
        }
    }
}

impl Drop for WindowFrameHost {
    fn drop(&mut self) {
        self.detach();
    }
}
