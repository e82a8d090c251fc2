//! Browser bindings: DOM overlay surface, `html2canvas` rasterizer, and
//! window listeners that feed the capture controller.

use std::cell::RefCell;
use std::rc::Rc;

use async_trait::async_trait;
use image::RgbaImage;
use js_sys::{Object, Promise, Reflect};
use tracing::{debug, warn};
use wasm_bindgen::closure::Closure;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::{JsFuture, spawn_local};
use web_sys::{CanvasRenderingContext2d, Document, HtmlCanvasElement, HtmlElement, KeyboardEvent, MouseEvent, Window};

use crate::bitmap::{CapturedImage, ensure_capturable};
use crate::consts::{OVERLAY_ELEMENT_ID, OVERLAY_PROCESSING_CLASS};
use crate::controller::{CaptureController, CaptureSurface};
use crate::geometry::{PixelRect, Point, Rect, ScrollOffset};
use crate::input::{Button, Cursor};
use crate::raster::{RasterError, RasterOptions, RegionRasterizer};

#[wasm_bindgen]
extern "C" {
    #[wasm_bindgen(catch, js_name = html2canvas)]
    fn html2canvas(element: &HtmlElement, options: &JsValue) -> Result<Promise, JsValue>;
}

fn describe(value: &JsValue) -> String {
    value.as_string().unwrap_or_else(|| format!("{value:?}"))
}

// =============================================================================
// SURFACE
// =============================================================================

/// Draws the selection overlay as a fixed-position `div` and drives the body cursor.
pub struct DomSurface {
    document: Document,
    overlay: Option<HtmlElement>,
}

impl DomSurface {
    #[must_use]
    pub fn new(document: Document) -> Self {
        Self { document, overlay: None }
    }

    fn place(overlay: &HtmlElement, rect: Rect) {
        let style = overlay.style();
        for (prop, value) in [
            ("left", rect.left),
            ("top", rect.top),
            ("width", rect.width),
            ("height", rect.height),
        ] {
            if let Err(e) = style.set_property(prop, &format!("{value}px")) {
                debug!(prop, error = %describe(&e), "overlay style rejected");
            }
        }
    }

    fn create_overlay(&self) -> Result<HtmlElement, JsValue> {
        let overlay: HtmlElement = self.document.create_element("div")?.dyn_into()?;
        overlay.set_id(OVERLAY_ELEMENT_ID);
        overlay.style().set_property("position", "fixed")?;
        let body = self.document.body().ok_or_else(|| JsValue::from_str("document has no body"))?;
        body.append_child(&overlay)?;
        Ok(overlay)
    }
}

impl CaptureSurface for DomSurface {
    fn set_cursor(&mut self, cursor: Cursor) {
        let Some(body) = self.document.body() else {
            return;
        };
        if let Err(e) = body.style().set_property("cursor", cursor.css()) {
            debug!(error = %describe(&e), "cursor style rejected");
        }
    }

    fn show_overlay(&mut self, rect: Rect) {
        self.remove_overlay();
        match self.create_overlay() {
            Ok(overlay) => {
                Self::place(&overlay, rect);
                self.overlay = Some(overlay);
            }
            Err(e) => warn!(error = %describe(&e), "failed to create selection overlay"),
        }
    }

    fn resize_overlay(&mut self, rect: Rect) {
        if let Some(overlay) = &self.overlay {
            Self::place(overlay, rect);
        }
    }

    fn mark_overlay_processing(&mut self) {
        let Some(overlay) = &self.overlay else {
            return;
        };
        if let Err(e) = overlay.class_list().add_1(OVERLAY_PROCESSING_CLASS) {
            debug!(error = %describe(&e), "failed to mark overlay processing");
        }
    }

    fn remove_overlay(&mut self) {
        if let Some(overlay) = self.overlay.take() {
            overlay.remove();
        }
        // Also sweep an overlay left behind by a previous page script.
        if let Some(stray) = self.document.get_element_by_id(OVERLAY_ELEMENT_ID) {
            stray.remove();
        }
    }
}

// =============================================================================
// RASTERIZER
// =============================================================================

/// Renders the page body with the global `html2canvas` library.
pub struct Html2CanvasRasterizer {
    document: Document,
}

impl Html2CanvasRasterizer {
    #[must_use]
    pub fn new(document: Document) -> Self {
        Self { document }
    }

    fn options(region: Rect, options: &RasterOptions) -> Result<JsValue, JsValue> {
        let obj = Object::new();
        Reflect::set(&obj, &"x".into(), &region.left.into())?;
        Reflect::set(&obj, &"y".into(), &region.top.into())?;
        Reflect::set(&obj, &"width".into(), &region.width.into())?;
        Reflect::set(&obj, &"height".into(), &region.height.into())?;
        Reflect::set(&obj, &"scale".into(), &options.scale.into())?;
        let background = options.background.as_deref().map_or(JsValue::NULL, JsValue::from_str);
        Reflect::set(&obj, &"backgroundColor".into(), &background)?;
        Ok(obj.into())
    }

    async fn render(&self, region: Rect, options: &RasterOptions) -> Result<RgbaImage, JsValue> {
        let body = self.document.body().ok_or_else(|| JsValue::from_str("document has no body"))?;
        let promise = html2canvas(&body, &Self::options(region, options)?)?;
        let canvas: HtmlCanvasElement = JsFuture::from(promise).await?.dyn_into()?;
        let context: CanvasRenderingContext2d = canvas
            .get_context("2d")?
            .ok_or_else(|| JsValue::from_str("canvas has no 2d context"))?
            .dyn_into()?;
        let (width, height) = (canvas.width(), canvas.height());
        let data = context.get_image_data(0.0, 0.0, f64::from(width), f64::from(height))?;
        RgbaImage::from_raw(width, height, data.data().0)
            .ok_or_else(|| JsValue::from_str("canvas pixel buffer has unexpected length"))
    }
}

#[async_trait(?Send)]
impl RegionRasterizer for Html2CanvasRasterizer {
    async fn rasterize(&self, region: Rect, options: &RasterOptions) -> Result<CapturedImage, RasterError> {
        let target = PixelRect::from_rect(region, options.scale);
        if target.is_empty() {
            return Err(RasterError::EmptyRegion);
        }
        ensure_capturable(target)?;
        let pixels = self
            .render(region, options)
            .await
            .map_err(|e| RasterError::Backend(describe(&e)))?;
        CapturedImage::new(pixels)
    }
}

// =============================================================================
// LISTENERS
// =============================================================================

type Shared<S> = Rc<RefCell<CaptureController<S>>>;

fn event_point(event: &MouseEvent) -> Point {
    Point::new(f64::from(event.client_x()), f64::from(event.client_y()))
}

/// Keep a capture gesture from selecting text or reaching page handlers.
fn consume(event: &MouseEvent) {
    event.prevent_default();
    event.stop_propagation();
}

fn scroll_offset(window: &Window) -> ScrollOffset {
    ScrollOffset::new(window.scroll_x().unwrap_or(0.0), window.scroll_y().unwrap_or(0.0))
}

/// Window listeners feeding a capture controller; removed when dropped.
pub struct CaptureListeners {
    window: Window,
    mouse: Vec<(&'static str, Closure<dyn FnMut(MouseEvent)>)>,
    keydown: Closure<dyn FnMut(KeyboardEvent)>,
}

impl Drop for CaptureListeners {
    fn drop(&mut self) {
        for (name, cb) in &self.mouse {
            if let Err(e) = self.window.remove_event_listener_with_callback(name, cb.as_ref().unchecked_ref()) {
                debug!(event = name, error = %describe(&e), "failed to detach listener");
            }
        }
        if let Err(e) = self
            .window
            .remove_event_listener_with_callback("keydown", self.keydown.as_ref().unchecked_ref())
        {
            debug!(error = %describe(&e), "failed to detach keydown listener");
        }
    }
}

/// Attach mouse and Escape-key listeners to `window`.
///
/// Listeners stay attached for the lifetime of the returned guard; events
/// outside an active capture are ignored by the controller. Presses and
/// releases the capture consumes have their default action and propagation
/// suppressed, so the drag neither selects text nor reaches page handlers.
/// On release the job is rasterized on the local executor without holding
/// the controller.
///
/// # Errors
///
/// Returns the browser's error if a listener cannot be registered.
pub fn attach_listeners<S, R>(window: &Window, controller: Shared<S>, rasterizer: Rc<R>) -> Result<CaptureListeners, JsValue>
where
    S: CaptureSurface + 'static,
    R: RegionRasterizer + 'static,
{
    let down = {
        let controller = Rc::clone(&controller);
        Closure::<dyn FnMut(MouseEvent)>::new(move |event: MouseEvent| {
            let Some(button) = Button::from_dom(event.button()) else {
                return;
            };
            if controller.borrow_mut().pointer_down(event_point(&event), button) {
                consume(&event);
            }
        })
    };
    let moved = {
        let controller = Rc::clone(&controller);
        Closure::<dyn FnMut(MouseEvent)>::new(move |event: MouseEvent| {
            controller.borrow_mut().pointer_move(event_point(&event));
        })
    };
    let up = {
        let controller = Rc::clone(&controller);
        let window = window.clone();
        Closure::<dyn FnMut(MouseEvent)>::new(move |event: MouseEvent| {
            let Some(button) = Button::from_dom(event.button()) else {
                return;
            };
            let job = controller
                .borrow_mut()
                .pointer_up(event_point(&event), button, scroll_offset(&window));
            let Some(job) = job else {
                return;
            };
            consume(&event);
            let controller = Rc::clone(&controller);
            let rasterizer = Rc::clone(&rasterizer);
            spawn_local(async move {
                let result = job.rasterize(rasterizer.as_ref()).await;
                controller.borrow_mut().complete(&job, result);
            });
        })
    };
    let keydown = {
        let controller = Rc::clone(&controller);
        Closure::<dyn FnMut(KeyboardEvent)>::new(move |event: KeyboardEvent| {
            if event.key() == "Escape" {
                controller.borrow_mut().cancel();
            }
        })
    };

    let mouse = vec![("mousedown", down), ("mousemove", moved), ("mouseup", up)];
    for (name, cb) in &mouse {
        window.add_event_listener_with_callback(name, cb.as_ref().unchecked_ref())?;
    }
    window.add_event_listener_with_callback("keydown", keydown.as_ref().unchecked_ref())?;
    Ok(CaptureListeners { window: window.clone(), mouse, keydown })
}
