#![forbid(unsafe_code)]

//! `wasm-bindgen` exports for the browser host.
//!
//! Only compiled on `wasm32` targets. All engine access goes through one
//! `Rc<RefCell<Host>>`; listeners run to completion one at a time on the UI
//! thread, so a failed borrow means re-entrancy and the event is dropped.

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use dropzone_core::geometry::{Point, Rect};
use dropzone_core::scene::{ElementId, ZoneLayout, ZoneRole};
use dropzone_core::{DragDispatch, DragEngine, EngineConfig};
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{Document, DragEvent, Element, Event, EventTarget, HtmlElement, TouchEvent};

use crate::dispatch_log::DispatchLog;
use crate::dom_ops::{
    DRAGGABLE_CLASS, DomOp, ELEMENT_ID_ATTR, ZONE_CLASS, effects_to_ops, parse_element_id,
    zone_dom_id,
};

fn install_panic_hook() {
    use std::sync::Once;

    static ONCE: Once = Once::new();
    ONCE.call_once(|| {
        std::panic::set_hook(Box::new(|info| {
            let msg = if let Some(loc) = info.location() {
                format!(
                    "panic at {}:{}:{}: {info}",
                    loc.file(),
                    loc.line(),
                    loc.column()
                )
            } else {
                format!("panic: {info}")
            };
            web_sys::console::error_1(&JsValue::from_str(&msg));
        }));
    });
}

fn js_error(msg: impl core::fmt::Display) -> JsValue {
    JsValue::from_str(&msg.to_string())
}

fn rect_of(element: &Element) -> Rect {
    let rect = element.get_bounding_client_rect();
    Rect::new(rect.x(), rect.y(), rect.width(), rect.height())
}

/// Containers are ordered Source, Grid, Free.
fn layout_of(zones: &[HtmlElement; 3]) -> ZoneLayout {
    ZoneLayout {
        source: rect_of(&zones[0]),
        grid: rect_of(&zones[1]),
        free: rect_of(&zones[2]),
    }
}

struct Host {
    engine: DragEngine,
    zones: [HtmlElement; 3],
    document: Document,
    nodes: HashMap<ElementId, HtmlElement>,
    logs: DispatchLog,
}

impl Host {
    fn zone(&self, role: ZoneRole) -> &HtmlElement {
        match role {
            ZoneRole::Source => &self.zones[0],
            ZoneRole::Grid => &self.zones[1],
            ZoneRole::Free => &self.zones[2],
        }
    }

    /// Zone rectangles move with scroll and resize; read them fresh.
    fn refresh_zones(&mut self) {
        let layout = layout_of(&self.zones);
        self.engine.scene_mut().set_layout(layout);
    }

    /// Draggable element under an event target, with its current rectangle.
    fn draggable_target(&self, target: Option<EventTarget>) -> Option<(ElementId, Rect)> {
        let element = target?.dyn_into::<Element>().ok()?;
        if !element.class_list().contains(DRAGGABLE_CLASS) {
            return None;
        }
        let id = parse_element_id(&element.get_attribute(ELEMENT_ID_ATTR)?)?;
        Some((id, rect_of(&element)))
    }

    fn record(&mut self, dispatch: &DragDispatch) {
        self.logs.push(dispatch.log_line());
    }

    /// Mirror pending scene effects into the document.
    fn flush(&mut self) {
        let effects = self.engine.drain_effects();
        for op in effects_to_ops(&effects) {
            if let Err(err) = self.apply(&op) {
                web_sys::console::warn_2(&JsValue::from_str("dropzone: DOM op failed"), &err);
            }
        }
    }

    fn apply(&mut self, op: &DomOp) -> Result<(), JsValue> {
        match op {
            DomOp::Create { id, background } => {
                let node: HtmlElement = self.document.create_element("div")?.dyn_into()?;
                node.set_class_name(DRAGGABLE_CLASS);
                node.set_draggable(true);
                node.set_attribute(ELEMENT_ID_ATTR, &id.get().to_string())?;
                node.style().set_property("background-color", background)?;
                self.nodes.insert(*id, node);
            }
            DomOp::Append { id, zone } => {
                let Some(node) = self.nodes.get(id) else {
                    return Ok(());
                };
                self.zone(*zone).append_child(node)?;
            }
            DomOp::Remove { id } => {
                if let Some(node) = self.nodes.remove(id) {
                    node.remove();
                }
            }
            DomOp::SetStyle {
                id,
                property,
                value,
            } => {
                if let Some(node) = self.nodes.get(id) {
                    node.style().set_property(property, value)?;
                }
            }
            DomOp::RemoveStyle { id, property } => {
                if let Some(node) = self.nodes.get(id) {
                    node.style().remove_property(property)?;
                }
            }
        }
        Ok(())
    }

    fn on_drag_start(&mut self, event: &DragEvent) {
        let target = self.draggable_target(event.target());
        let position = Point::new(f64::from(event.client_x()), f64::from(event.client_y()));
        let (id, rect) = target.map_or((None, Rect::default()), |(id, rect)| (Some(id), rect));
        let dispatch = self.engine.drag_start(id, position, rect);
        self.finish(&dispatch);
    }

    fn on_drop(&mut self, event: &DragEvent) {
        event.prevent_default();
        self.refresh_zones();
        let position = Point::new(f64::from(event.client_x()), f64::from(event.client_y()));
        let dispatch = self.engine.drop(position);
        self.finish(&dispatch);
    }

    fn on_drag_end(&mut self) {
        let dispatch = self.engine.drag_end();
        self.finish(&dispatch);
    }

    fn on_touch_start(&mut self, event: &TouchEvent) {
        let Some(touch) = event.touches().get(0) else {
            return;
        };
        let target = self.draggable_target(event.target());
        let position = Point::new(f64::from(touch.client_x()), f64::from(touch.client_y()));
        let (id, rect) = target.map_or((None, Rect::default()), |(id, rect)| (Some(id), rect));
        let dispatch = self.engine.touch_start(id, position, rect);
        self.finish(&dispatch);
    }

    fn on_touch_move(&mut self, event: &TouchEvent) {
        let Some(touch) = event.touches().get(0) else {
            return;
        };
        let position = Point::new(f64::from(touch.client_x()), f64::from(touch.client_y()));
        let dispatch = self.engine.touch_move(position);
        self.finish(&dispatch);
    }

    fn on_touch_end(&mut self, event: &TouchEvent) {
        self.refresh_zones();
        let dispatch = match event.changed_touches().get(0) {
            Some(touch) => self.engine.touch_end(Point::new(
                f64::from(touch.client_x()),
                f64::from(touch.client_y()),
            )),
            None => self.engine.cancel(),
        };
        self.finish(&dispatch);
    }

    fn on_cancel(&mut self) {
        let dispatch = self.engine.cancel();
        self.finish(&dispatch);
    }

    fn finish(&mut self, dispatch: &DragDispatch) {
        if dispatch.accepted() {
            self.record(dispatch);
        }
        self.flush();
    }
}

struct Listener {
    target: EventTarget,
    kind: &'static str,
    closure: Closure<dyn FnMut(Event)>,
}

impl Drop for Listener {
    fn drop(&mut self) {
        let _ = self
            .target
            .remove_event_listener_with_callback(self.kind, self.closure.as_ref().unchecked_ref());
    }
}

fn listen(
    target: &EventTarget,
    kind: &'static str,
    host: &Rc<RefCell<Host>>,
    handler: fn(&mut Host, Event),
) -> Result<Listener, JsValue> {
    let host = Rc::clone(host);
    let closure = Closure::<dyn FnMut(Event)>::new(move |event: Event| {
        let Ok(mut host) = host.try_borrow_mut() else {
            return;
        };
        handler(&mut host, event);
    });
    target.add_event_listener_with_callback(kind, closure.as_ref().unchecked_ref())?;
    Ok(Listener {
        target: target.clone(),
        kind,
        closure,
    })
}

/// Browser drag-and-drop surface bound to the document's three zones.
///
/// Dropping the value from JS (`app.free()`) removes every listener.
#[wasm_bindgen]
pub struct DropzoneApp {
    host: Rc<RefCell<Host>>,
    _listeners: Vec<Listener>,
}

#[wasm_bindgen]
impl DropzoneApp {
    /// Bind to `#source-zone`, `#grid-zone`, and `#free-zone` and fill Source.
    ///
    /// `seed` fixes the color sequence; omitted, one is drawn from `Math.random()`.
    #[wasm_bindgen(constructor)]
    pub fn new(seed: Option<f64>) -> Result<DropzoneApp, JsValue> {
        install_panic_hook();
        let window = web_sys::window().ok_or_else(|| js_error("no window"))?;
        let document = window.document().ok_or_else(|| js_error("no document"))?;
        let body: EventTarget = document
            .body()
            .ok_or_else(|| js_error("document has no body"))?
            .into();

        let zone = |role: ZoneRole| -> Result<HtmlElement, JsValue> {
            let id = zone_dom_id(role);
            let element = document
                .get_element_by_id(id)
                .ok_or_else(|| js_error(format!("missing zone container #{id}")))?
                .dyn_into::<HtmlElement>()
                .map_err(|_| js_error(format!("#{id} is not an HTML element")))?;
            element.class_list().add_1(ZONE_CLASS)?;
            Ok(element)
        };
        let zones = [
            zone(ZoneRole::Source)?,
            zone(ZoneRole::Grid)?,
            zone(ZoneRole::Free)?,
        ];
        let layout = layout_of(&zones);

        let seed = seed.unwrap_or_else(|| js_sys::Math::random() * u32::MAX as f64) as u64;
        let config = EngineConfig::default().with_seed(seed);
        let engine = DragEngine::new(config, layout).map_err(js_error)?;

        let host = Rc::new(RefCell::new(Host {
            engine,
            zones,
            document: document.clone(),
            nodes: HashMap::new(),
            logs: DispatchLog::default(),
        }));
        host.borrow_mut().flush();

        let document: EventTarget = document.into();
        let listeners = vec![
            listen(&document, "dragover", &host, |_, event| {
                event.prevent_default();
            })?,
            listen(&document, "drop", &host, |host, event| {
                if let Ok(event) = event.dyn_into::<DragEvent>() {
                    host.on_drop(&event);
                }
            })?,
            listen(&body, "dragstart", &host, |host, event| {
                if let Ok(event) = event.dyn_into::<DragEvent>() {
                    host.on_drag_start(&event);
                }
            })?,
            listen(&body, "dragend", &host, |host, _| host.on_drag_end())?,
            listen(&body, "touchstart", &host, |host, event| {
                if let Ok(event) = event.dyn_into::<TouchEvent>() {
                    host.on_touch_start(&event);
                }
            })?,
            listen(&body, "touchmove", &host, |host, event| {
                if let Ok(event) = event.dyn_into::<TouchEvent>() {
                    host.on_touch_move(&event);
                }
            })?,
            listen(&body, "touchend", &host, |host, event| {
                if let Ok(event) = event.dyn_into::<TouchEvent>() {
                    host.on_touch_end(&event);
                }
            })?,
            listen(&body, "touchcancel", &host, |host, _| host.on_cancel())?,
        ];

        Ok(Self {
            host,
            _listeners: listeners,
        })
    }

    /// Number of elements currently in Source.
    #[wasm_bindgen(js_name = sourceCount)]
    pub fn source_count(&self) -> usize {
        self.host.borrow().engine.scene().len(ZoneRole::Source)
    }

    /// Whether a drag session is active.
    #[wasm_bindgen(js_name = isDragging)]
    pub fn is_dragging(&self) -> bool {
        self.host.borrow().engine.is_dragging()
    }

    /// Abort any active drag (e.g. on window blur).
    pub fn cancel(&self) {
        if let Ok(mut host) = self.host.try_borrow_mut() {
            host.on_cancel();
        }
    }

    /// Drain accepted-dispatch log lines. Only the most recent lines are
    /// kept between calls.
    #[wasm_bindgen(js_name = takeLogs)]
    pub fn take_logs(&self) -> js_sys::Array {
        let logs = self.host.borrow_mut().logs.drain();
        logs.into_iter().map(|line| JsValue::from_str(&line)).collect()
    }
}
