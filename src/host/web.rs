//! WebHost: web-sys implementation of the capability boundary
//!
//! Owns everything that touches the real document: the injected style
//! sheet, the widget node and its listener closures, the single debounce
//! timeout, and the persist callback handed over by the content-script
//! glue.
//!
//! Closure lifetimes are the sharp edge here. A listener that removes its
//! own node (close), or a timer callback that re-arms the timer, is still
//! executing when its owner slot is vacated; such closures are parked
//! (`stale_listeners`, `expired_timer`) and only dropped from a later
//! event frame.

use std::cell::RefCell;
use std::rc::Weak;

use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{Document, Element, HtmlElement};

use super::OverlayHost;
use crate::log;
use crate::overlay::{OverlayGeometry, OverlayPosition, OverlayView, Placement, OVERLAY_TITLE, OVERLAY_CAPTION};
use crate::session::WatchSession;
use crate::settings::SettingsPatch;

const COMPONENT: &str = "WebHost";

/// Fixed element id of the widget; at most one such node ever exists.
pub const OVERLAY_ID: &str = "callout-overlay";
const STYLE_ID: &str = "callout-overlay-style";

const OVERLAY_CSS: &str = "\
#callout-overlay { position: fixed; bottom: 16px; right: 16px; z-index: 2147483647; font-family: Arial, sans-serif; color: #0f172a; background: #e2e8f0; border: 1px solid #cbd5e1; border-radius: 10px; box-shadow: 0 10px 30px rgba(15, 23, 42, 0.18); overflow: hidden; min-width: 260px; max-width: 360px; user-select: none; }
#callout-overlay.collapsed { width: auto; height: auto; min-width: 0; padding: 10px 12px; display: flex; gap: 8px; align-items: center; cursor: pointer; }
#callout-overlay .co-chip-label { font-weight: 700; font-size: 12px; }
#callout-overlay .co-chip-count { font-size: 12px; color: #334155; }
#callout-overlay .co-header { display: flex; align-items: center; justify-content: space-between; gap: 12px; padding: 12px 14px; background: linear-gradient(135deg, #0ea5e9, #6366f1); color: #f8fafc; cursor: move; }
#callout-overlay .co-title { font-weight: 700; font-size: 14px; letter-spacing: 0.2px; }
#callout-overlay .co-controls { display: flex; align-items: center; gap: 8px; }
#callout-overlay button { border: none; background: #f8fafc; color: #0f172a; cursor: pointer; border-radius: 8px; padding: 6px 10px; font-weight: 600; }
#callout-overlay .co-body { padding: 12px 14px 14px; overflow-y: auto; }
#callout-overlay .co-row { margin-top: 6px; }
#callout-overlay .co-pill { display: inline-block; background: #c7d2fe; color: #1e1b4b; padding: 4px 8px; border-radius: 999px; font-size: 12px; font-weight: 700; margin-right: 6px; }
#callout-overlay .co-quote { font-size: 12px; color: #334155; margin-top: 2px; }
#callout-overlay .co-subtext { font-size: 12px; color: #475569; margin-top: 8px; }
#callout-overlay .co-resize { position: absolute; width: 14px; height: 14px; bottom: 6px; right: 6px; cursor: se-resize; background: rgba(15, 23, 42, 0.12); border: 1px solid rgba(15, 23, 42, 0.2); border-radius: 4px; }
";

type SessionRef = Weak<RefCell<WatchSession<WebHost>>>;
type EventClosure = Closure<dyn FnMut(web_sys::Event)>;

struct PendingTimer {
    handle: i32,
    _closure: Closure<dyn FnMut()>,
}

struct MountedListeners {
    _closures: Vec<EventClosure>,
}

pub struct WebHost {
    session: SessionRef,
    persist_cb: js_sys::Function,
    listeners: Option<MountedListeners>,
    stale_listeners: Vec<MountedListeners>,
    pending_timer: Option<PendingTimer>,
    expired_timer: Option<PendingTimer>,
}

impl WebHost {
    pub fn new(persist_cb: js_sys::Function, session: SessionRef) -> Self {
        Self {
            session,
            persist_cb,
            listeners: None,
            stale_listeners: Vec::new(),
            pending_timer: None,
            expired_timer: None,
        }
    }

    fn inject_styles(&self, document: &Document) {
        if document.get_element_by_id(STYLE_ID).is_some() {
            return;
        }
        let Some(head) = document.head() else {
            return;
        };
        let Ok(style) = document.create_element("style") else {
            return;
        };
        style.set_id(STYLE_ID);
        style.set_text_content(Some(OVERLAY_CSS));
        if head.append_child(&style).is_err() {
            log::error(COMPONENT, "style injection failed");
        }
    }

    /// A click/press on one of the widget controls.
    fn control_closure(&self, action: fn(&mut WatchSession<WebHost>)) -> EventClosure {
        let session = self.session.clone();
        Closure::wrap(Box::new(move |event: web_sys::Event| {
            event.stop_propagation();
            if let Some(rc) = session.upgrade() {
                action(&mut rc.borrow_mut());
            }
        }) as Box<dyn FnMut(web_sys::Event)>)
    }

    /// Pointer-down on the header (drag) or the corner handle (resize).
    fn gesture_start_closure(
        &self,
        capture_target: HtmlElement,
        exclude_controls: bool,
        start: fn(&mut WatchSession<WebHost>, f64, f64),
    ) -> EventClosure {
        let session = self.session.clone();
        Closure::wrap(Box::new(move |event: web_sys::Event| {
            let Some(pointer) = event.dyn_ref::<web_sys::PointerEvent>() else {
                return;
            };
            if pointer.button() != 0 {
                return;
            }
            if exclude_controls {
                if let Some(target) = event.target().and_then(|t| t.dyn_into::<Element>().ok()) {
                    if target.closest("button").ok().flatten().is_some() {
                        return;
                    }
                }
            }
            event.prevent_default();
            let _ = capture_target.set_pointer_capture(pointer.pointer_id());
            if let Some(rc) = session.upgrade() {
                start(
                    &mut rc.borrow_mut(),
                    pointer.client_x() as f64,
                    pointer.client_y() as f64,
                );
            }
        }) as Box<dyn FnMut(web_sys::Event)>)
    }

    fn build_node(
        &self,
        document: &Document,
        view: &OverlayView,
        placement: &Placement,
    ) -> Result<(HtmlElement, Vec<EventClosure>), JsValue> {
        let container: HtmlElement = document.create_element("div")?.dyn_into()?;
        container.set_id(OVERLAY_ID);
        let style = container.style();
        style.set_property("position", "fixed")?;
        match placement.position {
            OverlayPosition::Free { left, top } => {
                style.set_property("left", &px(left))?;
                style.set_property("top", &px(top))?;
                let _ = style.remove_property("right");
                let _ = style.remove_property("bottom");
            }
            OverlayPosition::Docked { right, bottom } => {
                style.set_property("right", &px(right))?;
                style.set_property("bottom", &px(bottom))?;
                let _ = style.remove_property("left");
                let _ = style.remove_property("top");
            }
        }
        if let Some(size) = placement.size {
            style.set_property("width", &px(size.width))?;
            style.set_property("height", &px(size.height))?;
        }

        let mut closures = Vec::new();

        if view.collapsed {
            container.class_list().add_1("collapsed")?;
            let label = styled(document, "span", "co-chip-label")?;
            label.set_text_content(Some(OVERLAY_TITLE));
            let count = styled(document, "span", "co-chip-count")?;
            count.set_text_content(Some(&view.count_label));
            container.append_child(&label)?;
            container.append_child(&count)?;

            let expand = self.control_closure(WatchSession::expand_clicked);
            container.add_event_listener_with_callback("click", expand.as_ref().unchecked_ref())?;
            closures.push(expand);
            return Ok((container, closures));
        }

        let header = styled(document, "div", "co-header")?;
        let title = styled(document, "div", "co-title")?;
        title.set_text_content(Some(OVERLAY_TITLE));
        header.append_child(&title)?;

        let controls = styled(document, "div", "co-controls")?;
        let collapse: HtmlElement = document.create_element("button")?.dyn_into()?;
        collapse.set_text_content(Some("_"));
        collapse.set_title("Collapse this panel");
        let collapse_click = self.control_closure(WatchSession::collapse_clicked);
        collapse.add_event_listener_with_callback("click", collapse_click.as_ref().unchecked_ref())?;
        closures.push(collapse_click);

        let close: HtmlElement = document.create_element("button")?.dyn_into()?;
        close.set_text_content(Some("X"));
        close.set_title("Close until this page reloads");
        let close_click = self.control_closure(WatchSession::close_clicked);
        close.add_event_listener_with_callback("click", close_click.as_ref().unchecked_ref())?;
        closures.push(close_click);

        controls.append_child(&collapse)?;
        controls.append_child(&close)?;
        header.append_child(&controls)?;

        let body = styled(document, "div", "co-body")?;
        let lead = styled(document, "div", "")?;
        lead.set_text_content(Some(&view.lead));
        body.append_child(&lead)?;
        for tag in &view.tags {
            let row = styled(document, "div", "co-row")?;
            let pill = styled(document, "span", "co-pill")?;
            pill.set_text_content(Some(&tag.name));
            row.append_child(&pill)?;
            let quote = styled(document, "div", "co-quote")?;
            quote.set_text_content(Some(&format!("\u{201c}{}\u{201d} \u{00b7} {}", tag.excerpt, tag.age)));
            row.append_child(&quote)?;
            body.append_child(&row)?;
        }
        let caption = styled(document, "div", "co-subtext")?;
        caption.set_text_content(Some(OVERLAY_CAPTION));
        body.append_child(&caption)?;

        let resize = styled(document, "div", "co-resize")?;

        let drag_start =
            self.gesture_start_closure(container.clone(), true, WatchSession::drag_started);
        header.add_event_listener_with_callback("pointerdown", drag_start.as_ref().unchecked_ref())?;
        closures.push(drag_start);

        let resize_start =
            self.gesture_start_closure(container.clone(), false, WatchSession::resize_started);
        resize.add_event_listener_with_callback("pointerdown", resize_start.as_ref().unchecked_ref())?;
        closures.push(resize_start);

        let session = self.session.clone();
        let pointer_move = Closure::wrap(Box::new(move |event: web_sys::Event| {
            let Some(pointer) = event.dyn_ref::<web_sys::PointerEvent>() else {
                return;
            };
            let Some(rc) = session.upgrade() else {
                return;
            };
            let mut session = rc.borrow_mut();
            if session.gesture_active() {
                event.prevent_default();
                session.pointer_moved(pointer.client_x() as f64, pointer.client_y() as f64);
            }
        }) as Box<dyn FnMut(web_sys::Event)>);
        container
            .add_event_listener_with_callback("pointermove", pointer_move.as_ref().unchecked_ref())?;
        closures.push(pointer_move);

        let session = self.session.clone();
        let release_target = container.clone();
        let pointer_up = Closure::wrap(Box::new(move |event: web_sys::Event| {
            if let Some(pointer) = event.dyn_ref::<web_sys::PointerEvent>() {
                let _ = release_target.release_pointer_capture(pointer.pointer_id());
            }
            if let Some(rc) = session.upgrade() {
                rc.borrow_mut().pointer_released();
            }
        }) as Box<dyn FnMut(web_sys::Event)>);
        container.add_event_listener_with_callback("pointerup", pointer_up.as_ref().unchecked_ref())?;
        container
            .add_event_listener_with_callback("pointercancel", pointer_up.as_ref().unchecked_ref())?;
        closures.push(pointer_up);

        container.append_child(&header)?;
        container.append_child(&body)?;
        container.append_child(&resize)?;
        Ok((container, closures))
    }
}

impl OverlayHost for WebHost {
    fn hostname(&self) -> String {
        web_sys::window()
            .and_then(|w| w.location().hostname().ok())
            .unwrap_or_default()
    }

    fn body_text(&self) -> Option<String> {
        let document = document()?;
        let body = document.body()?;
        let mut out = String::new();
        let children = body.child_nodes();
        for index in 0..children.length() {
            let Some(node) = children.item(index) else {
                continue;
            };
            if let Some(element) = node.dyn_ref::<Element>() {
                // the widget's own text must never feed the scan
                if element.id() == OVERLAY_ID {
                    continue;
                }
            }
            if let Some(html) = node.dyn_ref::<HtmlElement>() {
                out.push_str(&html.inner_text());
            } else if let Some(text) = node.text_content() {
                out.push_str(&text);
            }
            out.push('\n');
        }
        Some(out)
    }

    fn overlay_present(&self) -> bool {
        overlay_element().is_some()
    }

    fn remove_overlay(&mut self) {
        if let Some(element) = overlay_element() {
            element.remove();
        }
        if let Some(listeners) = self.listeners.take() {
            self.stale_listeners.push(listeners);
        }
    }

    fn mount_overlay(&mut self, view: &OverlayView, placement: &Placement) {
        let Some(document) = document() else {
            return;
        };
        // earlier frames' retired listeners are safe to drop now
        self.stale_listeners.clear();
        self.inject_styles(&document);
        if let Some(existing) = document.get_element_by_id(OVERLAY_ID) {
            existing.remove();
        }
        if let Some(listeners) = self.listeners.take() {
            self.stale_listeners.push(listeners);
        }
        match self.build_node(&document, view, placement) {
            Ok((container, closures)) => {
                let Some(body) = document.body() else {
                    return;
                };
                if body.append_child(&container).is_err() {
                    log::error(COMPONENT, "mount failed: body rejected the widget node");
                    return;
                }
                self.listeners = Some(MountedListeners { _closures: closures });
            }
            Err(err) => log::error(COMPONENT, &format!("mount failed: {:?}", err)),
        }
    }

    fn capture_geometry(&self) -> Option<OverlayGeometry> {
        let element = overlay_element()?;
        let rect = element.get_bounding_client_rect();
        Some(OverlayGeometry {
            left: rect.left(),
            top: rect.top(),
            width: rect.width(),
            height: rect.height(),
        })
    }

    fn apply_position(&mut self, left: f64, top: f64) {
        if let Some(element) = overlay_element() {
            let style = element.style();
            let _ = style.set_property("left", &px(left));
            let _ = style.set_property("top", &px(top));
            let _ = style.remove_property("right");
            let _ = style.remove_property("bottom");
        }
    }

    fn apply_size(&mut self, width: f64, height: f64) {
        if let Some(element) = overlay_element() {
            let style = element.style();
            let _ = style.set_property("width", &px(width));
            let _ = style.set_property("height", &px(height));
        }
    }

    fn viewport(&self) -> (f64, f64) {
        let Some(window) = web_sys::window() else {
            return (f64::MAX, f64::MAX);
        };
        let width = window
            .inner_width()
            .ok()
            .and_then(|v| v.as_f64())
            .unwrap_or(f64::MAX);
        let height = window
            .inner_height()
            .ok()
            .and_then(|v| v.as_f64())
            .unwrap_or(f64::MAX);
        (width, height)
    }

    fn arm_timer(&mut self, token: u64, delay_ms: u32) {
        let Some(window) = web_sys::window() else {
            return;
        };
        if let Some(previous) = self.pending_timer.take() {
            window.clear_timeout_with_handle(previous.handle);
            // `previous` may be the closure currently executing; park it and
            // drop only the one parked in an earlier frame
            drop(self.expired_timer.take());
            self.expired_timer = Some(previous);
        }
        let session = self.session.clone();
        let closure = Closure::wrap(Box::new(move || {
            if let Some(rc) = session.upgrade() {
                rc.borrow_mut().timer_fired(token);
            }
        }) as Box<dyn FnMut()>);
        match window.set_timeout_with_callback_and_timeout_and_arguments_0(
            closure.as_ref().unchecked_ref(),
            delay_ms as i32,
        ) {
            Ok(handle) => {
                self.pending_timer = Some(PendingTimer {
                    handle,
                    _closure: closure,
                })
            }
            Err(err) => log::error(COMPONENT, &format!("failed to arm debounce timer: {:?}", err)),
        }
    }

    fn persist(&mut self, patch: &SettingsPatch) {
        match serde_wasm_bindgen::to_value(patch) {
            Ok(value) => {
                if let Err(err) = self.persist_cb.call1(&JsValue::NULL, &value) {
                    log::error(COMPONENT, &format!("persist callback failed: {:?}", err));
                }
            }
            Err(err) => log::error(COMPONENT, &format!("patch serialization failed: {}", err)),
        }
    }

    fn now_ms(&self) -> f64 {
        js_sys::Date::now()
    }
}

fn document() -> Option<Document> {
    web_sys::window().and_then(|w| w.document())
}

fn overlay_element() -> Option<HtmlElement> {
    document()?
        .get_element_by_id(OVERLAY_ID)
        .and_then(|e| e.dyn_into::<HtmlElement>().ok())
}

fn styled(document: &Document, tag: &str, class: &str) -> Result<HtmlElement, JsValue> {
    let element: HtmlElement = document.create_element(tag)?.dyn_into()?;
    if !class.is_empty() {
        element.set_class_name(class);
    }
    Ok(element)
}

fn px(value: f64) -> String {
    format!("{}px", value)
}
