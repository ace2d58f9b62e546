//! Mountable coverage tree for the browser.

use super::resize::DomResizeHost;
use crate::scene::Scene;
use std::cell::RefCell;
use std::rc::{Rc, Weak};
use storyviz_core::{Event, Key, MouseButton, Point, ResizeTracker, Size, Widget};
use storyviz_widgets::coverage_tree::NodePath;
use storyviz_widgets::{CoverageTree, NodeToggled};
use tracing::debug;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{window, CssStyleDeclaration, HtmlElement, KeyboardEvent, MouseEvent};

/// Widget plus the element it renders into.
struct Mount {
    container: HtmlElement,
    tree: CoverageTree,
    on_toggle: Option<js_sys::Function>,
}

impl Mount {
    /// Replace the container's contents with a complete frame.
    fn render(&self) {
        self.container.set_inner_html(&self.tree.to_svg());
    }

    /// Client coordinates of the container's content box, the box the
    /// resize tracker measures and the frame is drawn into.
    fn content_origin(&self) -> Point {
        let rect = self.container.get_bounding_client_rect();
        let (pad_left, pad_top) = window()
            .and_then(|w| w.get_computed_style(&self.container).ok().flatten())
            .map_or((0.0, 0.0), |style| {
                (
                    computed_px(&style, "padding-left"),
                    computed_px(&style, "padding-top"),
                )
            });
        Point::new(
            (rect.left() + f64::from(self.container.client_left()) + pad_left) as f32,
            (rect.top() + f64::from(self.container.client_top()) + pad_top) as f32,
        )
    }

    fn local_point(&self, event: &MouseEvent) -> Point {
        let origin = self.content_origin();
        Point::new(
            event.client_x() as f32 - origin.x,
            event.client_y() as f32 - origin.y,
        )
    }

    fn dispatch(&mut self, event: &Event) {
        let message = self.tree.event(event);
        if let Some(toggled) = message.and_then(|m| m.downcast::<NodeToggled>().ok()) {
            self.notify(&toggled);
        }
        self.render();
    }

    fn notify(&self, toggled: &NodeToggled) {
        let Some(callback) = &self.on_toggle else {
            return;
        };
        let payload = serde_json::json!({
            "path": toggled.path.to_string(),
            "expanded": toggled.expanded,
        });
        if let Err(e) = callback.call1(&JsValue::NULL, &JsValue::from_str(&payload.to_string())) {
            debug!(error = ?e, "toggle callback threw");
        }
    }
}

type MouseListener = Closure<dyn FnMut(MouseEvent)>;
type KeyListener = Closure<dyn FnMut(KeyboardEvent)>;

/// A coverage tree mounted in a container element.
///
/// The container's size is followed through a [`ResizeTracker`]; clicks,
/// pointer movement, and keys on the container drive the widget. Dropping
/// the app (or calling `free` from JavaScript) stops observing and removes
/// every listener.
#[wasm_bindgen]
pub struct CoverageTreeApp {
    mount: Rc<RefCell<Mount>>,
    tracker: ResizeTracker<DomResizeHost>,
    mouse_listeners: Vec<(&'static str, MouseListener)>,
    key_listener: Option<KeyListener>,
}

#[wasm_bindgen]
impl CoverageTreeApp {
    /// Mount a scene from manifest YAML and dataset JSON into the element
    /// with id `container_id`.
    #[wasm_bindgen(constructor)]
    pub fn new(
        container_id: &str,
        manifest_yaml: &str,
        dataset_json: &str,
    ) -> Result<CoverageTreeApp, JsValue> {
        let scene = Scene::from_sources(manifest_yaml, dataset_json)
            .map_err(|e| JsValue::from_str(&e.to_string()))?;
        Self::mount(container_id, &scene)
    }

    /// Mount a bare dataset with default styling.
    pub fn from_dataset(container_id: &str, dataset_json: &str) -> Result<CoverageTreeApp, JsValue> {
        let scene =
            Scene::from_tree_json(dataset_json).map_err(|e| JsValue::from_str(&e.to_string()))?;
        Self::mount(container_id, &scene)
    }

    /// Register a callback receiving `{"path": "0/1", "expanded": true}`
    /// JSON after each toggle.
    pub fn on_toggle(&mut self, callback: js_sys::Function) {
        self.mount.borrow_mut().on_toggle = Some(callback);
    }

    /// Toggle a node by path (`0/2/1`). Returns whether anything changed.
    pub fn toggle_path(&mut self, path: &str) -> bool {
        let Ok(path) = path.parse::<NodePath>() else {
            return false;
        };
        let mut mount = self.mount.borrow_mut();
        let changed = mount.tree.toggle_path(&path).changed();
        if changed {
            mount.render();
        }
        changed
    }

    /// Expand every node.
    pub fn expand_all(&mut self) {
        let mut mount = self.mount.borrow_mut();
        mount.tree.expand_all();
        mount.render();
    }

    /// Collapse everything below the root.
    pub fn collapse_all(&mut self) {
        let mut mount = self.mount.borrow_mut();
        mount.tree.collapse_all();
        mount.render();
    }

    /// Number of nodes currently shown.
    pub fn visible_count(&self) -> usize {
        self.mount.borrow().tree.visible().len()
    }

    /// Last observed container width.
    pub fn width(&self) -> f32 {
        self.tracker.size().width
    }

    /// Last observed container height.
    pub fn height(&self) -> f32 {
        self.tracker.size().height
    }

    /// Current frame as an SVG document.
    pub fn svg(&self) -> String {
        self.mount.borrow().tree.to_svg()
    }
}

impl CoverageTreeApp {
    fn mount(container_id: &str, scene: &Scene) -> Result<Self, JsValue> {
        console_error_panic_hook::set_once();

        let document = window()
            .ok_or("No window")?
            .document()
            .ok_or("No document")?;
        let container = document
            .get_element_by_id(container_id)
            .ok_or_else(|| format!("Container '{container_id}' not found"))?
            .dyn_into::<HtmlElement>()
            .map_err(|_| "Container is not an HTML element")?;
        container.set_tab_index(0);
        container.set_attribute("role", "tree")?;
        container.set_attribute("aria-label", scene.title())?;

        let mount = Rc::new(RefCell::new(Mount {
            container: container.clone(),
            tree: scene.widget(),
            on_toggle: None,
        }));

        let mut tracker = ResizeTracker::new(DomResizeHost);
        let weak = Rc::downgrade(&mount);
        tracker.subscribe(move |size: Size| {
            with_mount(&weak, |m| {
                m.tree.set_container_size(size);
                m.render();
            });
        });
        tracker.attach(&container);

        let mut app = Self {
            mount,
            tracker,
            mouse_listeners: Vec::new(),
            key_listener: None,
        };
        app.listen_mouse("click", |m, e| {
            if e.button() == 0 {
                let position = m.local_point(e);
                m.dispatch(&Event::MouseUp {
                    position,
                    button: MouseButton::Left,
                });
            }
        })?;
        app.listen_mouse("mousemove", |m, e| {
            let before = m.tree.hovered();
            let position = m.local_point(e);
            m.tree.event(&Event::MouseMove { position });
            if m.tree.hovered() != before {
                m.render();
            }
        })?;
        app.listen_mouse("mouseleave", |m, _| m.dispatch(&Event::MouseLeave))?;
        app.listen_keys()?;

        debug!(container = container_id, "coverage tree mounted");
        Ok(app)
    }

    fn listen_mouse(
        &mut self,
        kind: &'static str,
        handler: impl Fn(&mut Mount, &MouseEvent) + 'static,
    ) -> Result<(), JsValue> {
        let weak = Rc::downgrade(&self.mount);
        let listener: MouseListener = Closure::new(move |e: MouseEvent| {
            with_mount(&weak, |m| handler(m, &e));
        });
        self.mount
            .borrow()
            .container
            .add_event_listener_with_callback(kind, listener.as_ref().unchecked_ref())?;
        self.mouse_listeners.push((kind, listener));
        Ok(())
    }

    fn listen_keys(&mut self) -> Result<(), JsValue> {
        let weak = Rc::downgrade(&self.mount);
        let listener: KeyListener = Closure::new(move |e: KeyboardEvent| {
            let key = Key::from_code(&e.code());
            if matches!(key, Key::Up | Key::Down | Key::Space | Key::Enter) {
                e.prevent_default();
            }
            with_mount(&weak, |m| m.dispatch(&Event::KeyDown { key }));
        });
        self.mount
            .borrow()
            .container
            .add_event_listener_with_callback("keydown", listener.as_ref().unchecked_ref())?;
        self.key_listener = Some(listener);
        Ok(())
    }
}

/// Resolved length in pixels; anything unparseable counts as zero.
fn parse_px(value: &str) -> f64 {
    value
        .trim()
        .trim_end_matches("px")
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .unwrap_or(0.0)
}

fn computed_px(style: &CssStyleDeclaration, property: &str) -> f64 {
    style
        .get_property_value(property)
        .map_or(0.0, |value| parse_px(&value))
}

/// Run `f` on the mount if it is alive and not already borrowed.
fn with_mount(weak: &Weak<RefCell<Mount>>, f: impl FnOnce(&mut Mount)) {
    let Some(mount) = weak.upgrade() else {
        return;
    };
    if let Ok(mut mount) = mount.try_borrow_mut() {
        f(&mut mount);
    }
}

impl Drop for CoverageTreeApp {
    fn drop(&mut self) {
        self.tracker.detach();
        let mount = self.mount.borrow();
        for (kind, listener) in self.mouse_listeners.drain(..) {
            let _ = mount
                .container
                .remove_event_listener_with_callback(kind, listener.as_ref().unchecked_ref());
        }
        if let Some(listener) = self.key_listener.take() {
            let _ = mount
                .container
                .remove_event_listener_with_callback("keydown", listener.as_ref().unchecked_ref());
        }
        debug!("coverage tree unmounted");
    }
}
