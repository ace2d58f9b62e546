//! `ResizeObserver` host for the resize tracker.

use storyviz_core::resize::{ResizeCallback, ResizeHost};
use storyviz_core::Size;
use tracing::debug;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{Element, ResizeObserver, ResizeObserverEntry};

/// Observes DOM elements through the platform `ResizeObserver`.
#[derive(Debug, Default, Clone, Copy)]
pub struct DomResizeHost;

/// Live observer plus the closure it calls back into.
pub struct DomSubscription {
    observer: ResizeObserver,
    _callback: Closure<dyn FnMut(js_sys::Array)>,
}

impl std::fmt::Debug for DomSubscription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DomSubscription").finish_non_exhaustive()
    }
}

fn resize_observer_available() -> bool {
    js_sys::Reflect::has(&js_sys::global(), &JsValue::from_str("ResizeObserver")).unwrap_or(false)
}

impl ResizeHost for DomResizeHost {
    type Target = Element;
    type Subscription = DomSubscription;

    fn observe(&self, target: &Element, mut callback: ResizeCallback) -> Option<DomSubscription> {
        if !resize_observer_available() {
            debug!("ResizeObserver missing from global scope");
            return None;
        }

        let closure = Closure::<dyn FnMut(js_sys::Array)>::new(move |entries: js_sys::Array| {
            // Only the most recent entry for the element matters.
            let latest = entries
                .iter()
                .filter_map(|e| e.dyn_into::<ResizeObserverEntry>().ok())
                .last();
            if let Some(entry) = latest {
                let rect = entry.content_rect();
                callback(Size::new(rect.width() as f32, rect.height() as f32));
            }
        });

        let observer = match ResizeObserver::new(closure.as_ref().unchecked_ref()) {
            Ok(observer) => observer,
            Err(e) => {
                debug!(error = ?e, "ResizeObserver construction failed");
                return None;
            }
        };
        observer.observe(target);
        Some(DomSubscription {
            observer,
            _callback: closure,
        })
    }

    fn disconnect(&self, subscription: DomSubscription) {
        subscription.observer.disconnect();
    }
}
