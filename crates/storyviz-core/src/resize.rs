//! Container size observation.
//!
//! A [`ResizeTracker`] republishes the content-box size of one host element.
//! The platform side is abstracted behind [`ResizeHost`]: the browser runtime
//! wraps `ResizeObserver`, tests and the CLI drive a [`ManualResizeHost`].
//!
//! The tracked size starts at zero and only ever changes from a host
//! notification. When the host has no observation primitive the tracker
//! stays at its last known size and reports nothing.

use crate::geometry::Size;
use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::{Rc, Weak};
use tracing::{debug, trace};

/// Callback invoked by a host with the observed content-box size.
pub type ResizeCallback = Box<dyn FnMut(Size)>;

/// Platform primitive that reports element size changes.
pub trait ResizeHost {
    /// Element handle the host can observe.
    type Target: ?Sized;
    /// Live registration; handed back to [`ResizeHost::disconnect`].
    type Subscription;

    /// Start observing `target`. Returns `None` when the platform cannot
    /// observe sizes at all.
    fn observe(&self, target: &Self::Target, callback: ResizeCallback) -> Option<Self::Subscription>;

    /// Stop a registration made by [`ResizeHost::observe`].
    fn disconnect(&self, subscription: Self::Subscription);
}

/// Handle returned by [`ResizeTracker::subscribe`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(u64);

type Listener = Rc<RefCell<dyn FnMut(Size)>>;

#[derive(Default)]
struct Shared {
    size: Size,
    listeners: Vec<(ListenerId, Listener)>,
    next_listener: u64,
}

impl Shared {
    /// Record a new size. Returns listeners to notify when it changed.
    fn update(&mut self, size: Size) -> Option<Vec<Listener>> {
        let size = size.sanitized();
        if size == self.size {
            return None;
        }
        trace!(width = size.width, height = size.height, "container resized");
        self.size = size;
        Some(self.listeners.iter().map(|(_, l)| Rc::clone(l)).collect())
    }
}

fn notify(listeners: Vec<Listener>, size: Size) {
    for listener in listeners {
        // A listener that re-triggers a resize while running is skipped on
        // the nested pass; it sees the final size on its own return path.
        if let Ok(mut call) = listener.try_borrow_mut() {
            (&mut *call)(size);
        }
    }
}

/// Observes one element and republishes its size.
pub struct ResizeTracker<H: ResizeHost> {
    host: H,
    shared: Rc<RefCell<Shared>>,
    subscription: Option<H::Subscription>,
}

impl<H: ResizeHost> ResizeTracker<H> {
    /// Create a detached tracker with a zero size.
    #[must_use]
    pub fn new(host: H) -> Self {
        Self {
            host,
            shared: Rc::new(RefCell::new(Shared::default())),
            subscription: None,
        }
    }

    /// Start observing `target`, replacing any previous observation.
    ///
    /// Returns `false` when the host cannot observe; the size is left as is.
    pub fn attach(&mut self, target: &H::Target) -> bool {
        self.detach();

        let weak: Weak<RefCell<Shared>> = Rc::downgrade(&self.shared);
        let callback: ResizeCallback = Box::new(move |size| {
            let Some(shared) = weak.upgrade() else {
                return;
            };
            let pending = shared.borrow_mut().update(size);
            if let Some(listeners) = pending {
                notify(listeners, size.sanitized());
            }
        });

        match self.host.observe(target, callback) {
            Some(subscription) => {
                debug!("resize tracker attached");
                self.subscription = Some(subscription);
                true
            }
            None => {
                debug!("resize observation unavailable; keeping last known size");
                false
            }
        }
    }

    /// Stop observing. Safe to call when not attached.
    pub fn detach(&mut self) {
        if let Some(subscription) = self.subscription.take() {
            self.host.disconnect(subscription);
            debug!("resize tracker detached");
        }
    }

    /// Whether an observation is live.
    #[must_use]
    pub fn is_attached(&self) -> bool {
        self.subscription.is_some()
    }

    /// Last observed size (zero before the first observation).
    #[must_use]
    pub fn size(&self) -> Size {
        self.shared.borrow().size
    }

    /// Register a callback run after every size change.
    pub fn subscribe(&self, listener: impl FnMut(Size) + 'static) -> ListenerId {
        let mut shared = self.shared.borrow_mut();
        let id = ListenerId(shared.next_listener);
        shared.next_listener += 1;
        let listener: Listener = Rc::new(RefCell::new(listener));
        shared.listeners.push((id, listener));
        id
    }

    /// Remove a callback. Returns whether it was registered.
    pub fn unsubscribe(&self, id: ListenerId) -> bool {
        let mut shared = self.shared.borrow_mut();
        let before = shared.listeners.len();
        shared.listeners.retain(|(lid, _)| *lid != id);
        shared.listeners.len() != before
    }

    /// The host this tracker observes through.
    #[must_use]
    pub const fn host(&self) -> &H {
        &self.host
    }
}

impl<H: ResizeHost> Drop for ResizeTracker<H> {
    fn drop(&mut self) {
        self.detach();
    }
}

impl<H: ResizeHost> std::fmt::Debug for ResizeTracker<H> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResizeTracker")
            .field("size", &self.size())
            .field("attached", &self.is_attached())
            .finish_non_exhaustive()
    }
}

type SharedCallback = Rc<RefCell<ResizeCallback>>;

#[derive(Default)]
struct ManualInner {
    supported: bool,
    observers: HashMap<u64, (String, SharedCallback)>,
    next: u64,
}

/// Headless host whose size changes are pushed by hand.
///
/// Clones share the same registry, so a test can keep one clone and hand
/// the other to a tracker.
#[derive(Clone)]
pub struct ManualResizeHost {
    inner: Rc<RefCell<ManualInner>>,
}

/// Registration on a [`ManualResizeHost`].
#[derive(Debug)]
pub struct ManualSubscription(u64);

impl Default for ManualResizeHost {
    fn default() -> Self {
        Self::new()
    }
}

impl ManualResizeHost {
    /// A host that supports observation.
    #[must_use]
    pub fn new() -> Self {
        Self {
            inner: Rc::new(RefCell::new(ManualInner {
                supported: true,
                ..ManualInner::default()
            })),
        }
    }

    /// A host without any observation primitive.
    #[must_use]
    pub fn unsupported() -> Self {
        Self {
            inner: Rc::new(RefCell::new(ManualInner::default())),
        }
    }

    /// Report a new content-box size for `element`.
    pub fn emit(&self, element: &str, size: Size) {
        let callbacks: Vec<SharedCallback> = {
            let inner = self.inner.borrow();
            let mut matching: Vec<(u64, SharedCallback)> = inner
                .observers
                .iter()
                .filter(|(_, (name, _))| name == element)
                .map(|(id, (_, cb))| (*id, Rc::clone(cb)))
                .collect();
            matching.sort_by_key(|(id, _)| *id);
            matching.into_iter().map(|(_, cb)| cb).collect()
        };
        for callback in callbacks {
            if let Ok(mut call) = callback.try_borrow_mut() {
                (&mut *call)(size);
            }
        }
    }

    /// Number of live observations, across all elements.
    #[must_use]
    pub fn observer_count(&self) -> usize {
        self.inner.borrow().observers.len()
    }
}

impl std::fmt::Debug for ManualResizeHost {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let inner = self.inner.borrow();
        f.debug_struct("ManualResizeHost")
            .field("supported", &inner.supported)
            .field("observers", &inner.observers.len())
            .finish()
    }
}

impl ResizeHost for ManualResizeHost {
    type Target = str;
    type Subscription = ManualSubscription;

    fn observe(&self, target: &str, callback: ResizeCallback) -> Option<ManualSubscription> {
        let mut inner = self.inner.borrow_mut();
        if !inner.supported {
            return None;
        }
        let id = inner.next;
        inner.next += 1;
        inner
            .observers
            .insert(id, (target.to_string(), Rc::new(RefCell::new(callback))));
        Some(ManualSubscription(id))
    }

    fn disconnect(&self, subscription: ManualSubscription) {
        self.inner.borrow_mut().observers.remove(&subscription.0);
    }
}
