//! Viewport intersection tracking for content regions.
//!
//! A [`VisibilityObserver`] owns a set of regions, each with document-space
//! bounds, a root margin and a `once` flag. [`VisibilityObserver::update`] is
//! called with the current viewport after every scroll, resize or layout pass
//! and fires the registered callbacks for regions that entered or left.
//!
//! Registration returns a [`Disposer`]. Dropping or disposing it removes the
//! region; a callback that was already collected in the current pass is
//! suppressed if its region is disposed before it runs.

use std::cell::{Cell, RefCell};
use std::collections::BTreeMap;
use std::fmt;
use std::rc::{Rc, Weak};
use std::time::Duration;

use tracing::debug;

/// Vertical extent of an element in document coordinates
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub top: f64,
    pub height: f64,
}

impl Bounds {
    pub fn new(top: f64, height: f64) -> Self {
        Self { top, height }
    }

    #[inline]
    pub fn bottom(&self) -> f64 {
        self.top + self.height
    }

    /// Zero-size, negative or non-finite bounds cannot be measured
    pub fn is_measurable(&self) -> bool {
        self.top.is_finite() && self.height.is_finite() && self.height > 0.0
    }
}

/// The visible window onto the document
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub scroll_y: f64,
    pub height: f64,
}

impl Viewport {
    pub fn new(scroll_y: f64, height: f64) -> Self {
        Self { scroll_y, height }
    }

    /// Visible height of `bounds` after growing this viewport by `margin` on both edges
    pub fn overlap(&self, bounds: &Bounds, margin: f64) -> f64 {
        let top = self.scroll_y - margin;
        let bottom = self.scroll_y + self.height + margin;
        if bottom <= top {
            return 0.0;
        }
        (bounds.bottom().min(bottom) - bounds.top.max(top)).max(0.0)
    }
}

/// Lifecycle of a region
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegionState {
    /// Not (yet) in view
    Pending,
    /// In view
    Visible,
    /// A once-region that has been seen and left; never evaluated again
    Consumed,
}

/// Registration options for a region
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VisibilityRegion {
    /// Root margin; positive grows the viewport so the region triggers early
    pub margin_px: f64,
    /// Fire the enter callback at most once and never fire exit
    pub once: bool,
    /// Fraction of the region's height that must be inside the viewport
    pub threshold: f64,
}

impl VisibilityRegion {
    pub fn once(margin_px: f64) -> Self {
        Self {
            margin_px,
            once: true,
            threshold: 0.0,
        }
    }

    pub fn continuous(margin_px: f64) -> Self {
        Self {
            margin_px,
            once: false,
            threshold: 0.0,
        }
    }

    pub fn with_threshold(mut self, threshold: f64) -> Self {
        self.threshold = if threshold.is_nan() {
            0.0
        } else {
            threshold.clamp(0.0, 1.0)
        };
        self
    }

    fn intersects(&self, viewport: &Viewport, bounds: &Bounds) -> bool {
        let overlap = viewport.overlap(bounds, self.margin_px);
        overlap > 0.0 && overlap / bounds.height >= self.threshold
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RegionId(u64);

impl fmt::Display for RegionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "region#{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VisibilityChange {
    Enter,
    Exit,
}

/// A delivered transition
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VisibilityEvent {
    pub region: RegionId,
    pub change: VisibilityChange,
    pub at: Duration,
}

pub type Callback = Box<dyn FnMut(RegionId, Duration)>;

struct Entry {
    options: VisibilityRegion,
    bounds: Option<Bounds>,
    state: RegionState,
    on_enter: Option<Callback>,
    on_exit: Option<Callback>,
}

#[derive(Default)]
struct Registry {
    next_id: u64,
    regions: BTreeMap<RegionId, Entry>,
}

/// Tracks registered regions against the viewport
#[derive(Clone, Default)]
pub struct VisibilityObserver {
    registry: Rc<RefCell<Registry>>,
}

impl fmt::Debug for VisibilityObserver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("VisibilityObserver")
            .field("regions", &self.len())
            .finish()
    }
}

impl VisibilityObserver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a region with enter/exit callbacks
    pub fn register<E, X>(&self, region: VisibilityRegion, on_enter: E, on_exit: X) -> Disposer
    where
        E: FnMut(RegionId, Duration) + 'static,
        X: FnMut(RegionId, Duration) + 'static,
    {
        self.insert(region, Some(Box::new(on_enter)), Some(Box::new(on_exit)))
    }

    /// Register a region that is only polled through [`VisibilityObserver::state`]
    pub fn observe(&self, region: VisibilityRegion) -> Disposer {
        self.insert(region, None, None)
    }

    fn insert(
        &self,
        options: VisibilityRegion,
        on_enter: Option<Callback>,
        on_exit: Option<Callback>,
    ) -> Disposer {
        let mut registry = self.registry.borrow_mut();
        let id = RegionId(registry.next_id);
        registry.next_id += 1;
        registry.regions.insert(
            id,
            Entry {
                options,
                bounds: None,
                state: RegionState::Pending,
                on_enter,
                on_exit,
            },
        );
        Disposer {
            registry: Rc::downgrade(&self.registry),
            id,
            disposed: Cell::new(false),
        }
    }

    /// Record a region's measured bounds; `None` marks it detached
    pub fn set_bounds(&self, id: RegionId, bounds: Option<Bounds>) {
        if let Some(entry) = self.registry.borrow_mut().regions.get_mut(&id) {
            entry.bounds = bounds;
        }
    }

    pub fn state(&self, id: RegionId) -> Option<RegionState> {
        self.registry.borrow().regions.get(&id).map(|e| e.state)
    }

    /// Whether the region has entered the viewport (and, for once-regions, ever did)
    pub fn is_in_view(&self, id: RegionId) -> bool {
        matches!(
            self.state(id),
            Some(RegionState::Visible) | Some(RegionState::Consumed)
        )
    }

    pub fn len(&self) -> usize {
        self.registry.borrow().regions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Evaluate every region against `viewport` and deliver callbacks.
    ///
    /// Returns the transitions that were delivered, in registration order.
    pub fn update(&self, viewport: Viewport, now: Duration) -> Vec<VisibilityEvent> {
        let pending = self.evaluate(viewport);
        let mut delivered = Vec::with_capacity(pending.len());

        for (id, change) in pending {
            let callback = {
                let mut registry = self.registry.borrow_mut();
                let Some(entry) = registry.regions.get_mut(&id) else {
                    debug!(region = %id, "Region disposed before callback, suppressing");
                    continue;
                };
                match change {
                    VisibilityChange::Enter => entry.on_enter.take(),
                    VisibilityChange::Exit => entry.on_exit.take(),
                }
            };

            // The borrow is released while user code runs so it may dispose regions
            if let Some(mut callback) = callback {
                callback(id, now);
                let mut registry = self.registry.borrow_mut();
                if let Some(entry) = registry.regions.get_mut(&id) {
                    let slot = match change {
                        VisibilityChange::Enter => &mut entry.on_enter,
                        VisibilityChange::Exit => &mut entry.on_exit,
                    };
                    *slot = Some(callback);
                }
            }

            delivered.push(VisibilityEvent {
                region: id,
                change,
                at: now,
            });
        }

        delivered
    }

    fn evaluate(&self, viewport: Viewport) -> Vec<(RegionId, VisibilityChange)> {
        let mut registry = self.registry.borrow_mut();
        let mut changes = Vec::new();

        for (id, entry) in registry.regions.iter_mut() {
            if entry.state == RegionState::Consumed {
                continue;
            }
            let Some(bounds) = entry.bounds.filter(Bounds::is_measurable) else {
                continue;
            };
            let hit = entry.options.intersects(&viewport, &bounds);

            match (entry.state, hit) {
                (RegionState::Pending, true) => {
                    entry.state = RegionState::Visible;
                    debug!(region = %id, once = entry.options.once, "Region entered viewport");
                    changes.push((*id, VisibilityChange::Enter));
                }
                (RegionState::Visible, false) if entry.options.once => {
                    entry.state = RegionState::Consumed;
                    debug!(region = %id, "Once-region consumed");
                }
                (RegionState::Visible, false) => {
                    entry.state = RegionState::Pending;
                    debug!(region = %id, "Region left viewport");
                    changes.push((*id, VisibilityChange::Exit));
                }
                _ => {}
            }
        }

        changes
    }
}

/// Removes its region from the observer when disposed or dropped
#[must_use = "dropping a Disposer unregisters its region immediately"]
pub struct Disposer {
    registry: Weak<RefCell<Registry>>,
    id: RegionId,
    disposed: Cell<bool>,
}

impl fmt::Debug for Disposer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Disposer")
            .field("id", &self.id)
            .field("disposed", &self.disposed.get())
            .finish()
    }
}

impl Disposer {
    pub fn id(&self) -> RegionId {
        self.id
    }

    pub fn is_disposed(&self) -> bool {
        self.disposed.get()
    }

    /// Unregister the region. Safe to call any number of times, including
    /// from inside one of the region's own callbacks.
    pub fn dispose(&self) {
        if self.disposed.replace(true) {
            return;
        }
        if let Some(registry) = self.registry.upgrade() {
            // A callback in flight holds no borrow, so this cannot conflict
            if let Ok(mut registry) = registry.try_borrow_mut() {
                registry.regions.remove(&self.id);
            }
        }
    }
}

impl Drop for Disposer {
    fn drop(&mut self) {
        self.dispose();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ms(v: u64) -> Duration {
        Duration::from_millis(v)
    }

    fn counter() -> (Rc<Cell<u32>>, impl FnMut(RegionId, Duration) + 'static) {
        let count = Rc::new(Cell::new(0));
        let c = count.clone();
        (count, move |_, _| c.set(c.get() + 1))
    }

    #[test]
    fn test_once_region_fires_single_enter() {
        let observer = VisibilityObserver::new();
        let (enters, on_enter) = counter();
        let (exits, on_exit) = counter();
        let handle = observer.register(VisibilityRegion::once(0.0), on_enter, on_exit);
        observer.set_bounds(handle.id(), Some(Bounds::new(1000.0, 200.0)));

        for scroll in [0.0, 900.0, 0.0, 900.0, 3000.0, 900.0] {
            observer.update(Viewport::new(scroll, 600.0), ms(0));
        }

        assert_eq!(enters.get(), 1);
        assert_eq!(exits.get(), 0);
        assert_eq!(observer.state(handle.id()), Some(RegionState::Consumed));
        assert!(observer.is_in_view(handle.id()));
    }

    #[test]
    fn test_continuous_region_oscillates() {
        let observer = VisibilityObserver::new();
        let (enters, on_enter) = counter();
        let (exits, on_exit) = counter();
        let handle = observer.register(VisibilityRegion::continuous(0.0), on_enter, on_exit);
        observer.set_bounds(handle.id(), Some(Bounds::new(1000.0, 200.0)));

        observer.update(Viewport::new(900.0, 600.0), ms(0));
        assert_eq!(observer.state(handle.id()), Some(RegionState::Visible));
        observer.update(Viewport::new(0.0, 600.0), ms(10));
        assert_eq!(observer.state(handle.id()), Some(RegionState::Pending));
        observer.update(Viewport::new(900.0, 600.0), ms(20));

        assert_eq!(enters.get(), 2);
        assert_eq!(exits.get(), 1);
    }

    #[test]
    fn test_margin_pre_triggers_and_delays() {
        let bounds = Bounds::new(650.0, 100.0);
        let viewport = Viewport::new(0.0, 600.0);
        assert!(VisibilityRegion::once(100.0).intersects(&viewport, &bounds));
        assert!(!VisibilityRegion::once(0.0).intersects(&viewport, &bounds));

        let inside = Bounds::new(570.0, 100.0);
        assert!(VisibilityRegion::once(0.0).intersects(&viewport, &inside));
        assert!(!VisibilityRegion::once(-50.0).intersects(&viewport, &inside));
    }

    #[test]
    fn test_threshold_requires_fraction() {
        let region = VisibilityRegion::once(0.0).with_threshold(0.5);
        let viewport = Viewport::new(0.0, 600.0);
        assert!(!region.intersects(&viewport, &Bounds::new(560.0, 100.0)));
        assert!(region.intersects(&viewport, &Bounds::new(540.0, 100.0)));
    }

    #[test]
    fn test_unmeasurable_region_stays_pending() {
        let observer = VisibilityObserver::new();
        let (enters, on_enter) = counter();
        let handle = observer.register(VisibilityRegion::once(0.0), on_enter, |_, _| {});

        observer.update(Viewport::new(0.0, 600.0), ms(0));
        observer.set_bounds(handle.id(), Some(Bounds::new(100.0, 0.0)));
        observer.update(Viewport::new(0.0, 600.0), ms(0));

        assert_eq!(enters.get(), 0);
        assert_eq!(observer.state(handle.id()), Some(RegionState::Pending));
    }

    #[test]
    fn test_dispose_is_idempotent_and_silences() {
        let observer = VisibilityObserver::new();
        let (enters, on_enter) = counter();
        let handle = observer.register(VisibilityRegion::continuous(0.0), on_enter, |_, _| {});
        observer.set_bounds(handle.id(), Some(Bounds::new(0.0, 100.0)));

        handle.dispose();
        handle.dispose();
        assert!(handle.is_disposed());
        assert!(observer.is_empty());

        let events = observer.update(Viewport::new(0.0, 600.0), ms(0));
        assert!(events.is_empty());
        assert_eq!(enters.get(), 0);
    }

    #[test]
    fn test_drop_unregisters() {
        let observer = VisibilityObserver::new();
        {
            let _handle = observer.observe(VisibilityRegion::once(0.0));
            assert_eq!(observer.len(), 1);
        }
        assert!(observer.is_empty());
    }

    #[test]
    fn test_callback_disposing_sibling_suppresses_it() {
        let observer = VisibilityObserver::new();
        let second: Rc<RefCell<Option<Disposer>>> = Rc::new(RefCell::new(None));
        let (second_enters, on_second) = counter();

        let slot = second.clone();
        let first = observer.register(
            VisibilityRegion::once(0.0),
            move |_, _| {
                if let Some(handle) = slot.borrow().as_ref() {
                    handle.dispose();
                }
            },
            |_, _| {},
        );
        let handle = observer.register(VisibilityRegion::once(0.0), on_second, |_, _| {});
        observer.set_bounds(first.id(), Some(Bounds::new(0.0, 100.0)));
        observer.set_bounds(handle.id(), Some(Bounds::new(50.0, 100.0)));
        *second.borrow_mut() = Some(handle);

        let events = observer.update(Viewport::new(0.0, 600.0), ms(5));

        assert_eq!(events.len(), 1);
        assert_eq!(events[0].region, first.id());
        assert_eq!(second_enters.get(), 0);
    }

    #[test]
    fn test_observe_only_region_reports_events() {
        let observer = VisibilityObserver::new();
        let handle = observer.observe(VisibilityRegion::continuous(0.0));
        observer.set_bounds(handle.id(), Some(Bounds::new(0.0, 10.0)));
        let events = observer.update(Viewport::new(0.0, 600.0), ms(42));
        assert_eq!(
            events,
            vec![VisibilityEvent {
                region: handle.id(),
                change: VisibilityChange::Enter,
                at: ms(42),
            }]
        );
    }
}
