#![forbid(unsafe_code)]

//! Mounted consumers and their render lifecycle.
//!
//! # Invariants
//!
//! 1. `needs_render()` is false right after `render()` returns, unless the
//!    body itself wrote to an atom the component observes.
//! 2. `needs_render()` becomes true exactly when an observed atom's value
//!    changes. Writes to unobserved atoms, or writes that leave an observed
//!    value equal, do not dirty the component.
//! 3. Hook slots persist across renders in call order; subscriptions made by
//!    a slot are reused as long as the slot sees the same atom and store.
//! 4. A render body that panics leaves the slots from before the panic in
//!    place; the next render picks them up.
//! 5. Dropping the last handle to a component drops its slots and with them
//!    every subscription.

use std::any::Any;
use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::Rc;
use std::sync::atomic::{AtomicU64, Ordering};

use crate::hooks::Hooks;
use crate::provider::current_store;

static NEXT_COMPONENT_ID: AtomicU64 = AtomicU64::new(1);

/// Process-unique component identity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ComponentId(u64);

impl ComponentId {
    fn next() -> Self {
        Self(NEXT_COMPONENT_ID.fetch_add(1, Ordering::Relaxed))
    }

    #[must_use]
    pub const fn raw(self) -> u64 {
        self.0
    }
}

struct ComponentInner {
    id: ComponentId,
    name: String,
    slots: RefCell<Vec<Box<dyn Any>>>,
    /// Shared with subscription callbacks.
    dirty: Rc<Cell<bool>>,
    renders: Cell<u64>,
    subscribes: Cell<u64>,
}

/// One mounted consumer with persistent hook state.
///
/// Cloning creates a new handle to the **same** component.
#[derive(Clone)]
pub struct Component {
    inner: Rc<ComponentInner>,
}

impl fmt::Debug for Component {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Component")
            .field("id", &self.inner.id)
            .field("name", &self.inner.name)
            .field("slots", &self.inner.slots.borrow().len())
            .field("dirty", &self.inner.dirty.get())
            .field("renders", &self.inner.renders.get())
            .finish()
    }
}

impl Component {
    /// Mount a component. It starts dirty: nothing has been rendered yet.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            inner: Rc::new(ComponentInner {
                id: ComponentId::next(),
                name: name.into(),
                slots: RefCell::new(Vec::new()),
                dirty: Rc::new(Cell::new(true)),
                renders: Cell::new(0),
                subscribes: Cell::new(0),
            }),
        }
    }

    #[must_use]
    pub fn id(&self) -> ComponentId {
        self.inner.id
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.inner.name
    }

    /// Run one render pass. Hooks resolve against [`current_store()`], so a
    /// component rendered inside [`Provider::render`](crate::Provider::render)
    /// sees that provider's store.
    pub fn render<R>(&self, body: impl FnOnce(&mut Hooks<'_>) -> R) -> R {
        let slots = std::mem::take(&mut *self.inner.slots.borrow_mut());
        let mut hooks = Hooks::new(self, slots, current_store());
        self.inner.dirty.set(false);

        let out = body(&mut hooks);
        hooks.finish();

        let renders = self.inner.renders.get() + 1;
        self.inner.renders.set(renders);
        tracing::trace!(component = %self.inner.name, renders, "render");
        out
    }

    /// Whether an observed atom changed since the last render began.
    #[must_use]
    pub fn needs_render(&self) -> bool {
        self.inner.dirty.get()
    }

    /// Completed render passes.
    #[must_use]
    pub fn render_count(&self) -> u64 {
        self.inner.renders.get()
    }

    /// Subscriptions created by this component's hooks over its lifetime.
    /// Stable hook inputs keep this flat across re-renders.
    #[must_use]
    pub fn subscribe_count(&self) -> u64 {
        self.inner.subscribes.get()
    }

    pub(crate) fn dirty_flag(&self) -> Rc<Cell<bool>> {
        Rc::clone(&self.inner.dirty)
    }

    pub(crate) fn restore_slots(&self, slots: Vec<Box<dyn Any>>) {
        *self.inner.slots.borrow_mut() = slots;
    }

    pub(crate) fn note_subscribe(&self) {
        self.inner.subscribes.set(self.inner.subscribes.get() + 1);
    }
}
