#![forbid(unsafe_code)]

//! Store scoping for hook evaluation.
//!
//! [`Provider::render`] pushes its store onto a thread-local context stack
//! for the duration of the children closure. Components rendered inside it
//! resolve hooks against that store; outside any provider they fall back to
//! [`default_store()`].

use std::cell::RefCell;

use atomslice_core::{Store, default_store};

thread_local! {
    static CONTEXT: RefCell<Vec<Store>> = const { RefCell::new(Vec::new()) };
}

/// The innermost provided store, or the default store.
#[must_use]
pub fn current_store() -> Store {
    CONTEXT
        .with(|stack| stack.borrow().last().cloned())
        .unwrap_or_else(default_store)
}

/// Pops the context stack on drop, including during unwinding.
struct ContextGuard;

impl ContextGuard {
    fn push(store: Store) -> Self {
        CONTEXT.with(|stack| stack.borrow_mut().push(store));
        Self
    }
}

impl Drop for ContextGuard {
    fn drop(&mut self) {
        CONTEXT.with(|stack| {
            stack.borrow_mut().pop();
        });
    }
}

/// Scopes a subtree to one store.
#[derive(Debug, Clone)]
pub struct Provider {
    store: Store,
}

impl Provider {
    #[must_use]
    pub fn new(store: Store) -> Self {
        Self { store }
    }

    #[must_use]
    pub fn store(&self) -> &Store {
        &self.store
    }

    /// Run `children` with this provider's store as the current store.
    pub fn render<R>(&self, children: impl FnOnce() -> R) -> R {
        let _guard = ContextGuard::push(self.store.clone());
        children()
    }
}

/// Build a provider bound to `store`.
#[must_use]
pub fn create_provider(store: &Store) -> Provider {
    Provider::new(store.clone())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn falls_back_to_default_store() {
        assert_eq!(current_store(), default_store());
    }

    #[test]
    fn provider_scopes_current_store() {
        let store = Store::new();
        let provider = create_provider(&store);
        let seen = provider.render(current_store);
        assert_eq!(seen, store);
        assert_eq!(current_store(), default_store());
    }

    #[test]
    fn nested_providers_resolve_innermost() {
        let outer = Provider::new(Store::with_label("outer"));
        let inner = Provider::new(Store::with_label("inner"));

        let labels = outer.render(|| {
            let before = current_store().label().map(str::to_owned);
            let nested = inner.render(|| current_store().label().map(str::to_owned));
            let after = current_store().label().map(str::to_owned);
            (before, nested, after)
        });

        assert_eq!(labels.0.as_deref(), Some("outer"));
        assert_eq!(labels.1.as_deref(), Some("inner"));
        assert_eq!(labels.2.as_deref(), Some("outer"));
    }

    #[test]
    fn context_unwinds_on_panic() {
        let provider = Provider::new(Store::new());
        let result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
            provider.render(|| panic!("boom"));
        }));
        assert!(result.is_err());
        assert_eq!(current_store(), default_store());
    }
}
