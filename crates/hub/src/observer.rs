use rtpm_core::CanonicalSample;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, Weak};

use crate::lock;

/// Receives the outcome of every hub tick.
///
/// `None` means "no sample this tick": the source was unreachable or sent
/// something that could not be decoded. The sample is the hub's own shared
/// copy; clone the `Arc` to keep it. Any
/// `Fn(Option<&Arc<CanonicalSample>>)` closure is an observer.
pub trait Observer: Send + Sync {
    fn notify(&self, sample: Option<&Arc<CanonicalSample>>);
}

impl<F> Observer for F
where
    F: Fn(Option<&Arc<CanonicalSample>>) + Send + Sync,
{
    fn notify(&self, sample: Option<&Arc<CanonicalSample>>) {
        self(sample)
    }
}

/// Registered observers in subscription order.
#[derive(Default)]
pub(crate) struct Registry {
    next_id: AtomicU64,
    entries: Mutex<Vec<(u64, Arc<dyn Observer>)>>,
}

impl Registry {
    pub(crate) fn insert(&self, observer: Arc<dyn Observer>) -> u64 {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        lock(&self.entries).push((id, observer));
        id
    }

    pub(crate) fn remove(&self, id: u64) -> bool {
        let mut entries = lock(&self.entries);
        let before = entries.len();
        entries.retain(|(entry, _)| *entry != id);
        entries.len() != before
    }

    /// Copy of the current set. Notification walks the copy, so callbacks
    /// may subscribe or unsubscribe freely.
    pub(crate) fn snapshot(&self) -> Vec<(u64, Arc<dyn Observer>)> {
        lock(&self.entries).clone()
    }

    pub(crate) fn len(&self) -> usize {
        lock(&self.entries).len()
    }
}

/// Handle returned by [`crate::Hub::subscribe`].
///
/// Dropping the handle keeps the observer registered; call
/// [`Subscription::unsubscribe`] to remove it. The handle does not keep
/// the hub alive.
#[derive(Clone)]
pub struct Subscription {
    id:       u64,
    registry: Weak<Registry>,
}

impl Subscription {
    pub(crate) fn new(id: u64, registry: &Arc<Registry>) -> Self {
        Self {
            id,
            registry: Arc::downgrade(registry),
        }
    }

    pub fn id(&self) -> u64 {
        self.id
    }

    /// Remove the observer. Returns `false` if it was already gone or the
    /// hub no longer exists. Takes effect from the next notification pass.
    pub fn unsubscribe(&self) -> bool {
        self.registry
            .upgrade()
            .is_some_and(|registry| registry.remove(self.id))
    }
}

impl std::fmt::Debug for Subscription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subscription").field("id", &self.id).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn noop() -> Arc<dyn Observer> {
        Arc::new(|_: Option<&Arc<CanonicalSample>>| {})
    }

    #[test]
    fn ids_are_unique_and_order_is_kept() {
        let registry = Arc::new(Registry::default());
        let a = registry.insert(noop());
        let b = registry.insert(noop());
        assert_ne!(a, b);
        let ids: Vec<u64> = registry.snapshot().into_iter().map(|(id, _)| id).collect();
        assert_eq!(ids, vec![a, b]);
    }

    #[test]
    fn unsubscribe_is_idempotent() {
        let registry = Arc::new(Registry::default());
        let sub = Subscription::new(registry.insert(noop()), &registry);
        assert!(sub.unsubscribe());
        assert!(!sub.unsubscribe());
        assert_eq!(registry.len(), 0);
    }

    #[test]
    fn handle_outliving_the_registry_is_harmless() {
        let registry = Arc::new(Registry::default());
        let sub = Subscription::new(registry.insert(noop()), &registry);
        drop(registry);
        assert!(!sub.unsubscribe());
    }
}
