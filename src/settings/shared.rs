//! Process-wide settings store with an explicit lifecycle.
//!
//! Components should take a `&SettingsStore` or `Arc<SettingsStore>` as an
//! argument. A context is for entry points that cannot be handed one, such as
//! several front ends racing to start.

use super::backend::lock;
use super::{SettingsError, SettingsStore};
use crate::config::AppConfig;
use std::sync::{Arc, Mutex};

/// Holds at most one shared store
#[derive(Debug, Default)]
pub struct SettingsContext {
    slot: Mutex<Option<Arc<SettingsStore>>>,
}

static GLOBAL: SettingsContext = SettingsContext::new();

/// The process-wide context
pub fn global() -> &'static SettingsContext {
    &GLOBAL
}

impl SettingsContext {
    pub const fn new() -> Self {
        Self {
            slot: Mutex::new(None),
        }
    }

    /// Return the shared store, creating it with `init` on first use.
    ///
    /// The check and the creation happen under one lock, so concurrent
    /// callers run `init` at most once and all receive the same store. A
    /// failed `init` leaves the context empty.
    pub fn get_or_init<F>(&self, init: F) -> Result<Arc<SettingsStore>, SettingsError>
    where
        F: FnOnce() -> Result<SettingsStore, SettingsError>,
    {
        let mut slot = lock(&self.slot);
        if let Some(store) = slot.as_ref() {
            return Ok(Arc::clone(store));
        }

        let store = Arc::new(init()?);
        *slot = Some(Arc::clone(&store));
        log::info!("Shared settings store initialized");
        Ok(store)
    }

    /// Shared store for `app_config`, opened on first use
    pub fn get_or_open(&self, app_config: &AppConfig) -> Result<Arc<SettingsStore>, SettingsError> {
        self.get_or_init(|| SettingsStore::open(app_config))
    }

    /// The shared store if initialized
    pub fn get(&self) -> Option<Arc<SettingsStore>> {
        lock(&self.slot).as_ref().map(Arc::clone)
    }

    pub fn is_initialized(&self) -> bool {
        lock(&self.slot).is_some()
    }

    /// Drop the context's handle. Outstanding `Arc`s stay valid; the next
    /// `get_or_init` creates a new store.
    pub fn teardown(&self) -> Option<Arc<SettingsStore>> {
        let previous = lock(&self.slot).take();
        if previous.is_some() {
            log::info!("Shared settings store torn down");
        }
        previous
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Barrier;
    use std::thread;

    #[test]
    fn test_concurrent_first_access_creates_one_store() {
        const CALLERS: usize = 16;

        let context = Arc::new(SettingsContext::new());
        let init_calls = Arc::new(AtomicUsize::new(0));
        let barrier = Arc::new(Barrier::new(CALLERS));

        let handles: Vec<_> = (0..CALLERS)
            .map(|_| {
                let context = Arc::clone(&context);
                let init_calls = Arc::clone(&init_calls);
                let barrier = Arc::clone(&barrier);
                thread::spawn(move || {
                    barrier.wait();
                    context
                        .get_or_init(|| {
                            init_calls.fetch_add(1, Ordering::SeqCst);
                            Ok(SettingsStore::in_memory())
                        })
                        .unwrap()
                })
            })
            .collect();

        let stores: Vec<Arc<SettingsStore>> =
            handles.into_iter().map(|h| h.join().unwrap()).collect();

        assert_eq!(init_calls.load(Ordering::SeqCst), 1);
        assert!(stores.iter().all(|s| Arc::ptr_eq(s, &stores[0])));
    }

    #[test]
    fn test_writes_visible_through_every_handle() {
        let context = SettingsContext::new();
        let a = context.get_or_init(|| Ok(SettingsStore::in_memory())).unwrap();
        let b = context.get().unwrap();

        a.set_auto_start(true);
        assert!(b.auto_start());
    }

    #[test]
    fn test_failed_init_leaves_context_empty() {
        let context = SettingsContext::new();
        let result = context.get_or_init(|| {
            Err(SettingsError::Io(std::io::Error::new(
                std::io::ErrorKind::PermissionDenied,
                "denied",
            )))
        });

        assert!(result.is_err());
        assert!(!context.is_initialized());
        assert!(context.get_or_init(|| Ok(SettingsStore::in_memory())).is_ok());
    }

    #[test]
    fn test_teardown_allows_reinit() {
        let context = SettingsContext::new();
        assert!(context.teardown().is_none());

        let first = context.get_or_init(|| Ok(SettingsStore::in_memory())).unwrap();
        let torn = context.teardown().unwrap();
        assert!(Arc::ptr_eq(&first, &torn));
        assert!(!context.is_initialized());

        let second = context.get_or_init(|| Ok(SettingsStore::in_memory())).unwrap();
        assert!(!Arc::ptr_eq(&first, &second));
    }

    #[test]
    fn test_global_context_is_static() {
        assert!(std::ptr::eq(global(), global()));
    }
}
