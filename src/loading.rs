//! Shared loading state
//!
//! Counts in-flight dispatches. The observable flag is "count > 0", so
//! overlapping dispatches compose: the flag only drops once the last one
//! settles. Subscribers get a `watch` channel that changes on 0 <-> 1
//! transitions only. The counter is only mutated while the channel's value
//! is locked, so the published flag always matches the count.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use tokio::sync::watch;

#[derive(Debug)]
struct Inner {
    in_flight: AtomicUsize,
    tx: watch::Sender<bool>,
}

/// Cheap to clone; all clones observe the same state
#[derive(Debug, Clone)]
pub struct LoadingState {
    inner: Arc<Inner>,
}

impl Default for LoadingState {
    fn default() -> Self {
        Self::new()
    }
}

impl LoadingState {
    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(false);
        Self {
            inner: Arc::new(Inner {
                in_flight: AtomicUsize::new(0),
                tx,
            }),
        }
    }

    /// Mark one dispatch as started. The returned guard marks it settled on drop.
    pub fn begin(&self) -> LoadingGuard {
        self.update(|count| count + 1);
        LoadingGuard {
            state: self.clone(),
        }
    }

    pub fn is_loading(&self) -> bool {
        self.in_flight() > 0
    }

    pub fn in_flight(&self) -> usize {
        self.inner.in_flight.load(Ordering::SeqCst)
    }

    pub fn subscribe(&self) -> watch::Receiver<bool> {
        self.inner.tx.subscribe()
    }

    fn end(&self) {
        self.update(|count| count.saturating_sub(1));
    }

    fn update(&self, step: impl FnOnce(usize) -> usize) {
        self.inner.tx.send_if_modified(|flag| {
            let count = step(self.inner.in_flight.load(Ordering::SeqCst));
            self.inner.in_flight.store(count, Ordering::SeqCst);
            let loading = count > 0;
            let changed = *flag != loading;
            *flag = loading;
            changed
        });
    }
}

/// Held for the lifetime of one dispatch
#[derive(Debug)]
#[must_use = "dropping the guard immediately ends the loading period"]
pub struct LoadingGuard {
    state: LoadingState,
}

impl Drop for LoadingGuard {
    fn drop(&mut self) {
        self.state.end();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_starts_idle() {
        let state = LoadingState::new();
        assert!(!state.is_loading());
        assert!(!*state.subscribe().borrow());
    }

    #[test]
    fn test_guard_toggles_flag() {
        let state = LoadingState::new();
        {
            let _guard = state.begin();
            assert!(state.is_loading());
        }
        assert!(!state.is_loading());
    }

    #[test]
    fn test_overlapping_guards_compose() {
        let state = LoadingState::new();
        let first = state.begin();
        let second = state.begin();
        assert_eq!(state.in_flight(), 2);

        // First to settle must not clear the flag while another is active.
        drop(first);
        assert!(state.is_loading());

        drop(second);
        assert!(!state.is_loading());
    }

    #[test]
    fn test_clones_share_state() {
        let state = LoadingState::new();
        let view = state.clone();
        let _guard = state.begin();
        assert!(view.is_loading());
    }

    #[tokio::test]
    async fn test_subscriber_sees_transitions() {
        let state = LoadingState::new();
        let mut rx = state.subscribe();

        let guard = state.begin();
        rx.changed().await.unwrap();
        assert!(*rx.borrow_and_update());

        drop(guard);
        rx.changed().await.unwrap();
        assert!(!*rx.borrow_and_update());
    }

    #[test]
    fn test_subscriber_agrees_with_count_under_contention() {
        let state = LoadingState::new();
        let rx = state.subscribe();

        for _ in 0..5_000 {
            let first = state.begin();
            let ending = std::thread::spawn(move || drop(first));
            let starting = {
                let state = state.clone();
                std::thread::spawn(move || state.begin())
            };
            ending.join().unwrap();
            let second = starting.join().unwrap();

            assert_eq!(*rx.borrow(), state.is_loading());
            assert!(*rx.borrow());
            drop(second);
            assert!(!*rx.borrow());
            assert_eq!(state.in_flight(), 0);
        }
    }

    #[test]
    fn test_guard_released_on_panic() {
        let state = LoadingState::new();
        let cloned = state.clone();
        let result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(move || {
            let _guard = cloned.begin();
            panic!("boom");
        }));
        assert!(result.is_err());
        assert!(!state.is_loading());
    }
}
