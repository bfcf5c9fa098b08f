//! Process-wide single-active-playback coordinator.
//!
//! At most one tile plays at a time across the whole page. The coordinator
//! tracks who currently holds the grant and a stop capability for
//! preempting them; everything else lives in the tiles.

use std::sync::{Mutex, Weak};
use tracing::debug;
use wavedrop_core::AudioId;

/// Capability to stop one tile's playback.
///
/// Implemented by the tile controller and handed to the coordinator by
/// `Weak` reference, so a disposed tile's capability is automatically
/// inert. `stop` must pause the underlying sink without re-entering the
/// coordinator, and must be safe to call on an already-stopped tile.
pub trait Stoppable: Send + Sync {
    /// Pause playback immediately
    fn stop(&self);
}

struct Grant {
    id: AudioId,
    stop: Weak<dyn Stoppable>,
}

/// Shared "who is playing" state with a narrow mutation API.
///
/// One instance per application session, shared as `Arc` and injected into
/// every tile at construction. Performs no I/O and cannot fail; a stale
/// `release` is a guarded no-op rather than an error.
#[derive(Default)]
pub struct PlaybackCoordinator {
    active: Mutex<Option<Grant>>,
}

impl PlaybackCoordinator {
    /// Create a coordinator with no active grant
    pub fn new() -> Self {
        Self::default()
    }

    /// Grant exclusive playback to `id`, preempting any other holder.
    ///
    /// The previous holder's stop capability is invoked synchronously,
    /// exactly once, before this call returns; it must pause its sink
    /// without re-entering the coordinator. Requesting the grant already
    /// held by `id` is an idempotent re-grant: nothing is stopped and the
    /// stored capability is refreshed.
    pub fn request_play(&self, id: &AudioId, stop: Weak<dyn Stoppable>) {
        let previous = {
            let mut active = self.active.lock().expect("coordinator state poisoned");
            let already_held = active.as_ref().is_some_and(|grant| grant.id == *id);
            if already_held {
                debug!(item = %id, "re-granting active item");
                if let Some(grant) = active.as_mut() {
                    grant.stop = stop;
                }
                None
            } else {
                active.replace(Grant {
                    id: id.clone(),
                    stop,
                })
            }
        };

        // The grant has already moved, so a re-entrant call from the old
        // tile hits the guarded-release path and cannot clobber it. The
        // lock is not held while the capability runs.
        if let Some(grant) = previous {
            debug!(stopped = %grant.id, granted = %id, "preempting active item");
            if let Some(stoppable) = grant.stop.upgrade() {
                stoppable.stop();
            }
        } else {
            debug!(granted = %id, "granting playback");
        }
    }

    /// Clear the grant, but only if `id` still holds it.
    ///
    /// A release that lost a race against a newer grant (out-of-order
    /// async completion, late drop) is silently ignored.
    pub fn release(&self, id: &AudioId) {
        let mut active = self.active.lock().expect("coordinator state poisoned");
        match active.as_ref().map(|grant| grant.id == *id) {
            Some(true) => {
                debug!(item = %id, "releasing playback grant");
                *active = None;
            }
            Some(false) => {
                debug!(stale = %id, "ignoring stale release");
            }
            None => {}
        }
    }

    /// The item currently holding the grant, if any
    pub fn currently_playing(&self) -> Option<AudioId> {
        self.active
            .lock()
            .expect("coordinator state poisoned")
            .as_ref()
            .map(|grant| grant.id.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    /// Stop capability that counts how many times it was invoked
    #[derive(Default)]
    struct CountingStop {
        stops: AtomicUsize,
    }

    impl CountingStop {
        fn stop_count(&self) -> usize {
            self.stops.load(Ordering::SeqCst)
        }
    }

    impl Stoppable for CountingStop {
        fn stop(&self) {
            self.stops.fetch_add(1, Ordering::SeqCst);
        }
    }

    fn capability() -> (Arc<CountingStop>, Weak<dyn Stoppable>) {
        let strong = Arc::new(CountingStop::default());
        let weak = Arc::downgrade(&strong) as Weak<dyn Stoppable>;
        (strong, weak)
    }

    #[test]
    fn grant_moves_and_previous_holder_is_stopped_once() {
        let coordinator = PlaybackCoordinator::new();
        let a = AudioId::new("a");
        let b = AudioId::new("b");
        let (stop_a, weak_a) = capability();
        let (stop_b, weak_b) = capability();

        coordinator.request_play(&a, weak_a);
        assert_eq!(coordinator.currently_playing(), Some(a.clone()));
        assert_eq!(stop_a.stop_count(), 0);

        coordinator.request_play(&b, weak_b);
        assert_eq!(coordinator.currently_playing(), Some(b));
        assert_eq!(stop_a.stop_count(), 1);
        assert_eq!(stop_b.stop_count(), 0);
    }

    #[test]
    fn same_id_regrant_is_idempotent() {
        let coordinator = PlaybackCoordinator::new();
        let a = AudioId::new("a");
        let (stop_first, weak_first) = capability();
        let (stop_second, weak_second) = capability();

        coordinator.request_play(&a, weak_first);
        coordinator.request_play(&a, weak_second);

        assert_eq!(stop_first.stop_count(), 0);
        assert_eq!(stop_second.stop_count(), 0);
        assert_eq!(coordinator.currently_playing(), Some(a));
    }

    #[test]
    fn stale_release_does_not_clobber_a_newer_grant() {
        let coordinator = PlaybackCoordinator::new();
        let a = AudioId::new("a");
        let b = AudioId::new("b");
        let (_stop_a, weak_a) = capability();
        let (_stop_b, weak_b) = capability();

        coordinator.request_play(&a, weak_a);
        coordinator.request_play(&b, weak_b);

        // A releasing after losing the grant must leave B active.
        coordinator.release(&a);
        assert_eq!(coordinator.currently_playing(), Some(b.clone()));

        coordinator.release(&b);
        assert_eq!(coordinator.currently_playing(), None);
    }

    #[test]
    fn release_without_any_grant_is_a_no_op() {
        let coordinator = PlaybackCoordinator::new();
        coordinator.release(&AudioId::new("ghost"));
        assert_eq!(coordinator.currently_playing(), None);
    }

    #[test]
    fn preempting_a_dropped_holder_is_safe() {
        let coordinator = PlaybackCoordinator::new();
        let a = AudioId::new("a");
        let b = AudioId::new("b");

        {
            let (stop_a, weak_a) = capability();
            coordinator.request_play(&a, weak_a);
            drop(stop_a);
        }

        // The stored capability is dead; preemption must not panic.
        let (_stop_b, weak_b) = capability();
        coordinator.request_play(&b, weak_b);
        assert_eq!(coordinator.currently_playing(), Some(b));
    }

    #[test]
    fn idempotent_regrant_refreshes_the_stored_capability() {
        let coordinator = PlaybackCoordinator::new();
        let a = AudioId::new("a");
        let b = AudioId::new("b");
        let (stop_old, weak_old) = capability();
        let (stop_new, weak_new) = capability();

        coordinator.request_play(&a, weak_old);
        coordinator.request_play(&a, weak_new);

        // Preemption must hit the refreshed capability, not the original.
        let (_stop_b, weak_b) = capability();
        coordinator.request_play(&b, weak_b);
        assert_eq!(stop_old.stop_count(), 0);
        assert_eq!(stop_new.stop_count(), 1);
    }
}
