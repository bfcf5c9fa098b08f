//! Scoped auth-change subscriptions.
//!
//! A subscription is acquired for the lifetime of a controller and released
//! when the guard drops, so a disposed page can never be called back.

use crate::types::User;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, Weak};

/// Callback invoked with the new viewer (or `None` after sign-out).
pub type AuthCallback = Arc<dyn Fn(Option<&User>) + Send + Sync>;

/// Registry of live auth-change subscribers.
///
/// Auth service implementations own one of these and `emit` into it
/// whenever the session changes.
#[derive(Default)]
pub struct SubscriberRegistry {
    subscribers: Mutex<HashMap<u64, AuthCallback>>,
    next_id: AtomicU64,
}

impl SubscriberRegistry {
    /// Create an empty registry
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Register a callback; dropping the returned guard unsubscribes.
    pub fn subscribe(self: &Arc<Self>, callback: AuthCallback) -> AuthSubscription {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        self.subscribers
            .lock()
            .expect("subscriber registry poisoned")
            .insert(id, callback);

        AuthSubscription {
            registry: Arc::downgrade(self),
            id,
        }
    }

    /// Notify every live subscriber of the new session state.
    pub fn emit(&self, user: Option<&User>) {
        // Callbacks run outside the lock so one may subscribe/unsubscribe.
        let callbacks: Vec<AuthCallback> = self
            .subscribers
            .lock()
            .expect("subscriber registry poisoned")
            .values()
            .cloned()
            .collect();

        for callback in callbacks {
            callback(user);
        }
    }

    /// Number of live subscriptions
    pub fn len(&self) -> usize {
        self.subscribers
            .lock()
            .expect("subscriber registry poisoned")
            .len()
    }

    /// Whether no subscription is live
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn remove(&self, id: u64) {
        self.subscribers
            .lock()
            .expect("subscriber registry poisoned")
            .remove(&id);
    }
}

/// RAII guard for one auth-change subscription.
///
/// Unsubscribes on drop. Outliving the registry is fine; the guard just
/// becomes inert.
pub struct AuthSubscription {
    registry: Weak<SubscriberRegistry>,
    id: u64,
}

impl Drop for AuthSubscription {
    fn drop(&mut self) {
        if let Some(registry) = self.registry.upgrade() {
            registry.remove(self.id);
        }
    }
}

impl std::fmt::Debug for AuthSubscription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthSubscription")
            .field("id", &self.id)
            .finish()
    }
}
