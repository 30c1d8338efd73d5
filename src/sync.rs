//! Change notification between a catalog session and everything else that
//! writes to the same storage slot.
//!
//! Inbound: the persistence collaborator reports writes made by other sessions
//! as a [`StorageEvent`] passed to
//! [`CatalogStore::handle_storage_event`](crate::catalog_state::CatalogStore::handle_storage_event).
//! Hosts with no such notification drive a [`StorageWatcher`] from their own
//! loop instead.
//!
//! Outbound: listeners registered with
//! [`CatalogStore::subscribe`](crate::catalog_state::CatalogStore::subscribe)
//! receive a [`CatalogEvent`] after every change that reached storage.

use std::time::{Duration, Instant};

use log::debug;

use crate::catalog_model::Product;
use crate::catalog_state::CatalogStore;
use crate::error::CatalogResult;
use crate::storage::KeyValueStorage;

/// A write to the shared storage made outside this session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StorageEvent {
    pub key: String,
}

impl StorageEvent {
    pub fn new(key: impl Into<String>) -> Self {
        Self { key: key.into() }
    }
}

/// A catalog change that has been persisted.
#[derive(Debug, Clone, PartialEq)]
pub enum CatalogEvent {
    Added(Product),
    Updated(Product),
    Deleted(Product),
    /// The collection was replaced by the seed list.
    Reset,
    /// The collection was replaced by what another session stored.
    Reloaded { count: usize },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SubscriptionId(pub(crate) u64);

pub type CatalogListener = Box<dyn FnMut(&CatalogEvent)>;

/// Interval-driven reload for hosts without storage change events.
///
/// The watcher owns no thread or timer; the host calls [`tick`](Self::tick)
/// from its event loop and the watcher decides whether a reload is due.
#[derive(Debug, Clone)]
pub struct StorageWatcher {
    interval: Duration,
    last_poll: Option<Instant>,
}

impl StorageWatcher {
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            last_poll: None,
        }
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    pub fn is_due(&self, now: Instant) -> bool {
        match self.last_poll {
            Some(last) => now.saturating_duration_since(last) >= self.interval,
            None => true,
        }
    }

    /// Reloads the store if the interval has elapsed since the last poll.
    ///
    /// Returns `true` if the store adopted new data.
    pub fn tick<S: KeyValueStorage>(
        &mut self,
        store: &mut CatalogStore<S>,
        now: Instant,
    ) -> CatalogResult<bool> {
        if !self.is_due(now) {
            return Ok(false);
        }
        self.last_poll = Some(now);
        debug!("Polling catalog storage for external changes");
        store.reload_from_storage()
    }
}
