//! Effect runner around the list reducer.
//!
//! [`ResourceList`] owns the state slot and the generation counter. Issuing a
//! generation, reading the dependency key and applying `FetchStarted` happen
//! under one lock, so the last fetch *issued* is the one that wins no matter
//! which response resolves last.

use std::future::Future;
use std::sync::{Mutex, MutexGuard, PoisonError};

use catalogix_core::ListBody;
use tracing::{debug, error};

use crate::api::ApiError;

use super::state::{Generation, ListEvent, ListState, reduce};

/// A fetch that has been issued but not yet completed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ticket<K> {
    pub generation: Generation,
    pub key: K,
}

/// What happened to a fetch cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchOutcome {
    /// The result was applied to the state.
    Applied,
    /// A newer fetch was issued meanwhile; the result was dropped.
    Stale,
    /// No dependency key was available, so nothing was fetched.
    Skipped,
}

#[derive(Debug)]
struct Slot<T> {
    state: ListState<T>,
    issued: Generation,
}

/// State slot for one resource collection.
#[derive(Debug)]
pub struct ResourceList<T> {
    slot: Mutex<Slot<T>>,
    fetch_failed: &'static str,
}

impl<T: Clone> ResourceList<T> {
    /// Create an idle list. `fetch_failed` is the message shown when a fetch
    /// fails.
    #[must_use]
    pub const fn new(fetch_failed: &'static str) -> Self {
        Self {
            slot: Mutex::new(Slot {
                state: ListState::Idle,
                issued: 0,
            }),
            fetch_failed,
        }
    }

    /// Current state.
    #[must_use]
    pub fn snapshot(&self) -> ListState<T> {
        self.lock().state.clone()
    }

    /// Drop back to `Idle`, invalidating every fetch in flight.
    pub fn reset(&self) {
        let mut slot = self.lock();
        slot.issued += 1;
        slot.state = reduce(std::mem::take(&mut slot.state), ListEvent::Reset);
    }

    /// Issue a fetch for the key returned by `key`.
    ///
    /// `key` runs under the lock. If it yields `None` the list is reset and
    /// no ticket is issued.
    pub fn begin<K>(&self, key: impl FnOnce() -> Option<K>) -> Option<Ticket<K>> {
        let mut slot = self.lock();
        slot.issued += 1;
        let Some(key) = key() else {
            slot.state = reduce(std::mem::take(&mut slot.state), ListEvent::Reset);
            return None;
        };

        let generation = slot.issued;
        slot.state = reduce(
            std::mem::take(&mut slot.state),
            ListEvent::FetchStarted { generation },
        );
        Some(Ticket { generation, key })
    }

    /// Apply the result of the fetch identified by `generation`.
    pub fn complete(
        &self,
        generation: Generation,
        result: Result<ListBody<T>, ApiError>,
    ) -> FetchOutcome {
        let mut slot = self.lock();
        if slot.issued != generation {
            debug!(generation, latest = slot.issued, "Dropping stale list response");
            return FetchOutcome::Stale;
        }

        let event = match result {
            Ok(body) => ListEvent::FetchSucceeded { generation, body },
            Err(e) => {
                error!(error = %e, generation, "List fetch failed");
                ListEvent::FetchFailed {
                    generation,
                    message: self.fetch_failed,
                }
            }
        };
        slot.state = reduce(std::mem::take(&mut slot.state), event);
        FetchOutcome::Applied
    }

    /// Run one fetch cycle: issue, await `fetch`, apply.
    pub async fn run<K, F, Fut>(&self, key: impl FnOnce() -> Option<K>, fetch: F) -> FetchOutcome
    where
        F: FnOnce(K) -> Fut,
        Fut: Future<Output = Result<ListBody<T>, ApiError>>,
    {
        let Some(ticket) = self.begin(key) else {
            return FetchOutcome::Skipped;
        };
        let result = fetch(ticket.key).await;
        self.complete(ticket.generation, result)
    }

    fn lock(&self) -> MutexGuard<'_, Slot<T>> {
        // The slot is only touched by the reducer, which cannot panic midway.
        self.slot.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
