//! Browse-mode place selection and the stale-response guard.
//!
//! Selection is a two-state machine: `Idle` or `Selected(place)`. Clicking a marker
//! selects its place (replacing any earlier selection), clicking the map background goes
//! back to `Idle`. Clicking the marker that is already selected keeps it selected.
//!
//! Fetches started from a selection are tracked with a [`RequestSlot`]: every new request
//! supersedes the previous one, and a response is only kept if it belongs to the request
//! that is current when it arrives.

use terrace_types::PlaceId;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Selection {
    #[default]
    Idle,
    Selected(PlaceId),
}

impl Selection {
    /// Marker click. Returns true if the selection changed.
    pub fn click_marker(&mut self, place_id: PlaceId) -> bool {
        let next = Selection::Selected(place_id);
        let changed = *self != next;
        *self = next;
        changed
    }

    /// Background click. Returns true if something was selected before.
    pub fn click_background(&mut self) -> bool {
        let changed = *self != Selection::Idle;
        *self = Selection::Idle;
        changed
    }

    pub fn reset(&mut self) {
        *self = Selection::Idle;
    }

    pub fn selected(&self) -> Option<PlaceId> {
        match self {
            Selection::Idle => None,
            Selection::Selected(id) => Some(*id),
        }
    }
}

/// Proof that a request was started for `key`. Hand it back with the response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ticket<K> {
    key: K,
    generation: u64,
}

impl<K> Ticket<K> {
    pub fn key(&self) -> &K {
        &self.key
    }
}

/// Holds the result of the most recent request for a keyed resource.
#[derive(Debug, Clone)]
pub struct RequestSlot<K, T> {
    generation: u64,
    key: Option<K>,
    value: Option<T>,
}

impl<K, T> Default for RequestSlot<K, T> {
    fn default() -> Self {
        Self {
            generation: 0,
            key: None,
            value: None,
        }
    }
}

impl<K: Clone + PartialEq + std::fmt::Debug, T> RequestSlot<K, T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts a request for `key`, superseding any request still in flight and dropping
    /// the previously committed value.
    pub fn begin(&mut self, key: K) -> Ticket<K> {
        self.generation += 1;
        self.key = Some(key.clone());
        self.value = None;
        Ticket {
            key,
            generation: self.generation,
        }
    }

    /// Commits `value` if `ticket` is still the current request. Returns false and drops
    /// the value otherwise.
    pub fn complete(&mut self, ticket: Ticket<K>, value: T) -> bool {
        if ticket.generation != self.generation {
            tracing::debug!("discarding stale response for {:?}", ticket.key);
            return false;
        }
        self.value = Some(value);
        true
    }

    /// Forgets the current key and value; outstanding tickets become stale.
    pub fn clear(&mut self) {
        self.generation += 1;
        self.key = None;
        self.value = None;
    }

    pub fn key(&self) -> Option<&K> {
        self.key.as_ref()
    }

    pub fn value(&self) -> Option<&T> {
        self.value.as_ref()
    }

    pub fn take_value(&mut self) -> Option<T> {
        self.value.take()
    }

    /// A request has been started and has not completed yet.
    pub fn is_pending(&self) -> bool {
        self.key.is_some() && self.value.is_none()
    }
}
