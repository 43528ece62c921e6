//! In-flight request bookkeeping.
//!
//! All mutation happens on the owning connection's serialized context, so the
//! map itself is the only concurrency control. A request leaves the map exactly
//! once: on completion through [`RequestTracker::untrack`], or on teardown
//! through [`RequestTracker::cancel_all`].

use std::collections::HashMap;

use super::engine::{AbortRequest, RequestId};

/// Set of in-flight requests and their abort handles.
#[derive(Debug)]
pub struct RequestTracker<H> {
    requests: HashMap<RequestId, H>,
    next_id: u64,
}

impl<H> Default for RequestTracker<H> {
    fn default() -> Self {
        Self::new()
    }
}

impl<H> RequestTracker<H> {
    /// Create an empty tracker.
    pub fn new() -> Self {
        Self {
            requests: HashMap::new(),
            next_id: 0,
        }
    }

    /// Allocate a fresh request id.
    pub fn next_id(&mut self) -> RequestId {
        let id = RequestId::new(self.next_id);
        self.next_id = self.next_id.wrapping_add(1);
        id
    }

    /// Start tracking `handle` under `id`.
    ///
    /// Returns `false` and leaves the existing entry in place if `id` is
    /// already tracked.
    pub fn track(&mut self, id: RequestId, handle: H) -> bool {
        if self.requests.contains_key(&id) {
            return false;
        }
        self.requests.insert(id, handle);
        true
    }

    /// Stop tracking `id`.
    ///
    /// Returns whether it was tracked. A `false` result marks a late
    /// completion that must be ignored.
    pub fn untrack(&mut self, id: RequestId) -> bool {
        self.requests.remove(&id).is_some()
    }

    /// Number of in-flight requests.
    pub fn len(&self) -> usize {
        self.requests.len()
    }

    /// Check if nothing is in flight.
    pub fn is_empty(&self) -> bool {
        self.requests.is_empty()
    }
}

impl<H: AbortRequest> RequestTracker<H> {
    /// Abort and release every tracked request.
    ///
    /// Returns the number of requests aborted.
    pub fn cancel_all(&mut self) -> usize {
        let count = self.requests.len();
        for (_, handle) in self.requests.drain() {
            handle.abort();
        }
        count
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    struct Handle {
        id: u64,
        aborted: Rc<RefCell<Vec<u64>>>,
    }

    impl AbortRequest for Handle {
        fn abort(self) {
            self.aborted.borrow_mut().push(self.id);
        }
    }

    fn handle(id: u64, aborted: &Rc<RefCell<Vec<u64>>>) -> Handle {
        Handle {
            id,
            aborted: Rc::clone(aborted),
        }
    }

    #[test]
    fn test_track_untrack() {
        let aborted = Rc::new(RefCell::new(Vec::new()));
        let mut tracker = RequestTracker::new();

        let id = tracker.next_id();
        assert!(tracker.track(id, handle(1, &aborted)));
        assert_eq!(tracker.len(), 1);

        assert!(tracker.untrack(id));
        assert!(!tracker.untrack(id));
        assert!(tracker.is_empty());
        assert!(aborted.borrow().is_empty());
    }

    #[test]
    fn test_no_duplicates() {
        let aborted = Rc::new(RefCell::new(Vec::new()));
        let mut tracker = RequestTracker::new();

        let id = tracker.next_id();
        assert!(tracker.track(id, handle(1, &aborted)));
        assert!(!tracker.track(id, handle(2, &aborted)));
        assert_eq!(tracker.len(), 1);

        tracker.cancel_all();
        assert_eq!(*aborted.borrow(), vec![1]);
    }

    #[test]
    fn test_ids_unique() {
        let mut tracker: RequestTracker<Handle> = RequestTracker::new();
        let a = tracker.next_id();
        let b = tracker.next_id();
        assert_ne!(a, b);
    }

    #[test]
    fn test_cancel_all() {
        let aborted = Rc::new(RefCell::new(Vec::new()));
        let mut tracker = RequestTracker::new();

        for n in 0..3 {
            let id = tracker.next_id();
            tracker.track(id, handle(n, &aborted));
        }

        assert_eq!(tracker.cancel_all(), 3);
        assert!(tracker.is_empty());

        let mut seen = aborted.borrow().clone();
        seen.sort();
        assert_eq!(seen, vec![0, 1, 2]);

        assert_eq!(tracker.cancel_all(), 0);
        assert_eq!(aborted.borrow().len(), 3);
    }
}
