use std::cmp::Ordering;
use std::collections::BinaryHeap;

use crate::beachline::ArcId;
use crate::Point;

/// Identifies an event pushed into an [EventQueue]. Ids are handed out in insertion order.
pub(crate) type EventId = usize;

#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) enum Event {
    /// The sweep line reaches a site.
    Site(usize),

    /// The sweep line reaches the top of the circle through the sites of `arc` and its two neighbors.
    /// `center` is the Voronoi vertex created if the event is still valid when popped.
    Circle { arc: ArcId, center: Point },
}

#[derive(Debug)]
struct QueuedEvent {
    y: f64,
    x: f64,
    id: EventId,
    event: Event,
}

impl PartialEq for QueuedEvent {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for QueuedEvent {}

impl PartialOrd for QueuedEvent {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for QueuedEvent {
    // BinaryHeap is a max-heap, reverse everything so the smallest (y, x, id) is on top
    fn cmp(&self, other: &Self) -> Ordering {
        other.y.total_cmp(&self.y)
            .then_with(|| other.x.total_cmp(&self.x))
            .then_with(|| other.id.cmp(&self.id))
    }
}

/// Priority queue of sweep events ordered by y, then x, then insertion order.
///
/// Circle events are never removed from the heap. Invalidating one flips its flag and [EventQueue::pop] discards it.
#[derive(Debug, Default)]
pub(crate) struct EventQueue {
    heap: BinaryHeap<QueuedEvent>,
    valid: Vec<bool>,
    popped: usize,
}

impl EventQueue {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            heap: BinaryHeap::with_capacity(capacity),
            valid: Vec::with_capacity(capacity),
            popped: 0,
        }
    }

    fn push(&mut self, position: Point, event: Event) -> EventId {
        let id = self.valid.len();
        self.valid.push(true);
        // adding zero turns -0.0 into 0.0 so both sort together
        self.heap.push(QueuedEvent { y: position.y + 0.0, x: position.x + 0.0, id, event });
        id
    }

    pub fn push_site(&mut self, site: usize, position: Point) -> EventId {
        self.push(position, Event::Site(site))
    }

    /// Schedules a circle event for `arc`, happening when the sweep line reaches `y`.
    pub fn push_circle(&mut self, arc: ArcId, center: Point, y: f64) -> EventId {
        self.push(Point { x: center.x, y }, Event::Circle { arc, center })
    }

    /// Marks a previously pushed event as stale.
    pub fn invalidate(&mut self, id: EventId) {
        if let Some(valid) = self.valid.get_mut(id) {
            *valid = false;
        }
    }

    /// Removes the next valid event, returning its id, the sweep position it happens at and the event itself.
    pub fn pop(&mut self) -> Option<(EventId, f64, Event)> {
        while let Some(queued) = self.heap.pop() {
            self.popped += 1;
            if self.valid[queued.id] {
                self.valid[queued.id] = false;
                return Some((queued.id, queued.y, queued.event));
            }
        }

        None
    }

    /// Number of events removed from the queue so far, stale ones included.
    pub fn popped(&self) -> usize {
        self.popped
    }

    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }
}
