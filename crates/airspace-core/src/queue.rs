//! Bounded binary max-heap of aircraft keyed by urgency.

use tracing::trace;

use crate::error::MonitorError;
use crate::models::Aircraft;

fn parent(child: usize) -> usize {
    (child - 1) / 2
}

fn left(parent: usize) -> usize {
    parent * 2 + 1
}

fn right(parent: usize) -> usize {
    parent * 2 + 2
}

/// Heap slot: an aircraft plus the priority it was inserted with.
#[derive(Debug, Clone)]
struct HeapNode {
    aircraft: Aircraft,
    priority: f64,
}

/// Array-backed max-heap with a fixed capacity.
///
/// The backing storage is allocated once at construction and never grows;
/// inserting into a full heap is rejected with
/// [`MonitorError::CapacityExceeded`] and leaves the heap untouched.
#[derive(Debug, Clone)]
pub struct PriorityHeap {
    nodes: Vec<HeapNode>,
    capacity: usize,
}

impl PriorityHeap {
    pub fn new(capacity: usize) -> Self {
        Self {
            nodes: Vec::with_capacity(capacity),
            capacity,
        }
    }

    /// Insert an aircraft with `priority = urgency` and sift it up.
    pub fn insert(&mut self, aircraft: Aircraft) -> Result<(), MonitorError> {
        if self.is_full() {
            return Err(MonitorError::CapacityExceeded {
                capacity: self.capacity,
            });
        }

        let priority = aircraft.urgency;
        self.nodes.push(HeapNode { aircraft, priority });

        let mut current = self.nodes.len() - 1;
        while current > 0 {
            let parent = parent(current);
            if self.nodes[current].priority <= self.nodes[parent].priority {
                break;
            }
            self.nodes.swap(current, parent);
            current = parent;
        }
        trace!(size = self.nodes.len(), slot = current, "heap insert");
        Ok(())
    }

    /// Remove and return the highest-priority aircraft.
    pub fn extract_max(&mut self) -> Result<Aircraft, MonitorError> {
        if self.nodes.is_empty() {
            return Err(MonitorError::EmptyQueue);
        }

        let root = self.nodes.swap_remove(0);
        self.sift_down(0);
        Ok(root.aircraft)
    }

    /// Highest-priority aircraft without removing it.
    pub fn peek_max(&self) -> Result<&Aircraft, MonitorError> {
        self.nodes
            .first()
            .map(|node| &node.aircraft)
            .ok_or(MonitorError::EmptyQueue)
    }

    pub fn size(&self) -> usize {
        self.nodes.len()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn is_full(&self) -> bool {
        self.nodes.len() >= self.capacity
    }

    /// Held aircraft in storage order (not priority order).
    pub fn iter(&self) -> impl Iterator<Item = &Aircraft> {
        self.nodes.iter().map(|node| &node.aircraft)
    }

    // On equal child priorities the right child wins.
    fn sift_down(&mut self, mut current: usize) {
        let len = self.nodes.len();
        while left(current) < len {
            let left_child = left(current);
            let right_child = right(current);
            let larger = if right_child < len
                && self.nodes[right_child].priority >= self.nodes[left_child].priority
            {
                right_child
            } else {
                left_child
            };

            if self.nodes[larger].priority <= self.nodes[current].priority {
                break;
            }
            self.nodes.swap(current, larger);
            current = larger;
        }
    }

    #[cfg(test)]
    fn satisfies_heap_property(&self) -> bool {
        (1..self.nodes.len()).all(|i| self.nodes[parent(i)].priority >= self.nodes[i].priority)
    }
}
