//! Connected-group discovery
//!
//! Breadth-first reachability over the ring's circular adjacency. The result
//! is a plain set, so traversal order never shows up in the answer.

use std::collections::VecDeque;

use super::state::{RingState, Selection};
use crate::wrap_index;

/// Collect the maximal contiguous run of occupied slots reachable from
/// `start` by `+/-1 mod N` adjacency.
///
/// Returns an empty set if `start` is empty or off the ring; checking the
/// precondition is the caller's job.
pub fn connected_group(state: &RingState, start: usize) -> Selection {
    let n = state.slot_count();
    let mut group = Selection::new();
    if start >= n || state.slots[start].is_none() {
        return group;
    }

    let mut visited = vec![false; n];
    let mut queue = VecDeque::new();
    visited[start] = true;
    queue.push_back(start);

    while let Some(slot) = queue.pop_front() {
        group.insert(slot);
        for delta in [-1isize, 1] {
            let neighbor = wrap_index(slot as isize + delta, n);
            if !visited[neighbor] && state.slots[neighbor].is_some() {
                visited[neighbor] = true;
                queue.push_back(neighbor);
            }
        }
    }

    group
}
