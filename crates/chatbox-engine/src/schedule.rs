//! Single-threaded delayed task queue.
//!
//! Tasks are ordered by due time, then by the order they were scheduled.
//! Nothing runs on its own: the owner calls [`ReplyQueue::pop_due`] from its
//! event loop and applies each payload.

use std::collections::{BTreeMap, HashMap};
use std::time::Instant;

/// Handle for a scheduled task, usable to cancel it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TaskId(u64);

/// Queue of payloads waiting for their due time.
#[derive(Debug)]
pub struct ReplyQueue<T> {
    tasks: BTreeMap<(Instant, TaskId), T>,
    due_by_id: HashMap<TaskId, Instant>,
    next_seq: u64,
}

impl<T> Default for ReplyQueue<T> {
    fn default() -> Self {
        Self {
            tasks: BTreeMap::new(),
            due_by_id: HashMap::new(),
            next_seq: 0,
        }
    }
}

impl<T> ReplyQueue<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Schedule `payload` to become due at `due`.
    pub fn schedule(&mut self, due: Instant, payload: T) -> TaskId {
        let id = TaskId(self.next_seq);
        self.next_seq += 1;
        self.tasks.insert((due, id), payload);
        self.due_by_id.insert(id, due);
        id
    }

    /// Cancel a task. Returns `false` if it already ran or was cancelled.
    pub fn cancel(&mut self, id: TaskId) -> bool {
        match self.due_by_id.remove(&id) {
            Some(due) => self.tasks.remove(&(due, id)).is_some(),
            None => false,
        }
    }

    /// Remove and return the earliest task due at or before `now`.
    pub fn pop_due(&mut self, now: Instant) -> Option<(TaskId, T)> {
        let (&(due, id), _) = self.tasks.first_key_value()?;
        if due > now {
            return None;
        }
        self.due_by_id.remove(&id);
        self.tasks.remove(&(due, id)).map(|payload| (id, payload))
    }

    /// Due time of the earliest pending task.
    pub fn next_due(&self) -> Option<Instant> {
        self.tasks.keys().next().map(|(due, _)| *due)
    }

    /// Drop every pending task, returning how many were dropped.
    pub fn clear(&mut self) -> usize {
        let dropped = self.tasks.len();
        self.tasks.clear();
        self.due_by_id.clear();
        dropped
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }
}
