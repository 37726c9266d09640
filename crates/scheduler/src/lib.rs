//! # Scheduler Crate
//!
//! Event loop for the page host. Implements macro/micro task queues over an
//! arbitrary task payload; the page decides what a task means.
//! **Zero external dependencies.**

#![forbid(unsafe_code)]

use std::collections::VecDeque;

// ─────────────────────────────────────────────────────────────────────────────
// EventLoop
// ─────────────────────────────────────────────────────────────────────────────

/// A single-threaded event loop modeled after the HTML event loop.
///
/// Each call to [`tick`](EventLoop::tick) processes:
/// 1. One macro-task is dequeued.
/// 2. All pending micro-tasks are drained.
///
/// Micro-tasks posted while the returned tasks run are picked up by
/// [`drain_microtasks`](EventLoop::drain_microtasks) or the next tick.
pub struct EventLoop<T> {
    macro_queue: VecDeque<T>,
    micro_queue: VecDeque<T>,
    ticks: u64,
}

impl<T> EventLoop<T> {
    /// Create a new, empty event loop.
    pub fn new() -> Self {
        Self {
            macro_queue: VecDeque::new(),
            micro_queue: VecDeque::new(),
            ticks: 0,
        }
    }

    /// Enqueue a macro-task.
    pub fn post_task(&mut self, task: T) {
        self.macro_queue.push_back(task);
    }

    /// Enqueue a micro-task.
    pub fn post_microtask(&mut self, task: T) {
        self.micro_queue.push_back(task);
    }

    /// Advance the loop by one tick and return the tasks to run, in order.
    pub fn tick(&mut self) -> Vec<T> {
        self.ticks += 1;
        let mut result: Vec<T> = Vec::new();
        if let Some(task) = self.macro_queue.pop_front() {
            result.push(task);
        }
        result.extend(self.drain_microtasks());
        result
    }

    /// Pop the next macro-task alone, counting it as a tick. Pending
    /// micro-tasks stay queued.
    pub fn next_task(&mut self) -> Option<T> {
        let task = self.macro_queue.pop_front()?;
        self.ticks += 1;
        Some(task)
    }

    /// Pop the next micro-task, if any.
    pub fn next_microtask(&mut self) -> Option<T> {
        self.micro_queue.pop_front()
    }

    /// Drain and return all pending micro-tasks.
    pub fn drain_microtasks(&mut self) -> Vec<T> {
        self.micro_queue.drain(..).collect()
    }

    /// Returns `true` if there are any pending tasks or micro-tasks.
    pub fn has_pending_work(&self) -> bool {
        !self.macro_queue.is_empty() || !self.micro_queue.is_empty()
    }

    /// Number of ticks run so far.
    pub fn tick_count(&self) -> u64 {
        self.ticks
    }

    /// Number of pending macro-tasks.
    pub fn macro_queue_len(&self) -> usize {
        self.macro_queue.len()
    }

    /// Number of pending micro-tasks.
    pub fn micro_queue_len(&self) -> usize {
        self.micro_queue.len()
    }
}

impl<T> Default for EventLoop<T> {
    fn default() -> Self {
        Self::new()
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_event_loop_is_empty() {
        let el: EventLoop<u32> = EventLoop::new();
        assert!(!el.has_pending_work());
        assert_eq!(el.macro_queue_len(), 0);
        assert_eq!(el.micro_queue_len(), 0);
    }

    #[test]
    fn one_macro_task_per_tick() {
        let mut el = EventLoop::new();
        el.post_task("render");
        el.post_task("rerender");
        assert_eq!(el.tick(), vec!["render"]);
        assert_eq!(el.tick(), vec!["rerender"]);
        assert!(!el.has_pending_work());
        assert_eq!(el.tick_count(), 2);
    }

    #[test]
    fn microtasks_drain_after_macro_task() {
        let mut el = EventLoop::new();
        el.post_task(1);
        el.post_microtask(10);
        el.post_microtask(11);
        assert_eq!(el.tick(), vec![1, 10, 11]);
    }

    #[test]
    fn microtasks_without_macrotask() {
        let mut el = EventLoop::new();
        el.post_microtask(50);
        assert_eq!(el.tick(), vec![50]);
    }

    #[test]
    fn next_microtask_is_fifo() {
        let mut el = EventLoop::new();
        el.post_microtask('a');
        el.post_microtask('b');
        assert_eq!(el.next_microtask(), Some('a'));
        assert_eq!(el.next_microtask(), Some('b'));
        assert_eq!(el.next_microtask(), None);
    }

    #[test]
    fn next_task_leaves_microtasks_queued() {
        let mut el = EventLoop::new();
        el.post_task("host");
        el.post_microtask("notify");
        assert_eq!(el.next_task(), Some("host"));
        assert_eq!(el.next_task(), None);
        assert_eq!(el.micro_queue_len(), 1);
        assert_eq!(el.tick_count(), 1);
    }
}
