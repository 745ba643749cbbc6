//! Profiler State
//!
//! Flags controlling the optional side channels, plus the per-pass pending
//! highlight set. The engine writes during traversal; the profiling
//! subsystem reads and clears between passes.

use std::hash::Hash;

use indexmap::IndexSet;

/// Shared profiling switches and the pending highlight queue.
#[derive(Debug)]
pub struct ProfilerState<P> {
    /// Master switch for timing capture and render reasons.
    pub profiling: bool,
    /// Emit render-reason records; only meaningful while `profiling` is on.
    pub capture_reasons: bool,
    /// Feed the update-highlight overlay.
    pub highlight_updates: bool,
    /// Record commit statistics.
    pub record_stats: bool,
    pending_highlights: IndexSet<P>,
}

impl<P: Clone + Eq + Hash> ProfilerState<P> {
    pub fn new() -> Self {
        Self {
            profiling: false,
            capture_reasons: false,
            highlight_updates: false,
            record_stats: false,
            pending_highlights: IndexSet::new(),
        }
    }

    /// Queue a platform element for a highlight flash. Duplicates within
    /// one pass are dropped; returns whether the element was newly queued.
    pub(crate) fn queue_highlight(&mut self, handle: P) -> bool {
        self.pending_highlights.insert(handle)
    }

    /// Elements awaiting a highlight, in first-queued order.
    pub fn pending_highlights(&self) -> impl Iterator<Item = &P> {
        self.pending_highlights.iter()
    }

    /// Take and clear the pending set. The overlay subsystem calls this
    /// once it has measured the elements; the next pass dedupes afresh.
    pub fn drain_highlights(&mut self) -> Vec<P> {
        self.pending_highlights.drain(..).collect()
    }
}

impl<P: Clone + Eq + Hash> Default for ProfilerState<P> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_highlights_dedupe_within_a_pass() {
        let mut profiler: ProfilerState<u32> = ProfilerState::new();
        assert!(profiler.queue_highlight(7));
        assert!(!profiler.queue_highlight(7));
        assert!(profiler.queue_highlight(9));
        assert_eq!(profiler.drain_highlights(), vec![7, 9]);
    }

    #[test]
    fn test_drain_clears_for_the_next_pass() {
        let mut profiler: ProfilerState<u32> = ProfilerState::new();
        profiler.queue_highlight(7);
        profiler.drain_highlights();
        assert_eq!(profiler.pending_highlights().count(), 0);
        assert!(profiler.queue_highlight(7));
    }
}
