//! Pass Timings
//!
//! Hosts capture start/end timestamps per node while rendering and hand the
//! finished map to the engine before a pass is walked. Presence of an entry
//! is the signal that a node actually did render work this pass; structural
//! updates without work carry no entry.

use std::collections::HashMap;
use std::hash::Hash;

/// Start/end of one node's render work, in the host's clock units
/// (milliseconds by convention).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Span {
    pub start: f64,
    pub end: f64,
}

/// Per-pass timing input keyed by node handle.
#[derive(Debug)]
pub struct PassTimings<N> {
    spans: HashMap<N, Span>,
}

impl<N: Eq + Hash> PassTimings<N> {
    pub fn new() -> Self {
        Self {
            spans: HashMap::new(),
        }
    }

    pub fn record(&mut self, node: N, start: f64, end: f64) {
        self.spans.insert(node, Span { start, end });
    }

    /// Whether the node produced render work this pass.
    pub fn did_render(&self, node: &N) -> bool {
        self.spans.contains_key(node)
    }

    /// Render span length, 0.0 when the node did not render.
    pub fn duration(&self, node: &N) -> f64 {
        self.spans
            .get(node)
            .map(|span| span.end - span.start)
            .unwrap_or(0.0)
    }

    pub fn len(&self) -> usize {
        self.spans.len()
    }

    pub fn is_empty(&self) -> bool {
        self.spans.is_empty()
    }
}

impl<N: Eq + Hash> Default for PassTimings<N> {
    fn default() -> Self {
        Self::new()
    }
}
