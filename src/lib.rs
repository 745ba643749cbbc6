//! Treescope: Render-Pass Observation and Commit Encoding
//!
//! Observes live UI component trees through a capability seam, diffs each
//! completed render pass against the previously observed state and encodes
//! the difference as a compact integer operation stream consumers replay
//! to mirror the tree.

pub mod bindings;
pub mod cli;
pub mod commit;
pub mod error;
pub mod filter;
pub mod hoc;
pub mod ids;
pub mod logging;
pub mod memtree;
pub mod profiler;
pub mod reasons;
pub mod replay;
pub mod stats;
pub mod strings;
pub mod timings;
pub mod traverse;
