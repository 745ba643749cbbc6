//! Commit Statistics
//!
//! Optional per-commit counters for the profiler's statistics panel:
//! mount/update/unmount totals, per-category node counts with child-count
//! samples, and how parents key their children for reconciliation.

use serde::Serialize;

use crate::bindings::TreeBindings;

/// How one parent's children are keyed, folded over the child list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ChildDiff {
    /// No children observed yet.
    #[default]
    Unknown,
    Keyed,
    Unkeyed,
    Mixed,
}

impl ChildDiff {
    /// Fold one child's keyedness into the running classification.
    pub fn observe(self, keyed: bool) -> ChildDiff {
        match (self, keyed) {
            (ChildDiff::Unknown, true) => ChildDiff::Keyed,
            (ChildDiff::Unknown, false) => ChildDiff::Unkeyed,
            (ChildDiff::Keyed, false) | (ChildDiff::Unkeyed, true) => ChildDiff::Mixed,
            (other, _) => other,
        }
    }
}

/// Totals plus a child-count sample per counted node.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct GroupStats {
    pub total: u32,
    pub children: Vec<u32>,
}

impl GroupStats {
    fn record(&mut self, child_count: u32) {
        self.total += 1;
        self.children.push(child_count);
    }
}

/// Counters for one commit; created only when stats recording is on.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CommitStats {
    /// Nodes visited by the mount path, hidden ones included.
    pub mounts: u32,
    /// Nodes visited by the update path, whether or not they re-rendered.
    pub updates: u32,
    /// Subtree tops queued for removal by child-list diffing; descendants
    /// are dropped with them and not counted.
    pub unmounts: u32,
    pub roots: GroupStats,
    pub components: GroupStats,
    pub elements: GroupStats,
    pub fragments: GroupStats,
    pub text: u32,
    /// Parents whose children all carry reconciliation keys.
    pub keyed: u32,
    /// Parents whose children carry no keys.
    pub unkeyed: u32,
    /// Parents mixing keyed and unkeyed children.
    pub mixed: u32,
}

impl CommitStats {
    /// Record the pass subject being a root, with its raw child slot
    /// count. Holes count; the sample sizes the child list as allocated.
    pub fn record_root(&mut self, child_count: u32) {
        self.roots.record(child_count);
    }

    /// Classify one traversed node into its category counters. Runs for
    /// hidden nodes too; the panel counts what exists, not what is shown.
    pub fn record_node<B: TreeBindings>(&mut self, bindings: &B, node: &B::Node) {
        let child_count = bindings.children(node).iter().flatten().count() as u32;
        if bindings.is_text(node) {
            self.text += 1;
        } else if bindings.is_composite(node) {
            self.components.record(child_count);
        } else if bindings.is_grouping(node) || bindings.is_root(node) {
            self.fragments.record(child_count);
        } else {
            self.elements.record(child_count);
        }
    }

    /// Record one parent's finished child-diff classification.
    pub fn record_diff(&mut self, diff: ChildDiff) {
        match diff {
            ChildDiff::Keyed => self.keyed += 1,
            ChildDiff::Unkeyed => self.unkeyed += 1,
            ChildDiff::Mixed => self.mixed += 1,
            ChildDiff::Unknown => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_child_diff_folds_to_mixed() {
        let mut diff = ChildDiff::default();
        assert_eq!(diff, ChildDiff::Unknown);
        diff = diff.observe(true);
        assert_eq!(diff, ChildDiff::Keyed);
        diff = diff.observe(true);
        assert_eq!(diff, ChildDiff::Keyed);
        diff = diff.observe(false);
        assert_eq!(diff, ChildDiff::Mixed);
        assert_eq!(diff.observe(true), ChildDiff::Mixed);
    }

    #[test]
    fn test_unknown_diff_is_not_counted() {
        let mut stats = CommitStats::default();
        stats.record_diff(ChildDiff::Unknown);
        stats.record_diff(ChildDiff::Unkeyed);
        stats.record_diff(ChildDiff::Keyed);
        assert_eq!(stats.keyed, 1);
        assert_eq!(stats.unkeyed, 1);
        assert_eq!(stats.mixed, 0);
    }

    #[test]
    fn test_root_child_counts_are_sampled() {
        let mut stats = CommitStats::default();
        stats.record_root(3);
        stats.record_root(1);
        assert_eq!(stats.roots.total, 2);
        assert_eq!(stats.roots.children, vec![3, 1]);
    }
}
