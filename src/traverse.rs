//! Traversal Engine
//!
//! Walks one completed render pass and encodes the difference against the
//! previously observed state as a [`Commit`]. Mount introduces subtrees the
//! observer has never seen; update re-walks known subtrees, diffing child
//! lists positionally against the prior version; reordering resynchronizes
//! sibling order where the diff may have let it drift.
//!
//! Durations follow a two-pass scheme: every emitting operation reserves a
//! placeholder slot up front so the stream stays in traversal order, and the
//! slot is patched with the node's exclusive duration once its children have
//! been walked. A child that rendered subtracts its span from the nearest
//! visible ancestor's running tally, so ancestors never double-count work
//! done inside a child during the same pass.

use std::collections::{HashMap, HashSet, VecDeque};

use tracing::{debug, trace};

use crate::bindings::{resolve_kind, TreeBindings};
use crate::commit::{scale_duration, Commit};
use crate::filter::{FilterState, TypeFilter};
use crate::hoc;
use crate::ids::{Id, IdMap};
use crate::profiler::ProfilerState;
use crate::reasons::{ReasonInfo, RenderReason};
use crate::stats::{ChildDiff, CommitStats};
use crate::timings::PassTimings;

/// Cross-commit observer state for one tree lifecycle.
///
/// Owns the identity mapping, the set of known roots and the reverse lookup
/// cache from platform elements to hidden nodes. One recorder serves one
/// tree; invocations are serialized by contract.
pub struct Recorder<B: TreeBindings> {
    ids: IdMap<B::Key, B::Node>,
    roots: HashSet<B::Key>,
    platform_cache: HashMap<B::Platform, B::Key>,
}

impl<B: TreeBindings> Recorder<B> {
    pub fn new() -> Self {
        Self {
            ids: IdMap::new(),
            roots: HashSet::new(),
            platform_cache: HashMap::new(),
        }
    }

    /// Observe one completed render pass rooted at `node` and encode it.
    ///
    /// `timings` must be fully captured before the call; `reasons` carries
    /// reasons the host precomputed while diffing, keyed by current node
    /// handle, and wins over the post-hoc derivation.
    pub fn record_commit(
        &mut self,
        bindings: &B,
        node: &B::Node,
        filters: &FilterState,
        profiler: &mut ProfilerState<B::Platform>,
        timings: &PassTimings<B::Node>,
        reasons: Option<&HashMap<B::Node, ReasonInfo>>,
    ) -> Commit {
        let mut commit = Commit::new();
        if profiler.record_stats {
            commit.stats = Some(CommitStats::default());
        }

        let key = bindings.identity(node);
        let is_new = !self.ids.contains(&key);
        let is_root = bindings.is_root(node);

        let mut pass = Pass {
            bindings,
            ids: &mut self.ids,
            roots: &mut self.roots,
            platform_cache: &mut self.platform_cache,
            filters,
            profiler,
            timings,
            reasons,
            commit,
            tallies: HashMap::new(),
        };

        let parent_id = if is_root {
            pass.roots.insert(key);
            if let Some(stats) = pass.commit.stats.as_mut() {
                stats.record_root(bindings.children(node).len() as u32);
            }
            Id::NONE
        } else {
            pass.nearest_mapped_ancestor(node)
        };

        if is_new {
            pass.mount(node, parent_id, Vec::new());
        } else {
            pass.update(node, parent_id, Vec::new());
        }

        let mut commit = pass.commit;
        commit.root_id = self.resolve_root_id(bindings, node);
        debug!(
            root = %commit.root_id,
            ops = commit.ops.len(),
            unmounts = commit.unmount_ids.len(),
            strings = commit.strings.len(),
            mounted = is_new,
            "assembled commit"
        );
        commit
    }

    /// Root owning `node`: the node itself when registered as a root,
    /// otherwise the nearest root above it.
    fn resolve_root_id(&self, bindings: &B, node: &B::Node) -> Id {
        let key = bindings.identity(node);
        if self.roots.contains(&key) {
            return self.ids.id_for(&key);
        }
        let mut current = bindings.parent(node);
        while let Some(candidate) = current {
            if bindings.is_root(&candidate) {
                return self.ids.id_for(&bindings.identity(&candidate));
            }
            current = bindings.parent(&candidate);
        }
        Id::NONE
    }

    /// Hidden node a platform element resolves to, for the element picker.
    pub fn platform_lookup(&self, handle: &B::Platform) -> Option<&B::Key> {
        self.platform_cache.get(handle)
    }

    /// Drop a platform element's cache entry. Hosts call this from their
    /// element-teardown path; handles are plain values and nothing here
    /// expires on its own.
    pub fn evict_platform(&mut self, handle: &B::Platform) -> bool {
        self.platform_cache.remove(handle).is_some()
    }

    pub fn clear_platform_cache(&mut self) {
        self.platform_cache.clear();
    }

    /// Number of live id mappings.
    pub fn mapped_nodes(&self) -> usize {
        self.ids.len()
    }

    pub fn is_known_root(&self, key: &B::Key) -> bool {
        self.roots.contains(key)
    }
}

impl<B: TreeBindings> Default for Recorder<B> {
    fn default() -> Self {
        Self::new()
    }
}

/// Mutable state threaded through one pass's recursion.
struct Pass<'a, B: TreeBindings> {
    bindings: &'a B,
    ids: &'a mut IdMap<B::Key, B::Node>,
    roots: &'a mut HashSet<B::Key>,
    platform_cache: &'a mut HashMap<B::Platform, B::Key>,
    filters: &'a FilterState,
    profiler: &'a mut ProfilerState<B::Platform>,
    timings: &'a PassTimings<B::Node>,
    reasons: Option<&'a HashMap<B::Node, ReasonInfo>>,
    commit: Commit,
    /// Running exclusive-duration tally per id, for this pass only.
    tallies: HashMap<Id, f64>,
}

impl<'a, B: TreeBindings> Pass<'a, B> {
    /// Introduce a subtree the observer has never seen. Returns the id the
    /// parent links to, or [`Id::NONE`] when this node stayed hidden.
    fn mount(&mut self, node: &B::Node, ancestor: Id, mut pending: Vec<String>) -> Id {
        let bindings = self.bindings;
        let children = bindings.children(node);

        // Counts every node walked, hidden ones included; emission is a
        // separate question.
        if let Some(stats) = self.commit.stats.as_mut() {
            stats.mounts += 1;
        }

        if bindings.is_root(node) {
            let root_id = self.ids.get_or_create(bindings.identity(node), node.clone());
            let displayed = self.commit.add_root(root_id);
            if self.filters.hides(TypeFilter::Root) {
                let mut present = children.iter().flatten();
                let only = present.next().cloned();
                if let (Some(only), None) = (only, present.next()) {
                    let child_id = self.mount(&only, ancestor, pending);
                    self.commit.patch(displayed, child_id.0);
                    return child_id;
                }
            }
        }

        let skip = self.filters.should_hide(bindings, node);
        let raw_name = bindings.display_name(node);
        let kind = resolve_kind(bindings, node, &raw_name);
        let name = if self.filters.hides(TypeFilter::Hoc) {
            hoc::peel(raw_name, &mut pending)
        } else {
            raw_name
        };

        let mut own_id = Id::NONE;
        let mut duration_slot = None;
        if !skip {
            let id = self.ids.get_or_create(bindings.identity(node), node.clone());
            let duration = self.timings.duration(node);
            self.tallies.insert(id, duration);
            if let Some(parent_tally) = self.tallies.get_mut(&ancestor) {
                *parent_tally -= duration;
            }

            let element_key = bindings.element_key(node);
            duration_slot =
                Some(self.commit
                    .add_vnode(id, kind, ancestor, &name, element_key.as_deref()));
            self.commit.hoc_nodes(id, &pending);
            pending.clear();

            if self.profiler.profiling && self.profiler.capture_reasons {
                self.commit
                    .render_reason(id, &ReasonInfo::new(RenderReason::Mount));
            }
            self.maybe_highlight(node);
            own_id = id;
        } else if !bindings.is_composite(node) {
            // Hidden primitives stay reachable for the element picker.
            if let Some(handle) = bindings.platform_handle(node) {
                self.platform_cache.insert(handle, bindings.identity(node));
            }
        }

        let next_ancestor = if own_id.is_some() { own_id } else { ancestor };
        let mut diff = ChildDiff::default();
        for child in children.iter().flatten() {
            if self.commit.stats.is_some() {
                diff = diff.observe(bindings.element_key(child).is_some());
            }
            self.mount(child, next_ancestor, pending.clone());
        }

        if let Some(slot) = duration_slot {
            let tally = self.tallies.get(&own_id).copied().unwrap_or(0.0);
            self.commit.patch(slot, scale_duration(tally));
        }

        // Classification happens on the way out; a collapsed root returns
        // early above and is counted as a mount only.
        if let Some(stats) = self.commit.stats.as_mut() {
            stats.record_diff(diff);
            stats.record_node(bindings, node);
        }
        own_id
    }

    /// Re-walk a known subtree, diffing children positionally against the
    /// prior version of this node.
    fn update(&mut self, node: &B::Node, ancestor: Id, mut pending: Vec<String>) {
        let bindings = self.bindings;

        // Counts every node walked, hidden ones included; a node that turns
        // out to be unknown below also tallies as a mount when delegated.
        if let Some(stats) = self.commit.stats.as_mut() {
            stats.updates += 1;
        }

        if self.filters.should_hide(bindings, node) {
            // Hidden nodes keep no mapping; children attach to the same
            // visible ancestor.
            if self.filters.hides(TypeFilter::Hoc) {
                hoc::peel(bindings.display_name(node), &mut pending);
            }
            let mut diff = ChildDiff::default();
            for child in bindings.children(node).iter().flatten() {
                if self.commit.stats.is_some() {
                    diff = diff.observe(bindings.element_key(child).is_some());
                }
                self.update(child, ancestor, pending.clone());
            }
            if let Some(stats) = self.commit.stats.as_mut() {
                stats.record_diff(diff);
                stats.record_node(bindings, node);
            }
            return;
        }

        let key = bindings.identity(node);
        if !self.ids.contains(&key) {
            self.mount(node, ancestor, pending);
            return;
        }

        let id = self.ids.id_for(&key);
        let prior = self.ids.node_for(id).cloned();
        self.ids.reassign(id, key, node.clone());

        let mut duration_slot = None;
        if self.timings.did_render(node) {
            if self.filters.hides(TypeFilter::Hoc) {
                hoc::peel(bindings.display_name(node), &mut pending);
            }
            self.commit.hoc_nodes(id, &pending);
            pending.clear();

            let duration = self.timings.duration(node);
            self.tallies.insert(id, duration);
            if let Some(parent_tally) = self.tallies.get_mut(&ancestor) {
                *parent_tally -= duration;
            }
            duration_slot = Some(self.commit.update_timings(id));

            if self.profiler.profiling && self.profiler.capture_reasons {
                let info = self
                    .reasons
                    .and_then(|map| map.get(node).cloned())
                    .or_else(|| {
                        prior
                            .as_ref()
                            .and_then(|previous| bindings.render_reason(previous, node))
                    });
                if let Some(info) = info {
                    self.commit.render_reason(id, &info);
                }
            }
            self.maybe_highlight(node);
        }

        let old_children: Vec<Id> = match prior.as_ref() {
            Some(previous) => bindings
                .children(previous)
                .iter()
                .map(|slot| match slot {
                    Some(child) => self.ids.id_for(&bindings.identity(child)),
                    None => Id::NONE,
                })
                .collect(),
            None => Vec::new(),
        };

        let mut should_reorder = false;
        let mut diff = ChildDiff::default();
        for (index, slot) in bindings.children(node).iter().enumerate() {
            match slot {
                None => {
                    // A hole where a child used to be is an unmount.
                    if let Some(&old_id) = old_children.get(index) {
                        if old_id.is_some() {
                            self.queue_unmount(old_id);
                        }
                    }
                }
                Some(child) => {
                    if self.commit.stats.is_some() {
                        diff = diff.observe(bindings.element_key(child).is_some());
                    }
                    if self.ids.contains(&bindings.identity(child))
                        || self.filters.should_hide(bindings, child)
                    {
                        self.update(child, id, pending.clone());
                    } else {
                        self.mount(child, id, pending.clone());
                    }
                    should_reorder = true;
                }
            }
        }

        if let Some(slot) = duration_slot {
            let tally = self.tallies.get(&id).copied().unwrap_or(0.0);
            self.commit.patch(slot, scale_duration(tally));
        }

        if let Some(stats) = self.commit.stats.as_mut() {
            stats.record_diff(diff);
            stats.record_node(bindings, node);
        }

        if should_reorder {
            self.reset_children(id, node);
        }
    }

    /// Resynchronize the observer's sibling order for `node`.
    ///
    /// Suspense boundaries always resynchronize because their child lists
    /// swap wholesale between content and fallback; other nodes only emit
    /// when at least two children are visible, since order cannot drift
    /// with fewer.
    fn reset_children(&mut self, id: Id, node: &B::Node) {
        let bindings = self.bindings;
        if bindings.children(node).is_empty() {
            return;
        }
        let visible = self.filters.visible_children(bindings, node);
        let force = bindings.is_suspense(node);
        if !force && visible.len() < 2 {
            return;
        }
        let mut ordered = Vec::with_capacity(visible.len());
        for child in &visible {
            let child_id = self.ids.id_for(&bindings.identity(child));
            if child_id.is_some() {
                ordered.push(child_id);
            } else {
                debug_assert!(false, "reorder references an unmapped child");
            }
        }
        self.commit.reorder_children(id, &ordered);
        trace!(%id, children = ordered.len(), "reordered children");
    }

    /// Queue an unmount and evict the whole subtree's mappings immediately,
    /// so any of its logical nodes reappearing later mounts under a fresh
    /// id. Only the top id travels on the wire; consumers drop descendants
    /// with it. The walk follows prior handles and continues through hidden
    /// nodes, which carry no mapping but may cover mapped descendants.
    fn queue_unmount(&mut self, id: Id) {
        self.commit.queue_unmount(id);
        let bindings = self.bindings;
        let mut stack = Vec::new();
        if let Some((key, node)) = self.ids.remove(id) {
            self.roots.remove(&key);
            stack.push(node);
        }
        while let Some(node) = stack.pop() {
            for child in bindings.children(&node).iter().flatten() {
                let child_id = self.ids.id_for(&bindings.identity(child));
                if child_id.is_some() {
                    if let Some((key, _)) = self.ids.remove(child_id) {
                        self.roots.remove(&key);
                    }
                }
                stack.push(child.clone());
            }
        }
        trace!(%id, "queued unmount");
    }

    /// Nearest ancestor the observer can see.
    fn nearest_mapped_ancestor(&self, node: &B::Node) -> Id {
        let bindings = self.bindings;
        let mut current = bindings.parent(node);
        while let Some(candidate) = current {
            let id = self.ids.id_for(&bindings.identity(&candidate));
            if id.is_some() {
                return id;
            }
            current = bindings.parent(&candidate);
        }
        Id::NONE
    }

    /// Queue the nearest platform element below a rendered composite for a
    /// highlight flash. Breadth-first so the outline lands on the node's
    /// own output, not a deep descendant's; text elements cannot be
    /// outlined and promote to their container.
    fn maybe_highlight(&mut self, node: &B::Node) {
        let bindings = self.bindings;
        if !self.profiler.highlight_updates || !bindings.is_composite(node) {
            return;
        }
        let mut queue: VecDeque<B::Node> =
            bindings.children(node).into_iter().flatten().collect();
        let mut target = None;
        while let Some(current) = queue.pop_front() {
            if !bindings.is_composite(&current) {
                target = bindings.platform_handle(&current);
                break;
            }
            queue.extend(bindings.children(&current).into_iter().flatten());
        }
        let mut handle = match target {
            Some(handle) => handle,
            None => return,
        };
        if bindings.platform_is_text(&handle) {
            match bindings.platform_parent(&handle) {
                Some(parent) => handle = parent,
                None => return,
            }
        }
        self.profiler.queue_highlight(handle);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commit::OpRecord;
    use crate::filter::{FilterConfig, FilterState};
    use crate::memtree::{MemTree, NodeRef, NodeSpec};

    fn filters_from(types: &[TypeFilter], patterns: &[&str]) -> FilterState {
        let config = FilterConfig {
            types: types.to_vec(),
            patterns: patterns.iter().map(|p| p.to_string()).collect(),
        };
        FilterState::from_config(&config).unwrap()
    }

    fn record(
        tree: &MemTree,
        root: &NodeRef,
        recorder: &mut Recorder<MemTree>,
        filters: &FilterState,
    ) -> Commit {
        let mut profiler = ProfilerState::new();
        let timings = PassTimings::new();
        recorder.record_commit(tree, root, filters, &mut profiler, &timings, None)
    }

    fn added_names(commit: &Commit) -> Vec<(String, Id, Id)> {
        commit
            .records()
            .into_iter()
            .filter_map(|record| match record {
                OpRecord::AddVnode {
                    id, ancestor, name, ..
                } => Some((name, id, ancestor)),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn test_hidden_parent_links_children_to_nearest_visible_ancestor() {
        let mut tree = MemTree::new();
        let pass = tree
            .load_pass(&NodeSpec::root(
                1,
                vec![Some(NodeSpec::component(
                    2,
                    "App",
                    vec![Some(NodeSpec::component(
                        3,
                        "Foo",
                        vec![Some(NodeSpec::component(4, "Bar", vec![]))],
                    ))],
                ))],
            ))
            .unwrap();
        let filters = filters_from(&[], &["^Foo$"]);
        let mut recorder = Recorder::new();
        let commit = record(&tree, &pass.root, &mut recorder, &filters);

        let added = added_names(&commit);
        let names: Vec<&str> = added.iter().map(|(n, _, _)| n.as_str()).collect();
        assert_eq!(names, vec!["Root", "App", "Bar"]);

        let (_, app_id, _) = added[1].clone();
        let (_, _, bar_ancestor) = added[2].clone();
        assert_eq!(bar_ancestor, app_id);
    }

    #[test]
    fn test_second_pass_without_changes_adds_nothing() {
        let spec = NodeSpec::root(
            1,
            vec![Some(NodeSpec::component(
                2,
                "App",
                vec![Some(NodeSpec::element(3, "div", 100, vec![]))],
            ))],
        );
        let mut tree = MemTree::new();
        let filters = filters_from(&[], &[]);
        let mut recorder = Recorder::new();

        let first = tree.load_pass(&spec).unwrap();
        let commit = record(&tree, &first.root, &mut recorder, &filters);
        assert_eq!(added_names(&commit).len(), 3);

        let second = tree.load_pass(&spec).unwrap();
        let commit = record(&tree, &second.root, &mut recorder, &filters);
        assert!(added_names(&commit).is_empty());
        assert!(commit.unmount_ids.is_empty());
        assert!(!commit
            .records()
            .iter()
            .any(|r| matches!(r, OpRecord::UpdateVnodeTimings { .. })));
    }

    #[test]
    fn test_vanished_child_slot_queues_unmount_and_evicts_mapping() {
        let mut tree = MemTree::new();
        let filters = filters_from(&[], &[]);
        let mut recorder = Recorder::new();

        let first = tree
            .load_pass(&NodeSpec::root(
                1,
                vec![Some(NodeSpec::component(
                    2,
                    "App",
                    vec![
                        Some(NodeSpec::component(3, "A", vec![])),
                        Some(NodeSpec::component(4, "B", vec![])),
                    ],
                ))],
            ))
            .unwrap();
        let commit = record(&tree, &first.root, &mut recorder, &filters);
        let b_id = added_names(&commit)
            .iter()
            .find(|(name, _, _)| name == "B")
            .map(|(_, id, _)| *id)
            .unwrap();
        assert_eq!(recorder.mapped_nodes(), 4);

        let second = tree
            .load_pass(&NodeSpec::root(
                1,
                vec![Some(NodeSpec::component(
                    2,
                    "App",
                    vec![Some(NodeSpec::component(3, "A", vec![])), None],
                ))],
            ))
            .unwrap();
        let commit = record(&tree, &second.root, &mut recorder, &filters);
        assert_eq!(commit.unmount_ids, vec![b_id]);
        assert_eq!(recorder.mapped_nodes(), 3);
    }

    #[test]
    fn test_unmount_evicts_descendants_behind_hidden_nodes() {
        let mut tree = MemTree::new();
        let filters = filters_from(&[TypeFilter::Fragment], &[]);
        let mut recorder = Recorder::new();

        let first = tree
            .load_pass(&NodeSpec::root(
                1,
                vec![Some(NodeSpec::component(
                    2,
                    "App",
                    vec![Some(NodeSpec::component(
                        3,
                        "Panel",
                        vec![Some(NodeSpec::fragment(
                            4,
                            vec![Some(NodeSpec::component(5, "Leaf", vec![]))],
                        ))],
                    ))],
                ))],
            ))
            .unwrap();
        let commit = record(&tree, &first.root, &mut recorder, &filters);
        let panel_id = added_names(&commit)
            .iter()
            .find(|(name, _, _)| name == "Panel")
            .map(|(_, id, _)| *id)
            .unwrap();
        // The fragment carries no mapping of its own.
        assert_eq!(recorder.mapped_nodes(), 4);

        let second = tree
            .load_pass(&NodeSpec::root(
                1,
                vec![Some(NodeSpec::component(2, "App", vec![None]))],
            ))
            .unwrap();
        let commit = record(&tree, &second.root, &mut recorder, &filters);
        // Eviction walks through the unmapped fragment to reach the leaf.
        assert_eq!(commit.unmount_ids, vec![panel_id]);
        assert_eq!(recorder.mapped_nodes(), 2);
    }

    #[test]
    fn test_reorder_suppressed_below_two_visible_children() {
        let mut tree = MemTree::new();
        let filters = filters_from(&[], &[]);
        let mut recorder = Recorder::new();

        let spec = NodeSpec::root(
            1,
            vec![Some(NodeSpec::component(
                2,
                "App",
                vec![Some(NodeSpec::component(3, "Only", vec![]))],
            ))],
        );
        let first = tree.load_pass(&spec).unwrap();
        record(&tree, &first.root, &mut recorder, &filters);

        let second = tree.load_pass(&spec).unwrap();
        let commit = record(&tree, &second.root, &mut recorder, &filters);
        assert!(!commit
            .records()
            .iter()
            .any(|r| matches!(r, OpRecord::ReorderChildren { .. })));
    }

    #[test]
    fn test_suspense_reorders_even_with_one_visible_child() {
        let mut tree = MemTree::new();
        let filters = filters_from(&[], &[]);
        let mut recorder = Recorder::new();

        let spec = NodeSpec::root(
            1,
            vec![Some(NodeSpec::suspense(
                2,
                vec![Some(NodeSpec::component(3, "Content", vec![]))],
            ))],
        );
        let first = tree.load_pass(&spec).unwrap();
        record(&tree, &first.root, &mut recorder, &filters);

        let second = tree.load_pass(&spec).unwrap();
        let commit = record(&tree, &second.root, &mut recorder, &filters);
        assert!(commit
            .records()
            .iter()
            .any(|r| matches!(r, OpRecord::ReorderChildren { .. })));
    }

    #[test]
    fn test_hidden_element_lands_in_platform_cache() {
        let mut tree = MemTree::new();
        let filters = filters_from(&[TypeFilter::Dom], &[]);
        let mut recorder = Recorder::new();

        let pass = tree
            .load_pass(&NodeSpec::root(
                1,
                vec![Some(NodeSpec::component(
                    2,
                    "App",
                    vec![Some(NodeSpec::element(3, "div", 100, vec![]))],
                ))],
            ))
            .unwrap();
        record(&tree, &pass.root, &mut recorder, &filters);
        assert_eq!(recorder.platform_lookup(&100), Some(&3));
        assert!(recorder.evict_platform(&100));
        assert_eq!(recorder.platform_lookup(&100), None);
    }

    #[test]
    fn test_commit_for_subtree_resolves_owning_root() {
        let mut tree = MemTree::new();
        let filters = filters_from(&[], &[]);
        let mut recorder = Recorder::new();

        let first = tree
            .load_pass(&NodeSpec::root(
                1,
                vec![Some(NodeSpec::component(
                    2,
                    "App",
                    vec![Some(NodeSpec::component(3, "Leaf", vec![]))],
                ))],
            ))
            .unwrap();
        let full = record(&tree, &first.root, &mut recorder, &filters);
        assert_eq!(full.root_id, Id(1));

        // Re-observe only the nested component; the owning root is found by
        // walking parents.
        let second = tree
            .load_pass(&NodeSpec::root(
                1,
                vec![Some(NodeSpec::component(
                    2,
                    "App",
                    vec![Some(NodeSpec::component(3, "Leaf", vec![]))],
                ))],
            ))
            .unwrap();
        let leaf = second.handle(3).unwrap();
        let subtree = record(&tree, &leaf, &mut recorder, &filters);
        assert_eq!(subtree.root_id, Id(1));
    }
}
