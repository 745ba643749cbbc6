//! Host Bindings
//!
//! Capability seam between the engine and a concrete UI runtime. The engine
//! never looks inside a node: every structural and classification question
//! goes through [`TreeBindings`], so runtimes with different node
//! representations plug in without touching traversal logic.

use std::fmt::Debug;
use std::hash::Hash;

use serde::{Deserialize, Serialize};

use crate::hoc;
use crate::reasons::ReasonInfo;

/// Wire classification of an emitted node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum NodeKind {
    Group = 0,
    Element = 1,
    ClassComponent = 2,
    FunctionComponent = 3,
    ForwardRef = 4,
    Memo = 5,
    Suspense = 6,
    Context = 7,
    Consumer = 8,
    Portal = 9,
}

impl NodeKind {
    pub fn wire(self) -> i32 {
        self as i32
    }

    pub fn from_wire(value: i32) -> Option<NodeKind> {
        match value {
            0 => Some(NodeKind::Group),
            1 => Some(NodeKind::Element),
            2 => Some(NodeKind::ClassComponent),
            3 => Some(NodeKind::FunctionComponent),
            4 => Some(NodeKind::ForwardRef),
            5 => Some(NodeKind::Memo),
            6 => Some(NodeKind::Suspense),
            7 => Some(NodeKind::Context),
            8 => Some(NodeKind::Consumer),
            9 => Some(NodeKind::Portal),
            _ => None,
        }
    }
}

/// Capability surface a host adapter implements for its node type.
///
/// A `Node` is one *version* of a live element; hosts may hand out a fresh
/// handle for the same logical element on every pass, which is why identity
/// is a separate associated type.
pub trait TreeBindings {
    /// Handle to one version of a live element.
    type Node: Clone + Eq + Hash + Debug;
    /// Stable logical identity extracted from any version of a node.
    type Key: Clone + Eq + Hash;
    /// Platform element handle, the thing an overlay can outline.
    type Platform: Clone + Eq + Hash + Debug;

    /// Stable identity key of `node`.
    fn identity(&self, node: &Self::Node) -> Self::Key;

    /// Children in declaration order. `None` marks a hole left by
    /// conditional rendering; positions are significant for diffing.
    fn children(&self, node: &Self::Node) -> Vec<Option<Self::Node>>;

    /// Structural parent, `None` at the top of a tree.
    fn parent(&self, node: &Self::Node) -> Option<Self::Node>;

    /// Human-readable display name; may be decorator-shaped.
    fn display_name(&self, node: &Self::Node) -> String;

    /// User-assigned reconciliation key, if any.
    fn element_key(&self, node: &Self::Node) -> Option<String>;

    /// Flavor of a plain composite node. Structural categories and
    /// name-shaped wrappers are resolved by [`resolve_kind`]; this is only
    /// consulted for the remainder.
    fn composite_kind(&self, node: &Self::Node) -> NodeKind {
        let _ = node;
        NodeKind::FunctionComponent
    }

    /// Whether `node` is a root marker heading an observed tree.
    fn is_root(&self, node: &Self::Node) -> bool;

    /// Composite (user component) as opposed to a platform primitive.
    fn is_composite(&self, node: &Self::Node) -> bool;

    /// Raw text node.
    fn is_text(&self, node: &Self::Node) -> bool;

    /// Platform primitive element with a platform handle of its own.
    fn is_element(&self, node: &Self::Node) -> bool;

    /// Grouping-only node that renders nothing itself.
    fn is_grouping(&self, node: &Self::Node) -> bool;

    /// Suspense-like boundary that swaps its children wholesale between
    /// fallback and content.
    fn is_suspense(&self, node: &Self::Node) -> bool;

    /// Portal node rendering its children elsewhere in the platform tree.
    fn is_portal(&self, node: &Self::Node) -> bool;

    /// Platform element rendered by `node`, when it has one.
    fn platform_handle(&self, node: &Self::Node) -> Option<Self::Platform>;

    /// Platform parent of a platform handle. Text handles promote to their
    /// container before highlighting.
    fn platform_parent(&self, handle: &Self::Platform) -> Option<Self::Platform>;

    /// Whether the platform handle is a bare text node.
    fn platform_is_text(&self, handle: &Self::Platform) -> bool;

    /// Post-hoc render reason for a node that did work this pass, derived
    /// by comparing the prior and current versions. Hosts without this
    /// capability return `None`.
    fn render_reason(&self, prior: &Self::Node, current: &Self::Node) -> Option<ReasonInfo> {
        let _ = (prior, current);
        None
    }
}

/// Wire kind of `node`, combining structural predicates, the raw display
/// name's wrapper shape and the host's composite flavor.
pub fn resolve_kind<B: TreeBindings>(bindings: &B, node: &B::Node, raw_name: &str) -> NodeKind {
    if bindings.is_root(node) || bindings.is_grouping(node) {
        return NodeKind::Group;
    }
    if bindings.is_suspense(node) {
        return NodeKind::Suspense;
    }
    if bindings.is_portal(node) {
        return NodeKind::Portal;
    }
    if bindings.is_composite(node) {
        if matches!(hoc::wrapper_name(raw_name), Some("Memo")) {
            return NodeKind::Memo;
        }
        if hoc::is_forwarding_name(raw_name) {
            return NodeKind::ForwardRef;
        }
        return bindings.composite_kind(node);
    }
    NodeKind::Element
}
