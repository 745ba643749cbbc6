//! In-Memory Host
//!
//! A scriptable runtime standing in for a live renderer. Passes are
//! declared as [`NodeSpec`] trees (the same shape scenario files use);
//! loading a pass allocates a fresh version of every declared node, the way
//! real hosts hand out new internal objects on each render, while logical
//! ids persist across passes. Earlier versions stay resolvable so the
//! engine can diff a node against the version it saw last.

use std::collections::{BTreeMap, HashMap, HashSet};

use serde::{Deserialize, Serialize};

use crate::bindings::{NodeKind, TreeBindings};
use crate::error::ReplayError;
use crate::hoc;
use crate::reasons::{diff_named_inputs, ReasonInfo, RenderReason};

/// Structural category of a declared node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SpecKind {
    Root,
    Component,
    Class,
    Element,
    Text,
    Fragment,
    Suspense,
    Portal,
}

/// One declared node in a pass description.
///
/// `id` is the logical identity that survives across passes. `dom` names
/// the platform handle of elements and text; `state` is an opaque revision
/// counter whose bumps stand in for internal state updates.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NodeSpec {
    pub kind: SpecKind,
    pub id: u32,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub dom: Option<u32>,
    #[serde(default)]
    pub key: Option<String>,
    #[serde(default)]
    pub props: BTreeMap<String, String>,
    #[serde(default)]
    pub state: u32,
    #[serde(default)]
    pub text: Option<String>,
    #[serde(default)]
    pub children: Vec<Option<NodeSpec>>,
}

impl NodeSpec {
    fn bare(kind: SpecKind, id: u32) -> NodeSpec {
        NodeSpec {
            kind,
            id,
            name: None,
            dom: None,
            key: None,
            props: BTreeMap::new(),
            state: 0,
            text: None,
            children: Vec::new(),
        }
    }

    pub fn root(id: u32, children: Vec<Option<NodeSpec>>) -> NodeSpec {
        NodeSpec {
            children,
            ..Self::bare(SpecKind::Root, id)
        }
    }

    pub fn component(id: u32, name: &str, children: Vec<Option<NodeSpec>>) -> NodeSpec {
        NodeSpec {
            name: Some(name.to_string()),
            children,
            ..Self::bare(SpecKind::Component, id)
        }
    }

    pub fn class_component(id: u32, name: &str, children: Vec<Option<NodeSpec>>) -> NodeSpec {
        NodeSpec {
            name: Some(name.to_string()),
            children,
            ..Self::bare(SpecKind::Class, id)
        }
    }

    pub fn element(id: u32, name: &str, dom: u32, children: Vec<Option<NodeSpec>>) -> NodeSpec {
        NodeSpec {
            name: Some(name.to_string()),
            dom: Some(dom),
            children,
            ..Self::bare(SpecKind::Element, id)
        }
    }

    pub fn text(id: u32, content: &str, dom: u32) -> NodeSpec {
        NodeSpec {
            text: Some(content.to_string()),
            dom: Some(dom),
            ..Self::bare(SpecKind::Text, id)
        }
    }

    pub fn fragment(id: u32, children: Vec<Option<NodeSpec>>) -> NodeSpec {
        NodeSpec {
            children,
            ..Self::bare(SpecKind::Fragment, id)
        }
    }

    pub fn suspense(id: u32, children: Vec<Option<NodeSpec>>) -> NodeSpec {
        NodeSpec {
            children,
            ..Self::bare(SpecKind::Suspense, id)
        }
    }

    pub fn portal(id: u32, children: Vec<Option<NodeSpec>>) -> NodeSpec {
        NodeSpec {
            children,
            ..Self::bare(SpecKind::Portal, id)
        }
    }

    pub fn with_key(mut self, key: &str) -> NodeSpec {
        self.key = Some(key.to_string());
        self
    }

    pub fn with_props(mut self, pairs: &[(&str, &str)]) -> NodeSpec {
        self.props = pairs
            .iter()
            .map(|(name, value)| (name.to_string(), value.to_string()))
            .collect();
        self
    }

    pub fn with_state(mut self, revision: u32) -> NodeSpec {
        self.state = revision;
        self
    }
}

/// Handle to one version of a loaded node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeRef(u32);

impl NodeRef {
    fn index(self) -> usize {
        self.0 as usize
    }
}

struct NodeData {
    logical: u32,
    kind: SpecKind,
    name: Option<String>,
    key: Option<String>,
    dom: Option<u32>,
    props: BTreeMap<String, String>,
    state: u32,
    parent: Option<NodeRef>,
    children: Vec<Option<NodeRef>>,
}

/// Handles allocated for one loaded pass.
#[derive(Debug)]
pub struct LoadedPass {
    /// Version handle of the declared top node.
    pub root: NodeRef,
    by_logical: HashMap<u32, NodeRef>,
}

impl LoadedPass {
    /// This pass's version of a logical node.
    pub fn handle(&self, logical: u32) -> Option<NodeRef> {
        self.by_logical.get(&logical).copied()
    }
}

/// Arena of every node version loaded so far, plus the platform-side
/// lookup tables.
#[derive(Default)]
pub struct MemTree {
    nodes: Vec<NodeData>,
    text_handles: HashSet<u32>,
    platform_parents: HashMap<u32, Option<u32>>,
}

impl MemTree {
    pub fn new() -> Self {
        Self::default()
    }

    /// Allocate a fresh version of every node in `spec`.
    ///
    /// Logical ids must be unique within one pass; reusing an id across
    /// passes is what makes two versions the same logical node.
    pub fn load_pass(&mut self, spec: &NodeSpec) -> Result<LoadedPass, ReplayError> {
        let mut by_logical = HashMap::new();
        let root = self.insert(spec, None, None, &mut by_logical)?;
        Ok(LoadedPass { root, by_logical })
    }

    fn insert(
        &mut self,
        spec: &NodeSpec,
        parent: Option<NodeRef>,
        container: Option<u32>,
        by_logical: &mut HashMap<u32, NodeRef>,
    ) -> Result<NodeRef, ReplayError> {
        if by_logical.contains_key(&spec.id) {
            return Err(ReplayError::DuplicateLogicalId(spec.id));
        }
        let reference = NodeRef(self.nodes.len() as u32);
        self.nodes.push(NodeData {
            logical: spec.id,
            kind: spec.kind,
            name: spec.name.clone(),
            key: spec.key.clone(),
            dom: spec.dom,
            props: spec.props.clone(),
            state: spec.state,
            parent,
            children: Vec::new(),
        });
        by_logical.insert(spec.id, reference);

        if let Some(dom) = spec.dom {
            match spec.kind {
                SpecKind::Element => {
                    self.platform_parents.insert(dom, container);
                }
                SpecKind::Text => {
                    self.platform_parents.insert(dom, container);
                    self.text_handles.insert(dom);
                }
                _ => {}
            }
        }
        let child_container = match spec.kind {
            SpecKind::Element => spec.dom.or(container),
            _ => container,
        };

        let mut children = Vec::with_capacity(spec.children.len());
        for slot in &spec.children {
            children.push(match slot {
                Some(child) => Some(self.insert(child, Some(reference), child_container, by_logical)?),
                None => None,
            });
        }
        self.nodes[reference.index()].children = children;
        Ok(reference)
    }

    fn data(&self, reference: &NodeRef) -> &NodeData {
        &self.nodes[reference.index()]
    }
}

impl TreeBindings for MemTree {
    type Node = NodeRef;
    type Key = u32;
    type Platform = u32;

    fn identity(&self, node: &NodeRef) -> u32 {
        self.data(node).logical
    }

    fn children(&self, node: &NodeRef) -> Vec<Option<NodeRef>> {
        self.data(node).children.clone()
    }

    fn parent(&self, node: &NodeRef) -> Option<NodeRef> {
        self.data(node).parent
    }

    fn display_name(&self, node: &NodeRef) -> String {
        let data = self.data(node);
        match data.kind {
            SpecKind::Root => "Root".to_string(),
            SpecKind::Fragment => "Fragment".to_string(),
            SpecKind::Suspense => "Suspense".to_string(),
            SpecKind::Portal => "Portal".to_string(),
            SpecKind::Text => "#text".to_string(),
            SpecKind::Element => data.name.clone().unwrap_or_else(|| "unknown".to_string()),
            SpecKind::Component | SpecKind::Class => data
                .name
                .clone()
                .unwrap_or_else(|| hoc::ANONYMOUS_NAME.to_string()),
        }
    }

    fn element_key(&self, node: &NodeRef) -> Option<String> {
        self.data(node).key.clone()
    }

    fn composite_kind(&self, node: &NodeRef) -> NodeKind {
        match self.data(node).kind {
            SpecKind::Class => NodeKind::ClassComponent,
            _ => NodeKind::FunctionComponent,
        }
    }

    fn is_root(&self, node: &NodeRef) -> bool {
        matches!(self.data(node).kind, SpecKind::Root)
    }

    fn is_composite(&self, node: &NodeRef) -> bool {
        matches!(self.data(node).kind, SpecKind::Component | SpecKind::Class)
    }

    fn is_text(&self, node: &NodeRef) -> bool {
        matches!(self.data(node).kind, SpecKind::Text)
    }

    fn is_element(&self, node: &NodeRef) -> bool {
        matches!(self.data(node).kind, SpecKind::Element)
    }

    fn is_grouping(&self, node: &NodeRef) -> bool {
        matches!(self.data(node).kind, SpecKind::Root | SpecKind::Fragment)
    }

    fn is_suspense(&self, node: &NodeRef) -> bool {
        matches!(self.data(node).kind, SpecKind::Suspense)
    }

    fn is_portal(&self, node: &NodeRef) -> bool {
        matches!(self.data(node).kind, SpecKind::Portal)
    }

    fn platform_handle(&self, node: &NodeRef) -> Option<u32> {
        let data = self.data(node);
        match data.kind {
            SpecKind::Element | SpecKind::Text => data.dom,
            _ => None,
        }
    }

    fn platform_parent(&self, handle: &u32) -> Option<u32> {
        self.platform_parents.get(handle).copied().flatten()
    }

    fn platform_is_text(&self, handle: &u32) -> bool {
        self.text_handles.contains(handle)
    }

    fn render_reason(&self, prior: &NodeRef, current: &NodeRef) -> Option<ReasonInfo> {
        let before = self.data(prior);
        let after = self.data(current);
        if before.state != after.state {
            let reason = match after.kind {
                SpecKind::Class => RenderReason::StateChanged,
                _ => RenderReason::HooksChanged,
            };
            return Some(ReasonInfo::new(reason));
        }
        diff_named_inputs(&before.props, &after.props)
            .map(|items| ReasonInfo::with_items(RenderReason::PropsChanged, items))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_versions_share_identity_but_not_handles() {
        let spec = NodeSpec::root(1, vec![Some(NodeSpec::component(2, "App", vec![]))]);
        let mut tree = MemTree::new();
        let first = tree.load_pass(&spec).unwrap();
        let second = tree.load_pass(&spec).unwrap();

        let before = first.handle(2).unwrap();
        let after = second.handle(2).unwrap();
        assert_ne!(before, after);
        assert_eq!(tree.identity(&before), tree.identity(&after));
        // The earlier version stays readable.
        assert_eq!(tree.display_name(&before), "App");
    }

    #[test]
    fn test_duplicate_logical_id_is_rejected() {
        let spec = NodeSpec::root(
            1,
            vec![
                Some(NodeSpec::component(2, "A", vec![])),
                Some(NodeSpec::component(2, "B", vec![])),
            ],
        );
        let mut tree = MemTree::new();
        let error = tree.load_pass(&spec).unwrap_err();
        assert!(matches!(error, ReplayError::DuplicateLogicalId(2)));
    }

    #[test]
    fn test_text_handle_promotes_to_container_element() {
        let spec = NodeSpec::root(
            1,
            vec![Some(NodeSpec::element(
                2,
                "p",
                10,
                vec![Some(NodeSpec::text(3, "hi", 11))],
            ))],
        );
        let mut tree = MemTree::new();
        tree.load_pass(&spec).unwrap();
        assert!(tree.platform_is_text(&11));
        assert!(!tree.platform_is_text(&10));
        assert_eq!(tree.platform_parent(&11), Some(10));
        assert_eq!(tree.platform_parent(&10), None);
    }

    #[test]
    fn test_state_bump_reason_depends_on_component_flavor() {
        let mut tree = MemTree::new();
        let first = tree
            .load_pass(&NodeSpec::root(
                1,
                vec![
                    Some(NodeSpec::component(2, "Hooked", vec![])),
                    Some(NodeSpec::class_component(3, "Classic", vec![])),
                ],
            ))
            .unwrap();
        let second = tree
            .load_pass(&NodeSpec::root(
                1,
                vec![
                    Some(NodeSpec::component(2, "Hooked", vec![]).with_state(1)),
                    Some(NodeSpec::class_component(3, "Classic", vec![]).with_state(1)),
                ],
            ))
            .unwrap();

        let hooked = tree
            .render_reason(&first.handle(2).unwrap(), &second.handle(2).unwrap())
            .unwrap();
        assert_eq!(hooked.reason, RenderReason::HooksChanged);

        let classic = tree
            .render_reason(&first.handle(3).unwrap(), &second.handle(3).unwrap())
            .unwrap();
        assert_eq!(classic.reason, RenderReason::StateChanged);
    }

    #[test]
    fn test_prop_diff_reason_lists_changed_names() {
        let mut tree = MemTree::new();
        let first = tree
            .load_pass(&NodeSpec::root(
                1,
                vec![Some(
                    NodeSpec::component(2, "Widget", vec![]).with_props(&[("a", "1"), ("b", "2")]),
                )],
            ))
            .unwrap();
        let second = tree
            .load_pass(&NodeSpec::root(
                1,
                vec![Some(
                    NodeSpec::component(2, "Widget", vec![]).with_props(&[("a", "1"), ("c", "3")]),
                )],
            ))
            .unwrap();

        let info = tree
            .render_reason(&first.handle(2).unwrap(), &second.handle(2).unwrap())
            .unwrap();
        assert_eq!(info.reason, RenderReason::PropsChanged);
        assert_eq!(info.items, vec!["b", "c"]);

        let unchanged = tree.render_reason(&first.handle(2).unwrap(), &first.handle(2).unwrap());
        assert!(unchanged.is_none());
    }

    #[test]
    fn test_scenario_shape_deserializes_with_defaults() {
        let spec: NodeSpec = serde_json::from_str(
            r#"{
                "kind": "root",
                "id": 1,
                "children": [
                    null,
                    {"kind": "element", "id": 2, "name": "div", "dom": 5, "children": [
                        {"kind": "text", "id": 3, "text": "hi", "dom": 6}
                    ]}
                ]
            }"#,
        )
        .unwrap();
        assert_eq!(spec.kind, SpecKind::Root);
        assert_eq!(spec.children.len(), 2);
        assert!(spec.children[0].is_none());
        let div = spec.children[1].as_ref().unwrap();
        assert_eq!(div.dom, Some(5));
        assert!(div.props.is_empty());
        assert_eq!(div.children[0].as_ref().unwrap().text.as_deref(), Some("hi"));
    }
}
