//! Commit Encoding
//!
//! One commit is the flattened result of observing a single render pass: a
//! tagged integer operation stream, the commit-scoped string table, the ids
//! queued for removal and the owning root. Every wire layout lives in this
//! module; traversal code appends through the typed helpers and patches
//! reserved slots through [`OpSlot`], never through raw offsets.

use serde::Serialize;

use crate::bindings::NodeKind;
use crate::ids::Id;
use crate::reasons::{ReasonInfo, RenderReason};
use crate::stats::CommitStats;
use crate::strings::StringTable;

/// Operation discriminants of the wire stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum OpTag {
    AddRoot = 1,
    AddVnode = 2,
    RemoveVnode = 3,
    UpdateVnodeTimings = 4,
    ReorderChildren = 5,
    RenderReason = 6,
    CommitStats = 7,
    HocNodes = 8,
}

impl OpTag {
    pub fn wire(self) -> i32 {
        self as i32
    }

    pub fn from_wire(value: i32) -> Option<OpTag> {
        match value {
            1 => Some(OpTag::AddRoot),
            2 => Some(OpTag::AddVnode),
            3 => Some(OpTag::RemoveVnode),
            4 => Some(OpTag::UpdateVnodeTimings),
            5 => Some(OpTag::ReorderChildren),
            6 => Some(OpTag::RenderReason),
            7 => Some(OpTag::CommitStats),
            8 => Some(OpTag::HocNodes),
            _ => None,
        }
    }
}

/// Reserved owner field of ADD_VNODE records. Consumers skip it; emitting
/// the constant keeps record arity stable for them.
pub const RESERVED_OWNER: i32 = 9999;

/// Placeholder written into a duration slot until children finish.
pub const DURATION_PLACEHOLDER: i32 = -1;

const DURATION_FLOOR: f64 = 0.05;

/// Scale an exclusive duration for the integer stream: floored at 0.05 so
/// no emitted duration is zero, times 1000 to keep sub-millisecond
/// precision.
pub fn scale_duration(exclusive: f64) -> i32 {
    (exclusive.max(DURATION_FLOOR) * 1000.0).round() as i32
}

/// Position of a patchable operand inside the operation buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OpSlot(usize);

/// Output of one observed render pass. Immutable once handed back to the
/// caller; the traversal engine is the only writer.
#[derive(Debug, Serialize)]
pub struct Commit {
    /// Id of the root that owns this pass.
    pub root_id: Id,
    /// Tagged variable-arity operation stream.
    pub ops: Vec<i32>,
    /// Ids unmounted by this pass, flushed ahead of `ops` on the wire.
    pub unmount_ids: Vec<Id>,
    /// Commit-scoped interned strings.
    pub strings: StringTable,
    /// Optional statistics side channel; never wire-encoded here.
    pub stats: Option<CommitStats>,
}

impl Commit {
    pub fn new() -> Self {
        Self {
            root_id: Id::NONE,
            ops: Vec::new(),
            unmount_ids: Vec::new(),
            strings: StringTable::new(),
            stats: None,
        }
    }

    /// Append ADD_ROOT. The returned slot holds the displayed-root field,
    /// backpatched when a collapsed root is spliced onto its only child.
    pub fn add_root(&mut self, id: Id) -> OpSlot {
        self.ops
            .extend_from_slice(&[OpTag::AddRoot.wire(), id.0, id.0]);
        OpSlot(self.ops.len() - 1)
    }

    /// Append ADD_VNODE with a placeholder duration; patch the returned
    /// slot once the node's children have been traversed.
    pub fn add_vnode(
        &mut self,
        id: Id,
        kind: NodeKind,
        ancestor: Id,
        name: &str,
        key: Option<&str>,
    ) -> OpSlot {
        let name_ref = self.strings.intern(name);
        let key_ref = self.strings.intern_opt(key);
        self.ops.extend_from_slice(&[
            OpTag::AddVnode.wire(),
            id.0,
            kind.wire(),
            ancestor.0,
            RESERVED_OWNER,
            name_ref,
            key_ref,
            DURATION_PLACEHOLDER,
        ]);
        OpSlot(self.ops.len() - 1)
    }

    /// Append UPDATE_VNODE_TIMINGS with a placeholder duration.
    pub fn update_timings(&mut self, id: Id) -> OpSlot {
        self.ops.extend_from_slice(&[
            OpTag::UpdateVnodeTimings.wire(),
            id.0,
            DURATION_PLACEHOLDER,
        ]);
        OpSlot(self.ops.len() - 1)
    }

    /// Write a backpatched value into a reserved slot.
    pub fn patch(&mut self, slot: OpSlot, value: i32) {
        self.ops[slot.0] = value;
    }

    /// Append REORDER_CHILDREN with the visible children in order.
    pub fn reorder_children(&mut self, id: Id, children: &[Id]) {
        self.ops.push(OpTag::ReorderChildren.wire());
        self.ops.push(id.0);
        self.ops.push(children.len() as i32);
        self.ops.extend(children.iter().map(|child| child.0));
    }

    /// Append HOC_NODES carrying accumulated wrapper names, outermost
    /// first. A call with no names appends nothing.
    pub fn hoc_nodes(&mut self, id: Id, names: &[String]) {
        if names.is_empty() {
            return;
        }
        self.ops.push(OpTag::HocNodes.wire());
        self.ops.push(id.0);
        self.ops.push(names.len() as i32);
        for name in names {
            let reference = self.strings.intern(name);
            self.ops.push(reference);
        }
    }

    /// Append RENDER_REASON with the changed-input names interned.
    pub fn render_reason(&mut self, id: Id, info: &ReasonInfo) {
        self.ops.push(OpTag::RenderReason.wire());
        self.ops.push(id.0);
        self.ops.push(info.reason.wire());
        self.ops.push(info.items.len() as i32);
        for item in &info.items {
            let reference = self.strings.intern(item);
            self.ops.push(reference);
        }
    }

    /// Queue an id for removal; the wire flatten emits these ahead of the
    /// operation stream so downstream state never sees a stale child.
    pub fn queue_unmount(&mut self, id: Id) {
        self.unmount_ids.push(id);
        if let Some(stats) = self.stats.as_mut() {
            stats.unmounts += 1;
        }
    }

    /// Single transport frame: root id, string table, unmounts, then the
    /// operation stream.
    pub fn flatten(&self) -> Vec<i32> {
        let mut frame = Vec::with_capacity(self.ops.len() + 16);
        frame.push(self.root_id.0);
        frame.push(self.strings.len() as i32);
        for value in self.strings.iter() {
            let encoded: Vec<i32> = value.chars().map(|c| c as i32).collect();
            frame.push(encoded.len() as i32);
            frame.extend(encoded);
        }
        if !self.unmount_ids.is_empty() {
            frame.push(OpTag::RemoveVnode.wire());
            frame.push(self.unmount_ids.len() as i32);
            frame.extend(self.unmount_ids.iter().map(|id| id.0));
        }
        frame.extend_from_slice(&self.ops);
        frame
    }

    /// Decode the operation stream back into structured records, for
    /// tooling and assertions. This is the one place that knows each tag's
    /// arity. Malformed streams stop decoding at the damage.
    pub fn records(&self) -> Vec<OpRecord> {
        let ops = &self.ops;
        let mut out = Vec::new();
        let mut i = 0;
        while i < ops.len() {
            let tag = match OpTag::from_wire(ops[i]) {
                Some(tag) => tag,
                None => {
                    debug_assert!(false, "unknown operation tag {}", ops[i]);
                    break;
                }
            };
            match tag {
                OpTag::AddRoot => {
                    if i + 2 >= ops.len() {
                        debug_assert!(false, "truncated ADD_ROOT");
                        break;
                    }
                    out.push(OpRecord::AddRoot {
                        id: Id(ops[i + 1]),
                        displayed: Id(ops[i + 2]),
                    });
                    i += 3;
                }
                OpTag::AddVnode => {
                    if i + 7 >= ops.len() {
                        debug_assert!(false, "truncated ADD_VNODE");
                        break;
                    }
                    let kind = match NodeKind::from_wire(ops[i + 2]) {
                        Some(kind) => kind,
                        None => {
                            debug_assert!(false, "unknown node kind {}", ops[i + 2]);
                            break;
                        }
                    };
                    out.push(OpRecord::AddVnode {
                        id: Id(ops[i + 1]),
                        kind,
                        ancestor: Id(ops[i + 3]),
                        name: self.resolve_string(ops[i + 5]),
                        key: if ops[i + 6] == 0 {
                            None
                        } else {
                            Some(self.resolve_string(ops[i + 6]))
                        },
                        duration: ops[i + 7],
                    });
                    i += 8;
                }
                OpTag::UpdateVnodeTimings => {
                    if i + 2 >= ops.len() {
                        debug_assert!(false, "truncated UPDATE_VNODE_TIMINGS");
                        break;
                    }
                    out.push(OpRecord::UpdateVnodeTimings {
                        id: Id(ops[i + 1]),
                        duration: ops[i + 2],
                    });
                    i += 3;
                }
                OpTag::ReorderChildren => {
                    if i + 2 >= ops.len() {
                        debug_assert!(false, "truncated REORDER_CHILDREN");
                        break;
                    }
                    let count = ops[i + 2].max(0) as usize;
                    if i + 2 + count >= ops.len() {
                        debug_assert!(false, "truncated REORDER_CHILDREN list");
                        break;
                    }
                    let children = ops[i + 3..i + 3 + count].iter().map(|&v| Id(v)).collect();
                    out.push(OpRecord::ReorderChildren {
                        id: Id(ops[i + 1]),
                        children,
                    });
                    i += 3 + count;
                }
                OpTag::RenderReason => {
                    if i + 3 >= ops.len() {
                        debug_assert!(false, "truncated RENDER_REASON");
                        break;
                    }
                    let reason = match RenderReason::from_wire(ops[i + 2]) {
                        Some(reason) => reason,
                        None => {
                            debug_assert!(false, "unknown render reason {}", ops[i + 2]);
                            break;
                        }
                    };
                    let count = ops[i + 3].max(0) as usize;
                    if i + 3 + count >= ops.len() {
                        debug_assert!(false, "truncated RENDER_REASON items");
                        break;
                    }
                    let items = ops[i + 4..i + 4 + count]
                        .iter()
                        .map(|&r| self.resolve_string(r))
                        .collect();
                    out.push(OpRecord::RenderReason {
                        id: Id(ops[i + 1]),
                        reason,
                        items,
                    });
                    i += 4 + count;
                }
                OpTag::HocNodes => {
                    if i + 2 >= ops.len() {
                        debug_assert!(false, "truncated HOC_NODES");
                        break;
                    }
                    let count = ops[i + 2].max(0) as usize;
                    if i + 2 + count >= ops.len() {
                        debug_assert!(false, "truncated HOC_NODES list");
                        break;
                    }
                    let names = ops[i + 3..i + 3 + count]
                        .iter()
                        .map(|&r| self.resolve_string(r))
                        .collect();
                    out.push(OpRecord::HocNodes {
                        id: Id(ops[i + 1]),
                        names,
                    });
                    i += 3 + count;
                }
                OpTag::RemoveVnode | OpTag::CommitStats => {
                    debug_assert!(false, "tag {:?} does not appear in the operation stream", tag);
                    break;
                }
            }
        }
        out
    }

    fn resolve_string(&self, reference: i32) -> String {
        match self.strings.get(reference) {
            Some(value) => value.to_string(),
            None => {
                debug_assert!(false, "dangling string reference {reference}");
                String::new()
            }
        }
    }
}

impl Default for Commit {
    fn default() -> Self {
        Self::new()
    }
}

/// A decoded operation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum OpRecord {
    AddRoot {
        id: Id,
        /// Root actually shown: the root itself, or the child it collapsed
        /// onto under the root filter.
        displayed: Id,
    },
    AddVnode {
        id: Id,
        kind: NodeKind,
        ancestor: Id,
        name: String,
        key: Option<String>,
        duration: i32,
    },
    UpdateVnodeTimings {
        id: Id,
        duration: i32,
    },
    ReorderChildren {
        id: Id,
        children: Vec<Id>,
    },
    RenderReason {
        id: Id,
        reason: RenderReason,
        items: Vec<String>,
    },
    HocNodes {
        id: Id,
        names: Vec<String>,
    },
}
