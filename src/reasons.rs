//! Render Reasons
//!
//! Why a node rendered this pass. Hosts either precompute reasons while
//! diffing (exact, cheap at capture time) or let the engine ask for a
//! post-hoc comparison of the prior and current node versions through
//! [`crate::bindings::TreeBindings::render_reason`].

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Why a node rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RenderReason {
    Mount = 1,
    ParentUpdate = 2,
    PropsChanged = 3,
    StateChanged = 4,
    HooksChanged = 5,
    ForceUpdate = 6,
}

impl RenderReason {
    pub fn wire(self) -> i32 {
        self as i32
    }

    pub fn from_wire(value: i32) -> Option<RenderReason> {
        match value {
            1 => Some(RenderReason::Mount),
            2 => Some(RenderReason::ParentUpdate),
            3 => Some(RenderReason::PropsChanged),
            4 => Some(RenderReason::StateChanged),
            5 => Some(RenderReason::HooksChanged),
            6 => Some(RenderReason::ForceUpdate),
            _ => None,
        }
    }
}

/// A reason plus the named inputs that changed, e.g. prop names.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReasonInfo {
    pub reason: RenderReason,
    #[serde(default)]
    pub items: Vec<String>,
}

impl ReasonInfo {
    pub fn new(reason: RenderReason) -> Self {
        Self {
            reason,
            items: Vec::new(),
        }
    }

    pub fn with_items(reason: RenderReason, items: Vec<String>) -> Self {
        Self { reason, items }
    }
}

/// Changed keys between two named-input maps, sorted; `None` when equal.
///
/// Covers additions, removals and value changes. Hosts implementing the
/// post-hoc comparison feed their prop or state maps through this.
pub fn diff_named_inputs(
    prior: &BTreeMap<String, String>,
    current: &BTreeMap<String, String>,
) -> Option<Vec<String>> {
    let mut changed: Vec<String> = Vec::new();
    for (key, value) in current {
        match prior.get(key) {
            Some(previous) if previous == value => {}
            _ => changed.push(key.clone()),
        }
    }
    for key in prior.keys() {
        if !current.contains_key(key) {
            changed.push(key.clone());
        }
    }
    if changed.is_empty() {
        return None;
    }
    changed.sort();
    changed.dedup();
    Some(changed)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn props(pairs: &[(&str, &str)]) -> BTreeMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_equal_inputs_yield_none() {
        let a = props(&[("count", "1"), ("label", "x")]);
        assert_eq!(diff_named_inputs(&a, &a.clone()), None);
    }

    #[test]
    fn test_changed_added_and_removed_keys_are_reported_sorted() {
        let prior = props(&[("count", "1"), ("label", "x"), ("gone", "y")]);
        let current = props(&[("count", "2"), ("label", "x"), ("new", "z")]);
        let changed = diff_named_inputs(&prior, &current).unwrap();
        assert_eq!(changed, vec!["count", "gone", "new"]);
    }

    #[test]
    fn test_wire_values_match_reason_numbering() {
        assert_eq!(RenderReason::Mount.wire(), 1);
        assert_eq!(RenderReason::ForceUpdate.wire(), 6);
        assert_eq!(RenderReason::from_wire(3), Some(RenderReason::PropsChanged));
        assert_eq!(RenderReason::from_wire(7), None);
    }
}
