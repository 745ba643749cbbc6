//! Filter Engine
//!
//! Decides which live nodes the observer sees. Hidden nodes are spliced out
//! of the projected tree: their visible descendants take their place in the
//! parent's child list, preserving declaration order. Filter state is
//! compiled once from user-facing configuration and read-only during a
//! pass; pattern validity is settled here, never mid-traversal.

use std::collections::HashSet;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::bindings::TreeBindings;
use crate::error::ConfigError;
use crate::hoc;

/// Built-in node categories a user can hide wholesale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TypeFilter {
    /// Platform primitive elements.
    Dom,
    /// Grouping-only nodes below the top level.
    Fragment,
    /// Decorator-shaped wrapper components.
    Hoc,
    /// Collapse a root onto its only child.
    Root,
}

impl TypeFilter {
    pub fn parse(value: &str) -> Result<TypeFilter, ConfigError> {
        match value {
            "dom" => Ok(TypeFilter::Dom),
            "fragment" => Ok(TypeFilter::Fragment),
            "hoc" => Ok(TypeFilter::Hoc),
            "root" => Ok(TypeFilter::Root),
            other => Err(ConfigError::UnknownCategory(other.to_string())),
        }
    }
}

/// User-facing filter description, as it appears in scenario files.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FilterConfig {
    /// Categories to hide.
    #[serde(default)]
    pub types: Vec<TypeFilter>,
    /// Display-name patterns to hide.
    #[serde(default)]
    pub patterns: Vec<String>,
}

/// Compiled filter state, read-only to the engine during a pass.
#[derive(Debug, Default)]
pub struct FilterState {
    types: HashSet<TypeFilter>,
    patterns: Vec<Regex>,
}

impl FilterState {
    /// Compile a configuration; invalid patterns fail here so the engine
    /// can assume every pattern matches or does not, nothing else.
    pub fn from_config(config: &FilterConfig) -> Result<FilterState, ConfigError> {
        let mut patterns = Vec::with_capacity(config.patterns.len());
        for pattern in &config.patterns {
            let compiled = Regex::new(pattern).map_err(|source| ConfigError::InvalidPattern {
                pattern: pattern.clone(),
                source,
            })?;
            patterns.push(compiled);
        }
        Ok(FilterState {
            types: config.types.iter().copied().collect(),
            patterns,
        })
    }

    pub fn hides(&self, category: TypeFilter) -> bool {
        self.types.contains(&category)
    }

    /// Whether the observer should not see `node`. Rules are ordered and
    /// the first match hides:
    ///
    /// 1. text nodes, always;
    /// 2. grouping nodes while the fragment filter is on decide here:
    ///    hidden with a parent, kept outright at the top level so a root
    ///    remains even when a later rule would match it;
    /// 3. platform elements while the dom filter is on;
    /// 4. decorator-shaped names while the wrapper filter is on, except the
    ///    forwarding marker;
    /// 5. any enabled pattern matching the display name;
    /// 6. a portal directly under a suspense boundary, always.
    pub fn should_hide<B: TreeBindings>(&self, bindings: &B, node: &B::Node) -> bool {
        if bindings.is_text(node) {
            return true;
        }
        if self.hides(TypeFilter::Fragment) && bindings.is_grouping(node) {
            return bindings.parent(node).is_some();
        }
        if self.hides(TypeFilter::Dom) && bindings.is_element(node) {
            return true;
        }
        let name = bindings.display_name(node);
        if self.hides(TypeFilter::Hoc) && name.contains('(') && !hoc::is_forwarding_name(&name) {
            return true;
        }
        if self.patterns.iter().any(|pattern| pattern.is_match(&name)) {
            return true;
        }
        if bindings.is_portal(node) {
            if let Some(parent) = bindings.parent(node) {
                if bindings.is_suspense(&parent) {
                    return true;
                }
            }
        }
        false
    }

    /// Visible children of `node` in declaration order, with hidden
    /// children replaced in place by their own visible descendants.
    pub fn visible_children<B: TreeBindings>(&self, bindings: &B, node: &B::Node) -> Vec<B::Node> {
        let mut out = Vec::new();
        let mut stack = bindings.children(node);
        while let Some(slot) = stack.pop() {
            if let Some(child) = slot {
                if !self.should_hide(bindings, &child) {
                    out.push(child);
                } else {
                    stack.extend(bindings.children(&child));
                }
            }
        }
        out.reverse();
        out
    }
}
