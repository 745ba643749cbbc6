//! Scenario Replay
//!
//! Drives the traversal engine from a declarative scenario file: a sequence
//! of pass descriptions loaded into the in-memory host one after another,
//! each observed as one commit. Scenarios are the unit of reproduction;
//! a report of odd encoder output should come with one attached.

use std::collections::{HashMap, HashSet};
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::commit::Commit;
use crate::error::ReplayError;
use crate::filter::{FilterConfig, FilterState};
use crate::memtree::{MemTree, NodeSpec};
use crate::profiler::ProfilerState;
use crate::reasons::ReasonInfo;
use crate::timings::PassTimings;
use crate::traverse::Recorder;

/// Profiler switches for a whole scenario.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ProfilerConfig {
    pub profiling: bool,
    pub capture_reasons: bool,
    pub highlight_updates: bool,
    pub record_stats: bool,
}

/// One render pass: the tree as it stands afterwards, plus captured
/// timings and optional precomputed reasons, both keyed by logical id.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PassSpec {
    pub tree: NodeSpec,
    /// Logical id to observe from; the top of the tree when absent.
    #[serde(default)]
    pub subject: Option<u32>,
    #[serde(default)]
    pub timings: HashMap<u32, (f64, f64)>,
    #[serde(default)]
    pub reasons: HashMap<u32, ReasonInfo>,
}

/// A replayable recording of consecutive render passes over one tree.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Scenario {
    #[serde(default)]
    pub label: Option<String>,
    #[serde(default)]
    pub filters: FilterConfig,
    #[serde(default)]
    pub profiler: ProfilerConfig,
    pub passes: Vec<PassSpec>,
}

impl Scenario {
    pub fn from_json(raw: &str) -> Result<Scenario, ReplayError> {
        let scenario: Scenario = serde_json::from_str(raw)?;
        Ok(scenario)
    }

    pub fn from_path(path: &Path) -> Result<Scenario, ReplayError> {
        let raw = std::fs::read_to_string(path)?;
        Self::from_json(&raw)
    }

    /// Structural checks that do not require loading: at least one pass,
    /// and every subject, timing and reason entry naming a logical id that
    /// exists in its pass tree. Duplicate ids surface at load time instead.
    pub fn validate(&self) -> Result<(), ReplayError> {
        if self.passes.is_empty() {
            return Err(ReplayError::Empty);
        }
        for pass in &self.passes {
            let mut logicals = HashSet::new();
            collect_logicals(&pass.tree, &mut logicals);
            if let Some(subject) = pass.subject {
                if !logicals.contains(&subject) {
                    return Err(ReplayError::UnknownLogicalId(subject));
                }
            }
            for logical in pass.timings.keys().chain(pass.reasons.keys()) {
                if !logicals.contains(logical) {
                    return Err(ReplayError::UnknownLogicalId(*logical));
                }
            }
        }
        Ok(())
    }
}

fn collect_logicals(spec: &NodeSpec, out: &mut HashSet<u32>) {
    out.insert(spec.id);
    for child in spec.children.iter().flatten() {
        collect_logicals(child, out);
    }
}

/// What one replayed pass produced.
#[derive(Debug)]
pub struct PassOutcome {
    pub commit: Commit,
    /// Platform handles queued for a highlight flash during the pass.
    pub highlights: Vec<u32>,
}

/// Replay every pass of `scenario` in order.
pub fn replay(scenario: &Scenario) -> Result<Vec<PassOutcome>, ReplayError> {
    scenario.validate()?;
    let filters = FilterState::from_config(&scenario.filters)?;

    let mut profiler = ProfilerState::new();
    profiler.profiling = scenario.profiler.profiling;
    profiler.capture_reasons = scenario.profiler.capture_reasons;
    profiler.highlight_updates = scenario.profiler.highlight_updates;
    profiler.record_stats = scenario.profiler.record_stats;

    let mut tree = MemTree::new();
    let mut recorder = Recorder::new();
    let mut outcomes = Vec::with_capacity(scenario.passes.len());

    for (index, pass) in scenario.passes.iter().enumerate() {
        let loaded = tree.load_pass(&pass.tree)?;
        let subject = match pass.subject {
            Some(logical) => loaded
                .handle(logical)
                .ok_or(ReplayError::UnknownLogicalId(logical))?,
            None => loaded.root,
        };

        let mut timings = PassTimings::new();
        for (&logical, &(start, end)) in &pass.timings {
            let handle = loaded
                .handle(logical)
                .ok_or(ReplayError::UnknownLogicalId(logical))?;
            timings.record(handle, start, end);
        }

        let mut reasons = HashMap::new();
        for (&logical, info) in &pass.reasons {
            let handle = loaded
                .handle(logical)
                .ok_or(ReplayError::UnknownLogicalId(logical))?;
            reasons.insert(handle, info.clone());
        }
        let reasons = if reasons.is_empty() {
            None
        } else {
            Some(reasons)
        };

        let commit = recorder.record_commit(
            &tree,
            &subject,
            &filters,
            &mut profiler,
            &timings,
            reasons.as_ref(),
        );
        let highlights = profiler.drain_highlights();
        debug!(
            pass = index,
            ops = commit.ops.len(),
            highlights = highlights.len(),
            "replayed pass"
        );
        outcomes.push(PassOutcome { commit, highlights });
    }
    Ok(outcomes)
}
