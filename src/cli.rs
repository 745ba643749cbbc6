//! Command Line Interface
//!
//! Replays scenario files and prints the encoded commit stream, either as
//! decoded records for reading or as raw flattened frames for feeding a
//! consumer. Logs go to stderr; everything printed to stdout is output.

use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use serde_json::json;
use tracing::info;

use crate::commit::OpRecord;
use crate::error::{ConfigError, ReplayError};
use crate::ids::Id;
use crate::logging::{init_logging, LoggingConfig};
use crate::replay::{self, PassOutcome, Scenario};

/// Treescope CLI - Render-pass observation and commit encoding
#[derive(Parser)]
#[command(name = "treescope")]
#[command(about = "Replay render-pass scenarios and inspect the encoded commit stream")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Log level (trace, debug, info, warn, error, off)
    #[arg(long)]
    pub log_level: Option<String>,

    /// Log format (json, text)
    #[arg(long)]
    pub log_format: Option<String>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Replay a scenario file pass by pass
    Replay {
        /// Scenario file path
        scenario: PathBuf,

        /// Output format (text or json)
        #[arg(long, default_value = "text")]
        format: String,

        /// Also print each pass's raw flattened frame
        #[arg(long)]
        frames: bool,

        /// Extra display-name patterns to hide, on top of the scenario's
        #[arg(long)]
        hide: Vec<String>,
    },
    /// Parse and check a scenario file without replaying it
    Validate {
        /// Scenario file path
        scenario: PathBuf,
    },
}

/// Execution context created once per invocation.
pub struct CliContext;

impl CliContext {
    /// Install logging with CLI overrides applied on top of defaults.
    pub fn new(log_level: Option<String>, log_format: Option<String>) -> Result<Self, ConfigError> {
        let mut config = LoggingConfig::default();
        if let Some(level) = log_level {
            config.level = level;
        }
        if let Some(format) = log_format {
            config.format = format;
        }
        init_logging(&config)?;
        Ok(CliContext)
    }

    pub fn execute(&self, command: &Commands) -> Result<String, ReplayError> {
        match command {
            Commands::Replay {
                scenario,
                format,
                frames,
                hide,
            } => self.run_replay(scenario, format, *frames, hide),
            Commands::Validate { scenario } => self.run_validate(scenario),
        }
    }

    fn run_replay(
        &self,
        path: &Path,
        format: &str,
        frames: bool,
        hide: &[String],
    ) -> Result<String, ReplayError> {
        let mut scenario = Scenario::from_path(path)?;
        scenario.filters.patterns.extend(hide.iter().cloned());
        info!(
            path = %path.display(),
            passes = scenario.passes.len(),
            "replaying scenario"
        );
        let outcomes = replay::replay(&scenario)?;
        if format == "json" {
            render_json(&scenario, &outcomes, frames)
        } else {
            Ok(render_text(&scenario, &outcomes, frames))
        }
    }

    fn run_validate(&self, path: &Path) -> Result<String, ReplayError> {
        let scenario = Scenario::from_path(path)?;
        scenario.validate()?;
        Ok(format!(
            "scenario ok: {} pass{}",
            scenario.passes.len(),
            if scenario.passes.len() == 1 { "" } else { "es" }
        ))
    }
}

fn render_text(scenario: &Scenario, outcomes: &[PassOutcome], frames: bool) -> String {
    let mut lines = Vec::new();
    if let Some(label) = &scenario.label {
        lines.push(format!("scenario: {}", label));
    }
    for (index, outcome) in outcomes.iter().enumerate() {
        let commit = &outcome.commit;
        lines.push(format!(
            "pass {}: root={} ops={} unmounts={} strings={}",
            index,
            commit.root_id,
            commit.ops.len(),
            commit.unmount_ids.len(),
            commit.strings.len()
        ));
        if !commit.unmount_ids.is_empty() {
            lines.push(format!("  REMOVE_VNODE [{}]", join_ids(&commit.unmount_ids)));
        }
        for record in commit.records() {
            lines.push(format!("  {}", describe(&record)));
        }
        if let Some(stats) = &commit.stats {
            lines.push(format!(
                "  stats: mounts={} updates={} unmounts={} roots={} components={} elements={} text={}",
                stats.mounts,
                stats.updates,
                stats.unmounts,
                stats.roots.total,
                stats.components.total,
                stats.elements.total,
                stats.text
            ));
        }
        if !outcome.highlights.is_empty() {
            lines.push(format!("  highlights: {:?}", outcome.highlights));
        }
        if frames {
            lines.push(format!("  frame: {:?}", commit.flatten()));
        }
    }
    lines.join("\n")
}

fn render_json(
    scenario: &Scenario,
    outcomes: &[PassOutcome],
    frames: bool,
) -> Result<String, ReplayError> {
    let passes: Vec<serde_json::Value> = outcomes
        .iter()
        .enumerate()
        .map(|(index, outcome)| {
            let mut entry = json!({
                "pass": index,
                "commit": &outcome.commit,
                "highlights": outcome.highlights,
            });
            if frames {
                entry["frame"] = json!(outcome.commit.flatten());
            }
            entry
        })
        .collect();
    let value = json!({
        "label": scenario.label,
        "passes": passes,
    });
    Ok(serde_json::to_string_pretty(&value)?)
}

fn describe(record: &OpRecord) -> String {
    match record {
        OpRecord::AddRoot { id, displayed } => {
            if displayed == id {
                format!("ADD_ROOT {}", id)
            } else {
                format!("ADD_ROOT {} displayed={}", id, displayed)
            }
        }
        OpRecord::AddVnode {
            id,
            kind,
            ancestor,
            name,
            key,
            duration,
        } => {
            let mut line = format!(
                "ADD_VNODE {} {:?} parent={} name={:?} duration={}",
                id, kind, ancestor, name, duration
            );
            if let Some(key) = key {
                line.push_str(&format!(" key={:?}", key));
            }
            line
        }
        OpRecord::UpdateVnodeTimings { id, duration } => {
            format!("UPDATE_VNODE_TIMINGS {} duration={}", id, duration)
        }
        OpRecord::ReorderChildren { id, children } => {
            format!("REORDER_CHILDREN {} [{}]", id, join_ids(children))
        }
        OpRecord::RenderReason { id, reason, items } => {
            if items.is_empty() {
                format!("RENDER_REASON {} {:?}", id, reason)
            } else {
                format!("RENDER_REASON {} {:?} [{}]", id, reason, items.join(", "))
            }
        }
        OpRecord::HocNodes { id, names } => {
            format!("HOC_NODES {} [{}]", id, names.join(", "))
        }
    }
}

fn join_ids(ids: &[Id]) -> String {
    ids.iter()
        .map(|id| id.to_string())
        .collect::<Vec<_>>()
        .join(", ")
}
