//! apivet Core - deprecated Kubernetes apiVersion detection
//!
//! This crate provides the engine behind apivet:
//! - `RuleTable`: the catalog of deprecated/removed apiVersions (bundled + user overlay)
//! - `Stub`: the minimal view of a manifest needed for matching
//! - `TargetVersions`: the per-component versions a run is evaluated against
//! - `Finding` / `Report`: what was found and how it renders
//! - `RunConfig`: the validated, immutable configuration of a run

pub mod columns;
pub mod config;
pub mod error;
pub mod evaluate;
pub mod exit_code;
pub mod finding;
pub mod matcher;
pub mod output;
pub mod rules;
pub mod stub;
pub mod table;
pub mod targets;

pub use columns::Column;
pub use config::{RunConfig, RunConfigBuilder, RunOptions};
pub use error::{CoreError, Result};
pub use evaluate::Status;
pub use exit_code::{IgnoreFlags, Outcome, classify};
pub use finding::{Finding, Report};
pub use matcher::{detect, match_rule};
pub use output::{OutputFormat, Renderer, render_version_list};
pub use rules::{Rule, RuleFile, RuleTable};
pub use stub::{Stub, decode_stubs};
pub use targets::{
    ResolvedTargets, TargetVersions, compare_versions, is_valid_version, parse_target_flags,
};
