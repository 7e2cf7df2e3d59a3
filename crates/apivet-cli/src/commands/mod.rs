//! CLI commands
//!
//! Every detect command follows the same shape: build the [`RunConfig`] from the global flags,
//! collect findings from its source, then hand them to [`RunConfig::report`].

use std::io::Write;

use apivet_core::{Finding, Outcome, RunConfig};

use crate::GlobalArgs;
use crate::error::{CliError, Result};

pub mod detect;
pub mod detect_all_in_cluster;
pub mod detect_api_resources;
pub mod detect_files;
pub mod detect_helm;
pub mod list_versions;

/// Validate the global flags into a run configuration
pub fn build_config(global: &GlobalArgs) -> Result<RunConfig> {
    let mut builder = RunConfig::builder()
        .output(global.output)
        .columns(global.columns.iter().cloned())
        .target_flags(global.target_versions.iter().cloned())
        .components(global.components.iter().cloned())
        .ignore_deprecations(global.ignore_deprecations)
        .ignore_removals(global.ignore_removals)
        .ignore_unavailable_replacements(global.ignore_unavailable_replacements)
        .only_show_removed(global.only_show_removed)
        .no_headers(global.no_headers);

    if let Some(path) = &global.additional_versions {
        let overlay = std::fs::read(path).map_err(|e| CliError::io_at(path, e))?;
        builder = builder.overlay(overlay);
    }

    Ok(builder.build()?)
}

/// Render `findings` to stdout and classify them
pub fn report(config: &RunConfig, findings: Vec<Finding>) -> Result<Outcome> {
    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    let outcome = config.report(findings, &mut out)?;
    out.flush()?;
    Ok(outcome)
}

#[cfg(test)]
mod tests {
    use super::*;
    use apivet_core::OutputFormat;

    fn global() -> GlobalArgs {
        GlobalArgs {
            output: OutputFormat::Normal,
            columns: Vec::new(),
            target_versions: Vec::new(),
            additional_versions: None,
            components: Vec::new(),
            ignore_deprecations: false,
            ignore_removals: false,
            ignore_unavailable_replacements: false,
            only_show_removed: false,
            no_headers: false,
            verbose: 0,
        }
    }

    #[test]
    fn test_build_config_defaults() {
        let config = build_config(&global()).unwrap();
        assert_eq!(config.target_versions().get("k8s"), Some("v1.25.0"));
    }

    #[test]
    fn test_missing_overlay_is_io_error() {
        let mut args = global();
        args.additional_versions = Some("/no/such/versions.yaml".into());
        let err = build_config(&args).unwrap_err();
        assert!(matches!(err, CliError::Io { .. }));
        assert!(err.to_string().contains("/no/such/versions.yaml"));
    }

    #[test]
    fn test_unknown_component_target() {
        let mut args = global();
        args.components = vec!["bar".into()];
        let err = build_config(&args).unwrap_err();
        assert!(matches!(err, CliError::Config { .. }));
        assert!(err.to_string().contains("bar"));
    }
}
