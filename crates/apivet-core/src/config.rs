//! Run configuration
//!
//! Everything a run needs is validated once, up front, by [`RunConfigBuilder::build`]. Scanning
//! only starts after that succeeded, so configuration mistakes never surface halfway through.

use std::io::Write;

use crate::columns::Column;
use crate::error::Result;
use crate::exit_code::{IgnoreFlags, Outcome, classify};
use crate::finding::{Finding, Report};
use crate::output::{OutputFormat, Renderer};
use crate::rules::RuleTable;
use crate::targets::{TargetVersions, parse_target_flags, resolve};

/// Rendering and classification switches
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunOptions {
    pub ignore: IgnoreFlags,
    pub only_show_removed: bool,
    pub no_headers: bool,
    pub renderer: Renderer,
}

/// Validated, immutable configuration of one run
#[derive(Debug, Clone)]
pub struct RunConfig {
    table: RuleTable,
    targets: TargetVersions,
    components: Vec<String>,
    options: RunOptions,
}

impl RunConfig {
    pub fn builder() -> RunConfigBuilder {
        RunConfigBuilder::default()
    }

    pub fn table(&self) -> &RuleTable {
        &self.table
    }

    pub fn target_versions(&self) -> &TargetVersions {
        &self.targets
    }

    /// Components findings are reported for
    pub fn components(&self) -> &[String] {
        &self.components
    }

    pub fn options(&self) -> &RunOptions {
        &self.options
    }

    /// Render `findings` and classify what remains after filtering
    pub fn report<W: Write>(&self, findings: Vec<Finding>, out: &mut W) -> Result<Outcome> {
        let mut report = Report::new(findings, self.targets.clone());
        report.display(self, out)?;
        Ok(classify(&report.items, &self.targets, self.options.ignore))
    }
}

#[derive(Debug, Default)]
pub struct RunConfigBuilder {
    table: Option<RuleTable>,
    overlay: Option<Vec<u8>>,
    target_versions: TargetVersions,
    target_flags: Vec<String>,
    components: Vec<String>,
    format: OutputFormat,
    columns: Vec<String>,
    ignore: IgnoreFlags,
    only_show_removed: bool,
    no_headers: bool,
    pad: Option<char>,
}

impl RunConfigBuilder {
    /// Use this table instead of the bundled catalog
    pub fn rule_table(mut self, table: RuleTable) -> Self {
        self.table = Some(table);
        self
    }

    /// Additional rules appended to the bundled catalog
    pub fn overlay(mut self, data: Vec<u8>) -> Self {
        self.overlay = Some(data);
        self
    }

    pub fn target_versions(mut self, targets: TargetVersions) -> Self {
        self.target_versions = targets;
        self
    }

    /// `component=version` pairs; they win over [`Self::target_versions`]
    pub fn target_flags<I, S>(mut self, flags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.target_flags = flags.into_iter().map(Into::into).collect();
        self
    }

    pub fn components<I, S>(mut self, components: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.components = components.into_iter().map(Into::into).collect();
        self
    }

    pub fn output(mut self, format: OutputFormat) -> Self {
        self.format = format;
        self
    }

    pub fn columns<I, S>(mut self, columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.columns = columns.into_iter().map(Into::into).collect();
        self
    }

    pub fn ignore_deprecations(mut self, yes: bool) -> Self {
        self.ignore.deprecations = yes;
        self
    }

    pub fn ignore_removals(mut self, yes: bool) -> Self {
        self.ignore.removals = yes;
        self
    }

    pub fn ignore_unavailable_replacements(mut self, yes: bool) -> Self {
        self.ignore.unavailable_replacements = yes;
        self
    }

    pub fn only_show_removed(mut self, yes: bool) -> Self {
        self.only_show_removed = yes;
        self
    }

    pub fn no_headers(mut self, yes: bool) -> Self {
        self.no_headers = yes;
        self
    }

    /// Pad character of the tabular formats
    pub fn pad_char(mut self, pad: char) -> Self {
        self.pad = Some(pad);
        self
    }

    pub fn build(self) -> Result<RunConfig> {
        let table = match (self.table, self.overlay) {
            (Some(table), _) => table,
            (None, Some(overlay)) => RuleTable::with_overlay(&overlay)?,
            (None, None) => RuleTable::bundled()?,
        };

        let mut user = parse_target_flags(&self.target_flags)?;
        user.fill_from(&self.target_versions);
        let resolved = resolve(&user, &table, &self.components)?;

        let columns = if self.format.uses_columns() {
            Column::parse_list(&self.columns)?
        } else {
            Vec::new()
        };
        let mut renderer = Renderer::new(self.format, &columns)?;
        if let Some(pad) = self.pad {
            renderer = renderer.with_pad(pad);
        }

        tracing::debug!(
            rules = table.len(),
            components = ?resolved.components,
            format = %self.format,
            "run configuration ready"
        );

        Ok(RunConfig {
            table,
            targets: resolved.targets,
            components: resolved.components,
            options: RunOptions {
                ignore: self.ignore,
                only_show_removed: self.only_show_removed,
                no_headers: self.no_headers,
                renderer,
            },
        })
    }
}
