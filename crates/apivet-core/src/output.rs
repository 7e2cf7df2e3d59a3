//! Report rendering

use std::fmt;
use std::io::Write;
use std::str::FromStr;

use crate::columns::Column;
use crate::config::RunConfig;
use crate::error::{CoreError, Result};
use crate::finding::{Finding, Report};
use crate::rules::{Rule, RuleTable};
use crate::table::{write_csv_record, write_markdown, write_tabular};

pub const NO_RESOURCES_MESSAGE: &str =
    "There were no resources found with known deprecated apiVersions.";
pub const NO_OUTPUT_MESSAGE: &str = "No output to display";

/// Output format as selected on the command line
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OutputFormat {
    #[default]
    Normal,
    Wide,
    Custom,
    Markdown,
    Csv,
    Json,
    Yaml,
}

impl OutputFormat {
    pub const ALL: [OutputFormat; 7] = [
        OutputFormat::Normal,
        OutputFormat::Wide,
        OutputFormat::Custom,
        OutputFormat::Markdown,
        OutputFormat::Csv,
        OutputFormat::Json,
        OutputFormat::Yaml,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            OutputFormat::Normal => "normal",
            OutputFormat::Wide => "wide",
            OutputFormat::Custom => "custom",
            OutputFormat::Markdown => "markdown",
            OutputFormat::Csv => "csv",
            OutputFormat::Json => "json",
            OutputFormat::Yaml => "yaml",
        }
    }

    /// Whether custom columns apply to this format
    pub fn uses_columns(self) -> bool {
        matches!(
            self,
            OutputFormat::Custom | OutputFormat::Markdown | OutputFormat::Csv
        )
    }
}

impl FromStr for OutputFormat {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self> {
        Self::ALL
            .into_iter()
            .find(|f| f.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| CoreError::UnknownOutputFormat(s.to_string()))
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How a report is written out
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Renderer {
    /// Aligned columns (normal, wide, custom)
    Tabular { columns: Vec<Column>, pad: char },
    Markdown { columns: Vec<Column> },
    Csv { columns: Vec<Column> },
    Json,
    Yaml,
}

impl Renderer {
    /// Pick the renderer for `format`; `custom` columns are already in catalog order
    pub fn new(format: OutputFormat, custom: &[Column]) -> Result<Self> {
        let custom_or_wide = || {
            if custom.is_empty() {
                Column::WIDE.to_vec()
            } else {
                custom.to_vec()
            }
        };
        Ok(match format {
            OutputFormat::Normal => Renderer::tabular(Column::NORMAL.to_vec()),
            OutputFormat::Wide => Renderer::tabular(Column::WIDE.to_vec()),
            OutputFormat::Custom if custom.is_empty() => return Err(CoreError::MissingColumns),
            OutputFormat::Custom => Renderer::tabular(custom.to_vec()),
            OutputFormat::Markdown => Renderer::Markdown {
                columns: custom_or_wide(),
            },
            OutputFormat::Csv => Renderer::Csv {
                columns: custom_or_wide(),
            },
            OutputFormat::Json => Renderer::Json,
            OutputFormat::Yaml => Renderer::Yaml,
        })
    }

    fn tabular(columns: Vec<Column>) -> Self {
        Renderer::Tabular { columns, pad: ' ' }
    }

    /// Replace the tabular pad character
    pub fn with_pad(self, pad: char) -> Self {
        match self {
            Renderer::Tabular { columns, .. } => Renderer::Tabular { columns, pad },
            other => other,
        }
    }

    /// JSON and YAML serialize the whole report, even when empty
    pub fn is_structured(&self) -> bool {
        matches!(self, Renderer::Json | Renderer::Yaml)
    }

    pub fn columns(&self) -> &[Column] {
        match self {
            Renderer::Tabular { columns, .. }
            | Renderer::Markdown { columns }
            | Renderer::Csv { columns } => columns,
            Renderer::Json | Renderer::Yaml => &[],
        }
    }

    /// Write `report` as is, without filtering
    pub fn render<W: Write>(&self, report: &Report, no_headers: bool, out: &mut W) -> Result<()> {
        match self {
            Renderer::Json => {
                writeln!(out, "{}", serde_json::to_string(report)?)?;
            }
            Renderer::Yaml => {
                write!(out, "{}", serde_yaml::to_string(report)?)?;
            }
            _ => {
                let columns = self.columns();
                let header: Vec<String> = columns.iter().map(|c| c.header().to_string()).collect();
                let rows: Vec<Vec<String>> = report
                    .items
                    .iter()
                    .map(|finding| finding_row(columns, finding))
                    .collect();
                self.write_rows(header, rows, no_headers, out)?;
            }
        }
        Ok(())
    }

    fn write_rows<W: Write>(
        &self,
        header: Vec<String>,
        rows: Vec<Vec<String>>,
        no_headers: bool,
        out: &mut W,
    ) -> Result<()> {
        match self {
            Renderer::Tabular { pad, .. } => {
                let mut all = Vec::with_capacity(rows.len() + 1);
                if !no_headers {
                    all.push(header);
                }
                all.extend(rows);
                write_tabular(out, &all, *pad)?;
            }
            Renderer::Markdown { .. } => {
                let header = (!no_headers).then_some(header.as_slice());
                write_markdown(out, header, &rows)?;
            }
            Renderer::Csv { .. } => {
                if !no_headers {
                    write_csv_record(out, &header)?;
                }
                for row in &rows {
                    write_csv_record(out, row)?;
                }
            }
            Renderer::Json | Renderer::Yaml => {}
        }
        Ok(())
    }
}

fn finding_row(columns: &[Column], finding: &Finding) -> Vec<String> {
    columns.iter().map(|c| c.value(finding)).collect()
}

impl Report {
    /// Filter the report for `config` and write it out.
    ///
    /// Table formats print a fixed message instead of an empty table.
    pub fn display<W: Write>(&mut self, config: &RunConfig, out: &mut W) -> Result<()> {
        let options = config.options();
        let renderer = &options.renderer;

        if self.items.is_empty() && !renderer.is_structured() {
            writeln!(out, "{NO_RESOURCES_MESSAGE}")?;
            return Ok(());
        }

        let before = self.items.len();
        self.filter(config.components(), options.only_show_removed);
        tracing::debug!(before, after = self.items.len(), "filtered findings");

        if self.items.is_empty() && !renderer.is_structured() {
            writeln!(out, "{NO_OUTPUT_MESSAGE}")?;
            return Ok(());
        }

        renderer.render(self, options.no_headers, out)
    }
}

const VERSION_LIST_HEADER: [&str; 7] = [
    "KIND",
    "NAME",
    "DEPRECATED IN",
    "REMOVED IN",
    "REPLACEMENT",
    "REPL AVAIL IN",
    "COMPONENT",
];

fn version_row(rule: &Rule) -> Vec<String> {
    let or_na = |value: Option<&str>| {
        value
            .filter(|v| !v.is_empty())
            .unwrap_or("n/a")
            .to_string()
    };
    vec![
        or_na(Some(&rule.kind)),
        rule.api_version.clone(),
        or_na(rule.deprecated_in.as_deref()),
        or_na(rule.removed_in.as_deref()),
        or_na(rule.replacement_api.as_deref()),
        or_na(rule.replacement_available_in.as_deref()),
        or_na(Some(&rule.component)),
    ]
}

/// Write the rule catalog itself
pub fn render_version_list<W: Write>(
    table: &RuleTable,
    renderer: &Renderer,
    no_headers: bool,
    out: &mut W,
) -> Result<()> {
    match renderer {
        Renderer::Json => {
            writeln!(out, "{}", serde_json::to_string(&table.to_rule_file())?)?;
            Ok(())
        }
        Renderer::Yaml => {
            write!(out, "{}", serde_yaml::to_string(&table.to_rule_file())?)?;
            Ok(())
        }
        _ => {
            let header = VERSION_LIST_HEADER.iter().map(|h| h.to_string()).collect();
            let rows = table.rules().iter().map(version_row).collect();
            renderer.write_rows(header, rows, no_headers, out)
        }
    }
}
