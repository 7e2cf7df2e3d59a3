//! Report columns

use std::fmt;

use crate::error::{CoreError, Result};
use crate::finding::Finding;

/// A column of the tabular, markdown and CSV renderers
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Column {
    Name,
    FilePath,
    Namespace,
    Kind,
    Version,
    Replacement,
    Deprecated,
    DeprecatedIn,
    Removed,
    RemovedIn,
    ReplacementAvailable,
    ReplacementAvailableIn,
    Component,
}

impl Column {
    /// Every column, in catalog order
    pub const ALL: [Column; 13] = [
        Column::Name,
        Column::FilePath,
        Column::Namespace,
        Column::Kind,
        Column::Version,
        Column::Replacement,
        Column::Deprecated,
        Column::DeprecatedIn,
        Column::Removed,
        Column::RemovedIn,
        Column::ReplacementAvailable,
        Column::ReplacementAvailableIn,
        Column::Component,
    ];

    pub const NORMAL: [Column; 6] = [
        Column::Name,
        Column::Kind,
        Column::Version,
        Column::Replacement,
        Column::Removed,
        Column::Deprecated,
    ];

    pub const WIDE: [Column; 11] = [
        Column::Name,
        Column::Namespace,
        Column::Kind,
        Column::Version,
        Column::Replacement,
        Column::Deprecated,
        Column::DeprecatedIn,
        Column::Removed,
        Column::RemovedIn,
        Column::ReplacementAvailable,
        Column::ReplacementAvailableIn,
    ];

    pub fn id(self) -> &'static str {
        match self {
            Column::Name => "name",
            Column::FilePath => "filepath",
            Column::Namespace => "namespace",
            Column::Kind => "kind",
            Column::Version => "version",
            Column::Replacement => "replacement",
            Column::Deprecated => "deprecated",
            Column::DeprecatedIn => "deprecated-in",
            Column::Removed => "removed",
            Column::RemovedIn => "removed-in",
            Column::ReplacementAvailable => "replacement-available",
            Column::ReplacementAvailableIn => "replacement-available-in",
            Column::Component => "component",
        }
    }

    pub fn header(self) -> &'static str {
        match self {
            Column::Name => "NAME",
            Column::FilePath => "FILEPATH",
            Column::Namespace => "NAMESPACE",
            Column::Kind => "KIND",
            Column::Version => "VERSION",
            Column::Replacement => "REPLACEMENT",
            Column::Deprecated => "DEPRECATED",
            Column::DeprecatedIn => "DEPRECATED IN",
            Column::Removed => "REMOVED",
            Column::RemovedIn => "REMOVED IN",
            Column::ReplacementAvailable => "REPL AVAIL",
            Column::ReplacementAvailableIn => "REPL AVAIL IN",
            Column::Component => "COMPONENT",
        }
    }

    /// Cell text for a finding
    pub fn value(self, finding: &Finding) -> String {
        let api = &finding.api;
        match self {
            Column::Name => finding.name.clone(),
            Column::FilePath => finding.file_path.clone(),
            Column::Namespace if finding.namespace.is_empty() => "<UNKNOWN>".to_string(),
            Column::Namespace => finding.namespace.clone(),
            Column::Kind => api.kind.clone(),
            Column::Version => api.api_version.clone(),
            Column::Replacement => api.replacement_api().to_string(),
            Column::Deprecated => finding.deprecated.to_string(),
            Column::DeprecatedIn => api.deprecated_in.clone().unwrap_or_default(),
            Column::Removed => finding.removed.to_string(),
            Column::RemovedIn => api.removed_in.clone().unwrap_or_default(),
            Column::ReplacementAvailable => finding.replacement_available.to_string(),
            Column::ReplacementAvailableIn => {
                api.replacement_available_in.clone().unwrap_or_default()
            }
            Column::Component => api.component.clone(),
        }
    }

    /// Look a column up by id or header, ignoring case
    pub fn parse(name: &str) -> Result<Column> {
        let name = name.trim();
        Self::ALL
            .into_iter()
            .find(|c| c.id().eq_ignore_ascii_case(name) || c.header().eq_ignore_ascii_case(name))
            .ok_or_else(|| CoreError::UnknownColumn {
                name: name.to_string(),
                expected: Self::ALL
                    .iter()
                    .map(|c| c.id())
                    .collect::<Vec<_>>()
                    .join(", "),
            })
    }

    /// Parse a custom column list; the result is in catalog order without duplicates
    pub fn parse_list<S: AsRef<str>>(names: &[S]) -> Result<Vec<Column>> {
        let mut columns = names
            .iter()
            .map(|n| Column::parse(n.as_ref()))
            .collect::<Result<Vec<_>>>()?;
        columns.sort();
        columns.dedup();
        Ok(columns)
    }
}

impl fmt::Display for Column {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.header())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::finding::tests::removed_rule;

    #[test]
    fn test_parse_by_id_or_header() {
        assert_eq!(Column::parse("DEPRECATED IN").unwrap(), Column::DeprecatedIn);
        assert_eq!(Column::parse("deprecated-in").unwrap(), Column::DeprecatedIn);
        assert_eq!(Column::parse("Repl Avail").unwrap(), Column::ReplacementAvailable);
        assert_eq!(Column::parse(" filepath ").unwrap(), Column::FilePath);
    }

    #[test]
    fn test_parse_unknown() {
        let err = Column::parse("colour").unwrap_err();
        assert!(matches!(err, CoreError::UnknownColumn { ref name, .. } if name == "colour"));
        assert!(err.to_string().contains("replacement-available-in"));
    }

    #[test]
    fn test_parse_list_uses_catalog_order() {
        let columns = Column::parse_list(&[
            "NAMESPACE",
            "NAME",
            "DEPRECATED IN",
            "DEPRECATED",
            "REPLACEMENT",
            "VERSION",
            "KIND",
            "name",
        ])
        .unwrap();
        assert_eq!(
            columns,
            vec![
                Column::Name,
                Column::Namespace,
                Column::Kind,
                Column::Version,
                Column::Replacement,
                Column::Deprecated,
                Column::DeprecatedIn,
            ]
        );
    }

    #[test]
    fn test_values() {
        let finding = Finding {
            name: "utilities".into(),
            api: removed_rule(),
            deprecated: true,
            ..Default::default()
        };
        assert_eq!(Column::Namespace.value(&finding), "<UNKNOWN>");
        assert_eq!(Column::Deprecated.value(&finding), "true");
        assert_eq!(Column::Removed.value(&finding), "false");
        assert_eq!(Column::RemovedIn.value(&finding), "v1.16.0");
        assert_eq!(Column::ReplacementAvailableIn.value(&finding), "");
        assert_eq!(Column::Component.value(&finding), "foo");
    }

    #[test]
    fn test_catalog_is_sorted() {
        let mut sorted = Column::ALL;
        sorted.sort();
        assert_eq!(sorted, Column::ALL);
    }
}
