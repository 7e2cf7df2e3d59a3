//! Findings and run reports

use serde::{Deserialize, Serialize};

use crate::rules::Rule;
use crate::stub::Stub;
use crate::targets::TargetVersions;

/// An object found to use a catalogued apiVersion
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Finding {
    /// Object name, or `release/object` for Helm releases
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub name: String,

    #[serde(rename = "filePath", default, skip_serializing_if = "String::is_empty")]
    pub file_path: String,

    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub namespace: String,

    /// Matched rule; for wildcard rules the kind is the object's kind
    pub api: Rule,

    #[serde(default)]
    pub deprecated: bool,

    #[serde(default)]
    pub removed: bool,

    #[serde(rename = "replacementAvailable", default)]
    pub replacement_available: bool,
}

impl Finding {
    pub fn new(stub: &Stub, api: Rule) -> Self {
        Self {
            name: stub.name.clone(),
            namespace: stub.namespace.clone().unwrap_or_default(),
            api,
            ..Default::default()
        }
    }

    pub fn with_file_path(mut self, path: impl Into<String>) -> Self {
        self.file_path = path.into();
        self
    }

    /// Recompute the status flags against `targets`
    pub fn evaluate(&mut self, targets: &TargetVersions) {
        let status = self.api.status(targets);
        self.deprecated = status.deprecated;
        self.removed = status.removed;
        self.replacement_available = status.replacement_available;
    }
}

/// Everything a run found, with the targets it was evaluated against
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Report {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub items: Vec<Finding>,

    #[serde(
        rename = "target-versions",
        default,
        skip_serializing_if = "TargetVersions::is_empty"
    )]
    pub target_versions: TargetVersions,
}

impl Report {
    pub fn new(items: Vec<Finding>, target_versions: TargetVersions) -> Self {
        Self {
            items,
            target_versions,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Evaluate every finding and drop those not worth reporting.
    ///
    /// A finding survives when its component is active and it is removed, or deprecated
    /// unless `only_show_removed` is set.
    pub fn filter<S: AsRef<str>>(&mut self, components: &[S], only_show_removed: bool) {
        let targets = &self.target_versions;
        self.items.retain_mut(|finding| {
            finding.evaluate(targets);
            let relevant = if only_show_removed {
                finding.removed
            } else {
                finding.deprecated || finding.removed
            };
            relevant
                && components
                    .iter()
                    .any(|c| c.as_ref() == finding.api.component)
        });
    }
}
