//! Version rule table
//!
//! A rule describes one `apiVersion`/`kind` combination and the component versions at which it
//! became deprecated, got removed, and when its replacement became available. The default
//! catalog is compiled into the binary; users can append their own rules on top of it.

use serde::{Deserialize, Deserializer, Serialize};
use std::collections::HashSet;

use crate::error::{CoreError, Result};
use crate::targets::{TargetVersions, is_valid_version};

/// Catalog bundled with every build
const BUNDLED_VERSIONS: &[u8] = include_bytes!("../versions.yaml");

/// One entry of the rule catalog
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rule {
    /// apiVersion this rule matches, e.g. `extensions/v1beta1`
    #[serde(rename = "version")]
    pub api_version: String,

    /// Kind this rule matches; empty matches any kind
    #[serde(default)]
    pub kind: String,

    #[serde(
        rename = "deprecated-in",
        default,
        deserialize_with = "empty_as_none",
        skip_serializing_if = "Option::is_none"
    )]
    pub deprecated_in: Option<String>,

    #[serde(
        rename = "removed-in",
        default,
        deserialize_with = "empty_as_none",
        skip_serializing_if = "Option::is_none"
    )]
    pub removed_in: Option<String>,

    #[serde(
        rename = "replacement-api",
        default,
        deserialize_with = "empty_as_none",
        skip_serializing_if = "Option::is_none"
    )]
    pub replacement_api: Option<String>,

    /// Version in which the replacement API appeared; none means it always existed
    #[serde(
        rename = "replacement-available-in",
        default,
        deserialize_with = "empty_as_none",
        skip_serializing_if = "Option::is_none"
    )]
    pub replacement_available_in: Option<String>,

    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub component: String,
}

fn empty_as_none<'de, D>(deserializer: D) -> std::result::Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<String>::deserialize(deserializer)?;
    Ok(value.filter(|s| !s.is_empty()))
}

impl Rule {
    /// Whether this rule applies to an object of the given apiVersion and kind
    pub fn matches(&self, api_version: &str, kind: &str) -> bool {
        self.api_version == api_version && (self.kind.is_empty() || self.kind == kind)
    }

    pub fn is_wildcard(&self) -> bool {
        self.kind.is_empty()
    }

    pub fn replacement_api(&self) -> &str {
        self.replacement_api.as_deref().unwrap_or_default()
    }

    fn validate(&self) -> Result<()> {
        let thresholds = [
            ("deprecated-in", &self.deprecated_in),
            ("removed-in", &self.removed_in),
            ("replacement-available-in", &self.replacement_available_in),
        ];
        for (field, value) in thresholds {
            if let Some(value) = value
                && !is_valid_version(value)
            {
                return Err(CoreError::InvalidRuleVersion {
                    kind: self.kind.clone(),
                    api_version: self.api_version.clone(),
                    field,
                    value: value.clone(),
                });
            }
        }
        Ok(())
    }
}

/// On-disk layout of a versions file
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuleFile {
    #[serde(rename = "deprecated-versions", default)]
    pub deprecated_versions: Vec<Rule>,

    #[serde(
        rename = "target-versions",
        default,
        skip_serializing_if = "TargetVersions::is_empty"
    )]
    pub target_versions: TargetVersions,
}

impl RuleFile {
    fn parse(data: &[u8]) -> Result<Self> {
        if data.iter().all(u8::is_ascii_whitespace) {
            return Ok(Self::default());
        }
        serde_yaml::from_slice(data).map_err(CoreError::VersionsFile)
    }
}

/// Immutable, validated rule catalog
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuleTable {
    rules: Vec<Rule>,
    target_versions: TargetVersions,
}

impl RuleTable {
    /// Build a table from a defaults buffer and an optional overlay buffer.
    ///
    /// Overlay rules are appended after the defaults. Overlay target versions only fill
    /// components the defaults do not already define.
    pub fn load(defaults: &[u8], overlay: Option<&[u8]>) -> Result<Self> {
        let defaults = RuleFile::parse(defaults)?;
        let mut rules = defaults.deprecated_versions;
        let mut target_versions = defaults.target_versions;

        if let Some(overlay) = overlay {
            let overlay = RuleFile::parse(overlay)?;
            tracing::debug!(
                rules = overlay.deprecated_versions.len(),
                "appending additional versions"
            );
            rules.extend(overlay.deprecated_versions);
            target_versions.fill_from(&overlay.target_versions);
        }

        let mut seen = HashSet::new();
        for rule in &rules {
            if !seen.insert((rule.kind.as_str(), rule.api_version.as_str())) {
                return Err(CoreError::DuplicateRule {
                    kind: rule.kind.clone(),
                    api_version: rule.api_version.clone(),
                });
            }
            rule.validate()?;
        }

        Ok(Self {
            rules,
            target_versions,
        })
    }

    /// The catalog compiled into the binary
    pub fn bundled() -> Result<Self> {
        Self::load(BUNDLED_VERSIONS, None)
    }

    /// The bundled catalog extended with user rules
    pub fn with_overlay(overlay: &[u8]) -> Result<Self> {
        Self::load(BUNDLED_VERSIONS, Some(overlay))
    }

    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    /// Default target version per component
    pub fn target_versions(&self) -> &TargetVersions {
        &self.target_versions
    }

    /// Distinct components, in order of first appearance
    pub fn components(&self) -> Vec<&str> {
        let mut components: Vec<&str> = Vec::new();
        for rule in &self.rules {
            if !components.contains(&rule.component.as_str()) {
                components.push(&rule.component);
            }
        }
        components
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    pub fn to_rule_file(&self) -> RuleFile {
        RuleFile {
            deprecated_versions: self.rules.clone(),
            target_versions: self.target_versions.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bundled_catalog_loads() {
        let table = RuleTable::bundled().unwrap();
        assert!(!table.is_empty());
        assert_eq!(table.components(), vec!["k8s", "istio", "cert-manager"]);
        assert_eq!(table.target_versions().get("k8s"), Some("v1.25.0"));
    }

    #[test]
    fn test_overlay_duplicate_rejected() {
        let overlay = br#"
deprecated-versions:
  - version: apps/v1
    kind: Deployment
    deprecated-in: v1.0.0
    component: k8s
"#;
        let err = RuleTable::with_overlay(overlay).unwrap_err();
        assert!(matches!(err, CoreError::DuplicateRule { .. }));
        assert_eq!(
            err.to_string(),
            "duplicate cannot be added to defaults: Deployment apps/v1"
        );
    }

    #[test]
    fn test_overlay_appended_in_order() {
        let overlay = br#"
deprecated-versions:
  - version: example.com/v1alpha1
    kind: Widget
    deprecated-in: v2.0.0
    component: widgets
  - version: example.com/v1alpha1
    kind: Gadget
    removed-in: v3.0.0
    component: widgets
target-versions:
  widgets: v2.1.0
  k8s: v1.0.0
"#;
        let bundled = RuleTable::bundled().unwrap();
        let table = RuleTable::with_overlay(overlay).unwrap();

        assert_eq!(table.len(), bundled.len() + 2);
        let tail: Vec<&str> = table.rules()[bundled.len()..]
            .iter()
            .map(|r| r.kind.as_str())
            .collect();
        assert_eq!(tail, vec!["Widget", "Gadget"]);

        // defaults win for components they already define
        assert_eq!(table.target_versions().get("k8s"), Some("v1.25.0"));
        assert_eq!(table.target_versions().get("widgets"), Some("v2.1.0"));
        assert_eq!(table.components().last(), Some(&"widgets"));
    }

    #[test]
    fn test_duplicate_within_defaults_rejected() {
        let defaults = br#"
deprecated-versions:
  - version: batch/v1beta1
    kind: CronJob
    component: k8s
  - version: batch/v1beta1
    kind: CronJob
    component: k8s
"#;
        assert!(matches!(
            RuleTable::load(defaults, None),
            Err(CoreError::DuplicateRule { .. })
        ));
    }

    #[test]
    fn test_invalid_threshold_rejected() {
        let defaults = br#"
deprecated-versions:
  - version: batch/v1beta1
    kind: CronJob
    removed-in: 1.25.0
    component: k8s
"#;
        let err = RuleTable::load(defaults, None).unwrap_err();
        assert!(matches!(
            err,
            CoreError::InvalidRuleVersion { field: "removed-in", ref value, .. } if value == "1.25.0"
        ));
    }

    #[test]
    fn test_empty_fields_are_absent() {
        let defaults = br#"
deprecated-versions:
  - version: apps/v1
    kind: Deployment
    deprecated-in: ""
    removed-in: ""
    replacement-api: ""
    component: k8s
"#;
        let table = RuleTable::load(defaults, None).unwrap();
        let rule = &table.rules()[0];
        assert_eq!(rule.deprecated_in, None);
        assert_eq!(rule.removed_in, None);
        assert_eq!(rule.replacement_api(), "");

        let json = serde_json::to_string(rule).unwrap();
        assert_eq!(
            json,
            r#"{"version":"apps/v1","kind":"Deployment","component":"k8s"}"#
        );
    }

    #[test]
    fn test_empty_overlay_is_noop() {
        let bundled = RuleTable::bundled().unwrap();
        let table = RuleTable::with_overlay(b"\n").unwrap();
        assert_eq!(table, bundled);
    }

    #[test]
    fn test_malformed_versions_file() {
        let err = RuleTable::load(b"deprecated-versions: {not: a list}", None).unwrap_err();
        assert!(matches!(err, CoreError::VersionsFile(_)));
    }

    #[test]
    fn test_rule_matches_wildcard() {
        let rule = Rule {
            api_version: "cert-manager.io/v1alpha2".into(),
            ..Default::default()
        };
        assert!(rule.is_wildcard());
        assert!(rule.matches("cert-manager.io/v1alpha2", "Issuer"));
        assert!(!rule.matches("cert-manager.io/v1", "Issuer"));
    }
}
