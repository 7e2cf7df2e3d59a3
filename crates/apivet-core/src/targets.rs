//! Target versions per component
//!
//! Every component referenced by the rule table (`k8s`, `istio`, ...) is evaluated against
//! its own target version. Versions are semver strings with a mandatory leading `v`.

use semver::{BuildMetadata, Version};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::BTreeMap;

use crate::error::{CoreError, Result};
use crate::rules::RuleTable;

/// Mapping from component name to target version
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TargetVersions(BTreeMap<String, String>);

impl TargetVersions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, component: &str) -> Option<&str> {
        self.0.get(component).map(String::as_str)
    }

    pub fn insert(&mut self, component: impl Into<String>, version: impl Into<String>) {
        self.0.insert(component.into(), version.into());
    }

    pub fn contains(&self, component: &str) -> bool {
        self.0.contains_key(component)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(c, v)| (c.as_str(), v.as_str()))
    }

    /// First entry (in component order) whose version is not valid semver
    pub fn first_invalid(&self) -> Option<(&str, &str)> {
        self.iter().find(|(_, version)| !is_valid_version(version))
    }

    /// Add entries for components not already present
    pub fn fill_from(&mut self, other: &TargetVersions) {
        for (component, version) in other.iter() {
            self.0
                .entry(component.to_string())
                .or_insert_with(|| version.to_string());
        }
    }
}

impl From<BTreeMap<String, String>> for TargetVersions {
    fn from(map: BTreeMap<String, String>) -> Self {
        Self(map)
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for TargetVersions {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
    }
}

/// Parse a `v`-prefixed semantic version.
///
/// `vMAJOR` and `vMAJOR.MINOR` shorthands are accepted and padded with zeros,
/// as long as they carry no pre-release or build suffix.
pub fn parse_version(s: &str) -> Option<Version> {
    let rest = s.strip_prefix('v')?;
    let core_end = rest.find(['-', '+']).unwrap_or(rest.len());
    let (core, suffix) = rest.split_at(core_end);

    let normalized = match core.split('.').count() {
        1 if suffix.is_empty() => format!("{core}.0.0"),
        2 if suffix.is_empty() => format!("{core}.0"),
        3 => rest.to_string(),
        _ => return None,
    };
    Version::parse(&normalized).ok()
}

pub fn is_valid_version(s: &str) -> bool {
    parse_version(s).is_some()
}

/// Compare two versions by semver precedence, ignoring build metadata.
///
/// Invalid versions sort before every valid one and equal to each other.
pub fn compare_versions(a: &str, b: &str) -> Ordering {
    match (parse_version(a), parse_version(b)) {
        (Some(mut a), Some(mut b)) => {
            a.build = BuildMetadata::EMPTY;
            b.build = BuildMetadata::EMPTY;
            a.cmp(&b)
        }
        (Some(_), None) => Ordering::Greater,
        (None, Some(_)) => Ordering::Less,
        (None, None) => Ordering::Equal,
    }
}

/// Parse `component=version` pairs as given on the command line
pub fn parse_target_flags<S: AsRef<str>>(flags: &[S]) -> Result<TargetVersions> {
    let mut targets = TargetVersions::new();
    for flag in flags {
        let flag = flag.as_ref().trim();
        let (component, version) = flag
            .split_once('=')
            .map(|(c, v)| (c.trim(), v.trim()))
            .filter(|(c, v)| !c.is_empty() && !v.is_empty())
            .ok_or_else(|| CoreError::InvalidTargetFlag(flag.to_string()))?;
        targets.insert(component, version);
    }
    Ok(targets)
}

/// Outcome of target resolution
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedTargets {
    /// Merged and validated target versions
    pub targets: TargetVersions,
    /// Components in play for this run, in rule table order
    pub components: Vec<String>,
}

/// Resolve the effective target versions for a run.
///
/// User supplied targets win over the table defaults. The component list is every
/// component of the table, narrowed to `filter` when it is non-empty.
pub fn resolve<S: AsRef<str>>(
    user: &TargetVersions,
    table: &RuleTable,
    filter: &[S],
) -> Result<ResolvedTargets> {
    let components: Vec<String> = table
        .components()
        .into_iter()
        .filter(|c| filter.is_empty() || filter.iter().any(|f| f.as_ref() == *c))
        .map(str::to_string)
        .collect();

    if components.is_empty() {
        return Err(CoreError::NoComponents);
    }

    let mut targets = user.clone();
    targets.fill_from(table.target_versions());

    if let Some((component, version)) = targets.first_invalid() {
        return Err(CoreError::InvalidTargetVersion {
            component: component.to_string(),
            version: version.to_string(),
        });
    }

    if let Some(missing) = components.iter().find(|c| !targets.contains(c)) {
        return Err(CoreError::MissingTargetVersion {
            component: missing.clone(),
        });
    }

    tracing::debug!(?targets, ?components, "resolved target versions");
    Ok(ResolvedTargets {
        targets,
        components,
    })
}
