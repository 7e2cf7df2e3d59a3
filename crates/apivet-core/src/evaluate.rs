//! Deprecation, removal and replacement evaluation
//!
//! Every check compares a rule threshold against the target version of the rule's component.
//! A threshold is reached when the target is greater than or equal to it.

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

use crate::rules::Rule;
use crate::targets::{TargetVersions, compare_versions};

/// Evaluation result of one rule against a set of targets
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Status {
    pub deprecated: bool,
    pub removed: bool,
    pub replacement_available: bool,
}

impl Rule {
    pub fn is_deprecated(&self, targets: &TargetVersions) -> bool {
        self.reached(self.deprecated_in.as_deref(), targets, false)
    }

    pub fn is_removed(&self, targets: &TargetVersions) -> bool {
        self.reached(self.removed_in.as_deref(), targets, false)
    }

    /// A replacement with no availability version is always available
    pub fn is_replacement_available(&self, targets: &TargetVersions) -> bool {
        self.reached(self.replacement_available_in.as_deref(), targets, true)
    }

    pub fn status(&self, targets: &TargetVersions) -> Status {
        Status {
            deprecated: self.is_deprecated(targets),
            removed: self.is_removed(targets),
            replacement_available: self.is_replacement_available(targets),
        }
    }

    fn reached(&self, threshold: Option<&str>, targets: &TargetVersions, if_unset: bool) -> bool {
        let Some(threshold) = threshold else {
            return if_unset;
        };

        // A single bad target anywhere poisons every evaluation
        if let Some((component, version)) = targets.first_invalid() {
            tracing::debug!(component, version, "invalid target version, treating as not reached");
            return false;
        }

        let Some(target) = targets.get(&self.component) else {
            tracing::debug!(
                component = %self.component,
                kind = %self.kind,
                api_version = %self.api_version,
                "no target version for component"
            );
            return false;
        };

        compare_versions(target, threshold) != Ordering::Less
    }
}
