//! Process exit code classification
//!
//! The codes are consumed by CI pipelines and must not change:
//!
//! | removed | deprecated | replacement unavailable | outcome |
//! |---------|------------|-------------------------|---------|
//! | no      | no         | -                       | 0       |
//! | no      | yes        | no                      | 2       |
//! | yes     | -          | -                       | 3       |
//! | no      | yes        | yes                     | 4       |
//!
//! Each signal only counts findings that are not ignored by the matching flag. A deprecated
//! finding only counts when its replacement is available or unavailable replacements are not
//! ignored. "Replacement unavailable" is only raised while removals are ignored, for a counted
//! deprecated finding whose replacement is not available yet, so runs without ignore flags
//! only ever exit 0, 2 or 3.

use crate::finding::Finding;
use crate::targets::TargetVersions;

/// Flags suppressing parts of the classification
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct IgnoreFlags {
    pub deprecations: bool,
    pub removals: bool,
    pub unavailable_replacements: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Clean,
    Deprecated,
    Removed,
    ReplacementUnavailable,
}

impl Outcome {
    pub fn code(self) -> i32 {
        match self {
            Outcome::Clean => 0,
            Outcome::Deprecated => 2,
            Outcome::Removed => 3,
            Outcome::ReplacementUnavailable => 4,
        }
    }
}

#[derive(Debug, Default, Clone, Copy)]
struct Signals {
    removed: bool,
    deprecated: bool,
    replacement_unavailable: bool,
}

impl Signals {
    fn collect(findings: &[Finding], targets: &TargetVersions, ignore: IgnoreFlags) -> Self {
        let mut signals = Self::default();
        for finding in findings {
            let status = finding.api.status(targets);
            let removed = status.removed && !ignore.removals;
            let deprecated = status.deprecated
                && !ignore.deprecations
                && (status.replacement_available || !ignore.unavailable_replacements);

            signals.removed |= removed;
            signals.deprecated |= deprecated;
            signals.replacement_unavailable |=
                deprecated && ignore.removals && !status.replacement_available;
        }
        signals
    }

    fn outcome(self) -> Outcome {
        match (self.removed, self.deprecated, self.replacement_unavailable) {
            (true, _, _) => Outcome::Removed,
            (false, _, true) => Outcome::ReplacementUnavailable,
            (false, true, false) => Outcome::Deprecated,
            (false, false, false) => Outcome::Clean,
        }
    }
}

/// Derive the run outcome from the findings that were reported
pub fn classify(findings: &[Finding], targets: &TargetVersions, ignore: IgnoreFlags) -> Outcome {
    let signals = Signals::collect(findings, targets, ignore);
    let outcome = signals.outcome();
    tracing::debug!(?signals, ?outcome, "classified run");
    outcome
}
