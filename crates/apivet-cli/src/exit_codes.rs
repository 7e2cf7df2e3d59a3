//! Standard exit codes for CLI operations
//!
//! 2, 3 and 4 report what a scan found and are relied upon by CI pipelines.

use apivet_core::Outcome;

/// Success - nothing deprecated or removed was found
pub const SUCCESS: i32 = 0;

/// General error - configuration or cluster failure
pub const ERROR: i32 = 1;

/// Deprecated apiVersions found
pub const DEPRECATED: i32 = 2;

/// Removed apiVersions found
pub const REMOVED: i32 = 3;

/// Found apiVersions whose replacement is not available in the target version yet
pub const REPLACEMENT_UNAVAILABLE: i32 = 4;

/// IO error - file not found, permission denied, etc.
pub const IO_ERROR: i32 = 5;

pub fn for_outcome(outcome: Outcome) -> i32 {
    match outcome {
        Outcome::Clean => SUCCESS,
        Outcome::Deprecated => DEPRECATED,
        Outcome::Removed => REMOVED,
        Outcome::ReplacementUnavailable => REPLACEMENT_UNAVAILABLE,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_outcome_codes_agree() {
        for outcome in [
            Outcome::Clean,
            Outcome::Deprecated,
            Outcome::Removed,
            Outcome::ReplacementUnavailable,
        ] {
            assert_eq!(for_outcome(outcome), outcome.code());
        }
    }
}
