//! Core error types

use thiserror::Error;

#[derive(Error, Debug)]
pub enum CoreError {
    #[error("could not unmarshal versions file from data: {0}")]
    VersionsFile(#[source] serde_yaml::Error),

    #[error("duplicate cannot be added to defaults: {kind} {api_version}")]
    DuplicateRule { kind: String, api_version: String },

    #[error("invalid {field} '{value}' for {kind} {api_version}: must be a semver string starting with 'v'")]
    InvalidRuleVersion {
        kind: String,
        api_version: String,
        field: &'static str,
        value: String,
    },

    #[error("invalid target version for {component}: '{version}' is not a semver string starting with 'v'")]
    InvalidTargetVersion { component: String, version: String },

    #[error("target version missing for component {component}")]
    MissingTargetVersion { component: String },

    #[error("invalid target version flag '{0}': expected <component>=<version>")]
    InvalidTargetFlag(String),

    #[error("cannot find deprecations for zero components")]
    NoComponents,

    #[error("invalid column name '{name}': must be one of {expected}")]
    UnknownColumn { name: String, expected: String },

    #[error("invalid output format '{0}': must be one of (normal|wide|custom|markdown|csv|json|yaml)")]
    UnknownOutputFormat(String),

    #[error("when --output=custom you must specify --columns")]
    MissingColumns,

    #[error("no version found in data")]
    NoManifests,

    #[error("could not decode manifest: {}", .0.join("; "))]
    Decode(Vec<String>),

    #[error("Failed to parse JSON: {0}")]
    JsonParse(#[from] serde_json::Error),

    #[error("Failed to parse YAML: {0}")]
    YamlParse(#[from] serde_yaml::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl CoreError {
    /// Configuration errors are raised before any scanning starts
    pub fn is_config(&self) -> bool {
        !matches!(
            self,
            Self::NoManifests
                | Self::Decode(_)
                | Self::JsonParse(_)
                | Self::YamlParse(_)
                | Self::Io(_)
        )
    }
}

pub type Result<T> = std::result::Result<T, CoreError>;
