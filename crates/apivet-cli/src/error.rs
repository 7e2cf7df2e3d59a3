//! CLI error types with exit code handling
//!
//! Library errors are folded into a single diagnostic type so every failure prints the same
//! way and maps to a stable exit code.

use apivet_core::CoreError;
use apivet_kube::KubeError;
use miette::Diagnostic;
use thiserror::Error;

use crate::exit_codes;

/// CLI-specific error type that includes exit code information
#[derive(Error, Debug, Diagnostic, Clone)]
pub enum CliError {
    /// Invalid flags, rules or target versions; raised before anything is scanned
    #[error("{message}")]
    #[diagnostic(code(apivet::cli::config))]
    Config {
        message: String,
        #[help]
        help: Option<String>,
    },

    /// Input could not be read or decoded
    #[error("Scan error: {message}")]
    #[diagnostic(code(apivet::cli::scan))]
    Scan { message: String },

    /// Talking to the cluster failed
    #[error("Cluster error: {message}")]
    #[diagnostic(code(apivet::cli::cluster))]
    Cluster {
        message: String,
        #[help]
        help: Option<String>,
    },

    /// IO error (file not found, permissions, etc.)
    #[error("IO error: {message}")]
    #[diagnostic(code(apivet::cli::io))]
    Io { message: String },
}

impl CliError {
    /// Get the exit code for this error
    pub fn exit_code(&self) -> i32 {
        match self {
            CliError::Config { .. } => exit_codes::ERROR,
            CliError::Scan { .. } => exit_codes::ERROR,
            CliError::Cluster { .. } => exit_codes::ERROR,
            CliError::Io { .. } => exit_codes::IO_ERROR,
        }
    }

    /// Create an IO error with the offending path in the message
    pub fn io_at(path: &std::path::Path, err: std::io::Error) -> Self {
        Self::Io {
            message: format!("{}: {err}", path.display()),
        }
    }
}

fn config_help(err: &CoreError) -> Option<String> {
    let help = match err {
        CoreError::MissingColumns => {
            "pass the columns to show, e.g. --columns name,kind,removed-in"
        }
        CoreError::MissingTargetVersion { .. } => {
            "set it with --target-versions <component>=<version>, or narrow the run with --components"
        }
        CoreError::InvalidTargetVersion { .. } | CoreError::InvalidTargetFlag(_) => {
            "target versions look like k8s=v1.22.0"
        }
        CoreError::DuplicateRule { .. } => {
            "rules in --additional-versions must not redefine a bundled apiVersion/kind"
        }
        _ => return None,
    };
    Some(help.to_string())
}

impl From<CoreError> for CliError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::Io(e) => CliError::Io {
                message: e.to_string(),
            },
            err if err.is_config() => CliError::Config {
                help: config_help(&err),
                message: err.to_string(),
            },
            err => CliError::Scan {
                message: err.to_string(),
            },
        }
    }
}

impl From<KubeError> for CliError {
    fn from(err: KubeError) -> Self {
        if let KubeError::Core(core) = err {
            return core.into();
        }
        let help = match &err {
            KubeError::Kubeconfig(_) | KubeError::InferConfig(_) => {
                Some("check your kubeconfig, or pick a context with --kube-context".to_string())
            }
            _ => None,
        };
        CliError::Cluster {
            message: err.to_string(),
            help,
        }
    }
}

impl From<std::io::Error> for CliError {
    fn from(err: std::io::Error) -> Self {
        CliError::Io {
            message: err.to_string(),
        }
    }
}

/// Result type for CLI operations
pub type Result<T> = std::result::Result<T, CliError>;
