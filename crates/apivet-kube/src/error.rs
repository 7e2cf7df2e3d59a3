//! Error types for apivet-kube

use thiserror::Error;

/// Result type for apivet-kube operations
pub type Result<T> = std::result::Result<T, KubeError>;

/// Errors that can occur while reading from a cluster
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum KubeError {
    /// Kubernetes API error
    #[error("Kubernetes API error: {0}")]
    Api(#[from] kube::Error),

    /// Kubeconfig could not be read or has no such context
    #[error("kubeconfig error: {0}")]
    Kubeconfig(#[from] kube::config::KubeconfigError),

    /// Neither in-cluster nor kubeconfig configuration is usable
    #[error("could not infer cluster configuration: {0}")]
    InferConfig(#[from] kube::config::InferConfigError),

    /// Helm release payload could not be decoded
    #[error("invalid Helm release data: {0}")]
    ReleaseDecode(String),

    /// Serialization error
    #[error("serialization error: {0}")]
    Serialization(String),

    /// Detection error
    #[error(transparent)]
    Core(#[from] apivet_core::CoreError),
}

impl From<serde_json::Error> for KubeError {
    fn from(e: serde_json::Error) -> Self {
        KubeError::Serialization(e.to_string())
    }
}

impl From<base64::DecodeError> for KubeError {
    fn from(e: base64::DecodeError) -> Self {
        KubeError::ReleaseDecode(format!("base64 decode error: {e}"))
    }
}
