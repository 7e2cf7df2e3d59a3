//! apivet Kube - cluster sources for apivet
//!
//! This crate provides:
//! - **Release stores**: read Helm 3 releases from Secrets or ConfigMaps
//! - **Release decoding**: Helm's base64 + gzip + JSON payload format
//! - **API resource scanning**: find deprecated apiVersions in live objects through their
//!   `last-applied-configuration` annotation

pub mod client;
pub mod discovery;
pub mod error;
pub mod helm;

pub use client::client_for;
pub use discovery::{LAST_APPLIED_ANNOTATION, findings_from_objects, scan_api_resources};
pub use error::{KubeError, Result};
pub use helm::{
    ConfigMapsStore, HelmRelease, ReleaseInfo, ReleaseStore, SecretsStore, current_releases,
    decode_release, release_findings, scan_releases,
};
