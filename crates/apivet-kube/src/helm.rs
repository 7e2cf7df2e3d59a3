//! Helm 3 release reading
//!
//! Helm stores every revision of a release in a Secret (default) or ConfigMap labelled
//! `owner=helm`. The `release` key holds the release as JSON, gzip-compressed and base64
//! encoded. Only the latest live revision of each release is scanned.

use async_trait::async_trait;
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use k8s_openapi::api::core::v1::{ConfigMap, Secret};
use kube::Client;
use kube::api::{Api, ListParams};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::io::Read;

use apivet_core::{Finding, RuleTable, detect};

use crate::error::{KubeError, Result};

/// Secret type used by Helm 3
pub const HELM_RELEASE_TYPE: &str = "helm.sh/release.v1";

/// Label selector matching Helm storage objects
pub const HELM_OWNER_SELECTOR: &str = "owner=helm";

const GZIP_MAGIC: [u8; 3] = [0x1f, 0x8b, 0x08];

/// The parts of a Helm release apivet cares about
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HelmRelease {
    pub name: String,

    #[serde(default)]
    pub namespace: String,

    /// Revision number
    #[serde(default)]
    pub version: u32,

    /// Rendered manifest, a YAML multi-document stream
    #[serde(default)]
    pub manifest: String,

    #[serde(default)]
    pub info: ReleaseInfo,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReleaseInfo {
    #[serde(default)]
    pub status: String,
}

impl HelmRelease {
    /// Superseded and uninstalled revisions no longer describe what runs in the cluster
    pub fn is_live(&self) -> bool {
        !matches!(self.info.status.as_str(), "superseded" | "uninstalled")
    }
}

/// Decode the `release` payload of a Helm storage object
pub fn decode_release(data: &[u8]) -> Result<HelmRelease> {
    let decoded = STANDARD.decode(data.trim_ascii())?;

    let json = if decoded.starts_with(&GZIP_MAGIC) {
        let mut decoder = flate2::read::GzDecoder::new(decoded.as_slice());
        let mut decompressed = Vec::new();
        decoder
            .read_to_end(&mut decompressed)
            .map_err(|e| KubeError::ReleaseDecode(format!("gzip error: {e}")))?;
        decompressed
    } else {
        // releases written before Helm compressed them
        decoded
    };

    Ok(serde_json::from_slice(&json)?)
}

/// Source of Helm releases
#[async_trait]
pub trait ReleaseStore: Send + Sync {
    /// Every stored revision, optionally restricted to one namespace
    async fn list_releases(&self, namespace: Option<&str>) -> Result<Vec<HelmRelease>>;

    /// Short name for logs
    fn name(&self) -> &'static str;
}

fn decode_or_skip(object: &str, payload: Option<&[u8]>) -> Option<HelmRelease> {
    let Some(payload) = payload else {
        tracing::debug!(object, "helm storage object has no release key");
        return None;
    };
    match decode_release(payload) {
        Ok(release) => Some(release),
        Err(e) => {
            tracing::warn!(object, error = %e, "skipping undecodable helm release");
            None
        }
    }
}

fn list_params() -> ListParams {
    ListParams::default().labels(HELM_OWNER_SELECTOR)
}

/// Releases stored in Secrets (Helm's default driver)
pub struct SecretsStore {
    client: Client,
}

impl SecretsStore {
    pub fn new(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl ReleaseStore for SecretsStore {
    async fn list_releases(&self, namespace: Option<&str>) -> Result<Vec<HelmRelease>> {
        let api: Api<Secret> = match namespace {
            Some(ns) => Api::namespaced(self.client.clone(), ns),
            None => Api::all(self.client.clone()),
        };
        let secrets = api.list(&list_params()).await?;

        Ok(secrets
            .items
            .iter()
            .filter(|s| s.type_.as_deref() == Some(HELM_RELEASE_TYPE))
            .filter_map(|s| {
                let name = s.metadata.name.as_deref().unwrap_or_default();
                let payload = s
                    .data
                    .as_ref()
                    .and_then(|d| d.get("release"))
                    .map(|b| b.0.as_slice());
                decode_or_skip(name, payload)
            })
            .collect())
    }

    fn name(&self) -> &'static str {
        "secrets"
    }
}

/// Releases stored in ConfigMaps (`HELM_DRIVER=configmap`)
pub struct ConfigMapsStore {
    client: Client,
}

impl ConfigMapsStore {
    pub fn new(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl ReleaseStore for ConfigMapsStore {
    async fn list_releases(&self, namespace: Option<&str>) -> Result<Vec<HelmRelease>> {
        let api: Api<ConfigMap> = match namespace {
            Some(ns) => Api::namespaced(self.client.clone(), ns),
            None => Api::all(self.client.clone()),
        };
        let configmaps = api.list(&list_params()).await?;

        Ok(configmaps
            .items
            .iter()
            .filter_map(|cm| {
                let name = cm.metadata.name.as_deref().unwrap_or_default();
                let payload = cm
                    .data
                    .as_ref()
                    .and_then(|d| d.get("release"))
                    .map(|s| s.as_bytes());
                decode_or_skip(name, payload)
            })
            .collect())
    }

    fn name(&self) -> &'static str {
        "configmaps"
    }
}

/// Keep the highest live revision of every release, ordered by namespace and name
pub fn current_releases(releases: Vec<HelmRelease>) -> Vec<HelmRelease> {
    let mut current: BTreeMap<(String, String), HelmRelease> = BTreeMap::new();
    for release in releases.into_iter().filter(HelmRelease::is_live) {
        let key = (release.namespace.clone(), release.name.clone());
        match current.get(&key) {
            Some(existing) if existing.version >= release.version => {}
            _ => {
                current.insert(key, release);
            }
        }
    }
    current.into_values().collect()
}

/// Findings for the objects rendered by one release.
///
/// Names become `release/object`; objects without a namespace inherit the release's.
pub fn release_findings(release: &HelmRelease, table: &RuleTable) -> Result<Vec<Finding>> {
    if release.manifest.trim().is_empty() {
        return Ok(Vec::new());
    }
    let findings = detect(release.manifest.as_bytes(), table)?;
    Ok(findings
        .into_iter()
        .map(|mut finding| {
            finding.name = format!("{}/{}", release.name, finding.name);
            if finding.namespace.is_empty() {
                finding.namespace = release.namespace.clone();
            }
            finding
        })
        .collect())
}

/// Scan the current revision of every release in `store`
pub async fn scan_releases(
    store: &dyn ReleaseStore,
    namespace: Option<&str>,
    table: &RuleTable,
) -> Result<Vec<Finding>> {
    let releases = store.list_releases(namespace).await?;
    tracing::info!(store = store.name(), revisions = releases.len(), "listed helm releases");

    let mut findings = Vec::new();
    for release in current_releases(releases) {
        match release_findings(&release, table) {
            Ok(found) => findings.extend(found),
            Err(e) => {
                tracing::debug!(
                    release = %release.name,
                    namespace = %release.namespace,
                    error = %e,
                    "skipping release manifest"
                );
            }
        }
    }
    Ok(findings)
}
