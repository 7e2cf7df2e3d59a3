//! Live cluster scanning
//!
//! Objects created with `kubectl apply` remember the manifest they were applied from in the
//! `kubectl.kubernetes.io/last-applied-configuration` annotation. The API server always
//! serves objects at the version requested, so this annotation is the only place the
//! original apiVersion survives.

use futures::{StreamExt, stream};
use kube::api::{Api, DynamicObject, ListParams, ResourceExt};
use kube::discovery::{ApiCapabilities, ApiResource, Discovery, Scope, verbs};
use kube::Client;

use apivet_core::{Finding, RuleTable, detect};

use crate::error::{KubeError, Result};

pub const LAST_APPLIED_ANNOTATION: &str = "kubectl.kubernetes.io/last-applied-configuration";

/// Resource types listed at the same time
const LIST_CONCURRENCY: usize = 8;

/// Findings for objects that carry a last-applied configuration.
///
/// Objects whose annotation does not decode are skipped.
pub fn findings_from_objects(objects: &[DynamicObject], table: &RuleTable) -> Vec<Finding> {
    let mut findings = Vec::new();
    for object in objects {
        let Some(applied) = object.annotations().get(LAST_APPLIED_ANNOTATION) else {
            continue;
        };
        match detect(applied.as_bytes(), table) {
            Ok(found) => findings.extend(found.into_iter().map(|mut finding| {
                if finding.namespace.is_empty() {
                    finding.namespace = object.namespace().unwrap_or_default();
                }
                finding
            })),
            Err(e) => {
                tracing::debug!(
                    namespace = %object.namespace().unwrap_or_default(),
                    name = %object.name_any(),
                    error = %e,
                    "failed to parse last-applied-configuration annotation"
                );
            }
        }
    }
    findings
}

fn dynamic_api(
    client: Client,
    resource: &ApiResource,
    caps: &ApiCapabilities,
    namespace: Option<&str>,
) -> Api<DynamicObject> {
    match (namespace, &caps.scope) {
        (Some(ns), Scope::Namespaced) => Api::namespaced_with(client, ns, resource),
        _ => Api::all_with(client, resource),
    }
}

/// List every listable resource type the server recommends and scan its objects.
///
/// Resource types that cannot be listed (forbidden, gone, ...) are logged and skipped.
pub async fn scan_api_resources(
    client: Client,
    namespace: Option<&str>,
    table: &RuleTable,
) -> Result<Vec<Finding>> {
    let discovery = Discovery::new(client.clone())
        .run()
        .await
        .map_err(KubeError::Api)?;

    let resources: Vec<(ApiResource, ApiCapabilities)> = discovery
        .groups()
        .flat_map(|group| group.recommended_resources())
        .filter(|(_, caps)| caps.supports_operation(verbs::LIST))
        .filter(|(_, caps)| namespace.is_none() || caps.scope == Scope::Namespaced)
        .collect();
    tracing::info!(resources = resources.len(), "discovered listable API resources");

    let listed: Vec<Vec<Finding>> = stream::iter(resources)
        .map(|(resource, caps)| {
            let api = dynamic_api(client.clone(), &resource, &caps, namespace);
            async move {
                match api.list(&ListParams::default()).await {
                    Ok(list) => {
                        tracing::debug!(
                            resource = %resource.plural,
                            group = %resource.group,
                            version = %resource.version,
                            objects = list.items.len(),
                            "listed resources"
                        );
                        findings_from_objects(&list.items, table)
                    }
                    Err(e) => {
                        tracing::warn!(
                            resource = %resource.plural,
                            group = %resource.group,
                            version = %resource.version,
                            error = %e,
                            "failed to list resources"
                        );
                        Vec::new()
                    }
                }
            }
        })
        .buffer_unordered(LIST_CONCURRENCY)
        .collect()
        .await;

    let mut findings: Vec<Finding> = listed.into_iter().flatten().collect();
    findings.sort_by(|a, b| {
        (&a.namespace, &a.name, &a.api.kind).cmp(&(&b.namespace, &b.name, &b.api.kind))
    });
    Ok(findings)
}
