//! Detect-helm command - scan deployed Helm releases

use kube::Client;

use apivet_core::{Finding, Outcome, RuleTable};
use apivet_kube::{ConfigMapsStore, ReleaseStore, SecretsStore, client_for, scan_releases};

use crate::commands::{build_config, report};
use crate::error::Result;
use crate::{GlobalArgs, HelmStore};

/// Findings for the current revision of every release
pub async fn helm_findings(
    client: Client,
    namespace: Option<&str>,
    helm_store: HelmStore,
    table: &RuleTable,
) -> Result<Vec<Finding>> {
    let store: Box<dyn ReleaseStore> = match helm_store {
        HelmStore::Secrets => Box::new(SecretsStore::new(client)),
        HelmStore::Configmaps => Box::new(ConfigMapsStore::new(client)),
    };
    Ok(scan_releases(store.as_ref(), namespace, table).await?)
}

pub async fn run(
    global: &GlobalArgs,
    namespace: Option<&str>,
    kube_context: Option<&str>,
    helm_store: HelmStore,
) -> Result<Outcome> {
    let config = build_config(global)?;
    let client = client_for(kube_context).await?;
    let findings = helm_findings(client, namespace, helm_store, config.table()).await?;
    report(&config, findings)
}
