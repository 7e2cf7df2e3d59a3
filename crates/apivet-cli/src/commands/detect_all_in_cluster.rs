//! Detect-all-in-cluster command - Helm releases and live objects in one report

use apivet_core::Outcome;
use apivet_kube::{client_for, scan_api_resources};

use crate::commands::detect_helm::helm_findings;
use crate::commands::{build_config, report};
use crate::error::{CliError, Result};
use crate::{GlobalArgs, HelmStore};

pub async fn run(
    global: &GlobalArgs,
    namespace: Option<&str>,
    kube_context: Option<&str>,
    helm_store: HelmStore,
) -> Result<Outcome> {
    let config = build_config(global)?;
    let client = client_for(kube_context).await?;

    let (mut findings, live) = tokio::try_join!(
        helm_findings(client.clone(), namespace, helm_store, config.table()),
        async {
            scan_api_resources(client.clone(), namespace, config.table())
                .await
                .map_err(CliError::from)
        },
    )?;
    findings.extend(live);

    report(&config, findings)
}
