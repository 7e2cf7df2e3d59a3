//! Detect-api-resources command - scan live objects through their last-applied configuration

use apivet_core::Outcome;
use apivet_kube::{client_for, scan_api_resources};

use crate::GlobalArgs;
use crate::commands::{build_config, report};
use crate::error::Result;

pub async fn run(
    global: &GlobalArgs,
    namespace: Option<&str>,
    kube_context: Option<&str>,
) -> Result<Outcome> {
    let config = build_config(global)?;
    let client = client_for(kube_context).await?;
    let findings = scan_api_resources(client, namespace, config.table()).await?;
    report(&config, findings)
}
