//! Kubernetes client construction

use kube::Client;
use kube::config::{Config, KubeConfigOptions};

use crate::error::Result;

/// Build a client for `context`, or for whatever configuration is inferred from the
/// environment (in-cluster service account, then the current kubeconfig context).
pub async fn client_for(context: Option<&str>) -> Result<Client> {
    let config = match context {
        Some(context) => {
            Config::from_kubeconfig(&KubeConfigOptions {
                context: Some(context.to_string()),
                ..Default::default()
            })
            .await?
        }
        None => Config::infer().await?,
    };
    tracing::debug!(cluster_url = %config.cluster_url, "connecting to cluster");
    Ok(Client::try_from(config)?)
}
