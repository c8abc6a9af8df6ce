use mc_api::v1alpha1::MEMCACHED_PLURAL;
use tracing::*;

use crate::prelude::*;

// Deployments are a built-in kind, so they get a fully-typed Api; the Memcached CRD belongs to
// the operator under test, so we go through the dynamic client and read it with MemcachedExt.
// Both share a single underlying kube::Client.
pub struct ClusterClients {
    pub namespace: String,
    pub deployments: kube::Api<appsv1::Deployment>,
    pub memcacheds: kube::Api<DynamicObject>,
}

impl ClusterClients {
    pub fn new(config: kube::Config, namespace: &str) -> anyhow::Result<ClusterClients> {
        debug!("creating kube clients for {}", config.cluster_url);
        let client = kube::Client::try_from(config)?;
        Ok(ClusterClients::from_client(client, namespace))
    }

    pub fn from_client(client: kube::Client, namespace: &str) -> ClusterClients {
        let ar = MEMCACHED_GVK.api_resource(MEMCACHED_PLURAL);
        ClusterClients {
            namespace: namespace.into(),
            deployments: kube::Api::namespaced(client.clone(), namespace),
            memcacheds: kube::Api::namespaced_with(client, namespace, &ar),
        }
    }
}
