use std::path::{
    Path,
    PathBuf,
};

use kube::config::{
    KubeConfigOptions,
    Kubeconfig,
};
use tracing::*;

use crate::errors::*;
use crate::prelude::*;

err_impl! {ConfigError,
    #[error("could not create a valid kubeconfig: {0}")]
    NoValidConfig(String),
}

pub fn home_kubeconfig_path() -> Option<PathBuf> {
    dirs::home_dir().map(|home| home.join(KUBECONFIG_DIR).join(KUBECONFIG_FILE))
}

// Resolve cluster access from the current user's kubeconfig, optionally pointing it at a
// different apiserver.  No in-cluster fallback is attempted.
pub async fn load_config(master_url: &str) -> anyhow::Result<kube::Config> {
    match home_kubeconfig_path() {
        Some(path) => load_config_from(master_url, &path).await,
        None => bail!(ConfigError::no_valid_config("could not resolve the current user's home directory")),
    }
}

pub async fn load_config_from(master_url: &str, kubeconfig_path: &Path) -> anyhow::Result<kube::Config> {
    debug!("building cluster config for url {master_url:?} using {}", kubeconfig_path.display());
    match build_config(master_url, kubeconfig_path).await {
        Ok(config) => Ok(config),
        Err(err) => {
            debug!("config construction failed: {err:?}");
            bail!(ConfigError::no_valid_config(&format!("{err:#}")))
        },
    }
}

async fn build_config(master_url: &str, kubeconfig_path: &Path) -> anyhow::Result<kube::Config> {
    let kubeconfig = Kubeconfig::read_from(kubeconfig_path)?;
    let mut config = kube::Config::from_custom_kubeconfig(kubeconfig, &KubeConfigOptions::default()).await?;

    // An empty url means "whatever the current context says"
    if !master_url.is_empty() {
        config.cluster_url = master_url.parse::<http::Uri>()?;
    }
    Ok(config)
}
