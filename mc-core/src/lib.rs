pub mod client;
pub mod config;
pub mod constants;
pub mod errors;
pub mod k8s;
pub mod logging;
pub mod scenario;
pub mod wait;

pub mod prelude {
    pub use k8s_openapi::api::apps::v1 as appsv1;
    pub use k8s_openapi::apimachinery::pkg::apis::meta::v1 as metav1;
    pub use kube::ResourceExt;
    pub use kube::api::DynamicObject;
    pub use mc_api::v1alpha1::{
        MemcachedFields,
        MemcachedSpec,
        MemcachedStatus,
    };

    pub use crate::constants::*;
    pub use crate::k8s::{
        DeploymentExt,
        KubeResourceExt,
        MemcachedExt,
    };
}

#[cfg(test)]
mod tests;
