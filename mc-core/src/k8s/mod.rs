mod gvk;
mod memcached_ext;
mod util;

pub use gvk::*;

use crate::errors::*;
use crate::prelude::*;

err_impl! {KubernetesError,
    #[error("malformed spec for {0}: expected an object")]
    MalformedSpec(String),
}

pub trait KubeResourceExt {
    fn namespaced_name(&self) -> String;
}

// Helpers for reading and mutating a Memcached object fetched through the dynamic client
pub trait MemcachedExt {
    fn memcached_fields(&self) -> anyhow::Result<MemcachedFields>;

    // Returns false (and leaves the object alone) when there is no spec to modify
    fn set_memcached_size(&mut self, size: i32) -> anyhow::Result<bool>;
}

pub trait DeploymentExt {
    fn available_replicas(&self) -> i32;
}

#[cfg(test)]
pub mod tests;
