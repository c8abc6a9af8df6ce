use lazy_static::lazy_static;
use mc_api::v1alpha1::*;

use crate::k8s::GVK;

// Where the operator under test is expected to have created things
pub const DEFAULT_NAMESPACE: &str = "memcached";
pub const DEFAULT_MEMCACHED_NAME: &str = "example-memcached";

// Kubeconfig location, relative to the current user's home directory
pub const KUBECONFIG_DIR: &str = ".kube";
pub const KUBECONFIG_FILE: &str = "config";

// Timing
pub const DEFAULT_POLL_INTERVAL_SECONDS: u64 = 10;
pub const DEFAULT_TIMEOUT_SECONDS: u64 = 10 * 60;

// Scale up, scale up again, then back down
pub const DEFAULT_SCENARIO_SIZES: [i32; 3] = [2, 3, 2];

lazy_static! {
    pub static ref MEMCACHED_GVK: GVK = GVK::new(MEMCACHED_GROUP, MEMCACHED_VERSION, MEMCACHED_KIND);
}
