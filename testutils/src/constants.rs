pub const TEST_NAMESPACE: &str = "test-namespace";
pub const TEST_MEMCACHED_NAME: &str = "test-memcached";
pub const TEST_MEMCACHED_UID: &str = "1234-asdf";
pub const TEST_RESOURCE_VERSION: &str = "42";

pub fn memcached_path(ns: &str, name: &str) -> String {
    format!("/apis/cache.example.com/v1alpha1/namespaces/{ns}/memcacheds/{name}")
}

pub fn deployment_path(ns: &str, name: &str) -> String {
    format!("/apis/apps/v1/namespaces/{ns}/deployments/{name}")
}
