use k8s_openapi::api::apps::v1 as appsv1;
use k8s_openapi::apimachinery::pkg::apis::meta::v1 as metav1;
use kube::api::DynamicObject;
use mc_api::v1alpha1::MEMCACHED_PLURAL;
use mc_core::constants::MEMCACHED_GVK;
use rstest::fixture;
use serde_json::json;

use crate::constants::*;

pub fn build_memcached(data: serde_json::Value) -> DynamicObject {
    let mut obj = DynamicObject::new(TEST_MEMCACHED_NAME, &MEMCACHED_GVK.api_resource(MEMCACHED_PLURAL))
        .within(TEST_NAMESPACE)
        .data(data);
    obj.metadata.uid = Some(TEST_MEMCACHED_UID.into());
    obj.metadata.resource_version = Some(TEST_RESOURCE_VERSION.into());
    obj
}

pub fn build_deployment(name: &str, available_replicas: Option<i32>) -> appsv1::Deployment {
    appsv1::Deployment {
        metadata: metav1::ObjectMeta {
            name: Some(name.into()),
            namespace: Some(TEST_NAMESPACE.into()),
            ..Default::default()
        },
        status: Some(appsv1::DeploymentStatus {
            available_replicas,
            ..Default::default()
        }),
        ..Default::default()
    }
}

#[fixture]
pub fn test_memcached(#[default(1)] size: i32) -> DynamicObject {
    build_memcached(json!({
        "spec": {"size": size},
        "status": {"nodes": ["test-memcached-7d9f-abcde"]},
    }))
}

#[fixture]
pub fn test_memcached_no_spec() -> DynamicObject {
    build_memcached(json!({"status": {"nodes": []}}))
}
