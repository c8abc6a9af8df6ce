use serde::{
    Deserialize,
    Serialize,
};
use serde_json as json;

pub const MEMCACHED_GROUP: &str = "cache.example.com";
pub const MEMCACHED_VERSION: &str = "v1alpha1";
pub const MEMCACHED_KIND: &str = "Memcached";
pub const MEMCACHED_PLURAL: &str = "memcacheds";

// The operator owns the schema for this resource, so the suite only pins down the fields it
// actually reads or writes; everything else in the spec is carried through untouched so that an
// update doesn't clobber fields we don't know about.
#[derive(Clone, Debug, Default, Deserialize, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MemcachedSpec {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size: Option<i32>,

    #[serde(flatten)]
    pub extra: json::Map<String, json::Value>,
}

#[derive(Clone, Debug, Default, Deserialize, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MemcachedStatus {
    // names of the memcached pods, as published by the operator
    #[serde(default)]
    pub nodes: Vec<String>,
}

// Typed view over the untyped `data` section of a dynamically-fetched Memcached object.  Both
// fields are optional; a Memcached without a spec is legal as far as the suite is concerned.
#[derive(Clone, Debug, Default, Deserialize, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MemcachedFields {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub spec: Option<MemcachedSpec>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<MemcachedStatus>,
}

impl MemcachedSpec {
    pub fn with_size(size: i32) -> MemcachedSpec {
        MemcachedSpec { size: Some(size), ..Default::default() }
    }
}

impl MemcachedFields {
    pub fn from_data(data: &json::Value) -> json::Result<MemcachedFields> {
        match data {
            json::Value::Null => Ok(Default::default()),
            _ => MemcachedFields::deserialize(data),
        }
    }
}
