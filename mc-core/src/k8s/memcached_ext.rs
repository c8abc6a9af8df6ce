use serde_json as json;

use super::*;

impl MemcachedExt for DynamicObject {
    fn memcached_fields(&self) -> anyhow::Result<MemcachedFields> {
        Ok(MemcachedFields::from_data(&self.data)?)
    }

    fn set_memcached_size(&mut self, size: i32) -> anyhow::Result<bool> {
        let name = self.namespaced_name();
        let spec = match self.data.get_mut("spec") {
            None | Some(json::Value::Null) => return Ok(false),
            Some(json::Value::Object(spec)) => spec,
            Some(_) => bail!(KubernetesError::malformed_spec(&name)),
        };

        // Whatever was in `size` before is overwritten, regardless of its type
        spec.insert("size".into(), json::json!(size));
        Ok(true)
    }
}
