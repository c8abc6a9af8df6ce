use kube::api::{
    ApiResource,
    GroupVersionKind,
};

#[derive(Clone, Debug, Hash, Eq, PartialEq)]
pub struct GVK(GroupVersionKind);

impl GVK {
    pub fn new(group: &str, version: &str, kind: &str) -> GVK {
        GVK(GroupVersionKind::gvk(group, version, kind))
    }

    // Custom resources don't always pluralize the way kube's guesser expects, and we don't want
    // to pay for a discovery round-trip just to find out, so the caller supplies the plural.
    pub fn api_resource(&self, plural: &str) -> ApiResource {
        ApiResource::from_gvk_with_plural(&self.0, plural)
    }
}
