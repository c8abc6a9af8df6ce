use kube::Resource;

use super::*;

impl<T: Resource> KubeResourceExt for T {
    fn namespaced_name(&self) -> String {
        match self.namespace() {
            Some(ns) => format!("{}/{}", ns, self.name_any()),
            None => self.name_any(),
        }
    }
}

impl DeploymentExt for appsv1::Deployment {
    // The apiserver omits availableReplicas entirely when it is zero
    fn available_replicas(&self) -> i32 {
        self.status.as_ref().and_then(|st| st.available_replicas).unwrap_or(0)
    }
}
