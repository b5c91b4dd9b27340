use std::collections::BTreeMap;
use std::sync::Arc;
use vivu_order::ServicePolicy;
use vivu_shared::ServiceType;

#[derive(Clone)]
pub struct AppState {
    pub policies: Arc<BTreeMap<ServiceType, ServicePolicy>>,
}

impl AppState {
    pub fn new(policies: BTreeMap<ServiceType, ServicePolicy>) -> Self {
        Self {
            policies: Arc::new(policies),
        }
    }

    /// Policy for a service, falling back to the built-in defaults.
    pub fn policy(&self, service: ServiceType) -> ServicePolicy {
        self.policies
            .get(&service)
            .copied()
            .unwrap_or_else(|| ServicePolicy::for_service(service))
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new(
            ServiceType::ALL
                .into_iter()
                .map(|s| (s, ServicePolicy::for_service(s)))
                .collect(),
        )
    }
}
