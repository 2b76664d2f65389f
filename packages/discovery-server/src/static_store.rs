//! Operator-declared services with no expiration.
//!
//! The specification treats this as an opaque collaborator (§6: "Static
//! Store interface consumed by the Query Resource"). [`StaticStore`] is the
//! trait the query resource programs against; [`InMemoryStaticStore`] is a
//! fixed-set implementation suitable for config-file-driven deployments and
//! for tests.

use std::collections::HashSet;

use discovery_core::Service;

/// Provider of operator-declared services that never expire.
pub trait StaticStore: Send + Sync {
    /// Returns every statically declared service.
    fn get_all(&self) -> HashSet<Service>;

    /// Returns statically declared services of the given type.
    fn get_by_type(&self, service_type: &str) -> HashSet<Service> {
        self.get_all()
            .into_iter()
            .filter(|s| s.service_type == service_type)
            .collect()
    }

    /// Returns statically declared services of the given type and pool.
    fn get_by_type_and_pool(&self, service_type: &str, pool: &str) -> HashSet<Service> {
        self.get_all()
            .into_iter()
            .filter(|s| s.service_type == service_type && s.pool == pool)
            .collect()
    }
}

/// A fixed set of services, declared once at construction and never
/// mutated afterward.
pub struct InMemoryStaticStore {
    services: HashSet<Service>,
}

impl InMemoryStaticStore {
    /// Creates a static store holding exactly `services`.
    #[must_use]
    pub fn new(services: HashSet<Service>) -> Self {
        Self { services }
    }

    /// Creates a static store with no declared services.
    #[must_use]
    pub fn empty() -> Self {
        Self {
            services: HashSet::new(),
        }
    }
}

impl StaticStore for InMemoryStaticStore {
    fn get_all(&self) -> HashSet<Service> {
        self.services.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use discovery_core::{NodeId, ServiceId};
    use std::collections::BTreeMap;

    fn service(id: &str, service_type: &str, pool: &str) -> Service {
        Service {
            id: ServiceId::new(id),
            node_id: NodeId::new("static"),
            service_type: service_type.to_string(),
            pool: pool.to_string(),
            location: "/static".to_string(),
            properties: BTreeMap::new(),
        }
    }

    #[test]
    fn get_all_returns_every_declared_service() {
        let store = InMemoryStaticStore::new(HashSet::from([
            service("s1", "storage", "alpha"),
            service("s2", "web", "beta"),
        ]));
        assert_eq!(store.get_all().len(), 2);
    }

    #[test]
    fn get_by_type_filters() {
        let store = InMemoryStaticStore::new(HashSet::from([
            service("s1", "storage", "alpha"),
            service("s2", "web", "beta"),
        ]));
        let storage = store.get_by_type("storage");
        assert_eq!(storage.len(), 1);
        assert_eq!(storage.iter().next().unwrap().id, ServiceId::new("s1"));
    }

    #[test]
    fn get_by_type_and_pool_filters_both() {
        let store = InMemoryStaticStore::new(HashSet::from([
            service("s1", "storage", "alpha"),
            service("s2", "storage", "beta"),
        ]));
        let result = store.get_by_type_and_pool("storage", "beta");
        assert_eq!(result.len(), 1);
        assert_eq!(result.iter().next().unwrap().id, ServiceId::new("s2"));
    }

    #[test]
    fn empty_store_returns_nothing() {
        let store = InMemoryStaticStore::empty();
        assert!(store.get_all().is_empty());
    }
}
