//! Composes the dynamic and static stores into the registry's public read
//! surface.

use std::sync::Arc;

use discovery_core::Services;

use crate::dynamic_store::DynamicStore;
use crate::error::StoreError;
use crate::static_store::StaticStore;

/// Fuses [`DynamicStore`] and [`StaticStore`] results for typed/pooled
/// queries and tags them with the registry's configured environment.
///
/// `environment` is a label attached to every response, never a filter --
/// the dynamic and static stores are not partitioned by environment at this
/// layer.
pub struct QueryResource {
    environment: String,
    dynamic: Arc<DynamicStore>,
    static_store: Arc<dyn StaticStore>,
}

impl QueryResource {
    /// Creates a query resource for the given environment label, dynamic
    /// store, and static store.
    #[must_use]
    pub fn new(
        environment: impl Into<String>,
        dynamic: Arc<DynamicStore>,
        static_store: Arc<dyn StaticStore>,
    ) -> Self {
        Self {
            environment: environment.into(),
            dynamic,
            static_store,
        }
    }

    /// Returns every live service (dynamic and static) of `service_type`.
    ///
    /// # Errors
    /// Returns [`StoreError::Backing`] if the dynamic store fails to scan.
    pub async fn get_services(&self, service_type: &str) -> Result<Services, StoreError> {
        let mut services = self.dynamic.get(service_type).await?;
        services.extend(self.static_store.get_by_type(service_type));
        Ok(Services {
            environment: self.environment.clone(),
            services,
        })
    }

    /// Returns every live service (dynamic and static) of `service_type`
    /// restricted to `pool`.
    ///
    /// # Errors
    /// Returns [`StoreError::Backing`] if the dynamic store fails to scan.
    pub async fn get_services_in_pool(
        &self,
        service_type: &str,
        pool: &str,
    ) -> Result<Services, StoreError> {
        let mut services = self.dynamic.get_by_type_and_pool(service_type, pool).await?;
        services.extend(self.static_store.get_by_type_and_pool(service_type, pool));
        Ok(Services {
            environment: self.environment.clone(),
            services,
        })
    }
}
