//! Service registry - register every kind, then freeze
//!
//! The registry is an ordinary value: build it once with
//! [`RegistryBuilder`], then pass it by reference to validation and the
//! orchestrators. Nothing is global, so independent runs (and tests) never
//! share plugin state.

use crate::error::RegistryError;
use crate::ports::{PortCatalog, PortDescriptor};
use crate::service::{BoxedService, Capabilities, EdgeWiring, ResourceService, Teardown};
use std::collections::BTreeMap;

/// A service together with what was learned about it at registration
#[derive(Debug)]
pub struct RegisteredService {
    service: BoxedService,
    ports: PortDescriptor,
    capabilities: Capabilities,
}

impl RegisteredService {
    fn new(service: BoxedService) -> Self {
        let ports = service.ports();
        let capabilities = Capabilities::of(service.as_ref());
        Self {
            service,
            ports,
            capabilities,
        }
    }

    pub fn kind(&self) -> &'static str {
        self.service.kind()
    }

    pub fn service(&self) -> &dyn ResourceService {
        self.service.as_ref()
    }

    pub fn ports(&self) -> &PortDescriptor {
        &self.ports
    }

    pub fn capabilities(&self) -> Capabilities {
        self.capabilities
    }

    /// Wiring capability, if the kind declared one at registration
    pub fn wiring(&self) -> Option<&dyn EdgeWiring> {
        if self.capabilities.wire {
            self.service.wiring()
        } else {
            None
        }
    }

    /// Teardown capability, if the kind declared one at registration
    pub fn teardown(&self) -> Option<&dyn Teardown> {
        if self.capabilities.destroy {
            self.service.teardown()
        } else {
            None
        }
    }
}

/// Collects services before the registry is frozen
#[derive(Debug, Default)]
pub struct RegistryBuilder {
    services: BTreeMap<String, RegisteredService>,
}

impl RegistryBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a service, chaining
    ///
    /// ```ignore
    /// let registry = RegistryBuilder::new()
    ///     .register(Queue)?
    ///     .register(Worker)?
    ///     .build();
    /// ```
    pub fn register<S: ResourceService + 'static>(
        mut self,
        service: S,
    ) -> Result<Self, RegistryError> {
        self.register_boxed(Box::new(service))?;
        Ok(self)
    }

    /// Register an already boxed service
    pub fn register_boxed(&mut self, service: BoxedService) -> Result<(), RegistryError> {
        let kind = service.kind();
        if self.services.contains_key(kind) {
            return Err(RegistryError::DuplicateKind {
                kind: kind.to_string(),
            });
        }
        log::debug!("registered service kind '{}'", kind);
        self.services
            .insert(kind.to_string(), RegisteredService::new(service));
        Ok(())
    }

    /// Freeze the registry
    pub fn build(self) -> Registry {
        Registry {
            services: self.services,
        }
    }
}

/// Immutable mapping from kind to service
#[derive(Debug, Default)]
pub struct Registry {
    services: BTreeMap<String, RegisteredService>,
}

impl Registry {
    pub fn builder() -> RegistryBuilder {
        RegistryBuilder::new()
    }

    pub fn get(&self, kind: &str) -> Option<&RegisteredService> {
        self.services.get(kind)
    }

    pub fn contains(&self, kind: &str) -> bool {
        self.services.contains_key(kind)
    }

    /// Registered kinds in sorted order
    pub fn kinds(&self) -> impl Iterator<Item = &str> {
        self.services.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = &RegisteredService> {
        self.services.values()
    }

    pub fn len(&self) -> usize {
        self.services.len()
    }

    pub fn is_empty(&self) -> bool {
        self.services.is_empty()
    }

    /// Port catalog derived from the registered services
    pub fn catalog(&self) -> PortCatalog {
        PortCatalog::build(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{CallLog, MockService};

    #[test]
    fn test_duplicate_kind_rejected() {
        let log = CallLog::default();
        let err = RegistryBuilder::new()
            .register(MockService::new("X", &[], &["p"], &log))
            .unwrap()
            .register(MockService::new("X", &["p"], &[], &log))
            .unwrap_err();
        assert_eq!(err, RegistryError::DuplicateKind { kind: "X".into() });
    }

    #[test]
    fn test_capabilities_recorded_at_registration() {
        let log = CallLog::default();
        let registry = RegistryBuilder::new()
            .register(MockService::new("plain", &[], &[], &log))
            .unwrap()
            .register(
                MockService::new("full", &[], &[], &log)
                    .with_wiring()
                    .with_teardown(),
            )
            .unwrap()
            .build();

        let plain = registry.get("plain").unwrap();
        assert_eq!(plain.capabilities(), Capabilities::default());
        assert!(plain.wiring().is_none());
        assert!(plain.teardown().is_none());

        let full = registry.get("full").unwrap();
        assert!(full.capabilities().wire);
        assert!(full.capabilities().destroy);
        assert!(full.wiring().is_some());
        assert!(full.teardown().is_some());
    }

    #[test]
    fn test_catalog_from_registry() {
        let log = CallLog::default();
        let registry = RegistryBuilder::new()
            .register(MockService::new("X", &[], &["p"], &log))
            .unwrap()
            .register(MockService::new("Y", &["p"], &[], &log))
            .unwrap()
            .build();

        let catalog = registry.catalog();
        assert!(catalog.produces("X", "p"));
        assert!(catalog.accepts("Y", "p"));
        assert_eq!(registry.kinds().collect::<Vec<_>>(), ["X", "Y"]);
    }
}
