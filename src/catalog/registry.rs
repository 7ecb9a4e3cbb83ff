//! Service catalog: name -> service, with lifecycle management.
//!
//! # Responsibilities
//! - Own every `Service` instance
//! - Create / replace / update / delete services
//! - Route forwarding and health updates to the right service
//!
//! # Concurrency
//! - Entries live in a `DashMap`, each service behind its own mutex
//! - A shard guard is never held while waiting on a service lock: handles are
//!   cloned out of the map first
//! - A forwarding decision runs entirely under one service lock

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use parking_lot::Mutex;
use serde::Deserialize;

use crate::catalog::decision::ForwardingDecision;
use crate::catalog::error::CatalogError;
use crate::catalog::service::{Service, ServiceDetails};
use crate::config::{CatalogConfig, ServiceConfig};
use crate::load_balancer::RoutingKind;
use crate::observability::metrics;

/// Handle to a catalog-owned service.
pub type SharedService = Arc<Mutex<Service>>;

/// Partial update for an existing service. `None` leaves a field untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct ServiceUpdate {
    /// Replaces the whole host set, resetting health and rotation.
    #[serde(default)]
    pub hosts: Option<Vec<String>>,
    #[serde(default)]
    pub routes: Option<Vec<String>>,
    #[serde(default)]
    pub healthcheck: Option<String>,
    #[serde(default)]
    pub routing: Option<String>,
}

#[derive(Debug)]
struct CatalogEntry {
    /// Creation order, kept across replace.
    seq: u64,
    service: SharedService,
}

/// Registry of all services known to the load balancer.
#[derive(Debug, Default)]
pub struct ServiceCatalog {
    services: DashMap<String, CatalogEntry>,
    next_seq: AtomicU64,
}

impl ServiceCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a catalog from a snapshot.
    pub fn from_config(config: &CatalogConfig) -> Result<Self, CatalogError> {
        let catalog = Self::new();
        for (name, service) in config {
            catalog.replace(name, service)?;
        }
        Ok(catalog)
    }

    /// Create a new service. Fails if the name is taken.
    pub fn create(&self, name: &str, config: &ServiceConfig) -> Result<ServiceDetails, CatalogError> {
        let details = match self.services.entry(name.to_string()) {
            Entry::Occupied(_) => return Err(CatalogError::AlreadyExists(name.to_string())),
            Entry::Vacant(slot) => {
                let service = Service::new(name, config)?;
                let details = service.details();
                slot.insert(CatalogEntry {
                    seq: self.next_seq.fetch_add(1, Ordering::Relaxed),
                    service: Arc::new(Mutex::new(service)),
                });
                details
            }
        };

        tracing::info!(service = %name, hosts = config.hosts.len(), "Service created");
        metrics::record_service_count(self.len());
        Ok(details)
    }

    /// Create a service or overwrite an existing one, discarding its state.
    pub fn replace(&self, name: &str, config: &ServiceConfig) -> Result<ServiceDetails, CatalogError> {
        let service = Service::new(name, config)?;
        let details = service.details();
        let service = Arc::new(Mutex::new(service));

        let replaced = match self.services.entry(name.to_string()) {
            Entry::Occupied(mut slot) => {
                slot.get_mut().service = service;
                true
            }
            Entry::Vacant(slot) => {
                slot.insert(CatalogEntry {
                    seq: self.next_seq.fetch_add(1, Ordering::Relaxed),
                    service,
                });
                false
            }
        };

        tracing::info!(service = %name, replaced, "Service stored");
        metrics::record_service_count(self.len());
        Ok(details)
    }

    /// Apply a partial update. The update is validated before anything changes.
    pub fn update(&self, name: &str, update: &ServiceUpdate) -> Result<ServiceDetails, CatalogError> {
        let kind = update
            .routing
            .as_deref()
            .map(str::parse::<RoutingKind>)
            .transpose()?;

        self.with_service(name, |service| -> Result<ServiceDetails, CatalogError> {
            if let Some(hosts) = &update.hosts {
                service.replace_hosts(hosts)?;
            }
            if let Some(routes) = &update.routes {
                service.set_routes(routes.iter().cloned());
            }
            if let Some(healthcheck) = &update.healthcheck {
                service.set_healthcheck(healthcheck.as_str());
            }
            if let Some(kind) = kind {
                service.set_routing(kind);
            }
            tracing::info!(service = %name, "Service updated");
            Ok(service.details())
        })?
    }

    pub fn get(&self, name: &str) -> Result<ServiceDetails, CatalogError> {
        self.with_service(name, |service| service.details())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.services.contains_key(name)
    }

    /// Service names in creation order.
    pub fn list(&self) -> Vec<String> {
        let mut names: Vec<(u64, String)> = self
            .services
            .iter()
            .map(|entry| (entry.value().seq, entry.key().clone()))
            .collect();
        names.sort_unstable();
        names.into_iter().map(|(_, name)| name).collect()
    }

    pub fn delete(&self, name: &str) -> Result<(), CatalogError> {
        self.services
            .remove(name)
            .ok_or_else(|| CatalogError::ServiceNotFound(name.to_string()))?;
        tracing::info!(service = %name, "Service deleted");
        metrics::record_service_count(self.len());
        Ok(())
    }

    /// Remove every service.
    pub fn clear(&self) {
        self.services.clear();
        metrics::record_service_count(0);
    }

    pub fn len(&self) -> usize {
        self.services.len()
    }

    pub fn is_empty(&self) -> bool {
        self.services.is_empty()
    }

    /// Set the status of a host already registered on `name`.
    pub fn set_host_health(&self, name: &str, host: &str, status: i64) -> Result<(), CatalogError> {
        self.with_service(name, |service| service.update_health(host, status))?
    }

    /// Resolve `route` on `name` and pick a host.
    pub fn forward(&self, name: &str, route: &str) -> Result<ForwardingDecision, CatalogError> {
        match self.with_service(name, |service| service.forward(route)) {
            Ok(decision) => {
                metrics::record_forward(name, decision.outcome());
                Ok(decision)
            }
            Err(err) => {
                metrics::record_forward(name, "unknown_service");
                Err(err)
            }
        }
    }

    /// Run `f` with exclusive access to one service.
    pub fn with_service<R>(
        &self,
        name: &str,
        f: impl FnOnce(&mut Service) -> R,
    ) -> Result<R, CatalogError> {
        let service = self.lookup(name)?;
        let mut guard = service.lock();
        Ok(f(&mut *guard))
    }

    /// Persistence view of every service, in creation order.
    pub fn snapshot(&self) -> CatalogConfig {
        self.handles()
            .into_iter()
            .map(|(name, service)| {
                let config = service.lock().dump_config();
                (name, config)
            })
            .collect()
    }

    /// Republish every host health gauge and the catalog size.
    pub fn publish_metrics(&self) {
        for (_, service) in self.handles() {
            service.lock().publish_health();
        }
        metrics::record_service_count(self.len());
    }

    /// Service handles in creation order. No shard lock is held afterwards.
    fn handles(&self) -> Vec<(String, SharedService)> {
        let mut handles: Vec<(u64, String, SharedService)> = self
            .services
            .iter()
            .map(|entry| (entry.value().seq, entry.key().clone(), entry.value().service.clone()))
            .collect();
        handles.sort_unstable_by_key(|(seq, _, _)| *seq);
        handles
            .into_iter()
            .map(|(_, name, service)| (name, service))
            .collect()
    }

    fn lookup(&self, name: &str) -> Result<SharedService, CatalogError> {
        self.services
            .get(name)
            .map(|entry| entry.value().service.clone())
            .ok_or_else(|| CatalogError::ServiceNotFound(name.to_string()))
    }
}
