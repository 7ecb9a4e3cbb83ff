//! A single load-balanced service.
//!
//! # Responsibilities
//! - Own the host health table, route list and routing strategy
//! - Validate routes and pick a host for forwarded requests
//! - Project details (read view) and config (persistence view)

use serde::ser::{SerializeMap, Serializer};
use serde::Serialize;

use crate::catalog::decision::ForwardingDecision;
use crate::catalog::error::CatalogError;
use crate::config::ServiceConfig;
use crate::health::{HostHealth, HostHealthTable};
use crate::load_balancer::{RoutingKind, RoutingStrategy};
use crate::observability::metrics;

/// Health check path used when none is configured.
pub const DEFAULT_HEALTHCHECK: &str = "/status";

/// Read projection of a service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ServiceDetails {
    pub name: String,
    /// Host -> health, in rotation order.
    #[serde(serialize_with = "ordered_map")]
    pub hosts: Vec<(String, HostHealth)>,
    pub routes: Vec<String>,
    pub routing: String,
    pub healthcheck: String,
}

fn ordered_map<S: Serializer>(
    entries: &[(String, HostHealth)],
    serializer: S,
) -> Result<S::Ok, S::Error> {
    let mut map = serializer.serialize_map(Some(entries.len()))?;
    for (host, health) in entries {
        map.serialize_entry(host, health)?;
    }
    map.end()
}

/// A named backend group with hosts, routes and a selection strategy.
#[derive(Debug)]
pub struct Service {
    name: String,
    hosts: HostHealthTable,
    routes: Vec<String>,
    healthcheck: String,
    strategy: Box<dyn RoutingStrategy>,
}

impl Service {
    /// Build a service from its persisted definition. Every host starts healthy.
    pub fn new(name: impl Into<String>, config: &ServiceConfig) -> Result<Self, CatalogError> {
        let name = name.into();
        let kind: RoutingKind = config.routing.parse()?;
        validate_hosts(&name, &config.hosts)?;

        let service = Self {
            hosts: HostHealthTable::with_hosts(config.hosts.iter().cloned()),
            routes: dedup_routes(config.routes.iter().cloned()),
            healthcheck: config
                .healthcheck
                .clone()
                .unwrap_or_else(|| DEFAULT_HEALTHCHECK.to_string()),
            strategy: kind.build(),
            name,
        };
        service.publish_health();
        Ok(service)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn routes(&self) -> &[String] {
        &self.routes
    }

    pub fn healthcheck(&self) -> &str {
        &self.healthcheck
    }

    pub fn routing(&self) -> RoutingKind {
        self.strategy.kind()
    }

    pub fn hosts(&self) -> &HostHealthTable {
        &self.hosts
    }

    // --- Hosts ---

    /// Insert or overwrite the status of `host`.
    pub fn set_health(&mut self, host: &str, status: i64) -> Result<(), CatalogError> {
        self.hosts
            .set_health(host, status)
            .map_err(|e| CatalogError::from_health(&self.name, e))?;

        let healthy = self.hosts.is_healthy(host);
        tracing::info!(service = %self.name, host = %host, status, healthy, "Host health updated");
        metrics::record_host_health(&self.name, host, healthy);
        Ok(())
    }

    /// Overwrite the status of a host that is already part of the service.
    pub fn update_health(&mut self, host: &str, status: i64) -> Result<(), CatalogError> {
        if !self.hosts.contains(host) {
            return Err(CatalogError::HostNotFound {
                service: self.name.clone(),
                host: host.to_string(),
            });
        }
        self.set_health(host, status)
    }

    /// Add a healthy host. Re-adding resets it to healthy in place.
    pub fn add_host(&mut self, host: &str) -> Result<(), CatalogError> {
        validate_hosts(&self.name, &[host])?;
        self.hosts.add_host(host);
        metrics::record_host_health(&self.name, host, true);
        Ok(())
    }

    pub fn remove_host(&mut self, host: &str) -> Result<(), CatalogError> {
        self.hosts
            .remove_host(host)
            .map_err(|e| CatalogError::from_health(&self.name, e))?;
        tracing::info!(service = %self.name, host = %host, "Host removed");
        Ok(())
    }

    /// Drop every host and the rotation state.
    pub fn clear_hosts(&mut self) {
        self.hosts.clear_all();
        self.strategy.reset();
    }

    /// Replace the whole host set. All new hosts start healthy and the
    /// rotation starts over.
    pub fn replace_hosts<S: AsRef<str>>(&mut self, hosts: &[S]) -> Result<(), CatalogError> {
        validate_hosts(&self.name, hosts)?;
        self.clear_hosts();
        for host in hosts {
            self.hosts.add_host(host.as_ref());
        }
        self.publish_health();
        Ok(())
    }

    pub fn is_healthy(&self, host: &str) -> bool {
        self.hosts.is_healthy(host)
    }

    // --- Routes ---

    /// Add a route unless the exact string is already present.
    pub fn add_route(&mut self, route: &str) {
        if !self.routes.iter().any(|r| r == route) {
            self.routes.push(route.to_string());
        }
    }

    pub fn remove_route(&mut self, route: &str) -> Result<(), CatalogError> {
        match self.routes.iter().position(|r| r == route) {
            Some(index) => {
                self.routes.remove(index);
                Ok(())
            }
            None => Err(CatalogError::RouteNotFound {
                service: self.name.clone(),
                route: route.to_string(),
            }),
        }
    }

    pub fn set_routes<I: IntoIterator<Item = String>>(&mut self, routes: I) {
        self.routes = dedup_routes(routes);
    }

    /// True if `route` or its `/`-prefixed form is configured.
    pub fn resolve_route(&self, route: &str) -> bool {
        self.routes
            .iter()
            .any(|r| r == route || (r.starts_with('/') && &r[1..] == route))
    }

    // --- Settings ---

    pub fn set_healthcheck(&mut self, healthcheck: impl Into<String>) {
        self.healthcheck = healthcheck.into();
    }

    /// Switch strategy. Keeps rotation state when the kind does not change.
    pub fn set_routing(&mut self, kind: RoutingKind) {
        if self.strategy.kind() != kind {
            self.strategy = kind.build();
        }
    }

    // --- Selection ---

    /// Resolve `route` and pick a host for it.
    ///
    /// The rotation advances only when a host is actually selected.
    pub fn forward(&mut self, route: &str) -> ForwardingDecision {
        if !self.resolve_route(route) {
            tracing::debug!(service = %self.name, route = %route, "Route not configured");
            return ForwardingDecision::RouteNotFound {
                route: route.to_string(),
                available: self.routes.clone(),
            };
        }

        let healthy = self.hosts.healthy_hosts();
        let Some(host) = self.strategy.pick_host(&healthy) else {
            tracing::warn!(
                service = %self.name,
                host_count = self.hosts.len(),
                "No healthy hosts found"
            );
            for (host, health) in self.hosts.snapshot() {
                tracing::debug!(service = %self.name, host = %host, health = %health, "Host status");
            }
            return ForwardingDecision::NoHealthyHost {
                service: self.name.clone(),
            };
        };

        let host = host.to_string();
        tracing::debug!(
            service = %self.name,
            healthy = ?healthy,
            selected = %host,
            "Selected host"
        );

        ForwardingDecision::Success {
            host,
            path: route.strip_prefix('/').unwrap_or(route).to_string(),
        }
    }

    // --- Projections ---

    pub fn details(&self) -> ServiceDetails {
        ServiceDetails {
            name: self.name.clone(),
            hosts: self.hosts.snapshot(),
            routes: self.routes.clone(),
            routing: self.routing().to_string(),
            healthcheck: self.healthcheck.clone(),
        }
    }

    /// Persistence view; feeding it back to `Service::new` yields an
    /// equivalent service with every host healthy.
    pub fn dump_config(&self) -> ServiceConfig {
        ServiceConfig {
            hosts: self.hosts.hosts().map(str::to_string).collect(),
            routes: self.routes.clone(),
            healthcheck: Some(self.healthcheck.clone()),
            routing: self.routing().to_string(),
        }
    }

    pub(crate) fn publish_health(&self) {
        for (host, health) in self.hosts.snapshot() {
            metrics::record_host_health(&self.name, &host, health == HostHealth::Healthy);
        }
    }
}

fn validate_hosts<S: AsRef<str>>(service: &str, hosts: &[S]) -> Result<(), CatalogError> {
    if hosts.iter().any(|h| h.as_ref().trim().is_empty()) {
        return Err(CatalogError::InvalidHosts {
            service: service.to_string(),
            reason: "host identifiers must not be empty".to_string(),
        });
    }
    Ok(())
}

/// Drop exact repeats, keeping first occurrences. `/x` and `x` both stay.
fn dedup_routes<I: IntoIterator<Item = String>>(routes: I) -> Vec<String> {
    let mut out: Vec<String> = Vec::new();
    for route in routes {
        if !out.contains(&route) {
            out.push(route);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn basic() -> Service {
        Service::new(
            "someNewThing",
            &ServiceConfig::new(["thing1:8080", "thing2"], ["theCat", "/in/the/hat"]),
        )
        .unwrap()
    }

    fn picked(decision: ForwardingDecision) -> String {
        match decision {
            ForwardingDecision::Success { host, .. } => host,
            other => panic!("expected success, got {other:?}"),
        }
    }

    #[test]
    fn test_defaults() {
        let service = basic();
        assert_eq!(service.name(), "someNewThing");
        assert_eq!(service.healthcheck(), "/status");
        assert_eq!(service.routing(), RoutingKind::RoundRobin);
    }

    #[test]
    fn test_unsupported_routing_rejected() {
        let mut config = ServiceConfig::new(["a"], ["r"]);
        config.routing = "LC".into();
        let err = Service::new("svc", &config).unwrap_err();
        assert!(matches!(err, CatalogError::UnsupportedRouting(_)));
    }

    #[test]
    fn test_empty_host_rejected() {
        let err = Service::new("svc", &ServiceConfig::new(["a", " "], ["r"])).unwrap_err();
        assert!(matches!(err, CatalogError::InvalidHosts { .. }));
    }

    #[test]
    fn test_route_matching_ignores_single_leading_slash() {
        let service = basic();
        assert!(service.resolve_route("in/the/hat"));
        assert!(service.resolve_route("/in/the/hat"));
        assert!(service.resolve_route("theCat"));
        // Only a leading slash is added, never removed from the request
        assert!(!service.resolve_route("/theCat"));
        assert!(!service.resolve_route("in/the/hat/"));
        assert!(!service.resolve_route("//in/the/hat"));
        assert!(!service.resolve_route("thecat"));
    }

    #[test]
    fn test_forward_strips_leading_slash() {
        let mut service = basic();
        assert_eq!(
            service.forward("/in/the/hat"),
            ForwardingDecision::Success {
                host: "thing1:8080".into(),
                path: "in/the/hat".into()
            }
        );
    }

    #[test]
    fn test_unknown_route_does_not_advance_rotation() {
        let mut service = basic();
        let decision = service.forward("the/grinch/hates");
        assert_eq!(
            decision,
            ForwardingDecision::RouteNotFound {
                route: "the/grinch/hates".into(),
                available: vec!["theCat".into(), "/in/the/hat".into()],
            }
        );
        assert_eq!(picked(service.forward("theCat")), "thing1:8080");
    }

    #[test]
    fn test_scenario_sick_and_restored() {
        let mut service = Service::new("svc", &ServiceConfig::new(["h1", "h2"], ["r"])).unwrap();

        assert_eq!(picked(service.forward("r")), "h1");
        assert_eq!(picked(service.forward("r")), "h2");
        assert_eq!(picked(service.forward("r")), "h1");

        service.update_health("h2", 500).unwrap();
        assert_eq!(picked(service.forward("r")), "h1");
        assert_eq!(picked(service.forward("r")), "h1");

        // cursor is 5: 5 mod 2 = 1
        service.update_health("h2", 200).unwrap();
        assert_eq!(picked(service.forward("r")), "h2");
        assert_eq!(picked(service.forward("r")), "h1");
    }

    #[test]
    fn test_sticky_cursor_after_removal() {
        let mut service = Service::new("svc", &ServiceConfig::new(["A", "B"], ["r"])).unwrap();
        assert_eq!(picked(service.forward("r")), "A");
        service.remove_host("A").unwrap();
        assert_eq!(picked(service.forward("r")), "B");
    }

    #[test]
    fn test_no_healthy_hosts() {
        let mut service = basic();
        service.update_health("thing1:8080", 112).unwrap();
        service.update_health("thing2", 111).unwrap();
        let sick = service.forward("theCat");

        service.replace_hosts::<&str>(&[]).unwrap();
        let empty = service.forward("theCat");

        let expected = ForwardingDecision::NoHealthyHost {
            service: "someNewThing".into(),
        };
        assert_eq!(sick, expected);
        assert_eq!(empty, expected);
    }

    #[test]
    fn test_replace_hosts_resets_rotation() {
        let mut service = basic();
        service.forward("theCat");
        service.update_health("thing2", 404).unwrap();

        service
            .replace_hosts(&["thing1:8080", "thing2", "newHost"])
            .unwrap();
        assert!(service.is_healthy("thing2"));
        assert_eq!(picked(service.forward("theCat")), "thing1:8080");
        assert_eq!(picked(service.forward("theCat")), "thing2");
        assert_eq!(picked(service.forward("theCat")), "newHost");
    }

    #[test]
    fn test_update_health_requires_known_host() {
        let mut service = basic();
        let err = service.update_health("whoHeardAWhat", 200).unwrap_err();
        assert_eq!(
            err,
            CatalogError::HostNotFound {
                service: "someNewThing".into(),
                host: "whoHeardAWhat".into()
            }
        );
        assert_eq!(
            service.update_health("thing2", -11111).unwrap_err(),
            CatalogError::InvalidStatus(-11111)
        );
    }

    #[test]
    fn test_idempotent_add_host() {
        let mut service = basic();
        service.update_health("thing1:8080", 300).unwrap();
        service.add_host("thing1:8080").unwrap();

        let details = service.details();
        assert_eq!(
            details.hosts,
            vec![
                ("thing1:8080".to_string(), HostHealth::Healthy),
                ("thing2".to_string(), HostHealth::Healthy),
            ]
        );
    }

    #[test]
    fn test_routes_add_and_remove() {
        let mut service = basic();
        service.add_route("theCat");
        service.add_route("/theCat");
        assert_eq!(service.routes(), ["theCat", "/in/the/hat", "/theCat"]);

        service.remove_route("theCat").unwrap();
        assert!(service.resolve_route("theCat"));
        assert!(matches!(
            service.remove_route("nope"),
            Err(CatalogError::RouteNotFound { .. })
        ));
    }

    #[test]
    fn test_set_routing_same_kind_keeps_cursor() {
        let mut service = basic();
        service.forward("theCat");
        service.set_routing(RoutingKind::RoundRobin);
        assert_eq!(picked(service.forward("theCat")), "thing2");
    }

    #[test]
    fn test_details_serialization() {
        let mut service = basic();
        service.update_health("thing1:8080", 300).unwrap();
        let json = serde_json::to_value(service.details()).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "name": "someNewThing",
                "hosts": {"thing1:8080": "sick", "thing2": "healthy"},
                "routes": ["theCat", "/in/the/hat"],
                "routing": "RR",
                "healthcheck": "/status"
            })
        );
    }

    #[test]
    fn test_dump_config_round_trip() {
        let mut original = basic();
        original.set_healthcheck("/health");
        original.update_health("thing2", 503).unwrap();

        let dumped = original.dump_config();
        assert_eq!(dumped.hosts, vec!["thing1:8080", "thing2"]);
        assert_eq!(dumped.healthcheck.as_deref(), Some("/health"));

        let rebuilt = Service::new("someNewThing", &dumped).unwrap();
        assert_eq!(rebuilt.dump_config(), dumped);
        assert!(rebuilt.is_healthy("thing2"));
        assert_eq!(rebuilt.routes(), original.routes());
        assert_eq!(rebuilt.routing(), original.routing());
    }
}
