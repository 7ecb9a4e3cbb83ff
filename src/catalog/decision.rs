//! Outcome of resolving a route and selecting a host.

/// What a forwarding request resolved to.
///
/// `NoHealthyHost` is a normal outcome of selection, not an error: it is
/// reported to the client as a server-side failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ForwardingDecision {
    /// A host was selected. `path` never starts with `/`.
    Success { host: String, path: String },

    /// The route is not configured on the service.
    RouteNotFound { route: String, available: Vec<String> },

    /// Route is valid but there is no healthy host to send it to.
    NoHealthyHost { service: String },
}

impl ForwardingDecision {
    /// HTTP status the API layer reports for this decision.
    pub fn status_code(&self) -> u16 {
        match self {
            ForwardingDecision::Success { .. } => 200,
            ForwardingDecision::RouteNotFound { .. } => 404,
            ForwardingDecision::NoHealthyHost { .. } => 500,
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, ForwardingDecision::Success { .. })
    }

    /// Metric label.
    pub fn outcome(&self) -> &'static str {
        match self {
            ForwardingDecision::Success { .. } => "success",
            ForwardingDecision::RouteNotFound { .. } => "route_not_found",
            ForwardingDecision::NoHealthyHost { .. } => "no_healthy_host",
        }
    }

    /// Upstream URL the request would be sent to.
    pub fn destination(&self) -> Option<String> {
        match self {
            ForwardingDecision::Success { host, path } => Some(format!("http://{host}/{path}")),
            _ => None,
        }
    }

    /// Human readable message for a request made with `method`.
    pub fn describe(&self, method: &str) -> String {
        match self {
            ForwardingDecision::Success { host, path } => {
                format!("Forwarded {method} request to http://{host}/{path}")
            }
            ForwardingDecision::RouteNotFound { route, available } => format!(
                "Route {route} not valid. Routes available: {}",
                route_list(available)
            ),
            ForwardingDecision::NoHealthyHost { service } => {
                format!("No healthy hosts found for {service}. See logs for details")
            }
        }
    }
}

/// Render routes as a bracketed, quoted list: `['theCat', '/in/the/hat']`.
fn route_list(routes: &[String]) -> String {
    let quoted: Vec<String> = routes
        .iter()
        .map(|route| {
            if route.contains('\'') && !route.contains('"') {
                format!("\"{route}\"")
            } else {
                format!("'{}'", route.replace('\\', "\\\\").replace('\'', "\\'"))
            }
        })
        .collect();
    format!("[{}]", quoted.join(", "))
}
