// src/server/routes.rs
// Declarative route table, resolved once from the dependency context.
use crate::connections::AppContext;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resource {
    Base,
    Redis,
    Elasticsearch,
    Busy,
    Ping,
    Metrics,
}

#[derive(Debug, Clone)]
pub struct Route {
    pub path: &'static str,
    pub resource: Resource,
}

#[derive(Debug, Clone)]
pub struct RouteTable {
    routes: Vec<Route>,
}

impl RouteTable {
    /// Dependency-backed routes exist only when their handle does.
    pub fn from_context(context: &AppContext) -> Self {
        let mut routes = Vec::new();

        if context.cache().is_some() {
            routes.push(Route { path: "/app/redis", resource: Resource::Redis });
        }
        if context.search().is_some() {
            routes.push(Route { path: "/app/elasticsearch", resource: Resource::Elasticsearch });
        }
        routes.push(Route { path: "/app", resource: Resource::Base });
        routes.push(Route { path: "/app/busy", resource: Resource::Busy });
        routes.push(Route { path: "/ping", resource: Resource::Ping });
        routes.push(Route { path: "/metrics", resource: Resource::Metrics });

        Self { routes }
    }

    /// Exact path match; a single trailing slash is ignored.
    pub fn resolve(&self, path: &str) -> Option<&Route> {
        let path = match path.strip_suffix('/') {
            Some(stripped) if !stripped.is_empty() => stripped,
            _ => path,
        };
        self.routes.iter().find(|route| route.path == path)
    }

    pub fn paths(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.routes.iter().map(|route| route.path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_context_has_only_static_routes() {
        let table = RouteTable::from_context(&AppContext::default());
        let paths: Vec<_> = table.paths().collect();

        assert_eq!(paths, vec!["/app", "/app/busy", "/ping", "/metrics"]);
        assert!(table.resolve("/app/redis").is_none());
        assert!(table.resolve("/app/elasticsearch").is_none());
    }

    #[test]
    fn resolve_ignores_one_trailing_slash() {
        let table = RouteTable::from_context(&AppContext::default());

        assert_eq!(table.resolve("/app/busy/").map(|r| r.resource), Some(Resource::Busy));
        assert_eq!(table.resolve("/ping").map(|r| r.resource), Some(Resource::Ping));
        assert!(table.resolve("/").is_none());
        assert!(table.resolve("/app/busy/extra").is_none());
    }
}
