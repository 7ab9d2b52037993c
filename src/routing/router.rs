//! Route table compilation and lookup.
//!
//! # Responsibilities
//! - Flatten the route tree into dotted names and full templates
//! - Reject duplicate names and indistinguishable templates up front
//! - Forward resolution: location → `ResolvedRoute`
//! - Reverse resolution: name + params → `ResolvedRoute`
//!
//! # Design Decisions
//! - Immutable after construction (thread-safe without locks)
//! - O(1) name lookup via HashMap
//! - O(n) pattern scan in declaration order (acceptable for typical route counts)
//! - Explicit `None` for unknown paths rather than a silent default

use std::collections::HashMap;

use crate::routing::definition::RouteDefinition;
use crate::routing::error::RouteError;
use crate::routing::matcher::PathPattern;
use crate::routing::resolved::{Params, ResolvedRoute};

/// A flattened route ready for matching.
#[derive(Debug, Clone)]
pub struct CompiledRoute {
    pub name: String,
    pub pattern: PathPattern,
}

/// The compiled, read-only route table.
#[derive(Debug, Clone)]
pub struct Router {
    routes: Vec<CompiledRoute>,
    by_name: HashMap<String, usize>,
}

impl Router {
    /// Compile a route tree. Fails on the first configuration defect.
    pub fn compile(tree: &[RouteDefinition]) -> Result<Self, RouteError> {
        let mut router = Router {
            routes: Vec::new(),
            by_name: HashMap::new(),
        };
        let mut shapes: HashMap<String, String> = HashMap::new();

        for definition in tree {
            router.add(definition, None, "/", &mut shapes)?;
        }

        tracing::info!(routes = router.routes.len(), "Route table compiled");
        Ok(router)
    }

    fn add(
        &mut self,
        definition: &RouteDefinition,
        parent_name: Option<&str>,
        parent_path: &str,
        shapes: &mut HashMap<String, String>,
    ) -> Result<(), RouteError> {
        let name = match parent_name {
            Some(parent) => format!("{parent}.{}", definition.name),
            None => definition.name.clone(),
        };
        if definition.name.is_empty() || definition.name.contains('.') {
            return Err(RouteError::InvalidTemplate {
                template: definition.path.clone(),
                reason: format!("route name '{}' must be a non-empty single segment", name),
            });
        }

        let template = join_template(parent_path, &definition.path);
        let pattern = PathPattern::parse(&template)?;

        if self.by_name.contains_key(&name) {
            return Err(RouteError::DuplicateName(name));
        }
        if let Some(existing) = shapes.get(&pattern.shape()) {
            return Err(RouteError::AmbiguousPath {
                name,
                existing: existing.clone(),
                template,
            });
        }

        tracing::debug!(route = %name, template = %template, "Route registered");
        shapes.insert(pattern.shape(), name.clone());
        self.by_name.insert(name.clone(), self.routes.len());
        self.routes.push(CompiledRoute {
            name: name.clone(),
            pattern,
        });

        for child in &definition.children {
            self.add(child, Some(&name), &template, shapes)?;
        }
        Ok(())
    }

    /// Resolve a location (`/path?query`) to a route.
    ///
    /// A trailing slash is ignored except on the root. The first declared
    /// route whose template matches wins. Query entries whose key collides
    /// with a path parameter are dropped.
    pub fn match_path(&self, location: &str) -> Option<ResolvedRoute> {
        let location = location.split('#').next().unwrap_or_default();
        let (raw_path, raw_query) = match location.split_once('?') {
            Some((path, query)) => (path, Some(query)),
            None => (location, None),
        };
        let path = normalize(raw_path);

        let route = self.routes.iter().find_map(|route| {
            route
                .pattern
                .matches(&path)
                .map(|params| (route, params))
        });

        let Some((route, params)) = route else {
            tracing::debug!(path = %path, "No route matched");
            return None;
        };

        let mut query = Params::new();
        if let Some(raw_query) = raw_query {
            for (key, value) in url::form_urlencoded::parse(raw_query.as_bytes()) {
                if !params.contains_key(key.as_ref()) {
                    query.insert(key.into_owned(), value.into_owned());
                }
            }
        }

        Some(ResolvedRoute {
            name: route.name.clone(),
            path,
            params,
            query,
        })
    }

    /// Build a route from its dotted name.
    ///
    /// Entries in `params` that are not placeholders of the template end up
    /// in the route's query.
    pub fn match_name(&self, name: &str, params: &Params) -> Result<ResolvedRoute, RouteError> {
        let route = self
            .by_name
            .get(name)
            .map(|&idx| &self.routes[idx])
            .ok_or_else(|| RouteError::UnknownRoute(name.to_string()))?;

        let path = route.pattern.render(name, params)?;

        let mut bound = Params::new();
        let mut query = Params::new();
        for (key, value) in params {
            if route.pattern.param_names().any(|p| p == key) {
                bound.insert(key.clone(), value.clone());
            } else {
                query.insert(key.clone(), value.clone());
            }
        }

        Ok(ResolvedRoute {
            name: name.to_string(),
            path,
            params: bound,
            query,
        })
    }

    /// Look up the full template of a dotted name.
    pub fn template(&self, name: &str) -> Option<&str> {
        self.by_name
            .get(name)
            .map(|&idx| self.routes[idx].pattern.template())
    }

    /// All routes in matching order.
    pub fn routes(&self) -> &[CompiledRoute] {
        &self.routes
    }

    pub fn len(&self) -> usize {
        self.routes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }
}

fn join_template(parent: &str, segment: &str) -> String {
    match (parent, segment) {
        (_, "" | "/") => parent.to_string(),
        ("/", _) => segment.to_string(),
        _ => format!("{parent}{segment}"),
    }
}

fn normalize(path: &str) -> String {
    let trimmed = path.strip_suffix('/').unwrap_or(path);
    if trimmed.is_empty() {
        "/".to_string()
    } else if trimmed.starts_with('/') {
        trimmed.to_string()
    } else {
        format!("/{trimmed}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::routing::definition::default_routes;

    fn router() -> Router {
        Router::compile(&default_routes()).unwrap()
    }

    fn params(pairs: &[(&str, &str)]) -> Params {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_default_table_compiles() {
        let router = router();
        assert_eq!(router.len(), 15);
        assert_eq!(router.template("events.event.edit"), Some("/events/{event_id}/edit"));
        assert_eq!(router.template("index"), Some("/"));
        assert_eq!(
            router.template("committees.committee"),
            Some("/committees/{committee_id}")
        );
    }

    #[test]
    fn test_round_trip_every_route() {
        let router = router();
        let sample = params(&[
            ("event_id", "42"),
            ("user_id", "u-7"),
            ("committee_id", "c_3"),
        ]);

        for route in router.routes() {
            let bound: Params = sample
                .iter()
                .filter(|(k, _)| route.pattern.param_names().any(|p| p == k.as_str()))
                .map(|(k, v)| (k.clone(), v.clone()))
                .collect();

            let built = router.match_name(&route.name, &bound).unwrap();
            let resolved = router.match_path(&built.path).unwrap();
            assert_eq!(resolved.name, route.name);
            assert_eq!(resolved.params, bound);
        }
    }

    #[test]
    fn test_first_match_wins() {
        let router = router();
        assert_eq!(router.match_path("/events/new").unwrap().name, "events.new");
        assert_eq!(router.match_path("/events/new2").unwrap().name, "events.event");
        assert_eq!(
            router.match_path("/committees/new").unwrap().name,
            "committees.new"
        );
    }

    #[test]
    fn test_trailing_slash_and_root() {
        let router = router();
        assert_eq!(router.match_path("/").unwrap().name, "index");
        assert_eq!(router.match_path("").unwrap().name, "index");
        let r = router.match_path("/events/42/").unwrap();
        assert_eq!(r.name, "events.event");
        assert_eq!(r.path, "/events/42");
    }

    #[test]
    fn test_query_merge() {
        let router = router();
        let r = router
            .match_path("/events/42?event_id=9&tab=reg&q=a%20b#top")
            .unwrap();
        assert_eq!(r.param("event_id"), Some("42"));
        assert_eq!(r.param("tab"), Some("reg"));
        assert_eq!(r.param("q"), Some("a b"));
        assert!(!r.query.contains_key("event_id"));
        assert_eq!(r.params.len(), 1);
    }

    #[test]
    fn test_unknown_path() {
        let router = router();
        assert!(router.match_path("/does-not-exist").is_none());
        assert!(router.match_path("/events/42/edit/more").is_none());
    }

    #[test]
    fn test_match_name_errors() {
        let router = router();
        assert_eq!(
            router.match_name("nowhere", &Params::new()),
            Err(RouteError::UnknownRoute("nowhere".into()))
        );
        assert!(matches!(
            router.match_name("events.event", &Params::new()),
            Err(RouteError::MissingParam { .. })
        ));
    }

    #[test]
    fn test_match_name_extra_params_go_to_query() {
        let router = router();
        let r = router
            .match_name("events.event", &params(&[("event_id", "42"), ("tab", "x")]))
            .unwrap();
        assert_eq!(r.path, "/events/42");
        assert_eq!(r.params, params(&[("event_id", "42")]));
        assert_eq!(r.href(), "/events/42?tab=x");
    }

    #[test]
    fn test_duplicate_name_rejected() {
        let tree = vec![
            RouteDefinition::leaf("about", "/about"),
            RouteDefinition::leaf("about", "/about-us"),
        ];
        assert_eq!(
            Router::compile(&tree).unwrap_err(),
            RouteError::DuplicateName("about".into())
        );
    }

    #[test]
    fn test_ambiguous_shape_rejected() {
        let tree = vec![
            RouteDefinition::leaf("user", "/user/{user_id}"),
            RouteDefinition::leaf("profile", "/user/{id}"),
        ];
        assert!(matches!(
            Router::compile(&tree),
            Err(RouteError::AmbiguousPath { .. })
        ));
    }

    #[test]
    fn test_invalid_route_name_rejected() {
        let tree = vec![RouteDefinition::leaf("a.b", "/ab")];
        assert!(matches!(
            Router::compile(&tree),
            Err(RouteError::InvalidTemplate { .. })
        ));
    }
}
