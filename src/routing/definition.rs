//! Declarative route tree.
//!
//! Routes are declared as a tree of named path segments. A child's dotted
//! name and path template are formed by appending to its parent's, so
//! `events` → `event` → `edit` becomes `events.event.edit` at
//! `/events/{event_id}/edit`.

use serde::{Deserialize, Serialize};

/// A single node of the route tree.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct RouteDefinition {
    /// Local name, joined with ancestors' names by `.`.
    pub name: String,

    /// Path segment appended to the parent's template. May contain
    /// `{param}` placeholders.
    pub path: String,

    /// Nested routes. Declaration order is matching order.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<RouteDefinition>,
}

impl RouteDefinition {
    /// A route without children.
    pub fn leaf(name: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            path: path.into(),
            children: Vec::new(),
        }
    }

    /// A route with nested children.
    pub fn branch(
        name: impl Into<String>,
        path: impl Into<String>,
        children: Vec<RouteDefinition>,
    ) -> Self {
        Self {
            name: name.into(),
            path: path.into(),
            children,
        }
    }
}

/// The association site's route tree.
///
/// Literal children (`new`) are declared before their parameterized
/// siblings so that `/events/new` never resolves to `events.event`.
pub fn default_routes() -> Vec<RouteDefinition> {
    vec![
        RouteDefinition::branch(
            "events",
            "/events",
            vec![
                RouteDefinition::leaf("new", "/new"),
                RouteDefinition::branch(
                    "event",
                    "/{event_id}",
                    vec![RouteDefinition::leaf("edit", "/edit")],
                ),
            ],
        ),
        RouteDefinition::leaf("register", "/register"),
        RouteDefinition::leaf("about", "/about"),
        RouteDefinition::leaf("material_rental", "/material-rental"),
        RouteDefinition::leaf("index", "/"),
        RouteDefinition::leaf("settings", "/settings"),
        RouteDefinition::leaf("user", "/user/{user_id}"),
        RouteDefinition::leaf("members", "/members"),
        RouteDefinition::branch(
            "committees",
            "/committees",
            vec![
                RouteDefinition::leaf("new", "/new"),
                RouteDefinition::branch(
                    "committee",
                    "/{committee_id}",
                    vec![RouteDefinition::leaf("edit", "/edit")],
                ),
            ],
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_route_tree_from_toml() {
        let toml = r#"
            [[routes]]
            name = "events"
            path = "/events"

            [[routes.children]]
            name = "event"
            path = "/{event_id}"
        "#;

        #[derive(Deserialize)]
        struct Wrapper {
            routes: Vec<RouteDefinition>,
        }

        let parsed: Wrapper = toml::from_str(toml).unwrap();
        assert_eq!(parsed.routes.len(), 1);
        assert_eq!(parsed.routes[0].children[0].path, "/{event_id}");
    }

    #[test]
    fn test_default_tree_declares_literals_first() {
        let routes = default_routes();
        let events = &routes[0];
        assert_eq!(events.children[0].name, "new");
        assert_eq!(events.children[1].name, "event");
    }
}
