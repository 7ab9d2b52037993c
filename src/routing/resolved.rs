//! Resolved routes.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Parameter bindings keyed by placeholder (or query) name.
pub type Params = BTreeMap<String, String>;

/// A concrete route produced by forward or reverse resolution.
///
/// `params` holds exactly the placeholders of the route's template.
/// Anything else supplied with the navigation (query-string entries,
/// extra named arguments) lives in `query`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolvedRoute {
    /// Dotted route name, e.g. `events.event.edit`.
    pub name: String,

    /// Fully substituted path without query string.
    pub path: String,

    /// Template placeholder bindings.
    pub params: Params,

    /// Additional bindings carried in the query string.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub query: Params,
}

impl ResolvedRoute {
    /// Look up a binding. Path parameters win over query entries.
    pub fn param(&self, key: &str) -> Option<&str> {
        self.params
            .get(key)
            .or_else(|| self.query.get(key))
            .map(String::as_str)
    }

    /// Location string for history: path plus encoded query string.
    pub fn href(&self) -> String {
        if self.query.is_empty() {
            return self.path.clone();
        }
        let query = url::form_urlencoded::Serializer::new(String::new())
            .extend_pairs(self.query.iter())
            .finish();
        format!("{}?{}", self.path, query)
    }

    /// Whether this route is `prefix` itself or one of its descendants.
    pub fn is_within(&self, prefix: &str) -> bool {
        self.name == prefix
            || (self.name.starts_with(prefix)
                && self.name.as_bytes().get(prefix.len()) == Some(&b'.'))
    }
}
