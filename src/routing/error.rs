//! Routing error definitions.

use thiserror::Error;

/// Errors raised while compiling the route table or resolving by name.
///
/// Every variant indicates a defect in static configuration or calling
/// code; user-supplied paths that match nothing are reported as a plain
/// `None` from [`Router::match_path`](crate::routing::Router::match_path).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RouteError {
    /// Two routes flatten to the same dotted name.
    #[error("duplicate route name '{0}'")]
    DuplicateName(String),

    /// Two templates have the same shape and can never be told apart.
    #[error("route '{name}' has the same path shape as '{existing}' ({template})")]
    AmbiguousPath {
        name: String,
        existing: String,
        template: String,
    },

    /// A path segment or placeholder is malformed.
    #[error("invalid path template '{template}': {reason}")]
    InvalidTemplate { template: String, reason: String },

    /// A route name was referenced that the table does not declare.
    #[error("unknown route '{0}'")]
    UnknownRoute(String),

    /// A placeholder had no value when building a path by name.
    #[error("route '{route}' requires parameter '{param}'")]
    MissingParam { route: String, param: String },

    /// A supplied parameter value cannot be placed in a path segment.
    #[error("value '{value}' for parameter '{param}' is not a valid path segment")]
    InvalidParam { param: String, value: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = RouteError::MissingParam {
            route: "events.event".into(),
            param: "event_id".into(),
        };
        assert_eq!(
            err.to_string(),
            "route 'events.event' requires parameter 'event_id'"
        );

        let err = RouteError::UnknownRoute("nowhere".into());
        assert!(err.to_string().contains("nowhere"));
    }
}
