//! Path template compilation and matching.
//!
//! # Responsibilities
//! - Parse `{param}` templates into literal and parameter segments
//! - Match a normalized path against a compiled template
//! - Render a template back into a concrete path
//!
//! # Design Decisions
//! - Segment-wise comparison, no regex
//! - Literal segments are case-sensitive
//! - A parameter binds exactly one non-empty segment of `[A-Za-z0-9_-]`

use crate::routing::error::RouteError;
use crate::routing::resolved::Params;

/// One `/`-separated piece of a template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
    Literal(String),
    Param(String),
}

/// A compiled path template such as `/events/{event_id}/edit`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathPattern {
    template: String,
    segments: Vec<Segment>,
}

impl PathPattern {
    /// Compile a full template. The root template `/` has no segments.
    pub fn parse(template: &str) -> Result<Self, RouteError> {
        let invalid = |reason: &str| RouteError::InvalidTemplate {
            template: template.to_string(),
            reason: reason.to_string(),
        };

        if !template.starts_with('/') {
            return Err(invalid("must start with '/'"));
        }

        let mut segments = Vec::new();
        for raw in template.split('/').skip(1) {
            if raw.is_empty() {
                if template == "/" {
                    break;
                }
                return Err(invalid("empty segment"));
            }

            if let Some(inner) = raw.strip_prefix('{').and_then(|s| s.strip_suffix('}')) {
                if inner.is_empty() || !inner.chars().all(is_segment_char) {
                    return Err(invalid("placeholder names must be non-empty identifiers"));
                }
                if segments
                    .iter()
                    .any(|s| matches!(s, Segment::Param(p) if p == inner))
                {
                    return Err(invalid("placeholder declared twice"));
                }
                segments.push(Segment::Param(inner.to_string()));
            } else if raw.contains('{') || raw.contains('}') {
                return Err(invalid("placeholders must span a whole segment"));
            } else {
                segments.push(Segment::Literal(raw.to_string()));
            }
        }

        Ok(Self {
            template: template.to_string(),
            segments,
        })
    }

    /// The template this pattern was compiled from.
    pub fn template(&self) -> &str {
        &self.template
    }

    /// Placeholder names in declaration order.
    pub fn param_names(&self) -> impl Iterator<Item = &str> {
        self.segments.iter().filter_map(|s| match s {
            Segment::Param(name) => Some(name.as_str()),
            Segment::Literal(_) => None,
        })
    }

    /// Template with placeholder names erased, used to detect two routes
    /// that would match exactly the same paths.
    pub fn shape(&self) -> String {
        if self.segments.is_empty() {
            return "/".to_string();
        }
        self.segments
            .iter()
            .map(|s| match s {
                Segment::Literal(l) => format!("/{l}"),
                Segment::Param(_) => "/{}".to_string(),
            })
            .collect()
    }

    /// Match a normalized path (no query, no trailing slash except root).
    pub fn matches(&self, path: &str) -> Option<Params> {
        let rest = path.strip_prefix('/')?;
        let parts: Vec<&str> = if rest.is_empty() {
            Vec::new()
        } else {
            rest.split('/').collect()
        };

        if parts.len() != self.segments.len() {
            return None;
        }

        let mut params = Params::new();
        for (segment, part) in self.segments.iter().zip(parts) {
            match segment {
                Segment::Literal(literal) => {
                    if literal != part {
                        return None;
                    }
                }
                Segment::Param(name) => {
                    if !is_param_value(part) {
                        return None;
                    }
                    params.insert(name.clone(), part.to_string());
                }
            }
        }
        Some(params)
    }

    /// Substitute every placeholder. Extra entries in `params` are ignored.
    pub fn render(&self, route: &str, params: &Params) -> Result<String, RouteError> {
        if self.segments.is_empty() {
            return Ok("/".to_string());
        }

        let mut path = String::new();
        for segment in &self.segments {
            path.push('/');
            match segment {
                Segment::Literal(literal) => path.push_str(literal),
                Segment::Param(name) => {
                    let value = params.get(name).ok_or_else(|| RouteError::MissingParam {
                        route: route.to_string(),
                        param: name.clone(),
                    })?;
                    if !is_param_value(value) {
                        return Err(RouteError::InvalidParam {
                            param: name.clone(),
                            value: value.clone(),
                        });
                    }
                    path.push_str(value);
                }
            }
        }
        Ok(path)
    }
}

fn is_segment_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_' || c == '-'
}

fn is_param_value(value: &str) -> bool {
    !value.is_empty() && value.chars().all(is_segment_char)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_and_match() {
        let pattern = PathPattern::parse("/events/{event_id}/edit").unwrap();
        assert_eq!(pattern.param_names().collect::<Vec<_>>(), vec!["event_id"]);

        let params = pattern.matches("/events/42/edit").unwrap();
        assert_eq!(params.get("event_id").map(String::as_str), Some("42"));

        assert!(pattern.matches("/events/42").is_none());
        assert!(pattern.matches("/Events/42/edit").is_none()); // Case sensitive
        assert!(pattern.matches("/events/4 2/edit").is_none());
    }

    #[test]
    fn test_root_pattern() {
        let root = PathPattern::parse("/").unwrap();
        assert!(root.matches("/").is_some());
        assert!(root.matches("/events").is_none());
        assert_eq!(root.shape(), "/");
    }

    #[test]
    fn test_invalid_templates() {
        assert!(PathPattern::parse("events").is_err());
        assert!(PathPattern::parse("/events//new").is_err());
        assert!(PathPattern::parse("/events/{}").is_err());
        assert!(PathPattern::parse("/events/id-{id}").is_err());
        assert!(PathPattern::parse("/a/{id}/b/{id}").is_err());
    }

    #[test]
    fn test_shape_erases_names() {
        let a = PathPattern::parse("/events/{event_id}").unwrap();
        let b = PathPattern::parse("/events/{id}").unwrap();
        assert_eq!(a.shape(), b.shape());
    }

    #[test]
    fn test_render() {
        let pattern = PathPattern::parse("/user/{user_id}").unwrap();
        let mut params = Params::new();
        assert!(matches!(
            pattern.render("user", &params),
            Err(RouteError::MissingParam { .. })
        ));

        params.insert("user_id".into(), "abc-123".into());
        assert_eq!(pattern.render("user", &params).unwrap(), "/user/abc-123");

        params.insert("user_id".into(), "a/b".into());
        assert!(matches!(
            pattern.render("user", &params),
            Err(RouteError::InvalidParam { .. })
        ));
    }
}
