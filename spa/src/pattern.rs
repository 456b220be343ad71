use regex::Regex;

use crate::error::SpaError;

/// A compiled path pattern.
///
/// Route strings are literal paths with optional `:param` segments, e.g.
/// `/user/:id`. Each `:param` matches exactly one path segment (one or more
/// non-slash characters); everything else matches literally. The compiled
/// matcher is anchored at both ends.
#[derive(Debug, Clone)]
pub struct RoutePattern {
    source: String,
    regex: Regex,
    params: Vec<String>,
}

impl RoutePattern {
    pub fn compile(route: &str) -> Result<Self, SpaError> {
        let mut pattern = String::from("^");
        let mut params = Vec::new();

        for (i, segment) in route.split('/').enumerate() {
            if i > 0 {
                pattern.push('/');
            }
            if let Some(name) = segment.strip_prefix(':') {
                params.push(name.to_string());
                pattern.push_str("([^/]+)");
            } else {
                pattern.push_str(&regex::escape(segment));
            }
        }
        pattern.push('$');

        let regex = Regex::new(&pattern).map_err(|source| SpaError::InvalidPattern {
            route: route.to_string(),
            source,
        })?;

        Ok(Self {
            source: route.to_string(),
            regex,
            params,
        })
    }

    /// The route string this pattern was compiled from.
    pub fn source(&self) -> &str {
        &self.source
    }

    /// Ordered `:param` names.
    pub fn params(&self) -> &[String] {
        &self.params
    }

    pub fn is_match(&self, path: &str) -> bool {
        self.regex.is_match(path)
    }

    /// Parameter name/value pairs captured from `path`, in declaration
    /// order, or `None` when the path does not match.
    pub fn capture<'p>(&self, path: &'p str) -> Option<Vec<(&str, &'p str)>> {
        let caps = self.regex.captures(path)?;

        Some(
            self.params
                .iter()
                .enumerate()
                .map(|(i, name)| {
                    let value = caps.get(i + 1).map(|m| m.as_str()).unwrap_or("");
                    (name.as_str(), value)
                })
                .collect(),
        )
    }
}
