use crate::config::SpaConfig;
use crate::error::SpaError;
use crate::pattern::RoutePattern;

/// What to do with an incoming request path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RouteDecision {
    /// 301 to the slash-stripped path.
    Redirect(String),
    /// Serve this index document instead of the requested path.
    Rewrite(String),
    /// Serve the path itself from the static directory.
    Serve(String),
    /// Not an SPA path; hand over to the next handler.
    Passthrough,
}

/// Pure routing core: decides, per path, between redirect, index rewrite,
/// literal static serving and pass-through. No I/O happens here, so the
/// router is stateless per request and freely shareable.
pub struct SpaRouter {
    /// `(prefix, index)` pairs, most specific prefix first.
    bases: Vec<(String, String)>,
    routes: Option<Vec<RoutePattern>>,
    strip_slash: bool,
}

impl SpaRouter {
    /// Compiles the configuration. Malformed route patterns fail here, not
    /// per request.
    pub fn new(config: &SpaConfig) -> Result<Self, SpaError> {
        let indexes: Vec<String> = config
            .indexes
            .iter()
            .map(|i| {
                if i.starts_with('/') {
                    i.clone()
                } else {
                    format!("/{i}")
                }
            })
            .collect();

        let mut bases: Vec<(String, String)> = config
            .route_bases
            .iter()
            .zip(indexes)
            .map(|(base, index)| {
                let base = base.strip_suffix('/').unwrap_or(base.as_str()).to_string();
                (base, index)
            })
            .collect();
        // Most specific prefix wins; sort_by is stable, so equal lengths
        // keep their configuration order.
        bases.sort_by(|a, b| b.0.len().cmp(&a.0.len()));

        let routes = match &config.routes {
            Some(routes) => Some(
                routes
                    .iter()
                    .map(|r| RoutePattern::compile(r))
                    .collect::<Result<Vec<_>, _>>()?,
            ),
            None => None,
        };

        Ok(Self {
            bases,
            routes,
            strip_slash: config.strip_slash,
        })
    }

    pub fn route(&self, raw_path: &str) -> RouteDecision {
        // A trailing slash is dropped internally; with `strip_slash` the
        // client is redirected to the canonical form instead (never for the
        // bare root, whose stripped form would be an empty location).
        let (path, had_slash) = match raw_path.strip_suffix('/') {
            Some(stripped) => (stripped, true),
            None => (raw_path, false),
        };

        if had_slash && self.strip_slash && !path.is_empty() {
            return RouteDecision::Redirect(path.to_string());
        }

        if let Some(routes) = &self.routes {
            if !routes.iter().any(|r| r.is_match(path)) {
                return RouteDecision::Passthrough;
            }
        }

        for (base, index) in &self.bases {
            if path.starts_with(base.as_str()) {
                return RouteDecision::Rewrite(index.clone());
            }
        }

        RouteDecision::Serve(path.to_string())
    }
}
