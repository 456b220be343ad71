use std::path::PathBuf;

const ONE_DAY: u64 = 24 * 60 * 60;

/// Static-file serving knobs.
#[derive(Debug, Clone)]
pub struct StaticOptions {
    /// `max-age` in seconds for the `Cache-Control` header.
    pub max_age: u64,

    /// Explicit `Cache-Control` value. Takes precedence over `max_age` and
    /// over the debug-mode `no-cache` default.
    pub cache_control: Option<String>,
}

impl Default for StaticOptions {
    fn default() -> Self {
        Self {
            max_age: 60 * ONE_DAY,
            cache_control: None,
        }
    }
}

/// SPA router configuration.
#[derive(Debug, Clone)]
pub struct SpaConfig {
    /// Static root directory.
    pub directory: PathBuf,

    /// Index documents, paired positionally with `route_bases`. A missing
    /// leading `/` is added.
    pub indexes: Vec<String>,

    /// Path prefixes selecting which index a path rewrites to. One trailing
    /// `/` is stripped.
    pub route_bases: Vec<String>,

    /// Allow-list of SPA route patterns (literal paths or `:param`
    /// patterns). `None` makes every path eligible; an empty list matches
    /// nothing, so everything falls through.
    pub routes: Option<Vec<String>>,

    /// Respond 301 to the slash-less path instead of serving `/foo/`.
    pub strip_slash: bool,

    pub static_options: StaticOptions,

    /// Force-disable HTTP caching on served assets. Defaults to the process
    /// run mode: debug unless `APP_ENV=production`.
    pub debug: Option<bool>,
}

impl SpaConfig {
    pub fn new(directory: impl Into<PathBuf>) -> Self {
        Self {
            directory: directory.into(),
            indexes: vec!["/index.html".to_string()],
            route_bases: vec!["/".to_string()],
            routes: None,
            strip_slash: false,
            static_options: StaticOptions::default(),
            debug: None,
        }
    }
}

/// Accumulates route paths as an application registers its handlers, for
/// handing to [`SpaConfig::routes`].
#[derive(Debug, Default)]
pub struct RouteCollector {
    routes: Vec<String>,
}

impl RouteCollector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a route, adding the leading slash when missing. Duplicates
    /// are kept once.
    pub fn add(&mut self, route: &str) {
        let route = if route.starts_with('/') || route.is_empty() {
            route.to_string()
        } else {
            format!("/{route}")
        };

        if !self.routes.contains(&route) {
            self.routes.push(route);
        }
    }

    pub fn routes(&self) -> &[String] {
        &self.routes
    }

    pub fn into_routes(self) -> Vec<String> {
        self.routes
    }
}
