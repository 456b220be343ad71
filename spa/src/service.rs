use http::Response;
use tracing::debug;

use crate::config::SpaConfig;
use crate::error::SpaError;
use crate::response;
use crate::router::{RouteDecision, SpaRouter};
use crate::static_files::StaticDir;

/// SPA middleware shell: the routing decision plus static serving.
///
/// `handle` returns `None` when the path is not an SPA concern so the
/// caller can delegate to its next handler; it never errors per request.
pub struct SpaService {
    router: SpaRouter,
    dir: StaticDir,
}

impl SpaService {
    pub fn new(config: SpaConfig) -> Result<Self, SpaError> {
        let router = SpaRouter::new(&config)?;

        let debug = config
            .debug
            .unwrap_or_else(|| !common::env::is_production());
        let cache_control = match (config.static_options.cache_control, debug) {
            (Some(explicit), _) => explicit,
            (None, true) => "no-cache".to_string(),
            (None, false) => format!("public, max-age={}", config.static_options.max_age),
        };

        Ok(Self {
            router,
            dir: StaticDir::new(config.directory, cache_control),
        })
    }

    pub async fn handle(
        &self,
        path: &str,
        if_none_match: Option<&str>,
    ) -> Option<Response<Vec<u8>>> {
        match self.router.route(path) {
            RouteDecision::Passthrough => None,
            RouteDecision::Redirect(location) => {
                Some(response::redirect_permanent(&location))
            }
            RouteDecision::Rewrite(index) => {
                debug!(path, index = %index, "rewriting to index document");
                Some(self.dir.serve(&index, if_none_match).await)
            }
            RouteDecision::Serve(p) => Some(self.dir.serve(&p, if_none_match).await),
        }
    }
}
