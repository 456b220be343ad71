use thiserror::Error;

#[derive(Debug, Error)]
pub enum SpaError {
    /// A configured route pattern failed to compile. Raised at construction
    /// time, never per request.
    #[error("invalid route pattern `{route}`: {source}")]
    InvalidPattern {
        route: String,
        #[source]
        source: regex::Error,
    },
}
