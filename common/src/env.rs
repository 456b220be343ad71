/// Returns true when the process runs with `APP_ENV=production`.
///
/// Anything else (unset included) counts as a development environment.
pub fn is_production() -> bool {
    std::env::var("APP_ENV").unwrap_or_default() == "production"
}
