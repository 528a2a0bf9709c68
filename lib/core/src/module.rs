use axum::Router;

/// A mountable WorkOps module.
///
/// Each module owns its service state and exposes a relative router.
/// The server binary nests the router under `/{name}`.
pub trait Module {
    /// Module name, used as the URL prefix.
    fn name(&self) -> &str;

    /// Build the module's router. Must already carry its own state.
    fn routes(&self) -> Router;
}
