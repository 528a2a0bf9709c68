//! Router assembly: pages, health endpoints, module mounts, and the
//! role table consulted by the gate middleware.

use axum::response::Html;
use axum::routing::get;
use axum::{Json, Router};

use workops_auth::guard::{RouteRule, RouteTable};
use workops_auth::model::Role;
use workops_core::Module;

use crate::middleware::{auth_gate, GateContext};

const LOGIN_PAGE: &str = include_str!("web/login.html");
const DASHBOARD_PAGE: &str = include_str!("web/dashboard.html");

const ADMINS: &[Role] = &[Role::Admin, Role::SuperAdmin];
const SUPER_ONLY: &[Role] = &[Role::SuperAdmin];

/// Every route needing more than "any authenticated user", in one
/// place. Unlisted routes pass with any valid token.
pub fn route_table() -> RouteTable {
    RouteTable::new(vec![
        RouteRule { method: "GET", pattern: "/user/employees", allow: ADMINS },
        RouteRule { method: "GET", pattern: "/user/admin", allow: SUPER_ONLY },
        RouteRule { method: "PATCH", pattern: "/user/update-role", allow: SUPER_ONLY },
        RouteRule { method: "DELETE", pattern: "/request/{id}", allow: ADMINS },
        RouteRule { method: "POST", pattern: "/request/{id}/assign", allow: ADMINS },
        RouteRule { method: "POST", pattern: "/request/{id}/status", allow: ADMINS },
        RouteRule { method: "GET", pattern: "/request/analytics", allow: ADMINS },
        RouteRule { method: "GET", pattern: "/launch/attendance-summary", allow: ADMINS },
    ])
}

/// Assemble the full application router with the gate applied.
pub fn build_router(modules: &[Box<dyn Module>], ctx: GateContext) -> Router {
    let mut router = Router::new()
        .route("/", get(login_page))
        .route("/login", get(login_page))
        .route("/dashboard", get(dashboard_page))
        .route("/health", get(health))
        .route("/version", get(version));

    for module in modules {
        tracing::info!(module = module.name(), "mounting module");
        router = router.nest(&format!("/{}", module.name()), module.routes());
    }

    router.layer(axum::middleware::from_fn_with_state(ctx, auth_gate))
}

async fn login_page() -> Html<&'static str> {
    Html(LOGIN_PAGE)
}

async fn dashboard_page() -> Html<&'static str> {
    Html(DASHBOARD_PAGE)
}

async fn health() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "status": "ok" }))
}

async fn version() -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "name": "workopsd",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use workops_auth::guard::GuardDecision;

    #[test]
    fn table_covers_admin_surface() {
        let t = route_table();

        // Employees are kept out of every triage route.
        for (method, path) in [
            ("GET", "/user/employees"),
            ("DELETE", "/request/abc123"),
            ("POST", "/request/abc123/assign"),
            ("POST", "/request/abc123/status"),
            ("GET", "/request/analytics"),
            ("GET", "/launch/attendance-summary"),
        ] {
            assert_eq!(
                t.check(method, path, Role::Employee),
                GuardDecision::Forbidden,
                "{} {}",
                method,
                path
            );
            assert_eq!(t.check(method, path, Role::Admin), GuardDecision::Allowed);
        }

        // Role administration is for SUPER_ADMIN alone.
        for (method, path) in [("GET", "/user/admin"), ("PATCH", "/user/update-role")] {
            assert_eq!(t.check(method, path, Role::Admin), GuardDecision::Forbidden);
            assert_eq!(t.check(method, path, Role::SuperAdmin), GuardDecision::Allowed);
        }

        // Self-service routes carry no rule.
        for (method, path) in [
            ("GET", "/auth/me"),
            ("POST", "/request/requests"),
            ("POST", "/request/abc123/reopen"),
            ("POST", "/launch/attendance"),
        ] {
            assert_eq!(t.check(method, path, Role::Employee), GuardDecision::NoRule);
        }
    }
}
