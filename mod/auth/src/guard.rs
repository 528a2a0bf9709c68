//! Declarative role guard.
//!
//! Routes that need more than "any authenticated user" are listed in a
//! [`RouteTable`] mapping (method, path pattern) to an allow-list of
//! roles. The server middleware consults the table once per request
//! after validating the token — no per-handler role checks.

use crate::model::Role;

/// One guarded route. Pattern segments of the form `{x}` match exactly
/// one path segment.
#[derive(Debug, Clone)]
pub struct RouteRule {
    pub method: &'static str,
    pub pattern: &'static str,
    pub allow: &'static [Role],
}

/// The full allow-list table, checked at dispatch time.
#[derive(Debug, Default)]
pub struct RouteTable {
    rules: Vec<RouteRule>,
}

/// Outcome of a table lookup for an authenticated caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GuardDecision {
    /// No rule for this route: any valid token passes.
    NoRule,
    /// A rule matched and the caller's role is in the allow-list.
    Allowed,
    /// A rule matched and the caller's role is not in the allow-list.
    Forbidden,
}

impl RouteTable {
    pub fn new(rules: Vec<RouteRule>) -> Self {
        Self { rules }
    }

    /// Find the first rule matching (method, path), if any.
    pub fn find_rule(&self, method: &str, path: &str) -> Option<&RouteRule> {
        self.rules
            .iter()
            .find(|r| r.method == method && pattern_matches(r.pattern, path))
    }

    /// Check the caller's role against the table.
    pub fn check(&self, method: &str, path: &str, role: Role) -> GuardDecision {
        match self.find_rule(method, path) {
            None => GuardDecision::NoRule,
            Some(rule) if rule.allow.contains(&role) => GuardDecision::Allowed,
            Some(_) => GuardDecision::Forbidden,
        }
    }
}

/// Match a pattern against a concrete path, segment by segment.
/// `{x}` segments match any single non-empty segment.
fn pattern_matches(pattern: &str, path: &str) -> bool {
    let mut pat = pattern.trim_matches('/').split('/');
    let mut got = path.trim_matches('/').split('/');

    loop {
        match (pat.next(), got.next()) {
            (None, None) => return true,
            (Some(p), Some(g)) => {
                let is_param = p.starts_with('{') && p.ends_with('}');
                if is_param {
                    if g.is_empty() {
                        return false;
                    }
                } else if p != g {
                    return false;
                }
            }
            _ => return false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ADMINS: &[Role] = &[Role::Admin, Role::SuperAdmin];
    const SUPER_ONLY: &[Role] = &[Role::SuperAdmin];

    fn table() -> RouteTable {
        RouteTable::new(vec![
            RouteRule { method: "GET", pattern: "/user/employees", allow: ADMINS },
            RouteRule { method: "GET", pattern: "/user/admin", allow: SUPER_ONLY },
            RouteRule { method: "PATCH", pattern: "/user/update-role", allow: SUPER_ONLY },
            RouteRule { method: "DELETE", pattern: "/request/{id}", allow: ADMINS },
            RouteRule { method: "POST", pattern: "/request/{id}/status", allow: ADMINS },
        ])
    }

    #[test]
    fn pattern_matching() {
        assert!(pattern_matches("/request/{id}", "/request/r1"));
        assert!(pattern_matches("/request/{id}/status", "/request/r1/status"));
        assert!(!pattern_matches("/request/{id}", "/request/r1/status"));
        assert!(!pattern_matches("/request/{id}/status", "/request/r1"));
        assert!(!pattern_matches("/user/employees", "/user/admin"));
        assert!(pattern_matches("/user/employees", "/user/employees/"));
    }

    #[test]
    fn roles_outside_allow_list_are_forbidden() {
        let t = table();
        let all = [Role::Employee, Role::Admin, Role::SuperAdmin];

        for rule in [
            ("GET", "/user/employees", ADMINS),
            ("GET", "/user/admin", SUPER_ONLY),
            ("PATCH", "/user/update-role", SUPER_ONLY),
            ("POST", "/request/r1/status", ADMINS),
        ] {
            for role in all {
                let expected = if rule.2.contains(&role) {
                    GuardDecision::Allowed
                } else {
                    GuardDecision::Forbidden
                };
                assert_eq!(t.check(rule.0, rule.1, role), expected, "{:?} {} {}", role, rule.0, rule.1);
            }
        }
    }

    #[test]
    fn unlisted_routes_have_no_rule() {
        let t = table();
        assert_eq!(t.check("GET", "/request/requests", Role::Employee), GuardDecision::NoRule);
        assert_eq!(t.check("POST", "/launch/attendance", Role::Employee), GuardDecision::NoRule);
        // Method matters.
        assert_eq!(t.check("GET", "/request/r1", Role::Employee), GuardDecision::NoRule);
        assert_eq!(t.check("DELETE", "/request/r1", Role::Employee), GuardDecision::Forbidden);
    }
}
