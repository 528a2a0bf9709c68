//! Cache keys and the write → invalidation table.

/// Key for GET /auth/me.
pub const ME: &str = "me";
/// Key for GET /user/employees.
pub const EMPLOYEES: &str = "employees";
/// Key for GET /user/admin.
pub const ADMIN_USERS: &str = "adminUsers";
/// Key for GET /request/requests.
pub const SERVICE_REQUESTS: &str = "serviceRequests";
/// Key for GET /request/analytics.
pub const REQUEST_ANALYTICS: &str = "requestAnalytics";

/// Key for GET /request/{id}.
pub fn service_request(id: &str) -> String {
    format!("serviceRequest:{}", id)
}

/// Key for GET /launch/attendance-summary?date=.
pub fn lunch_summary(date: &str) -> String {
    format!("lunchSummary:{}", date)
}

/// Every mutating API call the client can make.
///
/// [`WriteOp::invalidated_keys`] is the single source of truth for
/// which cached reads a write makes stale. The match is exhaustive on
/// purpose: a new write op does not compile until its row is added.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WriteOp {
    UpdateRole { user_id: String },
    CreateRequest,
    DeleteRequest { id: String },
    AssignRequest { id: String },
    UpdateRequestStatus { id: String },
    ReopenRequest { id: String },
    MarkAttendance { date: String },
}

impl WriteOp {
    /// The cache keys this write makes stale.
    pub fn invalidated_keys(&self) -> Vec<String> {
        match self {
            // A role change moves the user between the two lists, and
            // may be the caller's own role.
            WriteOp::UpdateRole { .. } => {
                vec![EMPLOYEES.into(), ADMIN_USERS.into(), ME.into()]
            }
            WriteOp::CreateRequest => {
                vec![SERVICE_REQUESTS.into(), REQUEST_ANALYTICS.into()]
            }
            WriteOp::DeleteRequest { id } => vec![
                SERVICE_REQUESTS.into(),
                service_request(id),
                REQUEST_ANALYTICS.into(),
            ],
            WriteOp::AssignRequest { id }
            | WriteOp::UpdateRequestStatus { id }
            | WriteOp::ReopenRequest { id } => vec![
                SERVICE_REQUESTS.into(),
                service_request(id),
                REQUEST_ANALYTICS.into(),
            ],
            WriteOp::MarkAttendance { date } => vec![lunch_summary(date)],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_update_invalidates_lists_detail_and_analytics() {
        let keys = WriteOp::UpdateRequestStatus { id: "r1".into() }.invalidated_keys();
        assert!(keys.contains(&SERVICE_REQUESTS.to_string()));
        assert!(keys.contains(&"serviceRequest:r1".to_string()));
        assert!(keys.contains(&REQUEST_ANALYTICS.to_string()));
    }

    #[test]
    fn delete_invalidates_its_detail_key() {
        let keys = WriteOp::DeleteRequest { id: "r9".into() }.invalidated_keys();
        assert!(keys.contains(&"serviceRequest:r9".to_string()));
    }

    #[test]
    fn role_change_touches_both_user_lists() {
        let keys = WriteOp::UpdateRole { user_id: "u1".into() }.invalidated_keys();
        assert!(keys.contains(&EMPLOYEES.to_string()));
        assert!(keys.contains(&ADMIN_USERS.to_string()));
        assert!(keys.contains(&ME.to_string()));
    }

    #[test]
    fn attendance_only_touches_its_date() {
        let keys = WriteOp::MarkAttendance { date: "2026-03-02".into() }.invalidated_keys();
        assert_eq!(keys, vec!["lunchSummary:2026-03-02".to_string()]);
    }

    #[test]
    fn assignment_tracks_the_detail_and_list_keys() {
        let keys = WriteOp::AssignRequest { id: "r1".into() }.invalidated_keys();
        assert!(keys.contains(&"serviceRequest:r1".to_string()));
        assert!(keys.contains(&SERVICE_REQUESTS.to_string()));
    }
}
