//! Ticket operations: create, list, assign, status lifecycle, analytics.

use workops_core::{new_id, now_rfc3339, ListResult};
use workops_sql::{records, Value};

use crate::model::{
    CreateRequest, Request, RequestAnalytics, RequestDetails, RequestListQuery, RequestStatus,
};
use crate::service::{RequestError, RequestService};

const TABLE: &str = "requests";
const DEFAULT_LIMIT: usize = 50;

fn request_indexes(r: &Request) -> Vec<(&'static str, Value)> {
    vec![
        ("user_id", Value::Text(r.user_id.clone())),
        (
            "assigned_to",
            match &r.assigned_to {
                Some(id) => Value::Text(id.clone()),
                None => Value::Null,
            },
        ),
        ("status", Value::Text(r.status.as_str().to_string())),
        ("request_type", Value::Text(r.details.kind().to_string())),
        ("created_at", Value::Text(r.created_at.clone())),
        ("updated_at", Value::Text(r.updated_at.clone())),
    ]
}

impl RequestService {
    /// Create a new ticket in PENDING, owned by `owner_id`.
    pub fn create_request(
        &self,
        owner_id: &str,
        input: CreateRequest,
    ) -> Result<Request, RequestError> {
        if input.title.trim().is_empty() {
            return Err(RequestError::Validation("title is required".into()));
        }
        if input.description.trim().is_empty() {
            return Err(RequestError::Validation("description is required".into()));
        }
        if let RequestDetails::Supplies { item_name, .. } = &input.details {
            if item_name.trim().is_empty() {
                return Err(RequestError::Validation("itemName is required".into()));
            }
        }

        let now = now_rfc3339();
        let request = Request {
            id: new_id(),
            title: input.title,
            description: input.description,
            attachments: input.attachments,
            details: input.details,
            status: RequestStatus::Pending,
            user_id: owner_id.to_string(),
            assigned_to: None,
            rejection_reason: None,
            created_at: now.clone(),
            updated_at: now,
        };

        records::insert_record(
            self.sql.as_ref(),
            TABLE,
            &request.id,
            &request,
            &request_indexes(&request),
        )?;

        tracing::info!(
            request = %request.id,
            kind = request.details.kind(),
            owner = %request.user_id,
            "request created"
        );
        Ok(request)
    }

    pub fn get_request(&self, id: &str) -> Result<Request, RequestError> {
        Ok(records::get_record(self.sql.as_ref(), TABLE, id)?)
    }

    /// List tickets, newest first, with optional equality filters.
    pub fn list_requests(&self, q: &RequestListQuery) -> Result<ListResult<Request>, RequestError> {
        let mut filters: Vec<(&str, Value)> = Vec::new();

        if let Some(user_id) = &q.user_id {
            filters.push(("user_id", Value::Text(user_id.clone())));
        }
        if let Some(status) = &q.status {
            let status = RequestStatus::from_str(status)
                .ok_or_else(|| RequestError::Validation(format!("unknown status: {}", status)))?;
            filters.push(("status", Value::Text(status.as_str().to_string())));
        }
        if let Some(kind) = &q.request_type {
            if kind != "ISSUE" && kind != "SUPPLIES" {
                return Err(RequestError::Validation(format!("unknown type: {}", kind)));
            }
            filters.push(("request_type", Value::Text(kind.clone())));
        }

        let limit = q.limit.unwrap_or(DEFAULT_LIMIT);
        let offset = q.offset.unwrap_or(0);
        let (items, total) =
            records::list_records(self.sql.as_ref(), TABLE, &filters, limit, offset)?;
        Ok(ListResult { items, total })
    }

    pub fn delete_request(&self, id: &str) -> Result<(), RequestError> {
        records::delete_record(self.sql.as_ref(), TABLE, id)?;
        tracing::info!(request = %id, "request deleted");
        Ok(())
    }

    /// Assign a ticket to a user. The assignee must be an existing,
    /// active user; the status is left as is.
    pub fn assign_request(&self, id: &str, assignee_id: &str) -> Result<Request, RequestError> {
        // The users table is owned by the auth module; only existence
        // is checked here.
        let rows = self
            .sql
            .query(
                "SELECT COUNT(*) as cnt FROM users WHERE id = ?1 AND active = 1",
                &[Value::Text(assignee_id.to_string())],
            )
            .map_err(|e| RequestError::Storage(e.to_string()))?;
        let found = rows.first().and_then(|r| r.get_i64("cnt")).unwrap_or(0);
        if found == 0 {
            return Err(RequestError::NotFound(format!("user/{}", assignee_id)));
        }

        let mut request = self.get_request(id)?;
        request.assigned_to = Some(assignee_id.to_string());
        request.updated_at = now_rfc3339();
        self.save(&request)?;

        tracing::info!(request = %id, assignee = %assignee_id, "request assigned");
        Ok(request)
    }

    /// Move a ticket to a new status.
    ///
    /// The move must be listed in the transition table. REJECTED
    /// requires a rejection reason; every other target refuses one.
    pub fn update_status(
        &self,
        id: &str,
        to: RequestStatus,
        rejection_reason: Option<String>,
    ) -> Result<Request, RequestError> {
        let mut request = self.get_request(id)?;

        if !request.status.can_transition(to) {
            return Err(RequestError::Validation(format!(
                "cannot move request from {} to {}",
                request.status.as_str(),
                to.as_str(),
            )));
        }

        if to == RequestStatus::Rejected {
            let reason = rejection_reason
                .as_deref()
                .map(str::trim)
                .filter(|r| !r.is_empty())
                .ok_or_else(|| {
                    RequestError::Validation("rejectionReason is required for REJECTED".into())
                })?;
            request.rejection_reason = Some(reason.to_string());
        } else if rejection_reason.is_some() {
            return Err(RequestError::Validation(
                "rejectionReason is only allowed for REJECTED".into(),
            ));
        }

        let from = request.status;
        request.status = to;
        request.updated_at = now_rfc3339();
        self.save(&request)?;

        tracing::info!(
            request = %id,
            from = from.as_str(),
            to = to.as_str(),
            "request status updated"
        );
        Ok(request)
    }

    /// Reopen a settled ticket: back to PENDING with the rejection
    /// reason cleared.
    pub fn reopen_request(&self, id: &str) -> Result<Request, RequestError> {
        let mut request = self.get_request(id)?;

        if !request.status.can_reopen() {
            return Err(RequestError::Validation(format!(
                "cannot reopen request in {}",
                request.status.as_str(),
            )));
        }

        request.status = RequestStatus::Pending;
        request.rejection_reason = None;
        request.updated_at = now_rfc3339();
        self.save(&request)?;

        tracing::info!(request = %id, "request reopened");
        Ok(request)
    }

    /// Ticket counts grouped by status and by type.
    pub fn analytics(&self) -> Result<RequestAnalytics, RequestError> {
        let mut analytics = RequestAnalytics {
            total: 0,
            by_status: Default::default(),
            by_type: Default::default(),
        };

        let rows = self
            .sql
            .query(
                "SELECT status, COUNT(*) as cnt FROM requests GROUP BY status",
                &[],
            )
            .map_err(|e| RequestError::Storage(e.to_string()))?;
        for row in &rows {
            if let (Some(status), Some(cnt)) = (row.get_str("status"), row.get_i64("cnt")) {
                analytics.by_status.insert(status.to_string(), cnt);
                analytics.total += cnt;
            }
        }

        let rows = self
            .sql
            .query(
                "SELECT request_type, COUNT(*) as cnt FROM requests GROUP BY request_type",
                &[],
            )
            .map_err(|e| RequestError::Storage(e.to_string()))?;
        for row in &rows {
            if let (Some(kind), Some(cnt)) = (row.get_str("request_type"), row.get_i64("cnt")) {
                analytics.by_type.insert(kind.to_string(), cnt);
            }
        }

        Ok(analytics)
    }

    fn save(&self, request: &Request) -> Result<(), RequestError> {
        records::update_record(
            self.sql.as_ref(),
            TABLE,
            &request.id,
            request,
            &request_indexes(request),
        )?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use workops_sql::{SQLStore, SqliteStore};

    use super::*;
    use crate::model::IssuePriority;

    fn service() -> Arc<RequestService> {
        let sql = Arc::new(SqliteStore::open_in_memory().unwrap());
        // Stand-in for the users table the auth module owns.
        sql.exec(
            "CREATE TABLE users (id TEXT PRIMARY KEY, active INTEGER NOT NULL DEFAULT 1)",
            &[],
        )
        .unwrap();
        sql.exec("INSERT INTO users (id, active) VALUES ('admin-1', 1)", &[])
            .unwrap();
        sql.exec("INSERT INTO users (id, active) VALUES ('gone-1', 0)", &[])
            .unwrap();
        RequestService::new(sql).unwrap()
    }

    fn issue(title: &str) -> CreateRequest {
        CreateRequest {
            title: title.into(),
            description: "something is broken".into(),
            attachments: vec![],
            details: RequestDetails::Issue {
                priority: IssuePriority::High,
                category: "ELECTRICAL".into(),
                location: "Floor 2".into(),
            },
        }
    }

    fn supplies(title: &str) -> CreateRequest {
        CreateRequest {
            title: title.into(),
            description: "we ran out".into(),
            attachments: vec![],
            details: RequestDetails::Supplies {
                category: "STATIONERY".into(),
                item_name: "Markers".into(),
            },
        }
    }

    #[test]
    fn test_create_and_get() {
        let svc = service();
        let created = svc.create_request("u1", issue("Projector")).unwrap();
        assert_eq!(created.status, RequestStatus::Pending);
        assert_eq!(created.user_id, "u1");
        assert!(created.assigned_to.is_none());

        let got = svc.get_request(&created.id).unwrap();
        assert_eq!(got.title, "Projector");
        assert_eq!(got.details.kind(), "ISSUE");
    }

    #[test]
    fn test_create_requires_title() {
        let svc = service();
        let mut input = issue("  ");
        input.title = "  ".into();
        assert!(matches!(
            svc.create_request("u1", input),
            Err(RequestError::Validation(_))
        ));
    }

    #[test]
    fn test_list_filters() {
        let svc = service();
        svc.create_request("u1", issue("A")).unwrap();
        svc.create_request("u1", supplies("B")).unwrap();
        svc.create_request("u2", issue("C")).unwrap();

        let q = RequestListQuery {
            user_id: Some("u1".into()),
            ..Default::default()
        };
        assert_eq!(svc.list_requests(&q).unwrap().total, 2);

        let q = RequestListQuery {
            request_type: Some("SUPPLIES".into()),
            ..Default::default()
        };
        let result = svc.list_requests(&q).unwrap();
        assert_eq!(result.total, 1);
        assert_eq!(result.items[0].title, "B");

        let q = RequestListQuery {
            status: Some("NOT_A_STATUS".into()),
            ..Default::default()
        };
        assert!(matches!(
            svc.list_requests(&q),
            Err(RequestError::Validation(_))
        ));
    }

    #[test]
    fn test_status_transition_enforced() {
        let svc = service();
        let r = svc.create_request("u1", issue("A")).unwrap();

        // PENDING cannot jump straight to RESOLVED.
        assert!(matches!(
            svc.update_status(&r.id, RequestStatus::Resolved, None),
            Err(RequestError::Validation(_))
        ));

        let r2 = svc
            .update_status(&r.id, RequestStatus::InProgress, None)
            .unwrap();
        assert_eq!(r2.status, RequestStatus::InProgress);

        let r3 = svc
            .update_status(&r.id, RequestStatus::Resolved, None)
            .unwrap();
        assert_eq!(r3.status, RequestStatus::Resolved);
    }

    #[test]
    fn test_rejection_requires_reason() {
        let svc = service();
        let r = svc.create_request("u1", issue("A")).unwrap();

        assert!(matches!(
            svc.update_status(&r.id, RequestStatus::Rejected, None),
            Err(RequestError::Validation(_))
        ));
        assert!(matches!(
            svc.update_status(&r.id, RequestStatus::Rejected, Some("  ".into())),
            Err(RequestError::Validation(_))
        ));

        let rejected = svc
            .update_status(&r.id, RequestStatus::Rejected, Some("out of scope".into()))
            .unwrap();
        assert_eq!(rejected.rejection_reason.as_deref(), Some("out of scope"));
    }

    #[test]
    fn test_reason_refused_outside_rejection() {
        let svc = service();
        let r = svc.create_request("u1", issue("A")).unwrap();
        assert!(matches!(
            svc.update_status(&r.id, RequestStatus::InProgress, Some("nope".into())),
            Err(RequestError::Validation(_))
        ));
    }

    #[test]
    fn test_reopen_clears_rejection_reason() {
        let svc = service();
        let r = svc.create_request("u1", issue("A")).unwrap();
        svc.update_status(&r.id, RequestStatus::Rejected, Some("no budget".into()))
            .unwrap();

        let reopened = svc.reopen_request(&r.id).unwrap();
        assert_eq!(reopened.status, RequestStatus::Pending);
        assert!(reopened.rejection_reason.is_none());

        // An open ticket cannot be reopened again.
        assert!(matches!(
            svc.reopen_request(&r.id),
            Err(RequestError::Validation(_))
        ));
    }

    #[test]
    fn test_assign_checks_user() {
        let svc = service();
        let r = svc.create_request("u1", issue("A")).unwrap();

        assert!(matches!(
            svc.assign_request(&r.id, "nobody"),
            Err(RequestError::NotFound(_))
        ));
        assert!(matches!(
            svc.assign_request(&r.id, "gone-1"),
            Err(RequestError::NotFound(_))
        ));

        let assigned = svc.assign_request(&r.id, "admin-1").unwrap();
        assert_eq!(assigned.assigned_to.as_deref(), Some("admin-1"));
        // Assignment does not touch the status.
        assert_eq!(assigned.status, RequestStatus::Pending);
    }

    #[test]
    fn test_delete() {
        let svc = service();
        let r = svc.create_request("u1", issue("A")).unwrap();
        svc.delete_request(&r.id).unwrap();
        assert!(matches!(
            svc.get_request(&r.id),
            Err(RequestError::NotFound(_))
        ));
        assert!(matches!(
            svc.delete_request(&r.id),
            Err(RequestError::NotFound(_))
        ));
    }

    #[test]
    fn test_analytics_counts() {
        let svc = service();
        let a = svc.create_request("u1", issue("A")).unwrap();
        svc.create_request("u1", issue("B")).unwrap();
        svc.create_request("u2", supplies("C")).unwrap();
        svc.update_status(&a.id, RequestStatus::InProgress, None)
            .unwrap();

        let stats = svc.analytics().unwrap();
        assert_eq!(stats.total, 3);
        assert_eq!(stats.by_status.get("PENDING"), Some(&2));
        assert_eq!(stats.by_status.get("IN_PROGRESS"), Some(&1));
        assert_eq!(stats.by_type.get("ISSUE"), Some(&2));
        assert_eq!(stats.by_type.get("SUPPLIES"), Some(&1));
    }
}
