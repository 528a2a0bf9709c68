use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Ticket lifecycle state.
///
/// Transitions are enforced by [`RequestStatus::can_transition`];
/// anything not listed there is rejected by the service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RequestStatus {
    Pending,
    InProgress,
    OnHold,
    Resolved,
    Fulfilled,
    Rejected,
    Cancelled,
    Closed,
}

impl RequestStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            RequestStatus::Pending => "PENDING",
            RequestStatus::InProgress => "IN_PROGRESS",
            RequestStatus::OnHold => "ON_HOLD",
            RequestStatus::Resolved => "RESOLVED",
            RequestStatus::Fulfilled => "FULFILLED",
            RequestStatus::Rejected => "REJECTED",
            RequestStatus::Cancelled => "CANCELLED",
            RequestStatus::Closed => "CLOSED",
        }
    }

    pub fn from_str(s: &str) -> Option<RequestStatus> {
        match s {
            "PENDING" => Some(RequestStatus::Pending),
            "IN_PROGRESS" => Some(RequestStatus::InProgress),
            "ON_HOLD" => Some(RequestStatus::OnHold),
            "RESOLVED" => Some(RequestStatus::Resolved),
            "FULFILLED" => Some(RequestStatus::Fulfilled),
            "REJECTED" => Some(RequestStatus::Rejected),
            "CANCELLED" => Some(RequestStatus::Cancelled),
            "CLOSED" => Some(RequestStatus::Closed),
            _ => None,
        }
    }

    /// Whether `self -> to` is a legal status move.
    ///
    /// Reopening is not part of this table; it goes through
    /// [`RequestStatus::can_reopen`] and always lands on PENDING.
    pub fn can_transition(&self, to: RequestStatus) -> bool {
        use RequestStatus::*;
        matches!(
            (self, to),
            (Pending, InProgress | Rejected | OnHold | Cancelled)
                | (InProgress, Resolved | Fulfilled | Rejected | OnHold | Cancelled)
                | (OnHold, InProgress | Rejected | Cancelled)
                | (Resolved | Fulfilled | Rejected, Closed)
        )
    }

    /// States a ticket can be reopened from (back to PENDING).
    pub fn can_reopen(&self) -> bool {
        use RequestStatus::*;
        matches!(self, Resolved | Fulfilled | Rejected | Cancelled | Closed)
    }
}

/// Urgency of an ISSUE ticket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum IssuePriority {
    Low,
    Medium,
    High,
    Urgent,
}

/// Type-specific payload of a ticket, tagged by `type`.
///
/// An ISSUE is something broken at a location; SUPPLIES is an item
/// order. The tag is stored alongside the document so lists can be
/// filtered by type without decoding.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RequestDetails {
    #[serde(rename_all = "camelCase")]
    Issue {
        priority: IssuePriority,
        category: String,
        location: String,
    },
    #[serde(rename_all = "camelCase")]
    Supplies {
        category: String,
        item_name: String,
    },
}

impl RequestDetails {
    pub fn kind(&self) -> &'static str {
        match self {
            RequestDetails::Issue { .. } => "ISSUE",
            RequestDetails::Supplies { .. } => "SUPPLIES",
        }
    }
}

/// A service or supply ticket.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Request {
    pub id: String,
    pub title: String,
    pub description: String,
    #[serde(default)]
    pub attachments: Vec<String>,
    pub details: RequestDetails,
    pub status: RequestStatus,
    /// Owner: the user who filed the ticket.
    pub user_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub assigned_to: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rejection_reason: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

/// Body of POST /request/requests.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateRequest {
    pub title: String,
    pub description: String,
    #[serde(default)]
    pub attachments: Vec<String>,
    pub details: RequestDetails,
}

/// Body of POST /request/{id}/assign.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssignRequest {
    pub assigned_to_id: String,
}

/// Body of POST /request/{id}/status.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateStatusRequest {
    pub status: RequestStatus,
    #[serde(default)]
    pub rejection_reason: Option<String>,
}

/// Query string of GET /request/requests.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RequestListQuery {
    #[serde(default)]
    pub user_id: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub request_type: Option<String>,
    #[serde(default)]
    pub limit: Option<usize>,
    #[serde(default)]
    pub offset: Option<usize>,
}

/// Counts for GET /request/analytics.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RequestAnalytics {
    pub total: i64,
    pub by_status: BTreeMap<String, i64>,
    pub by_type: BTreeMap<String, i64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_roundtrip() {
        for s in [
            RequestStatus::Pending,
            RequestStatus::InProgress,
            RequestStatus::OnHold,
            RequestStatus::Resolved,
            RequestStatus::Fulfilled,
            RequestStatus::Rejected,
            RequestStatus::Cancelled,
            RequestStatus::Closed,
        ] {
            assert_eq!(RequestStatus::from_str(s.as_str()), Some(s));
        }
        assert_eq!(RequestStatus::from_str("DONE"), None);
    }

    #[test]
    fn transition_table() {
        use RequestStatus::*;

        assert!(Pending.can_transition(InProgress));
        assert!(Pending.can_transition(Rejected));
        assert!(Pending.can_transition(OnHold));
        assert!(Pending.can_transition(Cancelled));
        assert!(!Pending.can_transition(Resolved));
        assert!(!Pending.can_transition(Closed));

        assert!(InProgress.can_transition(Resolved));
        assert!(InProgress.can_transition(Fulfilled));
        assert!(InProgress.can_transition(OnHold));
        assert!(!InProgress.can_transition(Pending));
        assert!(!InProgress.can_transition(Closed));

        assert!(OnHold.can_transition(InProgress));
        assert!(!OnHold.can_transition(Resolved));

        assert!(Resolved.can_transition(Closed));
        assert!(Fulfilled.can_transition(Closed));
        assert!(Rejected.can_transition(Closed));
        assert!(!Cancelled.can_transition(Closed));
        assert!(!Closed.can_transition(Pending));
    }

    #[test]
    fn reopen_sources() {
        use RequestStatus::*;
        for s in [Resolved, Fulfilled, Rejected, Cancelled, Closed] {
            assert!(s.can_reopen());
        }
        for s in [Pending, InProgress, OnHold] {
            assert!(!s.can_reopen());
        }
    }

    #[test]
    fn details_tagged_by_type() {
        let issue = RequestDetails::Issue {
            priority: IssuePriority::High,
            category: "ELECTRICAL".into(),
            location: "Floor 2".into(),
        };
        let v = serde_json::to_value(&issue).unwrap();
        assert_eq!(v["type"], "ISSUE");
        assert_eq!(v["priority"], "HIGH");
        assert_eq!(v["location"], "Floor 2");

        let supplies: RequestDetails = serde_json::from_value(serde_json::json!({
            "type": "SUPPLIES",
            "category": "STATIONERY",
            "itemName": "Whiteboard markers",
        }))
        .unwrap();
        assert_eq!(supplies.kind(), "SUPPLIES");
    }

    #[test]
    fn details_unknown_type_rejected() {
        let r: Result<RequestDetails, _> = serde_json::from_value(serde_json::json!({
            "type": "COMPLAINT",
            "category": "OTHER",
        }));
        assert!(r.is_err());
    }

    #[test]
    fn request_serializes_camel_case() {
        let req = Request {
            id: "r1".into(),
            title: "Projector broken".into(),
            description: "No signal in room 4".into(),
            attachments: vec![],
            details: RequestDetails::Issue {
                priority: IssuePriority::Medium,
                category: "AV".into(),
                location: "Room 4".into(),
            },
            status: RequestStatus::Pending,
            user_id: "u1".into(),
            assigned_to: None,
            rejection_reason: None,
            created_at: "2024-01-01T00:00:00+00:00".into(),
            updated_at: "2024-01-01T00:00:00+00:00".into(),
        };
        let v = serde_json::to_value(&req).unwrap();
        assert_eq!(v["userId"], "u1");
        assert_eq!(v["status"], "PENDING");
        assert!(v.get("assignedTo").is_none());
        assert!(v.get("rejectionReason").is_none());
    }
}
