//! The typed API client.

use serde::de::DeserializeOwned;
use serde::Deserialize;
use thiserror::Error;

use workops_auth::model::{Role, UpdateRoleRequest, User};
use workops_core::today_ymd;
use workops_lunch::model::{AttendanceSummary, LunchAttendance, MarkAttendance};
use workops_request::model::{
    AssignRequest, CreateRequest, Request, RequestAnalytics, RequestListQuery, RequestStatus,
    UpdateStatusRequest,
};

use crate::cache::QueryCache;
use crate::keys::{self, WriteOp};

/// Client-side error: transport failure, an API error envelope, or a
/// body that did not decode.
#[derive(Debug, Error)]
pub enum ClientError {
    #[error("http: {0}")]
    Http(#[from] reqwest::Error),

    #[error("api {status} {code}: {message}")]
    Api {
        status: u16,
        code: String,
        message: String,
    },

    #[error("decode: {0}")]
    Decode(String),
}

/// A page of a list endpoint: `{ items, total }`.
#[derive(Debug, Clone, Deserialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub total: usize,
}

/// Turn a non-2xx response body into [`ClientError::Api`].
///
/// The server's envelope is `{"code","message"}`; anything else (a
/// proxy error page, say) falls back to the raw body as the message.
fn decode_api_error(status: u16, body: &str) -> ClientError {
    #[derive(Deserialize)]
    struct Envelope {
        code: String,
        message: String,
    }
    match serde_json::from_str::<Envelope>(body) {
        Ok(env) => ClientError::Api {
            status,
            code: env.code,
            message: env.message,
        },
        Err(_) => ClientError::Api {
            status,
            code: "UNKNOWN".to_string(),
            message: body.trim().to_string(),
        },
    }
}

fn decode<T: DeserializeOwned>(value: serde_json::Value) -> Result<T, ClientError> {
    serde_json::from_value(value).map_err(|e| ClientError::Decode(e.to_string()))
}

/// WorkOps API client. Holds the base URL, the bearer token, and a
/// query cache that write operations invalidate through the
/// [`WriteOp`] table.
pub struct WorkOpsClient {
    base_url: String,
    token: Option<String>,
    http: reqwest::Client,
    cache: QueryCache,
}

impl WorkOpsClient {
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            token: None,
            http: reqwest::Client::new(),
            cache: QueryCache::default(),
        }
    }

    /// Attach an access token (obtained via the browser OAuth flow).
    pub fn with_token(mut self, token: &str) -> Self {
        self.token = Some(token.to_string());
        self
    }

    pub fn set_token(&mut self, token: Option<String>) {
        self.token = token;
        self.cache.clear();
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn send(&self, req: reqwest::RequestBuilder) -> Result<serde_json::Value, ClientError> {
        let req = match &self.token {
            Some(token) => req.bearer_auth(token),
            None => req,
        };
        let resp = req.send().await?;
        let status = resp.status();
        let body = resp.text().await?;

        if !status.is_success() {
            return Err(decode_api_error(status.as_u16(), &body));
        }
        if body.is_empty() {
            return Ok(serde_json::Value::Null);
        }
        serde_json::from_str(&body).map_err(|e| ClientError::Decode(e.to_string()))
    }

    /// Read-through: serve from cache, else GET and cache.
    async fn read<T: DeserializeOwned>(&self, key: &str, path: &str) -> Result<T, ClientError> {
        if let Some(cached) = self.cache.get(key) {
            return decode(cached);
        }
        let value = self.send(self.http.get(self.url(path))).await?;
        self.cache.set(key, value.clone());
        decode(value)
    }

    /// Run a write and drop the cache keys it makes stale.
    async fn write<T: DeserializeOwned>(
        &self,
        req: reqwest::RequestBuilder,
        op: WriteOp,
    ) -> Result<T, ClientError> {
        let value = self.send(req).await?;
        for key in op.invalidated_keys() {
            self.cache.invalidate(&key);
        }
        decode(value)
    }

    // --- auth ---

    pub async fn me(&self) -> Result<User, ClientError> {
        self.read(keys::ME, "/auth/me").await
    }

    /// Log out and drop all cached state. The next read re-fetches.
    pub async fn logout(&mut self) -> Result<(), ClientError> {
        self.send(self.http.post(self.url("/auth/logout"))).await?;
        self.token = None;
        self.cache.clear();
        Ok(())
    }

    // --- users ---

    pub async fn employees(&self) -> Result<Page<User>, ClientError> {
        self.read(keys::EMPLOYEES, "/user/employees").await
    }

    pub async fn admin_users(&self) -> Result<Page<User>, ClientError> {
        self.read(keys::ADMIN_USERS, "/user/admin").await
    }

    pub async fn update_role(&self, user_id: &str, role: Role) -> Result<User, ClientError> {
        let body = UpdateRoleRequest {
            user_id: user_id.to_string(),
            role,
        };
        self.write(
            self.http.patch(self.url("/user/update-role")).json(&body),
            WriteOp::UpdateRole {
                user_id: user_id.to_string(),
            },
        )
        .await
    }

    // --- requests ---

    /// List tickets. Only the unfiltered list is cached; filtered
    /// queries always hit the server.
    pub async fn requests(&self, query: &RequestListQuery) -> Result<Page<Request>, ClientError> {
        let qs = list_query_string(query);
        if qs.is_empty() {
            return self.read(keys::SERVICE_REQUESTS, "/request/requests").await;
        }
        let path = format!("/request/requests?{}", qs);
        let value = self.send(self.http.get(self.url(&path))).await?;
        decode(value)
    }

    pub async fn request(&self, id: &str) -> Result<Request, ClientError> {
        self.read(&keys::service_request(id), &format!("/request/{}", id))
            .await
    }

    pub async fn create_request(&self, input: &CreateRequest) -> Result<Request, ClientError> {
        self.write(
            self.http.post(self.url("/request/requests")).json(input),
            WriteOp::CreateRequest,
        )
        .await
    }

    pub async fn delete_request(&self, id: &str) -> Result<(), ClientError> {
        let _: serde_json::Value = self
            .write(
                self.http.delete(self.url(&format!("/request/{}", id))),
                WriteOp::DeleteRequest { id: id.to_string() },
            )
            .await?;
        Ok(())
    }

    pub async fn assign_request(&self, id: &str, assignee_id: &str) -> Result<Request, ClientError> {
        let body = AssignRequest {
            assigned_to_id: assignee_id.to_string(),
        };
        self.write(
            self.http
                .post(self.url(&format!("/request/{}/assign", id)))
                .json(&body),
            WriteOp::AssignRequest { id: id.to_string() },
        )
        .await
    }

    pub async fn update_request_status(
        &self,
        id: &str,
        status: RequestStatus,
        rejection_reason: Option<String>,
    ) -> Result<Request, ClientError> {
        let body = UpdateStatusRequest {
            status,
            rejection_reason,
        };
        self.write(
            self.http
                .post(self.url(&format!("/request/{}/status", id)))
                .json(&body),
            WriteOp::UpdateRequestStatus { id: id.to_string() },
        )
        .await
    }

    pub async fn reopen_request(&self, id: &str) -> Result<Request, ClientError> {
        self.write(
            self.http.post(self.url(&format!("/request/{}/reopen", id))),
            WriteOp::ReopenRequest { id: id.to_string() },
        )
        .await
    }

    pub async fn request_analytics(&self) -> Result<RequestAnalytics, ClientError> {
        self.read(keys::REQUEST_ANALYTICS, "/request/analytics").await
    }

    // --- lunch ---

    pub async fn mark_attendance(
        &self,
        input: &MarkAttendance,
    ) -> Result<LunchAttendance, ClientError> {
        let date = input.date.clone().unwrap_or_else(today_ymd);
        self.write(
            self.http.post(self.url("/launch/attendance")).json(input),
            WriteOp::MarkAttendance { date },
        )
        .await
    }

    pub async fn lunch_summary(&self, date: &str) -> Result<AttendanceSummary, ClientError> {
        self.read(
            &keys::lunch_summary(date),
            &format!("/launch/attendance-summary?date={}", date),
        )
        .await
    }
}

fn list_query_string(query: &RequestListQuery) -> String {
    let mut parts = Vec::new();
    if let Some(user_id) = &query.user_id {
        parts.push(format!("userId={}", user_id));
    }
    if let Some(status) = &query.status {
        parts.push(format!("status={}", status));
    }
    if let Some(kind) = &query.request_type {
        parts.push(format!("requestType={}", kind));
    }
    if let Some(limit) = query.limit {
        parts.push(format!("limit={}", limit));
    }
    if let Some(offset) = query.offset {
        parts.push(format!("offset={}", offset));
    }
    parts.join("&")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn base_url_normalized() {
        let c = WorkOpsClient::new("http://localhost:8080/");
        assert_eq!(c.url("/auth/me"), "http://localhost:8080/auth/me");
    }

    #[test]
    fn api_error_envelope() {
        let err = decode_api_error(403, r#"{"code":"PERMISSION_DENIED","message":"no"}"#);
        match err {
            ClientError::Api { status, code, message } => {
                assert_eq!(status, 403);
                assert_eq!(code, "PERMISSION_DENIED");
                assert_eq!(message, "no");
            }
            other => panic!("unexpected: {:?}", other),
        }
    }

    #[test]
    fn api_error_non_json_body() {
        let err = decode_api_error(502, "<html>Bad Gateway</html>\n");
        match err {
            ClientError::Api { status, code, message } => {
                assert_eq!(status, 502);
                assert_eq!(code, "UNKNOWN");
                assert_eq!(message, "<html>Bad Gateway</html>");
            }
            other => panic!("unexpected: {:?}", other),
        }
    }

    #[test]
    fn list_query_string_shape() {
        let q = RequestListQuery {
            status: Some("PENDING".into()),
            limit: Some(10),
            ..Default::default()
        };
        assert_eq!(list_query_string(&q), "status=PENDING&limit=10");
        assert_eq!(list_query_string(&RequestListQuery::default()), "");
    }
}
