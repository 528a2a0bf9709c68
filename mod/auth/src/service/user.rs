use workops_core::{merge_patch, new_id, now_rfc3339, ListParams, ListResult};
use workops_sql::{records, Value};

use crate::model::{Role, User};
use crate::service::{AuthError, AuthService};
use crate::service::oauth::GoogleUserInfo;

impl AuthService {
    /// Find a user by external auth subject id, or create one from the
    /// provider profile. Called on every completed Google login.
    ///
    /// Existing users get their profile fields refreshed from the
    /// provider via JSON merge-patch; role and activity flag are never
    /// touched by login.
    pub fn find_or_create_google_user(&self, info: &GoogleUserInfo) -> Result<User, AuthError> {
        if let Some(user) = self.find_user_by_uid(&info.sub)? {
            let mut patch = serde_json::json!({});
            if !info.name.is_empty() {
                patch["name"] = serde_json::json!(info.name);
            }
            if let Some(ref email) = info.email {
                patch["email"] = serde_json::json!(email);
            }
            if let Some(ref avatar) = info.avatar {
                patch["avatar"] = serde_json::json!(avatar);
            }
            return self.update_user(&user.id, patch);
        }

        // First login: bootstrap email gets SUPER_ADMIN, everyone else
        // starts as EMPLOYEE.
        let role = match (&info.email, &self.config.super_admin_email) {
            (Some(email), Some(boot)) if email.eq_ignore_ascii_case(boot) => Role::SuperAdmin,
            _ => Role::Employee,
        };

        let now = now_rfc3339();
        let user = User {
            id: new_id(),
            uid: info.sub.clone(),
            name: info.name.clone(),
            email: info.email.clone(),
            role,
            phone: None,
            department: None,
            avatar: info.avatar.clone(),
            is_active: true,
            created_at: now.clone(),
            updated_at: now,
        };

        records::insert_record(self.sql.as_ref(), "users", &user.id, &user, &user_indexes(&user))?;
        tracing::info!(user = %user.id, role = %user.role, "created user from google login");
        Ok(user)
    }

    /// Get a user by id.
    pub fn get_user(&self, id: &str) -> Result<User, AuthError> {
        records::get_record(self.sql.as_ref(), "users", id).map_err(AuthError::from)
    }

    /// List all users with pagination.
    pub fn list_users(&self, params: &ListParams) -> Result<ListResult<User>, AuthError> {
        let (items, total) =
            records::list_records(self.sql.as_ref(), "users", &[], params.limit, params.offset)?;
        Ok(ListResult { items, total })
    }

    /// List admin-scoped users: role ADMIN or SUPER_ADMIN.
    pub fn list_admin_users(&self, params: &ListParams) -> Result<ListResult<User>, AuthError> {
        let count_rows = self
            .sql
            .query(
                "SELECT COUNT(*) as cnt FROM users WHERE role IN ('ADMIN', 'SUPER_ADMIN')",
                &[],
            )
            .map_err(|e| AuthError::Storage(e.to_string()))?;
        let total = count_rows
            .first()
            .and_then(|r| r.get_i64("cnt"))
            .unwrap_or(0) as usize;

        let rows = self
            .sql
            .query(
                "SELECT data FROM users WHERE role IN ('ADMIN', 'SUPER_ADMIN')
                 ORDER BY created_at DESC LIMIT ?1 OFFSET ?2",
                &[
                    Value::Integer(params.limit as i64),
                    Value::Integer(params.offset as i64),
                ],
            )
            .map_err(|e| AuthError::Storage(e.to_string()))?;

        let mut items = Vec::new();
        for row in &rows {
            if let Some(data) = row.get_str("data") {
                let user: User =
                    serde_json::from_str(data).map_err(|e| AuthError::Internal(e.to_string()))?;
                items.push(user);
            }
        }
        Ok(ListResult { items, total })
    }

    /// Set a user's role. Revokes the user's live sessions so stale role
    /// claims stop working immediately.
    pub fn update_role(&self, user_id: &str, role: Role) -> Result<User, AuthError> {
        let mut user = self.get_user(user_id)?;
        user.role = role;
        user.updated_at = now_rfc3339();

        records::update_record(self.sql.as_ref(), "users", user_id, &user, &user_indexes(&user))?;
        self.revoke_all_user_sessions(user_id)?;
        tracing::info!(user = %user_id, role = %role, "role updated");
        Ok(user)
    }

    /// Update a user with JSON merge-patch semantics. Id, uid, role and
    /// creation timestamp are preserved.
    pub fn update_user(&self, id: &str, patch: serde_json::Value) -> Result<User, AuthError> {
        let current = self.get_user(id)?;
        let now = now_rfc3339();

        let mut base =
            serde_json::to_value(&current).map_err(|e| AuthError::Internal(e.to_string()))?;
        merge_patch(&mut base, &patch);
        base["updatedAt"] = serde_json::json!(now);
        base["id"] = serde_json::json!(current.id);
        base["uid"] = serde_json::json!(current.uid);
        base["role"] = serde_json::json!(current.role);
        base["createdAt"] = serde_json::json!(current.created_at);

        let updated: User =
            serde_json::from_value(base).map_err(|e| AuthError::Internal(e.to_string()))?;

        records::update_record(self.sql.as_ref(), "users", id, &updated, &user_indexes(&updated))?;
        Ok(updated)
    }

    /// Find a user by external auth subject id.
    pub fn find_user_by_uid(&self, uid: &str) -> Result<Option<User>, AuthError> {
        let rows = self
            .sql
            .query(
                "SELECT data FROM users WHERE uid = ?1",
                &[Value::Text(uid.to_string())],
            )
            .map_err(|e| AuthError::Storage(e.to_string()))?;

        match rows.first().and_then(|r| r.get_str("data")) {
            Some(data) => {
                let user: User =
                    serde_json::from_str(data).map_err(|e| AuthError::Internal(e.to_string()))?;
                Ok(Some(user))
            }
            None => Ok(None),
        }
    }

    /// Find a user by email (used by bootstrap promotion).
    pub fn find_user_by_email(&self, email: &str) -> Result<Option<User>, AuthError> {
        let rows = self
            .sql
            .query(
                "SELECT data FROM users WHERE email = ?1",
                &[Value::Text(email.to_string())],
            )
            .map_err(|e| AuthError::Storage(e.to_string()))?;

        match rows.first().and_then(|r| r.get_str("data")) {
            Some(data) => {
                let user: User =
                    serde_json::from_str(data).map_err(|e| AuthError::Internal(e.to_string()))?;
                Ok(Some(user))
            }
            None => Ok(None),
        }
    }
}

fn user_indexes(user: &User) -> Vec<(&'static str, Value)> {
    let mut indexes: Vec<(&'static str, Value)> = vec![
        ("uid", Value::Text(user.uid.clone())),
        ("name", Value::Text(user.name.clone())),
        ("role", Value::Text(user.role.as_str().to_string())),
        ("active", Value::Integer(if user.is_active { 1 } else { 0 })),
        ("created_at", Value::Text(user.created_at.clone())),
        ("updated_at", Value::Text(user.updated_at.clone())),
    ];
    if let Some(ref email) = user.email {
        indexes.push(("email", Value::Text(email.clone())));
    }
    indexes
}
