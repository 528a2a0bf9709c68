use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};

use workops_core::new_id;
use workops_sql::{records, RecordError, Value};

use crate::model::{Claims, Session, TokenPair, User};
use crate::service::{AuthError, AuthService};

impl AuthService {
    /// Issue a signed access token for a user, recording a session.
    pub fn issue_token(&self, user: &User) -> Result<TokenPair, AuthError> {
        if !user.is_active {
            return Err(AuthError::Unauthorized("user is deactivated".into()));
        }

        let session_id = new_id();
        let now = chrono::Utc::now();
        let exp = now + chrono::Duration::seconds(self.config.access_token_ttl);

        let claims = Claims {
            sub: user.id.clone(),
            name: user.name.clone(),
            role: user.role,
            sid: session_id.clone(),
            iat: now.timestamp(),
            exp: exp.timestamp(),
        };

        let access_token = encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(self.config.jwt_secret.as_bytes()),
        )
        .map_err(|e| AuthError::Internal(format!("JWT encode failed: {}", e)))?;

        let session = Session {
            id: session_id,
            user_id: user.id.clone(),
            issued_at: now.to_rfc3339(),
            expires_at: exp.to_rfc3339(),
            revoked: false,
        };

        records::insert_record(
            self.sql.as_ref(),
            "sessions",
            &session.id,
            &session,
            &[
                ("user_id", Value::Text(session.user_id.clone())),
                ("revoked", Value::Integer(0)),
                ("issued_at", Value::Text(session.issued_at.clone())),
                ("expires_at", Value::Text(session.expires_at.clone())),
            ],
        )?;

        Ok(TokenPair {
            access_token,
            token_type: "Bearer".to_string(),
            expires_in: self.config.access_token_ttl,
        })
    }

    /// Verify and decode an access token.
    /// Returns the claims if valid and the session is not revoked.
    pub fn verify_token(&self, token: &str) -> Result<Claims, AuthError> {
        let mut validation = Validation::default();
        validation.validate_exp = true;

        let token_data = decode::<Claims>(
            token,
            &DecodingKey::from_secret(self.config.jwt_secret.as_bytes()),
            &validation,
        )
        .map_err(|e| AuthError::Unauthorized(format!("invalid token: {}", e)))?;

        let claims = token_data.claims;

        // Check if session is revoked. A missing row means not revoked;
        // a failing read must not let the token through.
        match records::get_record::<Session>(self.sql.as_ref(), "sessions", &claims.sid) {
            Ok(session) if session.revoked => {
                return Err(AuthError::Unauthorized("session has been revoked".into()));
            }
            Ok(_) | Err(RecordError::NotFound(_)) => {}
            Err(e) => return Err(AuthError::from(e)),
        }

        Ok(claims)
    }

    /// Revoke a session (token becomes invalid).
    pub fn revoke_session(&self, session_id: &str) -> Result<(), AuthError> {
        let mut session: Session =
            records::get_record(self.sql.as_ref(), "sessions", session_id)?;
        session.revoked = true;

        records::update_record(
            self.sql.as_ref(),
            "sessions",
            session_id,
            &session,
            &[("revoked", Value::Integer(1))],
        )?;

        Ok(())
    }

    /// Revoke all live sessions for a user. Used on role change so stale
    /// role claims stop working.
    pub fn revoke_all_user_sessions(&self, user_id: &str) -> Result<u64, AuthError> {
        let rows = self
            .sql
            .query(
                "SELECT id FROM sessions WHERE user_id = ?1 AND revoked = 0",
                &[Value::Text(user_id.to_string())],
            )
            .map_err(|e| AuthError::Storage(e.to_string()))?;

        let mut count = 0;
        for row in &rows {
            if let Some(id) = row.get_str("id") {
                self.revoke_session(id)?;
                count += 1;
            }
        }
        Ok(count)
    }
}
