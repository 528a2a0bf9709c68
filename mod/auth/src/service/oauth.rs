use crate::service::{AuthError, AuthService};

/// Profile fields extracted from Google's userinfo endpoint.
#[derive(Debug, Clone)]
pub struct GoogleUserInfo {
    /// Google subject id — stored as the user's `uid`.
    pub sub: String,
    pub name: String,
    pub email: Option<String>,
    pub avatar: Option<String>,
}

const GOOGLE_AUTH_URL: &str = "https://accounts.google.com/o/oauth2/v2/auth";
const GOOGLE_TOKEN_URL: &str = "https://oauth2.googleapis.com/token";
const GOOGLE_USERINFO_URL: &str = "https://openidconnect.googleapis.com/v1/userinfo";
const GOOGLE_SCOPES: &str = "openid email profile";

impl AuthService {
    /// Build the Google authorization URL for the login redirect.
    pub fn google_authorize_url(&self, state: &str) -> Result<String, AuthError> {
        let google = &self.config.google;
        if google.client_id.is_empty() {
            return Err(AuthError::Internal("google client_id not configured".into()));
        }

        Ok(format!(
            "{}?client_id={}&redirect_uri={}&scope={}&state={}&response_type=code",
            GOOGLE_AUTH_URL,
            urlencoded(&google.client_id),
            urlencoded(&google.redirect_url),
            urlencoded(GOOGLE_SCOPES),
            urlencoded(state),
        ))
    }

    /// Exchange an authorization code for the Google user profile.
    ///
    /// 1. POST the code to the token endpoint.
    /// 2. GET the userinfo endpoint with the returned access token.
    pub async fn google_callback(&self, code: &str) -> Result<GoogleUserInfo, AuthError> {
        let google = &self.config.google;

        let token_url = google.token_url.as_deref().unwrap_or(GOOGLE_TOKEN_URL);
        let userinfo_url = google.userinfo_url.as_deref().unwrap_or(GOOGLE_USERINFO_URL);

        let client = reqwest::Client::new();
        let token_resp = client
            .post(token_url)
            .form(&[
                ("grant_type", "authorization_code"),
                ("code", code),
                ("client_id", &google.client_id),
                ("client_secret", &google.client_secret),
                ("redirect_uri", &google.redirect_url),
            ])
            .send()
            .await
            .map_err(|e| AuthError::Internal(format!("token exchange failed: {}", e)))?;

        if !token_resp.status().is_success() {
            let status = token_resp.status();
            let body = token_resp.text().await.unwrap_or_default();
            return Err(AuthError::Unauthorized(format!(
                "token exchange returned {}: {}",
                status, body
            )));
        }

        let token_json: serde_json::Value = token_resp
            .json()
            .await
            .map_err(|e| AuthError::Internal(format!("token response parse failed: {}", e)))?;

        let access_token = token_json["access_token"]
            .as_str()
            .ok_or_else(|| AuthError::Internal("missing access_token in response".into()))?;

        let userinfo_resp = client
            .get(userinfo_url)
            .bearer_auth(access_token)
            .send()
            .await
            .map_err(|e| AuthError::Internal(format!("userinfo fetch failed: {}", e)))?;

        if !userinfo_resp.status().is_success() {
            let status = userinfo_resp.status();
            let body = userinfo_resp.text().await.unwrap_or_default();
            return Err(AuthError::Internal(format!(
                "userinfo returned {}: {}",
                status, body
            )));
        }

        let userinfo: serde_json::Value = userinfo_resp
            .json()
            .await
            .map_err(|e| AuthError::Internal(format!("userinfo parse failed: {}", e)))?;

        let sub = userinfo["sub"]
            .as_str()
            .ok_or_else(|| AuthError::Internal("missing sub in userinfo".into()))?
            .to_string();
        let name = userinfo["name"]
            .as_str()
            .or_else(|| userinfo["given_name"].as_str())
            .unwrap_or("Unknown")
            .to_string();
        let email = userinfo["email"].as_str().map(|s| s.to_string());
        let avatar = userinfo["picture"].as_str().map(|s| s.to_string());

        Ok(GoogleUserInfo {
            sub,
            name,
            email,
            avatar,
        })
    }
}

/// Simple URL encoding for query parameters.
fn urlencoded(s: &str) -> String {
    let mut result = String::with_capacity(s.len());
    for ch in s.chars() {
        match ch {
            'A'..='Z' | 'a'..='z' | '0'..='9' | '-' | '_' | '.' | '~' => result.push(ch),
            ' ' => result.push('+'),
            _ => {
                let mut buf = [0u8; 4];
                let encoded = ch.encode_utf8(&mut buf);
                for byte in encoded.bytes() {
                    result.push('%');
                    result.push_str(&format!("{:02X}", byte));
                }
            }
        }
    }
    result
}
