//! Startup checks and the SUPER_ADMIN bootstrap.

use std::sync::Arc;

use workops_auth::model::Role;
use workops_auth::service::AuthService;

use crate::config::ServerConfig;

/// Refuse configurations that cannot work; warn about risky ones.
pub fn verify_config(config: &ServerConfig) -> anyhow::Result<()> {
    if config.storage.data_dir.as_os_str().is_empty() {
        anyhow::bail!("storage.data_dir must not be empty");
    }
    if config.jwt.secret.is_none() {
        tracing::warn!("no JWT secret configured, using the built-in dev secret");
    }
    if let Some(ttl) = config.jwt.ttl {
        if ttl <= 0 {
            anyhow::bail!("jwt.ttl must be positive, got {}", ttl);
        }
    }
    if config.google.client_id.is_empty() {
        tracing::warn!("google.client_id is empty, login will be unavailable");
    }
    Ok(())
}

/// Promote the configured super-admin if that user already exists.
///
/// New users with this email are promoted at login time instead; this
/// covers the user who signed in before the config named them.
pub fn promote_super_admin(auth: &Arc<AuthService>, email: Option<&str>) -> anyhow::Result<()> {
    let Some(email) = email else {
        return Ok(());
    };

    match auth.find_user_by_email(email) {
        Ok(Some(user)) if user.role != Role::SuperAdmin => {
            auth.update_role(&user.id, Role::SuperAdmin)
                .map_err(|e| anyhow::anyhow!("promoting {}: {}", email, e))?;
            tracing::info!(%email, "promoted configured super admin");
        }
        Ok(_) => {}
        Err(e) => anyhow::bail!("looking up {}: {}", email, e),
    }

    Ok(())
}
