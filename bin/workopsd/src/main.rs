//! workopsd — the WorkOps server.
//!
//! Wires storage, the auth/user, request and lunch modules, and the
//! unified auth gate into one axum application.

mod bootstrap;
mod config;
mod middleware;
mod routes;

use std::sync::Arc;

use anyhow::Context;
use clap::Parser;

use workops_auth::service::{AuthConfig, AuthService, GoogleConfig};
use workops_auth::{AuthModule, UserModule};
use workops_core::Module;
use workops_lunch::{service::LunchService, LunchModule};
use workops_request::{service::RequestService, RequestModule};
use workops_sql::SqliteStore;

use crate::config::{resolve_config_path, ServerConfig};
use crate::middleware::GateContext;

#[derive(Parser, Debug)]
#[command(name = "workopsd", version, about = "WorkOps server")]
struct Cli {
    /// Config file path, or a context name resolved under /etc/workops/.
    #[arg(short, long, default_value = "workops")]
    config: String,

    /// Override the listen address from the config.
    #[arg(long)]
    listen: Option<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let cli = Cli::parse();
    let config_path = resolve_config_path(&cli.config);
    let config = ServerConfig::load(&config_path)?;
    bootstrap::verify_config(&config)?;

    std::fs::create_dir_all(&config.storage.data_dir).with_context(|| {
        format!("creating data dir {}", config.storage.data_dir.display())
    })?;
    let db_path = config.db_path();
    let sql: Arc<SqliteStore> = Arc::new(
        SqliteStore::open(&db_path)
            .map_err(|e| anyhow::anyhow!("opening {}: {}", db_path.display(), e))?,
    );
    tracing::info!(db = %db_path.display(), "storage ready");

    let mut auth_config = AuthConfig {
        google: GoogleConfig {
            client_id: config.google.client_id.clone(),
            client_secret: config.google.client_secret.clone(),
            redirect_url: config.google.redirect_url.clone(),
            ..GoogleConfig::default()
        },
        super_admin_email: config.bootstrap.super_admin_email.clone(),
        ..AuthConfig::default()
    };
    if let Some(secret) = &config.jwt.secret {
        auth_config.jwt_secret = secret.clone();
    }
    if let Some(ttl) = config.jwt.ttl {
        auth_config.access_token_ttl = ttl;
    }

    let auth = AuthService::new(sql.clone(), auth_config)
        .map_err(|e| anyhow::anyhow!("auth service: {}", e))?;
    let requests = RequestService::new(sql.clone())
        .map_err(|e| anyhow::anyhow!("request service: {}", e))?;
    let lunch = LunchService::new(sql.clone())
        .map_err(|e| anyhow::anyhow!("lunch service: {}", e))?;

    bootstrap::promote_super_admin(&auth, config.bootstrap.super_admin_email.as_deref())?;

    let modules: Vec<Box<dyn Module>> = vec![
        Box::new(AuthModule::new(auth.clone())),
        Box::new(UserModule::new(auth.clone())),
        Box::new(RequestModule::new(requests)),
        Box::new(LunchModule::new(lunch)),
    ];

    let ctx = GateContext {
        auth,
        table: Arc::new(routes::route_table()),
    };
    let app = routes::build_router(&modules, ctx);

    let listen = cli.listen.as_deref().unwrap_or_else(|| config.listen());
    let listener = tokio::net::TcpListener::bind(listen)
        .await
        .with_context(|| format!("binding {}", listen))?;
    tracing::info!(%listen, "workopsd listening");

    axum::serve(listener, app).await.context("server exited")?;
    Ok(())
}
