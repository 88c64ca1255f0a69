pub mod auth;
pub mod axum_http;
pub mod config;
pub mod usecases;

use std::sync::Arc;

use anyhow::Result;
use auth::CredentialVerifier;
use crates::infra::db::postgres::postgres_connection;
use tracing::info;

pub async fn run() -> Result<()> {
    crates::observability::init_observability("backend")?;

    let dotenvy_env = config::config_loader::load()?;
    info!("ENV has been loaded");

    let verifier = CredentialVerifier::from_pem_file(&dotenvy_env.mobile_auth.public_key_path)?;
    info!(
        path = %dotenvy_env.mobile_auth.public_key_path.display(),
        "Mobile token public key has been loaded"
    );

    let postgres_pool = postgres_connection::establish_connection(&dotenvy_env.database.url)?;
    info!("Postgres connection has been established");

    axum_http::http_serve::start(
        Arc::new(dotenvy_env),
        Arc::new(postgres_pool),
        Arc::new(verifier),
    )
    .await?;

    Ok(())
}
