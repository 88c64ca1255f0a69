use anyhow::{Context, Result};
use std::{env, str::FromStr};

use super::config_model::{
    BackendServer, Database, DotEnvyConfig, Invoices, MobileAuth, Session,
};

pub const DEFAULT_PUBLIC_KEY_PATH: &str = "public.key";
pub const DEFAULT_SESSION_COOKIE_NAME: &str = "authjs.session-token";
pub const DEFAULT_CURRENCY: &str = "PHP";

pub fn load() -> Result<DotEnvyConfig> {
    dotenvy::dotenv().ok();

    let backend_server = BackendServer {
        port: parse_var("SERVER_PORT_BACKEND")?,
        body_limit: parse_var("SERVER_BODY_LIMIT")?,
        timeout: parse_var("SERVER_TIMEOUT")?,
    };

    let database = Database {
        url: required_var("DATABASE_URL")?,
    };

    let mobile_auth = MobileAuth {
        public_key_path: var_or("MOBILE_JWT_PUBLIC_KEY_PATH", DEFAULT_PUBLIC_KEY_PATH).into(),
    };

    let session = Session {
        cookie_name: var_or("SESSION_COOKIE_NAME", DEFAULT_SESSION_COOKIE_NAME),
    };

    let invoices = Invoices {
        currency: var_or("INVOICE_CURRENCY", DEFAULT_CURRENCY).to_ascii_uppercase(),
    };

    Ok(DotEnvyConfig {
        backend_server,
        database,
        mobile_auth,
        session,
        invoices,
    })
}

fn required_var(key: &str) -> Result<String> {
    env::var(key).with_context(|| format!("{key} is invalid"))
}

fn parse_var<T>(key: &str) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    required_var(key)?
        .trim()
        .parse()
        .with_context(|| format!("{key} is invalid"))
}

fn var_or(key: &str, default: &str) -> String {
    env::var(key)
        .ok()
        .filter(|value| !value.trim().is_empty())
        .unwrap_or_else(|| default.to_string())
}
