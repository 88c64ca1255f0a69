use axum_extra::extract::cookie::CookieJar;
use crates::domain::{
    errors::{AuthError, InvoiceError},
    repositories::sessions::SessionRepository,
    value_objects::identity::{Identity, SessionIdentity},
};
use std::sync::Arc;
use tracing::{debug, error};

const SECURE_COOKIE_PREFIX: &str = "__Secure-";

/// Resolves the web caller from the session provider's cookie and session table.
pub struct SessionResolver {
    sessions: Arc<dyn SessionRepository + Send + Sync>,
    cookie_name: String,
}

impl SessionResolver {
    pub fn new(sessions: Arc<dyn SessionRepository + Send + Sync>, cookie_name: String) -> Self {
        Self {
            sessions,
            cookie_name,
        }
    }

    pub async fn resolve(&self, jar: &CookieJar) -> Result<Identity, InvoiceError> {
        let session_token = self
            .session_token(jar)
            .ok_or(InvoiceError::Auth(AuthError::Unauthenticated))?;

        match self.sessions.find_active_user_id(session_token).await {
            Ok(Some(user_id)) if !user_id.is_empty() => {
                Ok(Identity::Session(SessionIdentity { user_id }))
            }
            Ok(_) => {
                debug!("session: no active session for cookie");
                Err(AuthError::Unauthenticated.into())
            }
            Err(err) => {
                error!(db_error = ?err, "session: failed to load session");
                Err(InvoiceError::Internal(err))
            }
        }
    }

    /// HTTPS deployments prefix the cookie name with `__Secure-`.
    fn session_token(&self, jar: &CookieJar) -> Option<String> {
        let secure_name = format!("{SECURE_COOKIE_PREFIX}{}", self.cookie_name);

        jar.get(&self.cookie_name)
            .or_else(|| jar.get(&secure_name))
            .map(|cookie| cookie.value().to_string())
            .filter(|token| !token.is_empty())
    }
}
