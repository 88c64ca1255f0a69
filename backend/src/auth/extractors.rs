use axum::{
    async_trait,
    extract::{FromRef, FromRequestParts},
    http::request::Parts,
    response::{IntoResponse, Response},
};
use axum_extra::extract::cookie::CookieJar;
use crates::domain::{errors::InvoiceError, value_objects::identity::Identity};
use std::sync::Arc;

use super::{CredentialVerifier, SessionResolver};
use crate::axum_http::error_responses::AppError;

/// Caller authenticated by a mobile bearer token.
#[derive(Debug, Clone)]
pub struct MobileCaller(pub Identity);

/// Caller authenticated by the web session cookie.
#[derive(Debug, Clone)]
pub struct SessionCaller(pub Identity);

/// Failure to establish the caller. Handlers usually take `Result<_, CallerRejection>`
/// so they can render it in their own body shape.
#[derive(Debug)]
pub struct CallerRejection(pub InvoiceError);

impl IntoResponse for CallerRejection {
    fn into_response(self) -> Response {
        AppError::plain(self.0).into_response()
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for MobileCaller
where
    S: Send + Sync,
    Arc<CredentialVerifier>: FromRef<S>,
{
    type Rejection = CallerRejection;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let verifier = Arc::<CredentialVerifier>::from_ref(state);

        let identity = verifier
            .verify_headers(&parts.headers)
            .map_err(|err| CallerRejection(err.into()))?;

        Ok(MobileCaller(Identity::Mobile(identity)))
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for SessionCaller
where
    S: Send + Sync,
    Arc<SessionResolver>: FromRef<S>,
{
    type Rejection = CallerRejection;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let resolver = Arc::<SessionResolver>::from_ref(state);
        let jar = CookieJar::from_headers(&parts.headers);

        let identity = resolver.resolve(&jar).await.map_err(CallerRejection)?;

        Ok(SessionCaller(identity))
    }
}
