pub mod dashboard_invoices;
pub mod invoices;

use axum::extract::FromRef;
use crates::{
    domain::repositories::invoices::InvoiceRepository,
    infra::db::{
        postgres::postgres_connection::PgPoolSquad,
        repositories::{invoices::InvoicePostgres, sessions::SessionPostgres},
    },
};
use std::sync::Arc;

use crate::{
    auth::{CredentialVerifier, SessionResolver},
    config::config_model::DotEnvyConfig,
    usecases::invoices::InvoiceUseCase,
};

/// Shared by the bearer-token and session routers.
pub struct InvoiceState<R>
where
    R: InvoiceRepository + Send + Sync + 'static,
{
    pub usecase: Arc<InvoiceUseCase<R>>,
    pub verifier: Arc<CredentialVerifier>,
    pub session_resolver: Arc<SessionResolver>,
}

impl<R> Clone for InvoiceState<R>
where
    R: InvoiceRepository + Send + Sync + 'static,
{
    fn clone(&self) -> Self {
        Self {
            usecase: Arc::clone(&self.usecase),
            verifier: Arc::clone(&self.verifier),
            session_resolver: Arc::clone(&self.session_resolver),
        }
    }
}

impl<R> FromRef<InvoiceState<R>> for Arc<CredentialVerifier>
where
    R: InvoiceRepository + Send + Sync + 'static,
{
    fn from_ref(state: &InvoiceState<R>) -> Self {
        Arc::clone(&state.verifier)
    }
}

impl<R> FromRef<InvoiceState<R>> for Arc<SessionResolver>
where
    R: InvoiceRepository + Send + Sync + 'static,
{
    fn from_ref(state: &InvoiceState<R>) -> Self {
        Arc::clone(&state.session_resolver)
    }
}

pub fn postgres_state(
    db_pool: Arc<PgPoolSquad>,
    verifier: Arc<CredentialVerifier>,
    config: &DotEnvyConfig,
) -> InvoiceState<InvoicePostgres> {
    let invoice_repository = InvoicePostgres::new(Arc::clone(&db_pool));
    let session_repository = SessionPostgres::new(Arc::clone(&db_pool));

    let usecase = InvoiceUseCase::new(
        Arc::new(invoice_repository),
        config.invoices.currency.clone(),
    );
    let session_resolver =
        SessionResolver::new(Arc::new(session_repository), config.session.cookie_name.clone());

    InvoiceState {
        usecase: Arc::new(usecase),
        verifier,
        session_resolver: Arc::new(session_resolver),
    }
}
