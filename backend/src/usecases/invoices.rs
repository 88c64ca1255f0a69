use crates::domain::{
    errors::InvoiceError,
    repositories::invoices::InvoiceRepository,
    value_objects::{
        enums::invoice_statuses::InvoiceStatus,
        identity::Identity,
        invoice_payload::{decode_payload, validate_invoice_payload, validate_status_payload},
        invoices::InvoiceModel,
    },
};
use std::sync::Arc;
use tracing::{error, info, warn};

use super::ownership_resolver::{InvoiceOperation, OwnershipResolver};

/// Owner-scoped invoice mutations.
///
/// Every operation on an existing invoice runs identity -> ownership -> validation ->
/// write, and the write itself is filtered by id and ownership again. A row that
/// disappears in between surfaces as [`InvoiceError::ConflictOrGone`].
pub struct InvoiceUseCase<R>
where
    R: InvoiceRepository + Send + Sync + 'static,
{
    invoice_repository: Arc<R>,
    ownership_resolver: OwnershipResolver<R>,
    currency: String,
}

impl<R> InvoiceUseCase<R>
where
    R: InvoiceRepository + Send + Sync + 'static,
{
    pub fn new(invoice_repository: Arc<R>, currency: String) -> Self {
        Self {
            ownership_resolver: OwnershipResolver::new(Arc::clone(&invoice_repository)),
            invoice_repository,
            currency,
        }
    }

    pub async fn create(
        &self,
        identity: &Identity,
        body: &[u8],
    ) -> Result<InvoiceModel, InvoiceError> {
        info!(caller = identity.kind(), "invoices: create requested");

        let payload = decode_payload(body)?;
        let fields = validate_invoice_payload(&payload, &self.currency).map_err(|err| {
            warn!(
                caller = identity.kind(),
                field = err.field(),
                error = %err,
                "invoices: create payload rejected"
            );
            err
        })?;

        let invoice = self
            .invoice_repository
            .create_invoice(fields.to_insert_entity(identity.creation_owner()))
            .await
            .map_err(|err| {
                error!(
                    caller = identity.kind(),
                    db_error = ?err,
                    "invoices: failed to create invoice"
                );
                InvoiceError::Internal(err)
            })?;

        info!(invoice_id = %invoice.id, caller = identity.kind(), "invoices: invoice created");
        Ok(invoice.into())
    }

    pub async fn find(
        &self,
        identity: &Identity,
        invoice_id: &str,
    ) -> Result<InvoiceModel, InvoiceError> {
        let invoice = self
            .ownership_resolver
            .authorize(identity, invoice_id, InvoiceOperation::Read)
            .await?;

        Ok(invoice.into())
    }

    /// Replaces every commercial field. Ownership fields are never written.
    pub async fn update(
        &self,
        identity: &Identity,
        invoice_id: &str,
        body: &[u8],
    ) -> Result<InvoiceModel, InvoiceError> {
        info!(invoice_id, caller = identity.kind(), "invoices: update requested");

        self.ownership_resolver
            .authorize(identity, invoice_id, InvoiceOperation::Update)
            .await?;

        let payload = decode_payload(body)?;
        let fields = validate_invoice_payload(&payload, &self.currency).map_err(|err| {
            warn!(
                invoice_id,
                field = err.field(),
                error = %err,
                "invoices: update payload rejected"
            );
            err
        })?;

        let invoice = self
            .invoice_repository
            .update_owned(
                invoice_id.to_string(),
                identity.owner_scope(),
                fields.to_update_entity(),
            )
            .await
            .map_err(|err| {
                error!(invoice_id, db_error = ?err, "invoices: failed to update invoice");
                InvoiceError::Internal(err)
            })?
            .ok_or(InvoiceError::ConflictOrGone)?;

        info!(invoice_id, "invoices: invoice updated");
        Ok(invoice.into())
    }

    /// `PAID` <-> `PENDING` in either direction.
    pub async fn update_status(
        &self,
        identity: &Identity,
        invoice_id: &str,
        body: &[u8],
    ) -> Result<InvoiceModel, InvoiceError> {
        info!(invoice_id, caller = identity.kind(), "invoices: status update requested");

        self.ownership_resolver
            .authorize(identity, invoice_id, InvoiceOperation::UpdateStatus)
            .await?;

        let payload = decode_payload(body)?;
        let status = validate_status_payload(&payload).map_err(|err| {
            warn!(
                invoice_id,
                field = err.field(),
                error = %err,
                "invoices: status payload rejected"
            );
            err
        })?;

        self.write_status(identity, invoice_id, status).await
    }

    /// One-way convenience used by the dashboard; there is no matching "mark unpaid".
    pub async fn mark_as_paid(
        &self,
        identity: &Identity,
        invoice_id: &str,
    ) -> Result<InvoiceModel, InvoiceError> {
        info!(invoice_id, caller = identity.kind(), "invoices: mark as paid requested");

        self.ownership_resolver
            .authorize(identity, invoice_id, InvoiceOperation::MarkAsPaid)
            .await?;

        self.write_status(identity, invoice_id, InvoiceStatus::Paid).await
    }

    /// Physical removal. Deleting the same id twice fails the second time.
    pub async fn delete(&self, identity: &Identity, invoice_id: &str) -> Result<(), InvoiceError> {
        info!(invoice_id, caller = identity.kind(), "invoices: delete requested");

        self.ownership_resolver
            .authorize(identity, invoice_id, InvoiceOperation::Delete)
            .await?;

        let deleted = self
            .invoice_repository
            .delete_owned(invoice_id.to_string(), identity.owner_scope())
            .await
            .map_err(|err| {
                error!(invoice_id, db_error = ?err, "invoices: failed to delete invoice");
                InvoiceError::Internal(err)
            })?;

        if !deleted {
            return Err(InvoiceError::ConflictOrGone);
        }

        info!(invoice_id, "invoices: invoice deleted");
        Ok(())
    }

    async fn write_status(
        &self,
        identity: &Identity,
        invoice_id: &str,
        status: InvoiceStatus,
    ) -> Result<InvoiceModel, InvoiceError> {
        let invoice = self
            .invoice_repository
            .update_status_owned(invoice_id.to_string(), identity.owner_scope(), status)
            .await
            .map_err(|err| {
                error!(invoice_id, %status, db_error = ?err, "invoices: failed to update status");
                InvoiceError::Internal(err)
            })?
            .ok_or(InvoiceError::ConflictOrGone)?;

        info!(invoice_id, %status, "invoices: status updated");
        Ok(invoice.into())
    }
}
