use crates::domain::{
    entities::invoices::InvoiceEntity,
    errors::InvoiceError,
    repositories::invoices::InvoiceRepository,
    value_objects::identity::Identity,
};
use std::{fmt::Display, sync::Arc};
use tracing::{debug, error, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InvoiceOperation {
    Read,
    Update,
    UpdateStatus,
    MarkAsPaid,
    Delete,
}

impl InvoiceOperation {
    pub fn as_str(&self) -> &'static str {
        match self {
            InvoiceOperation::Read => "read",
            InvoiceOperation::Update => "update",
            InvoiceOperation::UpdateStatus => "update_status",
            InvoiceOperation::MarkAsPaid => "mark_as_paid",
            InvoiceOperation::Delete => "delete",
        }
    }
}

impl Display for InvoiceOperation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Decides whether a caller may act on an invoice: the row must exist *and* one of its
/// ownership fields must match the caller. Both misses look the same to the caller.
pub struct OwnershipResolver<R>
where
    R: InvoiceRepository + Send + Sync + 'static,
{
    invoice_repository: Arc<R>,
}

impl<R> OwnershipResolver<R>
where
    R: InvoiceRepository + Send + Sync + 'static,
{
    pub fn new(invoice_repository: Arc<R>) -> Self {
        Self { invoice_repository }
    }

    pub async fn authorize(
        &self,
        identity: &Identity,
        invoice_id: &str,
        operation: InvoiceOperation,
    ) -> Result<InvoiceEntity, InvoiceError> {
        let scope = identity.owner_scope();
        if scope.is_empty() {
            warn!(
                invoice_id,
                caller = identity.kind(),
                %operation,
                "ownership: caller carries no usable owner id"
            );
            return Err(InvoiceError::NotFoundOrForbidden);
        }

        let invoice = self
            .invoice_repository
            .find_owned(invoice_id.to_string(), scope)
            .await
            .map_err(|err| {
                error!(
                    invoice_id,
                    caller = identity.kind(),
                    %operation,
                    db_error = ?err,
                    "ownership: failed to look up invoice"
                );
                InvoiceError::Internal(err)
            })?
            .ok_or_else(|| {
                warn!(
                    invoice_id,
                    caller = identity.kind(),
                    caller_id = identity.id(),
                    %operation,
                    "ownership: invoice not found or not owned"
                );
                InvoiceError::NotFoundOrForbidden
            })?;

        debug!(invoice_id, caller = identity.kind(), %operation, "ownership: granted");
        Ok(invoice)
    }
}
