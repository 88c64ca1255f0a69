use anyhow::Result;
use async_trait::async_trait;
use mockall::automock;

use crate::domain::{
    entities::invoices::{InsertInvoiceEntity, InvoiceEntity, UpdateInvoiceEntity},
    value_objects::{enums::invoice_statuses::InvoiceStatus, identity::OwnerScope},
};

/// Owner-scoped access to stored invoices.
///
/// Every method taking an [`OwnerScope`] must filter by id *and* ownership in the
/// same statement. `None`/`false` means no owned row matched, whether the row is
/// missing or belongs to someone else.
#[automock]
#[async_trait]
pub trait InvoiceRepository {
    async fn create_invoice(&self, invoice: InsertInvoiceEntity) -> Result<InvoiceEntity>;

    async fn find_owned(
        &self,
        invoice_id: String,
        scope: OwnerScope,
    ) -> Result<Option<InvoiceEntity>>;

    async fn update_owned(
        &self,
        invoice_id: String,
        scope: OwnerScope,
        changes: UpdateInvoiceEntity,
    ) -> Result<Option<InvoiceEntity>>;

    async fn update_status_owned(
        &self,
        invoice_id: String,
        scope: OwnerScope,
        status: InvoiceStatus,
    ) -> Result<Option<InvoiceEntity>>;

    async fn delete_owned(&self, invoice_id: String, scope: OwnerScope) -> Result<bool>;
}
