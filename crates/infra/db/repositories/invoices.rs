use anyhow::Result;
use async_trait::async_trait;
use chrono::Utc;
use diesel::{
    OptionalExtension, RunQueryDsl, delete, insert_into,
    pg::Pg,
    prelude::*,
    sql_types::{Bool, Nullable},
    update,
};
use std::sync::Arc;

use crate::{
    domain,
    infra::db::postgres::{postgres_connection::PgPoolSquad, schema::invoices},
};
use domain::{
    entities::invoices::{InsertInvoiceEntity, InvoiceEntity, UpdateInvoiceEntity},
    repositories::invoices::InvoiceRepository,
    value_objects::{enums::invoice_statuses::InvoiceStatus, identity::OwnerScope},
};

type OwnedFilter = Box<dyn BoxableExpression<invoices::table, Pg, SqlType = Nullable<Bool>>>;

pub struct InvoicePostgres {
    db_pool: Arc<PgPoolSquad>,
}

impl InvoicePostgres {
    pub fn new(db_pool: Arc<PgPoolSquad>) -> Self {
        Self { db_pool }
    }
}

/// `id = $1 AND (owner_session_id = $2 OR owner_mobile_id = $3)`, keeping only the
/// ownership clauses the scope provides. `None` when the scope cannot own anything.
fn owned_filter(invoice_id: &str, scope: &OwnerScope) -> Option<OwnedFilter> {
    let ownership: OwnedFilter = match (scope.session_owner.clone(), scope.mobile_owner.clone()) {
        (Some(session_owner), Some(mobile_owner)) => Box::new(
            invoices::owner_session_id
                .eq(session_owner)
                .or(invoices::owner_mobile_id.eq(mobile_owner)),
        ),
        (Some(session_owner), None) => Box::new(invoices::owner_session_id.eq(session_owner)),
        (None, Some(mobile_owner)) => Box::new(invoices::owner_mobile_id.eq(mobile_owner)),
        (None, None) => return None,
    };

    Some(Box::new(
        invoices::id.eq(invoice_id.to_string()).and(ownership),
    ))
}

#[async_trait]
impl InvoiceRepository for InvoicePostgres {
    async fn create_invoice(&self, invoice: InsertInvoiceEntity) -> Result<InvoiceEntity> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let invoice = insert_into(invoices::table)
            .values(&invoice)
            .returning(InvoiceEntity::as_returning())
            .get_result::<InvoiceEntity>(&mut conn)?;

        Ok(invoice)
    }

    async fn find_owned(
        &self,
        invoice_id: String,
        scope: OwnerScope,
    ) -> Result<Option<InvoiceEntity>> {
        let Some(filter) = owned_filter(&invoice_id, &scope) else {
            return Ok(None);
        };
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let invoice = invoices::table
            .filter(filter)
            .select(InvoiceEntity::as_select())
            .first::<InvoiceEntity>(&mut conn)
            .optional()?;

        Ok(invoice)
    }

    async fn update_owned(
        &self,
        invoice_id: String,
        scope: OwnerScope,
        changes: UpdateInvoiceEntity,
    ) -> Result<Option<InvoiceEntity>> {
        let Some(filter) = owned_filter(&invoice_id, &scope) else {
            return Ok(None);
        };
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let invoice = update(invoices::table.filter(filter))
            .set(&changes)
            .returning(InvoiceEntity::as_returning())
            .get_result::<InvoiceEntity>(&mut conn)
            .optional()?;

        Ok(invoice)
    }

    async fn update_status_owned(
        &self,
        invoice_id: String,
        scope: OwnerScope,
        status: InvoiceStatus,
    ) -> Result<Option<InvoiceEntity>> {
        let Some(filter) = owned_filter(&invoice_id, &scope) else {
            return Ok(None);
        };
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let invoice = update(invoices::table.filter(filter))
            .set((
                invoices::status.eq(status.to_string()),
                invoices::updated_at.eq(Utc::now()),
            ))
            .returning(InvoiceEntity::as_returning())
            .get_result::<InvoiceEntity>(&mut conn)
            .optional()?;

        Ok(invoice)
    }

    async fn delete_owned(&self, invoice_id: String, scope: OwnerScope) -> Result<bool> {
        let Some(filter) = owned_filter(&invoice_id, &scope) else {
            return Ok(false);
        };
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let deleted = delete(invoices::table.filter(filter)).execute(&mut conn)?;

        Ok(deleted > 0)
    }
}
