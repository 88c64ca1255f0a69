use chrono::{DateTime, NaiveDate, Utc};
use diesel::prelude::*;

use crate::infra::db::postgres::schema::invoices;

#[derive(Debug, Clone, PartialEq, Identifiable, Selectable, Queryable)]
#[diesel(table_name = invoices)]
pub struct InvoiceEntity {
    pub id: String,
    pub owner_session_id: Option<String>,
    pub owner_mobile_id: Option<String>,
    pub client_name: String,
    pub client_email: String,
    pub client_address: String,
    pub from_name: String,
    pub from_email: String,
    pub from_address: String,
    pub currency: String,
    pub date: NaiveDate,
    pub due_date: i32,
    pub invoice_name: String,
    pub invoice_number: i32,
    pub invoice_item_description: String,
    pub invoice_item_quantity: i32,
    pub invoice_item_rate: f64,
    pub note: Option<String>,
    pub total: f64,
    pub status: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Insertable)]
#[diesel(table_name = invoices)]
pub struct InsertInvoiceEntity {
    pub id: String,
    pub owner_session_id: Option<String>,
    pub owner_mobile_id: Option<String>,
    pub client_name: String,
    pub client_email: String,
    pub client_address: String,
    pub from_name: String,
    pub from_email: String,
    pub from_address: String,
    pub currency: String,
    pub date: NaiveDate,
    pub due_date: i32,
    pub invoice_name: String,
    pub invoice_number: i32,
    pub invoice_item_description: String,
    pub invoice_item_quantity: i32,
    pub invoice_item_rate: f64,
    pub note: Option<String>,
    pub total: f64,
    pub status: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Commercial fields only; ownership columns and `created_at` are never part of an update.
#[derive(Debug, Clone, PartialEq, AsChangeset)]
#[diesel(table_name = invoices)]
pub struct UpdateInvoiceEntity {
    pub client_name: String,
    pub client_email: String,
    pub client_address: String,
    pub from_name: String,
    pub from_email: String,
    pub from_address: String,
    pub currency: String,
    pub date: NaiveDate,
    pub due_date: i32,
    pub invoice_name: String,
    pub invoice_number: i32,
    pub invoice_item_description: String,
    pub invoice_item_quantity: i32,
    pub invoice_item_rate: f64,
    /// `Some(None)` clears the column.
    pub note: Option<Option<String>>,
    pub total: f64,
    /// `None` keeps the stored status.
    pub status: Option<String>,
    pub updated_at: DateTime<Utc>,
}
