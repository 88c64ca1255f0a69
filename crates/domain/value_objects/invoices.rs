use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::{
    entities::invoices::{InsertInvoiceEntity, InvoiceEntity, UpdateInvoiceEntity},
    value_objects::{
        enums::invoice_statuses::InvoiceStatus, identity::InvoiceOwner,
        invoice_payload::ValidatedInvoiceFields,
    },
};

/// Invoice as returned to callers.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct InvoiceModel {
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
    pub status: InvoiceStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<InvoiceEntity> for InvoiceModel {
    fn from(entity: InvoiceEntity) -> Self {
        Self {
            status: entity.status.parse().unwrap_or_default(),
            id: entity.id,
            owner_session_id: entity.owner_session_id,
            owner_mobile_id: entity.owner_mobile_id,
            client_name: entity.client_name,
            client_email: entity.client_email,
            client_address: entity.client_address,
            from_name: entity.from_name,
            from_email: entity.from_email,
            from_address: entity.from_address,
            currency: entity.currency,
            date: entity.date,
            due_date: entity.due_date,
            invoice_name: entity.invoice_name,
            invoice_number: entity.invoice_number,
            invoice_item_description: entity.invoice_item_description,
            invoice_item_quantity: entity.invoice_item_quantity,
            invoice_item_rate: entity.invoice_item_rate,
            note: entity.note,
            total: entity.total,
            created_at: entity.created_at,
            updated_at: entity.updated_at,
        }
    }
}

impl ValidatedInvoiceFields {
    pub fn to_insert_entity(&self, owner: InvoiceOwner) -> InsertInvoiceEntity {
        let now = Utc::now();

        InsertInvoiceEntity {
            id: Uuid::new_v4().to_string(),
            owner_session_id: owner.owner_session_id,
            owner_mobile_id: owner.owner_mobile_id,
            client_name: self.client_name.clone(),
            client_email: self.client_email.clone(),
            client_address: self.client_address.clone(),
            from_name: self.from_name.clone(),
            from_email: self.from_email.clone(),
            from_address: self.from_address.clone(),
            currency: self.currency.clone(),
            date: self.date,
            due_date: self.due_date,
            invoice_name: self.invoice_name.clone(),
            invoice_number: self.invoice_number,
            invoice_item_description: self.invoice_item_description.clone(),
            invoice_item_quantity: self.invoice_item_quantity,
            invoice_item_rate: self.invoice_item_rate,
            note: self.note.clone(),
            total: self.total,
            status: self.status.unwrap_or_default().to_string(),
            created_at: now,
            updated_at: now,
        }
    }

    /// Full replacement of the commercial fields. Ownership and `created_at` are untouched.
    pub fn to_update_entity(&self) -> UpdateInvoiceEntity {
        UpdateInvoiceEntity {
            client_name: self.client_name.clone(),
            client_email: self.client_email.clone(),
            client_address: self.client_address.clone(),
            from_name: self.from_name.clone(),
            from_email: self.from_email.clone(),
            from_address: self.from_address.clone(),
            currency: self.currency.clone(),
            date: self.date,
            due_date: self.due_date,
            invoice_name: self.invoice_name.clone(),
            invoice_number: self.invoice_number,
            invoice_item_description: self.invoice_item_description.clone(),
            invoice_item_quantity: self.invoice_item_quantity,
            invoice_item_rate: self.invoice_item_rate,
            note: Some(self.note.clone()),
            total: self.total,
            status: self.status.map(|status| status.to_string()),
            updated_at: Utc::now(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct MutationAck {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl MutationAck {
    pub fn ok() -> Self {
        Self {
            success: true,
            message: None,
        }
    }

    pub fn with_message(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: Some(message.into()),
        }
    }
}
