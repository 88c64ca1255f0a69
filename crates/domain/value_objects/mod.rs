pub mod enums;
pub mod identity;
pub mod invoice_payload;
pub mod invoices;
