pub mod invoices;
pub mod sessions;
