pub mod invoices;
pub mod ownership_resolver;
