//! `schoolbill-ledger` — persistence boundary for invoices and claims.
//!
//! This crate defines the storage contract the reconciliation service is
//! written against, without making any storage assumptions. The bundled
//! in-memory implementation backs tests and development.

pub mod in_memory;
pub mod store;

pub use in_memory::InMemoryLedgerStore;
pub use store::{InvoiceRecord, LedgerStore, NewPayment, StoreError};
