//! `schoolbill-core` — shared foundation for the billing reconciliation core.
//!
//! Pure domain primitives only: typed identifiers and the error taxonomy.
//! No IO, no storage, no HTTP.

pub mod error;
pub mod id;

pub use error::{DomainError, DomainResult};
pub use id::{InvoiceId, PaymentId, StudentId, UserId};
