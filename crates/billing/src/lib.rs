//! `schoolbill-billing` — invoice and payment-claim domain model.
//!
//! Pure business rules only: the invoice record with its charge lines, the
//! payment-claim state machine, and the balance aggregator. No IO, no HTTP,
//! no storage concerns.

pub mod balance;
pub mod invoice;
pub mod payment;

pub use balance::{BalanceSummary, DerivedStatus, compute_balance};
pub use invoice::{Invoice, InvoiceItem};
pub use payment::{Payment, PaymentStatus};
