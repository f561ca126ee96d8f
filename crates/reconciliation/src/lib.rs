//! `schoolbill-reconciliation` — the billing façade the rest of the platform
//! calls.
//!
//! Submitting a claim, listing a payer's invoices, verifying or rejecting a
//! claim, and reading an invoice with its computed balance all go through
//! [`ReconciliationService`]. Authorization is resolved once per entry point
//! through `schoolbill-auth`, and every status change goes through the ledger
//! store's conditional update.

pub mod service;
pub mod view;

pub use service::ReconciliationService;
pub use view::{ClaimDecision, ClaimReceipt, InvoiceView, ItemView, PaymentView, SubmitClaim};
