//! Ledger store contract.
//!
//! The store is the transactional collaborator of the reconciliation core.
//! Two properties matter more than anything else here:
//!
//! - `load_invoice` returns a single consistent snapshot of the invoice with
//!   its items and all of its claims.
//! - `swap_payment` is a compare-and-swap on the claim's status: it must
//!   fail, never silently overwrite, when the stored status is not the
//!   expected prior state. That conditional update is what makes a racing
//!   verify/reject produce exactly one winner.

use chrono::NaiveDate;
use thiserror::Error;

use schoolbill_billing::{Invoice, InvoiceItem, Payment, PaymentStatus};
use schoolbill_core::{DomainError, InvoiceId, PaymentId, StudentId, UserId};

/// Store-level failure.
///
/// Kept separate from [`DomainError`]: the store reports storage facts, the
/// service boundary translates them for callers.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StoreError {
    #[error("row not found")]
    NotFound,

    /// Conditional update lost: the row was not in the expected status.
    #[error("conditional update failed: {0}")]
    Conflict(String),

    #[error("storage backend failure: {0}")]
    Backend(String),
}

impl From<StoreError> for DomainError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound => DomainError::NotFound,
            StoreError::Conflict(msg) => DomainError::Conflict(msg),
            StoreError::Backend(msg) => DomainError::Storage(msg),
        }
    }
}

/// An invoice snapshot: the invoice (with its items) plus every claim ever
/// submitted against it, in submission order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvoiceRecord {
    pub invoice: Invoice,
    pub payments: Vec<Payment>,
}

/// Claim data as submitted by a payer. The store assigns the row id and the
/// `recorded_at` timestamp on insert.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewPayment {
    pub invoice_id: InvoiceId,
    pub amount: u64,
    pub method: String,
    pub reference: Option<String>,
    pub payment_date: NaiveDate,
    pub recorded_by: UserId,
}

/// Storage contract consumed by the reconciliation service.
///
/// Claim rows are append-plus-CAS only: there is no delete, so the full
/// claim history (rejected rows included) stays queryable for audit.
pub trait LedgerStore: Send + Sync {
    /// Point lookup of an invoice with items and all payments, as one
    /// consistent snapshot.
    fn load_invoice(&self, id: InvoiceId) -> Result<InvoiceRecord, StoreError>;

    /// Point lookup of a single claim row.
    fn load_payment(&self, id: PaymentId) -> Result<Payment, StoreError>;

    /// Insert an invoice produced by the (external) assessment flow.
    fn insert_invoice(&self, invoice: Invoice) -> Result<(), StoreError>;

    /// Append a charge line to an existing invoice.
    ///
    /// Conditional, like [`swap_payment`]: fails with
    /// [`StoreError::Conflict`] once any payment on the invoice is verified,
    /// with the check and the write in the same transaction. A check against
    /// a previously loaded snapshot would race a concurrent verification.
    ///
    /// [`swap_payment`]: LedgerStore::swap_payment
    fn append_item(&self, id: InvoiceId, item: InvoiceItem) -> Result<(), StoreError>;

    /// Create a claim row with a server-generated id and timestamp.
    fn insert_payment(&self, claim: NewPayment) -> Result<Payment, StoreError>;

    /// Replace a claim row if and only if its current status equals
    /// `expected`. Returns the stored row on success and
    /// [`StoreError::Conflict`] when the condition fails.
    fn swap_payment(
        &self,
        expected: PaymentStatus,
        updated: Payment,
    ) -> Result<Payment, StoreError>;

    /// All claims against one invoice, oldest submission first.
    fn payments_for_invoice(&self, id: InvoiceId) -> Result<Vec<Payment>, StoreError>;

    /// All invoices billed to one student, newest issue date first.
    fn invoices_for_student(&self, id: StudentId) -> Result<Vec<InvoiceRecord>, StoreError>;

    /// Every pending claim across all invoices, oldest submission first.
    fn pending_payments(&self) -> Result<Vec<Payment>, StoreError>;

    /// Students the given user may pay for: the user's own student record
    /// for a student login, the linked children for a parent login.
    fn linked_students(&self, user: UserId) -> Result<Vec<StudentId>, StoreError>;
}
