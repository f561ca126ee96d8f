//! Request/response shapes of the reconciliation façade.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use schoolbill_billing::{BalanceSummary, DerivedStatus, Payment, PaymentStatus};
use schoolbill_core::{InvoiceId, PaymentId, StudentId};
use schoolbill_ledger::InvoiceRecord;

/// Payer input for a new payment claim.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubmitClaim {
    pub invoice_id: InvoiceId,
    /// Claimed amount in smallest currency unit; must be positive.
    pub amount: u64,
    pub method: String,
    pub reference: Option<String>,
    pub payment_date: NaiveDate,
}

/// Acknowledgement returned to the submitter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ClaimReceipt {
    pub payment_id: PaymentId,
    pub status: PaymentStatus,
}

/// Outcome of an administrator verifying or rejecting a claim.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ClaimDecision {
    pub payment_id: PaymentId,
    pub status: PaymentStatus,
    pub verified_at: Option<DateTime<Utc>>,
}

impl From<&Payment> for ClaimDecision {
    fn from(payment: &Payment) -> Self {
        Self {
            payment_id: payment.id,
            status: payment.status,
            verified_at: payment.verified_at,
        }
    }
}

/// One charge line as exposed to callers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ItemView {
    pub description: String,
    pub amount: u64,
}

/// One claim as exposed to callers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PaymentView {
    pub id: PaymentId,
    pub amount: u64,
    pub status: PaymentStatus,
    pub payment_date: NaiveDate,
}

/// An invoice with its recomputed balance facts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InvoiceView {
    pub invoice_id: InvoiceId,
    pub student_id: StudentId,
    pub issue_date: DateTime<Utc>,
    pub due_date: Option<DateTime<Utc>>,
    pub items: Vec<ItemView>,
    pub payments: Vec<PaymentView>,
    pub charged_total: u64,
    pub verified_paid_total: u64,
    pub pending_total: u64,
    pub balance: i64,
    pub credit: u64,
    pub derived_status: DerivedStatus,
}

impl InvoiceView {
    pub fn build(record: &InvoiceRecord, summary: BalanceSummary) -> Self {
        Self {
            invoice_id: record.invoice.id,
            student_id: record.invoice.student_id,
            issue_date: record.invoice.issue_date,
            due_date: record.invoice.due_date,
            items: record
                .invoice
                .items
                .iter()
                .map(|item| ItemView {
                    description: item.description.clone(),
                    amount: item.amount,
                })
                .collect(),
            payments: record
                .payments
                .iter()
                .map(|p| PaymentView {
                    id: p.id,
                    amount: p.amount,
                    status: p.status,
                    payment_date: p.payment_date,
                })
                .collect(),
            charged_total: summary.charged_total,
            verified_paid_total: summary.verified_paid_total,
            pending_total: summary.pending_total,
            balance: summary.balance,
            credit: summary.credit,
            derived_status: summary.status,
        }
    }
}
