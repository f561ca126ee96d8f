//! Balance aggregation over an invoice and its payment claims.
//!
//! The computation is pure and re-derivable at any time from the invoice and
//! its claims. It is never persisted as mutable state, so the stored facts
//! and the reported status cannot drift apart.

use serde::Serialize;

use schoolbill_core::{DomainError, DomainResult};

use crate::invoice::Invoice;
use crate::payment::{Payment, PaymentStatus};

/// Invoice payment state, derived on every read.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DerivedStatus {
    Paid,
    Partial,
    Unpaid,
}

/// Snapshot of an invoice's money facts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct BalanceSummary {
    pub charged_total: u64,
    /// Only verified claims count toward the balance.
    pub verified_paid_total: u64,
    /// Pending claims, reported separately; never subtracted.
    pub pending_total: u64,
    /// `charged - verified`, signed: negative means overpayment.
    pub balance: i64,
    /// Surplus owed back to the payer when verified payments exceed charges.
    pub credit: u64,
    pub status: DerivedStatus,
}

fn sum_claims(payments: &[Payment], status: PaymentStatus) -> DomainResult<u64> {
    let mut total: u64 = 0;
    for p in payments.iter().filter(|p| p.status == status) {
        total = total
            .checked_add(p.amount)
            .ok_or_else(|| DomainError::invariant("payment total overflow"))?;
    }
    Ok(total)
}

/// Compute charge, payment and balance totals for one invoice.
///
/// Overpayment is not an error: the balance goes negative and the surplus is
/// surfaced as `credit`, with the invoice reported as paid.
pub fn compute_balance(invoice: &Invoice, payments: &[Payment]) -> DomainResult<BalanceSummary> {
    let charged_total = invoice.charged_total()?;
    let verified_paid_total = sum_claims(payments, PaymentStatus::Verified)?;
    let pending_total = sum_claims(payments, PaymentStatus::Pending)?;

    let balance = i64::try_from(charged_total as i128 - verified_paid_total as i128)
        .map_err(|_| DomainError::invariant("invoice balance out of range"))?;

    let status = if balance <= 0 {
        DerivedStatus::Paid
    } else if verified_paid_total == 0 {
        DerivedStatus::Unpaid
    } else {
        DerivedStatus::Partial
    };

    let credit = if balance < 0 { balance.unsigned_abs() } else { 0 };

    Ok(BalanceSummary {
        charged_total,
        verified_paid_total,
        pending_total,
        balance,
        credit,
        status,
    })
}
