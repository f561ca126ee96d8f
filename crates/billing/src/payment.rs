use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use schoolbill_core::{DomainError, DomainResult, InvoiceId, PaymentId, UserId};

/// Claim lifecycle state.
///
/// Transitions are monotonic: `Pending` may move to `Verified` or `Rejected`
/// exactly once; both of those are terminal. A resubmission after rejection
/// is an entirely new claim row, never a reopened one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentStatus {
    Pending,
    Verified,
    Rejected,
}

impl PaymentStatus {
    pub fn is_terminal(self) -> bool {
        self != PaymentStatus::Pending
    }
}

impl core::fmt::Display for PaymentStatus {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let s = match self {
            PaymentStatus::Pending => "pending",
            PaymentStatus::Verified => "verified",
            PaymentStatus::Rejected => "rejected",
        };
        f.write_str(s)
    }
}

/// A payer's claim that money was paid against one invoice.
///
/// Rows are retained forever, including rejected ones, so the claim history
/// doubles as the audit trail. The submitter is a reference on the row, not
/// an owner: lifecycle-wise the claim belongs to its invoice.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Payment {
    pub id: PaymentId,
    pub invoice_id: InvoiceId,
    /// Claimed amount in smallest currency unit; always > 0.
    pub amount: u64,
    pub method: String,
    pub reference: Option<String>,
    /// Date on the payer's receipt, as claimed.
    pub payment_date: NaiveDate,
    pub status: PaymentStatus,
    pub recorded_by: UserId,
    pub recorded_at: DateTime<Utc>,
    pub verified_by: Option<UserId>,
    pub verified_at: Option<DateTime<Utc>>,
    /// Set only when the claim is rejected.
    pub reason: Option<String>,
}

impl Payment {
    pub fn is_pending(&self) -> bool {
        self.status == PaymentStatus::Pending
    }

    pub fn is_verified(&self) -> bool {
        self.status == PaymentStatus::Verified
    }

    /// Confirm the claim. Only a pending claim can be verified; a terminal
    /// one yields `Conflict` so the caller refreshes instead of retrying.
    pub fn verify(self, verifier: UserId, at: DateTime<Utc>) -> DomainResult<Payment> {
        self.transition(PaymentStatus::Verified, verifier, at, None)
    }

    /// Turn the claim down, with an optional reason for the payer.
    pub fn reject(
        self,
        verifier: UserId,
        at: DateTime<Utc>,
        reason: Option<String>,
    ) -> DomainResult<Payment> {
        self.transition(PaymentStatus::Rejected, verifier, at, reason)
    }

    fn transition(
        mut self,
        next: PaymentStatus,
        verifier: UserId,
        at: DateTime<Utc>,
        reason: Option<String>,
    ) -> DomainResult<Payment> {
        if self.status.is_terminal() {
            return Err(DomainError::conflict(format!(
                "payment {} is already {}; refresh before acting on it",
                self.id, self.status
            )));
        }
        self.status = next;
        self.verified_by = Some(verifier);
        self.verified_at = Some(at);
        self.reason = reason;
        Ok(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pending_claim() -> Payment {
        Payment {
            id: PaymentId::new(),
            invoice_id: InvoiceId::new(),
            amount: 700,
            method: "bank_transfer".to_string(),
            reference: Some("TRX-1042".to_string()),
            payment_date: NaiveDate::from_ymd_opt(2026, 2, 14).unwrap(),
            status: PaymentStatus::Pending,
            recorded_by: UserId::new(),
            recorded_at: Utc::now(),
            verified_by: None,
            verified_at: None,
            reason: None,
        }
    }

    #[test]
    fn verify_sets_approver_and_timestamp() {
        let admin = UserId::new();
        let at = Utc::now();
        let verified = pending_claim().verify(admin, at).unwrap();

        assert_eq!(verified.status, PaymentStatus::Verified);
        assert_eq!(verified.verified_by, Some(admin));
        assert_eq!(verified.verified_at, Some(at));
        assert_eq!(verified.reason, None);
    }

    #[test]
    fn reject_keeps_the_row_and_records_the_reason() {
        let rejected = pending_claim()
            .reject(UserId::new(), Utc::now(), Some("no matching deposit".into()))
            .unwrap();

        assert_eq!(rejected.status, PaymentStatus::Rejected);
        assert_eq!(rejected.reason.as_deref(), Some("no matching deposit"));
    }

    #[test]
    fn terminal_states_refuse_further_transitions() {
        let admin = UserId::new();
        let verified = pending_claim().verify(admin, Utc::now()).unwrap();
        let err = verified.clone().verify(admin, Utc::now()).unwrap_err();
        assert!(matches!(err, DomainError::Conflict(_)));

        let err = verified.reject(admin, Utc::now(), None).unwrap_err();
        assert!(matches!(err, DomainError::Conflict(_)));

        let rejected = pending_claim()
            .reject(admin, Utc::now(), None)
            .unwrap();
        let err = rejected.verify(admin, Utc::now()).unwrap_err();
        assert!(matches!(err, DomainError::Conflict(_)));
    }
}
