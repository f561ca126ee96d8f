use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use schoolbill_core::{DomainError, DomainResult, InvoiceId, StudentId};

use crate::payment::Payment;

/// A single charge line on an invoice.
///
/// Items are created at invoice-build time and never mutated afterwards;
/// corrections are modeled as new offsetting items, not edits.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InvoiceItem {
    pub description: String,
    /// Charge amount in smallest currency unit (e.g., cents).
    pub amount: u64,
}

impl InvoiceItem {
    pub fn new(description: impl Into<String>, amount: u64) -> DomainResult<Self> {
        let description = description.into();
        if description.trim().is_empty() {
            return Err(DomainError::validation(
                "invoice item description must not be empty",
            ));
        }
        Ok(Self {
            description,
            amount,
        })
    }
}

/// One student's billing record for a period.
///
/// The invoice only carries facts (student, dates, charge lines). Payment
/// state and the derived status live elsewhere: claims are separate rows and
/// the balance is recomputed on every read, never stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Invoice {
    pub id: InvoiceId,
    pub student_id: StudentId,
    pub issue_date: DateTime<Utc>,
    pub due_date: Option<DateTime<Utc>>,
    pub items: Vec<InvoiceItem>,
}

impl Invoice {
    pub fn new(
        id: InvoiceId,
        student_id: StudentId,
        issue_date: DateTime<Utc>,
        due_date: Option<DateTime<Utc>>,
        items: Vec<InvoiceItem>,
    ) -> Self {
        Self {
            id,
            student_id,
            issue_date,
            due_date,
            items,
        }
    }

    /// Total charge: sum of all item amounts.
    pub fn charged_total(&self) -> DomainResult<u64> {
        let mut total: u64 = 0;
        for item in &self.items {
            total = total
                .checked_add(item.amount)
                .ok_or_else(|| DomainError::invariant("invoice charge total overflow"))?;
        }
        Ok(total)
    }

    /// Whether new charge lines may still be appended.
    ///
    /// Invariant: an invoice is frozen once any payment against it has been
    /// verified. Pending and rejected claims do not freeze it.
    pub fn accepts_new_items(&self, payments: &[Payment]) -> bool {
        !payments.iter().any(Payment::is_verified)
    }

    /// Append a charge line, enforcing the freeze rule.
    pub fn append_item(&mut self, item: InvoiceItem, payments: &[Payment]) -> DomainResult<()> {
        if !self.accepts_new_items(payments) {
            return Err(DomainError::conflict(
                "invoice has a verified payment; charges can no longer be appended",
            ));
        }
        self.items.push(item);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::payment::{Payment, PaymentStatus};
    use chrono::NaiveDate;
    use schoolbill_core::{PaymentId, UserId};

    fn test_invoice(amounts: &[u64]) -> Invoice {
        let items = amounts
            .iter()
            .map(|a| InvoiceItem::new("tuition", *a).unwrap())
            .collect();
        Invoice::new(InvoiceId::new(), StudentId::new(), Utc::now(), None, items)
    }

    fn claim(invoice: &Invoice, amount: u64) -> Payment {
        Payment {
            id: PaymentId::new(),
            invoice_id: invoice.id,
            amount,
            method: "cash".to_string(),
            reference: None,
            payment_date: NaiveDate::from_ymd_opt(2026, 3, 1).unwrap(),
            status: PaymentStatus::Pending,
            recorded_by: UserId::new(),
            recorded_at: Utc::now(),
            verified_by: None,
            verified_at: None,
            reason: None,
        }
    }

    #[test]
    fn charged_total_is_sum_of_items() {
        let invoice = test_invoice(&[500, 200]);
        assert_eq!(invoice.charged_total().unwrap(), 700);
    }

    #[test]
    fn empty_description_is_rejected() {
        let err = InvoiceItem::new("  ", 100).unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));
    }

    #[test]
    fn items_append_while_no_payment_is_verified() {
        let mut invoice = test_invoice(&[500]);
        let pending = claim(&invoice, 500);
        let rejected = claim(&invoice, 100)
            .reject(UserId::new(), Utc::now(), Some("wrong amount".into()))
            .unwrap();

        invoice
            .append_item(
                InvoiceItem::new("lab fee", 50).unwrap(),
                &[pending, rejected],
            )
            .unwrap();
        assert_eq!(invoice.items.len(), 2);
    }

    #[test]
    fn verified_payment_freezes_the_invoice() {
        let mut invoice = test_invoice(&[500]);
        let verified = claim(&invoice, 500)
            .verify(UserId::new(), Utc::now())
            .unwrap();

        let err = invoice
            .append_item(InvoiceItem::new("late fee", 25).unwrap(), &[verified])
            .unwrap_err();
        assert!(matches!(err, DomainError::Conflict(_)));
        assert_eq!(invoice.items.len(), 1);
    }
}
