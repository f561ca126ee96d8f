//! Reconciliation façade.

use chrono::Utc;

use schoolbill_auth::{Capability, Identity, Role, capabilities_for_invoice};
use schoolbill_billing::{InvoiceItem, Payment, PaymentStatus, compute_balance};
use schoolbill_core::{DomainError, DomainResult, InvoiceId, PaymentId, StudentId};
use schoolbill_ledger::{InvoiceRecord, LedgerStore, NewPayment};

use crate::view::{ClaimDecision, ClaimReceipt, InvoiceView, SubmitClaim};

/// Entry point for everything billing-reconciliation.
///
/// Holds an injected [`LedgerStore`] handle; there is no process-wide
/// database singleton. Every operation runs as one logical transaction
/// against the store, and every role check funnels through
/// [`capabilities_for_invoice`] so the rules live in exactly one place.
pub struct ReconciliationService<S> {
    store: S,
}

impl<S: LedgerStore> ReconciliationService<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Record a payer's claim against an invoice.
    ///
    /// The claim lands as `pending` and does not move the balance until an
    /// administrator verifies it.
    pub fn submit_claim(
        &self,
        identity: &Identity,
        claim: SubmitClaim,
    ) -> DomainResult<ClaimReceipt> {
        if claim.amount == 0 {
            return Err(DomainError::validation("claim amount must be positive"));
        }
        if claim.method.trim().is_empty() {
            return Err(DomainError::validation("payment method must not be empty"));
        }

        let record = self.store.load_invoice(claim.invoice_id)?;
        self.require(identity, &record, Capability::SubmitClaim)?;

        let payment = self.store.insert_payment(NewPayment {
            invoice_id: claim.invoice_id,
            amount: claim.amount,
            method: claim.method,
            reference: claim.reference,
            payment_date: claim.payment_date,
            recorded_by: identity.subject_id,
        })?;

        tracing::info!(
            payment_id = %payment.id,
            invoice_id = %claim.invoice_id,
            amount = claim.amount,
            "payment claim submitted"
        );

        Ok(ClaimReceipt {
            payment_id: payment.id,
            status: payment.status,
        })
    }

    /// Invoices for every student the caller pays for, each with its
    /// recomputed balance. Newest issue date first per student; a parent
    /// with several children sees all of them.
    pub fn list_invoices_for_payer(&self, identity: &Identity) -> DomainResult<Vec<InvoiceView>> {
        let wards = self.wards_of(identity)?;

        let mut views = Vec::new();
        for student in wards {
            for record in self.store.invoices_for_student(student)? {
                let summary = compute_balance(&record.invoice, &record.payments)?;
                views.push(InvoiceView::build(&record, summary));
            }
        }
        Ok(views)
    }

    /// Administrator work queue: every pending claim, oldest first.
    pub fn list_pending_claims(&self, identity: &Identity) -> DomainResult<Vec<Payment>> {
        if !identity.is_admin() {
            return Err(DomainError::unauthorized());
        }
        Ok(self.store.pending_payments()?)
    }

    /// Confirm a pending claim. Exactly one of two racing administrators
    /// wins; the loser gets `Conflict` and must re-fetch.
    pub fn verify_claim(
        &self,
        identity: &Identity,
        payment_id: PaymentId,
    ) -> DomainResult<ClaimDecision> {
        let payment = self.load_for_decision(identity, payment_id)?;

        let verified = payment.verify(identity.subject_id, Utc::now())?;
        let stored = self.store.swap_payment(PaymentStatus::Pending, verified)?;

        tracing::info!(payment_id = %payment_id, verifier = %identity.subject_id, "claim verified");
        Ok(ClaimDecision::from(&stored))
    }

    /// Turn a pending claim down. The row is kept (audit trail) and the
    /// payer may submit a fresh claim for the same invoice.
    pub fn reject_claim(
        &self,
        identity: &Identity,
        payment_id: PaymentId,
        reason: Option<String>,
    ) -> DomainResult<ClaimDecision> {
        let payment = self.load_for_decision(identity, payment_id)?;

        let rejected = payment.reject(identity.subject_id, Utc::now(), reason)?;
        let stored = self.store.swap_payment(PaymentStatus::Pending, rejected)?;

        tracing::info!(payment_id = %payment_id, verifier = %identity.subject_id, "claim rejected");
        Ok(ClaimDecision::from(&stored))
    }

    /// Read an invoice with items, claims and the recomputed balance.
    pub fn get_invoice_with_balance(
        &self,
        identity: &Identity,
        invoice_id: InvoiceId,
    ) -> DomainResult<InvoiceView> {
        let record = self.store.load_invoice(invoice_id)?;
        self.require(identity, &record, Capability::ViewInvoice)?;

        let summary = compute_balance(&record.invoice, &record.payments)?;
        Ok(InvoiceView::build(&record, summary))
    }

    /// Append a charge line to an invoice (administrator only).
    ///
    /// Refused once any payment on the invoice has been verified; at that
    /// point corrections go on a new invoice. The freeze rule is enforced by
    /// the store's conditional append, not against the snapshot read here,
    /// so a claim verified in between cannot be overtaken by the charge.
    pub fn append_charge(
        &self,
        identity: &Identity,
        invoice_id: InvoiceId,
        description: String,
        amount: u64,
    ) -> DomainResult<InvoiceView> {
        let record = self.store.load_invoice(invoice_id)?;
        self.require(identity, &record, Capability::ManageInvoice)?;

        let item = InvoiceItem::new(description, amount)?;
        self.store.append_item(invoice_id, item)?;

        // Re-read so the view reflects the row that actually won.
        let record = self.store.load_invoice(invoice_id)?;
        let summary = compute_balance(&record.invoice, &record.payments)?;
        Ok(InvoiceView::build(&record, summary))
    }

    /// Load a pending claim and check the caller may decide on it.
    fn load_for_decision(
        &self,
        identity: &Identity,
        payment_id: PaymentId,
    ) -> DomainResult<Payment> {
        let payment = self.store.load_payment(payment_id)?;
        let record = self.store.load_invoice(payment.invoice_id)?;
        self.require(identity, &record, Capability::VerifyClaim)?;
        Ok(payment)
    }

    fn require(
        &self,
        identity: &Identity,
        record: &InvoiceRecord,
        capability: Capability,
    ) -> DomainResult<()> {
        let wards = self.wards_of(identity)?;
        let caps = capabilities_for_invoice(identity, record.invoice.student_id, &wards);
        caps.require(capability).inspect_err(|_| {
            tracing::warn!(
                invoice_id = %record.invoice.id,
                subject = %identity.subject_id,
                ?capability,
                "capability denied"
            );
        })
    }

    /// Students the identity pays for. Only payer roles have wards; admin
    /// and staff capabilities do not depend on them.
    fn wards_of(&self, identity: &Identity) -> DomainResult<Vec<StudentId>> {
        match identity.role {
            Role::Parent | Role::Student => Ok(self.store.linked_students(identity.subject_id)?),
            Role::Admin | Role::Staff => Ok(Vec::new()),
        }
    }
}
