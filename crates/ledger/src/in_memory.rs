use std::collections::HashMap;
use std::sync::RwLock;

use chrono::Utc;

use schoolbill_billing::{Invoice, InvoiceItem, Payment, PaymentStatus};
use schoolbill_core::{DomainError, InvoiceId, PaymentId, StudentId, UserId};

use crate::store::{InvoiceRecord, LedgerStore, NewPayment, StoreError};

#[derive(Debug, Default)]
struct State {
    invoices: HashMap<InvoiceId, Invoice>,
    payments: HashMap<PaymentId, Payment>,
    /// student login -> its own student record
    student_users: HashMap<UserId, StudentId>,
    /// parent login -> linked children
    guardians: HashMap<UserId, Vec<StudentId>>,
}

/// In-memory ledger store.
///
/// Intended for tests/dev. The compare-and-swap in [`swap_payment`] runs
/// entirely inside the write guard, so concurrent verifiers see exactly one
/// winner, same as a conditional UPDATE would give against a real database.
///
/// [`swap_payment`]: LedgerStore::swap_payment
#[derive(Debug, Default)]
pub struct InMemoryLedgerStore {
    state: RwLock<State>,
}

impl InMemoryLedgerStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed helper: register a student login for its own student record.
    pub fn register_student(&self, user: UserId, student: StudentId) -> Result<(), StoreError> {
        let mut state = self.write()?;
        state.student_users.insert(user, student);
        Ok(())
    }

    /// Seed helper: link a parent login to a child's student record.
    pub fn link_guardian(&self, parent: UserId, student: StudentId) -> Result<(), StoreError> {
        let mut state = self.write()?;
        state.guardians.entry(parent).or_default().push(student);
        Ok(())
    }

    fn read(&self) -> Result<std::sync::RwLockReadGuard<'_, State>, StoreError> {
        self.state
            .read()
            .map_err(|_| StoreError::Backend("lock poisoned".to_string()))
    }

    fn write(&self) -> Result<std::sync::RwLockWriteGuard<'_, State>, StoreError> {
        self.state
            .write()
            .map_err(|_| StoreError::Backend("lock poisoned".to_string()))
    }

    fn claims_for(state: &State, id: InvoiceId) -> Vec<Payment> {
        let mut claims: Vec<Payment> = state
            .payments
            .values()
            .filter(|p| p.invoice_id == id)
            .cloned()
            .collect();
        // Submission order; uuid v7 ids break recorded_at ties.
        claims.sort_by(|a, b| (a.recorded_at, a.id).cmp(&(b.recorded_at, b.id)));
        claims
    }
}

impl LedgerStore for InMemoryLedgerStore {
    fn load_invoice(&self, id: InvoiceId) -> Result<InvoiceRecord, StoreError> {
        let state = self.read()?;
        let invoice = state.invoices.get(&id).cloned().ok_or(StoreError::NotFound)?;
        let payments = Self::claims_for(&state, id);
        Ok(InvoiceRecord { invoice, payments })
    }

    fn load_payment(&self, id: PaymentId) -> Result<Payment, StoreError> {
        let state = self.read()?;
        state.payments.get(&id).cloned().ok_or(StoreError::NotFound)
    }

    fn insert_invoice(&self, invoice: Invoice) -> Result<(), StoreError> {
        let mut state = self.write()?;
        if state.invoices.contains_key(&invoice.id) {
            return Err(StoreError::Conflict(format!(
                "invoice {} already exists",
                invoice.id
            )));
        }
        state.invoices.insert(invoice.id, invoice);
        Ok(())
    }

    fn append_item(&self, id: InvoiceId, item: InvoiceItem) -> Result<(), StoreError> {
        let mut state = self.write()?;
        // Freeze rule checked under the same guard that does the write.
        let claims = Self::claims_for(&state, id);
        let invoice = state.invoices.get_mut(&id).ok_or(StoreError::NotFound)?;
        invoice.append_item(item, &claims).map_err(|e| match e {
            DomainError::Conflict(msg) => StoreError::Conflict(msg),
            other => StoreError::Backend(other.to_string()),
        })
    }

    fn insert_payment(&self, claim: NewPayment) -> Result<Payment, StoreError> {
        let mut state = self.write()?;
        if !state.invoices.contains_key(&claim.invoice_id) {
            return Err(StoreError::NotFound);
        }

        let payment = Payment {
            id: PaymentId::new(),
            invoice_id: claim.invoice_id,
            amount: claim.amount,
            method: claim.method,
            reference: claim.reference,
            payment_date: claim.payment_date,
            status: PaymentStatus::Pending,
            recorded_by: claim.recorded_by,
            recorded_at: Utc::now(),
            verified_by: None,
            verified_at: None,
            reason: None,
        };
        state.payments.insert(payment.id, payment.clone());
        Ok(payment)
    }

    fn swap_payment(
        &self,
        expected: PaymentStatus,
        updated: Payment,
    ) -> Result<Payment, StoreError> {
        let mut state = self.write()?;
        let current = state.payments.get_mut(&updated.id).ok_or(StoreError::NotFound)?;

        // The whole point: check-then-write under one guard.
        if current.status != expected {
            return Err(StoreError::Conflict(format!(
                "payment {} is {}, expected {}",
                updated.id, current.status, expected
            )));
        }

        *current = updated.clone();
        Ok(updated)
    }

    fn payments_for_invoice(&self, id: InvoiceId) -> Result<Vec<Payment>, StoreError> {
        let state = self.read()?;
        Ok(Self::claims_for(&state, id))
    }

    fn invoices_for_student(&self, id: StudentId) -> Result<Vec<InvoiceRecord>, StoreError> {
        let state = self.read()?;
        let mut records: Vec<InvoiceRecord> = state
            .invoices
            .values()
            .filter(|inv| inv.student_id == id)
            .map(|inv| InvoiceRecord {
                invoice: inv.clone(),
                payments: Self::claims_for(&state, inv.id),
            })
            .collect();
        records.sort_by(|a, b| b.invoice.issue_date.cmp(&a.invoice.issue_date));
        Ok(records)
    }

    fn pending_payments(&self) -> Result<Vec<Payment>, StoreError> {
        let state = self.read()?;
        let mut pending: Vec<Payment> = state
            .payments
            .values()
            .filter(|p| p.is_pending())
            .cloned()
            .collect();
        pending.sort_by(|a, b| (a.recorded_at, a.id).cmp(&(b.recorded_at, b.id)));
        Ok(pending)
    }

    fn linked_students(&self, user: UserId) -> Result<Vec<StudentId>, StoreError> {
        let state = self.read()?;
        let mut students = Vec::new();
        if let Some(own) = state.student_users.get(&user) {
            students.push(*own);
        }
        if let Some(children) = state.guardians.get(&user) {
            students.extend(children.iter().copied());
        }
        Ok(students)
    }
}
