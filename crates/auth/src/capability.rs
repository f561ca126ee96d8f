//! Capability resolution for invoice-scoped operations.
//!
//! This is the single choke point for role checks: every façade entry point
//! resolves a [`CapabilitySet`] here before touching the ledger, so the
//! authorization rules are never duplicated per caller.

use serde::Serialize;

use schoolbill_core::{DomainError, DomainResult, StudentId};

use crate::identity::{Identity, Role};

/// What an identity may do to a specific invoice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Capability {
    /// Read the invoice, its claims and balance.
    ViewInvoice,
    /// Submit a payment claim against the invoice.
    SubmitClaim,
    /// Verify or reject a pending claim.
    VerifyClaim,
    /// Append charge lines to the invoice.
    ManageInvoice,
}

/// Set of capabilities granted for one (identity, invoice) pair.
///
/// - No IO
/// - No panics
/// - Pure policy check
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CapabilitySet {
    view: bool,
    submit: bool,
    verify: bool,
    manage: bool,
}

impl CapabilitySet {
    pub fn allows(&self, capability: Capability) -> bool {
        match capability {
            Capability::ViewInvoice => self.view,
            Capability::SubmitClaim => self.submit,
            Capability::VerifyClaim => self.verify,
            Capability::ManageInvoice => self.manage,
        }
    }

    /// Fail with `Unauthorized` unless the capability is granted.
    pub fn require(&self, capability: Capability) -> DomainResult<()> {
        if self.allows(capability) {
            Ok(())
        } else {
            Err(DomainError::unauthorized())
        }
    }

    fn all() -> Self {
        Self {
            view: true,
            submit: true,
            verify: true,
            manage: true,
        }
    }

    fn payer() -> Self {
        Self {
            view: true,
            submit: true,
            verify: false,
            manage: false,
        }
    }

    fn read_only() -> Self {
        Self {
            view: true,
            submit: false,
            verify: false,
            manage: false,
        }
    }
}

/// Resolve what `identity` may do to an invoice billed to `invoice_student`.
///
/// `wards` is the set of students the identity pays for, as resolved by the
/// ledger store: the student's own record for a student login, the linked
/// children for a parent login. It is ignored for admin and staff roles.
pub fn capabilities_for_invoice(
    identity: &Identity,
    invoice_student: StudentId,
    wards: &[StudentId],
) -> CapabilitySet {
    match identity.role {
        Role::Admin => CapabilitySet::all(),
        // Back office reads everything, touches nothing.
        Role::Staff => CapabilitySet::read_only(),
        Role::Parent | Role::Student => {
            if wards.contains(&invoice_student) {
                CapabilitySet::payer()
            } else {
                CapabilitySet::default()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use schoolbill_core::UserId;

    fn identity(role: Role) -> Identity {
        Identity::new(UserId::new(), role)
    }

    #[test]
    fn admin_gets_every_capability() {
        let student = StudentId::new();
        let caps = capabilities_for_invoice(&identity(Role::Admin), student, &[]);
        assert!(caps.allows(Capability::ViewInvoice));
        assert!(caps.allows(Capability::SubmitClaim));
        assert!(caps.allows(Capability::VerifyClaim));
        assert!(caps.allows(Capability::ManageInvoice));
    }

    #[test]
    fn staff_is_read_only() {
        let student = StudentId::new();
        let caps = capabilities_for_invoice(&identity(Role::Staff), student, &[]);
        assert!(caps.allows(Capability::ViewInvoice));
        assert!(!caps.allows(Capability::SubmitClaim));
        assert!(!caps.allows(Capability::VerifyClaim));
    }

    #[test]
    fn linked_parent_may_view_and_submit_but_not_verify() {
        let child = StudentId::new();
        let caps = capabilities_for_invoice(&identity(Role::Parent), child, &[child]);
        assert!(caps.allows(Capability::ViewInvoice));
        assert!(caps.allows(Capability::SubmitClaim));
        assert!(!caps.allows(Capability::VerifyClaim));
        assert!(!caps.allows(Capability::ManageInvoice));
    }

    #[test]
    fn unlinked_payer_gets_nothing() {
        let someone_elses_child = StudentId::new();
        let own_child = StudentId::new();
        let caps = capabilities_for_invoice(
            &identity(Role::Parent),
            someone_elses_child,
            &[own_child],
        );
        assert!(!caps.allows(Capability::ViewInvoice));
        assert!(!caps.allows(Capability::SubmitClaim));
        assert_eq!(
            caps.require(Capability::SubmitClaim),
            Err(DomainError::Unauthorized)
        );
    }

    #[test]
    fn student_may_submit_for_own_invoice_only() {
        let own = StudentId::new();
        let other = StudentId::new();
        let me = identity(Role::Student);
        assert!(capabilities_for_invoice(&me, own, &[own]).allows(Capability::SubmitClaim));
        assert!(!capabilities_for_invoice(&me, other, &[own]).allows(Capability::ViewInvoice));
    }
}
