//! `schoolbill-auth` — authorization boundary for the billing core.
//!
//! Session resolution lives outside this workspace; callers hand in an
//! already-resolved [`Identity`]. This crate only answers "what may this
//! identity do to that invoice", as a pure policy check.

pub mod capability;
pub mod identity;

pub use capability::{Capability, CapabilitySet, capabilities_for_invoice};
pub use identity::{Identity, Role};
