//! Betslip aggregation and confirmation
//!
//! # Lifecycle
//!
//! ```text
//! Empty ──add──▶ HasSelections ──▶ Valid | Invalid
//!                                     │
//!                                 confirm()
//!                                     ▼
//!                                Confirming ──▶ Settled | Cancelled
//! ```
//!
//! [`BetSlip`] is a plain value with reducer-style operations. [`BetSlipManager`]
//! wraps one slip per session and adds the confirmation step, which talks to a
//! [`crate::common::traits::FundsGateway`].

mod manager;
mod slip;
mod types;

pub use manager::BetSlipManager;
pub use slip::{is_duplicate_against_existing, BetSlip};
pub use types::{
    Confirmation, ConfirmationContext, ExistingBets, Selection, SelectionKey, Settlement,
    SlipPhase,
};
