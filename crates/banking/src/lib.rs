//! `shopdesk-banking` — the shop's internal banking ledger.
//!
//! The centerpiece is [`evaluate`]: a pure function that takes the current
//! balances and a requested transaction, validates it, resolves the
//! processing charge, and produces the next balance snapshot. Persistence and
//! authorization live elsewhere; this crate does no IO.

pub mod balances;
pub mod evaluator;
pub mod transaction;

pub use balances::BalanceSheet;
pub use evaluator::{evaluate, EvaluationError, DEFAULT_TRANSFER_CHARGE, MIN_TRANSFER_AMOUNT};
pub use transaction::{PaymentMethod, TransactionKind, TransactionRecord, TransactionRequest};
