use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use shopdesk_core::EmployeeId;

use crate::balances::BalanceSheet;

/// The four supported ledger transactions.
///
/// This is the single closed definition of the transaction vocabulary; the
/// HTTP layer and the persisted records both serialize through it, so the
/// allowed values cannot drift between layers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransactionKind {
    /// Customer hands over wallet money, shop pays out cash plus keeps a fee.
    Deposit,
    /// Shop pays out via an agent network or online transfer, cash comes in.
    Withdrawal,
    /// An employee borrows cash from the drawer.
    Borrowing,
    /// Move agent-network float into the online wallet (costs the shop a fee).
    LedgerTransfer,
}

impl TransactionKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionKind::Deposit => "deposit",
            TransactionKind::Withdrawal => "withdrawal",
            TransactionKind::Borrowing => "borrowing",
            TransactionKind::LedgerTransfer => "ledger_transfer",
        }
    }
}

/// How a withdrawal is paid out. Only meaningful for withdrawals.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentMethod {
    PayNearby,
    Online,
}

impl PaymentMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentMethod::PayNearby => "paynearby",
            PaymentMethod::Online => "online",
        }
    }
}

/// A requested ledger transaction (caller input, not yet validated).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionRequest {
    pub kind: TransactionKind,

    /// Transacted amount; must be positive.
    pub amount: Decimal,

    /// Explicit processing charge, replacing the computed default.
    pub charge: Option<Decimal>,

    /// Required for withdrawals, forbidden otherwise.
    pub payment_method: Option<PaymentMethod>,

    /// Borrowing counterparty; required for borrowings, dropped from the
    /// record for every other kind.
    pub employee_id: Option<EmployeeId>,

    /// Free-text description.
    pub note: Option<String>,
}

/// A fully evaluated transaction, ready to be appended to the log.
///
/// Records are immutable once written. `balances` is the snapshot *after*
/// applying the transaction; the main balance is derived from it on demand.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionRecord {
    pub kind: TransactionKind,
    pub amount: Decimal,

    /// Resolved processing charge (negative for ledger transfers).
    pub charge: Decimal,

    /// Profit booked for this transaction; equal to the charge.
    pub profit: Decimal,

    /// Present exactly when `kind` is a withdrawal.
    pub payment_method: Option<PaymentMethod>,

    /// Present exactly when `kind` is a borrowing.
    pub employee_id: Option<EmployeeId>,

    pub note: Option<String>,

    /// Balance snapshot after this transaction was applied.
    pub balances: BalanceSheet,

    pub recorded_at: DateTime<Utc>,
}

impl TransactionRecord {
    /// Derived main balance of this record's snapshot.
    pub fn main_balance(&self) -> Decimal {
        self.balances.main()
    }
}
