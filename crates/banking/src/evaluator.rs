//! The ledger transaction evaluator.
//!
//! Pure and deterministic: the caller fetches the latest balance snapshot,
//! calls [`evaluate`], and persists the returned record. Validation is
//! checked in a fixed order and the first failing rule wins; a rejected
//! request never produces a partial state change.

use chrono::{DateTime, Utc};
use rust_decimal::{dec, Decimal};
use thiserror::Error;

use crate::balances::BalanceSheet;
use crate::transaction::{PaymentMethod, TransactionKind, TransactionRecord, TransactionRequest};

/// Minimum ledger-transfer amount; covers the fixed transfer charge.
pub const MIN_TRANSFER_AMOUNT: Decimal = dec!(5);

/// Default ledger-transfer charge. Negative: the wallet is credited with
/// slightly more than the ledger is debited, so the cost lands on the shop.
pub const DEFAULT_TRANSFER_CHARGE: Decimal = dec!(-5);

/// Why a transaction request was rejected.
///
/// Every variant is a rejection of the whole request; the evaluator never
/// applies part of a transition. Unknown `kind` strings are rejected earlier,
/// at the parse boundary, since [`TransactionKind`] is a closed enum.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum EvaluationError {
    #[error("amount must be positive")]
    NonPositiveAmount,

    #[error("employee id is required for borrowing")]
    MissingCounterparty,

    #[error("{0}")]
    InvalidPaymentMethod(&'static str),

    #[error("charge may not be below {floor}")]
    NegativeCharge { floor: Decimal },

    #[error("amount must be at least {MIN_TRANSFER_AMOUNT} to cover the transfer charge")]
    BelowMinimumTransferAmount,

    #[error("insufficient {balance} balance for {kind}")]
    InsufficientFunds {
        balance: &'static str,
        kind: &'static str,
    },
}

/// Validate a request against the current balances, resolve its charge, and
/// compute the next balance snapshot.
pub fn evaluate(
    current: &BalanceSheet,
    request: &TransactionRequest,
    recorded_at: DateTime<Utc>,
) -> Result<TransactionRecord, EvaluationError> {
    validate(request)?;
    let charge = resolve_charge(request);
    let balances = apply(current, request, charge)?;

    Ok(TransactionRecord {
        kind: request.kind,
        amount: request.amount,
        charge,
        profit: charge,
        payment_method: match request.kind {
            TransactionKind::Withdrawal => request.payment_method,
            _ => None,
        },
        employee_id: match request.kind {
            TransactionKind::Borrowing => request.employee_id,
            _ => None,
        },
        note: request.note.clone(),
        balances,
        recorded_at,
    })
}

fn validate(request: &TransactionRequest) -> Result<(), EvaluationError> {
    if request.amount <= Decimal::ZERO {
        return Err(EvaluationError::NonPositiveAmount);
    }

    if request.kind == TransactionKind::Borrowing && request.employee_id.is_none() {
        return Err(EvaluationError::MissingCounterparty);
    }

    if request.kind == TransactionKind::Withdrawal && request.payment_method.is_none() {
        return Err(EvaluationError::InvalidPaymentMethod(
            "payment method must be paynearby or online for withdrawal",
        ));
    }

    if request.kind != TransactionKind::Withdrawal && request.payment_method.is_some() {
        return Err(EvaluationError::InvalidPaymentMethod(
            "payment method only applies to withdrawals",
        ));
    }

    if let Some(charge) = request.charge {
        // Borrowing ignores the override entirely, so it has no floor.
        let floor = match request.kind {
            TransactionKind::Borrowing => None,
            TransactionKind::LedgerTransfer => Some(DEFAULT_TRANSFER_CHARGE),
            TransactionKind::Deposit | TransactionKind::Withdrawal => Some(Decimal::ZERO),
        };
        if let Some(floor) = floor {
            if charge < floor {
                return Err(EvaluationError::NegativeCharge { floor });
            }
        }
    }

    if request.kind == TransactionKind::LedgerTransfer && request.amount < MIN_TRANSFER_AMOUNT {
        return Err(EvaluationError::BelowMinimumTransferAmount);
    }

    Ok(())
}

fn resolve_charge(request: &TransactionRequest) -> Decimal {
    match request.kind {
        TransactionKind::Borrowing => Decimal::ZERO,
        TransactionKind::LedgerTransfer => request.charge.unwrap_or(DEFAULT_TRANSFER_CHARGE),
        TransactionKind::Deposit | TransactionKind::Withdrawal => {
            // Default fee: 10 per 1000 of amount, unrounded. Kept in this
            // per-1000 form to match the established fee schedule.
            request
                .charge
                .unwrap_or_else(|| (request.amount / dec!(1000)) * dec!(10))
        }
    }
}

fn apply(
    current: &BalanceSheet,
    request: &TransactionRequest,
    charge: Decimal,
) -> Result<BalanceSheet, EvaluationError> {
    let amount = request.amount;

    match request.kind {
        TransactionKind::Deposit => {
            if current.wallet < amount {
                return Err(EvaluationError::InsufficientFunds {
                    balance: "online wallet",
                    kind: "deposit",
                });
            }
            Ok(BalanceSheet {
                cash: current.cash + amount + charge,
                ledger: current.ledger,
                wallet: current.wallet - amount,
            })
        }
        TransactionKind::Withdrawal => {
            let projected_cash = current.cash - amount + charge;
            if projected_cash < Decimal::ZERO {
                return Err(EvaluationError::InsufficientFunds {
                    balance: "cash",
                    kind: "withdrawal",
                });
            }
            let mut next = BalanceSheet {
                cash: projected_cash,
                ..*current
            };
            match request.payment_method {
                Some(PaymentMethod::PayNearby) => next.ledger += amount,
                Some(PaymentMethod::Online) => next.wallet += amount,
                // Unreachable after validation; repeat the rule rather than panic.
                None => {
                    return Err(EvaluationError::InvalidPaymentMethod(
                        "payment method must be paynearby or online for withdrawal",
                    ))
                }
            }
            Ok(next)
        }
        TransactionKind::Borrowing => {
            if current.cash < amount {
                return Err(EvaluationError::InsufficientFunds {
                    balance: "cash",
                    kind: "borrowing",
                });
            }
            Ok(BalanceSheet {
                cash: current.cash - amount,
                ..*current
            })
        }
        TransactionKind::LedgerTransfer => {
            if current.ledger < amount {
                return Err(EvaluationError::InsufficientFunds {
                    balance: "ledger",
                    kind: "transfer",
                });
            }
            Ok(BalanceSheet {
                cash: current.cash,
                ledger: current.ledger - amount,
                wallet: current.wallet + amount + charge,
            })
        }
    }
}
