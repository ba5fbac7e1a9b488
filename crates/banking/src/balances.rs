use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// The three tracked balances of the shop's internal banking ledger.
///
/// The "main" balance is **not** a field: it is always derived as the sum of
/// the three components so it can never desynchronize from them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct BalanceSheet {
    /// Physical cash in the drawer.
    pub cash: Decimal,
    /// Float owed to/from the cash-pickup agent network.
    pub ledger: Decimal,
    /// Balance held in the linked online payment wallet.
    pub wallet: Decimal,
}

impl BalanceSheet {
    pub fn new(cash: Decimal, ledger: Decimal, wallet: Decimal) -> Self {
        Self { cash, ledger, wallet }
    }

    /// Reporting total: `cash + ledger + wallet`.
    pub fn main(&self) -> Decimal {
        self.cash + self.ledger + self.wallet
    }
}
