//! Trial balance aggregation.
//!
//! The store computes opening balance, period movements and closing balance
//! per account. This module only sums the columns and checks that they tie
//! out.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::calc::within_tolerance;
use crate::ledger::AccountType;

/// One account of the trial balance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrialBalanceRow {
    /// Account name.
    pub account_name: String,
    /// Account type.
    pub account_type: AccountType,
    /// Subtype label, `"Other"` when the store has none.
    pub subtype: String,
    /// Balance before the window opens.
    pub opening_balance: Decimal,
    /// Debit movements inside the window.
    pub debit: Decimal,
    /// Credit movements inside the window.
    pub credit: Decimal,
    /// Balance as of the closing date.
    pub closing_balance: Decimal,
    /// `closing == opening + debit - credit` within one cent.
    pub is_consistent: bool,
}

impl TrialBalanceRow {
    /// Creates a row and checks its internal consistency.
    #[must_use]
    pub fn new(
        account_name: impl Into<String>,
        account_type: AccountType,
        subtype: impl Into<String>,
        opening_balance: Decimal,
        debit: Decimal,
        credit: Decimal,
        closing_balance: Decimal,
    ) -> Self {
        Self {
            account_name: account_name.into(),
            account_type,
            subtype: subtype.into(),
            opening_balance,
            debit,
            credit,
            closing_balance,
            is_consistent: within_tolerance(closing_balance, opening_balance + debit - credit),
        }
    }
}

/// Column totals.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TrialBalanceTotals {
    /// Sum of opening balances.
    pub opening_balance: Decimal,
    /// Sum of debit movements.
    pub debit: Decimal,
    /// Sum of credit movements.
    pub credit: Decimal,
    /// Sum of closing balances.
    pub closing_balance: Decimal,
    /// Total debits equal total credits within one cent.
    pub movements_balanced: bool,
    /// `Σ closing == Σ opening + Σ debit - Σ credit` within one cent.
    pub closing_ties_out: bool,
}

/// Trial balance for a window.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrialBalanceReport {
    /// Rows in store order.
    pub rows: Vec<TrialBalanceRow>,
    /// Column totals.
    pub totals: TrialBalanceTotals,
}

impl TrialBalanceReport {
    /// Sums the four numeric columns.
    #[must_use]
    pub fn new(rows: Vec<TrialBalanceRow>) -> Self {
        let mut totals = rows
            .iter()
            .fold(TrialBalanceTotals::default(), |mut acc, row| {
                acc.opening_balance += row.opening_balance;
                acc.debit += row.debit;
                acc.credit += row.credit;
                acc.closing_balance += row.closing_balance;
                acc
            });

        totals.movements_balanced = within_tolerance(totals.debit, totals.credit);
        totals.closing_ties_out = within_tolerance(
            totals.closing_balance,
            totals.opening_balance + totals.debit - totals.credit,
        );

        Self { rows, totals }
    }

    /// Rows whose closing balance does not follow from their movements.
    pub fn inconsistent_rows(&self) -> impl Iterator<Item = &TrialBalanceRow> {
        self.rows.iter().filter(|r| !r.is_consistent)
    }

    /// Whether the ledger passes every trial balance check.
    #[must_use]
    pub fn is_balanced(&self) -> bool {
        self.totals.movements_balanced
            && self.totals.closing_ties_out
            && self.rows.iter().all(|r| r.is_consistent)
    }
}
