//! Balance sheet.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::calc::TOLERANCE;
use crate::ledger::{AccountBalance, AccountType, GroupedAccounts, NormalBalance, PeriodSnapshot};

/// Balance sheet as of one snapshot.
///
/// Totals keep the stored sign: assets positive, liabilities, equity and a
/// profit negative. The fundamental equation then reads
/// `total_assets + total_liabilities + total_equity_accounts + net_income == 0`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BalanceSheetReport {
    /// Snapshot date.
    pub as_of: Option<NaiveDate>,
    /// Assets grouped by subtype, display order.
    pub assets: GroupedAccounts,
    /// Liabilities grouped by subtype, display order.
    pub liabilities: GroupedAccounts,
    /// Non-zero equity accounts.
    pub equity: Vec<AccountBalance>,
    /// Total assets (stored sign).
    pub total_assets: Decimal,
    /// Total liabilities (stored sign).
    pub total_liabilities: Decimal,
    /// Total of the equity accounts (stored sign).
    pub total_equity_accounts: Decimal,
    /// Unclosed result of the year: sum of revenue, cost and expense
    /// balances (stored sign, pre-tax).
    pub net_income: Decimal,
    /// Whether the fundamental equation holds within one cent.
    pub is_balanced: bool,
}

impl BalanceSheetReport {
    /// Builds the balance sheet for a snapshot.
    #[must_use]
    pub fn from_snapshot(snapshot: &PeriodSnapshot) -> Self {
        let assets =
            GroupedAccounts::build(&snapshot.accounts, AccountType::Asset).into_display_order();
        let liabilities = GroupedAccounts::build(&snapshot.accounts, AccountType::Liability)
            .into_display_order();
        let equity: Vec<AccountBalance> = snapshot
            .of_type(AccountType::Equity)
            .filter(|a| !a.balance.is_zero())
            .cloned()
            .collect();

        let total_assets = assets.total;
        let total_liabilities = liabilities.total;
        let total_equity_accounts = equity.iter().map(|a| a.balance).sum();
        let net_income = [AccountType::Revenue, AccountType::Cost, AccountType::Expense]
            .into_iter()
            .map(|t| snapshot.total_by_type(t))
            .sum();

        let mut report = Self {
            as_of: snapshot.as_of,
            assets,
            liabilities,
            equity,
            total_assets,
            total_liabilities,
            total_equity_accounts,
            net_income,
            is_balanced: false,
        };
        report.is_balanced = report.imbalance().abs() <= TOLERANCE;
        report
    }

    /// Residual of the fundamental equation; `0` for a consistent ledger.
    #[must_use]
    pub fn imbalance(&self) -> Decimal {
        self.total_assets + self.total_liabilities + self.total_equity_accounts + self.net_income
    }

    /// Liabilities as presented (positive for a normal balance).
    #[must_use]
    pub fn display_liabilities(&self) -> Decimal {
        NormalBalance::CreditNormal.display_value(self.total_liabilities)
    }

    /// Equity accounts as presented.
    #[must_use]
    pub fn display_equity_accounts(&self) -> Decimal {
        NormalBalance::CreditNormal.display_value(self.total_equity_accounts)
    }

    /// Result of the year as presented (positive for a profit).
    #[must_use]
    pub fn display_net_income(&self) -> Decimal {
        NormalBalance::CreditNormal.display_value(self.net_income)
    }

    /// Liabilities plus equity plus result, as presented.
    #[must_use]
    pub fn display_liabilities_and_equity(&self) -> Decimal {
        self.display_liabilities() + self.display_equity_accounts() + self.display_net_income()
    }
}
