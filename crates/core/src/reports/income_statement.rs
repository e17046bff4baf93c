//! Income statement with vertical and horizontal analysis.
//!
//! Flow accounts hold year-to-date balances. A snapshot therefore yields a
//! cumulative statement, and the activity of a window is the per-account
//! difference between two snapshots, never a single snapshot's value.

use std::collections::{HashMap, HashSet};

use balanza_shared::types::AccountId;
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::calc::{percent_of, round_percent};
use crate::ledger::{AccountBalance, AccountType, GroupedAccounts, PeriodSnapshot};

const REVENUE: &str = "Ingresos";
const COST_OF_SALES: &str = "Costo de Ventas";
const OPERATING_EXPENSES: &str = "Gastos de Operación";

/// Flat income tax rate applied to a positive pre-tax profit.
pub const INCOME_TAX_RATE: Decimal = Decimal::from_parts(30, 0, 0, false, 2);

/// Income tax on a pre-tax profit. Losses carry no tax benefit.
#[must_use]
pub fn income_tax(pre_tax_profit: Decimal) -> Decimal {
    if pre_tax_profit > Decimal::ZERO {
        pre_tax_profit * INCOME_TAX_RATE
    } else {
        Decimal::ZERO
    }
}

/// Income statement for a cumulative snapshot or for a window's activity.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IncomeStatement {
    /// Snapshot date for a cumulative statement; `None` for window activity.
    pub as_of: Option<NaiveDate>,
    /// Revenue accounts (stored sign, credit-normal).
    pub revenue: GroupedAccounts,
    /// Cost of sales accounts.
    pub cost_of_sales: GroupedAccounts,
    /// Operating expense accounts grouped by subtype.
    pub operating_expenses: GroupedAccounts,
    /// Total revenue as presented (positive).
    pub total_revenue: Decimal,
    /// Total cost of sales.
    pub total_cost_of_sales: Decimal,
    /// Total operating expenses.
    pub total_operating_expenses: Decimal,
    /// Revenue minus cost of sales.
    pub gross_profit: Decimal,
    /// Gross profit minus operating expenses.
    pub pre_tax_profit: Decimal,
    /// Tax at [`INCOME_TAX_RATE`] on a positive pre-tax profit.
    pub income_tax: Decimal,
    /// Pre-tax profit minus tax.
    pub net_profit: Decimal,
}

/// One account line with its share of revenue.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatementLine {
    /// Account name.
    pub label: String,
    /// Amount as presented.
    pub amount: Decimal,
    /// Share of total revenue, percent.
    pub vertical_percent: Decimal,
}

impl IncomeStatement {
    /// Cumulative statement from one snapshot.
    #[must_use]
    pub fn from_snapshot(snapshot: &PeriodSnapshot) -> Self {
        Self::from_accounts(&snapshot.accounts, snapshot.as_of)
    }

    /// Activity between two cumulative snapshots (`current - prior`).
    ///
    /// Accounts are matched by ID; an account missing from one side counts
    /// as zero there.
    #[must_use]
    pub fn period_activity(current: &PeriodSnapshot, prior: &PeriodSnapshot) -> Self {
        let prior_by_id: HashMap<AccountId, Decimal> = prior
            .accounts
            .iter()
            .map(|a| (a.account_id, a.balance))
            .collect();
        let current_ids: HashSet<AccountId> =
            current.accounts.iter().map(|a| a.account_id).collect();

        let mut deltas: Vec<AccountBalance> = current
            .accounts
            .iter()
            .filter(|a| a.account_type.is_flow())
            .map(|a| AccountBalance {
                balance: a.balance - prior_by_id.get(&a.account_id).copied().unwrap_or_default(),
                ..a.clone()
            })
            .collect();

        deltas.extend(
            prior
                .accounts
                .iter()
                .filter(|a| a.account_type.is_flow() && !current_ids.contains(&a.account_id))
                .map(|a| AccountBalance {
                    balance: -a.balance,
                    ..a.clone()
                }),
        );

        Self::from_accounts(&deltas, None)
    }

    fn from_accounts(accounts: &[AccountBalance], as_of: Option<NaiveDate>) -> Self {
        let revenue = GroupedAccounts::build(accounts, AccountType::Revenue);
        let cost_of_sales = GroupedAccounts::build(accounts, AccountType::Cost);
        let operating_expenses =
            GroupedAccounts::build(accounts, AccountType::Expense).into_display_order();

        let total_revenue = revenue.display_total();
        let total_cost_of_sales = cost_of_sales.display_total();
        let total_operating_expenses = operating_expenses.display_total();

        let gross_profit = total_revenue - total_cost_of_sales;
        let pre_tax_profit = gross_profit - total_operating_expenses;
        let income_tax = income_tax(pre_tax_profit);
        let net_profit = pre_tax_profit - income_tax;

        Self {
            as_of,
            revenue,
            cost_of_sales,
            operating_expenses,
            total_revenue,
            total_cost_of_sales,
            total_operating_expenses,
            gross_profit,
            pre_tax_profit,
            income_tax,
            net_profit,
        }
    }

    /// `value` as a percentage of total revenue; `0` without revenue.
    #[must_use]
    pub fn vertical_percent(&self, value: Decimal) -> Decimal {
        round_percent(percent_of(value, self.total_revenue))
    }

    /// Per-account lines of a section, amounts as presented.
    #[must_use]
    pub fn account_lines(&self, section: &GroupedAccounts) -> Vec<StatementLine> {
        section
            .accounts()
            .map(|a| {
                let amount = a.display_balance();
                StatementLine {
                    label: a.account_name.clone(),
                    amount,
                    vertical_percent: self.vertical_percent(amount),
                }
            })
            .collect()
    }

    fn sections(&self) -> [(&'static str, &GroupedAccounts); 3] {
        [
            (REVENUE, &self.revenue),
            (COST_OF_SALES, &self.cost_of_sales),
            (OPERATING_EXPENSES, &self.operating_expenses),
        ]
    }

    /// Per-account lines of the section behind a summary row; empty for
    /// computed rows such as gross profit.
    #[must_use]
    pub fn lines_for(&self, summary_label: &str) -> Vec<StatementLine> {
        self.sections()
            .into_iter()
            .find(|(label, _)| *label == summary_label)
            .map(|(_, section)| self.account_lines(section))
            .unwrap_or_default()
    }

    fn summary(&self) -> [(&'static str, Decimal); 7] {
        [
            (REVENUE, self.total_revenue),
            (COST_OF_SALES, self.total_cost_of_sales),
            ("Utilidad Bruta", self.gross_profit),
            (OPERATING_EXPENSES, self.total_operating_expenses),
            ("Utilidad antes de Impuestos", self.pre_tax_profit),
            ("Impuesto sobre la Renta (30%)", self.income_tax),
            ("Utilidad Neta", self.net_profit),
        ]
    }
}

/// A comparative statement row with vertical and horizontal analysis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComparativeLine {
    /// Row label.
    pub label: String,
    /// Current amount.
    pub current_value: Decimal,
    /// Current amount as % of current revenue.
    pub current_percent: Decimal,
    /// Prior amount (`0` without a prior statement).
    pub prior_value: Decimal,
    /// Prior amount as % of prior revenue.
    pub prior_percent: Decimal,
    /// `current - prior` (`0` without a prior statement).
    pub abs_change: Decimal,
    /// Change relative to the prior magnitude; `None` renders as `---`.
    pub rel_change_percent: Option<Decimal>,
}

/// Income statement compared against an optional prior statement.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComparativeIncomeStatement {
    /// Whether a prior statement was supplied.
    pub has_comparison: bool,
    /// Summary rows, revenue down to net profit.
    pub lines: Vec<ComparativeLine>,
}

impl ComparativeIncomeStatement {
    /// Builds the comparison.
    ///
    /// Horizontal analysis only applies between two independently computed
    /// statements; without `prior`, the prior columns stay at zero and the
    /// relative change is `None`.
    #[must_use]
    pub fn build(current: &IncomeStatement, prior: Option<&IncomeStatement>) -> Self {
        let prior_summary = prior.map(IncomeStatement::summary);

        let lines = current
            .summary()
            .into_iter()
            .enumerate()
            .map(|(i, (label, current_value))| {
                let current_percent = current.vertical_percent(current_value);
                match (prior, &prior_summary) {
                    (Some(prior), Some(summary)) => {
                        let prior_value = summary[i].1;
                        let abs_change = current_value - prior_value;
                        let rel_change_percent = (!prior_value.is_zero())
                            .then(|| round_percent(percent_of(abs_change, prior_value.abs())));
                        ComparativeLine {
                            label: label.to_string(),
                            current_value,
                            current_percent,
                            prior_value,
                            prior_percent: prior.vertical_percent(prior_value),
                            abs_change,
                            rel_change_percent,
                        }
                    }
                    _ => ComparativeLine {
                        label: label.to_string(),
                        current_value,
                        current_percent,
                        prior_value: Decimal::ZERO,
                        prior_percent: Decimal::ZERO,
                        abs_change: Decimal::ZERO,
                        rel_change_percent: None,
                    },
                }
            })
            .collect();

        Self {
            has_comparison: prior.is_some(),
            lines,
        }
    }

    /// Looks up a row by label.
    #[must_use]
    pub fn line(&self, label: &str) -> Option<&ComparativeLine> {
        self.lines.iter().find(|l| l.label == label)
    }
}
