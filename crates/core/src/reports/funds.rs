//! Source and application of funds.
//!
//! Compares each balance-sheet account between the two snapshots and
//! classifies the change in magnitude as a source (resources freed or
//! raised) or an application (resources used).

use std::collections::{HashMap, HashSet};

use balanza_shared::types::AccountId;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::calc::{TOLERANCE, within_tolerance};
use crate::ledger::{AccountBalance, AccountRole, AccountType, GroupedAccounts, PeriodSnapshot};

/// Label of the synthetic net-profit line.
pub const NET_PROFIT_LABEL: &str = "Utilidad Neta";

const BALANCE_SHEET_TYPES: [AccountType; 3] =
    [AccountType::Asset, AccountType::Liability, AccountType::Equity];

/// Direction of a variation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FundsClass {
    /// Origin of funds.
    Source,
    /// Use of funds.
    Application,
}

impl FundsClass {
    /// Classifies a variation in magnitude (`|current| - |prior|`).
    ///
    /// - Ordinary asset: growth uses funds.
    /// - Contra asset (accumulated depreciation): growth is a non-cash
    ///   add-back, a source.
    /// - Liability, equity and net profit: growth raises funds.
    #[must_use]
    pub fn classify(account_type: AccountType, is_contra: bool, variation: Decimal) -> Self {
        let grows = variation > Decimal::ZERO;
        let growth_is_source = match account_type {
            AccountType::Asset => is_contra,
            _ => true,
        };

        if grows == growth_is_source {
            Self::Source
        } else {
            Self::Application
        }
    }
}

/// One classified variation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FundsLine {
    /// Account name, or [`NET_PROFIT_LABEL`].
    pub label: String,
    /// Account ID; `None` for the net-profit line.
    pub account_id: Option<AccountId>,
    /// Type the rule was applied under (net profit counts as equity).
    pub account_type: AccountType,
    /// Signed variation in magnitude.
    pub variance: Decimal,
    /// Classification.
    pub class: FundsClass,
    /// `|variance|` when a source, else `0`.
    pub source_amount: Decimal,
    /// `|variance|` when an application, else `0`.
    pub application_amount: Decimal,
}

impl FundsLine {
    fn new(
        label: String,
        account_id: Option<AccountId>,
        account_type: AccountType,
        is_contra: bool,
        variance: Decimal,
    ) -> Self {
        let class = FundsClass::classify(account_type, is_contra, variance);
        let (source_amount, application_amount) = match class {
            FundsClass::Source => (variance.abs(), Decimal::ZERO),
            FundsClass::Application => (Decimal::ZERO, variance.abs()),
        };

        Self {
            label,
            account_id,
            account_type,
            variance,
            class,
            source_amount,
            application_amount,
        }
    }
}

/// Source and application of funds statement.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FundsReport {
    /// Lines: assets, liabilities, equity, then net profit.
    pub lines: Vec<FundsLine>,
    /// Sum of sources.
    pub total_source: Decimal,
    /// Sum of applications.
    pub total_application: Decimal,
    /// `total_source - total_application`. Not expected to be zero; a large
    /// value is a diagnostic signal for the analyst.
    pub imbalance: Decimal,
}

impl FundsReport {
    /// Classifies every balance-sheet account whose magnitude moved by at
    /// least one cent, plus the change in net profit.
    ///
    /// Accounts are matched by ID across subtype groups; an account present
    /// in one snapshot only counts as zero in the other.
    #[must_use]
    pub fn compute(
        current: &PeriodSnapshot,
        prior: &PeriodSnapshot,
        net_profit_current: Decimal,
        net_profit_prior: Decimal,
    ) -> Self {
        let mut lines = Vec::new();

        for account_type in BALANCE_SHEET_TYPES {
            let current_groups = GroupedAccounts::build(&current.accounts, account_type);
            let prior_groups = GroupedAccounts::build(&prior.accounts, account_type);
            let prior_by_id: HashMap<AccountId, Decimal> = prior_groups
                .accounts()
                .map(|a| (a.account_id, a.balance))
                .collect();
            let current_ids: HashSet<AccountId> =
                current_groups.accounts().map(|a| a.account_id).collect();

            for account in current_groups.accounts() {
                let prior_balance = prior_by_id
                    .get(&account.account_id)
                    .copied()
                    .unwrap_or_default();
                push_variation(&mut lines, account, account.balance, prior_balance);
            }

            for account in prior_groups
                .accounts()
                .filter(|a| !current_ids.contains(&a.account_id))
            {
                push_variation(&mut lines, account, Decimal::ZERO, account.balance);
            }
        }

        let net_profit_change = net_profit_current - net_profit_prior;
        if net_profit_change.abs() >= TOLERANCE {
            lines.push(FundsLine::new(
                NET_PROFIT_LABEL.to_string(),
                None,
                AccountType::Equity,
                false,
                net_profit_change,
            ));
        }

        let total_source: Decimal = lines.iter().map(|l| l.source_amount).sum();
        let total_application: Decimal = lines.iter().map(|l| l.application_amount).sum();

        Self {
            lines,
            total_source,
            total_application,
            imbalance: total_source - total_application,
        }
    }

    /// Whether the imbalance is fully covered by income tax accrued over the
    /// window. Net profit is after tax, so unposted tax leaves the sources
    /// short by exactly that amount.
    #[must_use]
    pub fn is_explained_by(&self, accrued_tax: Decimal) -> bool {
        within_tolerance(self.imbalance + accrued_tax, Decimal::ZERO)
    }
}

fn push_variation(
    lines: &mut Vec<FundsLine>,
    account: &AccountBalance,
    current_balance: Decimal,
    prior_balance: Decimal,
) {
    let variation = current_balance.abs() - prior_balance.abs();
    if variation.abs() < TOLERANCE {
        return;
    }

    lines.push(FundsLine::new(
        account.account_name.clone(),
        Some(account.account_id),
        account.account_type,
        account.has_role(AccountRole::ContraAsset),
        variation,
    ));
}
