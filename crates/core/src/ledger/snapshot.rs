//! Period snapshots: the full set of balances as of a cut-off date.

use balanza_shared::types::CompanyId;
use chrono::{Days, NaiveDate};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::{AccountBalance, AccountRole, AccountType};
use crate::reports::ReportError;

/// Reporting window.
///
/// The closing snapshot is taken as of `closing`; the prior snapshot as of
/// the day before `opening`, so flow-account activity inside the window is
/// `current - prior`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportPeriod {
    /// First day of the window.
    pub opening: NaiveDate,
    /// Last day of the window.
    pub closing: NaiveDate,
}

impl ReportPeriod {
    /// Creates a reporting window.
    ///
    /// # Errors
    ///
    /// Returns `InvalidDateRange` if `opening` is after `closing`, or
    /// `DateOutOfRange` if there is no day before `opening`.
    pub fn new(opening: NaiveDate, closing: NaiveDate) -> Result<Self, ReportError> {
        if opening > closing {
            return Err(ReportError::InvalidDateRange {
                start: opening,
                end: closing,
            });
        }
        if opening.checked_sub_days(Days::new(1)).is_none() {
            return Err(ReportError::DateOutOfRange(opening));
        }
        Ok(Self { opening, closing })
    }

    /// Cut-off date of the prior snapshot (day before opening).
    #[must_use]
    pub fn prior_cutoff(&self) -> NaiveDate {
        self.opening
            .checked_sub_days(Days::new(1))
            .unwrap_or(self.opening)
    }
}

/// All account balances as of one cut-off date.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PeriodSnapshot {
    /// Cut-off date.
    pub as_of: Option<NaiveDate>,
    /// One row per account.
    pub accounts: Vec<AccountBalance>,
}

impl PeriodSnapshot {
    /// Creates a snapshot.
    #[must_use]
    pub const fn new(as_of: NaiveDate, accounts: Vec<AccountBalance>) -> Self {
        Self {
            as_of: Some(as_of),
            accounts,
        }
    }

    /// A snapshot with no rows ("no activity").
    #[must_use]
    pub const fn empty() -> Self {
        Self {
            as_of: None,
            accounts: Vec::new(),
        }
    }

    /// Accounts of the given type, in input order.
    pub fn of_type(&self, account_type: AccountType) -> impl Iterator<Item = &AccountBalance> {
        self.accounts
            .iter()
            .filter(move |a| a.account_type == account_type)
    }

    /// Sum of stored balances for a type.
    #[must_use]
    pub fn total_by_type(&self, account_type: AccountType) -> Decimal {
        self.of_type(account_type).map(|a| a.balance).sum()
    }

    /// Sum of display values for a type.
    #[must_use]
    pub fn display_total_by_type(&self, account_type: AccountType) -> Decimal {
        account_type
            .normal_balance()
            .display_value(self.total_by_type(account_type))
    }

    /// Sum of display values of every account carrying `role`; `0` if none.
    #[must_use]
    pub fn role_balance(&self, role: AccountRole) -> Decimal {
        self.accounts
            .iter()
            .filter(|a| a.has_role(role))
            .map(AccountBalance::display_balance)
            .sum()
    }
}

/// The current/prior snapshot pair every report is computed from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SnapshotPair {
    /// Company the snapshots belong to.
    pub company_id: CompanyId,
    /// Reporting window.
    pub period: ReportPeriod,
    /// Balances as of the closing date.
    pub current: PeriodSnapshot,
    /// Balances as of the day before the opening date.
    pub prior: PeriodSnapshot,
}

impl SnapshotPair {
    /// Bundles two snapshots for a company and window.
    #[must_use]
    pub const fn new(
        company_id: CompanyId,
        period: ReportPeriod,
        current: PeriodSnapshot,
        prior: PeriodSnapshot,
    ) -> Self {
        Self {
            company_id,
            period,
            current,
            prior,
        }
    }
}
