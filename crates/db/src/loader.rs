//! Fetches everything one reporting run needs.

use balanza_core::ledger::{ReportPeriod, SnapshotPair};
use balanza_core::reports::{IncomeStatement, TrialBalanceReport};
use balanza_shared::types::CompanyId;
use chrono::Days;
use tracing::debug;

use crate::error::StoreError;
use crate::store::BalanceStore;

/// Loads snapshot pairs and trial balances from a [`BalanceStore`].
pub struct SnapshotLoader<S> {
    store: S,
}

impl<S: BalanceStore> SnapshotLoader<S> {
    /// Wraps a store.
    #[must_use]
    pub const fn new(store: S) -> Self {
        Self { store }
    }

    /// Fetches the closing snapshot and the prior snapshot (day before
    /// opening) concurrently. Reports are only computed once both arrived.
    pub async fn load_pair(
        &self,
        company_id: CompanyId,
        period: ReportPeriod,
    ) -> Result<SnapshotPair, StoreError> {
        let (current, prior) = tokio::try_join!(
            self.store.balances_as_of(company_id, period.closing),
            self.store.balances_as_of(company_id, period.prior_cutoff()),
        )?;

        debug!(
            company_id = %company_id,
            current_rows = current.accounts.len(),
            prior_rows = prior.accounts.len(),
            "Loaded snapshot pair"
        );
        Ok(SnapshotPair::new(company_id, period, current, prior))
    }

    /// Fetches the trial balance for the window.
    pub async fn load_trial_balance(
        &self,
        company_id: CompanyId,
        period: ReportPeriod,
    ) -> Result<TrialBalanceReport, StoreError> {
        self.store.trial_balance(company_id, period).await
    }

    /// Activity of the window of equal length that ends the day before
    /// `period` opens, for horizontal analysis.
    ///
    /// Returns `None` when that window falls outside the calendar.
    pub async fn load_previous_window(
        &self,
        company_id: CompanyId,
        period: ReportPeriod,
    ) -> Result<Option<IncomeStatement>, StoreError> {
        let Some(previous) = previous_window(period) else {
            return Ok(None);
        };

        let pair = self.load_pair(company_id, previous).await?;
        Ok(Some(IncomeStatement::period_activity(&pair.current, &pair.prior)))
    }
}

/// Window of the same number of days ending the day before `period.opening`.
#[must_use]
pub fn previous_window(period: ReportPeriod) -> Option<ReportPeriod> {
    let length = u64::try_from((period.closing - period.opening).num_days()).ok()?;
    let closing = period.prior_cutoff();
    let opening = closing.checked_sub_days(Days::new(length))?;
    ReportPeriod::new(opening, closing).ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_previous_window_same_length() {
        let period = ReportPeriod::new(date(2025, 4, 1), date(2025, 6, 30)).unwrap();
        let previous = previous_window(period).unwrap();

        assert_eq!(previous.closing, date(2025, 3, 31));
        assert_eq!(previous.opening, date(2024, 12, 31));
        assert_eq!(
            (previous.closing - previous.opening).num_days(),
            (period.closing - period.opening).num_days()
        );
    }

    #[test]
    fn test_previous_window_single_day() {
        let period = ReportPeriod::new(date(2025, 3, 1), date(2025, 3, 1)).unwrap();
        let previous = previous_window(period).unwrap();
        assert_eq!(previous.opening, date(2025, 2, 28));
        assert_eq!(previous.closing, date(2025, 2, 28));
    }
}
