//! Reconciliation diagnostics.
//!
//! Mismatches are posting problems upstream. They are logged for the analyst
//! and never corrected.

use balanza_core::reports::{FinancialReports, TrialBalanceReport};
use tracing::{info, warn};

/// Logs a summary of every report and a warning for each failed check.
/// Returns the number of warnings.
pub fn log_diagnostics(
    reports: &FinancialReports,
    trial_balance: Option<&TrialBalanceReport>,
) -> usize {
    let mut warnings = 0;

    let sheet = &reports.balance_sheet;
    info!(
        total_assets = %sheet.total_assets,
        liabilities_and_equity = %sheet.display_liabilities_and_equity(),
        "Balance sheet"
    );
    if !sheet.is_balanced {
        warnings += 1;
        warn!(imbalance = %sheet.imbalance(), "Balance sheet does not tie out");
    }

    let income = &reports.income_period;
    info!(
        revenue = %income.total_revenue,
        pre_tax_profit = %income.pre_tax_profit,
        net_profit = %income.net_profit,
        "Income statement"
    );

    let cash = &reports.cash_flow;
    info!(
        operations = %cash.cash_from_operations,
        investing = %cash.cash_from_investing,
        financing = %cash.cash_from_financing,
        closing_cash = %cash.closing_cash,
        "Cash flow"
    );
    if !cash.is_explained() {
        warnings += 1;
        warn!(
            computed = %cash.closing_cash,
            recorded = %cash.closing_cash_actual,
            difference = %cash.difference,
            accrued_tax = %cash.accrued_tax,
            unexplained = %cash.unexplained_difference,
            "Cash flow does not reconcile with recorded cash"
        );
    } else if !cash.is_reconciled {
        info!(
            difference = %cash.difference,
            accrued_tax = %cash.accrued_tax,
            "Cash difference matches the unposted income tax"
        );
    }

    let funds = &reports.funds;
    info!(
        lines = funds.lines.len(),
        total_source = %funds.total_source,
        total_application = %funds.total_application,
        "Source and application of funds"
    );
    if !funds.is_explained_by(cash.accrued_tax) {
        warnings += 1;
        warn!(
            imbalance = %funds.imbalance,
            accrued_tax = %cash.accrued_tax,
            "Sources and applications differ"
        );
    }

    let scores = &reports.ratios.scores;
    info!(
        overall = %scores.overall.score,
        status = scores.overall.status.label(),
        "Ratio analysis"
    );

    if let Some(trial_balance) = trial_balance {
        let totals = &trial_balance.totals;
        info!(
            rows = trial_balance.rows.len(),
            debit = %totals.debit,
            credit = %totals.credit,
            "Trial balance"
        );
        if !totals.movements_balanced {
            warnings += 1;
            warn!(debit = %totals.debit, credit = %totals.credit, "Trial balance movements differ");
        }
        for row in trial_balance.inconsistent_rows() {
            warnings += 1;
            warn!(
                account = %row.account_name,
                opening = %row.opening_balance,
                closing = %row.closing_balance,
                "Closing balance does not follow from movements"
            );
        }
    }

    warnings
}

#[cfg(test)]
mod tests {
    use super::*;
    use balanza_core::ledger::{
        AccountBalance, AccountType, PeriodSnapshot, ReportPeriod, SnapshotPair,
    };
    use balanza_core::reports::{ReportService, TrialBalanceRow};
    use balanza_shared::types::{AccountId, CompanyId};
    use chrono::NaiveDate;
    use rust_decimal_macros::dec;

    fn pair(cash: rust_decimal::Decimal) -> SnapshotPair {
        let period = ReportPeriod::new(
            NaiveDate::from_ymd_opt(2025, 1, 1).unwrap(),
            NaiveDate::from_ymd_opt(2025, 1, 31).unwrap(),
        )
        .unwrap();
        let current = PeriodSnapshot::new(
            period.closing,
            vec![
                AccountBalance::new(AccountId(1), "Caja", AccountType::Asset, None, cash),
                AccountBalance::new(
                    AccountId(2),
                    "Capital Social",
                    AccountType::Equity,
                    None,
                    dec!(-1000),
                ),
            ],
        );
        SnapshotPair::new(CompanyId(1), period, current, PeriodSnapshot::empty())
    }

    #[test]
    fn test_consistent_books_have_no_warnings() {
        let reports = ReportService::build(&pair(dec!(1000)), None);
        // Capital raised and cash received are one source and one application.
        assert_eq!(log_diagnostics(&reports, None), 0);
    }

    #[test]
    fn test_unposted_tax_alone_is_not_a_warning() {
        let period = ReportPeriod::new(
            NaiveDate::from_ymd_opt(2025, 1, 1).unwrap(),
            NaiveDate::from_ymd_opt(2025, 1, 31).unwrap(),
        )
        .unwrap();
        let current = PeriodSnapshot::new(
            period.closing,
            vec![
                AccountBalance::new(AccountId(1), "Caja", AccountType::Asset, None, dec!(1000)),
                AccountBalance::new(
                    AccountId(2),
                    "Capital Social",
                    AccountType::Equity,
                    None,
                    dec!(-500),
                ),
                AccountBalance::new(AccountId(3), "Ventas", AccountType::Revenue, None, dec!(-500)),
            ],
        );
        let pair = SnapshotPair::new(CompanyId(1), period, current, PeriodSnapshot::empty());
        let reports = ReportService::build(&pair, None);

        // Revenue 500 taxed at 150: both tie-outs are short by the tax.
        assert_eq!(reports.cash_flow.difference, dec!(-150));
        assert_eq!(reports.funds.imbalance, dec!(-150));
        assert_eq!(log_diagnostics(&reports, None), 0);
    }

    #[test]
    fn test_each_failed_check_counts() {
        let reports = ReportService::build(&pair(dec!(1200)), None);
        let trial_balance = TrialBalanceReport::new(vec![TrialBalanceRow::new(
            "Caja",
            AccountType::Asset,
            "Other",
            dec!(0),
            dec!(1200),
            dec!(0),
            dec!(1000),
        )]);

        // Balance sheet, cash flow, funds, trial balance movements, one row.
        assert_eq!(log_diagnostics(&reports, Some(&trial_balance)), 5);
    }
}
