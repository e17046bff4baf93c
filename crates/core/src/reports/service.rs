//! Report generation service.

use balanza_shared::types::CompanyId;
use serde::{Deserialize, Serialize};

use super::balance_sheet::BalanceSheetReport;
use super::cash_flow::CashFlowReport;
use super::funds::FundsReport;
use super::income_statement::{ComparativeIncomeStatement, IncomeStatement};
use super::ratios::{IndustryBenchmarks, RatioReport};
use crate::ledger::{ReportPeriod, SnapshotPair};

/// Every statement derived from one snapshot pair.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FinancialReports {
    /// Company the reports belong to.
    pub company_id: CompanyId,
    /// Reporting window.
    pub period: ReportPeriod,
    /// Balance sheet at the closing date.
    pub balance_sheet: BalanceSheetReport,
    /// Cumulative income statement at the closing date.
    pub income_current: IncomeStatement,
    /// Cumulative income statement at the prior cut-off.
    pub income_prior: IncomeStatement,
    /// Activity inside the window.
    pub income_period: IncomeStatement,
    /// Window activity compared against an earlier window.
    pub comparative: ComparativeIncomeStatement,
    /// Indirect cash flow over the window.
    pub cash_flow: CashFlowReport,
    /// Source and application of funds over the window.
    pub funds: FundsReport,
    /// Ratios, scores and DuPont.
    pub ratios: RatioReport,
}

/// Service for generating financial reports.
pub struct ReportService;

impl ReportService {
    /// Builds every report against the default industry benchmarks.
    ///
    /// `prior_period` is the activity statement of an earlier window, for
    /// horizontal analysis. Without it the comparative statement carries
    /// no comparison.
    #[must_use]
    pub fn build(pair: &SnapshotPair, prior_period: Option<&IncomeStatement>) -> FinancialReports {
        Self::build_with_benchmarks(pair, prior_period, &IndustryBenchmarks::default())
    }

    /// Builds every report against the given benchmarks.
    #[must_use]
    pub fn build_with_benchmarks(
        pair: &SnapshotPair,
        prior_period: Option<&IncomeStatement>,
        benchmarks: &IndustryBenchmarks,
    ) -> FinancialReports {
        let current = &pair.current;
        let prior = &pair.prior;

        let income_current = IncomeStatement::from_snapshot(current);
        let income_prior = IncomeStatement::from_snapshot(prior);
        let income_period = IncomeStatement::period_activity(current, prior);
        let comparative = ComparativeIncomeStatement::build(&income_period, prior_period);

        let cash_flow = CashFlowReport::compute(
            current,
            prior,
            income_current.net_profit,
            income_prior.net_profit,
        )
        .with_accrued_tax(income_current.income_tax - income_prior.income_tax);
        let funds = FundsReport::compute(
            current,
            prior,
            income_current.net_profit,
            income_prior.net_profit,
        );
        let ratios = RatioReport::compute(current, prior, &income_period, benchmarks);

        FinancialReports {
            company_id: pair.company_id,
            period: pair.period,
            balance_sheet: BalanceSheetReport::from_snapshot(current),
            income_current,
            income_prior,
            income_period,
            comparative,
            cash_flow,
            funds,
            ratios,
        }
    }
}
