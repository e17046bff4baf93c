//! Financial statement generation.
//!
//! Every report is a pure function of a current/prior snapshot pair:
//! - Balance Sheet
//! - Income Statement (cumulative, window activity, comparative)
//! - Cash Flow (indirect method)
//! - Source and Application of Funds
//! - Ratio analysis with DuPont decomposition
//! - Trial Balance

pub mod balance_sheet;
pub mod calc;
pub mod cash_flow;
pub mod error;
pub mod funds;
pub mod income_statement;
pub mod ratios;
pub mod service;
pub mod trial_balance;

#[cfg(test)]
mod tests;

pub use balance_sheet::BalanceSheetReport;
pub use cash_flow::CashFlowReport;
pub use error::ReportError;
pub use funds::{FundsClass, FundsLine, FundsReport, NET_PROFIT_LABEL};
pub use income_statement::{
    ComparativeIncomeStatement, ComparativeLine, INCOME_TAX_RATE, IncomeStatement, StatementLine,
    income_tax,
};
pub use ratios::{
    ActivityRatios, CategoryScore, DupontAnalysis, HealthStatus, IndustryBenchmarks,
    LeverageRatios, LiquidityRatios, ProfitabilityRatios, RatioReport, RatioScores,
    benchmark_score,
};
pub use service::{FinancialReports, ReportService};
pub use trial_balance::{TrialBalanceReport, TrialBalanceRow, TrialBalanceTotals};
