//! Financial ratio analysis, benchmark scoring and DuPont decomposition.
//!
//! Balance figures come from the snapshots (display sign); flow figures come
//! from the window's income statement. Every division is guarded: a zero
//! denominator yields `0`.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use super::calc::{average, percent_of, safe_div};
use super::income_statement::IncomeStatement;
use crate::ledger::{AccountRole, AccountType, GroupedAccounts, PeriodSnapshot, SubtypeClass};

/// Days in the commercial year used for "days of" ratios.
pub const COMMERCIAL_YEAR_DAYS: Decimal = Decimal::from_parts(360, 0, 0, false, 0);

/// Fixed industry-average benchmarks.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndustryBenchmarks {
    /// Current ratio.
    pub current_ratio: Decimal,
    /// Quick ratio.
    pub quick_ratio: Decimal,
    /// Inventory turnover (times).
    pub inventory_turnover: Decimal,
    /// Receivables turnover (times).
    pub receivables_turnover: Decimal,
    /// Fixed-asset turnover (times).
    pub fixed_asset_turnover: Decimal,
    /// Total-asset turnover (times).
    pub total_asset_turnover: Decimal,
    /// Liabilities over assets.
    pub debt_ratio: Decimal,
    /// Liabilities over equity.
    pub debt_to_equity: Decimal,
    /// Gross margin, percent.
    pub gross_margin: Decimal,
    /// Operating margin, percent.
    pub operating_margin: Decimal,
    /// Net margin, percent.
    pub net_margin: Decimal,
    /// Return on assets, percent.
    pub return_on_assets: Decimal,
    /// Return on equity, percent.
    pub return_on_equity: Decimal,
}

impl Default for IndustryBenchmarks {
    fn default() -> Self {
        Self {
            current_ratio: dec!(1.5),
            quick_ratio: dec!(1.0),
            inventory_turnover: dec!(6),
            receivables_turnover: dec!(8),
            fixed_asset_turnover: dec!(2),
            total_asset_turnover: dec!(1),
            debt_ratio: dec!(0.5),
            debt_to_equity: dec!(1.0),
            gross_margin: dec!(35),
            operating_margin: dec!(12),
            net_margin: dec!(8),
            return_on_assets: dec!(6),
            return_on_equity: dec!(15),
        }
    }
}

/// Category health bucket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HealthStatus {
    /// Score above 90.
    Excellent,
    /// Score above 75.
    Healthy,
    /// Score above 50.
    Acceptable,
    /// Anything else.
    AtRisk,
}

impl HealthStatus {
    /// Buckets a 0 to 100 score.
    #[must_use]
    pub fn from_score(score: Decimal) -> Self {
        if score > dec!(90) {
            Self::Excellent
        } else if score > dec!(75) {
            Self::Healthy
        } else if score > dec!(50) {
            Self::Acceptable
        } else {
            Self::AtRisk
        }
    }

    /// Presentation label.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Excellent => "Excelente",
            Self::Healthy => "Saludable",
            Self::Acceptable => "Aceptable",
            Self::AtRisk => "En Riesgo",
        }
    }
}

/// Closeness of a ratio to its benchmark, 0 to 100.
///
/// `max(0, 100 - |value - benchmark| / benchmark * 100)`; `0` for a zero
/// benchmark.
#[must_use]
pub fn benchmark_score(value: Decimal, benchmark: Decimal) -> Decimal {
    if benchmark.is_zero() {
        return Decimal::ZERO;
    }
    let deviation = percent_of((value - benchmark).abs(), benchmark.abs());
    (Decimal::ONE_HUNDRED - deviation).max(Decimal::ZERO)
}

fn mean(scores: &[Decimal]) -> Decimal {
    if scores.is_empty() {
        return Decimal::ZERO;
    }
    scores.iter().copied().sum::<Decimal>() / Decimal::from(scores.len())
}

/// Score, bucket and reading for one category.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryScore {
    /// Unweighted mean of the category's ratio scores, 2 dp.
    pub score: Decimal,
    /// Health bucket.
    pub status: HealthStatus,
    /// Short reading for the analyst.
    pub interpretation: String,
}

impl CategoryScore {
    fn new(score: Decimal, readings: [&str; 4]) -> Self {
        let status = HealthStatus::from_score(score);
        let interpretation = match status {
            HealthStatus::Excellent => readings[0],
            HealthStatus::Healthy => readings[1],
            HealthStatus::Acceptable => readings[2],
            HealthStatus::AtRisk => readings[3],
        };

        Self {
            score: score.round_dp(2),
            status,
            interpretation: interpretation.to_string(),
        }
    }
}

/// Short-term solvency.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LiquidityRatios {
    /// Current assets / current liabilities.
    pub current_ratio: Decimal,
    /// (Current assets - inventory) / current liabilities.
    pub quick_ratio: Decimal,
    /// Current assets - current liabilities.
    pub net_working_capital: Decimal,
    /// (Receivables + inventory) - payables.
    pub net_operating_capital: Decimal,
}

/// Asset efficiency over the window, on average balances.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActivityRatios {
    /// Cost of sales / average inventory.
    pub inventory_turnover: Decimal,
    /// 360 / inventory turnover.
    pub days_inventory: Decimal,
    /// Revenue / average receivables.
    pub receivables_turnover: Decimal,
    /// 360 / receivables turnover.
    pub days_receivables: Decimal,
    /// Revenue / average non-current assets.
    pub fixed_asset_turnover: Decimal,
    /// Revenue / average total assets.
    pub total_asset_turnover: Decimal,
}

/// Financing structure.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LeverageRatios {
    /// Total liabilities / total assets.
    pub debt_ratio: Decimal,
    /// Total liabilities / total equity.
    pub debt_to_equity: Decimal,
}

/// Returns over the window, percent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProfitabilityRatios {
    /// Gross profit / revenue.
    pub gross_margin: Decimal,
    /// Operating profit / revenue.
    pub operating_margin: Decimal,
    /// Net profit / revenue.
    pub net_margin: Decimal,
    /// Net profit / closing total assets.
    pub return_on_assets: Decimal,
    /// Net profit / closing equity.
    pub return_on_equity: Decimal,
}

/// ROE = net margin × asset turnover × equity multiplier.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DupontAnalysis {
    /// Net margin, percent.
    pub net_margin: Decimal,
    /// Total-asset turnover (times).
    pub asset_turnover: Decimal,
    /// Total assets / total equity.
    pub equity_multiplier: Decimal,
    /// Product of the three factors, percent.
    pub roe: Decimal,
}

impl DupontAnalysis {
    /// Combines the three DuPont factors.
    #[must_use]
    pub fn from_components(
        net_margin: Decimal,
        asset_turnover: Decimal,
        equity_multiplier: Decimal,
    ) -> Self {
        Self {
            net_margin,
            asset_turnover,
            equity_multiplier,
            roe: net_margin * asset_turnover * equity_multiplier,
        }
    }
}

/// Scores per category and overall.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RatioScores {
    /// Liquidity score.
    pub liquidity: CategoryScore,
    /// Activity score (reported, not part of the overall score).
    pub activity: CategoryScore,
    /// Leverage score.
    pub leverage: CategoryScore,
    /// Profitability score.
    pub profitability: CategoryScore,
    /// Mean of liquidity, leverage and profitability.
    pub overall: CategoryScore,
}

/// Full ratio analysis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RatioReport {
    /// Liquidity ratios.
    pub liquidity: LiquidityRatios,
    /// Activity ratios.
    pub activity: ActivityRatios,
    /// Leverage ratios.
    pub leverage: LeverageRatios,
    /// Profitability ratios.
    pub profitability: ProfitabilityRatios,
    /// DuPont decomposition of ROE.
    pub dupont: DupontAnalysis,
    /// Benchmark scores.
    pub scores: RatioScores,
    /// Benchmarks the scores were computed against.
    pub benchmarks: IndustryBenchmarks,
}

/// Balance figures of one snapshot, display sign.
struct BalanceFigures {
    current_assets: Decimal,
    current_liabilities: Decimal,
    fixed_assets: Decimal,
    total_assets: Decimal,
    total_liabilities: Decimal,
    total_equity: Decimal,
    inventory: Decimal,
    receivables: Decimal,
    payables: Decimal,
}

impl BalanceFigures {
    fn from_snapshot(snapshot: &PeriodSnapshot) -> Self {
        let assets = GroupedAccounts::build(&snapshot.accounts, AccountType::Asset);
        let liabilities = GroupedAccounts::build(&snapshot.accounts, AccountType::Liability);

        Self {
            current_assets: assets.display_total_for_class(SubtypeClass::Current),
            current_liabilities: liabilities.display_total_for_class(SubtypeClass::Current),
            fixed_assets: assets.display_total_for_class(SubtypeClass::NonCurrent),
            total_assets: assets.display_total(),
            total_liabilities: liabilities.display_total(),
            total_equity: snapshot.display_total_by_type(AccountType::Equity),
            inventory: snapshot.role_balance(AccountRole::Inventory),
            receivables: snapshot.role_balance(AccountRole::AccountsReceivable),
            payables: snapshot.role_balance(AccountRole::AccountsPayable),
        }
    }
}

impl RatioReport {
    /// Computes ratios, scores and DuPont for a window.
    ///
    /// `period` must be the window's activity
    /// ([`IncomeStatement::period_activity`]), not a cumulative statement.
    #[must_use]
    pub fn compute(
        current: &PeriodSnapshot,
        prior: &PeriodSnapshot,
        period: &IncomeStatement,
        benchmarks: &IndustryBenchmarks,
    ) -> Self {
        let now = BalanceFigures::from_snapshot(current);
        let before = BalanceFigures::from_snapshot(prior);

        let liquidity = LiquidityRatios {
            current_ratio: safe_div(now.current_assets, now.current_liabilities),
            quick_ratio: safe_div(now.current_assets - now.inventory, now.current_liabilities),
            net_working_capital: now.current_assets - now.current_liabilities,
            net_operating_capital: now.receivables + now.inventory - now.payables,
        };

        let revenue = period.total_revenue;
        let inventory_turnover = safe_div(
            period.total_cost_of_sales,
            average(now.inventory, before.inventory),
        );
        let receivables_turnover =
            safe_div(revenue, average(now.receivables, before.receivables));
        let activity = ActivityRatios {
            inventory_turnover,
            days_inventory: safe_div(COMMERCIAL_YEAR_DAYS, inventory_turnover),
            receivables_turnover,
            days_receivables: safe_div(COMMERCIAL_YEAR_DAYS, receivables_turnover),
            fixed_asset_turnover: safe_div(revenue, average(now.fixed_assets, before.fixed_assets)),
            total_asset_turnover: safe_div(revenue, average(now.total_assets, before.total_assets)),
        };

        let leverage = LeverageRatios {
            debt_ratio: safe_div(now.total_liabilities, now.total_assets),
            debt_to_equity: safe_div(now.total_liabilities, now.total_equity),
        };

        let profitability = ProfitabilityRatios {
            gross_margin: percent_of(period.gross_profit, revenue),
            operating_margin: percent_of(period.pre_tax_profit, revenue),
            net_margin: percent_of(period.net_profit, revenue),
            return_on_assets: percent_of(period.net_profit, now.total_assets),
            return_on_equity: percent_of(period.net_profit, now.total_equity),
        };

        let dupont = DupontAnalysis::from_components(
            profitability.net_margin,
            activity.total_asset_turnover,
            safe_div(now.total_assets, now.total_equity),
        );

        let scores = score(&liquidity, &activity, &leverage, &profitability, benchmarks);

        Self {
            liquidity,
            activity,
            leverage,
            profitability,
            dupont,
            scores,
            benchmarks: benchmarks.clone(),
        }
    }
}

fn score(
    liquidity: &LiquidityRatios,
    activity: &ActivityRatios,
    leverage: &LeverageRatios,
    profitability: &ProfitabilityRatios,
    b: &IndustryBenchmarks,
) -> RatioScores {
    let liquidity_score = mean(&[
        benchmark_score(liquidity.current_ratio, b.current_ratio),
        benchmark_score(liquidity.quick_ratio, b.quick_ratio),
    ]);
    let activity_score = mean(&[
        benchmark_score(activity.inventory_turnover, b.inventory_turnover),
        benchmark_score(activity.receivables_turnover, b.receivables_turnover),
        benchmark_score(activity.fixed_asset_turnover, b.fixed_asset_turnover),
        benchmark_score(activity.total_asset_turnover, b.total_asset_turnover),
    ]);
    let leverage_score = mean(&[
        benchmark_score(leverage.debt_ratio, b.debt_ratio),
        benchmark_score(leverage.debt_to_equity, b.debt_to_equity),
    ]);
    let profitability_score = mean(&[
        benchmark_score(profitability.gross_margin, b.gross_margin),
        benchmark_score(profitability.operating_margin, b.operating_margin),
        benchmark_score(profitability.net_margin, b.net_margin),
        benchmark_score(profitability.return_on_assets, b.return_on_assets),
        benchmark_score(profitability.return_on_equity, b.return_on_equity),
    ]);
    let overall_score = mean(&[liquidity_score, leverage_score, profitability_score]);

    RatioScores {
        liquidity: CategoryScore::new(
            liquidity_score,
            [
                "Cubre holgadamente sus obligaciones de corto plazo.",
                "Liquidez adecuada para atender sus pasivos corrientes.",
                "Liquidez ajustada; vigile el capital de trabajo.",
                "Riesgo de no cubrir los pasivos corrientes.",
            ],
        ),
        activity: CategoryScore::new(
            activity_score,
            [
                "Rotación de activos en línea con la industria.",
                "Uso eficiente de inventarios y cartera.",
                "Rotación lenta en parte de los activos.",
                "Activos ociosos o cartera e inventario estancados.",
            ],
        ),
        leverage: CategoryScore::new(
            leverage_score,
            [
                "Estructura de financiamiento equilibrada.",
                "Endeudamiento dentro de rangos prudentes.",
                "Endeudamiento alejado del promedio de la industria.",
                "Estructura de deuda de alto riesgo.",
            ],
        ),
        profitability: CategoryScore::new(
            profitability_score,
            [
                "Márgenes y retornos a la par de la industria.",
                "Rentabilidad sana.",
                "Rentabilidad por debajo del promedio.",
                "Márgenes insuficientes o pérdidas.",
            ],
        ),
        overall: CategoryScore::new(
            overall_score,
            [
                "Situación financiera excelente.",
                "Situación financiera saludable.",
                "Situación financiera aceptable con áreas de mejora.",
                "Situación financiera en riesgo.",
            ],
        ),
    }
}
