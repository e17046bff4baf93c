//! Property-based tests for the derived statements.

use balanza_shared::types::AccountId;
use proptest::prelude::*;
use rust_decimal::Decimal;

use super::balance_sheet::BalanceSheetReport;
use super::calc::TOLERANCE;
use super::cash_flow::CashFlowReport;
use super::funds::FundsReport;
use super::income_statement::{IncomeStatement, income_tax};
use super::trial_balance::{TrialBalanceReport, TrialBalanceRow};
use crate::ledger::{AccountBalance, AccountType, PeriodSnapshot};

fn cents(max: i64) -> impl Strategy<Value = Decimal> {
    (0..max).prop_map(|c| Decimal::new(c, 2))
}

fn signed_cents(max: i64) -> impl Strategy<Value = Decimal> {
    (-max..max).prop_map(|c| Decimal::new(c, 2))
}

fn row(id: i64, name: &str, t: AccountType, subtype: &str, balance: Decimal) -> AccountBalance {
    AccountBalance::new(AccountId(id), name, t, Some(subtype.to_string()), balance)
}

fn snapshot(rows: Vec<AccountBalance>) -> PeriodSnapshot {
    PeriodSnapshot {
        as_of: None,
        accounts: rows,
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// For a ledger where every window movement is modelled (capital
    /// injection, cash sale, cash cost of sales, stock bought on credit),
    /// the computed closing cash equals the recorded closing cash.
    #[test]
    fn prop_cash_flow_reconciles_for_consistent_ledger(
        opening_cash in cents(10_000_000),
        injection in cents(1_000_000),
        sales in cents(1_000_000),
        cost in cents(1_000_000),
        stock_on_credit in cents(1_000_000),
    ) {
        let prior = snapshot(vec![
            row(1, "Caja", AccountType::Asset, "Activo Corriente", opening_cash),
            row(2, "Capital Social", AccountType::Equity, "Capital", -opening_cash),
        ]);
        let current = snapshot(vec![
            row(
                1,
                "Caja",
                AccountType::Asset,
                "Activo Corriente",
                opening_cash + injection + sales - cost,
            ),
            row(3, "Inventario", AccountType::Asset, "Activo Corriente", stock_on_credit),
            row(4, "Proveedores", AccountType::Liability, "Pasivo Corriente", -stock_on_credit),
            row(2, "Capital Social", AccountType::Equity, "Capital", -(opening_cash + injection)),
            row(5, "Ventas", AccountType::Revenue, "Ingresos", -sales),
            row(6, "Costo de Ventas", AccountType::Cost, "Costos", cost),
        ]);

        let report = CashFlowReport::compute(&current, &prior, sales - cost, Decimal::ZERO);

        prop_assert!(report.is_reconciled);
        prop_assert_eq!(report.difference, Decimal::ZERO);
        prop_assert_eq!(report.cash_from_financing, injection);
    }

    /// A balanced double-entry ledger always ties out on the balance sheet.
    #[test]
    fn prop_balance_sheet_ties_out(
        entries in prop::collection::vec((0usize..6, 0usize..6, cents(1_000_000)), 0..30),
    ) {
        const CHART: [(&str, AccountType, &str); 6] = [
            ("Caja", AccountType::Asset, "Activo Corriente"),
            ("Equipo", AccountType::Asset, "Activo No Corriente"),
            ("Proveedores", AccountType::Liability, "Pasivo Corriente"),
            ("Capital Social", AccountType::Equity, "Capital"),
            ("Ventas", AccountType::Revenue, "Ingresos"),
            ("Salarios", AccountType::Expense, "Gastos"),
        ];

        let mut balances = [Decimal::ZERO; 6];
        for (debit, credit, amount) in entries {
            balances[debit] += amount;
            balances[credit] -= amount;
        }
        let rows = CHART
            .iter()
            .zip(balances)
            .enumerate()
            .map(|(i, ((name, t, subtype), balance))| row(i as i64, name, *t, subtype, balance))
            .collect();

        let report = BalanceSheetReport::from_snapshot(&snapshot(rows));
        prop_assert!(report.is_balanced);
        prop_assert_eq!(report.imbalance(), Decimal::ZERO);
    }

    /// Tax is never negative, and net profit never exceeds pre-tax profit.
    #[test]
    fn prop_tax_guard(pre_tax in signed_cents(100_000_000)) {
        let tax = income_tax(pre_tax);
        prop_assert!(tax >= Decimal::ZERO);
        if pre_tax <= Decimal::ZERO {
            prop_assert_eq!(tax, Decimal::ZERO);
        }
        prop_assert!(pre_tax - tax <= pre_tax.max(Decimal::ZERO));
    }

    /// Window activity plus the prior cumulative statement gives the current
    /// cumulative revenue and costs.
    #[test]
    fn prop_period_activity_is_snapshot_difference(
        prior_sales in cents(1_000_000),
        window_sales in cents(1_000_000),
        prior_cost in cents(1_000_000),
        window_cost in cents(1_000_000),
    ) {
        let prior = snapshot(vec![
            row(1, "Ventas", AccountType::Revenue, "Ingresos", -prior_sales),
            row(2, "Costo de Ventas", AccountType::Cost, "Costos", prior_cost),
        ]);
        let current = snapshot(vec![
            row(1, "Ventas", AccountType::Revenue, "Ingresos", -(prior_sales + window_sales)),
            row(2, "Costo de Ventas", AccountType::Cost, "Costos", prior_cost + window_cost),
        ]);

        let activity = IncomeStatement::period_activity(&current, &prior);
        let cumulative = IncomeStatement::from_snapshot(&current);
        let before = IncomeStatement::from_snapshot(&prior);

        prop_assert_eq!(activity.total_revenue, window_sales);
        prop_assert_eq!(activity.total_cost_of_sales, window_cost);
        prop_assert_eq!(before.total_revenue + activity.total_revenue, cumulative.total_revenue);
        prop_assert_eq!(activity.gross_profit, window_sales - window_cost);
    }

    /// Moves below one cent never produce a funds line.
    #[test]
    fn prop_funds_noise_threshold(
        balance in cents(10_000_000),
        noise in 0i64..10,
        asset in any::<bool>(),
    ) {
        let (t, subtype, sign) = if asset {
            (AccountType::Asset, "Activo Corriente", Decimal::ONE)
        } else {
            (AccountType::Liability, "Pasivo Corriente", Decimal::NEGATIVE_ONE)
        };
        // noise is in tenths of a cent.
        let moved = balance + Decimal::new(noise, 3);

        let prior = snapshot(vec![row(1, "Cuenta", t, subtype, balance * sign)]);
        let current = snapshot(vec![row(1, "Cuenta", t, subtype, moved * sign)]);
        let report = FundsReport::compute(&current, &prior, Decimal::ZERO, Decimal::ZERO);

        prop_assert!(report.lines.is_empty());
        prop_assert_eq!(report.imbalance, Decimal::ZERO);
    }

    /// Every funds line lands on exactly one side, and the totals are the
    /// column sums.
    #[test]
    fn prop_funds_lines_are_one_sided(
        before in prop::collection::vec(signed_cents(1_000_000), 1..10),
        after in prop::collection::vec(signed_cents(1_000_000), 1..10),
    ) {
        let rows = |values: &[Decimal]| {
            values
                .iter()
                .enumerate()
                .map(|(i, b)| {
                    row(
                        i as i64,
                        &format!("Cuenta {i}"),
                        AccountType::Asset,
                        "Activo Corriente",
                        *b,
                    )
                })
                .collect::<Vec<_>>()
        };
        let report = FundsReport::compute(
            &snapshot(rows(&after)),
            &snapshot(rows(&before)),
            Decimal::ZERO,
            Decimal::ZERO,
        );

        for line in &report.lines {
            prop_assert!(line.variance.abs() >= TOLERANCE);
            prop_assert!(line.source_amount.is_zero() != line.application_amount.is_zero());
        }
        let sources: Decimal = report.lines.iter().map(|l| l.source_amount).sum();
        prop_assert_eq!(report.total_source, sources);
        prop_assert_eq!(report.imbalance, report.total_source - report.total_application);
    }

    /// Rows built from their own movements always tie out, and the totals
    /// are the column sums.
    #[test]
    fn prop_trial_balance_ties_out(
        movements in prop::collection::vec(
            (signed_cents(1_000_000), cents(1_000_000), cents(1_000_000)),
            0..25,
        ),
    ) {
        let rows: Vec<TrialBalanceRow> = movements
            .iter()
            .enumerate()
            .map(|(i, (opening, debit, credit))| {
                TrialBalanceRow::new(
                    format!("Cuenta {i}"),
                    AccountType::Asset,
                    "Activo Corriente",
                    *opening,
                    *debit,
                    *credit,
                    *opening + *debit - *credit,
                )
            })
            .collect();
        let expected_debit: Decimal = movements.iter().map(|m| m.1).sum();

        let report = TrialBalanceReport::new(rows);

        prop_assert!(report.rows.iter().all(|r| r.is_consistent));
        prop_assert!(report.totals.closing_ties_out);
        prop_assert_eq!(report.totals.debit, expected_debit);
    }
}
