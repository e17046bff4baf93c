//! Spreadsheet workbook model.
//!
//! Each report becomes one named sheet of typed cells. Rendering to text
//! applies the currency mask (`C$ #,##0.00`) to amounts and two decimals to
//! percentages and ratios; the writer only has to emit strings.

use balanza_shared::types::{Currency, Money};
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

use crate::ledger::GroupedAccounts;
use crate::reports::{
    BalanceSheetReport, CashFlowReport, ComparativeIncomeStatement, FinancialReports,
    FundsReport, IncomeStatement, RatioReport, TrialBalanceReport,
};

/// Placeholder for a relative change with no base.
pub const MISSING: &str = "---";

/// Sheet names, in workbook order.
pub const BALANCE_SHEET: &str = "Balance General";
/// Income statement sheet.
pub const INCOME_STATEMENT: &str = "Estado de Resultados";
/// Cash flow sheet.
pub const CASH_FLOW: &str = "Flujo de Efectivo";
/// Source and application sheet.
pub const FUNDS: &str = "Origen y Aplicación";
/// Ratio analysis sheet.
pub const RATIOS: &str = "Razones Financieras";
/// Trial balance sheet.
pub const TRIAL_BALANCE: &str = "Balanza de Comprobación";

/// One typed cell.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum Cell {
    /// Label or free text.
    Text(String),
    /// Money amount, rendered with the currency mask.
    Amount(Decimal),
    /// Percentage (already scaled to 0 to 100).
    Percent(Decimal),
    /// Plain ratio or count.
    Ratio(Decimal),
    /// Not computable; rendered as [`MISSING`].
    Missing,
    /// Blank cell.
    Empty,
}

impl Cell {
    fn text(value: impl Into<String>) -> Self {
        Self::Text(value.into())
    }

    /// Renders the cell as spreadsheet text.
    #[must_use]
    pub fn render(&self, currency: Currency) -> String {
        match self {
            Self::Text(text) => text.clone(),
            Self::Amount(amount) => Money::new(*amount, currency).to_string(),
            Self::Percent(value) => format!("{:.2}%", two_places(*value)),
            Self::Ratio(value) => format!("{:.2}", two_places(*value)),
            Self::Missing => MISSING.to_string(),
            Self::Empty => String::new(),
        }
    }
}

fn two_places(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(2, RoundingStrategy::MidpointNearestEven)
}

/// A named grid of cells with a header row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Sheet {
    /// Sheet name.
    pub name: String,
    /// Column headers.
    pub header: Vec<String>,
    /// Body rows.
    pub rows: Vec<Vec<Cell>>,
}

impl Sheet {
    fn new(name: &str, header: &[&str]) -> Self {
        Self {
            name: name.to_string(),
            header: header.iter().map(ToString::to_string).collect(),
            rows: Vec::new(),
        }
    }

    fn push(&mut self, row: Vec<Cell>) {
        self.rows.push(row);
    }

    fn push_amount(&mut self, label: &str, amount: Decimal) {
        self.push(vec![Cell::text(label), Cell::Amount(amount)]);
    }

    /// Body rows rendered as text.
    #[must_use]
    pub fn rendered_rows(&self, currency: Currency) -> Vec<Vec<String>> {
        self.rows
            .iter()
            .map(|row| row.iter().map(|c| c.render(currency)).collect())
            .collect()
    }

    /// First row whose first cell is the given label.
    #[must_use]
    pub fn row(&self, label: &str) -> Option<&[Cell]> {
        self.rows
            .iter()
            .find(|r| matches!(r.first(), Some(Cell::Text(t)) if t == label))
            .map(Vec::as_slice)
    }
}

/// All report sheets plus the currency they render in.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Workbook {
    /// Currency used for the amount mask.
    pub currency: Currency,
    /// Sheets in workbook order.
    pub sheets: Vec<Sheet>,
}

impl Workbook {
    /// Lays out every report, in córdobas.
    #[must_use]
    pub fn from_reports(
        reports: &FinancialReports,
        trial_balance: Option<&TrialBalanceReport>,
    ) -> Self {
        Self::with_currency(reports, trial_balance, Currency::default())
    }

    /// Lays out every report in the given currency.
    #[must_use]
    pub fn with_currency(
        reports: &FinancialReports,
        trial_balance: Option<&TrialBalanceReport>,
        currency: Currency,
    ) -> Self {
        let mut sheets = vec![
            balance_sheet(&reports.balance_sheet),
            income_statement(&reports.income_period, &reports.comparative),
            cash_flow(&reports.cash_flow),
            funds(&reports.funds),
            ratios(&reports.ratios),
        ];
        if let Some(trial_balance) = trial_balance {
            sheets.push(trial_balance_sheet(trial_balance));
        }

        Self { currency, sheets }
    }

    /// Looks up a sheet by name.
    #[must_use]
    pub fn sheet(&self, name: &str) -> Option<&Sheet> {
        self.sheets.iter().find(|s| s.name == name)
    }
}

fn push_grouped(sheet: &mut Sheet, title: &str, grouped: &GroupedAccounts) {
    sheet.push(vec![Cell::text(title), Cell::Empty]);
    let normal = grouped.normal_balance();
    for group in &grouped.groups {
        sheet.push(vec![Cell::text(&group.subtype), Cell::Empty]);
        for account in &group.accounts {
            sheet.push_amount(&account.account_name, account.display_balance());
        }
        sheet.push_amount(
            &format!("Total {}", group.subtype),
            normal.display_value(group.total),
        );
    }
}

fn balance_sheet(report: &BalanceSheetReport) -> Sheet {
    let mut sheet = Sheet::new(BALANCE_SHEET, &["Cuenta", "Monto"]);

    push_grouped(&mut sheet, "ACTIVOS", &report.assets);
    sheet.push_amount("Total Activos", report.total_assets);

    push_grouped(&mut sheet, "PASIVOS", &report.liabilities);
    sheet.push_amount("Total Pasivos", report.display_liabilities());

    sheet.push(vec![Cell::text("PATRIMONIO"), Cell::Empty]);
    for account in &report.equity {
        sheet.push_amount(&account.account_name, account.display_balance());
    }
    sheet.push_amount("Utilidad del Ejercicio", report.display_net_income());
    sheet.push_amount(
        "Total Patrimonio",
        report.display_equity_accounts() + report.display_net_income(),
    );
    sheet.push_amount("Total Pasivo y Patrimonio", report.display_liabilities_and_equity());

    sheet
}

/// Summary rows of the comparison, each preceded by the accounts of its
/// section. Account labels are indented by two spaces.
fn income_statement(
    statement: &IncomeStatement,
    comparative: &ComparativeIncomeStatement,
) -> Sheet {
    let mut sheet = Sheet::new(
        INCOME_STATEMENT,
        &[
            "Concepto",
            "Actual",
            "% Vertical",
            "Anterior",
            "% Vertical",
            "Variación",
            "Variación %",
        ],
    );

    for line in &comparative.lines {
        for account in statement.lines_for(&line.label) {
            sheet.push(vec![
                Cell::text(format!("  {}", account.label)),
                Cell::Amount(account.amount),
                Cell::Percent(account.vertical_percent),
                Cell::Empty,
                Cell::Empty,
                Cell::Empty,
                Cell::Empty,
            ]);
        }
        sheet.push(vec![
            Cell::text(&line.label),
            Cell::Amount(line.current_value),
            Cell::Percent(line.current_percent),
            Cell::Amount(line.prior_value),
            Cell::Percent(line.prior_percent),
            Cell::Amount(line.abs_change),
            line.rel_change_percent.map_or(Cell::Missing, Cell::Percent),
        ]);
    }

    sheet
}

fn cash_flow(report: &CashFlowReport) -> Sheet {
    let mut sheet = Sheet::new(CASH_FLOW, &["Concepto", "Monto"]);

    sheet.push(vec![Cell::text("ACTIVIDADES DE OPERACIÓN"), Cell::Empty]);
    sheet.push_amount("Utilidad Neta", report.net_profit);
    sheet.push_amount("Depreciación", report.depreciation);
    sheet.push_amount("Aumento en Clientes", -report.receivables_change);
    sheet.push_amount("Aumento en Inventario", -report.inventory_change);
    sheet.push_amount("Aumento en Proveedores", report.payables_change);
    sheet.push_amount("Flujo de Operación", report.cash_from_operations);

    sheet.push(vec![Cell::text("ACTIVIDADES DE INVERSIÓN"), Cell::Empty]);
    sheet.push_amount("Activos No Corrientes", -report.fixed_assets_change);
    sheet.push_amount("Flujo de Inversión", report.cash_from_investing);

    sheet.push(vec![Cell::text("ACTIVIDADES DE FINANCIAMIENTO"), Cell::Empty]);
    sheet.push_amount("Préstamos a Largo Plazo", report.loans_change);
    sheet.push_amount("Capital Social", report.capital_change);
    sheet.push_amount("Flujo de Financiamiento", report.cash_from_financing);

    sheet.push_amount("Flujo Neto de Efectivo", report.net_cash_flow);
    sheet.push_amount("Efectivo Inicial", report.opening_cash);
    sheet.push_amount("Efectivo Final", report.closing_cash);
    sheet.push_amount("Efectivo Final en Libros", report.closing_cash_actual);
    sheet.push_amount("Diferencia", report.difference);
    sheet.push_amount("Impuesto sobre la Renta no Pagado", report.accrued_tax);
    sheet.push_amount("Diferencia no Explicada", report.unexplained_difference);

    sheet
}

fn funds(report: &FundsReport) -> Sheet {
    let mut sheet = Sheet::new(FUNDS, &["Cuenta", "Variación", "Origen", "Aplicación"]);

    for line in &report.lines {
        sheet.push(vec![
            Cell::text(&line.label),
            Cell::Amount(line.variance),
            Cell::Amount(line.source_amount),
            Cell::Amount(line.application_amount),
        ]);
    }
    sheet.push(vec![
        Cell::text("Totales"),
        Cell::Empty,
        Cell::Amount(report.total_source),
        Cell::Amount(report.total_application),
    ]);
    sheet.push(vec![
        Cell::text("Diferencia"),
        Cell::Empty,
        Cell::Amount(report.imbalance),
        Cell::Empty,
    ]);

    sheet
}

fn ratios(report: &RatioReport) -> Sheet {
    let mut sheet = Sheet::new(RATIOS, &["Indicador", "Valor", "Referencia", "Puntaje"]);
    let b = &report.benchmarks;

    let mut ratio = |label: &str, value: Cell, benchmark: Cell| {
        sheet.push(vec![Cell::text(label), value, benchmark, Cell::Empty]);
    };

    let l = &report.liquidity;
    ratio("Razón Corriente", Cell::Ratio(l.current_ratio), Cell::Ratio(b.current_ratio));
    ratio("Prueba Ácida", Cell::Ratio(l.quick_ratio), Cell::Ratio(b.quick_ratio));
    ratio("Capital de Trabajo Neto", Cell::Amount(l.net_working_capital), Cell::Empty);
    ratio("Capital de Trabajo Operativo", Cell::Amount(l.net_operating_capital), Cell::Empty);

    let a = &report.activity;
    ratio(
        "Rotación de Inventario",
        Cell::Ratio(a.inventory_turnover),
        Cell::Ratio(b.inventory_turnover),
    );
    ratio("Días de Inventario", Cell::Ratio(a.days_inventory), Cell::Empty);
    ratio(
        "Rotación de Cartera",
        Cell::Ratio(a.receivables_turnover),
        Cell::Ratio(b.receivables_turnover),
    );
    ratio("Días de Cobro", Cell::Ratio(a.days_receivables), Cell::Empty);
    ratio(
        "Rotación de Activos Fijos",
        Cell::Ratio(a.fixed_asset_turnover),
        Cell::Ratio(b.fixed_asset_turnover),
    );
    ratio(
        "Rotación de Activos Totales",
        Cell::Ratio(a.total_asset_turnover),
        Cell::Ratio(b.total_asset_turnover),
    );

    let v = &report.leverage;
    ratio("Razón de Deuda", Cell::Ratio(v.debt_ratio), Cell::Ratio(b.debt_ratio));
    ratio(
        "Deuda a Patrimonio",
        Cell::Ratio(v.debt_to_equity),
        Cell::Ratio(b.debt_to_equity),
    );

    let p = &report.profitability;
    ratio("Margen Bruto", Cell::Percent(p.gross_margin), Cell::Percent(b.gross_margin));
    ratio(
        "Margen Operativo",
        Cell::Percent(p.operating_margin),
        Cell::Percent(b.operating_margin),
    );
    ratio("Margen Neto", Cell::Percent(p.net_margin), Cell::Percent(b.net_margin));
    ratio(
        "Rendimiento sobre Activos",
        Cell::Percent(p.return_on_assets),
        Cell::Percent(b.return_on_assets),
    );
    ratio(
        "Rendimiento sobre Patrimonio",
        Cell::Percent(p.return_on_equity),
        Cell::Percent(b.return_on_equity),
    );

    let d = &report.dupont;
    sheet.push(vec![Cell::text("ANÁLISIS DUPONT"), Cell::Empty, Cell::Empty, Cell::Empty]);
    for (label, value) in [
        ("Margen Neto", Cell::Percent(d.net_margin)),
        ("Rotación de Activos", Cell::Ratio(d.asset_turnover)),
        ("Multiplicador de Capital", Cell::Ratio(d.equity_multiplier)),
        ("ROE DuPont", Cell::Percent(d.roe)),
    ] {
        sheet.push(vec![Cell::text(label), value, Cell::Empty, Cell::Empty]);
    }

    let s = &report.scores;
    sheet.push(vec![Cell::text("EVALUACIÓN"), Cell::Empty, Cell::Empty, Cell::Empty]);
    for (label, score) in [
        ("Liquidez", &s.liquidity),
        ("Actividad", &s.activity),
        ("Endeudamiento", &s.leverage),
        ("Rentabilidad", &s.profitability),
        ("General", &s.overall),
    ] {
        sheet.push(vec![
            Cell::text(label),
            Cell::text(score.status.label()),
            Cell::text(&score.interpretation),
            Cell::Ratio(score.score),
        ]);
    }

    sheet
}

fn trial_balance_sheet(report: &TrialBalanceReport) -> Sheet {
    let mut sheet = Sheet::new(
        TRIAL_BALANCE,
        &[
            "Cuenta",
            "Tipo",
            "Subtipo",
            "Saldo Inicial",
            "Debe",
            "Haber",
            "Saldo Final",
        ],
    );

    for row in &report.rows {
        sheet.push(vec![
            Cell::text(&row.account_name),
            Cell::text(row.account_type.to_string()),
            Cell::text(&row.subtype),
            Cell::Amount(row.opening_balance),
            Cell::Amount(row.debit),
            Cell::Amount(row.credit),
            Cell::Amount(row.closing_balance),
        ]);
    }
    let t = &report.totals;
    sheet.push(vec![
        Cell::text("Totales"),
        Cell::Empty,
        Cell::Empty,
        Cell::Amount(t.opening_balance),
        Cell::Amount(t.debit),
        Cell::Amount(t.credit),
        Cell::Amount(t.closing_balance),
    ]);

    sheet
}
