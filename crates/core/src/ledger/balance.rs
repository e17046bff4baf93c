//! Account balance rows and sign conventions.
//!
//! The data store returns one signed balance per account per cut-off date.
//! Debit-normal accounts (assets, costs, expenses) are stored positive;
//! credit-normal accounts (liabilities, equity, revenue) are stored negative
//! and must be negated for display.

use balanza_shared::types::AccountId;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::role::AccountRole;

/// Fallback subtype label for rows the store returns without one.
pub const DEFAULT_SUBTYPE: &str = "Other";

/// Top-level account classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AccountType {
    /// Resources owned (Activo).
    Asset,
    /// Obligations (Pasivo).
    Liability,
    /// Owner's equity (Patrimonio).
    Equity,
    /// Income (Ingreso).
    Revenue,
    /// Cost of sales (Costo).
    Cost,
    /// Operating expense (Gasto).
    Expense,
}

impl AccountType {
    /// Returns the normal balance side for this account type.
    #[must_use]
    pub const fn normal_balance(self) -> NormalBalance {
        match self {
            Self::Asset | Self::Cost | Self::Expense => NormalBalance::DebitNormal,
            Self::Liability | Self::Equity | Self::Revenue => NormalBalance::CreditNormal,
        }
    }

    /// Whether balances of this type accumulate over the fiscal year
    /// (period activity is the difference of two snapshots).
    #[must_use]
    pub const fn is_flow(self) -> bool {
        matches!(self, Self::Revenue | Self::Cost | Self::Expense)
    }
}

impl std::fmt::Display for AccountType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            Self::Asset => "Asset",
            Self::Liability => "Liability",
            Self::Equity => "Equity",
            Self::Revenue => "Revenue",
            Self::Cost => "Cost",
            Self::Expense => "Expense",
        };
        f.write_str(label)
    }
}

impl std::str::FromStr for AccountType {
    type Err = String;

    /// Accepts the English names and the Spanish labels used by the store.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match super::normalize_label(s).as_str() {
            "asset" | "activo" | "activos" => Ok(Self::Asset),
            "liability" | "pasivo" | "pasivos" => Ok(Self::Liability),
            "equity" | "patrimonio" | "capital" => Ok(Self::Equity),
            "revenue" | "ingreso" | "ingresos" => Ok(Self::Revenue),
            "cost" | "costo" | "costos" => Ok(Self::Cost),
            "expense" | "gasto" | "gastos" => Ok(Self::Expense),
            _ => Err(format!("Unknown account type: {s}")),
        }
    }
}

/// Which side of the ledger increases an account.
///
/// - Asset/Cost/Expense: stored positive (debit-normal)
/// - Liability/Equity/Revenue: stored negative (credit-normal)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum NormalBalance {
    /// Debit-normal accounts (Asset, Cost, Expense)
    DebitNormal,
    /// Credit-normal accounts (Liability, Equity, Revenue)
    CreditNormal,
}

impl NormalBalance {
    /// Converts a stored balance into its presentation value.
    #[must_use]
    pub fn display_value(self, stored: Decimal) -> Decimal {
        match self {
            Self::DebitNormal => stored,
            Self::CreditNormal => -stored,
        }
    }
}

/// One account's balance as of a cut-off date.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AccountBalance {
    /// Account ID, stable across periods.
    pub account_id: AccountId,
    /// Human-readable account name (e.g. "Caja", "Clientes").
    pub account_name: String,
    /// Account type.
    pub account_type: AccountType,
    /// Free-form grouping label ("Activo Corriente", "Non-current Liability").
    pub subtype: String,
    /// Signed stored balance.
    pub balance: Decimal,
    /// Semantic role resolved from the name when the row is created.
    pub role: Option<AccountRole>,
}

impl AccountBalance {
    /// Creates a balance row, resolving its role and defaulting the subtype.
    #[must_use]
    pub fn new(
        account_id: AccountId,
        account_name: impl Into<String>,
        account_type: AccountType,
        subtype: Option<String>,
        balance: Decimal,
    ) -> Self {
        let account_name = account_name.into();
        let subtype = subtype
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .unwrap_or_else(|| DEFAULT_SUBTYPE.to_string());
        let role = AccountRole::resolve(&account_name, account_type);

        Self {
            account_id,
            account_name,
            account_type,
            subtype,
            balance,
            role,
        }
    }

    /// Normal balance side of this account.
    #[must_use]
    pub const fn normal_balance(&self) -> NormalBalance {
        self.account_type.normal_balance()
    }

    /// Balance with the credit-normal sign flipped for presentation.
    #[must_use]
    pub fn display_balance(&self) -> Decimal {
        self.normal_balance().display_value(self.balance)
    }

    /// Whether this account carries the given role.
    #[must_use]
    pub fn has_role(&self, role: AccountRole) -> bool {
        self.role == Some(role)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use rust_decimal_macros::dec;
    use std::str::FromStr;

    #[rstest]
    #[case("Activo", AccountType::Asset)]
    #[case("asset", AccountType::Asset)]
    #[case(" PASIVO ", AccountType::Liability)]
    #[case("Patrimonio", AccountType::Equity)]
    #[case("Ingresos", AccountType::Revenue)]
    #[case("Costo", AccountType::Cost)]
    #[case("Gasto", AccountType::Expense)]
    #[case("Expense", AccountType::Expense)]
    fn test_account_type_from_str(#[case] raw: &str, #[case] expected: AccountType) {
        assert_eq!(AccountType::from_str(raw).unwrap(), expected);
    }

    #[test]
    fn test_account_type_unknown() {
        assert!(AccountType::from_str("Orden").is_err());
    }

    #[test]
    fn test_normal_balance_display() {
        assert_eq!(
            AccountType::Revenue.normal_balance().display_value(dec!(-500)),
            dec!(500)
        );
        assert_eq!(
            AccountType::Expense.normal_balance().display_value(dec!(120)),
            dec!(120)
        );
    }

    #[test]
    fn test_missing_subtype_falls_back_to_other() {
        let row = AccountBalance::new(AccountId(1), "Caja", AccountType::Asset, None, dec!(10));
        assert_eq!(row.subtype, DEFAULT_SUBTYPE);

        let blank = AccountBalance::new(
            AccountId(2),
            "Banco",
            AccountType::Asset,
            Some("  ".to_string()),
            dec!(10),
        );
        assert_eq!(blank.subtype, DEFAULT_SUBTYPE);
    }

    #[test]
    fn test_role_resolved_on_creation() {
        let row = AccountBalance::new(
            AccountId(3),
            "Clientes",
            AccountType::Asset,
            Some("Activo Corriente".to_string()),
            dec!(250),
        );
        assert!(row.has_role(AccountRole::AccountsReceivable));
    }
}
