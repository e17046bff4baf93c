//! Semantic account roles.
//!
//! Reports need to find "the receivables account" or "the cash accounts"
//! without a dedicated column in the chart of accounts. Roles are resolved
//! once per row from the account name and type, and every report matches on
//! the role instead of repeating string comparisons.

use serde::{Deserialize, Serialize};

use super::{AccountType, normalize_label};

/// Role an account plays in the derived statements.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AccountRole {
    /// Cash on hand and bank accounts ("Caja", "Banco ...").
    Cash,
    /// Trade receivables ("Clientes").
    AccountsReceivable,
    /// Merchandise inventory ("Inventario").
    Inventory,
    /// Trade payables ("Proveedores").
    AccountsPayable,
    /// Long-term notes payable ("Documentos por pagar largo plazo").
    LongTermNotesPayable,
    /// Paid-in capital ("Capital Social").
    PaidInCapital,
    /// Accumulated depreciation carried as a negative asset.
    ContraAsset,
    /// Depreciation expense ("Gasto por Depreciación").
    DepreciationExpense,
}

const DEPRECIATION: &str = "depreciacion";

impl AccountRole {
    /// Resolves the role for an account, if any.
    ///
    /// Exact-name roles compare trimmed, case- and accent-insensitive names.
    /// Cash matches any asset whose name starts with "caja" or "banco";
    /// depreciation roles match names containing "depreciación".
    #[must_use]
    pub fn resolve(account_name: &str, account_type: AccountType) -> Option<Self> {
        let name = normalize_label(account_name);

        match account_type {
            AccountType::Asset => {
                if name.contains(DEPRECIATION) {
                    Some(Self::ContraAsset)
                } else if name.starts_with("caja") || name.starts_with("banco") {
                    Some(Self::Cash)
                } else if name == "clientes" {
                    Some(Self::AccountsReceivable)
                } else if name == "inventario" {
                    Some(Self::Inventory)
                } else {
                    None
                }
            }
            AccountType::Liability => match name.as_str() {
                "proveedores" => Some(Self::AccountsPayable),
                "documentos por pagar largo plazo" => Some(Self::LongTermNotesPayable),
                _ => None,
            },
            AccountType::Equity => (name == "capital social").then_some(Self::PaidInCapital),
            AccountType::Expense => name
                .contains(DEPRECIATION)
                .then_some(Self::DepreciationExpense),
            AccountType::Revenue | AccountType::Cost => None,
        }
    }
}
