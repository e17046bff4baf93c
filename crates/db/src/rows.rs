//! Row shapes returned by the store's remote procedures and their mapping
//! to domain types.
//!
//! Column names are the store's (Spanish) ones; nothing outside this module
//! sees them.

use balanza_core::ledger::{AccountBalance, AccountType};
use balanza_core::reports::TrialBalanceRow;
use balanza_shared::types::AccountId;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::StoreError;

/// One row of `get_balance_as_of_date`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BalanceRow {
    /// Account key.
    pub id_cuenta: i64,
    /// Account name.
    pub cuenta: String,
    /// Account type label.
    pub tipo: String,
    /// Subtype label, if the account has one.
    #[serde(default)]
    pub subtipo: Option<String>,
    /// Signed balance; absent means no activity.
    #[serde(default)]
    pub saldo: Option<Decimal>,
}

/// One row of `get_trial_balance`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrialBalanceRowDto {
    /// Account name.
    pub nombre_cuenta: String,
    /// Account type label.
    pub tipo: String,
    /// Subtype label, if any.
    #[serde(default)]
    pub subtipo: Option<String>,
    /// Opening balance.
    #[serde(default)]
    pub saldo_inicial: Decimal,
    /// Debit movements.
    #[serde(default)]
    pub mov_debe: Decimal,
    /// Credit movements.
    #[serde(default)]
    pub mov_haber: Decimal,
    /// Closing balance.
    #[serde(default)]
    pub saldo_final: Decimal,
}

fn parse_type(account: &str, label: &str) -> Result<AccountType, StoreError> {
    label
        .parse()
        .map_err(|_| StoreError::UnknownAccountType {
            account: account.to_string(),
            label: label.to_string(),
        })
}

impl TryFrom<BalanceRow> for AccountBalance {
    type Error = StoreError;

    fn try_from(row: BalanceRow) -> Result<Self, Self::Error> {
        let account_type = parse_type(&row.cuenta, &row.tipo)?;
        Ok(Self::new(
            AccountId(row.id_cuenta),
            row.cuenta,
            account_type,
            row.subtipo,
            row.saldo.unwrap_or_default(),
        ))
    }
}

impl TryFrom<TrialBalanceRowDto> for TrialBalanceRow {
    type Error = StoreError;

    fn try_from(row: TrialBalanceRowDto) -> Result<Self, Self::Error> {
        let account_type = parse_type(&row.nombre_cuenta, &row.tipo)?;
        Ok(Self::new(
            row.nombre_cuenta,
            account_type,
            row.subtipo
                .unwrap_or_else(|| balanza_core::ledger::DEFAULT_SUBTYPE.to_string()),
            row.saldo_inicial,
            row.mov_debe,
            row.mov_haber,
            row.saldo_final,
        ))
    }
}

/// Maps every row, failing on the first one that cannot be placed.
pub(crate) fn map_rows<R, T>(rows: Vec<R>) -> Result<Vec<T>, StoreError>
where
    T: TryFrom<R, Error = StoreError>,
{
    rows.into_iter().map(T::try_from).collect()
}
