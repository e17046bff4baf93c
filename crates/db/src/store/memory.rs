//! In-memory balance store.
//!
//! Keeps a chart of accounts and double-entry postings per company and
//! aggregates them the way the hosted procedures do. Used by tests and for
//! offline runs.

use std::collections::HashMap;

use async_trait::async_trait;
use balanza_core::ledger::{AccountBalance, AccountType, PeriodSnapshot, ReportPeriod};
use balanza_core::reports::{TrialBalanceReport, TrialBalanceRow};
use balanza_shared::types::{AccountId, CompanyId};
use chrono::NaiveDate;
use rust_decimal::Decimal;

use super::BalanceStore;
use super::rpc::{BALANCE_AS_OF_RPC, TRIAL_BALANCE_RPC};
use crate::error::StoreError;

#[derive(Debug, Clone)]
struct Account {
    id: AccountId,
    name: String,
    account_type: AccountType,
    subtype: Option<String>,
}

#[derive(Debug, Clone, Copy)]
struct Posting {
    date: NaiveDate,
    debit_account: AccountId,
    credit_account: AccountId,
    amount: Decimal,
}

impl Posting {
    /// Debit and credit this posting moves on `account`.
    fn effect_on(&self, account: AccountId) -> (Decimal, Decimal) {
        let debit = if self.debit_account == account {
            self.amount
        } else {
            Decimal::ZERO
        };
        let credit = if self.credit_account == account {
            self.amount
        } else {
            Decimal::ZERO
        };
        (debit, credit)
    }
}

#[derive(Debug, Clone, Default)]
struct CompanyBooks {
    accounts: Vec<Account>,
    postings: Vec<Posting>,
}

impl CompanyBooks {
    /// Debit and credit totals for `account` over postings matching `when`.
    fn movements(
        &self,
        account: AccountId,
        when: impl Fn(NaiveDate) -> bool,
    ) -> (Decimal, Decimal) {
        self.postings
            .iter()
            .filter(|p| when(p.date))
            .map(|p| p.effect_on(account))
            .fold((Decimal::ZERO, Decimal::ZERO), |(d, c), (pd, pc)| {
                (d + pd, c + pc)
            })
    }
}

/// Balance store backed by in-process books.
#[derive(Debug, Clone, Default)]
pub struct InMemoryBalanceStore {
    books: HashMap<CompanyId, CompanyBooks>,
    unavailable: bool,
}

impl InMemoryBalanceStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds an account to a company's chart.
    #[must_use]
    pub fn with_account(
        mut self,
        company_id: CompanyId,
        account_id: AccountId,
        name: &str,
        account_type: AccountType,
        subtype: Option<&str>,
    ) -> Self {
        self.books.entry(company_id).or_default().accounts.push(Account {
            id: account_id,
            name: name.to_string(),
            account_type,
            subtype: subtype.map(ToString::to_string),
        });
        self
    }

    /// Posts a balanced two-line entry.
    #[must_use]
    pub fn with_posting(
        mut self,
        company_id: CompanyId,
        date: NaiveDate,
        debit_account: AccountId,
        credit_account: AccountId,
        amount: Decimal,
    ) -> Self {
        self.books.entry(company_id).or_default().postings.push(Posting {
            date,
            debit_account,
            credit_account,
            amount,
        });
        self
    }

    /// Makes every call fail with a 503, as an unreachable store would.
    #[must_use]
    pub fn unavailable(mut self) -> Self {
        self.unavailable = true;
        self
    }

    fn check_available(&self, rpc: &'static str) -> Result<(), StoreError> {
        if self.unavailable {
            return Err(StoreError::Status {
                rpc,
                status: 503,
                body: "store unavailable".to_string(),
            });
        }
        Ok(())
    }
}

#[async_trait]
impl BalanceStore for InMemoryBalanceStore {
    async fn balances_as_of(
        &self,
        company_id: CompanyId,
        as_of: NaiveDate,
    ) -> Result<PeriodSnapshot, StoreError> {
        self.check_available(BALANCE_AS_OF_RPC)?;
        let Some(books) = self.books.get(&company_id) else {
            return Ok(PeriodSnapshot::new(as_of, Vec::new()));
        };

        let accounts = books
            .accounts
            .iter()
            .map(|a| {
                let (debit, credit) = books.movements(a.id, |d| d <= as_of);
                AccountBalance::new(
                    a.id,
                    a.name.clone(),
                    a.account_type,
                    a.subtype.clone(),
                    debit - credit,
                )
            })
            .collect();

        Ok(PeriodSnapshot::new(as_of, accounts))
    }

    async fn trial_balance(
        &self,
        company_id: CompanyId,
        period: ReportPeriod,
    ) -> Result<TrialBalanceReport, StoreError> {
        self.check_available(TRIAL_BALANCE_RPC)?;
        let Some(books) = self.books.get(&company_id) else {
            return Ok(TrialBalanceReport::new(Vec::new()));
        };

        let rows = books
            .accounts
            .iter()
            .map(|a| {
                let (before_debit, before_credit) =
                    books.movements(a.id, |d| d < period.opening);
                let (debit, credit) =
                    books.movements(a.id, |d| d >= period.opening && d <= period.closing);
                let opening = before_debit - before_credit;

                TrialBalanceRow::new(
                    a.name.clone(),
                    a.account_type,
                    a.subtype
                        .clone()
                        .unwrap_or_else(|| balanza_core::ledger::DEFAULT_SUBTYPE.to_string()),
                    opening,
                    debit,
                    credit,
                    opening + debit - credit,
                )
            })
            .collect();

        Ok(TrialBalanceReport::new(rows))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn date(month: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, month, day).unwrap()
    }

    fn balance_of(snapshot: &PeriodSnapshot, id: i64) -> Decimal {
        snapshot
            .accounts
            .iter()
            .find(|a| a.account_id == AccountId(id))
            .map_or(Decimal::ZERO, |a| a.balance)
    }

    fn store() -> InMemoryBalanceStore {
        let company = CompanyId(1);
        InMemoryBalanceStore::new()
            .with_account(
                company,
                AccountId(1),
                "Caja",
                AccountType::Asset,
                Some("Activo Corriente"),
            )
            .with_account(
                company,
                AccountId(2),
                "Capital Social",
                AccountType::Equity,
                Some("Capital"),
            )
            .with_account(company, AccountId(3), "Ventas", AccountType::Revenue, None)
            .with_posting(company, date(1, 5), AccountId(1), AccountId(2), dec!(1000))
            .with_posting(company, date(2, 10), AccountId(1), AccountId(3), dec!(250))
    }

    #[tokio::test]
    async fn test_balances_are_cumulative_to_date() {
        let store = store();

        let january = store.balances_as_of(CompanyId(1), date(1, 31)).await.unwrap();
        assert_eq!(balance_of(&january, 1), dec!(1000));
        assert_eq!(balance_of(&january, 3), Decimal::ZERO);

        let february = store.balances_as_of(CompanyId(1), date(2, 28)).await.unwrap();
        assert_eq!(balance_of(&february, 1), dec!(1250));
        assert_eq!(balance_of(&february, 3), dec!(-250));
    }

    #[tokio::test]
    async fn test_unknown_company_has_no_rows() {
        let snapshot = store().balances_as_of(CompanyId(99), date(2, 28)).await.unwrap();
        assert!(snapshot.accounts.is_empty());
    }

    #[tokio::test]
    async fn test_trial_balance_window() {
        let period = ReportPeriod::new(date(2, 1), date(2, 28)).unwrap();
        let report = store().trial_balance(CompanyId(1), period).await.unwrap();

        let caja = &report.rows[0];
        assert_eq!(caja.opening_balance, dec!(1000));
        assert_eq!(caja.debit, dec!(250));
        assert_eq!(caja.closing_balance, dec!(1250));
        assert!(report.totals.movements_balanced);
        assert!(report.totals.closing_ties_out);
    }

    #[tokio::test]
    async fn test_unavailable_store() {
        let err = store()
            .unavailable()
            .balances_as_of(CompanyId(1), date(1, 31))
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::Status { status: 503, .. }));
    }
}
