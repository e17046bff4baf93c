//! Data store abstraction.
//!
//! Posting, persistence and balance aggregation live in the hosted database.
//! The reports only need two read operations, both scoped to an explicit
//! company.

pub mod memory;
pub mod rpc;

use async_trait::async_trait;
use balanza_core::ledger::{PeriodSnapshot, ReportPeriod};
use balanza_core::reports::TrialBalanceReport;
use balanza_shared::types::CompanyId;
use chrono::NaiveDate;

use crate::error::StoreError;

pub use memory::InMemoryBalanceStore;
pub use rpc::RpcBalanceStore;

/// Read access to account balances.
#[async_trait]
pub trait BalanceStore: Send + Sync {
    /// Balance of every account of `company_id` as of `as_of`, inclusive.
    async fn balances_as_of(
        &self,
        company_id: CompanyId,
        as_of: NaiveDate,
    ) -> Result<PeriodSnapshot, StoreError>;

    /// Opening balance, movements and closing balance per account over
    /// `period`.
    async fn trial_balance(
        &self,
        company_id: CompanyId,
        period: ReportPeriod,
    ) -> Result<TrialBalanceReport, StoreError>;
}
