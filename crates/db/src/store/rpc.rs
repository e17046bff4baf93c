//! PostgREST-style RPC client for the hosted database.

use std::time::Duration;

use async_trait::async_trait;
use balanza_core::ledger::{AccountBalance, PeriodSnapshot, ReportPeriod};
use balanza_core::reports::{TrialBalanceReport, TrialBalanceRow};
use balanza_shared::config::StoreConfig;
use balanza_shared::types::CompanyId;
use chrono::NaiveDate;
use reqwest::Client;
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::{debug, error};

use super::BalanceStore;
use crate::error::StoreError;
use crate::rows::{BalanceRow, TrialBalanceRowDto, map_rows};

/// Balances of every account as of a date.
pub const BALANCE_AS_OF_RPC: &str = "get_balance_as_of_date";
/// Trial balance over a window.
pub const TRIAL_BALANCE_RPC: &str = "get_trial_balance";

#[derive(Debug, Serialize)]
struct BalanceParams {
    p_id_empresa: i64,
    p_fecha: NaiveDate,
}

#[derive(Debug, Serialize)]
struct TrialBalanceParams {
    p_id_empresa: i64,
    p_fecha_inicio: NaiveDate,
    p_fecha_fin: NaiveDate,
}

/// Calls the store's remote procedures over HTTPS.
#[derive(Clone)]
pub struct RpcBalanceStore {
    client: Client,
    base_url: String,
    api_key: String,
}

impl RpcBalanceStore {
    /// Creates a client for the configured endpoint.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Configuration` if the HTTP client cannot be built.
    pub fn new(config: &StoreConfig) -> Result<Self, StoreError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .gzip(true)
            .build()
            .map_err(|e| StoreError::Configuration(e.to_string()))?;

        Ok(Self {
            client,
            base_url: config.url.trim_end_matches('/').to_string(),
            api_key: config.api_key.clone(),
        })
    }

    fn rpc_url(&self, rpc: &str) -> String {
        format!("{}/rest/v1/rpc/{rpc}", self.base_url)
    }

    async fn call<P, R>(&self, rpc: &'static str, params: &P) -> Result<Vec<R>, StoreError>
    where
        P: Serialize + Sync,
        R: DeserializeOwned,
    {
        let response = self
            .client
            .post(self.rpc_url(rpc))
            .header("apikey", &self.api_key)
            .bearer_auth(&self.api_key)
            .json(params)
            .send()
            .await
            .map_err(|source| {
                error!(rpc, error = %source, "Store request failed");
                StoreError::Http { rpc, source }
            })?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|source| StoreError::Http { rpc, source })?;

        if !status.is_success() {
            error!(rpc, status = status.as_u16(), body = %body, "Store returned an error");
            return Err(StoreError::Status {
                rpc,
                status: status.as_u16(),
                body,
            });
        }

        let rows: Vec<R> = serde_json::from_str(&body).map_err(|source| {
            error!(rpc, error = %source, "Store response did not decode");
            StoreError::Decode { rpc, source }
        })?;

        debug!(rpc, rows = rows.len(), "Store call completed");
        Ok(rows)
    }
}

#[async_trait]
impl BalanceStore for RpcBalanceStore {
    async fn balances_as_of(
        &self,
        company_id: CompanyId,
        as_of: NaiveDate,
    ) -> Result<PeriodSnapshot, StoreError> {
        let params = BalanceParams {
            p_id_empresa: company_id.into_inner(),
            p_fecha: as_of,
        };
        let rows: Vec<BalanceRow> = self.call(BALANCE_AS_OF_RPC, &params).await?;
        let accounts: Vec<AccountBalance> = map_rows(rows)?;

        Ok(PeriodSnapshot::new(as_of, accounts))
    }

    async fn trial_balance(
        &self,
        company_id: CompanyId,
        period: ReportPeriod,
    ) -> Result<TrialBalanceReport, StoreError> {
        let params = TrialBalanceParams {
            p_id_empresa: company_id.into_inner(),
            p_fecha_inicio: period.opening,
            p_fecha_fin: period.closing,
        };
        let rows: Vec<TrialBalanceRowDto> = self.call(TRIAL_BALANCE_RPC, &params).await?;
        let rows: Vec<TrialBalanceRow> = map_rows(rows)?;

        Ok(TrialBalanceReport::new(rows))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(url: &str) -> StoreConfig {
        StoreConfig {
            url: url.to_string(),
            api_key: "anon-key".to_string(),
            timeout_secs: 5,
        }
    }

    #[test]
    fn test_rpc_url_trims_trailing_slash() {
        let store = RpcBalanceStore::new(&config("https://db.example.com/")).unwrap();
        assert_eq!(
            store.rpc_url(BALANCE_AS_OF_RPC),
            "https://db.example.com/rest/v1/rpc/get_balance_as_of_date"
        );
    }

    #[test]
    fn test_params_serialize_with_store_names() {
        let params = TrialBalanceParams {
            p_id_empresa: 4,
            p_fecha_inicio: NaiveDate::from_ymd_opt(2025, 1, 1).unwrap(),
            p_fecha_fin: NaiveDate::from_ymd_opt(2025, 6, 30).unwrap(),
        };
        let json = serde_json::to_value(&params).unwrap();
        assert_eq!(json["p_id_empresa"], 4);
        assert_eq!(json["p_fecha_inicio"], "2025-01-01");
        assert_eq!(json["p_fecha_fin"], "2025-06-30");
    }

    #[tokio::test]
    async fn test_unreachable_store_is_http_error() {
        // Port 9 (discard) on localhost refuses connections.
        let store = RpcBalanceStore::new(&config("http://127.0.0.1:9")).unwrap();
        let err = store
            .balances_as_of(CompanyId(1), NaiveDate::from_ymd_opt(2025, 1, 1).unwrap())
            .await
            .unwrap_err();

        assert!(matches!(err, StoreError::Http { rpc: BALANCE_AS_OF_RPC, .. }));
    }
}
