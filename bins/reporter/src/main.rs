//! Balanza reporter
//!
//! Fetches the balance snapshots of one company for one reporting window,
//! computes every financial statement and writes them out.

mod diagnostics;
mod output;

use balanza_core::export::Workbook;
use balanza_core::ledger::ReportPeriod;
use balanza_core::reports::ReportService;
use balanza_db::{RpcBalanceStore, SnapshotLoader};
use balanza_shared::{AppConfig, AppError, AppResult};
use tracing::{error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "balanza=debug,balanza_db=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = AppConfig::load().map_err(AppError::from)?;

    if let Err(err) = run(&config).await {
        error!(
            code = err.error_code(),
            recoverable = err.is_recoverable(),
            "{err}"
        );
        return Err(err.into());
    }

    Ok(())
}

async fn run(config: &AppConfig) -> AppResult<()> {
    let report = &config.report;
    let period = ReportPeriod::new(report.opening, report.closing)
        .map_err(|e| AppError::Validation(e.to_string()))?;

    info!(
        company_id = %report.company_id,
        opening = %period.opening,
        closing = %period.closing,
        "Generating reports"
    );

    let loader = SnapshotLoader::new(RpcBalanceStore::new(&config.store)?);
    let (pair, trial_balance, previous) = tokio::try_join!(
        loader.load_pair(report.company_id, period),
        loader.load_trial_balance(report.company_id, period),
        loader.load_previous_window(report.company_id, period),
    )?;

    let reports = ReportService::build(&pair, previous.as_ref());
    let warnings = diagnostics::log_diagnostics(&reports, Some(&trial_balance));
    if warnings > 0 {
        warn!(warnings, "Reports generated with reconciliation warnings");
    }

    let workbook = Workbook::with_currency(&reports, Some(&trial_balance), report.currency);
    let written = output::write_all(&report.output_dir, &reports, Some(&trial_balance), &workbook)?;
    info!(
        files = written.len(),
        dir = %report.output_dir.display(),
        "Reports written"
    );

    Ok(())
}
