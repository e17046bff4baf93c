//! Account balance model.
//!
//! This module holds the input side of every report:
//! - Balance rows and sign conventions
//! - Semantic roles resolved from account names
//! - Period snapshots and the current/prior pair
//! - Grouping by type and subtype

pub mod balance;
pub mod grouping;
pub mod role;
pub mod snapshot;

#[cfg(test)]
mod grouping_props;

pub use balance::{AccountBalance, AccountType, DEFAULT_SUBTYPE, NormalBalance};
pub use grouping::{GroupedAccounts, SubtypeClass, SubtypeGroup};
pub use role::AccountRole;
pub use snapshot::{PeriodSnapshot, ReportPeriod, SnapshotPair};

/// Lowercases, trims, and strips Spanish accents so labels compare
/// regardless of how they were typed.
pub(crate) fn normalize_label(raw: &str) -> String {
    raw.trim()
        .chars()
        .map(|c| match c {
            'á' | 'Á' => 'a',
            'é' | 'É' => 'e',
            'í' | 'Í' => 'i',
            'ó' | 'Ó' => 'o',
            'ú' | 'Ú' | 'ü' | 'Ü' => 'u',
            'Ñ' => 'ñ',
            other => other.to_ascii_lowercase(),
        })
        .collect()
}
