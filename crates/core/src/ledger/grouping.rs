//! Balance grouping by type and subtype.
//!
//! Every statement starts from the same structure: the non-zero accounts of
//! one type, bucketed by their subtype label, with a total per bucket and a
//! total for the type.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::{AccountBalance, AccountType, NormalBalance, normalize_label};

/// Display class of a free-form subtype label.
///
/// Ordering of the variants is the display priority.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SubtypeClass {
    /// "Current Asset", "Activo Corriente", "Pasivo Circulante".
    Current,
    /// "Non-current Liability", "Activo No Corriente", "Activo Fijo".
    NonCurrent,
    /// "Other", "Otros".
    Other,
    /// Anything else; sorted last.
    Unknown,
}

impl SubtypeClass {
    /// Classifies a subtype label.
    #[must_use]
    pub fn classify(label: &str) -> Self {
        let label = normalize_label(label).replace(['-', '_'], " ");

        if label.contains("non current")
            || label.contains("noncurrent")
            || label.contains("no corriente")
            || label.contains("no circulante")
            || label.contains("largo plazo")
            || label.contains("fijo")
        {
            Self::NonCurrent
        } else if label.contains("current")
            || label.contains("corriente")
            || label.contains("circulante")
            || label.contains("corto plazo")
        {
            Self::Current
        } else if label == "other" || label.starts_with("otro") || label.starts_with("other ") {
            Self::Other
        } else {
            Self::Unknown
        }
    }
}

/// Accounts sharing one subtype label.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubtypeGroup {
    /// Subtype label as returned by the store.
    pub subtype: String,
    /// Display class of the label.
    pub class: SubtypeClass,
    /// Accounts in input order.
    pub accounts: Vec<AccountBalance>,
    /// Sum of stored balances.
    pub total: Decimal,
}

/// Non-zero accounts of one type grouped by subtype.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroupedAccounts {
    /// Account type the groups were built for.
    pub account_type: AccountType,
    /// Groups in first-seen order.
    pub groups: Vec<SubtypeGroup>,
    /// Sum of stored balances across all groups.
    pub total: Decimal,
}

impl GroupedAccounts {
    /// Groups the accounts of `account_type`.
    ///
    /// Zero-balance accounts are dropped. Buckets are created on the first
    /// matching account, so group order follows input order.
    #[must_use]
    pub fn build<'a>(
        accounts: impl IntoIterator<Item = &'a AccountBalance>,
        account_type: AccountType,
    ) -> Self {
        let mut groups: Vec<SubtypeGroup> = Vec::new();
        let mut total = Decimal::ZERO;

        for account in accounts {
            if account.account_type != account_type || account.balance.is_zero() {
                continue;
            }

            total += account.balance;
            match groups.iter_mut().find(|g| g.subtype == account.subtype) {
                Some(group) => {
                    group.total += account.balance;
                    group.accounts.push(account.clone());
                }
                None => groups.push(SubtypeGroup {
                    subtype: account.subtype.clone(),
                    class: SubtypeClass::classify(&account.subtype),
                    accounts: vec![account.clone()],
                    total: account.balance,
                }),
            }
        }

        Self {
            account_type,
            groups,
            total,
        }
    }

    /// Normal balance side of the grouped type.
    #[must_use]
    pub const fn normal_balance(&self) -> NormalBalance {
        self.account_type.normal_balance()
    }

    /// Type total with the credit-normal sign flipped.
    #[must_use]
    pub fn display_total(&self) -> Decimal {
        self.normal_balance().display_value(self.total)
    }

    /// Stored total of every group in `class`.
    #[must_use]
    pub fn total_for_class(&self, class: SubtypeClass) -> Decimal {
        self.groups
            .iter()
            .filter(|g| g.class == class)
            .map(|g| g.total)
            .sum()
    }

    /// Display total of every group in `class`.
    #[must_use]
    pub fn display_total_for_class(&self, class: SubtypeClass) -> Decimal {
        self.normal_balance()
            .display_value(self.total_for_class(class))
    }

    /// All grouped accounts, group by group.
    pub fn accounts(&self) -> impl Iterator<Item = &AccountBalance> {
        self.groups.iter().flat_map(|g| g.accounts.iter())
    }

    /// Groups sorted Current → Non-current → Other → unknown labels.
    ///
    /// The sort is stable, so labels of the same class keep first-seen order.
    #[must_use]
    pub fn into_display_order(mut self) -> Self {
        self.groups.sort_by_key(|g| g.class);
        self
    }
}
