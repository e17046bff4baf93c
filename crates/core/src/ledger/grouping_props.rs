//! Property-based tests for balance grouping.

use balanza_shared::types::AccountId;
use proptest::prelude::*;
use rust_decimal::Decimal;

use super::{AccountBalance, AccountType, GroupedAccounts};

const SUBTYPES: [&str; 4] = [
    "Activo Corriente",
    "Activo No Corriente",
    "Otros",
    "Intangibles",
];

/// Strategy for a balance in cents, zero included on purpose.
fn balance_strategy() -> impl Strategy<Value = Decimal> {
    prop_oneof![
        Just(Decimal::ZERO),
        (-10_000_000i64..10_000_000i64).prop_map(|cents| Decimal::new(cents, 2)),
    ]
}

/// Strategy for a mixed list of asset and liability rows.
fn rows_strategy() -> impl Strategy<Value = Vec<AccountBalance>> {
    prop::collection::vec((0usize..4, balance_strategy(), any::<bool>()), 0..40).prop_map(
        |specs| {
            specs
                .into_iter()
                .enumerate()
                .map(|(i, (subtype, balance, is_asset))| {
                    AccountBalance::new(
                        AccountId(i as i64),
                        format!("Cuenta {i}"),
                        if is_asset {
                            AccountType::Asset
                        } else {
                            AccountType::Liability
                        },
                        Some(SUBTYPES[subtype].to_string()),
                        balance,
                    )
                })
                .collect()
        },
    )
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// Zero-balance accounts never appear in any group or total.
    #[test]
    fn prop_zero_balances_excluded(rows in rows_strategy()) {
        let grouped = GroupedAccounts::build(&rows, AccountType::Asset);

        prop_assert!(grouped.accounts().all(|a| !a.balance.is_zero()));
        prop_assert!(grouped.groups.iter().all(|g| !g.accounts.is_empty()));
    }

    /// Each subtype total equals the sum of its matching input rows.
    #[test]
    fn prop_group_total_matches_input(rows in rows_strategy()) {
        let grouped = GroupedAccounts::build(&rows, AccountType::Asset);

        for group in &grouped.groups {
            let expected: Decimal = rows
                .iter()
                .filter(|r| r.account_type == AccountType::Asset && r.subtype == group.subtype)
                .map(|r| r.balance)
                .sum();
            prop_assert_eq!(group.total, expected);
            prop_assert_eq!(group.total, group.accounts.iter().map(|a| a.balance).sum::<Decimal>());
        }

        let type_total: Decimal = rows
            .iter()
            .filter(|r| r.account_type == AccountType::Asset)
            .map(|r| r.balance)
            .sum();
        prop_assert_eq!(grouped.total, type_total);
    }

    /// Only accounts of the requested type are grouped.
    #[test]
    fn prop_only_requested_type(rows in rows_strategy()) {
        let grouped = GroupedAccounts::build(&rows, AccountType::Liability);
        prop_assert!(grouped.accounts().all(|a| a.account_type == AccountType::Liability));
    }

    /// Grouping the same input twice yields the same structure.
    #[test]
    fn prop_deterministic(rows in rows_strategy()) {
        let first = GroupedAccounts::build(&rows, AccountType::Asset);
        let second = GroupedAccounts::build(&rows, AccountType::Asset);
        prop_assert_eq!(first, second);
    }
}
