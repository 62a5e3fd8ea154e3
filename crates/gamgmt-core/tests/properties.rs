//! Property tests over generated account hierarchies and column lists.

use std::ptr;

use assert_matches::assert_matches;
use gamgmt_core::prelude::*;
use proptest::prelude::*;
use serde_json::Value;

/// Per account, the number of profiles under each of its web properties.
fn shape() -> impl Strategy<Value = Vec<Vec<usize>>> {
    prop::collection::vec(prop::collection::vec(0usize..4, 0..4), 1..6)
}

fn build(shape: &[Vec<usize>]) -> Vec<Account> {
    let mut next_profile = 10_000i64;
    shape
        .iter()
        .enumerate()
        .map(|(ai, props)| {
            let account_id = 1000 + ai as i64;
            props.iter().enumerate().fold(
                Account::new(account_id, format!("Account {ai}")),
                |account, (pi, &profiles)| {
                    let prop = (0..profiles).fold(
                        WebProperty::new(format!("UA-{account_id}-{}", pi + 1), format!("Property {ai}.{pi}")),
                        |prop, _| {
                            next_profile += 1;
                            prop.with_profile(Profile::new(next_profile, format!("Profile {next_profile}")))
                        },
                    );
                    account.with_web_property(prop)
                },
            )
        })
        .collect()
}

fn column_strategy() -> impl Strategy<Value = Column> {
    (
        "[a-z]{1,8}",
        prop_oneof![Just("METRIC"), Just("DIMENSION"), Just("OTHER")],
        prop_oneof![Just("PUBLIC"), Just("DEPRECATED")],
    )
        .prop_map(|(name, ty, status)| {
            Column::new(
                format!("ga:{name}"),
                Attributes::new().with("type", ty).with("status", status),
            )
        })
}

proptest! {
    #[test]
    fn indexing_is_idempotent(shape in shape()) {
        let accounts = build(&shape);
        let a = AccountSummaries::new(accounts.clone());
        let b = AccountSummaries::new(accounts);

        for account in a.all() {
            prop_assert_eq!(a.get_account(&account.id), b.get_account(&account.id));
            for prop in account.web_properties() {
                prop_assert_eq!(a.get_web_property(&prop.id), b.get_web_property(&prop.id));
                for profile in prop.profiles() {
                    let sel = Selector::profile(&profile.id);
                    let ea = a.get(&sel).unwrap().map(|e| e.id().clone());
                    let eb = b.get(&sel).unwrap().map(|e| e.id().clone());
                    prop_assert_eq!(ea, eb);
                }
            }
        }
    }

    #[test]
    fn ancestors_are_consistent(shape in shape()) {
        let summaries = AccountSummaries::new(build(&shape));

        for account in summaries.all() {
            for prop in account.web_properties() {
                let owner = summaries.get_account_by_property_id(&prop.id);
                prop_assert!(owner.is_some_and(|o| ptr::eq(o, account)));

                for view in prop.views() {
                    let parent = summaries.get_property_by_view_id(&view.id);
                    let root = summaries.get_account_by_view_id(&view.id);
                    prop_assert!(parent.is_some_and(|p| ptr::eq(p, prop)));
                    prop_assert!(root.is_some_and(|r| ptr::eq(r, account)));
                }
            }
        }
    }

    #[test]
    fn aliases_are_equivalent(shape in shape()) {
        let summaries = AccountSummaries::new(build(&shape));

        for account in summaries.all() {
            prop_assert!(ptr::eq(account.properties(), account.web_properties()));
            for prop in account.properties() {
                prop_assert!(ptr::eq(prop.views(), prop.profiles()));
                let a = summaries.get_property(&prop.id);
                let b = summaries.get_web_property(&prop.id);
                prop_assert!(matches!((a, b), (Some(a), Some(b)) if ptr::eq(a, b)));
            }
        }
    }

    #[test]
    fn two_keys_are_always_ambiguous(account in 1i64..10_000, view in 1i64..10_000) {
        let summaries = AccountSummaries::new(Vec::new());
        let sel = Selector::account(account).with_view_id(view);
        assert_matches!(summaries.get(&sel), Err(MgmtError::AmbiguousSelector { .. }));
        prop_assert!(summaries.get(&Selector::view(view)).is_ok());
    }

    #[test]
    fn catalog_partitions_preserve_order(columns in prop::collection::vec(column_strategy(), 0..30)) {
        let catalog = ColumnCatalog::new(columns);
        let all: Vec<&str> = catalog.all(None).iter().map(|c| c.id.as_str()).collect();

        for c in catalog.columns() {
            match c.attributes.get("type").and_then(Value::as_str) {
                Some("METRIC") => prop_assert!(catalog.all_metrics(None).iter().any(|m| ptr::eq(*m, c))),
                Some("DIMENSION") => prop_assert!(catalog.all_dimensions(None).iter().any(|d| ptr::eq(*d, c))),
                _ => {}
            }
        }

        for part in [catalog.all_metrics(None), catalog.all_dimensions(None)] {
            let mut cursor = 0usize;
            for c in part {
                let pos = catalog.columns()[cursor..].iter().position(|x| ptr::eq(x, c));
                prop_assert!(pos.is_some());
                cursor += pos.unwrap_or(0) + 1;
            }
        }
        prop_assert_eq!(all.len(), catalog.len());
    }

    #[test]
    fn predicate_and_object_filters_agree(columns in prop::collection::vec(column_strategy(), 0..30)) {
        let catalog = ColumnCatalog::new(columns);
        let object = ColumnFilter::attributes([("type", "METRIC"), ("status", "PUBLIC")]);
        let predicate = ColumnFilter::predicate(|attrs: &Attributes, _id: &str| {
            attrs.get("type").and_then(Value::as_str) == Some("METRIC")
                && attrs.get("status").and_then(Value::as_str) == Some("PUBLIC")
        });

        let a: Vec<&str> = catalog.all(Some(&object)).iter().map(|c| c.id.as_str()).collect();
        let b: Vec<&str> = catalog.all(Some(&predicate)).iter().map(|c| c.id.as_str()).collect();
        prop_assert_eq!(a, b);
    }

    #[test]
    fn range_expansion_counts_indices(min in 0i64..20, span in 0i64..20) {
        let max = min + span;
        let columns = vec![Column::new(
            "ga:customVarNameXX",
            Attributes::new()
                .with("type", "DIMENSION")
                .with("uiName", "Custom Variable (Key XX)")
                .with("minTemplateIndex", min.to_string())
                .with("maxTemplateIndex", max.to_string()),
        )];
        let out = populate_columns(&columns, &[], &[], &[], false);
        let expected: Vec<String> = (min..=max).map(|i| format!("ga:customVarName{i}")).collect();
        let got: Vec<String> = out.into_iter().map(|c| c.id).collect();
        prop_assert_eq!(got, expected);
    }
}
