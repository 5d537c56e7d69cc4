//! End-to-end reconciliation over small in-memory frames.

use std::collections::BTreeMap;

use polars::prelude::{Column, DataFrame};

use recon_engine::{EngineConfig, reconcile, restructure_mismatches};
use recon_ingest::{ValueMaps, column_value_string};
use recon_model::{
    ColumnMap, ColumnPair, CrossReference, IdentityPair, ReconError, Side, TypeTag,
};

fn string_df(columns: Vec<(&str, Vec<&str>)>) -> DataFrame {
    let cols: Vec<Column> = columns
        .into_iter()
        .map(|(name, values)| {
            Column::new(
                name.into(),
                values.iter().map(|v| (*v).to_string()).collect::<Vec<_>>(),
            )
        })
        .collect();
    DataFrame::new(cols).expect("test frame")
}

fn source_frame() -> DataFrame {
    string_df(vec![
        ("img.FID", vec!["1", "2", "3", "9"]),
        (
            "enct.arrival_date",
            vec![
                "2024-04-02 10:30:00",
                "2024-05-10 08:00:00",
                "",
                "2024-04-20 12:00:00",
            ],
        ),
        ("enct.sex", vec!["1", "2", "", "1"]),
        ("flow.hypertension", vec!["1", "0", "true", "0"]),
    ])
}

fn target_frame() -> DataFrame {
    string_df(vec![
        (
            "Case ID",
            vec!["SSR-INS-101", "SSR-INS-102", "SSR-INS-103", "SSR-INS-404"],
        ),
        (
            "Arrival at hospital",
            vec![
                "02.04.2024 10:30:00",
                "10.05.2024 08:00:00",
                "15.06.2024 09:00:00",
                "01.04.2024 00:00:00",
            ],
        ),
        ("Sex", vec!["Male", "Female", "Female", "Male"]),
        ("Hypertension", vec!["no", "no", "", "yes"]),
    ])
}

fn cross_reference() -> CrossReference {
    let mut xref = CrossReference::new();
    for (source_id, target_id) in [(1, 101), (2, 102), (3, 103), (9, 909), (4, 404)] {
        assert!(xref.insert(source_id, target_id));
    }
    xref
}

fn column_map() -> ColumnMap {
    let mut map = ColumnMap::new();
    map.insert(ColumnPair {
        source_column: "enct.sex".to_string(),
        target_column: "Sex".to_string(),
        source_type: TypeTag::Int,
        target_type: TypeTag::Str,
        comparison_type: TypeTag::Str,
    });
    map.insert(ColumnPair {
        source_column: "flow.hypertension".to_string(),
        target_column: "Hypertension".to_string(),
        source_type: TypeTag::Bool,
        target_type: TypeTag::Bool,
        comparison_type: TypeTag::Bool,
    });
    map
}

fn sex_value_maps() -> ValueMaps {
    let mut dictionary = BTreeMap::new();
    dictionary.insert("1".to_string(), "Male".to_string());
    dictionary.insert("2".to_string(), "Female".to_string());
    let mut maps = ValueMaps::new();
    maps.insert("enct.sex".to_string(), dictionary);
    maps
}

#[test]
fn partitions_identities_and_classifies_comparisons() {
    let outcome = reconcile(
        &source_frame(),
        &target_frame(),
        &column_map(),
        &cross_reference(),
        &sex_value_maps(),
        &EngineConfig::default(),
    )
    .expect("reconcile");

    assert_eq!(
        outcome.identity.common,
        vec![
            IdentityPair::new(1, 101),
            IdentityPair::new(2, 102),
            IdentityPair::new(3, 103),
        ]
    );
    assert_eq!(outcome.identity.only_in_source, vec![IdentityPair::new(9, 909)]);
    assert_eq!(outcome.identity.only_in_target, vec![IdentityPair::new(4, 404)]);

    // Patient 1: sex matches after code mapping, hypertension 1 vs no
    // mismatches. Patient 2: both match. Patient 3: sex missing in the
    // source export, hypertension missing in the registry.
    assert_eq!(outcome.overall.total_compared, 6);
    assert_eq!(outcome.overall.matches, 3);
    assert_eq!(outcome.overall.mismatches, 1);
    assert_eq!(outcome.overall.missing_in_source, 1);
    assert_eq!(outcome.overall.missing_in_target, 1);
    assert_eq!(outcome.overall.match_percent, 50.0);
    assert_eq!(outcome.skipped_identities, 0);

    assert_eq!(outcome.mismatches.len(), 1);
    let mismatch = &outcome.mismatches[0];
    assert_eq!(mismatch.identity, IdentityPair::new(1, 101));
    assert_eq!(mismatch.source_column, "flow.hypertension");
    assert_eq!(mismatch.source_value, "1");
    assert_eq!(mismatch.target_value, "no");
}

#[test]
fn buckets_by_source_month_with_target_fallback() {
    let outcome = reconcile(
        &source_frame(),
        &target_frame(),
        &column_map(),
        &cross_reference(),
        &sex_value_maps(),
        &EngineConfig::default(),
    )
    .expect("reconcile");

    // Patient 3 has no source arrival date; June comes from the
    // registry side.
    let months: Vec<u32> = outcome.monthly.keys().copied().collect();
    assert_eq!(months, vec![4, 5, 6]);
    assert_eq!(outcome.monthly[&4].total_compared, 2);
    assert_eq!(outcome.monthly[&4].mismatches, 1);
    assert_eq!(outcome.monthly[&5].matches, 2);
    assert_eq!(outcome.monthly[&6].missing_in_source, 1);
    assert_eq!(outcome.monthly[&6].missing_in_target, 1);
}

#[test]
fn per_variable_statistics_use_pair_labels() {
    let outcome = reconcile(
        &source_frame(),
        &target_frame(),
        &column_map(),
        &cross_reference(),
        &sex_value_maps(),
        &EngineConfig::default(),
    )
    .expect("reconcile");

    let sex = &outcome.by_variable["enct.sex -> Sex"];
    assert_eq!(sex.matches, 2);
    assert_eq!(sex.missing_in_source, 1);
    let hypertension = &outcome.by_variable["flow.hypertension -> Hypertension"];
    assert_eq!(hypertension.matches, 1);
    assert_eq!(hypertension.mismatches, 1);
    assert_eq!(hypertension.missing_in_target, 1);
}

#[test]
fn out_of_scope_months_are_skipped_entirely() {
    let source = string_df(vec![
        ("img.FID", vec!["1"]),
        ("enct.arrival_date", vec!["2024-02-01 09:00:00"]),
        ("enct.sex", vec!["1"]),
        ("flow.hypertension", vec!["1"]),
    ]);
    let target = string_df(vec![
        ("Case ID", vec!["SSR-INS-101"]),
        ("Arrival at hospital", vec!["01.02.2024 09:00:00"]),
        ("Sex", vec!["Male"]),
        ("Hypertension", vec!["yes"]),
    ]);
    let outcome = reconcile(
        &source,
        &target,
        &column_map(),
        &cross_reference(),
        &sex_value_maps(),
        &EngineConfig::default(),
    )
    .expect("reconcile");

    assert_eq!(outcome.identity.common.len(), 1);
    assert_eq!(outcome.skipped_identities, 1);
    assert_eq!(outcome.overall.total_compared, 0);
    assert_eq!(outcome.overall.match_percent, 0.0);
    assert!(outcome.monthly.is_empty());
}

#[test]
fn missing_date_column_fails_fast() {
    let source = string_df(vec![("img.FID", vec!["1"]), ("enct.sex", vec!["1"])]);
    let error = reconcile(
        &source,
        &target_frame(),
        &column_map(),
        &cross_reference(),
        &ValueMaps::new(),
        &EngineConfig::default(),
    )
    .expect_err("must fail");
    match error {
        ReconError::MissingDateColumn { side, column } => {
            assert_eq!(side, Side::Source);
            assert_eq!(column, "enct.arrival_date");
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn missing_identity_column_fails_fast() {
    let target = string_df(vec![
        ("Arrival at hospital", vec!["02.04.2024 10:30:00"]),
        ("Sex", vec!["Male"]),
    ]);
    let error = reconcile(
        &source_frame(),
        &target,
        &column_map(),
        &cross_reference(),
        &ValueMaps::new(),
        &EngineConfig::default(),
    )
    .expect_err("must fail");
    match error {
        ReconError::MissingIdentityColumn { side, column } => {
            assert_eq!(side, Side::Target);
            assert_eq!(column, "Case ID");
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn repeated_runs_are_identical() {
    let first = reconcile(
        &source_frame(),
        &target_frame(),
        &column_map(),
        &cross_reference(),
        &sex_value_maps(),
        &EngineConfig::default(),
    )
    .expect("first run");
    let second = reconcile(
        &source_frame(),
        &target_frame(),
        &column_map(),
        &cross_reference(),
        &sex_value_maps(),
        &EngineConfig::default(),
    )
    .expect("second run");

    assert_eq!(first.overall, second.overall);
    assert_eq!(first.monthly, second.monthly);
    assert_eq!(first.by_variable, second.by_variable);
    assert_eq!(first.mismatches.len(), second.mismatches.len());
}

#[test]
fn mismatch_table_pivots_per_patient() {
    let outcome = reconcile(
        &source_frame(),
        &target_frame(),
        &column_map(),
        &cross_reference(),
        &sex_value_maps(),
        &EngineConfig::default(),
    )
    .expect("reconcile");

    let table = restructure_mismatches(&outcome.mismatches, &column_map().source_columns())
        .expect("restructure");
    assert_eq!(table.height(), 1);
    assert_eq!(column_value_string(&table, "source_id", 0), "1");
    assert_eq!(column_value_string(&table, "target_id", 0), "101");
    assert_eq!(column_value_string(&table, "enct.sex_target", 0), "");
    assert_eq!(
        column_value_string(&table, "flow.hypertension_target", 0),
        "no"
    );
    assert_eq!(
        column_value_string(&table, "flow.hypertension_source", 0),
        "1"
    );
}
