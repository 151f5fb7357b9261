mod common;

use common::ScriptedOracle;
use inventory_managed::batch::run_batch;
use inventory_managed::cli::Action;
use inventory_managed::sheet::Sheet;
use inventory_managed::store::Store;

fn seeded_store() -> Store {
    let store = Store::open_in_memory().expect("open store");
    store.init(false).expect("init table");
    store
        .insert(
            &[
                "NAME".to_string(),
                "CATEGORY".to_string(),
                "BRAND".to_string(),
                "STOCK".to_string(),
            ],
            &[
                Some("Widget".to_string()),
                Some("Tools".to_string()),
                Some("Acme".to_string()),
                Some("7".to_string()),
            ],
        )
        .expect("seed product");
    store
}

fn sheet(headers: &[&str], rows: &[&[&str]]) -> Sheet {
    Sheet {
        headers: headers.iter().map(|h| h.to_string()).collect(),
        rows: rows
            .iter()
            .map(|row| row.iter().map(|cell| cell.to_string()).collect())
            .collect(),
    }
}

#[test]
fn add_batch_upserts_by_name_without_new_columns() {
    let store = seeded_store();
    let oracle = ScriptedOracle::new(&[("Item", "NAME"), ("Cat", "CATEGORY"), ("Qty", "STOCK")]);
    let upload = sheet(
        &["Item", "Cat", "Qty"],
        &[
            &["Widget", "Gadgets", "9"],
            &["Sprocket", "Tools", "3"],
            &["Gear", "Tools", "5"],
        ],
    );
    let columns_before = store.column_names().expect("columns");

    let report = run_batch(&store, &upload, Action::Add, &oracle).expect("batch");

    assert_eq!(report.rows_processed, 3);
    assert_eq!(report.updated, 1);
    assert_eq!(report.inserted, 2);
    assert_eq!(report.deleted, 0);
    assert!(report.columns_added.is_empty());
    assert_eq!(store.column_names().expect("columns"), columns_before);
    assert_eq!(oracle.query_count(), 3);

    let output = store
        .query("SELECT NAME, CATEGORY, BRAND, STOCK FROM PRODUCT ORDER BY ID")
        .expect("query");
    assert_eq!(
        output.rows,
        vec![
            // Updated in place; BRAND was not in the upload and survives.
            vec!["Widget", "Gadgets", "Acme", "9"],
            vec!["Sprocket", "Tools", "", "3"],
            vec!["Gear", "Tools", "", "5"],
        ]
    );
}

#[test]
fn unknown_headers_grow_the_schema_once() {
    let store = seeded_store();
    let oracle = ScriptedOracle::new(&[
        ("Item", "NAME"),
        ("Shade", "COLOR"),
        ("Colour", "COLOR"),
        ("Mass", "WEIGHT"),
    ]);
    let upload = sheet(
        &["Item", "Shade", "Colour", "Mass"],
        &[&["Widget", "red", "crimson", "1.5"]],
    );

    let report = run_batch(&store, &upload, Action::Add, &oracle).expect("batch");

    // Two headers mapped onto COLOR; the column is added a single time and
    // the later cell wins.
    assert_eq!(report.columns_added, vec!["COLOR", "WEIGHT"]);
    let output = store
        .query("SELECT COLOR, WEIGHT FROM PRODUCT WHERE NAME='Widget'")
        .expect("query");
    assert_eq!(output.rows, vec![vec!["crimson", "1.5"]]);
}

#[test]
fn reimporting_the_same_sheet_is_schema_idempotent() {
    let store = seeded_store();
    let oracle = ScriptedOracle::new(&[("Item", "NAME"), ("Shade", "COLOR")]);
    let upload = sheet(&["Item", "Shade"], &[&["Widget", "red"]]);

    let first = run_batch(&store, &upload, Action::Add, &oracle).expect("first batch");
    let second = run_batch(&store, &upload, Action::Add, &oracle).expect("second batch");

    assert_eq!(first.columns_added, vec!["COLOR"]);
    assert!(second.columns_added.is_empty());
    assert_eq!(second.updated, 1);
    assert_eq!(store.product_count().expect("count"), 1);
}

#[test]
fn remove_batch_deletes_known_names_and_ignores_unknown() {
    let store = seeded_store();
    let oracle = ScriptedOracle::new(&[("Item", "NAME")]);
    let upload = sheet(&["Item"], &[&["Widget"], &["Ghost"]]);

    let report = run_batch(&store, &upload, Action::Remove, &oracle).expect("batch");

    assert_eq!(report.rows_processed, 2);
    assert_eq!(report.deleted, 2);
    assert_eq!(store.product_count().expect("count"), 0);
}

#[test]
fn modify_batch_updates_mapped_columns_only() {
    let store = seeded_store();
    let oracle = ScriptedOracle::new(&[("Item", "NAME"), ("Qty", "STOCK")]);
    let upload = sheet(&["Item", "Qty"], &[&["Widget", "42"], &["Ghost", "1"]]);

    let report = run_batch(&store, &upload, Action::Modify, &oracle).expect("batch");

    assert_eq!(report.updated, 2);
    let output = store
        .query("SELECT CATEGORY, STOCK FROM PRODUCT WHERE NAME='Widget'")
        .expect("query");
    assert_eq!(output.rows, vec![vec!["Tools", "42"]]);
    assert_eq!(store.product_count().expect("count"), 1);
}

#[test]
fn sheet_without_a_name_equivalent_column_never_matches_existing_rows() {
    let store = seeded_store();
    let oracle = ScriptedOracle::new(&[("Cat", "CATEGORY")]);
    let upload = sheet(&["Cat"], &[&["Gadgets"]]);

    let report = run_batch(&store, &upload, Action::Remove, &oracle).expect("batch");

    // NAME = NULL matches nothing; the delete affects zero rows.
    assert_eq!(report.deleted, 1);
    assert_eq!(store.product_count().expect("count"), 1);
}
