//! Catalog listing over a directory of generated datasets.

use pretty_assertions::assert_eq;
use tabula::prelude::*;
use tabula::{is_sas_directory, is_sas_file};
use tabula_sas::testing::{SasFileBuilder, TestColumn};

fn dataset(columns: &[&str], rows: usize) -> SasFileBuilder {
    let mut builder = SasFileBuilder::new();
    for name in columns {
        builder = builder.column(TestColumn::numeric(name, 8));
    }
    for r in 0..rows {
        builder = builder.row(vec![r as f64; columns.len()]);
    }
    builder
}

#[test]
fn test_catalog_tables() {
    let dir = tempfile::tempdir().unwrap();
    dataset(&["a", "b"], 3)
        .write_to(dir.path().join("first.sas7bdat"))
        .unwrap();
    dataset(&["x"], 25)
        .write_to(dir.path().join("second.sas7bdat"))
        .unwrap();
    std::fs::write(dir.path().join("readme.txt"), "not a table").unwrap();

    assert!(is_sas_directory(dir.path()));
    assert!(!is_sas_file(dir.path().join("readme.txt")));

    let catalog = SasCatalog::open(dir.path()).unwrap();
    assert_eq!(catalog.table_names().unwrap(), vec!["first", "second"]);

    let summary: Vec<(String, usize, u64)> = catalog
        .tables()
        .unwrap()
        .iter()
        .map(|t| (t.name().to_string(), t.columns().unwrap().len(), t.count().unwrap()))
        .collect();
    assert_eq!(
        summary,
        vec![("first".to_string(), 2, 3), ("second".to_string(), 1, 25)]
    );

    let second = catalog.table("second").unwrap();
    let rows = second
        .rows(&TableQuery::all().with_max_rows(2))
        .unwrap()
        .rows;
    assert_eq!(rows, vec![vec![Value::Numeric(0.0)], vec![Value::Numeric(1.0)]]);

    assert!(matches!(
        catalog.table("third"),
        Err(TableError::TableNotFound(_))
    ));
}

#[test]
fn test_catalog_options_reach_tables() {
    let dir = tempfile::tempdir().unwrap();
    let mut bytes = dataset(&["a"], 4).build();
    bytes[37] = 0x00; // big-endian hint
    std::fs::write(dir.path().join("hinted.sas7bdat"), bytes).unwrap();

    let strict = SasCatalog::open(dir.path()).unwrap();
    assert!(strict.table("hinted").unwrap().count().is_err());

    let lenient = SasCatalog::open(dir.path()).unwrap().with_options(
        SasReadOptions::default().with_layout(tabula::LayoutPolicy::AssumeLittleEndian32),
    );
    assert_eq!(lenient.table("hinted").unwrap().count().unwrap(), 4);
}
