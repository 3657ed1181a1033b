use std::fs;

use chrono::NaiveDate;
use pretty_assertions::assert_eq;

use labentry::{
    FieldSpec, FieldType, FieldValue, FormSchema, RecordForm, RecordStore, StoreError,
    domain::SectionSpec,
};

fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 5, 17).expect("date")
}

fn greenhouse() -> RecordForm {
    let schema = FormSchema::new(
        vec![
            FieldSpec::new("Bench", FieldType::StringList).with_values(["N", "S"]),
            FieldSpec::new("Water", FieldType::Decimal)
                .with_range(0.0, 20.0)
                .with_increment(0.5),
            FieldSpec::new("Wilted", FieldType::Boolean).optional(),
        ],
        vec![SectionSpec::new("Watering", ["Bench", "Water", "Wilted"])],
    );
    RecordForm::from_schema(schema).expect("greenhouse form")
}

fn store_for(form: &RecordForm, dir: &std::path::Path) -> RecordStore {
    RecordStore::daily(dir, "greenhouse", today(), form.schema().field_names())
}

#[test]
fn saved_records_append_below_one_header() {
    let dir = tempfile::tempdir().expect("tempdir");
    let mut form = greenhouse();
    let store = store_for(&form, dir.path());

    for (bench, water) in [("N", "1.5"), ("S", "20")] {
        form.set("Bench", bench);
        form.set("Water", water);
        assert!(form.get_errors().is_empty());
        store.save_record(&form.get()).expect("save");
        form.reset(today());
    }

    let contents = fs::read_to_string(store.path()).expect("read records");
    assert_eq!(contents, "Bench,Water,Wilted\nN,1.5,false\nS,20.0,false\n");
    assert_eq!(
        store.path().file_name().and_then(|name| name.to_str()),
        Some("greenhouse_2024-05-17.csv")
    );
}

#[test]
fn empty_required_field_blocks_the_save() {
    let dir = tempfile::tempdir().expect("tempdir");
    let mut form = greenhouse();
    let store = store_for(&form, dir.path());
    form.set("Bench", "N");

    let errors = form.get_errors();
    assert_eq!(
        errors.get("Water").map(String::as_str),
        Some("A value is required.")
    );
    assert!(!errors.contains_key("Wilted"));
    assert!(!store.path().exists());
}

#[test]
fn record_missing_a_column_is_not_written() {
    let dir = tempfile::tempdir().expect("tempdir");
    let form = greenhouse();
    let store = store_for(&form, dir.path());
    let mut record = form.get();
    record.shift_remove("Wilted");

    let err = store.save_record(&record).expect_err("column mismatch");
    assert!(matches!(err, StoreError::ColumnMismatch { .. }));
    assert!(!store.path().exists());
}

#[test]
fn plot_sequence_carries_session_fields_until_the_last_plot() {
    let mut form = RecordForm::from_schema(FormSchema::abq()).expect("abq form");
    form.set("Lab", "C");
    form.set("Time", "16:00");
    form.set("Technician", "Q Murphy");
    form.set("Plot", "19");
    form.set("Humidity", "30");

    form.reset(today());
    assert_eq!(form.field("Plot").map(|f| f.get()), Some(FieldValue::text("20")));
    assert_eq!(form.field("Lab").map(|f| f.get()), Some(FieldValue::text("C")));
    assert_eq!(form.field("Humidity").map(|f| f.get()), Some(FieldValue::Empty));
    assert_eq!(
        form.field("Date").map(|f| f.get()),
        Some(FieldValue::text("2024-05-17"))
    );
    assert_eq!(form.focused_name(), Some("Seed sample"));

    form.reset(today());
    assert_eq!(form.field("Plot").map(|f| f.get()), Some(FieldValue::Empty));
    assert_eq!(form.field("Lab").map(|f| f.get()), Some(FieldValue::Empty));
    assert_eq!(form.focused_name(), Some("Time"));
    assert!(!form.is_dirty());
}

#[test]
fn height_bounds_follow_the_published_extremes() {
    let mut form = RecordForm::from_schema(FormSchema::abq()).expect("abq form");
    assert!(form.focus("Minimum Height"));
    form.set("Minimum Height", "2.5");
    assert!(form.focus("Maximum Height"));
    form.set("Maximum Height", "7.0");
    assert!(form.focus("Median Height"));

    form.set("Median Height", "8.0");
    let errors = form.get_errors();
    assert_eq!(
        errors.get("Median Height").map(String::as_str),
        Some("Value is too high (max 7)")
    );

    form.set("Median Height", "1.0");
    let errors = form.get_errors();
    assert_eq!(
        errors.get("Median Height").map(String::as_str),
        Some("Value is too low (min 2.5)")
    );
}
