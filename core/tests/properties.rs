mod common;

use chrono::{TimeZone, Utc};
use pretty_assertions::assert_eq;
use qbr::{
    build_field, is_ignored, is_zero, is_zero_value, parse_ignore_on, OperationType, StructField,
    Value,
};

#[test]
fn nilable_kinds() {
    for unset in [
        Value::Nil,
        Value::Ptr(None),
        Value::List(None),
        Value::Map(None),
        Value::Chan(None),
        Value::Dyn(None),
    ] {
        assert!(is_zero(&unset), "{unset:?} should be zero");
    }

    for set in [
        Value::Ptr(Some(Box::new(Value::Int(0)))),
        Value::List(Some(Vec::new())),
        Value::Map(Some(Default::default())),
        Value::Dyn(Some(Box::new(Value::Text(String::new())))),
    ] {
        assert!(!is_zero(&set), "{set:?} should not be zero");
    }
}

#[test]
fn scalars() {
    assert!(is_zero_value(""));
    assert!(!is_zero_value("x"));
    assert!(is_zero_value(&0));
    assert!(is_zero_value(&0.0));
    assert!(!is_zero_value(&-1));
    assert!(!is_zero_value(&false));
    assert!(!is_zero_value(&true));
}

#[test]
fn timestamps() {
    assert!(is_zero_value(&qbr::zero_instant()));
    let t = Utc.with_ymd_and_hms(1970, 1, 1, 0, 0, 0).unwrap();
    assert!(!is_zero_value(&t));
    assert!(Value::Time(Utc.with_ymd_and_hms(1, 1, 1, 0, 0, 0).unwrap()).is_zero());
}

#[test]
fn round_trip_descriptor() {
    common::init_test_logger();

    let field = StructField::new("name", r#"db:"name" qbr:"ignore_on=insert,update""#);
    let descriptor = build_field(&field).unwrap();
    assert_eq!(descriptor.column(), "name");
    assert_eq!(
        descriptor.ignore_on(),
        [OperationType::insert(), OperationType::update()].as_slice()
    );
    assert!(is_ignored(&descriptor, &OperationType::insert()));
    assert!(!is_ignored(&descriptor, &OperationType::select()));
}

#[test]
fn no_column_tag_no_descriptor() {
    assert!(build_field(&StructField::new("name", r#"qbr:"ignore_on=insert""#)).is_none());
    assert!(build_field(&StructField::new("name", "")).is_none());
}

#[test]
fn splitter_folds_case() {
    assert_eq!(
        parse_ignore_on("ignore_on=INSERT,,Update"),
        [OperationType::insert(), OperationType::update()]
    );
}

#[test]
fn unrecognized_directive_only() {
    common::init_test_logger();

    let descriptor = build_field(&StructField::new("name", r#"db:"name" qbr:"foo=bar""#)).unwrap();
    assert_eq!(descriptor.column(), "name");
    assert!(descriptor.ignore_on().is_empty());
}
