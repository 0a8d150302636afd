// CSV serialization: deterministic output, strict validation, round-trips.


use pathoscore::AnnotateError;
use pathoscore::export::csv::{parse_csv, render_csv};
use test_helpers::{schema, store_of};

#[test]
fn rows_come_out_sorted_by_coordinate() {
    let schema = schema();
    let store = store_of(&[((30, 2), 1), ((4, 9), 0), ((4, 1), 5)]);

    let csv = render_csv(&store, &schema).unwrap();

    assert_eq!(
        csv,
        "X,Y,Label\n4,1,Ausente\n4,9,Completa 3+\n30,2,Completa 2+\n"
    );
}

#[test]
fn render_is_deterministic() {
    let schema = schema();
    let store = store_of(&[((10, 10), 0), ((1, 1), 1), ((5, 5), 2)]);

    let a = render_csv(&store, &schema).unwrap();
    let b = render_csv(&store, &schema).unwrap();

    assert_eq!(a, b);
}

#[test]
fn csv_round_trips_to_an_equal_store() {
    let schema = schema();
    let store = store_of(&[((0, 0), 0), ((12, 7), 3), ((999, 1), 5), ((12, 8), 3)]);

    let csv = render_csv(&store, &schema).unwrap();
    let parsed = parse_csv(&csv, &schema).unwrap();

    assert_eq!(parsed, store);
}

#[test]
fn unknown_label_name_is_rejected() {
    let schema = schema();
    let content = "X,Y,Label\n10,20,NotARealLabel\n";

    let err = parse_csv(content, &schema).unwrap_err();

    assert!(matches!(err, AnnotateError::UnknownLabel(name) if name == "NotARealLabel"));
}

#[test]
fn malformed_row_aborts_the_whole_read() {
    let schema = schema();
    // Second row is fine; the first one already fails the read
    let content = "X,Y,Label\nnope,20,Ausente\n10,20,Ausente\n";

    let err = parse_csv(content, &schema).unwrap_err();

    assert!(matches!(err, AnnotateError::MalformedRow { line: 2, .. }));
}

#[test]
fn missing_field_is_malformed() {
    let schema = schema();
    let content = "X,Y,Label\n10,20\n";

    let err = parse_csv(content, &schema).unwrap_err();

    assert!(matches!(err, AnnotateError::MalformedRow { .. }));
}

#[test]
fn wrong_header_is_rejected() {
    let schema = schema();
    let err = parse_csv("A,B,C\n1,2,Ausente\n", &schema).unwrap_err();
    assert!(matches!(err, AnnotateError::MalformedRow { line: 1, .. }));
}

#[test]
fn header_only_yields_an_empty_store() {
    let schema = schema();
    let store = parse_csv("X,Y,Label\n", &schema).unwrap();
    assert!(store.is_empty());
}

#[test]
fn blank_lines_are_tolerated() {
    let schema = schema();
    let store = parse_csv("X,Y,Label\n1,2,Ausente\n\n", &schema).unwrap();
    assert_eq!(store.len(), 1);
}

#[test]
fn out_of_range_label_index_fails_render() {
    let schema = schema();
    let store = store_of(&[((1, 1), 99)]);

    let err = render_csv(&store, &schema).unwrap_err();

    assert!(matches!(err, AnnotateError::LabelOutOfRange(99)));
}
