use std::panic::{catch_unwind, AssertUnwindSafe};

use rstest::rstest;
use rows_utils::api::{CollectableRow, Rows};
use rows_utils::types::Value;
use rows_utils::{append_rows, collect_rows, for_each_row, impl_scan_struct};

use crate::util::{init_logger, MockError, MockRows};

type RowToString = fn(&dyn CollectableRow<Error = MockError>) -> Result<String, MockError>;

fn scan_string(row: &dyn CollectableRow<Error = MockError>) -> Result<String, MockError> {
    let mut res = String::new();
    row.scan(&mut [&mut res])?;
    Ok(res)
}

fn fail(_: &dyn CollectableRow<Error = MockError>) -> Result<String, MockError> {
    Err(MockError("test"))
}

fn ignore(_: &dyn CollectableRow<Error = MockError>) -> Result<String, MockError> {
    Ok(String::new())
}

#[rstest]
#[case::ok(
    MockRows::strings(&["a"]),
    scan_string,
    Ok(vec!["a"]),
    &["next", "scan", "next", "err", "close"],
)]
#[case::err_at_func(
    MockRows::strings(&["a"]),
    fail,
    Err("test"),
    &["next", "close"],
)]
#[case::err_at_rows(
    MockRows::strings(&["a"]).with_err("test"),
    ignore,
    Err("test"),
    &["next", "next", "err", "close"],
)]
#[case::empty(
    MockRows::strings(&[]),
    scan_string,
    Ok(vec![]),
    &["next", "err", "close"],
)]
fn collect(
    #[case] mut rows: MockRows,
    #[case] f: RowToString,
    #[case] expected: Result<Vec<&str>, &'static str>,
    #[case] expected_calls: &[&str],
) {
    init_logger();

    let res = collect_rows(&mut rows, f);

    similar_asserts::assert_eq!(
        res,
        expected
            .map(|v| v.into_iter().map(String::from).collect::<Vec<_>>())
            .map_err(MockError)
    );
    assert_eq!(rows.calls(), expected_calls);
}

#[rstest]
#[case::ok(
    MockRows::strings(&["a"]),
    scan_string,
    Ok(vec!["test-1", "a"]),
    &["next", "scan", "next", "err", "close"],
)]
#[case::err_at_func(
    MockRows::strings(&["a"]),
    fail,
    Err("test"),
    &["next", "close"],
)]
#[case::err_at_rows(
    MockRows::strings(&["a"]).with_err("test"),
    ignore,
    Err("test"),
    &["next", "next", "err", "close"],
)]
fn append(
    #[case] mut rows: MockRows,
    #[case] f: RowToString,
    #[case] expected: Result<Vec<&str>, &'static str>,
    #[case] expected_calls: &[&str],
) {
    init_logger();

    let slice = vec!["test-1".to_string()];
    let res = append_rows(slice, &mut rows, f);

    similar_asserts::assert_eq!(
        res,
        expected
            .map(|v| v.into_iter().map(String::from).collect::<Vec<_>>())
            .map_err(MockError)
    );
    assert_eq!(rows.calls(), expected_calls);
}

#[rstest]
#[case::ok(MockRows::strings(&["a", "b"]), None, &["next", "scan", "next", "scan", "next", "err", "close"])]
#[case::error(MockRows::strings(&["a", "b"]), Some("test"), &["next", "close"])]
#[case::err_at_rows(MockRows::strings(&[]).with_err("test"), Some("test"), &["next", "err", "close"])]
fn for_each(
    #[case] mut rows: MockRows,
    #[case] fail_with: Option<&'static str>,
    #[case] expected_calls: &[&str],
) {
    init_logger();

    let res = for_each_row(&mut rows, |row| match fail_with {
        Some(msg) => Err(MockError(msg)),
        None => scan_string(row).map(|_| ()),
    });

    assert_eq!(res.is_err(), fail_with.is_some());
    if let Err(e) = res {
        assert_eq!(e, MockError(fail_with.unwrap()));
    }
    assert_eq!(rows.calls(), expected_calls);
}

#[test]
fn collect_keeps_row_order() {
    init_logger();

    let values: Vec<i64> = (0..100).collect();
    let rows = values.iter().map(|v| vec![Value::Int64(*v)]).collect();
    let mut rows = MockRows::new(&["n"], rows);

    let collected = collect_rows(&mut rows, |row| {
        let mut n = 0_i64;
        row.scan(&mut [&mut n])?;
        Ok::<_, MockError>(n)
    })
    .unwrap();

    similar_asserts::assert_eq!(collected, values);
    assert_eq!(rows.calls().iter().filter(|c| **c == "close").count(), 1);
}

#[test]
fn append_discards_partial_results() {
    init_logger();

    let mut rows = MockRows::strings(&["a", "b", "c"]);

    let mut seen = 0;
    let res = append_rows(vec!["initial".to_string()], &mut rows, |row| {
        seen += 1;
        if seen == 3 {
            return Err(MockError("third"));
        }
        scan_string(row)
    });

    assert_eq!(res, Err(MockError("third")));
    assert_eq!(seen, 3);
    assert_eq!(
        rows.calls(),
        ["next", "scan", "next", "scan", "next", "close"]
    );
}

#[test]
fn for_each_keeps_side_effects_before_failure() {
    init_logger();

    let mut rows = MockRows::strings(&["a", "b", "c"]);

    let mut visited = Vec::new();
    let res = for_each_row(&mut rows, |row| {
        let s = scan_string(row)?;
        if s == "c" {
            return Err(MockError("c is not allowed"));
        }
        visited.push(s);
        Ok(())
    });

    assert_eq!(res, Err(MockError("c is not allowed")));
    assert_eq!(visited, ["a", "b"]);
}

#[test]
fn close_error_is_ignored() {
    init_logger();

    let mut rows = MockRows::strings(&["a"]).with_close_err("cannot close");
    let res = collect_rows(&mut rows, scan_string);
    assert_eq!(res, Ok(vec!["a".to_string()]));

    let mut rows = MockRows::strings(&["a"]).with_close_err("cannot close");
    let res = collect_rows(&mut rows, fail);
    assert_eq!(res, Err(MockError("test")));

    let mut rows = MockRows::strings(&[])
        .with_err("terminal")
        .with_close_err("cannot close");
    let res = collect_rows(&mut rows, scan_string);
    assert_eq!(res, Err(MockError("terminal")));
    assert_eq!(rows.calls(), ["next", "err", "close"]);
}

#[test]
fn rows_are_closed_on_panic() {
    init_logger();

    let mut rows = MockRows::strings(&["a", "b"]);

    let res = catch_unwind(AssertUnwindSafe(|| {
        for_each_row::<_, MockError, _>(&mut rows, |_| panic!("transform panicked"))
    }));

    assert!(res.is_err());
    assert_eq!(rows.calls(), ["next", "close"]);
}

#[test]
fn owned_and_boxed_rows() {
    init_logger();

    let rows = MockRows::strings(&["a", "b"]);
    let log = rows.call_log();
    let res = collect_rows(rows, scan_string);
    assert_eq!(res, Ok(vec!["a".to_string(), "b".to_string()]));
    assert_eq!(log.borrow().last(), Some(&"close"));

    let rows = MockRows::strings(&["a"]);
    let log = rows.call_log();
    let rows: Box<dyn Rows<Error = MockError>> = Box::new(rows);
    let res = collect_rows(rows, scan_string);
    assert_eq!(res, Ok(vec!["a".to_string()]));
    assert_eq!(*log.borrow(), ["next", "scan", "next", "err", "close"]);
}

#[derive(Debug, PartialEq, thiserror::Error)]
enum AppError {
    #[error(transparent)]
    Rows(#[from] MockError),

    #[error("invalid value: {0}")]
    Invalid(String),
}

#[test]
fn caller_error_type() {
    init_logger();

    let parse = |row: &dyn CollectableRow<Error = MockError>| -> Result<u32, AppError> {
        let s = scan_string(row)?;
        s.parse::<u32>().map_err(|_| AppError::Invalid(s))
    };

    let mut rows = MockRows::strings(&["1", "2"]);
    assert_eq!(collect_rows(&mut rows, parse), Ok(vec![1, 2]));

    let mut rows = MockRows::strings(&["1", "x", "3"]);
    assert_eq!(
        collect_rows(&mut rows, parse),
        Err(AppError::Invalid("x".into()))
    );

    let mut rows = MockRows::strings(&["1"]).with_err("terminal");
    assert_eq!(
        collect_rows(&mut rows, parse),
        Err(AppError::Rows(MockError("terminal")))
    );
}

#[derive(Debug, Default, PartialEq)]
struct Pair {
    key: String,
    value: Option<i64>,
}

impl_scan_struct!(Pair {
    key => "k",
    value => "v",
});

#[test]
fn row_introspection() {
    init_logger();

    let rows = vec![
        vec![Value::Utf8("a".into()), Value::Int64(1)],
        vec![Value::Utf8("b".into()), Value::Null],
    ];
    let mut rows = MockRows::new(&["k", "v"], rows)
        .with_totals(vec![Value::Utf8("total".into()), Value::Int64(1)]);

    let pairs = collect_rows(&mut rows, |row| {
        assert_eq!(row.columns(), ["k", "v"]);
        assert_eq!(row.column_types().len(), 2);

        let (mut key, mut total) = (String::new(), 0_i64);
        row.totals(&mut [&mut key, &mut total])?;
        assert_eq!((key.as_str(), total), ("total", 1));

        let mut pair = Pair::default();
        row.scan_struct(&mut pair)?;
        Ok::<_, MockError>(pair)
    })
    .unwrap();

    similar_asserts::assert_eq!(
        pairs,
        vec![
            Pair {
                key: "a".into(),
                value: Some(1)
            },
            Pair {
                key: "b".into(),
                value: None
            },
        ]
    );
}
