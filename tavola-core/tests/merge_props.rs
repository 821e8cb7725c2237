use std::sync::Arc;

use chrono::NaiveDate;
use proptest::prelude::*;
use tavola_core::{
    HeaderDefinition, Row, SeriesId, SortOrder, TabularResult, merge_series,
};

fn arb_date() -> impl Strategy<Value = NaiveDate> {
    (0i64..20_000).prop_map(|days| {
        NaiveDate::from_ymd_opt(1990, 1, 1).unwrap() + chrono::Days::new(days as u64)
    })
}

fn arb_series() -> impl Strategy<Value = TabularResult> {
    // 1 value column up to 3, up to 20 rows of (date, nullable cents).
    (1usize..=3).prop_flat_map(|value_columns| {
        let names: Vec<String> = std::iter::once("Date".to_string())
            .chain((0..value_columns).map(|i| format!("C{i}")))
            .collect();
        proptest::collection::vec(
            (
                arb_date(),
                proptest::collection::vec(proptest::option::of(0i64..100_000), value_columns),
            ),
            0..20,
        )
        .prop_map(move |rows| {
            let header = Arc::new(HeaderDefinition::from_names(names.clone()).unwrap());
            let rows = rows
                .into_iter()
                .map(|(date, values)| {
                    let mut cells: Vec<Option<String>> =
                        vec![Some(date.format("%Y-%m-%d").to_string())];
                    cells.extend(values.into_iter().map(|v| v.map(|c| c.to_string())));
                    Row::new(Arc::clone(&header), cells).unwrap()
                })
                .collect();
            TabularResult::new(header, rows).unwrap()
        })
    })
}

fn arb_inputs() -> impl Strategy<Value = Vec<(SeriesId, TabularResult)>> {
    proptest::collection::vec(arb_series(), 0..5).prop_map(|tables| {
        tables
            .into_iter()
            .enumerate()
            .map(|(i, t)| (SeriesId::new(format!("S{i}")), t))
            .collect()
    })
}

proptest! {
    #[test]
    fn merged_width_and_row_width_invariant(inputs in arb_inputs()) {
        let merged = merge_series(&inputs, SortOrder::Ascending).unwrap();
        let expected_width: usize = 1 + inputs
            .iter()
            .map(|(_, t)| t.header().len() - 1)
            .sum::<usize>();
        prop_assert_eq!(merged.header().len(), expected_width);
        for row in merged.rows() {
            prop_assert_eq!(row.cells().len(), expected_width);
        }
    }

    #[test]
    fn merged_rows_are_strictly_ordered_by_date(inputs in arb_inputs()) {
        let ascending = merge_series(&inputs, SortOrder::Ascending).unwrap();
        let mut prev: Option<NaiveDate> = None;
        for row in ascending.rows() {
            let date = row.date_at(0).unwrap().unwrap();
            if let Some(p) = prev {
                prop_assert!(p < date);
            }
            prev = Some(date);
        }

        let descending = merge_series(&inputs, SortOrder::Descending).unwrap();
        let forward: Vec<_> = ascending.rows().iter().collect();
        let reverse: Vec<_> = descending.rows().iter().rev().collect();
        prop_assert_eq!(forward, reverse);
    }

    #[test]
    fn row_count_is_the_union_of_dates(inputs in arb_inputs()) {
        use std::collections::BTreeSet;
        let merged = merge_series(&inputs, SortOrder::Ascending).unwrap();
        let mut dates = BTreeSet::new();
        for (_, table) in &inputs {
            for row in table.rows() {
                if let Ok(Some(date)) = row.date_at(0) {
                    dates.insert(date);
                }
            }
        }
        prop_assert_eq!(merged.len(), dates.len());
    }

    #[test]
    fn merging_twice_is_idempotent(inputs in arb_inputs()) {
        let first = merge_series(&inputs, SortOrder::Ascending).unwrap();
        let second = merge_series(&inputs, SortOrder::Ascending).unwrap();
        prop_assert_eq!(first, second);
    }
}
