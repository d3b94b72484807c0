//! Property-based tests for transformers, datasets and classifiers.
//!
//! These tests verify invariants that should hold for all valid inputs,
//! using randomly generated series.

use approx::assert_relative_eq;
use proptest::prelude::*;
use ts_estimators::base::Transformer;
use ts_estimators::classification::dictionary_based::boss_distance;
use ts_estimators::classification::dictionary_based::Bag;
use ts_estimators::core::{TimeIndex, TimeSeries};
use ts_estimators::forecasting::pretrained::WindowedDataset;
use ts_estimators::transform::{
    ExponentTransformer, LogTransformer, Offset, SqrtTransformer,
};
use ts_estimators::utils::check_equal_time_index;

/// Strategy for generating series values, negative values included.
fn values_strategy(min_len: usize, max_len: usize) -> impl Strategy<Value = Vec<f64>> {
    prop::collection::vec(-100.0..100.0_f64, min_len..max_len)
}

/// Strategy for generating strictly positive values.
fn positive_strategy(min_len: usize, max_len: usize) -> impl Strategy<Value = Vec<f64>> {
    prop::collection::vec(0.1..1000.0_f64, min_len..max_len)
}

/// Strategy for small word-count bags.
fn bag_strategy() -> impl Strategy<Value = Bag> {
    prop::collection::hash_map(0u64..32, 1u32..10, 0..12)
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    /// Inverse transform recovers the input for non-zero powers.
    #[test]
    fn exponent_inverse_round_trip(
        values in values_strategy(1, 60),
        power in prop_oneof![Just(0.5), Just(2.0), Just(3.0), 0.2..4.0_f64],
    ) {
        let x = TimeSeries::from_values(values.clone());
        let mut t = ExponentTransformer::new(power, Offset::Auto);
        let fitted = t.fit_transform(&x).unwrap();
        let back = t.inverse_transform(&fitted).unwrap();
        for (a, b) in values.iter().zip(back.primary_values()) {
            assert_relative_eq!(a, b, epsilon = 1e-6, max_relative = 1e-6);
        }
    }

    /// The auto offset makes every shifted value non-negative.
    #[test]
    fn auto_offset_shifts_to_non_negative(values in values_strategy(1, 60)) {
        let mut t = ExponentTransformer::new(1.0, Offset::Auto);
        let out = t.fit_transform(&TimeSeries::from_values(values.clone())).unwrap();
        let min = values.iter().copied().fold(f64::INFINITY, f64::min);
        let expected = if min < 0.0 { -min } else { 0.0 };
        prop_assert_eq!(t.fitted_offsets().unwrap(), &[expected][..]);
        prop_assert!(out.primary_values().iter().all(|v| *v >= 0.0));
    }

    /// Square root and exponent 0.5 agree.
    #[test]
    fn sqrt_equals_half_power(values in values_strategy(1, 60), offset in 0.0..200.0_f64) {
        let x = TimeSeries::from_values(values);
        for offset in [Offset::Auto, Offset::Value(offset + 100.0)] {
            let mut sqrt = SqrtTransformer::new(offset);
            let mut exp = ExponentTransformer::new(0.5, offset);
            prop_assert_eq!(sqrt.fit_transform(&x).unwrap(), exp.fit_transform(&x).unwrap());
        }
    }

    /// Log transform is inverted by exp.
    #[test]
    fn log_inverse_round_trip(values in positive_strategy(1, 60)) {
        let x = TimeSeries::from_values(values.clone());
        let mut t = LogTransformer::default();
        let fitted = t.fit_transform(&x).unwrap();
        let back = t.inverse_transform(&fitted).unwrap();
        for (a, b) in values.iter().zip(back.primary_values()) {
            assert_relative_eq!(a, b, max_relative = 1e-9);
        }
    }

    /// Window count follows `max(n - window - horizon + 1, 0)`.
    #[test]
    fn dataset_length_formula(n in 0usize..80, window in 1usize..20, horizon in 1usize..10) {
        let dataset = WindowedDataset::new(vec![1.0; n], None, window, horizon).unwrap();
        let expected = (n as i64 - window as i64 - horizon as i64 + 1).max(0) as usize;
        prop_assert_eq!(dataset.len(), expected);
        prop_assert_eq!(dataset.iter().count(), expected);
        prop_assert!(dataset.get(expected).is_none());
    }

    /// Every window is a contiguous slice of the target.
    #[test]
    fn dataset_windows_slice_target(values in values_strategy(10, 60), window in 1usize..6, horizon in 1usize..4) {
        let dataset = WindowedDataset::new(values.clone(), None, window, horizon).unwrap();
        for (i, w) in dataset.iter().enumerate() {
            prop_assert_eq!(&w.past_values[..], &values[i..i + window]);
            prop_assert_eq!(&w.future_values[..], &values[i + window..i + window + horizon]);
            prop_assert_eq!(w.past_time_features.len(), window);
            prop_assert_eq!(w.future_time_features.len(), horizon);
        }
    }

    /// A bag is at distance zero from itself and the distance never
    /// exceeds the full squared count difference.
    #[test]
    fn boss_distance_properties(a in bag_strategy(), b in bag_strategy()) {
        prop_assert_eq!(boss_distance(&a, &a, f64::MAX), 0.0);
        let full: f64 = a
            .iter()
            .map(|(w, &c)| {
                let d = c as f64 - b.get(w).copied().unwrap_or(0) as f64;
                d * d
            })
            .sum();
        prop_assert_eq!(boss_distance(&a, &b, f64::MAX), full);
        if full > 0.0 {
            prop_assert_eq!(boss_distance(&a, &b, full / 2.0), f64::MAX);
        }
    }

    /// Series sharing an index always pass the equal-index check.
    #[test]
    fn equal_index_check_accepts_shared_index(a in values_strategy(1, 50), start in -20i64..20) {
        let index = TimeIndex::range_from(start, a.len());
        let x = TimeSeries::new(index.clone(), vec![a.clone()]).unwrap();
        let y = TimeSeries::new(index, vec![a.iter().map(|v| v * 2.0).collect()]).unwrap();
        prop_assert!(check_equal_time_index(&[&x, &y]).is_ok());

        let shifted = TimeSeries::new(TimeIndex::range_from(start + 1, a.len()), vec![a]).unwrap();
        prop_assert!(check_equal_time_index(&[&x, &shifted]).is_err());
    }
}
