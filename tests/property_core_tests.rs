use proptest::prelude::*;
use three_point_story::core::{LinearScale, ScalePadding, build_linear_scale, monotone_x_path};

proptest! {
    #[test]
    fn scale_maps_domain_endpoints_to_range_endpoints(
        start in -1_000.0f64..1_000.0,
        span in 0.001f64..5_000.0,
        range_start in 0.0f64..1_000.0,
        range_span in 1.0f64..2_000.0
    ) {
        let scale = LinearScale::new((start, start + span), (range_start, range_start + range_span))
            .expect("valid scale");
        prop_assert!((scale.map(start) - range_start).abs() <= 1e-6);
        prop_assert!((scale.map(start + span) - (range_start + range_span)).abs() <= 1e-6);
    }

    #[test]
    fn scale_is_monotone_and_invertible(
        start in -1_000.0f64..1_000.0,
        span in 0.01f64..5_000.0,
        a in 0.0f64..1.0,
        b in 0.0f64..1.0
    ) {
        let scale = LinearScale::new((start, start + span), (400.0, 40.0)).expect("valid scale");
        let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
        let low_value = start + span * lo;
        let high_value = start + span * hi;

        // Inverted range: larger values sit higher (smaller y).
        prop_assert!(scale.map(high_value) <= scale.map(low_value) + 1e-9);
        prop_assert!((scale.invert(scale.map(low_value)) - low_value).abs() <= 1e-6 * span.max(1.0));
    }

    #[test]
    fn padded_domain_contains_every_value(
        values in prop::collection::vec(0.1f64..100.0, 1..40),
        headroom in 1.0f64..1.5
    ) {
        let scale = build_linear_scale(values.clone(), ScalePadding::from_zero(headroom), (300.0, 0.0))
            .expect("valid padding")
            .expect("non-empty values");
        let (lo, hi) = scale.domain();
        prop_assert!(values.iter().all(|value| *value >= lo && *value <= hi + 1e-9));
    }

    #[test]
    fn monotone_path_interpolates_every_sample(
        ys in prop::collection::vec(-50.0f64..50.0, 3..30)
    ) {
        let points: Vec<(f64, f64)> = ys
            .iter()
            .enumerate()
            .map(|(i, y)| (i as f64 * 10.0, *y))
            .collect();
        let commands = monotone_x_path(&points);
        prop_assert_eq!(commands.len(), points.len());
        for (command, point) in commands.iter().zip(&points) {
            prop_assert_eq!(command.end_point(), *point);
        }
    }
}
