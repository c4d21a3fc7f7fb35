use approx::assert_relative_eq;
use three_point_story::core::{
    BandScale, DomainFloor, LinearScale, Margins, PathCommand, PlotArea, ScalePadding, Viewport,
    build_linear_scale, build_year_scale, monotone_x_path, path_length,
};

#[test]
fn scale_round_trip_within_tolerance() {
    let scale = LinearScale::new((1980.0, 2024.0), (40.0, 820.0)).expect("valid scale");
    let px = scale.map(1997.5);
    assert_relative_eq!(scale.invert(px), 1997.5, epsilon = 1e-9);
}

#[test]
fn inverted_range_puts_larger_values_higher() {
    let scale = LinearScale::new((0.0, 40.0), (350.0, 50.0)).expect("valid scale");
    assert_relative_eq!(scale.map(0.0), 350.0, epsilon = 1e-9);
    assert_relative_eq!(scale.map(40.0), 50.0, epsilon = 1e-9);
    assert!(scale.map(30.0) < scale.map(10.0));
}

#[test]
fn degenerate_domain_is_widened() {
    let zero = LinearScale::new((0.0, 0.0), (0.0, 100.0)).expect("zero domain");
    assert_eq!(zero.domain(), (-0.5, 0.5));

    let flat = LinearScale::new((20.0, 20.0), (0.0, 100.0)).expect("flat domain");
    assert_relative_eq!(flat.domain().0, 19.0, epsilon = 1e-9);
    assert_relative_eq!(flat.domain().1, 21.0, epsilon = 1e-9);
    assert_relative_eq!(flat.map(20.0), 50.0, epsilon = 1e-9);
}

#[test]
fn non_finite_domain_is_rejected() {
    assert!(LinearScale::new((f64::NAN, 1.0), (0.0, 100.0)).is_err());
    assert!(LinearScale::new((0.0, 1.0), (0.0, f64::INFINITY)).is_err());
}

#[test]
fn padding_rules_shape_the_domain() {
    let values = [12.0, 20.0, 16.0];
    let zero = build_linear_scale(values, ScalePadding::from_zero(1.1), (300.0, 0.0))
        .expect("scale")
        .expect("non-empty");
    assert_relative_eq!(zero.domain().0, 0.0, epsilon = 1e-9);
    assert_relative_eq!(zero.domain().1, 22.0, epsilon = 1e-9);

    let dual = build_linear_scale(values, ScalePadding::dual_range(1.05), (300.0, 0.0))
        .expect("scale")
        .expect("non-empty");
    assert_relative_eq!(dual.domain().0, 11.4, epsilon = 1e-9);
    assert_relative_eq!(dual.domain().1, 21.0, epsilon = 1e-9);

    assert!(
        build_linear_scale(
            values,
            ScalePadding::new(DomainFloor::ScaledMin(-1.0), 1.1),
            (0.0, 1.0)
        )
        .is_err()
    );
}

#[test]
fn empty_values_produce_no_scale() {
    let scale = build_linear_scale(Vec::<f64>::new(), ScalePadding::default(), (0.0, 100.0))
        .expect("valid padding");
    assert!(scale.is_none());
    assert!(build_year_scale(Vec::<f64>::new(), (0.0, 100.0)).expect("ok").is_none());
}

#[test]
fn year_scale_spans_exact_extent() {
    let scale = build_year_scale([2015.0, 2020.0, 2017.0], (0.0, 500.0))
        .expect("scale")
        .expect("non-empty");
    assert_eq!(scale.domain(), (2015.0, 2020.0));
    let ticks = scale.ticks(10);
    assert_eq!(ticks.first().copied(), Some(2015.0));
    assert_eq!(ticks.last().copied(), Some(2020.0));
}

#[test]
fn plot_area_respects_margins() {
    let plot = PlotArea::from_viewport(Viewport::new(1160, 400), Margins::new(40.0, 340.0, 50.0, 60.0))
        .expect("plot");
    assert_relative_eq!(plot.width, 760.0, epsilon = 1e-9);
    assert_relative_eq!(plot.height, 310.0, epsilon = 1e-9);
    assert_eq!(plot.y_range(), (plot.bottom(), plot.top));

    assert!(
        PlotArea::from_viewport(Viewport::new(300, 100), Margins::new(40.0, 340.0, 50.0, 60.0))
            .is_err()
    );
}

#[test]
fn band_scale_centers_categories() {
    let scale = BandScale::new(["Jazz", "Nets", "Bucks"], (0.0, 300.0), 0.1).expect("bands");
    assert_eq!(scale.len(), 3);
    let first = scale.position("Jazz").expect("known");
    let second = scale.position("Nets").expect("known");
    assert_relative_eq!(second - first, scale.step(), epsilon = 1e-9);
    assert!(scale.bandwidth() < scale.step());
    assert!(scale.position("Suns").is_none());
}

#[test]
fn monotone_path_passes_through_every_point() {
    let points = [(0.0, 10.0), (10.0, 12.0), (20.0, 30.0), (30.0, 31.0)];
    let commands = monotone_x_path(&points);
    assert_eq!(commands.len(), points.len());
    assert_eq!(commands[0], PathCommand::MoveTo { x: 0.0, y: 10.0 });
    for (command, point) in commands.iter().zip(points) {
        assert_eq!(command.end_point(), point);
    }
}

#[test]
fn short_paths_degrade_gracefully() {
    assert!(monotone_x_path(&[]).is_empty());
    assert_eq!(monotone_x_path(&[(1.0, 2.0)]).len(), 1);

    let line = monotone_x_path(&[(0.0, 0.0), (3.0, 4.0)]);
    assert_eq!(line[1], PathCommand::LineTo { x: 3.0, y: 4.0 });
    assert_relative_eq!(path_length(&line), 5.0, epsilon = 1e-9);
}
