use vinylkit_vector::path::PathSegment;
use vinylkit_vector::transform::{bounds, flatten, transform, TransformParams};

#[test]
fn test_identity_transform() {
    let segments = vec![
        PathSegment::MoveTo { x: 1.0, y: 2.0 },
        PathSegment::CubicCurveTo {
            cp1x: 3.0,
            cp1y: 4.0,
            cp2x: 5.0,
            cp2y: 6.0,
            x: 7.0,
            y: 8.0,
        },
        PathSegment::QuadCurveTo {
            cpx: 9.0,
            cpy: 10.0,
            x: 11.0,
            y: 12.0,
        },
        PathSegment::ClosePath,
    ];
    assert_eq!(transform(&segments, &TransformParams::default()), segments);
}

#[test]
fn test_mirror_negates_x_before_scaling() {
    let segments = vec![PathSegment::LineTo { x: 3.0, y: 4.0 }];
    let params = TransformParams {
        scale_x: 2.0,
        scale_y: 1.0,
        offset_x: 1.0,
        offset_y: 0.0,
        mirror: true,
    };
    // (-3) * 2 + 1 = -5; Y untouched by mirror.
    assert_eq!(
        transform(&segments, &params),
        vec![PathSegment::LineTo { x: -5.0, y: 4.0 }]
    );
}

#[test]
fn test_transform_touches_control_points() {
    let segments = vec![PathSegment::QuadCurveTo {
        cpx: 1.0,
        cpy: 1.0,
        x: 2.0,
        y: 2.0,
    }];
    let params = TransformParams {
        scale_x: 10.0,
        scale_y: 10.0,
        offset_x: 5.0,
        offset_y: -5.0,
        mirror: false,
    };
    assert_eq!(
        transform(&segments, &params),
        vec![PathSegment::QuadCurveTo {
            cpx: 15.0,
            cpy: 5.0,
            x: 25.0,
            y: 15.0,
        }]
    );
}

#[test]
fn test_flatten_replaces_curves_with_line_steps() {
    let segments = vec![
        PathSegment::MoveTo { x: 0.0, y: 0.0 },
        PathSegment::CubicCurveTo {
            cp1x: 0.0,
            cp1y: 1.0,
            cp2x: 1.0,
            cp2y: 1.0,
            x: 1.0,
            y: 0.0,
        },
    ];
    let flat = flatten(&segments, 10);
    assert_eq!(flat.len(), 11);
    assert!(flat.iter().all(|s| !s.is_curve()));
    assert_eq!(flat[0], PathSegment::MoveTo { x: 0.0, y: 0.0 });
}

#[test]
fn test_flatten_last_point_is_exact_endpoint() {
    let segments = vec![
        PathSegment::MoveTo { x: 0.3, y: 0.7 },
        PathSegment::QuadCurveTo {
            cpx: 1.1,
            cpy: 2.2,
            x: 3.3,
            y: 4.4,
        },
    ];
    let flat = flatten(&segments, 20);
    let PathSegment::LineTo { x, y } = *flat.last().unwrap() else {
        panic!("expected a LineTo at the end");
    };
    assert!((x - 3.3).abs() < 1e-9);
    assert!((y - 4.4).abs() < 1e-9);
}

#[test]
fn test_flatten_midpoint_uses_standard_blending() {
    // Symmetric cubic: at t = 0.5 the blend of (0,0) (0,1) (1,1) (1,0)
    // lands on (0.5, 0.75).
    let segments = vec![
        PathSegment::MoveTo { x: 0.0, y: 0.0 },
        PathSegment::CubicCurveTo {
            cp1x: 0.0,
            cp1y: 1.0,
            cp2x: 1.0,
            cp2y: 1.0,
            x: 1.0,
            y: 0.0,
        },
    ];
    let flat = flatten(&segments, 2);
    let PathSegment::LineTo { x, y } = flat[1] else {
        panic!("expected a LineTo sample");
    };
    assert!((x - 0.5).abs() < 1e-12);
    assert!((y - 0.75).abs() < 1e-12);
}

#[test]
fn test_flatten_passes_noncurves_through() {
    let segments = vec![
        PathSegment::MoveTo { x: 0.0, y: 0.0 },
        PathSegment::LineTo { x: 5.0, y: 5.0 },
        PathSegment::ClosePath,
    ];
    assert_eq!(flatten(&segments, 20), segments);
}

#[test]
fn test_bounds_reference_rectangle() {
    let segments = vec![
        PathSegment::MoveTo { x: 0.0, y: 0.0 },
        PathSegment::LineTo { x: 10.0, y: 0.0 },
        PathSegment::LineTo { x: 10.0, y: 5.0 },
        PathSegment::ClosePath,
    ];
    let bounds = bounds(&segments).unwrap();
    assert_eq!(bounds.min_x, 0.0);
    assert_eq!(bounds.min_y, 0.0);
    assert_eq!(bounds.max_x, 10.0);
    assert_eq!(bounds.max_y, 5.0);
    assert_eq!(bounds.width(), 10.0);
    assert_eq!(bounds.height(), 5.0);
}

#[test]
fn test_bounds_of_empty_sequence_is_none() {
    assert!(bounds(&[]).is_none());
    assert!(bounds(&[PathSegment::ClosePath]).is_none());
}

#[test]
fn test_bounds_covers_unflattened_control_points() {
    let segments = vec![
        PathSegment::MoveTo { x: 0.0, y: 0.0 },
        PathSegment::QuadCurveTo {
            cpx: 5.0,
            cpy: 20.0,
            x: 10.0,
            y: 0.0,
        },
    ];
    let unflattened = bounds(&segments).unwrap();
    assert_eq!(unflattened.max_y, 20.0);

    // After flattening only sampled endpoints remain, all below the hull.
    let flat = flatten(&segments, 20);
    let flattened = bounds(&flat).unwrap();
    assert!(flattened.max_y < 20.0);
}
