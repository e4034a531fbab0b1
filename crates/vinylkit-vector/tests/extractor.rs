use vinylkit_vector::extractor::{extract, ExtractOptions, FileFormat};
use vinylkit_vector::path::{well_formed, PathSegment};
use vinylkit_core::ExtractError;

fn opts() -> ExtractOptions {
    ExtractOptions::default()
}

#[test]
fn test_format_hint_resolution() {
    assert_eq!(FileFormat::from_hint("svg"), Some(FileFormat::Svg));
    assert_eq!(FileFormat::from_hint(".SVG"), Some(FileFormat::Svg));
    assert_eq!(FileFormat::from_hint("dxf"), Some(FileFormat::Dxf));
    assert_eq!(FileFormat::from_hint("pdf"), None);
}

#[test]
fn test_unsupported_format_is_an_error() {
    let result = extract("<svg/>", "pdf", &opts());
    assert_eq!(
        result.unwrap_err(),
        ExtractError::UnsupportedFormat {
            hint: "pdf".to_string()
        }
    );
}

#[test]
fn test_rectangle_extraction() {
    let svg = r#"<svg><rect x="0" y="0" width="10" height="5"/></svg>"#;
    let extraction = extract(svg, "svg", &opts()).unwrap();
    assert!(extraction.is_complete());
    assert_eq!(
        extraction.segments,
        vec![
            PathSegment::MoveTo { x: 0.0, y: 0.0 },
            PathSegment::LineTo { x: 10.0, y: 0.0 },
            PathSegment::LineTo { x: 10.0, y: 5.0 },
            PathSegment::LineTo { x: 0.0, y: 5.0 },
            PathSegment::ClosePath,
        ]
    );
}

#[test]
fn test_circle_extraction_shape() {
    let svg = r#"<svg><circle cx="5" cy="5" r="3"/></svg>"#;
    let extraction = extract(svg, "svg", &opts()).unwrap();
    let segments = &extraction.segments;

    // MoveTo at angle 0, 36 samples, ClosePath.
    assert_eq!(segments.len(), 38);
    assert_eq!(segments[0], PathSegment::MoveTo { x: 8.0, y: 5.0 });
    assert!(matches!(segments[37], PathSegment::ClosePath));

    // The final sample coincides with the start point.
    let PathSegment::LineTo { x, y } = segments[36] else {
        panic!("expected LineTo before ClosePath");
    };
    assert!((x - 8.0).abs() < 1e-9);
    assert!((y - 5.0).abs() < 1e-9);
}

#[test]
fn test_circle_segment_count_is_tunable() {
    let svg = r#"<svg><circle cx="0" cy="0" r="1"/></svg>"#;
    let options = ExtractOptions { circle_segments: 8 };
    let extraction = extract(svg, "svg", &options).unwrap();
    assert_eq!(extraction.segments.len(), 10);
}

#[test]
fn test_document_order_is_preserved() {
    // A circle between two rects must extract between them.
    let svg = r#"<svg>
        <rect x="0" y="0" width="1" height="1"/>
        <circle cx="9" cy="9" r="1"/>
        <rect x="5" y="5" width="1" height="1"/>
    </svg>"#;
    let extraction = extract(svg, "svg", &ExtractOptions { circle_segments: 4 }).unwrap();
    let segments = &extraction.segments;

    assert_eq!(segments[0], PathSegment::MoveTo { x: 0.0, y: 0.0 });
    assert_eq!(segments[5], PathSegment::MoveTo { x: 10.0, y: 9.0 });
    assert_eq!(segments[11], PathSegment::MoveTo { x: 5.0, y: 5.0 });
}

#[test]
fn test_path_data_absolute_and_relative() {
    let svg = r#"<svg><path d="M 10 10 l 5 0 L 15 20 z"/></svg>"#;
    let extraction = extract(svg, "svg", &opts()).unwrap();
    assert_eq!(
        extraction.segments,
        vec![
            PathSegment::MoveTo { x: 10.0, y: 10.0 },
            PathSegment::LineTo { x: 15.0, y: 10.0 },
            PathSegment::LineTo { x: 15.0, y: 20.0 },
            PathSegment::ClosePath,
        ]
    );
}

#[test]
fn test_path_data_shorthands_normalize_to_lineto() {
    let svg = r#"<svg><path d="M 1 2 H 8 v 3 h -2"/></svg>"#;
    let extraction = extract(svg, "svg", &opts()).unwrap();
    assert_eq!(
        extraction.segments,
        vec![
            PathSegment::MoveTo { x: 1.0, y: 2.0 },
            PathSegment::LineTo { x: 8.0, y: 2.0 },
            PathSegment::LineTo { x: 8.0, y: 5.0 },
            PathSegment::LineTo { x: 6.0, y: 5.0 },
        ]
    );
}

#[test]
fn test_path_data_curves() {
    let svg = r#"<svg><path d="M 0 0 C 1 2 3 4 5 0 Q 6 2 7 0"/></svg>"#;
    let extraction = extract(svg, "svg", &opts()).unwrap();
    assert_eq!(
        extraction.segments,
        vec![
            PathSegment::MoveTo { x: 0.0, y: 0.0 },
            PathSegment::CubicCurveTo {
                cp1x: 1.0,
                cp1y: 2.0,
                cp2x: 3.0,
                cp2y: 4.0,
                x: 5.0,
                y: 0.0
            },
            PathSegment::QuadCurveTo {
                cpx: 6.0,
                cpy: 2.0,
                x: 7.0,
                y: 0.0
            },
        ]
    );
}

#[test]
fn test_smooth_cubic_reflects_previous_control() {
    let svg = r#"<svg><path d="M 0 0 C 0 1 2 1 2 0 S 4 -1 4 0"/></svg>"#;
    let extraction = extract(svg, "svg", &opts()).unwrap();

    let PathSegment::CubicCurveTo { cp1x, cp1y, .. } = extraction.segments[2] else {
        panic!("expected a cubic from the S command");
    };
    // Reflection of (2, 1) about the current point (2, 0).
    assert_eq!((cp1x, cp1y), (2.0, -1.0));
}

#[test]
fn test_implicit_lineto_after_moveto() {
    let svg = r#"<svg><path d="M 0 0 1 1 2 2"/></svg>"#;
    let extraction = extract(svg, "svg", &opts()).unwrap();
    assert_eq!(
        extraction.segments,
        vec![
            PathSegment::MoveTo { x: 0.0, y: 0.0 },
            PathSegment::LineTo { x: 1.0, y: 1.0 },
            PathSegment::LineTo { x: 2.0, y: 2.0 },
        ]
    );
}

#[test]
fn test_close_path_resets_current_point() {
    // The relative lineto after z starts from the subpath start (0, 0).
    let svg = r#"<svg><path d="M 0 0 L 4 0 z l 1 1"/></svg>"#;
    let extraction = extract(svg, "svg", &opts()).unwrap();
    assert_eq!(
        extraction.segments.last(),
        Some(&PathSegment::LineTo { x: 1.0, y: 1.0 })
    );
}

#[test]
fn test_malformed_path_keeps_recovered_segments() {
    // The arc command is unsupported; everything before it must survive.
    let svg = r#"<svg><path d="M 0 0 L 5 0 A 1 1 0 0 0 6 1"/></svg>"#;
    let extraction = extract(svg, "svg", &opts()).unwrap();

    assert!(!extraction.is_complete());
    assert!(matches!(
        extraction.error,
        Some(ExtractError::MalformedSource { .. })
    ));
    assert_eq!(
        extraction.segments,
        vec![
            PathSegment::MoveTo { x: 0.0, y: 0.0 },
            PathSegment::LineTo { x: 5.0, y: 0.0 },
        ]
    );
}

#[test]
fn test_non_svg_text_is_malformed() {
    let extraction = extract("not markup at all", "svg", &opts()).unwrap();
    assert!(matches!(
        extraction.error,
        Some(ExtractError::MalformedSource { .. })
    ));
    assert!(extraction.segments.is_empty());
}

#[test]
fn test_unterminated_tag_is_malformed() {
    let svg = r#"<svg><rect x="0" y="0" width="4" height="4"/><path d="M 0 0"#;
    let extraction = extract(svg, "svg", &opts()).unwrap();

    assert!(matches!(
        extraction.error,
        Some(ExtractError::MalformedSource { .. })
    ));
    // The rect parsed before the break is preserved.
    assert_eq!(extraction.segments.len(), 5);
}

#[test]
fn test_extracted_paths_are_well_formed() {
    let svg = r#"<svg>
        <rect x="1" y="1" width="3" height="2"/>
        <path d="M 0 0 C 1 1 2 1 3 0 z"/>
        <ellipse cx="4" cy="4" rx="2" ry="1"/>
    </svg>"#;
    let extraction = extract(svg, "svg", &opts()).unwrap();
    assert!(extraction.is_complete());
    assert!(well_formed(&extraction.segments));
}

#[test]
fn test_dxf_extracts_to_nothing() {
    let extraction = extract("0\nSECTION\n", "dxf", &opts()).unwrap();
    assert!(extraction.is_complete());
    assert!(extraction.segments.is_empty());
}
