use vinylkit_gcode::compiler::{compile, test_pattern, CutParams};
use vinylkit_gcode::instruction::Instruction;
use vinylkit_vector::path::PathSegment;

fn rectangle() -> Vec<PathSegment> {
    vec![
        PathSegment::MoveTo { x: 0.0, y: 0.0 },
        PathSegment::LineTo { x: 10.0, y: 0.0 },
        PathSegment::LineTo { x: 10.0, y: 5.0 },
        PathSegment::LineTo { x: 0.0, y: 5.0 },
        PathSegment::ClosePath,
    ]
}

#[test]
fn test_compile_golden_text() {
    let program = compile(&rectangle(), &CutParams::default());
    assert_eq!(
        program.render(),
        "\
; vinylkit cut program
G21
G90
G28
M3 S300
F3000
G0 X0.000 Y0.000
G1 Z0.000
G1 X10.000 Y0.000
G1 X10.000 Y5.000
G1 X0.000 Y5.000
; close path
G0 Z5.000
G28 X Y
M5
M2
"
    );
}

#[test]
fn test_compile_is_deterministic() {
    let params = CutParams::default();
    let first = compile(&rectangle(), &params);
    let second = compile(&rectangle(), &params);
    assert_eq!(first.render(), second.render());
}

#[test]
fn test_tool_lifts_between_subpaths() {
    let segments = vec![
        PathSegment::MoveTo { x: 0.0, y: 0.0 },
        PathSegment::LineTo { x: 1.0, y: 0.0 },
        PathSegment::MoveTo { x: 5.0, y: 5.0 },
        PathSegment::LineTo { x: 6.0, y: 5.0 },
    ];
    let params = CutParams::default();
    let program = compile(&segments, &params);
    let body: Vec<&Instruction> = program
        .iter()
        .filter(|i| i.is_motion())
        .collect();

    assert_eq!(
        body,
        vec![
            // First subpath: rapid to start, lower.
            &Instruction::rapid_xy(0.0, 0.0),
            &Instruction::feed_z(0.0),
            &Instruction::feed_xy(1.0, 0.0),
            // Second subpath: raise, rapid, lower.
            &Instruction::rapid_z(5.0),
            &Instruction::rapid_xy(5.0, 5.0),
            &Instruction::feed_z(0.0),
            &Instruction::feed_xy(6.0, 5.0),
            // Footer lift.
            &Instruction::rapid_z(5.0),
        ]
    );
}

#[test]
fn test_close_path_emits_comment_only() {
    let segments = vec![
        PathSegment::MoveTo { x: 0.0, y: 0.0 },
        PathSegment::LineTo { x: 1.0, y: 1.0 },
        PathSegment::ClosePath,
    ];
    let program = compile(&segments, &CutParams::default());
    let rendered = program.render();
    assert!(rendered.contains("; close path\n"));

    // No motion between the last cut line and the footer lift.
    let motions_after_line: Vec<String> = program
        .iter()
        .skip_while(|i| **i != Instruction::feed_xy(1.0, 1.0))
        .skip(1)
        .filter(|i| i.is_motion())
        .map(|i| i.to_string())
        .collect();
    assert_eq!(motions_after_line[0], "G0 Z5.000");
}

#[test]
fn test_residual_curves_are_flattened() {
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
    let params = CutParams {
        curve_segments: 8,
        ..CutParams::default()
    };
    let program = compile(&segments, &params);

    // 8 feed moves sampled along the curve, ending exactly on the endpoint.
    let feeds: Vec<String> = program
        .iter()
        .filter(|i| matches!(i, Instruction::Motion { rapid: false, x: Some(_), .. }))
        .map(|i| i.to_string())
        .collect();
    assert_eq!(feeds.len(), 8);
    assert_eq!(feeds.last().unwrap(), "G1 X1.000 Y0.000");
}

#[test]
fn test_params_flow_into_header_and_footer() {
    let params = CutParams {
        feed_rate: 1200.0,
        tool_power: 450,
        tool_up_height: 7.5,
        tool_down_height: -0.5,
        curve_segments: 20,
    };
    let rendered = compile(&rectangle(), &params).render();
    assert!(rendered.contains("M3 S450\n"));
    assert!(rendered.contains("F1200\n"));
    assert!(rendered.contains("G1 Z-0.500\n"));
    assert!(rendered.contains("G0 Z7.500\n"));
}

#[test]
fn test_test_pattern_is_a_closed_square() {
    let program = test_pattern(&CutParams::default());
    let rendered = program.render();
    assert!(rendered.contains("G0 X10.000 Y10.000\n"));
    assert!(rendered.contains("G1 X50.000 Y50.000\n"));
    // The square ends where it started.
    assert!(rendered.contains("G1 X10.000 Y10.000\n"));
    assert!(rendered.ends_with("M2\n"));
}
