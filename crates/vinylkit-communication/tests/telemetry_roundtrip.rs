//! Property test: any position the device can report parses back.

use proptest::prelude::*;
use proptest::test_runner::TestCaseError;
use vinylkit_communication::telemetry::Telemetry;

proptest! {
    #[test]
    fn position_lines_roundtrip(x in -10_000.0..10_000.0f64, y in -10_000.0..10_000.0f64) {
        let line = format!("X:{:.3} Y:{:.3}", x, y);
        let Telemetry::PositionReport { x: px, y: py } = Telemetry::parse(&line) else {
            return Err(TestCaseError::fail("expected a position report"));
        };
        prop_assert!((px - x).abs() < 0.5e-3 + 1e-9);
        prop_assert!((py - y).abs() < 0.5e-3 + 1e-9);
    }
}
