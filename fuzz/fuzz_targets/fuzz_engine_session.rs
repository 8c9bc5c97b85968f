#![no_main]

use std::time::Duration;

use arbitrary::Arbitrary;
use driftfield_runtime::{EngineConfig, Theme};
use driftfield_web::StepRunner;
use libfuzzer_sys::fuzz_target;

#[derive(Debug, Arbitrary)]
enum Op {
    Pointer { x: i32, y: i32 },
    Resize { width: u16, height: u16 },
    Advance { ms: u16 },
    Step,
    ToggleTheme,
    Remount,
}

fuzz_target!(|ops: Vec<Op>| {
    let mut runner = StepRunner::new(EngineConfig::default(), 1280.0, 720.0);
    runner.mount();
    let mut theme = Theme::Dark;

    for op in ops.into_iter().take(512) {
        match op {
            Op::Pointer { x, y } => runner.pointer_move(f64::from(x), f64::from(y)),
            Op::Resize { width, height } => {
                runner.resize(f64::from(width), f64::from(height));
            }
            Op::Advance { ms } => runner.advance_time(Duration::from_millis(u64::from(ms))),
            Op::Step => {
                runner.step();
            }
            Op::ToggleTheme => {
                theme = theme.toggled();
                runner.set_theme(theme);
            }
            Op::Remount => {
                runner.unmount();
                runner.mount();
            }
        }

        // Post-conditions that must always hold:
        assert!(runner.window().listener_count() <= 2, "listener leak");
        if let Some(frame) = runner.last_frame() {
            assert!((0.0..=1.0).contains(&frame.layer_opacity));
            for node in &frame.nodes {
                assert!(node.translate.is_finite(), "{} translate not finite", node.id);
                assert!(node.opacity.is_finite());
            }
        }
    }
});
