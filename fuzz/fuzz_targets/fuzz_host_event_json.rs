#![no_main]

use driftfield_core::event::HostEvent;
use driftfield_web::input_parser::{parse_host_event, parse_host_events};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let Ok(text) = std::str::from_utf8(data) else {
        return;
    };

    // Must never panic, whatever the host sends.
    if let Ok(Some(event)) = parse_host_event(text) {
        match event {
            HostEvent::PointerMove(p) => {
                assert!(!p.x.is_nan() && !p.y.is_nan(), "JSON cannot encode NaN");
            }
            HostEvent::Resize { width, height } => {
                assert!(!width.is_nan() && !height.is_nan(), "JSON cannot encode NaN");
            }
        }
    }
    let _ = parse_host_events(text);
});
