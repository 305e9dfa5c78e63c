// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Replays a few touchscreen gesture streams through a `TouchActionFilter`.
//!
//! Each scenario sets the touch actions of a touch sequence, feeds the gestures
//! and logs what comes out. The filter's own decisions are logged at `debug`
//! and `trace`.
//!
//! Run:
//! - `cargo run -p understory_touch_action_demos`
//! - `RUST_LOG=trace cargo run -p understory_touch_action_demos`

use log::{error, info};
use understory_touch_action::{
    FilterMetrics, GestureEvent, GestureKind, TouchAction, TouchActionBucket, TouchActionFilter,
};

/// Logs every metrics sample the filter reports.
#[derive(Debug, Default)]
struct LoggedMetrics {
    filtered: u32,
    delivered: u32,
}

impl FilterMetrics for LoggedMetrics {
    fn gesture_event_filtered(&mut self, filtered: bool) {
        if filtered {
            self.filtered += 1;
        } else {
            self.delivered += 1;
        }
    }

    fn effective_touch_action(&mut self, bucket: TouchActionBucket) {
        info!("  sequence finished with touch action {bucket:?}");
    }

    fn effective_equals_whitelisted(&mut self, equivalent: bool) {
        info!("  provisional touch action was {}", if equivalent { "right" } else { "wrong" });
    }
}

/// When a touch action arrives relative to the gestures it governs.
enum Step {
    Allowed(&'static str),
    Whitelisted(&'static str),
    Gesture(GestureKind),
}

fn two_finger_begin(delta_x_hint: f32, delta_y_hint: f32) -> GestureKind {
    GestureKind::ScrollBegin {
        pointer_count: 2,
        delta_x_hint,
        delta_y_hint,
    }
}

fn replay(filter: &mut TouchActionFilter<LoggedMetrics>, name: &str, steps: &[Step]) {
    info!("{name}");
    filter.reset_touch_action();
    for step in steps {
        match step {
            Step::Allowed(css) | Step::Whitelisted(css) => {
                let touch_action = match css.parse::<TouchAction>() {
                    Ok(touch_action) => touch_action,
                    Err(err) => {
                        error!("  bad touch-action {css:?}: {err}");
                        continue;
                    }
                };
                if matches!(step, Step::Allowed(_)) {
                    info!("  touch-action: {touch_action}");
                    filter.on_set_touch_action(touch_action);
                } else {
                    info!("  provisional touch-action: {touch_action}");
                    filter.on_receive_whitelisted_touch_action(touch_action);
                }
            }
            Step::Gesture(kind) => {
                let mut event = GestureEvent::touchscreen(*kind);
                if filter.filter_gesture_event(&mut event) {
                    info!("  drop    {kind:?}");
                } else if event.kind == *kind {
                    info!("  deliver {kind:?}");
                } else {
                    info!("  deliver {:?} (was {kind:?})", event.kind);
                }
            }
        }
    }
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let mut filter = TouchActionFilter::with_metrics(LoggedMetrics::default());

    replay(
        &mut filter,
        "vertical list: diagonal drag keeps only its vertical motion",
        &[
            Step::Allowed("pan-y"),
            Step::Gesture(GestureKind::scroll_begin(2.0, 9.0)),
            Step::Gesture(GestureKind::scroll_update(2.0, 9.0)),
            Step::Gesture(GestureKind::scroll_update(-1.0, 12.0)),
            Step::Gesture(GestureKind::fling_start(150.0, 900.0)),
        ],
    );

    replay(
        &mut filter,
        "vertical list: horizontal swipe is suppressed",
        &[
            Step::Allowed("pan-y"),
            Step::Gesture(GestureKind::scroll_begin(9.0, 2.0)),
            Step::Gesture(GestureKind::scroll_update(9.0, 2.0)),
            Step::Gesture(GestureKind::ScrollEnd),
        ],
    );

    replay(
        &mut filter,
        "carousel: provisional guess, page answers mid-scroll",
        &[
            Step::Whitelisted("pan-x"),
            Step::Gesture(GestureKind::scroll_begin(6.0, 4.0)),
            Step::Gesture(GestureKind::scroll_update(6.0, 4.0)),
            Step::Allowed("pan-x pan-y"),
            Step::Gesture(GestureKind::scroll_update(3.0, 1.0)),
            Step::Gesture(GestureKind::ScrollEnd),
        ],
    );

    replay(
        &mut filter,
        "map: pinch is withheld until the page allows it",
        &[
            Step::Whitelisted("none"),
            Step::Gesture(two_finger_begin(3.0, 2.0)),
            Step::Gesture(GestureKind::PinchBegin),
            Step::Gesture(GestureKind::pinch_update(1.25)),
            Step::Gesture(GestureKind::scroll_update(4.0, 4.0)),
            Step::Allowed("manipulation"),
            Step::Gesture(GestureKind::pinch_update(1.1)),
            Step::Gesture(GestureKind::scroll_update(1.0, 1.0)),
            Step::Gesture(GestureKind::PinchEnd),
            Step::Gesture(GestureKind::ScrollEnd),
        ],
    );

    replay(
        &mut filter,
        "button: taps are confirmed without waiting for a double tap",
        &[
            Step::Allowed("manipulation"),
            Step::Gesture(GestureKind::TapDown),
            Step::Gesture(GestureKind::tap_unconfirmed()),
        ],
    );

    replay(
        &mut filter,
        "button: second tap of the sequence",
        &[
            Step::Allowed("auto"),
            Step::Gesture(GestureKind::TapCancel),
            Step::Gesture(GestureKind::TapDown),
            Step::Gesture(GestureKind::double_tap()),
        ],
    );

    filter.reset_touch_action();
    let metrics = filter.metrics();
    info!(
        "boundary events: {} delivered, {} dropped",
        metrics.delivered, metrics.filtered
    );
}
