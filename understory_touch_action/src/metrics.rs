// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Observer hooks for filter metrics.
//!
//! The filter reports a few samples as it runs. They are fire-and-forget and
//! never influence filtering. Hosts forward them to whatever histogram or
//! tracing backend they use by implementing [`FilterMetrics`]; the default
//! [`NoMetrics`] discards them.
//!
//! ```
//! use understory_touch_action::{
//!     FilterMetrics, GestureEvent, GestureKind, TouchAction, TouchActionFilter,
//! };
//!
//! #[derive(Default)]
//! struct Counts {
//!     filtered: u32,
//!     delivered: u32,
//! }
//!
//! impl FilterMetrics for Counts {
//!     fn gesture_event_filtered(&mut self, filtered: bool) {
//!         if filtered {
//!             self.filtered += 1;
//!         } else {
//!             self.delivered += 1;
//!         }
//!     }
//! }
//!
//! let mut filter = TouchActionFilter::with_metrics(Counts::default());
//! filter.on_set_touch_action(TouchAction::NONE);
//! filter.filter_gesture_event(&mut GestureEvent::touchscreen(GestureKind::scroll_begin(2.0, 3.0)));
//! filter.filter_gesture_event(&mut GestureEvent::touchscreen(GestureKind::ScrollEnd));
//! assert_eq!(filter.metrics().filtered, 1);
//! ```

use crate::action::TouchAction;

/// Receiver for the samples the filter reports.
///
/// Every method has an empty default, so implementors only override the
/// samples they care about.
pub trait FilterMetrics {
    /// Whether a scroll-ending, fling or pinch boundary event was dropped.
    ///
    /// Reported for `FlingStart`, `ScrollEnd`, `PinchBegin` and `PinchEnd`, before the
    /// filter acts on the event.
    fn gesture_event_filtered(&mut self, _filtered: bool) {}

    /// The authoritative touch action of a finished touch sequence.
    fn effective_touch_action(&mut self, _bucket: TouchActionBucket) {}

    /// Whether the authoritative touch action of a finished touch sequence
    /// matched the provisional one. Only reported when both were known.
    fn effective_equals_whitelisted(&mut self, _equivalent: bool) {}
}

impl<M: FilterMetrics + ?Sized> FilterMetrics for &mut M {
    fn gesture_event_filtered(&mut self, filtered: bool) {
        (**self).gesture_event_filtered(filtered);
    }

    fn effective_touch_action(&mut self, bucket: TouchActionBucket) {
        (**self).effective_touch_action(bucket);
    }

    fn effective_equals_whitelisted(&mut self, equivalent: bool) {
        (**self).effective_equals_whitelisted(equivalent);
    }
}

/// Metrics observer that discards every sample.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct NoMetrics;

impl FilterMetrics for NoMetrics {}

/// Enumeration bucket for touch-action samples.
///
/// Named buckets cover the values a single CSS declaration can produce; any
/// other intersection lands in [`TouchActionBucket::Other`].
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum TouchActionBucket {
    /// `auto`
    Auto,
    /// `none`
    None,
    /// `pan-x`
    PanX,
    /// `pan-left`
    PanLeft,
    /// `pan-right`
    PanRight,
    /// `pan-y`
    PanY,
    /// `pan-up`
    PanUp,
    /// `pan-down`
    PanDown,
    /// `pan-x pan-y`
    Pan,
    /// `pinch-zoom`
    PinchZoom,
    /// `manipulation`
    Manipulation,
    /// Any other combination.
    Other,
}

impl From<TouchAction> for TouchActionBucket {
    fn from(action: TouchAction) -> Self {
        const BUCKETS: [(TouchAction, TouchActionBucket); 11] = [
            (TouchAction::AUTO, TouchActionBucket::Auto),
            (TouchAction::NONE, TouchActionBucket::None),
            (TouchAction::PAN_X, TouchActionBucket::PanX),
            (TouchAction::PAN_LEFT, TouchActionBucket::PanLeft),
            (TouchAction::PAN_RIGHT, TouchActionBucket::PanRight),
            (TouchAction::PAN_Y, TouchActionBucket::PanY),
            (TouchAction::PAN_UP, TouchActionBucket::PanUp),
            (TouchAction::PAN_DOWN, TouchActionBucket::PanDown),
            (TouchAction::PAN, TouchActionBucket::Pan),
            (TouchAction::PINCH_ZOOM, TouchActionBucket::PinchZoom),
            (TouchAction::MANIPULATION, TouchActionBucket::Manipulation),
        ];
        BUCKETS
            .iter()
            .find(|(bits, _)| *bits == action)
            .map_or(Self::Other, |&(_, bucket)| bucket)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn buckets_for_css_values() {
        assert_eq!(TouchActionBucket::from(TouchAction::AUTO), TouchActionBucket::Auto);
        assert_eq!(TouchActionBucket::from(TouchAction::NONE), TouchActionBucket::None);
        assert_eq!(TouchActionBucket::from(TouchAction::PAN_UP), TouchActionBucket::PanUp);
        assert_eq!(TouchActionBucket::from(TouchAction::PAN), TouchActionBucket::Pan);
        assert_eq!(
            TouchActionBucket::from(TouchAction::MANIPULATION),
            TouchActionBucket::Manipulation
        );
    }

    #[test]
    fn unnamed_combinations_are_other() {
        assert_eq!(
            TouchActionBucket::from(TouchAction::PAN_X | TouchAction::PINCH_ZOOM),
            TouchActionBucket::Other
        );
        assert_eq!(
            TouchActionBucket::from(TouchAction::DOUBLE_TAP_ZOOM),
            TouchActionBucket::Other
        );
    }

    #[test]
    fn mutable_reference_forwards() {
        #[derive(Default)]
        struct Last(Option<bool>);
        impl FilterMetrics for Last {
            fn effective_equals_whitelisted(&mut self, equivalent: bool) {
                self.0 = Some(equivalent);
            }
        }

        fn report<M: FilterMetrics>(mut metrics: M) {
            metrics.effective_equals_whitelisted(false);
            metrics.gesture_event_filtered(true);
        }

        let mut last = Last::default();
        report(&mut last);
        assert_eq!(last.0, Some(false));
    }
}
