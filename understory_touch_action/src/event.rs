// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Gesture events as seen by the filter.
//!
//! A [`GestureEvent`] pairs the device that produced it with a [`GestureKind`],
//! a tagged union carrying only the numeric payload the filter inspects or
//! rewrites. Positions, timestamps and latency data stay with the caller.
//!
//! The filter rewrites an event by replacing [`GestureEvent::kind`] with a new
//! value, so a fling can leave the filter as a [`GestureKind::ScrollEnd`] and a
//! double tap as a [`GestureKind::Tap`].

/// Device class that produced a gesture.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum SourceDevice {
    /// A touchscreen. Only these gestures are subject to `touch-action`.
    Touchscreen,
    /// A touchpad.
    Touchpad,
    /// Any other device (mouse wheel, synthetic input, and so on).
    Other,
}

/// The kind of a gesture event and its payload.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum GestureKind {
    /// Start of a scroll sequence.
    ScrollBegin {
        /// Number of touch points down when scrolling began.
        pointer_count: u32,
        /// Expected horizontal delta of the first update, or `0.0` if unknown.
        delta_x_hint: f32,
        /// Expected vertical delta of the first update, or `0.0` if unknown.
        delta_y_hint: f32,
    },
    /// Incremental scroll.
    ScrollUpdate {
        /// Horizontal finger movement since the last update.
        delta_x: f32,
        /// Vertical finger movement since the last update.
        delta_y: f32,
        /// Horizontal velocity.
        velocity_x: f32,
        /// Vertical velocity.
        velocity_y: f32,
    },
    /// End of a scroll sequence without inertia.
    ScrollEnd,
    /// End of a scroll sequence with inertia.
    FlingStart {
        /// Horizontal release velocity.
        velocity_x: f32,
        /// Vertical release velocity.
        velocity_y: f32,
    },
    /// A running fling was stopped.
    FlingCancel,
    /// Start of a pinch within a scroll sequence.
    PinchBegin,
    /// Incremental pinch.
    PinchUpdate {
        /// Scale factor relative to the previous update.
        scale: f32,
        /// The consumer will not zoom for this update regardless of filtering.
        zoom_disabled: bool,
    },
    /// End of a pinch.
    PinchEnd,
    /// A finger went down.
    TapDown,
    /// The press lasted long enough to show press feedback.
    ShowPress,
    /// A tap that may still become a double tap.
    TapUnconfirmed {
        /// Number of taps in the sequence; always `1`.
        tap_count: u32,
    },
    /// A confirmed tap.
    Tap {
        /// Number of taps in the sequence.
        tap_count: u32,
    },
    /// The pending tap was abandoned.
    TapCancel,
    /// A confirmed double tap.
    DoubleTap {
        /// Number of taps delivered with the event; always `1`.
        tap_count: u32,
    },
    /// A long press.
    LongPress,
    /// A long press that was released.
    LongTap,
    /// A tap with two fingers.
    TwoFingerTap,
}

impl GestureKind {
    /// A single-finger scroll begin with the given direction hint.
    pub const fn scroll_begin(delta_x_hint: f32, delta_y_hint: f32) -> Self {
        Self::ScrollBegin {
            pointer_count: 1,
            delta_x_hint,
            delta_y_hint,
        }
    }

    /// A scroll update with the given deltas and zero velocity.
    pub const fn scroll_update(delta_x: f32, delta_y: f32) -> Self {
        Self::ScrollUpdate {
            delta_x,
            delta_y,
            velocity_x: 0.0,
            velocity_y: 0.0,
        }
    }

    /// A fling with the given velocity.
    pub const fn fling_start(velocity_x: f32, velocity_y: f32) -> Self {
        Self::FlingStart {
            velocity_x,
            velocity_y,
        }
    }

    /// A pinch update that the consumer may zoom for.
    pub const fn pinch_update(scale: f32) -> Self {
        Self::PinchUpdate {
            scale,
            zoom_disabled: false,
        }
    }

    /// A single tap.
    pub const fn tap() -> Self {
        Self::Tap { tap_count: 1 }
    }

    /// A single unconfirmed tap.
    pub const fn tap_unconfirmed() -> Self {
        Self::TapUnconfirmed { tap_count: 1 }
    }

    /// A double tap.
    pub const fn double_tap() -> Self {
        Self::DoubleTap { tap_count: 1 }
    }

    /// Returns `true` for the scroll, fling and pinch kinds whose delivery is
    /// decided at scroll begin.
    pub fn is_manipulation(&self) -> bool {
        matches!(
            self,
            Self::ScrollBegin { .. }
                | Self::ScrollUpdate { .. }
                | Self::ScrollEnd
                | Self::FlingStart { .. }
                | Self::PinchBegin
                | Self::PinchUpdate { .. }
                | Self::PinchEnd
        )
    }
}

/// A gesture event handed to the filter.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct GestureEvent {
    /// Device the gesture came from.
    pub source_device: SourceDevice,
    /// Kind and payload; the filter may replace it.
    pub kind: GestureKind,
}

impl GestureEvent {
    /// Create an event from any device.
    pub const fn new(kind: GestureKind, source_device: SourceDevice) -> Self {
        Self {
            source_device,
            kind,
        }
    }

    /// Create a touchscreen event.
    pub const fn touchscreen(kind: GestureKind) -> Self {
        Self::new(kind, SourceDevice::Touchscreen)
    }

    /// Set the number of touch points of a [`GestureKind::ScrollBegin`].
    ///
    /// Other kinds are returned unchanged.
    #[must_use]
    pub fn with_pointer_count(mut self, count: u32) -> Self {
        if let GestureKind::ScrollBegin { pointer_count, .. } = &mut self.kind {
            *pointer_count = count;
        }
        self
    }

    /// Scroll deltas of a [`GestureKind::ScrollUpdate`].
    pub fn scroll_delta(&self) -> Option<(f32, f32)> {
        match self.kind {
            GestureKind::ScrollUpdate {
                delta_x, delta_y, ..
            } => Some((delta_x, delta_y)),
            _ => None,
        }
    }

    /// Velocity of a [`GestureKind::FlingStart`].
    pub fn fling_velocity(&self) -> Option<(f32, f32)> {
        match self.kind {
            GestureKind::FlingStart {
                velocity_x,
                velocity_y,
            } => Some((velocity_x, velocity_y)),
            _ => None,
        }
    }

    /// Scale of a [`GestureKind::PinchUpdate`].
    pub fn pinch_scale(&self) -> Option<f32> {
        match self.kind {
            GestureKind::PinchUpdate { scale, .. } => Some(scale),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pointer_count_only_applies_to_scroll_begin() {
        let begin =
            GestureEvent::touchscreen(GestureKind::scroll_begin(2.0, 3.0)).with_pointer_count(2);
        assert_eq!(
            begin.kind,
            GestureKind::ScrollBegin {
                pointer_count: 2,
                delta_x_hint: 2.0,
                delta_y_hint: 3.0,
            }
        );

        let tap = GestureEvent::touchscreen(GestureKind::tap()).with_pointer_count(2);
        assert_eq!(tap.kind, GestureKind::Tap { tap_count: 1 });
    }

    #[test]
    fn payload_accessors() {
        let update = GestureEvent::touchscreen(GestureKind::scroll_update(5.0, 10.0));
        assert_eq!(update.scroll_delta(), Some((5.0, 10.0)));
        assert_eq!(update.fling_velocity(), None);

        let fling = GestureEvent::new(
            GestureKind::fling_start(7.0, -4.0),
            SourceDevice::Touchpad,
        );
        assert_eq!(fling.fling_velocity(), Some((7.0, -4.0)));
        assert_eq!(fling.source_device, SourceDevice::Touchpad);

        let pinch = GestureEvent::touchscreen(GestureKind::pinch_update(1.2));
        assert_eq!(pinch.pinch_scale(), Some(1.2));
        assert_eq!(pinch.scroll_delta(), None);
    }

    #[test]
    fn manipulation_kinds() {
        assert!(GestureKind::scroll_begin(0.0, 0.0).is_manipulation());
        assert!(GestureKind::fling_start(1.0, 0.0).is_manipulation());
        assert!(GestureKind::PinchEnd.is_manipulation());
        assert!(!GestureKind::tap().is_manipulation());
        assert!(!GestureKind::TapCancel.is_manipulation());
        assert!(!GestureKind::FlingCancel.is_manipulation());
    }
}
