// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The touch-action gesture filter.
//!
//! ## Overview
//!
//! [`TouchActionFilter`] sits between gesture recognition and the code that
//! scrolls and zooms. For each touchscreen gesture it decides whether the event
//! is delivered, dropped, or rewritten so that it respects the page's
//! `touch-action`.
//!
//! ## Masks
//!
//! Two masks feed the filter, and either may arrive before, during or after the
//! gestures they govern:
//!
//! - the authoritative mask ([`TouchActionFilter::on_set_touch_action`]),
//!   computed by the page;
//! - a provisional "whitelisted" mask
//!   ([`TouchActionFilter::on_receive_whitelisted_touch_action`]), an earlier
//!   estimate usable until the authoritative one is known.
//!
//! Each is intersected across every finger of the touch sequence. Decisions use
//! the authoritative mask if known, else the whitelisted one, else
//! [`TouchAction::AUTO`].
//!
//! ## Suppression
//!
//! Whether a scroll sequence is suppressed is decided once, at `ScrollBegin`,
//! from the scroll's direction hint (or from the pinch rule when two or more
//! fingers are down). Scroll, fling and pinch events of the sequence follow
//! that decision until `ScrollEnd` or `FlingStart` closes it.
//!
//! If the decision was made against the whitelisted mask, it is redone once
//! the authoritative mask arrives. Scroll deltas and pinch scale dropped in the
//! meantime are accumulated and replayed onto the next delivered update, so no
//! motion is lost.
//!
//! ## Taps
//!
//! Without [`TouchAction::DOUBLE_TAP_ZOOM`] there is no reason to wait for a
//! second tap: `TapUnconfirmed` is delivered as `Tap`, the `TapCancel` that
//! would have followed it is dropped, and a later `DoubleTap` is demoted to
//! `Tap`.
//!
//! ## Example
//!
//! ```
//! use understory_touch_action::{GestureEvent, GestureKind, TouchAction, TouchActionFilter};
//!
//! let mut filter = TouchActionFilter::new();
//! filter.reset_touch_action();
//! filter.on_set_touch_action(TouchAction::PAN_X);
//!
//! // A horizontal scroll is allowed, but loses its vertical component.
//! let mut begin = GestureEvent::touchscreen(GestureKind::scroll_begin(7.0, 6.0));
//! assert!(!filter.filter_gesture_event(&mut begin));
//! let mut update = GestureEvent::touchscreen(GestureKind::scroll_update(5.0, 10.0));
//! assert!(!filter.filter_gesture_event(&mut update));
//! assert_eq!(update.scroll_delta(), Some((5.0, 0.0)));
//!
//! // A fling with no horizontal velocity becomes a plain scroll end.
//! let mut fling = GestureEvent::touchscreen(GestureKind::fling_start(0.0, -4.0));
//! assert!(!filter.filter_gesture_event(&mut fling));
//! assert_eq!(fling.kind, GestureKind::ScrollEnd);
//! ```

use log::{debug, trace, warn};

use crate::action::{TouchAction, intersect_set};
use crate::event::{GestureEvent, GestureKind, SourceDevice};
use crate::metrics::{FilterMetrics, NoMetrics, TouchActionBucket};

/// Filters touchscreen gestures according to CSS `touch-action`.
///
/// ## Usage
///
/// - Call [`TouchActionFilter::reset_touch_action`] between touch sequences.
/// - Forward every finger's touch action as it becomes known through
///   [`TouchActionFilter::on_set_touch_action`] and, if available,
///   [`TouchActionFilter::on_receive_whitelisted_touch_action`].
/// - Pass every gesture through [`TouchActionFilter::filter_gesture_event`]
///   and drop the ones for which it returns `true`.
///
/// All state is owned by the filter; one instance serves one input target.
#[derive(Clone, Debug)]
pub struct TouchActionFilter<M = NoMetrics> {
    /// Authoritative touch action, intersected across fingers.
    allowed: Option<TouchAction>,
    /// Provisional touch action, intersected across fingers.
    whitelisted: Option<TouchAction>,
    /// Suppression of the scroll sequence in flight, `None` between sequences.
    suppress_manipulation: Option<bool>,
    /// The suppression decision was made (or redone) against `allowed`.
    suppression_locked_to_real_mask: bool,
    /// Smallest mask that would not have suppressed the current scroll.
    minimal_conforming: TouchAction,
    /// Scroll delta withheld while the decision was provisional.
    accumulated_scroll: (f32, f32),
    /// Pinch scale withheld while suppressed.
    accumulated_pinch_scale: f32,
    double_tap_allowed: bool,
    drop_pending_tap_cancel: bool,
    force_enable_zoom: bool,
    metrics: M,
}

impl TouchActionFilter {
    /// Create a filter that discards metrics.
    pub fn new() -> Self {
        Self::with_metrics(NoMetrics)
    }

    /// Create a filter with force-enabled zoom, see
    /// [`TouchActionFilter::set_force_enable_zoom`].
    pub fn with_force_enable_zoom(force_enable_zoom: bool) -> Self {
        let mut filter = Self::new();
        filter.force_enable_zoom = force_enable_zoom;
        filter
    }
}

impl Default for TouchActionFilter {
    fn default() -> Self {
        Self::new()
    }
}

impl<M: FilterMetrics> TouchActionFilter<M> {
    /// Create a filter that reports to the given metrics observer.
    pub fn with_metrics(metrics: M) -> Self {
        Self {
            allowed: None,
            whitelisted: None,
            suppress_manipulation: None,
            suppression_locked_to_real_mask: false,
            minimal_conforming: TouchAction::NONE,
            accumulated_scroll: (0.0, 0.0),
            accumulated_pinch_scale: 1.0,
            double_tap_allowed: true,
            drop_pending_tap_cancel: false,
            force_enable_zoom: false,
            metrics,
        }
    }

    /// Always allow pinch zoom unless the touch action is `none`.
    ///
    /// Applies to authoritative touch actions received after the call.
    pub fn set_force_enable_zoom(&mut self, enabled: bool) {
        self.force_enable_zoom = enabled;
    }

    /// Whether zoom is force-enabled.
    pub fn force_enable_zoom(&self) -> bool {
        self.force_enable_zoom
    }

    /// The metrics observer.
    pub fn metrics(&self) -> &M {
        &self.metrics
    }

    /// The metrics observer, mutably.
    pub fn metrics_mut(&mut self) -> &mut M {
        &mut self.metrics
    }

    /// Authoritative touch action of the current touch sequence, if known.
    pub fn allowed_touch_action(&self) -> Option<TouchAction> {
        self.allowed
    }

    /// Provisional touch action of the current touch sequence, if known.
    pub fn whitelisted_touch_action(&self) -> Option<TouchAction> {
        self.whitelisted
    }

    /// The touch action decisions are made against: the authoritative one if
    /// known, else the whitelisted one, else [`TouchAction::AUTO`].
    pub fn effective_touch_action(&self) -> TouchAction {
        self.allowed.or(self.whitelisted).unwrap_or(TouchAction::AUTO)
    }

    /// Suppression of the scroll sequence in flight, or `None` if no sequence
    /// is in flight.
    pub fn manipulation_suppressed(&self) -> Option<bool> {
        self.suppress_manipulation
    }

    /// Narrow the authoritative touch action by one finger's touch action.
    pub fn on_set_touch_action(&mut self, touch_action: TouchAction) {
        let mut allowed = intersect_set(self.allowed, touch_action);
        if self.force_enable_zoom && !allowed.is_empty() {
            allowed |= TouchAction::PINCH_ZOOM;
        }
        trace!("touch action {touch_action} narrows allowed touch action to {allowed}");
        self.allowed = Some(allowed);
    }

    /// Narrow the provisional touch action by one finger's provisional touch action.
    pub fn on_receive_whitelisted_touch_action(&mut self, touch_action: TouchAction) {
        let whitelisted = intersect_set(self.whitelisted, touch_action);
        trace!("touch action {touch_action} narrows whitelisted touch action to {whitelisted}");
        self.whitelisted = Some(whitelisted);
    }

    /// Forget the touch actions of the finished touch sequence.
    ///
    /// Call at least once between touch sequences. Calling it again is a no-op.
    /// A scroll sequence still in flight keeps its suppression decision; only
    /// touch actions received afterwards and later sequences see the reset.
    pub fn reset_touch_action(&mut self) {
        if let Some(allowed) = self.allowed {
            self.metrics
                .effective_touch_action(TouchActionBucket::from(allowed));
            if let Some(whitelisted) = self.whitelisted {
                self.metrics
                    .effective_equals_whitelisted(allowed == whitelisted);
            }
        }
        trace!("resetting touch action");
        self.allowed = None;
        self.whitelisted = None;
        self.accumulated_scroll = (0.0, 0.0);
        self.accumulated_pinch_scale = 1.0;
    }

    /// Filter one gesture event.
    ///
    /// Returns `true` if the event must be dropped. The event may be rewritten
    /// in place, including its kind, whether or not it is dropped. Events from
    /// devices other than touchscreens are never filtered or rewritten.
    pub fn filter_gesture_event(&mut self, event: &mut GestureEvent) -> bool {
        if event.source_device != SourceDevice::Touchscreen {
            return false;
        }

        if !matches!(event.kind, GestureKind::ScrollBegin { .. }) {
            self.reconcile_with_real_mask();
        }

        match event.kind {
            GestureKind::ScrollBegin {
                pointer_count,
                delta_x_hint,
                delta_y_hint,
            } => {
                if self.suppress_manipulation.is_some() {
                    debug!("scroll begin while a scroll sequence is in flight");
                }
                let suppress =
                    self.should_suppress_manipulation(pointer_count, delta_x_hint, delta_y_hint);
                debug!(
                    "scroll begin with {pointer_count} pointer(s) {}, effective touch action {}",
                    if suppress { "suppressed" } else { "allowed" },
                    self.effective_touch_action()
                );
                self.suppress_manipulation = Some(suppress);
                // Begin events pass until the page has spoken.
                suppress && self.allowed.is_some()
            }

            GestureKind::ScrollUpdate {
                delta_x,
                delta_y,
                velocity_x,
                velocity_y,
            } => self.filter_scroll_update(event, delta_x, delta_y, velocity_x, velocity_y),

            GestureKind::FlingStart {
                velocity_x,
                velocity_y,
            } => {
                if velocity_x == 0.0 && velocity_y == 0.0 {
                    warn!("touchscreen fling started without velocity");
                }
                debug_assert!(
                    velocity_x != 0.0 || velocity_y != 0.0,
                    "touchscreen flings must have a velocity"
                );
                let suppress = self.is_suppressing();
                self.metrics.gesture_event_filtered(suppress);
                if !suppress {
                    let (velocity_x, velocity_y) =
                        self.restrict_to_allowed_axis(velocity_x, velocity_y);
                    event.kind = if velocity_x == 0.0 && velocity_y == 0.0 {
                        // The consumer expects a terminator, not a fling that goes nowhere.
                        debug!("fling lost all velocity, delivering it as scroll end");
                        GestureKind::ScrollEnd
                    } else {
                        GestureKind::FlingStart {
                            velocity_x,
                            velocity_y,
                        }
                    };
                }
                self.filter_manipulation_event_and_reset_state()
            }

            GestureKind::ScrollEnd => {
                let suppress = self.is_suppressing();
                self.metrics.gesture_event_filtered(suppress);
                self.filter_manipulation_event_and_reset_state()
            }

            GestureKind::PinchBegin => {
                let suppress = self.is_suppressing();
                self.metrics.gesture_event_filtered(suppress);
                suppress && self.allowed.is_some()
            }

            GestureKind::PinchUpdate {
                scale,
                zoom_disabled,
            } => {
                if self.is_suppressing() {
                    if !zoom_disabled {
                        self.accumulated_pinch_scale *= scale;
                    }
                    return true;
                }
                event.kind = GestureKind::PinchUpdate {
                    scale: scale * self.accumulated_pinch_scale,
                    zoom_disabled,
                };
                self.accumulated_pinch_scale = 1.0;
                false
            }

            GestureKind::PinchEnd => {
                let suppress = self.is_suppressing();
                self.metrics.gesture_event_filtered(suppress);
                suppress
            }

            GestureKind::DoubleTap { tap_count } => {
                check_single_tap(tap_count);
                if !self.double_tap_allowed {
                    debug!("double tap zoom not allowed, delivering double tap as tap");
                    event.kind = GestureKind::Tap { tap_count };
                }
                self.double_tap_allowed = true;
                false
            }

            GestureKind::TapUnconfirmed { tap_count } => {
                check_single_tap(tap_count);
                self.double_tap_allowed = self.allows_double_tap();
                if !self.double_tap_allowed {
                    // No second tap can follow, so the tap is already confirmed.
                    event.kind = GestureKind::Tap { tap_count };
                    self.drop_pending_tap_cancel = true;
                }
                false
            }

            GestureKind::Tap { .. } => {
                self.double_tap_allowed = self.allows_double_tap();
                self.take_pending_tap_cancel()
            }

            GestureKind::TapCancel => self.take_pending_tap_cancel(),

            GestureKind::TapDown => {
                if self.drop_pending_tap_cancel {
                    warn!("tap down while the previous tap's cancel is still pending");
                }
                debug_assert!(
                    !self.drop_pending_tap_cancel,
                    "tap down with a pending tap cancel drop"
                );
                false
            }

            GestureKind::ShowPress
            | GestureKind::FlingCancel
            | GestureKind::LongPress
            | GestureKind::LongTap
            | GestureKind::TwoFingerTap => false,
        }
    }

    /// Redo a provisional suppression decision once the authoritative mask is known.
    fn reconcile_with_real_mask(&mut self) {
        if self.suppression_locked_to_real_mask
            || self.suppress_manipulation.is_none()
            || self.whitelisted.is_none()
            || self.allowed.is_none()
        {
            return;
        }
        let suppress = !self
            .effective_touch_action()
            .intersects(self.minimal_conforming);
        debug!(
            "authoritative touch action {} arrived, scroll sequence now {}",
            self.effective_touch_action(),
            if suppress { "suppressed" } else { "allowed" }
        );
        self.suppress_manipulation = Some(suppress);
        self.minimal_conforming = TouchAction::NONE;
        self.suppression_locked_to_real_mask = true;
    }

    fn should_suppress_manipulation(
        &mut self,
        pointer_count: u32,
        delta_x_hint: f32,
        delta_y_hint: f32,
    ) -> bool {
        self.suppression_locked_to_real_mask = self.allowed.is_some();
        let touch_action = self.effective_touch_action();

        // Any multi-finger gesture is a latent pinch.
        if pointer_count >= 2 {
            self.minimal_conforming = TouchAction::PINCH_ZOOM;
            return !touch_action.intersects(TouchAction::PINCH_ZOOM);
        }

        self.minimal_conforming =
            TouchAction::conforming_to_scroll_hint(delta_x_hint, delta_y_hint);
        if delta_x_hint == 0.0 && delta_y_hint == 0.0 {
            return false;
        }
        !touch_action.intersects(self.minimal_conforming)
    }

    fn filter_scroll_update(
        &mut self,
        event: &mut GestureEvent,
        delta_x: f32,
        delta_y: f32,
        velocity_x: f32,
        velocity_y: f32,
    ) -> bool {
        if self.is_suppressing() {
            // Withhold the motion; the scale is kept for the event that delivers it.
            let delta_x = delta_x * self.accumulated_pinch_scale;
            let delta_y = delta_y * self.accumulated_pinch_scale;
            self.accumulated_scroll.0 += delta_x;
            self.accumulated_scroll.1 += delta_y;
            event.kind = GestureKind::ScrollUpdate {
                delta_x,
                delta_y,
                velocity_x,
                velocity_y,
            };
            return true;
        }

        let mut delta_x = delta_x * self.accumulated_pinch_scale + self.accumulated_scroll.0;
        let mut delta_y = delta_y * self.accumulated_pinch_scale + self.accumulated_scroll.1;
        let (mut velocity_x, mut velocity_y) = (velocity_x, velocity_y);
        self.accumulated_scroll = (0.0, 0.0);
        self.accumulated_pinch_scale = 1.0;

        // Scrolls restricted to one axis don't move along the other. A provisional
        // restriction may still be lifted, so keep what it withholds.
        let touch_action = self.effective_touch_action();
        let provisional = self.allowed.is_none();
        if touch_action.is_y_axis_disallowed() {
            if provisional {
                self.accumulated_scroll.1 += delta_y;
            }
            delta_y = 0.0;
            velocity_y = 0.0;
        } else if touch_action.is_x_axis_disallowed() {
            if provisional {
                self.accumulated_scroll.0 += delta_x;
            }
            delta_x = 0.0;
            velocity_x = 0.0;
        }

        event.kind = GestureKind::ScrollUpdate {
            delta_x,
            delta_y,
            velocity_x,
            velocity_y,
        };
        false
    }

    /// Zero the velocity component on an axis the effective touch action rules out.
    fn restrict_to_allowed_axis(&self, velocity_x: f32, velocity_y: f32) -> (f32, f32) {
        let touch_action = self.effective_touch_action();
        if touch_action.is_y_axis_disallowed() {
            (velocity_x, 0.0)
        } else if touch_action.is_x_axis_disallowed() {
            (0.0, velocity_y)
        } else {
            (velocity_x, velocity_y)
        }
    }

    /// Close the scroll sequence in flight, returning whether it was suppressed.
    fn filter_manipulation_event_and_reset_state(&mut self) -> bool {
        self.suppression_locked_to_real_mask = false;
        self.suppress_manipulation.take().unwrap_or(false)
    }

    fn is_suppressing(&self) -> bool {
        self.suppress_manipulation == Some(true)
    }

    fn allows_double_tap(&self) -> bool {
        self.effective_touch_action()
            .intersects(TouchAction::DOUBLE_TAP_ZOOM)
    }

    fn take_pending_tap_cancel(&mut self) -> bool {
        core::mem::take(&mut self.drop_pending_tap_cancel)
    }
}

fn check_single_tap(tap_count: u32) {
    if tap_count != 1 {
        warn!("tap gesture with tap count {tap_count}, expected 1");
    }
    debug_assert_eq!(tap_count, 1, "tap gestures seen by the filter are single taps");
}
