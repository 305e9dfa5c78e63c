// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Understory Touch Action: a deterministic, `no_std` filter that applies CSS
//! `touch-action` to touchscreen gesture streams.
//!
//! ## Overview
//!
//! Web content declares which pan and zoom behaviors a touch may trigger with
//! the CSS `touch-action` property. Gesture recognition runs ahead of the page,
//! so by the time the page's answer is known some gestures may already be on
//! their way. [`TouchActionFilter`] reconciles the two: it sits in the gesture
//! stream and, for each event, decides whether it is delivered, dropped, or
//! rewritten.
//!
//! - Scrolls are allowed or suppressed as a whole, once, at scroll begin.
//! - Scrolls restricted to one axis have the other axis zeroed.
//! - Pinches need `pinch-zoom`; any multi-finger scroll counts as a pinch.
//! - Taps are confirmed early when `double-tap-zoom` is not allowed.
//!
//! It does not perform gesture recognition, hit testing or the cascade that
//! computes a touch action; feed it the results of those.
//!
//! ## Inputs
//!
//! - A [`TouchAction`] mask per finger, authoritative or provisional. Masks can
//!   be parsed from and printed as CSS (`"pan-x pinch-zoom".parse()`).
//! - [`GestureEvent`]s carrying a [`SourceDevice`] and a [`GestureKind`]. Only
//!   touchscreen events are filtered.
//!
//! ## Metrics
//!
//! The filter reports a few samples through a [`FilterMetrics`] observer. The
//! default, [`NoMetrics`], ignores them.
//!
//! ## Logging
//!
//! Decisions are logged through the [`log`] facade: `trace` for touch-action
//! updates, `debug` for suppression decisions and rewrites, and `warn` for
//! gesture streams that break the expected ordering.
//!
//! ## Example
//!
//! ```rust
//! use understory_touch_action::{GestureEvent, GestureKind, TouchAction, TouchActionFilter};
//!
//! let mut filter = TouchActionFilter::new();
//!
//! // A new touch sequence starts on an element with `touch-action: pan-y`.
//! filter.reset_touch_action();
//! filter.on_set_touch_action("pan-y".parse().unwrap());
//!
//! // A mostly horizontal scroll is suppressed from the start...
//! let mut begin = GestureEvent::touchscreen(GestureKind::scroll_begin(8.0, 1.0));
//! assert!(filter.filter_gesture_event(&mut begin));
//! let mut update = GestureEvent::touchscreen(GestureKind::scroll_update(8.0, 1.0));
//! assert!(filter.filter_gesture_event(&mut update));
//! assert!(filter.filter_gesture_event(&mut GestureEvent::touchscreen(GestureKind::ScrollEnd)));
//!
//! // ...while a vertical one only loses its horizontal drift.
//! let mut begin = GestureEvent::touchscreen(GestureKind::scroll_begin(1.0, 8.0));
//! assert!(!filter.filter_gesture_event(&mut begin));
//! let mut update = GestureEvent::touchscreen(GestureKind::scroll_update(1.0, 8.0));
//! assert!(!filter.filter_gesture_event(&mut update));
//! assert_eq!(update.scroll_delta(), Some((0.0, 8.0)));
//!
//! // Taps can't become double taps, so they are confirmed right away.
//! assert_eq!(filter.allowed_touch_action(), Some(TouchAction::PAN_Y));
//! let mut tap = GestureEvent::touchscreen(GestureKind::tap_unconfirmed());
//! assert!(!filter.filter_gesture_event(&mut tap));
//! assert_eq!(tap.kind, GestureKind::tap());
//! ```
//!
//! This crate is `no_std`.

#![no_std]

#[cfg(test)]
extern crate alloc;

pub mod action;
pub mod event;
pub mod filter;
pub mod metrics;

mod util;

pub use action::{ParseTouchActionError, TouchAction};
pub use event::{GestureEvent, GestureKind, SourceDevice};
pub use filter::TouchActionFilter;
pub use metrics::{FilterMetrics, NoMetrics, TouchActionBucket};
