// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The `touch-action` mask and the bit math the filter relies on.
//!
//! [`TouchAction`] is a set of primitive capabilities (one bit per pan
//! direction plus pinch and double-tap zoom). CSS keywords map onto unions of
//! those bits, so "is this gesture allowed" is always an intersection test.
//!
//! ```
//! use understory_touch_action::TouchAction;
//!
//! let action: TouchAction = "pan-left pinch-zoom".parse().unwrap();
//! assert!(action.contains(TouchAction::PINCH_ZOOM));
//! assert!(action.is_y_axis_disallowed());
//! assert_eq!(action.to_string(), "pan-left pinch-zoom");
//! ```

use core::fmt;
use core::str::FromStr;

use crate::util::abs_f32;

bitflags::bitflags! {
    /// Touch-action mask: the pan and zoom behaviors a touch sequence may produce.
    ///
    /// Pan bits name the direction the content is panned towards. A finger moving
    /// right produces a positive X delta and pans towards the left edge, so it
    /// conforms to [`TouchAction::PAN_LEFT`].
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
    pub struct TouchAction: u8 {
        /// No panning or zooming.
        const NONE = 0;
        /// Panning towards the left.
        const PAN_LEFT = 1 << 0;
        /// Panning towards the right.
        const PAN_RIGHT = 1 << 1;
        /// Panning upwards.
        const PAN_UP = 1 << 2;
        /// Panning downwards.
        const PAN_DOWN = 1 << 3;
        /// Multi-finger pinch zoom.
        const PINCH_ZOOM = 1 << 4;
        /// Double-tap zoom.
        const DOUBLE_TAP_ZOOM = 1 << 5;

        /// Horizontal panning in both directions (`pan-x`).
        const PAN_X = Self::PAN_LEFT.bits() | Self::PAN_RIGHT.bits();
        /// Vertical panning in both directions (`pan-y`).
        const PAN_Y = Self::PAN_UP.bits() | Self::PAN_DOWN.bits();
        /// Panning in every direction (`pan-x pan-y`).
        const PAN = Self::PAN_X.bits() | Self::PAN_Y.bits();
        /// Panning and pinch zoom (`manipulation`).
        const MANIPULATION = Self::PAN.bits() | Self::PINCH_ZOOM.bits();
        /// Everything (`auto`).
        const AUTO = Self::MANIPULATION.bits() | Self::DOUBLE_TAP_ZOOM.bits();
    }
}

impl Default for TouchAction {
    fn default() -> Self {
        Self::AUTO
    }
}

impl TouchAction {
    /// Returns `true` if horizontal panning is allowed but vertical panning is not.
    ///
    /// The filter zeroes the Y component of scroll deltas and fling velocities
    /// under such a mask.
    pub fn is_y_axis_disallowed(self) -> bool {
        self.intersects(Self::PAN_X) && !self.intersects(Self::PAN_Y)
    }

    /// Returns `true` if vertical panning is allowed but horizontal panning is not.
    pub fn is_x_axis_disallowed(self) -> bool {
        self.intersects(Self::PAN_Y) && !self.intersects(Self::PAN_X)
    }

    /// The smallest mask that would allow a scroll starting with the given hint.
    ///
    /// The dominant axis of the hint contributes one direction bit. A perfectly
    /// diagonal hint contributes a bit on both axes. A zero hint carries no
    /// direction, so every mask conforms and the result is [`TouchAction::AUTO`].
    pub fn conforming_to_scroll_hint(delta_x_hint: f32, delta_y_hint: f32) -> Self {
        if delta_x_hint == 0.0 && delta_y_hint == 0.0 {
            return Self::AUTO;
        }

        let abs_x = abs_f32(delta_x_hint);
        let abs_y = abs_f32(delta_y_hint);
        let mut minimal = Self::NONE;
        if abs_x >= abs_y {
            if delta_x_hint > 0.0 {
                minimal |= Self::PAN_LEFT;
            } else if delta_x_hint < 0.0 {
                minimal |= Self::PAN_RIGHT;
            }
        }
        if abs_y >= abs_x {
            if delta_y_hint > 0.0 {
                minimal |= Self::PAN_UP;
            } else if delta_y_hint < 0.0 {
                minimal |= Self::PAN_DOWN;
            }
        }
        minimal
    }
}

/// Narrow an optional per-sequence mask by the mask of one more finger.
///
/// The first finger sets the mask; every later one can only remove bits.
pub(crate) fn intersect_set(current: Option<TouchAction>, incoming: TouchAction) -> TouchAction {
    match current {
        Some(current) => current & incoming,
        None => incoming,
    }
}

/// Writes the CSS keywords for the mask.
///
/// [`TouchAction::DOUBLE_TAP_ZOOM`] has no keyword of its own. It is printed as
/// `double-tap-zoom` when it appears outside of `auto`.
impl fmt::Display for TouchAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if *self == Self::AUTO {
            return f.write_str("auto");
        }
        if self.is_empty() {
            return f.write_str("none");
        }
        if *self == Self::MANIPULATION {
            return f.write_str("manipulation");
        }

        let x = *self & Self::PAN_X;
        let x = if x == Self::PAN_X {
            Some("pan-x")
        } else if x == Self::PAN_LEFT {
            Some("pan-left")
        } else if x == Self::PAN_RIGHT {
            Some("pan-right")
        } else {
            None
        };
        let y = *self & Self::PAN_Y;
        let y = if y == Self::PAN_Y {
            Some("pan-y")
        } else if y == Self::PAN_UP {
            Some("pan-up")
        } else if y == Self::PAN_DOWN {
            Some("pan-down")
        } else {
            None
        };
        let zoom = self.contains(Self::PINCH_ZOOM).then_some("pinch-zoom");
        let double_tap = self
            .contains(Self::DOUBLE_TAP_ZOOM)
            .then_some("double-tap-zoom");

        let mut first = true;
        for keyword in [x, y, zoom, double_tap].into_iter().flatten() {
            if !first {
                f.write_str(" ")?;
            }
            f.write_str(keyword)?;
            first = false;
        }
        Ok(())
    }
}

/// Error returned when a `touch-action` value cannot be parsed.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[non_exhaustive]
pub enum ParseTouchActionError {
    /// The value contained no keywords.
    Empty,
    /// A keyword is not a `touch-action` keyword.
    UnknownKeyword,
    /// The keywords are valid but cannot be combined, for example `pan-x pan-left`
    /// or `none pan-y`.
    InvalidCombination,
}

impl fmt::Display for ParseTouchActionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Empty => "empty touch-action value",
            Self::UnknownKeyword => "unknown touch-action keyword",
            Self::InvalidCombination => "invalid combination of touch-action keywords",
        })
    }
}

impl core::error::Error for ParseTouchActionError {}

/// Parses a CSS `touch-action` value.
///
/// Accepts `auto`, `none`, `manipulation`, or any combination of at most one
/// horizontal keyword (`pan-x`, `pan-left`, `pan-right`), at most one vertical
/// keyword (`pan-y`, `pan-up`, `pan-down`) and `pinch-zoom`. Keywords are
/// ASCII case-insensitive and separated by whitespace.
impl FromStr for TouchAction {
    type Err = ParseTouchActionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut keywords = s.split_ascii_whitespace();
        let first = keywords.next().ok_or(ParseTouchActionError::Empty)?;

        let standalone = [
            ("auto", Self::AUTO),
            ("none", Self::NONE),
            ("manipulation", Self::MANIPULATION),
        ];
        if let Some((_, action)) = standalone
            .iter()
            .find(|(name, _)| first.eq_ignore_ascii_case(name))
        {
            return match keywords.next() {
                None => Ok(*action),
                Some(_) => Err(ParseTouchActionError::InvalidCombination),
            };
        }

        let mut action = Self::NONE;
        for keyword in core::iter::once(first).chain(keywords) {
            let (bits, group) = parse_combinable(keyword)?;
            if action.intersects(group) {
                return Err(ParseTouchActionError::InvalidCombination);
            }
            action |= bits;
        }
        Ok(action)
    }
}

/// Maps a combinable keyword to its bits and the group it is exclusive within.
fn parse_combinable(
    keyword: &str,
) -> Result<(TouchAction, TouchAction), ParseTouchActionError> {
    const COMBINABLE: [(&str, TouchAction, TouchAction); 7] = [
        ("pan-x", TouchAction::PAN_X, TouchAction::PAN_X),
        ("pan-left", TouchAction::PAN_LEFT, TouchAction::PAN_X),
        ("pan-right", TouchAction::PAN_RIGHT, TouchAction::PAN_X),
        ("pan-y", TouchAction::PAN_Y, TouchAction::PAN_Y),
        ("pan-up", TouchAction::PAN_UP, TouchAction::PAN_Y),
        ("pan-down", TouchAction::PAN_DOWN, TouchAction::PAN_Y),
        ("pinch-zoom", TouchAction::PINCH_ZOOM, TouchAction::PINCH_ZOOM),
    ];
    if ["auto", "none", "manipulation"]
        .iter()
        .any(|name| keyword.eq_ignore_ascii_case(name))
    {
        return Err(ParseTouchActionError::InvalidCombination);
    }
    COMBINABLE
        .iter()
        .find(|(name, _, _)| keyword.eq_ignore_ascii_case(name))
        .map(|&(_, bits, group)| (bits, group))
        .ok_or(ParseTouchActionError::UnknownKeyword)
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::string::ToString;

    #[test]
    fn bit_math() {
        assert_eq!(TouchAction::NONE, TouchAction::NONE & TouchAction::AUTO);
        assert_eq!(TouchAction::NONE, TouchAction::PAN_Y & TouchAction::PAN_X);
        assert_eq!(TouchAction::PAN, TouchAction::AUTO & TouchAction::PAN);
        assert_eq!(
            TouchAction::MANIPULATION,
            TouchAction::AUTO & !TouchAction::DOUBLE_TAP_ZOOM
        );
        assert_eq!(
            TouchAction::PAN_X,
            TouchAction::PAN_LEFT | TouchAction::PAN_RIGHT
        );
        assert_eq!(
            TouchAction::AUTO,
            TouchAction::MANIPULATION | TouchAction::DOUBLE_TAP_ZOOM
        );
        assert_eq!(TouchAction::AUTO, TouchAction::all());
        assert_eq!(TouchAction::default(), TouchAction::AUTO);
    }

    #[test]
    fn intersect_set_takes_first_then_narrows() {
        let first = intersect_set(None, TouchAction::PAN);
        assert_eq!(first, TouchAction::PAN);
        let second = intersect_set(Some(first), TouchAction::PAN_Y | TouchAction::PINCH_ZOOM);
        assert_eq!(second, TouchAction::PAN_Y);
        assert_eq!(
            intersect_set(Some(second), TouchAction::AUTO),
            TouchAction::PAN_Y
        );
    }

    #[test]
    fn intersection_is_order_independent() {
        let masks = [
            TouchAction::PAN_X | TouchAction::PINCH_ZOOM,
            TouchAction::MANIPULATION,
            TouchAction::PAN_LEFT | TouchAction::PAN_UP | TouchAction::PINCH_ZOOM,
        ];
        let orders = [[0, 1, 2], [0, 2, 1], [1, 0, 2], [1, 2, 0], [2, 0, 1], [2, 1, 0]];
        for order in orders {
            let mut current = None;
            for i in order {
                current = Some(intersect_set(current, masks[i]));
                assert!(masks[order[0]].contains(current.unwrap()));
            }
            assert_eq!(
                current,
                Some(TouchAction::PAN_LEFT | TouchAction::PINCH_ZOOM)
            );
        }
    }

    #[test]
    fn axis_restrictions() {
        assert!(TouchAction::PAN_LEFT.is_y_axis_disallowed());
        assert!(TouchAction::PAN_X.is_y_axis_disallowed());
        assert!(!TouchAction::PAN_X.is_x_axis_disallowed());
        assert!(TouchAction::PAN_DOWN.is_x_axis_disallowed());
        assert!(!TouchAction::PAN.is_x_axis_disallowed());
        assert!(!TouchAction::PAN.is_y_axis_disallowed());
        // Neither axis is restricted when there's no pan bit to restrict to.
        assert!(!TouchAction::NONE.is_x_axis_disallowed());
        assert!(!TouchAction::NONE.is_y_axis_disallowed());
        assert!(!TouchAction::PINCH_ZOOM.is_y_axis_disallowed());
    }

    #[test]
    fn conforming_mask_follows_dominant_axis() {
        assert_eq!(
            TouchAction::conforming_to_scroll_hint(7.0, 6.0),
            TouchAction::PAN_LEFT
        );
        assert_eq!(
            TouchAction::conforming_to_scroll_hint(-7.0, 6.0),
            TouchAction::PAN_RIGHT
        );
        assert_eq!(
            TouchAction::conforming_to_scroll_hint(6.0, 7.0),
            TouchAction::PAN_UP
        );
        assert_eq!(
            TouchAction::conforming_to_scroll_hint(6.0, -7.0),
            TouchAction::PAN_DOWN
        );
        assert_eq!(
            TouchAction::conforming_to_scroll_hint(0.0, 0.0),
            TouchAction::AUTO
        );
    }

    #[test]
    fn diagonal_hint_needs_both_axes() {
        assert_eq!(
            TouchAction::conforming_to_scroll_hint(-7.0, -7.0),
            TouchAction::PAN_RIGHT | TouchAction::PAN_DOWN
        );
        assert_eq!(
            TouchAction::conforming_to_scroll_hint(3.0, -3.0),
            TouchAction::PAN_LEFT | TouchAction::PAN_DOWN
        );
    }

    #[test]
    fn parses_css_keywords() {
        let cases = [
            ("auto", TouchAction::AUTO),
            ("none", TouchAction::NONE),
            ("manipulation", TouchAction::MANIPULATION),
            ("pan-x", TouchAction::PAN_X),
            ("pan-y pan-x", TouchAction::PAN),
            (
                "PAN-LEFT  pinch-zoom",
                TouchAction::PAN_LEFT | TouchAction::PINCH_ZOOM,
            ),
            ("pan-down", TouchAction::PAN_DOWN),
            (
                "pinch-zoom pan-up pan-right",
                TouchAction::PINCH_ZOOM | TouchAction::PAN_UP | TouchAction::PAN_RIGHT,
            ),
        ];
        for (css, expected) in cases {
            assert_eq!(css.parse::<TouchAction>(), Ok(expected), "parsing {css:?}");
        }
    }

    #[test]
    fn rejects_invalid_values() {
        assert_eq!(
            "".parse::<TouchAction>(),
            Err(ParseTouchActionError::Empty)
        );
        assert_eq!(
            "  ".parse::<TouchAction>(),
            Err(ParseTouchActionError::Empty)
        );
        assert_eq!(
            "pan-z".parse::<TouchAction>(),
            Err(ParseTouchActionError::UnknownKeyword)
        );
        assert_eq!(
            "pan-x pan-left".parse::<TouchAction>(),
            Err(ParseTouchActionError::InvalidCombination)
        );
        assert_eq!(
            "none pan-y".parse::<TouchAction>(),
            Err(ParseTouchActionError::InvalidCombination)
        );
        assert_eq!(
            "pan-y auto".parse::<TouchAction>(),
            Err(ParseTouchActionError::InvalidCombination)
        );
        assert_eq!(
            "pinch-zoom pinch-zoom".parse::<TouchAction>(),
            Err(ParseTouchActionError::InvalidCombination)
        );
    }

    #[test]
    fn prints_css_keywords() {
        assert_eq!(TouchAction::AUTO.to_string(), "auto");
        assert_eq!(TouchAction::NONE.to_string(), "none");
        assert_eq!(TouchAction::MANIPULATION.to_string(), "manipulation");
        assert_eq!(TouchAction::PAN.to_string(), "pan-x pan-y");
        assert_eq!(
            (TouchAction::PAN_RIGHT | TouchAction::PAN_UP).to_string(),
            "pan-right pan-up"
        );
        assert_eq!(
            (TouchAction::PAN_Y | TouchAction::PINCH_ZOOM).to_string(),
            "pan-y pinch-zoom"
        );
        assert_eq!(
            (TouchAction::PAN_X | TouchAction::DOUBLE_TAP_ZOOM).to_string(),
            "pan-x double-tap-zoom"
        );
    }

    #[test]
    fn printed_css_parses_back() {
        for bits in 0..=TouchAction::MANIPULATION.bits() {
            let action = TouchAction::from_bits_truncate(bits);
            assert_eq!(action.to_string().parse::<TouchAction>(), Ok(action));
        }
    }
}
