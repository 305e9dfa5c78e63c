// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

/// Absolute value of an `f32` without relying on `std` float intrinsics.
#[inline]
pub(crate) const fn abs_f32(value: f32) -> f32 {
    f32::from_bits(value.to_bits() & 0x7fff_ffff)
}

#[cfg(test)]
mod tests {
    #[test]
    fn abs_f32() {
        assert_eq!(super::abs_f32(-7.5), 7.5);
        assert_eq!(super::abs_f32(6.0), 6.0);
        assert_eq!(super::abs_f32(-0.0).to_bits(), 0.0_f32.to_bits());
    }
}
