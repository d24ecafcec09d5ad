// Copyright 2025 the Parley Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Measurement constraints and the packed size encoding used across the measure boundary.

use core::hash::{Hash, Hasher};

/// How a constraint value on one axis is interpreted.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum MeasureMode {
    /// No constraint: report the natural size and never wrap on this axis.
    #[default]
    Unspecified,
    /// The size is exactly the given value regardless of content.
    Exact,
    /// Natural size, capped at the given value; content wraps at the cap.
    AtMost,
}

impl MeasureMode {
    /// Decodes the platform encoding: `0` unspecified, `1` exact, `2` at most.
    ///
    /// Unknown values are treated as unspecified.
    pub fn from_raw(raw: i32) -> Self {
        match raw {
            1 => Self::Exact,
            2 => Self::AtMost,
            _ => Self::Unspecified,
        }
    }

    /// The platform encoding of this mode.
    pub fn to_raw(self) -> i32 {
        match self {
            Self::Unspecified => 0,
            Self::Exact => 1,
            Self::AtMost => 2,
        }
    }

    /// Resolves the final size on this axis from the natural content size.
    pub fn resolve(self, value: f32, natural: f32) -> f32 {
        match self {
            Self::Unspecified => natural,
            Self::Exact if value.is_finite() => value,
            Self::AtMost if value.is_finite() => natural.min(value),
            Self::Exact | Self::AtMost => natural,
        }
    }

    /// The width lines are wrapped at, or `None` when this axis never wraps.
    pub fn wrap_limit(self, value: f32) -> Option<f32> {
        match self {
            Self::Exact | Self::AtMost if value.is_finite() => Some(value.max(0.0)),
            _ => None,
        }
    }
}

/// Width and height bounds for a measurement.
///
/// Unbounded values are `f32::INFINITY`; with [`MeasureMode::Unspecified`] the value is
/// ignored entirely.
#[derive(Copy, Clone, Debug)]
pub struct LayoutConstraints {
    /// Width bound.
    pub width: f32,
    /// Interpretation of `width`.
    pub width_mode: MeasureMode,
    /// Height bound.
    pub height: f32,
    /// Interpretation of `height`.
    pub height_mode: MeasureMode,
}

impl LayoutConstraints {
    /// No bounds on either axis.
    pub const UNBOUNDED: Self = Self {
        width: f32::INFINITY,
        width_mode: MeasureMode::Unspecified,
        height: f32::INFINITY,
        height_mode: MeasureMode::Unspecified,
    };

    /// Creates constraints from both axes.
    pub fn new(width: f32, width_mode: MeasureMode, height: f32, height_mode: MeasureMode) -> Self {
        Self {
            width,
            width_mode,
            height,
            height_mode,
        }
    }

    /// Constrains the width only; height is unbounded.
    pub fn width(width: f32, width_mode: MeasureMode) -> Self {
        Self {
            width,
            width_mode,
            ..Self::UNBOUNDED
        }
    }

    /// The width lines wrap at, if any.
    pub fn wrap_width(&self) -> Option<f32> {
        self.width_mode.wrap_limit(self.width)
    }

    fn key(&self) -> (u32, MeasureMode, u32, MeasureMode) {
        (
            self.width.to_bits(),
            self.width_mode,
            self.height.to_bits(),
            self.height_mode,
        )
    }
}

impl Default for LayoutConstraints {
    fn default() -> Self {
        Self::UNBOUNDED
    }
}

// Compared bitwise so that equality agrees with hashing.
impl PartialEq for LayoutConstraints {
    fn eq(&self, other: &Self) -> bool {
        self.key() == other.key()
    }
}

impl Eq for LayoutConstraints {}

impl Hash for LayoutConstraints {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.key().hash(state);
    }
}

/// A measured size as it crosses the measure boundary.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct MeasureOutput {
    /// Measured width.
    pub width: f32,
    /// Measured height.
    pub height: f32,
}

impl MeasureOutput {
    /// Creates a measured size.
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    /// Packs the size into one 64-bit value: width bits high, height bits low.
    pub fn to_packed(self) -> u64 {
        (u64::from(self.width.to_bits()) << 32) | u64::from(self.height.to_bits())
    }

    /// Unpacks a value produced by [`MeasureOutput::to_packed`].
    #[expect(
        clippy::cast_possible_truncation,
        reason = "Each half of the packed value is exactly 32 bits."
    )]
    pub fn from_packed(packed: u64) -> Self {
        let width = f32::from_bits((packed >> 32) as u32);
        let height = f32::from_bits((packed & 0xFFFF_FFFF) as u32);
        Self { width, height }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn raw_modes() {
        for mode in [MeasureMode::Unspecified, MeasureMode::Exact, MeasureMode::AtMost] {
            assert_eq!(MeasureMode::from_raw(mode.to_raw()), mode);
        }
        assert_eq!(MeasureMode::from_raw(17), MeasureMode::Unspecified);
    }

    #[test]
    fn resolve_per_mode() {
        assert_eq!(MeasureMode::Exact.resolve(100.0, 40.0), 100.0);
        assert_eq!(MeasureMode::Exact.resolve(10.0, 40.0), 10.0);
        assert_eq!(MeasureMode::AtMost.resolve(100.0, 40.0), 40.0);
        assert_eq!(MeasureMode::AtMost.resolve(30.0, 40.0), 30.0);
        assert_eq!(MeasureMode::Unspecified.resolve(30.0, 40.0), 40.0);
        assert_eq!(MeasureMode::AtMost.resolve(f32::INFINITY, 40.0), 40.0);
    }

    #[test]
    fn only_bounded_modes_wrap() {
        assert_eq!(MeasureMode::AtMost.wrap_limit(50.0), Some(50.0));
        assert_eq!(MeasureMode::Exact.wrap_limit(-3.0), Some(0.0));
        assert_eq!(MeasureMode::Unspecified.wrap_limit(50.0), None);
        assert_eq!(MeasureMode::AtMost.wrap_limit(f32::INFINITY), None);
    }

    #[test]
    fn packing_keeps_bits() {
        let size = MeasureOutput::new(123.25, -0.0);
        let packed = size.to_packed();
        assert_eq!(packed >> 32, u64::from(123.25_f32.to_bits()));
        let back = MeasureOutput::from_packed(packed);
        assert_eq!(back.width.to_bits(), size.width.to_bits());
        assert_eq!(back.height.to_bits(), size.height.to_bits());
    }
}
