// Copyright 2025 the Parley Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use core::hash::{Hash, Hasher};

/// The size an inline element asks for, in layout units.
///
/// A non-positive or NaN component means "unknown": it is resolved later from the
/// surrounding line and the container the text ends up attached to.
#[derive(Clone, Copy, Debug, Default)]
pub struct SizeHint {
    /// Requested width.
    pub width: f32,
    /// Requested height.
    pub height: f32,
}

impl SizeHint {
    /// Creates a size hint from a width and height.
    pub const fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    /// A hint with both components unknown.
    pub const UNKNOWN: Self = Self::new(0.0, 0.0);

    /// Returns the width if it is known.
    pub fn known_width(&self) -> Option<f32> {
        known(self.width)
    }

    /// Returns the height if it is known.
    pub fn known_height(&self) -> Option<f32> {
        known(self.height)
    }
}

fn known(value: f32) -> Option<f32> {
    (value > 0.0 && value.is_finite()).then_some(value)
}

// Compared bitwise so that equality agrees with hashing.
impl PartialEq for SizeHint {
    fn eq(&self, other: &Self) -> bool {
        self.width.to_bits() == other.width.to_bits()
            && self.height.to_bits() == other.height.to_bits()
    }
}

impl Eq for SizeHint {}

impl Hash for SizeHint {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.width.to_bits().hash(state);
        self.height.to_bits().hash(state);
    }
}

/// A non-text element embedded in the text flow.
///
/// The placeholder sits *between* characters: `position` is a codepoint offset in
/// `0..=char_len`, and the element occupies no text of its own.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct InlinePlaceholder<K> {
    /// Caller-chosen identifier, used to match laid out elements back to their source.
    pub id: u64,
    /// Codepoint offset the element is placed at.
    pub position: usize,
    /// What the element is (an image, an embedded view, ...).
    pub kind: K,
    /// The requested size.
    pub size: SizeHint,
}

impl<K> InlinePlaceholder<K> {
    /// Creates a placeholder.
    pub fn new(id: u64, position: usize, kind: K, size: SizeHint) -> Self {
        Self {
            id,
            position,
            kind,
            size,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::SizeHint;

    #[test]
    fn unknown_components() {
        let hint = SizeHint::new(-1.0, f32::NAN);
        assert_eq!(hint.known_width(), None);
        assert_eq!(hint.known_height(), None);
        assert_eq!(SizeHint::new(12.0, 4.0).known_width(), Some(12.0));
        assert_eq!(SizeHint::UNKNOWN.known_height(), None);
    }

    #[test]
    fn nan_hints_compare_equal_to_themselves() {
        let hint = SizeHint::new(f32::NAN, 3.0);
        assert_eq!(hint, hint);
    }
}
