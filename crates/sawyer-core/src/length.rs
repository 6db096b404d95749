//! Text extents measured in characters and bytes.

use std::ops::{Add, AddAssign, Sub};

/// A two-component text extent: a character count paired with the byte
/// length of the same span in UTF-8.
///
/// Every position, padding, and size in a parse is a `Length`, so moving
/// through the input is a matter of adding token extents. Addition is
/// componentwise with [`Length::zero`] as identity.
///
/// Subtraction saturates to zero per component instead of underflowing.
/// Error recovery can briefly observe a token start to the left of the
/// stack's right edge, and a zero extent is the correct clamp there.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Default)]
pub struct Length {
    /// Number of characters in the span.
    pub chars: u32,
    /// Number of UTF-8 bytes in the span.
    pub bytes: u32,
}

impl Length {
    /// The empty extent.
    #[inline]
    pub const fn zero() -> Self {
        Self { chars: 0, bytes: 0 }
    }

    #[inline]
    pub const fn new(chars: u32, bytes: u32) -> Self {
        Self { chars, bytes }
    }

    #[inline]
    pub const fn is_zero(self) -> bool {
        self.chars == 0 && self.bytes == 0
    }
}

impl Add for Length {
    type Output = Length;

    #[inline]
    fn add(self, rhs: Length) -> Length {
        Length {
            chars: self.chars + rhs.chars,
            bytes: self.bytes + rhs.bytes,
        }
    }
}

impl AddAssign for Length {
    #[inline]
    fn add_assign(&mut self, rhs: Length) {
        *self = *self + rhs;
    }
}

impl Sub for Length {
    type Output = Length;

    /// Saturating: each component clamps at zero.
    #[inline]
    fn sub(self, rhs: Length) -> Length {
        Length {
            chars: self.chars.saturating_sub(rhs.chars),
            bytes: self.bytes.saturating_sub(rhs.bytes),
        }
    }
}
