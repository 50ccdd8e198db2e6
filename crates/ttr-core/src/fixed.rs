//! 26.6 fixed point: the metric space of shaping and glyph extents
//!
//! Shaping and font metrics hand us integers that carry six fractional bits,
//! one pixel being 64 units. The rasterizer works in `f32` pixels. Everything
//! that crosses between the two goes through this module, so the rounding
//! rules live in exactly one place.
//!
//! Arithmetic wraps on overflow, as two's-complement `int` math does in the
//! metric code this mirrors; none of these operations can fail.

use std::ops::{Add, AddAssign, Neg, Sub};

/// Number of fractional bits in a fixed-point value
pub const SCALE_SHIFT: u32 = 6;

/// One pixel in fixed-point units
pub const SCALE_FACTOR: i32 = 1 << SCALE_SHIFT;

/// A signed 26.6 fixed-point value
///
/// ```rust
/// use ttr_core::fixed::F26Dot6;
///
/// let x = F26Dot6::from_int(5); // exactly 5.0
/// let y = F26Dot6::from_raw(352); // 5.5
/// assert_eq!(y.floor_div(), 5);
/// assert_eq!(y.frac(), 32);
/// assert_eq!((x + y).round_div(), 11);
/// ```
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(transparent)]
pub struct F26Dot6(i32);

impl F26Dot6 {
    /// Mask selecting the fractional bits
    pub const FRAC_MASK: i32 = SCALE_FACTOR - 1;

    pub const ZERO: F26Dot6 = F26Dot6(0);

    pub const ONE: F26Dot6 = F26Dot6(SCALE_FACTOR);

    pub const HALF: F26Dot6 = F26Dot6(SCALE_FACTOR >> 1);

    /// Scale a whole number of pixels up into fixed point
    #[inline]
    pub const fn from_int(x: i32) -> Self {
        F26Dot6(x.wrapping_shl(SCALE_SHIFT))
    }

    /// Convert a float pixel value, rounding to the nearest 1/64
    #[inline]
    pub fn from_float(x: f32) -> Self {
        F26Dot6((x * SCALE_FACTOR as f32).round() as i32)
    }

    #[inline]
    pub const fn from_raw(raw: i32) -> Self {
        F26Dot6(raw)
    }

    #[inline]
    pub const fn raw(self) -> i32 {
        self.0
    }

    /// Largest grid value not above `self` (fraction cleared)
    #[inline]
    pub const fn floor(self) -> F26Dot6 {
        F26Dot6(self.0 & !Self::FRAC_MASK)
    }

    /// Smallest grid value not below `self`
    #[inline]
    pub const fn ceil(self) -> F26Dot6 {
        F26Dot6(self.0.wrapping_add(Self::FRAC_MASK) & !Self::FRAC_MASK)
    }

    /// Nearest grid value, halves rounding up
    #[inline]
    pub const fn round(self) -> F26Dot6 {
        F26Dot6(self.0.wrapping_add(Self::HALF.0) & !Self::FRAC_MASK)
    }

    /// Whole pixels, rounding toward negative infinity
    #[inline]
    pub const fn floor_div(self) -> i32 {
        self.0 >> SCALE_SHIFT
    }

    /// Whole pixels, rounding toward positive infinity
    #[inline]
    pub const fn ceil_div(self) -> i32 {
        self.0.wrapping_add(Self::FRAC_MASK) >> SCALE_SHIFT
    }

    /// Whole pixels, rounding to nearest
    #[inline]
    pub const fn round_div(self) -> i32 {
        self.0.wrapping_add(Self::HALF.0) >> SCALE_SHIFT
    }

    /// The fractional remainder in 1/64 units, always in `0..64`
    #[inline]
    pub const fn frac(self) -> i32 {
        self.0 & Self::FRAC_MASK
    }

    /// Pixels as a float
    #[inline]
    pub fn to_float(self) -> f32 {
        self.0 as f32 / SCALE_FACTOR as f32
    }
}

/// Scale a float that lives in fixed-point units down to pixels
///
/// Outline decomposition reports coordinates in the same 64-per-pixel space
/// as the shaping metrics, but as floats; this keeps their precision.
#[inline]
pub fn scale_down(value: f32) -> f32 {
    value / SCALE_FACTOR as f32
}

impl Add for F26Dot6 {
    type Output = Self;

    #[inline]
    fn add(self, other: Self) -> Self {
        F26Dot6(self.0.wrapping_add(other.0))
    }
}

impl AddAssign for F26Dot6 {
    #[inline]
    fn add_assign(&mut self, other: Self) {
        self.0 = self.0.wrapping_add(other.0);
    }
}

impl Sub for F26Dot6 {
    type Output = Self;

    #[inline]
    fn sub(self, other: Self) -> Self {
        F26Dot6(self.0.wrapping_sub(other.0))
    }
}

impl Neg for F26Dot6 {
    type Output = Self;

    #[inline]
    fn neg(self) -> Self {
        F26Dot6(self.0.wrapping_neg())
    }
}

impl From<F26Dot6> for f32 {
    #[inline]
    fn from(x: F26Dot6) -> f32 {
        x.to_float()
    }
}
