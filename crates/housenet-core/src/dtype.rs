use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign, Div, Mul, Sub};

use serde::{Deserialize, Serialize};

/// Trait bound for numeric types usable in matrices.
/// Implemented for `f32` and `f64`.
pub trait Float:
    Copy
    + Clone
    + PartialEq
    + PartialOrd
    + fmt::Debug
    + fmt::Display
    + Send
    + Sync
    + Add<Output = Self>
    + Sub<Output = Self>
    + Mul<Output = Self>
    + Div<Output = Self>
    + AddAssign
    + Sum
    + Serialize
    + for<'de> Deserialize<'de>
    + 'static
{
    const ZERO: Self;

    fn from_usize(v: usize) -> Self;
    fn sqrt(self) -> Self;
}

impl Float for f32 {
    const ZERO: Self = 0.0;

    #[inline] fn from_usize(v: usize) -> Self { v as f32 }
    #[inline] fn sqrt(self) -> Self { f32::sqrt(self) }
}

impl Float for f64 {
    const ZERO: Self = 0.0;

    #[inline] fn from_usize(v: usize) -> Self { v as f64 }
    #[inline] fn sqrt(self) -> Self { f64::sqrt(self) }
}
