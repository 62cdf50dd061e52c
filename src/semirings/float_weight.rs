use std::fmt::{Debug, Display};
use std::io::{Read, Write};
use std::ops::{Add, Div, Mul, Neg, Sub};

use anyhow::Result;
use byteorder::{LittleEndian, ReadBytesExt, WriteBytesExt};
use nom::number::complete::{double, float};
use nom::IResult;

/// Floating-point backing type of the numeric semirings (`f32` or `f64`).
pub trait Float:
    Copy
    + Clone
    + Debug
    + Display
    + PartialEq
    + PartialOrd
    + Send
    + Sync
    + 'static
    + Add<Output = Self>
    + Sub<Output = Self>
    + Mul<Output = Self>
    + Div<Output = Self>
    + Neg<Output = Self>
{
    fn zero() -> Self;
    fn one() -> Self;
    fn infinity() -> Self;
    fn neg_infinity() -> Self;
    fn nan() -> Self;

    fn is_nan(self) -> bool;
    fn is_infinite(self) -> bool;
    fn abs(self) -> Self;
    fn exp(self) -> Self;
    fn ln_1p(self) -> Self;
    fn floor(self) -> Self;

    fn from_f32(v: f32) -> Self;
    fn to_f32(self) -> f32;

    /// Suffix appended to the weight-type string ("" for `f32`, "64" for
    /// `f64`), so that e.g. the log weight reads "log" / "log64".
    fn float_type_suffix() -> &'static str;

    fn approx_equal(self, rhs: Self, delta: f32) -> bool {
        let delta = Self::from_f32(delta);
        self <= rhs + delta && rhs <= self + delta
    }

    /// Rounds to the nearest multiple of `delta`; `delta = 0` and
    /// non-finite values pass through unchanged.
    fn quantize(self, delta: f32) -> Self {
        if delta == 0.0 || self.is_nan() || self.is_infinite() {
            return self;
        }
        let delta = Self::from_f32(delta);
        ((self / delta) + Self::from_f32(0.5)).floor() * delta
    }

    /// Stable bit pattern: all NaNs collapse to one value and `-0.0` to
    /// `+0.0`, so equal-by-quantization values hash identically.
    fn canonical_bits(self) -> u64;

    fn parse_text(i: &str) -> IResult<&str, Self>;
    fn read_binary<R: Read>(reader: &mut R) -> Result<Self>;
    fn write_binary<W: Write>(self, writer: &mut W) -> Result<()>;
}

impl Float for f32 {
    fn zero() -> Self {
        0.0
    }
    fn one() -> Self {
        1.0
    }
    fn infinity() -> Self {
        f32::INFINITY
    }
    fn neg_infinity() -> Self {
        f32::NEG_INFINITY
    }
    fn nan() -> Self {
        f32::NAN
    }

    fn is_nan(self) -> bool {
        f32::is_nan(self)
    }
    fn is_infinite(self) -> bool {
        f32::is_infinite(self)
    }
    fn abs(self) -> Self {
        f32::abs(self)
    }
    fn exp(self) -> Self {
        f32::exp(self)
    }
    fn ln_1p(self) -> Self {
        f32::ln_1p(self)
    }
    fn floor(self) -> Self {
        f32::floor(self)
    }

    fn from_f32(v: f32) -> Self {
        v
    }
    fn to_f32(self) -> f32 {
        self
    }

    fn float_type_suffix() -> &'static str {
        ""
    }

    fn canonical_bits(self) -> u64 {
        if self.is_nan() {
            u64::MAX
        } else if self == 0.0 {
            0
        } else {
            u64::from(self.to_bits())
        }
    }

    fn parse_text(i: &str) -> IResult<&str, Self> {
        float(i)
    }

    fn read_binary<R: Read>(reader: &mut R) -> Result<Self> {
        Ok(reader.read_f32::<LittleEndian>()?)
    }

    fn write_binary<W: Write>(self, writer: &mut W) -> Result<()> {
        writer.write_f32::<LittleEndian>(self)?;
        Ok(())
    }
}

impl Float for f64 {
    fn zero() -> Self {
        0.0
    }
    fn one() -> Self {
        1.0
    }
    fn infinity() -> Self {
        f64::INFINITY
    }
    fn neg_infinity() -> Self {
        f64::NEG_INFINITY
    }
    fn nan() -> Self {
        f64::NAN
    }

    fn is_nan(self) -> bool {
        f64::is_nan(self)
    }
    fn is_infinite(self) -> bool {
        f64::is_infinite(self)
    }
    fn abs(self) -> Self {
        f64::abs(self)
    }
    fn exp(self) -> Self {
        f64::exp(self)
    }
    fn ln_1p(self) -> Self {
        f64::ln_1p(self)
    }
    fn floor(self) -> Self {
        f64::floor(self)
    }

    fn from_f32(v: f32) -> Self {
        f64::from(v)
    }
    fn to_f32(self) -> f32 {
        self as f32
    }

    fn float_type_suffix() -> &'static str {
        "64"
    }

    fn canonical_bits(self) -> u64 {
        if self.is_nan() {
            u64::MAX
        } else if self == 0.0 {
            0
        } else {
            self.to_bits()
        }
    }

    fn parse_text(i: &str) -> IResult<&str, Self> {
        double(i)
    }

    fn read_binary<R: Read>(reader: &mut R) -> Result<Self> {
        Ok(reader.read_f64::<LittleEndian>()?)
    }

    fn write_binary<W: Write>(self, writer: &mut W) -> Result<()> {
        writer.write_f64::<LittleEndian>(self)?;
        Ok(())
    }
}

/// `-log(exp(-x) + exp(-y))` computed stably; the workhorse of the log
/// semirings. Both operands are negated logs.
pub(crate) fn log_plus<F: Float>(f1: F, f2: F) -> F {
    if f1 == F::infinity() {
        f2
    } else if f2 == F::infinity() {
        f1
    } else {
        let m = if f1 < f2 { f1 } else { f2 };
        let d = (f1 - f2).abs();
        m - (-d).exp().ln_1p()
    }
}

/// `-log(exp(-x) - exp(-y))` for `x < y`; used by the signed-log semiring.
pub(crate) fn log_minus<F: Float>(f1: F, f2: F) -> F {
    if f2 == F::infinity() {
        f1
    } else if f1 >= f2 {
        F::nan()
    } else {
        // ln_1p(-e^{-d}) = ln(1 - e^{-d}) with d = f2 - f1 > 0.
        f1 - (-(f2 - f1)).exp().neg().ln_1p()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quantize() {
        let v: f32 = 1.0001;
        let w: f32 = 1.0002;
        assert_eq!(v.quantize(crate::KDELTA), w.quantize(crate::KDELTA));
        assert_ne!(1.0f32.quantize(0.25), 1.2f32.quantize(0.25));
        assert_eq!(f32::INFINITY.quantize(0.25), f32::INFINITY);
    }

    #[test]
    fn test_log_plus() {
        // -log(e^0 + e^0) = -log 2
        let r = log_plus(0.0f32, 0.0f32);
        assert!((r - (-(2.0f32).ln())).abs() < 1e-6);
        assert_eq!(log_plus(f32::INFINITY, 3.0), 3.0);
    }

    #[test]
    fn test_canonical_bits() {
        assert_eq!((-0.0f32).canonical_bits(), 0.0f32.canonical_bits());
        assert_eq!(f32::NAN.canonical_bits(), u64::MAX);
    }
}
