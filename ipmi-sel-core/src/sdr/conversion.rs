use core::ops::RangeInclusive;

use super::{SdrError, SensorUnits};
use crate::sel::ValidationError;

/// The encoding of a sensor's one-byte unit reading.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReadingFormat {
    Unsigned,
    TwosComplement,
    OnesComplement,
    Percentage,
}

impl ReadingFormat {
    /// Select the reading format from `sensor_unit_1`.
    ///
    /// The analog data format takes precedence over the percentage bit. A non-analog
    /// sensor without the percentage bit has no reading format.
    pub fn from_unit_1(unit_1: u8) -> Option<Self> {
        let format = match unit_1 & 0xC0 {
            SensorUnits::UNSIGNED => Self::Unsigned,
            SensorUnits::TWOS_COMPLEMENT => Self::TwosComplement,
            SensorUnits::ONES_COMPLEMENT => Self::OnesComplement,
            _ if unit_1 & SensorUnits::PERCENTAGE != 0 => Self::Percentage,
            _ => return None,
        };

        Some(format)
    }

    pub fn range(&self) -> RangeInclusive<i16> {
        match self {
            ReadingFormat::Unsigned => 0..=255,
            ReadingFormat::TwosComplement => -128..=127,
            ReadingFormat::OnesComplement => -127..=127,
            ReadingFormat::Percentage => 0..=100,
        }
    }

    fn check(&self, value: i64) -> Result<i16, SdrError> {
        let range = self.range();

        if (i64::from(*range.start())..=i64::from(*range.end())).contains(&value) {
            Ok(value as i16)
        } else {
            Err(SdrError::ReadingOutOfRange {
                value,
                format: *self,
            })
        }
    }
}

/// The linear conversion `unit = (m * raw + b * 10^b_exp) * 10^r_exp` between a physical
/// reading and its one-byte unit reading.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LinearConversion {
    m: i16,
    b: i16,
    b_exp: i8,
    r_exp: i8,
}

impl LinearConversion {
    pub const IDENTITY: Self = Self {
        m: 1,
        b: 0,
        b_exp: 0,
        r_exp: 0,
    };

    pub fn new(m: i32, b: i32, b_exp: i32, r_exp: i32) -> Result<Self, SdrError> {
        let m = ValidationError::check("m", m.into(), -512, 511)?;
        if m == 0 {
            return Err(SdrError::ZeroMultiplier);
        }

        let b = ValidationError::check("b", b.into(), -512, 511)?;
        let b_exp = ValidationError::check("b_exp", b_exp.into(), -8, 7)?;
        let r_exp = ValidationError::check("r_exp", r_exp.into(), -8, 7)?;

        Ok(Self {
            m: m as i16,
            b: b as i16,
            b_exp: b_exp as i8,
            r_exp: r_exp as i8,
        })
    }

    pub fn m(&self) -> i16 {
        self.m
    }

    pub fn b(&self) -> i16 {
        self.b
    }

    pub fn b_exp(&self) -> i8 {
        self.b_exp
    }

    pub fn r_exp(&self) -> i8 {
        self.r_exp
    }

    fn offset(&self) -> f64 {
        scale(f64::from(self.b), self.b_exp)
    }

    /// Convert a physical reading into a unit reading, rounding towards negative infinity.
    pub fn compress(&self, format: ReadingFormat, raw: f64) -> Result<i16, SdrError> {
        if !raw.is_finite() {
            return Err(SdrError::NonFiniteReading);
        }

        let unit = scale(f64::from(self.m) * raw + self.offset(), self.r_exp).floor();

        if !unit.is_finite() || unit.abs() > i64::MAX as f64 {
            return Err(SdrError::NonFiniteReading);
        }

        format.check(unit as i64)
    }

    /// Convert a unit reading back into a physical reading.
    pub fn decompress(&self, format: ReadingFormat, unit: i64) -> Result<f64, SdrError> {
        let unit = format.check(unit)?;

        Ok((scale(f64::from(unit), -self.r_exp) - self.offset()) / f64::from(self.m))
    }
}

impl Default for LinearConversion {
    fn default() -> Self {
        Self::IDENTITY
    }
}

/// `value * 10^exp`. Negative exponents divide, which keeps `3800 * 10^-2` exact.
fn scale(value: f64, exp: i8) -> f64 {
    let factor = 10f64.powi(i32::from(exp.unsigned_abs()));

    if exp < 0 {
        value / factor
    } else {
        value * factor
    }
}
