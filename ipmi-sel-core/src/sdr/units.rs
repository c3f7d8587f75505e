//! Sensor unit encoding.
//!
//! Reference: IPMI 2.0 Specification, Table 43-15 "Sensor Unit Type Codes"

use super::SdrError;

macro_rules ! unit {
    {
        $($name:ident = [$value:literal, $display:literal],)*
    } => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq)]
        #[repr(u8)]
        pub enum Unit {
            $($name = $value,)*
            Unknown(u8),
        }

        impl Unit {
            /// The name used when composing a sensor's unit name.
            pub fn name(&self) -> Option<&'static str> {
                match self {
                    $(Self::$name => Some($display),)*
                    Self::Unknown(_) => None,
                }
            }
        }

        impl From<u8> for Unit {
            fn from(value: u8) -> Self {
                match value {
                    $($value => Self::$name,)*
                    _ => Self::Unknown(value),
                }
            }
        }

        impl From<Unit> for u8 {
            fn from(value: Unit) -> Self {
                match value {
                    $(Unit::$name => $value,)*
                    Unit::Unknown(v) => v,
                }
            }
        }
    }
}

unit! {
    Unspecified = [0, ""],
    DegreesCelsius = [1, "degrees C"],
    DegreesFahrenheit = [2, "degrees F"],
    DegreesKelvin = [3, "degrees K"],
    Volt = [4, "Volts"],
    Amp = [5, "Amps"],
    Watt = [6, "Watts"],
    Joule = [7, "Joules"],
    Coulomb = [8, "Coulombs"],
    VoltAmpere = [9, "VA"],
    Nit = [10, "Nits"],
    Lumen = [11, "lumen"],
    Lux = [12, "lux"],
    Candela = [13, "Candela"],
    KiloPascal = [14, "kPa"],
    PoundsPerSquareInch = [15, "PSI"],
    Newton = [16, "Newton"],
    CubicFeetPerMinute = [17, "CFM"],
    RevolutionsPerMinute = [18, "RPM"],
    Hertz = [19, "Hz"],
    Microsecond = [20, "microsecond"],
    Millisecond = [21, "millisecond"],
    Second = [22, "second"],
    Minute = [23, "minute"],
    Hour = [24, "hour"],
    Day = [25, "day"],
    Week = [26, "week"],
    Mil = [27, "mil"],
    Inch = [28, "inches"],
    Foot = [29, "feet"],
    CubicInch = [30, "cu in"],
    CubicFoot = [31, "cu feet"],
    Millimeter = [32, "mm"],
    Centimeter = [33, "cm"],
    Meter = [34, "m"],
    CubicCentimeter = [35, "cu cm"],
    CubicMeter = [36, "cu m"],
    Liter = [37, "liters"],
    FluidOunce = [38, "fluid ounce"],
    Radian = [39, "radians"],
    Steradian = [40, "steradians"],
    Revolution = [41, "revolutions"],
    Cycle = [42, "cycles"],
    Gravity = [43, "gravities"],
    Ounce = [44, "ounce"],
    Pound = [45, "pound"],
    FootPound = [46, "ft-lb"],
    OunceInch = [47, "oz-in"],
    Gauss = [48, "gauss"],
    Gilbert = [49, "gilberts"],
    Henry = [50, "henry"],
    Millihenry = [51, "millihenry"],
    Farad = [52, "farad"],
    Microfarad = [53, "microfarad"],
    Ohm = [54, "ohms"],
    Siemens = [55, "siemens"],
    Mole = [56, "mole"],
    Becquerel = [57, "becquerel"],
    PartsPerMillion = [58, "PPM"],
    Decibel = [60, "Decibels"],
    AWeightedDecibel = [61, "DbA"],
    CWeightedDecibel = [62, "DbC"],
    Gray = [63, "gray"],
    Sievert = [64, "sievert"],
    ColorTemperatureDegreesKelvin = [65, "color temp deg K"],
    Bit = [66, "bit"],
    Kilobit = [67, "kilobit"],
    Megabit = [68, "megabit"],
    Gigabit = [69, "gigabit"],
    Byte = [70, "byte"],
    Kilobyte = [71, "kilobyte"],
    Megabyte = [72, "megabyte"],
    Gigabyte = [73, "gigabyte"],
    Word = [74, "word"],
    DoubleWord = [75, "dword"],
    QuadWord = [76, "qword"],
    CacheLine = [77, "line"],
    Hit = [78, "hit"],
    Miss = [79, "miss"],
    Retry = [80, "retry"],
    Reset = [81, "reset"],
    OverrunOrOverflow = [82, "overrun / overflow"],
    Underrun = [83, "underrun"],
    Collision = [84, "collision"],
    Packet = [85, "packets"],
    Message = [86, "messages"],
    Character = [87, "characters"],
    Error = [88, "error"],
    CorrectableError = [89, "correctable error"],
    UncorrectableError = [90, "uncorrectable error"],
    FatalError = [91, "fatal error"],
    Gram = [92, "grams"],
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DataFormat {
    Unsigned,
    OnesComplement,
    TwosComplement,
    NotAnalog,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RateUnit {
    Microsecond,
    Millisecond,
    Second,
    Minute,
    Hour,
    Day,
}

impl RateUnit {
    pub fn name(&self) -> &'static str {
        match self {
            RateUnit::Microsecond => "per microsecond",
            RateUnit::Millisecond => "per millisecond",
            RateUnit::Second => "per second",
            RateUnit::Minute => "per minute",
            RateUnit::Hour => "per hour",
            RateUnit::Day => "per day",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModifierUnit {
    BaseUnitDivByModifier(Unit),
    BaseUnitMulByModifier(Unit),
}

/// The three unit bytes of a sensor: `sensor_unit_1` flags, base unit and modifier unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SensorUnits {
    unit_1: u8,
    base_unit: Unit,
    modifier_unit: Unit,
}

impl SensorUnits {
    pub const PERCENTAGE: u8 = 0b0000_0001;
    pub const MODIFIER_DIVIDE: u8 = 0b0000_0010;
    pub const MODIFIER_MULTIPLY: u8 = 0b0000_0100;
    pub const PER_MICROSECOND: u8 = 0b0000_1000;
    pub const PER_MILLISECOND: u8 = 0b0001_0000;
    pub const PER_SECOND: u8 = 0b0001_1000;
    pub const PER_MINUTE: u8 = 0b0010_0000;
    pub const PER_HOUR: u8 = 0b0010_1000;
    pub const PER_DAY: u8 = 0b0011_0000;
    pub const UNSIGNED: u8 = 0b0000_0000;
    pub const ONES_COMPLEMENT: u8 = 0b0100_0000;
    pub const TWOS_COMPLEMENT: u8 = 0b1000_0000;
    pub const NOT_ANALOG: u8 = 0b1100_0000;

    pub fn new(unit_1: u8, base_unit: Unit, modifier_unit: Unit) -> Self {
        Self {
            unit_1,
            base_unit,
            modifier_unit,
        }
    }

    pub fn from_bytes(unit_1: u8, unit_2: u8, unit_3: u8) -> Self {
        Self::new(unit_1, Unit::from(unit_2), Unit::from(unit_3))
    }

    pub fn unit_1(&self) -> u8 {
        self.unit_1
    }

    pub fn base_unit(&self) -> Unit {
        self.base_unit
    }

    pub fn modifier_unit(&self) -> Unit {
        self.modifier_unit
    }

    pub fn data_format(&self) -> DataFormat {
        match self.unit_1 & 0xC0 {
            Self::UNSIGNED => DataFormat::Unsigned,
            Self::ONES_COMPLEMENT => DataFormat::OnesComplement,
            Self::TWOS_COMPLEMENT => DataFormat::TwosComplement,
            _ => DataFormat::NotAnalog,
        }
    }

    pub fn is_percentage(&self) -> bool {
        self.unit_1 & Self::PERCENTAGE == Self::PERCENTAGE
    }

    pub fn rate(&self) -> Result<Option<RateUnit>, SdrError> {
        let rate = match (self.unit_1 >> 3) & 0b111 {
            0b000 => None,
            0b001 => Some(RateUnit::Microsecond),
            0b010 => Some(RateUnit::Millisecond),
            0b011 => Some(RateUnit::Second),
            0b100 => Some(RateUnit::Minute),
            0b101 => Some(RateUnit::Hour),
            0b110 => Some(RateUnit::Day),
            v => return Err(SdrError::InvalidRate(v)),
        };

        Ok(rate)
    }

    pub fn modifier(&self) -> Option<ModifierUnit> {
        match (self.unit_1 >> 1) & 0b11 {
            0b01 => Some(ModifierUnit::BaseUnitDivByModifier(self.modifier_unit)),
            0b10 => Some(ModifierUnit::BaseUnitMulByModifier(self.modifier_unit)),
            _ => None,
        }
    }

    /// The composed unit name, such as `"RPM"`, `"Watts per hour"` or `"%"`.
    ///
    /// Non-analog sensors without the percentage bit have no unit name.
    pub fn unit_name(&self) -> Result<Option<String>, SdrError> {
        let is_analog = self.data_format() != DataFormat::NotAnalog;

        if is_analog && self.is_percentage() {
            return Err(SdrError::AnalogPercentage);
        } else if !is_analog {
            return Ok(self.is_percentage().then(|| "%".to_string()));
        }

        let mut name = unit_name(self.base_unit)?.to_string();

        if let Some(rate) = self.rate()? {
            name.push(' ');
            name.push_str(rate.name());
        }

        let modifier = match self.modifier() {
            Some(ModifierUnit::BaseUnitDivByModifier(unit)) => Some(("/", unit)),
            Some(ModifierUnit::BaseUnitMulByModifier(unit)) => Some(("*", unit)),
            None => None,
        };

        if let Some((operator, unit)) = modifier {
            if unit == Unit::Unspecified {
                return Err(SdrError::UnspecifiedModifierUnit);
            }

            name = format!("{name} {operator} {}", unit_name(unit)?);
        }

        Ok(Some(name))
    }
}

fn unit_name(unit: Unit) -> Result<&'static str, SdrError> {
    unit.name().ok_or(SdrError::UnknownUnit(unit.into()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unit_round_trip() {
        for x in 0u8..=255u8 {
            let value: u8 = Unit::from(x).into();
            assert_eq!(x, value);
        }

        assert_eq!(Unit::from(59), Unit::Unknown(59));
        assert_eq!(Unit::from(93), Unit::Unknown(93));
        assert_eq!(Unit::from(18), Unit::RevolutionsPerMinute);
    }

    #[test]
    fn test_unit_names() {
        let rpm = SensorUnits::new(SensorUnits::UNSIGNED, Unit::RevolutionsPerMinute, Unit::Unspecified);
        assert_eq!(rpm.unit_name(), Ok(Some("RPM".to_string())));

        let energy = SensorUnits::new(
            SensorUnits::TWOS_COMPLEMENT | SensorUnits::PER_HOUR,
            Unit::Watt,
            Unit::Unspecified,
        );
        assert_eq!(energy.unit_name(), Ok(Some("Watts per hour".to_string())));

        let flow = SensorUnits::new(
            SensorUnits::UNSIGNED | SensorUnits::PER_SECOND | SensorUnits::MODIFIER_DIVIDE,
            Unit::Liter,
            Unit::Meter,
        );
        assert_eq!(
            flow.unit_name(),
            Ok(Some("liters per second / m".to_string()))
        );

        let torque = SensorUnits::from_bytes(SensorUnits::MODIFIER_MULTIPLY, 16, 34);
        assert_eq!(torque.unit_name(), Ok(Some("Newton * m".to_string())));

        let pwm = SensorUnits::new(
            SensorUnits::NOT_ANALOG | SensorUnits::PERCENTAGE,
            Unit::Unspecified,
            Unit::Unspecified,
        );
        assert_eq!(pwm.unit_name(), Ok(Some("%".to_string())));

        let discrete = SensorUnits::from_bytes(SensorUnits::NOT_ANALOG, 0, 0);
        assert_eq!(discrete.unit_name(), Ok(None));
    }

    #[test]
    fn test_unit_name_errors() {
        let units = SensorUnits::from_bytes(SensorUnits::UNSIGNED | SensorUnits::PERCENTAGE, 4, 0);
        assert_eq!(units.unit_name(), Err(SdrError::AnalogPercentage));

        let units = SensorUnits::from_bytes(SensorUnits::MODIFIER_DIVIDE, 4, 0);
        assert_eq!(units.unit_name(), Err(SdrError::UnspecifiedModifierUnit));

        let units = SensorUnits::from_bytes(0b0011_1000, 4, 0);
        assert_eq!(units.unit_name(), Err(SdrError::InvalidRate(7)));

        let units = SensorUnits::from_bytes(SensorUnits::UNSIGNED, 59, 0);
        assert_eq!(units.unit_name(), Err(SdrError::UnknownUnit(59)));
    }

    #[test]
    fn test_data_format() {
        assert_eq!(
            SensorUnits::from_bytes(0x40, 1, 0).data_format(),
            DataFormat::OnesComplement
        );
        assert_eq!(
            SensorUnits::from_bytes(0xC1, 0, 0).data_format(),
            DataFormat::NotAnalog
        );
    }
}
