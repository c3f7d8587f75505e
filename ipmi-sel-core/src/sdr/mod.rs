//! Sensor Data Records: the static description of each sensor that produces events.

mod catalog;
pub use catalog::{SdrCatalog, SdrCatalogBuilder};

mod conversion;
pub use conversion::{LinearConversion, ReadingFormat};

mod units;
pub use units::{DataFormat, ModifierUnit, RateUnit, SensorUnits, Unit};

use crate::sel::ValidationError;

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SdrError {
    #[error("invalid conversion factor: {0}")]
    InvalidFactor(#[from] ValidationError),
    #[error("conversion multiplier m must not be zero")]
    ZeroMultiplier,
    #[error("unit reading {value} out of range for {format:?} sensor")]
    ReadingOutOfRange { value: i64, format: ReadingFormat },
    #[error("reading is not a finite number")]
    NonFiniteReading,
    #[error("sensor has no analog or percentage reading format")]
    NoReadingFormat,
    #[error("analog sensor units cannot be a percentage")]
    AnalogPercentage,
    #[error("unit modifier requires a modifier unit")]
    UnspecifiedModifierUnit,
    #[error("invalid rate unit {0}")]
    InvalidRate(u8),
    #[error("unknown unit {0}")]
    UnknownUnit(u8),
    #[error("duplicate sensor number 0x{0:02X}")]
    DuplicateSensorNumber(u8),
    #[error("duplicate sensor name '{0}'")]
    DuplicateSensorName(String),
}

bitflags::bitflags! {
    /// Threshold events a sensor supports, as found in its assertion and deassertion masks.
    pub struct EventMask: u16 {
        const UPPER_NON_RECOVERABLE_GOING_HIGH = 1 << 11;
        const UPPER_NON_RECOVERABLE_GOING_LOW = 1 << 10;
        const UPPER_CRITICAL_GOING_HIGH = 1 << 9;
        const UPPER_CRITICAL_GOING_LOW = 1 << 8;
        const UPPER_NON_CRITICAL_GOING_HIGH = 1 << 7;
        const UPPER_NON_CRITICAL_GOING_LOW = 1 << 6;
        const LOWER_NON_RECOVERABLE_GOING_HIGH = 1 << 5;
        const LOWER_NON_RECOVERABLE_GOING_LOW = 1 << 4;
        const LOWER_CRITICAL_GOING_HIGH = 1 << 3;
        const LOWER_CRITICAL_GOING_LOW = 1 << 2;
        const LOWER_NON_CRITICAL_GOING_HIGH = 1 << 1;
        const LOWER_NON_CRITICAL_GOING_LOW = 1 << 0;

        /// Threshold comparison returned. Lower thresholds in an assertion mask,
        /// upper thresholds in a deassertion mask.
        const COMPARE_NON_RECOVERABLE = 1 << 14;
        const COMPARE_CRITICAL = 1 << 13;
        const COMPARE_NON_CRITICAL = 1 << 12;
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Threshold {
    UpperNonRecoverable,
    UpperCritical,
    UpperNonCritical,
    LowerNonRecoverable,
    LowerCritical,
    LowerNonCritical,
}

impl Threshold {
    pub const ALL: [Threshold; 6] = [
        Threshold::UpperNonRecoverable,
        Threshold::UpperCritical,
        Threshold::UpperNonCritical,
        Threshold::LowerNonRecoverable,
        Threshold::LowerCritical,
        Threshold::LowerNonCritical,
    ];

    pub fn abbreviation(&self) -> &'static str {
        match self {
            Threshold::UpperNonRecoverable => "UNR",
            Threshold::UpperCritical => "UC",
            Threshold::UpperNonCritical => "UNC",
            Threshold::LowerNonRecoverable => "LNR",
            Threshold::LowerCritical => "LC",
            Threshold::LowerNonCritical => "LNC",
        }
    }

    pub fn going_low(&self) -> EventMask {
        match self {
            Threshold::UpperNonRecoverable => EventMask::UPPER_NON_RECOVERABLE_GOING_LOW,
            Threshold::UpperCritical => EventMask::UPPER_CRITICAL_GOING_LOW,
            Threshold::UpperNonCritical => EventMask::UPPER_NON_CRITICAL_GOING_LOW,
            Threshold::LowerNonRecoverable => EventMask::LOWER_NON_RECOVERABLE_GOING_LOW,
            Threshold::LowerCritical => EventMask::LOWER_CRITICAL_GOING_LOW,
            Threshold::LowerNonCritical => EventMask::LOWER_NON_CRITICAL_GOING_LOW,
        }
    }

    pub fn going_high(&self) -> EventMask {
        match self {
            Threshold::UpperNonRecoverable => EventMask::UPPER_NON_RECOVERABLE_GOING_HIGH,
            Threshold::UpperCritical => EventMask::UPPER_CRITICAL_GOING_HIGH,
            Threshold::UpperNonCritical => EventMask::UPPER_NON_CRITICAL_GOING_HIGH,
            Threshold::LowerNonRecoverable => EventMask::LOWER_NON_RECOVERABLE_GOING_HIGH,
            Threshold::LowerCritical => EventMask::LOWER_CRITICAL_GOING_HIGH,
            Threshold::LowerNonCritical => EventMask::LOWER_NON_CRITICAL_GOING_HIGH,
        }
    }

    fn index(&self) -> usize {
        *self as usize
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
struct ThresholdValue {
    unit: i16,
    physical: f64,
}

/// A sensor description.
///
/// Thresholds are supplied as physical values and stored both as compressed unit
/// readings and as the physical value those unit readings decompress to.
#[derive(Debug, Clone, PartialEq)]
pub struct SensorDataRecord {
    sensor_number: u8,
    sensor_name: String,
    sensor_type: u8,
    event_type: u8,
    assertion_mask: EventMask,
    deassertion_mask: EventMask,
    units: SensorUnits,
    unit_name: Option<String>,
    conversion: LinearConversion,
    thresholds: [Option<ThresholdValue>; 6],
}

impl SensorDataRecord {
    pub fn builder(sensor_number: u8, sensor_name: impl Into<String>) -> SensorDataRecordBuilder {
        SensorDataRecordBuilder::new(sensor_number, sensor_name)
    }

    pub fn sensor_number(&self) -> u8 {
        self.sensor_number
    }

    pub fn sensor_name(&self) -> &str {
        &self.sensor_name
    }

    pub fn sensor_type(&self) -> u8 {
        self.sensor_type
    }

    pub fn event_type(&self) -> u8 {
        self.event_type
    }

    pub fn assertion_mask(&self) -> EventMask {
        self.assertion_mask
    }

    pub fn deassertion_mask(&self) -> EventMask {
        self.deassertion_mask
    }

    pub fn units(&self) -> SensorUnits {
        self.units
    }

    pub fn unit_name(&self) -> Option<&str> {
        self.unit_name.as_deref()
    }

    pub fn conversion(&self) -> LinearConversion {
        self.conversion
    }

    pub fn reading_format(&self) -> Option<ReadingFormat> {
        ReadingFormat::from_unit_1(self.units.unit_1())
    }

    /// The compressed unit reading of `threshold`.
    pub fn threshold(&self, threshold: Threshold) -> Option<i16> {
        self.thresholds[threshold.index()].map(|v| v.unit)
    }

    /// The physical value the stored unit reading of `threshold` stands for.
    pub fn physical_threshold(&self, threshold: Threshold) -> Option<f64> {
        self.thresholds[threshold.index()].map(|v| v.physical)
    }

    pub fn thresholds(&self) -> impl Iterator<Item = (Threshold, f64)> + '_ {
        Threshold::ALL
            .into_iter()
            .filter_map(|t| self.physical_threshold(t).map(|v| (t, v)))
    }

    pub fn compress(&self, raw: f64) -> Result<i16, SdrError> {
        let format = self.reading_format().ok_or(SdrError::NoReadingFormat)?;
        self.conversion.compress(format, raw)
    }

    pub fn decompress(&self, unit: i64) -> Result<f64, SdrError> {
        let format = self.reading_format().ok_or(SdrError::NoReadingFormat)?;
        self.conversion.decompress(format, unit)
    }

    /// The physical reading with its unit name, if any.
    pub fn display_reading(&self, unit: i64) -> Result<String, SdrError> {
        let value = self.decompress(unit)?;

        match self.unit_name() {
            Some("%") => Ok(format!("{value:.2}%")),
            Some(name) if !name.is_empty() => Ok(format!("{value:.2} {name}")),
            _ => Ok(format!("{value:.2}")),
        }
    }
}

#[derive(Debug, Clone)]
pub struct SensorDataRecordBuilder {
    sensor_number: u8,
    sensor_name: String,
    sensor_type: u8,
    event_type: u8,
    assertion_mask: EventMask,
    deassertion_mask: EventMask,
    units: SensorUnits,
    conversion: (i32, i32, i32, i32),
    thresholds: [Option<f64>; 6],
}

impl SensorDataRecordBuilder {
    pub fn new(sensor_number: u8, sensor_name: impl Into<String>) -> Self {
        Self {
            sensor_number,
            sensor_name: sensor_name.into(),
            sensor_type: 0,
            event_type: 0,
            assertion_mask: EventMask::empty(),
            deassertion_mask: EventMask::empty(),
            units: SensorUnits::from_bytes(SensorUnits::UNSIGNED, 0, 0),
            conversion: (1, 0, 0, 0),
            thresholds: [None; 6],
        }
    }

    pub fn sensor_type(mut self, sensor_type: u8) -> Self {
        self.sensor_type = sensor_type;
        self
    }

    pub fn event_type(mut self, event_type: u8) -> Self {
        self.event_type = event_type;
        self
    }

    pub fn assertion_mask(mut self, mask: EventMask) -> Self {
        self.assertion_mask = mask;
        self
    }

    pub fn deassertion_mask(mut self, mask: EventMask) -> Self {
        self.deassertion_mask = mask;
        self
    }

    pub fn units(mut self, units: SensorUnits) -> Self {
        self.units = units;
        self
    }

    pub fn conversion(mut self, m: i32, b: i32, b_exp: i32, r_exp: i32) -> Self {
        self.conversion = (m, b, b_exp, r_exp);
        self
    }

    /// Set `threshold` to the physical reading `value`.
    pub fn threshold(mut self, threshold: Threshold, value: f64) -> Self {
        self.thresholds[threshold.index()] = Some(value);
        self
    }

    pub fn build(self) -> Result<SensorDataRecord, SdrError> {
        let (m, b, b_exp, r_exp) = self.conversion;
        let conversion = LinearConversion::new(m, b, b_exp, r_exp)?;
        let unit_name = self.units.unit_name()?;
        let format = ReadingFormat::from_unit_1(self.units.unit_1());

        let mut thresholds = [None; 6];
        for (slot, value) in thresholds.iter_mut().zip(self.thresholds) {
            let Some(value) = value else {
                continue;
            };

            let format = format.ok_or(SdrError::NoReadingFormat)?;
            let unit = conversion.compress(format, value)?;
            let physical = conversion.decompress(format, unit.into())?;

            *slot = Some(ThresholdValue { unit, physical });
        }

        Ok(SensorDataRecord {
            sensor_number: self.sensor_number,
            sensor_name: self.sensor_name,
            sensor_type: self.sensor_type,
            event_type: self.event_type,
            assertion_mask: self.assertion_mask,
            deassertion_mask: self.deassertion_mask,
            units: self.units,
            unit_name,
            conversion,
            thresholds,
        })
    }
}
