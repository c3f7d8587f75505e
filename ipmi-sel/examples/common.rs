#![allow(unused)]

use std::sync::Arc;

use clap::Args;
use ipmi_sel_core::{
    sdr::{EventMask, SdrCatalog, SdrError, SensorDataRecord, SensorUnits, Threshold, Unit},
    ReferencePlatform,
};

#[allow(unused)]
fn main() {}

#[derive(Args)]
pub struct CommonOpts {
    /// Render OEM events with the reference platform tables
    #[clap(long)]
    pub reference_platform: bool,
    /// Truncate messages longer than 255 characters instead of failing
    #[clap(long)]
    pub truncate: bool,
}

impl CommonOpts {
    pub fn platform(&self) -> Option<ReferencePlatform> {
        self.reference_platform.then(ReferencePlatform::new)
    }
}

/// A small catalog describing the sensors of a sample board.
pub fn demo_catalog() -> Result<Arc<SdrCatalog>, SdrError> {
    let inlet_temp = SensorDataRecord::builder(0x05, "FIO Inlet Temp 1")
        .sensor_type(0x01)
        .event_type(0x01)
        .assertion_mask(EventMask::UPPER_CRITICAL_GOING_HIGH)
        .deassertion_mask(EventMask::UPPER_CRITICAL_GOING_HIGH)
        .units(SensorUnits::new(
            SensorUnits::TWOS_COMPLEMENT,
            Unit::DegreesCelsius,
            Unit::Unspecified,
        ))
        .threshold(Threshold::UpperCritical, 37.0)
        .build()?;

    let fan_tach = SensorDataRecord::builder(0x11, "Fan Tach 1")
        .sensor_type(0x04)
        .event_type(0x01)
        .assertion_mask(EventMask::LOWER_CRITICAL_GOING_HIGH)
        .deassertion_mask(EventMask::LOWER_CRITICAL_GOING_HIGH)
        .units(SensorUnits::new(
            SensorUnits::UNSIGNED,
            Unit::RevolutionsPerMinute,
            Unit::Unspecified,
        ))
        .conversion(1, 0, 0, -2)
        .threshold(Threshold::LowerCritical, 3800.0)
        .build()?;

    let pwm = SensorDataRecord::builder(0x1D, "PWM 1")
        .sensor_type(0x04)
        .units(SensorUnits::from_bytes(
            SensorUnits::NOT_ANALOG | SensorUnits::PERCENTAGE,
            0,
            0,
        ))
        .build()?;

    let catalog = SdrCatalog::builder()
        .records([inlet_temp, fan_tach, pwm])
        .build()?;

    Ok(Arc::new(catalog))
}
