//! Sensor type names.
//!
//! Reference: IPMI 2.0 Specification, Table 42-3 "Sensor Type Codes"

use super::FormatError;
use crate::Platform;

/// Names of the standard sensor types 0x01 through 0x2C, indexed by sensor type.
/// Entry 0x00 is reserved.
const SENSOR_TYPE_NAMES: [Option<&str>; 0x2D] = [
    None,
    Some("Temperature"),
    Some("Voltage"),
    Some("Current"),
    Some("Fan"),
    Some("Chassis Intrusion"),
    Some("Platform Security"),
    Some("Processor"),
    Some("Power Supply"),
    Some("Power Unit"),
    Some("Cooling Device"),
    Some("Other Units-Based Sensor"),
    Some("Memory"),
    Some("Drive Slot"),
    Some("POST Memory Resize"),
    Some("System Firmware Progress"),
    // 0x10
    Some("Event Logging Disabled"),
    Some("Watchdog 1"),
    Some("System Event"),
    Some("Critical Interrupt"),
    Some("Button / Switch"),
    Some("Module / Board"),
    Some("Microcontroller / Coprocessor"),
    Some("Add-In Card"),
    Some("Chassis"),
    Some("Chip Set"),
    Some("Other FRU"),
    Some("Cable / Interconnect"),
    Some("Terminator"),
    Some("System Boot / Restart Initiated"),
    Some("Boot Error"),
    Some("Base OS Boot / Installation Status"),
    // 0x20
    Some("OS Stop / Shutdown"),
    Some("Slot / Connector"),
    Some("System ACPI Power State"),
    Some("Watchdog 2"),
    Some("Platform Alert"),
    Some("Entity Presence"),
    Some("Monitor ASIC / IC"),
    Some("LAN"),
    Some("Management Subsystem Health"),
    Some("Battery"),
    Some("Session Audit"),
    Some("Version Change"),
    Some("FRU State"),
];

/// Name of a sensor type, consulting `platform` for the OEM range (0xC0-0xFF).
pub fn lookup_sensor_type_name<P>(platform: &P, sensor_type: u8) -> Result<&str, FormatError>
where
    P: Platform + ?Sized,
{
    match sensor_type {
        0xC0..=0xFF => platform
            .oem_sensor_type_name(sensor_type)
            .ok_or(FormatError::UnknownOemSensorType(sensor_type)),
        _ => SENSOR_TYPE_NAMES
            .get(sensor_type as usize)
            .copied()
            .flatten()
            .ok_or(FormatError::ReservedSensorType(sensor_type)),
    }
}
