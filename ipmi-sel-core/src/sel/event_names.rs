//! Event offset names.
//!
//! Reference: IPMI 2.0 Specification, Table 42-2 "Generic Event/Reading Type Codes" and
//! Table 42-3 "Sensor Type Codes and Data"

use super::FormatError;
use crate::Platform;

type NameTable = &'static [&'static [Option<&'static str>]];

/// Names of threshold (0x01) and generic discrete (0x02-0x0C) events, indexed by event type
/// and then by event offset.
const THRESHOLD_OR_GENERIC_EVENT_NAMES: NameTable = &[
    // 0x00 reserved
    names![],
    // 0x01
    names![
        "Lower Non-Critical Going Low",
        "Lower Non-Critical Going High",
        "Lower Critical Going Low",
        "Lower Critical Going High",
        "Lower Non-Recoverable Going Low",
        "Lower Non-Recoverable Going High",
        "Upper Non-Critical Going Low",
        "Upper Non-Critical Going High",
        "Upper Critical Going Low",
        "Upper Critical Going High",
        "Upper Non-Recoverable Going Low",
        "Upper Non-Recoverable Going High",
    ],
    // 0x02
    names![
        "Transition To Idle",
        "Transition To Active",
        "Transition To Busy",
    ],
    // 0x03
    names!["State Deasserted", "State Asserted"],
    // 0x04
    names!["Predictive Failure Deasserted", "Predictive Failure Asserted"],
    // 0x05
    names!["Limit Not Exceeded", "Limit Exceeded"],
    // 0x06
    names!["Performance Met", "Performance Lags"],
    // 0x07
    names![
        "Transition To OK",
        "Transition To Non-Critical From OK",
        "Transition To Critical From Less Severe",
        "Transition To Non-Recoverable From Less Severe",
        "Transition To Non-Critical From More Severe",
        "Transition To Critical From Non-Recoverable",
        "Transition To Non-Recoverable",
        "Monitor",
        "Informational",
    ],
    // 0x08
    names![
        "Device Removed / Device Absent",
        "Device Inserted / Device Present",
    ],
    // 0x09
    names!["Device Disabled", "Device Enabled"],
    // 0x0A
    names![
        "Transition To Running",
        "Transition To In Test",
        "Transition To Power Off",
        "Transition To On Line",
        "Transition To Off Line",
        "Transition To Off Duty",
        "Transition To Degraded",
        "Transition To Power Save",
        "Install Error",
    ],
    // 0x0B
    names![
        "Fully Redundant",
        "Redundancy Lost",
        "Redundancy Degraded",
        "Non-Redundant: Sufficient Resources From Redundant",
        "Non-Redundant: Sufficient Resources From Insufficient Resources",
        "Non-Redundant: Insufficient Resources",
        "Redundancy Degraded From Fully Redundant",
        "Redundancy Degraded From Non-Redundant",
    ],
    // 0x0C
    names![
        "D0 Power State",
        "D1 Power State",
        "D2 Power State",
        "D3 Power State",
    ],
];

/// Names of sensor-specific (0x6F) events, indexed by sensor type and then by event offset.
///
/// Threshold-based sensor types have no sensor-specific events and carry an empty table.
const SENSOR_SPECIFIC_EVENT_NAMES: NameTable = &[
    // 0x00 reserved
    names![],
    // 0x01 - 0x04
    names![],
    names![],
    names![],
    names![],
    // 0x05
    names![
        "General Chassis Intrusion",
        "Drive Bay Intrusion",
        "I/O Card Area Intrusion",
        "Processor Area Intrusion",
        "LAN Leash Lost",
        "Unauthorized Dock",
        "FAN Area Intrusion",
    ],
    // 0x06
    names![
        "Secure Mode Violation Attempt",
        "Pre-Boot Password Violation - User Password",
        "Pre-Boot Password Violation - Setup Password",
        "Pre-Boot Password Violation - Network Boot Password",
        "Other Pre-Boot Password Violation",
        "Out-Of-Band Access Password Violation",
    ],
    // 0x07
    names![
        "IERR",
        "Thermal Trip",
        "FRB1 / BIST Failure",
        "FRB2 / Hang In POST Failure",
        "FRB3 / Processor Startup / Initialization Failure",
        "Configuration Error",
        "SM BIOS Uncorrectable CPU-Complex Error",
        "Processor Presence Detected",
        "Processor Disabled",
        "Terminator Presence Detected",
        "Processor Automatically Throttled",
        "Machine Check Exception",
        "Correctable Machine Check Error",
    ],
    // 0x08
    names![
        "Presence Detected",
        "Power Supply Failure Detected",
        "Predictive Failure",
        "Power Supply Input Lost",
        "Power Supply Input Lost Or Out-Of-Range",
        "Power Supply Input Out-Of-Range, But Present",
        "Configuration Error",
        "Power Supply Inactive",
    ],
    // 0x09
    names![
        "Power Off / Power Down",
        "Power Cycle",
        "240VA Power Down",
        "Interlock Power Down",
        "AC Lost / Power Input Lost",
        "Soft Power Control Failure",
        "Power Unit Failure Detected",
        "Predictive Failure",
    ],
    // 0x0A, 0x0B
    names![],
    names![],
    // 0x0C
    names![
        "Correctable ECC / Other Correctable Memory Error",
        "Uncorrectable ECC / Other Uncorrectable Memory Error",
        "Parity",
        "Memory Scrub Failed",
        "Memory Device Disabled",
        "Correctable ECC / Other Correctable Memory Error Logging Limit Reached",
        "Presence Detected",
        "Configuration Error",
        "Spare",
        "Memory Automatically Throttled",
        "Critical Overtemperature",
    ],
    // 0x0D
    names![
        "Drive Presence",
        "Drive Fault",
        "Predictive Failure",
        "Hot Spare",
        "Consistency Check / Parity Check In Progress",
        "In Critical Array",
        "In Failed Array",
        "Rebuild / Remap In Progress",
        "Rebuild / Remap Aborted",
    ],
    // 0x0E
    names![],
    // 0x0F
    names![
        "System Firmware Error",
        "System Firmware Hang",
        "System Firmware Progress",
    ],
    // 0x10
    names![
        "Correctable Memory Error Logging Disabled",
        "Event Type Logging Disabled",
        "Log Area Reset / Cleared",
        "All Event Logging Disabled",
        "SEL Full",
        "SEL Almost Full",
        "Correctable Machine Check Error Logging Disabled",
    ],
    // 0x11
    names![
        "BIOS Watchdog Reset",
        "OS Watchdog Reset",
        "OS Watchdog Shut Down",
        "OS Watchdog Power Down",
        "OS Watchdog Power Cycle",
        "OS Watchdog NMI / Diagnostic Interrupt",
        "OS Watchdog Expired, Status Only",
        "OS Watchdog Pre-Timeout Interrupt, Non-NMI",
    ],
    // 0x12
    names![
        "System Reconfigured",
        "OEM System Boot Event",
        "Undetermined System Hardware Failure",
        "Entry Added To Auxiliary Log",
        "PEF Action",
        "Timestamp Clock Synchronization",
    ],
    // 0x13
    names![
        "Front Panel NMI / Diagnostic Interrupt",
        "Bus Timeout",
        "I/O Channel Check NMI",
        "Software NMI",
        "PCI PERR",
        "PCI SERR",
        "EISA Fail Safe Timeout",
        "Bus Correctable Error",
        "Bus Uncorrectable Error",
        "Fatal NMI",
        "Bus Fatal Error",
        "Bus Degraded",
    ],
    // 0x14
    names![
        "Power Button Pressed",
        "Sleep Button Pressed",
        "Reset Button Pressed",
        "FRU Latch Open",
        "FRU Service Request Button",
    ],
    // 0x15 - 0x18
    names![],
    names![],
    names![],
    names![],
    // 0x19
    names!["Soft Power Control Failure", "Thermal Trip"],
    // 0x1A
    names![],
    // 0x1B
    names!["Cable / Interconnect Is Connected", "Configuration Error"],
    // 0x1C
    names![],
    // 0x1D
    names![
        "Initiated By Power Up",
        "Initiated By Hard Reset",
        "Initiated By Warm Reset",
        "User Requested PXE Boot",
        "Automatic Boot To Diagnostic",
        "OS / Runtime Software Initiated Hard Reset",
        "OS / Runtime Software Initiated Warm Reset",
        "System Restart",
    ],
    // 0x1E
    names![
        "No Bootable Media",
        "Non-Bootable Diskette Left In Drive",
        "PXE Server Not Found",
        "Invalid Boot Sector",
        "Timeout Waiting For User Selection Of Boot Source",
    ],
    // 0x1F
    names![
        "A: Boot Completed",
        "C: Boot Completed",
        "PXE Boot Completed",
        "Diagnostic Boot Completed",
        "CD-ROM Boot Completed",
        "ROM Boot Completed",
        "Boot Completed",
        "Base OS / Hypervisor Installation Started",
        "Base OS / Hypervisor Installation Completed",
        "Base OS / Hypervisor Installation Aborted",
        "Base OS / Hypervisor Installation Failed",
    ],
    // 0x20
    names![
        "Critical Stop During OS Load / Initialization",
        "Runtime Critical Stop",
        "OS Graceful Stop",
        "OS Graceful Shutdown",
        "Soft Shutdown Initiated By PEF",
        "Agent Not Responding",
    ],
    // 0x21
    names![
        "Fault Status Asserted",
        "Identify Status Asserted",
        "Slot / Connector Device Installed / Attached",
        "Slot / Connector Ready For Device Installation",
        "Slot / Connector Ready For Device Removal",
        "Slot Power Is Off",
        "Slot / Connector Device Removal Request",
        "Interlock Asserted",
        "Slot Is Disabled",
        "Slot Holds Spare Device",
    ],
    // 0x22
    names![
        "S0 / G0",
        "S1",
        "S2",
        "S3",
        "S4",
        "S5 / G2",
        "S4 / S5",
        "G3 / Mechanical Off",
        "Sleeping In An S1, S2, Or S3 States",
        "G1 Sleeping",
        "S5 Entered By Override",
        "Legacy On State",
        "Legacy Off State",
        _,
        _,
        "Unknown",
    ],
    // 0x23
    names![
        "Time Expired",
        "Hard Reset",
        "Power Down",
        "Power Cycle",
        _,
        _,
        _,
        _,
        "Timer Interrupt",
    ],
    // 0x24
    names![
        "Platform Generated Page",
        "Platform Generated LAN Alert",
        "Platform Event Trap Generated",
        "Platform Generated SNMP Trap",
    ],
    // 0x25
    names!["Entity Present", "Entity Absent", "Entity Disabled"],
    // 0x26
    names![],
    // 0x27
    names!["LAN Heartbeat Lost", "LAN Heartbeat"],
    // 0x28
    names![
        "Sensor Access Degraded Or Unavailable",
        "Controller Access Degraded Or Unavailable",
        "Management Controller Offline",
        "Management Controller Unavailable",
        "Sensor Failure",
        "FRU Failure",
    ],
    // 0x29
    names!["Battery Low", "Battery Failed", "Battery Presence Detected"],
    // 0x2A
    names![
        "Session Activated",
        "Session Deactivated",
        "Invalid Username Or Password",
        "Invalid Password Disable",
    ],
    // 0x2B
    names![
        "Hardware Change Detected With Associated Entity",
        "Firmware Or Software Change Detected With Associated Entity",
        "Hardware Incompatibility Detected With Associated Entity",
        "Firmware Or Software Incompatibility Detected With Associated Entity",
        "Entity Is Of An Invalid Or Unsupported Hardware Version",
        "Entity Contains An Invalid Or Unsupported Firmware Or Software Version",
        "Hardware Change Detected With Associated Entity Was Successful",
        "Software Or Firmware Change Detected With Associated Entity Was Successful",
    ],
    // 0x2C
    names![
        "FRU Not Installed",
        "FRU Inactive",
        "FRU Activation Requested",
        "FRU Activation In Progress",
        "FRU Active",
        "FRU Deactivation Requested",
        "FRU Deactivation In Progress",
        "FRU Communication Lost",
    ],
];

/// The class of an event/reading type code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventTypeClass {
    /// 0x00 and 0x0D-0x6E
    Reserved,
    /// 0x01
    Threshold,
    /// 0x02-0x0C
    GenericDiscrete,
    /// 0x6F
    SensorSpecific,
    /// 0x70-0x7F
    Oem,
    /// Anything above 0x7F, which cannot be encoded in 7 bits.
    Invalid,
}

impl From<u8> for EventTypeClass {
    fn from(value: u8) -> Self {
        match value {
            0x00 | 0x0D..=0x6E => Self::Reserved,
            0x01 => Self::Threshold,
            0x02..=0x0C => Self::GenericDiscrete,
            0x6F => Self::SensorSpecific,
            0x70..=0x7F => Self::Oem,
            _ => Self::Invalid,
        }
    }
}

/// Name of the event at `offset` for the given sensor type and event type.
pub fn lookup_event_name<P>(
    platform: &P,
    sensor_type: u8,
    event_type: u8,
    offset: u8,
) -> Result<&str, FormatError>
where
    P: Platform + ?Sized,
{
    let names: &[Option<&str>] = match EventTypeClass::from(event_type) {
        EventTypeClass::Reserved => return Err(FormatError::ReservedEventType(event_type)),
        EventTypeClass::Invalid => return Err(FormatError::InvalidEventType(event_type)),
        EventTypeClass::Threshold | EventTypeClass::GenericDiscrete => {
            THRESHOLD_OR_GENERIC_EVENT_NAMES[event_type as usize]
        }
        EventTypeClass::SensorSpecific => match sensor_type {
            0x00..=0x2C => SENSOR_SPECIFIC_EVENT_NAMES[sensor_type as usize],
            0x2D..=0xBF => return Err(FormatError::ReservedSensorType(sensor_type)),
            0xC0..=0xFF => platform.oem_sensor_specific_names(sensor_type),
        },
        EventTypeClass::Oem => platform.oem_event_names(event_type),
    };

    if names.is_empty() {
        return Err(FormatError::UnpopulatedTable {
            event_type,
            sensor_type,
        });
    }

    match names.get(offset as usize) {
        Some(&Some(name)) => Ok(name),
        Some(None) => Err(FormatError::ReservedOffset {
            event_type,
            sensor_type,
            offset,
        }),
        None => Err(FormatError::InvalidOffset {
            event_type,
            sensor_type,
            offset,
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{DefaultPlatform, ReferencePlatform};

    #[test]
    fn test_table_shapes() {
        assert_eq!(THRESHOLD_OR_GENERIC_EVENT_NAMES.len(), 0x0D);
        assert_eq!(SENSOR_SPECIFIC_EVENT_NAMES.len(), 0x2D);

        for table in THRESHOLD_OR_GENERIC_EVENT_NAMES
            .iter()
            .chain(SENSOR_SPECIFIC_EVENT_NAMES.iter())
        {
            assert!(table.len() <= 16);
        }
    }

    #[test]
    fn test_reserved_event_types() {
        let platform = DefaultPlatform;

        for offset in 0..16 {
            for sensor_type in [0x00, 0x02, 0x2A, 0xC0] {
                assert_eq!(
                    lookup_event_name(&platform, sensor_type, 0x00, offset),
                    Err(FormatError::ReservedEventType(0x00))
                );
                assert_eq!(
                    lookup_event_name(&platform, sensor_type, 0x0D, offset),
                    Err(FormatError::ReservedEventType(0x0D))
                );
                assert_eq!(
                    lookup_event_name(&platform, sensor_type, 0x6E, offset),
                    Err(FormatError::ReservedEventType(0x6E))
                );
            }
        }

        assert_eq!(
            lookup_event_name(&platform, 0x02, 0x80, 0),
            Err(FormatError::InvalidEventType(0x80))
        );
    }

    #[test]
    fn test_threshold_names() {
        let platform = DefaultPlatform;

        assert_eq!(
            lookup_event_name(&platform, 0x02, 0x01, 0x09),
            Ok("Upper Critical Going High")
        );
        assert_eq!(
            lookup_event_name(&platform, 0x04, 0x01, 0x02),
            Ok("Lower Critical Going Low")
        );
        assert_eq!(
            lookup_event_name(&platform, 0x04, 0x01, 0x0C),
            Err(FormatError::InvalidOffset {
                event_type: 0x01,
                sensor_type: 0x04,
                offset: 0x0C,
            })
        );
    }

    #[test]
    fn test_generic_names() {
        let platform = DefaultPlatform;

        assert_eq!(
            lookup_event_name(&platform, 0xC0, 0x03, 0x01),
            Ok("State Asserted")
        );
        assert_eq!(
            lookup_event_name(&platform, 0x0D, 0x0B, 0x01),
            Ok("Redundancy Lost")
        );
    }

    #[test]
    fn test_sensor_specific_names() {
        let platform = DefaultPlatform;

        assert_eq!(
            lookup_event_name(&platform, 0x08, 0x6F, 0x06),
            Ok("Configuration Error")
        );
        assert_eq!(
            lookup_event_name(&platform, 0x22, 0x6F, 0x0F),
            Ok("Unknown")
        );
        assert_eq!(
            lookup_event_name(&platform, 0x22, 0x6F, 0x0D),
            Err(FormatError::ReservedOffset {
                event_type: 0x6F,
                sensor_type: 0x22,
                offset: 0x0D,
            })
        );
        assert_eq!(
            lookup_event_name(&platform, 0x23, 0x6F, 0x08),
            Ok("Timer Interrupt")
        );
        assert_eq!(
            lookup_event_name(&platform, 0x01, 0x6F, 0x00),
            Err(FormatError::UnpopulatedTable {
                event_type: 0x6F,
                sensor_type: 0x01,
            })
        );
        assert_eq!(
            lookup_event_name(&platform, 0x40, 0x6F, 0x00),
            Err(FormatError::ReservedSensorType(0x40))
        );
    }

    #[test]
    fn test_oem_names() {
        let platform = DefaultPlatform;

        assert_eq!(
            lookup_event_name(&platform, 0x28, 0x70, 0x06),
            Err(FormatError::UnpopulatedTable {
                event_type: 0x70,
                sensor_type: 0x28,
            })
        );
        assert_eq!(
            lookup_event_name(&platform, 0xC0, 0x6F, 0x00),
            Err(FormatError::UnpopulatedTable {
                event_type: 0x6F,
                sensor_type: 0xC0,
            })
        );

        let platform = ReferencePlatform::new();

        assert_eq!(
            lookup_event_name(&platform, 0x28, 0x70, 0x06),
            Ok("Memory Utilization High")
        );
        assert_eq!(
            lookup_event_name(&platform, 0x12, 0x71, 0x01),
            Ok("NTP Synchronization Lost")
        );
        assert_eq!(
            lookup_event_name(&platform, 0xC0, 0x6F, 0x01),
            Ok("Thermal Throttle")
        );
        assert_eq!(
            lookup_event_name(&platform, 0x28, 0x70, 0x0A),
            Err(FormatError::InvalidOffset {
                event_type: 0x70,
                sensor_type: 0x28,
                offset: 0x0A,
            })
        );
    }

    #[test]
    fn test_event_type_class() {
        assert_eq!(EventTypeClass::from(0x00), EventTypeClass::Reserved);
        assert_eq!(EventTypeClass::from(0x01), EventTypeClass::Threshold);
        assert_eq!(EventTypeClass::from(0x0C), EventTypeClass::GenericDiscrete);
        assert_eq!(EventTypeClass::from(0x0D), EventTypeClass::Reserved);
        assert_eq!(EventTypeClass::from(0x6F), EventTypeClass::SensorSpecific);
        assert_eq!(EventTypeClass::from(0x7F), EventTypeClass::Oem);
        assert_eq!(EventTypeClass::from(0xFF), EventTypeClass::Invalid);
    }
}
