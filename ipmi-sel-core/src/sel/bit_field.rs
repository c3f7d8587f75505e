//! Sub-fields packed into the event direction/type byte and event data 1.
//!
//! Reference: IPMI 2.0 Specification, Table 29-6 "Event Request Message Event Data Field Contents"

use super::EventDirection;

/// Bit 7 of the event direction/type byte.
pub fn event_dir(event_dir_type: u8) -> EventDirection {
    if (event_dir_type & 0x80) == 0x80 {
        EventDirection::Deassertion
    } else {
        EventDirection::Assertion
    }
}

/// Bits \[6:0\] of the event direction/type byte.
pub fn event_type(event_dir_type: u8) -> u8 {
    event_dir_type & 0x7F
}

/// Bits \[3:0\] of event data 1.
pub fn event_offset(event_data_1: u8) -> u8 {
    event_data_1 & 0x0F
}

/// Bits \[7:6\] of event data 1.
pub fn event_data_2_usage(event_data_1: u8) -> u8 {
    (event_data_1 >> 6) & 0b11
}

/// Bits \[5:4\] of event data 1.
pub fn event_data_3_usage(event_data_1: u8) -> u8 {
    (event_data_1 >> 4) & 0b11
}
