//! Sensor-specific event extension data.
//!
//! Reference: IPMI 2.0 Specification, Table 42-3 "Sensor Type Codes and Data"

use crate::{DataByte, Platform};

const FIRMWARE_ERRORS: &[Option<&str>] = names![
    "unspecified",
    "no system memory is physically installed in the system",
    "no usable system memory",
    "unrecoverable hard-disk / ATAPI / IDE device failure",
    "unrecoverable system-board failure",
    "unrecoverable diskette subsystem failure",
    "unrecoverable hard-disk controller failure",
    "unrecoverable PS/2 or USB keyboard failure",
    "removable boot media not found",
    "unrecoverable video controller failure",
    "no video device detected",
    "firmware (BIOS) ROM corruption detected",
    "CPU voltage mismatch",
    "CPU speed matching failure",
];

const FIRMWARE_PROGRESS: &[Option<&str>] = names![
    "unspecified",
    "memory initialization",
    "hard-disk initialization",
    "secondary processor(s) initialization",
    "user authentication",
    "user-initialized system setup",
    "USB resource configuration",
    "PCI resource configuration",
    "option ROM initialization",
    "video initialization",
    "cache initialization",
    "SM bus initialization",
    "keyboard controller initialization",
    "embedded controller / management controller initialization",
    "docking station attachment",
    "enabling docking station",
    "docking station ejection",
    "disabling docking station",
    "calling operating system wake-up vector",
    "starting operating system boot process",
    "baseboard or motherboard initialization",
    _,
    "floppy initialization",
    "keyboard test",
    "pointing device test",
    "primary processor initialization",
];

const CONFIGURATION_ERRORS: &[&str] = &[
    "vendor mismatch",
    "revision mismatch",
    "processor missing",
    "power supply rating mismatch",
    "voltage rating mismatch",
];

/// PMBus `STATUS_WORD` bits, bit 0 first.
const STATUS_WORD_BITS: [&str; 16] = [
    "none of the above",
    "communication/memory/logic",
    "temperature",
    "vin undervoltage",
    "iout overcurrent",
    "vout overvoltage",
    "unit off",
    "busy",
    "unknown",
    "other",
    "fans",
    "power not good",
    "manufacturer specific",
    "input",
    "iout/pout",
    "vout",
];

/// PEF action bits, bit 0 first.
const PEF_ACTIONS: [&str; 6] = [
    "alert",
    "power off",
    "reset",
    "power cycle",
    "OEM action",
    "diagnostic interrupt",
];

/// Reference: IPMI 2.0 Specification, Table 28-11 "System Restart Cause Values"
const RESTART_CAUSES: &[&str] = &[
    "unknown",
    "chassis control command",
    "reset via pushbutton",
    "power-up via power pushbutton",
    "watchdog expiration",
    "OEM",
    "automatic power-up on AC being applied due to 'always restore' power restore policy",
    "automatic power-up on AC being applied due to 'restore previous power state' power restore policy",
    "reset via PEF",
    "power-cycle via PEF",
    "soft reset",
    "power-up via RTC wakeup",
];

const DEACTIVATION_CAUSES: [&str; 4] = [
    "unspecified cause",
    "close session command",
    "timeout",
    "configuration change",
];

/// Reference: IPMI 2.0 Specification, Table 43-13 "Entity ID Codes"
const ENTITY_NAMES: &[Option<&str>] = names![
    "unspecified",
    "other",
    "unknown",
    "processor",
    "disk or disk bay",
    "peripheral bay",
    "system management module",
    "system board",
    "memory module",
    "processor module",
    "power supply",
    "add-in card",
    "front panel board",
    "back panel board",
    "power system board",
    "drive backplane",
    "system internal expansion board",
    "other system board",
    "processor board",
    "power unit / power domain",
    "power module / DC-to-DC converter",
    "power management / power distribution board",
    "chassis back panel board",
    "system chassis",
    "sub-chassis",
    "other chassis board",
    "disk drive bay",
    "peripheral bay",
    "device bay",
    "fan / cooling device",
    "cooling unit / cooling domain",
    "cable / interconnect",
    "memory device",
    "system management software",
    "system firmware",
    "operating system",
    "system bus",
    "group",
    "remote management communication device",
    "external environment",
    "battery",
    "processing blade",
    "connectivity switch",
    "processor / memory module",
    "I/O module",
    "processor / IO module",
    "management controller firmware",
    "IPMI channel",
    "PCI bus",
    "PCI Express bus",
    "SCSI bus (parallel)",
    "SATA / SAS bus",
    "processor / front-side bus",
    "real time clock",
    _,
    "air inlet",
    _,
    _,
    _,
    _,
    _,
    _,
    _,
    _,
    "air inlet",
    "processor",
    "baseboard",
];

const NOT_IMPLEMENTED: &str = "not yet implemented";

/// Render the sensor-specific extension carried in `byte`, without leading separator.
///
/// `None` means there is no rendering for this combination. An empty phrase means the byte
/// is accounted for by the rendering of the other byte.
pub(crate) fn format<P>(
    platform: &P,
    sensor_type: u8,
    offset: u8,
    byte: DataByte,
    data: [u8; 3],
) -> Option<String>
where
    P: Platform + ?Sized,
{
    let phrase = if sensor_type >= 0xC0 {
        platform.oem_sensor_specific_data(sensor_type, offset, byte, data)
    } else {
        match byte {
            DataByte::Two => data_2(platform, sensor_type, offset, data),
            DataByte::Three => data_3(platform, sensor_type, offset, data),
        }
    };

    if phrase.is_none() {
        #[cfg(feature = "log")]
        log::debug!(
            "No sensor-specific rendering for event data {} (sensor type 0x{:02X}, offset {})",
            byte.number(),
            sensor_type,
            offset
        );
    }

    phrase
}

fn data_2<P>(platform: &P, sensor_type: u8, offset: u8, data: [u8; 3]) -> Option<String>
where
    P: Platform + ?Sized,
{
    let [_, ed2, ed3] = data;

    let phrase = match (sensor_type, offset) {
        (0x05, 0x04) => format!("NIC {}", u16::from(ed2) + 1),
        (0x08, 0x01 | 0x02) => status_word(u16::from_be_bytes([ed2, ed3])),
        (0x0F, 0x00) => lookup(FIRMWARE_ERRORS, ed2)?.to_string(),
        (0x0F, 0x02) => lookup(FIRMWARE_PROGRESS, ed2)?.to_string(),
        (0x10, 0x00) => format!("memory module 0x{ed2:02X}"),
        (0x10, 0x01) => format!("event type 0x{ed2:02X}"),
        (0x10, 0x06) if ed3 & 0x80 != 0 => format!("entity instance {ed2}"),
        (0x10, 0x06) => format!("processor {ed2}"),
        (0x12, 0x04) => pef_actions(ed2),
        (0x12, 0x05) => clock_sync(ed2)?,
        (0x1D, 0x07) => RESTART_CAUSES.get((ed2 & 0x0F) as usize)?.to_string(),
        (0x25, _) => match lookup(ENTITY_NAMES, ed2) {
            Some(name) => format!("entity {name}"),
            None => format!("entity 0x{ed2:02X}"),
        },
        (0x28, 0x05) => {
            let kind = if ed2 & 0x80 != 0 { "logical" } else { "physical" };
            format!(
                "{kind} FRU device, LUN {}, private bus {}",
                (ed2 >> 3) & 0b11,
                ed2 & 0b111
            )
        }
        (0x2A, 0x00 | 0x01 | 0x03) => user(platform, ed2 & 0x3F),
        (0x12, 0x03)
        | (0x19, 0x00)
        | (0x21, 0x09)
        | (0x23, 0x08)
        | (0x28, 0x04)
        | (0x2B, 0x07)
        | (0x2C, 0x07) => NOT_IMPLEMENTED.to_string(),
        _ => return None,
    };

    Some(phrase)
}

fn data_3<P>(platform: &P, sensor_type: u8, offset: u8, data: [u8; 3]) -> Option<String>
where
    P: Platform + ?Sized,
{
    let [_, ed2, ed3] = data;

    let phrase = match (sensor_type, offset) {
        // The status word spans both bytes and is rendered with event data 2.
        (0x08, 0x01 | 0x02) => String::new(),
        (0x08, 0x06) => configuration_errors(ed3)?,
        (0x0C, 0x08) => format!("memory module 0x{ed3:02X}"),
        (0x10, 0x01) if ed3 & 0x20 != 0 => "all events".to_string(),
        (0x10, 0x01) => {
            let direction = if ed3 & 0x10 != 0 {
                "deassertion"
            } else {
                "assertion"
            };
            format!("{direction} event offset {}", ed3 & 0x0F)
        }
        (0x10, 0x05) => format!("{ed3}% full"),
        (0x10, 0x06) if ed3 & 0x80 != 0 => format!("entity ID 0x{:02X}", ed3 & 0x7F),
        (0x10, 0x06) => String::new(),
        (0x1D, 0x07) => channel(platform, ed3 & 0x0F),
        (0x28, 0x05) if ed2 & 0x80 != 0 => format!("FRU device ID 0x{ed3:02X}"),
        (0x28, 0x05) => format!("slave address 0x{ed3:02X}"),
        (0x2A, 0x01) => format!(
            "{}, deactivated by {}",
            channel(platform, ed3 & 0x0F),
            DEACTIVATION_CAUSES[((ed3 >> 4) & 0b11) as usize]
        ),
        (0x2A, 0x00 | 0x03) => channel(platform, ed3 & 0x0F),
        (0x19, 0x00) | (0x21, 0x09) => NOT_IMPLEMENTED.to_string(),
        _ => return None,
    };

    Some(phrase)
}

fn lookup(names: &'static [Option<&'static str>], index: u8) -> Option<&'static str> {
    names.get(index as usize).copied().flatten()
}

fn set_bits<'a>(names: &[&'a str], value: u16) -> Vec<&'a str> {
    names
        .iter()
        .enumerate()
        .filter(|(bit, _)| value & (1 << bit) != 0)
        .map(|(_, name)| *name)
        .collect()
}

fn status_word(word: u16) -> String {
    let bits = set_bits(&STATUS_WORD_BITS, word);

    if bits.is_empty() {
        format!("status word 0x{word:04X}")
    } else {
        format!("status word 0x{word:04X}: {}", bits.join(", "))
    }
}

fn configuration_errors(ed3: u8) -> Option<String> {
    let errors = set_bits(CONFIGURATION_ERRORS, u16::from(ed3));

    if errors.is_empty() {
        None
    } else {
        Some(errors.join(", "))
    }
}

fn pef_actions(ed2: u8) -> String {
    let actions = set_bits(&PEF_ACTIONS, u16::from(ed2));

    if actions.is_empty() {
        "no PEF action".to_string()
    } else {
        format!("PEF actions {}", actions.join(", "))
    }
}

fn clock_sync(ed2: u8) -> Option<String> {
    let clock = match ed2 & 0x0F {
        0x00 => "SEL",
        0x01 => "SDR",
        _ => return None,
    };

    let pair = if ed2 & 0x80 != 0 { "second" } else { "first" };

    Some(format!("{clock} clock, {pair} of pair"))
}

fn user<P: Platform + ?Sized>(platform: &P, user_id: u8) -> String {
    match platform.user_name(user_id) {
        Some(name) => format!("user {name}"),
        None => format!("user ID {user_id}"),
    }
}

fn channel<P: Platform + ?Sized>(platform: &P, channel: u8) -> String {
    match platform.channel_name(channel) {
        Some(name) => format!("channel {name}"),
        None => format!("channel {channel}"),
    }
}
