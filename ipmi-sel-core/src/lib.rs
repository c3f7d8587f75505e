//! ipmi-sel-core: a pure-rust IPMI System Event Log engine.
//!
//! This library decodes and encodes SEL records (in the [`sel`] module), renders them into
//! human-readable event messages, and models the Sensor Data Records that describe the
//! sensors producing those events (in the [`sdr`] module).
//!
//! Platform-specific (OEM) extensions plug into the renderer through the [`Platform`] trait.

/// An offset-indexed name table. `_` marks a reserved offset.
macro_rules ! names {
    (@name _) => {
        None
    };

    (@name $name:literal) => {
        Some($name)
    };

    [$($name:tt),* $(,)?] => {
        &[$(names!(@name $name)),*]
    };
}

pub mod platform;
pub use platform::{DataByte, DefaultPlatform, Platform, ReferencePlatform};

pub mod sdr;

pub mod sel;
