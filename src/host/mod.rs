//! Concrete host ports for the time-zone and locale dimensions.

pub mod locale;
pub mod timezone;

pub use locale::{LibcLocale, LocaleBackend, LocalePort};
pub use timezone::{BUILTIN_ZONES, SystemZones, TimezonePort, ZoneLookup, check_zone};

use tzshift_common::HostPort;

/// The ports driving this process, in application order.
#[must_use]
pub fn system_ports() -> Vec<Box<dyn HostPort>> {
    vec![
        Box::new(TimezonePort::system()),
        Box::new(LocalePort::system()),
    ]
}
