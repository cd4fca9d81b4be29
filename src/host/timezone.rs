//! Time-zone host port: the `TZ` environment variable plus `tzset`.
//!
//! Zone names are validated against the system time-zone database before
//! they are applied, because the C library silently falls back to UTC for
//! names it does not recognise.

use std::ffi::{OsStr, OsString};

use camino::{Utf8Path, Utf8PathBuf};
use log::{debug, warn};
use tzshift_common::{ApplyEffect, Availability, HostError, HostPort, Snapshot};

use crate::settings::TIMEZONE;

const TZ_VAR: &str = "TZ";
const TZDIR_VAR: &str = "TZDIR";

/// Zones the C library honours without consulting the database.
pub const BUILTIN_ZONES: [&str; 4] = ["UTC", "GMT", "Etc/UTC", "Etc/GMT"];

/// Database directories searched after `$TZDIR`.
const ZONEINFO_DIRS: [&str; 4] = [
    "/usr/share/zoneinfo",
    "/usr/lib/zoneinfo",
    "/usr/share/lib/zoneinfo",
    "/etc/zoneinfo",
];

/// Label reported for an unset `TZ` when the host zone cannot be named.
const LOCALTIME_LABEL: &str = "localtime";

/// Read-only access to the host's time-zone database.
#[cfg_attr(test, mockall::automock)]
pub trait ZoneLookup {
    /// Whether `name` resolves to a zone file.
    fn zone_exists(&self, name: &str) -> bool;

    /// The zone the host uses when `TZ` is unset, if it can be named.
    fn local_zone(&self) -> Option<String>;
}

/// [`ZoneLookup`] over the file system.
#[derive(Clone, Debug)]
pub struct SystemZones {
    dirs: Vec<Utf8PathBuf>,
}

impl SystemZones {
    /// Searches `$TZDIR` first, then the conventional database locations.
    #[must_use]
    pub fn new() -> Self {
        let dirs = std::env::var(TZDIR_VAR)
            .ok()
            .filter(|dir| !dir.trim().is_empty())
            .map(Utf8PathBuf::from)
            .into_iter()
            .chain(ZONEINFO_DIRS.iter().map(Utf8PathBuf::from))
            .collect();
        Self { dirs }
    }

    /// Searches only `dirs`.
    #[must_use]
    pub fn with_dirs(dirs: Vec<Utf8PathBuf>) -> Self {
        Self { dirs }
    }
}

impl Default for SystemZones {
    fn default() -> Self {
        Self::new()
    }
}

impl ZoneLookup for SystemZones {
    fn zone_exists(&self, name: &str) -> bool {
        self.dirs.iter().any(|dir| dir.join(name).is_file())
    }

    fn local_zone(&self) -> Option<String> {
        let from_link = std::fs::read_link("/etc/localtime")
            .ok()
            .and_then(|target| Utf8PathBuf::try_from(target).ok())
            .and_then(|target| zone_from_link(&target));
        from_link.or_else(|| {
            std::fs::read_to_string("/etc/timezone")
                .ok()
                .map(|contents| contents.trim().to_owned())
                .filter(|zone| !zone.is_empty())
        })
    }
}

fn zone_from_link(target: &Utf8Path) -> Option<String> {
    target
        .as_str()
        .split_once("zoneinfo/")
        .map(|(_, zone)| zone.to_owned())
        .filter(|zone| !zone.is_empty())
}

/// Checks that `name` is a zone the host can honour.
///
/// # Errors
///
/// Returns the reason the name is unusable.
pub fn check_zone(name: &str, lookup: &dyn ZoneLookup) -> Result<(), String> {
    if BUILTIN_ZONES.contains(&name) {
        return Ok(());
    }
    if name.trim().is_empty() {
        return Err("empty time-zone name".to_owned());
    }
    if name.starts_with('/') || name.split('/').any(|part| part == "..") {
        return Err("not a time-zone database name".to_owned());
    }
    if lookup.zone_exists(name) {
        Ok(())
    } else {
        Err("not found in the time-zone database".to_owned())
    }
}

/// [`HostPort`] driving the process time zone.
pub struct TimezonePort {
    lookup: Box<dyn ZoneLookup>,
}

impl TimezonePort {
    /// Port backed by the system time-zone database.
    #[must_use]
    pub fn system() -> Self {
        Self::with_lookup(Box::new(SystemZones::new()))
    }

    /// Port backed by a custom zone lookup.
    #[must_use]
    pub fn with_lookup(lookup: Box<dyn ZoneLookup>) -> Self {
        Self { lookup }
    }

    fn write(snapshot: &Snapshot) -> Result<(), HostError> {
        match snapshot.setting_bytes() {
            Some(bytes) if bytes.contains(&0) => Err(HostError::InvalidValue {
                dimension: TIMEZONE.to_owned(),
                value: snapshot.label().to_owned(),
            }),
            Some(bytes) => {
                // SAFETY: callers hold the host lock, which serialises every
                // environment mutation made through the host ports.
                unsafe { std::env::set_var(TZ_VAR, os_value(bytes)) };
                reload_zone();
                Ok(())
            }
            None => {
                // SAFETY: as above.
                unsafe { std::env::remove_var(TZ_VAR) };
                reload_zone();
                Ok(())
            }
        }
    }
}

impl HostPort for TimezonePort {
    fn dimension(&self) -> &str {
        TIMEZONE
    }

    fn capture(&self) -> Snapshot {
        std::env::var_os(TZ_VAR).map_or_else(
            || {
                Snapshot::unset(
                    self.lookup
                        .local_zone()
                        .unwrap_or_else(|| LOCALTIME_LABEL.to_owned()),
                )
            },
            |value| Snapshot::from_bytes(os_bytes(value)),
        )
    }

    fn apply(&self, snapshot: &Snapshot) -> Result<(), HostError> {
        if let Some(value) = snapshot.setting() {
            check_zone(value, self.lookup.as_ref()).map_err(|reason| HostError::Rejected {
                dimension: TIMEZONE.to_owned(),
                value: value.to_owned(),
                reason,
            })?;
        }
        Self::write(snapshot)?;
        debug!(target: "tzshift::host", "TZ set to {}", snapshot.label());
        Ok(())
    }

    fn restore(&self, snapshot: &Snapshot) {
        if let Err(error) = Self::write(snapshot) {
            warn!(target: "tzshift::host", "could not restore time zone: {error}");
        }
    }

    fn probe(&self, value: &str) -> Availability {
        match check_zone(value, self.lookup.as_ref()) {
            Err(reason) => Availability::unusable(reason),
            Ok(()) => match self.apply_effect() {
                ApplyEffect::Effective => Availability::usable(),
                ApplyEffect::Ineffective { reason } => Availability::usable_with_note(reason),
            },
        }
    }

    fn apply_effect(&self) -> ApplyEffect {
        if cfg!(unix) {
            ApplyEffect::Effective
        } else {
            ApplyEffect::Ineffective {
                reason: "this platform cannot reload time-zone state after TZ changes".to_owned(),
            }
        }
    }
}

#[cfg(unix)]
unsafe extern "C" {
    fn tzset();
}

#[cfg(unix)]
fn reload_zone() {
    // SAFETY: `tzset` only reads `TZ` and updates libc's zone globals; the
    // host lock keeps concurrent environment writes out.
    unsafe { tzset() };
}

#[cfg(not(unix))]
fn reload_zone() {}

#[cfg(unix)]
fn os_bytes(value: OsString) -> Vec<u8> {
    use std::os::unix::ffi::OsStringExt;
    value.into_vec()
}

#[cfg(not(unix))]
fn os_bytes(value: OsString) -> Vec<u8> {
    value.to_string_lossy().into_owned().into_bytes()
}

#[cfg(unix)]
fn os_value(bytes: &[u8]) -> &OsStr {
    use std::os::unix::ffi::OsStrExt;
    OsStr::from_bytes(bytes)
}

#[cfg(not(unix))]
fn os_value(bytes: &[u8]) -> OsString {
    OsString::from(String::from_utf8_lossy(bytes).into_owned())
}
