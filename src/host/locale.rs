//! Locale host port over `setlocale(LC_ALL, …)`.

use std::ffi::{CStr, CString};

use log::{debug, warn};
use tzshift_common::{HostError, HostPort, Snapshot};

use crate::settings::LOCALE;

/// Locale assumed when the C library reports none.
const C_LOCALE: &str = "C";

/// The process locale mechanism.
#[cfg_attr(test, mockall::automock)]
pub trait LocaleBackend {
    /// The current `LC_ALL` locale string, as the C library reports it.
    fn query(&self) -> Option<Vec<u8>>;

    /// Switches every category to `locale`; `false` when the host refuses.
    fn set(&self, locale: &[u8]) -> bool;
}

/// [`LocaleBackend`] calling the C library.
#[derive(Clone, Copy, Debug, Default)]
pub struct LibcLocale;

impl LocaleBackend for LibcLocale {
    fn query(&self) -> Option<Vec<u8>> {
        // SAFETY: a null locale argument only queries. The returned string is
        // owned by the C library and copied before any further call.
        let current = unsafe { libc::setlocale(libc::LC_ALL, std::ptr::null()) };
        if current.is_null() {
            return None;
        }
        // SAFETY: non-null results of `setlocale` are NUL-terminated.
        let text = unsafe { CStr::from_ptr(current) };
        Some(text.to_bytes().to_vec())
    }

    fn set(&self, locale: &[u8]) -> bool {
        let Ok(requested) = CString::new(locale) else {
            return false;
        };
        // SAFETY: `requested` outlives the call, and callers hold the host
        // lock so no other thread changes the locale concurrently.
        let applied = unsafe { libc::setlocale(libc::LC_ALL, requested.as_ptr()) };
        !applied.is_null()
    }
}

/// [`HostPort`] driving the process locale.
///
/// Probing uses the default capture, apply, and restore cycle, so an
/// installed locale is really switched to and back.
pub struct LocalePort {
    backend: Box<dyn LocaleBackend>,
}

impl LocalePort {
    /// Port backed by the C library.
    #[must_use]
    pub fn system() -> Self {
        Self::with_backend(Box::new(LibcLocale))
    }

    /// Port backed by a custom locale mechanism.
    #[must_use]
    pub fn with_backend(backend: Box<dyn LocaleBackend>) -> Self {
        Self { backend }
    }
}

impl HostPort for LocalePort {
    fn dimension(&self) -> &str {
        LOCALE
    }

    fn capture(&self) -> Snapshot {
        self.backend
            .query()
            .map_or_else(|| Snapshot::value(C_LOCALE), Snapshot::from_bytes)
    }

    fn apply(&self, snapshot: &Snapshot) -> Result<(), HostError> {
        let bytes = snapshot.setting_bytes().unwrap_or(C_LOCALE.as_bytes());
        let value = snapshot.setting().unwrap_or(C_LOCALE);
        if bytes.contains(&0) {
            return Err(HostError::InvalidValue {
                dimension: LOCALE.to_owned(),
                value: value.to_owned(),
            });
        }
        if !self.backend.set(bytes) {
            return Err(HostError::Rejected {
                dimension: LOCALE.to_owned(),
                value: value.to_owned(),
                reason: "locale is not installed on this host".to_owned(),
            });
        }
        debug!(target: "tzshift::host", "locale set to {value}");
        Ok(())
    }

    fn restore(&self, snapshot: &Snapshot) {
        let bytes = snapshot.setting_bytes().unwrap_or(C_LOCALE.as_bytes());
        if !self.backend.set(bytes) {
            warn!(
                target: "tzshift::host",
                "could not restore locale `{}`",
                snapshot.label(),
            );
        }
    }
}
