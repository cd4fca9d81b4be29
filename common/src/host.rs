//! The host environment port: capture, apply, and restore one dimension's
//! process-wide setting.
//!
//! Each dimension implements [`HostPort`] independently. The environment
//! session and the availability prober only talk to this trait, so tests can
//! substitute in-memory fakes for the real time-zone and locale mechanisms.

use crate::error::HostError;

/// A captured or requested host setting.
///
/// `setting` is what the host mechanism stores (`None` meaning "unset", such
/// as an absent `TZ` variable). `label` is the human-readable value reported
/// to running units. Settings captured from the host that are not valid
/// UTF-8 keep their exact bytes for restoration.
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub struct Snapshot {
    setting: Option<String>,
    raw: Option<Vec<u8>>,
    label: String,
}

impl Snapshot {
    /// A snapshot for an explicit setting; the label is the setting itself.
    #[must_use]
    pub fn value(setting: impl Into<String>) -> Self {
        let setting = setting.into();
        Self {
            label: setting.clone(),
            setting: Some(setting),
            raw: None,
        }
    }

    /// A snapshot for a setting read from the host as raw bytes.
    ///
    /// Invalid UTF-8 is replaced in the label and [`Snapshot::setting`], while
    /// [`Snapshot::setting_bytes`] still returns the bytes unchanged.
    #[must_use]
    pub fn from_bytes(bytes: impl Into<Vec<u8>>) -> Self {
        match String::from_utf8(bytes.into()) {
            Ok(setting) => Self::value(setting),
            Err(error) => {
                let bytes = error.into_bytes();
                let label = String::from_utf8_lossy(&bytes).into_owned();
                Self {
                    setting: Some(label.clone()),
                    raw: Some(bytes),
                    label,
                }
            }
        }
    }

    /// A snapshot for an unset mechanism, reported under `label`.
    #[must_use]
    pub fn unset(label: impl Into<String>) -> Self {
        Self {
            setting: None,
            raw: None,
            label: label.into(),
        }
    }

    /// Returns the stored setting, if any.
    #[must_use]
    pub fn setting(&self) -> Option<&str> {
        self.setting.as_deref()
    }

    /// Returns the exact bytes to hand back to the host, if any.
    #[must_use]
    pub fn setting_bytes(&self) -> Option<&[u8]> {
        self.raw
            .as_deref()
            .or_else(|| self.setting.as_deref().map(str::as_bytes))
    }

    /// Returns the value reported to running units.
    #[must_use]
    pub fn label(&self) -> &str {
        &self.label
    }
}

/// Whether applying a dimension actually changes observable behaviour.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum ApplyEffect {
    /// Applying a value takes effect immediately.
    Effective,
    /// The apply step runs but the host cannot honour it on this platform.
    Ineffective {
        /// Why the platform cannot honour the change.
        reason: String,
    },
}

impl ApplyEffect {
    /// The verdict for a value the host accepts under this effect.
    #[must_use]
    pub fn into_availability(self) -> Availability {
        match self {
            Self::Effective => Availability::usable(),
            Self::Ineffective { reason } => Availability::usable_with_note(reason),
        }
    }
}

/// Probe verdict for one concrete dimension value.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Availability {
    usable: bool,
    reason: Option<String>,
}

impl Availability {
    /// The host can honour the value.
    #[must_use]
    pub const fn usable() -> Self {
        Self {
            usable: true,
            reason: None,
        }
    }

    /// The host accepts the value but attaches a caveat.
    #[must_use]
    pub fn usable_with_note(note: impl Into<String>) -> Self {
        Self {
            usable: true,
            reason: Some(note.into()),
        }
    }

    /// The host cannot honour the value.
    #[must_use]
    pub fn unusable(reason: impl Into<String>) -> Self {
        Self {
            usable: false,
            reason: Some(reason.into()),
        }
    }

    /// Whether the value may be applied.
    #[must_use]
    pub const fn is_usable(&self) -> bool {
        self.usable
    }

    /// Human-readable explanation, when one exists.
    #[must_use]
    pub fn reason(&self) -> Option<&str> {
        self.reason.as_deref()
    }
}

/// Capability interface over one dimension's process-global host setting.
///
/// Implementations mutate process-wide state. Callers must hold the host lock
/// (see [`crate::session::with_host_lock`]) around `apply`, `restore`, and
/// any probe that mutates.
pub trait HostPort {
    /// Name of the dimension this port drives.
    fn dimension(&self) -> &str;

    /// Captures the current host setting.
    fn capture(&self) -> Snapshot;

    /// Applies `snapshot` to the host.
    ///
    /// # Errors
    ///
    /// Returns a [`HostError`] when the host rejects the setting.
    fn apply(&self, snapshot: &Snapshot) -> Result<(), HostError>;

    /// Restores a previously captured snapshot. Never fails; implementations
    /// log when the host refuses the original value.
    fn restore(&self, snapshot: &Snapshot);

    /// Determines whether `value` can be applied, leaving the host unchanged.
    ///
    /// The default captures the current setting, attempts the apply, and
    /// restores the capture on both paths. A value the host accepts on a
    /// platform where applying is ineffective is usable with a note.
    fn probe(&self, value: &str) -> Availability {
        let original = self.capture();
        let outcome = self.apply(&Snapshot::value(value));
        self.restore(&original);
        match outcome {
            Ok(()) => self.apply_effect().into_availability(),
            Err(error) => Availability::unusable(error.to_string()),
        }
    }

    /// Whether applying values is effective on this platform.
    fn apply_effect(&self) -> ApplyEffect {
        ApplyEffect::Effective
    }
}

impl<T: HostPort + ?Sized> HostPort for Box<T> {
    fn dimension(&self) -> &str {
        (**self).dimension()
    }

    fn capture(&self) -> Snapshot {
        (**self).capture()
    }

    fn apply(&self, snapshot: &Snapshot) -> Result<(), HostError> {
        (**self).apply(snapshot)
    }

    fn restore(&self, snapshot: &Snapshot) {
        (**self).restore(snapshot);
    }

    fn probe(&self, value: &str) -> Availability {
        (**self).probe(value)
    }

    fn apply_effect(&self) -> ApplyEffect {
        (**self).apply_effect()
    }
}
