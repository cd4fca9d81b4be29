//! Scoped application of one combination to the host.
//!
//! An [`EnvironmentSession`] holds the process-wide host lock for its whole
//! lifetime. Opening it captures every port, then applies the combination's
//! concrete values in port order. Dropping it restores every capture in
//! reverse order, whether the unit returned normally or unwound.

use std::sync::{Mutex, MutexGuard, PoisonError};

use log::{debug, warn};

use crate::combination::Combination;
use crate::context::{ActiveValue, RunContext};
use crate::error::SessionError;
use crate::host::{HostPort, Snapshot};
use crate::sentinel::DimensionValue;

static HOST_LOCK: Mutex<()> = Mutex::new(());

fn acquire() -> MutexGuard<'static, ()> {
    // A unit that panicked inside a session already had its settings
    // restored by the session's drop, so the protected state is consistent.
    HOST_LOCK.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Runs `f` while holding the host lock.
///
/// Must not be called from inside an open [`EnvironmentSession`] on the same
/// thread; the lock is not re-entrant.
pub fn with_host_lock<R>(f: impl FnOnce() -> R) -> R {
    let _guard = acquire();
    f()
}

/// RAII guard that keeps one combination applied to the host.
///
/// # Examples
///
/// ```
/// use tzshift_common::test_support::FakePort;
/// use tzshift_common::{Cap, Dimension, EnvironmentSession, HostPort, ResolvedDimension, ValueSource, generate};
///
/// let timezone = FakePort::new("timezone", "UTC");
/// let resolved = [ResolvedDimension::new(
///     Dimension::new("timezone", ["Asia/Tokyo"]),
///     ValueSource::Default,
/// )];
/// let plan = generate(&resolved, Cap::UNLIMITED).expect("plan");
/// let ports: [&dyn HostPort; 1] = [&timezone];
///
/// {
///     let session = EnvironmentSession::begin(&ports, &plan.combinations()[0]).expect("apply");
///     assert_eq!(session.context().value("timezone"), Some("Asia/Tokyo"));
///     assert_eq!(timezone.current().as_deref(), Some("Asia/Tokyo"));
/// }
/// assert_eq!(timezone.current().as_deref(), Some("UTC"));
/// ```
pub struct EnvironmentSession<'a> {
    captured: Vec<(&'a dyn HostPort, Snapshot)>,
    context: RunContext,
    _lock: MutexGuard<'static, ()>,
}

impl<'a> EnvironmentSession<'a> {
    /// Captures every port and applies `combination`.
    ///
    /// Dimensions whose value is the current-value sentinel, or which the
    /// combination does not name, are captured and restored but never applied.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::Apply`] when a port rejects its value. Every
    /// port is restored to its capture before the error is returned.
    pub fn begin(
        ports: &[&'a dyn HostPort],
        combination: &Combination,
    ) -> Result<Self, SessionError> {
        let lock = acquire();
        let captured: Vec<(&'a dyn HostPort, Snapshot)> =
            ports.iter().map(|port| (*port, port.capture())).collect();

        for (port, _) in &captured {
            let Some(DimensionValue::Concrete(value)) = combination.value(port.dimension()) else {
                continue;
            };
            if let Err(source) = port.apply(&Snapshot::value(value.as_str())) {
                restore_all(&captured);
                return Err(SessionError::Apply {
                    dimension: port.dimension().to_owned(),
                    value: value.clone(),
                    source,
                });
            }
            debug!(
                target: "tzshift::session",
                "applied {} `{value}` for combination {}",
                port.dimension(),
                combination.id().trim_start(),
            );
        }

        let entries = captured
            .iter()
            .map(|(port, original)| {
                let requested = combination
                    .value(port.dimension())
                    .cloned()
                    .unwrap_or(DimensionValue::Current);
                ActiveValue::new(port.dimension(), requested, original.clone())
            })
            .collect();

        Ok(Self {
            captured,
            context: RunContext::new(combination.index(), combination.id().to_owned(), entries),
            _lock: lock,
        })
    }

    /// The values in force for the running unit.
    #[must_use]
    pub const fn context(&self) -> &RunContext {
        &self.context
    }
}

impl Drop for EnvironmentSession<'_> {
    fn drop(&mut self) {
        if std::thread::panicking() {
            warn!(
                target: "tzshift::session",
                "unit panicked under combination {}; restoring host settings",
                self.context.id().trim_start(),
            );
        }
        restore_all(&self.captured);
    }
}

fn restore_all(captured: &[(&dyn HostPort, Snapshot)]) {
    for (port, original) in captured.iter().rev() {
        port.restore(original);
    }
}
