//! Session-scoped availability probing with deduplicated warnings.

use std::collections::{HashMap, HashSet};

use log::debug;

use crate::diagnostics::{Warning, WarningSink};
use crate::host::{Availability, HostPort};
use crate::session::with_host_lock;

/// Caches probe verdicts and reports each unusable value once.
///
/// One prober corresponds to one test session: verdicts are computed once per
/// distinct `(dimension, value)` pair and the warning for an unusable value is
/// emitted the first time it is seen.
#[derive(Debug, Default)]
pub struct AvailabilityProber {
    verdicts: HashMap<(String, String), Availability>,
    reported: HashSet<(String, String)>,
}

impl AvailabilityProber {
    /// Creates an empty prober.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the verdict for `value` on `port`, probing on first use.
    ///
    /// Unusable values are reported to `sink` once per prober.
    pub fn check(
        &mut self,
        port: &dyn HostPort,
        value: &str,
        sink: &dyn WarningSink,
    ) -> Availability {
        let key = (port.dimension().to_owned(), value.to_owned());
        let verdict = self
            .verdicts
            .entry(key.clone())
            .or_insert_with(|| {
                let verdict = with_host_lock(|| port.probe(value));
                debug!(
                    target: "tzshift::probe",
                    "probed {} `{value}`: usable={}",
                    port.dimension(),
                    verdict.is_usable(),
                );
                verdict
            })
            .clone();

        if !verdict.is_usable() && self.reported.insert(key) {
            sink.warn(&Warning::Unavailable {
                dimension: port.dimension().to_owned(),
                value: value.to_owned(),
                reason: verdict
                    .reason()
                    .unwrap_or("not supported on this host")
                    .to_owned(),
            });
        }

        verdict
    }

    /// Returns the cached verdict without probing.
    #[must_use]
    pub fn cached(&self, dimension: &str, value: &str) -> Option<&Availability> {
        self.verdicts
            .get(&(dimension.to_owned(), value.to_owned()))
    }
}
