//! Effective settings: command line over configuration file over defaults.

use log::debug;
use tzshift_common::{Cap, ConfigError, Dimension, dedup_preserving_order};

use crate::cli::{TzShiftArgs, split_csv};
use crate::config::TzShiftConfig;

/// Name of the time-zone dimension.
pub const TIMEZONE: &str = "timezone";

/// Name of the locale dimension.
pub const LOCALE: &str = "locale";

/// Time zones used when neither the file nor the command line names any.
pub const DEFAULT_TIMEZONES: [&str; 6] = [
    "UTC",
    "America/New_York",
    "Europe/London",
    "Asia/Kolkata",
    "Australia/Sydney",
    "Asia/Tokyo",
];

/// Locales used when neither the file nor the command line names any.
pub const DEFAULT_LOCALES: [&str; 5] = [
    "C",
    "en_US.UTF-8",
    "de_DE.UTF-8",
    "fr_FR.UTF-8",
    "ja_JP.UTF-8",
];

/// Merged global defaults handed to the engine.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Settings {
    timezones: Vec<String>,
    locales: Vec<String>,
    cap: Cap,
    disabled: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            timezones: DEFAULT_TIMEZONES.map(str::to_owned).to_vec(),
            locales: DEFAULT_LOCALES.map(str::to_owned).to_vec(),
            cap: Cap::UNLIMITED,
            disabled: false,
        }
    }
}

impl Settings {
    /// Merges the file and command-line layers over the defaults.
    ///
    /// For each key the command-line value wins when given, then the file
    /// value, then the default. Value lists are deduplicated keeping the first
    /// occurrence.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidCap`] or [`ConfigError::NegativeCap`]
    /// when the cap is malformed.
    ///
    /// # Examples
    ///
    /// ```
    /// use tzshift::{Settings, TzShiftArgs, TzShiftConfig};
    ///
    /// let file = TzShiftConfig {
    ///     tz_timezones: Some(vec!["UTC".into(), "Asia/Tokyo".into()]),
    ///     ..TzShiftConfig::default()
    /// };
    /// let cli = TzShiftArgs {
    ///     timezones: Some("Europe/Paris, Europe/Paris".into()),
    ///     ..TzShiftArgs::default()
    /// };
    ///
    /// let settings = Settings::merge(&file, &cli)?;
    /// assert_eq!(settings.timezones(), ["Europe/Paris"]);
    /// # Ok::<(), tzshift_common::ConfigError>(())
    /// ```
    pub fn merge(file: &TzShiftConfig, cli: &TzShiftArgs) -> Result<Self, ConfigError> {
        let defaults = Self::default();
        let timezones = pick_list(
            cli.timezones.as_deref(),
            file.tz_timezones.as_ref(),
            defaults.timezones,
        );
        let locales = pick_list(
            cli.locales.as_deref(),
            file.tz_locales.as_ref(),
            defaults.locales,
        );
        let cap = match (cli.max.as_deref(), file.tzshift_max) {
            (Some(raw), _) => raw.parse()?,
            (None, Some(value)) => Cap::try_from(value)?,
            (None, None) => defaults.cap,
        };

        debug!(
            target: "tzshift::config",
            "effective settings: {} timezones, {} locales, cap {cap}, disabled={}",
            timezones.len(),
            locales.len(),
            cli.disabled,
        );

        Ok(Self {
            timezones,
            locales,
            cap,
            disabled: cli.disabled,
        })
    }

    /// Replaces the time-zone list.
    #[must_use]
    pub fn with_timezones<I, S>(mut self, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.timezones = dedup_preserving_order(values.into_iter().map(Into::into));
        self
    }

    /// Replaces the locale list.
    #[must_use]
    pub fn with_locales<I, S>(mut self, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.locales = dedup_preserving_order(values.into_iter().map(Into::into));
        self
    }

    /// Replaces the cap.
    #[must_use]
    pub const fn with_cap(mut self, cap: Cap) -> Self {
        self.cap = cap;
        self
    }

    /// Sets the session-wide disable switch.
    #[must_use]
    pub const fn with_disabled(mut self, disabled: bool) -> Self {
        self.disabled = disabled;
        self
    }

    /// Effective time-zone list.
    #[must_use]
    pub fn timezones(&self) -> &[String] {
        &self.timezones
    }

    /// Effective locale list.
    #[must_use]
    pub fn locales(&self) -> &[String] {
        &self.locales
    }

    /// Effective cap.
    #[must_use]
    pub const fn cap(&self) -> Cap {
        self.cap
    }

    /// Whether parametrisation is disabled session-wide.
    #[must_use]
    pub const fn is_disabled(&self) -> bool {
        self.disabled
    }

    /// The configured dimensions in application order: time zone, then locale.
    #[must_use]
    pub fn dimensions(&self) -> Vec<Dimension> {
        vec![
            Dimension::new(TIMEZONE, self.timezones.iter().cloned()),
            Dimension::new(LOCALE, self.locales.iter().cloned()),
        ]
    }
}

fn pick_list(cli: Option<&str>, file: Option<&Vec<String>>, default: Vec<String>) -> Vec<String> {
    let values = match (cli, file) {
        (Some(raw), _) => split_csv(raw),
        (None, Some(values)) => values.clone(),
        (None, None) => default,
    };
    dedup_preserving_order(values)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    fn defaults_apply_when_both_layers_are_silent() {
        let settings = Settings::merge(&TzShiftConfig::default(), &TzShiftArgs::default())
            .expect("defaults should merge");

        assert_eq!(settings.timezones(), DEFAULT_TIMEZONES);
        assert_eq!(settings.locales(), DEFAULT_LOCALES);
        assert_eq!(settings.cap(), Cap::UNLIMITED);
        assert!(!settings.is_disabled());
    }

    #[rstest]
    fn file_values_override_defaults_per_key() {
        let file = TzShiftConfig {
            tz_locales: Some(vec!["C".to_owned(), "C".to_owned(), "ja_JP.UTF-8".to_owned()]),
            tzshift_max: Some(4),
            ..TzShiftConfig::default()
        };

        let settings = Settings::merge(&file, &TzShiftArgs::default()).expect("file should merge");

        assert_eq!(settings.timezones(), DEFAULT_TIMEZONES);
        assert_eq!(settings.locales(), ["C", "ja_JP.UTF-8"]);
        assert_eq!(settings.cap(), Cap::new(4));
    }

    #[rstest]
    fn command_line_overrides_the_file() {
        let file = TzShiftConfig {
            tz_timezones: Some(vec!["Asia/Tokyo".to_owned()]),
            tzshift_max: Some(4),
            ..TzShiftConfig::default()
        };
        let cli = TzShiftArgs {
            timezones: Some("UTC, SYSTEM ,UTC".to_owned()),
            max: Some(" 0 ".to_owned()),
            disabled: true,
            ..TzShiftArgs::default()
        };

        let settings = Settings::merge(&file, &cli).expect("layers should merge");

        assert_eq!(settings.timezones(), ["UTC", "SYSTEM"]);
        assert_eq!(settings.cap(), Cap::UNLIMITED);
        assert!(settings.is_disabled());
    }

    #[rstest]
    #[case::cli_text(None, Some("ten"), ConfigError::InvalidCap { raw: "ten".to_owned() })]
    #[case::cli_negative(None, Some("-2"), ConfigError::NegativeCap { value: -2 })]
    #[case::file_negative(Some(-1), None, ConfigError::NegativeCap { value: -1 })]
    fn malformed_caps_are_configuration_errors(
        #[case] file_cap: Option<i64>,
        #[case] cli_cap: Option<&str>,
        #[case] expected: ConfigError,
    ) {
        let file = TzShiftConfig {
            tzshift_max: file_cap,
            ..TzShiftConfig::default()
        };
        let cli = TzShiftArgs {
            max: cli_cap.map(str::to_owned),
            ..TzShiftArgs::default()
        };

        assert_eq!(Settings::merge(&file, &cli), Err(expected));
    }

    #[rstest]
    fn dimensions_keep_timezone_first() {
        let dimensions = Settings::default()
            .with_timezones(["UTC"])
            .with_locales(["C"])
            .dimensions();

        let names: Vec<&str> = dimensions.iter().map(Dimension::name).collect();
        assert_eq!(names, [TIMEZONE, LOCALE]);
    }
}
