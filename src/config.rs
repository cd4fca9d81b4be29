//! File-layer configuration loaded from `tzshift.toml`.
//!
//! Every key is optional. Absent keys fall through to the built-in defaults
//! when [`crate::Settings::merge`] combines this layer with the command line.
//! List keys follow "linelist" semantics: either a TOML array of strings or a
//! single string holding one value per line.

use camino::{Utf8Path, Utf8PathBuf};
use log::debug;
use serde::{Deserialize, Deserializer};

use crate::error::LoadError;

/// Default configuration file name, resolved against the working directory.
pub const DEFAULT_CONFIG_FILE: &str = "tzshift.toml";

/// Settings read from the configuration file.
#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct TzShiftConfig {
    /// Time-zone identifiers to parametrise over.
    #[serde(deserialize_with = "linelist")]
    pub tz_timezones: Option<Vec<String>>,
    /// Locale identifiers to parametrise over.
    #[serde(deserialize_with = "linelist")]
    pub tz_locales: Option<Vec<String>>,
    /// Maximum combinations per unit; `0` means unlimited.
    pub tzshift_max: Option<i64>,
}

impl TzShiftConfig {
    /// Parses configuration text, attributing errors to `path`.
    ///
    /// # Errors
    ///
    /// Returns [`LoadError::Parse`] for malformed TOML or unknown keys.
    pub fn parse(source: &str, path: &Utf8Path) -> Result<Self, LoadError> {
        toml::from_str(source).map_err(|source| LoadError::Parse {
            path: path.to_owned(),
            source,
        })
    }

    /// Loads configuration from `path`.
    ///
    /// # Errors
    ///
    /// Returns [`LoadError::Read`] when the file cannot be read and
    /// [`LoadError::Parse`] when it is malformed.
    pub fn load(path: &Utf8Path) -> Result<Self, LoadError> {
        Self::load_with(path, |path| std::fs::read_to_string(path))
    }

    /// Loads configuration using the supplied reader.
    ///
    /// This seam lets tests feed configuration text without touching the file
    /// system.
    ///
    /// # Examples
    ///
    /// ```
    /// use camino::Utf8Path;
    /// use tzshift::TzShiftConfig;
    ///
    /// let config = TzShiftConfig::load_with(Utf8Path::new("tzshift.toml"), |_| {
    ///     Ok("tz_locales = [\"C\"]\n".to_owned())
    /// })?;
    /// assert_eq!(config.tz_locales, Some(vec!["C".to_owned()]));
    /// # Ok::<(), tzshift::LoadError>(())
    /// ```
    ///
    /// # Errors
    ///
    /// Propagates reader failures as [`LoadError::Read`] and parse failures as
    /// [`LoadError::Parse`].
    pub fn load_with<F>(path: &Utf8Path, reader: F) -> Result<Self, LoadError>
    where
        F: FnOnce(&Utf8Path) -> std::io::Result<String>,
    {
        let source = reader(path).map_err(|source| LoadError::Read {
            path: path.to_owned(),
            source,
        })?;
        let config = Self::parse(&source, path)?;
        debug!(target: "tzshift::config", "loaded configuration from {path}");
        Ok(config)
    }

    /// Resolves the configuration for a run.
    ///
    /// An explicit `path` must exist. Without one, [`DEFAULT_CONFIG_FILE`] is
    /// read when present and defaults are used otherwise.
    ///
    /// # Errors
    ///
    /// Returns a [`LoadError`] when an explicit file is missing or any file
    /// that is read turns out to be malformed.
    pub fn discover(path: Option<&Utf8Path>) -> Result<Self, LoadError> {
        if let Some(explicit) = path {
            return Self::load(explicit);
        }

        let fallback = Utf8PathBuf::from(DEFAULT_CONFIG_FILE);
        if fallback.is_file() {
            Self::load(&fallback)
        } else {
            debug!(
                target: "tzshift::config",
                "no {DEFAULT_CONFIG_FILE} found; using built-in defaults",
            );
            Ok(Self::default())
        }
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum LineList {
    Text(String),
    Items(Vec<String>),
}

fn linelist<'de, D>(deserializer: D) -> Result<Option<Vec<String>>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = match LineList::deserialize(deserializer)? {
        LineList::Text(text) => text.lines().map(str::to_owned).collect(),
        LineList::Items(items) => items,
    };
    Ok(Some(
        raw.iter()
            .map(|line| line.trim())
            .filter(|line| !line.is_empty())
            .map(str::to_owned)
            .collect(),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn parse(source: &str) -> Result<TzShiftConfig, LoadError> {
        TzShiftConfig::parse(source, Utf8Path::new("tzshift.toml"))
    }

    #[rstest]
    fn empty_file_leaves_every_key_unset() {
        let config = parse("").expect("empty configuration should parse");

        assert_eq!(config, TzShiftConfig::default());
    }

    #[rstest]
    fn arrays_are_trimmed_and_blank_entries_dropped() {
        let config = parse("tz_timezones = [\" UTC \", \"\", \"Asia/Tokyo\"]\n")
            .expect("array configuration should parse");

        assert_eq!(
            config.tz_timezones,
            Some(vec!["UTC".to_owned(), "Asia/Tokyo".to_owned()])
        );
    }

    #[rstest]
    fn multiline_strings_hold_one_value_per_line() {
        let source = "tz_locales = \"\"\"\n  C\n\n  en_US.UTF-8\n\"\"\"\ntzshift_max = 3\n";

        let config = parse(source).expect("linelist configuration should parse");

        assert_eq!(
            config.tz_locales,
            Some(vec!["C".to_owned(), "en_US.UTF-8".to_owned()])
        );
        assert_eq!(config.tzshift_max, Some(3));
    }

    #[rstest]
    #[case::unknown_key("tz_zones = [\"UTC\"]\n")]
    #[case::non_integer_cap("tzshift_max = \"many\"\n")]
    #[case::non_string_entries("tz_locales = [1, 2]\n")]
    fn malformed_files_are_rejected(#[case] source: &str) {
        let error = parse(source).expect_err("configuration should be rejected");

        assert!(matches!(error, LoadError::Parse { .. }));
        assert!(error.to_string().contains("tzshift.toml"));
    }

    #[rstest]
    fn load_with_reports_reader_failures() {
        let outcome = TzShiftConfig::load_with(Utf8Path::new("absent.toml"), |_| {
            Err(std::io::Error::from(std::io::ErrorKind::NotFound))
        });

        assert!(matches!(
            outcome,
            Err(LoadError::Read { ref path, .. }) if path == "absent.toml"
        ));
    }
}
