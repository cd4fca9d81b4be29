use std::convert::Infallible;
use std::str::FromStr;

fn unquote(input: &str) -> &str {
    input
        .trim()
        .trim_matches(|candidate| matches!(candidate, '"' | '\''))
}

/// A single quoted value supplied by a step.
#[derive(Clone, Debug)]
pub struct StepText(String);

impl FromStr for StepText {
    type Err = Infallible;

    fn from_str(input: &str) -> Result<Self, Self::Err> {
        Ok(Self(unquote(input).to_owned()))
    }
}

impl StepText {
    /// Consumes the step value, yielding the unquoted string.
    pub fn into_inner(self) -> String {
        self.0
    }
}

/// A quoted, comma-separated list supplied by a step.
///
/// Entries are trimmed and kept verbatim otherwise, so `"SYSTEM, system"`
/// yields two entries. An empty quoted string yields an empty list.
#[derive(Clone, Debug)]
pub struct StepList(Vec<String>);

impl FromStr for StepList {
    type Err = Infallible;

    fn from_str(input: &str) -> Result<Self, Self::Err> {
        let inner = unquote(input);
        if inner.is_empty() {
            return Ok(Self(Vec::new()));
        }
        Ok(Self(
            inner.split(',').map(|item| item.trim().to_owned()).collect(),
        ))
    }
}

impl StepList {
    /// Consumes the step value, yielding the list entries.
    pub fn into_inner(self) -> Vec<String> {
        self.0
    }
}
