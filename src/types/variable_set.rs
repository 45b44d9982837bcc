//! Ordered, non-empty sets of NASA POWER variable codes.

use crate::catalog::{parameters_for, BASELINE_VARIABLES};
use crate::dataset::error::DatasetError;
use serde::Serialize;
use std::fmt;
use std::str::FromStr;

/// A non-empty, ordered, duplicate-free list of variable codes (e.g. `T2M`, `RH2M`).
///
/// Codes are normalised to upper case. Order is significant: it is the column order
/// of the produced table and part of the cache key.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct VariableSet(Vec<String>);

impl VariableSet {
    /// Builds a set from arbitrary codes, trimming, upper-casing and dropping repeats.
    ///
    /// Codes end up in cache file names, so only `[A-Z0-9_]` is accepted.
    ///
    /// # Errors
    ///
    /// * [`DatasetError::InvalidVariableCode`] for a code with any other character.
    /// * [`DatasetError::EmptyVariableSet`] if no non-blank code remains.
    pub fn new<I, S>(codes: I) -> Result<Self, DatasetError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut normalized: Vec<String> = Vec::new();
        for code in codes {
            let code = code.as_ref().trim().to_ascii_uppercase();
            if code.is_empty() {
                continue;
            }
            if !code.bytes().all(|b| b.is_ascii_alphanumeric() || b == b'_') {
                return Err(DatasetError::InvalidVariableCode(code));
            }
            if !normalized.contains(&code) {
                normalized.push(code);
            }
        }
        if normalized.is_empty() {
            return Err(DatasetError::EmptyVariableSet);
        }
        Ok(Self(normalized))
    }

    /// The baseline set: precipitation, temperature and relative humidity.
    pub fn baseline() -> Self {
        Self(BASELINE_VARIABLES.iter().map(|c| c.to_string()).collect())
    }

    /// The curated set for an activity (aliases allowed), or `None` if unknown.
    pub fn for_activity(activity: &str) -> Option<Self> {
        parameters_for(activity).map(|codes| Self(codes.iter().map(|c| c.to_string()).collect()))
    }

    pub fn codes(&self) -> &[String] {
        &self.0
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }

    /// Codes joined with `separator`, e.g. `PRECTOTCORR,T2M,RH2M` for the upstream query.
    pub fn joined(&self, separator: &str) -> String {
        self.0.join(separator)
    }
}

impl Default for VariableSet {
    fn default() -> Self {
        Self::baseline()
    }
}

impl FromStr for VariableSet {
    type Err = DatasetError;

    /// Parses a comma-separated list such as `"T2M,RH2M"`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s.split(','))
    }
}

impl fmt::Display for VariableSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.joined(","))
    }
}
