//! Descriptive metadata returned alongside every acquired table.

use crate::types::coordinate::LatLon;
use crate::types::date_range::DateRange;
use polars::frame::DataFrame;
use serde::Serialize;
use std::fmt;
use std::path::PathBuf;

/// How the table behind an [`AcquisitionMetadata`] was obtained.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum AcquisitionStatus {
    /// Loaded from an existing cache file; no upstream request was made.
    Cached,
    /// Every yearly chunk was fetched successfully.
    Downloaded,
    /// At least one yearly chunk failed and was skipped.
    PartiallyDownloaded,
}

impl AcquisitionStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            AcquisitionStatus::Cached => "cached",
            AcquisitionStatus::Downloaded => "downloaded",
            AcquisitionStatus::PartiallyDownloaded => "partially-downloaded",
        }
    }
}

impl fmt::Display for AcquisitionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Summary of one acquisition. Built per call and never persisted on its own.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AcquisitionMetadata {
    pub dataset: String,
    pub lat: f64,
    pub lon: f64,
    pub start: String,
    pub end: String,
    pub rows: usize,
    pub columns: Vec<String>,
    pub file_path: PathBuf,
    pub status: AcquisitionStatus,
    /// Years whose upstream chunk failed. Only non-empty for partial downloads.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub skipped_years: Vec<i32>,
}

impl AcquisitionMetadata {
    pub(crate) fn describe(
        dataset: &str,
        coordinate: LatLon,
        range: &DateRange,
        table: &DataFrame,
        file_path: PathBuf,
        status: AcquisitionStatus,
        skipped_years: Vec<i32>,
    ) -> Self {
        Self {
            dataset: dataset.to_string(),
            lat: coordinate.0,
            lon: coordinate.1,
            start: range.start_key(),
            end: range.end_key(),
            rows: table.height(),
            columns: table
                .get_column_names()
                .into_iter()
                .map(|name| name.to_string())
                .collect(),
            file_path,
            status,
            skipped_years,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_serializes_kebab_case() {
        let json = serde_json::to_string(&AcquisitionStatus::PartiallyDownloaded).unwrap();
        assert_eq!(json, "\"partially-downloaded\"");
        assert_eq!(AcquisitionStatus::Cached.to_string(), "cached");
    }
}
