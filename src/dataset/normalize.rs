//! Turns raw provider payloads into tables with a fixed, predictable schema.
//!
//! Every table leaving this module has the key columns `YEAR`, `MO`, `DY` (Int64)
//! followed by the requested variables that were actually present (Float64), in
//! request order. Rows in which every cell is empty are dropped.

use crate::dataset::error::ChunkError;
use crate::types::variable_set::VariableSet;
use polars::prelude::*;
use std::io::Cursor;

pub const KEY_COLUMNS: [&str; 3] = ["YEAR", "MO", "DY"];

/// Line that closes the descriptive header NASA POWER puts in front of its CSV.
pub const POWER_HEADER_END: &str = "-END HEADER-";

/// How to find where the provider's descriptive preamble ends and the table begins.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Preamble {
    /// The payload starts with the header row.
    None,
    /// Skip exactly this many lines.
    Lines(usize),
    /// Skip everything up to and including the first line equal to the marker.
    /// Payloads without the marker are parsed from their first line.
    UntilMarker(String),
}

impl Default for Preamble {
    fn default() -> Self {
        Preamble::UntilMarker(POWER_HEADER_END.to_string())
    }
}

impl Preamble {
    pub fn strip<'a>(&self, payload: &'a str) -> &'a str {
        match self {
            Preamble::None => payload,
            Preamble::Lines(count) => skip_lines(payload, *count),
            Preamble::UntilMarker(marker) => {
                let mut offset = 0;
                for line in payload.split_inclusive('\n') {
                    offset += line.len();
                    if line.trim() == marker {
                        return &payload[offset..];
                    }
                }
                payload
            }
        }
    }
}

fn skip_lines(payload: &str, count: usize) -> &str {
    let mut rest = payload;
    for _ in 0..count {
        match rest.find('\n') {
            Some(index) => rest = &rest[index + 1..],
            None => return "",
        }
    }
    rest
}

/// Parses one yearly payload into a normalised table.
///
/// # Errors
///
/// * [`ChunkError::Schema`] when the body is empty, a key column is missing, or none of
///   the requested variables is present.
/// * [`ChunkError::Parse`] when the body is not parseable CSV.
/// * [`ChunkError::Empty`] when no row survives empty-row removal.
pub fn parse_chunk(
    payload: &str,
    preamble: &Preamble,
    year: i32,
    variables: &VariableSet,
) -> Result<DataFrame, ChunkError> {
    let body = preamble.strip(payload).trim();
    if body.is_empty() {
        return Err(ChunkError::Schema {
            year,
            message: "payload has no tabular body".to_string(),
        });
    }

    let raw = CsvReadOptions::default()
        .with_has_header(true)
        .into_reader_with_file_handle(Cursor::new(body.as_bytes().to_vec()))
        .finish()
        .map_err(|source| ChunkError::Parse { year, source })?;

    let missing_keys: Vec<&str> = KEY_COLUMNS
        .iter()
        .copied()
        .filter(|key| !has_column(&raw, key))
        .collect();
    if !missing_keys.is_empty() {
        return Err(ChunkError::Schema {
            year,
            message: format!("missing key column(s) {}", missing_keys.join(", ")),
        });
    }

    let present = present_variables(std::slice::from_ref(&raw), variables);
    if present.is_empty() {
        return Err(ChunkError::Schema {
            year,
            message: format!("none of the requested variables ({variables}) in payload"),
        });
    }

    let all_columns: Vec<String> = raw
        .get_column_names()
        .into_iter()
        .map(|name| name.to_string())
        .collect();

    let table = conform(raw.lazy().filter(any_value_present(&all_columns)), &present)
        .collect()
        .map_err(|source| ChunkError::Parse { year, source })?;

    if table.height() == 0 {
        return Err(ChunkError::Empty { year });
    }
    Ok(table)
}

/// Concatenates per-year tables in the given order and restricts the result to the
/// key columns plus the requested variables present in at least one table.
pub fn assemble(tables: Vec<DataFrame>, variables: &VariableSet) -> PolarsResult<DataFrame> {
    let present = present_variables(&tables, variables);
    let frames: Vec<LazyFrame> = tables.into_iter().map(|table| table.lazy()).collect();
    let combined = concat_lf_diagonal(frames, UnionArgs::default())?;
    conform(combined, &present).collect()
}

/// Re-applies column types to a table read back from a cache file, keeping its column order.
pub fn coerce_cached(table: DataFrame) -> PolarsResult<DataFrame> {
    let exprs: Vec<Expr> = table
        .get_column_names()
        .into_iter()
        .map(|name| {
            let dtype = if KEY_COLUMNS.contains(&name.as_str()) {
                DataType::Int64
            } else {
                DataType::Float64
            };
            col(name.as_str()).cast(dtype)
        })
        .collect();
    table.lazy().select(exprs).collect()
}

fn has_column(table: &DataFrame, name: &str) -> bool {
    table.get_column_index(name).is_some()
}

fn present_variables(tables: &[DataFrame], variables: &VariableSet) -> Vec<String> {
    variables
        .iter()
        .filter(|code| !KEY_COLUMNS.contains(code))
        .filter(|code| tables.iter().any(|table| has_column(table, code)))
        .map(str::to_string)
        .collect()
}

fn any_value_present(columns: &[String]) -> Expr {
    columns.iter().fold(lit(false), |acc, name| {
        acc.or(col(name.as_str()).is_not_null())
    })
}

fn conform(frame: LazyFrame, variables: &[String]) -> LazyFrame {
    let mut exprs: Vec<Expr> = KEY_COLUMNS
        .iter()
        .map(|key| col(*key).cast(DataType::Int64))
        .collect();
    exprs.extend(
        variables
            .iter()
            .map(|code| col(code.as_str()).cast(DataType::Float64)),
    );
    frame.select(exprs)
}

#[cfg(test)]
mod tests {
    use super::*;

    const POWER_PAYLOAD: &str = "-BEGIN HEADER-
NASA/POWER CERES/MERRA2 Native Resolution Daily Data
Dates (month/day/year): 01/01/2025 through 12/31/2025
Location: Latitude  28.5383   Longitude -81.3792
Elevation from MERRA-2: Average for 0.5 x 0.625 degree lat/lon region = 27.03 meters
The value for missing source data that cannot be computed or is outside of the sources availability range: -999
Parameter(s):
T2M             MERRA-2 Temperature at 2 Meters (C)
RH2M            MERRA-2 Relative Humidity at 2 Meters (%)
-END HEADER-
YEAR,MO,DY,T2M,RH2M
2025,1,1,25.0,80.1
2025,1,2,24.5,-999
";

    fn vars(s: &str) -> VariableSet {
        s.parse().unwrap()
    }

    fn column_names(table: &DataFrame) -> Vec<String> {
        table
            .get_column_names()
            .into_iter()
            .map(|n| n.to_string())
            .collect()
    }

    #[test]
    fn test_marker_preamble_is_skipped() {
        let table = parse_chunk(
            POWER_PAYLOAD,
            &Preamble::default(),
            2025,
            &vars("PRECTOTCORR,T2M,RH2M"),
        )
        .unwrap();
        assert_eq!(table.height(), 2);
        assert_eq!(column_names(&table), ["YEAR", "MO", "DY", "T2M", "RH2M"]);
        // The provider's missing-value sentinel is kept as a value.
        let rh = table.column("RH2M").unwrap().f64().unwrap();
        assert_eq!(rh.get(1), Some(-999.0));
    }

    #[test]
    fn test_fixed_line_preamble_is_skipped() {
        let table =
            parse_chunk(POWER_PAYLOAD, &Preamble::Lines(10), 2025, &vars("T2M")).unwrap();
        assert_eq!(table.height(), 2);
        assert_eq!(column_names(&table), ["YEAR", "MO", "DY", "T2M"]);
    }

    #[test]
    fn test_payload_without_marker_parses_from_first_line() {
        let payload = "YEAR,MO,DY,T2M\n2025,1,1,25.0\n";
        let table = parse_chunk(payload, &Preamble::default(), 2025, &vars("T2M")).unwrap();
        assert_eq!(table.height(), 1);
        assert_eq!(table.column("YEAR").unwrap().dtype(), &DataType::Int64);
        assert_eq!(table.column("T2M").unwrap().dtype(), &DataType::Float64);
    }

    #[test]
    fn test_extra_columns_are_dropped_and_request_order_kept() {
        let payload = "YEAR,DOY,MO,DY,WS2M,T2M,RH2M\n2025,1,1,1,3.2,25.0,70.0\n";
        let table = parse_chunk(payload, &Preamble::None, 2025, &vars("RH2M,T2M")).unwrap();
        assert_eq!(column_names(&table), ["YEAR", "MO", "DY", "RH2M", "T2M"]);
    }

    #[test]
    fn test_fully_empty_rows_are_dropped() {
        let payload = "YEAR,MO,DY,T2M\n2025,1,1,25.0\n,,,\n2025,1,3,\n";
        let table = parse_chunk(payload, &Preamble::None, 2025, &vars("T2M")).unwrap();
        assert_eq!(table.height(), 2);
    }

    #[test]
    fn test_missing_key_column_is_schema_error() {
        let payload = "YEAR,DY,T2M\n2025,1,25.0\n";
        let err = parse_chunk(payload, &Preamble::None, 2025, &vars("T2M")).unwrap_err();
        assert!(matches!(err, ChunkError::Schema { year: 2025, .. }));
        assert!(err.to_string().contains("MO"));
    }

    #[test]
    fn test_no_requested_variable_is_schema_error() {
        let payload = "YEAR,MO,DY,WS2M\n2025,1,1,3.0\n";
        let err = parse_chunk(payload, &Preamble::None, 2025, &vars("T2M")).unwrap_err();
        assert!(matches!(err, ChunkError::Schema { .. }));
    }

    #[test]
    fn test_header_only_is_empty_error() {
        let payload = "YEAR,MO,DY,T2M\n";
        let err = parse_chunk(payload, &Preamble::None, 2024, &vars("T2M")).unwrap_err();
        assert!(matches!(err, ChunkError::Empty { year: 2024 }));
    }

    #[test]
    fn test_blank_body_is_schema_error() {
        let err =
            parse_chunk("-END HEADER-\n\n", &Preamble::default(), 2024, &vars("T2M")).unwrap_err();
        assert!(matches!(err, ChunkError::Schema { .. }));
    }

    #[test]
    fn test_assemble_keeps_year_order_and_unions_columns() {
        let first = parse_chunk(
            "YEAR,MO,DY,T2M\n2023,12,31,10.0\n",
            &Preamble::None,
            2023,
            &vars("T2M,RH2M"),
        )
        .unwrap();
        let second = parse_chunk(
            "YEAR,MO,DY,T2M,RH2M\n2024,1,1,11.0,60.0\n",
            &Preamble::None,
            2024,
            &vars("T2M,RH2M"),
        )
        .unwrap();

        let table = assemble(vec![first, second], &vars("T2M,RH2M")).unwrap();
        assert_eq!(column_names(&table), ["YEAR", "MO", "DY", "T2M", "RH2M"]);
        let years: Vec<Option<i64>> = table
            .column("YEAR")
            .unwrap()
            .i64()
            .unwrap()
            .into_iter()
            .collect();
        assert_eq!(years, vec![Some(2023), Some(2024)]);
        assert_eq!(table.column("RH2M").unwrap().null_count(), 1);
    }

    #[test]
    fn test_coerce_cached_keeps_order() {
        let table = df!(
            "YEAR" => [2025i64],
            "MO" => [1i64],
            "DY" => [1i64],
            "T2M" => [25i64],
        )
        .unwrap();
        let coerced = coerce_cached(table).unwrap();
        assert_eq!(column_names(&coerced), ["YEAR", "MO", "DY", "T2M"]);
        assert_eq!(coerced.column("T2M").unwrap().dtype(), &DataType::Float64);
    }
}
