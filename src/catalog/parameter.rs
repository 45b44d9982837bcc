/// Placeholder returned by [`describe_parameter`] for codes the catalog does not know.
pub const UNKNOWN_PARAMETER: &str = "Unknown parameter code";

/// Variables requested when a caller does not name any: precipitation, temperature, humidity.
pub const BASELINE_VARIABLES: [&str; 3] = ["PRECTOTCORR", "T2M", "RH2M"];

const PARAMETER_DEFINITIONS: &[(&str, &str)] = &[
    ("T2M", "Air temperature at 2 meters above the surface (°C)"),
    ("T2M_MAX", "Maximum daily air temperature at 2 meters (°C)"),
    ("T2M_MIN", "Minimum daily air temperature at 2 meters (°C)"),
    ("RH2M", "Relative humidity at 2 meters (%)"),
    ("PRECTOTCORR", "Corrected total daily precipitation (mm/day)"),
    (
        "ALLSKY_KT",
        "Clearness index (ratio of actual to clear-sky radiation, 0–1)",
    ),
    (
        "ALLSKY_SFC_SW_DWN",
        "All-sky surface shortwave downward irradiance (W/m²)",
    ),
    ("WS2M", "Wind speed at 2 meters above the surface (m/s)"),
    ("WS10M", "Wind speed at 10 meters above the surface (m/s)"),
    (
        "WD10M",
        "Wind direction at 10 meters above the surface (degrees 0–360)",
    ),
    ("EVLAND", "Land surface evapotranspiration (mm/day)"),
    ("GWETROOT", "Root-zone soil wetness (fraction of saturation 0–1)"),
];

/// Human-readable description of a variable code, or [`UNKNOWN_PARAMETER`].
///
/// Codes are matched exactly (NASA POWER codes are upper case).
///
/// # Examples
///
/// ```
/// use will_it_rain::describe_parameter;
///
/// assert_eq!(describe_parameter("RH2M"), "Relative humidity at 2 meters (%)");
/// assert_eq!(describe_parameter("XYZ"), "Unknown parameter code");
/// ```
pub fn describe_parameter(code: &str) -> &'static str {
    PARAMETER_DEFINITIONS
        .iter()
        .find(|(known, _)| *known == code)
        .map(|(_, description)| *description)
        .unwrap_or(UNKNOWN_PARAMETER)
}
