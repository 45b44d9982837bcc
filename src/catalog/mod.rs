//! Static catalog mapping outdoor activities to curated NASA POWER variable sets.
//!
//! Lookups are case-insensitive and tolerate surrounding whitespace. Aliases resolve
//! in a single step to a canonical activity; aliases never point at other aliases.

mod activity;
mod parameter;

pub use activity::{activities, canonical_activity, parameters_for, Activity, ACTIVITY_ALIASES};
pub use parameter::{describe_parameter, BASELINE_VARIABLES, UNKNOWN_PARAMETER};
