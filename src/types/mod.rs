pub mod coordinate;
pub mod date_range;
pub mod metadata;
pub mod variable_set;
