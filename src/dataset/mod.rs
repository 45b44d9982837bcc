//! Acquisition of daily climate tables: upstream fetching, per-year chunking,
//! normalisation and the on-disk cache.

pub mod cache;
pub mod engine;
pub mod error;
pub mod fetcher;
pub mod normalize;
