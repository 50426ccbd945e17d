//! gridfill_engine - Grid data model: values, identities, coordinates, sorting.

pub mod engine;
