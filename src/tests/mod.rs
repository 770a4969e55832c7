//! Test modules for the commute tracker binary crate.
