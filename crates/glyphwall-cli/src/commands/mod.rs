//! CLI command implementations

pub mod ascii;
pub mod lattice;
pub mod modes;
pub mod simulate;
