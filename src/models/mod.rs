//! Data model for SOFA convention tables

pub mod convention;

pub use convention::{ConventionRow, ConventionTable};
