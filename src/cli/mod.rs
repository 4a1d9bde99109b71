//! CLI support for the sofa-conventions binary

pub mod commands;
pub mod error;
