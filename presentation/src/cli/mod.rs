//! Command-line interface

pub mod arguments;
pub mod commands;
