//! Command-line front end for the mosaify entity store.

pub mod commands;
pub mod config;
