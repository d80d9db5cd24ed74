//! Command implementations for the gigbook CLI

pub mod serve;

pub use serve::run_serve;
