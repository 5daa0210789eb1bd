//! Analyzers run by the CLI.

pub mod iac;
