//! CLI library components for the CUPS equivalence registry.

pub mod catalog;
pub mod logging;
