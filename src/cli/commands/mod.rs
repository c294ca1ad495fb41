//! Command implementations for the pwordcount CLI

pub mod count;
