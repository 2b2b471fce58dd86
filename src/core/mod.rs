//! Core types and error handling

pub mod error;
pub mod types;
