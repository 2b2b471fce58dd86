//! Stellar Dominion - autonomous faction AI for galaxy conquest

pub mod command;
pub mod core;
pub mod planner;
pub mod rules;
pub mod snapshot;
