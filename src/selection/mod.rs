//! The supplier selection pipeline:
//! gather → cost → risk → score → failsafe → audit + buyer quote.

pub mod audit;
pub mod candidates;
pub mod cost;
pub mod engine;
pub mod failsafe;
pub mod policy;
pub mod response;
pub mod risk;
pub mod scoring;
