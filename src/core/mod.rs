pub mod bid;
pub mod error;
pub mod requirement;
pub mod supplier;
