//! Data models
//!
//! Wire types for the Anthropic Messages API and the uniform result record
//! returned by every operation.

pub mod anthropic;
pub mod result;

pub use result::OperationResult;
