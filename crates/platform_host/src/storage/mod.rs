//! Storage contracts.

pub mod documents;
