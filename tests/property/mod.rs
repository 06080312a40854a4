//! Property-based tests for merge and expansion guarantees

mod flattening;
mod merge;
