//! Business logic services.
//!
//! Services orchestrate the detection engine and the corpus store and provide
//! high-level operations.

pub mod deduplication;

pub use deduplication::{DuplicateDetectionService, DuplicateDetector};
