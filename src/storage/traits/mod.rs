//! Storage trait definitions.

mod corpus;

pub use corpus::CorpusStore;
